use chrono::{NaiveDate, TimeZone, Utc};
use coachrs::{export, parser};
use rust_decimal_macros::dec;

/// Integration tests that test the complete system workflows

#[cfg(test)]
mod integration_tests {
    use super::*;
    use coachrs::export::ExportFormat;
    use coachrs::hydration::tracker::{HydrationTracker, IntakeDay, ADHERENCE_WINDOW_DAYS};
    use coachrs::hydration::{HydrationModel, TipCategory};
    use coachrs::models::{FitnessProfile, WorkoutPlan};
    use coachrs::parser::PlanParser;
    use coachrs::storage::{PlanStore, StorageError};

    fn sample_plan_text() -> &'static str {
        "## Beginner Full Body Program\n\
         \n\
         **Summary:** Three full-body sessions per week with a focus on the\n\
         basic barbell lifts.\n\
         \n\
         ### Day 1: Full Body A (~45 minutes)\n\
         **Warm-up:** 5 minutes rowing\n\
         1. **Squat** - 3 sets x 5 reps, Rest: 120 seconds\n\
         2. **Bench Press** - 3 sets x 5 reps, Rest: 90 seconds\n\
         3. **Barbell Row** - 3 sets x 8 reps, Rest: 90 seconds\n\
         **Cool-down:** Quad and chest stretches\n\
         \n\
         ### Day 2: Full Body B (~45 minutes)\n\
         1. **Deadlift** - 1 set x 5 reps, Rest: 180 seconds\n\
         2. **Overhead Press** - 3 sets x 5 reps, Rest: 90 seconds\n\
         \n\
         ### Day 3: Full Body A (~45 minutes)\n\
         1. **Squat** - 3 sets x 5 reps, Rest: 120 seconds\n\
         2. **Pull-ups** - 3 sets x 8-10 reps, Rest: 90 seconds\n\
         \n\
         ### Additional Tips:\n\
         - Add weight only when all reps are clean\n\
         - Rest at least one day between sessions\n"
    }

    fn create_test_profile() -> FitnessProfile {
        FitnessProfile {
            age: Some("29".to_string()),
            weight: Some("70 kg".to_string()),
            goal: Some("build muscle".to_string()),
            level: Some("beginner".to_string()),
            days_per_week: Some("3 days".to_string()),
            time_per_workout: Some("45 minutes".to_string()),
            ..Default::default()
        }
    }

    fn week_of_intake(total_ml: u32, goal_ml: u32) -> Vec<IntakeDay> {
        (1..=7)
            .map(|d| IntakeDay {
                date: NaiveDate::from_ymd_opt(2024, 6, d).unwrap(),
                total_ml,
                goal_ml,
            })
            .collect()
    }

    /// Test the complete parse, store, and retrieve workflow
    #[test]
    fn test_parse_store_retrieve_workflow() {
        let plan = PlanParser::parse(sample_plan_text(), None);
        assert_eq!(plan.plan_name, "Beginner Full Body Program");
        assert_eq!(plan.weekly_schedule.len(), 3);
        assert_eq!(plan.total_exercises(), 7);

        let mut store = PlanStore::open_in_memory().unwrap();
        let id = store.store_plan(&plan).unwrap();

        let stored = store.get_plan(&id).unwrap().unwrap();
        assert_eq!(stored.plan, plan);
        assert_eq!(stored.plan.full_plan, sample_plan_text());

        let latest = store.latest_plan().unwrap().unwrap();
        assert_eq!(latest.id, id);
    }

    /// Profile answers drive the parser's rest day complement
    #[test]
    fn test_profile_days_feed_the_parser() {
        let profile = create_test_profile();
        assert_eq!(profile.days_per_week(), Some(3));

        let plan = PlanParser::parse(sample_plan_text(), profile.days_per_week());
        assert_eq!(plan.rest_days, vec![4, 5, 6, 7]);
    }

    /// Test exporting a stored plan in both supported formats
    #[test]
    fn test_store_then_export_workflow() {
        let plan = PlanParser::parse(sample_plan_text(), Some(3));
        let mut store = PlanStore::open_in_memory().unwrap();
        let id = store.store_plan(&plan).unwrap();
        let stored = store.get_plan(&id).unwrap().unwrap();

        let json = export::export_plan(&stored.plan, ExportFormat::Json).unwrap();
        let restored: WorkoutPlan = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, plan);

        let csv = export::export_plan(&stored.plan, ExportFormat::Csv).unwrap();
        let rows = csv.lines().count();
        assert_eq!(rows, 1 + plan.total_exercises());
        assert!(csv.contains("Deadlift"));
    }

    /// Storing identical plan text twice is rejected, different text is not
    #[test]
    fn test_duplicate_detection_across_parses() {
        let mut store = PlanStore::open_in_memory().unwrap();

        let first = PlanParser::parse(sample_plan_text(), None);
        store.store_plan(&first).unwrap();

        let reparsed = PlanParser::parse(sample_plan_text(), Some(3));
        let err = store.store_plan(&reparsed).unwrap_err();
        assert!(matches!(err, StorageError::Duplicate(_)));

        let other = PlanParser::parse("### Day 1: Cardio (~20 minutes)\n1. Run - 1 set\n", None);
        store.store_plan(&other).unwrap();
        assert_eq!(store.list_plans(None).unwrap().len(), 2);
    }

    /// Unstructured input degrades to the fallback plan and still survives
    /// a storage round trip with its raw text intact
    #[test]
    fn test_fallback_plan_survives_storage() {
        let raw = "I cannot generate a workout plan right now. Please try again.";
        let plan = PlanParser::parse(raw, Some(4));
        assert!(plan.weekly_schedule.is_empty());

        let mut store = PlanStore::open_in_memory().unwrap();
        let id = store.store_plan(&plan).unwrap();
        let stored = store.get_plan(&id).unwrap().unwrap();

        assert_eq!(stored.plan.full_plan, raw);
        assert_eq!(stored.plan.plan_name, parser::FALLBACK_PLAN_NAME);
        assert!(stored.plan.weekly_schedule.is_empty());
    }

    /// A week of logged intake flows through adherence into a model decision
    #[test]
    fn test_hydration_history_to_decision_workflow() {
        let model = HydrationModel::from_builtin();
        let today = NaiveDate::from_ymd_opt(2024, 6, 8).unwrap();

        // 1300 of 2000 ml every day is 65% adherence, the medium bucket
        let tracker =
            HydrationTracker::from_history(2000, week_of_intake(1300, 2000), None, today);
        assert_eq!(tracker.average_adherence(ADHERENCE_WINDOW_DAYS), dec!(65));

        let decision = tracker.decision(&model, "moderate");
        assert_eq!(decision.interval_minutes, 45);
        assert_eq!(decision.tip_category, TipCategory::Medium);

        // Meeting the goal every day moves the user to the high bucket
        let diligent =
            HydrationTracker::from_history(2000, week_of_intake(2000, 2000), None, today);
        let decision = diligent.decision(&model, "moderate");
        assert_eq!(decision.interval_minutes, 60);
        assert_eq!(decision.tip_category, TipCategory::High);
    }

    /// Logged intake persists through the store and is restored on load
    #[test]
    fn test_hydration_persistence_workflow() {
        let mut store = PlanStore::open_in_memory().unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 6, 8).unwrap();
        let morning = Utc.with_ymd_and_hms(2024, 6, 8, 8, 0, 0).unwrap();
        let noon = Utc.with_ymd_and_hms(2024, 6, 8, 12, 0, 0).unwrap();

        for day in week_of_intake(1300, 2000) {
            store.upsert_intake_day(&day, None).unwrap();
        }

        let mut tracker = store.load_tracker(2000, today).unwrap();
        assert_eq!(tracker.history().len(), 7);
        assert_eq!(tracker.intake_ml, 0);

        tracker.log_intake(400, morning);
        tracker.log_intake(300, noon);
        store.save_tracker(&tracker, today).unwrap();

        let restored = store.load_tracker(2000, today).unwrap();
        assert_eq!(restored.intake_ml, 700);
        assert_eq!(restored.last_drink, Some(noon));
        assert_eq!(restored.history().len(), 8);
    }

    /// Custom goals recommended from profile answers feed the tracker
    #[test]
    fn test_recommended_goal_from_profile() {
        let profile = create_test_profile();
        let weight = profile.weight_kg().unwrap();

        let goal = HydrationTracker::recommended_goal_ml(weight, 26);
        assert_eq!(goal, 70 * 30 + 6 * 10 + 500);

        let noon = Utc.with_ymd_and_hms(2024, 6, 8, 12, 0, 0).unwrap();
        let mut tracker = HydrationTracker::new(2500);
        tracker.set_goal(goal, noon);
        assert_eq!(tracker.daily_goal_ml, goal);
    }

    /// Deleting a plan removes it from listings and lookups
    #[test]
    fn test_delete_workflow() {
        let mut store = PlanStore::open_in_memory().unwrap();
        let plan = PlanParser::parse(sample_plan_text(), None);
        let id = store.store_plan(&plan).unwrap();

        store.delete_plan(&id).unwrap();
        assert!(store.get_plan(&id).unwrap().is_none());
        assert!(store.latest_plan().unwrap().is_none());
        assert!(store.list_plans(None).unwrap().is_empty());
    }
}
