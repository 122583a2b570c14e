//! Daily water intake tracking.
//!
//! Keeps today's running total against a configurable goal, a per-day
//! history for adherence statistics, and the timestamp of the last logged
//! drink for reminder scheduling. Persistence lives in the storage module;
//! this type is pure bookkeeping.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Decision, HydrationModel};

/// Default cup size for cup arithmetic, in milliliters
pub const DEFAULT_CUP_ML: u32 = 250;

/// Default daily intake goal, in milliliters
pub const DEFAULT_GOAL_ML: u32 = 2500;

/// Days of history considered when deriving adherence for inference
pub const ADHERENCE_WINDOW_DAYS: usize = 7;

/// Tip shown while there is no history to infer from
pub const EMPTY_HISTORY_TIP: &str =
    "Start logging your water intake to get personalized tips.";

/// One day of recorded water intake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakeDay {
    /// Calendar day
    pub date: NaiveDate,

    /// Total logged intake in milliliters, clamped at the goal
    pub total_ml: u32,

    /// Goal in effect on that day, in milliliters
    pub goal_ml: u32,
}

/// Water intake state for one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HydrationTracker {
    /// Daily intake goal in milliliters
    pub daily_goal_ml: u32,

    /// Intake logged today in milliliters
    pub intake_ml: u32,

    /// When the user last logged a drink
    pub last_drink: Option<DateTime<Utc>>,

    /// Per-day history, ascending by date
    history: Vec<IntakeDay>,
}

impl HydrationTracker {
    pub fn new(daily_goal_ml: u32) -> Self {
        Self {
            daily_goal_ml,
            intake_ml: 0,
            last_drink: None,
            history: Vec::new(),
        }
    }

    /// Rebuild a tracker from persisted history.
    ///
    /// Today's intake is restored from the matching history row; the
    /// configured goal wins over whatever goal old rows carry.
    pub fn from_history(
        daily_goal_ml: u32,
        mut history: Vec<IntakeDay>,
        last_drink: Option<DateTime<Utc>>,
        today: NaiveDate,
    ) -> Self {
        history.sort_by_key(|day| day.date);
        let intake_ml = history
            .iter()
            .find(|day| day.date == today)
            .map(|day| day.total_ml)
            .unwrap_or(0);
        Self {
            daily_goal_ml,
            intake_ml,
            last_drink,
            history,
        }
    }

    /// Log a drink. Intake is clamped at the daily goal and the last-drink
    /// timestamp is refreshed.
    pub fn log_intake(&mut self, amount_ml: u32, now: DateTime<Utc>) {
        self.intake_ml = self
            .intake_ml
            .saturating_add(amount_ml)
            .min(self.daily_goal_ml);
        self.last_drink = Some(now);
        self.upsert_today(now.date_naive());
    }

    /// Zero today's intake and clear the last-drink timestamp
    pub fn reset_day(&mut self, now: DateTime<Utc>) {
        self.intake_ml = 0;
        self.last_drink = None;
        self.upsert_today(now.date_naive());
    }

    /// Change the daily goal. Today's intake is re-clamped so the
    /// intake-never-exceeds-goal invariant holds.
    pub fn set_goal(&mut self, goal_ml: u32, now: DateTime<Utc>) {
        self.daily_goal_ml = goal_ml;
        self.intake_ml = self.intake_ml.min(goal_ml);
        self.upsert_today(now.date_naive());
    }

    /// Recorded history, ascending by date
    pub fn history(&self) -> &[IntakeDay] {
        &self.history
    }

    /// Today's history row, as it would be persisted
    pub fn today(&self, date: NaiveDate) -> IntakeDay {
        IntakeDay {
            date,
            total_ml: self.intake_ml,
            goal_ml: self.daily_goal_ml,
        }
    }

    /// Mean goal adherence over the trailing window, as a percentage.
    ///
    /// Days with a zero goal count as 0%; an empty history yields 0.
    pub fn average_adherence(&self, window_days: usize) -> Decimal {
        if self.history.is_empty() || window_days == 0 {
            return Decimal::ZERO;
        }
        let start = self.history.len().saturating_sub(window_days);
        let window = &self.history[start..];
        let total: Decimal = window
            .iter()
            .map(|day| {
                if day.goal_ml == 0 {
                    Decimal::ZERO
                } else {
                    Decimal::from(day.total_ml) * Decimal::from(100) / Decimal::from(day.goal_ml)
                }
            })
            .sum();
        total / Decimal::from(window.len() as u64)
    }

    /// Reminder decision from the trailing week's adherence
    pub fn decision(&self, model: &HydrationModel, intensity: &str) -> Decision {
        model.infer(self.average_adherence(ADHERENCE_WINDOW_DAYS), intensity)
    }

    /// Whether a reminder should fire: the interval has elapsed since the
    /// last drink and the goal is not yet met. Never fires before the first
    /// drink of the day.
    pub fn reminder_due(&self, interval_minutes: u32, now: DateTime<Utc>) -> bool {
        let last = match self.last_drink {
            Some(last) => last,
            None => return false,
        };
        if self.intake_ml >= self.daily_goal_ml {
            return false;
        }
        now.signed_duration_since(last).num_minutes() >= i64::from(interval_minutes)
    }

    /// Full cups finished today
    pub fn cups_consumed(&self, cup_ml: u32) -> u32 {
        if cup_ml == 0 {
            return 0;
        }
        self.intake_ml / cup_ml
    }

    /// Cups still needed to reach the goal, rounded up
    pub fn cups_remaining(&self, cup_ml: u32) -> u32 {
        if cup_ml == 0 {
            return 0;
        }
        let missing = self.daily_goal_ml.saturating_sub(self.intake_ml);
        missing.saturating_add(cup_ml - 1) / cup_ml
    }

    /// Progress toward today's goal as a percentage
    pub fn progress_percent(&self) -> Decimal {
        if self.daily_goal_ml == 0 {
            return Decimal::ZERO;
        }
        Decimal::from(self.intake_ml) * Decimal::from(100) / Decimal::from(self.daily_goal_ml)
    }

    /// Daily goal suggestion in milliliters: 30 ml per kg of body weight,
    /// 10 ml per degree above 20 C, plus a 500 ml training allowance
    pub fn recommended_goal_ml(weight_kg: u32, temperature_c: i32) -> u32 {
        let heat = if temperature_c > 20 {
            (temperature_c - 20) as u32 * 10
        } else {
            0
        };
        weight_kg.saturating_mul(30).saturating_add(heat).saturating_add(500)
    }

    fn upsert_today(&mut self, today: NaiveDate) {
        let entry = self.today(today);
        match self.history.iter_mut().find(|day| day.date == today) {
            Some(day) => *day = entry,
            None => {
                self.history.push(entry);
                self.history.sort_by_key(|day| day.date);
            }
        }
    }
}

impl Default for HydrationTracker {
    fn default() -> Self {
        Self::new(DEFAULT_GOAL_ML)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, hour, minute, 0).unwrap()
    }

    fn day(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    #[test]
    fn test_log_intake_accumulates() {
        let mut tracker = HydrationTracker::new(2500);
        tracker.log_intake(500, at(8, 0));
        tracker.log_intake(250, at(9, 0));
        assert_eq!(tracker.intake_ml, 750);
        assert_eq!(tracker.last_drink, Some(at(9, 0)));
    }

    #[test]
    fn test_log_intake_clamps_at_goal() {
        let mut tracker = HydrationTracker::new(2000);
        tracker.log_intake(1500, at(8, 0));
        tracker.log_intake(1500, at(12, 0));
        assert_eq!(tracker.intake_ml, 2000);
    }

    #[test]
    fn test_reset_day_clears_state() {
        let mut tracker = HydrationTracker::new(2500);
        tracker.log_intake(800, at(8, 0));
        tracker.reset_day(at(23, 59));
        assert_eq!(tracker.intake_ml, 0);
        assert_eq!(tracker.last_drink, None);
        assert_eq!(tracker.history().last().map(|d| d.total_ml), Some(0));
    }

    #[test]
    fn test_set_goal_reclamps_intake() {
        let mut tracker = HydrationTracker::new(3000);
        tracker.log_intake(2500, at(8, 0));
        tracker.set_goal(2000, at(9, 0));
        assert_eq!(tracker.daily_goal_ml, 2000);
        assert_eq!(tracker.intake_ml, 2000);
    }

    #[test]
    fn test_same_day_logs_share_one_history_row() {
        let mut tracker = HydrationTracker::new(2500);
        tracker.log_intake(500, at(8, 0));
        tracker.log_intake(500, at(12, 0));
        assert_eq!(tracker.history().len(), 1);
        assert_eq!(tracker.history()[0].total_ml, 1000);
    }

    #[test]
    fn test_from_history_restores_todays_intake() {
        let history = vec![
            IntakeDay {
                date: day(1),
                total_ml: 1800,
                goal_ml: 2500,
            },
            IntakeDay {
                date: day(2),
                total_ml: 750,
                goal_ml: 2500,
            },
        ];
        let tracker = HydrationTracker::from_history(2500, history, Some(at(7, 30)), day(2));
        assert_eq!(tracker.intake_ml, 750);
        assert_eq!(tracker.last_drink, Some(at(7, 30)));
        assert_eq!(tracker.history().len(), 2);
    }

    #[test]
    fn test_average_adherence_empty_history_is_zero() {
        let tracker = HydrationTracker::new(2500);
        assert_eq!(tracker.average_adherence(7), Decimal::ZERO);
    }

    #[test]
    fn test_average_adherence_means_recent_days() {
        let history = vec![
            IntakeDay {
                date: day(1),
                total_ml: 1000,
                goal_ml: 2000,
            },
            IntakeDay {
                date: day(2),
                total_ml: 2000,
                goal_ml: 2000,
            },
            IntakeDay {
                date: day(3),
                total_ml: 0,
                goal_ml: 2000,
            },
        ];
        let tracker = HydrationTracker::from_history(2000, history, None, day(3));
        assert_eq!(tracker.average_adherence(7), dec!(50));
        // Trailing window: only the last two days
        assert_eq!(tracker.average_adherence(2), dec!(50));
        assert_eq!(tracker.average_adherence(1), dec!(0));
    }

    #[test]
    fn test_zero_goal_days_count_as_zero() {
        let history = vec![
            IntakeDay {
                date: day(1),
                total_ml: 500,
                goal_ml: 0,
            },
            IntakeDay {
                date: day(2),
                total_ml: 2000,
                goal_ml: 2000,
            },
        ];
        let tracker = HydrationTracker::from_history(2000, history, None, day(2));
        assert_eq!(tracker.average_adherence(7), dec!(50));
    }

    #[test]
    fn test_reminder_not_due_before_first_drink() {
        let tracker = HydrationTracker::new(2500);
        assert!(!tracker.reminder_due(45, at(12, 0)));
    }

    #[test]
    fn test_reminder_due_after_interval() {
        let mut tracker = HydrationTracker::new(2500);
        tracker.log_intake(500, at(8, 0));
        assert!(!tracker.reminder_due(45, at(8, 30)));
        assert!(tracker.reminder_due(45, at(8, 45)));
        assert!(tracker.reminder_due(45, at(10, 0)));
    }

    #[test]
    fn test_reminder_not_due_once_goal_met() {
        let mut tracker = HydrationTracker::new(1000);
        tracker.log_intake(1000, at(8, 0));
        assert!(!tracker.reminder_due(45, at(12, 0)));
    }

    #[test]
    fn test_cup_arithmetic() {
        let mut tracker = HydrationTracker::new(2500);
        tracker.log_intake(600, at(8, 0));
        assert_eq!(tracker.cups_consumed(DEFAULT_CUP_ML), 2);
        assert_eq!(tracker.cups_remaining(DEFAULT_CUP_ML), 8);
    }

    #[test]
    fn test_cup_arithmetic_at_goal() {
        let mut tracker = HydrationTracker::new(1000);
        tracker.log_intake(1000, at(8, 0));
        assert_eq!(tracker.cups_consumed(250), 4);
        assert_eq!(tracker.cups_remaining(250), 0);
    }

    #[test]
    fn test_progress_percent() {
        let mut tracker = HydrationTracker::new(2000);
        tracker.log_intake(500, at(8, 0));
        assert_eq!(tracker.progress_percent(), dec!(25));
    }

    #[test]
    fn test_recommended_goal_formula() {
        assert_eq!(HydrationTracker::recommended_goal_ml(70, 30), 2700);
        assert_eq!(HydrationTracker::recommended_goal_ml(70, 15), 2600);
        assert_eq!(HydrationTracker::recommended_goal_ml(82, 20), 2960);
    }

    #[test]
    fn test_decision_uses_trailing_adherence() {
        let model = HydrationModel::from_builtin();
        let history = vec![IntakeDay {
            date: day(1),
            total_ml: 600,
            goal_ml: 2000,
        }];
        let tracker = HydrationTracker::from_history(2000, history, None, day(1));
        let decision = tracker.decision(&model, "moderate");
        assert_eq!(decision.interval_minutes, 45);
        assert_eq!(decision.tip_category, super::super::TipCategory::Low);
    }
}
