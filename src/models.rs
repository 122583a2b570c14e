use serde::{Deserialize, Serialize};

/// A single exercise within a workout day
///
/// Serialized with camelCase keys so stored and exported documents keep the
/// shape the plan generator produces.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    /// Exercise name as written in the plan
    pub name: String,

    /// Set count, kept as written ("4"); empty when the plan omits it
    #[serde(default)]
    pub sets: String,

    /// Repetition count or range ("12", "8-10"); empty when the plan omits it
    #[serde(default)]
    pub reps: String,

    /// Rest between sets, normalized to "<n> seconds"; empty when omitted
    #[serde(default)]
    pub rest: String,

    /// Coaching note attached to this exercise
    #[serde(default)]
    pub notes: String,
}

/// One training day extracted from a weekly plan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutDay {
    /// Day number as written in the plan (1-based)
    pub day_number: u8,

    /// Display label for the day ("Day 3")
    pub day_name: String,

    /// Training focus for the day ("Upper Body Strength")
    pub focus: String,

    /// Estimated duration in minutes; 0 when the plan gives none
    pub duration: u32,

    /// Exercises in document order
    pub exercises: Vec<Exercise>,

    /// Warm-up description
    #[serde(default)]
    pub warmup: String,

    /// Cool-down description
    #[serde(default)]
    pub cooldown: String,
}

/// Structured weekly workout plan produced by the plan parser
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutPlan {
    /// Plan title extracted from the document heading
    pub plan_name: String,

    /// Short plan description, at most 500 characters
    pub summary: String,

    /// Raw source text, preserved verbatim
    pub full_plan: String,

    /// Same extraction as `plan_name`, kept for document compatibility
    pub structure: String,

    /// Parsed training days in document order
    pub weekly_schedule: Vec<WorkoutDay>,

    /// Rest day numbers (1-7) complementing the training days
    pub rest_days: Vec<u8>,

    /// General tips listed at the end of the plan
    pub tips: Vec<String>,
}

impl WorkoutPlan {
    /// Total number of exercises across all days
    pub fn total_exercises(&self) -> usize {
        self.weekly_schedule.iter().map(|d| d.exercises.len()).sum()
    }

    /// Sum of per-day duration estimates in minutes
    pub fn total_duration_minutes(&self) -> u32 {
        self.weekly_schedule.iter().map(|d| d.duration).sum()
    }

    /// Look up a training day by its day number
    pub fn workout_day(&self, day_number: u8) -> Option<&WorkoutDay> {
        self.weekly_schedule
            .iter()
            .find(|d| d.day_number == day_number)
    }

    /// Whether the given day number is a rest day
    pub fn is_rest_day(&self, day_number: u8) -> bool {
        self.rest_days.contains(&day_number)
    }
}

/// Fitness questionnaire answers collected before plan generation
///
/// Answers are kept as free text exactly as the user gave them; typed
/// accessors parse the fields the parser and scheduler need.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FitnessProfile {
    /// Age in years
    pub age: Option<String>,

    /// Self-described gender
    pub gender: Option<String>,

    /// Height, any unit
    pub height: Option<String>,

    /// Body weight, any unit
    pub weight: Option<String>,

    /// Primary training goal ("build muscle", "lose weight")
    pub goal: Option<String>,

    /// Experience level ("beginner", "intermediate", "advanced")
    pub level: Option<String>,

    /// Training days per week
    pub days_per_week: Option<String>,

    /// Minutes available per workout
    pub time_per_workout: Option<String>,

    /// Available equipment
    pub equipment: Option<String>,

    /// Injuries or other limitations
    pub limitations: Option<String>,
}

impl FitnessProfile {
    /// Training days per week parsed from the raw answer ("5", "5 days")
    pub fn days_per_week(&self) -> Option<u8> {
        self.days_per_week
            .as_deref()
            .and_then(leading_number)
            .and_then(|n| u8::try_from(n).ok())
    }

    /// Minutes per workout parsed from the raw answer ("45", "45 minutes")
    pub fn time_per_workout(&self) -> Option<u32> {
        self.time_per_workout.as_deref().and_then(leading_number)
    }

    /// Body weight in kilograms, when the answer starts with a number
    pub fn weight_kg(&self) -> Option<u32> {
        self.weight.as_deref().and_then(leading_number)
    }
}

/// Parse the leading digit run of a free-text answer
fn leading_number(answer: &str) -> Option<u32> {
    let digits: String = answer
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}
