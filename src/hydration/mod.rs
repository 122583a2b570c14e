//! Hydration decision model.
//!
//! Trains a lookup table from historical (adherence, intensity) observations
//! and answers "how often should we remind this user to drink, and which tip
//! fits them" without any runtime model service. The embedded dataset lives
//! in [`dataset`]; daily intake bookkeeping lives in [`tracker`].

pub mod dataset;
pub mod tracker;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Reminder interval used when the model has no usable cell at all
pub const FALLBACK_INTERVAL_MINUTES: u32 = 45;

const LOW_TIP: &str = "You usually don’t reach your water goal. Try drinking a small glass every time you check your phone.";
const MEDIUM_TIP: &str = "You are close to your water goal most days. One extra cup in the afternoon could help you hit 100%.";
const HIGH_TIP: &str = "You regularly meet your water goal. Great job! Keep your current routine going.";

/// Errors raised while building a hydration model
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HydrationError {
    /// Training requires at least one observation
    #[error("hydration training dataset is empty")]
    EmptyDataset,
}

/// Workout intensity levels recognized by the hydration model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutIntensity {
    Light,
    Moderate,
    Intense,
}

impl WorkoutIntensity {
    /// All intensities in fallback order
    pub const ALL: [WorkoutIntensity; 3] = [
        WorkoutIntensity::Light,
        WorkoutIntensity::Moderate,
        WorkoutIntensity::Intense,
    ];

    /// Parse a user-supplied intensity name; unknown values yield `None`
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "light" => Some(WorkoutIntensity::Light),
            "moderate" => Some(WorkoutIntensity::Moderate),
            "intense" => Some(WorkoutIntensity::Intense),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkoutIntensity::Light => "light",
            WorkoutIntensity::Moderate => "moderate",
            WorkoutIntensity::Intense => "intense",
        }
    }

    const fn index(self) -> usize {
        match self {
            WorkoutIntensity::Light => 0,
            WorkoutIntensity::Moderate => 1,
            WorkoutIntensity::Intense => 2,
        }
    }
}

/// Goal-adherence buckets shared by training and inference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdherenceBucket {
    Low,
    Medium,
    High,
}

impl AdherenceBucket {
    /// All buckets in fallback order
    pub const ALL: [AdherenceBucket; 3] = [
        AdherenceBucket::Low,
        AdherenceBucket::Medium,
        AdherenceBucket::High,
    ];

    /// Bucket an adherence percentage: below 60 low, below 100 medium,
    /// 100 and above high
    pub fn from_percent(percent: Decimal) -> Self {
        if percent < dec!(60) {
            AdherenceBucket::Low
        } else if percent < dec!(100) {
            AdherenceBucket::Medium
        } else {
            AdherenceBucket::High
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AdherenceBucket::Low => "low",
            AdherenceBucket::Medium => "medium",
            AdherenceBucket::High => "high",
        }
    }

    const fn index(self) -> usize {
        match self {
            AdherenceBucket::Low => 0,
            AdherenceBucket::Medium => 1,
            AdherenceBucket::High => 2,
        }
    }
}

/// Hydration tip families, each with a fixed user-facing text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TipCategory {
    Low,
    Medium,
    High,
}

impl TipCategory {
    pub const ALL: [TipCategory; 3] = [TipCategory::Low, TipCategory::Medium, TipCategory::High];

    /// User-facing tip text for this category
    pub fn text(&self) -> &'static str {
        match self {
            TipCategory::Low => LOW_TIP,
            TipCategory::Medium => MEDIUM_TIP,
            TipCategory::High => HIGH_TIP,
        }
    }

    const fn index(self) -> usize {
        match self {
            TipCategory::Low => 0,
            TipCategory::Medium => 1,
            TipCategory::High => 2,
        }
    }
}

/// One observation in the hydration training dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrainingRow {
    /// Historical goal adherence in percent (may exceed 100)
    pub adherence_percent: u16,

    /// Workout intensity of the observed user group
    pub intensity: WorkoutIntensity,

    /// Reminder interval that worked for this group, in minutes
    pub interval_minutes: u32,

    /// Tip category that worked for this group
    pub tip: TipCategory,
}

impl TrainingRow {
    pub const fn new(
        adherence_percent: u16,
        intensity: WorkoutIntensity,
        interval_minutes: u32,
        tip: TipCategory,
    ) -> Self {
        Self {
            adherence_percent,
            intensity,
            interval_minutes,
            tip,
        }
    }
}

/// Learned decision for one (intensity, bucket) cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelCell {
    /// Reminder interval in minutes
    pub interval_minutes: u32,

    /// Tip category for the cell
    pub tip: TipCategory,
}

/// Reminder decision for a specific user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    /// Minutes to wait between reminders
    pub interval_minutes: u32,

    /// Tip family the user falls into
    pub tip_category: TipCategory,

    /// User-facing tip text
    pub tip_text: &'static str,
}

/// Lookup-table model mapping (workout intensity, adherence bucket) to a
/// reminder interval and tip category.
///
/// Built once at startup and passed by reference to whoever needs a
/// [`Decision`]; there is no global instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HydrationModel {
    cells: [[Option<ModelCell>; 3]; 3],
}

impl HydrationModel {
    /// Train a model from observation rows.
    ///
    /// Rows are grouped by (intensity, adherence bucket). Each cell gets the
    /// mean interval rounded half away from zero and the most frequent tip
    /// category, ties broken by whichever category appeared first in the
    /// data.
    pub fn train(rows: &[TrainingRow]) -> Result<Self, HydrationError> {
        if rows.is_empty() {
            return Err(HydrationError::EmptyDataset);
        }

        let mut sums = [[0u64; 3]; 3];
        let mut counts = [[0u32; 3]; 3];
        let mut tip_counts = [[[0u32; 3]; 3]; 3];
        let mut tip_first_seen = [[[usize::MAX; 3]; 3]; 3];

        for (order, row) in rows.iter().enumerate() {
            let i = row.intensity.index();
            let b = AdherenceBucket::from_percent(Decimal::from(row.adherence_percent)).index();
            let t = row.tip.index();

            sums[i][b] += u64::from(row.interval_minutes);
            counts[i][b] += 1;
            tip_counts[i][b][t] += 1;
            if tip_first_seen[i][b][t] == usize::MAX {
                tip_first_seen[i][b][t] = order;
            }
        }

        let mut cells = [[None; 3]; 3];
        let mut populated = 0;
        for i in 0..3 {
            for b in 0..3 {
                if counts[i][b] == 0 {
                    continue;
                }
                let mean = Decimal::from(sums[i][b]) / Decimal::from(counts[i][b]);
                let interval_minutes = mean
                    .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                    .to_u32()
                    .unwrap_or(0);

                let mut winner: Option<(u32, usize, TipCategory)> = None;
                for category in TipCategory::ALL {
                    let count = tip_counts[i][b][category.index()];
                    if count == 0 {
                        continue;
                    }
                    let first = tip_first_seen[i][b][category.index()];
                    let better = match winner {
                        None => true,
                        Some((best_count, best_first, _)) => {
                            count > best_count || (count == best_count && first < best_first)
                        }
                    };
                    if better {
                        winner = Some((count, first, category));
                    }
                }

                if let Some((_, _, tip)) = winner {
                    cells[i][b] = Some(ModelCell {
                        interval_minutes,
                        tip,
                    });
                    populated += 1;
                }
            }
        }

        debug!(
            rows = rows.len(),
            cells = populated,
            "hydration model trained"
        );
        Ok(Self { cells })
    }

    /// Model trained from the embedded dataset.
    ///
    /// The dataset is a non-empty compile-time constant; failing to train
    /// from it is a programming error, asserted at startup.
    pub fn from_builtin() -> Self {
        Self::train(&dataset::TRAINING_DATA).expect("builtin hydration dataset must be trainable")
    }

    /// Look up the reminder decision for an adherence percentage and a
    /// user-supplied intensity name.
    ///
    /// Never fails: unknown intensities fall back to moderate, then to the
    /// first intensity with data; missing buckets fall back to medium, then
    /// to the first populated bucket; a hardcoded 45-minute medium cell
    /// backstops a model with no usable data at all.
    pub fn infer(&self, adherence_percent: Decimal, intensity: &str) -> Decision {
        let bucket = AdherenceBucket::from_percent(adherence_percent);
        let requested = WorkoutIntensity::parse(intensity);
        if requested.is_none() {
            debug!(intensity, "unknown workout intensity, using moderate");
        }

        let row = requested
            .and_then(|i| self.populated_row(i))
            .or_else(|| self.populated_row(WorkoutIntensity::Moderate))
            .or_else(|| self.first_populated_row());

        let cell = row
            .and_then(|cells| {
                cells[bucket.index()]
                    .or(cells[AdherenceBucket::Medium.index()])
                    .or_else(|| cells.iter().flatten().next().copied())
            })
            .unwrap_or(ModelCell {
                interval_minutes: FALLBACK_INTERVAL_MINUTES,
                tip: TipCategory::Medium,
            });

        Decision {
            interval_minutes: cell.interval_minutes,
            tip_category: cell.tip,
            tip_text: cell.tip.text(),
        }
    }

    /// Learned cell for an (intensity, bucket) pair, if any
    pub fn cell(&self, intensity: WorkoutIntensity, bucket: AdherenceBucket) -> Option<ModelCell> {
        self.cells[intensity.index()][bucket.index()]
    }

    fn populated_row(&self, intensity: WorkoutIntensity) -> Option<&[Option<ModelCell>; 3]> {
        let row = &self.cells[intensity.index()];
        if row.iter().any(|cell| cell.is_some()) {
            Some(row)
        } else {
            None
        }
    }

    fn first_populated_row(&self) -> Option<&[Option<ModelCell>; 3]> {
        WorkoutIntensity::ALL
            .iter()
            .find_map(|intensity| self.populated_row(*intensity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use super::AdherenceBucket as Bucket;
    use super::TipCategory as Tip;
    use super::WorkoutIntensity as Intensity;

    #[test]
    fn test_bucket_boundaries() {
        assert_eq!(Bucket::from_percent(dec!(0)), Bucket::Low);
        assert_eq!(Bucket::from_percent(dec!(59.999)), Bucket::Low);
        assert_eq!(Bucket::from_percent(dec!(60)), Bucket::Medium);
        assert_eq!(Bucket::from_percent(dec!(99.999)), Bucket::Medium);
        assert_eq!(Bucket::from_percent(dec!(100)), Bucket::High);
        assert_eq!(Bucket::from_percent(dec!(135)), Bucket::High);
    }

    #[test]
    fn test_intensity_parsing() {
        assert_eq!(Intensity::parse("light"), Some(Intensity::Light));
        assert_eq!(Intensity::parse(" MODERATE "), Some(Intensity::Moderate));
        assert_eq!(Intensity::parse("Intense"), Some(Intensity::Intense));
        assert_eq!(Intensity::parse("extreme"), None);
        assert_eq!(Intensity::parse(""), None);
    }

    #[test]
    fn test_empty_dataset_is_an_error() {
        assert_eq!(
            HydrationModel::train(&[]),
            Err(HydrationError::EmptyDataset)
        );
    }

    #[test]
    fn test_builtin_model_covers_all_nine_cells() {
        let model = HydrationModel::from_builtin();
        let expected = [
            (Intensity::Light, [60, 60, 75]),
            (Intensity::Moderate, [45, 45, 60]),
            (Intensity::Intense, [30, 30, 45]),
        ];
        for (intensity, intervals) in expected {
            for (bucket, interval) in Bucket::ALL.into_iter().zip(intervals) {
                let cell = model
                    .cell(intensity, bucket)
                    .unwrap_or_else(|| panic!("missing cell {:?}/{:?}", intensity, bucket));
                assert_eq!(cell.interval_minutes, interval);
            }
        }
    }

    #[test]
    fn test_builtin_model_tips_follow_buckets() {
        let model = HydrationModel::from_builtin();
        for intensity in Intensity::ALL {
            assert_eq!(model.cell(intensity, Bucket::Low).map(|c| c.tip), Some(Tip::Low));
            assert_eq!(
                model.cell(intensity, Bucket::Medium).map(|c| c.tip),
                Some(Tip::Medium)
            );
            assert_eq!(
                model.cell(intensity, Bucket::High).map(|c| c.tip),
                Some(Tip::High)
            );
        }
    }

    #[test]
    fn test_interval_mean_rounds_half_away_from_zero() {
        let rows = [
            TrainingRow::new(30, Intensity::Light, 45, Tip::Low),
            TrainingRow::new(35, Intensity::Light, 46, Tip::Low),
        ];
        let model = HydrationModel::train(&rows).unwrap();
        let cell = model.cell(Intensity::Light, Bucket::Low).unwrap();
        assert_eq!(cell.interval_minutes, 46);
    }

    #[test]
    fn test_tip_mode_prefers_majority() {
        let rows = [
            TrainingRow::new(30, Intensity::Light, 60, Tip::Medium),
            TrainingRow::new(31, Intensity::Light, 60, Tip::Low),
            TrainingRow::new(32, Intensity::Light, 60, Tip::Low),
        ];
        let model = HydrationModel::train(&rows).unwrap();
        let cell = model.cell(Intensity::Light, Bucket::Low).unwrap();
        assert_eq!(cell.tip, Tip::Low);
    }

    #[test]
    fn test_tip_mode_tie_breaks_on_first_seen() {
        let rows = [
            TrainingRow::new(30, Intensity::Light, 60, Tip::Medium),
            TrainingRow::new(31, Intensity::Light, 60, Tip::Low),
        ];
        let model = HydrationModel::train(&rows).unwrap();
        let cell = model.cell(Intensity::Light, Bucket::Low).unwrap();
        assert_eq!(cell.tip, Tip::Medium);
    }

    #[test]
    fn test_infer_exact_lookup() {
        let model = HydrationModel::from_builtin();
        let decision = model.infer(dec!(30), "moderate");
        assert_eq!(decision.interval_minutes, 45);
        assert_eq!(decision.tip_category, Tip::Low);
        assert_eq!(decision.tip_text, Tip::Low.text());
    }

    #[test]
    fn test_unknown_intensity_behaves_like_moderate() {
        let model = HydrationModel::from_builtin();
        for percent in [dec!(20), dec!(75), dec!(110)] {
            assert_eq!(
                model.infer(percent, "extreme"),
                model.infer(percent, "moderate")
            );
        }
    }

    #[test]
    fn test_missing_bucket_falls_back_to_medium() {
        let rows = [TrainingRow::new(80, Intensity::Light, 55, Tip::Medium)];
        let model = HydrationModel::train(&rows).unwrap();
        let decision = model.infer(dec!(20), "light");
        assert_eq!(decision.interval_minutes, 55);
        assert_eq!(decision.tip_category, Tip::Medium);
    }

    #[test]
    fn test_missing_bucket_and_medium_fall_back_to_first_populated() {
        let rows = [TrainingRow::new(120, Intensity::Light, 70, Tip::High)];
        let model = HydrationModel::train(&rows).unwrap();
        let decision = model.infer(dec!(20), "light");
        assert_eq!(decision.interval_minutes, 70);
        assert_eq!(decision.tip_category, Tip::High);
    }

    #[test]
    fn test_missing_intensity_falls_back_to_moderate() {
        let rows = [TrainingRow::new(30, Intensity::Moderate, 45, Tip::Low)];
        let model = HydrationModel::train(&rows).unwrap();
        let decision = model.infer(dec!(30), "light");
        assert_eq!(decision.interval_minutes, 45);
    }

    #[test]
    fn test_missing_moderate_falls_back_to_first_intensity_with_data() {
        let rows = [TrainingRow::new(30, Intensity::Intense, 30, Tip::Low)];
        let model = HydrationModel::train(&rows).unwrap();
        let decision = model.infer(dec!(30), "light");
        assert_eq!(decision.interval_minutes, 30);
    }

    #[test]
    fn test_tip_texts_are_the_canonical_strings() {
        assert_eq!(
            Tip::Low.text(),
            "You usually don’t reach your water goal. Try drinking a small glass every time you check your phone."
        );
        assert_eq!(
            Tip::Medium.text(),
            "You are close to your water goal most days. One extra cup in the afternoon could help you hit 100%."
        );
        assert_eq!(
            Tip::High.text(),
            "You regularly meet your water goal. Great job! Keep your current routine going."
        );
    }

    #[test]
    fn test_intensity_round_trips_through_names() {
        for intensity in Intensity::ALL {
            assert_eq!(Intensity::parse(intensity.as_str()), Some(intensity));
        }
    }
}
