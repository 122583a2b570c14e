//! Embedded hydration training dataset.
//!
//! 100 observations pairing historical goal adherence and workout intensity
//! with the reminder interval and tip category that worked for that user
//! group. The table is the model's only training input; retraining happens
//! at startup, not at runtime.

use super::TipCategory::{High, Low, Medium};
use super::TrainingRow;
use super::WorkoutIntensity::{Intense, Light, Moderate};

/// Fixed training dataset for the hydration decision model
pub const TRAINING_DATA: [TrainingRow; 100] = [
    // Light intensity, low adherence
    TrainingRow::new(24, Light, 60, Low),
    TrainingRow::new(27, Light, 60, Low),
    TrainingRow::new(30, Light, 60, Low),
    TrainingRow::new(33, Light, 60, Low),
    TrainingRow::new(36, Light, 60, Low),
    TrainingRow::new(39, Light, 60, Low),
    TrainingRow::new(42, Light, 60, Low),
    TrainingRow::new(45, Light, 60, Low),
    TrainingRow::new(48, Light, 60, Low),
    TrainingRow::new(51, Light, 60, Low),
    TrainingRow::new(54, Light, 60, Low),
    // Moderate intensity, low adherence
    TrainingRow::new(22, Moderate, 45, Low),
    TrainingRow::new(26, Moderate, 45, Low),
    TrainingRow::new(29, Moderate, 45, Low),
    TrainingRow::new(32, Moderate, 45, Low),
    TrainingRow::new(35, Moderate, 45, Low),
    TrainingRow::new(38, Moderate, 45, Low),
    TrainingRow::new(41, Moderate, 45, Low),
    TrainingRow::new(44, Moderate, 45, Low),
    TrainingRow::new(47, Moderate, 45, Low),
    TrainingRow::new(50, Moderate, 45, Low),
    TrainingRow::new(53, Moderate, 45, Low),
    // Intense intensity, low adherence
    TrainingRow::new(23, Intense, 30, Low),
    TrainingRow::new(25, Intense, 30, Low),
    TrainingRow::new(28, Intense, 30, Low),
    TrainingRow::new(31, Intense, 30, Low),
    TrainingRow::new(34, Intense, 30, Low),
    TrainingRow::new(37, Intense, 30, Low),
    TrainingRow::new(40, Intense, 30, Low),
    TrainingRow::new(43, Intense, 30, Low),
    TrainingRow::new(46, Intense, 30, Low),
    TrainingRow::new(49, Intense, 30, Low),
    TrainingRow::new(52, Intense, 30, Low),
    // Light intensity, medium adherence
    TrainingRow::new(62, Light, 60, Medium),
    TrainingRow::new(65, Light, 60, Medium),
    TrainingRow::new(68, Light, 60, Medium),
    TrainingRow::new(71, Light, 60, Medium),
    TrainingRow::new(74, Light, 60, Medium),
    TrainingRow::new(77, Light, 60, Medium),
    TrainingRow::new(80, Light, 60, Medium),
    TrainingRow::new(83, Light, 60, Medium),
    TrainingRow::new(86, Light, 60, Medium),
    TrainingRow::new(89, Light, 60, Medium),
    TrainingRow::new(92, Light, 60, Medium),
    // Moderate intensity, medium adherence
    TrainingRow::new(61, Moderate, 45, Medium),
    TrainingRow::new(64, Moderate, 45, Medium),
    TrainingRow::new(67, Moderate, 45, Medium),
    TrainingRow::new(70, Moderate, 45, Medium),
    TrainingRow::new(73, Moderate, 45, Medium),
    TrainingRow::new(76, Moderate, 45, Medium),
    TrainingRow::new(79, Moderate, 45, Medium),
    TrainingRow::new(82, Moderate, 45, Medium),
    TrainingRow::new(85, Moderate, 45, Medium),
    TrainingRow::new(88, Moderate, 45, Medium),
    TrainingRow::new(91, Moderate, 45, Medium),
    // Intense intensity, medium adherence
    TrainingRow::new(63, Intense, 30, Medium),
    TrainingRow::new(66, Intense, 30, Medium),
    TrainingRow::new(69, Intense, 30, Medium),
    TrainingRow::new(72, Intense, 30, Medium),
    TrainingRow::new(75, Intense, 30, Medium),
    TrainingRow::new(78, Intense, 30, Medium),
    TrainingRow::new(81, Intense, 30, Medium),
    TrainingRow::new(84, Intense, 30, Medium),
    TrainingRow::new(87, Intense, 30, Medium),
    TrainingRow::new(90, Intense, 30, Medium),
    TrainingRow::new(93, Intense, 30, Medium),
    // Light intensity, high adherence
    TrainingRow::new(102, Light, 75, High),
    TrainingRow::new(105, Light, 75, High),
    TrainingRow::new(108, Light, 75, High),
    TrainingRow::new(111, Light, 75, High),
    TrainingRow::new(114, Light, 75, High),
    TrainingRow::new(117, Light, 75, High),
    TrainingRow::new(120, Light, 75, High),
    TrainingRow::new(123, Light, 75, High),
    TrainingRow::new(126, Light, 75, High),
    TrainingRow::new(129, Light, 75, High),
    TrainingRow::new(132, Light, 75, High),
    TrainingRow::new(135, Light, 75, High),
    // Moderate intensity, high adherence
    TrainingRow::new(101, Moderate, 60, High),
    TrainingRow::new(104, Moderate, 60, High),
    TrainingRow::new(107, Moderate, 60, High),
    TrainingRow::new(110, Moderate, 60, High),
    TrainingRow::new(113, Moderate, 60, High),
    TrainingRow::new(116, Moderate, 60, High),
    TrainingRow::new(119, Moderate, 60, High),
    TrainingRow::new(122, Moderate, 60, High),
    TrainingRow::new(125, Moderate, 60, High),
    TrainingRow::new(128, Moderate, 60, High),
    TrainingRow::new(131, Moderate, 60, High),
    // Intense intensity, high adherence
    TrainingRow::new(103, Intense, 45, High),
    TrainingRow::new(106, Intense, 45, High),
    TrainingRow::new(109, Intense, 45, High),
    TrainingRow::new(112, Intense, 45, High),
    TrainingRow::new(115, Intense, 45, High),
    TrainingRow::new(118, Intense, 45, High),
    TrainingRow::new(121, Intense, 45, High),
    TrainingRow::new(124, Intense, 45, High),
    TrainingRow::new(127, Intense, 45, High),
    TrainingRow::new(130, Intense, 45, High),
    TrainingRow::new(133, Intense, 45, High),
];

#[cfg(test)]
mod tests {
    use super::super::{AdherenceBucket, TipCategory, WorkoutIntensity};
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_dataset_has_one_hundred_rows() {
        assert_eq!(TRAINING_DATA.len(), 100);
    }

    #[test]
    fn test_dataset_covers_every_cell() {
        for intensity in WorkoutIntensity::ALL {
            for bucket in AdherenceBucket::ALL {
                let count = TRAINING_DATA
                    .iter()
                    .filter(|row| {
                        row.intensity == intensity
                            && AdherenceBucket::from_percent(Decimal::from(row.adherence_percent))
                                == bucket
                    })
                    .count();
                assert!(count >= 11, "cell {:?}/{:?} has {} rows", intensity, bucket, count);
            }
        }
    }

    #[test]
    fn test_tip_categories_match_adherence_buckets() {
        for row in &TRAINING_DATA {
            let bucket = AdherenceBucket::from_percent(Decimal::from(row.adherence_percent));
            let expected = match bucket {
                AdherenceBucket::Low => TipCategory::Low,
                AdherenceBucket::Medium => TipCategory::Medium,
                AdherenceBucket::High => TipCategory::High,
            };
            assert_eq!(row.tip, expected);
        }
    }

    #[test]
    fn test_intervals_are_constant_within_cells() {
        for row in &TRAINING_DATA {
            let bucket = AdherenceBucket::from_percent(Decimal::from(row.adherence_percent));
            let expected = match (row.intensity, bucket) {
                (WorkoutIntensity::Light, AdherenceBucket::High) => 75,
                (WorkoutIntensity::Light, _) => 60,
                (WorkoutIntensity::Moderate, AdherenceBucket::High) => 60,
                (WorkoutIntensity::Moderate, _) => 45,
                (WorkoutIntensity::Intense, AdherenceBucket::High) => 45,
                (WorkoutIntensity::Intense, _) => 30,
            };
            assert_eq!(row.interval_minutes, expected);
        }
    }
}
