use csv::Writer;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::models::WorkoutPlan;

/// Export format types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn from_str(s: &str) -> Result<Self, ExportError> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            _ => Err(ExportError::UnsupportedFormat(s.to_string())),
        }
    }

    /// File extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }
}

/// Export errors
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Render a plan as pretty-printed JSON
pub fn plan_to_json(plan: &WorkoutPlan) -> Result<String, ExportError> {
    serde_json::to_string_pretty(plan).map_err(|e| ExportError::Serialization(e.to_string()))
}

/// Render a plan's weekly schedule as CSV, one row per exercise
pub fn plan_to_csv(plan: &WorkoutPlan) -> Result<String, ExportError> {
    let mut writer = Writer::from_writer(vec![]);

    writer.write_record([
        "day",
        "day_name",
        "focus",
        "duration_minutes",
        "exercise",
        "sets",
        "reps",
        "rest",
        "notes",
    ])?;

    for day in &plan.weekly_schedule {
        for exercise in &day.exercises {
            writer.write_record([
                day.day_number.to_string(),
                day.day_name.clone(),
                day.focus.clone(),
                day.duration.to_string(),
                exercise.name.clone(),
                exercise.sets.clone(),
                exercise.reps.clone(),
                exercise.rest.clone(),
                exercise.notes.clone(),
            ])?;
        }
    }

    writer.flush()?;
    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Io(e.into_error()))?;

    String::from_utf8(bytes).map_err(|e| ExportError::Serialization(e.to_string()))
}

/// Render a plan in the requested format
pub fn export_plan(plan: &WorkoutPlan, format: ExportFormat) -> Result<String, ExportError> {
    match format {
        ExportFormat::Json => plan_to_json(plan),
        ExportFormat::Csv => plan_to_csv(plan),
    }
}

/// Write a plan to a file in the requested format
pub fn export_plan_to_file<P: AsRef<Path>>(
    plan: &WorkoutPlan,
    format: ExportFormat,
    output_path: P,
) -> Result<(), ExportError> {
    let contents = export_plan(plan, format)?;
    std::fs::write(output_path, contents)?;

    Ok(())
}
