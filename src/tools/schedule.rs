//! Weekly study schedule generation

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{parse_args, to_output, Tool, ToolError};

const DEFAULT_SUBJECTS: &[&str] = &["General Review"];
const DEFAULT_DAYS: &[Weekday] = &[
    Weekday::Monday,
    Weekday::Tuesday,
    Weekday::Wednesday,
    Weekday::Thursday,
    Weekday::Friday,
];
const TECHNIQUES: &[&str] = &["Pomodoro", "Active Recall", "Spaced Repetition"];

const DEFAULT_DAILY_MINUTES: f64 = 60.0;
const MIN_DAILY_MINUTES: f64 = 15.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScheduleInput {
    #[serde(default)]
    subjects: Vec<String>,
    #[serde(default)]
    available_days: Vec<Weekday>,
    #[serde(default)]
    daily_study_time: Option<f64>,
    #[serde(default)]
    exam_date: Option<String>,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
struct ScheduleEntry {
    day: Weekday,
    subject: String,
    duration: f64,
    technique: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScheduleOutput {
    schedule: Vec<ScheduleEntry>,
    total_weekly_hours: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    days_until_exam: Option<i64>,
}

/// Creates a weekly study schedule from subjects and available days
///
/// Missing or empty inputs are replaced with defaults so the tool always
/// returns a schedule. Subjects and techniques rotate across the days.
#[derive(Debug, Clone, Copy, Default)]
pub struct StudyScheduleTool;

impl Tool for StudyScheduleTool {
    fn name(&self) -> &'static str {
        "create-study-schedule"
    }

    fn description(&self) -> &'static str {
        "Create a weekly study schedule based on subjects and available time"
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "subjects": {"type": "array", "items": {"type": "string"}},
                "availableDays": {
                    "type": "array",
                    "items": {
                        "type": "string",
                        "enum": ["monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday"]
                    }
                },
                "dailyStudyTime": {"type": "number", "minimum": 15, "description": "Available study time per day in minutes"},
                "examDate": {"type": "string", "description": "Optional exam date for countdown planning"}
            }
        })
    }

    fn call(&self, args: Value) -> Result<Value, ToolError> {
        let input: ScheduleInput = parse_args(self.name(), args)?;
        to_output(&build_schedule(input, Utc::now().date_naive()))
    }
}

fn build_schedule(input: ScheduleInput, today: NaiveDate) -> ScheduleOutput {
    let mut subjects: Vec<String> = input
        .subjects
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    if subjects.is_empty() {
        subjects = DEFAULT_SUBJECTS.iter().map(|s| s.to_string()).collect();
    }

    let days = if input.available_days.is_empty() {
        DEFAULT_DAYS.to_vec()
    } else {
        input.available_days
    };

    let minutes = input
        .daily_study_time
        .unwrap_or(DEFAULT_DAILY_MINUTES)
        .max(MIN_DAILY_MINUTES);

    let schedule = days
        .iter()
        .enumerate()
        .map(|(i, day)| ScheduleEntry {
            day: *day,
            subject: subjects[i % subjects.len()].clone(),
            duration: minutes,
            technique: TECHNIQUES[i % TECHNIQUES.len()],
        })
        .collect::<Vec<_>>();

    let total_weekly_hours = (days.len() as f64 * minutes / 60.0 * 10.0).round() / 10.0;

    let days_until_exam = input
        .exam_date
        .as_deref()
        .and_then(parse_exam_date)
        .map(|exam| (exam - today).num_days());

    ScheduleOutput {
        schedule,
        total_weekly_hours,
        days_until_exam,
    }
}

fn parse_exam_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}
