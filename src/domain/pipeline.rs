//! Pipeline declarations registered with the scheduler.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::domain::AppError;

/// Units of work this binary knows how to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowKind {
    /// Extract, transform and load the illustrative metrics table.
    ExamplePipeline,
    /// Print environment, host and runtime diagnostics.
    Healthcheck,
}

impl FlowKind {
    pub const ALL: [FlowKind; 2] = [FlowKind::ExamplePipeline, FlowKind::Healthcheck];

    /// Flow name as registered with the scheduler and accepted on the command line.
    pub fn name(self) -> &'static str {
        match self {
            FlowKind::ExamplePipeline => "example-pipeline",
            FlowKind::Healthcheck => "healthcheck",
        }
    }

    pub fn from_name(name: &str) -> Result<Self, AppError> {
        Self::ALL.into_iter().find(|flow| flow.name() == name).ok_or_else(|| {
            AppError::UnknownFlow {
                name: name.to_string(),
                available: Self::ALL.map(FlowKind::name).join(", "),
            }
        })
    }
}

impl fmt::Display for FlowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

const CRON_MACROS: &[&str] =
    &["@yearly", "@annually", "@monthly", "@weekly", "@daily", "@midnight", "@hourly"];

const MONTH_NAMES: &[&str] =
    &["JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC"];
const WEEKDAY_NAMES: &[&str] = &["SUN", "MON", "TUE", "WED", "THU", "FRI", "SAT"];

/// Bounds of one cron field. Names map to `min + index`.
struct CronField {
    label: &'static str,
    min: u32,
    max: u32,
    names: &'static [&'static str],
}

const CRON_FIELDS: [CronField; 5] = [
    CronField { label: "minute", min: 0, max: 59, names: &[] },
    CronField { label: "hour", min: 0, max: 23, names: &[] },
    CronField { label: "day-of-month", min: 1, max: 31, names: &[] },
    CronField { label: "month", min: 1, max: 12, names: MONTH_NAMES },
    // 7 is accepted as Sunday
    CronField { label: "day-of-week", min: 0, max: 7, names: WEEKDAY_NAMES },
];

impl CronField {
    /// Check a comma-separated list of `*`, values, ranges and `/step` suffixes.
    fn check(&self, field: &str) -> Result<(), String> {
        for item in field.split(',') {
            let (range, step) = match item.split_once('/') {
                Some((range, step)) => (range, Some(step)),
                None => (item, None),
            };

            if let Some(step) = step {
                match step.parse::<u32>() {
                    Ok(n) if n > 0 => {}
                    _ => return Err(format!("{} step '{}' must be a positive number", self.label, step)),
                }
            }

            if range == "*" {
                continue;
            }
            let (start, end) = match range.split_once('-') {
                Some((start, end)) => (self.value(start)?, self.value(end)?),
                None => {
                    let value = self.value(range)?;
                    (value, value)
                }
            };
            if start > end {
                return Err(format!("{} range '{}' runs backwards", self.label, range));
            }
        }
        Ok(())
    }

    fn value(&self, token: &str) -> Result<u32, String> {
        if let Ok(n) = token.parse::<u32>() {
            if n < self.min || n > self.max {
                return Err(format!(
                    "{} value {} out of range {}-{}",
                    self.label, n, self.min, self.max
                ));
            }
            return Ok(n);
        }
        self.names
            .iter()
            .position(|name| name.eq_ignore_ascii_case(token))
            .map(|index| self.min + index as u32)
            .ok_or_else(|| format!("invalid {} value '{}'", self.label, token))
    }
}

/// A five-field cron expression (`minute hour day-of-month month day-of-week`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CronSchedule(String);

impl CronSchedule {
    pub fn new(expression: &str) -> Result<Self, AppError> {
        let expression = expression.trim();
        let invalid = |reason: &str| AppError::InvalidCronSchedule {
            expression: expression.to_string(),
            reason: reason.to_string(),
        };

        if expression.starts_with('@') {
            return if CRON_MACROS.contains(&expression) {
                Ok(Self(expression.to_string()))
            } else {
                Err(invalid("unknown macro"))
            };
        }

        let fields: Vec<&str> = expression.split_whitespace().collect();
        if fields.len() != CRON_FIELDS.len() {
            return Err(invalid(&format!("expected 5 fields, found {}", fields.len())));
        }

        for (field, bounds) in fields.iter().zip(CRON_FIELDS.iter()) {
            bounds.check(field).map_err(|reason| invalid(&reason))?;
        }

        Ok(Self(fields.join(" ")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CronSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for CronSchedule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for CronSchedule {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        CronSchedule::new(&s).map_err(serde::de::Error::custom)
    }
}

/// A pipeline declared for deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineDeclaration {
    pub flow: FlowKind,
    pub display_name: String,
    pub schedule: CronSchedule,
}

/// Pipelines registered by `flowdeploy deploy`.
///
/// Add new flows here together with their display name and cron schedule.
pub fn declared_pipelines() -> Result<Vec<PipelineDeclaration>, AppError> {
    Ok(vec![PipelineDeclaration {
        flow: FlowKind::ExamplePipeline,
        display_name: "Parsons Data Pipeline Example".to_string(),
        // Daily at midnight
        schedule: CronSchedule::new("0 0 * * *")?,
    }])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flow_names_round_trip() {
        for flow in FlowKind::ALL {
            assert_eq!(FlowKind::from_name(flow.name()).unwrap(), flow);
        }
    }

    #[test]
    fn unknown_flow_lists_available_names() {
        let err = FlowKind::from_name("nope").unwrap_err();
        assert!(err.to_string().contains("example-pipeline, healthcheck"));
    }

    #[test]
    fn cron_accepts_five_fields() {
        let cron = CronSchedule::new("0 12 * * 1-5").unwrap();
        assert_eq!(cron.as_str(), "0 12 * * 1-5");
    }

    #[test]
    fn cron_normalizes_whitespace() {
        let cron = CronSchedule::new("  0   0 * *  * ").unwrap();
        assert_eq!(cron.as_str(), "0 0 * * *");
    }

    #[test]
    fn cron_accepts_known_macro() {
        assert!(CronSchedule::new("@daily").is_ok());
        assert!(CronSchedule::new("@sometimes").is_err());
    }

    #[test]
    fn cron_rejects_wrong_field_count() {
        assert!(matches!(
            CronSchedule::new("0 0 * *"),
            Err(AppError::InvalidCronSchedule { .. })
        ));
    }

    #[test]
    fn cron_rejects_unexpected_characters() {
        assert!(CronSchedule::new("0 0 * * $").is_err());
    }

    #[test]
    fn cron_rejects_out_of_range_values() {
        for expression in ["99 99 99 99 99", "60 0 * * *", "0 24 * * *", "0 0 0 * *", "0 0 * 13 *", "0 0 * * 8"]
        {
            let err = CronSchedule::new(expression).unwrap_err();
            assert!(err.to_string().contains("out of range"), "{}: {}", expression, err);
        }
    }

    #[test]
    fn cron_rejects_words_that_are_not_field_names() {
        assert!(CronSchedule::new("a b c d e").is_err());
        assert!(CronSchedule::new("0 0 * MON *").is_err());
        assert!(CronSchedule::new("0 0 * * JAN").is_err());
    }

    #[test]
    fn cron_rejects_bad_steps_and_ranges() {
        assert!(CronSchedule::new("*/0 * * * *").is_err());
        assert!(CronSchedule::new("*/x * * * *").is_err());
        assert!(CronSchedule::new("0 17-9 * * *").is_err());
        assert!(CronSchedule::new("0,,30 * * * *").is_err());
    }

    #[test]
    fn cron_accepts_names_lists_and_steps() {
        for expression in
            ["0 0 * JAN MON", "0 9 1 jan-mar mon-fri", "*/15 0,12 1-31/2 * 7", "59 23 31 12 0-6"]
        {
            assert!(CronSchedule::new(expression).is_ok(), "{}", expression);
        }
    }

    #[test]
    fn declared_pipelines_include_example() {
        let declared = declared_pipelines().unwrap();
        assert_eq!(declared.len(), 1);
        assert_eq!(declared[0].flow, FlowKind::ExamplePipeline);
        assert_eq!(declared[0].schedule.as_str(), "0 0 * * *");
    }
}
