use std::time::Duration;
use thiserror::Error;

// -------------- Form defaults --------------
pub const DEFAULT_DURATION_MIN: &str = "60";
pub const DEFAULT_INTERVAL_SEC: &str = "10";
pub const DEFAULT_MICKEYS: &str = "1";

/// Intervals entered below this are raised to it.
pub const MIN_INTERVAL_SECS: f64 = 5.0;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is not a number")]
    Parse { field: &'static str },
    #[error("{field} is out of range")]
    OutOfRange { field: &'static str },
}

impl ValidationError {
    /// What the status label shows for any rejected input.
    pub const USER_MESSAGE: &'static str = "Enter valid positive numbers.";
}

/// Settings for a single run, fixed once the run starts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunConfig {
    pub duration: Duration,
    pub interval: Duration,
    pub mickeys: i32,
}

impl RunConfig {
    /// Builds a config from the raw form text.
    ///
    /// All three fields are parsed first. The interval is then raised to
    /// [`MIN_INTERVAL_SECS`] and the field text rewritten to match, even when
    /// the duration or magnitude is rejected afterwards.
    pub fn from_inputs(
        duration_min: &str,
        interval_sec: &mut String,
        mickeys: &str,
    ) -> Result<Self, ValidationError> {
        let minutes = parse_real(duration_min, "duration")?;
        let mut interval = parse_real(interval_sec, "interval")?;
        let mickeys: i32 = mickeys
            .trim()
            .parse()
            .map_err(|_| ValidationError::Parse { field: "mickeys" })?;

        if interval < MIN_INTERVAL_SECS {
            interval = MIN_INTERVAL_SECS;
            *interval_sec = format!("{MIN_INTERVAL_SECS}");
        }

        // NaN fails the comparison too
        if !(minutes > 0.0) {
            return Err(ValidationError::OutOfRange { field: "duration" });
        }
        if mickeys == 0 {
            return Err(ValidationError::OutOfRange { field: "mickeys" });
        }

        let duration = Duration::try_from_secs_f64(minutes * 60.0)
            .map_err(|_| ValidationError::OutOfRange { field: "duration" })?;
        let interval = Duration::try_from_secs_f64(interval)
            .map_err(|_| ValidationError::OutOfRange { field: "interval" })?;

        Ok(Self { duration, interval, mickeys })
    }
}

fn parse_real(text: &str, field: &'static str) -> Result<f64, ValidationError> {
    text.trim().parse().map_err(|_| ValidationError::Parse { field })
}
