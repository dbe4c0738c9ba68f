//! Pulse: the normalized rate descriptor a plan is built from.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{PlanError, PlanResult};

/// How much work every worker takes on per tick, how often ticks recur,
/// and how long the planning window is.
///
/// Produced once by a rate calculator and consumed by the plan generator.
/// Two pulses with equal fields are interchangeable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pulse {
    /// Number of connections required for each worker per tick.
    pub volume: u32,
    /// Tick period: job runtime plus delay.
    #[serde(with = "crate::serde_secs")]
    pub frequency: Duration,
    /// Total window the plan covers.
    #[serde(with = "crate::serde_secs")]
    pub duration: Duration,
}

impl Pulse {
    pub fn new(volume: u32, frequency: Duration, duration: Duration) -> Self {
        Self {
            volume,
            frequency,
            duration,
        }
    }

    /// Shorthand for a pulse whose durations are whole seconds.
    pub fn from_secs(volume: u32, frequency_secs: u64, duration_secs: u64) -> Self {
        Self::new(
            volume,
            Duration::from_secs(frequency_secs),
            Duration::from_secs(duration_secs),
        )
    }

    /// Reject pulses the generator cannot walk.
    pub fn validate(&self) -> PlanResult<()> {
        if self.frequency.is_zero() {
            return Err(PlanError::invalid("pulse frequency must be positive"));
        }
        if self.volume == 0 {
            return Err(PlanError::invalid("pulse volume must be at least 1"));
        }
        Ok(())
    }

    /// Number of ticks in the window: `ceil(duration / frequency)`.
    ///
    /// Zero when the frequency is zero.
    pub fn ticks(&self) -> u64 {
        let step = self.frequency.as_nanos();
        if step == 0 {
            return 0;
        }
        let ticks = self.duration.as_nanos().div_ceil(step);
        u64::try_from(ticks).unwrap_or(u64::MAX)
    }

    /// Offset of the tick at `index`, or `None` past `Duration::MAX`.
    pub fn tick_offset(&self, index: u64) -> Option<Duration> {
        let nanos = self.frequency.as_nanos().checked_mul(u128::from(index))?;
        let secs = u64::try_from(nanos / 1_000_000_000).ok()?;
        let sub = (nanos % 1_000_000_000) as u32;
        Some(Duration::new(secs, sub))
    }

    /// Cells available across the whole window for `workers` workers.
    pub fn capacity(&self, workers: usize) -> u64 {
        self.ticks()
            .saturating_mul(workers as u64)
            .saturating_mul(u64::from(self.volume))
    }
}

impl fmt::Display for Pulse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "volume={} frequency={}s duration={}s",
            self.volume,
            self.frequency.as_secs(),
            self.duration.as_secs()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_round_up_partial_windows() {
        assert_eq!(Pulse::from_secs(1, 60, 60).ticks(), 1);
        assert_eq!(Pulse::from_secs(1, 60, 180).ticks(), 3);
        assert_eq!(Pulse::from_secs(1, 62, 500).ticks(), 9);
        assert_eq!(Pulse::from_secs(1, 60, 30).ticks(), 1);
    }

    #[test]
    fn ticks_zero_for_zero_frequency() {
        assert_eq!(Pulse::from_secs(1, 0, 60).ticks(), 0);
    }

    #[test]
    fn tick_offset_is_a_multiple_of_frequency() {
        let pulse = Pulse::from_secs(2, 60, 180);
        assert_eq!(pulse.tick_offset(0), Some(Duration::ZERO));
        assert_eq!(pulse.tick_offset(2), Some(Duration::from_secs(120)));
    }

    #[test]
    fn capacity_spans_ticks_workers_and_volume() {
        let pulse = Pulse::from_secs(2, 60, 180);
        assert_eq!(pulse.capacity(3), 18);
        assert_eq!(pulse.capacity(0), 0);
    }

    #[test]
    fn validate_rejects_zero_frequency_and_volume() {
        assert!(matches!(
            Pulse::from_secs(1, 0, 60).validate(),
            Err(PlanError::InvalidArgument(_))
        ));
        assert!(matches!(
            Pulse::from_secs(0, 60, 60).validate(),
            Err(PlanError::InvalidArgument(_))
        ));
        assert!(Pulse::from_secs(1, 60, 60).validate().is_ok());
    }

    #[test]
    fn serializes_durations_as_seconds() {
        let json = serde_json::to_string(&Pulse::from_secs(5, 60, 120)).unwrap();
        assert_eq!(json, r#"{"volume":5,"frequency":60,"duration":120}"#);
        let back: Pulse = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Pulse::from_secs(5, 60, 120));
    }
}
