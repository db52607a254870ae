use crate::SweepError;

/// Knob values are stepped in integer micro-units so that accumulated
/// binary rounding never adds or drops a step.
const UNITS_PER_ONE: f64 = 1_000_000.0;

/// Largest accepted bound or increment; keeps every span inside `i64` units.
pub const MAX_KNOB_MAGNITUDE: f64 = 1e12;

/// Upper limit on values per batch.
pub const MAX_KNOB_STEPS: u64 = 100_000;

/// Knob names the remote APIs are known to accept.
pub const KNOWN_KNOBS: &[&str] = &["temperature", "top_p"];

/// Inclusive sweep range for a single numeric request parameter.
#[derive(Clone, Debug, PartialEq)]
pub struct KnobRange {
    pub name: String,
    pub min: f64,
    pub max: f64,
    pub increment: f64,
}

impl KnobRange {
    pub fn new(name: impl Into<String>, min: f64, max: f64, increment: f64) -> Self {
        Self {
            name: name.into(),
            min,
            max,
            increment,
        }
    }

    pub fn validate(&self) -> Result<(), SweepError> {
        if !(self.min.is_finite() && self.max.is_finite() && self.increment.is_finite()) {
            return Err(SweepError::config(format!(
                "knob '{}' bounds must be finite",
                self.name
            )));
        }
        if self.increment <= 0.0 || to_units(self.increment) == 0 {
            return Err(SweepError::config(format!(
                "knob '{}' increment must be positive, got {}",
                self.name, self.increment
            )));
        }
        for (field, value) in [
            ("min", self.min),
            ("max", self.max),
            ("increment", self.increment),
        ] {
            if value.abs() > MAX_KNOB_MAGNITUDE {
                return Err(SweepError::config(format!(
                    "knob '{}' {field} ({value}) is out of range (limit {MAX_KNOB_MAGNITUDE:e})",
                    self.name
                )));
            }
        }
        if self.min > self.max {
            return Err(SweepError::config(format!(
                "knob '{}' min ({}) exceeds max ({})",
                self.name, self.min, self.max
            )));
        }
        match step_count(
            to_units(self.min),
            to_units(self.max),
            to_units(self.increment),
        ) {
            Some(steps) if steps <= MAX_KNOB_STEPS => Ok(()),
            _ => Err(SweepError::config(format!(
                "knob '{}' range yields more than {MAX_KNOB_STEPS} values per batch",
                self.name
            ))),
        }
    }

    /// Values from `min` to `max` inclusive, in increasing order. A range
    /// that fails [`KnobRange::validate`] yields at most [`MAX_KNOB_STEPS`]
    /// values, or none when its span does not fit.
    pub fn schedule(&self) -> KnobSchedule {
        let min = to_units(self.min);
        let step = to_units(self.increment).max(1);
        let steps = step_count(min, to_units(self.max), step)
            .unwrap_or(0)
            .min(MAX_KNOB_STEPS);
        KnobSchedule {
            min,
            step,
            index: 0,
            steps,
        }
    }
}

fn to_units(value: f64) -> i64 {
    (value * UNITS_PER_ONE).round() as i64
}

/// `floor((max - min) / step) + 1`, or `None` if the span overflows.
fn step_count(min: i64, max: i64, step: i64) -> Option<u64> {
    if step <= 0 {
        return None;
    }
    let span = max.checked_sub(min)?;
    if span < 0 {
        return Some(0);
    }
    Some((span / step) as u64 + 1)
}

#[derive(Clone, Debug)]
pub struct KnobSchedule {
    min: i64,
    step: i64,
    index: u64,
    steps: u64,
}

impl KnobSchedule {
    pub fn is_empty(&self) -> bool {
        self.index >= self.steps
    }
}

impl Iterator for KnobSchedule {
    type Item = KnobValue;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.steps {
            return None;
        }
        let units = self
            .min
            .saturating_add(self.step.saturating_mul(self.index as i64));
        self.index += 1;
        Some(KnobValue(units as f64 / UNITS_PER_ONE))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.steps - self.index) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for KnobSchedule {}

/// A single sweep coordinate.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct KnobValue(pub f64);

impl KnobValue {
    pub fn get(self) -> f64 {
        self.0
    }

    /// The value as it travels on the wire: rounded to one decimal place.
    pub fn rounded(self) -> f64 {
        (self.0 * 10.0).round() / 10.0
    }
}

impl std::fmt::Display for KnobValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}", self.rounded())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_len_matches_floor_formula() {
        let range = KnobRange::new("top_p", 0.0, 0.8, 0.2);
        assert_eq!(range.schedule().len(), 5);

        let range = KnobRange::new("temperature", 0.1, 1.0, 0.3);
        assert_eq!(range.schedule().len(), 4);
    }

    #[test]
    fn single_point_range_yields_one_value() {
        let values: Vec<_> = KnobRange::new("temperature", 0.5, 0.5, 0.1)
            .schedule()
            .collect();
        assert_eq!(values, vec![KnobValue(0.5)]);
    }

    #[test]
    fn display_uses_one_decimal() {
        assert_eq!(KnobValue(1.0).to_string(), "1.0");
        assert_eq!(KnobValue(0.6000000000000001).to_string(), "0.6");
        assert_eq!(KnobValue(0.25).rounded(), 0.3);
        assert_eq!(KnobValue(0.25).to_string(), "0.3");
    }
}
