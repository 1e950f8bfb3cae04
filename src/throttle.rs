//! # Throttles
//!
//! Time-window keyed rate classification. A [`Throttles`] table maps a value
//! (typically the time of day as `hhmm`) to the [`Rate`] that applies at that
//! moment. The table is read-only once built and can be shared across actors.
//!
//! Lookups are first-match by declaration order. Span bounds are inclusive on
//! both ends, so adjoining spans that share a boundary value resolve to the
//! span declared first.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{ActorError, Result};

/// Ordinal throughput classification
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum Rate {
    #[default]
    Zero,
    Low,
    Mid,
    High,
}

impl Rate {
    pub fn all() -> [Rate; 4] {
        [Rate::Zero, Rate::Low, Rate::Mid, Rate::High]
    }

    /// Whether any work should run at this rate
    pub fn allows_work(&self) -> bool {
        *self != Rate::Zero
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Rate::Zero => "zero",
            Rate::Low => "low",
            Rate::Mid => "mid",
            Rate::High => "high",
        };
        write!(f, "{name}")
    }
}

impl FromStr for Rate {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "zero" => Ok(Rate::Zero),
            "low" => Ok(Rate::Low),
            "mid" => Ok(Rate::Mid),
            "high" => Ok(Rate::High),
            _ => Err(format!("Unknown rate: {s}")),
        }
    }
}

/// Named inclusive range `start..=finish`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub name: String,
    pub start: u32,
    pub finish: u32,
}

impl Span {
    pub fn new(name: impl Into<String>, start: u32, finish: u32) -> Self {
        Self {
            name: name.into(),
            start,
            finish,
        }
    }

    pub fn is_within(&self, value: u32) -> bool {
        self.start <= value && value <= self.finish
    }
}

/// Rate that applies over a span
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Throttle {
    pub name: String,
    pub span: Span,
    pub rate: Rate,
    /// Free-form settings interpreted by whoever consumes the rate
    #[serde(default)]
    pub settings: HashMap<String, String>,
}

impl Throttle {
    pub fn new(name: impl Into<String>, span: Span, rate: Rate) -> Self {
        Self {
            name: name.into(),
            span,
            rate,
            settings: HashMap::new(),
        }
    }

    pub fn with_setting(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.settings.insert(key.into(), value.into());
        self
    }
}

/// Ordered, immutable collection of throttles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Throttles {
    items: Vec<Throttle>,
}

impl Throttles {
    pub fn new(items: Vec<Throttle>) -> Self {
        Self { items }
    }

    /// First throttle with the given name
    pub fn named(&self, name: &str) -> Option<&Throttle> {
        self.items.iter().find(|throttle| throttle.name == name)
    }

    /// First throttle whose span contains `value`
    pub fn current(&self, value: u32) -> Option<&Throttle> {
        self.items.iter().find(|throttle| throttle.span.is_within(value))
    }

    /// Lookup by time of day, encoded as `hhmm`
    pub fn current_at(&self, time: NaiveTime) -> Option<&Throttle> {
        self.current(time.hour() * 100 + time.minute())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Throttle> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Reject spans whose start lies after their finish
    pub fn validate(&self) -> Result<()> {
        for throttle in &self.items {
            if throttle.span.start > throttle.span.finish {
                return Err(ActorError::Validation(format!(
                    "throttle '{}' span '{}' starts after it finishes ({} > {})",
                    throttle.name, throttle.span.name, throttle.span.start, throttle.span.finish
                )));
            }
        }
        Ok(())
    }

    /// Reference daily table keyed by `hhmm`
    ///
    /// | span      | from | to   | rate |
    /// |-----------|------|------|------|
    /// | overnight | 0    | 700  | High |
    /// | morning   | 700  | 830  | Low  |
    /// | commute   | 830  | 1000 | Zero |
    /// | midday    | 1000 | 1200 | Mid  |
    /// | lunch     | 1200 | 1400 | Zero |
    /// | afternoon | 1400 | 1700 | Mid  |
    /// | evening   | 1700 | 2000 | Zero |
    /// | night     | 2000 | 2359 | High |
    pub fn default_daily() -> Self {
        let table = [
            ("overnight", 0, 700, Rate::High),
            ("morning", 700, 830, Rate::Low),
            ("commute", 830, 1000, Rate::Zero),
            ("midday", 1000, 1200, Rate::Mid),
            ("lunch", 1200, 1400, Rate::Zero),
            ("afternoon", 1400, 1700, Rate::Mid),
            ("evening", 1700, 2000, Rate::Zero),
            ("night", 2000, 2359, Rate::High),
        ];

        Self::new(
            table
                .into_iter()
                .map(|(name, start, finish, rate)| {
                    Throttle::new(name, Span::new(name, start, finish), rate)
                })
                .collect(),
        )
    }
}

impl Default for Throttles {
    fn default() -> Self {
        Self::default_daily()
    }
}

impl From<Vec<Throttle>> for Throttles {
    fn from(items: Vec<Throttle>) -> Self {
        Self::new(items)
    }
}
