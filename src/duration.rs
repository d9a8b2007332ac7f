//! `xsd:duration` values rendered as English phrases.
//!
//! `P1Y2M3DT5H20M30S` becomes
//! "1 year(s), 2 month(s), 3 day(s), 5 hour(s), 20 minute(s) and 30 second(s)";
//! zero components are left out.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::sentences::join_list;

static DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(-)?P(?:(\d+(?:\.\d+)?)Y)?(?:(\d+(?:\.\d+)?)M)?(?:(\d+(?:\.\d+)?)W)?(?:(\d+(?:\.\d+)?)D)?(?:T(?:(\d+(?:\.\d+)?)H)?(?:(\d+(?:\.\d+)?)M)?(?:(\d+(?:\.\d+)?)S)?)?$",
    )
    .expect("duration regex is valid")
});

/// Components of a parsed duration.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct XsdDuration {
    pub negative: bool,
    pub years: f64,
    pub months: f64,
    pub weeks: f64,
    pub days: f64,
    pub hours: f64,
    pub minutes: f64,
    pub seconds: f64,
}

impl XsdDuration {
    /// Parse the lexical form. Returns `None` for anything that is not a
    /// valid duration, including the bare `P` and a trailing `T`.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.ends_with('T') || value.ends_with('P') {
            return None;
        }
        let caps = DURATION.captures(value)?;
        let part = |i: usize| -> Option<f64> {
            match caps.get(i) {
                Some(m) => m.as_str().parse().ok(),
                None => Some(0.0),
            }
        };
        Some(Self {
            negative: caps.get(1).is_some(),
            years: part(2)?,
            months: part(3)?,
            weeks: part(4)?,
            days: part(5)?,
            hours: part(6)?,
            minutes: part(7)?,
            seconds: part(8)?,
        })
    }

    fn components(&self) -> [(f64, &'static str); 7] {
        [
            (self.years, "year(s)"),
            (self.months, "month(s)"),
            (self.weeks, "week(s)"),
            (self.days, "day(s)"),
            (self.hours, "hour(s)"),
            (self.minutes, "minute(s)"),
            (self.seconds, "second(s)"),
        ]
    }
}

impl fmt::Display for XsdDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .components()
            .into_iter()
            .filter(|(magnitude, _)| *magnitude != 0.0)
            .map(|(magnitude, unit)| format!("{magnitude} {unit}"))
            .collect();
        if self.negative {
            f.write_str("minus ")?;
        }
        if parts.is_empty() {
            return f.write_str("0 second(s)");
        }
        f.write_str(&join_list(&parts, "and"))
    }
}

/// Render a duration literal, or `None` if it does not parse.
pub fn humanize(value: &str) -> Option<String> {
    XsdDuration::parse(value).map(|d| d.to_string())
}
