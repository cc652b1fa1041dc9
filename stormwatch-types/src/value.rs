//! Raw Storm UI values and the sanitizer that turns them into gauge values.

use core::fmt;

use serde::{Deserialize, Deserializer};

/// Sentinel the Storm UI reports when a figure does not apply.
pub const NOT_APPLICABLE: &str = "N/A";

/// A metric field exactly as it appeared in a Storm UI document.
///
/// The UI is loose about types: counters arrive as integers, latencies and
/// capacities often as strings (`"0.123"`), and anything without data as
/// `"N/A"`. JSON `null` never reaches this type; it deserializes to `None`
/// on the surrounding `Option`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    /// A JSON integer.
    Int(i64),
    /// A JSON float, or an integer outside the `i64` range.
    Float(f64),
    /// A JSON boolean.
    Bool(bool),
    /// A JSON string.
    Text(String),
}

impl RawValue {
    /// Render the value as a label string.
    pub fn to_label(&self) -> String {
        match self {
            RawValue::Int(v) => v.to_string(),
            RawValue::Float(v) => v.to_string(),
            RawValue::Bool(v) => v.to_string(),
            RawValue::Text(v) => v.clone(),
        }
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        RawValue::Int(value)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Float(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

/// A numeric gauge value, keeping track of whether it was integral.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricValue {
    Int(i64),
    Float(f64),
}

impl MetricValue {
    /// The value published for absent or not-applicable fields.
    pub const ZERO: MetricValue = MetricValue::Int(0);

    /// Widen to `f64`.
    pub fn as_f64(self) -> f64 {
        match self {
            MetricValue::Int(v) => v as f64,
            MetricValue::Float(v) => v,
        }
    }
}

impl Default for MetricValue {
    fn default() -> Self {
        MetricValue::ZERO
    }
}

impl From<i64> for MetricValue {
    fn from(value: i64) -> Self {
        MetricValue::Int(value)
    }
}

impl From<f64> for MetricValue {
    fn from(value: f64) -> Self {
        MetricValue::Float(value)
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Int(v) => write!(f, "{}", v),
            MetricValue::Float(v) => write!(f, "{}", v),
        }
    }
}

/// Normalize a raw field into a publishable gauge value.
///
/// Absent fields and the `"N/A"` sentinel become `0`. Numbers pass through
/// unchanged with their integer/float kind preserved. Numeric strings are
/// parsed; any other string becomes `0`. Booleans map to `1`/`0`.
///
/// # Example
///
/// ```rust
/// use stormwatch_types::{sanitize, MetricValue, RawValue};
///
/// assert_eq!(sanitize(None), MetricValue::Int(0));
/// assert_eq!(sanitize(Some(&RawValue::from("N/A"))), MetricValue::Int(0));
/// assert_eq!(sanitize(Some(&RawValue::from(12.34))), MetricValue::Float(12.34));
/// ```
pub fn sanitize(raw: Option<&RawValue>) -> MetricValue {
    match raw {
        None => MetricValue::ZERO,
        Some(RawValue::Int(v)) => MetricValue::Int(*v),
        Some(RawValue::Float(v)) => MetricValue::Float(*v),
        Some(RawValue::Bool(v)) => MetricValue::Int(i64::from(*v)),
        Some(RawValue::Text(text)) => parse_text(text),
    }
}

fn parse_text(text: &str) -> MetricValue {
    let text = text.trim();
    if text == NOT_APPLICABLE {
        return MetricValue::ZERO;
    }
    if let Ok(v) = text.parse::<i64>() {
        return MetricValue::Int(v);
    }
    text.parse::<f64>()
        .map(MetricValue::Float)
        .unwrap_or(MetricValue::ZERO)
}

/// Deserialize an optional label that may arrive as a string or a number.
pub(crate) fn optional_label<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<RawValue>::deserialize(deserializer)?.map(|raw| raw.to_label()))
}

/// Deserialize a list that may be absent or `null`.
pub(crate) fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
