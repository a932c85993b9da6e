//! Row-oriented query results: scalar cell values, ordered rows, and the
//! total numeric coercion used when a column is bound to the y axis.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A single cell value. Query results carry strings, numbers, or nulls;
/// anything else is outside the contract of the backend collaborators.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Null,
    Num(f64),
    Str(String),
}

impl Scalar {
    /// Best-effort conversion to a number. Total: never errors.
    ///
    /// Strings parse their longest leading numeric prefix (optional leading
    /// whitespace, sign, decimal digits, fraction, exponent); a string with
    /// no such prefix, a null, and a non-finite number all coerce to 0.0.
    /// Lossy by policy: the chart pipeline treats non-numeric y values as 0
    /// rather than surfacing an error.
    pub fn to_number(&self) -> f64 {
        match self {
            Scalar::Null => 0.0,
            Scalar::Num(n) if n.is_finite() => *n,
            Scalar::Num(_) => 0.0,
            Scalar::Str(s) => parse_number_prefix(s).unwrap_or(0.0),
        }
    }

    /// Canonical string form used for group-key equality: integral numbers
    /// render without a fractional part (`2`, not `2.0`) and null renders as
    /// `"null"`, mirroring string-keyed dictionary semantics.
    pub fn canonical_key(&self) -> String {
        match self {
            Scalar::Null => "null".to_string(),
            Scalar::Num(n) => format_plain_number(*n),
            Scalar::Str(s) => s.clone(),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Str(s.to_string())
    }
}

impl From<f64> for Scalar {
    fn from(n: f64) -> Self {
        Scalar::Num(n)
    }
}

/// Format a number without a trailing `.0` when it is integral.
pub(crate) fn format_plain_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// Parse the longest leading float prefix of `s` after leading whitespace.
/// Returns None when no prefix forms a number.
fn parse_number_prefix(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }
    let mut has_digits = false;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
        has_digits = true;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
            has_digits = true;
        }
    }
    if !has_digits {
        return None;
    }
    // Exponent only counts if at least one digit follows it.
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > digits_start {
            end = exp_end;
        }
    }
    s[..end].parse().ok()
}

/// An ordered mapping from column name to [`Scalar`]. Insertion order is
/// preserved; setting an existing column replaces its value in place.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Row {
    fields: Vec<(String, Scalar)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, column: &str) -> Option<&Scalar> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Value of `column`, with absent columns reading as [`Scalar::Null`].
    /// Rows after the first may legitimately lack columns of the schema.
    pub fn value(&self, column: &str) -> Scalar {
        self.get(column).cloned().unwrap_or(Scalar::Null)
    }

    /// Set `column` to `value`, replacing in place if the column exists.
    pub fn set(&mut self, column: impl Into<String>, value: Scalar) {
        let column = column.into();
        match self.fields.iter_mut().find(|(name, _)| *name == column) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((column, value)),
        }
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Scalar)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl<S: Into<String>> FromIterator<(S, Scalar)> for Row {
    fn from_iter<I: IntoIterator<Item = (S, Scalar)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (column, value) in iter {
            row.set(column, value);
        }
        row
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Row {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RowVisitor;

        impl<'de> Visitor<'de> for RowVisitor {
            type Value = Row;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of column names to scalar values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Row, A::Error> {
                let mut row = Row::new();
                while let Some((column, value)) = access.next_entry::<String, Scalar>()? {
                    row.set(column, value);
                }
                Ok(row)
            }
        }

        deserializer.deserialize_map(RowVisitor)
    }
}

/// An ordered sequence of rows sharing row 0's key set as schema.
pub type ResultSet = Vec<Row>;

/// Ordered column names of the first row; empty for an empty result set.
/// Absence of data is a valid empty result, not a failure.
pub fn columns(rows: &[Row]) -> Vec<String> {
    rows.first()
        .map(|row| row.columns().map(String::from).collect())
        .unwrap_or_default()
}
