use std::{
    fmt,
    hash::{Hash, Hasher},
};

use serde::{Deserialize, Serialize};

/// Literal written into categorical gaps.
pub const UNKNOWN_SENTINEL: &str = "Unknown";

/// Tokens read as the missing marker rather than as text.
const MISSING_TOKENS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "NULL", "null", "None", "#N/A", "<NA>",
    "#NA", "-1.#IND", "1.#QNAN",
];

/// A present cell value. Absent cells are modelled as `Option::<Value>::None`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
}

impl Value {
    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Integer(_) | Value::Float(_))
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            Value::String(_) => None,
        }
    }

    pub fn as_display(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            Value::Integer(i) => i.to_string(),
            Value::Float(f) => {
                if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                    (*f as i64).to_string()
                } else {
                    f.to_string()
                }
            }
        }
    }
}

// Floats compare by bit pattern so that equality agrees with `Hash`.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::String(s) => s.hash(state),
            Value::Integer(i) => i.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_display())
    }
}

pub fn is_missing_token(raw: &str) -> bool {
    MISSING_TOKENS.contains(&raw)
}

/// Parses one raw field into a cell. Numbers are recognised per cell; column
/// level consistency is restored afterwards by [`promote_mixed_numeric`].
pub fn parse_cell(raw: &str) -> Option<Value> {
    if is_missing_token(raw) {
        return None;
    }
    let trimmed = raw.trim();
    if let Ok(parsed) = trimmed.parse::<i64>() {
        return Some(Value::Integer(parsed));
    }
    if looks_like_float(trimmed)
        && let Ok(parsed) = trimmed.parse::<f64>()
        && parsed.is_finite()
    {
        return Some(Value::Float(parsed));
    }
    Some(Value::String(raw.to_string()))
}

// Rejects words like "inf" or "infinity" that `f64::from_str` accepts.
fn looks_like_float(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'))
        && value.chars().any(|c| c.is_ascii_digit())
}

/// Promotes integers to floats in a column that holds both, mirroring how a
/// typed column would be read.
pub fn promote_mixed_numeric(rows: &mut [Vec<Option<Value>>], column: usize) {
    let mut has_integer = false;
    let mut has_float = false;
    for cell in rows.iter().filter_map(|row| row.get(column)) {
        match cell {
            Some(Value::Integer(_)) => has_integer = true,
            Some(Value::Float(_)) => has_float = true,
            _ => {}
        }
    }
    if !(has_integer && has_float) {
        return;
    }
    for row in rows.iter_mut() {
        if let Some(cell) = row.get_mut(column)
            && let Some(Value::Integer(i)) = *cell
        {
            *cell = Some(Value::Float(i as f64));
        }
    }
}

pub fn display_cell(cell: &Option<Value>) -> String {
    cell.as_ref().map(Value::as_display).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_cell_recognises_missing_tokens() {
        assert_eq!(parse_cell(""), None);
        assert_eq!(parse_cell("NA"), None);
        assert_eq!(parse_cell("null"), None);
        assert_eq!(parse_cell("#N/A"), None);
        assert_eq!(
            parse_cell("Unknown"),
            Some(Value::String("Unknown".to_string()))
        );
    }

    #[test]
    fn parse_cell_types_numbers_and_text() {
        assert_eq!(parse_cell("42"), Some(Value::Integer(42)));
        assert_eq!(parse_cell("-3"), Some(Value::Integer(-3)));
        assert_eq!(parse_cell("2.5"), Some(Value::Float(2.5)));
        assert_eq!(parse_cell("1e3"), Some(Value::Float(1000.0)));
        assert_eq!(parse_cell("inf"), Some(Value::String("inf".to_string())));
        assert_eq!(parse_cell("NY"), Some(Value::String("NY".to_string())));
    }

    #[test]
    fn float_equality_matches_hash_semantics() {
        use std::collections::HashSet;
        let mut seen = HashSet::new();
        assert!(seen.insert(Value::Float(0.1 + 0.2)));
        assert!(!seen.insert(Value::Float(0.1 + 0.2)));
        assert_ne!(Value::Integer(1), Value::Float(1.0));
    }

    #[test]
    fn promote_mixed_numeric_only_touches_mixed_columns() {
        let mut rows = vec![
            vec![Some(Value::Integer(1)), Some(Value::Integer(7))],
            vec![Some(Value::Float(1.5)), Some(Value::String("seven".to_string()))],
            vec![None, None],
        ];
        promote_mixed_numeric(&mut rows, 0);
        promote_mixed_numeric(&mut rows, 1);
        assert_eq!(rows[0][0], Some(Value::Float(1.0)));
        assert_eq!(rows[2][0], None);
        assert_eq!(rows[0][1], Some(Value::Integer(7)));
    }

    #[test]
    fn integral_floats_display_without_fraction() {
        assert_eq!(Value::Float(25.0).as_display(), "25");
        assert_eq!(Value::Float(27.5).as_display(), "27.5");
        assert_eq!(display_cell(&None), "");
    }
}
