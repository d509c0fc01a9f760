//! Attribute values with their runtime type preserved.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A netCDF attribute value.
///
/// The variant records the type the value had on disk. Validation rules
/// discriminate on it: a `Double` is not interchangeable with a `Float` or an
/// `Int`, matching the strict type checks applied to CMOR-written output.
/// Equality is exact on both variant and value, with no numeric coercion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttrValue {
    /// Textual attribute.
    Text(String),
    /// Double-precision floating point attribute.
    Double(f64),
    /// Single-precision floating point attribute.
    Float(f32),
    /// Integral attribute.
    Int(i64),
}

impl AttrValue {
    /// The text content, if this is a textual value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Python-style truthiness: empty text and zero numbers are false.
    pub fn truthy(&self) -> bool {
        match self {
            Self::Text(text) => !text.is_empty(),
            Self::Double(value) => *value != 0.0,
            Self::Float(value) => *value != 0.0,
            Self::Int(value) => *value != 0,
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Double(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Int(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<f32> for AttrValue {
    fn from(value: f32) -> Self {
        Self::Float(value)
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for AttrValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_is_exact_on_variant() {
        assert_eq!(AttrValue::Double(1.0), AttrValue::Double(1.0));
        assert_ne!(AttrValue::Double(1.0), AttrValue::Float(1.0));
        assert_ne!(AttrValue::Double(1.0), AttrValue::Int(1));
        assert_ne!(AttrValue::Text("1".to_string()), AttrValue::Int(1));
    }

    #[test]
    fn truthiness() {
        assert!(AttrValue::from("standard").truthy());
        assert!(!AttrValue::from("").truthy());
        assert!(!AttrValue::Int(0).truthy());
        assert!(AttrValue::Int(-1).truthy());
        assert!(!AttrValue::Double(0.0).truthy());
    }

    #[test]
    fn display_renders_raw_text() {
        assert_eq!(AttrValue::from("CMIP6").to_string(), "CMIP6");
        assert_eq!(AttrValue::Int(3).to_string(), "3");
    }
}
