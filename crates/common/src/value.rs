use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Structured value attached to entity components, metadata, flags and
/// attributes.
///
/// Every scalar carries an explicit kind tag, so the full 64-bit integer
/// range and non-finite floats (`±inf`, NaN) survive serialization without
/// sentinel strings. Maps are BTreeMap for deterministic iteration order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Floats compare by bit pattern so NaN values round-trip as equal and
/// +0.0 / -0.0 stay distinguishable.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nan_compares_equal_to_itself() {
        assert_eq!(Value::Float(f64::NAN), Value::Float(f64::NAN));
        assert_eq!(Value::Float(f64::INFINITY), Value::Float(f64::INFINITY));
        assert_ne!(Value::Float(0.0), Value::Float(-0.0));
    }

    #[test]
    fn scalars_of_different_kinds_are_unequal() {
        assert_ne!(Value::Int(1), Value::Float(1.0));
        assert_ne!(Value::Text("1".into()), Value::Int(1));
    }

    #[test]
    fn accessors_match_variants() {
        assert_eq!(Value::from(7i64).as_int(), Some(7));
        assert_eq!(Value::from("hi").as_str(), Some("hi"));
        assert_eq!(Value::from(2.5).as_float(), Some(2.5));
        assert_eq!(Value::Null.as_int(), None);
    }

    #[test]
    fn nested_maps_compare_structurally() {
        let mut a = BTreeMap::new();
        a.insert("k".to_string(), Value::List(vec![Value::Int(1)]));
        let b = a.clone();
        assert_eq!(Value::Map(a), Value::Map(b));
    }
}
