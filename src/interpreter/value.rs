use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use crate::util;

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    String(String),
    Boolean(bool),
    /// Result of anything that produces no value, like `golazo.imprimir` or an assignment.
    Nada,
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Boolean(_) => "boolean",
            Value::Nada => "nada",
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Int(value) => *value != 0,
            Value::Float(value) => *value != 0.0,
            Value::String(value) => !value.is_empty(),
            Value::Boolean(value) => *value,
            Value::Nada => false,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Int(value) => Some(*value as f64),
            Value::Float(value) => Some(*value),
            _ => None,
        }
    }

    pub fn is_zero(&self) -> bool {
        matches!(self, Value::Int(0)) || matches!(self, Value::Float(value) if *value == 0.0)
    }

    /// Equality as the `==` operator sees it: ints and floats compare numerically.
    pub fn loose_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Int(_), Value::Float(_)) | (Value::Float(_), Value::Int(_)) => self.as_float() == other.as_float(),
            _ => self == other,
        }
    }

    /// Ordering for `<`, `>`, `<=` and `>=`; only numbers with numbers and strings with strings.
    pub fn try_cmp(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Int(left), Value::Int(right)) => Some(left.cmp(right)),
            (Value::String(left), Value::String(right)) => Some(left.cmp(right)),
            _ => self.as_float().zip(other.as_float()).and_then(|(left, right)| left.partial_cmp(&right)),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Int(value) => write!(f, "{}", value),
            Value::Float(value) => f.write_str(&util::format_float(*value)),
            Value::String(value) => f.write_str(value),
            Value::Boolean(value) => f.write_str(if *value { "Verdadero" } else { "Falso" }),
            Value::Nada => f.write_str("nada"),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(Value::Int(14).to_string(), "14");
        assert_eq!(Value::Float(2.0).to_string(), "2.0");
        assert_eq!(Value::Float(2.5).to_string(), "2.5");
        assert_eq!(Value::from("gol").to_string(), "gol");
        assert_eq!(Value::Boolean(false).to_string(), "Falso");
        assert_eq!(Value::Nada.to_string(), "nada");
    }

    #[test]
    fn numbers_compare_across_kinds() {
        assert!(Value::Int(2).loose_eq(&Value::Float(2.0)));
        assert!(!Value::Int(1).loose_eq(&Value::Boolean(true)));
        assert_eq!(Value::Int(1).try_cmp(&Value::Float(1.5)), Some(Ordering::Less));
        assert_eq!(Value::from("a").try_cmp(&Value::Int(1)), None);
    }

    #[test]
    fn truthiness() {
        assert!(Value::Int(3).is_truthy());
        assert!(!Value::Float(0.0).is_truthy());
        assert!(!Value::from("").is_truthy());
        assert!(!Value::Nada.is_truthy());
    }
}
