//! Default values carried by value properties.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A typed default value attached to a value property.
///
/// The five kinds mirror what a JSON scalar can hold. `Null` marks a
/// property that exists but carries no value, which is how an empty
/// array leaf is recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    Bool(bool),
    Int(i64),
    Real(f64),
    Str(String),
    Null,
}

impl Literal {
    /// Convert a JSON scalar into a literal.
    ///
    /// Returns `None` for arrays and objects, which have no literal
    /// representation. Integers that fit `i64` stay integers; all other
    /// numbers become reals.
    ///
    /// # Example
    ///
    /// ```
    /// use archsync_model::Literal;
    /// use serde_json::json;
    ///
    /// assert_eq!(Literal::from_value(&json!(5)), Some(Literal::Int(5)));
    /// assert_eq!(Literal::from_value(&json!(5.2)), Some(Literal::Real(5.2)));
    /// assert_eq!(Literal::from_value(&json!([1, 2])), None);
    /// ```
    pub fn from_value(value: &Value) -> Option<Literal> {
        match value {
            Value::Bool(b) => Some(Literal::Bool(*b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    return Some(Literal::Int(i));
                }
                n.as_f64().map(Literal::Real)
            }
            Value::String(s) => Some(Literal::Str(s.clone())),
            Value::Null => Some(Literal::Null),
            Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// Convert the literal back into a JSON value.
    pub fn to_value(&self) -> Value {
        match self {
            Literal::Bool(b) => Value::Bool(*b),
            Literal::Int(i) => Value::from(*i),
            Literal::Real(r) => serde_json::Number::from_f64(*r)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Literal::Str(s) => Value::String(s.clone()),
            Literal::Null => Value::Null,
        }
    }
}
