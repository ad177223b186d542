//! Requirement text encoding.
//!
//! A requirement is stored in the model tree as a single sentence,
//! `"(name): description shall be value units"`. That string is the only
//! encoding of the requirement, so composing and parsing it must agree
//! exactly for requirements to survive a round trip.

use serde_json::{Map, Number, Value};

/// Render a leaf value the way requirement sentences and audit records
/// spell it. Whole floats keep their trailing `.0` so a real-typed value
/// never reads as an integer.
pub(crate) fn value_text(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else if let Some(x) = n.as_f64() {
                format!("{:?}", x)
            } else {
                n.to_string()
            }
        }
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Compose the requirement sentence from its four fields.
///
/// # Example
///
/// ```
/// # use serde_json::json;
/// let text = archsync::requirement::compose_text("R1", "desc", &json!(5.2), "kg");
/// assert_eq!(text, "(R1): desc shall be 5.2 kg");
/// ```
pub fn compose_text(name: &str, description: &str, value: &Value, units: &str) -> String {
    format!(
        "({}): {} shall be {} {}",
        name,
        description,
        value_text(value),
        units
    )
}

/// Compose the requirement sentence from a requirement-shaped object,
/// `{name, description, value: {value, units}}`. Returns `None` when any
/// field is missing or has the wrong shape.
pub fn text_from_fields(fields: &Map<String, Value>) -> Option<String> {
    let name = fields.get("name")?.as_str()?;
    let description = fields.get("description")?.as_str()?;
    let magnitude = fields.get("value")?.as_object()?;
    let value = magnitude.get("value")?;
    let units = magnitude.get("units")?.as_str()?;
    Some(compose_text(name, description, value, units))
}

/// Parse a requirement sentence back into its fields.
///
/// The sentence splits on the literal markers `"): "` and `" shall be "`;
/// the trailing text must end in a numeric value followed by a units
/// token. Anything else returns `None`, and callers fall back to carrying
/// the raw text.
///
/// # Example
///
/// ```
/// # use serde_json::json;
/// let fields = archsync::requirement::parse_text("(R1): desc shall be 5.2 kg").unwrap();
/// assert_eq!(fields["name"], json!("R1"));
/// assert_eq!(fields["description"], json!("desc"));
/// assert_eq!(fields["value"], json!({"value": 5.2, "units": "kg"}));
/// ```
pub fn parse_text(text: &str) -> Option<Map<String, Value>> {
    let rest = text.strip_prefix('(')?;
    let (name, rest) = rest.split_once("): ")?;
    let (description, tail) = rest.split_once(" shall be ")?;

    let mut tokens = tail.rsplitn(3, ' ');
    let units = tokens.next()?;
    let magnitude: f64 = tokens.next()?.parse().ok()?;
    let magnitude = Number::from_f64(magnitude)?;

    let mut value = Map::new();
    value.insert("value".to_string(), Value::Number(magnitude));
    value.insert("units".to_string(), Value::String(units.to_string()));

    let mut fields = Map::new();
    fields.insert("name".to_string(), Value::String(name.to_string()));
    fields.insert(
        "description".to_string(),
        Value::String(description.to_string()),
    );
    fields.insert("value".to_string(), Value::Object(value));
    Some(fields)
}
