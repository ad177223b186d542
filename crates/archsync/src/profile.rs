//! Stereotype profile import.
//!
//! A stereotype document mirrors the architecture document's nesting:
//! every object carrying a `wbs_no` declares a stereotype named after
//! its key, specializing the stereotype of the nearest such ancestor.
//! Plain objects are transparent, list elements declare themselves
//! under their own `name` field, and scalars are ignored.

use serde_json::{Map, Value};

use archsync_model::{Profile, Stereotype};

use crate::error::SyncError;

/// Name of the profile every import lands in.
pub const PROFILE_NAME: &str = "ImportADHProfile";

/// Build a stereotype profile from a parsed document.
///
/// # Errors
///
/// Returns [`SyncError::Parse`] when the document is not an object or a
/// list. Malformed entries inside it are logged and skipped.
pub fn build_profile(document: &Value) -> Result<Profile, SyncError> {
    let mut profile = Profile::new(PROFILE_NAME);
    match document {
        Value::Object(fields) => walk(&mut profile, fields, None),
        Value::Array(items) => items_into(&mut profile, items, None),
        other => {
            return Err(SyncError::Parse(format!(
                "cannot interpret {} as a stereotype document",
                crate::requirement::value_text(other)
            )))
        }
    }
    Ok(profile)
}

fn walk(profile: &mut Profile, fields: &Map<String, Value>, parent: Option<&str>) {
    for (key, value) in fields {
        entry(profile, key, value, parent);
    }
}

fn entry(profile: &mut Profile, key: &str, value: &Value, parent: Option<&str>) {
    match value {
        Value::Object(fields) => {
            if fields.contains_key("wbs_no") {
                define(profile, key, fields, parent);
                walk(profile, fields, Some(key));
            } else {
                walk(profile, fields, parent);
            }
        }
        Value::Array(items) => items_into(profile, items, parent),
        _ => {}
    }
}

/// List elements carry their own name instead of inheriting a key.
fn items_into(profile: &mut Profile, items: &[Value], parent: Option<&str>) {
    for item in items {
        let name = item.get("name").and_then(Value::as_str);
        match name {
            Some(name) => entry(profile, name, item, parent),
            None => tracing::warn!(
                "stereotype list element {} has no name; skipping it",
                crate::requirement::value_text(item)
            ),
        }
    }
}

fn define(profile: &mut Profile, name: &str, fields: &Map<String, Value>, parent: Option<&str>) {
    let stereotype = Stereotype {
        name: name.to_owned(),
        description: fields
            .get("description")
            .and_then(Value::as_str)
            .map(str::to_owned),
        parent: parent.map(str::to_owned),
    };
    if !profile.add(stereotype) {
        tracing::debug!("stereotype '{}' already defined; keeping the first", name);
    }
}
