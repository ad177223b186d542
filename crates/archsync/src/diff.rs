//! Model update: compares an extracted document against an updated one,
//! records every difference, and patches the model tree's leaves in
//! place.
//!
//! The walk mirrors the import walk key for key while assembling the
//! qualified name of each leaf: component levels insert the
//! `::Architecture` segment the builder created, scalar leaves of a
//! component hop through its block, and reserved sections append their
//! package segment. Patching failures never abort the walk; the record
//! is kept and the fault logged.

use std::fmt;

use archsync_array::indexed_name;
use archsync_model::{Literal, ModelTree, NodeId, NodeKind};
use serde_json::{Map, Value};

use crate::classify::{classify, EntryKind, Section, DESCRIPTIVE_KEYS};
use crate::error::SyncError;
use crate::requirement::{compose_text, text_from_fields, value_text};

/// One observed difference between the model and the updated document.
#[derive(Debug, Clone, PartialEq)]
pub struct DiffRecord {
    pub qualified_name: String,
    pub old: Value,
    pub new: Value,
}

impl fmt::Display for DiffRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Changed '{}' from '{}' to '{}'",
            self.qualified_name,
            value_text(&self.old),
            value_text(&self.new)
        )
    }
}

/// Where the walk stands relative to component nesting. Only component
/// levels insert `::Architecture` segments for nested structures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Component,
    Plain,
    Reserved,
}

/// The last two updated-side objects seen on the way down, innermost in
/// `parent`. Requirement patching pulls name/description/value context
/// from them when only an inner leaf differed. A level that has no
/// readable object, such as a synthetic list-element wrapper, is `None`.
#[derive(Clone, Copy)]
struct Ancestors<'a> {
    grandparent: Option<&'a Map<String, Value>>,
    parent: Option<&'a Map<String, Value>>,
}

impl<'a> Ancestors<'a> {
    fn empty() -> Ancestors<'a> {
        Ancestors {
            grandparent: None,
            parent: None,
        }
    }

    fn push(self, current: &'a Map<String, Value>) -> Ancestors<'a> {
        Ancestors {
            grandparent: self.parent,
            parent: Some(current),
        }
    }

    /// Push an opaque level with nothing to read.
    fn shift(self) -> Ancestors<'a> {
        Ancestors {
            grandparent: self.parent,
            parent: None,
        }
    }
}

/// Compare the extracted form of the component named `root_name` against
/// the updated document `{root_name: {...}}`, patch the tree's leaves,
/// and return every difference found.
///
/// # Errors
///
/// Returns [`SyncError::Parse`] when the updated document has no entry
/// for `root_name`. Faults at individual leaves are logged and skipped.
pub fn diff_trees(
    tree: &mut ModelTree,
    extracted: &Value,
    updated: &Value,
    root_name: &str,
) -> Result<Vec<DiffRecord>, SyncError> {
    let updated_root = updated.get(root_name).ok_or_else(|| {
        SyncError::Parse(format!("updated document has no '{}' entry", root_name))
    })?;

    let mut records = Vec::new();
    compare(
        tree,
        &mut records,
        extracted,
        updated_root,
        root_name,
        false,
        Mode::Component,
        Ancestors::empty(),
    );
    Ok(records)
}

#[allow(clippy::too_many_arguments)]
fn compare<'a>(
    tree: &mut ModelTree,
    records: &mut Vec<DiffRecord>,
    model: &'a Value,
    updated: &'a Value,
    path: &str,
    parent_has_wbs: bool,
    mode: Mode,
    ancestors: Ancestors<'a>,
) {
    match (model, updated) {
        (Value::Object(model_fields), Value::Object(updated_fields)) => {
            let has_wbs = model_fields.contains_key("wbs_no");
            let next = ancestors.push(updated_fields);
            for (key, model_value) in model_fields {
                let Some(updated_value) = updated_fields.get(key) else {
                    tracing::warn!(
                        "'{}' under '{}' is missing from the updated document; skipping it",
                        key,
                        path
                    );
                    continue;
                };
                compare_entry(
                    tree,
                    records,
                    key,
                    model_value,
                    updated_value,
                    path,
                    has_wbs,
                    parent_has_wbs,
                    mode,
                    next,
                    false,
                );
            }
        }
        (Value::Array(model_items), Value::Array(updated_items)) => {
            if updated_items.len() < model_items.len() {
                tracing::warn!(
                    "updated list at '{}' has {} elements, the model has {}",
                    path,
                    updated_items.len(),
                    model_items.len()
                );
            }
            for (model_item, updated_item) in model_items.iter().zip(updated_items) {
                leaf_compare(tree, records, model_item, updated_item, path, ancestors);
            }
        }
        // One side wraps a scalar in a single-element list: unwrap and
        // compare again under the same name
        (Value::Array(model_items), _) => match model_items.first() {
            Some(first) => recompare_unwrapped(
                tree,
                records,
                first,
                updated,
                path,
                ancestors,
            ),
            None => leaf_compare(tree, records, model, updated, path, ancestors),
        },
        (_, Value::Array(updated_items)) => match updated_items.first() {
            Some(first) => recompare_unwrapped(
                tree,
                records,
                model,
                first,
                path,
                ancestors,
            ),
            None => leaf_compare(tree, records, model, updated, path, ancestors),
        },
        _ => leaf_compare(tree, records, model, updated, path, ancestors),
    }
}

/// Strip the leaf's own segment from the path and run the pair through
/// entry classification again, which re-appends the segment. The two
/// sides are now shaped alike, so the ordinary arms apply.
fn recompare_unwrapped<'a>(
    tree: &mut ModelTree,
    records: &mut Vec<DiffRecord>,
    model: &'a Value,
    updated: &'a Value,
    path: &str,
    ancestors: Ancestors<'a>,
) {
    let last = path.rsplit("::").next().unwrap_or("");
    let suffix = format!("::{}", last);
    let stripped = path.strip_suffix(suffix.as_str()).unwrap_or(path);
    compare_entry(
        tree,
        records,
        last,
        model,
        updated,
        stripped,
        false,
        false,
        Mode::Component,
        ancestors.shift(),
        false,
    );
}

#[allow(clippy::too_many_arguments)]
fn compare_entry<'a>(
    tree: &mut ModelTree,
    records: &mut Vec<DiffRecord>,
    key: &str,
    model_value: &'a Value,
    updated_value: &'a Value,
    path: &str,
    has_wbs: bool,
    parent_has_wbs: bool,
    mode: Mode,
    next: Ancestors<'a>,
    is_element: bool,
) {
    match classify(key, model_value) {
        EntryKind::Structure => {
            let mut new_path = String::from(path);
            if mode == Mode::Component {
                if parent_has_wbs {
                    new_path.push_str("::Architecture");
                }
                if has_wbs {
                    new_path.push_str("::Architecture");
                }
            }
            new_path.push_str("::");
            new_path.push_str(key);
            compare(
                tree,
                records,
                model_value,
                updated_value,
                &new_path,
                has_wbs,
                Mode::Plain,
                next,
            );
        }
        EntryKind::Scalar => {
            let mut new_path = String::from(path);
            // A component's scalars sit on its block, one segment deeper.
            // List elements inherit the hop from the list's container.
            let hop = has_wbs || (is_element && parent_has_wbs && mode == Mode::Component);
            if hop {
                let last = path.rsplit("::").next().unwrap_or("");
                new_path.push_str("::");
                new_path.push_str(last);
            }
            new_path.push_str("::");
            new_path.push_str(key);
            compare(
                tree,
                records,
                model_value,
                updated_value,
                &new_path,
                has_wbs,
                Mode::Component,
                next,
            );
        }
        EntryKind::Component => {
            let mut new_path = String::from(path);
            if !DESCRIPTIVE_KEYS.contains(&key) {
                new_path.push_str("::Architecture");
            }
            new_path.push_str("::");
            new_path.push_str(key);
            compare(
                tree,
                records,
                model_value,
                updated_value,
                &new_path,
                has_wbs,
                Mode::Component,
                next,
            );
        }
        EntryKind::Group => {
            let section = Section::for_key(key);
            let (segment, child_mode) = match section.path_segment() {
                Some(segment) => (segment, Mode::Reserved),
                None => ("", Mode::Component),
            };
            let group_path = format!("{}{}", path, segment);
            let element_next = next.shift();

            match (model_value, updated_value) {
                (Value::Array(model_items), Value::Array(updated_items)) => {
                    for (index, model_item) in model_items.iter().enumerate() {
                        let Some(updated_item) = updated_items.get(index) else {
                            tracing::warn!(
                                "updated list '{}' under '{}' has no element {}; skipping it",
                                key,
                                path,
                                index
                            );
                            continue;
                        };
                        let name = indexed_name(key, &[index]);
                        compare_entry(
                            tree,
                            records,
                            &name,
                            model_item,
                            updated_item,
                            &group_path,
                            false,
                            has_wbs,
                            child_mode,
                            element_next,
                            true,
                        );
                    }
                }
                (Value::Object(model_fields), Value::Object(updated_fields)) => {
                    for (child_key, model_item) in model_fields {
                        let Some(updated_item) = updated_fields.get(child_key) else {
                            tracing::warn!(
                                "'{}' under '{}' is missing from the updated document; skipping it",
                                child_key,
                                group_path
                            );
                            continue;
                        };
                        compare_entry(
                            tree,
                            records,
                            child_key,
                            model_item,
                            updated_item,
                            &group_path,
                            false,
                            has_wbs,
                            child_mode,
                            element_next,
                            true,
                        );
                    }
                }
                _ => tracing::warn!(
                    "{}",
                    SyncError::Structural(format!(
                        "'{}' under '{}' does not group on both sides",
                        key, path
                    ))
                ),
            }
        }
    }
}

fn leaf_compare(
    tree: &mut ModelTree,
    records: &mut Vec<DiffRecord>,
    model: &Value,
    updated: &Value,
    path: &str,
    ancestors: Ancestors<'_>,
) {
    if values_equal(model, updated) {
        return;
    }
    records.push(DiffRecord {
        qualified_name: path.to_string(),
        old: model.clone(),
        new: updated.clone(),
    });
    correct_value(tree, path, updated, ancestors);
}

/// Numbers compare by value so an integer equals the same whole float.
/// Booleans never equal numbers.
fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => x == y,
        },
        _ => a == b,
    }
}

/// Resolve the model node behind a recorded difference and patch it.
fn correct_value(tree: &mut ModelTree, name: &str, new_value: &Value, ancestors: Ancestors<'_>) {
    let requirement_path = name.contains("Requirements");
    let qualified = if requirement_path {
        requirement_qualified_name(name).unwrap_or_else(|| name.to_string())
    } else {
        name.to_string()
    };

    let Some(target) = tree.find_by_qualified_name(&qualified) else {
        tracing::warn!("{}; cannot update it", SyncError::Lookup(qualified));
        return;
    };

    if requirement_path {
        patch_requirement(tree, target, &qualified, ancestors);
    } else {
        patch_property(tree, target, &qualified, new_value);
    }
}

/// A path through a `Requirements` section addresses the requirement
/// node itself, whose child name is the first segment after the section,
/// not the full constructed path.
fn requirement_qualified_name(name: &str) -> Option<String> {
    let start = name.find("Requirements")?;
    let prefix = &name[..start];
    let end = name.rfind("Requirements")? + "Requirements".len();
    let local = name[end..].split("::").nth(1)?;
    Some(format!("{}Requirements::{}", prefix, local))
}

fn patch_property(tree: &mut ModelTree, target: NodeId, qualified: &str, new_value: &Value) {
    if tree.kind(target) != NodeKind::ValueProperty {
        tracing::warn!(
            "'{}' is a {}, not a value property; cannot update it",
            qualified,
            tree.kind(target)
        );
        return;
    }
    let literal = match new_value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Literal::Int(i)
            } else if let Some(x) = n.as_f64() {
                Literal::Real(x)
            } else {
                tracing::warn!(
                    "'{}': {}",
                    qualified,
                    SyncError::UnknownLiteralType(value_text(new_value))
                );
                return;
            }
        }
        Value::String(s) => Literal::Str(s.clone()),
        other => {
            tracing::warn!(
                "'{}': {}",
                qualified,
                SyncError::UnknownLiteralType(value_text(other))
            );
            return;
        }
    };
    if let Err(err) = tree.set_value(target, literal) {
        tracing::warn!("cannot update '{}': {}", qualified, err);
    }
}

fn patch_requirement(
    tree: &mut ModelTree,
    target: NodeId,
    qualified: &str,
    ancestors: Ancestors<'_>,
) {
    match requirement_text_from(ancestors) {
        Some(text) => {
            if let Err(err) = tree.set_text(target, &text) {
                tracing::warn!("cannot update '{}': {}", qualified, err);
            }
        }
        None => tracing::warn!(
            "requirement '{}' not updated; the changed leaf has no complete context",
            qualified
        ),
    }
}

/// Rebuild the requirement sentence from whatever context the changed
/// leaf arrived with: all four fields in the nearest object, or name and
/// description one level up with value and units nearest, or a raw
/// `text` field carried verbatim.
fn requirement_text_from(ancestors: Ancestors<'_>) -> Option<String> {
    if let Some(parent) = ancestors.parent {
        if let Some(text) = text_from_fields(parent) {
            return Some(text);
        }
    }
    if let (Some(grandparent), Some(parent)) = (ancestors.grandparent, ancestors.parent) {
        let name = grandparent.get("name").and_then(Value::as_str);
        let description = grandparent.get("description").and_then(Value::as_str);
        let value = parent.get("value");
        let units = parent.get("units").and_then(Value::as_str);
        if let (Some(name), Some(description), Some(value), Some(units)) =
            (name, description, value, units)
        {
            return Some(compose_text(name, description, value, units));
        }
    }
    for fields in [ancestors.parent, ancestors.grandparent].into_iter().flatten() {
        if let Some(text) = fields.get("text").and_then(Value::as_str) {
            return Some(text.to_string());
        }
    }
    None
}
