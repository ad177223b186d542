//! Tree export: reconstructs an architecture document from a model tree.
//!
//! Extraction is the inverse of the import walk. Positionally named
//! siblings (`base__i__j`) regroup into nested arrays, a package merges
//! its class's fields with its section packages, and requirement text
//! parses back into its fields. Empty objects and arrays are elided from
//! plain-named slots so placeholders do not pollute the output.

use archsync_array::{reshape, split_indexed_name};
use archsync_model::{Literal, ModelTree, NodeId, NodeKind};
use serde_json::{json, Map, Value};

use crate::classify::Section;
use crate::error::SyncError;
use crate::requirement::parse_text;

/// One run of positionally named siblings, reassembled into a nested
/// array when the run ends. The run tracks the per-axis maximum index so
/// the final shape is `max + 1` along each axis.
struct Run {
    base: String,
    max_indices: Vec<usize>,
    elements: Vec<Value>,
}

impl Run {
    fn start(base: &str, indices: &[usize], value: Value) -> Run {
        Run {
            base: base.to_string(),
            max_indices: indices.to_vec(),
            elements: vec![value],
        }
    }

    /// A run extends only while the base and the index arity both match.
    fn matches(&self, base: &str, indices: &[usize]) -> bool {
        self.base == base && self.max_indices.len() == indices.len()
    }

    fn push(&mut self, indices: &[usize], value: Value) {
        for (axis, index) in indices.iter().enumerate() {
            self.max_indices[axis] = self.max_indices[axis].max(*index);
        }
        self.elements.push(value);
    }

    fn finish(self, out: &mut Map<String, Value>) -> Result<(), SyncError> {
        let dims: Vec<usize> = self.max_indices.iter().map(|max| max + 1).collect();
        let array = reshape(&self.elements, &dims)?;
        out.insert(self.base, array);
        Ok(())
    }
}

/// Scan a sibling list in order, turning indexed names into array runs
/// and inserting plain names directly. `value_of` supplies each child's
/// value, or `None` to leave the child out entirely.
fn scan<F>(
    tree: &ModelTree,
    children: &[NodeId],
    out: &mut Map<String, Value>,
    value_of: F,
) -> Result<(), SyncError>
where
    F: Fn(&ModelTree, NodeId) -> Result<Option<Value>, SyncError>,
{
    let mut run: Option<Run> = None;
    for &child in children {
        let Some(value) = value_of(tree, child)? else {
            continue;
        };
        let name = tree.name(child);
        let (base, indices) = split_indexed_name(name);

        if indices.is_empty() {
            if let Some(done) = run.take() {
                done.finish(out)?;
            }
            insert_plain(out, name, value);
            continue;
        }

        let extends = matches!(&run, Some(active) if active.matches(base, &indices));
        if extends {
            if let Some(active) = run.as_mut() {
                active.push(&indices, value);
            }
        } else {
            if let Some(done) = run.take() {
                done.finish(out)?;
            }
            run = Some(Run::start(base, &indices, value));
        }
    }
    if let Some(done) = run.take() {
        done.finish(out)?;
    }
    Ok(())
}

fn insert_plain(out: &mut Map<String, Value>, name: &str, value: Value) {
    if is_empty_container(&value) {
        return;
    }
    out.insert(name.to_string(), value);
}

fn is_empty_container(value: &Value) -> bool {
    match value {
        Value::Object(fields) => fields.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Extract the document fragment a node stands for.
///
/// # Errors
///
/// Returns [`SyncError::Shape`] when an indexed sibling run does not fill
/// the rectangle its names imply, which happens when elements of an
/// imported array were dropped.
pub fn extract_node(tree: &ModelTree, node: NodeId) -> Result<Value, SyncError> {
    match tree.kind(node) {
        NodeKind::Block => extract_block(tree, node),
        NodeKind::Package => extract_package(tree, node),
        NodeKind::Requirement => Ok(extract_requirement(tree, node)),
        NodeKind::ValueProperty => Ok(leaf_value(tree, node)),
        NodeKind::PartProperty => Ok(Value::Object(Map::new())),
    }
}

/// Document value of a child inside a block or section scan. Part
/// properties carry no data of their own, only the decomposition edge,
/// so they are left out.
fn document_value(tree: &ModelTree, child: NodeId) -> Result<Option<Value>, SyncError> {
    if tree.kind(child) == NodeKind::PartProperty {
        return Ok(None);
    }
    extract_node(tree, child).map(Some)
}

fn extract_block(tree: &ModelTree, block: NodeId) -> Result<Value, SyncError> {
    let mut out = Map::new();
    scan(tree, tree.children(block), &mut out, document_value)?;
    Ok(Value::Object(out))
}

fn extract_package(tree: &ModelTree, package: NodeId) -> Result<Value, SyncError> {
    let package_name = tree.name(package);
    let mut out = Map::new();

    for &child in tree.children(package) {
        let child_name = tree.name(child);
        match tree.kind(child) {
            // The component's own class: its fields merge in flat
            NodeKind::Block | NodeKind::Requirement if child_name == package_name => {
                if let Value::Object(fields) = extract_node(tree, child)? {
                    out.extend(fields);
                }
            }
            NodeKind::Package if child_name == Section::Architecture.package_name() => {
                scan(tree, tree.children(child), &mut out, document_value)?;
            }
            NodeKind::Package if is_section_name(child_name) => {
                let mut section = Map::new();
                scan(tree, tree.children(child), &mut section, document_value)?;
                let key = child_name.to_lowercase();
                if section.contains_key(&key) {
                    // A run already rebuilt the list form; merge it flat
                    out.extend(section);
                } else if !section.is_empty() {
                    out.insert(key, Value::Object(section));
                }
            }
            _ => {}
        }
    }
    Ok(Value::Object(out))
}

fn is_section_name(name: &str) -> bool {
    [
        Section::Requirements,
        Section::Performance,
        Section::Behavior,
    ]
    .iter()
    .any(|section| section.package_name() == name)
}

fn extract_requirement(tree: &ModelTree, requirement: NodeId) -> Value {
    match tree.text(requirement) {
        Some(text) => match parse_text(text) {
            Some(fields) => Value::Object(fields),
            None => json!({ "text": text }),
        },
        None => Value::Object(Map::new()),
    }
}

/// An unset or null property reads back as an empty array, the marker
/// for "no value", and is then elided from plain-named slots.
fn leaf_value(tree: &ModelTree, property: NodeId) -> Value {
    match tree.value(property) {
        Some(Literal::Null) | None => json!([]),
        Some(literal) => literal.to_value(),
    }
}

/// Extract the instance view of a block: value properties and, through
/// part properties, the blocks they are typed by. Structural children
/// and requirements are left out of the instance.
///
/// # Errors
///
/// Returns [`SyncError::Shape`] under the same conditions as
/// [`extract_node`].
pub fn write_instance(tree: &ModelTree, block: NodeId) -> Result<Value, SyncError> {
    let mut out = Map::new();
    scan(tree, tree.children(block), &mut out, instance_value)?;
    Ok(Value::Object(out))
}

fn instance_value(tree: &ModelTree, child: NodeId) -> Result<Option<Value>, SyncError> {
    match tree.kind(child) {
        NodeKind::ValueProperty => Ok(Some(leaf_value(tree, child))),
        NodeKind::PartProperty => match tree.type_block(child) {
            Some(class) => {
                let mut nested = Map::new();
                scan(tree, tree.children(class), &mut nested, instance_value)?;
                Ok(Some(Value::Object(nested)))
            }
            None => {
                tracing::warn!("part property '{}' has no type; skipping it", tree.name(child));
                Ok(None)
            }
        },
        _ => Ok(None),
    }
}
