//! Document import: grows a model tree from an architecture document.
//!
//! Components (objects carrying a `wbs_no`) become package/block pairs,
//! reserved sections become their own packages, arrays explode into
//! positionally named siblings, and scalars land as value properties on
//! the nearest block. Malformed branches are logged and skipped so one
//! bad subtree does not abort the whole import.

use archsync_array::{flatten, indexed_name, name_indices, shape};
use archsync_model::{Literal, ModelTree, NodeId, NodeKind};
use serde_json::{Map, Value};

use crate::classify::{classify, EntryKind, Section, DESCRIPTIVE_KEYS, RESERVED_KEYS};
use crate::error::SyncError;
use crate::requirement::text_from_fields;

/// Build model elements for every entry of `document` under `parent`.
///
/// The document is usually a whole file, `{root_component: {...}}`, and
/// `parent` the tree root, but any object can be grown under any package.
///
/// # Errors
///
/// Returns [`SyncError::Parse`] when `document` is not an object. Faults
/// inside individual entries are logged and the entry skipped.
pub fn build_tree(tree: &mut ModelTree, parent: NodeId, document: &Value) -> Result<(), SyncError> {
    let fields = document
        .as_object()
        .ok_or_else(|| SyncError::Parse("document root is not an object".to_string()))?;

    if tree.profile().is_none() {
        tracing::warn!("no stereotype profile imported; stereotypes will not be assigned");
    }

    walk(tree, fields, parent, false, None);
    Ok(())
}

fn walk(
    tree: &mut ModelTree,
    fields: &Map<String, Value>,
    parent: NodeId,
    requirement: bool,
    higher: Option<NodeId>,
) {
    for (key, value) in fields {
        entry(tree, key, value, parent, requirement, higher);
    }
}

fn entry(
    tree: &mut ModelTree,
    key: &str,
    value: &Value,
    parent: NodeId,
    requirement: bool,
    higher: Option<NodeId>,
) {
    match classify(key, value) {
        EntryKind::Scalar => attach_scalar(tree, parent, key, value),
        EntryKind::Structure => {
            let holder = find_package_child(tree, parent, Section::Architecture.package_name())
                .unwrap_or(parent);
            attach_fields(tree, holder, key, value, requirement);
        }
        EntryKind::Component => {
            if let Value::Object(fields) = value {
                component(tree, key, fields, parent, requirement, higher);
            }
        }
        EntryKind::Group => group(tree, key, value, parent, higher),
    }
}

/// Scalars belong to the block of the enclosing component, which sits
/// beside the package currently being walked.
fn attach_scalar(tree: &mut ModelTree, parent: NodeId, key: &str, value: &Value) {
    let base = tree.owner(parent).unwrap_or(parent);
    match find_block_child(tree, base) {
        Some(block) => attach_fields(tree, block, key, value, false),
        None => tracing::warn!(
            "no block under '{}' to hold '{}'; dropping it",
            tree.name(base),
            key
        ),
    }
}

fn component(
    tree: &mut ModelTree,
    key: &str,
    fields: &Map<String, Value>,
    parent: NodeId,
    requirement: bool,
    higher: Option<NodeId>,
) {
    let package = tree.create(NodeKind::Package, key, parent);
    let kind = if requirement {
        NodeKind::Requirement
    } else {
        NodeKind::Block
    };
    let class = tree.create(kind, key, package);

    apply_stereotype(tree, class, key, fields);
    make_sections(tree, package, fields);

    // Content recurses into the Architecture package when one was made
    let recursion_parent = find_package_child(tree, package, Section::Architecture.package_name())
        .unwrap_or(package);

    if let Some(owner) = higher {
        if requirement {
            tracing::debug!("not adding a part property for requirement '{}'", key);
        } else {
            let part = tree.create(NodeKind::PartProperty, key, owner);
            if let Err(err) = tree.set_type_block(part, class) {
                tracing::warn!("cannot type part property '{}': {}", key, err);
            }
        }
    }

    walk(tree, fields, recursion_parent, requirement, Some(class));
}

fn apply_stereotype(tree: &mut ModelTree, class: NodeId, key: &str, fields: &Map<String, Value>) {
    let Some(profile) = tree.profile() else {
        return;
    };
    // Look the stereotype up by key first, then by the component's name
    let found = if profile.get(key).is_some() {
        Some(key.to_string())
    } else {
        fields
            .get("name")
            .and_then(Value::as_str)
            .filter(|name| profile.get(name).is_some())
            .map(str::to_string)
    };
    match found {
        Some(name) => {
            if let Err(err) = tree.set_stereotype(class, &name) {
                tracing::warn!("cannot stereotype '{}': {}", key, err);
            }
        }
        None => tracing::debug!("no stereotype matches '{}'", key),
    }
}

/// Create the section packages a component's keys call for, in a fixed
/// order. Architecture is needed for sub-components and for any key that
/// is neither reserved nor descriptive.
fn make_sections(tree: &mut ModelTree, package: NodeId, fields: &Map<String, Value>) {
    let needs_architecture = fields.keys().any(|key| {
        key == "components"
            || !(RESERVED_KEYS.contains(&key.as_str()) || DESCRIPTIVE_KEYS.contains(&key.as_str()))
    });
    if needs_architecture {
        tree.create(
            NodeKind::Package,
            Section::Architecture.package_name(),
            package,
        );
    }
    for key in ["requirements", "performance", "behavior"] {
        if fields.contains_key(key) {
            tree.create(NodeKind::Package, Section::for_key(key).package_name(), package);
        }
    }
}

fn group(tree: &mut ModelTree, key: &str, value: &Value, parent: NodeId, higher: Option<NodeId>) {
    let section = Section::for_key(key);
    let requirement = section.is_requirements();

    let base = if section.searches_owner() {
        tree.owner(parent).unwrap_or(parent)
    } else {
        parent
    };
    let holder = find_package_child(tree, base, section.package_name()).unwrap_or(base);

    match value {
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                let name = indexed_name(key, &[index]);
                entry(tree, &name, item, holder, requirement, higher);
            }
        }
        Value::Object(fields) => {
            for (child_key, child_value) in fields {
                entry(tree, child_key, child_value, holder, requirement, higher);
            }
        }
        other => tracing::warn!("reserved key '{}' holds a bare scalar ({}); dropping it", key, other),
    }
}

/// Attach a field to `owner`, exploding arrays into one element per
/// positional name. A single-element array keeps the bare key.
fn attach_fields(tree: &mut ModelTree, owner: NodeId, key: &str, value: &Value, requirement: bool) {
    match value {
        Value::Array(items) if items.is_empty() => {
            let property = tree.create(NodeKind::ValueProperty, key, owner);
            if let Err(err) = tree.set_value(property, Literal::Null) {
                tracing::warn!("cannot set value for '{}': {}", key, err);
            }
        }
        Value::Array(items) => {
            let dims = shape(value);
            let flat = flatten(items);
            let names: Vec<String> = name_indices(key, &dims).collect();
            if names.len() != flat.len() {
                tracing::warn!(
                    "ragged array under '{}': {} names for {} elements",
                    key,
                    names.len(),
                    flat.len()
                );
            }
            let single = names.len() == 1;
            for (name, element) in names.iter().zip(flat.iter()) {
                let leaf_key = if single { key } else { name.as_str() };
                attach_element(tree, owner, leaf_key, element, requirement);
            }
        }
        single => attach_element(tree, owner, key, single, requirement),
    }
}

fn attach_element(tree: &mut ModelTree, owner: NodeId, key: &str, value: &Value, requirement: bool) {
    let Value::Object(fields) = value else {
        attach_property(tree, owner, key, value);
        return;
    };

    let kind = if requirement {
        NodeKind::Requirement
    } else {
        NodeKind::Block
    };
    let class = tree.create(kind, key, owner);

    if requirement {
        match text_from_fields(fields) {
            Some(text) => {
                if let Err(err) = tree.set_text(class, &text) {
                    tracing::warn!("cannot set requirement text for '{}': {}", key, err);
                }
            }
            None => tracing::warn!(
                "requirement '{}' lacks name, description, value, or units; text left unset",
                key
            ),
        }
    } else {
        for (field_key, field_value) in fields {
            attach_fields(tree, class, field_key, field_value, requirement);
        }
    }
}

fn attach_property(tree: &mut ModelTree, owner: NodeId, key: &str, value: &Value) {
    match Literal::from_value(value) {
        Some(literal) => {
            let property = tree.create(NodeKind::ValueProperty, key, owner);
            if let Err(err) = tree.set_value(property, literal) {
                tracing::warn!("cannot set value for '{}': {}", key, err);
            }
        }
        None => tracing::warn!("'{}' has no literal type ({}); skipping it", key, value),
    }
}

fn find_block_child(tree: &ModelTree, parent: NodeId) -> Option<NodeId> {
    tree.children(parent)
        .iter()
        .copied()
        .find(|&child| tree.kind(child) == NodeKind::Block)
}

fn find_package_child(tree: &ModelTree, parent: NodeId, name: &str) -> Option<NodeId> {
    tree.children(parent)
        .iter()
        .copied()
        .find(|&child| tree.kind(child) == NodeKind::Package && tree.name(child) == name)
}
