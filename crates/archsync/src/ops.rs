//! The file-level operations: import a stereotype profile, build a
//! model from an architecture document, update it from an edited
//! document, and export the model or its instance view back to JSON.
//!
//! Editing operations run inside a model session: they commit on
//! success and cancel on error, leaving the tree untouched by a failed
//! run. Documents are UTF-8 JSON; exports are written with 4-space
//! indentation.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_json::{Map, Value};

use archsync_model::{ModelTree, NodeId, NodeKind};

use crate::build::build_tree;
use crate::diff::{diff_trees, DiffRecord};
use crate::error::SyncError;
use crate::extract::{extract_node, write_instance};
use crate::profile::build_profile;

/// Read and parse a JSON document.
///
/// # Errors
///
/// Returns [`SyncError::Io`] when the file cannot be read and
/// [`SyncError::Parse`] when it is not valid JSON.
pub fn read_document(path: &Path) -> Result<Value, SyncError> {
    let text = fs::read_to_string(path)?;
    serde_json::from_str(&text)
        .map_err(|err| SyncError::Parse(format!("{}: {}", path.display(), err)))
}

/// Write a JSON document with 4-space indentation.
pub fn write_document(path: &Path, document: &Value) -> Result<(), SyncError> {
    let mut out = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = Serializer::with_formatter(&mut out, formatter);
    document
        .serialize(&mut serializer)
        .map_err(|err| SyncError::Parse(err.to_string()))?;
    fs::write(path, out)?;
    Ok(())
}

/// Load a serialized model tree and check its structural invariants.
pub fn load_model(path: &Path) -> Result<ModelTree, SyncError> {
    let text = fs::read_to_string(path)?;
    let tree: ModelTree = serde_json::from_str(&text)
        .map_err(|err| SyncError::Parse(format!("{}: {}", path.display(), err)))?;
    tree.validate()?;
    Ok(tree)
}

/// Load a model file when it exists, otherwise start a fresh tree, so
/// profile import and build can run in either order.
pub fn load_or_new(path: &Path) -> Result<ModelTree, SyncError> {
    if path.exists() {
        load_model(path)
    } else {
        Ok(ModelTree::new("Model"))
    }
}

/// Save a model tree as JSON.
pub fn save_model(path: &Path, tree: &ModelTree) -> Result<(), SyncError> {
    let text = serde_json::to_string_pretty(tree)
        .map_err(|err| SyncError::Parse(err.to_string()))?;
    fs::write(path, text)?;
    Ok(())
}

/// Build a stereotype profile from a document and attach it to the
/// tree, replacing any earlier profile. Returns the number of
/// stereotypes imported.
pub fn import_stereotypes(tree: &mut ModelTree, document: &Value) -> Result<usize, SyncError> {
    let profile = build_profile(document)?;
    let count = profile.len();
    let session = tree.begin();
    tree.set_profile(profile);
    session.commit();
    Ok(count)
}

/// Build the model from an architecture document, all or nothing.
pub fn build_model(tree: &mut ModelTree, document: &Value) -> Result<(), SyncError> {
    let session = tree.begin();
    let root = tree.root();
    match build_tree(tree, root, document) {
        Ok(()) => {
            session.commit();
            Ok(())
        }
        Err(err) => {
            session.cancel(tree);
            Err(err)
        }
    }
}

/// Compare a component against an updated document, patch changed
/// leaves, and write the audit log beside the document.
///
/// The audit file is written on success even when nothing changed, so a
/// clean run leaves evidence of itself.
pub fn update_model(
    tree: &mut ModelTree,
    component: NodeId,
    updated: &Value,
    document_path: &Path,
) -> Result<Vec<DiffRecord>, SyncError> {
    let name = tree.name(component).to_string();
    let extracted = extract_node(tree, component)?;
    let session = tree.begin();
    match diff_trees(tree, &extracted, updated, &name) {
        Ok(records) => {
            session.commit();
            write_audit(document_path, &records)?;
            Ok(records)
        }
        Err(err) => {
            session.cancel(tree);
            Err(err)
        }
    }
}

/// Export a component subtree as an architecture document
/// `{name: {...}}`.
pub fn export_model(tree: &ModelTree, component: NodeId, path: &Path) -> Result<(), SyncError> {
    let name = tree.name(component).to_string();
    let extracted = extract_node(tree, component)?;
    let mut document = Map::new();
    document.insert(name, extracted);
    write_document(path, &Value::Object(document))
}

/// Export the instance view of a component: value properties and part
/// property subtrees only, parts nested under their names.
pub fn export_instance(tree: &ModelTree, component: NodeId, path: &Path) -> Result<(), SyncError> {
    let block = match tree.kind(component) {
        NodeKind::Block => component,
        _ => component_block(tree, component)?,
    };
    let name = tree.name(component).to_string();
    let instance = write_instance(tree, block)?;
    let mut document = Map::new();
    document.insert(name, instance);
    write_document(path, &Value::Object(document))
}

/// Resolve the component a run operates on: an explicit qualified name,
/// or the first package under the root.
pub fn select_component(tree: &ModelTree, qualified: Option<&str>) -> Result<NodeId, SyncError> {
    match qualified {
        Some(name) => tree
            .find_by_qualified_name(name)
            .ok_or_else(|| SyncError::Lookup(name.to_string())),
        None => tree
            .children(tree.root())
            .iter()
            .copied()
            .find(|&child| tree.kind(child) == NodeKind::Package)
            .ok_or_else(|| SyncError::Structural("the model has no component package".to_string())),
    }
}

/// The audit log lands beside the updated document, named after it.
pub fn audit_path(document_path: &Path) -> PathBuf {
    let stem = document_path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("update");
    document_path.with_file_name(format!("{}-ModifiedValues.txt", stem))
}

fn write_audit(document_path: &Path, records: &[DiffRecord]) -> Result<(), SyncError> {
    let mut text = String::new();
    for record in records {
        text.push_str(&record.to_string());
        text.push_str("\n\n");
    }
    fs::write(audit_path(document_path), text)?;
    Ok(())
}

/// A component package holds a block of its own name.
fn component_block(tree: &ModelTree, component: NodeId) -> Result<NodeId, SyncError> {
    let name = tree.name(component);
    tree.children(component)
        .iter()
        .copied()
        .find(|&child| tree.kind(child) == NodeKind::Block && tree.name(child) == name)
        .ok_or_else(|| SyncError::Structural(format!("'{}' has no block of its own name", name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_document() -> Value {
        json!({
            "Sys": {
                "wbs_no": "1",
                "name": "Sys",
                "mass": 12.5,
                "mass_properties": {"cg": 3.5}
            }
        })
    }

    #[test]
    fn build_then_export_round_trips_through_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut tree = ModelTree::new("Model");
        build_model(&mut tree, &sample_document()).unwrap();

        let out = dir.path().join("out.json");
        let component = select_component(&tree, None).unwrap();
        export_model(&tree, component, &out).unwrap();

        let written = read_document(&out).unwrap();
        assert_eq!(written, sample_document());

        // 4-space indentation
        let text = fs::read_to_string(&out).unwrap();
        assert!(text.contains("\n    \"wbs_no\""), "got: {}", text);
    }

    #[test]
    fn failed_build_leaves_the_tree_untouched() {
        let mut tree = ModelTree::new("Model");
        let err = build_model(&mut tree, &json!(["not", "an", "object"])).unwrap_err();
        assert!(matches!(err, SyncError::Parse(_)));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn update_writes_the_audit_log() {
        let dir = tempfile::tempdir().unwrap();
        let mut tree = ModelTree::new("Model");
        build_model(&mut tree, &sample_document()).unwrap();

        let updated_path = dir.path().join("sys.json");
        let updated = json!({
            "Sys": {
                "wbs_no": "1",
                "name": "Sys",
                "mass": 15.0,
                "mass_properties": {"cg": 3.5}
            }
        });
        write_document(&updated_path, &updated).unwrap();

        let component = select_component(&tree, Some("Sys")).unwrap();
        let records = update_model(&mut tree, component, &updated, &updated_path).unwrap();
        assert_eq!(records.len(), 1);

        let audit = fs::read_to_string(dir.path().join("sys-ModifiedValues.txt")).unwrap();
        assert_eq!(audit, "Changed 'Sys::Sys::mass' from '12.5' to '15.0'\n\n");
    }

    #[test]
    fn clean_update_writes_an_empty_audit_log() {
        let dir = tempfile::tempdir().unwrap();
        let mut tree = ModelTree::new("Model");
        build_model(&mut tree, &sample_document()).unwrap();

        let updated_path = dir.path().join("sys.json");
        let component = select_component(&tree, None).unwrap();
        let records = update_model(&mut tree, component, &sample_document(), &updated_path).unwrap();
        assert!(records.is_empty());

        let audit = fs::read_to_string(dir.path().join("sys-ModifiedValues.txt")).unwrap();
        assert!(audit.is_empty());
    }

    #[test]
    fn failed_update_cancels_the_session() {
        let mut tree = ModelTree::new("Model");
        build_model(&mut tree, &sample_document()).unwrap();
        let before = tree.clone();

        let component = select_component(&tree, None).unwrap();
        let err = update_model(
            &mut tree,
            component,
            &json!({"Wrong": {}}),
            Path::new("/nonexistent/never-written.json"),
        )
        .unwrap_err();
        assert!(matches!(err, SyncError::Parse(_)));
        assert_eq!(tree, before);
    }

    #[test]
    fn model_files_round_trip_with_their_profile() {
        let dir = tempfile::tempdir().unwrap();
        let mut tree = ModelTree::new("Model");
        import_stereotypes(&mut tree, &json!({"Sys": {"wbs_no": "1"}})).unwrap();
        build_model(&mut tree, &sample_document()).unwrap();

        let path = dir.path().join("model.json");
        save_model(&path, &tree).unwrap();
        let loaded = load_model(&path).unwrap();
        assert_eq!(loaded, tree);
        assert!(loaded.profile().is_some());
    }

    #[test]
    fn select_component_rejects_unknown_names() {
        let mut tree = ModelTree::new("Model");
        build_model(&mut tree, &sample_document()).unwrap();

        assert!(select_component(&tree, Some("Sys")).is_ok());
        let err = select_component(&tree, Some("Nope")).unwrap_err();
        assert!(matches!(err, SyncError::Lookup(_)));
    }

    #[test]
    fn audit_path_is_named_after_the_document() {
        assert_eq!(
            audit_path(Path::new("/tmp/adh/sys.json")),
            PathBuf::from("/tmp/adh/sys-ModifiedValues.txt")
        );
    }
}
