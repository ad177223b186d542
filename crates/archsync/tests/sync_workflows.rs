//! End-to-end workflows over real files: profile import, build, update
//! with its audit log, and both export views.

use std::fs;
use std::path::Path;

use serde_json::{json, Value};

use archsync::ops;
use archsync_model::ModelTree;

/// An architecture document in exported form: sub-components sit
/// directly under their parent and requirements carry structured
/// fields. Every value survives a build/export round trip unchanged.
fn canonical_document() -> Value {
    json!({
        "Sys": {
            "wbs_no": "1",
            "name": "Sys",
            "description": "Demonstrator",
            "mass": 12.5,
            "thrust": [400.0, 450.0],
            "mass_properties": {
                "cg": 3.5,
                "inertia": [[1.0, 0.0], [0.0, 1.0]]
            },
            "Motor": {
                "wbs_no": "1.1",
                "name": "Motor",
                "mass": 3.0
            },
            "requirements": [
                {
                    "name": "R1",
                    "description": "total thrust",
                    "value": {"value": 400.0, "units": "N"}
                }
            ]
        }
    })
}

fn edited_document() -> Value {
    let mut document = canonical_document();
    document["Sys"]["mass"] = json!(15.0);
    document["Sys"]["requirements"][0]["value"]["value"] = json!(425.0);
    document
}

#[test]
fn canonical_document_survives_build_and_export() {
    let dir = tempfile::tempdir().unwrap();
    let mut tree = ModelTree::new("Model");
    ops::build_model(&mut tree, &canonical_document()).unwrap();

    let out = dir.path().join("exported.json");
    let component = ops::select_component(&tree, None).unwrap();
    ops::export_model(&tree, component, &out).unwrap();

    assert_eq!(ops::read_document(&out).unwrap(), canonical_document());
}

#[test]
fn edited_values_flow_back_into_the_model() {
    let dir = tempfile::tempdir().unwrap();
    let mut tree = ModelTree::new("Model");
    ops::build_model(&mut tree, &canonical_document()).unwrap();

    let updated_path = dir.path().join("sys.json");
    ops::write_document(&updated_path, &edited_document()).unwrap();

    // First run: two changes, both patched
    let component = ops::select_component(&tree, Some("Sys")).unwrap();
    let updated = ops::read_document(&updated_path).unwrap();
    let records = ops::update_model(&mut tree, component, &updated, &updated_path).unwrap();
    assert_eq!(records.len(), 2);

    let audit = fs::read_to_string(dir.path().join("sys-ModifiedValues.txt")).unwrap();
    assert_eq!(
        audit,
        "Changed 'Sys::Sys::mass' from '12.5' to '15.0'\n\n\
         Changed 'Sys::Requirements::requirements__0::value::value' from '400.0' to '425.0'\n\n"
    );

    // The export now matches the edited document
    let out = dir.path().join("exported.json");
    ops::export_model(&tree, component, &out).unwrap();
    assert_eq!(ops::read_document(&out).unwrap(), edited_document());

    // Second run: nothing left to change, the audit log is rewritten empty
    let records = ops::update_model(&mut tree, component, &updated, &updated_path).unwrap();
    assert!(records.is_empty(), "unexpected records: {:?}", records);
    let audit = fs::read_to_string(dir.path().join("sys-ModifiedValues.txt")).unwrap();
    assert!(audit.is_empty());
}

#[test]
fn instance_view_keeps_values_and_nests_parts() {
    let dir = tempfile::tempdir().unwrap();
    let mut tree = ModelTree::new("Model");
    ops::build_model(&mut tree, &canonical_document()).unwrap();

    let out = dir.path().join("instance.json");
    let component = ops::select_component(&tree, None).unwrap();
    ops::export_instance(&tree, component, &out).unwrap();

    assert_eq!(
        ops::read_document(&out).unwrap(),
        json!({
            "Sys": {
                "wbs_no": "1",
                "name": "Sys",
                "description": "Demonstrator",
                "mass": 12.5,
                "thrust": [400.0, 450.0],
                "Motor": {
                    "wbs_no": "1.1",
                    "name": "Motor",
                    "mass": 3.0
                }
            }
        })
    );
}

#[test]
fn model_files_carry_the_whole_flow_between_runs() {
    let dir = tempfile::tempdir().unwrap();
    let model_path = dir.path().join("model.json");

    // Run 1: import the stereotype taxonomy into a fresh model file
    let stereotypes = json!({
        "Sys": {
            "wbs_no": "1",
            "description": "Top level system",
            "components": {"Motor": {"wbs_no": "1.1"}}
        }
    });
    let mut tree = ops::load_or_new(&model_path).unwrap();
    let count = ops::import_stereotypes(&mut tree, &stereotypes).unwrap();
    assert_eq!(count, 2);
    ops::save_model(&model_path, &tree).unwrap();

    // Run 2: build the architecture; the stored profile is applied
    let mut tree = ops::load_or_new(&model_path).unwrap();
    ops::build_model(&mut tree, &canonical_document()).unwrap();
    let sys_block = tree.find_by_qualified_name("Sys::Sys").unwrap();
    assert_eq!(tree.stereotype(sys_block), Some("Sys"));
    let motor_block = tree
        .find_by_qualified_name("Sys::Architecture::Motor::Motor")
        .unwrap();
    assert_eq!(tree.stereotype(motor_block), Some("Motor"));
    ops::save_model(&model_path, &tree).unwrap();

    // Run 3: update from an edited document
    let updated_path = dir.path().join("sys.json");
    ops::write_document(&updated_path, &edited_document()).unwrap();
    let mut tree = ops::load_model(&model_path).unwrap();
    let component = ops::select_component(&tree, None).unwrap();
    let updated = ops::read_document(&updated_path).unwrap();
    let records = ops::update_model(&mut tree, component, &updated, &updated_path).unwrap();
    assert_eq!(records.len(), 2);
    ops::save_model(&model_path, &tree).unwrap();

    // Run 4: export from the stored model and compare
    let tree = ops::load_model(&model_path).unwrap();
    let component = ops::select_component(&tree, None).unwrap();
    let out = dir.path().join("exported.json");
    ops::export_model(&tree, component, &out).unwrap();
    assert_eq!(ops::read_document(&out).unwrap(), edited_document());
}

#[test]
fn missing_files_surface_as_io_errors() {
    let err = ops::read_document(Path::new("/nonexistent/adh.json")).unwrap_err();
    assert!(matches!(err, archsync::SyncError::Io(_)));
    let err = ops::load_model(Path::new("/nonexistent/model.json")).unwrap_err();
    assert!(matches!(err, archsync::SyncError::Io(_)));
}
