use archsync_model::{Literal, ModelTree, NodeKind, Profile, Stereotype};

fn component_tree() -> ModelTree {
    let mut tree = ModelTree::new("Model");
    let pkg = tree.create(NodeKind::Package, "Propulsion", tree.root());
    let block = tree.create(NodeKind::Block, "Propulsion", pkg);
    let arch = tree.create(NodeKind::Package, "Architecture", pkg);
    let reqs = tree.create(NodeKind::Package, "Requirements", pkg);

    let wbs = tree.create(NodeKind::ValueProperty, "wbs_no", block);
    tree.set_value(wbs, Literal::Str("1.2".to_owned())).unwrap();

    let motor_pkg = tree.create(NodeKind::Package, "Motor", arch);
    let motor = tree.create(NodeKind::Block, "Motor", motor_pkg);
    let part = tree.create(NodeKind::PartProperty, "Motor", block);
    tree.set_type_block(part, motor).unwrap();

    let req = tree.create(NodeKind::Requirement, "R1", reqs);
    tree.set_text(req, "(R1): thrust shall be 400.0 N").unwrap();
    tree
}

#[test]
fn test_store_survives_a_file_round_trip() {
    let mut tree = component_tree();
    let mut profile = Profile::new("ImportADHProfile");
    profile.add(Stereotype {
        name: "propulsion".to_owned(),
        description: Some("Makes thrust".to_owned()),
        parent: None,
    });
    tree.set_profile(profile);

    let text = serde_json::to_string_pretty(&tree).unwrap();
    let back: ModelTree = serde_json::from_str(&text).unwrap();
    back.validate().unwrap();
    assert_eq!(back, tree);

    // structure is addressable again after the reload
    let req = back
        .find_by_qualified_name("Propulsion::Requirements::R1")
        .unwrap();
    assert_eq!(back.text(req), Some("(R1): thrust shall be 400.0 N"));
    let part = back.find_by_qualified_name("Propulsion::Propulsion::Motor").unwrap();
    let motor = back.type_block(part).unwrap();
    assert_eq!(back.qualified_name(motor), "Propulsion::Architecture::Motor::Motor");
    assert_eq!(back.profile().unwrap().get("propulsion").unwrap().description.as_deref(), Some("Makes thrust"));
}

#[test]
fn test_cancelled_session_leaves_no_trace() {
    let mut tree = component_tree();
    let before = tree.clone();

    let session = tree.begin();
    let pkg = tree.find_by_qualified_name("Propulsion").unwrap();
    let extra = tree.create(NodeKind::Package, "Behavior", pkg);
    tree.create(NodeKind::Block, "Spin", extra);
    session.cancel(&mut tree);

    assert_eq!(tree, before);
    assert!(tree.find_by_qualified_name("Propulsion::Behavior").is_none());
}
