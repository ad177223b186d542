//! Classification of document entries.
//!
//! The builder and the diff both walk documents key by key and dispatch
//! on the same four entry shapes, so the rules live here.

use serde_json::Value;

/// Keys that route their content into a dedicated section package
/// instead of an ordinary nested object.
pub(crate) const RESERVED_KEYS: [&str; 4] =
    ["components", "requirements", "performance", "behavior"];

/// Keys that describe a component itself rather than nest content.
pub(crate) const DESCRIPTIVE_KEYS: [&str; 3] = ["wbs_no", "name", "description"];

/// Shape of a single `key: value` pair in a document object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EntryKind {
    /// A scalar leaf destined for a value property.
    Scalar,
    /// An object without a WBS number, plain nested data.
    Structure,
    /// An object with a `wbs_no` key, a system component.
    Component,
    /// A list, or any value under a reserved key.
    Group,
}

/// Classify one entry. A reserved key always groups, whatever its value
/// holds; otherwise the value's own shape decides.
pub(crate) fn classify(key: &str, value: &Value) -> EntryKind {
    if RESERVED_KEYS.contains(&key) {
        return EntryKind::Group;
    }
    match value {
        Value::Object(fields) => {
            if fields.contains_key("wbs_no") {
                EntryKind::Component
            } else {
                EntryKind::Structure
            }
        }
        Value::Array(_) => EntryKind::Group,
        _ => EntryKind::Scalar,
    }
}

/// Section package a grouped entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Section {
    Architecture,
    Requirements,
    Performance,
    Behavior,
}

impl Section {
    pub(crate) fn for_key(key: &str) -> Section {
        match key {
            "requirements" => Section::Requirements,
            "performance" => Section::Performance,
            "behavior" => Section::Behavior,
            _ => Section::Architecture,
        }
    }

    /// Name of the package that holds the section's content.
    pub(crate) fn package_name(self) -> &'static str {
        match self {
            Section::Architecture => "Architecture",
            Section::Requirements => "Requirements",
            Section::Performance => "Performance",
            Section::Behavior => "Behavior",
        }
    }

    /// The named sections sit beside the component's own package, so the
    /// search for them starts one level up. Architecture content stays
    /// with the current parent.
    pub(crate) fn searches_owner(self) -> bool {
        !matches!(self, Section::Architecture)
    }

    pub(crate) fn is_requirements(self) -> bool {
        matches!(self, Section::Requirements)
    }

    /// Path segment the diff appends when it descends into the section.
    pub(crate) fn path_segment(self) -> Option<&'static str> {
        match self {
            Section::Architecture => None,
            Section::Requirements => Some("::Requirements"),
            Section::Performance => Some("::Performance"),
            Section::Behavior => Some("::Behavior"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalars_and_plain_objects() {
        assert_eq!(classify("mass", &json!(12.5)), EntryKind::Scalar);
        assert_eq!(classify("name", &json!("Sys")), EntryKind::Scalar);
        assert_eq!(classify("ok", &json!(true)), EntryKind::Scalar);
        assert_eq!(
            classify("mass_properties", &json!({"cg": 1.0})),
            EntryKind::Structure
        );
    }

    #[test]
    fn wbs_number_marks_a_component() {
        assert_eq!(
            classify("Motor", &json!({"wbs_no": "1.1", "name": "Motor"})),
            EntryKind::Component
        );
        // the key alone is not enough
        assert_eq!(
            classify("Motor", &json!({"name": "Motor"})),
            EntryKind::Structure
        );
    }

    #[test]
    fn lists_group() {
        assert_eq!(classify("thrust", &json!([1, 2, 3])), EntryKind::Group);
        assert_eq!(classify("thrust", &json!([])), EntryKind::Group);
    }

    #[test]
    fn reserved_keys_group_regardless_of_value() {
        assert_eq!(
            classify("components", &json!({"Motor": {"wbs_no": "1.1"}})),
            EntryKind::Group
        );
        assert_eq!(classify("requirements", &json!([])), EntryKind::Group);
        assert_eq!(classify("performance", &json!(3.5)), EntryKind::Group);
    }

    #[test]
    fn sections_map_from_keys() {
        assert_eq!(Section::for_key("requirements"), Section::Requirements);
        assert_eq!(Section::for_key("performance"), Section::Performance);
        assert_eq!(Section::for_key("behavior"), Section::Behavior);
        assert_eq!(Section::for_key("components"), Section::Architecture);
        assert_eq!(Section::for_key("thrust"), Section::Architecture);
    }

    #[test]
    fn only_architecture_stays_with_the_parent() {
        assert!(!Section::Architecture.searches_owner());
        assert!(Section::Requirements.searches_owner());
        assert!(Section::Performance.searches_owner());
        assert!(Section::Behavior.searches_owner());
        assert_eq!(Section::Architecture.path_segment(), None);
        assert_eq!(Section::Behavior.path_segment(), Some("::Behavior"));
    }
}
