//! Stereotype profiles.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One stereotype in a profile.
///
/// `parent` names the stereotype this one specializes; `None` for
/// stereotypes hanging directly off the profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stereotype {
    pub name: String,
    pub description: Option<String>,
    pub parent: Option<String>,
}

/// A named collection of stereotypes, looked up by name.
///
/// Insertion order is kept so a re-serialized profile reads in the same
/// order it was imported in. The first definition of a name wins; later
/// ones are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    name: String,
    stereotypes: IndexMap<String, Stereotype>,
}

impl Profile {
    pub fn new(name: &str) -> Profile {
        Profile {
            name: name.to_owned(),
            stereotypes: IndexMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a stereotype. Returns `false` when the name was already
    /// taken, in which case the earlier definition stays.
    pub fn add(&mut self, stereotype: Stereotype) -> bool {
        if self.stereotypes.contains_key(&stereotype.name) {
            return false;
        }
        self.stereotypes
            .insert(stereotype.name.clone(), stereotype);
        true
    }

    pub fn get(&self, name: &str) -> Option<&Stereotype> {
        self.stereotypes.get(name)
    }

    pub fn len(&self) -> usize {
        self.stereotypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stereotypes.is_empty()
    }

    /// Stereotypes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Stereotype> {
        self.stereotypes.values()
    }
}
