//! Positional property names for flattened arrays.
//!
//! An element at index `(i, j)` of an array-valued field `base` is stored
//! under the name `base__i__j`. Index groups are separated by a double
//! underscore and ordered outermost axis first.

/// Iterator over the positional names of every element of a shape, in
/// row-major order (last axis varies fastest).
///
/// The empty shape yields the bare base name once; a shape with a zero
/// axis yields nothing.
#[derive(Debug, Clone)]
pub struct NameIndices {
    base: String,
    dims: Vec<usize>,
    cursor: Option<Vec<usize>>,
}

/// Create a [`NameIndices`] iterator for `base` over `dims`.
///
/// # Example
///
/// ```
/// use archsync_array::name_indices;
///
/// let names: Vec<String> = name_indices("mass", &[2, 2]).collect();
/// assert_eq!(names, vec!["mass__0__0", "mass__0__1", "mass__1__0", "mass__1__1"]);
///
/// let bare: Vec<String> = name_indices("mass", &[]).collect();
/// assert_eq!(bare, vec!["mass"]);
/// ```
pub fn name_indices(base: &str, dims: &[usize]) -> NameIndices {
    let cursor = if dims.contains(&0) {
        None
    } else {
        Some(vec![0; dims.len()])
    };
    NameIndices {
        base: base.to_string(),
        dims: dims.to_vec(),
        cursor,
    }
}

impl Iterator for NameIndices {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let indices = self.cursor.as_mut()?;
        let name = indexed_name(&self.base, indices);

        // Advance the index tuple like an odometer, last axis first
        let mut done = true;
        for axis in (0..indices.len()).rev() {
            indices[axis] += 1;
            if indices[axis] < self.dims[axis] {
                done = false;
                break;
            }
            indices[axis] = 0;
        }
        if done {
            self.cursor = None;
        }
        Some(name)
    }
}

/// Format a positional name from a base and an index tuple.
pub fn indexed_name(base: &str, indices: &[usize]) -> String {
    let mut name = String::from(base);
    for index in indices {
        name.push_str("__");
        name.push_str(&index.to_string());
    }
    name
}

/// Split a positional name into its base and index tuple.
///
/// The index tuple is the maximal run of all-digit `__n` groups at the end
/// of the name. A name without such a run, including one whose trailing
/// group mixes digits and letters, is returned whole with no indices.
///
/// # Example
///
/// ```
/// use archsync_array::split_indexed_name;
///
/// assert_eq!(split_indexed_name("mass__0__12"), ("mass", vec![0, 12]));
/// assert_eq!(split_indexed_name("dry_mass"), ("dry_mass", vec![]));
/// assert_eq!(split_indexed_name("tank__a"), ("tank__a", vec![]));
/// assert_eq!(split_indexed_name("leg__2__b"), ("leg__2__b", vec![]));
/// ```
pub fn split_indexed_name(name: &str) -> (&str, Vec<usize>) {
    let mut base = name;
    let mut indices = Vec::new();
    while let Some(pos) = base.rfind("__") {
        let group = &base[pos + 2..];
        if group.is_empty() || !group.bytes().all(|b| b.is_ascii_digit()) {
            break;
        }
        match group.parse::<usize>() {
            Ok(index) => {
                indices.push(index);
                base = &base[..pos];
            }
            Err(_) => break,
        }
    }
    indices.reverse();
    (base, indices)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_indices_row_major() {
        let names: Vec<String> = name_indices("p", &[2, 3]).collect();
        assert_eq!(
            names,
            vec!["p__0__0", "p__0__1", "p__0__2", "p__1__0", "p__1__1", "p__1__2"]
        );
    }

    #[test]
    fn test_name_indices_single_axis() {
        let names: Vec<String> = name_indices("p", &[3]).collect();
        assert_eq!(names, vec!["p__0", "p__1", "p__2"]);
    }

    #[test]
    fn test_name_indices_empty_shape() {
        let names: Vec<String> = name_indices("p", &[]).collect();
        assert_eq!(names, vec!["p"]);
    }

    #[test]
    fn test_name_indices_zero_axis() {
        let names: Vec<String> = name_indices("p", &[0]).collect();
        assert!(names.is_empty());

        let names: Vec<String> = name_indices("p", &[2, 0, 3]).collect();
        assert!(names.is_empty());
    }

    #[test]
    fn test_name_indices_count_matches_product() {
        let dims = [2, 3, 4];
        let names: Vec<String> = name_indices("x", &dims).collect();
        assert_eq!(names.len(), 24);

        // All names distinct
        let mut sorted = names.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), names.len());
    }

    #[test]
    fn test_indexed_name() {
        assert_eq!(indexed_name("p", &[]), "p");
        assert_eq!(indexed_name("p", &[0]), "p__0");
        assert_eq!(indexed_name("p", &[1, 2]), "p__1__2");
    }

    #[test]
    fn test_split_indexed_name() {
        assert_eq!(split_indexed_name("p__0"), ("p", vec![0]));
        assert_eq!(split_indexed_name("p__1__2"), ("p", vec![1, 2]));
        assert_eq!(split_indexed_name("p"), ("p", vec![]));
        assert_eq!(split_indexed_name("dry_mass"), ("dry_mass", vec![]));
    }

    #[test]
    fn test_split_indexed_name_mixed_groups() {
        // Only the trailing digit run counts as indices
        assert_eq!(split_indexed_name("a__b__1"), ("a__b", vec![1]));
        assert_eq!(split_indexed_name("a__1__b"), ("a__1__b", vec![]));
        assert_eq!(split_indexed_name("a__"), ("a__", vec![]));
    }

    #[test]
    fn test_split_roundtrip() {
        for name in name_indices("base", &[2, 2]) {
            let (base, indices) = split_indexed_name(&name);
            assert_eq!(indexed_name(base, &indices), name);
        }
    }
}
