//! Nested-array utilities for architecture documents.
//!
//! Multidimensional parameters travel through JSON as nested arrays. This
//! crate flattens them to a scalar row, records their shape, rebuilds the
//! nesting from a flat row, and generates the positional property names
//! (`base__i__j`) that stand in for array elements in a model tree.
//!
//! # Example
//!
//! ```
//! use archsync_array::{flatten, shape, reshape};
//! use serde_json::json;
//!
//! let arr = json!([[1, 2, 3], [4, 5, 6]]);
//! let dims = shape(&arr);
//! assert_eq!(dims, vec![2, 3]);
//!
//! let flat = flatten(arr.as_array().unwrap());
//! assert_eq!(flat.len(), 6);
//!
//! let rebuilt = reshape(&flat, &dims).unwrap();
//! assert_eq!(rebuilt, arr);
//! ```

use serde_json::Value;
use thiserror::Error;

pub mod names;
pub use names::{indexed_name, name_indices, split_indexed_name, NameIndices};

/// Flatten nested arrays into a single row of scalars, depth first.
///
/// Non-array elements are appended as-is, so a row of mixed depth still
/// flattens left to right.
///
/// # Example
///
/// ```
/// use archsync_array::flatten;
/// use serde_json::json;
///
/// let arr = json!([1, [2, [3, 4]], 5]);
/// let flat = flatten(arr.as_array().unwrap());
/// assert_eq!(flat, vec![json!(1), json!(2), json!(3), json!(4), json!(5)]);
/// ```
pub fn flatten(items: &[Value]) -> Vec<Value> {
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Value::Array(inner) => out.extend(flatten(inner)),
            other => out.push(other.clone()),
        }
    }
    out
}

/// Measure the shape of a nested array by descending its first element.
///
/// Each array level contributes its length; the descent follows element 0
/// only, so a ragged array reports the shape of its first branch. A
/// non-array value has the empty shape; an empty array ends the descent
/// with a zero-length axis.
///
/// # Example
///
/// ```
/// use archsync_array::shape;
/// use serde_json::json;
///
/// assert_eq!(shape(&json!([[1, 2], [3, 4], [5, 6]])), vec![3, 2]);
/// assert_eq!(shape(&json!(42)), Vec::<usize>::new());
/// assert_eq!(shape(&json!([])), vec![0]);
/// ```
pub fn shape(value: &Value) -> Vec<usize> {
    match value {
        Value::Array(items) => {
            let mut dims = vec![items.len()];
            if let Some(first) = items.first() {
                dims.extend(shape(first));
            }
            dims
        }
        _ => Vec::new(),
    }
}

/// Rebuild a nested array from a flat row and a shape.
///
/// The empty shape returns the single scalar itself.
///
/// # Errors
///
/// Returns [`ShapeError::Mismatch`] when the element count does not equal
/// the product of the shape, which happens when a ragged array was measured
/// through [`shape`].
///
/// # Example
///
/// ```
/// use archsync_array::reshape;
/// use serde_json::json;
///
/// let flat = vec![json!(1), json!(2), json!(3), json!(4)];
/// let rebuilt = reshape(&flat, &[2, 2]).unwrap();
/// assert_eq!(rebuilt, json!([[1, 2], [3, 4]]));
///
/// assert!(reshape(&flat, &[3, 2]).is_err());
/// ```
pub fn reshape(flat: &[Value], dims: &[usize]) -> Result<Value, ShapeError> {
    let expected: usize = dims.iter().product();
    if expected != flat.len() {
        return Err(ShapeError::Mismatch {
            dims: dims.to_vec(),
            expected,
            actual: flat.len(),
        });
    }
    Ok(reshape_block(flat, dims))
}

fn reshape_block(flat: &[Value], dims: &[usize]) -> Value {
    match dims {
        [] => flat[0].clone(),
        [_] => Value::Array(flat.to_vec()),
        [first, rest @ ..] => {
            if *first == 0 {
                return Value::Array(Vec::new());
            }
            let stride = flat.len() / first;
            let mut out = Vec::with_capacity(*first);
            if stride == 0 {
                // A later axis is zero, so every block is empty
                for _ in 0..*first {
                    out.push(reshape_block(&[], rest));
                }
            } else {
                for chunk in flat.chunks(stride) {
                    out.push(reshape_block(chunk, rest));
                }
            }
            Value::Array(out)
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ShapeError {
    #[error("cannot arrange {actual} elements into shape {dims:?} ({expected} expected)")]
    Mismatch {
        dims: Vec<usize>,
        expected: usize,
        actual: usize,
    },
}
