use archsync_array::{flatten, name_indices, reshape, shape, split_indexed_name};
use serde_json::json;

#[test]
fn test_flatten_shape_reshape_agree_with_naming() {
    let arr = json!([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
    let dims = shape(&arr);
    let flat = flatten(arr.as_array().unwrap());

    // One name per flattened element, in the same order
    let names: Vec<String> = name_indices("thrust", &dims).collect();
    assert_eq!(names.len(), flat.len());
    assert_eq!(names[0], "thrust__0__0");
    assert_eq!(names[5], "thrust__1__2");

    // The names carry enough to rebuild the shape
    let mut max = vec![0usize; dims.len()];
    for name in &names {
        let (base, indices) = split_indexed_name(name);
        assert_eq!(base, "thrust");
        for (axis, index) in indices.iter().enumerate() {
            max[axis] = max[axis].max(*index);
        }
    }
    let rebuilt_dims: Vec<usize> = max.iter().map(|m| m + 1).collect();
    assert_eq!(rebuilt_dims, dims);

    assert_eq!(reshape(&flat, &rebuilt_dims).unwrap(), arr);
}

#[test]
fn test_single_element_array_keeps_one_name() {
    let arr = json!([9.81]);
    let dims = shape(&arr);
    let names: Vec<String> = name_indices("g", &dims).collect();
    assert_eq!(names, vec!["g__0"]);
}
