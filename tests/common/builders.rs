//! Builders for test inputs

use serde_json::{json, Value};
use typed_array_node::pipeline::SlotValue;

/// `{"samples": [[1,2,3],[4,5,6]]}`
pub fn nested_samples() -> Value {
    json!({"samples": [[1, 2, 3], [4, 5, 6]]})
}

/// Object with one member holding `rows`.
pub fn object_with(member: &str, rows: &[Vec<f64>]) -> Value {
    let mut map = serde_json::Map::new();
    map.insert(member.to_string(), json!(rows));
    Value::Object(map)
}

/// Input bindings for all three slots.
pub fn inputs(object: Value, member: &str, index: f64) -> Vec<(usize, SlotValue)> {
    vec![
        (0, SlotValue::from(object)),
        (1, SlotValue::from(member)),
        (2, SlotValue::from(index)),
    ]
}
