//! ArrayItemToTypedArrayNode: converts one item of an array-of-arrays member
//! into a typed byte buffer.
//!
//! Given `object`, `member` and `index`, the node looks up `object[member]`,
//! picks the item at `index` (wrapped modulo the array length) and packs that
//! item's entries into a contiguous buffer of the configured [`ElementType`].
//!
//! Validation failures are reported through the context's diagnostics sink and
//! leave the previously published buffer in place.

use crate::config::NodeState;
use crate::control::ElementTypeControl;
use crate::error::{ConversionError, NodeError, Result};
use crate::pipeline::node::{EvalStatus, NodeContext, NodePlugin};
use crate::pipeline::packet::{ConfigValue, SlotValue, TypedBuffer};
use crate::pipeline::port::{PortDescriptor, PortKind};
use crate::types::{coerce_number, ElementType};
use serde_json::Value;
use std::sync::Arc;

/// Input slot of the source object.
pub const SLOT_OBJECT: usize = 0;
/// Input slot of the member name.
pub const SLOT_MEMBER: usize = 1;
/// Input slot of the item index.
pub const SLOT_INDEX: usize = 2;
/// Output slot of the typed buffer.
pub const SLOT_ARRAY: usize = 0;

/// Config key accepted by `on_config_change`.
pub const CONFIG_DATATYPE: &str = "datatype";

const NAME: &str = "Array item to typed array";

const DESCRIPTION: &str = "Emits a typed array representation of the specified item in the \
                           named array member of the supplied object.";

static PORTS: &[PortDescriptor] = &[
    PortDescriptor::input("object", PortKind::Object, "Input object."),
    PortDescriptor::input("member", PortKind::Text, "Name of the array to be accessed."),
    PortDescriptor::input("index", PortKind::Number, "Index of the array item to be converted."),
    PortDescriptor::output(
        "array",
        PortKind::TypedArray,
        "The typed array representation of the specified array item.",
    ),
];

/// Floor the index and clamp it to zero. NaN becomes zero.
///
/// The result stays an `f64` so indices beyond the integer range still wrap
/// correctly against the array length. `+inf` is kept and selects no item.
pub fn normalize_index(value: f64) -> f64 {
    let floored = value.floor();
    if floored.is_nan() || floored <= 0.0 {
        0.0
    } else {
        floored
    }
}

/// Conversion node state.
pub struct ArrayItemToTypedArrayNode {
    object: Option<Arc<Value>>,
    member: Option<String>,
    /// Working index, already floored and clamped.
    index: f64,
    state: NodeState,
    array: TypedBuffer,
    dirty: bool,
}

impl ArrayItemToTypedArrayNode {
    pub fn new() -> Self {
        Self::from_state(NodeState::default())
    }

    /// Recreate a node from persisted state.
    pub fn from_state(state: NodeState) -> Self {
        Self {
            object: None,
            member: None,
            index: 0.0,
            state,
            array: TypedBuffer::empty(),
            dirty: true,
        }
    }

    pub fn with_element_type(element_type: ElementType) -> Self {
        Self::from_state(NodeState {
            datatype: element_type,
        })
    }

    // ── Inputs ──

    pub fn set_object(&mut self, object: Option<Arc<Value>>) {
        self.object = object;
        self.dirty = true;
    }

    pub fn set_member(&mut self, member: Option<String>) {
        self.member = member;
        self.dirty = true;
    }

    pub fn set_index(&mut self, index: f64) {
        self.index = normalize_index(index);
        self.dirty = true;
    }

    /// The working index.
    pub fn index(&self) -> f64 {
        self.index
    }

    // ── Configuration ──

    pub fn element_type(&self) -> ElementType {
        self.state.datatype
    }

    /// Replace the element type.
    ///
    /// Does not convert anything; the next evaluation picks it up.
    pub fn set_element_type(&mut self, element_type: ElementType) {
        if self.state.datatype != element_type {
            tracing::debug!(
                "{}: element type {} -> {}",
                NAME,
                self.state.datatype,
                element_type
            );
        }
        self.state.datatype = element_type;
        self.dirty = true;
    }

    /// Replace the element type by numeric code. Unknown codes are rejected
    /// and leave the configuration untouched.
    pub fn set_element_type_code(&mut self, code: i64) -> Result<()> {
        let element_type = ElementType::from_code(code).ok_or(NodeError::InvalidElementType(code))?;
        self.set_element_type(element_type);
        Ok(())
    }

    /// Persistable state.
    pub fn state(&self) -> &NodeState {
        &self.state
    }

    /// Restore persisted state, e.g. after the node was re-created.
    pub fn restore_state(&mut self, state: NodeState) {
        self.set_element_type(state.datatype);
    }

    /// Restore hook: push the current element type into a (re)created control.
    pub fn state_changed(&self, control: Option<&mut dyn ElementTypeControl>) {
        if let Some(control) = control {
            control.show_selection(self.state.datatype);
        }
    }

    // ── Evaluation ──

    /// The currently published buffer.
    pub fn array(&self) -> &TypedBuffer {
        &self.array
    }

    /// Validate inputs and build the buffer they describe.
    ///
    /// Returns `Ok(None)` while `object` or `member` is unbound.
    pub fn convert(&self) -> std::result::Result<Option<TypedBuffer>, ConversionError> {
        let (object, member) = match (&self.object, &self.member) {
            (Some(object), Some(member)) => (object, member),
            _ => return Ok(None),
        };

        let outer = object
            .as_object()
            .and_then(|map| map.get(member))
            .ok_or_else(|| ConversionError::UnknownMember {
                member: member.clone(),
            })?;

        let outer = outer.as_array().ok_or_else(|| ConversionError::NotAnArray {
            member: member.clone(),
        })?;

        // An empty outer array or an infinite index has no item to select.
        let effective = self.index.rem_euclid(outer.len() as f64);
        let item = if effective.is_finite() {
            outer.get(effective as usize)
        } else {
            None
        };

        let entries = item
            .and_then(Value::as_array)
            .ok_or_else(|| ConversionError::ElementNotArray {
                member: member.clone(),
            })?;

        Ok(Some(TypedBuffer::encode(
            self.state.datatype,
            entries.iter().map(coerce_number),
        )))
    }

    /// Run one evaluation pass.
    pub fn evaluate(&mut self, ctx: &mut NodeContext) -> EvalStatus {
        self.dirty = false;

        match self.convert() {
            Ok(None) => EvalStatus::Idle,
            Ok(Some(buffer)) => {
                let bytes = buffer.byte_len();
                tracing::debug!(
                    node = %ctx.node_id,
                    pass = ctx.pass,
                    "{}: {} bytes as {}",
                    NAME,
                    bytes,
                    self.state.datatype
                );
                self.array = buffer;
                EvalStatus::Converted { bytes }
            }
            Err(err) => {
                ctx.report(NAME, err.to_string());
                EvalStatus::Failed(err)
            }
        }
    }
}

impl Default for ArrayItemToTypedArrayNode {
    fn default() -> Self {
        Self::new()
    }
}

impl NodePlugin for ArrayItemToTypedArrayNode {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        DESCRIPTION
    }

    fn ports(&self) -> &[PortDescriptor] {
        PORTS
    }

    fn reset(&mut self) {
        self.array = TypedBuffer::empty();
        self.object = None;
        self.member = None;
        self.index = 0.0;
        self.dirty = true;
    }

    fn update_input(&mut self, slot: usize, value: SlotValue) {
        match (slot, value) {
            (SLOT_OBJECT, SlotValue::Object(object)) => self.set_object(Some(object)),
            (SLOT_OBJECT, SlotValue::Empty) => self.set_object(None),
            (SLOT_MEMBER, SlotValue::Text(member)) => self.set_member(Some(member)),
            (SLOT_MEMBER, SlotValue::Empty) => self.set_member(None),
            (SLOT_INDEX, SlotValue::Number(index)) => self.set_index(index),
            (SLOT_INDEX, SlotValue::Empty) => self.set_index(0.0),
            (slot, value) => {
                tracing::warn!(
                    "{}: ignoring {} value on input slot {}",
                    NAME,
                    value.kind_name(),
                    slot
                );
            }
        }
    }

    fn needs_evaluation(&self) -> bool {
        self.dirty
    }

    fn evaluate(&mut self, ctx: &mut NodeContext) -> EvalStatus {
        ArrayItemToTypedArrayNode::evaluate(self, ctx)
    }

    fn output(&self, slot: usize) -> Option<SlotValue> {
        match slot {
            SLOT_ARRAY => Some(SlotValue::Buffer(self.array.clone())),
            _ => None,
        }
    }

    fn on_config_change(&mut self, key: &str, value: &ConfigValue) {
        match key {
            CONFIG_DATATYPE => {
                let element_type = value
                    .as_int()
                    .and_then(ElementType::from_code)
                    .or_else(|| value.as_str().and_then(ElementType::from_label));
                match element_type {
                    Some(ty) => self.set_element_type(ty),
                    None => tracing::warn!("{}: invalid datatype {:?}", NAME, value),
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::diagnostics::{Diagnostic, DiagnosticSink};
    use crate::pipeline::id::NodeId;
    use mockall::predicate::function;
    use serde_json::json;

    mockall::mock! {
        Sink {}
        impl DiagnosticSink for Sink {
            fn report(&self, diagnostic: Diagnostic);
        }
    }

    fn quiet_sink() -> MockSink {
        let mut sink = MockSink::new();
        sink.expect_report().never();
        sink
    }

    fn wired(object: Value, member: &str, index: f64, ty: ElementType) -> ArrayItemToTypedArrayNode {
        let mut node = ArrayItemToTypedArrayNode::with_element_type(ty);
        node.set_object(Some(Arc::new(object)));
        node.set_member(Some(member.to_string()));
        node.set_index(index);
        node
    }

    #[test]
    fn test_normalize_index() {
        assert_eq!(normalize_index(1.9), 1.0);
        assert_eq!(normalize_index(-3.7), 0.0);
        assert_eq!(normalize_index(-0.0), 0.0);
        assert_eq!(normalize_index(f64::NAN), 0.0);
        assert_eq!(normalize_index(1e20), 1e20);
        assert_eq!(normalize_index(f64::INFINITY), f64::INFINITY);
    }

    #[test]
    fn test_defaults() {
        let node = ArrayItemToTypedArrayNode::new();
        assert_eq!(node.element_type(), ElementType::Float32);
        assert_eq!(node.index(), 0.0);
        assert!(node.array().is_untagged());
        assert_eq!(node.ports().len(), 4);
        assert!(node.description().starts_with("Emits a typed array"));
    }

    #[test]
    fn test_converts_selected_item() {
        let sink = quiet_sink();
        let mut node = wired(json!({"samples": [[1, 2, 3], [4, 5, 6]]}), "samples", 1.0, ElementType::Uint8);

        let status = node.evaluate(&mut NodeContext::new(NodeId(0), &sink));

        assert_eq!(status, EvalStatus::Converted { bytes: 3 });
        assert_eq!(node.array().as_bytes(), &[4, 5, 6]);
        assert_eq!(node.array().element_type(), Some(ElementType::Uint8));
        assert_eq!(node.array().stride(), Some(1));
    }

    #[test]
    fn test_unbound_inputs_are_idle() {
        let sink = quiet_sink();
        let mut node = ArrayItemToTypedArrayNode::new();
        node.set_member(Some("samples".into()));

        let status = node.evaluate(&mut NodeContext::new(NodeId(0), &sink));

        assert_eq!(status, EvalStatus::Idle);
        assert!(node.array().is_untagged());
    }

    #[test]
    fn test_unknown_member_reports_and_keeps_output() {
        let mut sink = MockSink::new();
        sink.expect_report()
            .with(function(|d: &Diagnostic| {
                d.message == "Cannot convert unknown member \"bogus\"." && d.node_id == NodeId(3)
            }))
            .times(1)
            .return_const(());

        let mut node = wired(json!({"samples": [[1, 2]]}), "samples", 0.0, ElementType::Uint8);
        let first = node.evaluate(&mut NodeContext::new(NodeId(3), &quiet_sink()));
        assert!(first.is_converted());
        let before = node.array().clone();

        node.set_member(Some("bogus".into()));
        let status = node.evaluate(&mut NodeContext::new(NodeId(3), &sink));

        assert!(matches!(status.error(), Some(ConversionError::UnknownMember { .. })));
        assert!(node.array().ptr_eq(&before));
    }

    #[test]
    fn test_member_not_an_array() {
        let mut sink = MockSink::new();
        sink.expect_report()
            .with(function(|d: &Diagnostic| d.message == "Object member \"count\" is not an array."))
            .times(1)
            .return_const(());

        let mut node = wired(json!({"count": 5}), "count", 0.0, ElementType::Int8);
        let status = node.evaluate(&mut NodeContext::new(NodeId(0), &sink));

        assert_eq!(
            status,
            EvalStatus::Failed(ConversionError::NotAnArray {
                member: "count".into()
            })
        );
        assert!(node.array().is_untagged());
    }

    #[test]
    fn test_flat_array_is_element_not_array() {
        let mut sink = MockSink::new();
        sink.expect_report()
            .with(function(|d: &Diagnostic| d.message == "The member \"samples\" is not an array."))
            .times(1)
            .return_const(());

        let mut node = wired(json!({"samples": [1, 2, 3]}), "samples", 2.0, ElementType::Float32);
        let status = node.evaluate(&mut NodeContext::new(NodeId(0), &sink));

        assert!(matches!(status.error(), Some(ConversionError::ElementNotArray { .. })));
    }

    #[test]
    fn test_empty_outer_array_is_element_not_array() {
        let mut sink = MockSink::new();
        sink.expect_report().times(1).return_const(());

        let mut node = wired(json!({"samples": []}), "samples", 0.0, ElementType::Float32);
        let status = node.evaluate(&mut NodeContext::new(NodeId(0), &sink));

        assert!(matches!(status.error(), Some(ConversionError::ElementNotArray { .. })));
        assert!(node.array().is_untagged());
    }

    #[test]
    fn test_non_object_source_has_no_members() {
        let mut sink = MockSink::new();
        sink.expect_report().times(1).return_const(());

        let mut node = wired(json!([[1, 2]]), "0", 0.0, ElementType::Uint8);
        let status = node.evaluate(&mut NodeContext::new(NodeId(0), &sink));

        assert!(matches!(status.error(), Some(ConversionError::UnknownMember { .. })));
    }

    #[test]
    fn test_index_wraps() {
        let sink = quiet_sink();
        let object = json!({"m": [[1], [2], [3]]});
        let mut a = wired(object.clone(), "m", 1.0, ElementType::Int32);
        let mut b = wired(object, "m", 4.0, ElementType::Int32);

        a.evaluate(&mut NodeContext::new(NodeId(0), &sink));
        b.evaluate(&mut NodeContext::new(NodeId(1), &sink));

        assert_eq!(a.array(), b.array());
        assert_eq!(a.array().decode(), vec![2.0]);
    }

    #[test]
    fn test_index_beyond_integer_range_wraps() {
        let sink = quiet_sink();
        let object = json!({"m": [[1], [2]]});
        let mut even = wired(object.clone(), "m", 1e20, ElementType::Uint8);
        let mut pow = wired(object.clone(), "m", 18_446_744_073_709_551_616.0, ElementType::Uint8);
        let mut odd = wired(object, "m", 9_007_199_254_740_991.0, ElementType::Uint8);

        even.evaluate(&mut NodeContext::new(NodeId(0), &sink));
        pow.evaluate(&mut NodeContext::new(NodeId(0), &sink));
        odd.evaluate(&mut NodeContext::new(NodeId(0), &sink));

        assert_eq!(even.array().as_bytes(), &[1]);
        assert_eq!(pow.array().as_bytes(), &[1]);
        assert_eq!(odd.array().as_bytes(), &[2]);
    }

    #[test]
    fn test_infinite_index_selects_nothing() {
        let mut sink = MockSink::new();
        sink.expect_report()
            .with(function(|d: &Diagnostic| d.message == "The member \"m\" is not an array."))
            .times(1)
            .return_const(());

        let mut node = wired(json!({"m": [[1], [2]]}), "m", f64::INFINITY, ElementType::Uint8);
        let status = node.evaluate(&mut NodeContext::new(NodeId(0), &sink));

        assert!(matches!(status.error(), Some(ConversionError::ElementNotArray { .. })));
    }

    #[test]
    fn test_set_element_type_marks_dirty_without_converting() {
        let sink = quiet_sink();
        let mut node = wired(json!({"m": [[1, 2]]}), "m", 0.0, ElementType::Uint8);
        node.evaluate(&mut NodeContext::new(NodeId(0), &sink));
        assert!(!node.needs_evaluation());

        node.set_element_type(ElementType::Int16);
        assert!(node.needs_evaluation());
        assert_eq!(node.array().element_type(), Some(ElementType::Uint8));

        node.evaluate(&mut NodeContext::new(NodeId(0), &sink));
        assert_eq!(node.array().element_type(), Some(ElementType::Int16));
        assert_eq!(node.array().byte_len(), 4);
    }

    #[test]
    fn test_set_element_type_code_rejects_unknown() {
        let mut node = ArrayItemToTypedArrayNode::new();
        assert!(node.set_element_type_code(1).is_ok());
        assert!(matches!(
            node.set_element_type_code(7),
            Err(NodeError::InvalidElementType(7))
        ));
        assert_eq!(node.element_type(), ElementType::Uint8);
    }

    #[test]
    fn test_update_input_by_slot() {
        let mut node = ArrayItemToTypedArrayNode::new();
        node.update_input(SLOT_OBJECT, SlotValue::from(json!({"a": [[1]]})));
        node.update_input(SLOT_MEMBER, SlotValue::from("a"));
        node.update_input(SLOT_INDEX, SlotValue::from(-3.7));
        assert_eq!(node.index(), 0.0);
        assert!(node.convert().unwrap().is_some());

        // Wrong kinds are ignored.
        node.update_input(SLOT_MEMBER, SlotValue::Number(1.0));
        node.update_input(9, SlotValue::from("x"));
        assert!(node.convert().unwrap().is_some());

        node.update_input(SLOT_OBJECT, SlotValue::Empty);
        assert!(node.convert().unwrap().is_none());
    }

    #[test]
    fn test_reset_keeps_configuration() {
        let sink = quiet_sink();
        let mut node = wired(json!({"m": [[1, 2]]}), "m", 5.0, ElementType::Uint16);
        node.evaluate(&mut NodeContext::new(NodeId(0), &sink));

        node.reset();

        assert!(node.array().is_untagged());
        assert_eq!(node.index(), 0.0);
        assert!(node.convert().unwrap().is_none());
        assert_eq!(node.element_type(), ElementType::Uint16);
    }

    #[test]
    fn test_config_change() {
        let mut node = ArrayItemToTypedArrayNode::new();
        node.on_config_change(CONFIG_DATATYPE, &ConfigValue::Int(2));
        assert_eq!(node.element_type(), ElementType::Int16);

        node.on_config_change(CONFIG_DATATYPE, &ConfigValue::String("uint32".into()));
        assert_eq!(node.element_type(), ElementType::Uint32);

        node.on_config_change(CONFIG_DATATYPE, &ConfigValue::Int(42));
        node.on_config_change("unrelated", &ConfigValue::Int(0));
        assert_eq!(node.element_type(), ElementType::Uint32);
    }

    #[test]
    fn test_output_slot() {
        let node = ArrayItemToTypedArrayNode::new();
        assert!(node.output(SLOT_ARRAY).unwrap().as_buffer().is_some());
        assert!(node.output(1).is_none());
    }
}
