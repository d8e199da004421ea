//! Built-in node implementations.

pub mod array_item_to_typed_array;

pub use array_item_to_typed_array::{normalize_index, ArrayItemToTypedArrayNode};
