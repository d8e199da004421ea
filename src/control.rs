//! Element type selector control.
//!
//! The node does not render anything. A UI toolkit draws a selector with one
//! entry per [`ElementType`] and talks to the node through two calls:
//!
//! - user picks an entry → [`ElementTypeSelector::select`] → node's
//!   `set_element_type`
//! - control is (re)created → node's `state_changed` → control's
//!   [`ElementTypeControl::show_selection`]
//!
//! [`ElementTypeSelector`] is the headless model behind such a control.

use crate::error::{NodeError, Result};
use crate::pipeline::nodes::ArrayItemToTypedArrayNode;
use crate::types::ElementType;

/// A control that can display the node's element type.
pub trait ElementTypeControl {
    /// Show `element_type` as the current selection.
    fn show_selection(&mut self, element_type: ElementType);
}

/// One selectable entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectorOption {
    pub code: u8,
    pub label: &'static str,
}

/// Headless model of the element type selector.
#[derive(Debug, Clone, Default)]
pub struct ElementTypeSelector {
    selected: ElementType,
}

impl ElementTypeSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries in display order.
    pub fn options() -> impl Iterator<Item = SelectorOption> {
        ElementType::all().iter().map(|t| SelectorOption {
            code: t.code(),
            label: t.label(),
        })
    }

    pub fn selected(&self) -> ElementType {
        self.selected
    }

    /// Handle a user selection by code and forward it to `node`.
    pub fn select(&mut self, code: i64, node: &mut ArrayItemToTypedArrayNode) -> Result<()> {
        let element_type = ElementType::from_code(code).ok_or(NodeError::InvalidElementType(code))?;
        self.selected = element_type;
        node.set_element_type(element_type);
        Ok(())
    }
}

impl ElementTypeControl for ElementTypeSelector {
    fn show_selection(&mut self, element_type: ElementType) {
        self.selected = element_type;
    }
}
