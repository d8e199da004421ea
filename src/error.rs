//! Error handling for the typed array node
//!
//! Two families of errors live here:
//!
//! - [`ConversionError`] - input validation failures during evaluation. These
//!   never leave the node; they are reported through the diagnostics sink and
//!   the node keeps its previous output.
//! - [`NodeError`] - failures of the surrounding plumbing (state and settings
//!   persistence, invalid configuration codes).

use thiserror::Error;

/// Validation failure raised while evaluating the node.
///
/// The display strings are the diagnostic messages shown to the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    /// The source object has no property with the requested name
    #[error("Cannot convert unknown member \"{member}\".")]
    UnknownMember { member: String },

    /// The named property exists but is not an array
    #[error("Object member \"{member}\" is not an array.")]
    NotAnArray { member: String },

    /// The selected item of the member is missing or not an array
    #[error("The member \"{member}\" is not an array.")]
    ElementNotArray { member: String },
}

impl ConversionError {
    /// Name of the member that failed validation.
    pub fn member(&self) -> &str {
        match self {
            ConversionError::UnknownMember { member }
            | ConversionError::NotAnArray { member }
            | ConversionError::ElementNotArray { member } => member,
        }
    }
}

/// Main error type for node plumbing
#[derive(Error, Debug)]
pub enum NodeError {
    /// Errors related to configuration loading/saving
    #[error("Configuration error: {0}")]
    Config(String),

    /// An element type code outside the supported table
    #[error("Invalid element type code: {0}")]
    InvalidElementType(i64),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<NodeError>,
    },
}

impl NodeError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        NodeError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

/// Result type alias for node plumbing
pub type Result<T> = std::result::Result<T, NodeError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.with_context(f()))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| NodeError::Io(e).with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| NodeError::Io(e).with_context(f()))
    }
}
