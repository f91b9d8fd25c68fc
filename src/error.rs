use thiserror::Error;

use crate::elements::ElementTag;
use crate::registry::ElementId;

pub type NclResult<T> = Result<T, NclError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum NclError {
    // --- identity & ownership ---

    #[error("Invalid identifier '{value}': {reason}")]
    InvalidIdentifier { value: String, reason: String },

    #[error("<{tag}> elements do not carry an id")]
    NotIdentifiable { tag: ElementTag },

    #[error("Element {element} already belongs to {parent}; remove it before adding it elsewhere")]
    AlreadyOwned { element: ElementId, parent: ElementId },

    #[error("Element {0} does not exist in this document")]
    UnknownElement(ElementId),

    #[error("<{child}> cannot be placed inside <{parent}>")]
    InvalidChild { parent: ElementTag, child: ElementTag },

    #[error("Invalid query: {reason}")]
    InvalidQuery { reason: String },

    // --- references ---

    #[error("Reference is missing its {what}")]
    NullReference { what: &'static str },

    #[error("<{found}> is not a valid target for a {expected} reference")]
    TargetMismatch {
        expected: &'static str,
        found: ElementTag,
    },

    #[error("Target attribute '{attribute}' is not exposed by <{tag}>")]
    UnresolvedAttribute {
        attribute: &'static str,
        tag: ElementTag,
    },

    #[error("Reference was cleaned and can no longer be resolved")]
    DanglingReference,

    // --- load path ---

    #[error("XML parse error: {0}")]
    XmlError(String),

    #[error("Unexpected element <{tag}> inside <{parent}>")]
    UnexpectedElement { tag: String, parent: String },

    #[error("Missing required attribute '{attribute}' on <{tag}>")]
    MissingAttribute { tag: String, attribute: String },

    #[error("Invalid value '{value}' for attribute '{attribute}' on <{tag}>: {reason}")]
    InvalidAttribute {
        tag: String,
        attribute: String,
        value: String,
        reason: String,
    },

    #[error("Reference '{value}' on <{tag}> does not match any declared element")]
    UnknownReference { tag: String, value: String },

    #[error("Unknown import alias '{alias}'")]
    UnknownAlias { alias: String },

    #[error("Import '{alias}' has no loaded document")]
    UnresolvedImport { alias: String },

    #[error("Circular import detected: '{uri}'")]
    CircularImport { uri: String },

    #[error("Maximum import depth ({max_depth}) exceeded")]
    ImportDepthExceeded { max_depth: usize },

    #[error("Failed to read '{uri}': {reason}")]
    SourceUnavailable { uri: String, reason: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    // --- notifier ---

    #[error("Notifier has been shut down")]
    NotifierStopped,

    #[error("Failed to start notifier worker: {0}")]
    NotifierStart(String),
}

impl From<roxmltree::Error> for NclError {
    fn from(err: roxmltree::Error) -> Self {
        NclError::XmlError(err.to_string())
    }
}

impl From<serde_yaml::Error> for NclError {
    fn from(err: serde_yaml::Error) -> Self {
        NclError::ConfigError(err.to_string())
    }
}
