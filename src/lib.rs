//! # NCL authoring object model
//!
//! An in-memory, editable model of Nested Context Language (NCL) documents
//! for authoring tools: build or load a document, edit it, check it and
//! write it back out as NCL XML.
//!
//! ## Features
//! - Arena-backed element tree with single ownership and per-document unique ids
//! - Typed references between elements, including `alias#id` references into imported documents
//! - Deterministic XML output with a fixed attribute order per element kind
//! - Loading from XML with forward references and import resolution
//! - Structural validation with detailed diagnostics
//! - Change notifications delivered in order on a background thread
//!
//! ## Example: building a layout
//! ```ignore
//! use ncl_model::{NclDocument, Region, RegionBase, RelativeValue};
//!
//! let mut doc = NclDocument::new("main")?;
//! let base = doc.insert(RegionBase::new())?;
//! let mut tv = Region::new();
//! tv.left = Some(RelativeValue::percent(10.0));
//! let tv = doc.create("rgTV", tv)?;
//! doc.append(base, tv)?;
//!
//! assert_eq!(doc.render(tv, 0), "<region id='rgTV' left='10%'/>\n");
//! ```
//!
//! ## Example: loading a file with imports
//! ```ignore
//! use ncl_model::{load_file, LoaderConfig};
//!
//! let doc = load_file("main.ncl".as_ref(), &LoaderConfig::default())?;
//! let report = doc.validate(doc.root());
//! for error in &report.errors {
//!     eprintln!("{}", error);
//! }
//! ```

pub mod config;
pub mod document;
pub mod elements;
pub mod error;
pub mod identifier;
pub mod list;
pub mod loader;
pub mod notifier;
pub mod reference;
pub mod registry;
pub mod validator;
pub mod values;
pub mod writer;

// --- Core types ---
pub use document::NclDocument;
pub use error::{NclError, NclResult};
pub use identifier::Identifier;
pub use registry::{ElementId, RefHandle};

// --- Elements ---
pub use elements::{
    Area, Bind, BindParam, Body, CausalConnector, CompositeRule, Composition, CompoundAction,
    CompoundCondition, ConnectorBase, ConnectorParam, Context, Descriptor, DescriptorBase,
    Element, ElementTag, Head, Identity, ImportBase, ImportNcl, ImportedDocumentBase, Kind, Link,
    LinkParam, Media, Meta, Ncl, Port, Property, Region, RegionBase, Rule, RuleBase,
    SimpleAction, SimpleCondition, Transition, TransitionBase,
};
pub use list::{ElementList, IdentifiableElementList};
pub use reference::{AnyInterface, AnyNode, AnyRule, Reference, Target, TargetAttribute};
pub use values::{
    ActionOperator, ActionType, Color, Comparator, EventTransition, EventType, LogicalOperator,
    RelativeValue, Seconds, TransitionDirection, TransitionType,
};

// --- Loading, checking and change tracking ---
pub use config::{Config, LoaderConfig, WriterConfig};
pub use loader::{load, load_file, load_with, DocumentSource, FileSource};
pub use notifier::{
    ChangeEvent, ChangeListener, ListenerError, ListenerId, Notification, Notifier,
    NotifierHandle,
};
pub use validator::{Diagnostic, Report};
