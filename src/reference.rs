//! Typed references between elements.
//!
//! A [`Reference`] points from an owner element (a descriptor, a bind, ...)
//! to a target element and renders the target's identifying attribute when
//! the owner is serialized. When the target lives in an imported document
//! the reference goes through an alias (an `importNCL` or `importBase`
//! element) and renders as `alias#target`.

use std::fmt;
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

use crate::document::NclDocument;
use crate::elements::{Element, ElementTag};
use crate::error::{NclError, NclResult};
use crate::registry::{ElementId, RefHandle};

/// Which attribute of the target a reference renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TargetAttribute {
    Id,
    Name,
    FocusIndex,
}

impl TargetAttribute {
    pub fn as_str(self) -> &'static str {
        match self {
            TargetAttribute::Id => "id",
            TargetAttribute::Name => "name",
            TargetAttribute::FocusIndex => "focusIndex",
        }
    }
}

/// The kinds of element a reference may point at.
pub trait Target {
    /// Human-readable name used in error messages.
    const NAME: &'static str;

    fn accepts(tag: ElementTag) -> bool;
}

/// Any presentation node: `media` or `context`.
#[derive(Debug)]
pub enum AnyNode {}

/// Any node interface: `area`, `property` or `port`.
#[derive(Debug)]
pub enum AnyInterface {}

/// Any rule: `rule` or `compositeRule`.
#[derive(Debug)]
pub enum AnyRule {}

impl Target for AnyNode {
    const NAME: &'static str = "node";

    fn accepts(tag: ElementTag) -> bool {
        matches!(tag, ElementTag::Media | ElementTag::Context | ElementTag::Body)
    }
}

impl Target for AnyInterface {
    const NAME: &'static str = "interface";

    fn accepts(tag: ElementTag) -> bool {
        matches!(tag, ElementTag::Area | ElementTag::Property | ElementTag::Port)
    }
}

impl Target for AnyRule {
    const NAME: &'static str = "rule";

    fn accepts(tag: ElementTag) -> bool {
        matches!(tag, ElementTag::Rule | ElementTag::CompositeRule)
    }
}

/// A directed, typed edge from an owner element to a target element.
///
/// References are created through [`NclDocument::reference`] and
/// [`NclDocument::aliased_reference`], which register them so that removing
/// an alias can invalidate every reference passing through it. Release a
/// reference that is no longer used with [`NclDocument::release`].
pub struct Reference<K: Target> {
    target: ElementId,
    attribute: TargetAttribute,
    alias: Option<ElementId>,
    handle: RefHandle,
    _kind: PhantomData<fn() -> K>,
}

impl<K: Target> fmt::Debug for Reference<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reference")
            .field("kind", &K::NAME)
            .field("target", &self.target)
            .field("attribute", &self.attribute)
            .field("alias", &self.alias)
            .finish()
    }
}

impl<K: Target> PartialEq for Reference<K> {
    fn eq(&self, other: &Self) -> bool {
        self.target == other.target
            && self.attribute == other.attribute
            && self.alias == other.alias
    }
}

impl<K: Target> Reference<K> {
    pub(crate) fn new(
        target: ElementId,
        attribute: TargetAttribute,
        alias: Option<ElementId>,
        handle: RefHandle,
    ) -> Self {
        Reference {
            target,
            attribute,
            alias,
            handle,
            _kind: PhantomData,
        }
    }

    pub fn target(&self) -> ElementId {
        self.target
    }

    pub fn attribute(&self) -> TargetAttribute {
        self.attribute
    }

    pub fn alias(&self) -> Option<ElementId> {
        self.alias
    }

    pub(crate) fn handle(&self) -> RefHandle {
        self.handle
    }

    /// Whether the reference is still registered (not cleaned).
    pub fn is_attached(&self, doc: &NclDocument) -> bool {
        doc.registry().is_attached(self.handle)
    }

    /// Render the reference as it appears in an attribute value.
    pub fn resolve(&self, doc: &NclDocument) -> NclResult<String> {
        if !self.is_attached(doc) {
            return Err(NclError::DanglingReference);
        }
        let identity = self.identify_target(doc)?;
        match self.alias {
            Some(alias) => {
                let name = doc
                    .alias_name(alias)
                    .ok_or(NclError::NullReference { what: "alias" })?;
                Ok(format!("{}#{}", name, identity))
            }
            None => Ok(identity),
        }
    }

    /// Render the selected attribute of the target, without the alias prefix.
    pub fn identify_target(&self, doc: &NclDocument) -> NclResult<String> {
        let element = doc
            .element(self.target)
            .ok_or(NclError::NullReference { what: "target" })?;
        let unresolved = || NclError::UnresolvedAttribute {
            attribute: self.attribute.as_str(),
            tag: element.tag(),
        };
        match self.attribute {
            TargetAttribute::Id => doc
                .id(self.target)
                .map(str::to_string)
                .ok_or_else(unresolved),
            TargetAttribute::Name => match element {
                Element::Property(property) => Ok(property.name.clone()),
                _ => Err(unresolved()),
            },
            TargetAttribute::FocusIndex => match element {
                Element::Descriptor(descriptor) => descriptor
                    .focus_index
                    .map(|index| index.to_string())
                    .ok_or_else(unresolved),
                _ => Err(unresolved()),
            },
        }
    }
}
