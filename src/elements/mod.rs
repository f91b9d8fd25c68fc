//! The NCL element catalogue.
//!
//! Every element kind is a plain payload struct; the closed [`Element`] sum
//! type holds one of them per arena slot. Identity, parent links and
//! reference bookkeeping are kept by the document, not by the payloads.

mod connector;
mod descriptor;
mod import;
mod link;
mod node;
mod region;
mod root;
mod rule;
mod transition;

pub use connector::{
    CausalConnector, CompoundAction, CompoundCondition, ConnectorBase, ConnectorParam,
    SimpleAction, SimpleCondition,
};
pub use descriptor::{Descriptor, DescriptorBase};
pub use import::{ImportBase, ImportNcl, ImportedDocumentBase};
pub use link::{Bind, BindParam, Link, LinkParam};
pub use node::{Area, Composition, Context, Media, Port, Property};
pub use region::{Region, RegionBase};
pub use root::{Body, Head, Meta, Ncl};
pub use rule::{CompositeRule, Rule, RuleBase};
pub use transition::{Transition, TransitionBase};

use std::fmt;

use crate::list::Container;
use crate::reference::Target;
use crate::registry::{ElementId, RefHandle};
use crate::writer::Attributes;

/// Whether an element kind carries an `id` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Identity {
    Required,
    Optional,
    Never,
}

/// Serialization hooks every payload provides.
///
/// `attributes` pushes everything but `id` (which the writer takes from the
/// registry) in the kind's fixed output order. `children` lists children in
/// output order.
pub(crate) trait Markup {
    fn attributes(&self, attrs: &mut Attributes<'_>);

    fn children(&self) -> Vec<ElementId> {
        Vec::new()
    }

    /// The container that stores children of kind `child`, if any.
    fn container(&mut self, _child: ElementTag) -> Option<Container<'_>> {
        None
    }

    /// Handles of the references this element owns.
    fn references(&self) -> Vec<RefHandle> {
        Vec::new()
    }
}

/// Typed access to one variant of [`Element`].
pub trait Kind: Into<Element> {
    const TAG: ElementTag;

    fn from_element(element: &Element) -> Option<&Self>;

    fn from_element_mut(element: &mut Element) -> Option<&mut Self>;
}

macro_rules! element_kinds {
    ($($variant:ident => $name:literal, $identity:ident;)+) => {
        /// The tag of an element kind.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum ElementTag {
            $($variant,)+
        }

        impl ElementTag {
            pub const ALL: &'static [ElementTag] = &[$(ElementTag::$variant,)+];

            /// The XML tag name.
            pub fn name(self) -> &'static str {
                match self {
                    $(ElementTag::$variant => $name,)+
                }
            }

            pub fn identity(self) -> Identity {
                match self {
                    $(ElementTag::$variant => Identity::$identity,)+
                }
            }

            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $($name => Some(ElementTag::$variant),)+
                    _ => None,
                }
            }
        }

        /// One element payload.
        #[derive(Debug)]
        pub enum Element {
            $($variant($variant),)+
        }

        impl Element {
            pub fn tag(&self) -> ElementTag {
                match self {
                    $(Element::$variant(_) => ElementTag::$variant,)+
                }
            }

            pub(crate) fn markup(&self) -> &dyn Markup {
                match self {
                    $(Element::$variant(e) => e,)+
                }
            }

            pub(crate) fn markup_mut(&mut self) -> &mut dyn Markup {
                match self {
                    $(Element::$variant(e) => e,)+
                }
            }
        }

        $(
            impl From<$variant> for Element {
                fn from(payload: $variant) -> Self {
                    Element::$variant(payload)
                }
            }

            impl Kind for $variant {
                const TAG: ElementTag = ElementTag::$variant;

                fn from_element(element: &Element) -> Option<&Self> {
                    match element {
                        Element::$variant(e) => Some(e),
                        _ => None,
                    }
                }

                fn from_element_mut(element: &mut Element) -> Option<&mut Self> {
                    match element {
                        Element::$variant(e) => Some(e),
                        _ => None,
                    }
                }
            }

            impl Target for $variant {
                const NAME: &'static str = $name;

                fn accepts(tag: ElementTag) -> bool {
                    tag == ElementTag::$variant
                }
            }
        )+
    };
}

element_kinds! {
    Ncl => "ncl", Required;
    Head => "head", Never;
    Body => "body", Optional;
    Meta => "meta", Never;
    RegionBase => "regionBase", Optional;
    Region => "region", Required;
    DescriptorBase => "descriptorBase", Optional;
    Descriptor => "descriptor", Required;
    TransitionBase => "transitionBase", Optional;
    Transition => "transition", Required;
    RuleBase => "ruleBase", Optional;
    Rule => "rule", Required;
    CompositeRule => "compositeRule", Required;
    ConnectorBase => "connectorBase", Optional;
    CausalConnector => "causalConnector", Required;
    ConnectorParam => "connectorParam", Never;
    SimpleCondition => "simpleCondition", Never;
    CompoundCondition => "compoundCondition", Never;
    SimpleAction => "simpleAction", Never;
    CompoundAction => "compoundAction", Never;
    ImportedDocumentBase => "importedDocumentBase", Optional;
    ImportNcl => "importNCL", Never;
    ImportBase => "importBase", Never;
    Media => "media", Required;
    Context => "context", Required;
    Port => "port", Required;
    Area => "area", Required;
    Property => "property", Never;
    Link => "link", Optional;
    LinkParam => "linkParam", Never;
    Bind => "bind", Never;
    BindParam => "bindParam", Never;
}

impl ElementTag {
    /// Closing sequence of an element without children.
    pub fn self_closing(self) -> &'static str {
        match self {
            ElementTag::Descriptor => " />",
            _ => "/>",
        }
    }

    /// Whether elements of this kind can act as an import alias.
    pub fn is_alias(self) -> bool {
        matches!(self, ElementTag::ImportNcl | ElementTag::ImportBase)
    }
}

impl fmt::Display for ElementTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Collect the handles of a set of optional references.
macro_rules! reference_handles {
    ($($reference:expr),* $(,)?) => {{
        let mut handles = Vec::new();
        $(
            if let Some(reference) = $reference.as_ref() {
                handles.push(reference.handle());
            }
        )*
        handles
    }};
}

pub(crate) use reference_handles;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_names_round_trip() {
        for tag in ElementTag::ALL {
            assert_eq!(ElementTag::from_name(tag.name()), Some(*tag));
        }
        assert_eq!(ElementTag::from_name("video"), None);
    }

    #[test]
    fn test_identity_table() {
        assert_eq!(ElementTag::Region.identity(), Identity::Required);
        assert_eq!(ElementTag::Link.identity(), Identity::Optional);
        assert_eq!(ElementTag::Bind.identity(), Identity::Never);
    }

    #[test]
    fn test_typed_access() {
        let element = Element::from(Region::new());
        assert_eq!(element.tag(), ElementTag::Region);
        assert!(Region::from_element(&element).is_some());
        assert!(Descriptor::from_element(&element).is_none());
    }
}
