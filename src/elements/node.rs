use super::{reference_handles, Descriptor, ElementTag, Markup};
use crate::list::{Container, ElementList, IdentifiableElementList};
use crate::reference::{AnyInterface, AnyNode, Reference};
use crate::registry::{ElementId, RefHandle};
use crate::writer::Attributes;

/// Children shared by `<body>` and `<context>`.
#[derive(Debug, Default)]
pub struct Composition {
    ports: IdentifiableElementList,
    properties: ElementList,
    nodes: IdentifiableElementList,
    links: ElementList,
}

impl Composition {
    pub fn ports(&self) -> &IdentifiableElementList {
        &self.ports
    }

    pub fn properties(&self) -> &ElementList {
        &self.properties
    }

    /// Media and context children.
    pub fn nodes(&self) -> &IdentifiableElementList {
        &self.nodes
    }

    pub fn links(&self) -> &ElementList {
        &self.links
    }

    pub(crate) fn children(&self) -> Vec<ElementId> {
        self.ports
            .iter()
            .chain(self.properties.iter())
            .chain(self.nodes.iter())
            .chain(self.links.iter())
            .copied()
            .collect()
    }

    pub(crate) fn container(&mut self, child: ElementTag) -> Option<Container<'_>> {
        match child {
            ElementTag::Port => Some(Container::Identified(&mut self.ports)),
            ElementTag::Property => Some(Container::List(&mut self.properties)),
            ElementTag::Media | ElementTag::Context => {
                Some(Container::Identified(&mut self.nodes))
            }
            ElementTag::Link => Some(Container::List(&mut self.links)),
            _ => None,
        }
    }
}

/// A `<context>` node: a nested composition.
#[derive(Debug, Default)]
pub struct Context {
    composition: Composition,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ports(&self) -> &IdentifiableElementList {
        self.composition.ports()
    }

    pub fn properties(&self) -> &ElementList {
        self.composition.properties()
    }

    pub fn nodes(&self) -> &IdentifiableElementList {
        self.composition.nodes()
    }

    pub fn links(&self) -> &ElementList {
        self.composition.links()
    }
}

impl Markup for Context {
    fn attributes(&self, _attrs: &mut Attributes<'_>) {}

    fn children(&self) -> Vec<ElementId> {
        self.composition.children()
    }

    fn container(&mut self, child: ElementTag) -> Option<Container<'_>> {
        self.composition.container(child)
    }
}

/// A `<media>` node.
#[derive(Debug, Default)]
pub struct Media {
    pub src: Option<String>,
    pub media_type: Option<String>,
    pub descriptor: Option<Reference<Descriptor>>,
    /// Another node this media reuses.
    pub refer: Option<Reference<AnyNode>>,
    pub instance: Option<String>,
    areas: IdentifiableElementList,
    properties: ElementList,
}

impl Media {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_src(src: &str) -> Self {
        Media {
            src: Some(src.to_string()),
            ..Self::default()
        }
    }

    pub fn areas(&self) -> &IdentifiableElementList {
        &self.areas
    }

    pub fn properties(&self) -> &ElementList {
        &self.properties
    }
}

impl Markup for Media {
    fn attributes(&self, attrs: &mut Attributes<'_>) {
        attrs.text("src", self.src.as_deref());
        attrs.text("type", self.media_type.as_deref());
        attrs.reference("descriptor", self.descriptor.as_ref());
        attrs.reference("refer", self.refer.as_ref());
        attrs.text("instance", self.instance.as_deref());
    }

    fn children(&self) -> Vec<ElementId> {
        self.areas
            .iter()
            .chain(self.properties.iter())
            .copied()
            .collect()
    }

    fn container(&mut self, child: ElementTag) -> Option<Container<'_>> {
        match child {
            ElementTag::Area => Some(Container::Identified(&mut self.areas)),
            ElementTag::Property => Some(Container::List(&mut self.properties)),
            _ => None,
        }
    }

    fn references(&self) -> Vec<RefHandle> {
        reference_handles!(self.descriptor, self.refer)
    }
}

/// A `<port>`: exposes an interface of an inner node.
#[derive(Debug, Default)]
pub struct Port {
    pub component: Option<Reference<AnyNode>>,
    pub interface: Option<Reference<AnyInterface>>,
}

impl Port {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Markup for Port {
    fn attributes(&self, attrs: &mut Attributes<'_>) {
        attrs.reference("component", self.component.as_ref());
        attrs.reference("interface", self.interface.as_ref());
    }

    fn references(&self) -> Vec<RefHandle> {
        reference_handles!(self.component, self.interface)
    }
}

/// An `<area>` anchor of a media.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Area {
    pub coords: Option<String>,
    pub begin: Option<String>,
    pub end: Option<String>,
    pub text: Option<String>,
    pub position: Option<String>,
    pub first: Option<String>,
    pub last: Option<String>,
    pub label: Option<String>,
}

impl Area {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Markup for Area {
    fn attributes(&self, attrs: &mut Attributes<'_>) {
        attrs.text("coords", self.coords.as_deref());
        attrs.text("begin", self.begin.as_deref());
        attrs.text("end", self.end.as_deref());
        attrs.text("text", self.text.as_deref());
        attrs.text("position", self.position.as_deref());
        attrs.text("first", self.first.as_deref());
        attrs.text("last", self.last.as_deref());
        attrs.text("label", self.label.as_deref());
    }
}

/// A `<property>` of a node, identified by its name.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub name: String,
    pub value: Option<String>,
}

impl Property {
    pub fn new(name: &str) -> Self {
        Property {
            name: name.to_string(),
            value: None,
        }
    }

    pub fn with_value(name: &str, value: &str) -> Self {
        Property {
            name: name.to_string(),
            value: Some(value.to_string()),
        }
    }
}

impl Markup for Property {
    fn attributes(&self, attrs: &mut Attributes<'_>) {
        attrs.text("name", Some(&self.name));
        attrs.text("value", self.value.as_deref());
    }
}
