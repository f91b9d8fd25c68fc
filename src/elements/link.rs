use super::{reference_handles, CausalConnector, Descriptor, ElementTag, Markup};
use crate::list::{Container, ElementList};
use crate::reference::{AnyInterface, AnyNode, Reference};
use crate::registry::{ElementId, RefHandle};
use crate::writer::Attributes;

/// A `<link>`: instantiates a connector by binding its roles to nodes.
#[derive(Debug, Default)]
pub struct Link {
    pub xconnector: Option<Reference<CausalConnector>>,
    params: ElementList,
    binds: ElementList,
}

impl Link {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn params(&self) -> &ElementList {
        &self.params
    }

    pub fn binds(&self) -> &ElementList {
        &self.binds
    }
}

impl Markup for Link {
    fn attributes(&self, attrs: &mut Attributes<'_>) {
        attrs.reference("xconnector", self.xconnector.as_ref());
    }

    fn children(&self) -> Vec<ElementId> {
        self.params.iter().chain(self.binds.iter()).copied().collect()
    }

    fn container(&mut self, child: ElementTag) -> Option<Container<'_>> {
        match child {
            ElementTag::LinkParam => Some(Container::List(&mut self.params)),
            ElementTag::Bind => Some(Container::List(&mut self.binds)),
            _ => None,
        }
    }

    fn references(&self) -> Vec<RefHandle> {
        reference_handles!(self.xconnector)
    }
}

/// A `<linkParam>`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkParam {
    pub name: String,
    pub value: String,
}

impl LinkParam {
    pub fn new(name: &str, value: &str) -> Self {
        LinkParam {
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}

impl Markup for LinkParam {
    fn attributes(&self, attrs: &mut Attributes<'_>) {
        attrs.text("name", Some(&self.name));
        attrs.text("value", Some(&self.value));
    }
}

/// A `<bind>`: associates a connector role with a node.
#[derive(Debug, Default)]
pub struct Bind {
    pub role: String,
    pub component: Option<Reference<AnyNode>>,
    pub interface: Option<Reference<AnyInterface>>,
    pub descriptor: Option<Reference<Descriptor>>,
    params: ElementList,
}

impl Bind {
    pub fn new(role: &str) -> Self {
        Bind {
            role: role.to_string(),
            ..Self::default()
        }
    }

    pub fn params(&self) -> &ElementList {
        &self.params
    }
}

impl Markup for Bind {
    fn attributes(&self, attrs: &mut Attributes<'_>) {
        attrs.text("role", Some(&self.role));
        attrs.reference("component", self.component.as_ref());
        attrs.reference("interface", self.interface.as_ref());
        attrs.reference("descriptor", self.descriptor.as_ref());
    }

    fn children(&self) -> Vec<ElementId> {
        self.params.iter().copied().collect()
    }

    fn container(&mut self, child: ElementTag) -> Option<Container<'_>> {
        match child {
            ElementTag::BindParam => Some(Container::List(&mut self.params)),
            _ => None,
        }
    }

    fn references(&self) -> Vec<RefHandle> {
        reference_handles!(self.component, self.interface, self.descriptor)
    }
}

/// A `<bindParam>`.
#[derive(Debug, Clone, PartialEq)]
pub struct BindParam {
    pub name: String,
    pub value: String,
}

impl BindParam {
    pub fn new(name: &str, value: &str) -> Self {
        BindParam {
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}

impl Markup for BindParam {
    fn attributes(&self, attrs: &mut Attributes<'_>) {
        attrs.text("name", Some(&self.name));
        attrs.text("value", Some(&self.value));
    }
}
