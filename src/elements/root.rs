use super::{ElementTag, Markup};
use crate::elements::node::Composition;
use crate::list::{Container, ElementList, IdentifiableElementList};
use crate::registry::ElementId;
use crate::writer::Attributes;

/// The `<ncl>` document element.
#[derive(Debug)]
pub struct Ncl {
    pub title: Option<String>,
    pub xmlns: Option<String>,
    head: Option<ElementId>,
    body: Option<ElementId>,
}

impl Ncl {
    pub const DEFAULT_NAMESPACE: &'static str = "http://www.ncl.org.br/NCL3.0/EDTVProfile";

    pub fn new() -> Self {
        Ncl {
            title: None,
            xmlns: Some(Self::DEFAULT_NAMESPACE.to_string()),
            head: None,
            body: None,
        }
    }

    pub fn head(&self) -> Option<ElementId> {
        self.head
    }

    pub fn body(&self) -> Option<ElementId> {
        self.body
    }
}

impl Default for Ncl {
    fn default() -> Self {
        Self::new()
    }
}

impl Markup for Ncl {
    fn attributes(&self, attrs: &mut Attributes<'_>) {
        attrs.text("title", self.title.as_deref());
        attrs.text("xmlns", self.xmlns.as_deref());
    }

    fn children(&self) -> Vec<ElementId> {
        self.head.into_iter().chain(self.body).collect()
    }

    fn container(&mut self, child: ElementTag) -> Option<Container<'_>> {
        match child {
            ElementTag::Head => Some(Container::Slot(&mut self.head)),
            ElementTag::Body => Some(Container::Slot(&mut self.body)),
            _ => None,
        }
    }
}

/// The `<head>` section: bases and metadata, each base at most once except
/// region bases (one per device).
#[derive(Debug, Default)]
pub struct Head {
    imported_document_base: Option<ElementId>,
    rule_base: Option<ElementId>,
    transition_base: Option<ElementId>,
    region_bases: ElementList,
    descriptor_base: Option<ElementId>,
    connector_base: Option<ElementId>,
    metas: ElementList,
}

impl Head {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn imported_document_base(&self) -> Option<ElementId> {
        self.imported_document_base
    }

    pub fn rule_base(&self) -> Option<ElementId> {
        self.rule_base
    }

    pub fn transition_base(&self) -> Option<ElementId> {
        self.transition_base
    }

    pub fn region_bases(&self) -> &ElementList {
        &self.region_bases
    }

    pub fn descriptor_base(&self) -> Option<ElementId> {
        self.descriptor_base
    }

    pub fn connector_base(&self) -> Option<ElementId> {
        self.connector_base
    }

    pub fn metas(&self) -> &ElementList {
        &self.metas
    }
}

impl Markup for Head {
    fn attributes(&self, _attrs: &mut Attributes<'_>) {}

    fn children(&self) -> Vec<ElementId> {
        self.imported_document_base
            .into_iter()
            .chain(self.rule_base)
            .chain(self.transition_base)
            .chain(self.region_bases.iter().copied())
            .chain(self.descriptor_base)
            .chain(self.connector_base)
            .chain(self.metas.iter().copied())
            .collect()
    }

    fn container(&mut self, child: ElementTag) -> Option<Container<'_>> {
        match child {
            ElementTag::ImportedDocumentBase => {
                Some(Container::Slot(&mut self.imported_document_base))
            }
            ElementTag::RuleBase => Some(Container::Slot(&mut self.rule_base)),
            ElementTag::TransitionBase => Some(Container::Slot(&mut self.transition_base)),
            ElementTag::RegionBase => Some(Container::List(&mut self.region_bases)),
            ElementTag::DescriptorBase => Some(Container::Slot(&mut self.descriptor_base)),
            ElementTag::ConnectorBase => Some(Container::Slot(&mut self.connector_base)),
            ElementTag::Meta => Some(Container::List(&mut self.metas)),
            _ => None,
        }
    }
}

/// The `<body>` section: the top-level context of a presentation.
#[derive(Debug, Default)]
pub struct Body {
    composition: Composition,
    metas: ElementList,
}

impl Body {
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

    pub fn metas(&self) -> &ElementList {
        &self.metas
    }
}

impl Markup for Body {
    fn attributes(&self, _attrs: &mut Attributes<'_>) {}

    fn children(&self) -> Vec<ElementId> {
        let mut children = self.composition.children();
        children.extend(self.metas.iter().copied());
        children
    }

    fn container(&mut self, child: ElementTag) -> Option<Container<'_>> {
        match child {
            ElementTag::Meta => Some(Container::List(&mut self.metas)),
            other => self.composition.container(other),
        }
    }
}

/// A `<meta name=... content=...>` entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Meta {
    pub name: String,
    pub content: String,
}

impl Meta {
    pub fn new(name: &str, content: &str) -> Self {
        Meta {
            name: name.to_string(),
            content: content.to_string(),
        }
    }
}

impl Markup for Meta {
    fn attributes(&self, attrs: &mut Attributes<'_>) {
        attrs.text("name", Some(&self.name));
        attrs.text("content", Some(&self.content));
    }
}
