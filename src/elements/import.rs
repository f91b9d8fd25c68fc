use super::{ElementTag, Markup};
use crate::error::NclResult;
use crate::identifier::Identifier;
use crate::list::{Container, ElementList};
use crate::registry::ElementId;
use crate::writer::Attributes;

/// An `<importedDocumentBase>`: whole documents imported by the head.
#[derive(Debug, Default)]
pub struct ImportedDocumentBase {
    imports: ElementList,
}

impl ImportedDocumentBase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn imports(&self) -> &ElementList {
        &self.imports
    }
}

impl Markup for ImportedDocumentBase {
    fn attributes(&self, _attrs: &mut Attributes<'_>) {}

    fn children(&self) -> Vec<ElementId> {
        self.imports.iter().copied().collect()
    }

    fn container(&mut self, child: ElementTag) -> Option<Container<'_>> {
        match child {
            ElementTag::ImportNcl => Some(Container::List(&mut self.imports)),
            _ => None,
        }
    }
}

/// An `<importNCL>` alias for a whole external document.
#[derive(Debug)]
pub struct ImportNcl {
    alias: Identifier,
    pub document_uri: String,
    imported: Option<ElementId>,
}

impl ImportNcl {
    pub fn new(alias: &str, document_uri: &str) -> NclResult<Self> {
        Ok(ImportNcl {
            alias: Identifier::new(alias)?,
            document_uri: document_uri.to_string(),
            imported: None,
        })
    }

    pub fn alias(&self) -> &str {
        self.alias.as_str()
    }

    /// Root `<ncl>` of the imported document, once loaded.
    pub fn imported(&self) -> Option<ElementId> {
        self.imported
    }

    pub(crate) fn set_imported(&mut self, root: ElementId) {
        self.imported = Some(root);
    }
}

impl Markup for ImportNcl {
    fn attributes(&self, attrs: &mut Attributes<'_>) {
        attrs.text("alias", Some(self.alias.as_str()));
        attrs.text("documentURI", Some(&self.document_uri));
    }
}

/// An `<importBase>` alias for one base of an external document.
#[derive(Debug)]
pub struct ImportBase {
    alias: Identifier,
    pub document_uri: String,
    pub base_id: Option<String>,
    imported: Option<ElementId>,
}

impl ImportBase {
    pub fn new(alias: &str, document_uri: &str) -> NclResult<Self> {
        Ok(ImportBase {
            alias: Identifier::new(alias)?,
            document_uri: document_uri.to_string(),
            base_id: None,
            imported: None,
        })
    }

    pub fn alias(&self) -> &str {
        self.alias.as_str()
    }

    pub fn imported(&self) -> Option<ElementId> {
        self.imported
    }

    pub(crate) fn set_imported(&mut self, root: ElementId) {
        self.imported = Some(root);
    }
}

impl Markup for ImportBase {
    fn attributes(&self, attrs: &mut Attributes<'_>) {
        attrs.text("alias", Some(self.alias.as_str()));
        attrs.text("documentURI", Some(&self.document_uri));
        attrs.text("baseId", self.base_id.as_deref());
    }
}
