//! The document arena.
//!
//! An [`NclDocument`] owns every element payload, addressed by
//! [`ElementId`]. Parent links, ids and the alias back-reference sets live
//! in the registry; every structural mutation goes through the document so
//! the single-owner and id-uniqueness invariants hold.
//!
//! A document may hold several `<ncl>` roots: the main one and the roots of
//! documents loaded through imports.
//!
//! The arena only grows. A removed element keeps its slot and its
//! [`ElementId`] stays valid (it can be appended again); a released reference
//! keeps its registry entry. Memory is reclaimed when the document is
//! dropped, so long editing sessions should rebuild the document (e.g.
//! render and load) rather than churn one arena indefinitely.

use log::{debug, warn};

use crate::config::WriterConfig;
use crate::elements::{Element, ElementTag, Identity, Kind, Ncl};
use crate::error::{NclError, NclResult};
use crate::identifier::Identifier;
use crate::list::check_query;
use crate::notifier::{ChangeEvent, NotifierHandle};
use crate::reference::{Reference, Target, TargetAttribute};
use crate::registry::{ElementId, RefHandle, Registry};
use crate::validator::{self, Report};
use crate::writer;

#[derive(Debug)]
pub struct NclDocument {
    elements: Vec<Element>,
    registry: Registry,
    root: ElementId,
    notifier: Option<NotifierHandle>,
}

impl NclDocument {
    /// Create a document whose root `<ncl>` carries `id`.
    pub fn new(id: &str) -> NclResult<Self> {
        let id = Identifier::new(id)?;
        let mut registry = Registry::default();
        let root = registry.push(ElementTag::Ncl);
        registry.set_id(root, id)?;
        Ok(NclDocument {
            elements: vec![Element::Ncl(Ncl::new())],
            registry,
            root,
            notifier: None,
        })
    }

    /// The main `<ncl>` element.
    pub fn root(&self) -> ElementId {
        self.root
    }

    /// Every `<ncl>` root: the main document first, then imported ones.
    pub fn documents(&self) -> Vec<ElementId> {
        self.registry
            .ids()
            .filter(|e| {
                self.registry.tag(*e) == Some(ElementTag::Ncl) && self.registry.parent(*e).is_none()
            })
            .collect()
    }

    /// Add another `<ncl>` root to the arena, e.g. for an imported document.
    pub fn add_document(&mut self, id: &str) -> NclResult<ElementId> {
        self.create(id, Ncl::new())
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    fn push(&mut self, element: Element) -> ElementId {
        let id = self.registry.push(element.tag());
        self.elements.push(element);
        id
    }

    /// Store a new identifiable element. It stays detached until appended.
    pub fn create<K: Kind>(&mut self, id: &str, payload: K) -> NclResult<ElementId> {
        let identifier = Identifier::new(id)?;
        if K::TAG.identity() == Identity::Never {
            return Err(NclError::NotIdentifiable { tag: K::TAG });
        }
        let element = self.push(payload.into());
        self.registry.set_id(element, identifier)?;
        Ok(element)
    }

    /// Store a new element without an id.
    pub fn insert<K: Kind>(&mut self, payload: K) -> NclResult<ElementId> {
        if K::TAG.identity() == Identity::Required {
            return Err(NclError::MissingAttribute {
                tag: K::TAG.name().to_string(),
                attribute: "id".to_string(),
            });
        }
        Ok(self.push(payload.into()))
    }

    pub fn contains(&self, element: ElementId) -> bool {
        self.registry.contains(element)
    }

    pub fn element(&self, element: ElementId) -> Option<&Element> {
        self.elements.get(element.index())
    }

    pub fn get<K: Kind>(&self, element: ElementId) -> Option<&K> {
        self.element(element).and_then(K::from_element)
    }

    /// Mutable access to a payload. Prefer [`modify`](Self::modify), which
    /// also emits a change event and releases references it replaces; a
    /// reference overwritten through `get_mut` must be released by hand.
    pub fn get_mut<K: Kind>(&mut self, element: ElementId) -> Option<&mut K> {
        self.elements
            .get_mut(element.index())
            .and_then(K::from_element_mut)
    }

    /// Update the attributes of a payload and emit [`ChangeEvent::Modified`].
    pub fn modify<K: Kind, R>(
        &mut self,
        element: ElementId,
        update: impl FnOnce(&mut K) -> R,
    ) -> NclResult<R> {
        let tag = self
            .registry
            .tag(element)
            .ok_or(NclError::UnknownElement(element))?;
        let before = payload_references(&self.elements, element);
        let payload = self
            .elements
            .get_mut(element.index())
            .and_then(K::from_element_mut)
            .ok_or(NclError::TargetMismatch {
                expected: K::TAG.name(),
                found: tag,
            })?;
        let result = update(payload);

        // A replaced reference is gone for good.
        let after = payload_references(&self.elements, element);
        for handle in before.into_iter().filter(|h| !after.contains(h)) {
            self.registry.release(handle);
        }
        self.emit(ChangeEvent::Modified { element, tag });
        Ok(result)
    }

    /// Put the live references of `element`'s subtree back into their
    /// aliases' referrer sets after a move.
    fn rejoin_aliases(&mut self, element: ElementId) {
        for node in self.descendants(element) {
            for handle in payload_references(&self.elements, node) {
                self.registry.reregister(handle);
            }
        }
    }

    pub fn tag(&self, element: ElementId) -> Option<ElementTag> {
        self.registry.tag(element)
    }

    pub fn id(&self, element: ElementId) -> Option<&str> {
        self.registry.id(element).map(Identifier::as_str)
    }

    /// Assign a new id. Siblings must not already use it.
    pub fn set_id(&mut self, element: ElementId, id: &str) -> NclResult<()> {
        let identifier = Identifier::new(id)?;
        if let Some(parent) = self.registry.parent(element) {
            let clash = self.children(parent).into_iter().any(|sibling| {
                sibling != element && self.id(sibling) == Some(identifier.as_str())
            });
            if clash {
                return Err(NclError::InvalidIdentifier {
                    value: id.to_string(),
                    reason: format!("already used by another child of {}", parent),
                });
            }
        }

        let new = identifier.to_string();
        let old = self.registry.set_id(element, identifier)?;
        debug!("element {} id {:?} -> '{}'", element, old, new);
        self.emit(ChangeEvent::IdChanged {
            element,
            old: old.map(|o| o.to_string()),
            new,
        });
        Ok(())
    }

    pub fn parent(&self, element: ElementId) -> Option<ElementId> {
        self.registry.parent(element)
    }

    /// The `<ncl>` root above `element`, or `None` while it is detached.
    pub fn document_of(&self, element: ElementId) -> Option<ElementId> {
        if !self.contains(element) {
            return None;
        }
        let mut current = element;
        while let Some(parent) = self.registry.parent(current) {
            current = parent;
        }
        (self.registry.tag(current) == Some(ElementTag::Ncl)).then_some(current)
    }

    /// Direct children in output order.
    pub fn children(&self, element: ElementId) -> Vec<ElementId> {
        self.element(element)
            .map(|e| e.markup().children())
            .unwrap_or_default()
    }

    /// `scope` and everything below it, in document order.
    pub fn descendants(&self, scope: ElementId) -> Vec<ElementId> {
        let mut found = Vec::new();
        if !self.contains(scope) {
            return found;
        }
        let mut stack = vec![scope];
        while let Some(element) = stack.pop() {
            found.push(element);
            let children = self.children(element);
            stack.extend(children.into_iter().rev());
        }
        found
    }

    /// Append `child` to the container `owner` keeps for its kind.
    ///
    /// Returns `Ok(false)` when the child is already there, when an
    /// identifiable sibling already carries the child's id, or when a
    /// single-child slot is occupied.
    pub fn append(&mut self, owner: ElementId, child: ElementId) -> NclResult<bool> {
        let child_tag = self
            .registry
            .tag(child)
            .ok_or(NclError::UnknownElement(child))?;
        let owner_tag = self
            .registry
            .tag(owner)
            .ok_or(NclError::UnknownElement(owner))?;

        let Self {
            elements, registry, ..
        } = &mut *self;
        let container = elements
            .get_mut(owner.index())
            .ok_or(NclError::UnknownElement(owner))?
            .markup_mut()
            .container(child_tag)
            .ok_or(NclError::InvalidChild {
                parent: owner_tag,
                child: child_tag,
            })?;
        let added = container.add(registry, child, owner)?;

        if added {
            self.rejoin_aliases(child);
            debug!("appended <{}> {} to <{}> {}", child_tag, child, owner_tag, owner);
            self.emit(ChangeEvent::ElementAdded {
                parent: owner,
                child,
                tag: child_tag,
            });
        }
        Ok(added)
    }

    /// Clean `child`'s subtree and take it out of `owner`.
    ///
    /// Returns `Ok(false)` when `owner` does not hold `child`.
    pub fn remove(&mut self, owner: ElementId, child: ElementId) -> NclResult<bool> {
        let child_tag = self
            .registry
            .tag(child)
            .ok_or(NclError::UnknownElement(child))?;
        let owner_tag = self
            .registry
            .tag(owner)
            .ok_or(NclError::UnknownElement(owner))?;
        if self.registry.parent(child) != Some(owner) {
            return Ok(false);
        }

        self.clean(child);

        let Self {
            elements, registry, ..
        } = &mut *self;
        let container = elements
            .get_mut(owner.index())
            .ok_or(NclError::UnknownElement(owner))?
            .markup_mut()
            .container(child_tag)
            .ok_or(NclError::InvalidChild {
                parent: owner_tag,
                child: child_tag,
            })?;
        let removed = container.remove(registry, child)?;

        if removed {
            debug!("removed <{}> {} from <{}> {}", child_tag, child, owner_tag, owner);
            self.emit(ChangeEvent::ElementRemoved {
                parent: owner,
                child,
                tag: child_tag,
            });
        }
        Ok(removed)
    }

    /// Remove the child of `owner` that carries `id`.
    pub fn remove_by_id(&mut self, owner: ElementId, id: &str) -> NclResult<bool> {
        let id = check_query(id)?;
        if !self.contains(owner) {
            return Err(NclError::UnknownElement(owner));
        }
        let Some(child) = self
            .children(owner)
            .into_iter()
            .find(|c| self.id(*c) == Some(id))
        else {
            return Ok(false);
        };
        self.remove(owner, child)
    }

    /// Remove `element` from whichever element owns it.
    pub fn detach(&mut self, element: ElementId) -> NclResult<bool> {
        match self.registry.parent(element) {
            Some(parent) => self.remove(parent, element),
            None => Ok(false),
        }
    }

    /// First element under `scope` (inclusive) carrying `id`.
    pub fn find(&self, scope: ElementId, id: &str) -> NclResult<Option<ElementId>> {
        let id = check_query(id)?;
        Ok(self
            .descendants(scope)
            .into_iter()
            .find(|e| self.id(*e) == Some(id)))
    }

    /// Like [`find`](Self::find), restricted to the kinds `K` accepts.
    pub fn find_kind<K: Target>(&self, scope: ElementId, id: &str) -> NclResult<Option<ElementId>> {
        let id = check_query(id)?;
        Ok(self.descendants(scope).into_iter().find(|e| {
            self.id(*e) == Some(id) && self.registry.tag(*e).is_some_and(K::accepts)
        }))
    }

    /// The `importNCL`/`importBase` under `document` declaring `alias`.
    pub fn find_import(&self, document: ElementId, alias: &str) -> Option<ElementId> {
        self.descendants(document)
            .into_iter()
            .find(|e| self.alias_name(*e) == Some(alias))
    }

    /// The alias text of an import element.
    pub fn alias_name(&self, element: ElementId) -> Option<&str> {
        match self.element(element)? {
            Element::ImportNcl(import) => Some(import.alias()),
            Element::ImportBase(import) => Some(import.alias()),
            _ => None,
        }
    }

    /// Root of the document loaded for an import element.
    pub fn imported_document(&self, import: ElementId) -> Option<ElementId> {
        match self.element(import)? {
            Element::ImportNcl(import) => import.imported(),
            Element::ImportBase(import) => import.imported(),
            _ => None,
        }
    }

    /// Record `root` as the document an import element stands for.
    pub fn attach_import_document(&mut self, import: ElementId, root: ElementId) -> NclResult<()> {
        match self.registry.tag(root) {
            Some(ElementTag::Ncl) => {}
            Some(found) => {
                return Err(NclError::TargetMismatch {
                    expected: ElementTag::Ncl.name(),
                    found,
                })
            }
            None => return Err(NclError::UnknownElement(root)),
        }
        match self.elements.get_mut(import.index()) {
            Some(Element::ImportNcl(payload)) => payload.set_imported(root),
            Some(Element::ImportBase(payload)) => payload.set_imported(root),
            Some(other) => {
                return Err(NclError::TargetMismatch {
                    expected: "import",
                    found: other.tag(),
                })
            }
            None => return Err(NclError::UnknownElement(import)),
        }
        debug!("import {} now stands for document {}", import, root);
        Ok(())
    }

    fn check_target<K: Target>(&self, target: ElementId) -> NclResult<()> {
        let tag = self
            .registry
            .tag(target)
            .ok_or(NclError::NullReference { what: "target" })?;
        if !K::accepts(tag) {
            return Err(NclError::TargetMismatch {
                expected: K::NAME,
                found: tag,
            });
        }
        Ok(())
    }

    /// A reference to an element of the same document.
    pub fn reference<K: Target>(
        &mut self,
        target: ElementId,
        attribute: TargetAttribute,
    ) -> NclResult<Reference<K>> {
        self.check_target::<K>(target)?;
        let handle = self.registry.register_reference(None);
        Ok(Reference::new(target, attribute, None, handle))
    }

    /// A reference through an import alias. The alias records it so that
    /// removing the import invalidates it.
    pub fn aliased_reference<K: Target>(
        &mut self,
        alias: ElementId,
        target: ElementId,
        attribute: TargetAttribute,
    ) -> NclResult<Reference<K>> {
        match self.registry.tag(alias) {
            Some(tag) if tag.is_alias() => {}
            _ => return Err(NclError::NullReference { what: "alias" }),
        }
        self.check_target::<K>(target)?;
        let handle = self.registry.register_reference(Some(alias));
        Ok(Reference::new(target, attribute, Some(alias), handle))
    }

    /// Deregister a reference from its alias. Idempotent.
    pub fn release<K: Target>(&mut self, reference: &Reference<K>) -> bool {
        self.registry.release(reference.handle())
    }

    /// Number of live references registered through an import element.
    pub fn referrer_count(&self, alias: ElementId) -> usize {
        self.registry.referrer_count(alias)
    }

    /// Take the references owned by `element`'s subtree out of their aliases'
    /// referrer sets, and invalidate every reference that goes through an
    /// import inside it. References owned by the subtree stay resolvable.
    pub fn clean(&mut self, element: ElementId) {
        for node in self.descendants(element) {
            let Some(payload) = self.elements.get(node.index()) else {
                continue;
            };
            let tag = payload.tag();
            for handle in payload.markup().references() {
                self.registry.deregister(handle);
            }
            if tag.is_alias() {
                let count = self.registry.invalidate_referrers(node);
                if count > 0 {
                    debug!("import {} invalidated {} references", node, count);
                    self.emit(ChangeEvent::ReferencesInvalidated { alias: node, count });
                }
            }
        }
    }

    /// Serialize `element` and its subtree. A negative indent counts as 0.
    pub fn render(&self, element: ElementId, indent: i32) -> String {
        let mut out = String::new();
        writer::render(self, element, indent.max(0) as usize, &mut out);
        out
    }

    /// Serialize the main document with its XML declaration.
    pub fn to_xml(&self, config: &WriterConfig) -> String {
        let mut out = writer::header(config);
        writer::render(self, self.root, 0, &mut out);
        out
    }

    /// Check `element`'s subtree without failing.
    pub fn validate(&self, element: ElementId) -> Report {
        validator::validate(self, element)
    }

    /// Emit change events for every later mutation to `handle`.
    pub fn set_notifier(&mut self, handle: NotifierHandle) {
        self.notifier = Some(handle);
    }

    pub fn clear_notifier(&mut self) -> Option<NotifierHandle> {
        self.notifier.take()
    }

    fn emit(&self, event: ChangeEvent) {
        if let Some(notifier) = &self.notifier {
            if let Err(err) = notifier.add_notification(event) {
                warn!("dropping change event: {}", err);
            }
        }
    }

    pub(crate) fn registry(&self) -> &Registry {
        &self.registry
    }
}

fn payload_references(elements: &[Element], element: ElementId) -> Vec<RefHandle> {
    elements
        .get(element.index())
        .map(|e| e.markup().references())
        .unwrap_or_default()
}
