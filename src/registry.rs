//! Arena bookkeeping shared by every element.
//!
//! Element payloads live in the document's element vector. Everything the
//! core needs to enforce its invariants (parent links, identifiers, the
//! alias back-reference sets) lives here instead, indexed by [`ElementId`].
//! Keeping the two apart lets a container update its members' parents while
//! the container's own payload is mutably borrowed.

use std::fmt;
use std::num::NonZeroU32;

use log::trace;

use crate::elements::{ElementTag, Identity};
use crate::error::{NclError, NclResult};
use crate::identifier::Identifier;

/// A typed index into a document's element arena.
///
/// `Option<ElementId>` is the same size as `ElementId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct ElementId(NonZeroU32);

impl ElementId {
    fn from_index(index: usize) -> Self {
        ElementId(NonZeroU32::MIN.saturating_add(index as u32))
    }

    pub(crate) fn index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle of a registered reference, used by aliases to track their referrers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RefHandle(usize);

#[derive(Debug)]
struct Entry {
    tag: ElementTag,
    parent: Option<ElementId>,
    id: Option<Identifier>,
    /// References registered through this element when it acts as an alias.
    referrers: Vec<RefHandle>,
}

#[derive(Debug)]
struct RefEntry {
    alias: Option<ElementId>,
    attached: bool,
}

#[derive(Debug, Default)]
pub(crate) struct Registry {
    entries: Vec<Entry>,
    refs: Vec<RefEntry>,
}

impl Registry {
    pub(crate) fn push(&mut self, tag: ElementTag) -> ElementId {
        let element = ElementId::from_index(self.entries.len());
        self.entries.push(Entry {
            tag,
            parent: None,
            id: None,
            referrers: Vec::new(),
        });
        element
    }

    fn entry(&self, element: ElementId) -> NclResult<&Entry> {
        self.entries
            .get(element.index())
            .ok_or(NclError::UnknownElement(element))
    }

    fn entry_mut(&mut self, element: ElementId) -> NclResult<&mut Entry> {
        self.entries
            .get_mut(element.index())
            .ok_or(NclError::UnknownElement(element))
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn ids(&self) -> impl Iterator<Item = ElementId> {
        (0..self.entries.len()).map(ElementId::from_index)
    }

    pub(crate) fn contains(&self, element: ElementId) -> bool {
        element.index() < self.entries.len()
    }

    pub(crate) fn tag(&self, element: ElementId) -> Option<ElementTag> {
        self.entries.get(element.index()).map(|e| e.tag)
    }

    pub(crate) fn parent(&self, element: ElementId) -> Option<ElementId> {
        self.entries.get(element.index()).and_then(|e| e.parent)
    }

    /// Attach `element` to `parent`, or detach it when `parent` is `None`.
    ///
    /// An element has at most one owner: attaching an element that already
    /// has a different parent fails with [`NclError::AlreadyOwned`].
    /// Detaching always succeeds.
    pub(crate) fn set_parent(
        &mut self,
        element: ElementId,
        parent: Option<ElementId>,
    ) -> NclResult<()> {
        let Some(new_parent) = parent else {
            self.entry_mut(element)?.parent = None;
            return Ok(());
        };

        let entry = self.entry(element)?;
        let parent_tag = self.entry(new_parent)?.tag;
        match entry.parent {
            Some(current) if current == new_parent => return Ok(()),
            Some(current) => {
                return Err(NclError::AlreadyOwned {
                    element,
                    parent: current,
                })
            }
            None => {}
        }

        // Refuse to make an element its own ancestor.
        let mut cursor = Some(new_parent);
        while let Some(ancestor) = cursor {
            if ancestor == element {
                return Err(NclError::InvalidChild {
                    parent: parent_tag,
                    child: entry.tag,
                });
            }
            cursor = self.parent(ancestor);
        }

        self.entry_mut(element)?.parent = Some(new_parent);
        Ok(())
    }

    pub(crate) fn id(&self, element: ElementId) -> Option<&Identifier> {
        self.entries.get(element.index()).and_then(|e| e.id.as_ref())
    }

    /// Store a new identifier and return the previous one.
    pub(crate) fn set_id(
        &mut self,
        element: ElementId,
        id: Identifier,
    ) -> NclResult<Option<Identifier>> {
        let entry = self.entry_mut(element)?;
        if entry.tag.identity() == Identity::Never {
            return Err(NclError::NotIdentifiable { tag: entry.tag });
        }
        Ok(entry.id.replace(id))
    }

    /// Register a new reference, recording it with `alias` when present.
    pub(crate) fn register_reference(&mut self, alias: Option<ElementId>) -> RefHandle {
        let handle = RefHandle(self.refs.len());
        self.refs.push(RefEntry {
            alias,
            attached: true,
        });
        if let Some(entry) = alias.and_then(|a| self.entries.get_mut(a.index())) {
            entry.referrers.push(handle);
        }
        trace!("registered reference {:?} through alias {:?}", handle, alias);
        handle
    }

    pub(crate) fn is_attached(&self, handle: RefHandle) -> bool {
        self.refs.get(handle.0).is_some_and(|r| r.attached)
    }

    /// Detach a reference from its alias. Returns whether it was attached.
    pub(crate) fn release(&mut self, handle: RefHandle) -> bool {
        let Some(reference) = self.refs.get_mut(handle.0) else {
            return false;
        };
        if !reference.attached {
            return false;
        }
        reference.attached = false;
        if let Some(alias) = reference.alias {
            if let Some(entry) = self.entries.get_mut(alias.index()) {
                entry.referrers.retain(|h| *h != handle);
            }
        }
        trace!("released reference {:?}", handle);
        true
    }

    /// Take a reference out of its alias's referrer set. It stays resolvable.
    pub(crate) fn deregister(&mut self, handle: RefHandle) {
        let Some(alias) = self.refs.get(handle.0).and_then(|r| r.alias) else {
            return;
        };
        if let Some(entry) = self.entries.get_mut(alias.index()) {
            entry.referrers.retain(|h| *h != handle);
        }
    }

    /// Put a live reference back into its alias's referrer set.
    pub(crate) fn reregister(&mut self, handle: RefHandle) {
        let Some(reference) = self.refs.get(handle.0) else {
            return;
        };
        let (Some(alias), true) = (reference.alias, reference.attached) else {
            return;
        };
        if let Some(entry) = self.entries.get_mut(alias.index()) {
            if !entry.referrers.contains(&handle) {
                entry.referrers.push(handle);
            }
        }
    }

    /// Invalidate every reference registered through `alias`.
    pub(crate) fn invalidate_referrers(&mut self, alias: ElementId) -> usize {
        let Some(entry) = self.entries.get_mut(alias.index()) else {
            return 0;
        };
        let handles = std::mem::take(&mut entry.referrers);
        for handle in &handles {
            if let Some(reference) = self.refs.get_mut(handle.0) {
                reference.attached = false;
            }
        }
        handles.len()
    }

    pub(crate) fn referrer_count(&self, alias: ElementId) -> usize {
        self.entries
            .get(alias.index())
            .map_or(0, |e| e.referrers.len())
    }
}
