//! Ordered, duplicate-free element containers.
//!
//! Every base (region base, descriptor base, ...) and every composite
//! element stores its children in one of these lists. Insertion order is
//! the serialization order. Adding an element assigns its parent; removing
//! it clears the parent again.

use std::slice;

use log::debug;

use crate::document::NclDocument;
use crate::error::{NclError, NclResult};
use crate::registry::{ElementId, Registry};

/// Ordered container with uniqueness by element identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementList {
    items: Vec<ElementId>,
}

impl ElementList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, element: ElementId) -> bool {
        self.items.contains(&element)
    }

    pub fn iter(&self) -> slice::Iter<'_, ElementId> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[ElementId] {
        &self.items
    }

    /// Append `element`, making `owner` its parent.
    ///
    /// Returns `Ok(false)` when the element is already in the list and
    /// [`NclError::AlreadyOwned`] when another element owns it.
    pub(crate) fn add(
        &mut self,
        registry: &mut Registry,
        element: ElementId,
        owner: ElementId,
    ) -> NclResult<bool> {
        if self.contains(element) {
            return Ok(false);
        }
        registry.set_parent(element, Some(owner))?;
        self.items.push(element);
        Ok(true)
    }

    pub(crate) fn remove(&mut self, registry: &mut Registry, element: ElementId) -> NclResult<bool> {
        let Some(position) = self.items.iter().position(|e| *e == element) else {
            return Ok(false);
        };
        self.items.remove(position);
        registry.set_parent(element, None)?;
        Ok(true)
    }
}

impl<'a> IntoIterator for &'a ElementList {
    type Item = &'a ElementId;
    type IntoIter = slice::Iter<'a, ElementId>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Element list whose members are also unique by id, with id lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentifiableElementList {
    inner: ElementList,
}

pub(crate) fn check_query(id: &str) -> NclResult<&str> {
    let id = id.trim();
    if id.is_empty() {
        return Err(NclError::InvalidQuery {
            reason: "lookup id must not be empty".to_string(),
        });
    }
    Ok(id)
}

impl IdentifiableElementList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn contains(&self, element: ElementId) -> bool {
        self.inner.contains(element)
    }

    pub fn iter(&self) -> slice::Iter<'_, ElementId> {
        self.inner.iter()
    }

    pub fn as_slice(&self) -> &[ElementId] {
        self.inner.as_slice()
    }

    /// Find the member with the given id.
    ///
    /// An empty id is a malformed query and fails with
    /// [`NclError::InvalidQuery`]; an id nobody carries yields `Ok(None)`.
    pub fn get(&self, doc: &NclDocument, id: &str) -> NclResult<Option<ElementId>> {
        self.lookup(doc.registry(), id)
    }

    pub(crate) fn lookup(&self, registry: &Registry, id: &str) -> NclResult<Option<ElementId>> {
        let id = check_query(id)?;
        Ok(self
            .inner
            .iter()
            .copied()
            .find(|e| registry.id(*e).is_some_and(|current| current == id)))
    }

    pub(crate) fn add(
        &mut self,
        registry: &mut Registry,
        element: ElementId,
        owner: ElementId,
    ) -> NclResult<bool> {
        if let Some(id) = registry.id(element) {
            if self.lookup(registry, id.as_str())?.is_some() {
                debug!("list of {} already holds an element with id '{}'", owner, id);
                return Ok(false);
            }
        }
        self.inner.add(registry, element, owner)
    }

    pub(crate) fn remove(&mut self, registry: &mut Registry, element: ElementId) -> NclResult<bool> {
        self.inner.remove(registry, element)
    }
}

impl<'a> IntoIterator for &'a IdentifiableElementList {
    type Item = &'a ElementId;
    type IntoIter = slice::Iter<'a, ElementId>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}

/// Mutable view of the container an owner uses for one child kind.
pub(crate) enum Container<'a> {
    List(&'a mut ElementList),
    Identified(&'a mut IdentifiableElementList),
    /// A single-child position, e.g. the `<head>` of an `<ncl>`.
    Slot(&'a mut Option<ElementId>),
}

impl Container<'_> {
    pub(crate) fn add(
        self,
        registry: &mut Registry,
        element: ElementId,
        owner: ElementId,
    ) -> NclResult<bool> {
        match self {
            Container::List(list) => list.add(registry, element, owner),
            Container::Identified(list) => list.add(registry, element, owner),
            Container::Slot(slot) => {
                if slot.is_some() {
                    return Ok(false);
                }
                registry.set_parent(element, Some(owner))?;
                *slot = Some(element);
                Ok(true)
            }
        }
    }

    pub(crate) fn remove(self, registry: &mut Registry, element: ElementId) -> NclResult<bool> {
        match self {
            Container::List(list) => list.remove(registry, element),
            Container::Identified(list) => list.remove(registry, element),
            Container::Slot(slot) => {
                if *slot != Some(element) {
                    return Ok(false);
                }
                *slot = None;
                registry.set_parent(element, None)?;
                Ok(true)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::ElementTag;
    use crate::identifier::Identifier;
    use proptest::prelude::*;

    fn region(registry: &mut Registry, id: &str) -> ElementId {
        let element = registry.push(ElementTag::Region);
        registry.set_id(element, Identifier::new(id).unwrap()).unwrap();
        element
    }

    #[test]
    fn test_add_sets_parent_and_preserves_order() {
        let mut registry = Registry::default();
        let owner = registry.push(ElementTag::RegionBase);
        let a = region(&mut registry, "a");
        let b = region(&mut registry, "b");
        let mut list = IdentifiableElementList::new();

        assert!(list.add(&mut registry, b, owner).unwrap());
        assert!(list.add(&mut registry, a, owner).unwrap());
        assert_eq!(list.as_slice(), &[b, a]);
        assert_eq!(registry.parent(a), Some(owner));
    }

    #[test]
    fn test_duplicate_id_is_rejected_without_growing() {
        let mut registry = Registry::default();
        let owner = registry.push(ElementTag::RegionBase);
        let first = region(&mut registry, "rg1");
        let clash = region(&mut registry, "rg1");
        let mut list = IdentifiableElementList::new();

        assert!(list.add(&mut registry, first, owner).unwrap());
        assert!(!list.add(&mut registry, first, owner).unwrap());
        assert!(!list.add(&mut registry, clash, owner).unwrap());
        assert_eq!(list.len(), 1);
        assert_eq!(registry.parent(clash), None);
    }

    #[test]
    fn test_lookup_distinguishes_malformed_from_absent() {
        let mut registry = Registry::default();
        let owner = registry.push(ElementTag::RegionBase);
        let a = region(&mut registry, "a");
        let mut list = IdentifiableElementList::new();
        list.add(&mut registry, a, owner).unwrap();

        assert_eq!(list.lookup(&registry, "a").unwrap(), Some(a));
        assert_eq!(list.lookup(&registry, "zz").unwrap(), None);
        assert!(matches!(
            list.lookup(&registry, ""),
            Err(NclError::InvalidQuery { .. })
        ));
        assert!(list.lookup(&registry, "  ").is_err());
    }

    #[test]
    fn test_remove_clears_parent() {
        let mut registry = Registry::default();
        let owner = registry.push(ElementTag::Context);
        let property = registry.push(ElementTag::Property);
        let mut list = ElementList::new();
        list.add(&mut registry, property, owner).unwrap();

        assert!(list.remove(&mut registry, property).unwrap());
        assert!(!list.remove(&mut registry, property).unwrap());
        assert_eq!(registry.parent(property), None);
    }

    #[test]
    fn test_slot_holds_one_element() {
        let mut registry = Registry::default();
        let owner = registry.push(ElementTag::Ncl);
        let head = registry.push(ElementTag::Head);
        let other = registry.push(ElementTag::Head);
        let mut slot = None;

        assert!(Container::Slot(&mut slot).add(&mut registry, head, owner).unwrap());
        assert!(!Container::Slot(&mut slot).add(&mut registry, other, owner).unwrap());
        assert!(Container::Slot(&mut slot).remove(&mut registry, head).unwrap());
        assert_eq!(slot, None);
    }

    proptest! {
        #[test]
        fn prop_list_never_holds_duplicates(picks in proptest::collection::vec(0usize..6, 0..30)) {
            let mut registry = Registry::default();
            let owner = registry.push(ElementTag::Context);
            let pool: Vec<ElementId> = (0..6).map(|_| registry.push(ElementTag::Property)).collect();
            let mut list = ElementList::new();
            for pick in picks {
                list.add(&mut registry, pool[pick], owner).unwrap();
            }
            let mut seen = list.as_slice().to_vec();
            seen.sort();
            seen.dedup();
            prop_assert_eq!(seen.len(), list.len());
        }
    }
}
