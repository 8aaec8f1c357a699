//! Element storage: the id → element map plus top-level z-order.
//!
//! Both halves live behind `Arc` so history snapshots share structure with
//! the live document. Writers go through [`Arc::make_mut`], which clones the
//! map's pointer table on first write and only the elements actually
//! touched.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::geometry::{self, Rect};
use crate::id::IdProvider;
use crate::{CanvasError, CanvasResult, Element, ElementId};

/// Shared map from id to element.
pub type ElementMap = HashMap<ElementId, Arc<Element>>;

/// Canonical element storage for a document.
#[derive(Debug, Clone, Default)]
pub struct ElementStore {
    /// All elements, indexed by ID.
    elements: Arc<ElementMap>,
    /// Top-level element IDs, back-to-front.
    order: Arc<Vec<ElementId>>,
}

impl ElementStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from shared snapshot parts.
    #[must_use]
    pub fn from_shared(elements: Arc<ElementMap>, order: Arc<Vec<ElementId>>) -> Self {
        Self { elements, order }
    }

    /// Build a store from owned elements and an explicit z-order.
    ///
    /// No validation happens here; see [`ElementStore::check_invariants`].
    #[must_use]
    pub fn from_elements(elements: Vec<Element>, order: Vec<ElementId>) -> Self {
        let elements = elements
            .into_iter()
            .map(|element| (element.id.clone(), Arc::new(element)))
            .collect();
        Self {
            elements: Arc::new(elements),
            order: Arc::new(order),
        }
    }

    /// The shared element map, for snapshotting.
    #[must_use]
    pub fn shared_elements(&self) -> Arc<ElementMap> {
        Arc::clone(&self.elements)
    }

    /// The shared z-order, for snapshotting.
    #[must_use]
    pub fn shared_order(&self) -> Arc<Vec<ElementId>> {
        Arc::clone(&self.order)
    }

    /// Get an element by ID.
    #[must_use]
    pub fn get(&self, id: &ElementId) -> Option<&Element> {
        self.elements.get(id).map(|e| &**e)
    }

    /// Get a mutable reference to an element, cloning it if shared.
    pub fn get_mut(&mut self, id: &ElementId) -> Option<&mut Element> {
        Arc::make_mut(&mut self.elements)
            .get_mut(id)
            .map(Arc::make_mut)
    }

    /// Whether an element with this ID exists.
    #[must_use]
    pub fn contains(&self, id: &ElementId) -> bool {
        self.elements.contains_key(id)
    }

    /// Insert an element. Parent-less elements are placed front-most.
    pub fn insert(&mut self, element: Element) {
        let id = element.id.clone();
        if element.parent.is_none() && !self.order.contains(&id) {
            Arc::make_mut(&mut self.order).push(id.clone());
        }
        Arc::make_mut(&mut self.elements).insert(id, Arc::new(element));
    }

    /// Remove a single element from the map and the top-level order.
    ///
    /// Parent and child links are left to the caller.
    pub fn remove(&mut self, id: &ElementId) -> Option<Element> {
        if self.order.contains(id) {
            Arc::make_mut(&mut self.order).retain(|eid| eid != id);
        }
        Arc::make_mut(&mut self.elements)
            .remove(id)
            .map(Arc::unwrap_or_clone)
    }

    /// Top-level element IDs, back-to-front.
    #[must_use]
    pub fn order(&self) -> &[ElementId] {
        &self.order
    }

    /// Mutable top-level order.
    pub fn order_mut(&mut self) -> &mut Vec<ElementId> {
        Arc::make_mut(&mut self.order)
    }

    /// Iterate all elements in unspecified order.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.values().map(|e| &**e)
    }

    /// Iterate elements in paint order (back-to-front, parents before children).
    #[must_use]
    pub fn paint_order(&self) -> Vec<&Element> {
        let mut out = Vec::with_capacity(self.elements.len());
        for id in self.order.iter() {
            self.collect_subtree(id, &mut out);
        }
        out
    }

    fn collect_subtree<'a>(&'a self, id: &ElementId, out: &mut Vec<&'a Element>) {
        let Some(element) = self.get(id) else {
            return;
        };
        out.push(element);
        if let Some(children) = element.children() {
            for child in children {
                self.collect_subtree(child, out);
            }
        }
    }

    /// Number of elements, including group members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the store holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Position of a top-level element in the z-order.
    #[must_use]
    pub fn order_index(&self, id: &ElementId) -> Option<usize> {
        self.order.iter().position(|eid| eid == id)
    }

    /// The sibling list an element lives in: its group's children, or the
    /// top-level order.
    #[must_use]
    pub fn siblings(&self, id: &ElementId) -> Option<&[ElementId]> {
        match &self.get(id)?.parent {
            Some(parent) => self.get(parent)?.children(),
            None => Some(&self.order),
        }
    }

    /// Mutable sibling list under `parent` (`None` for the top level).
    pub fn siblings_mut(&mut self, parent: Option<&ElementId>) -> Option<&mut Vec<ElementId>> {
        match parent {
            Some(parent) => self.get_mut(parent)?.children_mut(),
            None => Some(self.order_mut()),
        }
    }

    /// Ancestors of an element, nearest first.
    #[must_use]
    pub fn ancestors(&self, id: &ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut current = self.get(id).and_then(|e| e.parent.clone());
        while let Some(parent) = current {
            if out.contains(&parent) {
                break;
            }
            current = self.get(&parent).and_then(|e| e.parent.clone());
            out.push(parent);
        }
        out
    }

    /// All descendants of an element in paint order, excluding itself.
    #[must_use]
    pub fn descendants(&self, id: &ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack: Vec<ElementId> = self
            .get(id)
            .and_then(Element::children)
            .map(|c| c.iter().rev().cloned().collect())
            .unwrap_or_default();
        let mut visited = HashSet::from([id.clone()]);
        while let Some(next) = stack.pop() {
            if !visited.insert(next.clone()) {
                continue;
            }
            if let Some(children) = self.get(&next).and_then(Element::children) {
                stack.extend(children.iter().rev().cloned());
            }
            out.push(next);
        }
        out
    }

    /// Absolute position of the coordinate space an element lives in.
    #[must_use]
    pub fn parent_origin(&self, id: &ElementId) -> (f32, f32) {
        self.ancestors(id)
            .iter()
            .filter_map(|ancestor| self.get(ancestor))
            .fold((0.0, 0.0), |(x, y), a| (x + a.transform.x, y + a.transform.y))
    }

    /// Absolute axis-aligned frame of an element.
    #[must_use]
    pub fn absolute_rect(&self, id: &ElementId) -> Option<Rect> {
        let element = self.get(id)?;
        let (ox, oy) = self.parent_origin(id);
        Some(element.transform.rect().translate(ox, oy))
    }

    /// Reduce a target list to existing elements, dropping duplicates and
    /// any element whose ancestor is also targeted.
    #[must_use]
    pub fn outermost(&self, ids: &[ElementId]) -> Vec<ElementId> {
        let requested: HashSet<&ElementId> = ids.iter().filter(|id| self.contains(id)).collect();
        let mut seen = HashSet::new();
        ids.iter()
            .filter(|id| requested.contains(id))
            .filter(|id| !self.ancestors(id).iter().any(|a| requested.contains(a)))
            .filter(|id| seen.insert((*id).clone()))
            .cloned()
            .collect()
    }

    /// Ask `ids` for a fresh id not present in this store.
    pub fn mint_id(&self, ids: &mut dyn IdProvider) -> ElementId {
        loop {
            let id = ids.next_id();
            if !self.contains(&id) {
                return id;
            }
            tracing::warn!("Id provider returned existing id {id}, retrying");
        }
    }

    /// Topmost visible top-level element whose absolute frame contains the
    /// point.
    #[must_use]
    pub fn hit_test(&self, x: f32, y: f32) -> Option<ElementId> {
        self.order
            .iter()
            .rev()
            .filter_map(|id| self.get(id))
            .find(|e| e.visible && e.contains_point(x, y))
            .map(|e| e.id.clone())
    }

    /// Whether both stores hold identical content.
    ///
    /// Shared pointers short-circuit, so comparing a store against its own
    /// copy-on-write descendant only inspects elements that were written.
    #[must_use]
    pub fn same_content(&self, other: &Self) -> bool {
        let order_same = Arc::ptr_eq(&self.order, &other.order) || self.order == other.order;
        if !order_same {
            return false;
        }
        if Arc::ptr_eq(&self.elements, &other.elements) {
            return true;
        }
        self.elements.len() == other.elements.len()
            && self.elements.iter().all(|(id, a)| {
                other
                    .elements
                    .get(id)
                    .is_some_and(|b| Arc::ptr_eq(a, b) || a == b)
            })
    }

    /// Verify z-order completeness, parent/child consistency and group
    /// bounds.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvariantViolation`] describing the first
    /// broken invariant.
    pub fn check_invariants(&self) -> CanvasResult<()> {
        let violation = |msg: String| Err(CanvasError::InvariantViolation(msg));

        let mut seen = HashSet::new();
        for id in self.order.iter() {
            let Some(element) = self.get(id) else {
                return violation(format!("z-order lists unknown element {id}"));
            };
            if element.parent.is_some() {
                return violation(format!("z-order lists grouped element {id}"));
            }
            if !seen.insert(id) {
                return violation(format!("z-order lists {id} twice"));
            }
        }

        for element in self.elements() {
            match &element.parent {
                None if !seen.contains(&element.id) => {
                    return violation(format!("top-level element {} missing from z-order", element.id));
                }
                None => {}
                Some(parent_id) => {
                    let Some(parent) = self.get(parent_id) else {
                        return violation(format!("{} points at missing parent {parent_id}", element.id));
                    };
                    match parent.children() {
                        Some(children) if children.contains(&element.id) => {}
                        Some(_) => {
                            return violation(format!("{parent_id} does not list child {}", element.id));
                        }
                        None => {
                            return violation(format!("parent {parent_id} of {} is not a group", element.id));
                        }
                    }
                }
            }

            let mut chain = HashSet::from([&element.id]);
            let mut root = element;
            while let Some(parent) = root.parent.as_ref().and_then(|p| self.get(p)) {
                if !chain.insert(&parent.id) {
                    return violation(format!("{} sits in a parent cycle", element.id));
                }
                root = parent;
            }
            if !seen.contains(&root.id) {
                return violation(format!("{} is not reachable from the z-order", element.id));
            }

            if let Some(children) = element.children() {
                let mut unique = HashSet::new();
                for child_id in children {
                    if !unique.insert(child_id) {
                        return violation(format!("{} lists child {child_id} twice", element.id));
                    }
                    let parent_ok = self
                        .get(child_id)
                        .is_some_and(|child| child.parent.as_ref() == Some(&element.id));
                    if !parent_ok {
                        return violation(format!(
                            "child {child_id} of {} does not point back at it",
                            element.id
                        ));
                    }
                }
                let bounds = geometry::union_all(
                    children
                        .iter()
                        .filter_map(|c| self.get(c))
                        .map(|c| c.transform.rect()),
                );
                let expected = Rect::new(0.0, 0.0, element.transform.width, element.transform.height);
                if !bounds.is_some_and(|b| b.approx_eq(&expected)) {
                    return violation(format!("group {} is not bounded by its children", element.id));
                }
            }
        }

        Ok(())
    }
}

impl PartialEq for ElementStore {
    fn eq(&self, other: &Self) -> bool {
        self.same_content(other)
    }
}
