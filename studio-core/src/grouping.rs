//! Group membership and coordinate-space conversion.
//!
//! Children of a group store their transform relative to the group's
//! origin. A group's own transform is always the bounding box of its
//! children, so any change to membership or child geometry re-bounds the
//! group and, transitively, its ancestors.

use crate::geometry::{self, Rect};
use crate::id::IdProvider;
use crate::store::ElementStore;
use crate::{Element, ElementId, ElementKind, Transform};

/// Group top-level elements under a new group placed front-most.
///
/// Unknown, duplicate and already-grouped ids are ignored. Returns the new
/// group's id, or `None` when fewer than two elements qualify.
pub fn group(
    store: &mut ElementStore,
    ids: &[ElementId],
    id_provider: &mut dyn IdProvider,
) -> Option<ElementId> {
    let mut members: Vec<ElementId> = Vec::with_capacity(ids.len());
    for id in ids {
        let top_level = store.get(id).is_some_and(|e| e.parent.is_none());
        if top_level && !members.contains(id) {
            members.push(id.clone());
        }
    }
    if members.len() < 2 {
        tracing::debug!("Group needs two top-level elements, got {}", members.len());
        return None;
    }

    // Preserve relative stacking.
    members.sort_by_key(|id| store.order_index(id).unwrap_or(usize::MAX));

    let bounds = geometry::union_all(
        members
            .iter()
            .filter_map(|id| store.get(id))
            .map(|e| e.transform.rect()),
    )?;

    let group_id = store.mint_id(id_provider);
    for id in &members {
        if let Some(child) = store.get_mut(id) {
            child.transform.x -= bounds.x;
            child.transform.y -= bounds.y;
            child.parent = Some(group_id.clone());
        }
    }
    store.order_mut().retain(|id| !members.contains(id));

    let group = Element::new(group_id.clone(), ElementKind::Group { children: members })
        .with_transform(Transform::new(bounds.x, bounds.y, bounds.width, bounds.height));
    store.insert(group);

    tracing::debug!("Created group {group_id} at {bounds:?}");
    Some(group_id)
}

/// Dissolve a group, releasing its children into the group's own slot.
///
/// Returns the released child ids, or `None` if `id` is not a group.
pub fn ungroup(store: &mut ElementStore, id: &ElementId) -> Option<Vec<ElementId>> {
    let group = store.get(id)?;
    let children = group.children()?.to_vec();
    let Transform { x: gx, y: gy, .. } = group.transform;
    let parent = group.parent.clone();

    for child_id in &children {
        if let Some(child) = store.get_mut(child_id) {
            child.transform.x += gx;
            child.transform.y += gy;
            child.parent.clone_from(&parent);
        }
    }

    if let Some(siblings) = store.siblings_mut(parent.as_ref()) {
        if let Some(slot) = siblings.iter().position(|sid| sid == id) {
            siblings.splice(slot..=slot, children.iter().cloned());
        }
    }
    store.remove(id);

    if let Some(parent) = &parent {
        rebound(store, parent);
    }

    tracing::debug!("Ungrouped {id} into {} children", children.len());
    Some(children)
}

/// Recompute a group's frame from its children and walk up the ancestors.
///
/// Children shift by the same amount the group origin moves, so absolute
/// positions are preserved. Groups left without children are removed.
pub fn rebound(store: &mut ElementStore, group_id: &ElementId) {
    let mut current = Some(group_id.clone());
    while let Some(gid) = current.take() {
        let Some(group) = store.get(&gid) else {
            break;
        };
        let Some(children) = group.children().map(<[ElementId]>::to_vec) else {
            break;
        };
        let parent = group.parent.clone();
        let frame = group.transform;

        if children.is_empty() {
            tracing::debug!("Removing empty group {gid}");
            detach(store, &gid);
            store.remove(&gid);
            current = parent;
            continue;
        }

        let Some(bounds) = geometry::union_all(
            children
                .iter()
                .filter_map(|c| store.get(c))
                .map(|c| c.transform.rect()),
        ) else {
            break;
        };

        let unchanged = bounds == Rect::new(0.0, 0.0, frame.width, frame.height);
        if unchanged {
            break;
        }

        for child_id in &children {
            if let Some(child) = store.get_mut(child_id) {
                child.transform.x -= bounds.x;
                child.transform.y -= bounds.y;
            }
        }
        if let Some(group) = store.get_mut(&gid) {
            group.transform.x += bounds.x;
            group.transform.y += bounds.y;
            group.transform.width = bounds.width;
            group.transform.height = bounds.height;
        }
        current = parent;
    }
}

/// Remove an element and its whole subtree, re-bounding the former parent.
pub fn remove_subtree(store: &mut ElementStore, id: &ElementId) {
    let Some(parent) = store.get(id).map(|e| e.parent.clone()) else {
        return;
    };
    for descendant in store.descendants(id) {
        store.remove(&descendant);
    }
    detach(store, id);
    store.remove(id);
    if let Some(parent) = parent {
        rebound(store, &parent);
    }
}

/// Replace an element's transform, keeping group geometry consistent.
///
/// Resizing a group scales its subtree; changing a grouped element
/// re-bounds its ancestors. Returns whether anything changed.
#[allow(clippy::float_cmp)]
pub fn set_transform(store: &mut ElementStore, id: &ElementId, transform: Transform) -> bool {
    let Some(element) = store.get(id) else {
        return false;
    };
    let old = element.transform;
    let mut transform = transform;
    if element.is_group() {
        // A collapsed axis has no span to scale, so its extent stays pinned to the children.
        transform.width = if old.width > 0.0 { transform.width.max(0.0) } else { old.width };
        transform.height = if old.height > 0.0 { transform.height.max(0.0) } else { old.height };
    }
    if old == transform {
        return false;
    }
    let parent = element.parent.clone();

    if element.is_group() && (old.width != transform.width || old.height != transform.height) {
        let fx = if old.width > 0.0 { transform.width / old.width } else { 1.0 };
        let fy = if old.height > 0.0 { transform.height / old.height } else { 1.0 };
        for descendant in store.descendants(id) {
            if let Some(child) = store.get_mut(&descendant) {
                child.transform.x *= fx;
                child.transform.y *= fy;
                child.transform.width *= fx;
                child.transform.height *= fy;
            }
        }
    }

    if let Some(element) = store.get_mut(id) {
        element.transform = transform;
    }
    if let Some(parent) = parent {
        rebound(store, &parent);
    }
    true
}

/// Unlink an element from whichever sibling list holds it.
fn detach(store: &mut ElementStore, id: &ElementId) {
    let parent = store.get(id).and_then(|e| e.parent.clone());
    if let Some(siblings) = store.siblings_mut(parent.as_ref()) {
        siblings.retain(|sid| sid != id);
    }
}
