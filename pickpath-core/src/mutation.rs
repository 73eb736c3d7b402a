use serde_json::Value;
use std::collections::BTreeMap;

use crate::selection::{Picked, Selection, SparseArray};
use crate::traversal::Step;
use crate::types::{TraversalError, TraversalResult};

/// Container type determination for path mutation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ContainerType {
    Dict,
    List,
}

/// Determine what type of container is needed to hold the given step
pub fn determine_container_type(step: &Step) -> ContainerType {
    match step {
        Step::Field(_) => ContainerType::Dict,
        Step::Slot(_) => ContainerType::List,
    }
}

fn empty_container(container_type: ContainerType) -> Picked {
    match container_type {
        ContainerType::Dict => Picked::Object(BTreeMap::new()),
        ContainerType::List => Picked::Array(SparseArray::new()),
    }
}

// Placeholder for a node that still has `rest` to descend through
fn placeholder(rest: &[Step]) -> Picked {
    rest.first()
        .map(determine_container_type)
        .map_or(Picked::Object(BTreeMap::new()), empty_container)
}

/// Write `value` into `selection` at the shape described by `route`.
///
/// The root is always an object, so a leading slot is stored under its decimal key.
/// A value already picked higher up the route absorbs the write; a write to
/// a shallower route replaces whatever was built beneath it.
pub fn insert_resolved(
    selection: &mut Selection,
    route: &[Step],
    value: Value,
) -> TraversalResult<()> {
    let Some((first, rest)) = route.split_first() else {
        return Err(TraversalError::InvalidPath("Empty path".to_string()));
    };

    let root_key = match first {
        Step::Field(key) => key.clone(),
        Step::Slot(idx) => idx.to_string(),
    };
    let node = selection
        .entries
        .entry(root_key)
        .or_insert_with(|| placeholder(rest));

    match rest.split_first() {
        None => *node = Picked::Value(value),
        Some((step, rest)) => place(node, step, rest, value),
    }
    Ok(())
}

fn place(node: &mut Picked, step: &Step, rest: &[Step], value: Value) {
    if matches!(node, Picked::Object(_)) && matches!(step, Step::Slot(_)) {
        // Only array-like sources produce slots, so the object here holds
        // virtual properties of that same array. Positions take precedence.
        tracing::trace!("replacing virtual properties with array positions");
        *node = Picked::Array(SparseArray::new());
    }

    let child = match (node, step) {
        (Picked::Value(_), _) => return,
        (Picked::Object(fields), Step::Field(key)) => fields
            .entry(key.clone())
            .or_insert_with(|| placeholder(rest)),
        (Picked::Array(array), Step::Slot(idx)) => array
            .slots
            .entry(*idx)
            .or_insert_with(|| placeholder(rest)),
        (Picked::Array(_), Step::Field(key)) => {
            tracing::trace!(key = %key, "dropping virtual property on a rebuilt array");
            return;
        }
        (Picked::Object(_), Step::Slot(_)) => return,
    };

    match rest.split_first() {
        None => *child = Picked::Value(value),
        Some((step, rest)) => place(child, step, rest, value),
    }
}
