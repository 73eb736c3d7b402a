use serde_json::Value;
use std::borrow::Cow;

use crate::parser::{Path, PathSegment, canonical_index};
use crate::path_spec::PickTarget;
use crate::types::{TraversalError, TraversalResult};

/// One hop of a resolved route, recorded with the shape of the container it went through
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// A named property: an object entry, or a virtual property such as `length`
    Field(String),
    /// A position inside an array (or a character of a string)
    Slot(usize),
}

/// A value found in the source, along with the route that reached it
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<'a> {
    pub route: Vec<Step>,
    /// Borrowed from the source, or owned when produced by a virtual property
    pub value: Cow<'a, Value>,
}

/// Resolve a single pick target against `source`.
///
/// A `Key` target is first tried as one literal property; only when that
/// misses is it parsed as a dot/bracket path and walked.
pub fn resolve<'a>(
    source: &'a Value,
    target: PickTarget<'_>,
    virtual_properties: bool,
) -> TraversalResult<Resolved<'a>> {
    match target {
        PickTarget::Key(key) => {
            if let Ok((_, value)) = lookup_key(source, key, virtual_properties) {
                return Ok(Resolved {
                    route: vec![Step::Field(key.to_string())],
                    value,
                });
            }
            let path = Path::parse(key)?;
            walk(source, &path.segments, virtual_properties)
        }
        PickTarget::Segments(segments) => walk(source, segments, virtual_properties),
    }
}

/// Walk `source` along `segments`, failing on the first one that is absent.
pub fn walk<'a>(
    source: &'a Value,
    segments: &[PathSegment],
    virtual_properties: bool,
) -> TraversalResult<Resolved<'a>> {
    if segments.is_empty() {
        return Err(TraversalError::InvalidPath("Empty path".to_string()));
    }

    let mut route = Vec::with_capacity(segments.len());
    let mut current = Cow::Borrowed(source);
    for segment in segments {
        let (step, next) = match current {
            Cow::Borrowed(value) => lookup(value, segment, virtual_properties)?,
            Cow::Owned(value) => {
                let (step, next) = lookup(&value, segment, virtual_properties)?;
                (step, Cow::Owned(next.into_owned()))
            }
        };
        route.push(step);
        current = next;
    }

    Ok(Resolved {
        route,
        value: current,
    })
}

/// Look up one segment on a container value
pub fn lookup<'a>(
    container: &'a Value,
    segment: &PathSegment,
    virtual_properties: bool,
) -> TraversalResult<(Step, Cow<'a, Value>)> {
    match segment {
        PathSegment::Key(key) => lookup_key(container, key, virtual_properties),
        PathSegment::Index(idx) => lookup_index(container, *idx, virtual_properties),
    }
}

fn lookup_key<'a>(
    container: &'a Value,
    key: &str,
    virtual_properties: bool,
) -> TraversalResult<(Step, Cow<'a, Value>)> {
    match container {
        Value::Object(map) => map
            .get(key)
            .map(|value| (Step::Field(key.to_string()), Cow::Borrowed(value)))
            .ok_or_else(|| TraversalError::KeyNotFound(key.to_string())),
        Value::Array(_) | Value::String(_) => {
            if let Some(idx) = canonical_index(key) {
                return lookup_index(container, idx, virtual_properties);
            }
            match length_of(container) {
                Some(len) if virtual_properties && key == "length" => Ok((
                    Step::Field(key.to_string()),
                    Cow::Owned(Value::from(len)),
                )),
                _ => Err(TraversalError::KeyNotFound(key.to_string())),
            }
        }
        other => Err(TraversalError::TypeMismatch(format!(
            "cannot look up key '{}' on {}",
            key,
            kind_of(other)
        ))),
    }
}

fn lookup_index<'a>(
    container: &'a Value,
    idx: usize,
    virtual_properties: bool,
) -> TraversalResult<(Step, Cow<'a, Value>)> {
    match container {
        Value::Array(items) => items
            .get(idx)
            .map(|value| (Step::Slot(idx), Cow::Borrowed(value)))
            .ok_or(TraversalError::IndexOutOfRange(idx)),
        Value::String(s) if virtual_properties => s
            .chars()
            .nth(idx)
            .map(|c| (Step::Slot(idx), Cow::Owned(Value::String(c.to_string()))))
            .ok_or(TraversalError::IndexOutOfRange(idx)),
        // Objects may hold numeric keys
        Value::Object(map) => {
            let key = idx.to_string();
            match map.get(&key) {
                Some(value) => Ok((Step::Field(key), Cow::Borrowed(value))),
                None => Err(TraversalError::KeyNotFound(key)),
            }
        }
        other => Err(TraversalError::TypeMismatch(format!(
            "cannot index [{}] into {}",
            idx,
            kind_of(other)
        ))),
    }
}

// Character count for strings, element count for arrays
fn length_of(value: &Value) -> Option<usize> {
    match value {
        Value::Array(items) => Some(items.len()),
        Value::String(s) => Some(s.chars().count()),
        _ => None,
    }
}

pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
