//! Pick a subset of a JSON value, by key or by deep path, into a new object.
//!
//! ```
//! use pickpath_core::pick;
//! use serde_json::json;
//!
//! let source = json!({"a": 1, "b": {"c": 2, "d": 3}, "array": [1, 2, 3]});
//! let picked = pick!(&source, "a", ["b.c", "array[2]"]);
//!
//! assert_eq!(picked.to_value(), json!({"a": 1, "b": {"c": 2}, "array": [null, null, 3]}));
//! ```
use once_cell::sync::Lazy;
use serde_json::Value;

pub mod mutation;
pub mod parser;
pub mod path_spec;
pub mod picker;
pub mod selection;
pub mod traversal;
pub mod types;

pub use parser::{Path, PathSegment, parse_path};
pub use path_spec::{PathSpec, PickTarget};
pub use picker::{Picker, PickerConfig};
pub use selection::{Picked, Selection, SparseArray};
pub use types::{TraversalError, TraversalResult};

/// Something that is `JsonLike` is a type that can be converted to and from a `serde_json::Value`.
pub trait JsonLike {
    fn to_json(&self) -> serde_json::Result<Value>;
    fn from_json(json: Value) -> serde_json::Result<Self>
    where
        Self: Sized;
}

static DEFAULT_PICKER: Lazy<Picker> = Lazy::new(Picker::new);

/// Pick `paths` out of `source` into a new object.
///
/// Never fails: paths that do not resolve contribute nothing, and a nullish
/// source gives an empty selection. Use a strict [`Picker`] to see why a path
/// was skipped.
pub fn pick<'a>(source: impl Into<Option<&'a Value>>, paths: &[PathSpec]) -> Selection {
    // The default picker is lenient and cannot fail
    DEFAULT_PICKER.pick(source, paths).unwrap_or_default()
}

/// Variadic form of [`pick()`]: every argument after the source is converted
/// with `PathSpec::from`, so strings, numbers, arrays and paths can be mixed.
#[macro_export]
macro_rules! pick {
    ($source:expr $(, $path:expr)* $(,)?) => {
        $crate::pick($source, &[$($crate::PathSpec::from($path)),*])
    };
}

impl JsonLike for Selection {
    fn to_json(&self) -> serde_json::Result<Value> {
        Ok(self.to_value())
    }

    fn from_json(json: Value) -> serde_json::Result<Self> {
        match json {
            Value::Object(map) => Ok(Selection::from(map)),
            other => Err(serde::de::Error::custom(format!(
                "expected an object, found {}",
                traversal::kind_of(&other)
            ))),
        }
    }
}
