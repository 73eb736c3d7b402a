use rustc_hash::FxHashSet;

use crate::parser::{Path, PathSegment};

/// A path argument to `pick`.
///
/// Arguments nest arbitrarily: a `List` may hold keys, segment paths or further
/// lists, and everything is flattened into one sequence of [`PickTarget`]s.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSpec {
    /// A literal key or a dot/bracket path string. Numbers are coerced to this form.
    Key(String),
    /// A pre-split path, walked as-is without parsing
    Segments(Vec<PathSegment>),
    /// A nested group of path arguments
    List(Vec<PathSpec>),
}

/// One flattened path to resolve against the source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PickTarget<'a> {
    Key(&'a str),
    Segments(&'a [PathSegment]),
}

impl PathSpec {
    /// Flatten this spec into pick targets, dropping duplicates.
    pub fn targets(&self) -> Vec<PickTarget<'_>> {
        flatten(std::slice::from_ref(self))
    }
}

/// Flatten a list of specs, in order, into distinct pick targets.
pub fn flatten(specs: &[PathSpec]) -> Vec<PickTarget<'_>> {
    let mut seen = FxHashSet::default();
    let mut targets = Vec::new();
    for spec in specs {
        flatten_into(spec, &mut seen, &mut targets);
    }
    targets
}

fn flatten_into<'a>(
    spec: &'a PathSpec,
    seen: &mut FxHashSet<PickTarget<'a>>,
    targets: &mut Vec<PickTarget<'a>>,
) {
    let target = match spec {
        PathSpec::Key(key) => PickTarget::Key(key),
        PathSpec::Segments(segments) => PickTarget::Segments(segments),
        PathSpec::List(specs) => {
            for spec in specs {
                flatten_into(spec, seen, targets);
            }
            return;
        }
    };
    if seen.insert(target) {
        targets.push(target);
    }
}

impl From<&str> for PathSpec {
    fn from(key: &str) -> Self {
        PathSpec::Key(key.to_string())
    }
}

impl From<String> for PathSpec {
    fn from(key: String) -> Self {
        PathSpec::Key(key)
    }
}

impl From<&String> for PathSpec {
    fn from(key: &String) -> Self {
        PathSpec::Key(key.clone())
    }
}

macro_rules! impl_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for PathSpec {
                fn from(key: $ty) -> Self {
                    PathSpec::Key(key.to_string())
                }
            }
        )*
    };
}

impl_from_number!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

impl From<PathSegment> for PathSpec {
    fn from(segment: PathSegment) -> Self {
        PathSpec::Segments(vec![segment])
    }
}

impl From<Path> for PathSpec {
    fn from(path: Path) -> Self {
        PathSpec::Segments(path.segments)
    }
}

impl<T: Into<PathSpec>> From<Vec<T>> for PathSpec {
    fn from(specs: Vec<T>) -> Self {
        specs.into_iter().collect()
    }
}

impl<T: Into<PathSpec>, const N: usize> From<[T; N]> for PathSpec {
    fn from(specs: [T; N]) -> Self {
        specs.into_iter().collect()
    }
}

impl<T: Clone + Into<PathSpec>> From<&[T]> for PathSpec {
    fn from(specs: &[T]) -> Self {
        specs.iter().cloned().collect()
    }
}

impl<T: Into<PathSpec>> FromIterator<T> for PathSpec {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        PathSpec::List(iter.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_lists_flatten_in_order() {
        let specs = vec![
            PathSpec::from([["a", "b"]]),
            PathSpec::from("c"),
            PathSpec::from(vec![PathSpec::from(["d"]), PathSpec::from(7)]),
        ];
        assert_eq!(
            flatten(&specs),
            vec![
                PickTarget::Key("a"),
                PickTarget::Key("b"),
                PickTarget::Key("c"),
                PickTarget::Key("d"),
                PickTarget::Key("7"),
            ]
        );
    }

    #[test]
    fn test_duplicates_are_dropped() {
        let specs = vec![PathSpec::from("a"), PathSpec::from(["a", "b"]), PathSpec::from("b")];
        assert_eq!(
            flatten(&specs),
            vec![PickTarget::Key("a"), PickTarget::Key("b")]
        );
    }

    #[test]
    fn test_segments_stay_whole() {
        let spec = PathSpec::from(Path::from(vec![
            PathSegment::Key("a.b".to_string()),
            PathSegment::Index(0),
        ]));
        let targets = spec.targets();
        assert_eq!(targets.len(), 1);
        assert!(matches!(targets[0], PickTarget::Segments(segments) if segments.len() == 2));
    }

    #[test]
    fn test_numbers_are_coerced_to_keys() {
        assert_eq!(PathSpec::from(0u8), PathSpec::Key("0".to_string()));
        assert_eq!(PathSpec::from(-1i64), PathSpec::Key("-1".to_string()));
    }
}
