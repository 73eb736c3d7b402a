use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::JsonLike;
use crate::mutation::insert_resolved;
use crate::path_spec::{PathSpec, PickTarget, flatten};
use crate::selection::Selection;
use crate::traversal::resolve;
use crate::types::TraversalResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickerConfig {
    /// Whether to return an error instead of skipping paths that do not resolve
    pub strict: bool,
    /// Whether strings expose `length` and character indices, and arrays expose `length`
    pub virtual_properties: bool,
}

impl PickerConfig {
    pub fn new(strict: bool, virtual_properties: bool) -> Self {
        PickerConfig {
            strict,
            virtual_properties,
        }
    }
}

impl Default for PickerConfig {
    fn default() -> Self {
        PickerConfig::new(false, true)
    }
}

impl JsonLike for PickerConfig {
    fn to_json(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }

    fn from_json(json: Value) -> serde_json::Result<Self> {
        serde_json::from_value(json)
    }
}

/// Builds a [`Selection`] from a source value and a set of paths.
#[derive(Debug, Clone, Default)]
pub struct Picker {
    pub config: PickerConfig,
}

impl Picker {
    pub fn new() -> Self {
        Picker::default()
    }

    pub fn with_config(mut self, config: PickerConfig) -> Self {
        self.config = config;
        self
    }

    /// Pick `paths` out of `source` into a fresh [`Selection`].
    ///
    /// A nullish source (`None` or `Value::Null`) always gives an empty selection.
    /// Paths that do not resolve are skipped, unless the picker is strict, in
    /// which case the first failure is returned.
    pub fn pick<'a>(
        &self,
        source: impl Into<Option<&'a Value>>,
        paths: &[PathSpec],
    ) -> TraversalResult<Selection> {
        let mut selection = Selection::new();
        let source: Option<&Value> = source.into();
        let source = match source {
            None | Some(Value::Null) => return Ok(selection),
            Some(source) => source,
        };

        let targets = flatten(paths);
        tracing::debug!(
            targets = targets.len(),
            strict = self.config.strict,
            "picking paths"
        );

        for target in targets {
            match self.pick_target(source, target, &mut selection) {
                Ok(()) => {}
                Err(e) if self.config.strict => return Err(e),
                Err(e) => tracing::trace!(path = ?target, error = %e, "skipping path"),
            }
        }
        Ok(selection)
    }

    fn pick_target(
        &self,
        source: &Value,
        target: PickTarget<'_>,
        selection: &mut Selection,
    ) -> TraversalResult<()> {
        let resolved = resolve(source, target, self.config.virtual_properties)?;
        insert_resolved(selection, &resolved.route, resolved.value.into_owned())
    }
}
