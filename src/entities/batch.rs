//! Batch entity - the ordered set of components submitted together

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::BenchError;
use crate::entities::component::{Component, ComponentKind};
use crate::yaml::{parse_yaml, YamlError};

/// Ordered collection of components to test
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Batch {
    components: Vec<Component>,
}

impl Batch {
    pub fn new(components: Vec<Component>) -> Self {
        Self { components }
    }

    /// The built-in demonstration batch
    pub fn sample() -> Result<Self, BenchError> {
        // (kind, nominal, tolerance)
        let specs = [
            (ComponentKind::Resistor, 100.0, 0.05),
            (ComponentKind::Capacitor, 10e-6, 0.10),
            (ComponentKind::Inductor, 1e-3, 0.05),
            (ComponentKind::Transistor, 50.0, 0.10),
        ];

        specs
            .into_iter()
            .map(|(kind, nominal, tolerance)| Component::new(kind, nominal, tolerance))
            .collect()
    }

    /// Parse a batch from YAML text.
    ///
    /// The document is a sequence of `{kind, nominal, tolerance}` mappings.
    pub fn from_yaml(source: &str, filename: &str) -> Result<Self, BenchError> {
        let raw: Vec<serde_yml::Value> = parse_yaml(source, filename)?;

        let mut components = Vec::with_capacity(raw.len());
        for (index, value) in raw.into_iter().enumerate() {
            let component: Component = serde_yml::from_value(value).map_err(|e| {
                BenchError::configuration(format!("{}: entry {}: {}", filename, index, e))
            })?;
            components.push(component);
        }

        Ok(Self { components })
    }

    /// Load a batch from a YAML file
    pub fn load(path: &Path) -> Result<Self, BenchError> {
        let source = std::fs::read_to_string(path).map_err(YamlError::from)?;
        Self::from_yaml(&source, &path.display().to_string())
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn into_components(self) -> Vec<Component> {
        self.components
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl FromIterator<Component> for Batch {
    fn from_iter<I: IntoIterator<Item = Component>>(iter: I) -> Self {
        Self {
            components: iter.into_iter().collect(),
        }
    }
}
