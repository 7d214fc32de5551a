use crate::error::GenerateResult;
use crate::naming::{DefaultNamer, Namer, PackageNamer};
use crate::tag::TagKeys;
use serde::{Deserialize, Serialize};

/// Built-in naming strategies for top-level declarations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NamingStrategy {
    /// Short type name, suffixed 2, 3, ... on collision
    #[default]
    Default,
    /// Package path segments prefixed to the short name
    Package,
}

impl NamingStrategy {
    pub fn namer(self) -> Box<dyn Namer> {
        match self {
            NamingStrategy::Default => Box::new(DefaultNamer),
            NamingStrategy::Package => Box::new(PackageNamer),
        }
    }
}

/// Configuration options for a generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratorOptions {
    /// Inline non-circular structs at every use site instead of declaring them
    pub flatten: bool,

    /// Report types that serialize themselves but have no typer
    pub warnings: bool,

    /// Prefix every TypeScript declaration with `export`
    pub export: bool,

    /// How declaration names are derived
    pub naming: NamingStrategy,

    /// Which struct tag keys carry field directives
    pub tags: TagKeys,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            flatten: false,
            warnings: true,
            export: false,
            naming: NamingStrategy::Default,
            tags: TagKeys::default(),
        }
    }
}

impl GeneratorOptions {
    /// Options that minimize the number of top-level declarations
    pub fn flattened() -> Self {
        Self {
            flatten: true,
            ..Default::default()
        }
    }

    /// Options with warnings suppressed
    pub fn quiet() -> Self {
        Self {
            warnings: false,
            ..Default::default()
        }
    }

    /// Options that export every declaration
    pub fn exported() -> Self {
        Self {
            export: true,
            ..Default::default()
        }
    }

    /// Parse options from a JSON document. Missing keys keep their defaults.
    pub fn from_json(json: &str) -> GenerateResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
