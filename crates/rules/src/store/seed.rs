//! YAML seed documents for [`MemoryStore`](super::MemoryStore).

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use ruler_core::{AlertRule, Namespace, OrgId, StoreError};

/// A namespace entry in a seed file. The slug defaults to the slugified title.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedNamespace {
    pub uid: String,
    pub title: String,
    pub org_id: OrgId,
    #[serde(default)]
    pub slug: Option<String>,
}

impl SeedNamespace {
    pub fn into_namespace(self) -> Namespace {
        let mut ns = Namespace::new(self.uid, self.title, self.org_id);
        if let Some(slug) = self.slug {
            ns.slug = slug;
        }
        ns
    }
}

/// Namespaces and rules to preload into a store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Seed {
    #[serde(default)]
    pub namespaces: Vec<SeedNamespace>,
    #[serde(default)]
    pub rules: Vec<AlertRule>,
}

impl Seed {
    pub fn from_yaml(yaml: &str) -> Result<Self, StoreError> {
        serde_yaml::from_str(yaml).map_err(|e| StoreError::Serialize(e.to_string()))
    }
}

/// Read and parse a seed file.
pub fn load_seed_file(path: &Path) -> Result<Seed, StoreError> {
    let yaml = std::fs::read_to_string(path)?;
    let seed = Seed::from_yaml(&yaml)?;
    info!(
        path = %path.display(),
        namespaces = seed.namespaces.len(),
        rules = seed.rules.len(),
        "loaded seed file"
    );
    Ok(seed)
}
