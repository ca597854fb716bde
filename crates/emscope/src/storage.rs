//! YAML-backed configuration store.
//!
//! Three files under the conf directory: `endpoints.yaml` (OEM endpoint
//! definitions incl. credentials), `targets.yaml` (per-site selected targets
//! with their derived tags), `metrics.yaml` (metric definitions per target
//! type, kept opaque). Missing or empty files read as empty collections.

use anyhow::{Context, Result};
use emscope_client::OemEndpoint;
use emscope_mapping::tags::ensure_required_tags;
use emscope_protocol::{paths, TaggedTarget};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One site's saved ingest configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default)]
    pub site: Option<String>,
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Endpoint name this config belongs to
    pub name: String,
    #[serde(default)]
    pub targets: Vec<TaggedTarget>,
}

/// Handle to the YAML config files.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    endpoints_path: PathBuf,
    targets_path: PathBuf,
    metrics_path: PathBuf,
}

impl ConfigStore {
    pub fn new(
        endpoints_path: impl Into<PathBuf>,
        targets_path: impl Into<PathBuf>,
        metrics_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            endpoints_path: endpoints_path.into(),
            targets_path: targets_path.into(),
            metrics_path: metrics_path.into(),
        }
    }

    /// Store rooted at the default conf directory (~/.emscope/conf).
    pub fn from_default_paths() -> Self {
        Self::new(
            paths::default_endpoints_path(),
            paths::default_targets_config_path(),
            paths::default_metrics_config_path(),
        )
    }

    // ------------------------------------------------------------------
    // Endpoints
    // ------------------------------------------------------------------

    pub fn load_endpoints(&self) -> Result<Vec<OemEndpoint>> {
        read_yaml(&self.endpoints_path)
    }

    pub fn endpoint_by_name(&self, name: &str) -> Result<Option<OemEndpoint>> {
        Ok(self
            .load_endpoints()?
            .into_iter()
            .find(|endpoint| endpoint.name == name))
    }

    // ------------------------------------------------------------------
    // Site configs (selected targets)
    // ------------------------------------------------------------------

    pub fn load_sites(&self) -> Result<Vec<SiteConfig>> {
        read_yaml(&self.targets_path)
    }

    pub fn site_config(&self, endpoint_name: &str) -> Result<Option<SiteConfig>> {
        Ok(self
            .load_sites()?
            .into_iter()
            .find(|site| site.name == endpoint_name))
    }

    /// Replace (or create) a site's target list. Every stored target is
    /// re-normalized so hand-edited entries never lose the mandatory tags.
    pub fn upsert_site_config(
        &self,
        endpoint_name: &str,
        targets: Vec<TaggedTarget>,
    ) -> Result<SiteConfig> {
        let endpoint = self.endpoint_by_name(endpoint_name)?;

        let mut normalized = targets;
        for target in &mut normalized {
            ensure_required_tags(target);
        }

        let mut sites = self.load_sites()?;
        let entry = SiteConfig {
            site: endpoint.as_ref().and_then(|e| e.site.clone()),
            endpoint: endpoint.as_ref().map(|e| e.endpoint.clone()),
            name: endpoint_name.to_string(),
            targets: normalized,
        };

        match sites.iter_mut().find(|site| site.name == endpoint_name) {
            Some(existing) => *existing = entry.clone(),
            None => sites.push(entry.clone()),
        }

        write_yaml(&self.targets_path, &sites)?;
        Ok(entry)
    }

    // ------------------------------------------------------------------
    // Metrics (opaque)
    // ------------------------------------------------------------------

    pub fn load_metrics(&self) -> Result<serde_yaml::Mapping> {
        read_yaml(&self.metrics_path)
    }

    pub fn save_metrics(&self, metrics: &serde_yaml::Mapping) -> Result<()> {
        write_yaml(&self.metrics_path, metrics)
    }
}

fn read_yaml<T: serde::de::DeserializeOwned + Default>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Ok(T::default());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    if content.trim().is_empty() {
        return Ok(T::default());
    }
    serde_yaml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

fn write_yaml<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let content = serde_yaml::to_string(data)
        .with_context(|| format!("Failed to serialize {}", path.display()))?;
    std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}
