use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use crate::models::{AgendaDay, Camp, ReferenceData};

/// A snapshot file: the payload plus when it was written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedData<T> {
    pub data: T,
    pub cached_at: DateTime<Utc>,
}

impl<T> CachedData<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            cached_at: Utc::now(),
        }
    }

    /// "just now", "12m ago", "2h ago", "3d ago". Hours and days round to
    /// the nearest unit; negative ages from clock skew read as "just now".
    pub fn age_display(&self) -> String {
        let minutes = (Utc::now() - self.cached_at).num_minutes();
        match minutes {
            m if m < 1 => "just now".to_string(),
            m if m < 60 => format!("{}m ago", m),
            m if m < 24 * 60 => format!("{}h ago", (m + 30) / 60),
            m => format!("{}d ago", (m + 12 * 60) / (24 * 60)),
        }
    }
}

/// On-disk snapshot of the last agenda seen for a camp, so the TUI can show
/// something before the first fetch completes.
pub struct CacheManager {
    cache_dir: PathBuf,
}

impl CacheManager {
    pub fn new(cache_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&cache_dir)?;
        Ok(Self { cache_dir })
    }

    fn cache_path(&self, name: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", name))
    }

    fn load<T: DeserializeOwned>(&self, name: &str) -> Result<Option<CachedData<T>>> {
        let path = self.cache_path(name);
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read cache file: {}", name))?;

        let cached: CachedData<T> = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse cache file: {}", name))?;

        Ok(Some(cached))
    }

    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let cached = CachedData::new(data);
        let path = self.cache_path(name);
        let contents = serde_json::to_string_pretty(&cached)?;
        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write cache file: {}", name))?;
        Ok(())
    }

    // ===== Agenda =====

    pub fn load_agenda(&self) -> Result<Option<CachedData<Vec<AgendaDay>>>> {
        self.load("agenda")
    }

    pub fn save_agenda(&self, days: &[AgendaDay]) -> Result<()> {
        self.save("agenda", &days)
    }

    // ===== Camp =====

    pub fn load_camp(&self) -> Result<Option<CachedData<Camp>>> {
        self.load("camp")
    }

    pub fn save_camp(&self, camp: &Camp) -> Result<()> {
        self.save("camp", camp)
    }

    // ===== Reference data =====

    pub fn load_references(&self) -> Result<Option<CachedData<ReferenceData>>> {
        self.load("references")
    }

    pub fn save_references(&self, refs: &ReferenceData) -> Result<()> {
        self.save("references", refs)
    }

    // ===== Cache Age Information =====

    /// Helper to load cache and log errors without failing
    fn load_age<T>(
        &self,
        name: &str,
        loader: impl FnOnce() -> Result<Option<CachedData<T>>>,
    ) -> Option<String> {
        match loader() {
            Ok(Some(cached)) => Some(cached.age_display()),
            Ok(None) => None,
            Err(e) => {
                debug!(cache = name, error = %e, "Failed to load cache for age display");
                None
            }
        }
    }

    pub fn get_cache_ages(&self) -> CacheAges {
        CacheAges {
            agenda: self.load_age("agenda", || self.load_agenda()),
            camp: self.load_age("camp", || self.load_camp()),
            references: self.load_age("references", || self.load_references()),
        }
    }
}

#[derive(Debug, Default)]
pub struct CacheAges {
    pub agenda: Option<String>,
    pub camp: Option<String>,
    pub references: Option<String>,
}

impl CacheAges {
    /// Age of the most relevant snapshot, agenda first.
    pub fn last_updated(&self) -> String {
        [&self.agenda, &self.camp, &self.references]
            .into_iter()
            .flatten()
            .next()
            .cloned()
            .unwrap_or_else(|| "never".to_string())
    }
}

// ============================================================================
// Tests
// ============================================================================
