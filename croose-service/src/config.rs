use croose_expand::DEFAULT_PLAN_CACHE_CAPACITY;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::warn;

/// Default page size for searches that do not set a limit.
pub const DEFAULT_PAGE_SIZE: u64 = 50;

const CACHE_VAR: &str = "CROOSE_CACHE";
const LEGACY_CACHE_VAR: &str = "CACHE";
const PLAN_CACHE_CAPACITY_VAR: &str = "CROOSE_PLAN_CACHE_CAPACITY";
const PAGE_SIZE_VAR: &str = "CROOSE_PAGE_SIZE";

/// Configuration for the document service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Read through and write to the cache collaborator.
    pub cache_enabled: bool,
    /// Maximum number of compiled expansion plans kept.
    pub plan_cache_capacity: usize,
    /// Page size used when a search does not set a limit.
    pub default_page_size: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            cache_enabled: false,
            plan_cache_capacity: DEFAULT_PLAN_CACHE_CAPACITY,
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ServiceConfig {
    /// Reads the configuration from the process environment.
    ///
    /// `CROOSE_CACHE` (or `CACHE`) enables caching only when set to `true`.
    /// `CROOSE_PLAN_CACHE_CAPACITY` and `CROOSE_PAGE_SIZE` override the
    /// numeric defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(flag) = lookup(CACHE_VAR).or_else(|| lookup(LEGACY_CACHE_VAR)) {
            config.cache_enabled = flag == "true";
        }
        if let Some(capacity) = parse_var(&lookup, PLAN_CACHE_CAPACITY_VAR) {
            config.plan_cache_capacity = capacity;
        }
        if let Some(page_size) = parse_var(&lookup, PAGE_SIZE_VAR) {
            config.default_page_size = page_size;
        }
        config
    }

    /// Effective page size; zero falls back to the default.
    pub fn page_size(&self) -> u64 {
        if self.default_page_size == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            self.default_page_size
        }
    }
}

fn parse_var<F, T>(lookup: &F, name: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    let raw = lookup(name)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring {}={:?}: not a number", name, raw);
            None
        }
    }
}
