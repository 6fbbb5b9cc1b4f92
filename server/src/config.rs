use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::ValueEnum;
use products_hr::views::DEFAULT_RECENT_LIMIT;
use products_hr::{RecordStore, SeedData};

/// Dataset a session starts from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum SeedMode {
    /// Reference employees, departments, PF and account records.
    Demo,
    /// Departments only.
    Empty,
}

impl SeedMode {
    pub fn build_store(self) -> RecordStore {
        match self {
            SeedMode::Demo => RecordStore::demo(),
            SeedMode::Empty => RecordStore::empty(),
        }
    }

    fn parse(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "demo" => Ok(SeedMode::Demo),
            "empty" => Ok(SeedMode::Empty),
            other => Err(anyhow!("HR_SEED must be demo or empty, got {other:?}")),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub seed: SeedMode,
    pub recent_limit: usize,
    pub log_filter: Option<String>,
    /// JSON dataset to start from instead of a built-in seed.
    pub seed_file: Option<PathBuf>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let seed = match lookup("HR_SEED") {
            Some(value) => SeedMode::parse(&value)?,
            None => SeedMode::Demo,
        };

        let recent_limit = match lookup("HR_RECENT_LIMIT") {
            Some(value) => value
                .trim()
                .parse::<usize>()
                .with_context(|| format!("invalid HR_RECENT_LIMIT {value:?}"))?,
            None => DEFAULT_RECENT_LIMIT,
        };

        let log_filter = lookup("HR_LOG").filter(|value| !value.trim().is_empty());
        let seed_file = lookup("HR_SEED_FILE")
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            seed,
            recent_limit,
            log_filter,
            seed_file,
        })
    }
}

/// Build a store from a JSON dataset in the shape `hr-admin seed` prints.
pub fn load_seed_file(path: &Path) -> Result<RecordStore> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    store_from_json(&raw).with_context(|| format!("invalid seed file {}", path.display()))
}

fn store_from_json(raw: &str) -> Result<RecordStore> {
    let seed: SeedData = serde_json::from_str(raw).context("malformed seed JSON")?;
    RecordStore::from_seed(seed).context("seed data failed the integrity check")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_apply_without_env() {
        let config = load(&[]).unwrap();
        assert_eq!(config.seed, SeedMode::Demo);
        assert_eq!(config.recent_limit, DEFAULT_RECENT_LIMIT);
        assert_eq!(config.log_filter, None);
        assert_eq!(config.seed_file, None);
    }

    #[test]
    fn env_values_are_parsed() {
        let config = load(&[
            ("HR_SEED", "Empty"),
            ("HR_RECENT_LIMIT", "3"),
            ("HR_LOG", "debug"),
            ("HR_SEED_FILE", "/tmp/hr.json"),
        ])
        .unwrap();
        assert_eq!(config.seed, SeedMode::Empty);
        assert_eq!(config.recent_limit, 3);
        assert_eq!(config.log_filter.as_deref(), Some("debug"));
        assert_eq!(config.seed_file, Some(PathBuf::from("/tmp/hr.json")));
    }

    #[test]
    fn malformed_values_are_rejected() {
        assert!(load(&[("HR_SEED", "prod")]).is_err());
        let err = load(&[("HR_RECENT_LIMIT", "many")]).unwrap_err();
        assert!(err.to_string().contains("HR_RECENT_LIMIT"));
    }

    #[test]
    fn empty_seed_has_no_employees() {
        let store = SeedMode::Empty.build_store();
        assert!(store.employees().is_empty());
        assert_eq!(store.departments().len(), 5);
    }

    #[test]
    fn printed_seed_loads_back_into_a_store() {
        let mut store = RecordStore::demo();
        store.delete_employee(&"3".into());
        let raw = serde_json::to_string(&store.snapshot()).unwrap();

        let loaded = store_from_json(&raw).unwrap();
        assert_eq!(loaded.snapshot(), store.snapshot());
        assert_eq!(loaded.employees().len(), 4);
    }

    #[test]
    fn seed_file_with_orphan_detail_is_rejected() {
        let mut seed = RecordStore::demo().snapshot();
        seed.pf_details[0].employee_id = "42".into();
        let raw = serde_json::to_string(&seed).unwrap();

        let err = store_from_json(&raw).unwrap_err();
        assert!(format!("{err:#}").contains("unknown employee 42"));
        assert!(store_from_json("{\"employees\": 3}").is_err());
        assert!(load_seed_file(Path::new("/nonexistent/hr-seed.json")).is_err());
    }
}
