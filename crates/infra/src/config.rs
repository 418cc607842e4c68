//! Runtime configuration, read from the environment.

use std::path::PathBuf;

use fieldops_clients::CLIENT_ID_PREFIX;
use fieldops_ingest::{InventoryImportSettings, PLACEHOLDER_SERIAL};

pub const DATA_DIR_VAR: &str = "FIELDOPS_DATA_DIR";
pub const CLIENT_ID_PREFIX_VAR: &str = "FIELDOPS_CLIENT_ID_PREFIX";
pub const PLACEHOLDER_SERIAL_VAR: &str = "FIELDOPS_PLACEHOLDER_SERIAL";
pub const PLACEHOLDER_IMAGE_VAR: &str = "FIELDOPS_PLACEHOLDER_IMAGE";

const DEFAULT_DATA_DIR: &str = "./fieldops-data";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    /// Directory of the JSON file store.
    pub data_dir: PathBuf,
    pub client_id_prefix: String,
    pub placeholder_serial: String,
    pub placeholder_image: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            client_id_prefix: CLIENT_ID_PREFIX.to_string(),
            placeholder_serial: PLACEHOLDER_SERIAL.to_string(),
            placeholder_image: String::new(),
        }
    }
}

impl LedgerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let data_dir = var(DATA_DIR_VAR).map(PathBuf::from).unwrap_or_else(|| {
            tracing::warn!(
                "{DATA_DIR_VAR} not set; using {}",
                defaults.data_dir.display()
            );
            defaults.data_dir.clone()
        });

        Self {
            data_dir,
            client_id_prefix: var(CLIENT_ID_PREFIX_VAR).unwrap_or(defaults.client_id_prefix),
            placeholder_serial: var(PLACEHOLDER_SERIAL_VAR).unwrap_or(defaults.placeholder_serial),
            placeholder_image: var(PLACEHOLDER_IMAGE_VAR).unwrap_or(defaults.placeholder_image),
        }
    }

    pub fn inventory_import(&self) -> InventoryImportSettings {
        InventoryImportSettings {
            placeholder_serial: self.placeholder_serial.clone(),
            placeholder_image: self.placeholder_image.clone(),
            ..InventoryImportSettings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        assert_eq!(LedgerConfig::from_lookup(lookup(&[])), LedgerConfig::default());
    }

    #[test]
    fn variables_override_defaults() {
        let config = LedgerConfig::from_lookup(lookup(&[
            (DATA_DIR_VAR, "/var/lib/fieldops"),
            (CLIENT_ID_PREFIX_VAR, "CX-"),
            (PLACEHOLDER_SERIAL_VAR, "N/A"),
            (PLACEHOLDER_IMAGE_VAR, "https://img.test/none.png"),
        ]));

        assert_eq!(config.data_dir, PathBuf::from("/var/lib/fieldops"));
        assert_eq!(config.client_id_prefix, "CX-");
        let import = config.inventory_import();
        assert_eq!(import.placeholder_serial, "N/A");
        assert_eq!(import.placeholder_image, "https://img.test/none.png");
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = LedgerConfig::from_lookup(lookup(&[(CLIENT_ID_PREFIX_VAR, "  ")]));
        assert_eq!(config.client_id_prefix, CLIENT_ID_PREFIX);
    }
}
