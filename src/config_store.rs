//! Persisted provider configuration.
//!
//! One JSON document under the user's home directory maps provider
//! identifiers to credentials and model selection, plus an active-provider
//! pointer. Earlier releases persisted a flat `{GOOGLE_API_KEY,
//! SELECTED_MODEL}` document; [`migrate_legacy`] folds that shape forward
//! on load.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ChatError;
use crate::registry::{self, ProviderId};

const CONFIG_DIR: &str = ".latent-chat";
const CONFIG_FILE: &str = "config.json";

/// Flat keys written by early releases.
const LEGACY_API_KEY: &str = "GOOGLE_API_KEY";
const LEGACY_MODEL: &str = "SELECTED_MODEL";

/// Environment variables that may seed the default provider's credential
/// on first run. They never override an on-disk value.
const KEY_ENV_VARS: [&str; 2] = ["GOOGLE_API_KEY", "GEMINI_API_KEY"];

/// Credential and model selection for one provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderSettings {
    /// API key, stored in plaintext. Empty means "not configured".
    #[serde(default)]
    pub api_key: String,
    pub selected_model: String,
}

impl ProviderSettings {
    pub fn defaults_for(id: ProviderId) -> Self {
        Self {
            api_key: String::new(),
            selected_model: registry::describe(id).default_model().to_string(),
        }
    }

    pub fn has_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

/// The persisted configuration document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub active_provider: ProviderId,
    pub providers: BTreeMap<ProviderId, ProviderSettings>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            active_provider: ProviderId::Google,
            providers: ProviderId::ALL
                .into_iter()
                .map(|id| (id, ProviderSettings::defaults_for(id)))
                .collect(),
        }
    }
}

impl Config {
    /// Defaults, with the Google credential seeded from the environment
    /// when one of [`KEY_ENV_VARS`] is set and non-empty.
    pub fn from_env() -> Self {
        let mut config = Config::default();
        if let Some(key) = env_api_key() {
            config.provider_mut(ProviderId::Google).api_key = key;
        }
        config
    }

    /// Settings for one provider. Absent entries resolve to defaults, so
    /// the invariant "every known provider has an entry" holds for
    /// callers even on a document built by hand.
    pub fn provider(&self, id: ProviderId) -> ProviderSettings {
        self.providers
            .get(&id)
            .cloned()
            .unwrap_or_else(|| ProviderSettings::defaults_for(id))
    }

    /// Mutable settings for one provider, backfilling a missing entry.
    pub fn provider_mut(&mut self, id: ProviderId) -> &mut ProviderSettings {
        self.providers
            .entry(id)
            .or_insert_with(|| ProviderSettings::defaults_for(id))
    }

    /// Backfill entries for every known provider.
    pub fn normalized(mut self) -> Self {
        for id in ProviderId::ALL {
            self.provider_mut(id);
        }
        self
    }
}

fn env_api_key() -> Option<String> {
    KEY_ENV_VARS
        .into_iter()
        .filter_map(|name| std::env::var(name).ok())
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}

/// Produce a well-formed [`Config`] from an arbitrary parsed document.
///
/// Legacy flat keys are folded onto the `google` entry first; structured
/// fields are applied afterwards, so a structured value always wins over a
/// legacy key present in the same document. Unknown provider names are
/// skipped.
pub fn migrate_legacy(raw: Value) -> Config {
    let mut config = Config::default();

    if let Some(key) = raw.get(LEGACY_API_KEY).and_then(Value::as_str) {
        config.provider_mut(ProviderId::Google).api_key = key.to_string();
    }
    if let Some(model) = raw.get(LEGACY_MODEL).and_then(Value::as_str) {
        config.provider_mut(ProviderId::Google).selected_model = model.to_string();
    }

    if let Some(active) = raw.get("activeProvider").and_then(Value::as_str) {
        match active.parse::<ProviderId>() {
            Ok(id) => config.active_provider = id,
            Err(_) => log::debug!("ignoring unknown activeProvider {active:?}"),
        }
    }
    if let Some(providers) = raw.get("providers").and_then(Value::as_object) {
        for (name, entry) in providers {
            let Ok(id) = name.parse::<ProviderId>() else {
                log::debug!("ignoring unknown provider entry {name:?}");
                continue;
            };
            let settings = config.provider_mut(id);
            if let Some(key) = entry.get("apiKey").and_then(Value::as_str) {
                settings.api_key = key.to_string();
            }
            if let Some(model) = entry.get("selectedModel").and_then(Value::as_str) {
                settings.selected_model = model.to_string();
            }
        }
    }

    config
}

/// Owns the configuration file and its read/write operations.
///
/// Single-process, single-writer. Loading never fails the caller; saving
/// surfaces I/O errors so the UI can report them.
#[derive(Debug)]
pub struct ConfigStore {
    file_path: PathBuf,
}

impl ConfigStore {
    /// Store rooted at the per-user path (`~/.latent-chat/config.json`),
    /// creating the directory if needed.
    pub fn new() -> io::Result<Self> {
        let home_dir = dirs::home_dir().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, "Could not find home directory")
        })?;
        let file_path = home_dir.join(CONFIG_DIR).join(CONFIG_FILE);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(Self { file_path })
    }

    /// Store rooted at an explicit path.
    pub fn with_path(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Read the configuration. A missing, unreadable, or malformed file
    /// degrades to environment-seeded defaults; nothing is written back.
    pub fn load(&self) -> Config {
        let contents = match fs::read_to_string(&self.file_path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::debug!(
                    "config file not found, using defaults: {}",
                    self.file_path.display()
                );
                return Config::from_env();
            }
            Err(err) => {
                log::warn!("could not read {}: {err}", self.file_path.display());
                return Config::from_env();
            }
        };
        match serde_json::from_str::<Value>(&contents) {
            Ok(value) => migrate_legacy(value),
            Err(err) => {
                log::warn!("could not parse {}: {err}", self.file_path.display());
                Config::from_env()
            }
        }
    }

    /// Overwrite the file with the full document as pretty-printed JSON.
    /// Written to a sibling temp file first and renamed into place, so a
    /// later `load` in the same process never sees a partial write.
    pub fn save(&self, config: &Config) -> Result<(), ChatError> {
        let contents = serde_json::to_string_pretty(config)
            .map_err(|err| ChatError::ConfigWrite(err.to_string()))?;
        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent).map_err(|err| ChatError::ConfigWrite(err.to_string()))?;
        }
        let tmp_path = self.file_path.with_extension("json.tmp");
        fs::write(&tmp_path, contents).map_err(|err| ChatError::ConfigWrite(err.to_string()))?;
        fs::rename(&tmp_path, &self.file_path)
            .map_err(|err| ChatError::ConfigWrite(err.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[test]
    fn defaults_cover_every_provider() {
        let config = Config::default();
        assert_eq!(config.active_provider, ProviderId::Google);
        for id in ProviderId::ALL {
            let settings = config.provider(id);
            assert!(settings.api_key.is_empty());
            assert_eq!(
                settings.selected_model,
                registry::describe(id).default_model()
            );
        }
    }

    #[rstest]
    #[case::flat_only(
        json!({"GOOGLE_API_KEY": "g-key", "SELECTED_MODEL": "gemini-1.5-pro"}),
        "g-key",
        "gemini-1.5-pro"
    )]
    #[case::flat_key_only(json!({"GOOGLE_API_KEY": "g-key"}), "g-key", "gemini-2.0-flash")]
    #[case::empty_document(json!({}), "", "gemini-2.0-flash")]
    fn legacy_keys_fold_onto_google(
        #[case] raw: Value,
        #[case] expected_key: &str,
        #[case] expected_model: &str,
    ) {
        let config = migrate_legacy(raw);
        assert_eq!(config.active_provider, ProviderId::Google);
        let google = config.provider(ProviderId::Google);
        assert_eq!(google.api_key, expected_key);
        assert_eq!(google.selected_model, expected_model);
    }

    #[test]
    fn structured_fields_win_over_legacy_keys() {
        let raw = json!({
            "GOOGLE_API_KEY": "old-key",
            "SELECTED_MODEL": "gemini-1.5-flash",
            "providers": {
                "google": {"apiKey": "new-key"}
            }
        });
        let config = migrate_legacy(raw);
        let google = config.provider(ProviderId::Google);
        assert_eq!(google.api_key, "new-key");
        // legacy model survives: the structured entry did not mention one
        assert_eq!(google.selected_model, "gemini-1.5-flash");
    }

    #[test]
    fn partial_structured_entry_merges_over_defaults() {
        let raw = json!({
            "activeProvider": "openai",
            "providers": {
                "openai": {"apiKey": "sk-1"}
            }
        });
        let config = migrate_legacy(raw);
        assert_eq!(config.active_provider, ProviderId::OpenAI);
        let openai = config.provider(ProviderId::OpenAI);
        assert_eq!(openai.api_key, "sk-1");
        assert_eq!(openai.selected_model, "gpt-4o-mini");
        // untouched providers keep their backfilled defaults
        assert_eq!(
            config.provider(ProviderId::Google).selected_model,
            "gemini-2.0-flash"
        );
    }

    #[test]
    fn unknown_provider_entries_are_skipped() {
        let raw = json!({
            "activeProvider": "anthropic",
            "providers": {
                "anthropic": {"apiKey": "sk-ant"},
                "openai": {"apiKey": "sk-1"}
            }
        });
        let config = migrate_legacy(raw);
        assert_eq!(config.active_provider, ProviderId::Google);
        assert_eq!(config.provider(ProviderId::OpenAI).api_key, "sk-1");
        assert_eq!(config.providers.len(), ProviderId::ALL.len());
    }

    #[test]
    fn soft_model_validation_passes_unknown_ids_through() {
        let raw = json!({
            "providers": {
                "google": {"selectedModel": "gemini-9.9-experimental"}
            }
        });
        let config = migrate_legacy(raw);
        let google = config.provider(ProviderId::Google);
        assert_eq!(google.selected_model, "gemini-9.9-experimental");
        assert!(!registry::describe(ProviderId::Google).is_known_model(&google.selected_model));
    }

    proptest! {
        #[test]
        fn any_legacy_document_lands_on_google(
            key in "[A-Za-z0-9_-]{0,48}",
            model in "[a-z0-9.-]{1,24}",
        ) {
            let raw = json!({LEGACY_API_KEY: key, LEGACY_MODEL: model});
            let config = migrate_legacy(raw);
            let google = config.provider(ProviderId::Google);
            prop_assert_eq!(google.api_key, key);
            prop_assert_eq!(google.selected_model, model);
            prop_assert_eq!(config.active_provider, ProviderId::Google);
        }
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::with_path(dir.path().join("config.json"));

        let mut config = Config::default();
        config.active_provider = ProviderId::OpenAI;
        config.provider_mut(ProviderId::OpenAI).api_key = "sk-1".to_string();
        config.provider_mut(ProviderId::OpenAI).selected_model = "gpt-4o".to_string();

        store.save(&config).unwrap();
        assert_eq!(store.load(), config);
    }

    #[test]
    fn persisted_document_uses_camel_case_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::with_path(dir.path().join("config.json"));
        store.save(&Config::default()).unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("\"activeProvider\": \"google\""));
        assert!(raw.contains("\"apiKey\""));
        assert!(raw.contains("\"selectedModel\""));
    }

    #[test]
    fn malformed_file_degrades_to_defaults_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "not json {").unwrap();

        let store = ConfigStore::with_path(&path);
        let config = store.load();
        assert_eq!(config.active_provider, ProviderId::Google);
        // the broken file is left untouched
        assert_eq!(fs::read_to_string(&path).unwrap(), "not json {");
    }

    #[test]
    fn empty_file_degrades_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "").unwrap();

        let config = ConfigStore::with_path(&path).load();
        assert_eq!(config.active_provider, ProviderId::Google);
        for id in ProviderId::ALL {
            assert!(!config.provider(id).has_key());
        }
    }

    #[test]
    fn legacy_file_on_disk_is_migrated_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{"GOOGLE_API_KEY": "g-key", "SELECTED_MODEL": "gemini-1.5-pro"}"#,
        )
        .unwrap();

        let config = ConfigStore::with_path(&path).load();
        let google = config.provider(ProviderId::Google);
        assert_eq!(google.api_key, "g-key");
        assert_eq!(google.selected_model, "gemini-1.5-pro");
    }
}
