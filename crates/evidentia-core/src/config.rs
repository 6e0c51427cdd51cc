//! The closed configuration surface (spec §6).
//!
//! A `Default` plus `with_*` setters, rather than a config-file parser —
//! the surface that would read a TOML/YAML file or CLI flags into this
//! struct is an external collaborator (§1 "command-line surface").

use crate::CoreError;
use std::path::PathBuf;

/// Domain family selecting the phase-B enhancement prompt and enum set
/// (spec §4.9). Unknown/unparsed values resolve to `Generic`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CaseType {
    #[default]
    Generic,
    Workplace,
    Employment,
    Contract,
}

impl CaseType {
    pub fn from_key(key: &str) -> Self {
        match key.to_ascii_lowercase().as_str() {
            "workplace" => CaseType::Workplace,
            "employment" => CaseType::Employment,
            "contract" => CaseType::Contract,
            _ => CaseType::Generic,
        }
    }

    pub fn as_key(self) -> &'static str {
        match self {
            CaseType::Generic => "generic",
            CaseType::Workplace => "workplace",
            CaseType::Employment => "employment",
            CaseType::Contract => "contract",
        }
    }
}

/// The closed set of configuration keys the core accepts (spec §6).
#[derive(Debug, Clone)]
pub struct Config {
    pub storage_root: PathBuf,
    pub model_id: String,
    pub vision_model_id: String,
    pub case_type: CaseType,
    pub ai_resolve_entities: bool,
    pub chunk_threshold: usize,
    pub chunk_size: usize,
    pub sequence_window_days: i64,
    pub gap_threshold_days: i64,
    pub max_workers: usize,
    pub llm_timeout_s: u64,
    pub llm_max_retries: usize,
    api_key: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_root: PathBuf::from("./evidentia-store"),
            model_id: "claude-default".to_string(),
            vision_model_id: "claude-default".to_string(),
            case_type: CaseType::Generic,
            ai_resolve_entities: false,
            chunk_threshold: 50,
            chunk_size: 30,
            sequence_window_days: 7,
            gap_threshold_days: 7,
            max_workers: 4,
            llm_timeout_s: 120,
            llm_max_retries: 3,
            api_key: String::new(),
        }
    }
}

impl Config {
    /// Reads the provider API key from `env_var` and builds a config with
    /// otherwise-default values. Per §6 "Environment": absence of the key
    /// is a fatal configuration error, surfaced before any file I/O.
    pub fn from_env(env_var: &str) -> Result<Self, CoreError> {
        let api_key = std::env::var(env_var)
            .map_err(|_| CoreError::MissingApiKey(env_var.to_string()))?;
        Ok(Self {
            api_key,
            ..Self::default()
        })
    }

    /// Builds a config directly from an in-memory key, for tests and for
    /// embedders that manage secrets themselves.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn with_storage_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.storage_root = root.into();
        self
    }

    pub fn with_model_id(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }

    pub fn with_vision_model_id(mut self, model_id: impl Into<String>) -> Self {
        self.vision_model_id = model_id.into();
        self
    }

    pub fn with_case_type(mut self, case_type: CaseType) -> Self {
        self.case_type = case_type;
        self
    }

    pub fn with_ai_resolve_entities(mut self, enabled: bool) -> Self {
        self.ai_resolve_entities = enabled;
        self
    }

    pub fn with_chunk_threshold(mut self, n: usize) -> Self {
        self.chunk_threshold = n;
        self
    }

    pub fn with_chunk_size(mut self, n: usize) -> Self {
        self.chunk_size = n;
        self
    }

    pub fn with_max_workers(mut self, n: usize) -> Self {
        self.max_workers = n.max(1);
        self
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.chunk_size == 0 {
            return Err(CoreError::ConfigOutOfRange {
                field: "chunk_size",
                value: "0".to_string(),
            });
        }
        if self.max_workers == 0 {
            return Err(CoreError::ConfigOutOfRange {
                field: "max_workers",
                value: "0".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_case_type_resolves_to_generic() {
        assert_eq!(CaseType::from_key("something-new"), CaseType::Generic);
        assert_eq!(CaseType::from_key("Workplace"), CaseType::Workplace);
    }

    #[test]
    fn missing_env_var_is_fatal() {
        let result = Config::from_env("EVIDENTIA_TEST_VAR_DOES_NOT_EXIST");
        assert!(matches!(result, Err(CoreError::MissingApiKey(_))));
    }

    #[test]
    fn zero_chunk_size_fails_validation() {
        let cfg = Config::with_api_key("key").with_chunk_size(0);
        assert!(cfg.validate().is_err());
    }
}
