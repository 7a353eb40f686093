// src/config/env.rs
// Environment-based configuration - single source of truth for all env vars

use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Probability cutoff between trusting the local classifier and deferring to the fallback
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.89;

/// Default generative model used by the fallback responder
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-pro-latest";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_ARTIFACTS_DIR: &str = "artifacts";
const DEFAULT_STATIC_DIR: &str = "static";
const DEFAULT_FALLBACK_TIMEOUT_SECS: u64 = 60;

/// API keys loaded from environment variables
#[derive(Debug, Clone, Default)]
pub struct ApiKeys {
    /// Gemini/Google API key (GEMINI_API_KEY or GOOGLE_API_KEY)
    pub gemini: Option<String>,
}

impl ApiKeys {
    fn from_lookup<F>(lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let gemini = read_key(lookup, "GEMINI_API_KEY").or_else(|| read_key(lookup, "GOOGLE_API_KEY"));
        Self { gemini }
    }

    /// Check if the generative fallback can be reached
    pub fn has_fallback(&self) -> bool {
        self.gemini.is_some()
    }
}

/// Environment configuration - all env vars in one place
#[derive(Debug, Clone)]
pub struct EnvConfig {
    pub api_keys: ApiKeys,
    /// Bind address (CLA_HOST)
    pub host: String,
    /// Bind port (CLA_PORT)
    pub port: u16,
    /// Directory holding tokenizer, label encoder and model (CLA_ARTIFACTS_DIR)
    pub artifacts_dir: PathBuf,
    /// Directory served under /static (CLA_STATIC_DIR)
    pub static_dir: PathBuf,
    /// Replacement stop-word list, one word per line (CLA_STOPWORDS_FILE)
    pub stopwords_file: Option<PathBuf>,
    /// TOML file overriding the response pools (CLA_RESPONSES_FILE)
    pub responses_file: Option<PathBuf>,
    /// CLA_CONFIDENCE_THRESHOLD
    pub confidence_threshold: f32,
    /// CLA_GEMINI_MODEL
    pub gemini_model: String,
    /// Upper bound on a single fallback call (CLA_FALLBACK_TIMEOUT_SECS)
    pub fallback_timeout: Duration,
    /// CLA_LOG_LEVEL
    pub log_level: String,
    /// Variables that were set but could not be parsed (defaults used instead)
    pub invalid_values: Vec<String>,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl EnvConfig {
    /// Load all environment configuration (call once at startup)
    pub fn load() -> Self {
        info!("Loading environment configuration");
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut invalid_values = Vec::new();
        let threshold = parse_env(
            &lookup,
            "CLA_CONFIDENCE_THRESHOLD",
            DEFAULT_CONFIDENCE_THRESHOLD,
            &mut invalid_values,
        );
        let timeout_secs = parse_env(
            &lookup,
            "CLA_FALLBACK_TIMEOUT_SECS",
            DEFAULT_FALLBACK_TIMEOUT_SECS,
            &mut invalid_values,
        );
        let port = parse_env(&lookup, "CLA_PORT", DEFAULT_PORT, &mut invalid_values);

        Self {
            api_keys: ApiKeys::from_lookup(&lookup),
            host: read_key(&lookup, "CLA_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            artifacts_dir: read_key(&lookup, "CLA_ARTIFACTS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_ARTIFACTS_DIR)),
            static_dir: read_key(&lookup, "CLA_STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR)),
            stopwords_file: read_key(&lookup, "CLA_STOPWORDS_FILE").map(PathBuf::from),
            responses_file: read_key(&lookup, "CLA_RESPONSES_FILE").map(PathBuf::from),
            confidence_threshold: threshold,
            gemini_model: read_key(&lookup, "CLA_GEMINI_MODEL")
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            fallback_timeout: Duration::from_secs(timeout_secs),
            log_level: read_key(&lookup, "CLA_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            invalid_values,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> ConfigValidation {
        let mut validation = ConfigValidation::new();

        for invalid in &self.invalid_values {
            validation.add_warning(format!("Unparseable value {invalid}, using the default"));
        }

        if !self.api_keys.has_fallback() {
            validation.add_warning(
                "No Gemini API key configured. Set GEMINI_API_KEY; low-confidence replies will apologise.",
            );
        }

        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            validation.add_error(format!(
                "CLA_CONFIDENCE_THRESHOLD must be within [0, 1], got {}",
                self.confidence_threshold
            ));
        }

        if self.fallback_timeout.is_zero() {
            validation.add_error("CLA_FALLBACK_TIMEOUT_SECS must be greater than zero");
        }

        if !self.artifacts_dir.is_dir() {
            validation.add_warning(format!(
                "Artifacts directory {} does not exist",
                self.artifacts_dir.display()
            ));
        }

        validation
    }
}

/// Configuration validation result
#[derive(Debug, Default)]
pub struct ConfigValidation {
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl ConfigValidation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    pub fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    /// Format as a human-readable report
    pub fn report(&self) -> String {
        let mut lines = Vec::new();

        if !self.errors.is_empty() {
            lines.push("Errors:".to_string());
            for err in &self.errors {
                lines.push(format!("  - {}", err));
            }
        }

        if !self.warnings.is_empty() {
            lines.push("Warnings:".to_string());
            for warn in &self.warnings {
                lines.push(format!("  - {}", warn));
            }
        }

        if lines.is_empty() {
            "Configuration OK".to_string()
        } else {
            lines.join("\n")
        }
    }
}

/// Read a single value, filtering empty strings
fn read_key<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<F, T>(lookup: &F, name: &str, default: T, invalid: &mut Vec<String>) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr + std::fmt::Display,
{
    match read_key(lookup, name) {
        Some(raw) => match raw.parse::<T>() {
            Ok(parsed) => {
                debug!(key = name, value = %parsed, "Config value from environment");
                parsed
            }
            Err(_) => {
                warn!(key = name, value = %raw, "Unparseable config value, using default {}", default);
                invalid.push(format!("{name}={raw:?}"));
                default
            }
        },
        None => default,
    }
}
