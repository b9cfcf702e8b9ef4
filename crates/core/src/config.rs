use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_env_list(profile: &str, key: &str, default: &[&str]) -> Vec<String> {
    match profiled_env_opt(profile, key) {
        Some(raw) => raw
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        None => default.iter().map(|s| s.to_string()).collect(),
    }
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub rules: RulesConfig,
    pub output: OutputConfig,
    pub report: ReportConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `SEO_REPORT_PROFILE`. When set (e.g. `PROD`),
    /// every key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("SEO_REPORT_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            rules: RulesConfig::from_env_profiled(p),
            output: OutputConfig::from_env_profiled(p),
            report: ReportConfig::from_env_profiled(p),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!("  rules:   path={}", self.rules.path.display());
        tracing::info!("  output:  dir={}", self.output.dir.display());
        tracing::info!(
            "  report:  default_language={}, supported={}",
            self.report.default_language,
            self.report.supported_languages.join(",")
        );
    }

    /// Return a JSON view of the effective configuration for run metadata.
    pub fn summary(&self) -> serde_json::Value {
        serde_json::json!({
            "profile": self.profile_label(),
            "rules": { "path": self.rules.path },
            "output": { "dir": self.output.dir },
            "report": {
                "default_language": self.report.default_language,
                "supported_languages": self.report.supported_languages,
            },
        })
    }
}

// ── Rules ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Action rule file (limits, fallback pool, rules).
    pub path: PathBuf,
}

impl RulesConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            path: PathBuf::from(profiled_env_or(
                p,
                "SEO_REPORT_RULES_PATH",
                "data/rules/actions_v1.yaml",
            )),
        }
    }
}

// ── Output ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub dir: PathBuf,
}

impl OutputConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            dir: PathBuf::from(profiled_env_or(p, "SEO_REPORT_OUTPUT_DIR", "output")),
        }
    }
}

// ── Report ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Language used when a rule has no template for the report language.
    pub default_language: String,
    pub supported_languages: Vec<String>,
}

impl ReportConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            default_language: profiled_env_or(p, "SEO_REPORT_DEFAULT_LANGUAGE", "de"),
            supported_languages: profiled_env_list(
                p,
                "SEO_REPORT_SUPPORTED_LANGUAGES",
                &["de", "en"],
            ),
        }
    }

    pub fn is_supported(&self, language: &str) -> bool {
        self.supported_languages.iter().any(|l| l == language)
    }
}
