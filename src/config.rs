//! Runtime configuration
//!
//! Loaded from environment variables with defaults; command-line flags
//! override individual values.
//!
//! # Environment Variables
//!
//! - `HDLFORGE_LOG_LEVEL`: trace|debug|info|warn|error - default: "info"
//! - `HDLFORGE_REGISTRY`: project registry, relative paths taken under the
//!   repository root - default: "hdlforge.toml"
//! - `HDLFORGE_STRICT_STEPS`: fail on unknown step names - default: false
//! - `HDLFORGE_ASSUME_YES`: answer yes to every confirmation - default: false
//! - `HDLFORGE_TOOL_TIMEOUT`: seconds before an external tool is killed - default: none
//! - `HDLFORGE_UNRESOLVED_VARS`: fail|literal - default: "fail"

use crate::manifest::registry::DEFAULT_REGISTRY;
use crate::paths::UnresolvedVarPolicy;
use std::collections::BTreeMap;
use std::env;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    #[error("Failed to parse {field}: {error}")]
    ParseError { field: String, error: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct HdlforgeConfig {
    pub log_level: String,
    pub registry: String,
    pub strict_steps: bool,
    pub assume_yes: bool,
    pub tool_timeout_secs: Option<u64>,
    pub unresolved_vars: String,
}

impl Default for HdlforgeConfig {
    fn default() -> Self {
        let flag = |name: &str| {
            env::var(name)
                .ok()
                .and_then(|v| v.parse::<bool>().ok())
                .unwrap_or(false)
        };

        Self {
            log_level: env::var("HDLFORGE_LOG_LEVEL")
                .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
                .to_lowercase(),
            registry: env::var("HDLFORGE_REGISTRY").unwrap_or_else(|_| DEFAULT_REGISTRY.to_string()),
            strict_steps: flag("HDLFORGE_STRICT_STEPS"),
            assume_yes: flag("HDLFORGE_ASSUME_YES"),
            tool_timeout_secs: env::var("HDLFORGE_TOOL_TIMEOUT")
                .ok()
                .and_then(|v| v.parse::<u64>().ok()),
            unresolved_vars: env::var("HDLFORGE_UNRESOLVED_VARS")
                .unwrap_or_else(|_| UnresolvedVarPolicy::default().to_string())
                .to_lowercase(),
        }
    }
}

impl HdlforgeConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        if self.tool_timeout_secs == Some(0) {
            return Err(ConfigError::ValidationFailed(
                "Tool timeout must be at least 1 second".to_string(),
            ));
        }

        if self.registry.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Registry path cannot be empty".to_string(),
            ));
        }

        self.unresolved_policy().map(|_| ())
    }

    pub fn unresolved_policy(&self) -> Result<UnresolvedVarPolicy, ConfigError> {
        self.unresolved_vars
            .parse()
            .map_err(|error| ConfigError::ParseError {
                field: "HDLFORGE_UNRESOLVED_VARS".to_string(),
                error,
            })
    }

    pub fn tool_timeout(&self) -> Option<Duration> {
        self.tool_timeout_secs.map(Duration::from_secs)
    }

    pub fn to_display_map(&self) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();
        map.insert("log_level".to_string(), self.log_level.clone());
        map.insert("registry".to_string(), self.registry.clone());
        map.insert("strict_steps".to_string(), self.strict_steps.to_string());
        map.insert("assume_yes".to_string(), self.assume_yes.to_string());
        if let Some(secs) = self.tool_timeout_secs {
            map.insert("tool_timeout_secs".to_string(), secs.to_string());
        }
        map.insert("unresolved_vars".to_string(), self.unresolved_vars.clone());
        map
    }
}

impl fmt::Display for HdlforgeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "hdlforge configuration:")?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        writeln!(f, "  Registry: {}", self.registry)?;
        writeln!(f, "  Strict Steps: {}", self.strict_steps)?;
        writeln!(f, "  Assume Yes: {}", self.assume_yes)?;
        match self.tool_timeout_secs {
            Some(secs) => writeln!(f, "  Tool Timeout: {}s", secs)?,
            None => writeln!(f, "  Tool Timeout: none")?,
        }
        writeln!(f, "  Unresolved Variables: {}", self.unresolved_vars)?;
        Ok(())
    }
}
