use crate::error::EnvironmentError;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt, str::FromStr};

pub const ENV_ENVIRONMENT: &str = "MASK_ENVIRONMENT";
pub const ENV_CHUNK_SIZE: &str = "MASK_CHUNK_SIZE";
pub const ENV_JOB_ID: &str = "MASK_JOB_ID";
pub const ENV_REPORT_CALLBACK_URL: &str = "REPORT_CALLBACK_URL";
pub const ENV_AUTH_TOKEN: &str = "AUTH_TOKEN";

/// Environment variables visible to one run. Tests build it by hand instead
/// of touching the process environment.
#[derive(Debug, Clone)]
pub struct EnvContext {
    vars: HashMap<String, String>,
}

impl EnvContext {
    pub fn from_process() -> Self {
        Self {
            vars: std::env::vars().collect(),
        }
    }

    pub fn empty() -> Self {
        Self {
            vars: HashMap::new(),
        }
    }

    /// Non-blank value of `key`.
    pub fn get(&self, key: &str) -> Option<String> {
        self.vars
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    pub fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    pub fn set(&mut self, key: &str, value: &str) {
        self.vars.insert(key.to_string(), value.to_string());
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.set(key, value);
        self
    }
}

impl Default for EnvContext {
    fn default() -> Self {
        Self::from_process()
    }
}

/// Classification of the environment the job runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvironmentKind {
    #[default]
    Production,
    Sandbox,
}

impl FromStr for EnvironmentKind {
    type Err = EnvironmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(EnvironmentKind::Production),
            "sandbox" | "staging" | "dev" | "development" | "test" | "qa" | "uat" => {
                Ok(EnvironmentKind::Sandbox)
            }
            other => Err(EnvironmentError::Unknown(other.to_string())),
        }
    }
}

impl fmt::Display for EnvironmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvironmentKind::Production => f.write_str("production"),
            EnvironmentKind::Sandbox => f.write_str("sandbox"),
        }
    }
}
