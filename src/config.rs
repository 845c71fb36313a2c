use crate::error::ReportError;
use grna_render::RenderSettings;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const SERVICE_URL_ENV: &str = "GRNA_REPORT_SERVICE_URL";
pub const SERVICE_TIMEOUT_ENV: &str = "GRNA_REPORT_TIMEOUT_SECS";
const DEFAULT_SERVICE_URL: &str = "http://localhost:5000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// What to do with scores outside `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScorePolicy {
    /// Classify the raw value; offending ranks are listed as caveats.
    #[default]
    PassThrough,
    /// Treat the record as malformed.
    Reject,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SERVICE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationSettings {
    pub score_policy: ScorePolicy,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    pub service: ServiceSettings,
    pub validation: ValidationSettings,
    pub render: RenderSettings,
}

impl ReportSettings {
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ReportError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            ReportError::Config(format!("Could not read settings file '{}': {e}", path.display()))
        })?;
        serde_json::from_str(&text).map_err(|e| {
            ReportError::Config(format!("Could not parse settings JSON '{}': {e}", path.display()))
        })
    }

    pub fn save_to_path(&self, path: impl AsRef<Path>) -> Result<(), ReportError> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }

    /// Settings from `path` when given, otherwise defaults; environment
    /// overrides are applied last.
    pub fn resolve(path: Option<&str>) -> Result<Self, ReportError> {
        let mut settings = match path {
            Some(path) => Self::load_from_path(path)?,
            None => Self::default(),
        };
        settings.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(settings)
    }

    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ReportError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(SERVICE_URL_ENV)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
        {
            self.service.base_url = url;
        }
        if let Some(raw) = lookup(SERVICE_TIMEOUT_ENV)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
        {
            self.service.timeout_secs = raw.parse::<u64>().map_err(|e| {
                ReportError::Config(format!("{SERVICE_TIMEOUT_ENV}='{raw}' is not a whole number: {e}"))
            })?;
        }
        if self.service.timeout_secs == 0 {
            return Err(ReportError::Config(
                "service timeout must be at least one second".to_string(),
            ));
        }
        Ok(())
    }
}
