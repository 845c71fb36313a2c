//! Blocking client for the analysis service that produces gene results.
//!
//! One request per call; retry policy belongs to the caller.

use crate::config::ServiceSettings;
use crate::error::ReportError;
use crate::validator::parse_gene_result;
use grna_protocol::{GeneId, GeneResult};
use reqwest::Url;
use reqwest::blocking::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct HealthResponse {
    status: String,
}

#[derive(Debug, Deserialize)]
struct CropsResponse {
    crops: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct TraitsResponse {
    traits: Vec<String>,
}

/// Catalog entry for one crop: target gene per trait.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropCatalogEntry {
    pub scientific_name: String,
    pub traits: BTreeMap<String, GeneId>,
}

pub type CropCatalog = BTreeMap<String, CropCatalogEntry>;

#[derive(Debug, Serialize)]
struct ReportRequest<'a> {
    crop: &'a str,
    #[serde(rename = "trait")]
    trait_name: &'a str,
}

#[derive(Debug, Clone)]
pub struct AnalysisService {
    base_url: Url,
    client: Client,
}

impl AnalysisService {
    pub fn new(settings: &ServiceSettings) -> Result<Self, ReportError> {
        let base_url = parse_base_url(&settings.base_url)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| ReportError::Transport(format!("could not build HTTP client: {e}")))?;
        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, ReportError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ReportError::Config(format!("service URL '{}' cannot carry a path", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub fn health(&self) -> Result<String, ReportError> {
        let url = self.endpoint(&["api", "health"])?;
        let body = send(self.client.get(url.clone()), &url)?;
        let health: HealthResponse = decode(&body, &url)?;
        Ok(health.status)
    }

    pub fn crops(&self) -> Result<Vec<String>, ReportError> {
        let url = self.endpoint(&["api", "crops"])?;
        let body = send(self.client.get(url.clone()), &url)?;
        Ok(decode::<CropsResponse>(&body, &url)?.crops)
    }

    pub fn traits(&self, crop: &str) -> Result<Vec<String>, ReportError> {
        let url = self.endpoint(&["api", "traits", crop])?;
        let body = send(self.client.get(url.clone()), &url)?;
        Ok(decode::<TraitsResponse>(&body, &url)?.traits)
    }

    pub fn crops_and_traits(&self) -> Result<CropCatalog, ReportError> {
        let url = self.endpoint(&["api", "crops_and_traits"])?;
        let body = send(self.client.get(url.clone()), &url)?;
        decode(&body, &url)
    }

    /// Requests a fresh analysis. The response goes through the same
    /// parser as files on disk, so a malformed payload is rejected here.
    pub fn generate_report(&self, crop: &str, trait_name: &str) -> Result<GeneResult, ReportError> {
        let url = self.endpoint(&["api", "generate-report"])?;
        let request = self
            .client
            .post(url.clone())
            .json(&ReportRequest { crop, trait_name });
        let body = send(request, &url)?;
        parse_gene_result(&body)
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ReportError> {
    let trimmed = raw.trim();
    let url = Url::parse(trimmed)
        .map_err(|e| ReportError::Config(format!("invalid service URL '{trimmed}': {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ReportError::Config(format!(
            "service URL '{trimmed}' must use http or https"
        )));
    }
    Ok(url)
}

fn send(request: RequestBuilder, url: &Url) -> Result<String, ReportError> {
    debug!(%url, "analysis service request");
    let response = request
        .send()
        .map_err(|e| ReportError::Transport(format!("request to {url} failed: {e}")))?;
    let status = response.status();
    let body = response
        .text()
        .map_err(|e| ReportError::Transport(format!("could not read response from {url}: {e}")))?;
    if !status.is_success() {
        return Err(service_error(status.as_u16(), &body));
    }
    Ok(body)
}

fn decode<T: serde::de::DeserializeOwned>(body: &str, url: &Url) -> Result<T, ReportError> {
    serde_json::from_str(body).map_err(|e| {
        ReportError::Transport(format!("unexpected response from {url}: {e}"))
    })
}

/// The service reports failures as `{"detail": "..."}`; anything else is
/// passed on trimmed.
pub(crate) fn service_error(status: u16, body: &str) -> ReportError {
    let detail = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("detail").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string());
    ReportError::Service { status, detail }
}
