//! Headless export of [`ReportDocument`]s.
//!
//! Every function here is a pure rendering step: no clock, no randomness,
//! no hash-map iteration. The same document always yields the same bytes.

use grna_protocol::ReportDocument;
use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use std::fmt;

pub mod markdown;
pub mod report_svg;
pub mod table;
mod text;

pub use markdown::render_markdown;
pub use report_svg::{render_binding_map_svg, render_report_svg};
pub use table::{TableRow, read_table_csv, render_table_csv, write_table_csv};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub page_width: f32,
    pub score_decimals: usize,
    pub show_binding_map: bool,
    pub show_benefits: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            page_width: 900.0,
            score_decimals: 2,
            show_binding_map: true,
            show_benefits: true,
        }
    }
}

#[derive(Debug)]
pub enum RenderError {
    Csv(csv::Error),
    Json(serde_json::Error),
    Io(std::io::Error),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Csv(e) => write!(f, "CSV table error: {e}"),
            Self::Json(e) => write!(f, "JSON export error: {e}"),
            Self::Io(e) => write!(f, "could not write export: {e}"),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Csv(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Io(e) => Some(e),
        }
    }
}

impl From<csv::Error> for RenderError {
    fn from(err: csv::Error) -> Self {
        RenderError::Csv(err)
    }
}

impl From<serde_json::Error> for RenderError {
    fn from(err: serde_json::Error) -> Self {
        RenderError::Json(err)
    }
}

impl From<std::io::Error> for RenderError {
    fn from(err: std::io::Error) -> Self {
        RenderError::Io(err)
    }
}

pub fn render_json(doc: &ReportDocument) -> Result<String, RenderError> {
    let mut text = serde_json::to_string_pretty(doc)?;
    text.push('\n');
    Ok(text)
}

/// SHA-1 over the compact JSON form; stable for golden-file comparison.
pub fn fingerprint(doc: &ReportDocument) -> Result<String, RenderError> {
    let bytes = serde_json::to_vec(doc)?;
    Ok(format!("{:x}", Sha1::digest(&bytes)))
}
