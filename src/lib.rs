//! Turns analysis-service gene results into ranked candidate views and
//! export-ready report documents.
//!
//! The pipeline runs in a fixed order: [`validator`] checks the record,
//! [`classifier`] assigns quality tiers, [`layout`] derives the binding-site
//! window and [`report`] assembles the outputs. Rendering lives in the
//! `grna-render` crate and the wire types in `grna-protocol`.

pub mod about;
pub mod classifier;
pub mod config;
pub mod error;
pub mod layout;
pub mod logging;
pub mod report;
pub mod service;
pub mod validator;

pub use config::{ReportSettings, ScorePolicy, ServiceSettings, ValidationSettings};
pub use error::ReportError;
pub use grna_protocol as protocol;
pub use grna_render as render;
pub use report::{ReportBundle, ReportPipeline};
pub use service::AnalysisService;
pub use validator::{ValidationOutcome, parse_gene_result, validate};
