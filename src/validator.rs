//! Boundary checks for analysis-service results.
//!
//! Structural faults are errors. Suspicious but representable data (all
//! candidates at one coordinate, scores outside `[0, 1]`) is reported on the
//! [`ValidationOutcome`] so the presentation layer can show a caveat.

use crate::config::{ScorePolicy, ValidationSettings};
use crate::error::ReportError;
use bio::alphabets::{Alphabet, dna};
use grna_protocol::GeneResult;
use itertools::Itertools;
use serde::Serialize;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationOutcome {
    pub uniform_positions: bool,
    /// 1-based ranks of candidates scored outside `[0, 1]`.
    pub out_of_range_scores: Vec<usize>,
}

impl ValidationOutcome {
    pub fn is_flagged(&self) -> bool {
        self.uniform_positions || !self.out_of_range_scores.is_empty()
    }
}

pub fn parse_gene_result(text: &str) -> Result<GeneResult, ReportError> {
    serde_json::from_str(text).map_err(|e| ReportError::malformed("record", e.to_string()))
}

pub fn gene_result_from_value(value: serde_json::Value) -> Result<GeneResult, ReportError> {
    serde_json::from_value(value).map_err(|e| ReportError::malformed("record", e.to_string()))
}

#[inline(always)]
pub fn score_in_range(score: f64) -> bool {
    (0.0..=1.0).contains(&score)
}

fn require_text(field: &str, value: &str) -> Result<(), ReportError> {
    if value.trim().is_empty() {
        return Err(ReportError::malformed(field, "must not be blank"));
    }
    Ok(())
}

fn require_alphabet(field: String, value: &str, alphabet: &Alphabet, what: &str) -> Result<(), ReportError> {
    if value.is_empty() {
        return Err(ReportError::malformed(field, "must not be empty"));
    }
    if !alphabet.is_word(value.as_bytes()) {
        return Err(ReportError::malformed(
            field,
            format!("'{value}' contains symbols outside the {what} alphabet"),
        ));
    }
    Ok(())
}

pub fn validate(
    result: &GeneResult,
    settings: &ValidationSettings,
) -> Result<ValidationOutcome, ReportError> {
    if result.candidates.is_empty() {
        return Err(ReportError::EmptyResult);
    }

    require_text("crop", &result.crop)?;
    require_text("trait", &result.trait_name)?;
    require_text("gene.ensembl_id", &result.gene.ensembl_id)?;
    require_text("gene.symbol", &result.gene.symbol)?;
    require_text("source", &result.source)?;
    if result.sequence_length == 0 {
        return Err(ReportError::malformed("sequence_length", "must be positive"));
    }

    let nucleotides = dna::alphabet();
    let iupac = dna::iupac_alphabet();
    let guide_length = result.candidates[0].sequence.len();
    let mut out_of_range_scores = vec![];

    for (idx, candidate) in result.candidates.iter().enumerate() {
        let path = format!("candidates[{idx}]");
        require_alphabet(format!("{path}.sequence"), &candidate.sequence, &nucleotides, "nucleotide")?;
        if candidate.sequence.len() != guide_length {
            return Err(ReportError::malformed(
                format!("{path}.sequence"),
                format!(
                    "length {} differs from the guide length {guide_length} of the first candidate",
                    candidate.sequence.len()
                ),
            ));
        }
        require_alphabet(format!("{path}.pam"), &candidate.pam, &iupac, "IUPAC nucleotide")?;

        if !candidate.score.is_finite() {
            return Err(ReportError::malformed(format!("{path}.score"), "must be a finite number"));
        }
        if !score_in_range(candidate.score) {
            if settings.score_policy == ScorePolicy::Reject {
                return Err(ReportError::malformed(
                    format!("{path}.score"),
                    format!("{} is outside [0, 1]", candidate.score),
                ));
            }
            warn!(rank = idx + 1, score = candidate.score, "gRNA score outside [0, 1]");
            out_of_range_scores.push(idx + 1);
        }
    }

    let uniform_positions = result.candidates.iter().map(|c| c.start).all_equal();
    if uniform_positions {
        warn!(
            gene = %result.gene.symbol,
            start = result.candidates[0].start,
            candidates = result.candidates.len(),
            "all gRNA candidates report the same start position"
        );
    }
    debug!(
        gene = %result.gene.symbol,
        candidates = result.candidates.len(),
        uniform_positions,
        "gene result validated"
    );

    Ok(ValidationOutcome {
        uniform_positions,
        out_of_range_scores,
    })
}
