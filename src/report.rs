use crate::classifier::classify_candidates;
use crate::config::ValidationSettings;
use crate::error::ReportError;
use crate::layout::{compute_window, place_sites};
use crate::validator::{ValidationOutcome, parse_gene_result, validate};
use grna_protocol::{
    BenefitHighlight, ClassifiedCandidate, GeneResult, LayoutWindow, RANKED_VIEW_SCHEMA,
    REPORT_SCHEMA, RankedView, ReportDocument,
};
use rayon::prelude::*;
use tracing::{debug, info_span};

const BENEFIT_HIGHLIGHTS: [(&str, &str, &str); 3] = [
    (
        "🌱",
        "Increased Yield Stability",
        "Consistent yields even under drought conditions.",
    ),
    (
        "💧",
        "Reduced Water Usage",
        "Plants may require less irrigation.",
    ),
    (
        "💰",
        "Improved Resource Efficiency",
        "Lower costs for irrigation and inputs.",
    ),
];

pub fn benefit_highlights() -> Vec<BenefitHighlight> {
    BENEFIT_HIGHLIGHTS
        .iter()
        .map(|(icon, label, description)| BenefitHighlight {
            icon: icon.to_string(),
            label: label.to_string(),
            description: description.to_string(),
        })
        .collect()
}

pub fn report_title(result: &GeneResult) -> String {
    format!(
        "{} gRNA report: {} / {}",
        result.gene.symbol, result.crop, result.trait_name
    )
}

fn caveats(result: &GeneResult, outcome: &ValidationOutcome) -> Vec<String> {
    let mut ret = vec![];
    if outcome.uniform_positions {
        let start = result.candidates[0].start;
        ret.push(match result.candidates.len() {
            1 => format!(
                "Only one gRNA candidate was reported (start {start} bp); the binding-site map shows a single point."
            ),
            n => format!(
                "All {n} gRNA candidates report the same start position ({start} bp). This may indicate an upstream data issue; the binding-site map shows a single point."
            ),
        });
    }
    if !outcome.out_of_range_scores.is_empty() {
        let ranks = outcome
            .out_of_range_scores
            .iter()
            .map(|r| format!("#{r}"))
            .collect::<Vec<_>>()
            .join(", ");
        ret.push(format!(
            "Scores outside the expected 0-1 range were classified as reported: {ranks}."
        ));
    }
    ret
}

/// Composes the export document. Rows are taken in the order given; this
/// never re-sorts by tier or score.
pub fn synthesize(
    result: &GeneResult,
    outcome: &ValidationOutcome,
    classified: &[ClassifiedCandidate],
    window: LayoutWindow,
) -> ReportDocument {
    ReportDocument {
        schema: REPORT_SCHEMA.to_string(),
        title: report_title(result),
        overview: result.overview(),
        table: classified.to_vec(),
        layout: window,
        uniform_positions: outcome.uniform_positions,
        caveats: caveats(result, outcome),
        explanation: result.explanation.clone(),
        benefits: benefit_highlights(),
    }
}

pub fn ranked_view(
    result: &GeneResult,
    outcome: &ValidationOutcome,
    classified: &[ClassifiedCandidate],
    window: LayoutWindow,
) -> RankedView {
    RankedView {
        schema: RANKED_VIEW_SCHEMA.to_string(),
        overview: result.overview(),
        candidates: classified.to_vec(),
        layout: window,
        sites: place_sites(classified, &window),
        uniform_positions: outcome.uniform_positions,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportBundle {
    pub outcome: ValidationOutcome,
    pub view: RankedView,
    pub document: ReportDocument,
}

#[derive(Debug, Clone, Default)]
pub struct ReportPipeline {
    validation: ValidationSettings,
}

impl ReportPipeline {
    pub fn new(validation: ValidationSettings) -> Self {
        Self { validation }
    }

    pub fn run(&self, result: &GeneResult) -> Result<ReportBundle, ReportError> {
        let span = info_span!("report", gene = %result.gene.symbol);
        let _guard = span.enter();

        let outcome = validate(result, &self.validation)?;
        let classified = classify_candidates(&result.candidates);
        debug!(rows = classified.len(), "candidates classified");
        let window = compute_window(&result.starts())?;
        debug!(min = window.min, max = window.max, "layout window computed");

        let view = ranked_view(result, &outcome, &classified, window);
        let document = synthesize(result, &outcome, &classified, window);
        Ok(ReportBundle {
            outcome,
            view,
            document,
        })
    }

    pub fn run_json(&self, text: &str) -> Result<ReportBundle, ReportError> {
        let result = parse_gene_result(text)?;
        self.run(&result)
    }

    /// Independent results are processed in parallel; output order matches input.
    pub fn run_batch(&self, results: &[GeneResult]) -> Vec<Result<ReportBundle, ReportError>> {
        results.par_iter().map(|result| self.run(result)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grna_protocol::{Candidate, GeneId, QualityTier, Strand};

    fn result(starts_scores: &[(u64, f64)]) -> GeneResult {
        GeneResult {
            crop: "maize".to_string(),
            trait_name: "drought resistance".to_string(),
            gene: GeneId {
                ensembl_id: "Zm00001d052025".to_string(),
                symbol: "ZmDREB2A".to_string(),
            },
            source: "NCBI".to_string(),
            sequence_length: 2310,
            explanation: "**1. Gene Function**\nZmDREB2A activates stress genes.\n".to_string(),
            candidates: starts_scores
                .iter()
                .map(|&(start, score)| Candidate {
                    sequence: "TTGACCGTAGCTAGCTAACG".to_string(),
                    pam: "CGG".to_string(),
                    start,
                    strand: Strand::Forward,
                    score,
                })
                .collect(),
        }
    }

    #[test]
    fn document_mirrors_the_result() {
        let input = result(&[(1000, 0.72), (2000, 0.93), (1500, 0.85)]);
        let bundle = ReportPipeline::default().run(&input).unwrap();
        let doc = &bundle.document;

        assert_eq!(doc.schema, REPORT_SCHEMA);
        assert_eq!(doc.title, "ZmDREB2A gRNA report: maize / drought resistance");
        assert_eq!(doc.overview, input.overview());
        assert_eq!(doc.explanation, input.explanation);
        assert_eq!(doc.layout, LayoutWindow { min: 800, max: 2200 });
        assert!(!doc.uniform_positions);
        assert!(doc.caveats.is_empty());
        assert_eq!(doc.benefits.len(), 3);
        assert_eq!(doc.benefits[1].label, "Reduced Water Usage");

        assert_eq!(
            doc.table.iter().map(|r| r.quality_tier).collect::<Vec<_>>(),
            vec![QualityTier::Fair, QualityTier::Excellent, QualityTier::Good]
        );
        assert!(doc.candidates().eq(input.candidates.iter()));
    }

    #[test]
    fn view_and_document_share_classification() {
        let bundle = ReportPipeline::default()
            .run(&result(&[(10, 0.91), (40, 0.5)]))
            .unwrap();
        assert_eq!(bundle.view.candidates, bundle.document.table);
        assert_eq!(bundle.view.layout, bundle.document.layout);
        assert_eq!(bundle.view.sites.len(), 2);
        assert_eq!(bundle.view.schema, RANKED_VIEW_SCHEMA);
    }

    #[test]
    fn uniform_positions_add_a_caveat() {
        let bundle = ReportPipeline::default()
            .run(&result(&[(500, 0.9), (500, 0.88)]))
            .unwrap();
        assert!(bundle.document.uniform_positions);
        assert_eq!(bundle.document.layout, LayoutWindow { min: 400, max: 600 });
        assert_eq!(bundle.document.caveats.len(), 1);
        assert!(bundle.document.caveats[0].contains("500 bp"));
    }

    #[test]
    fn single_candidate_caveat_is_singular() {
        let bundle = ReportPipeline::default().run(&result(&[(730, 0.95)])).unwrap();
        assert!(bundle.document.uniform_positions);
        assert_eq!(
            bundle.document.caveats,
            vec![
                "Only one gRNA candidate was reported (start 730 bp); the binding-site map shows a single point."
                    .to_string()
            ]
        );
        assert!(!bundle.document.caveats[0].contains("All 1"));
    }

    #[test]
    fn out_of_range_scores_are_listed() {
        let bundle = ReportPipeline::default()
            .run(&result(&[(5, 1.4), (90, 0.2)]))
            .unwrap();
        assert_eq!(bundle.document.table[0].quality_tier, QualityTier::Excellent);
        assert!(bundle.document.caveats.iter().any(|c| c.contains("#1")));
    }

    #[test]
    fn empty_result_produces_no_document() {
        let err = ReportPipeline::default().run(&result(&[])).unwrap_err();
        assert!(matches!(err, ReportError::EmptyResult));
    }

    #[test]
    fn same_input_same_document() {
        let input = result(&[(300, 0.81), (120, 0.97)]);
        let pipeline = ReportPipeline::default();
        assert_eq!(
            pipeline.run(&input).unwrap().document,
            pipeline.run(&input).unwrap().document
        );
    }

    #[test]
    fn batch_keeps_input_order() {
        let inputs = vec![result(&[(1, 0.9)]), result(&[]), result(&[(7, 0.1), (9, 0.2)])];
        let out = ReportPipeline::default().run_batch(&inputs);
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].as_ref().unwrap().document.table.len(), 1);
        assert!(matches!(out[1], Err(ReportError::EmptyResult)));
        assert_eq!(out[2].as_ref().unwrap().document.table.len(), 2);
    }
}
