use grna_report::protocol::{LayoutWindow, QualityTier, Strand, TierColor};
use grna_report::render::{
    RenderSettings, fingerprint, read_table_csv, render_json, render_markdown, render_report_svg,
    render_table_csv,
};
use grna_report::{
    ReportError, ReportPipeline, ScorePolicy, ValidationSettings, parse_gene_result,
};

const RICE: &str = include_str!("fixtures/rice_dreb1a.json");
const UNIFORM: &str = include_str!("fixtures/uniform_positions.json");
const EMPTY: &str = include_str!("fixtures/empty_candidates.json");

#[test]
fn rice_fixture_end_to_end() {
    let bundle = ReportPipeline::default().run_json(RICE).unwrap();
    let doc = &bundle.document;

    assert_eq!(doc.overview.gene.symbol, "DREB1A");
    assert_eq!(doc.overview.sequence_length, 12_480);
    assert_eq!(doc.layout, LayoutWindow { min: 800, max: 2200 });
    assert!(!bundle.outcome.is_flagged());
    assert_eq!(
        doc.table.iter().map(|r| r.quality_tier).collect::<Vec<_>>(),
        vec![
            QualityTier::Excellent,
            QualityTier::Good,
            QualityTier::Fair,
            QualityTier::Excellent,
            QualityTier::Good,
        ]
    );
    assert!(doc.table.iter().all(|r| r.tier_color == r.quality_tier.color()));
    assert_eq!(doc.table[1].candidate.strand, Strand::Reverse);
    assert_eq!(doc.table[4].tier_color, TierColor::Orange);

    let sites = &bundle.view.sites;
    assert_eq!(sites.len(), 5);
    assert_eq!(sites[0].rank, 1);
    assert!(sites.iter().all(|s| (0.0..=1.0).contains(&s.fraction)));
}

#[test]
fn uniform_fixture_is_reported_with_a_caveat() {
    let bundle = ReportPipeline::default().run_json(UNIFORM).unwrap();
    assert!(bundle.outcome.uniform_positions);
    assert!(bundle.view.uniform_positions);
    assert_eq!(bundle.document.layout, LayoutWindow { min: 400, max: 600 });

    let svg = render_report_svg(&bundle.document, &RenderSettings::default()).unwrap();
    assert!(svg.contains("same start position (500 bp)"));
    let md = render_markdown(&bundle.document, &RenderSettings::default()).unwrap();
    assert!(md.contains("> **Caveat:**"));
}

#[test]
fn empty_fixture_is_fatal() {
    let err = ReportPipeline::default().run_json(EMPTY).unwrap_err();
    assert!(matches!(err, ReportError::EmptyResult));
    assert!(err.is_fatal_input());
}

#[test]
fn reject_policy_refuses_out_of_range_scores() {
    let text = RICE.replace("\"score\": 0.72", "\"score\": 1.72");
    let lenient = ReportPipeline::default().run_json(&text).unwrap();
    assert_eq!(lenient.outcome.out_of_range_scores, vec![3]);
    assert_eq!(lenient.document.table[2].quality_tier, QualityTier::Excellent);

    let strict = ReportPipeline::new(ValidationSettings {
        score_policy: ScorePolicy::Reject,
    });
    let err = strict.run_json(&text).unwrap_err();
    assert!(matches!(err, ReportError::MalformedRecord { .. }));
}

#[test]
fn every_export_agrees_on_the_table() {
    let bundle = ReportPipeline::default().run_json(RICE).unwrap();
    let doc = &bundle.document;
    let input = parse_gene_result(RICE).unwrap();

    let rows = read_table_csv(render_table_csv(doc).unwrap().as_bytes()).unwrap();
    let reread: Vec<_> = rows.iter().map(|r| r.candidate()).collect();
    assert_eq!(reread, input.candidates);

    let json = render_json(doc).unwrap();
    let back: grna_report::protocol::ReportDocument = serde_json::from_str(&json).unwrap();
    assert_eq!(&back, doc);
    assert_eq!(fingerprint(&back).unwrap(), fingerprint(doc).unwrap());
}

#[test]
fn batch_matches_single_runs() {
    let inputs: Vec<_> = [RICE, UNIFORM]
        .iter()
        .map(|t| parse_gene_result(t).unwrap())
        .collect();
    let pipeline = ReportPipeline::default();
    let batch = pipeline.run_batch(&inputs);
    for (input, out) in inputs.iter().zip(batch) {
        assert_eq!(out.unwrap(), pipeline.run(input).unwrap());
    }
}

#[test]
fn renders_results_spread_across_the_coordinate_range() {
    let mut input = parse_gene_result(RICE).unwrap();
    input.candidates.truncate(2);
    input.candidates[0].start = 0;
    input.candidates[1].start = 5_000_000_000_000_000_000;
    let bundle = ReportPipeline::default().run(&input).unwrap();
    assert_eq!(
        bundle.document.layout,
        LayoutWindow {
            min: 0,
            max: 6_000_000_000_000_000_000
        }
    );

    let settings = RenderSettings::default();
    let map = grna_report::render::render_binding_map_svg(&bundle.document, &settings);
    assert!(map.contains("3,000,000,000,000,000,000"));
    assert!(render_report_svg(&bundle.document, &settings).is_ok());
}
