use crate::text::{format_score, group_thousands};
use crate::{RenderError, RenderSettings, fingerprint};
use grna_protocol::ReportDocument;
use std::fmt::Write;

fn cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

pub fn render_markdown(doc: &ReportDocument, settings: &RenderSettings) -> Result<String, RenderError> {
    let ov = &doc.overview;
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(out, "# {}\n", doc.title);
    let _ = writeln!(out, "## Gene Information\n");
    let _ = writeln!(out, "| Field | Value |\n|---|---|");
    let _ = writeln!(out, "| Crop | {} |", cell(&ov.crop));
    let _ = writeln!(out, "| Trait | {} |", cell(&ov.trait_name));
    let _ = writeln!(out, "| Gene ID | {} |", cell(&ov.gene.ensembl_id));
    let _ = writeln!(out, "| Gene Symbol | {} |", cell(&ov.gene.symbol));
    let _ = writeln!(out, "| Sequence Length | {} bp |", group_thousands(ov.sequence_length));
    let _ = writeln!(out, "| Source | {} |\n", cell(&ov.source));

    for caveat in &doc.caveats {
        let _ = writeln!(out, "> **Caveat:** {caveat}\n");
    }

    let _ = writeln!(out, "## Top CRISPR gRNAs\n");
    let _ = writeln!(
        out,
        "| Rank | Sequence (5' → 3') | PAM | Start Position | Strand | Score | Quality |\n|---:|---|---|---:|:---:|---:|---|"
    );
    for row in &doc.table {
        let c = &row.candidate;
        let _ = writeln!(
            out,
            "| {} | `{}` | `{}` | {} | {} | {} | {} |",
            row.rank,
            c.sequence,
            c.pam,
            c.start,
            c.strand,
            format_score(c.score, settings.score_decimals),
            row.quality_tier
        );
    }
    out.push('\n');

    if settings.show_benefits && !doc.benefits.is_empty() {
        let _ = writeln!(out, "## Expected Benefits\n");
        for benefit in &doc.benefits {
            let _ = writeln!(
                out,
                "- {} **{}**: {}",
                benefit.icon, benefit.label, benefit.description
            );
        }
        out.push('\n');
    }

    let _ = writeln!(out, "## Gene Function & Analysis\n");
    let _ = writeln!(out, "{}\n", doc.explanation);

    if settings.show_binding_map {
        let _ = writeln!(out, "## gRNA Binding Sites on Gene\n");
        let _ = writeln!(
            out,
            "Window: {}-{} bp\n",
            group_thousands(doc.layout.min),
            group_thousands(doc.layout.max)
        );
        for row in &doc.table {
            let _ = writeln!(
                out,
                "{}. `{}` at {} bp ({} strand), score {} ({})",
                row.rank,
                row.candidate.sequence,
                row.candidate.start,
                row.candidate.strand,
                format_score(row.candidate.score, settings.score_decimals),
                row.quality_tier
            );
        }
        out.push('\n');
    }

    let _ = writeln!(out, "---\n");
    let _ = writeln!(out, "{} · fingerprint `{}`", doc.schema, fingerprint(doc)?);
    Ok(out)
}
