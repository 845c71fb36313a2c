use crate::text::{format_score, group_thousands, wrap_text};
use crate::{RenderError, RenderSettings, fingerprint};
use grna_protocol::{ReportDocument, Strand, TierColor};
use svg::Document;
use svg::node::element::path::Data;
use svg::node::element::{Group, Line, Path, Rectangle, Text};

const FONT: &str = "Helvetica, Arial, sans-serif";
const MONO: &str = "Menlo, Consolas, monospace";
const MIN_PAGE_WIDTH: f32 = 480.0;
const MARGIN: f32 = 32.0;
const SECTION_GAP: f32 = 28.0;
const LINE_HEIGHT: f32 = 18.0;
const ROW_HEIGHT: f32 = 26.0;
const CHAR_WIDTH: f32 = 6.5;
const MAP_SIDE_MARGIN: f32 = 24.0;
const MAP_LANE_HEIGHT: f32 = 12.0;
const MAP_LABEL_GAP: f32 = 6.0;
const CAVEAT_FILL: &str = "#fffbeb";
const CAVEAT_STROKE: &str = "#f59e0b";
const CAVEAT_TEXT: &str = "#92400e";

const OVERVIEW_PALETTE: [(&str, &str); 4] = [
    ("#eff6ff", "#1e3a8a"),
    ("#f0fdf4", "#14532d"),
    ("#faf5ff", "#581c87"),
    ("#fff7ed", "#7c2d12"),
];

// Column offsets as fractions of the table width.
const TABLE_COLUMNS: [(&str, f32); 7] = [
    ("Rank", 0.0),
    ("Sequence (5' → 3')", 0.07),
    ("PAM", 0.43),
    ("Start Position", 0.52),
    ("Strand", 0.67),
    ("Score", 0.77),
    ("Quality", 0.87),
];

fn label(text: impl Into<String>, x: f32, y: f32, size: u32, fill: &str) -> Text {
    Text::new(text.into())
        .set("x", x)
        .set("y", y)
        .set("font-family", FONT)
        .set("font-size", size)
        .set("fill", fill)
}

fn heading(text: &str, x: f32, y: f32) -> Text {
    label(text, x, y, 16, "#111827").set("font-weight", "bold")
}

fn strand_colors(strand: Strand) -> (&'static str, &'static str) {
    match strand {
        Strand::Forward => ("#166534", "#dcfce7"),
        Strand::Reverse => ("#1e40af", "#dbeafe"),
    }
}

fn badge(text: &str, x: f32, y: f32, fg: &str, bg: &str) -> Group {
    let w = estimate_text_width(text) + 14.0;
    Group::new()
        .add(
            Rectangle::new()
                .set("x", x)
                .set("y", y - 13.0)
                .set("width", w)
                .set("height", 18)
                .set("rx", 9)
                .set("fill", bg)
                .set("stroke", fg)
                .set("stroke-width", 0.6),
        )
        .add(label(text, x + 7.0, y, 11, fg))
}

fn estimate_text_width(text: &str) -> f32 {
    (text.chars().count().max(1) as f32) * CHAR_WIDTH
}

fn chars_per_line(width: f32) -> usize {
    (width / CHAR_WIDTH).floor().max(1.0) as usize
}

fn lane_allocate(lanes: &mut Vec<f32>, start: f32, end: f32, padding: f32) -> usize {
    for (idx, lane_end) in lanes.iter_mut().enumerate() {
        if start >= *lane_end + padding {
            *lane_end = end;
            return idx;
        }
    }
    lanes.push(end);
    lanes.len() - 1
}

fn overview_section(mut body: Group, doc: &ReportDocument, width: f32, y: &mut f32) -> Group {
    let ov = &doc.overview;
    let gap = 12.0;
    let box_w = (width - 2.0 * MARGIN - 3.0 * gap) / 4.0;
    let box_h = 56.0;
    let fields = [
        ("Crop", ov.crop.clone()),
        ("Trait", ov.trait_name.clone()),
        ("Gene ID", ov.gene.ensembl_id.clone()),
        (
            "Sequence Length",
            format!("{} bp", group_thousands(ov.sequence_length)),
        ),
    ];

    body = body.add(heading("Gene Information", MARGIN, *y));
    *y += 12.0;
    for (idx, ((name, value), (bg, fg))) in fields.iter().zip(OVERVIEW_PALETTE).enumerate() {
        let x = MARGIN + idx as f32 * (box_w + gap);
        body = body
            .add(
                Rectangle::new()
                    .set("x", x)
                    .set("y", *y)
                    .set("width", box_w)
                    .set("height", box_h)
                    .set("rx", 8)
                    .set("fill", bg),
            )
            .add(label(*name, x + 10.0, *y + 20.0, 11, fg))
            .add(label(value.clone(), x + 10.0, *y + 42.0, 15, fg).set("font-weight", "bold"));
    }
    *y += box_h + 22.0;
    body = body.add(label(
        format!("Source: {}    Gene Symbol: {}", ov.source, ov.gene.symbol),
        MARGIN,
        *y,
        12,
        "#374151",
    ));
    *y += SECTION_GAP;
    body
}

fn caveat_section(mut body: Group, doc: &ReportDocument, width: f32, y: &mut f32) -> Group {
    if doc.caveats.is_empty() {
        return body;
    }
    let inner = width - 2.0 * MARGIN - 24.0;
    let lines: Vec<String> = doc
        .caveats
        .iter()
        .flat_map(|c| wrap_text(c, chars_per_line(inner)))
        .collect();
    let box_h = lines.len() as f32 * LINE_HEIGHT + 16.0;
    body = body.add(
        Rectangle::new()
            .set("x", MARGIN)
            .set("y", *y - 8.0)
            .set("width", width - 2.0 * MARGIN)
            .set("height", box_h)
            .set("rx", 6)
            .set("fill", CAVEAT_FILL)
            .set("stroke", CAVEAT_STROKE)
            .set("stroke-width", 1),
    );
    for (idx, line) in lines.iter().enumerate() {
        body = body.add(label(
            line.clone(),
            MARGIN + 12.0,
            *y + 12.0 + idx as f32 * LINE_HEIGHT,
            12,
            CAVEAT_TEXT,
        ));
    }
    *y += box_h + SECTION_GAP - 8.0;
    body
}

fn table_section(
    mut body: Group,
    doc: &ReportDocument,
    settings: &RenderSettings,
    width: f32,
    y: &mut f32,
) -> Group {
    let table_w = width - 2.0 * MARGIN;
    let col_x = |idx: usize| MARGIN + 8.0 + TABLE_COLUMNS[idx].1 * table_w;

    body = body.add(heading("Top CRISPR gRNAs", MARGIN, *y));
    *y += 24.0;
    for (idx, (name, _)) in TABLE_COLUMNS.iter().enumerate() {
        body = body.add(label(*name, col_x(idx), *y, 11, "#374151").set("font-weight", "bold"));
    }
    body = body.add(
        Line::new()
            .set("x1", MARGIN)
            .set("y1", *y + 8.0)
            .set("x2", width - MARGIN)
            .set("y2", *y + 8.0)
            .set("stroke", "#d1d5db")
            .set("stroke-width", 1),
    );
    *y += 8.0;

    for row in &doc.table {
        let color: TierColor = row.tier_color;
        let c = &row.candidate;
        let text_y = *y + 17.0;
        let (strand_fg, strand_bg) = strand_colors(c.strand);
        body = body
            .add(
                Rectangle::new()
                    .set("x", MARGIN)
                    .set("y", *y + 1.0)
                    .set("width", table_w)
                    .set("height", ROW_HEIGHT - 2.0)
                    .set("fill", color.background())
                    .set("fill-opacity", 0.45),
            )
            .add(label(row.rank.to_string(), col_x(0), text_y, 12, "#1e3a8a").set("font-weight", "bold"))
            .add(label(c.sequence.clone(), col_x(1), text_y, 12, "#111827").set("font-family", MONO))
            .add(label(c.pam.clone(), col_x(2), text_y, 12, "#991b1b").set("font-family", MONO))
            .add(label(c.start.to_string(), col_x(3), text_y, 12, "#374151"))
            .add(badge(c.strand.symbol(), col_x(4), text_y, strand_fg, strand_bg))
            .add(
                label(format_score(c.score, settings.score_decimals), col_x(5), text_y, 12, "#111827")
                    .set("font-family", MONO),
            )
            .add(badge(row.quality_tier.label(), col_x(6), text_y, color.foreground(), color.background()));
        *y += ROW_HEIGHT;
    }
    *y += SECTION_GAP;
    body
}

fn benefits_section(mut body: Group, doc: &ReportDocument, width: f32, y: &mut f32) -> Group {
    if doc.benefits.is_empty() {
        return body;
    }
    body = body.add(heading("Expected Benefits", MARGIN, *y));
    *y += 14.0;
    let n = doc.benefits.len() as f32;
    let gap = 12.0;
    let box_w = (width - 2.0 * MARGIN - (n - 1.0) * gap) / n;
    let wrapped: Vec<Vec<String>> = doc
        .benefits
        .iter()
        .map(|b| wrap_text(&b.description, chars_per_line(box_w - 20.0)))
        .collect();
    let max_lines = wrapped.iter().map(Vec::len).max().unwrap_or(0) as f32;
    let box_h = 58.0 + max_lines * 15.0;

    for (idx, (benefit, lines)) in doc.benefits.iter().zip(&wrapped).enumerate() {
        let x = MARGIN + idx as f32 * (box_w + gap);
        let cx = x + box_w / 2.0;
        body = body
            .add(
                Rectangle::new()
                    .set("x", x)
                    .set("y", *y)
                    .set("width", box_w)
                    .set("height", box_h)
                    .set("rx", 8)
                    .set("fill", "#f3f4f6"),
            )
            .add(label(benefit.icon.clone(), cx, *y + 26.0, 20, "#111827").set("text-anchor", "middle"))
            .add(
                label(benefit.label.clone(), cx, *y + 46.0, 12, "#111827")
                    .set("text-anchor", "middle")
                    .set("font-weight", "bold"),
            );
        for (line_idx, line) in lines.iter().enumerate() {
            body = body.add(
                label(line.clone(), cx, *y + 64.0 + line_idx as f32 * 15.0, 11, "#4b5563")
                    .set("text-anchor", "middle"),
            );
        }
    }
    *y += box_h + SECTION_GAP;
    body
}

/// Binding sites along the padded window. Forward-strand sites sit above
/// the axis, reverse-strand sites below. Returns the group and its height.
fn binding_map(doc: &ReportDocument, width: f32) -> (Group, f32) {
    let left = MARGIN + MAP_SIDE_MARGIN;
    let right = width - MARGIN - MAP_SIDE_MARGIN;
    let window = doc.layout;
    let to_x = |pos: u64| left + (right - left) * window.fraction(pos) as f32;

    let mut above: Vec<f32> = vec![];
    let mut below: Vec<f32> = vec![];
    let mut sites = vec![];
    for row in &doc.table {
        let x = to_x(row.candidate.start);
        let text = format!("#{}", row.rank);
        let half = estimate_text_width(&text) / 2.0;
        let lanes = if row.candidate.strand.is_reverse() {
            &mut below
        } else {
            &mut above
        };
        let lane = lane_allocate(lanes, x - half, x + half, MAP_LABEL_GAP);
        sites.push((row, x, text, lane));
    }

    let axis_y = 52.0 + above.len() as f32 * MAP_LANE_HEIGHT;
    let ticks_y = axis_y + 48.0 + below.len() as f32 * MAP_LANE_HEIGHT;

    let mut group = Group::new()
        .add(heading("gRNA Binding Sites on Gene", MARGIN, 16.0))
        .add(
            label(
                format!(
                    "{}-{} bp",
                    group_thousands(window.min),
                    group_thousands(window.max)
                ),
                width - MARGIN,
                16.0,
                11,
                "#6b7280",
            )
            .set("text-anchor", "end"),
        )
        .add(
            Line::new()
                .set("x1", left)
                .set("y1", axis_y)
                .set("x2", right)
                .set("y2", axis_y)
                .set("stroke", "#374151")
                .set("stroke-width", 2),
        );

    for i in 0..=4u64 {
        let pos = window.min + (u128::from(window.width()) * u128::from(i) / 4) as u64;
        let x = left + (right - left) * i as f32 / 4.0;
        group = group
            .add(
                Line::new()
                    .set("x1", x)
                    .set("y1", axis_y - 4.0)
                    .set("x2", x)
                    .set("y2", axis_y + 4.0)
                    .set("stroke", "#374151")
                    .set("stroke-width", 1),
            )
            .add(label(group_thousands(pos), x, ticks_y, 10, "#6b7280").set("text-anchor", "middle"));
    }

    for (row, x, text, lane) in sites {
        let color = row.tier_color.foreground();
        let reverse = row.candidate.strand.is_reverse();
        let data = if reverse {
            Data::new()
                .move_to((x, axis_y + 8.0))
                .line_to((x, axis_y + 22.0))
                .line_to((x - 8.0, axis_y + 15.0))
                .close()
        } else {
            Data::new()
                .move_to((x, axis_y - 22.0))
                .line_to((x, axis_y - 8.0))
                .line_to((x + 8.0, axis_y - 15.0))
                .close()
        };
        let label_y = if reverse {
            axis_y + 36.0 + lane as f32 * MAP_LANE_HEIGHT
        } else {
            axis_y - 28.0 - lane as f32 * MAP_LANE_HEIGHT
        };
        group = group
            .add(
                Line::new()
                    .set("x1", x)
                    .set("y1", axis_y - 8.0)
                    .set("x2", x)
                    .set("y2", axis_y + 8.0)
                    .set("stroke", color)
                    .set("stroke-width", 1.5),
            )
            .add(Path::new().set("d", data).set("fill", color))
            .add(
                label(text, x, label_y, 10, color)
                    .set("text-anchor", "middle")
                    .set("font-weight", "bold"),
            );
    }

    let mut height = ticks_y + 8.0;
    if doc.uniform_positions {
        height += 16.0;
        group = group.add(label(
            "All candidates share one start position; the window is padded around a single point.",
            MARGIN,
            height,
            11,
            CAVEAT_TEXT,
        ));
        height += 6.0;
    }
    (group, height)
}

fn explanation_section(mut body: Group, doc: &ReportDocument, width: f32, y: &mut f32) -> Group {
    body = body.add(heading("Gene Function & Analysis", MARGIN, *y));
    *y += 24.0;
    for line in wrap_text(&doc.explanation, chars_per_line(width - 2.0 * MARGIN)) {
        if !line.is_empty() {
            body = body.add(label(line, MARGIN, *y, 12, "#374151"));
        }
        *y += LINE_HEIGHT;
    }
    *y += SECTION_GAP - LINE_HEIGHT;
    body
}

fn page(width: f32, height: f32, content: Group) -> Document {
    Document::new()
        .set("viewBox", (0, 0, width, height))
        .set("width", width)
        .set("height", height)
        .add(
            Rectangle::new()
                .set("x", 0)
                .set("y", 0)
                .set("width", width)
                .set("height", height)
                .set("fill", "#ffffff"),
        )
        .add(content)
}

/// Single-page report mirroring the on-screen summary.
pub fn render_report_svg(doc: &ReportDocument, settings: &RenderSettings) -> Result<String, RenderError> {
    let width = settings.page_width.max(MIN_PAGE_WIDTH);
    let mut y = MARGIN + 22.0;
    let mut body = Group::new().add(
        label(doc.title.clone(), MARGIN, y, 22, "#202020").set("font-weight", "bold"),
    );
    y += 36.0;

    body = overview_section(body, doc, width, &mut y);
    body = caveat_section(body, doc, width, &mut y);
    body = table_section(body, doc, settings, width, &mut y);
    if settings.show_benefits {
        body = benefits_section(body, doc, width, &mut y);
    }
    if settings.show_binding_map {
        let (map, map_h) = binding_map(doc, width);
        body = body.add(map.set("transform", format!("translate(0,{y})")));
        y += map_h + SECTION_GAP;
    }
    body = explanation_section(body, doc, width, &mut y);

    body = body.add(label(
        format!("{} · fingerprint {}", doc.schema, fingerprint(doc)?),
        MARGIN,
        y,
        9,
        "#9ca3af",
    ));
    y += MARGIN;

    Ok(page(width, y, body).to_string())
}

/// Binding-site map alone, for embedding next to other views.
pub fn render_binding_map_svg(doc: &ReportDocument, settings: &RenderSettings) -> String {
    let width = settings.page_width.max(MIN_PAGE_WIDTH);
    let (map, map_h) = binding_map(doc, width);
    let height = map_h + 2.0 * MARGIN;
    page(width, height, map.set("transform", format!("translate(0,{MARGIN})"))).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use grna_protocol::LayoutWindow;
    #[cfg(feature = "snapshot-tests")]
    use std::fs;

    #[test]
    fn report_contains_table_and_tier_colors() {
        let doc = fixtures::document();
        let svg = render_report_svg(&doc, &RenderSettings::default()).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("DREB1A gRNA report: rice / drought resistance"));
        assert!(svg.contains("GATTACAGATTACAGATTAC"));
        assert!(svg.contains("12,480 bp"));
        assert!(svg.contains("0.81"));
        assert!(svg.contains(TierColor::Green.foreground()));
        assert!(svg.contains(TierColor::Orange.background()));
        assert!(svg.contains(TierColor::Red.foreground()));
        assert!(svg.contains("Gene Function &amp; Analysis"));
        assert!(svg.contains(&fingerprint(&doc).unwrap()));
        assert!(!svg.contains(CAVEAT_FILL));
    }

    #[test]
    fn explanation_text_is_escaped() {
        let svg = render_report_svg(&fixtures::document(), &RenderSettings::default()).unwrap();
        assert!(svg.contains("&lt;DRE&gt;"));
        assert!(!svg.contains("<DRE>"));
    }

    #[test]
    fn caveat_banner_is_drawn_when_flagged() {
        let mut doc = fixtures::document();
        doc.uniform_positions = true;
        doc.caveats = vec!["All 3 gRNA candidates report the same start position (500 bp).".to_string()];
        let svg = render_report_svg(&doc, &RenderSettings::default()).unwrap();
        assert!(svg.contains(CAVEAT_FILL));
        assert!(svg.contains("share one start position"));
    }

    #[test]
    fn toggles_drop_sections() {
        let settings = RenderSettings {
            show_benefits: false,
            show_binding_map: false,
            ..RenderSettings::default()
        };
        let svg = render_report_svg(&fixtures::document(), &settings).unwrap();
        assert!(!svg.contains("Expected Benefits"));
        assert!(!svg.contains("Binding Sites"));
    }

    #[test]
    fn map_places_every_site() {
        let doc = fixtures::document();
        let svg = render_binding_map_svg(&doc, &RenderSettings::default());
        for rank in ["#1", "#2", "#3"] {
            assert!(svg.contains(rank));
        }
        assert!(svg.contains("800-2,200 bp"));
    }

    #[test]
    fn overlapping_labels_get_separate_lanes() {
        let mut lanes = vec![];
        assert_eq!(lane_allocate(&mut lanes, 10.0, 30.0, 6.0), 0);
        assert_eq!(lane_allocate(&mut lanes, 20.0, 40.0, 6.0), 1);
        assert_eq!(lane_allocate(&mut lanes, 40.0, 60.0, 6.0), 0);
    }

    #[test]
    fn rendering_is_deterministic() {
        let doc = fixtures::document();
        let settings = RenderSettings::default();
        assert_eq!(
            render_report_svg(&doc, &settings).unwrap(),
            render_report_svg(&doc, &settings).unwrap()
        );
    }

    #[test]
    fn ticks_survive_windows_near_the_coordinate_limit() {
        let mut doc = fixtures::document();
        doc.table[0].candidate.start = 0;
        doc.table[1].candidate.start = 5_000_000_000_000_000_000;
        doc.table[2].candidate.start = 2_500_000_000_000_000_000;
        doc.layout = LayoutWindow {
            min: 0,
            max: 6_000_000_000_000_000_000,
        };
        let map = render_binding_map_svg(&doc, &RenderSettings::default());
        assert!(map.contains("1,500,000,000,000,000,000"));
        assert!(map.contains("4,500,000,000,000,000,000"));
        assert!(map.contains("6,000,000,000,000,000,000"));
        assert!(render_report_svg(&doc, &RenderSettings::default()).is_ok());
    }

    #[test]
    #[cfg(feature = "snapshot-tests")]
    fn snapshot_report_svg() {
        let svg = render_report_svg(&fixtures::document(), &RenderSettings::default()).unwrap();
        let expected = include_str!("../tests/snapshots/report/minimal.svg");
        assert_eq!(svg, expected);
    }

    #[test]
    #[cfg(feature = "snapshot-tests")]
    #[ignore]
    fn write_report_snapshot() {
        let svg = render_report_svg(&fixtures::document(), &RenderSettings::default()).unwrap();
        fs::create_dir_all("tests/snapshots/report").unwrap();
        fs::write("tests/snapshots/report/minimal.svg", svg).unwrap();
    }
}
