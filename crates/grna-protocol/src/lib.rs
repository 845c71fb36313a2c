use serde::{Deserialize, Serialize};
use std::fmt;

pub const REPORT_SCHEMA: &str = "grna.report.v1";
pub const RANKED_VIEW_SCHEMA: &str = "grna.ranked_view.v1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneId {
    pub ensembl_id: String,
    pub symbol: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strand {
    #[serde(rename = "+")]
    Forward,
    #[serde(rename = "-")]
    Reverse,
}

impl Strand {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Forward => "+",
            Self::Reverse => "-",
        }
    }

    #[inline(always)]
    pub fn is_reverse(self) -> bool {
        self == Self::Reverse
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// One proposed guide as reported by the analysis service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub sequence: String,
    pub pam: String,
    pub start: u64,
    pub strand: Strand,
    pub score: f64,
}

/// Analysis-service result for one gene. Candidate order is the service's
/// recommendation order and is never changed downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneResult {
    pub crop: String,
    #[serde(rename = "trait")]
    pub trait_name: String,
    pub gene: GeneId,
    pub source: String,
    pub sequence_length: u64,
    pub explanation: String,
    #[serde(alias = "top_grnas")]
    pub candidates: Vec<Candidate>,
}

impl GeneResult {
    pub fn starts(&self) -> Vec<u64> {
        self.candidates.iter().map(|c| c.start).collect()
    }

    pub fn overview(&self) -> ReportOverview {
        ReportOverview {
            crop: self.crop.clone(),
            trait_name: self.trait_name.clone(),
            gene: self.gene.clone(),
            source: self.source.clone(),
            sequence_length: self.sequence_length,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum QualityTier {
    Excellent,
    Good,
    Fair,
}

impl QualityTier {
    pub fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
        }
    }

    pub fn color(self) -> TierColor {
        match self {
            Self::Excellent => TierColor::Green,
            Self::Good => TierColor::Orange,
            Self::Fair => TierColor::Red,
        }
    }
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Presentation hint shared by table rows and quality badges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TierColor {
    Green,
    Orange,
    Red,
}

impl TierColor {
    pub fn name(self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Orange => "orange",
            Self::Red => "red",
        }
    }

    pub fn foreground(self) -> &'static str {
        match self {
            Self::Green => "#15803d",
            Self::Orange => "#b45309",
            Self::Red => "#b91c1c",
        }
    }

    pub fn background(self) -> &'static str {
        match self {
            Self::Green => "#dcfce7",
            Self::Orange => "#fef3c7",
            Self::Red => "#fee2e2",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedCandidate {
    /// 1-based position in the upstream list.
    pub rank: usize,
    #[serde(flatten)]
    pub candidate: Candidate,
    pub quality_tier: QualityTier,
    pub tier_color: TierColor,
}

/// Padded coordinate range covering every candidate start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayoutWindow {
    pub min: u64,
    pub max: u64,
}

impl LayoutWindow {
    #[inline(always)]
    pub fn width(&self) -> u64 {
        self.max.saturating_sub(self.min)
    }

    #[inline(always)]
    pub fn contains(&self, pos: u64) -> bool {
        self.min <= pos && pos <= self.max
    }

    /// Relative position of `pos` on the window axis, clamped to `[0, 1]`.
    pub fn fraction(&self, pos: u64) -> f64 {
        let width = self.width();
        if width == 0 {
            return 0.5;
        }
        let offset = pos.saturating_sub(self.min).min(width);
        offset as f64 / width as f64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SitePlacement {
    pub rank: usize,
    pub start: u64,
    pub strand: Strand,
    pub fraction: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenefitHighlight {
    pub icon: String,
    pub label: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportOverview {
    pub crop: String,
    #[serde(rename = "trait")]
    pub trait_name: String,
    pub gene: GeneId,
    pub source: String,
    pub sequence_length: u64,
}

/// Display-ready ranking for interactive renderers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedView {
    pub schema: String,
    pub overview: ReportOverview,
    pub candidates: Vec<ClassifiedCandidate>,
    pub layout: LayoutWindow,
    pub sites: Vec<SitePlacement>,
    pub uniform_positions: bool,
}

/// Export-ready snapshot of one result. Built once, never edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportDocument {
    pub schema: String,
    pub title: String,
    pub overview: ReportOverview,
    pub table: Vec<ClassifiedCandidate>,
    pub layout: LayoutWindow,
    pub uniform_positions: bool,
    pub caveats: Vec<String>,
    pub explanation: String,
    pub benefits: Vec<BenefitHighlight>,
}

impl ReportDocument {
    pub fn candidates(&self) -> impl Iterator<Item = &Candidate> {
        self.table.iter().map(|row| &row.candidate)
    }
}
