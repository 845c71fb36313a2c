use grna_protocol::{Candidate, ClassifiedCandidate, QualityTier, TierColor};

pub const EXCELLENT_MIN_SCORE: f64 = 0.90;
pub const GOOD_MIN_SCORE: f64 = 0.80;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub tier: QualityTier,
    pub color: TierColor,
}

/// Lower thresholds are inclusive. No clamping happens here.
pub fn classify(score: f64) -> Classification {
    let tier = if score >= EXCELLENT_MIN_SCORE {
        QualityTier::Excellent
    } else if score >= GOOD_MIN_SCORE {
        QualityTier::Good
    } else {
        QualityTier::Fair
    };
    Classification {
        tier,
        color: tier.color(),
    }
}

pub fn classify_candidates(candidates: &[Candidate]) -> Vec<ClassifiedCandidate> {
    candidates
        .iter()
        .enumerate()
        .map(|(idx, candidate)| {
            let Classification { tier, color } = classify(candidate.score);
            ClassifiedCandidate {
                rank: idx + 1,
                candidate: candidate.clone(),
                quality_tier: tier,
                tier_color: color,
            }
        })
        .collect()
}
