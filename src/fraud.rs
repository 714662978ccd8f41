//! Heuristic fraud scoring over damage annotations.
//!
//! The score is a sum of rule contributions plus a random jitter, clamped to
//! 0-100 and bucketed into passed/caution/flagged. The base score and the
//! manual-entry rule differ between the screens that show a score, so both
//! are carried by a [`FraudPolicy`]. Randomness comes from an injected
//! [`RandomSource`] so tests can pin it.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::constants::{JITTER_MAX, JITTER_MIN, MAX_FRAUD_SCORE};
use crate::model::{DamageAnnotation, Severity};

/// Average cost above which the high-cost rule fires.
const HIGH_AVERAGE_COST: f64 = 600.0;
/// Average cost above which the elevated-cost rule fires.
const ELEVATED_AVERAGE_COST: f64 = 400.0;
/// More high-severity regions than this counts as many.
const MANY_HIGH_SEVERITY: usize = 2;

/// Scores below this pass.
pub const CAUTION_THRESHOLD: u8 = 30;
/// Scores at or above this are flagged.
pub const FLAGGED_THRESHOLD: u8 = 70;

// ============================================================================
// Randomness
// ============================================================================

/// Source of the jitter term.
pub trait RandomSource {
    /// An integer in `low..high`.
    fn jitter(&mut self, low: u32, high: u32) -> u32;
}

/// Reproducible randomness from a seed.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn jitter(&mut self, low: u32, high: u32) -> u32 {
        if high <= low {
            return low;
        }
        self.rng.random_range(low..high)
    }
}

/// The thread-local generator, for production use.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn jitter(&mut self, low: u32, high: u32) -> u32 {
        if high <= low {
            return low;
        }
        rand::rng().random_range(low..high)
    }
}

/// Always returns the same value, regardless of the requested range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedJitter(pub u32);

impl RandomSource for FixedJitter {
    fn jitter(&mut self, _low: u32, _high: u32) -> u32 {
        self.0
    }
}

// ============================================================================
// Policy
// ============================================================================

/// How manual entries contribute to the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ManualEntryRule {
    /// +20 only when there is more than one manual entry.
    MultipleOnly,
    /// +20 for more than one manual entry, +10 for exactly one.
    Graduated,
}

/// Tunables of one scoring call site.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FraudPolicy {
    /// Starting score
    pub base: u32,
    /// Starting score used instead of `base` when there are no annotations
    #[serde(default)]
    pub empty_base: Option<u32>,
    pub manual_rule: ManualEntryRule,
}

impl FraudPolicy {
    /// Annotation detail panel.
    pub fn detail() -> Self {
        Self {
            base: 0,
            empty_base: None,
            manual_rule: ManualEntryRule::MultipleOnly,
        }
    }

    /// Analysis summary card; an image without findings starts at 20.
    pub fn summary() -> Self {
        Self {
            base: 0,
            empty_base: Some(20),
            manual_rule: ManualEntryRule::MultipleOnly,
        }
    }

    /// Estimate screen.
    pub fn estimate() -> Self {
        Self {
            base: 25,
            empty_base: None,
            manual_rule: ManualEntryRule::Graduated,
        }
    }

    fn starting_score(&self, annotation_count: usize) -> u32 {
        match self.empty_base {
            Some(empty) if annotation_count == 0 => empty,
            _ => self.base,
        }
    }
}

impl Default for FraudPolicy {
    fn default() -> Self {
        Self::detail()
    }
}

// ============================================================================
// Assessment
// ============================================================================

/// Risk bucket of a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FraudStatus {
    Passed,
    Caution,
    Flagged,
}

impl FraudStatus {
    pub fn from_score(score: u8) -> Self {
        if score < CAUTION_THRESHOLD {
            FraudStatus::Passed
        } else if score < FLAGGED_THRESHOLD {
            FraudStatus::Caution
        } else {
            FraudStatus::Flagged
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FraudStatus::Passed => "Passed",
            FraudStatus::Caution => "Caution",
            FraudStatus::Flagged => "Flagged",
        }
    }

    pub fn reasons(&self) -> &'static [&'static str] {
        match self {
            FraudStatus::Passed => &[
                "Damage pattern consistent with reported incident",
                "Repair costs within expected range for vehicle class",
                "No irregularities found in submitted photos",
            ],
            FraudStatus::Caution => &[
                "Repair costs above average for reported damage",
                "Some damage regions were entered manually",
                "Damage severity inconsistent with incident description",
            ],
            FraudStatus::Flagged => &[
                "Estimated costs significantly exceed typical claims",
                "Multiple high-severity regions on a low-speed incident",
                "Several damage regions lack detector confirmation",
            ],
        }
    }

    pub fn recommendations(&self) -> &'static [&'static str] {
        match self {
            FraudStatus::Passed => &[
                "Proceed with standard claim processing",
                "No additional verification required",
            ],
            FraudStatus::Caution => &[
                "Request additional photos of damaged areas",
                "Verify repair quotes with a second shop",
                "Review claimant history before approval",
            ],
            FraudStatus::Flagged => &[
                "Escalate to special investigations unit",
                "Schedule in-person vehicle inspection",
                "Hold payment pending investigation",
            ],
        }
    }
}

/// Rule that contributed to a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FraudFactor {
    Base,
    HighAverageCost,
    ElevatedAverageCost,
    ManyHighSeverity,
    SomeHighSeverity,
    MultipleManualEntries,
    SingleManualEntry,
    Jitter,
}

/// Result of scoring a set of annotations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FraudAssessment {
    /// 0-100
    pub score: u8,
    pub status: FraudStatus,
    pub reasons: Vec<String>,
    pub recommendations: Vec<String>,
    /// Rules that fired, with their contributions, in evaluation order.
    pub factors: Vec<(FraudFactor, u32)>,
}

/// Score `annotations` under `policy`.
///
/// Not deterministic unless `rng` is.
pub fn assess(
    annotations: &[DamageAnnotation],
    policy: &FraudPolicy,
    rng: &mut dyn RandomSource,
) -> FraudAssessment {
    let mut factors = Vec::new();
    let mut push = |factor, points: u32| {
        if points > 0 {
            factors.push((factor, points));
        }
    };

    push(FraudFactor::Base, policy.starting_score(annotations.len()));

    if !annotations.is_empty() {
        let average =
            annotations.iter().map(|a| a.estimated_cost).sum::<f64>() / annotations.len() as f64;
        if average > HIGH_AVERAGE_COST {
            push(FraudFactor::HighAverageCost, 30);
        } else if average > ELEVATED_AVERAGE_COST {
            push(FraudFactor::ElevatedAverageCost, 15);
        }
    }

    let high = annotations
        .iter()
        .filter(|a| a.severity == Severity::High)
        .count();
    if high > MANY_HIGH_SEVERITY {
        push(FraudFactor::ManyHighSeverity, 25);
    } else if high > 0 {
        push(FraudFactor::SomeHighSeverity, 10);
    }

    let manual = annotations.iter().filter(|a| a.is_manual).count();
    match (policy.manual_rule, manual) {
        (_, n) if n > 1 => push(FraudFactor::MultipleManualEntries, 20),
        (ManualEntryRule::Graduated, 1) => push(FraudFactor::SingleManualEntry, 10),
        _ => {}
    }

    push(FraudFactor::Jitter, rng.jitter(JITTER_MIN, JITTER_MAX));

    let total = factors
        .iter()
        .fold(0u32, |sum, (_, points)| sum.saturating_add(*points));
    let score = total.min(u32::from(MAX_FRAUD_SCORE)) as u8;
    let status = FraudStatus::from_score(score);
    log::debug!(
        "Fraud score {} ({}) from {} annotations",
        score,
        status.name(),
        annotations.len()
    );

    FraudAssessment {
        score,
        status,
        reasons: status.reasons().iter().map(|s| s.to_string()).collect(),
        recommendations: status.recommendations().iter().map(|s| s.to_string()).collect(),
        factors,
    }
}
