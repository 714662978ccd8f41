//! Global constants for the claimscope engine

/// Sales tax applied to an estimate subtotal
pub const DEFAULT_TAX_RATE: f64 = 0.08;

/// A drawn box must exceed this size (percentage points) on both axes
pub const MIN_DRAFT_SIZE: f32 = 5.0;

/// Width and height of a box placed through the manual-entry popover
pub const MANUAL_BOX_SIZE: f32 = 10.0;

/// Upper bound of the percentage coordinate space
pub const PERCENT_SCALE: f32 = 100.0;

/// Damage type given to a freshly drawn box
pub const NEW_DAMAGE_TYPE: &str = "New Damage";

/// Damage type used when a manual entry is saved without one
pub const FALLBACK_DAMAGE_TYPE: &str = "Other";

/// Part confidence assigned to a freshly drawn box
pub const DRAWN_PART_CONFIDENCE: f32 = 0.90;

/// Damage confidence assigned to a freshly drawn box
pub const DRAWN_DAMAGE_CONFIDENCE: f32 = 0.75;

/// Confidence recorded for manual entries
pub const MANUAL_CONFIDENCE: f32 = 1.0;

/// Fraud jitter is drawn from `JITTER_MIN..JITTER_MAX`
pub const JITTER_MIN: u32 = 5;

/// Exclusive upper bound of the fraud jitter
pub const JITTER_MAX: u32 = 15;

/// Fraud scores are clamped to this maximum
pub const MAX_FRAUD_SCORE: u8 = 100;

/// Due-in label attached to review tasks
pub const REVIEW_DUE_IN: &str = "2 days";
