//! Data models for claimscope.

mod annotation;
mod claim;
mod estimate;

pub use annotation::{
    AnnotationId, AnnotationPatch, DAMAGE_TYPE_SUGGESTIONS, DamageAnnotation, Recommendation,
    Severity, seeded_annotations,
};
pub use claim::{Claim, ClaimStatus, ReviewTask, TaskPriority, TaskType, default_claims};
pub use estimate::{CostCategory, LineItem, LineItemId, NewLineItem};
