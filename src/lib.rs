//! claimscope - vehicle damage assessment engine
//!
//! Annotates vehicle photos with damage regions, scores them for fraud risk
//! and turns them into an editable repair estimate. The engine is headless:
//! a view feeds it pointer and button events and draws from its read-outs.

pub mod annotation;
pub mod config;
pub mod constants;
pub mod error;
pub mod estimate;
pub mod fraud;
pub mod geometry;
pub mod input;
pub mod interaction;
pub mod model;
pub mod persistence;
pub mod session;

#[cfg(test)]
mod tests;

pub use annotation::AnnotationStore;
pub use config::{ConfigError, EngineConfig};
pub use error::EstimateError;
pub use estimate::{Estimate, EstimateSession, EstimateTotals};
pub use fraud::{FraudAssessment, FraudPolicy, FraudStatus, RandomSource};
pub use geometry::{ElementBounds, Point, Rect};
pub use interaction::{CursorHint, EditForm, InteractionState, ManualEntryForm};
pub use persistence::{ClaimStore, JsonClaimStore, StoreError};
pub use session::{AnalysisSession, AnalysisView};
