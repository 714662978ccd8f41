//! End-to-end tests across the analysis, estimate and persistence layers.
//!
//! These drive the engine the way a view would: through events on an
//! [`AnalysisSession`](crate::session::AnalysisSession), a store-and-reload
//! handoff, and edits on the resulting estimate.

mod estimate_consistency_tests;
mod handoff_tests;
mod interaction_tests;
