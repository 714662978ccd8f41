//! Repair estimate derivation and editing.
//!
//! An [`Estimate`] is built once from a snapshot of annotations and is then
//! edited on its own; later annotation changes do not reach it. Totals are
//! never stored, every call recomputes them from the line items.

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::constants::REVIEW_DUE_IN;
use crate::error::EstimateError;
use crate::fraud::{self, FraudAssessment, FraudPolicy, RandomSource};
use crate::input::{parse_amount, parse_quantity};
use crate::model::{
    ClaimStatus, CostCategory, DamageAnnotation, LineItem, LineItemId, NewLineItem, ReviewTask,
    TaskPriority, TaskType,
};
use crate::persistence::{ClaimStore, StoreError};

// ============================================================================
// Category Rules
// ============================================================================

/// Ordered keyword rules mapping a damage type to a cost category.
/// The first rule with a keyword contained in the lowercased type wins.
pub const CATEGORY_RULES: &[(&[&str], CostCategory)] = &[
    (&["bumper", "door", "panel", "headlight"], CostCategory::Parts),
    (&["paint", "scratch"], CostCategory::Paint),
];

/// Category used when no rule matches.
pub const DEFAULT_CATEGORY: CostCategory = CostCategory::Labor;

/// Cost category for a free-form damage type.
pub fn category_for(damage_type: &str) -> CostCategory {
    let lower = damage_type.to_lowercase();
    CATEGORY_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(_, category)| *category)
        .unwrap_or(DEFAULT_CATEGORY)
}

// ============================================================================
// Fixed Item Lists
// ============================================================================

/// Template for a fixed line item.
struct CatalogItem {
    description: &'static str,
    quantity: u32,
    unit_cost: f64,
    category: CostCategory,
}

const fn item(
    description: &'static str,
    quantity: u32,
    unit_cost: f64,
    category: CostCategory,
) -> CatalogItem {
    CatalogItem {
        description,
        quantity,
        unit_cost,
        category,
    }
}

/// Always appended after the items derived from annotations.
const AI_RECOMMENDED_ITEMS: &[CatalogItem] = &[
    item("Mounting Brackets and Hardware", 1, 350.0, CostCategory::Parts),
    item("Frame Alignment and Inspection", 1, 500.0, CostCategory::Labor),
];

/// Appended by the assisted-estimate action.
const ASSISTED_ITEMS: &[CatalogItem] = &[
    item("Paint Blending - Adjacent Panels", 1, 280.0, CostCategory::Paint),
    item("Pre/Post Repair Diagnostic Scan", 1, 150.0, CostCategory::Labor),
    item("Clips, Fasteners and Seals", 1, 65.0, CostCategory::Parts),
    item("Sensor Calibration", 1, 220.0, CostCategory::Labor),
];

/// Used when no analysis was saved for the claim.
const BASELINE_ITEMS: &[CatalogItem] = &[
    item("Front Bumper Cover", 1, 650.0, CostCategory::Parts),
    item("Body Labor", 6, 85.0, CostCategory::Labor),
    item("Paint and Materials", 1, 420.0, CostCategory::Paint),
    item("Shop Supplies", 1, 45.0, CostCategory::Other),
];

// ============================================================================
// Estimate
// ============================================================================

/// Subtotal, tax and total of an estimate at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EstimateTotals {
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
}

/// An ordered list of priced line items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "EstimateRecord")]
pub struct Estimate {
    items: Vec<LineItem>,
    tax_rate: f64,
    /// Last id handed out; ids of removed items are never reused.
    last_id: LineItemId,
}

/// Stored form of an [`Estimate`]. Older records carry no `lastId`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EstimateRecord {
    items: Vec<LineItem>,
    tax_rate: f64,
    #[serde(default)]
    last_id: LineItemId,
}

impl From<EstimateRecord> for Estimate {
    fn from(record: EstimateRecord) -> Self {
        let max_id = record.items.iter().map(|i| i.id()).max().unwrap_or(0);
        Self {
            items: record.items,
            tax_rate: record.tax_rate,
            last_id: record.last_id.max(max_id),
        }
    }
}

impl Estimate {
    pub fn new(tax_rate: f64) -> Self {
        Self {
            items: Vec::new(),
            tax_rate,
            last_id: 0,
        }
    }

    /// Derive an estimate from an annotation snapshot.
    ///
    /// Each annotation becomes one item priced at its estimated cost, then
    /// the AI-recommended items are appended. An empty snapshot yields the
    /// baseline estimate instead.
    pub fn from_annotations(annotations: &[DamageAnnotation], tax_rate: f64) -> Self {
        if annotations.is_empty() {
            return Self::baseline(tax_rate);
        }

        let mut estimate = Self::new(tax_rate);
        for annotation in annotations {
            let description = format!(
                "{} - {}",
                annotation.severity.action_label(),
                annotation.damage_type
            );
            let item = LineItem::new(
                0,
                description,
                1,
                annotation.estimated_cost,
                category_for(&annotation.damage_type),
            );
            estimate.push(item);
        }
        estimate.extend_from_catalog(AI_RECOMMENDED_ITEMS, true);
        log::debug!(
            "Derived {} line items from {} annotations",
            estimate.items.len(),
            annotations.len()
        );
        estimate
    }

    /// Fallback estimate for a claim without a saved analysis.
    pub fn baseline(tax_rate: f64) -> Self {
        let mut estimate = Self::new(tax_rate);
        for entry in BASELINE_ITEMS {
            estimate.push(LineItem::new(
                0,
                entry.description,
                entry.quantity,
                entry.unit_cost,
                entry.category,
            ));
        }
        estimate
    }

    fn next_id(&mut self) -> LineItemId {
        self.last_id = self.last_id.saturating_add(1);
        self.last_id
    }

    fn push(&mut self, item: LineItem) -> LineItemId {
        let id = self.next_id();
        self.items.push(item.with_id(id));
        id
    }

    fn extend_from_catalog(&mut self, catalog: &[CatalogItem], recommended: bool) {
        for entry in catalog {
            let mut item = LineItem::new(
                0,
                entry.description,
                entry.quantity,
                entry.unit_cost,
                entry.category,
            )
            .ai_generated();
            if recommended {
                item = item.ai_recommended();
            }
            self.push(item);
        }
    }

    /// Append the assisted-estimate catalog. Not idempotent: the caller
    /// decides whether the action is still available.
    pub fn apply_assisted(&mut self) {
        self.extend_from_catalog(ASSISTED_ITEMS, false);
        log::debug!("Applied assisted estimate ({} items)", ASSISTED_ITEMS.len());
    }

    /// Validate and append a manually entered line item.
    pub fn add_line_item(&mut self, new: NewLineItem) -> Result<LineItemId, EstimateError> {
        if new.description.trim().is_empty() {
            return Err(EstimateError::EmptyDescription);
        }
        if !new.unit_cost.is_finite() || new.unit_cost <= 0.0 {
            return Err(EstimateError::NonPositiveUnitCost(new.unit_cost));
        }
        let id = self.push(LineItem::new(
            0,
            new.description.trim(),
            new.quantity,
            new.unit_cost,
            new.category,
        ));
        log::debug!("Added manual line item {}", id);
        Ok(id)
    }

    /// Run `edit` on one item. Returns false if the id is unknown.
    fn edit_item(&mut self, id: LineItemId, edit: impl FnOnce(&mut LineItem)) -> bool {
        match self.items.iter_mut().find(|i| i.id() == id) {
            Some(item) => {
                edit(item);
                true
            }
            None => false,
        }
    }

    pub fn set_quantity(&mut self, id: LineItemId, quantity: u32) -> bool {
        self.edit_item(id, |i| i.set_quantity(quantity))
    }

    pub fn set_unit_cost(&mut self, id: LineItemId, unit_cost: f64) -> bool {
        self.edit_item(id, |i| i.set_unit_cost(unit_cost))
    }

    /// Quantity from form text; invalid text becomes 1.
    pub fn set_quantity_input(&mut self, id: LineItemId, input: &str) -> bool {
        self.set_quantity(id, parse_quantity(input))
    }

    /// Unit cost from form text; invalid text becomes 0.
    pub fn set_unit_cost_input(&mut self, id: LineItemId, input: &str) -> bool {
        self.set_unit_cost(id, parse_amount(input, 0.0))
    }

    pub fn set_description(&mut self, id: LineItemId, description: &str) -> bool {
        self.edit_item(id, |i| i.set_description(description))
    }

    pub fn set_category(&mut self, id: LineItemId, category: CostCategory) -> bool {
        self.edit_item(id, |i| i.set_category(category))
    }

    pub fn remove(&mut self, id: LineItemId) -> Option<LineItem> {
        let index = self.items.iter().position(|i| i.id() == id)?;
        Some(self.items.remove(index))
    }

    pub fn get(&self, id: LineItemId) -> Option<&LineItem> {
        self.items.iter().find(|i| i.id() == id)
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn tax_rate(&self) -> f64 {
        self.tax_rate
    }

    pub fn subtotal(&self) -> f64 {
        self.items.iter().map(|i| i.total_cost()).sum()
    }

    pub fn tax(&self) -> f64 {
        self.subtotal() * self.tax_rate
    }

    pub fn total(&self) -> f64 {
        let subtotal = self.subtotal();
        subtotal + subtotal * self.tax_rate
    }

    pub fn totals(&self) -> EstimateTotals {
        let subtotal = self.subtotal();
        let tax = subtotal * self.tax_rate;
        EstimateTotals {
            subtotal,
            tax,
            total: subtotal + tax,
        }
    }

    /// Sum of item totals in one category.
    pub fn category_total(&self, category: CostCategory) -> f64 {
        self.items
            .iter()
            .filter(|i| i.category() == category)
            .map(|i| i.total_cost())
            .sum()
    }
}

// ============================================================================
// Estimate Session
// ============================================================================

/// The estimate screen for one claim.
///
/// Opened from whatever the analysis saved to the claim store, never from
/// the live analysis session.
#[derive(Debug, Clone)]
pub struct EstimateSession {
    claim_id: String,
    snapshot: Vec<DamageAnnotation>,
    estimate: Estimate,
    assisted_used: bool,
    fraud_policy: FraudPolicy,
}

impl EstimateSession {
    /// Reload the saved annotations of `claim_id` and derive an estimate.
    pub fn open<S: ClaimStore + ?Sized>(store: &S, claim_id: &str, config: &EngineConfig) -> Self {
        let snapshot = store.load_annotations(claim_id);
        if snapshot.is_empty() {
            log::info!("No saved analysis for {}, using baseline estimate", claim_id);
        } else {
            log::info!(
                "Opened estimate for {} from {} saved annotations",
                claim_id,
                snapshot.len()
            );
        }
        Self::from_snapshot(claim_id, snapshot, config)
    }

    pub fn from_snapshot(
        claim_id: impl Into<String>,
        snapshot: Vec<DamageAnnotation>,
        config: &EngineConfig,
    ) -> Self {
        let estimate = Estimate::from_annotations(&snapshot, config.tax_rate);
        Self {
            claim_id: claim_id.into(),
            snapshot,
            estimate,
            assisted_used: false,
            fraud_policy: config.fraud.estimate,
        }
    }

    pub fn claim_id(&self) -> &str {
        &self.claim_id
    }

    pub fn snapshot(&self) -> &[DamageAnnotation] {
        &self.snapshot
    }

    pub fn estimate(&self) -> &Estimate {
        &self.estimate
    }

    pub fn estimate_mut(&mut self) -> &mut Estimate {
        &mut self.estimate
    }

    /// Whether the assisted-estimate control is still shown.
    pub fn assisted_available(&self) -> bool {
        !self.assisted_used
    }

    /// Run the assisted estimate once. Returns false when it was already used.
    pub fn request_assisted_estimate(&mut self) -> bool {
        if self.assisted_used {
            log::trace!("Assisted estimate already applied for {}", self.claim_id);
            return false;
        }
        self.estimate.apply_assisted();
        self.assisted_used = true;
        true
    }

    /// Score the saved annotations with the estimate-screen policy.
    pub fn fraud_assessment(&self, rng: &mut dyn RandomSource) -> FraudAssessment {
        fraud::assess(&self.snapshot, &self.fraud_policy, rng)
    }

    /// Save the estimate, record its total on the claim and queue an
    /// approval task. Returns the task id.
    pub fn submit<S: ClaimStore + ?Sized>(&self, store: &mut S) -> Result<u64, StoreError> {
        store.save_estimate(&self.claim_id, &self.estimate)?;

        let total = self.estimate.total();
        let mut claims = store.load_claims();
        if let Some(claim) = claims.iter_mut().find(|c| c.id == self.claim_id) {
            claim.amount = total;
            claim.status = ClaimStatus::InReview;
            store.save_claims(&claims)?;
        } else {
            log::warn!("Submitted estimate for unknown claim {}", self.claim_id);
        }

        let task_id = store.append_task(ReviewTask::new(
            TaskType::EstimateApproval,
            self.claim_id.clone(),
            format!("Approve repair estimate for {} (${:.2})", self.claim_id, total),
            REVIEW_DUE_IN,
            TaskPriority::High,
        ))?;
        log::info!(
            "Submitted estimate for {}: {} items, total ${:.2}",
            self.claim_id,
            self.estimate.items().len(),
            total
        );
        Ok(task_id)
    }
}
