//! Repair estimate line items.

use serde::{Deserialize, Serialize};

/// Identifier of a line item within one estimate.
pub type LineItemId = u64;

/// Cost bucket of a line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CostCategory {
    Parts,
    Labor,
    Paint,
    Other,
}

impl CostCategory {
    pub fn name(&self) -> &'static str {
        match self {
            CostCategory::Parts => "Parts",
            CostCategory::Labor => "Labor",
            CostCategory::Paint => "Paint",
            CostCategory::Other => "Other",
        }
    }

    pub fn all() -> &'static [CostCategory] {
        &[
            CostCategory::Parts,
            CostCategory::Labor,
            CostCategory::Paint,
            CostCategory::Other,
        ]
    }
}

/// One priced row of an estimate.
///
/// `total_cost` is always `quantity * unit_cost`: the fields are private,
/// every setter recomputes it, and a deserialized record recomputes it
/// instead of trusting the stored value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "LineItemRecord")]
pub struct LineItem {
    id: LineItemId,
    description: String,
    quantity: u32,
    unit_cost: f64,
    total_cost: f64,
    category: CostCategory,
    ai_generated: bool,
    ai_recommended: bool,
}

impl LineItem {
    pub fn new(
        id: LineItemId,
        description: impl Into<String>,
        quantity: u32,
        unit_cost: f64,
        category: CostCategory,
    ) -> Self {
        let quantity = quantity.max(1);
        let unit_cost = unit_cost.max(0.0);
        Self {
            id,
            description: description.into(),
            quantity,
            unit_cost,
            total_cost: f64::from(quantity) * unit_cost,
            category,
            ai_generated: false,
            ai_recommended: false,
        }
    }

    pub fn ai_generated(mut self) -> Self {
        self.ai_generated = true;
        self
    }

    pub fn ai_recommended(mut self) -> Self {
        self.ai_recommended = true;
        self
    }

    pub fn id(&self) -> LineItemId {
        self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn unit_cost(&self) -> f64 {
        self.unit_cost
    }

    pub fn total_cost(&self) -> f64 {
        self.total_cost
    }

    pub fn category(&self) -> CostCategory {
        self.category
    }

    pub fn is_ai_generated(&self) -> bool {
        self.ai_generated
    }

    pub fn is_ai_recommended(&self) -> bool {
        self.ai_recommended
    }

    /// Set the quantity (at least 1) and recompute the total.
    pub fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity.max(1);
        self.recompute();
    }

    /// Set the unit cost (at least 0) and recompute the total.
    pub fn set_unit_cost(&mut self, unit_cost: f64) {
        self.unit_cost = if unit_cost.is_finite() {
            unit_cost.max(0.0)
        } else {
            0.0
        };
        self.recompute();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn set_category(&mut self, category: CostCategory) {
        self.category = category;
    }

    pub(crate) fn with_id(mut self, id: LineItemId) -> Self {
        self.id = id;
        self
    }

    fn recompute(&mut self) {
        self.total_cost = f64::from(self.quantity) * self.unit_cost;
    }
}

/// Wire shape of a line item. A stored `totalCost` is ignored.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LineItemRecord {
    id: LineItemId,
    description: String,
    quantity: u32,
    unit_cost: f64,
    category: CostCategory,
    #[serde(default)]
    ai_generated: bool,
    #[serde(default)]
    ai_recommended: bool,
}

impl From<LineItemRecord> for LineItem {
    fn from(record: LineItemRecord) -> Self {
        let mut item = LineItem::new(
            record.id,
            record.description,
            record.quantity,
            record.unit_cost,
            record.category,
        );
        item.ai_generated = record.ai_generated;
        item.ai_recommended = record.ai_recommended;
        item
    }
}

/// Form submission for a manually added line item.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLineItem {
    pub description: String,
    pub quantity: u32,
    pub unit_cost: f64,
    pub category: CostCategory,
}

impl NewLineItem {
    pub fn new(description: impl Into<String>, unit_cost: f64, category: CostCategory) -> Self {
        Self {
            description: description.into(),
            quantity: 1,
            unit_cost,
            category,
        }
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_follows_edits() {
        let mut item = LineItem::new(1, "Bumper cover", 2, 125.0, CostCategory::Parts);
        assert_eq!(item.total_cost(), 250.0);

        item.set_quantity(3);
        assert_eq!(item.total_cost(), 375.0);

        item.set_unit_cost(99.99);
        assert_eq!(item.total_cost(), 3.0 * 99.99);
    }

    #[test]
    fn test_quantity_and_cost_floors() {
        let mut item = LineItem::new(1, "Clips", 0, -4.0, CostCategory::Other);
        assert_eq!(item.quantity(), 1);
        assert_eq!(item.unit_cost(), 0.0);

        item.set_unit_cost(f64::NAN);
        assert_eq!(item.unit_cost(), 0.0);
        assert_eq!(item.total_cost(), 0.0);
    }

    #[test]
    fn test_deserialize_recomputes_stale_total() {
        let json = r#"{
            "id": 7,
            "description": "Paint blend",
            "quantity": 2,
            "unitCost": 150.0,
            "totalCost": 9999.0,
            "category": "Paint",
            "aiGenerated": true
        }"#;
        let item: LineItem = serde_json::from_str(json).expect("parse");
        assert_eq!(item.total_cost(), 300.0);
        assert!(item.is_ai_generated());
        assert!(!item.is_ai_recommended());
    }
}
