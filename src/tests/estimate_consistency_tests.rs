//! Line item totals under long sequences of edits.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::estimate::Estimate;
use crate::model::{CostCategory, LineItemId, NewLineItem, seeded_annotations};

fn assert_consistent(estimate: &Estimate) {
    for item in estimate.items() {
        assert_eq!(item.total_cost(), f64::from(item.quantity()) * item.unit_cost());
    }
    let sum: f64 = estimate.items().iter().map(|i| i.total_cost()).sum();
    assert_eq!(estimate.subtotal(), sum);
    assert_eq!(estimate.totals().subtotal, sum);
}

#[test]
fn test_totals_survive_random_edits() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut estimate = Estimate::from_annotations(&seeded_annotations("front"), 0.08);
    estimate.apply_assisted();

    for step in 0..500 {
        let ids: Vec<LineItemId> = estimate.items().iter().map(|i| i.id()).collect();
        let target = if ids.is_empty() {
            0
        } else {
            ids[rng.random_range(0..ids.len())]
        };

        match rng.random_range(0..6) {
            0 => {
                estimate.set_quantity(target, rng.random_range(0..20));
            }
            1 => {
                let cents: u32 = rng.random_range(0..500_000);
                estimate.set_unit_cost(target, f64::from(cents) / 100.0);
            }
            2 => {
                estimate.set_unit_cost_input(target, "not a price");
            }
            3 => {
                estimate.set_quantity_input(target, "-3");
            }
            4 if ids.len() > 3 => {
                estimate.remove(target);
            }
            _ => {
                let unit_cost = f64::from(rng.random_range(1u32..100_000)) / 100.0;
                let item = NewLineItem::new(
                    format!("Extra part {}", step),
                    unit_cost,
                    CostCategory::Parts,
                )
                .with_quantity(rng.random_range(1..5));
                estimate.add_line_item(item).expect("valid item");
            }
        }
        assert_consistent(&estimate);
    }
}

#[test]
fn test_quantity_is_at_least_one() {
    let mut estimate = Estimate::baseline(0.08);
    let id = estimate.items()[0].id();

    estimate.set_quantity(id, 0);
    assert_eq!(estimate.get(id).map(|i| i.quantity()), Some(1));
    estimate.set_quantity_input(id, "abc");
    assert_eq!(estimate.get(id).map(|i| i.quantity()), Some(1));
    estimate.set_quantity_input(id, "4");
    assert_eq!(estimate.get(id).map(|i| i.quantity()), Some(4));
    assert_consistent(&estimate);
}

#[test]
fn test_rejected_line_item_leaves_estimate_unchanged() {
    let mut estimate = Estimate::baseline(0.08);
    let before = estimate.clone();

    assert!(estimate
        .add_line_item(NewLineItem::new("   ", 10.0, CostCategory::Other))
        .is_err());
    assert!(estimate
        .add_line_item(NewLineItem::new("Bolt", 0.0, CostCategory::Parts))
        .is_err());
    assert_eq!(estimate, before);
}
