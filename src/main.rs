/// Headless walk-through of one claim: annotate, finish, estimate, submit.
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    if let Err(e) = demo::run() {
        log::error!("Demo failed: {}", e);
        eprintln!("Demo error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use claimscope::annotation::AnnotationStore;
    use claimscope::fraud::ThreadRandom;
    use claimscope::model::{CostCategory, NewLineItem, seeded_annotations};
    use claimscope::persistence::{ClaimStore, FileBackend, JsonClaimStore};
    use claimscope::{AnalysisSession, EngineConfig, EstimateSession, Point, StoreError};

    const FRONT_IMAGE: &str = "front";

    pub fn run() -> Result<(), StoreError> {
        let config = EngineConfig::load_from_default_path().unwrap_or_default();
        env_logger::Builder::new()
            .filter_level(config.log_level.to_level_filter())
            .parse_default_env()
            .init();

        let backend = FileBackend::default_location()
            .unwrap_or_else(|| FileBackend::new(std::env::temp_dir().join("claimscope")));
        log::info!("Storing records under {:?}", backend.root());
        let mut store = JsonClaimStore::new(backend);

        let claims = store.load_claims();
        let Some(claim) = claims.first() else {
            log::warn!("No claims to work on");
            return Ok(());
        };
        println!("Claim {} for {} ({})", claim.id, claim.customer_name, claim.vehicle);

        let mut analysis = AnalysisSession::with_store(
            claim.id.clone(),
            FRONT_IMAGE,
            AnnotationStore::from_annotations(seeded_annotations(FRONT_IMAGE)),
            &config,
        );

        // Drag out a box over the hood and describe it
        analysis.arm_drawing();
        analysis.pointer_down(Point::new(30.0, 20.0));
        analysis.pointer_move(Point::new(55.0, 35.0));
        analysis.pointer_up(Point::new(55.0, 35.0));
        if let Some(form) = analysis.edit_form_mut() {
            form.set_type("Hood Dent");
            form.set_cost_input("$380");
        }
        analysis.save_edit();

        // And one manual entry from a double-click
        analysis.double_click(Point::new(85.0, 70.0));
        if let Some(form) = analysis.manual_entry_mut() {
            form.damage_type = "Wheel Scuff".to_string();
            form.set_cost_input("120");
        }
        analysis.save_manual_entry();

        let summary = analysis.fraud_assessment(&config.fraud.summary, &mut ThreadRandom);
        println!(
            "Analysis: {} regions, fraud score {} ({})",
            analysis.annotations().len(),
            summary.score,
            summary.status.name()
        );
        analysis.finish_analysis(&mut store)?;

        let mut estimate = EstimateSession::open(&store, &claim.id, &config);
        estimate.request_assisted_estimate();
        if let Err(e) = estimate
            .estimate_mut()
            .add_line_item(NewLineItem::new("Wheel Refinish", 140.0, CostCategory::Paint))
        {
            log::warn!("Skipping line item: {}", e);
        }

        for item in estimate.estimate().items() {
            println!(
                "  {:<40} {:>3} x {:>8.2} = {:>9.2}",
                item.description(),
                item.quantity(),
                item.unit_cost(),
                item.total_cost()
            );
        }
        let totals = estimate.estimate().totals();
        println!(
            "Subtotal {:.2}  Tax {:.2}  Total {:.2}",
            totals.subtotal, totals.tax, totals.total
        );

        let fraud = estimate.fraud_assessment(&mut ThreadRandom);
        println!("Estimate fraud score {} ({})", fraud.score, fraud.status.name());
        for reason in &fraud.reasons {
            println!("  - {}", reason);
        }

        let task_id = estimate.submit(&mut store)?;
        println!("Submitted for approval as task {}", task_id);
        Ok(())
    }
}

// WASM builds embed the library; there is no binary entry point.
#[cfg(target_arch = "wasm32")]
fn main() {}
