//! Damage annotation records.

use serde::{Deserialize, Serialize};

use crate::constants::{DRAWN_DAMAGE_CONFIDENCE, DRAWN_PART_CONFIDENCE, MANUAL_CONFIDENCE, NEW_DAMAGE_TYPE};
use crate::geometry::Rect;

/// Unique identifier for an annotation.
pub type AnnotationId = u64;

/// Damage types offered as suggestions in the edit form. Free text is
/// accepted as well.
pub const DAMAGE_TYPE_SUGGESTIONS: &[&str] = &[
    "Front Bumper Damage",
    "Rear Bumper Damage",
    "Door Dent",
    "Hood Damage",
    "Fender Damage",
    "Quarter Panel Damage",
    "Headlight Damage",
    "Taillight Damage",
    "Windshield Crack",
    "Side Mirror Damage",
    "Paint Scratch",
    "Other",
];

/// How bad a damage region is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
}

impl Severity {
    pub fn name(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
        }
    }

    pub fn all() -> &'static [Severity] {
        &[Severity::Low, Severity::Medium, Severity::High]
    }

    /// Recommendation implied by this severity when none was chosen.
    pub fn default_recommendation(self) -> Recommendation {
        match self {
            Severity::High => Recommendation::Replace,
            Severity::Medium => Recommendation::Repair,
            Severity::Low => Recommendation::Touchup,
        }
    }

    /// Verb used as the line-item description prefix.
    pub fn action_label(self) -> &'static str {
        match self {
            Severity::High => "Replace",
            Severity::Medium => "Repair",
            Severity::Low => "Touch-up",
        }
    }
}

/// Suggested course of action for a damage region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recommendation {
    Repair,
    Replace,
    Touchup,
}

impl Recommendation {
    pub fn name(&self) -> &'static str {
        match self {
            Recommendation::Repair => "Repair",
            Recommendation::Replace => "Replace",
            Recommendation::Touchup => "Touch-up",
        }
    }
}

/// One detected or manually entered damage region on an image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DamageAnnotation {
    pub id: AnnotationId,
    /// Image the region was drawn on
    pub image_id: String,
    /// Free-form category label, e.g. "Front Bumper Damage"
    #[serde(rename = "type")]
    pub damage_type: String,
    pub severity: Severity,
    /// Explicit recommendation; derived from severity when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<Recommendation>,
    pub position: Rect,
    #[serde(default)]
    pub notes: String,
    pub estimated_cost: f64,
    pub part_confidence: f32,
    pub damage_confidence: f32,
    #[serde(default)]
    pub is_manual: bool,
}

impl DamageAnnotation {
    /// Annotation for a box drawn on the image, before the user fills in
    /// the details. The id is assigned by the store.
    pub fn drawn(image_id: impl Into<String>, position: Rect) -> Self {
        Self {
            id: 0,
            image_id: image_id.into(),
            damage_type: NEW_DAMAGE_TYPE.to_string(),
            severity: Severity::Medium,
            recommendation: None,
            position,
            notes: String::new(),
            estimated_cost: 0.0,
            part_confidence: DRAWN_PART_CONFIDENCE,
            damage_confidence: DRAWN_DAMAGE_CONFIDENCE,
            is_manual: false,
        }
    }

    /// Annotation entered through the manual popover. Confidence is fixed
    /// at the maximum since no detector produced it.
    pub fn manual(
        image_id: impl Into<String>,
        damage_type: impl Into<String>,
        severity: Severity,
        estimated_cost: f64,
        position: Rect,
    ) -> Self {
        Self {
            id: 0,
            image_id: image_id.into(),
            damage_type: damage_type.into(),
            severity,
            recommendation: None,
            position,
            notes: String::new(),
            estimated_cost,
            part_confidence: MANUAL_CONFIDENCE,
            damage_confidence: MANUAL_CONFIDENCE,
            is_manual: true,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn with_recommendation(mut self, recommendation: Recommendation) -> Self {
        self.recommendation = Some(recommendation);
        self
    }

    /// The explicit recommendation, or the one implied by severity.
    pub fn effective_recommendation(&self) -> Recommendation {
        self.recommendation
            .unwrap_or_else(|| self.severity.default_recommendation())
    }

    /// Display text for a confidence value; manual entries have none.
    pub fn confidence_label(&self, confidence: f32) -> String {
        if self.is_manual {
            "Manual".to_string()
        } else {
            format!("{:.0}%", confidence * 100.0)
        }
    }

    pub fn cost_label(&self) -> String {
        format!("${:.2}", self.estimated_cost)
    }
}

/// Partial update for an annotation. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotationPatch {
    pub image_id: Option<String>,
    pub damage_type: Option<String>,
    pub severity: Option<Severity>,
    /// `Some(None)` clears an explicit recommendation
    pub recommendation: Option<Option<Recommendation>>,
    pub position: Option<Rect>,
    pub notes: Option<String>,
    pub estimated_cost: Option<f64>,
    pub part_confidence: Option<f32>,
    pub damage_confidence: Option<f32>,
    pub is_manual: Option<bool>,
}

impl AnnotationPatch {
    /// Patch that rewrites every field with the values of `annotation`.
    pub fn replace_with(annotation: &DamageAnnotation) -> Self {
        Self {
            image_id: Some(annotation.image_id.clone()),
            damage_type: Some(annotation.damage_type.clone()),
            severity: Some(annotation.severity),
            recommendation: Some(annotation.recommendation),
            position: Some(annotation.position),
            notes: Some(annotation.notes.clone()),
            estimated_cost: Some(annotation.estimated_cost),
            part_confidence: Some(annotation.part_confidence),
            damage_confidence: Some(annotation.damage_confidence),
            is_manual: Some(annotation.is_manual),
        }
    }

    /// Apply the patch to a copy of `base`. The id is never patched.
    pub fn applied_to(&self, base: &DamageAnnotation) -> DamageAnnotation {
        let mut next = base.clone();
        if let Some(image_id) = &self.image_id {
            next.image_id = image_id.clone();
        }
        if let Some(damage_type) = &self.damage_type {
            next.damage_type = damage_type.clone();
        }
        if let Some(severity) = self.severity {
            next.severity = severity;
        }
        if let Some(recommendation) = self.recommendation {
            next.recommendation = recommendation;
        }
        if let Some(position) = self.position {
            next.position = position;
        }
        if let Some(notes) = &self.notes {
            next.notes = notes.clone();
        }
        if let Some(cost) = self.estimated_cost {
            next.estimated_cost = cost;
        }
        if let Some(confidence) = self.part_confidence {
            next.part_confidence = confidence;
        }
        if let Some(confidence) = self.damage_confidence {
            next.damage_confidence = confidence;
        }
        if let Some(is_manual) = self.is_manual {
            next.is_manual = is_manual;
        }
        next
    }
}

/// The four regions the simulated detector reports for a claim photo.
pub fn seeded_annotations(image_id: &str) -> Vec<DamageAnnotation> {
    let detected = |id, damage_type: &str, severity, cost, position, part, damage| DamageAnnotation {
        id,
        image_id: image_id.to_string(),
        damage_type: damage_type.to_string(),
        severity,
        recommendation: None,
        position,
        notes: String::new(),
        estimated_cost: cost,
        part_confidence: part,
        damage_confidence: damage,
        is_manual: false,
    };

    vec![
        detected(
            1,
            "Front Bumper Damage",
            Severity::High,
            950.0,
            Rect::new(15.0, 55.0, 30.0, 20.0),
            0.95,
            0.92,
        ),
        detected(
            2,
            "Driver Door Dent",
            Severity::Medium,
            450.0,
            Rect::new(50.0, 40.0, 20.0, 25.0),
            0.89,
            0.84,
        ),
        detected(
            3,
            "Headlight Crack",
            Severity::Low,
            350.0,
            Rect::new(10.0, 40.0, 12.0, 10.0),
            0.91,
            0.78,
        ),
        detected(
            4,
            "Paint Scratch",
            Severity::Low,
            250.0,
            Rect::new(72.0, 48.0, 15.0, 8.0),
            0.82,
            0.71,
        ),
    ]
}
