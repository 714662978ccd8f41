//! Claim and review-task records exchanged with the persistence layer.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClaimStatus {
    #[default]
    Open,
    InReview,
    Approved,
    Rejected,
}

impl ClaimStatus {
    pub fn name(&self) -> &'static str {
        match self {
            ClaimStatus::Open => "Open",
            ClaimStatus::InReview => "In Review",
            ClaimStatus::Approved => "Approved",
            ClaimStatus::Rejected => "Rejected",
        }
    }
}

/// An insurance claim as listed on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claim {
    pub id: String,
    pub policy_number: String,
    pub customer_name: String,
    pub vehicle: String,
    /// ISO date (YYYY-MM-DD)
    pub incident_date: String,
    #[serde(default)]
    pub status: ClaimStatus,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub description: String,
}

impl Claim {
    pub fn new(id: impl Into<String>, customer_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            policy_number: String::new(),
            customer_name: customer_name.into(),
            vehicle: String::new(),
            incident_date: String::new(),
            status: ClaimStatus::Open,
            amount: 0.0,
            description: String::new(),
        }
    }
}

/// Claims shown when nothing has been stored yet.
pub fn default_claims() -> Vec<Claim> {
    vec![
        Claim {
            id: "CLM-2024-001".to_string(),
            policy_number: "POL-88213".to_string(),
            customer_name: "Jordan Reyes".to_string(),
            vehicle: "2019 Toyota Camry".to_string(),
            incident_date: "2024-03-12".to_string(),
            status: ClaimStatus::Open,
            amount: 2_000.0,
            description: "Front-end collision at low speed".to_string(),
        },
        Claim {
            id: "CLM-2024-002".to_string(),
            policy_number: "POL-77410".to_string(),
            customer_name: "Sam Okafor".to_string(),
            vehicle: "2021 Honda Civic".to_string(),
            incident_date: "2024-03-18".to_string(),
            status: ClaimStatus::InReview,
            amount: 3_450.0,
            description: "Side impact in parking lot".to_string(),
        },
        Claim {
            id: "CLM-2024-003".to_string(),
            policy_number: "POL-65002".to_string(),
            customer_name: "Alex Lindqvist".to_string(),
            vehicle: "2017 Ford F-150".to_string(),
            incident_date: "2024-02-27".to_string(),
            status: ClaimStatus::Approved,
            amount: 1_250.0,
            description: "Hail damage to hood and roof".to_string(),
        },
    ]
}

/// Urgency of a review task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

/// What a review task asks the agent to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskType {
    DamageReview,
    EstimateApproval,
}

/// A follow-up item on the agent's task list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewTask {
    pub id: u64,
    pub description: String,
    /// Human-readable due hint, e.g. "2 days"
    pub due_in: String,
    pub priority: TaskPriority,
    pub claim_id: String,
    #[serde(rename = "type")]
    pub task_type: TaskType,
}

impl ReviewTask {
    /// Task with id 0; the store assigns the real id when appending.
    pub fn new(
        task_type: TaskType,
        claim_id: impl Into<String>,
        description: impl Into<String>,
        due_in: impl Into<String>,
        priority: TaskPriority,
    ) -> Self {
        Self {
            id: 0,
            description: description.into(),
            due_in: due_in.into(),
            priority,
            claim_id: claim_id.into(),
            task_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_status_serialization() {
        let json = serde_json::to_string(&ClaimStatus::InReview).expect("serialize");
        assert_eq!(json, "\"in-review\"");
    }

    #[test]
    fn test_claim_defaults_for_missing_fields() {
        let json = r#"{
            "id": "CLM-9",
            "policyNumber": "P",
            "customerName": "C",
            "vehicle": "V",
            "incidentDate": "2024-01-01"
        }"#;
        let claim: Claim = serde_json::from_str(json).expect("parse");
        assert_eq!(claim.status, ClaimStatus::Open);
        assert_eq!(claim.amount, 0.0);
    }

    #[test]
    fn test_task_type_key() {
        let task = ReviewTask::new(
            TaskType::DamageReview,
            "CLM-1",
            "Review damage",
            "2 days",
            TaskPriority::High,
        );
        let json = serde_json::to_string(&task).expect("serialize");
        assert!(json.contains("\"type\":\"damage-review\""));
        assert!(json.contains("\"dueIn\":\"2 days\""));
        assert!(json.contains("\"claimId\":\"CLM-1\""));
    }

    #[test]
    fn test_default_claims_have_unique_ids() {
        let claims = default_claims();
        let mut ids: Vec<&str> = claims.iter().map(|c| c.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), claims.len());
    }
}
