use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// ============ Database Models ============

/// A single contact-form submission.
///
/// Leads are append-only: every field is fixed once the store assigns
/// `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Lead {
    /// Unique identifier, assigned on insert.
    pub id: Uuid,
    /// Name of the person submitting the form.
    #[serde(rename = "nome", alias = "name")]
    pub name: String,
    /// Contact email, domain normalized to lower case.
    pub email: String,
    /// Free-text message.
    #[serde(rename = "mensagem", alias = "message")]
    pub message: String,
    /// Insertion timestamp (UTC).
    pub created_at: DateTime<Utc>,
}

impl Lead {
    /// Builds the persisted form of a validated submission.
    ///
    /// The timestamp is truncated to microseconds, the precision of
    /// PostgreSQL `TIMESTAMPTZ`, so a lead reads back exactly as it was
    /// returned from insert.
    pub fn assign(new_lead: NewLead) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: new_lead.name,
            email: new_lead.email,
            message: new_lead.message,
            created_at: Utc::now().trunc_subsecs(6),
        }
    }
}

/// A submission that passed validation and is ready for insertion.
///
/// Only [`crate::validation::validate_lead`] produces values of this type
/// outside of tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLead {
    pub name: String,
    pub email: String,
    pub message: String,
}

// ============ API Request/Response Models ============

/// Raw request payload for `POST /api/leads`.
///
/// Fields are optional so that a missing field is reported as a
/// field-level validation error rather than a body decoding failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeadCreate {
    #[serde(default, alias = "name")]
    pub nome: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, alias = "message")]
    pub mensagem: Option<String>,
}

/// Response payload for lead creation.
#[derive(Debug, Serialize, Deserialize)]
pub struct LeadResponse {
    /// Whether the lead was stored.
    pub success: bool,
    /// Message shown to the person who sent the form.
    pub message: String,
    /// ID of the stored lead.
    pub lead_id: Option<Uuid>,
}

impl LeadResponse {
    pub fn created(lead_id: Uuid) -> Self {
        Self {
            success: true,
            message: "Mensagem enviada com sucesso!".to_string(),
            lead_id: Some(lead_id),
        }
    }
}

/// Greeting returned by the API root.
#[derive(Debug, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
}

impl Default for RootResponse {
    fn default() -> Self {
        Self {
            message: "SocialLab API - Transformando sua presença digital".to_string(),
        }
    }
}
