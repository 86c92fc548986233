//! Inbound inquiries from the marketing site
//!
//! Contact-form messages and demo requests. Both are append-only.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::validation::not_blank;

/// A message sent through the contact form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub message: String,
    pub created_at: NaiveDate,
}

impl Contact {
    /// Create a contact from validated input, dated today.
    pub fn create(input: NewContact) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: input.name,
            email: input.email,
            message: input.message,
            created_at: Utc::now().date_naive(),
        }
    }
}

/// Request body for the contact form.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewContact {
    #[validate(custom(function = "not_blank"))]
    pub name: String,

    #[validate(email(message = "must be a valid email address"))]
    pub email: String,

    #[validate(custom(function = "not_blank"))]
    pub message: String,
}

/// A request for a product demo or consultation.
///
/// Only the name and email are required; the rest is the optional
/// qualification questionnaire from the demo funnel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DemoRequest {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub company: Option<String>,
    pub job_title: Option<String>,
    pub industry: Option<String>,
    pub company_size: Option<String>,
    pub challenges: Option<String>,
    pub timeline: Option<String>,
    pub budget: Option<String>,
    pub consultation_notes: Option<String>,
    pub created_at: NaiveDate,
}

impl DemoRequest {
    /// Create a demo request from validated input, dated today.
    pub fn create(input: NewDemoRequest) -> Self {
        Self {
            id: Uuid::now_v7(),
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            company: input.company,
            job_title: input.job_title,
            industry: input.industry,
            company_size: input.company_size,
            challenges: input.challenges,
            timeline: input.timeline,
            budget: input.budget,
            consultation_notes: input.consultation_notes,
            created_at: Utc::now().date_naive(),
        }
    }
}

/// Request body for the demo funnel.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewDemoRequest {
    #[validate(custom(function = "not_blank"))]
    pub first_name: String,

    #[validate(custom(function = "not_blank"))]
    pub last_name: String,

    #[validate(email(message = "must be a valid email address"))]
    pub email: String,

    pub company: Option<String>,
    pub job_title: Option<String>,
    pub industry: Option<String>,
    pub company_size: Option<String>,
    pub challenges: Option<String>,
    pub timeline: Option<String>,
    pub budget: Option<String>,
    pub consultation_notes: Option<String>,
}
