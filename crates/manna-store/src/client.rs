//! Trucker client records
//!
//! A trucker client is the company that signed up through onboarding. The
//! record keeps the id of the subscription tier that was chosen; the feature
//! set that led to the choice is not stored.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::validation::not_blank;

/// A subscribed trucking company.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TruckerClient {
    /// Unique identifier
    pub id: Uuid,

    /// Company name
    pub company_name: String,

    /// Primary contact
    pub contact_person: Option<String>,

    /// Billing email
    pub email: String,

    /// Contact phone
    pub phone: Option<String>,

    /// Mailing address
    pub address: Option<String>,

    /// Chosen subscription tier
    pub subscription_tier_id: Uuid,

    /// First day of the subscription
    pub subscription_start_date: NaiveDate,

    /// Whether the subscription is active
    pub is_active: bool,

    /// When the record was created
    pub created_at: DateTime<Utc>,
}

impl TruckerClient {
    /// Create a client from validated input.
    ///
    /// The start date defaults to today and the client starts active.
    pub fn create(input: NewTruckerClient) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            company_name: input.company_name,
            contact_person: input.contact_person,
            email: input.email,
            phone: input.phone,
            address: input.address,
            subscription_tier_id: input.subscription_tier_id,
            subscription_start_date: input.subscription_start_date.unwrap_or_else(|| now.date_naive()),
            is_active: input.is_active.unwrap_or(true),
            created_at: now,
        }
    }
}

/// Input for creating a trucker client.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewTruckerClient {
    #[validate(custom(function = "not_blank"))]
    pub company_name: String,

    pub contact_person: Option<String>,

    #[validate(email(message = "must be a valid email address"))]
    pub email: String,

    pub phone: Option<String>,

    pub address: Option<String>,

    pub subscription_tier_id: Uuid,

    pub subscription_start_date: Option<NaiveDate>,

    pub is_active: Option<bool>,
}

/// Partial update for a trucker client.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TruckerClientPatch {
    #[validate(custom(function = "not_blank"))]
    pub company_name: Option<String>,

    pub contact_person: Option<String>,

    #[validate(email(message = "must be a valid email address"))]
    pub email: Option<String>,

    pub phone: Option<String>,

    pub address: Option<String>,

    pub subscription_tier_id: Option<Uuid>,

    pub subscription_start_date: Option<NaiveDate>,

    pub is_active: Option<bool>,
}

impl TruckerClientPatch {
    /// Apply the patch to a client in place.
    pub fn apply(self, client: &mut TruckerClient) {
        if let Some(company_name) = self.company_name {
            client.company_name = company_name;
        }
        if let Some(contact_person) = self.contact_person {
            client.contact_person = Some(contact_person);
        }
        if let Some(email) = self.email {
            client.email = email;
        }
        if let Some(phone) = self.phone {
            client.phone = Some(phone);
        }
        if let Some(address) = self.address {
            client.address = Some(address);
        }
        if let Some(tier_id) = self.subscription_tier_id {
            client.subscription_tier_id = tier_id;
        }
        if let Some(start) = self.subscription_start_date {
            client.subscription_start_date = start;
        }
        if let Some(is_active) = self.is_active {
            client.is_active = is_active;
        }
    }
}
