//! Trucker expense records
//!
//! One record type per tracked feature: mileage, fuel, maintenance, food,
//! and paperwork. Every record belongs to a trucker client and is listed per
//! client.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::validation::{non_negative, not_blank};

// ============================================================================
// Mileage
// ============================================================================

/// Miles driven on a given day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MileageLog {
    pub id: Uuid,
    pub trucker_client_id: Uuid,
    pub log_date: NaiveDate,
    pub miles_driven: Decimal,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl MileageLog {
    /// Create a log entry from validated input.
    pub fn create(input: NewMileageLog) -> Self {
        Self {
            id: Uuid::now_v7(),
            trucker_client_id: input.trucker_client_id,
            log_date: input.log_date,
            miles_driven: input.miles_driven,
            notes: input.notes,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewMileageLog {
    pub trucker_client_id: Uuid,
    pub log_date: NaiveDate,
    #[validate(custom(function = "non_negative"))]
    pub miles_driven: Decimal,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MileageLogPatch {
    pub log_date: Option<NaiveDate>,
    #[validate(custom(function = "non_negative"))]
    pub miles_driven: Option<Decimal>,
    pub notes: Option<String>,
}

impl MileageLogPatch {
    /// Apply the patch in place.
    pub fn apply(self, log: &mut MileageLog) {
        if let Some(log_date) = self.log_date {
            log.log_date = log_date;
        }
        if let Some(miles) = self.miles_driven {
            log.miles_driven = miles;
        }
        if let Some(notes) = self.notes {
            log.notes = Some(notes);
        }
    }
}

// ============================================================================
// Fuel
// ============================================================================

/// A fuel purchase.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FuelExpense {
    pub id: Uuid,
    pub trucker_client_id: Uuid,
    pub expense_date: NaiveDate,
    pub gallons: Decimal,
    pub cost_per_gallon: Decimal,
    pub total_cost: Decimal,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl FuelExpense {
    /// Create a fuel expense from validated input.
    ///
    /// When no total is given it is derived from gallons and price per gallon,
    /// rounded to cents.
    pub fn create(input: NewFuelExpense) -> Self {
        let total_cost = input
            .total_cost
            .unwrap_or_else(|| fuel_total(input.gallons, input.cost_per_gallon));
        Self {
            id: Uuid::now_v7(),
            trucker_client_id: input.trucker_client_id,
            expense_date: input.expense_date,
            gallons: input.gallons,
            cost_per_gallon: input.cost_per_gallon,
            total_cost,
            location: input.location,
            created_at: Utc::now(),
        }
    }
}

fn fuel_total(gallons: Decimal, cost_per_gallon: Decimal) -> Decimal {
    gallons
        .saturating_mul(cost_per_gallon)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewFuelExpense {
    pub trucker_client_id: Uuid,
    pub expense_date: NaiveDate,
    #[validate(custom(function = "non_negative"))]
    pub gallons: Decimal,
    #[validate(custom(function = "non_negative"))]
    pub cost_per_gallon: Decimal,
    #[validate(custom(function = "non_negative"))]
    pub total_cost: Option<Decimal>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FuelExpensePatch {
    pub expense_date: Option<NaiveDate>,
    #[validate(custom(function = "non_negative"))]
    pub gallons: Option<Decimal>,
    #[validate(custom(function = "non_negative"))]
    pub cost_per_gallon: Option<Decimal>,
    #[validate(custom(function = "non_negative"))]
    pub total_cost: Option<Decimal>,
    pub location: Option<String>,
}

impl FuelExpensePatch {
    /// Apply the patch in place.
    ///
    /// Changing gallons or price per gallon without a new total re-derives
    /// the total, the same way [`FuelExpense::create`] does.
    pub fn apply(self, expense: &mut FuelExpense) {
        if let Some(date) = self.expense_date {
            expense.expense_date = date;
        }
        let repriced = self.gallons.is_some() || self.cost_per_gallon.is_some();
        if let Some(gallons) = self.gallons {
            expense.gallons = gallons;
        }
        if let Some(price) = self.cost_per_gallon {
            expense.cost_per_gallon = price;
        }
        match self.total_cost {
            Some(total) => expense.total_cost = total,
            None if repriced => {
                expense.total_cost = fuel_total(expense.gallons, expense.cost_per_gallon)
            }
            None => {}
        }
        if let Some(location) = self.location {
            expense.location = Some(location);
        }
    }
}

// ============================================================================
// Maintenance
// ============================================================================

/// A repair or service cost.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceExpense {
    pub id: Uuid,
    pub trucker_client_id: Uuid,
    pub expense_date: NaiveDate,
    pub description: String,
    pub cost: Decimal,
    /// Free-form category such as "Oil Change", "Tire", or "Repair"
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl MaintenanceExpense {
    /// Create a maintenance expense from validated input.
    pub fn create(input: NewMaintenanceExpense) -> Self {
        Self {
            id: Uuid::now_v7(),
            trucker_client_id: input.trucker_client_id,
            expense_date: input.expense_date,
            description: input.description,
            cost: input.cost,
            category: input.category,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewMaintenanceExpense {
    pub trucker_client_id: Uuid,
    pub expense_date: NaiveDate,
    #[validate(custom(function = "not_blank"))]
    pub description: String,
    #[validate(custom(function = "non_negative"))]
    pub cost: Decimal,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceExpensePatch {
    pub expense_date: Option<NaiveDate>,
    #[validate(custom(function = "not_blank"))]
    pub description: Option<String>,
    #[validate(custom(function = "non_negative"))]
    pub cost: Option<Decimal>,
    pub category: Option<String>,
}

impl MaintenanceExpensePatch {
    /// Apply the patch in place.
    pub fn apply(self, expense: &mut MaintenanceExpense) {
        if let Some(date) = self.expense_date {
            expense.expense_date = date;
        }
        if let Some(description) = self.description {
            expense.description = description;
        }
        if let Some(cost) = self.cost {
            expense.cost = cost;
        }
        if let Some(category) = self.category {
            expense.category = Some(category);
        }
    }
}

// ============================================================================
// Food
// ============================================================================

/// A meal or per diem cost.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FoodExpense {
    pub id: Uuid,
    pub trucker_client_id: Uuid,
    pub expense_date: NaiveDate,
    pub description: String,
    pub cost: Decimal,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl FoodExpense {
    /// Create a food expense from validated input.
    pub fn create(input: NewFoodExpense) -> Self {
        Self {
            id: Uuid::now_v7(),
            trucker_client_id: input.trucker_client_id,
            expense_date: input.expense_date,
            description: input.description,
            cost: input.cost,
            location: input.location,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewFoodExpense {
    pub trucker_client_id: Uuid,
    pub expense_date: NaiveDate,
    #[validate(custom(function = "not_blank"))]
    pub description: String,
    #[validate(custom(function = "non_negative"))]
    pub cost: Decimal,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FoodExpensePatch {
    pub expense_date: Option<NaiveDate>,
    #[validate(custom(function = "not_blank"))]
    pub description: Option<String>,
    #[validate(custom(function = "non_negative"))]
    pub cost: Option<Decimal>,
    pub location: Option<String>,
}

impl FoodExpensePatch {
    /// Apply the patch in place.
    pub fn apply(self, expense: &mut FoodExpense) {
        if let Some(date) = self.expense_date {
            expense.expense_date = date;
        }
        if let Some(description) = self.description {
            expense.description = description;
        }
        if let Some(cost) = self.cost {
            expense.cost = cost;
        }
        if let Some(location) = self.location {
            expense.location = Some(location);
        }
    }
}

// ============================================================================
// Paperwork
// ============================================================================

/// A stored document (invoice, receipt, report).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaperworkDocument {
    pub id: Uuid,
    pub trucker_client_id: Uuid,
    pub document_date: NaiveDate,
    pub document_type: String,
    pub description: String,
    pub file_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl PaperworkDocument {
    /// Create a document record from validated input.
    pub fn create(input: NewPaperworkDocument) -> Self {
        Self {
            id: Uuid::now_v7(),
            trucker_client_id: input.trucker_client_id,
            document_date: input.document_date,
            document_type: input.document_type,
            description: input.description,
            file_url: input.file_url,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewPaperworkDocument {
    pub trucker_client_id: Uuid,
    pub document_date: NaiveDate,
    #[validate(custom(function = "not_blank"))]
    pub document_type: String,
    #[validate(custom(function = "not_blank"))]
    pub description: String,
    #[validate(url(message = "must be a valid URL"))]
    pub file_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PaperworkDocumentPatch {
    pub document_date: Option<NaiveDate>,
    #[validate(custom(function = "not_blank"))]
    pub document_type: Option<String>,
    #[validate(custom(function = "not_blank"))]
    pub description: Option<String>,
    #[validate(url(message = "must be a valid URL"))]
    pub file_url: Option<String>,
}

impl PaperworkDocumentPatch {
    /// Apply the patch in place.
    pub fn apply(self, document: &mut PaperworkDocument) {
        if let Some(date) = self.document_date {
            document.document_date = date;
        }
        if let Some(document_type) = self.document_type {
            document.document_type = document_type;
        }
        if let Some(description) = self.description {
            document.description = description;
        }
        if let Some(file_url) = self.file_url {
            document.file_url = Some(file_url);
        }
    }
}
