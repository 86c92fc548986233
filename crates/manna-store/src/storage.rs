//! Data access trait
//!
//! One-to-one CRUD over the platform's tables. Missing rows are reported as
//! `Ok(None)` (lookups, updates) or `Ok(false)` (deletes); `Err` is reserved
//! for backend failure. Implementations do not validate input; that happens
//! in [`DataStore`](crate::DataStore) before a call reaches the backend.

use async_trait::async_trait;
use manna_pricing::SubscriptionTier;
use uuid::Uuid;

use crate::client::{NewTruckerClient, TruckerClient, TruckerClientPatch};
use crate::error::StoreResult;
use crate::expense::{
    FoodExpense, FoodExpensePatch, FuelExpense, FuelExpensePatch, MaintenanceExpense,
    MaintenanceExpensePatch, MileageLog, MileageLogPatch, NewFoodExpense, NewFuelExpense,
    NewMaintenanceExpense, NewMileageLog, NewPaperworkDocument, PaperworkDocument,
    PaperworkDocumentPatch,
};
use crate::inquiry::{Contact, DemoRequest, NewContact, NewDemoRequest};
use crate::project::{NewProject, Project, ProjectPatch};

/// Storage backend for all platform records.
#[async_trait]
pub trait Storage: Send + Sync {
    // Projects
    async fn get_project(&self, id: Uuid) -> StoreResult<Option<Project>>;
    async fn list_projects(&self) -> StoreResult<Vec<Project>>;
    async fn create_project(&self, input: NewProject) -> StoreResult<Project>;
    async fn update_project(&self, id: Uuid, patch: ProjectPatch) -> StoreResult<Option<Project>>;
    async fn delete_project(&self, id: Uuid) -> StoreResult<bool>;

    // Contacts
    async fn create_contact(&self, input: NewContact) -> StoreResult<Contact>;
    async fn list_contacts(&self) -> StoreResult<Vec<Contact>>;

    // Demo requests
    async fn create_demo_request(&self, input: NewDemoRequest) -> StoreResult<DemoRequest>;
    async fn list_demo_requests(&self) -> StoreResult<Vec<DemoRequest>>;

    // Subscription tiers

    /// Persist an already-priced tier.
    ///
    /// Fails with [`crate::StoreError::DuplicateTier`] if the name is taken and with
    /// [`crate::StoreError::Catalog`] if the stored tiers plus this one would break
    /// catalog pricing or ordering. The check and the insert are one step.
    async fn create_subscription_tier(&self, tier: SubscriptionTier) -> StoreResult<SubscriptionTier>;

    /// All tiers ordered by `order` ascending.
    async fn list_subscription_tiers(&self) -> StoreResult<Vec<SubscriptionTier>>;

    async fn get_subscription_tier(&self, id: Uuid) -> StoreResult<Option<SubscriptionTier>>;

    // Trucker clients
    async fn create_trucker_client(&self, input: NewTruckerClient) -> StoreResult<TruckerClient>;
    async fn get_trucker_client(&self, id: Uuid) -> StoreResult<Option<TruckerClient>>;
    async fn list_trucker_clients(&self) -> StoreResult<Vec<TruckerClient>>;
    async fn update_trucker_client(
        &self,
        id: Uuid,
        patch: TruckerClientPatch,
    ) -> StoreResult<Option<TruckerClient>>;

    // Mileage logs
    async fn create_mileage_log(&self, input: NewMileageLog) -> StoreResult<MileageLog>;
    async fn get_mileage_log(&self, id: Uuid) -> StoreResult<Option<MileageLog>>;
    async fn list_mileage_logs(&self, trucker_client_id: Uuid) -> StoreResult<Vec<MileageLog>>;
    async fn update_mileage_log(&self, id: Uuid, patch: MileageLogPatch) -> StoreResult<Option<MileageLog>>;
    async fn delete_mileage_log(&self, id: Uuid) -> StoreResult<bool>;

    // Fuel expenses
    async fn create_fuel_expense(&self, input: NewFuelExpense) -> StoreResult<FuelExpense>;
    async fn get_fuel_expense(&self, id: Uuid) -> StoreResult<Option<FuelExpense>>;
    async fn list_fuel_expenses(&self, trucker_client_id: Uuid) -> StoreResult<Vec<FuelExpense>>;
    async fn update_fuel_expense(&self, id: Uuid, patch: FuelExpensePatch) -> StoreResult<Option<FuelExpense>>;
    async fn delete_fuel_expense(&self, id: Uuid) -> StoreResult<bool>;

    // Maintenance expenses
    async fn create_maintenance_expense(&self, input: NewMaintenanceExpense) -> StoreResult<MaintenanceExpense>;
    async fn get_maintenance_expense(&self, id: Uuid) -> StoreResult<Option<MaintenanceExpense>>;
    async fn list_maintenance_expenses(&self, trucker_client_id: Uuid) -> StoreResult<Vec<MaintenanceExpense>>;
    async fn update_maintenance_expense(
        &self,
        id: Uuid,
        patch: MaintenanceExpensePatch,
    ) -> StoreResult<Option<MaintenanceExpense>>;
    async fn delete_maintenance_expense(&self, id: Uuid) -> StoreResult<bool>;

    // Food expenses
    async fn create_food_expense(&self, input: NewFoodExpense) -> StoreResult<FoodExpense>;
    async fn get_food_expense(&self, id: Uuid) -> StoreResult<Option<FoodExpense>>;
    async fn list_food_expenses(&self, trucker_client_id: Uuid) -> StoreResult<Vec<FoodExpense>>;
    async fn update_food_expense(&self, id: Uuid, patch: FoodExpensePatch) -> StoreResult<Option<FoodExpense>>;
    async fn delete_food_expense(&self, id: Uuid) -> StoreResult<bool>;

    // Paperwork documents
    async fn create_paperwork_document(&self, input: NewPaperworkDocument) -> StoreResult<PaperworkDocument>;
    async fn get_paperwork_document(&self, id: Uuid) -> StoreResult<Option<PaperworkDocument>>;
    async fn list_paperwork_documents(&self, trucker_client_id: Uuid) -> StoreResult<Vec<PaperworkDocument>>;
    async fn update_paperwork_document(
        &self,
        id: Uuid,
        patch: PaperworkDocumentPatch,
    ) -> StoreResult<Option<PaperworkDocument>>;
    async fn delete_paperwork_document(&self, id: Uuid) -> StoreResult<bool>;
}
