//! Data store handle
//!
//! [`DataStore`] is the explicitly passed data-access handle. It is opened
//! once at process start, cloned into whatever needs storage, and closed at
//! shutdown. Every call validates its input before reaching the backend.

use async_trait::async_trait;
use manna_pricing::{CatalogError, SubscriptionTier};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::client::{NewTruckerClient, TruckerClient, TruckerClientPatch};
use crate::error::{StoreError, StoreResult};
use crate::expense::{
    FoodExpense, FoodExpensePatch, FuelExpense, FuelExpensePatch, MaintenanceExpense,
    MaintenanceExpensePatch, MileageLog, MileageLogPatch, NewFoodExpense, NewFuelExpense,
    NewMaintenanceExpense, NewMileageLog, NewPaperworkDocument, PaperworkDocument,
    PaperworkDocumentPatch,
};
use crate::inquiry::{Contact, DemoRequest, NewContact, NewDemoRequest};
use crate::project::{NewProject, Project, ProjectPatch};
use crate::storage::Storage;
use crate::validation::validate_input;

/// Which backend to open.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Process-local tables
    #[default]
    Memory,
}

impl BackendKind {
    /// Parse backend name from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "memory" | "in-memory" | "inmemory" => Some(BackendKind::Memory),
            _ => None,
        }
    }
}

/// Storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StoreConfig {
    /// Backend to open
    pub backend: BackendKind,
}

impl StoreConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `MANNA_STORE_BACKEND`: Storage backend (default: memory)
    pub fn from_env() -> StoreResult<Self> {
        let backend = match std::env::var("MANNA_STORE_BACKEND") {
            Ok(name) => BackendKind::parse(&name).ok_or(StoreError::UnsupportedBackend(name))?,
            Err(_) => BackendKind::default(),
        };
        Ok(Self { backend })
    }
}

/// Shared handle to the open data store.
///
/// Cloning is cheap and every clone sees the same backend and the same
/// open/closed state.
#[derive(Clone)]
pub struct DataStore {
    backend: Arc<dyn Storage>,
    open: Arc<AtomicBool>,
}

impl std::fmt::Debug for DataStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataStore")
            .field("open", &self.is_open())
            .finish_non_exhaustive()
    }
}

impl DataStore {
    /// Open the backend named by `config`.
    pub fn open(config: StoreConfig) -> StoreResult<Self> {
        let backend: Arc<dyn Storage> = match config.backend {
            #[cfg(feature = "memory")]
            BackendKind::Memory => Arc::new(crate::memory::InMemoryStore::new()),
            #[cfg(not(feature = "memory"))]
            BackendKind::Memory => return Err(StoreError::UnsupportedBackend("memory".to_string())),
        };
        info!(backend = ?config.backend, "Data store opened");
        Ok(Self::with_backend(backend))
    }

    /// Wrap an already constructed backend.
    pub fn with_backend(backend: Arc<dyn Storage>) -> Self {
        Self {
            backend,
            open: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Close the store. Later calls on any clone fail with [`StoreError::Closed`].
    pub fn close(&self) {
        if self.open.swap(false, Ordering::SeqCst) {
            info!("Data store closed");
        }
    }

    /// Whether the store still accepts operations.
    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    fn live(&self) -> StoreResult<&dyn Storage> {
        if self.is_open() {
            Ok(self.backend.as_ref())
        } else {
            Err(StoreError::Closed)
        }
    }
}

#[async_trait]
impl Storage for DataStore {
    async fn get_project(&self, id: Uuid) -> StoreResult<Option<Project>> {
        self.live()?.get_project(id).await
    }

    async fn list_projects(&self) -> StoreResult<Vec<Project>> {
        self.live()?.list_projects().await
    }

    async fn create_project(&self, input: NewProject) -> StoreResult<Project> {
        validate_input(&input)?;
        let project = self.live()?.create_project(input).await?;
        debug!(project_id = %project.id, "Project created");
        Ok(project)
    }

    async fn update_project(&self, id: Uuid, patch: ProjectPatch) -> StoreResult<Option<Project>> {
        validate_input(&patch)?;
        self.live()?.update_project(id, patch).await
    }

    async fn delete_project(&self, id: Uuid) -> StoreResult<bool> {
        self.live()?.delete_project(id).await
    }

    async fn create_contact(&self, input: NewContact) -> StoreResult<Contact> {
        validate_input(&input)?;
        let contact = self.live()?.create_contact(input).await?;
        debug!(contact_id = %contact.id, "Contact message stored");
        Ok(contact)
    }

    async fn list_contacts(&self) -> StoreResult<Vec<Contact>> {
        self.live()?.list_contacts().await
    }

    async fn create_demo_request(&self, input: NewDemoRequest) -> StoreResult<DemoRequest> {
        validate_input(&input)?;
        let request = self.live()?.create_demo_request(input).await?;
        debug!(demo_request_id = %request.id, "Demo request stored");
        Ok(request)
    }

    async fn list_demo_requests(&self) -> StoreResult<Vec<DemoRequest>> {
        self.live()?.list_demo_requests().await
    }

    async fn create_subscription_tier(&self, tier: SubscriptionTier) -> StoreResult<SubscriptionTier> {
        let derived = tier.derived_price().map_err(|source| CatalogError::Unpriceable {
            tier: tier.name.clone(),
            source,
        })?;
        if derived != tier.final_price_per_month {
            return Err(CatalogError::PriceMismatch {
                tier: tier.name.clone(),
                stored: tier.final_price_per_month,
                derived,
            }
            .into());
        }
        let tier = self.live()?.create_subscription_tier(tier).await?;
        debug!(tier_id = %tier.id, tier = %tier.name, "Subscription tier stored");
        Ok(tier)
    }

    async fn list_subscription_tiers(&self) -> StoreResult<Vec<SubscriptionTier>> {
        self.live()?.list_subscription_tiers().await
    }

    async fn get_subscription_tier(&self, id: Uuid) -> StoreResult<Option<SubscriptionTier>> {
        self.live()?.get_subscription_tier(id).await
    }

    async fn create_trucker_client(&self, input: NewTruckerClient) -> StoreResult<TruckerClient> {
        validate_input(&input)?;
        let client = self.live()?.create_trucker_client(input).await?;
        debug!(client_id = %client.id, tier_id = %client.subscription_tier_id, "Trucker client created");
        Ok(client)
    }

    async fn get_trucker_client(&self, id: Uuid) -> StoreResult<Option<TruckerClient>> {
        self.live()?.get_trucker_client(id).await
    }

    async fn list_trucker_clients(&self) -> StoreResult<Vec<TruckerClient>> {
        self.live()?.list_trucker_clients().await
    }

    async fn update_trucker_client(
        &self,
        id: Uuid,
        patch: TruckerClientPatch,
    ) -> StoreResult<Option<TruckerClient>> {
        validate_input(&patch)?;
        self.live()?.update_trucker_client(id, patch).await
    }

    async fn create_mileage_log(&self, input: NewMileageLog) -> StoreResult<MileageLog> {
        validate_input(&input)?;
        self.live()?.create_mileage_log(input).await
    }

    async fn get_mileage_log(&self, id: Uuid) -> StoreResult<Option<MileageLog>> {
        self.live()?.get_mileage_log(id).await
    }

    async fn list_mileage_logs(&self, trucker_client_id: Uuid) -> StoreResult<Vec<MileageLog>> {
        self.live()?.list_mileage_logs(trucker_client_id).await
    }

    async fn update_mileage_log(&self, id: Uuid, patch: MileageLogPatch) -> StoreResult<Option<MileageLog>> {
        validate_input(&patch)?;
        self.live()?.update_mileage_log(id, patch).await
    }

    async fn delete_mileage_log(&self, id: Uuid) -> StoreResult<bool> {
        self.live()?.delete_mileage_log(id).await
    }

    async fn create_fuel_expense(&self, input: NewFuelExpense) -> StoreResult<FuelExpense> {
        validate_input(&input)?;
        self.live()?.create_fuel_expense(input).await
    }

    async fn get_fuel_expense(&self, id: Uuid) -> StoreResult<Option<FuelExpense>> {
        self.live()?.get_fuel_expense(id).await
    }

    async fn list_fuel_expenses(&self, trucker_client_id: Uuid) -> StoreResult<Vec<FuelExpense>> {
        self.live()?.list_fuel_expenses(trucker_client_id).await
    }

    async fn update_fuel_expense(&self, id: Uuid, patch: FuelExpensePatch) -> StoreResult<Option<FuelExpense>> {
        validate_input(&patch)?;
        self.live()?.update_fuel_expense(id, patch).await
    }

    async fn delete_fuel_expense(&self, id: Uuid) -> StoreResult<bool> {
        self.live()?.delete_fuel_expense(id).await
    }

    async fn create_maintenance_expense(&self, input: NewMaintenanceExpense) -> StoreResult<MaintenanceExpense> {
        validate_input(&input)?;
        self.live()?.create_maintenance_expense(input).await
    }

    async fn get_maintenance_expense(&self, id: Uuid) -> StoreResult<Option<MaintenanceExpense>> {
        self.live()?.get_maintenance_expense(id).await
    }

    async fn list_maintenance_expenses(&self, trucker_client_id: Uuid) -> StoreResult<Vec<MaintenanceExpense>> {
        self.live()?.list_maintenance_expenses(trucker_client_id).await
    }

    async fn update_maintenance_expense(
        &self,
        id: Uuid,
        patch: MaintenanceExpensePatch,
    ) -> StoreResult<Option<MaintenanceExpense>> {
        validate_input(&patch)?;
        self.live()?.update_maintenance_expense(id, patch).await
    }

    async fn delete_maintenance_expense(&self, id: Uuid) -> StoreResult<bool> {
        self.live()?.delete_maintenance_expense(id).await
    }

    async fn create_food_expense(&self, input: NewFoodExpense) -> StoreResult<FoodExpense> {
        validate_input(&input)?;
        self.live()?.create_food_expense(input).await
    }

    async fn get_food_expense(&self, id: Uuid) -> StoreResult<Option<FoodExpense>> {
        self.live()?.get_food_expense(id).await
    }

    async fn list_food_expenses(&self, trucker_client_id: Uuid) -> StoreResult<Vec<FoodExpense>> {
        self.live()?.list_food_expenses(trucker_client_id).await
    }

    async fn update_food_expense(&self, id: Uuid, patch: FoodExpensePatch) -> StoreResult<Option<FoodExpense>> {
        validate_input(&patch)?;
        self.live()?.update_food_expense(id, patch).await
    }

    async fn delete_food_expense(&self, id: Uuid) -> StoreResult<bool> {
        self.live()?.delete_food_expense(id).await
    }

    async fn create_paperwork_document(&self, input: NewPaperworkDocument) -> StoreResult<PaperworkDocument> {
        validate_input(&input)?;
        self.live()?.create_paperwork_document(input).await
    }

    async fn get_paperwork_document(&self, id: Uuid) -> StoreResult<Option<PaperworkDocument>> {
        self.live()?.get_paperwork_document(id).await
    }

    async fn list_paperwork_documents(&self, trucker_client_id: Uuid) -> StoreResult<Vec<PaperworkDocument>> {
        self.live()?.list_paperwork_documents(trucker_client_id).await
    }

    async fn update_paperwork_document(
        &self,
        id: Uuid,
        patch: PaperworkDocumentPatch,
    ) -> StoreResult<Option<PaperworkDocument>> {
        validate_input(&patch)?;
        self.live()?.update_paperwork_document(id, patch).await
    }

    async fn delete_paperwork_document(&self, id: Uuid) -> StoreResult<bool> {
        self.live()?.delete_paperwork_document(id).await
    }
}
