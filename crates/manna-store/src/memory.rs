//! In-memory storage backend
//!
//! Each table is a `Vec` behind a `tokio::sync::RwLock`, kept in insertion
//! order. Suitable for local development, demos, and tests; data does not
//! survive a restart.

use async_trait::async_trait;
use manna_pricing::{SubscriptionTier, TierCatalog};
use std::sync::Arc;
use tokio::sync::RwLock;
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

/// A row addressable by id.
trait Keyed {
    fn key(&self) -> Uuid;
}

/// A row owned by a trucker client.
trait ClientOwned: Keyed {
    fn owner(&self) -> Uuid;
}

macro_rules! keyed {
    ($($ty:ty),* $(,)?) => {
        $(impl Keyed for $ty {
            fn key(&self) -> Uuid {
                self.id
            }
        })*
    };
}

macro_rules! client_owned {
    ($($ty:ty),* $(,)?) => {
        $(impl ClientOwned for $ty {
            fn owner(&self) -> Uuid {
                self.trucker_client_id
            }
        })*
    };
}

keyed!(
    Project,
    Contact,
    DemoRequest,
    SubscriptionTier,
    TruckerClient,
    MileageLog,
    FuelExpense,
    MaintenanceExpense,
    FoodExpense,
    PaperworkDocument,
);

client_owned!(MileageLog, FuelExpense, MaintenanceExpense, FoodExpense, PaperworkDocument);

/// A single table.
struct Table<T> {
    rows: RwLock<Vec<T>>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
        }
    }
}

impl<T: Keyed + Clone> Table<T> {
    async fn insert(&self, row: T) -> T {
        self.rows.write().await.push(row.clone());
        row
    }

    /// Insert after `check` accepts the current rows, under one write lock.
    async fn insert_checked<F>(&self, row: T, check: F) -> StoreResult<T>
    where
        F: FnOnce(&[T], &T) -> StoreResult<()>,
    {
        let mut rows = self.rows.write().await;
        check(rows.as_slice(), &row)?;
        rows.push(row.clone());
        Ok(row)
    }

    async fn get(&self, id: Uuid) -> Option<T> {
        self.rows.read().await.iter().find(|r| r.key() == id).cloned()
    }

    async fn all(&self) -> Vec<T> {
        self.rows.read().await.clone()
    }

    async fn update<F>(&self, id: Uuid, f: F) -> Option<T>
    where
        F: FnOnce(&mut T),
    {
        let mut rows = self.rows.write().await;
        let row = rows.iter_mut().find(|r| r.key() == id)?;
        f(row);
        Some(row.clone())
    }

    async fn delete(&self, id: Uuid) -> bool {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|r| r.key() != id);
        rows.len() != before
    }

    async fn len(&self) -> usize {
        self.rows.read().await.len()
    }
}

impl<T: ClientOwned + Clone> Table<T> {
    async fn for_client(&self, client_id: Uuid) -> Vec<T> {
        self.rows
            .read()
            .await
            .iter()
            .filter(|r| r.owner() == client_id)
            .cloned()
            .collect()
    }
}

/// Row counts per table.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct StoreStats {
    pub projects: usize,
    pub contacts: usize,
    pub demo_requests: usize,
    pub subscription_tiers: usize,
    pub trucker_clients: usize,
    pub mileage_logs: usize,
    pub fuel_expenses: usize,
    pub maintenance_expenses: usize,
    pub food_expenses: usize,
    pub paperwork_documents: usize,
}

#[derive(Default)]
struct Tables {
    projects: Table<Project>,
    contacts: Table<Contact>,
    demo_requests: Table<DemoRequest>,
    subscription_tiers: Table<SubscriptionTier>,
    trucker_clients: Table<TruckerClient>,
    mileage_logs: Table<MileageLog>,
    fuel_expenses: Table<FuelExpense>,
    maintenance_expenses: Table<MaintenanceExpense>,
    food_expenses: Table<FoodExpense>,
    paperwork_documents: Table<PaperworkDocument>,
}

/// In-memory implementation of [`Storage`].
///
/// Cloning shares the underlying tables.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<Tables>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Row counts per table.
    pub async fn stats(&self) -> StoreStats {
        let t = &self.tables;
        StoreStats {
            projects: t.projects.len().await,
            contacts: t.contacts.len().await,
            demo_requests: t.demo_requests.len().await,
            subscription_tiers: t.subscription_tiers.len().await,
            trucker_clients: t.trucker_clients.len().await,
            mileage_logs: t.mileage_logs.len().await,
            fuel_expenses: t.fuel_expenses.len().await,
            maintenance_expenses: t.maintenance_expenses.len().await,
            food_expenses: t.food_expenses.len().await,
            paperwork_documents: t.paperwork_documents.len().await,
        }
    }
}

#[async_trait]
impl Storage for InMemoryStore {
    async fn get_project(&self, id: Uuid) -> StoreResult<Option<Project>> {
        Ok(self.tables.projects.get(id).await)
    }

    async fn list_projects(&self) -> StoreResult<Vec<Project>> {
        Ok(self.tables.projects.all().await)
    }

    async fn create_project(&self, input: NewProject) -> StoreResult<Project> {
        Ok(self.tables.projects.insert(Project::create(input)).await)
    }

    async fn update_project(&self, id: Uuid, patch: ProjectPatch) -> StoreResult<Option<Project>> {
        Ok(self.tables.projects.update(id, |p| patch.apply(p)).await)
    }

    async fn delete_project(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.tables.projects.delete(id).await)
    }

    async fn create_contact(&self, input: NewContact) -> StoreResult<Contact> {
        Ok(self.tables.contacts.insert(Contact::create(input)).await)
    }

    async fn list_contacts(&self) -> StoreResult<Vec<Contact>> {
        Ok(self.tables.contacts.all().await)
    }

    async fn create_demo_request(&self, input: NewDemoRequest) -> StoreResult<DemoRequest> {
        Ok(self.tables.demo_requests.insert(DemoRequest::create(input)).await)
    }

    async fn list_demo_requests(&self) -> StoreResult<Vec<DemoRequest>> {
        Ok(self.tables.demo_requests.all().await)
    }

    async fn create_subscription_tier(&self, tier: SubscriptionTier) -> StoreResult<SubscriptionTier> {
        self.tables
            .subscription_tiers
            .insert_checked(tier, |existing, tier| {
                if existing.iter().any(|t| t.name == tier.name) {
                    return Err(StoreError::DuplicateTier(tier.name.clone()));
                }
                let mut tiers = existing.to_vec();
                tiers.push(tier.clone());
                TierCatalog::new(tiers).verify()?;
                Ok(())
            })
            .await
    }

    async fn list_subscription_tiers(&self) -> StoreResult<Vec<SubscriptionTier>> {
        let mut tiers = self.tables.subscription_tiers.all().await;
        tiers.sort_by_key(|t| t.order);
        Ok(tiers)
    }

    async fn get_subscription_tier(&self, id: Uuid) -> StoreResult<Option<SubscriptionTier>> {
        Ok(self.tables.subscription_tiers.get(id).await)
    }

    async fn create_trucker_client(&self, input: NewTruckerClient) -> StoreResult<TruckerClient> {
        Ok(self.tables.trucker_clients.insert(TruckerClient::create(input)).await)
    }

    async fn get_trucker_client(&self, id: Uuid) -> StoreResult<Option<TruckerClient>> {
        Ok(self.tables.trucker_clients.get(id).await)
    }

    async fn list_trucker_clients(&self) -> StoreResult<Vec<TruckerClient>> {
        Ok(self.tables.trucker_clients.all().await)
    }

    async fn update_trucker_client(
        &self,
        id: Uuid,
        patch: TruckerClientPatch,
    ) -> StoreResult<Option<TruckerClient>> {
        Ok(self.tables.trucker_clients.update(id, |c| patch.apply(c)).await)
    }

    async fn create_mileage_log(&self, input: NewMileageLog) -> StoreResult<MileageLog> {
        Ok(self.tables.mileage_logs.insert(MileageLog::create(input)).await)
    }

    async fn get_mileage_log(&self, id: Uuid) -> StoreResult<Option<MileageLog>> {
        Ok(self.tables.mileage_logs.get(id).await)
    }

    async fn list_mileage_logs(&self, trucker_client_id: Uuid) -> StoreResult<Vec<MileageLog>> {
        Ok(self.tables.mileage_logs.for_client(trucker_client_id).await)
    }

    async fn update_mileage_log(&self, id: Uuid, patch: MileageLogPatch) -> StoreResult<Option<MileageLog>> {
        Ok(self.tables.mileage_logs.update(id, |l| patch.apply(l)).await)
    }

    async fn delete_mileage_log(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.tables.mileage_logs.delete(id).await)
    }

    async fn create_fuel_expense(&self, input: NewFuelExpense) -> StoreResult<FuelExpense> {
        Ok(self.tables.fuel_expenses.insert(FuelExpense::create(input)).await)
    }

    async fn get_fuel_expense(&self, id: Uuid) -> StoreResult<Option<FuelExpense>> {
        Ok(self.tables.fuel_expenses.get(id).await)
    }

    async fn list_fuel_expenses(&self, trucker_client_id: Uuid) -> StoreResult<Vec<FuelExpense>> {
        Ok(self.tables.fuel_expenses.for_client(trucker_client_id).await)
    }

    async fn update_fuel_expense(&self, id: Uuid, patch: FuelExpensePatch) -> StoreResult<Option<FuelExpense>> {
        Ok(self.tables.fuel_expenses.update(id, |e| patch.apply(e)).await)
    }

    async fn delete_fuel_expense(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.tables.fuel_expenses.delete(id).await)
    }

    async fn create_maintenance_expense(&self, input: NewMaintenanceExpense) -> StoreResult<MaintenanceExpense> {
        Ok(self
            .tables
            .maintenance_expenses
            .insert(MaintenanceExpense::create(input))
            .await)
    }

    async fn get_maintenance_expense(&self, id: Uuid) -> StoreResult<Option<MaintenanceExpense>> {
        Ok(self.tables.maintenance_expenses.get(id).await)
    }

    async fn list_maintenance_expenses(&self, trucker_client_id: Uuid) -> StoreResult<Vec<MaintenanceExpense>> {
        Ok(self.tables.maintenance_expenses.for_client(trucker_client_id).await)
    }

    async fn update_maintenance_expense(
        &self,
        id: Uuid,
        patch: MaintenanceExpensePatch,
    ) -> StoreResult<Option<MaintenanceExpense>> {
        Ok(self.tables.maintenance_expenses.update(id, |e| patch.apply(e)).await)
    }

    async fn delete_maintenance_expense(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.tables.maintenance_expenses.delete(id).await)
    }

    async fn create_food_expense(&self, input: NewFoodExpense) -> StoreResult<FoodExpense> {
        Ok(self.tables.food_expenses.insert(FoodExpense::create(input)).await)
    }

    async fn get_food_expense(&self, id: Uuid) -> StoreResult<Option<FoodExpense>> {
        Ok(self.tables.food_expenses.get(id).await)
    }

    async fn list_food_expenses(&self, trucker_client_id: Uuid) -> StoreResult<Vec<FoodExpense>> {
        Ok(self.tables.food_expenses.for_client(trucker_client_id).await)
    }

    async fn update_food_expense(&self, id: Uuid, patch: FoodExpensePatch) -> StoreResult<Option<FoodExpense>> {
        Ok(self.tables.food_expenses.update(id, |e| patch.apply(e)).await)
    }

    async fn delete_food_expense(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.tables.food_expenses.delete(id).await)
    }

    async fn create_paperwork_document(&self, input: NewPaperworkDocument) -> StoreResult<PaperworkDocument> {
        Ok(self
            .tables
            .paperwork_documents
            .insert(PaperworkDocument::create(input))
            .await)
    }

    async fn get_paperwork_document(&self, id: Uuid) -> StoreResult<Option<PaperworkDocument>> {
        Ok(self.tables.paperwork_documents.get(id).await)
    }

    async fn list_paperwork_documents(&self, trucker_client_id: Uuid) -> StoreResult<Vec<PaperworkDocument>> {
        Ok(self.tables.paperwork_documents.for_client(trucker_client_id).await)
    }

    async fn update_paperwork_document(
        &self,
        id: Uuid,
        patch: PaperworkDocumentPatch,
    ) -> StoreResult<Option<PaperworkDocument>> {
        Ok(self.tables.paperwork_documents.update(id, |d| patch.apply(d)).await)
    }

    async fn delete_paperwork_document(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.tables.paperwork_documents.delete(id).await)
    }
}
