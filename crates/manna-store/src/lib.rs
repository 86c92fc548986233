//! # Manna Store
//!
//! Records, boundary validation, and data access for the Manna Solutions
//! platform.
//!
//! ## Overview
//!
//! The manna-store crate handles:
//! - **Consulting records**: Projects, contact messages, and demo requests
//! - **Trucker records**: Clients and their mileage, fuel, maintenance, food,
//!   and paperwork entries
//! - **Subscription tiers**: Persisted as authored by `manna-pricing`
//! - **Validation**: Typed input structs checked before they reach storage
//! - **Data access**: The [`Storage`] trait, an in-memory backend, and the
//!   [`DataStore`] handle that owns the backend's lifecycle
//!
//! ## Architecture
//!
//! ```text
//! DataStore::open(config)
//!   └─ Arc<dyn Storage>
//!        ├─ InMemoryStore (feature "memory")
//!        └─ any other backend implementing Storage
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use manna_store::{DataStore, NewContact, Storage, StoreConfig};
//!
//! # async fn example() -> manna_store::StoreResult<()> {
//! let store = DataStore::open(StoreConfig::default())?;
//! let contact = store
//!     .create_contact(NewContact {
//!         name: "Dana".to_string(),
//!         email: "dana@example.com".to_string(),
//!         message: "Interested in demand forecasting".to_string(),
//!     })
//!     .await?;
//! assert_eq!(store.list_contacts().await?.len(), 1);
//! # let _ = contact;
//! store.close();
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `memory`: In-memory backend (enabled by default)

pub mod client;
pub mod error;
pub mod expense;
pub mod handle;
pub mod inquiry;
#[cfg(feature = "memory")]
pub mod memory;
pub mod project;
pub mod seed;
pub mod storage;
pub mod validation;

pub use client::{NewTruckerClient, TruckerClient, TruckerClientPatch};
pub use error::{StoreError, StoreResult, ValidationError};
pub use expense::{
    FoodExpense, FoodExpensePatch, FuelExpense, FuelExpensePatch, MaintenanceExpense,
    MaintenanceExpensePatch, MileageLog, MileageLogPatch, NewFoodExpense, NewFuelExpense,
    NewMaintenanceExpense, NewMileageLog, NewPaperworkDocument, PaperworkDocument,
    PaperworkDocumentPatch,
};
pub use handle::{BackendKind, DataStore, StoreConfig};
pub use inquiry::{Contact, DemoRequest, NewContact, NewDemoRequest};
#[cfg(feature = "memory")]
pub use memory::{InMemoryStore, StoreStats};
pub use project::{NewProject, Project, ProjectPatch, ProjectStatus};
pub use seed::{seed_demo_data, SeedSummary};
pub use storage::Storage;
pub use validation::validate_input;
