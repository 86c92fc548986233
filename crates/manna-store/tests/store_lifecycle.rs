//! DataStore behavior through the public API

use chrono::NaiveDate;
use manna_store::{
    seed_demo_data, DataStore, FuelExpensePatch, NewFuelExpense, NewMileageLog, NewTruckerClient,
    ProjectPatch, ProjectStatus, Storage, StoreConfig, StoreError,
};
use rust_decimal::Decimal;
use uuid::Uuid;

fn open_store() -> DataStore {
    DataStore::open(StoreConfig::default()).unwrap()
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
}

async fn seeded_client(store: &DataStore) -> Uuid {
    seed_demo_data(store).await.unwrap();
    let tiers = store.list_subscription_tiers().await.unwrap();
    let client = store
        .create_trucker_client(NewTruckerClient {
            company_name: "Red Line Hauling".to_string(),
            contact_person: Some("Sam Ortiz".to_string()),
            email: "dispatch@redline.example".to_string(),
            phone: None,
            address: None,
            subscription_tier_id: tiers[0].id,
            subscription_start_date: None,
            is_active: None,
        })
        .await
        .unwrap();
    assert!(client.is_active);
    client.id
}

#[tokio::test]
async fn test_seeded_tiers_come_back_in_order() {
    let store = open_store();
    seed_demo_data(&store).await.unwrap();

    let names: Vec<String> = store
        .list_subscription_tiers()
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.name)
        .collect();
    assert_eq!(names, vec!["Basic", "Professional", "Enterprise"]);
}

#[tokio::test]
async fn test_project_patch_updates_only_given_fields() {
    let store = open_store();
    seed_demo_data(&store).await.unwrap();
    let project = store.list_projects().await.unwrap().remove(0);

    let updated = store
        .update_project(
            project.id,
            ProjectPatch {
                status: Some(ProjectStatus::Completed),
                progress: Some(100),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.status, ProjectStatus::Completed);
    assert_eq!(updated.progress, 100);
    assert_eq!(updated.name, project.name);
    assert_eq!(updated.due_date, project.due_date);
}

#[tokio::test]
async fn test_out_of_range_progress_is_rejected() {
    let store = open_store();
    seed_demo_data(&store).await.unwrap();
    let project = store.list_projects().await.unwrap().remove(0);

    let err = store
        .update_project(
            project.id,
            ProjectPatch {
                progress: Some(140),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();

    match err {
        StoreError::Validation(v) => assert!(v.field_errors.contains_key("progress")),
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_expenses_are_scoped_to_their_client() {
    let store = open_store();
    let client_id = seeded_client(&store).await;
    let other_id = Uuid::now_v7();

    store
        .create_mileage_log(NewMileageLog {
            trucker_client_id: client_id,
            log_date: day(3),
            miles_driven: Decimal::new(4125, 1),
            notes: None,
        })
        .await
        .unwrap();
    store
        .create_mileage_log(NewMileageLog {
            trucker_client_id: other_id,
            log_date: day(4),
            miles_driven: Decimal::new(100, 0),
            notes: None,
        })
        .await
        .unwrap();

    let logs = store.list_mileage_logs(client_id).await.unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].miles_driven, Decimal::new(4125, 1));
}

#[tokio::test]
async fn test_fuel_expense_lifecycle() {
    let store = open_store();
    let client_id = seeded_client(&store).await;

    let expense = store
        .create_fuel_expense(NewFuelExpense {
            trucker_client_id: client_id,
            expense_date: day(5),
            gallons: Decimal::new(1205, 1),
            cost_per_gallon: Decimal::new(3899, 3),
            total_cost: None,
            location: Some("Amarillo, TX".to_string()),
        })
        .await
        .unwrap();
    // 120.5 * 3.899 = 469.8295
    assert_eq!(expense.total_cost, Decimal::new(46983, 2));

    let patched = store
        .update_fuel_expense(
            expense.id,
            FuelExpensePatch {
                total_cost: Some(Decimal::new(47000, 2)),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(patched.total_cost, Decimal::new(47000, 2));

    assert!(store.delete_fuel_expense(expense.id).await.unwrap());
    assert!(!store.delete_fuel_expense(expense.id).await.unwrap());
    assert!(store.get_fuel_expense(expense.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_negative_amount_is_rejected() {
    let store = open_store();
    let client_id = seeded_client(&store).await;

    let err = store
        .create_fuel_expense(NewFuelExpense {
            trucker_client_id: client_id,
            expense_date: day(6),
            gallons: Decimal::new(-1, 0),
            cost_per_gallon: Decimal::new(3, 0),
            total_cost: None,
            location: None,
        })
        .await
        .unwrap_err();

    match err {
        StoreError::Validation(v) => {
            assert_eq!(v.field_errors["gallons"], vec!["must not be negative".to_string()]);
        }
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_close_is_shared_across_clones() {
    let store = open_store();
    let handle = store.clone();
    store.close();
    store.close();

    assert!(matches!(
        handle.list_trucker_clients().await,
        Err(StoreError::Closed)
    ));
    assert!(matches!(
        seed_demo_data(&handle).await,
        Err(StoreError::Closed)
    ));
}
