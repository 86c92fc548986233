//! Demo data seeding
//!
//! Fills an empty store with the consultancy dashboard's demo projects and
//! the three trucker subscription tiers. Each table is seeded only when it
//! is empty, so running the seed twice leaves the store unchanged.

use chrono::NaiveDate;
use manna_pricing::default_tiers;
use serde::Serialize;
use tracing::{info, instrument};

use crate::error::{StoreError, StoreResult};
use crate::project::{NewProject, ProjectStatus};
use crate::storage::Storage;

/// What a seeding pass inserted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedSummary {
    pub projects: usize,
    pub subscription_tiers: usize,
}

impl SeedSummary {
    /// Whether the pass inserted nothing.
    pub fn is_empty(&self) -> bool {
        self.projects == 0 && self.subscription_tiers == 0
    }
}

fn demo_projects() -> StoreResult<Vec<NewProject>> {
    let date = |y, m, d| {
        NaiveDate::from_ymd_opt(y, m, d)
            .ok_or_else(|| StoreError::Backend(format!("invalid seed date {y}-{m}-{d}")))
    };

    Ok(vec![
        NewProject {
            name: "Retail Demand Forecasting".to_string(),
            client: "GlobalRetail Inc.".to_string(),
            status: ProjectStatus::Active,
            progress: 75,
            due_date: date(2024, 12, 15)?,
            description: "Implementing LSTM models to predict inventory requirements across 500+ store locations."
                .to_string(),
        },
        NewProject {
            name: "Customer Sentiment Analysis".to_string(),
            client: "TechFlow Solutions".to_string(),
            status: ProjectStatus::Completed,
            progress: 100,
            due_date: date(2024, 10, 30)?,
            description: "Deployed NLP pipeline for real-time analysis of customer support tickets and social media mentions."
                .to_string(),
        },
        NewProject {
            name: "Quality Control Vision System".to_string(),
            client: "AutoMfg Corp".to_string(),
            status: ProjectStatus::InReview,
            progress: 90,
            due_date: date(2024, 11, 20)?,
            description: "Computer vision system for defect detection on the assembly line using edge computing."
                .to_string(),
        },
    ])
}

/// Seed demo projects and the default subscription tiers into empty tables.
#[instrument(skip(store))]
pub async fn seed_demo_data(store: &dyn Storage) -> StoreResult<SeedSummary> {
    let mut summary = SeedSummary::default();

    if store.list_projects().await?.is_empty() {
        for project in demo_projects()? {
            store.create_project(project).await?;
            summary.projects += 1;
        }
    } else {
        info!("Projects already present, skipping project seed");
    }

    if store.list_subscription_tiers().await?.is_empty() {
        for tier in default_tiers()? {
            store.create_subscription_tier(tier).await?;
            summary.subscription_tiers += 1;
        }
    } else {
        info!("Subscription tiers already present, skipping tier seed");
    }

    info!(
        projects = summary.projects,
        subscription_tiers = summary.subscription_tiers,
        "Demo data seeded"
    );
    Ok(summary)
}
