use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use crate::catalog::CatalogClient;
use crate::db::repository;
use crate::error::AppError;

pub struct RefreshService {
    db: SqlitePool,
    catalog: Arc<dyn CatalogClient>,
}

/// Counters for one fetch-upsert-query cycle.
#[derive(Debug, Serialize)]
pub struct RefreshStats {
    pub fetched: usize,
    pub available: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RefreshService {
    pub fn new(db: SqlitePool, catalog: Arc<dyn CatalogClient>) -> Self {
        Self { db, catalog }
    }

    /// Runs one reconcile cycle: fetch a catalog snapshot, mirror it into the
    /// store, then recompute the available set.
    ///
    /// A failed fetch degrades to an empty batch so a network problem never
    /// touches rows already mirrored. Store errors propagate to the caller.
    pub async fn refresh_once(&self) -> Result<RefreshStats, AppError> {
        let started_at = Utc::now();
        info!("starting catalog refresh");

        let courses = match self.catalog.fetch_courses().await {
            Ok(courses) => courses,
            Err(e) => {
                warn!("catalog fetch failed, continuing with empty batch: {e}");
                Vec::new()
            }
        };
        info!("fetched {} courses from the catalog", courses.len());

        let upserted = repository::upsert_courses(&self.db, &courses).await?;
        debug!("mirrored {upserted} records into the store");

        let available = repository::fetch_available_courses(&self.db).await?;
        for course in &available {
            debug!(
                "open seats: {} {} ({}/{})",
                course.course_no, course.course_name, course.choose_student, course.restrict2
            );
        }

        let stats = RefreshStats {
            fetched: courses.len(),
            available: available.len(),
            started_at,
            finished_at: Utc::now(),
        };
        info!(
            "refresh complete: {} courses fetched, {} currently available",
            stats.fetched, stats.available
        );
        Ok(stats)
    }
}
