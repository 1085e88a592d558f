use std::sync::Arc;

use async_trait::async_trait;
use coursewatch::catalog::{CatalogClient, NoopCatalogClient};
use coursewatch::db::repository;
use coursewatch::error::AppError;
use coursewatch::models::Course;
use coursewatch::services::RefreshService;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

struct FixedCatalog {
    courses: Vec<Course>,
}

#[async_trait]
impl CatalogClient for FixedCatalog {
    async fn fetch_courses(&self) -> Result<Vec<Course>, AppError> {
        Ok(self.courses.clone())
    }
}

struct FailingCatalog;

#[async_trait]
impl CatalogClient for FailingCatalog {
    async fn fetch_courses(&self) -> Result<Vec<Course>, AppError> {
        Err(AppError::Catalog("catalog API error 500".to_string()))
    }
}

async fn setup_pool() -> SqlitePool {
    // one connection: a pooled in-memory database exists per connection
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create database");
    repository::ensure_schema(&pool)
        .await
        .expect("Failed to initialize schema");
    pool
}

fn course(no: &str, chosen: &str, restrict2: &str) -> Course {
    Course {
        semester: "1131".to_string(),
        course_no: no.to_string(),
        course_name: format!("Course {no}"),
        course_teacher: "Teacher".to_string(),
        choose_student: chosen.to_string(),
        restrict2: restrict2.to_string(),
        ..Default::default()
    }
}

async fn refresh_with(pool: &SqlitePool, courses: Vec<Course>) -> coursewatch::services::RefreshStats {
    let service = RefreshService::new(pool.clone(), Arc::new(FixedCatalog { courses }));
    service.refresh_once().await.expect("refresh failed")
}

#[tokio::test]
async fn available_set_filters_on_restrict2() {
    let pool = setup_pool().await;

    let stats = refresh_with(
        &pool,
        vec![course("CS101", "5", "10"), course("CS102", "20", "15")],
    )
    .await;

    assert_eq!(stats.fetched, 2);
    assert_eq!(stats.available, 1);

    let available = repository::fetch_available_courses(&pool)
        .await
        .expect("query failed");
    let numbers: Vec<&str> = available.iter().map(|c| c.course_no.as_str()).collect();
    assert_eq!(numbers, vec!["CS101"]);
}

#[tokio::test]
async fn empty_catalog_yields_empty_store() {
    let pool = setup_pool().await;

    let service = RefreshService::new(pool.clone(), Arc::new(NoopCatalogClient));
    let stats = service.refresh_once().await.expect("refresh failed");

    assert_eq!(stats.fetched, 0);
    assert_eq!(stats.available, 0);
    assert_eq!(
        repository::count_courses(&pool).await.expect("count failed"),
        0
    );
}

#[tokio::test]
async fn full_enrollment_is_not_available() {
    let pool = setup_pool().await;

    // strictly less than: chosen == limit means no seat
    refresh_with(&pool, vec![course("CS201", "10", "10")]).await;

    let available = repository::fetch_available_courses(&pool)
        .await
        .expect("query failed");
    assert!(available.is_empty());
}

#[tokio::test]
async fn refresh_is_idempotent() {
    let pool = setup_pool().await;
    let batch = vec![course("CS101", "5", "10"), course("CS102", "20", "15")];

    let first = refresh_with(&pool, batch.clone()).await;
    let second = refresh_with(&pool, batch).await;

    assert_eq!(first.available, second.available);
    assert_eq!(
        repository::count_courses(&pool).await.expect("count failed"),
        2
    );

    let courses = repository::fetch_courses(&pool).await.expect("read failed");
    let cs101 = courses
        .iter()
        .find(|c| c.course_no == "CS101")
        .expect("CS101 missing");
    assert_eq!(cs101.choose_student, "5");
    assert_eq!(cs101.restrict2, "10");
}

#[tokio::test]
async fn blank_restrict2_is_excluded_without_error() {
    let pool = setup_pool().await;

    refresh_with(&pool, vec![course("CS301", "5", ""), course("CS302", "5", "30")]).await;

    let available = repository::fetch_available_courses(&pool)
        .await
        .expect("query failed");
    let numbers: Vec<&str> = available.iter().map(|c| c.course_no.as_str()).collect();
    assert_eq!(numbers, vec!["CS302"]);
}

#[tokio::test]
async fn non_numeric_enrollment_is_excluded_without_error() {
    let pool = setup_pool().await;

    refresh_with(&pool, vec![course("CS401", "unlimited", "30")]).await;

    let available = repository::fetch_available_courses(&pool)
        .await
        .expect("query failed");
    assert!(available.is_empty());
    assert_eq!(
        repository::count_courses(&pool).await.expect("count failed"),
        1
    );
}

#[tokio::test]
async fn failed_fetch_leaves_store_untouched() {
    let pool = setup_pool().await;
    refresh_with(&pool, vec![course("CS101", "5", "10")]).await;

    let service = RefreshService::new(pool.clone(), Arc::new(FailingCatalog));
    let stats = service.refresh_once().await.expect("cycle should absorb fetch errors");

    assert_eq!(stats.fetched, 0);
    assert_eq!(stats.available, 1);
    assert_eq!(
        repository::count_courses(&pool).await.expect("count failed"),
        1
    );

    let courses = repository::fetch_courses(&pool).await.expect("read failed");
    assert_eq!(courses[0].course_no, "CS101");
    assert_eq!(courses[0].choose_student, "5");
}

#[tokio::test]
async fn reupsert_overwrites_existing_row() {
    let pool = setup_pool().await;

    refresh_with(&pool, vec![course("CS501", "5", "10")]).await;
    let stats = refresh_with(&pool, vec![course("CS501", "10", "10")]).await;

    assert_eq!(stats.available, 0);
    assert_eq!(
        repository::count_courses(&pool).await.expect("count failed"),
        1
    );

    let courses = repository::fetch_courses(&pool).await.expect("read failed");
    assert_eq!(courses[0].choose_student, "10");
}
