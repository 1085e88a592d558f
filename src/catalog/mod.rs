pub mod dto;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::config::Config;
use crate::error::AppError;
use crate::models::Course;

#[async_trait]
pub trait CatalogClient: Send + Sync {
    async fn fetch_courses(&self) -> Result<Vec<Course>, AppError>;
}

pub struct CatalogHttpClient {
    client: Client,
    url: String,
    semester: String,
}

impl CatalogHttpClient {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .map_err(|e| AppError::Config(format!("failed to build http client: {e}")))?;

        Ok(Self {
            client,
            url: config.catalog_url.clone(),
            semester: config.semester.clone(),
        })
    }
}

#[async_trait]
impl CatalogClient for CatalogHttpClient {
    async fn fetch_courses(&self) -> Result<Vec<Course>, AppError> {
        let payload = dto::QueryCoursesRequest::unrestricted(&self.semester);

        let response = self.client.post(&self.url).json(&payload).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Catalog(format!("catalog API error {status}: {body}")));
        }

        let body = response.text().await?;
        let courses = dto::decode_courses(&body)?;
        debug!("decoded {} course records from catalog response", courses.len());

        Ok(courses)
    }
}

pub struct NoopCatalogClient;

#[async_trait]
impl CatalogClient for NoopCatalogClient {
    async fn fetch_courses(&self) -> Result<Vec<Course>, AppError> {
        Ok(Vec::new())
    }
}
