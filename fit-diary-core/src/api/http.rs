//! HTTP implementation of [`DiaryApi`].

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::envelope::Envelope;
use super::{ApiError, BatchReceipt, DiaryApi, PageDefaults};
use crate::models::{MealType, MeasurementUnit, PendingDiaryEntry};
use crate::nutrition::{Conversion, ConversionParams};

const UNITS_PATH: &str = "/api/get_units.php";
const CONVERSION_PATH: &str = "/api/calculate_nutrition.php";
const BATCH_PATH: &str = "/api/log_meal_batch.php";
const PAGE_DEFAULTS_PATH: &str = "/api/get_add_food_data.php";

#[derive(Serialize)]
struct BatchPayload<'a> {
    batch: &'static str,
    items: &'a [PendingDiaryEntry],
}

/// Client for the diary server.
#[derive(Debug, Clone)]
pub struct HttpDiaryApi {
    base_url: String,
    token: Option<String>,
    client: Client,
}

impl HttpDiaryApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            client: Client::new(),
        }
    }

    /// Sends `Authorization: Bearer <token>` with every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds an absolute URL for `path`, defaulting to plain http.
    fn build_url(&self, path: &str) -> String {
        let base_url = if !self.base_url.starts_with("http://")
            && !self.base_url.starts_with("https://")
        {
            format!("http://{}", self.base_url)
        } else {
            self.base_url.clone()
        };

        format!("{}{}", base_url.trim_end_matches('/'), path)
    }

    fn request(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.request(self.client.get(self.build_url(path)))
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.request(self.client.post(self.build_url(path)))
    }

    async fn read_envelope<T: DeserializeOwned>(
        response: Response,
    ) -> Result<Envelope<T>, ApiError> {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthenticated);
        }
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()));
        }

        let text = response.text().await?;
        if text.trim().is_empty() {
            return Err(ApiError::EmptyResponse);
        }

        serde_json::from_str(&text).map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl DiaryApi for HttpDiaryApi {
    async fn units_for_item(&self, item_id: u64) -> Result<Vec<MeasurementUnit>, ApiError> {
        debug!(item_id, "Fetching units for item");
        let food_id = item_id.to_string();
        let response = self
            .get(UNITS_PATH)
            .query(&[("action", "for_food"), ("food_id", food_id.as_str())])
            .send()
            .await?;

        Self::read_envelope(response).await?.into_data()
    }

    async fn unit_catalog(&self) -> Result<Vec<MeasurementUnit>, ApiError> {
        debug!("Fetching unit catalog");
        let response = self
            .get(UNITS_PATH)
            .query(&[("action", "all")])
            .send()
            .await?;

        Self::read_envelope(response).await?.into_data()
    }

    async fn convert(&self, params: &ConversionParams) -> Result<Conversion, ApiError> {
        debug!(?params, "Requesting nutrition conversion");
        let form = [
            ("food_id", params.item_id.to_string()),
            ("quantity", params.quantity.to_string()),
            ("unit_id", params.unit_id.clone()),
            ("is_recipe", if params.is_recipe { "1" } else { "0" }.to_string()),
        ];
        let response = self.post(CONVERSION_PATH).form(&form).send().await?;

        Self::read_envelope(response).await?.into_data()
    }

    async fn log_batch(&self, entries: &[PendingDiaryEntry]) -> Result<BatchReceipt, ApiError> {
        debug!(count = entries.len(), "Submitting diary batch");
        let payload = BatchPayload {
            batch: "1",
            items: entries,
        };
        let response = self.post(BATCH_PATH).json(&payload).send().await?;

        let envelope: Envelope<serde_json::Value> = Self::read_envelope(response).await?;
        let envelope = envelope.ensure_success()?;
        Ok(BatchReceipt {
            message: envelope.reason().map(str::to_string),
        })
    }

    async fn page_defaults(
        &self,
        date: Option<NaiveDate>,
        meal_type: Option<MealType>,
    ) -> Result<PageDefaults, ApiError> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(date) = date {
            query.push(("date", date.to_string()));
        }
        if let Some(meal_type) = meal_type {
            query.push(("meal_type", meal_type.slug().to_string()));
        }

        let response = self.get(PAGE_DEFAULTS_PATH).query(&query).send().await?;

        Self::read_envelope(response).await?.into_data()
    }
}
