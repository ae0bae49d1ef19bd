// API client module: an async HTTP client for the Atlas store-generation
// service. One `request` helper performs the authenticated call and
// normalizes the outcome; the public methods are thin typed wrappers over
// the service's endpoints.

pub mod types;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::Settings;
use crate::error::AtlasError;
use types::*;

/// Header carrying the API key on every call.
const API_KEY_HEADER: &str = "X-Atlas-Api-Key";

/// Maximum number of characters of a non-JSON body kept for diagnostics.
const SNIPPET_LIMIT: usize = 500;

/// Client for the Atlas API. Holds a reqwest client plus the resolved
/// settings (base URL and API key); construct it once and share it.
#[derive(Clone)]
pub struct AtlasClient {
    client: Client,
    settings: Settings,
}

impl AtlasClient {
    pub fn new(settings: Settings) -> Result<Self, AtlasError> {
        let client = Client::builder().build()?;
        Ok(AtlasClient { client, settings })
    }

    pub fn api_base(&self) -> &str {
        &self.settings.api_base
    }

    /// Perform one authenticated call and normalize the outcome.
    ///
    /// Fails fast with [`AtlasError::Unauthenticated`] before any network
    /// traffic when no API key is resolvable. A response whose content-type
    /// is not JSON becomes [`AtlasError::ProtocolMismatch`] with a truncated
    /// body snippet; a JSON response with a non-2xx status becomes
    /// [`AtlasError::ApiRejected`]. No retries happen at this layer.
    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> Result<T, AtlasError> {
        let api_key = self
            .settings
            .api_key
            .as_deref()
            .ok_or(AtlasError::Unauthenticated)?;

        let url = format!("{}{}", self.settings.api_base, endpoint);
        let mut builder = self
            .client
            .request(method.clone(), &url)
            .header(CONTENT_TYPE, "application/json")
            .header(API_KEY_HEADER, api_key);
        if !query.is_empty() {
            builder = builder.query(query);
        }
        if let Some(body) = body {
            builder = builder.json(&body);
        }

        log::debug!("{} {}", method, url);
        let response = builder.send().await?;
        let status = response.status();
        log::debug!("{} {} -> {}", method, url, status);

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        if !content_type.contains("application/json") {
            let text = response.text().await.unwrap_or_else(|_| String::new());
            return Err(AtlasError::ProtocolMismatch {
                status: status.as_u16(),
                content_type: if content_type.is_empty() {
                    "unknown".into()
                } else {
                    content_type
                },
                snippet: text.chars().take(SNIPPET_LIMIT).collect(),
            });
        }

        let data: Value = response.json().await?;
        if !status.is_success() {
            let message = data
                .get("error")
                .and_then(Value::as_str)
                .or_else(|| data.get("message").and_then(Value::as_str))
                .unwrap_or("API request failed")
                .to_string();
            return Err(AtlasError::ApiRejected {
                status: status.as_u16(),
                message,
                details: data,
            });
        }

        Ok(serde_json::from_value(data)?)
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, AtlasError> {
        self.request(Method::GET, endpoint, &[], None).await
    }

    async fn post<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: Value,
    ) -> Result<T, AtlasError> {
        self.request(Method::POST, endpoint, &[], Some(body)).await
    }

    /// Submit a store-generation job.
    pub async fn generate_store(
        &self,
        options: GenerateOptions,
    ) -> Result<GenerateResponse, AtlasError> {
        let body = serde_json::to_value(GenerateRequest::from(options))?;
        self.post("/stores/generate", body).await
    }

    /// Fetch the status of a generation job.
    pub async fn store_status(&self, job_id: &str) -> Result<StoreStatus, AtlasError> {
        self.get(&format!("/stores/{job_id}/status")).await
    }

    /// Submit an import of a generated store to Shopify.
    pub async fn import_store(
        &self,
        job_id: &str,
        options: ImportOptions,
    ) -> Result<ImportResponse, AtlasError> {
        let body = serde_json::to_value(ImportRequest::from(options))?;
        self.post(&format!("/stores/{job_id}/import"), body).await
    }

    /// Fetch the status of an import job.
    pub async fn import_status(&self, job_id: &str) -> Result<StoreStatus, AtlasError> {
        self.get(&format!("/stores/{job_id}/import_status")).await
    }

    /// List generated stores.
    pub async fn list_stores(
        &self,
        limit: u32,
        offset: u32,
    ) -> Result<ListStoresResponse, AtlasError> {
        self.get(&format!("/stores?limit={limit}&offset={offset}"))
            .await
    }

    /// Fetch one store record.
    pub async fn store(&self, id: i64) -> Result<Store, AtlasError> {
        self.get(&format!("/stores/{id}")).await
    }

    /// List Atlas theme templates.
    pub async fn list_templates(
        &self,
        limit: u32,
        offset: u32,
    ) -> Result<ListTemplatesResponse, AtlasError> {
        self.get(&format!("/templates?limit={limit}&offset={offset}"))
            .await
    }

    /// Fetch one template.
    pub async fn template(&self, id: i64) -> Result<Template, AtlasError> {
        self.get(&format!("/templates/{id}")).await
    }

    /// List the merchant's Shopify themes.
    pub async fn list_themes(&self) -> Result<ListThemesResponse, AtlasError> {
        self.get("/themes").await
    }

    /// Fetch one theme, including its product page templates.
    pub async fn theme(&self, id: i64) -> Result<Theme, AtlasError> {
        self.get(&format!("/themes/{id}")).await
    }

    /// Fetch the product page templates of a theme.
    pub async fn theme_product_templates(
        &self,
        theme_id: i64,
    ) -> Result<ThemeProductTemplatesResponse, AtlasError> {
        self.get(&format!("/themes/{theme_id}/product_templates"))
            .await
    }

    /// List the merchant's Shopify products, optionally filtered by a search
    /// query and paginated by cursor.
    pub async fn list_products(
        &self,
        limit: u32,
        cursor: Option<&str>,
        search: Option<&str>,
    ) -> Result<ListProductsResponse, AtlasError> {
        let mut query: Vec<(&str, String)> = vec![("limit", limit.to_string())];
        if let Some(cursor) = cursor {
            query.push(("cursor", cursor.to_string()));
        }
        if let Some(search) = search {
            query.push(("query", search.to_string()));
        }
        self.request(Method::GET, "/products", &query, None).await
    }

    /// Fetch one product.
    pub async fn product(&self, id: &str) -> Result<Product, AtlasError> {
        self.get(&format!("/products/{id}")).await
    }

    /// Submit a funnel-generation job (listicle or advertorial).
    pub async fn generate_funnel(
        &self,
        options: FunnelOptions,
    ) -> Result<FunnelResponse, AtlasError> {
        let body = serde_json::to_value(FunnelRequest::from(options))?;
        self.post("/funnels/generate", body).await
    }

    /// Fetch the status of a funnel job.
    pub async fn funnel_status(&self, job_id: &str) -> Result<FunnelStatus, AtlasError> {
        self.get(&format!("/funnels/{job_id}/status")).await
    }
}
