// Wire types for the Atlas API. Request field names mirror the backend
// payloads exactly (lower snake_case); optional fields that were not
// supplied are omitted from the serialized body, never sent as null.

use serde::{Deserialize, Serialize};

use crate::poll::{JobState, StatusEnvelope};

/// Caller-facing options for `POST /stores/generate`. Everything is
/// optional; the client fills in the documented defaults for `region`,
/// `language` and `generation_type` at submission time.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    pub url: Option<String>,
    pub shopify_product_id: Option<String>,
    pub region: Option<String>,
    pub language: Option<String>,
    /// `single_product_shop` for a full store, `product_page` for a page only.
    pub generation_type: Option<String>,
    /// `atlas_library`, `existing_theme`, or `default`.
    pub template_source: Option<String>,
    pub template_id: Option<String>,
    /// Required by the backend for `product_page` generation.
    pub theme_id: Option<String>,
    /// `atlas_default` or `existing_page`.
    pub page_template_source: Option<String>,
    pub product_page_template: Option<String>,
    pub research_context_id: Option<String>,
}

/// Body of `POST /stores/generate`.
#[derive(Debug, Serialize)]
pub struct GenerateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shopify_product_id: Option<String>,
    pub region: String,
    pub language: String,
    #[serde(rename = "type")]
    pub generation_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_template_source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_page_template: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub research_context_id: Option<String>,
}

impl From<GenerateOptions> for GenerateRequest {
    fn from(options: GenerateOptions) -> Self {
        GenerateRequest {
            url: options.url,
            shopify_product_id: options.shopify_product_id,
            region: options.region.unwrap_or_else(|| "us".into()),
            language: options.language.unwrap_or_else(|| "en".into()),
            generation_type: options
                .generation_type
                .unwrap_or_else(|| "single_product_shop".into()),
            template_source: options.template_source,
            template_id: options.template_id,
            theme_id: options.theme_id,
            page_template_source: options.page_template_source,
            product_page_template: options.product_page_template,
            research_context_id: options.research_context_id,
        }
    }
}

/// Submission acknowledgement for a generation job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub job_id: String,
    pub status: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub generation_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poll_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Status envelope for generation and import jobs
/// (`GET /stores/{job_id}/status`, `GET /stores/{job_id}/import_status`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreStatus {
    pub job_id: String,
    pub status: JobState,
    #[serde(default)]
    pub percentage_complete: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<StoreResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Family-specific payload present when a store job completes. The server
/// is supposed to populate this only for `completed` jobs; the fields stay
/// optional so a misbehaving server degrades to `N/A` instead of a crash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_images: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme_id: Option<i64>,
}

impl StatusEnvelope for StoreStatus {
    fn state(&self) -> JobState {
        self.status
    }
    fn percentage_complete(&self) -> f64 {
        self.percentage_complete
    }
    fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Caller-facing options for `POST /stores/{job_id}/import`.
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Only import the product, not the theme.
    pub only_import_product: bool,
}

/// Body of `POST /stores/{job_id}/import`. The flag is omitted entirely
/// when unset, matching the backend's expectations.
#[derive(Debug, Serialize)]
pub struct ImportRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub only_import_product: Option<bool>,
}

impl From<ImportOptions> for ImportRequest {
    fn from(options: ImportOptions) -> Self {
        ImportRequest {
            only_import_product: options.only_import_product.then_some(true),
        }
    }
}

/// Submission acknowledgement for an import job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportResponse {
    pub import_job_id: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poll_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// One store record as returned by `/stores` and `/stores/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Store {
    pub id: i64,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(rename = "type")]
    pub store_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListStoresResponse {
    pub stores: Vec<Store>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// An Atlas theme template from the template library.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Template {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme_version_folder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub stores_using: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge_text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListTemplatesResponse {
    pub templates: Vec<Template>,
    pub total: i64,
    #[serde(default)]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

/// A theme installed on the merchant's shop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub is_atlas_theme: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub atlas_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_templates: Option<Vec<ProductTemplate>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductTemplate {
    pub key: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListThemesResponse {
    pub themes: Vec<Theme>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeProductTemplatesResponse {
    pub theme_id: i64,
    pub product_templates: Vec<ProductTemplate>,
}

/// A Shopify product, as surfaced by `/products`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub numeric_id: i64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_range: Option<PriceRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variants_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variants: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageInfo {
    pub has_next_page: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListProductsResponse {
    pub products: Vec<Product>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_info: Option<PageInfo>,
}

/// Caller-facing options for `POST /funnels/generate`. `funnel_type` and
/// `theme_id` are required by the backend; the CLI enforces their presence
/// before submission.
#[derive(Debug, Clone, Default)]
pub struct FunnelOptions {
    /// `listicle` or `advertorial`.
    pub funnel_type: String,
    pub theme_id: String,
    pub language: Option<String>,
    pub url: Option<String>,
    pub shopify_product_id: Option<String>,
    pub headline: Option<String>,
    /// `problem_solution`, `comparison`, `story`, or `urgency`.
    pub angle: Option<String>,
    /// `professional`, `casual`, `urgent`, or `luxury`.
    pub tone: Option<String>,
}

/// Body of `POST /funnels/generate`.
#[derive(Debug, Serialize)]
pub struct FunnelRequest {
    pub funnel_type: String,
    pub theme_id: String,
    pub language: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shopify_product_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub angle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tone: Option<String>,
}

impl From<FunnelOptions> for FunnelRequest {
    fn from(options: FunnelOptions) -> Self {
        FunnelRequest {
            funnel_type: options.funnel_type,
            theme_id: options.theme_id,
            language: options.language.unwrap_or_else(|| "en".into()),
            url: options.url,
            shopify_product_id: options.shopify_product_id,
            headline: options.headline,
            angle: options.angle,
            tone: options.tone,
        }
    }
}

/// Submission acknowledgement for a funnel job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunnelResponse {
    pub job_id: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub funnel_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poll_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Status envelope for funnel jobs (`GET /funnels/{job_id}/status`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunnelStatus {
    pub job_id: String,
    pub status: JobState,
    #[serde(default)]
    pub percentage_complete: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<FunnelResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunnelResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sections_count: Option<i64>,
}

impl StatusEnvelope for FunnelStatus {
    fn state(&self) -> JobState {
        self.status
    }
    fn percentage_complete(&self) -> f64 {
        self.percentage_complete
    }
    fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_request_omits_unset_optional_fields() {
        let request = GenerateRequest::from(GenerateOptions {
            url: Some("https://amazon.com/dp/B08N5WRWNW".into()),
            ..GenerateOptions::default()
        });
        let body = serde_json::to_value(&request).unwrap();
        let object = body.as_object().unwrap();
        assert_eq!(object.len(), 4);
        for key in ["url", "region", "language", "type"] {
            assert!(object.contains_key(key), "missing key {key}");
        }
        assert_eq!(body["region"], "us");
        assert_eq!(body["language"], "en");
        assert_eq!(body["type"], "single_product_shop");
    }

    #[test]
    fn import_request_omits_flag_when_unset() {
        let body =
            serde_json::to_value(ImportRequest::from(ImportOptions::default())).unwrap();
        assert_eq!(body, serde_json::json!({}));

        let body = serde_json::to_value(ImportRequest::from(ImportOptions {
            only_import_product: true,
        }))
        .unwrap();
        assert_eq!(body, serde_json::json!({ "only_import_product": true }));
    }

    #[test]
    fn funnel_request_defaults_language_and_skips_extras() {
        let request = FunnelRequest::from(FunnelOptions {
            funnel_type: "listicle".into(),
            theme_id: "123".into(),
            url: Some("https://example.com/p".into()),
            ..FunnelOptions::default()
        });
        let body = serde_json::to_value(&request).unwrap();
        let object = body.as_object().unwrap();
        assert_eq!(object["language"], "en");
        assert!(!object.contains_key("headline"));
        assert!(!object.contains_key("angle"));
        assert!(!object.contains_key("tone"));
        assert!(!object.contains_key("shopify_product_id"));
    }

    #[test]
    fn store_status_decodes_minimal_envelope() {
        let status: StoreStatus = serde_json::from_str(
            r#"{"job_id":"abc","status":"processing","percentage_complete":40}"#,
        )
        .unwrap();
        assert_eq!(status.status, JobState::Processing);
        assert_eq!(status.percentage_complete, 40.0);
        assert!(status.result.is_none());
        assert!(status.error.is_none());
    }

    #[test]
    fn funnel_status_carries_result_when_completed() {
        let status: FunnelStatus = serde_json::from_str(
            r#"{"job_id":"f1","status":"completed","percentage_complete":100,
                "result":{"page_title":"Top 10","page_handle":"top-10","sections_count":7}}"#,
        )
        .unwrap();
        assert_eq!(status.status, JobState::Completed);
        let result = status.result.unwrap();
        assert_eq!(result.page_handle.as_deref(), Some("top-10"));
        assert_eq!(result.sections_count, Some(7));
    }
}
