//! `POST /analyze-store`: analyze a storefront, or serve the stored record.

use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use chrono::Utc;
use serde::Deserialize;
use storelens_core::BrandInsights;
use storelens_scraper::ScraperError;

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, AppState, StoreInsightsResponse};

#[derive(Debug, Deserialize)]
pub(super) struct AnalyzeRequest {
    pub website_url: String,
    #[serde(default)]
    pub use_llm: bool,
    #[serde(default)]
    pub force_refresh: bool,
}

pub(super) async fn analyze_store(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<StoreInsightsResponse>, ApiError> {
    let Json(request) = body.map_err(|rejection| {
        ApiError::new(req_id.0.clone(), "validation_error", rejection.body_text())
    })?;

    let store_url = storelens_scraper::normalize_store_url(&request.website_url)
        .map_err(|e| ApiError::new(req_id.0.clone(), "validation_error", e.to_string()))?;

    if !request.force_refresh {
        let existing = storelens_db::find_store_by_url(&state.pool, &store_url)
            .await
            .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

        if let Some(row) = existing {
            let id = row.id;
            let insights = row.into_insights();
            if is_servable(&state, &insights, request.use_llm) {
                tracing::info!(store_url = %store_url, id, "serving cached insights");
                return Ok(Json(StoreInsightsResponse {
                    id,
                    cached: true,
                    insights,
                }));
            }
        }
    }

    let mut insights = storelens_scraper::analyze_store(&state.client, &store_url, Utc::now())
        .await
        .map_err(|e| map_scraper_error(req_id.0.clone(), &e))?;

    if request.use_llm {
        match &state.enhancer {
            Some(enhancer) => insights = enhancer.enhance(insights).await,
            None => tracing::warn!(
                store_url = %store_url,
                "LLM enhancement requested but no API key is configured"
            ),
        }
    }

    let row = storelens_db::upsert_store_insights(&state.pool, &insights)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    tracing::info!(
        store_url = %store_url,
        id = row.id,
        total_products = insights.total_products,
        enhanced = insights.enhanced,
        "stored insights"
    );

    Ok(Json(StoreInsightsResponse {
        id: row.id,
        cached: false,
        insights,
    }))
}

/// A stored record is served when it is within the cache TTL, unless the
/// caller asks for an LLM pass the record never had and one is available.
fn is_servable(state: &AppState, insights: &BrandInsights, use_llm: bool) -> bool {
    if !insights.is_fresh(Utc::now(), state.cache_ttl) {
        return false;
    }
    !(use_llm && state.enhancer.is_some() && !insights.enhanced)
}

fn map_scraper_error(request_id: String, error: &ScraperError) -> ApiError {
    match error {
        ScraperError::InvalidStoreUrl { .. } => {
            ApiError::new(request_id, "validation_error", error.to_string())
        }
        _ => {
            tracing::error!(error = %error, "store analysis failed");
            ApiError::new(request_id, "internal_error", "store analysis failed")
        }
    }
}
