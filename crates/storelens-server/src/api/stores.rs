use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_db_error, normalize_limit, ApiError, AppState, StoreInsightsResponse};

#[derive(Debug, Deserialize)]
pub(super) struct StoresQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub(super) struct StoreSummaryItem {
    id: i64,
    store_url: String,
    store_name: Option<String>,
    total_products: i32,
    last_analyzed: DateTime<Utc>,
}

pub(super) async fn list_stores(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<StoresQuery>, QueryRejection>,
) -> Result<Json<Vec<StoreSummaryItem>>, ApiError> {
    let Query(query) = query.map_err(|rejection| {
        ApiError::new(req_id.0.clone(), "validation_error", rejection.body_text())
    })?;

    let rows = storelens_db::list_store_summaries(&state.pool, normalize_limit(query.limit))
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let data = rows
        .into_iter()
        .map(|row| StoreSummaryItem {
            id: row.id,
            store_url: row.store_url,
            store_name: row.store_name,
            total_products: row.total_products,
            last_analyzed: row.last_analyzed,
        })
        .collect();

    Ok(Json(data))
}

pub(super) async fn get_store(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    store_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<StoreInsightsResponse>, ApiError> {
    let Path(store_id) = store_id.map_err(|_| {
        ApiError::new(
            req_id.0.clone(),
            "validation_error",
            "store_id must be an integer",
        )
    })?;

    let row = match storelens_db::get_store_insights(&state.pool, store_id).await {
        Ok(row) => row,
        Err(storelens_db::DbError::NotFound) => {
            return Err(ApiError::new(
                req_id.0,
                "not_found",
                format!("store {store_id} not found"),
            ));
        }
        Err(e) => return Err(map_db_error(req_id.0, &e)),
    };

    Ok(Json(StoreInsightsResponse {
        id: row.id,
        cached: true,
        insights: row.into_insights(),
    }))
}
