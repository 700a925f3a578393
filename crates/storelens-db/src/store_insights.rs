//! Database operations for the `store_insights` table.

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use storelens_core::BrandInsights;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A full row from `store_insights`, including the stored record.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StoreInsightsRow {
    pub id: i64,
    pub store_url: String,
    pub store_name: Option<String>,
    pub total_products: i32,
    pub insights: Json<BrandInsights>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StoreInsightsRow {
    #[must_use]
    pub fn into_insights(self) -> BrandInsights {
        self.insights.0
    }
}

/// Listing shape for `store_insights`, without the stored record.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StoreSummaryRow {
    pub id: i64,
    pub store_url: String,
    pub store_name: Option<String>,
    pub total_products: i32,
    pub last_analyzed: DateTime<Utc>,
}

const ROW_COLUMNS: &str =
    "id, store_url, store_name, total_products, insights, created_at, updated_at";

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Inserts the record for `insights.store_url`, or replaces the existing one.
///
/// The scalar columns are refreshed from the record and `updated_at` is
/// bumped. `created_at` and `id` are kept on conflict.
///
/// # Errors
///
/// Returns [`DbError::Serialize`] if the record cannot be encoded as JSON,
/// or [`DbError::Sqlx`] if the query fails.
pub async fn upsert_store_insights(
    pool: &PgPool,
    insights: &BrandInsights,
) -> Result<StoreInsightsRow, DbError> {
    let document = serde_json::to_value(insights)?;
    let total_products = i32::try_from(insights.total_products).unwrap_or(i32::MAX);

    let row = sqlx::query_as::<_, StoreInsightsRow>(&format!(
        "INSERT INTO store_insights (store_url, store_name, total_products, insights) \
         VALUES ($1, $2, $3, $4) \
         ON CONFLICT (store_url) DO UPDATE SET \
             store_name = EXCLUDED.store_name, \
             total_products = EXCLUDED.total_products, \
             insights = EXCLUDED.insights, \
             updated_at = NOW() \
         RETURNING {ROW_COLUMNS}"
    ))
    .bind(&insights.store_url)
    .bind(insights.store_name.as_deref())
    .bind(total_products)
    .bind(document)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Returns the row with the given id.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row has that id, or [`DbError::Sqlx`]
/// if the query fails.
pub async fn get_store_insights(pool: &PgPool, id: i64) -> Result<StoreInsightsRow, DbError> {
    sqlx::query_as::<_, StoreInsightsRow>(&format!(
        "SELECT {ROW_COLUMNS} FROM store_insights WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)
}

/// Returns the row for a normalized store URL, or `None` if it was never
/// analyzed.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn find_store_by_url(
    pool: &PgPool,
    store_url: &str,
) -> Result<Option<StoreInsightsRow>, DbError> {
    let row = sqlx::query_as::<_, StoreInsightsRow>(&format!(
        "SELECT {ROW_COLUMNS} FROM store_insights WHERE store_url = $1"
    ))
    .bind(store_url)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Lists stored stores, most recently analyzed first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_store_summaries(
    pool: &PgPool,
    limit: i64,
) -> Result<Vec<StoreSummaryRow>, DbError> {
    let rows = sqlx::query_as::<_, StoreSummaryRow>(
        "SELECT id, store_url, store_name, total_products, updated_at AS last_analyzed \
         FROM store_insights \
         ORDER BY updated_at DESC, id DESC \
         LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
