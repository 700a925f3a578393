use storelens_db::StoreSummaryRow;

/// Print stored storefronts as a table, most recently analyzed first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub(crate) async fn run_stores(pool: &sqlx::PgPool, limit: i64) -> anyhow::Result<()> {
    let rows = storelens_db::list_store_summaries(pool, limit).await?;

    if rows.is_empty() {
        println!("no stores found; run `analyze <url> --save` first");
        return Ok(());
    }

    println!(
        "{:<7}{:<40}{:<26}{:>9}  LAST ANALYZED",
        "ID", "STORE URL", "NAME", "PRODUCTS"
    );
    for row in &rows {
        println!("{}", format_row(row));
    }

    Ok(())
}

fn format_row(row: &StoreSummaryRow) -> String {
    format!(
        "{:<7}{:<40}{:<26}{:>9}  {}",
        row.id,
        truncate(&row.store_url, 38),
        truncate(row.store_name.as_deref().unwrap_or("\u{2014}"), 24),
        row.total_products,
        row.last_analyzed.format("%Y-%m-%d %H:%M")
    )
}

fn truncate(value: &str, max_chars: usize) -> String {
    if value.chars().count() > max_chars {
        format!("{}...", value.chars().take(max_chars - 3).collect::<String>())
    } else {
        value.to_string()
    }
}
