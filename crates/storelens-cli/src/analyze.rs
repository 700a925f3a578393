use chrono::Utc;
use storelens_core::AppConfig;
use storelens_enhancer::{Enhancer, EnhancerError};
use storelens_scraper::StorefrontClient;

/// Analyze one storefront and print the record as pretty JSON on stdout.
///
/// With `llm`, the record goes through the enhancer first. With `save`, it is
/// upserted and the row id is reported on stderr.
///
/// # Errors
///
/// Returns an error if the URL is invalid, `llm` is set without an API key,
/// or saving fails.
pub(crate) async fn run_analyze(
    config: &AppConfig,
    url: &str,
    llm: bool,
    save: bool,
) -> anyhow::Result<()> {
    let enhancer = if llm {
        match Enhancer::new(config.llm.clone()) {
            Ok(enhancer) => Some(enhancer),
            Err(EnhancerError::Disabled) => {
                anyhow::bail!("--llm requires OPENAI_API_KEY to be set")
            }
            Err(e) => return Err(e.into()),
        }
    } else {
        None
    };

    let client = StorefrontClient::new(
        config.scraper_request_timeout_secs,
        &config.scraper_user_agent,
    )?;
    let mut record = storelens_scraper::analyze_store(&client, url, Utc::now()).await?;

    if let Some(enhancer) = &enhancer {
        record = enhancer.enhance(record).await;
        if !record.enhanced {
            eprintln!("warning: LLM enhancement failed; printing the raw record");
        }
    }

    if save {
        let pool = super::connect(config).await?;
        let row = storelens_db::upsert_store_insights(&pool, &record).await?;
        eprintln!("saved {} as store {}", row.store_url, row.id);
    }

    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}
