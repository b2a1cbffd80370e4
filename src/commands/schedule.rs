use anyhow::Result;
use chrono::{DateTime, Utc};

use berthwatch::config::Config;
use berthwatch::render;
use berthwatch::workflow::Session;

use super::report_partial;

/// Fetch, normalize and print the schedule
pub async fn schedule(config: Config, since: Option<DateTime<Utc>>, json: bool) -> Result<()> {
    let mut session = Session::new(&config)?;
    let snapshot = session.load_schedule(since).await;

    tracing::info!(
        raw_entries = snapshot.raw_entries,
        records = snapshot.records.len(),
        schema = %session.key_schema(),
        "Schedule loaded"
    );

    report_partial(snapshot.failure.as_ref(), snapshot.truncated);

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot.records)?);
        return Ok(());
    }

    if snapshot.is_empty() {
        println!("No schedule data returned for the requested window.");
        return Ok(());
    }

    println!(
        "Schedule ({} vessels, key: {})",
        snapshot.records.len(),
        session.key_schema()
    );
    println!("{}", render::schedule_table(&snapshot.records));
    Ok(())
}
