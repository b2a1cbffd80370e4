use anyhow::Result;
use chrono::{DateTime, Utc};
use serde_json::json;

use berthwatch::config::Config;
use berthwatch::orders::OrderSource;
use berthwatch::reconcile::MatchFilter;
use berthwatch::render;
use berthwatch::workflow::{Session, WorkflowOutcome};

use super::report_partial;

/// Which extra tables to print after the matched rows
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportOptions {
    pub unmatched: bool,
    pub unused: bool,
    pub json: bool,
}

/// Run one reconciliation pass and print the result
pub async fn reconcile(
    config: Config,
    source: OrderSource,
    since: Option<DateTime<Utc>>,
    filter: MatchFilter,
    options: ReportOptions,
) -> Result<()> {
    let mut session = Session::new(&config)?;

    let report = match session.run(&source, since).await? {
        WorkflowOutcome::AwaitingInput { mode } => {
            tracing::info!(mode, "No order input provided");
            println!(
                "Awaiting order input: pass --upload <file>, --text, --text-file or --sample."
            );
            return Ok(());
        }
        WorkflowOutcome::NoData { failure } => {
            report_partial(failure.as_ref(), false);
            println!("No schedule data returned for the requested window; nothing to reconcile.");
            return Ok(());
        }
        WorkflowOutcome::Completed(report) => report,
    };

    report_partial(report.schedule.failure.as_ref(), report.schedule.truncated);

    let reconciliation = &report.reconciliation;
    let rows: Vec<_> = reconciliation.filtered(&filter).collect();
    let summary = reconciliation.summary();

    if options.json {
        let mut body = json!({
            "schema": reconciliation.schema,
            "summary": summary,
            "matched": rows,
        });
        if options.unmatched {
            body["unmatched"] = json!(reconciliation.unmatched().collect::<Vec<_>>());
        }
        if options.unused {
            body["unused_schedule"] = json!(reconciliation.unused_schedule);
        }
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    if report.schedule.from_cache {
        println!("(schedule served from cache)");
    }
    println!("Showing {} results", rows.len());
    println!("{}", render::matched_table(rows.iter().copied()));
    println!(
        "\n{} orders, {} with forecast, {} unmatched, {} unused schedule entries",
        summary.orders, summary.with_forecast, summary.unmatched, summary.unused_schedule
    );

    if options.unmatched {
        println!("\nOrders without a forecast:");
        println!("{}", render::matched_table(reconciliation.unmatched()));
    }

    if options.unused {
        println!("\nSchedule entries not referenced by any order:");
        println!("{}", render::schedule_table(&reconciliation.unused_schedule));
    }

    Ok(())
}
