//! CRMDesk pipeline report.
//!
//! Prints the lead board, the deal board with column totals, the pipeline
//! summary, and task bucket counts.
//!
//! Usage: `crmdesk [snapshot.json]`. Without a snapshot the demo data is used.
//! `RUST_LOG=debug` shows store loading and mutation logs.

use std::path::PathBuf;

use crmdesk_lib::filter::{DealQuery, LeadQuery};
use crmdesk_lib::seed;
use crmdesk_lib::services::{deals, leads, tasks};
use crmdesk_lib::state::{load_config, Session};
use crmdesk_lib::store::EntityStore;
use crmdesk_lib::util::format_currency;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            log::warn!("Falling back to default settings: {}", e);
            Default::default()
        }
    };

    let store = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => EntityStore::load_from(&path)
            .map_err(|e| anyhow::anyhow!("Failed to load {}: {e}", path.display()))?,
        None => seed::demo_store(),
    };

    let session = Session::new(store).with_config(config);
    let store = &session.store;
    let today = session.today();

    println!("{}", session.config.workspace_name);
    println!();

    println!("Leads");
    for column in leads::lead_board(store, &LeadQuery::default()) {
        println!("  {:<20} {:>3}", column.title, column.count);
    }
    println!();

    println!("Deals");
    for column in deals::deal_board(store, &DealQuery::default()) {
        let total = column.total.map(format_currency).unwrap_or_default();
        println!("  {:<20} {:>3}  {:>12}", column.title, column.count, total);
    }
    let summary = deals::pipeline_summary(store);
    println!("  Pipeline value       {}", summary.pipeline_value_display());
    println!("  Weighted value       {}", summary.weighted_value_display());
    println!();

    println!("Tasks ({})", today);
    for (bucket, count) in tasks::bucket_counts(store, &today) {
        println!("  {:<20} {:>3}", bucket.label(), count);
    }
    let stats = tasks::task_stats(store, &today);
    println!(
        "  Completed {}, overdue {}, due today {}",
        stats.completed, stats.overdue, stats.due_today
    );

    Ok(())
}
