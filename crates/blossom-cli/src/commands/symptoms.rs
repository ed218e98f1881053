//! Symptom logging commands.

use blossom_core::cycle::format_cycle_day;
use blossom_core::{InsightGenerator, Intensity, Symptom, SymptomEntry};
use chrono::NaiveDate;
use clap::Args;

use super::{CmdResult, Store};

#[derive(Args)]
pub struct LogArgs {
    /// Symptom name (e.g. "Cramps", "Mood swings"); anything else is kept as written
    pub symptom: String,
    /// Intensity from 1 (mild) to 5 (severe)
    #[arg(short, long, default_value_t = 3)]
    pub intensity: i64,
    /// Free-text notes
    #[arg(long, default_value = "")]
    pub notes: String,
}

pub fn log(args: LogArgs, today: NaiveDate) -> CmdResult {
    let intensity = Intensity::new(args.intensity)?;
    let symptom = Symptom::from_name(&args.symptom);

    let mut store = Store::open()?;
    // the entry about to be logged is what may trigger the insight
    let mut insights = InsightGenerator::for_log(store.config.insights.seed, store.session.log.len() + 1);
    let every_n = store.config.insights.every_n_logs;
    let outcome = store
        .session
        .log_symptom(today, symptom, intensity, args.notes, &mut insights, every_n)?;
    store.save()?;

    let entry = &outcome.entry;
    println!(
        "Logged {} on cycle day {} ({})",
        entry.summary(),
        format_cycle_day(entry.cycle_day),
        entry.phase
    );
    if let Some(insight) = outcome.insight {
        println!("{insight}");
    }
    Ok(())
}

pub fn recent(count: usize, json: bool) -> CmdResult {
    let store = Store::open()?;
    let entries: Vec<&SymptomEntry> = store.session.log.recent(count).collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }
    if entries.is_empty() {
        println!("No symptoms logged yet.");
        return Ok(());
    }
    for entry in entries {
        println!("{}  {}", entry.date, entry.summary());
    }
    Ok(())
}
