//! Pattern, trend and insight commands.

use blossom_core::stats::{PatternAnalyzer, TrendReport};
use blossom_core::InsightGenerator;

use super::{CmdResult, Store};

pub fn patterns(json: bool) -> CmdResult {
    let store = Store::open()?;
    let analyzer = PatternAnalyzer::with_config(store.config.patterns.clone());
    let report = analyzer.analyze(store.session.log.entries());

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{report}");
    }
    Ok(())
}

pub fn trends(json: bool) -> CmdResult {
    let store = Store::open()?;
    let report = TrendReport::build(store.session.log.entries(), &store.config.dashboard);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    match report {
        TrendReport::Locked { remaining } => {
            println!("Log {remaining} more symptom(s) to unlock your trends.");
        }
        TrendReport::Ready(trends) => {
            println!("Average intensity by phase:");
            for group in &trends.phase_means {
                println!(
                    "  {:<18} {:<14} {:.1} ({} entries)",
                    group.phase.label(),
                    group.symptom.name(),
                    group.mean_intensity,
                    group.count
                );
            }
            println!();
            println!("Symptoms by cycle day:");
            for cell in &trends.cycle_day_frequency {
                println!("  day {:>2}  {:<14} x{}", cell.cycle_day, cell.symptom.name(), cell.count);
            }
        }
    }
    Ok(())
}

pub fn insight() -> CmdResult {
    let config = blossom_core::Config::load()?;
    let mut generator = InsightGenerator::new(config.insights.seed);
    println!("{}", generator.message());
    Ok(())
}
