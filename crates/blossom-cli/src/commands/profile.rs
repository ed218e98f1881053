//! Onboarding and cycle status.

use blossom_core::cycle::format_cycle_day;
use blossom_core::OnboardingForm;
use chrono::NaiveDate;
use clap::Args;
use serde::Serialize;

use super::{CmdResult, Store};

#[derive(Args)]
pub struct OnboardArgs {
    /// Your name
    #[arg(long)]
    pub name: String,
    /// Your age
    #[arg(long)]
    pub age: Option<u32>,
    /// Average cycle length in days
    #[arg(long)]
    pub cycle_length: Option<u32>,
    /// First day of your last period (YYYY-MM-DD)
    #[arg(long)]
    pub last_period: Option<NaiveDate>,
}

pub fn onboard(args: OnboardArgs) -> CmdResult {
    let mut store = Store::open()?;
    let form = OnboardingForm {
        name: args.name,
        age: args.age,
        cycle_length: args.cycle_length,
        last_period_date: args.last_period,
    };

    let welcome = store
        .session
        .complete_onboarding(&form, &store.config.cycle)?
        .welcome_message();
    store.save()?;
    println!("{welcome}");
    Ok(())
}

#[derive(Serialize)]
struct Status<'a> {
    name: &'a str,
    date: NaiveDate,
    cycle_day: Option<u32>,
    cycle_length: u32,
    phase: String,
    entries: usize,
}

pub fn status(today: NaiveDate, json: bool) -> CmdResult {
    let store = Store::open()?;
    let profile = store.session.profile()?;
    let position = profile.position_on(today);

    let status = Status {
        name: &profile.name,
        date: today,
        cycle_day: position.cycle_day,
        cycle_length: position.cycle_length,
        phase: position.phase.label().to_string(),
        entries: store.session.log.len(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("Name:        {}", status.name);
        println!("Date:        {}", status.date);
        println!("Cycle day:   {} of {}", format_cycle_day(status.cycle_day), status.cycle_length);
        println!("Phase:       {}", status.phase);
        println!("Entries:     {}", status.entries);
    }
    Ok(())
}
