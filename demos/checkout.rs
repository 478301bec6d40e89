//! Checkout Receipt Example
//!
//! Loads a fixture set, reconciles gift lines, collects totals and prints the receipt.
//!
//! Use `-f` to load a fixture set by name
//! Use `-l` to set the log level (overridden by `RUST_LOG`)

use std::{io, io::Write, time::Instant};

use anyhow::Result;
use clap::Parser;
use humanize_duration::{Truncate, prelude::DurationExt};
use tracing_subscriber::EnvFilter;

use lattice_gifts::{
    fixtures::Fixture,
    gifts::{GiftItemManager, rule, rules::free_bottle::FreeBottleWithAnyBag},
    receipt::Receipt,
    totals::TotalsCollector,
    utils::ExampleCheckoutArgs,
};

/// Checkout Receipt Example
#[expect(clippy::print_stdout, reason = "Example program output to user")]
pub fn main() -> Result<()> {
    let args = ExampleCheckoutArgs::parse();

    tracing_subscriber::fmt()
        .compact()
        .with_target(true)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .init();

    let fixture = Fixture::from_set(&args.fixture)?;
    let mut cart = fixture.cart()?;

    let mut collector = TotalsCollector::with_default_collectors();

    if !args.no_gifts {
        let free_bottle =
            FreeBottleWithAnyBag::with_config(fixture.catalog(), fixture.rule_config().clone());

        collector = collector.with_gift_manager(GiftItemManager::new(rule(free_bottle)));
    }

    let start = Instant::now();

    collector.collect(&mut cart)?;

    let elapsed = start.elapsed();

    let receipt = Receipt::from_cart(&cart)?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    receipt.write_to(&mut handle)?;

    writeln!(
        handle,
        " {} ({}s)",
        elapsed.human(Truncate::Nano),
        elapsed.as_secs_f32()
    )?;

    println!();

    Ok(())
}
