//! Utils

use clap::Parser;

/// Arguments for the checkout demo
#[derive(Debug, Parser)]
pub struct ExampleCheckoutArgs {
    /// Fixture set to use for the catalog, cart & gifting rules
    #[clap(short, long, default_value = "bags")]
    pub fixture: String,

    /// Log level used when `RUST_LOG` is not set
    #[clap(short, long, default_value = "info")]
    pub log_level: String,

    /// Skip gift reconciliation and only collect totals
    #[clap(long)]
    pub no_gifts: bool,
}
