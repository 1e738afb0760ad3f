//! # consumer-insights command line
//!
//! ```text
//! main()
//!   │
//!   ├─> Parse CLI arguments (clap)
//!   ├─> Load settings (--config or the platform config directory)
//!   ├─> Initialise tracing
//!   └─> Run the subcommand
//! ```
//!
//! ```bash
//! consumer-insights detect shopping_behavior.csv
//! consumer-insights dashboard Airbnb_Open_Data.csv -f room_type="Private room" -f price_max=300
//! ```

#![warn(clippy::all, rust_2018_idioms)]
#![expect(clippy::print_stdout)] // Allow println! in main binary

mod cli;

use anyhow::Result;
use clap::Parser as _;
use consumer_insights::logging;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    let settings = cli.load_settings()?;

    logging::init(&settings.logging)?;
    tracing::debug!(?settings, "Settings loaded");

    cli::run_command(cli.command, settings)
}
