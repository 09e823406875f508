//! Fitcoach
//!
//! A local AI fitness coach: turns generative-model replies into
//! structured workout and nutrition plans, and answers similarity
//! queries against an on-disk exercise embedding index.
//!
//! # Usage
//!
//! ```bash
//! fitcoach profile set --user-id alice --age 30 --weight-kg 70 --height-cm 175 --gender female
//! fitcoach parse workout reply.json
//! fitcoach generate meal-plan prompt.txt
//! fitcoach index build catalog.json --out index.json
//! fitcoach search "upper body push" --index index.json --equipment dumbbells,bench
//! fitcoach alternatives "Bench Press" --index index.json --injury chest
//! ```
//!
//! # Configuration
//!
//! Configuration is loaded in order (later sources override earlier):
//! 1. Built-in defaults
//! 2. Config file (~/.config/fitcoach/config.toml)
//! 3. Environment variables (FITCOACH_*)
//! 4. CLI flags

use anyhow::Result;
use clap::Parser;

use fitcoach_cli::{run, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    run(Cli::parse()).await
}
