mod app;
mod choreography;
mod config;
mod overlay;
mod page;
mod stage;

use anyhow::Result;
use clap::Parser;

use blueprint_engine::device::GpuInit;
use blueprint_engine::logging::init_logging;
use blueprint_engine::window::{Runtime, RuntimeConfig};

use app::ShowcaseApp;
use config::ShowcaseConfig;

fn main() -> Result<()> {
    let config = ShowcaseConfig::parse();
    init_logging(config.logging());

    let runtime = RuntimeConfig {
        title: "Blueprint".to_string(),
        ..RuntimeConfig::default()
    };
    Runtime::run(runtime, GpuInit::default(), ShowcaseApp::new(config))
}
