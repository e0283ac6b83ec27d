//! Terminal front end for the patient chart.

mod commands;
mod repl;

use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use patient_chart_core::api::{ClientConfig, HttpPatientApi, DEFAULT_BASE_URL};
use patient_chart_core::app::AppShell;

#[derive(Parser, Debug)]
#[command(name = "patient-chart", version, about = "Browse and register patients")]
struct Cli {
    /// Base URL of the patient records service
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let api = HttpPatientApi::new(&ClientConfig::new(cli.base_url.clone()))
        .with_context(|| format!("cannot use records service at {}", cli.base_url))?;
    info!("Using records service at {}", api.base_url());

    let mut shell = AppShell::new();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    write!(out, "{}", shell.render())?;
    out.flush()?;
    shell.mount(&api);
    write!(out, "{}", shell.render())?;

    let stdin = io::stdin();
    repl::run(&mut shell, &api, stdin.lock(), &mut out)?;
    Ok(())
}
