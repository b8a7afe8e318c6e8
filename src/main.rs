// src/main.rs

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use console::style;
use debtoapg::{
    CliProgress, ConversionReport, Converter, DpkgDeb, LogProgress, ProgressReporter, Stage,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "debtoapg")]
#[command(author = "AnmiTaliDev")]
#[command(about = "Convert Debian (.deb) packages to AnmiTali Package Format (.apg)", long_about = None)]
struct Cli {
    /// Input .deb file
    input: Option<PathBuf>,

    /// Output .apg file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Show version information
    #[arg(long)]
    version: bool,
}

fn print_version() {
    println!();
    println!(
        "{}",
        style(format!(
            "AnmiTali/NurOS debtoapg v{}",
            env!("CARGO_PKG_VERSION")
        ))
        .green()
    );
    println!("{} GNU GPLv3", style("License:").blue());
    println!("{} AnmiTaliDev (taliildar)", style("Contributors:").blue());
    println!("{} https://github.com/NurOS-Linux/debtoapg", style("URL:").blue());
    println!("{} nuros.anmitali.kz", style("Site:").blue());
    println!();
}

fn print_banner() {
    println!();
    println!(
        "{}  {}",
        style("DebToApg Package Converter").green().bold(),
        style(format!("v{}", env!("CARGO_PKG_VERSION"))).dim()
    );
    println!("{}", style("© AnmiTali/NurOS Linux").cyan());
    println!();
}

fn run(input: &Path, output: &Path, progress: &dyn ProgressReporter) -> Result<ConversionReport> {
    Converter::new(DpkgDeb)
        .convert(input, output, progress)
        .with_context(|| format!("Conversion of {} failed", input.display()))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.version {
        print_version();
        return ExitCode::SUCCESS;
    }

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .init();

    let (input, output) = match (cli.input, cli.output) {
        (Some(input), Some(output)) => (input, output),
        _ => {
            Cli::command().print_help().ok();
            return ExitCode::FAILURE;
        }
    };

    print_banner();

    let progress: Box<dyn ProgressReporter> = if cli.verbose {
        Box::new(LogProgress::new())
    } else {
        Box::new(CliProgress::new(Stage::COUNT))
    };

    match run(&input, &output, progress.as_ref()) {
        Ok(report) => {
            let size_mb = report.archive_size as f64 / (1024.0 * 1024.0);
            println!(
                "{} Successfully created {} ({:.1} MB, {} files)",
                style("✔").green(),
                output.display(),
                size_mb,
                report.payload_files
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{} Error: {:#}", style("✖").red(), err);
            ExitCode::FAILURE
        }
    }
}
