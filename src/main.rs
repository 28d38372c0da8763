use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;

use junit_history::{parser, report, utils::config::Config};

#[derive(Parser)]
#[command(name = "junit-history")]
#[command(version)]
#[command(about = "Fold JUnit XML test reports into a rolling JSON history", long_about = None)]
struct Cli {
    /// Directory searched recursively for TEST-*.xml reports
    test_result_dir: PathBuf,

    /// Label stored with every record (e.g. unit, integration)
    test_type: String,

    /// JSON history file to update
    output_json_path: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::default();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.default_log_filter),
    )
    .init();

    println!(
        "{} Collecting {} results from: {}",
        "▶".green().bold(),
        cli.test_type.cyan(),
        cli.test_result_dir.display()
    );

    let now = chrono::Local::now();
    let extraction = parser::parse_xml_files(&cli.test_result_dir, &cli.test_type, &now);

    let files = extraction.files;
    let skipped = extraction.skipped_suites;
    let new_suites = extraction.suites.len();
    let new_cases = extraction.cases.len();

    let store = report::update_data_file(
        extraction.suites,
        extraction.cases,
        &cli.output_json_path,
        &config.retention,
    )?;

    println!(
        "{} {} files, {} suites, {} cases added{}",
        "✔".green().bold(),
        files,
        new_suites.to_string().cyan(),
        new_cases.to_string().cyan(),
        if skipped > 0 {
            format!(", {} suites skipped", skipped).yellow().to_string()
        } else {
            String::new()
        }
    );
    println!(
        "  History: {} suites, {} cases in {}",
        store.suites.len(),
        store.cases.len(),
        cli.output_json_path.display().to_string().cyan()
    );

    Ok(())
}
