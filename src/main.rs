use anyhow::Result;
use clap::Parser;
use cvescan::{
    checker::{default_checker, default_resolver, VersionOrdering},
    config::Config,
    logging,
    output::ResultSink,
    run_audit,
    scanner::{CommandProbe, RuntimeProbe},
};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

mod exit_codes {
    pub const SUCCESS: u8 = 0;
    pub const ERROR: u8 = 1;
}

#[derive(Parser)]
#[command(name = "cvescan")]
#[command(
    author,
    version,
    about = "Check the dependencies in a package.json against the NVD CVE database"
)]
struct Cli {
    /// Path to the package.json to scan
    #[arg(required_unless_present_any = ["init_config", "config_path"])]
    manifest: Option<PathBuf>,

    /// Config file to use instead of the default location
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Append diagnostics to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Results file to open (and append to with --write-results)
    #[arg(long)]
    results_file: Option<PathBuf>,

    /// Don't add the local runtime version to the scan
    #[arg(long)]
    no_runtime_probe: bool,

    /// Append a JSON summary of the run to the results file
    #[arg(long)]
    write_results: bool,

    /// Pick the latest registry version by semver precedence
    #[arg(long)]
    semver: bool,

    /// Write a default config file and exit
    #[arg(long)]
    init_config: bool,

    /// Print the config file path and exit
    #[arg(long)]
    config_path: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_codes::ERROR)
        }
    }
}

async fn run() -> Result<u8> {
    let cli = Cli::parse();
    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);

    if cli.config_path {
        println!("{}", config_path.display());
        return Ok(exit_codes::SUCCESS);
    }

    if cli.init_config {
        handle_init_config(&config_path)?;
        return Ok(exit_codes::SUCCESS);
    }

    let mut config = Config::load_from(&config_path)?;
    apply_overrides(&mut config, &cli);

    let Some(manifest) = cli.manifest else {
        anyhow::bail!("Usage: cvescan <path/to/package.json>");
    };

    let mut stdout = std::io::stdout().lock();
    scan(&config, &manifest, &mut stdout).await?;

    Ok(exit_codes::SUCCESS)
}

/// Runs one audit. The results file is only opened once the manifest has
/// been read and the scan has finished.
async fn scan(config: &Config, manifest: &Path, out: &mut dyn Write) -> Result<()> {
    let _log_guard = logging::init(&config.output.log_file, &config.log_level)?;

    let command_probe = CommandProbe::new(
        &config.runtime.name,
        &config.runtime.binary,
        &config.runtime.version_flag,
    );
    let probe: Option<&dyn RuntimeProbe> = if config.runtime.enabled {
        Some(&command_probe)
    } else {
        None
    };

    let resolver = default_resolver(config);
    let checker = default_checker(config);

    let result = run_audit(manifest, probe, &resolver, &checker, out).await?;

    let mut results = ResultSink::open(&config.output.results_file)?;
    if config.output.write_results {
        results.record(&result)?;
        tracing::info!("Results appended to {}", results.path().display());
    }

    Ok(())
}

fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(path) = &cli.log_file {
        config.output.log_file = path.clone();
    }
    if let Some(path) = &cli.results_file {
        config.output.results_file = path.clone();
    }
    if cli.no_runtime_probe {
        config.runtime.enabled = false;
    }
    if cli.write_results {
        config.output.write_results = true;
    }
    if cli.semver {
        config.version_ordering = VersionOrdering::Semver;
    }
}

fn handle_init_config(config_path: &Path) -> Result<()> {
    if config_path.exists() {
        println!("Config file already exists at: {}", config_path.display());
        return Ok(());
    }

    Config::default().save_to(config_path)?;
    println!("Created config file at: {}", config_path.display());
    println!();
    println!("Default configuration:");
    println!("{}", Config::generate_default_config());
    Ok(())
}
