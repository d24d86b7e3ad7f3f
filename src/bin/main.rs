use clap::Parser;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;
use wizard_runner::{
    drive, AutoConfig, OptionChoice, Prompter, RunOutcome, Session, TermPrompter, WizardOptions,
};

/// Installer entry URL used when neither the CLI nor the config names one.
const DEFAULT_URL: &str = "http://localhost:8080/";

#[derive(Parser)]
#[command(name = "wizard-runner")]
#[command(about = "Drives a web install wizard end-to-end")]
#[command(version)]
struct Cli {
    /// Installer entry URL (overrides the config file)
    #[arg(long)]
    url: Option<String>,

    /// Pre-answer config file (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Use documented defaults, prompting only where no default exists
    #[arg(long, conflicts_with = "config")]
    defaults: bool,

    /// Run the browser in headless mode
    #[arg(long)]
    headless: bool,

    /// Validate the config file without running
    #[arg(long, requires = "config")]
    check: bool,

    /// Fixed interval between installation progress polls, in milliseconds
    #[arg(long, default_value_t = 2_000)]
    poll_interval_ms: u64,

    /// Abort if installation does not finish within this many seconds
    /// (unbounded when not set)
    #[arg(long, value_name = "SECONDS")]
    progress_timeout: Option<u64>,

    /// Verbose output (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode (only errors)
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> wizard_runner::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = if cli.quiet {
        Level::ERROR
    } else {
        match cli.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            _ => Level::DEBUG,
        }
    };

    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    let prompter = TermPrompter;
    let (auto, prompt_defaults) = resolve_input_mode(&cli, &prompter)?;

    if cli.check {
        print_check(&auto);
        return Ok(());
    }

    let url = cli
        .url
        .clone()
        .or_else(|| auto.url.clone())
        .unwrap_or_else(|| DEFAULT_URL.to_string());

    let opts = WizardOptions {
        poll_interval_ms: cli.poll_interval_ms,
        progress_timeout_secs: cli.progress_timeout,
        prompt_defaults,
    };

    println!("Running installer at: {url}");

    let session = Session::launch(cli.headless).await?;
    let outcome = drive(&session, &prompter, &auto, &url, opts).await;

    // The one session-release path, taken on success and failure alike.
    let closed = session.close().await;

    println!();
    match outcome {
        Ok(RunOutcome::Completed { url }) => {
            println!("✓ Installation complete");
            println!("  Site: {url}");
        }
        Ok(RunOutcome::AlreadyInstalled { url }) => {
            println!("✓ Already installed, nothing to do");
            println!("  Reachable at: {url}");
        }
        Err(e) => {
            eprintln!("✗ Aborted: {e}");
            closed?;
            std::process::exit(1);
        }
    }
    closed?;

    Ok(())
}

/// Pick the input mode: a config path or `--defaults` decides directly;
/// otherwise offer the explicit three-way choice.
fn resolve_input_mode(
    cli: &Cli,
    prompter: &TermPrompter,
) -> wizard_runner::Result<(AutoConfig, bool)> {
    if let Some(path) = &cli.config {
        return Ok((AutoConfig::load(path)?, false));
    }
    if cli.defaults {
        return Ok((AutoConfig::default(), false));
    }

    let modes = [
        OptionChoice::new("defaults", "Use documented defaults"),
        OptionChoice::new("interactive", "Answer every prompt interactively"),
        OptionChoice::new("file", "Load answers from a config file"),
    ];
    match prompter
        .select("How should installer inputs be provided?", &modes)?
        .as_str()
    {
        "interactive" => Ok((AutoConfig::default(), true)),
        "file" => {
            let path = prompter.input("Path to config file", None, false)?;
            Ok((AutoConfig::load(path)?, false))
        }
        _ => Ok((AutoConfig::default(), false)),
    }
}

fn print_check(auto: &AutoConfig) {
    println!("Config valid");
    println!(
        "  URL: {}",
        auto.url.as_deref().unwrap_or("(default: localhost)")
    );
    println!("  Language: {}", auto.lang.as_deref().unwrap_or("(ask)"));
    println!(
        "  Profile: {}",
        auto.profile.as_deref().unwrap_or("(ask)")
    );
    let db = &auto.db_connection;
    let db_set = [
        &db.driver,
        &db.database,
        &db.username,
        &db.password,
        &db.host,
        &db.port,
        &db.prefix,
    ]
    .iter()
    .filter(|f| f.is_some())
    .count();
    println!("  Database fields supplied: {db_set}/7");
    let site = &auto.site_data;
    let site_set = [
        &site.site_name,
        &site.site_email,
        &site.admin_username,
        &site.admin_password,
    ]
    .iter()
    .filter(|f| f.is_some())
    .count();
    println!("  Site fields supplied: {site_set}/4");
}
