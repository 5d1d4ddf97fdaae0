mod platform;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use certgen_engine::EngineHandle;
use certgen_logging::certgen_info;
use clap::{Args, Parser, Subcommand};

use crate::platform::app::Controller;
use crate::platform::config::AppConfig;
use crate::platform::effects::EffectRunner;
use crate::platform::headless::{self, SubmitInputs};
use crate::platform::logging::{self, LogDestination};
use crate::platform::ui;

/// Upload MS6 and BMS spreadsheets and download the generated certificates.
#[derive(Debug, Parser)]
#[command(name = "certgen", version, about)]
struct Cli {
    /// RON config file (defaults to ./certgen.ron when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Base URL of the certificate service.
    #[arg(long, global = true)]
    service_url: Option<String>,

    /// Directory the generated document is saved to.
    #[arg(long, global = true)]
    download_dir: Option<PathBuf>,

    #[arg(long, global = true)]
    log_level: Option<String>,

    #[arg(long = "log", value_enum, global = true)]
    log_destination: Option<LogDestination>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Interactive form (default).
    Ui,
    /// Submit once and wait for the result.
    Submit(SubmitArgs),
}

#[derive(Debug, Args)]
struct SubmitArgs {
    #[arg(long)]
    ms6: Option<PathBuf>,
    #[arg(long)]
    bms: Option<PathBuf>,
    /// Month and year, e.g. "Jan 2024".
    #[arg(long, default_value = "")]
    year: String,
    #[arg(long, default_value = "")]
    course_name: String,
    #[arg(long, default_value = "")]
    semester: String,
}

impl From<SubmitArgs> for SubmitInputs {
    fn from(args: SubmitArgs) -> Self {
        Self {
            ms6: args.ms6,
            bms: args.bms,
            year: args.year,
            course_name: args.course_name,
            semester: args.semester,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("certgen: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<bool> {
    let config = AppConfig::load(cli.config.as_deref())
        .context("loading configuration")?
        .with_overrides(cli.service_url, cli.download_dir, cli.log_level);

    let command = cli.command.unwrap_or(Command::Ui);
    let default_destination = match command {
        Command::Ui => LogDestination::File,
        Command::Submit(_) => LogDestination::Terminal,
    };
    let destination = cli
        .log_destination
        .or(config.log_destination)
        .unwrap_or(default_destination);
    logging::initialize(destination, certgen_logging::parse_level(&config.log_level));

    let settings = config.engine_settings();
    certgen_info!(
        "certgen starting: service {}, downloads to {}",
        settings.service.base_url,
        settings.download_dir.display()
    );
    let engine = EngineHandle::new(settings).context("starting engine")?;
    let controller = Controller::new(EffectRunner::new(engine));

    match command {
        Command::Ui => ui::run(controller).map(|()| true),
        Command::Submit(args) => headless::run(controller, args.into()),
    }
}
