use clap::{Parser, Subcommand, ValueEnum};
use intellectmoney::application::gateway::IntellectMoney;
use intellectmoney::config::Settings;
use intellectmoney::domain::messages::Locale;
use intellectmoney::interfaces::csv::payload_reader::PayloadReader;
use intellectmoney::interfaces::csv::report_writer::{ActionReport, ReportWriter, ResultReport};
use intellectmoney::interfaces::json::RequestWriter;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Settings file (TOML). INTELLECTMONEY_* environment variables override it.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Language of validation messages
    #[arg(long, value_enum, default_value_t = LocaleArg::En, global = true)]
    locale: LocaleArg,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build payment requests from a CSV of initial values; prints JSON lines
    Request { input: PathBuf },
    /// Validate payment-result callbacks from a CSV; prints a CSV report
    Result { input: PathBuf },
    /// Validate administrative actions from a CSV; prints a CSV report
    Action { input: PathBuf },
}

#[derive(Clone, Copy, ValueEnum)]
enum LocaleArg {
    En,
    Ru,
}

impl From<LocaleArg> for Locale {
    fn from(arg: LocaleArg) -> Self {
        match arg {
            LocaleArg::En => Locale::En,
            LocaleArg::Ru => Locale::Ru,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref()).into_diagnostic()?;
    let gateway = IntellectMoney::new(settings);
    let locale = Locale::from(cli.locale);

    let input = match &cli.command {
        Command::Request { input } | Command::Result { input } | Command::Action { input } => {
            input
        }
    };
    let file = File::open(input).into_diagnostic()?;
    let reader = PayloadReader::new(file);
    let stdout = io::stdout();

    match cli.command {
        Command::Request { .. } => {
            let mut writer = RequestWriter::new(stdout.lock(), locale);
            for payload in reader.payloads() {
                match payload {
                    Ok(raw) => match gateway.build_payment_request(&raw) {
                        Ok(request) => writer.write_built(&request).into_diagnostic()?,
                        Err(errors) => writer.write_rejected(&raw, &errors).into_diagnostic()?,
                    },
                    Err(e) => error!("Error reading payload: {}", e),
                }
            }
        }
        Command::Result { .. } => {
            let mut writer = ReportWriter::new(stdout.lock());
            for payload in reader.payloads() {
                match payload {
                    Ok(raw) => {
                        let row = match gateway.validate_payment_result(&raw) {
                            Ok(result) => ResultReport::accepted(&result),
                            Err(errors) => ResultReport::rejected(&raw, &errors, locale),
                        };
                        writer.write(&row).into_diagnostic()?;
                    }
                    Err(e) => error!("Error reading payload: {}", e),
                }
            }
            writer.flush().into_diagnostic()?;
        }
        Command::Action { .. } => {
            let mut writer = ReportWriter::new(stdout.lock());
            for payload in reader.payloads() {
                match payload {
                    Ok(raw) => {
                        let row = match gateway.validate_admin_action(&raw) {
                            Ok(action) => ActionReport::accepted(&action),
                            Err(errors) => ActionReport::rejected(&raw, &errors, locale),
                        };
                        writer.write(&row).into_diagnostic()?;
                    }
                    Err(e) => error!("Error reading payload: {}", e),
                }
            }
            writer.flush().into_diagnostic()?;
        }
    }

    Ok(())
}
