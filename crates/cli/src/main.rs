//! Sellertools CLI - seller and customer onboarding.
//!
//! # Usage
//!
//! ```bash
//! # Onboard a seller
//! st-cli onboard seller --company-name "Acme Co" --first-name Ada \
//!     --last-name Lovelace --email ada@acme.com --phone "+1 555 0100"
//!
//! # Onboard every customer listed in a YAML file
//! st-cli onboard customer --file customers.yaml
//!
//! # Send a Merchant Center invitation on its own
//! st-cli invite -e ada@acme.com
//!
//! # Show or change the shared settings
//! st-cli settings show
//! st-cli settings set --product-selection main --customer-group sellers
//! ```
//!
//! Configuration comes from the environment (or `.env`); see
//! `sellertools_onboarding::config`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sellertools_core::{OnboardingFlow, OnboardingForm};
use sellertools_onboarding::AppConfig;
use sellertools_onboarding::config::LogFormat;

mod commands;

#[derive(Parser)]
#[command(name = "st-cli")]
#[command(author, version, about = "Sellertools onboarding tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Onboard a seller or customer
    Onboard {
        #[command(subcommand)]
        flow: FlowCommand,
    },
    /// Send a Merchant Center invitation
    Invite {
        /// Email address to invite
        #[arg(short, long)]
        email: String,
    },
    /// Show or change shared settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Subcommand)]
enum FlowCommand {
    /// Onboard a seller (includes product selection and invitation)
    Seller(OnboardArgs),
    /// Onboard a B2B customer
    Customer(OnboardArgs),
}

#[derive(Args)]
struct OnboardArgs {
    /// YAML file with a list of requests, onboarded one after another
    #[arg(long, conflicts_with_all = ["company_name", "first_name", "last_name", "email", "phone"])]
    file: Option<PathBuf>,

    #[arg(long, required_unless_present = "file")]
    company_name: Option<String>,

    #[arg(long, required_unless_present = "file")]
    first_name: Option<String>,

    #[arg(long, required_unless_present = "file")]
    last_name: Option<String>,

    #[arg(long, required_unless_present = "file")]
    email: Option<String>,

    /// Optional phone number (adds a contact address for sellers)
    #[arg(long)]
    phone: Option<String>,
}

impl OnboardArgs {
    fn into_form(self) -> OnboardingForm {
        OnboardingForm {
            company_name: self.company_name.unwrap_or_default(),
            first_name: self.first_name.unwrap_or_default(),
            last_name: self.last_name.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            phone_number: self.phone.unwrap_or_default(),
        }
    }
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Print the current settings
    Show,
    /// Store both settings
    Set {
        /// Product selection key used as the main catalog
        #[arg(long)]
        product_selection: String,

        /// Customer group key for sellers
        #[arg(long)]
        customer_group: String,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &AppConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR => sentry_tracing::EventFilter::Event,
        tracing::Level::WARN | tracing::Level::INFO => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing(format: LogFormat) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "sellertools_onboarding=info,sellertools_cli=info".into());

    let is_json = format == LogFormat::Json;
    let json_layer = is_json.then(|| tracing_subscriber::fmt::layer().json().flatten_event(true));
    let text_layer = (!is_json).then(tracing_subscriber::fmt::layer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing_subscriber::fmt::init();
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    // Sentry must be initialized before the tracing subscriber
    let sentry_guard = init_sentry(&config);
    init_tracing(config.log_format);
    if sentry_guard.is_some() {
        tracing::info!("Sentry initialized");
    }

    let result: Result<(), Box<dyn std::error::Error>> = run(cli, &config).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        // Flush pending Sentry events; process::exit skips destructors
        drop(sentry_guard);
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Onboard { flow } => {
            let (flow, args) = match flow {
                FlowCommand::Seller(args) => (OnboardingFlow::Seller, args),
                FlowCommand::Customer(args) => (OnboardingFlow::Customer, args),
            };
            match args.file.clone() {
                Some(path) => commands::onboard::batch(config, flow, &path).await?,
                None => commands::onboard::single(config, flow, &args.into_form()).await?,
            }
        }
        Commands::Invite { email } => commands::invite::send(config, &email).await?,
        Commands::Settings { action } => match action {
            SettingsAction::Show => commands::settings::show(config).await?,
            SettingsAction::Set {
                product_selection,
                customer_group,
            } => commands::settings::set(config, &product_selection, &customer_group).await?,
        },
    }
    Ok(())
}
