//! `lago-subscriptions` CLI binary.
//!
//! Thin command-line front end over the subscription connector:
//!
//! ```text
//! lago-subscriptions create --customer cust_1 --plan plan_a --billing-time calendar
//! lago-subscriptions terminate --customer cust_1
//! lago-subscriptions list --customer cust_1 --page 2 --per-page 20
//! ```
//!
//! Reads `configuration.yaml` and `LAGO_*` environment variables; results are
//! printed to stdout as JSON, logs go to stderr.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use lago::configuration::{get_configuration, Settings};
use lago::telemetry::{get_subscriber, init_subscriber};
use lago::{BillingTime, Client, SubscriptionInput, SubscriptionListInput};

#[derive(Parser, Debug)]
#[command(
    name = "lago-subscriptions",
    version,
    about = "Manage Lago subscriptions from the command line"
)]
struct Cli {
    /// Lago API base URL (overrides configuration)
    #[arg(long, global = true, env = "LAGO_BASE_URL")]
    base_url: Option<String>,

    #[command(subcommand)]
    command: SubscriptionCommands,
}

#[derive(Debug, Subcommand)]
enum SubscriptionCommands {
    /// Subscribe a customer to a plan
    Create {
        /// External customer id
        #[arg(long, value_name = "ID")]
        customer: String,
        /// Plan code
        #[arg(long, value_name = "CODE")]
        plan: String,
        /// Billing anchor: anniversary or calendar
        #[arg(long, value_name = "MODE")]
        billing_time: Option<BillingTime>,
    },
    /// Terminate the subscription of a customer
    Terminate {
        /// External customer id
        #[arg(long, value_name = "ID")]
        customer: String,
    },
    /// List subscriptions
    List {
        /// Only subscriptions of this external customer
        #[arg(long, value_name = "ID")]
        customer: Option<String>,
        /// Page number (1-based)
        #[arg(long, default_value_t = 0)]
        page: u32,
        /// Page size
        #[arg(long, default_value_t = 0)]
        per_page: u32,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut settings = match get_configuration() {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("Failed to read configuration: {}", err);
            return ExitCode::FAILURE;
        }
    };
    if let Some(base_url) = cli.base_url {
        settings.lago.base_url = base_url;
    }

    let subscriber = get_subscriber("lago-subscriptions".into(), settings.log_level.clone());
    if let Err(err) = init_subscriber(subscriber) {
        eprintln!("{}", err);
    }

    match run(cli.command, settings).await {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!("Command failed: {:#}", err);
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(command: SubscriptionCommands, settings: Settings) -> anyhow::Result<String> {
    let client = Client::from_config(settings.lago)?;
    let subscriptions = client.subscription();

    let output = match command {
        SubscriptionCommands::Create {
            customer,
            plan,
            billing_time,
        } => {
            let mut input = SubscriptionInput::new(customer, plan);
            input.billing_time = billing_time;
            serde_json::to_string_pretty(&subscriptions.create(input).await?)?
        }
        SubscriptionCommands::Terminate { customer } => {
            serde_json::to_string_pretty(&subscriptions.terminate(&customer).await?)?
        }
        SubscriptionCommands::List {
            customer,
            page,
            per_page,
        } => {
            let filter = SubscriptionListInput {
                external_customer_id: customer,
                per_page,
                page,
            };
            serde_json::to_string_pretty(&subscriptions.get_list(filter).await?)?
        }
    };

    Ok(output)
}
