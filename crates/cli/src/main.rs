//! SweetHome CLI - browse the shop, manage the catalog, and try out a cart
//! against a running SweetHome API.
//!
//! # Usage
//!
//! ```bash
//! # Log in (the session is remembered unless --no-remember is given)
//! sh-cli login -e shopper@example.com -p secret123
//!
//! # Browse the catalog
//! sh-cli sweets list --name choco
//!
//! # Admin table with totals
//! sh-cli sweets list --admin --sort price --descending
//!
//! # Add a sweet (admin only)
//! sh-cli sweets add -n "Milk Chocolate" -c Chocolate --price 2.99 -q 40
//!
//! # Price a cart
//! sh-cli cart 64f0c2 64f0c2 64f0d9
//! ```
//!
//! # Environment Variables
//!
//! - `SWEET_HOME_API_BASE_URL` - API root (default `http://127.0.0.1:4000/api`)
//! - `SWEET_HOME_SESSION_FILE` - where a remembered session is kept
//! - `SWEET_HOME_HTTP_TIMEOUT_SECS` - per-request timeout
//! - `SWEET_HOME_PASSWORD` - password for `login`/`register` when `-p` is omitted
//! - `SWEET_HOME_LOG_FORMAT` - `json` for JSON log lines
//! - `RUST_LOG` - log filter

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use secrecy::SecretString;
use sweet_home_client::catalog::SortField;
use sweet_home_client::validation::SignupForm;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "sh-cli")]
#[command(author, version, about = "SweetHome shop CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and remember the session
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long, env = "SWEET_HOME_PASSWORD", hide_env_values = true)]
        password: String,

        /// Keep the session for this invocation only
        #[arg(long)]
        no_remember: bool,
    },
    /// Create a shopper account
    Register {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long, env = "SWEET_HOME_PASSWORD", hide_env_values = true)]
        password: String,

        /// Repeat of the password; defaults to the password itself
        #[arg(long)]
        confirm: Option<String>,
    },
    /// Create an admin account (requires an admin session)
    RegisterAdmin {
        #[arg(short, long)]
        email: String,

        #[arg(short, long, env = "SWEET_HOME_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the current session
    Logout,
    /// Show who is logged in
    Whoami,
    /// Browse and manage the catalog
    Sweets {
        #[command(subcommand)]
        action: SweetsAction,
    },
    /// Build a cart from sweet ids and print its total
    Cart {
        /// Sweet ids; repeat an id to add more than one unit
        #[arg(required = true)]
        ids: Vec<String>,

        /// Drop these ids after adding
        #[arg(long)]
        remove: Vec<String>,
    },
}

#[derive(Subcommand)]
enum SweetsAction {
    /// List sweets
    List {
        /// Case-insensitive name search
        #[arg(short, long)]
        name: Option<String>,

        /// Exact category
        #[arg(short, long)]
        category: Option<String>,

        /// Admin table view with totals (requires an admin session)
        #[arg(long)]
        admin: bool,

        /// Sort column (`name`, `category`, `price`, `quantity`)
        #[arg(long)]
        sort: Option<SortField>,

        #[arg(long)]
        descending: bool,
    },
    /// Add a sweet (admin only)
    Add {
        #[command(flatten)]
        fields: commands::sweets::SweetFields,
    },
    /// Change a sweet (admin only)
    Update {
        id: String,

        #[command(flatten)]
        fields: commands::sweets::SweetPatch,
    },
    /// Delete a sweet (admin only)
    Delete { id: String },
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

/// Logs go to stderr; stdout carries command output.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "sweet_home_cli=info,sweet_home_client=info".into());
    let json = std::env::var("SWEET_HOME_LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .init();
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = commands::open_store()?;

    match cli.command {
        Commands::Login {
            email,
            password,
            no_remember,
        } => {
            let password = SecretString::from(password);
            commands::auth::login(&mut store, &email, &password, !no_remember).await?;
        }
        Commands::Register {
            username,
            email,
            password,
            confirm,
        } => {
            let form = SignupForm {
                confirm: confirm.unwrap_or_else(|| password.clone()),
                username,
                email,
                password,
            };
            commands::auth::register(&mut store, &form).await?;
        }
        Commands::RegisterAdmin { email, password } => {
            let password = SecretString::from(password);
            commands::auth::register_admin(&store, &email, &password).await?;
        }
        Commands::Logout => commands::auth::logout(&mut store),
        Commands::Whoami => commands::auth::whoami(&store)?,
        Commands::Sweets { action } => match action {
            SweetsAction::List {
                name,
                category,
                admin,
                sort,
                descending,
            } => {
                let view = commands::sweets::ListView {
                    name,
                    category,
                    admin,
                    sort,
                    descending,
                };
                commands::sweets::list(&store, &view).await?;
            }
            SweetsAction::Add { fields } => commands::sweets::add(&store, fields).await?,
            SweetsAction::Update { id, fields } => {
                commands::sweets::update(&store, &id, fields).await?;
            }
            SweetsAction::Delete { id } => commands::sweets::delete(&store, &id).await?,
        },
        Commands::Cart { ids, remove } => commands::cart::price(&store, &ids, &remove).await?,
    }
    Ok(())
}
