use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use retrader_lib::api::{filter_users, LoginMethod, RoleFilter};
use retrader_lib::auth::KeyringStorage;
use retrader_lib::config::AppConfig;
use retrader_lib::routing::{localized_url, HistoryNavigator, Locale, Navigator, RouteDecision};
use retrader_lib::session::SessionError;
use retrader_lib::validation::{
    validate_login, validate_otp, validate_otp_email, validate_signup, LoginForm, SignupForm,
};
use retrader_lib::AppState;

#[derive(Parser, Debug)]
#[command(name = "retrader", about = "Retrader trading platform client")]
struct Cli {
    /// Backend base URL (overrides the config file)
    #[arg(long)]
    api_url: Option<String>,

    /// Message and redirect locale (en or fa)
    #[arg(long)]
    locale: Option<Locale>,

    /// Persist --api-url/--locale to the config file
    #[arg(long)]
    save_config: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List subscription plans
    Plans,
    /// Start a Stripe checkout for a plan
    Checkout {
        plan_id: u64,
        /// Print the checkout URL instead of opening a browser
        #[arg(long)]
        no_open: bool,
    },
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "RETRADER_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Mail a one-time code
    SendOtp {
        #[arg(long)]
        email: String,
    },
    LoginOtp {
        #[arg(long)]
        email: String,
        #[arg(long)]
        code: String,
    },
    /// Confirm the code mailed after signup
    VerifyOtp {
        #[arg(long)]
        email: String,
        #[arg(long)]
        code: String,
    },
    Signup {
        #[arg(long)]
        email: String,
        #[arg(long)]
        username: String,
        #[arg(long, env = "RETRADER_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Show the signed-in account
    Me,
    /// List accounts (admin only)
    Users {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value = "all")]
        role: RoleFilter,
    },
    /// Run the route guard for a path
    Route { path: String },
    Logout,
    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    retrader_lib::init_tracing();

    let mut config = AppConfig::load();
    if let Some(url) = cli.api_url {
        config.api_base_url = url;
    }
    if let Some(locale) = cli.locale {
        config.default_locale = locale;
    }
    if cli.save_config {
        config.save().context("Failed to save config")?;
    }

    let locale = config.default_locale;
    let navigator = Arc::new(HistoryNavigator::with_default_locale(
        localized_url("/home", locale),
        locale,
    ));
    let storage = KeyringStorage::new().context("Failed to open credential store")?;
    let state = AppState::new(config, Arc::new(storage), navigator.clone())?;

    let result = run(cli.command, &state, locale).await;

    if navigator.current_path().ends_with("/login") {
        eprintln!("Session expired. Sign in again with `retrader login`.");
    }
    result
}

async fn run(command: Command, state: &AppState, locale: Locale) -> anyhow::Result<()> {
    let session = &state.session;

    match command {
        Command::Plans => {
            for plan in state.plans.list_plans().await? {
                println!("{:>4}  {:<20} {:>16}  {}", plan.id, plan.name, plan.price(), plan.description);
            }
        }
        Command::Checkout { plan_id, no_open } => {
            session.restore().await?;
            let checkout = match session.subscribe(plan_id).await {
                Err(SessionError::NotAuthenticated) => {
                    bail!("Please sign in to subscribe to a plan")
                }
                other => other?,
            };
            println!("{}", checkout.url);
            if !no_open {
                opener::open(&checkout.url).context("Failed to open browser")?;
            }
        }
        Command::Login { email, password } => {
            validate_login(
                &LoginForm {
                    email: email.clone(),
                    password: Some(password.clone()),
                    login_method: LoginMethod::Password,
                },
                locale,
            )?;
            let user = session.login_with_password(&email, &password).await?;
            println!("Signed in as {}", user.display_name());
            println!("{}", localized_url(session.landing_path().await, locale));
        }
        Command::SendOtp { email } => {
            validate_otp_email(&email, locale)?;
            let sent = session.auth().send_otp(&email).await?;
            match sent.expires_in {
                Some(secs) => println!("{} (expires in {}s)", sent.message, secs),
                None => println!("{}", sent.message),
            }
        }
        Command::LoginOtp { email, code } => {
            validate_otp_email(&email, locale)?;
            validate_otp(&code, locale)?;
            let user = session.login_with_otp(&email, code.trim()).await?;
            println!("Signed in as {}", user.display_name());
        }
        Command::VerifyOtp { email, code } => {
            validate_otp_email(&email, locale)?;
            validate_otp(&code, locale)?;
            let user = session.verify_otp(&email, code.trim()).await?;
            println!("Verified and signed in as {}", user.display_name());
        }
        Command::Signup {
            email,
            username,
            password,
        } => {
            validate_signup(
                &SignupForm {
                    email: email.clone(),
                    confirm_password: password.clone(),
                    password: password.clone(),
                    username: username.clone(),
                },
                locale,
            )?;
            let message = session
                .auth()
                .register(&retrader_lib::api::SignupRequest {
                    email,
                    password,
                    username,
                })
                .await?;
            println!("{}", message);
        }
        Command::Me => match session.restore().await? {
            Some(user) => println!(
                "{} <{}> {}",
                user.display_name(),
                user.email,
                user.role.unwrap_or_default()
            ),
            None => println!("Not signed in"),
        },
        Command::Users { search, role } => {
            let users = state.users.list_users().await?;
            let shown = filter_users(&users, &search, role);
            for user in &shown {
                println!(
                    "{:>5}  {:<30} {:<20} {:<6} {}",
                    user.id,
                    user.email,
                    user.username,
                    user.role.as_str(),
                    user.created_at.format("%Y-%m-%d")
                );
            }
            println!("{} of {} users", shown.len(), users.len());
        }
        Command::Route { path } => {
            if let Err(e) = session.restore().await {
                tracing::debug!("No session restored: {}", e);
            }
            match state.guard(&path).await {
                RouteDecision::Continue => println!("{}", path),
                RouteDecision::Redirect(target) => println!("{} -> {}", path, target),
            }
        }
        Command::Logout => {
            session.logout().await?;
            println!("Signed out");
        }
        Command::Config => {
            println!("{}", serde_json::to_string_pretty(&state.config)?);
        }
    }

    Ok(())
}
