// ============================
// rentauth-bin/src/main.rs
// ============================
//! Operator command line for the authentication core.
use clap::{Parser, Subcommand, ValueEnum};
use rentauth_common::Role;
use rentauth_lib::{
    auth::{
        authenticated_identity, has_role, is_admin, is_authenticated, is_landlord_or_admin,
        Authenticator, NewUser, PasswordHasher, PasswordPolicy, RehashAdvisor,
    },
    config::{Settings, DEFAULT_CONFIG_FILE},
    logging::init_tracing,
    AuthState,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "rentauth", version, about = "Credential and role checks for the rental backend")]
struct Cli {
    /// TOML config file; `RENTAUTH_*` env vars override it
    #[arg(short, long, env = "RENTAUTH_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a bcrypt digest for a password
    Hash { password: String },
    /// List the strength rules a password breaks
    CheckStrength { password: String },
    /// Report whether a digest is below the configured work factor
    NeedsRehash { digest: String },
    /// Create an account in the flat-file store
    Register {
        #[arg(long)]
        email: String,
        #[arg(long, env = "RENTAUTH_PASSWORD")]
        password: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, default_value_t = Role::Tenant)]
        role: Role,
    },
    /// Check credentials and print the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "RENTAUTH_PASSWORD")]
        password: String,
    },
    /// Log in, then evaluate a role requirement
    Authorize {
        #[arg(long)]
        email: String,
        #[arg(long, env = "RENTAUTH_PASSWORD")]
        password: String,
        #[arg(long, value_enum)]
        require: Requirement,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Requirement {
    Authenticated,
    Tenant,
    Landlord,
    Admin,
    LandlordOrAdmin,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let settings = Settings::load_from(&cli.config)?;
    init_tracing(&settings.logging)?;
    debug!(config = %cli.config.display(), "settings loaded");

    match cli.command {
        Command::Hash { password } => {
            let hasher = PasswordHasher::new(&settings.hashing);
            println!("{}", hasher.hash(password.as_str())?);
        },
        Command::CheckStrength { password } => {
            let report = PasswordPolicy::from(&settings.hashing).validate(&password);
            if !report.is_valid {
                for error in &report.errors {
                    println!("{error}");
                }
                return Ok(ExitCode::FAILURE);
            }
            println!("ok");
        },
        Command::NeedsRehash { digest } => {
            let advisor = RehashAdvisor::new(settings.hashing.work_factor);
            println!("{}", advisor.should_rehash(&digest));
        },
        Command::Register {
            email,
            password,
            name,
            role,
        } => {
            let state = AuthState::with_flat_file(settings)?;
            let mut request = NewUser::new(email, password).with_role(role);
            if let Some(name) = name {
                request = request.with_name(name);
            }
            match state.auth.register(request).await {
                Ok(identity) => println!("{}", serde_json::to_string_pretty(&identity)?),
                Err(e) if e.is_client_safe() => {
                    eprintln!("{}", e.sanitized_message());
                    return Ok(ExitCode::FAILURE);
                },
                Err(e) => return Err(e.into()),
            }
        },
        Command::Login { email, password } => {
            let state = AuthState::with_flat_file(settings)?;
            match state.login(&email, &password).await {
                Some(session) => println!("{}", serde_json::to_string_pretty(&session)?),
                None => {
                    eprintln!("Invalid email or password");
                    return Ok(ExitCode::FAILURE);
                },
            }
        },
        Command::Authorize {
            email,
            password,
            require,
        } => {
            let state = AuthState::with_flat_file(settings)?;
            let session = state.login(&email, &password).await;
            let identity = authenticated_identity(session.as_ref());
            let allowed = is_authenticated(session.as_ref())
                && match require {
                    Requirement::Authenticated => true,
                    Requirement::Tenant => has_role(identity, Role::Tenant),
                    Requirement::Landlord => has_role(identity, Role::Landlord),
                    Requirement::Admin => is_admin(identity),
                    Requirement::LandlordOrAdmin => is_landlord_or_admin(identity),
                };
            println!("{}", if allowed { "allow" } else { "deny" });
            if !allowed {
                return Ok(ExitCode::FAILURE);
            }
        },
    }

    Ok(ExitCode::SUCCESS)
}
