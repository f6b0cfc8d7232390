use std::sync::Arc;

use anyhow::{Context, bail};
use chrono::Utc;
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use rihua_auth::{Role, TokenCodec, TokenIssuer, TokenValidator};
use rihua_config::{JwtConfig, ServerConfig};
use rihua_core::password::{PASSWORD_HASH_COST, hash_password_with_cost};
use rihua_observability::init_basic_console_logging;

#[derive(Parser)]
#[command(name = "rihua-cli")]
#[command(about = "Rihua CLI - credential and token tools for the Rihua API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a bcrypt hash for the seed users file
    HashPassword {
        password: String,

        /// bcrypt cost factor
        #[arg(long, default_value_t = PASSWORD_HASH_COST)]
        cost: u32,
    },
    /// Issue a token signed with the configured JWT_SECRET
    IssueToken {
        /// Subject (user id)
        #[arg(short = 's', long)]
        subject: String,

        #[arg(short = 'e', long, default_value = "")]
        email: String,

        /// Role to embed; repeatable (USER, BUSINESS, MODERATOR, ADMIN, SUPER_ADMIN)
        #[arg(short = 'r', long = "role")]
        roles: Vec<Role>,

        /// Preferred language, e.g. zh-CN
        #[arg(short = 'l', long)]
        lang: Option<String>,

        /// Issue a refresh token instead of an access token
        #[arg(long)]
        refresh: bool,
    },
    /// Verify a token and print its claims
    InspectToken { token: String },
}

fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_basic_console_logging();

    let cli = Cli::parse();

    match cli.command {
        Commands::HashPassword { password, cost } => {
            let hash = hash_password_with_cost(&password, cost)
                .map_err(|err| err.error)
                .context("failed to hash password")?;
            println!("{hash}");
        }
        Commands::IssueToken {
            subject,
            email,
            roles,
            lang,
            refresh,
        } => {
            let (issuer, _) = token_tools()?;
            let now = Utc::now();
            let token = if refresh {
                issuer.issue_refresh_token(&subject, now)?
            } else {
                issuer.issue_access_token(&subject, &email, &roles, lang.as_deref(), now)?
            };
            println!("{token}");
        }
        Commands::InspectToken { token } => {
            let (_, validator) = token_tools()?;
            let now = Utc::now();

            match validator.check_at(&token, now) {
                Ok(claims) => {
                    let roles: Vec<&str> = claims.roles.iter().map(Role::as_str).collect();
                    println!("valid:      yes");
                    println!("kind:       {}", claims.kind.as_str());
                    println!("subject:    {}", claims.sub);
                    println!("email:      {}", claims.email.as_deref().unwrap_or("-"));
                    println!("roles:      {}", roles.join(", "));
                    println!("language:   {}", claims.language.as_deref().unwrap_or("-"));
                    println!("token id:   {}", claims.jti);
                    if let (Some(iat), Some(exp)) = (claims.issued_at(), claims.expires_at()) {
                        println!("issued at:  {}", iat.to_rfc3339());
                        println!("expires at: {}", exp.to_rfc3339());
                    }
                    println!("remaining:  {}s", claims.remaining_at(now));
                }
                Err(err) => bail!("invalid token ({}): {err}", err.reason()),
            }
        }
    }

    Ok(())
}

fn token_tools() -> anyhow::Result<(TokenIssuer, TokenValidator)> {
    let jwt_config = JwtConfig::from_env();
    let server_config = ServerConfig::from_env();

    let codec = Arc::new(TokenCodec::from_config(&jwt_config).context("invalid JWT_SECRET")?);
    let issuer = TokenIssuer::new(codec.clone(), &jwt_config)?
        .with_default_language(server_config.default_language);

    Ok((issuer, TokenValidator::new(codec)))
}
