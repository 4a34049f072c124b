//! Operator CLI for the matching backend
//!
//! Prints JSON so output can be piped into other tooling.

use anyhow::{Context, Result};
use buddy_core::config::Config;
use buddy_core::domains::auth::JwtService;
use buddy_core::domains::directory::models::SkillLevel;
use buddy_core::domains::matching::{find_candidates, CandidateFilter};
use buddy_core::kernel::postgres::MIGRATOR;
use buddy_core::kernel::ServerDeps;
use buddy_core::common::{SportId, UserId};
use clap::{Parser, Subcommand};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "buddyctl")]
#[command(about = "Buddy Match operator CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,

    /// Mint a bearer token for a user (local testing)
    IssueToken {
        user_id: Uuid,
        #[arg(long, default_value_t = 24)]
        ttl_hours: i64,
    },

    /// Run candidate discovery for a user
    Candidates {
        user_id: Uuid,
        #[arg(long)]
        sport: Option<Uuid>,
        #[arg(long)]
        skill: Option<SkillLevel>,
        #[arg(long)]
        max_distance_km: Option<f64>,
        #[arg(long, value_delimiter = ',')]
        days: Vec<String>,
        #[arg(long, value_delimiter = ',')]
        times: Vec<String>,
    },
}

#[derive(Serialize)]
struct Response<T: Serialize> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
}

fn output<T: Serialize>(resp: Response<T>) -> Result<()> {
    println!("{}", serde_json::to_string(&resp)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    match cli.command {
        Commands::Migrate => cmd_migrate(&config).await,
        Commands::IssueToken { user_id, ttl_hours } => cmd_issue_token(&config, user_id, ttl_hours),
        Commands::Candidates {
            user_id,
            sport,
            skill,
            max_distance_km,
            days,
            times,
        } => {
            let mut filter = CandidateFilter::builder()
                .sport_id(sport.map(SportId::from_uuid))
                .skill_level(skill)
                .fallback_distance_km(config.default_search_radius_km)
                .preferred_days(days)
                .preferred_times(times)
                .build();
            filter.max_distance_km = max_distance_km;
            cmd_candidates(&config, UserId::from_uuid(user_id), filter).await
        }
    }
}

async fn get_pool(config: &Config) -> Result<PgPool> {
    PgPool::connect(&config.database_url)
        .await
        .context("Failed to connect to database")
}

async fn cmd_migrate(config: &Config) -> Result<()> {
    let pool = get_pool(config).await?;

    MIGRATOR
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    output(Response::<()> {
        success: true,
        message: Some("Migrations applied".to_string()),
        data: None,
    })
}

fn cmd_issue_token(config: &Config, user_id: Uuid, ttl_hours: i64) -> Result<()> {
    let jwt_service = JwtService::new(&config.jwt_secret, config.jwt_issuer.clone());
    let ttl = chrono::Duration::hours(ttl_hours);
    let token = jwt_service.issue(UserId::from_uuid(user_id), ttl)?;

    output(Response {
        success: true,
        message: None,
        data: Some(token),
    })
}

async fn cmd_candidates(config: &Config, user_id: UserId, filter: CandidateFilter) -> Result<()> {
    let pool = get_pool(config).await?;
    let deps = ServerDeps::postgres(pool);

    match find_candidates(user_id, &filter, &deps).await {
        Ok(candidates) => output(Response {
            success: true,
            message: None,
            data: Some(candidates),
        }),
        Err(e) => output(Response::<()> {
            success: false,
            message: Some(e.to_string()),
            data: None,
        }),
    }
}
