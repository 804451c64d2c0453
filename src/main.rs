#![forbid(unsafe_code)]

mod commands;
mod eligibility;
mod join_service;
mod models;
mod poise_error_handler;
mod repository;
mod utils;

use std::{process::exit, str::FromStr, sync::Arc};

use join_service::JoinService;
use poise::{serenity_prelude::*, Framework};
use poise_error_handler::handle_error;
use repository::{MatchRepository, ParticipantRepository, ProfileRepository};
use serde::Deserialize;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use tokio::{select, signal};
use tracing::{error, info, info_span, warn, Instrument};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LOG_DIRECTIVES: &str = "pickup_match_bot=info";

#[derive(Debug, Deserialize)]
struct AppConfig {
    discord_bot_token: String,
    database_url: String,
    register_commands_globally: Option<bool>,
    register_commands_in_guilds: Option<Vec<u64>>,
}

pub struct BotState {
    pub match_repository: Arc<MatchRepository>,
    pub profile_repository: Arc<ProfileRepository>,
    pub participant_repository: Arc<ParticipantRepository>,
    pub join_service: JoinService,
}

impl BotState {
    fn new(db_pool: SqlitePool) -> BotState {
        let match_repository = Arc::new(MatchRepository::new(db_pool.clone()));
        let profile_repository = Arc::new(ProfileRepository::new(db_pool.clone()));
        let participant_repository = Arc::new(ParticipantRepository::new(db_pool));

        let join_service = JoinService::new(
            match_repository.clone(),
            profile_repository.clone(),
            participant_repository.clone(),
        );

        BotState {
            match_repository,
            profile_repository,
            participant_repository,
            join_service,
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(err) = dotenvy::dotenv() {
        warn!("Could not load config from .env file: {err}");
    }

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_DIRECTIVES)),
        )
        .init();

    let app_config = match envy::from_env::<AppConfig>() {
        Ok(config) => config,
        Err(err) => {
            error!("Could not load app config: {err}");
            exit(255);
        }
    };

    let db_pool = match setup_database(&app_config.database_url).await {
        Ok(pool) => pool,
        Err(err) => {
            error!("Could not setup database: {err}");
            exit(255);
        }
    };

    let app_state = BotState::new(db_pool.clone());

    let framework = Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![commands::matches(), commands::profile()],
            on_error: |error| Box::pin(handle_error(error)),
            ..Default::default()
        })
        .setup(move |ctx, _ready, framework| {
            Box::pin(
                async move {
                    let commands = &framework.options().commands;

                    if let Some(true) = app_config.register_commands_globally {
                        info!("Registering commands globally");
                        poise::builtins::register_globally(ctx, commands).await?;
                    }

                    if let Some(guilds) = app_config.register_commands_in_guilds {
                        for guild in guilds.iter().map(|g| GuildId::new(*g)) {
                            let guild_name = ctx
                                .http()
                                .get_guild(guild)
                                .await
                                .map(|g| g.name)
                                .unwrap_or("???".to_string());

                            info!("Registering commands in guild {guild} ({guild_name})");

                            poise::builtins::register_in_guild(ctx, commands, guild).await?;
                        }
                    }

                    Ok(app_state)
                }
                .instrument(info_span!("bot_setup")),
            )
        })
        .build();

    let mut client = match ClientBuilder::new(app_config.discord_bot_token, GatewayIntents::empty())
        .framework(framework)
        .await
    {
        Ok(client) => client,
        Err(err) => {
            error!("Failed to create the client: {err}");
            exit(255);
        }
    };

    let shard_manager = client.shard_manager.clone();

    select! {
        _ = signal::ctrl_c() => {
            info!("Ctrl-C received, shutting down");
            shard_manager.shutdown_all().await;
            db_pool.close().await;
        },

        result = client.start() => {
            if let Err(err) = result {
                error!("Failed to start the client: {err}");
            }
        },
    };
}

#[tracing::instrument(skip(url))]
async fn setup_database(url: &str) -> anyhow::Result<SqlitePool> {
    info!("Connecting to SQLite database");
    let options = SqliteConnectOptions::from_str(url)?
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new().connect_with(options).await?;
    info!("Running migrations");
    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Done!");
    Ok(pool)
}
