// Role Button Bot
// Hands out a role from a button that server admins configure with slash commands

mod api;
mod commands;
mod features;
mod models;
mod utils;

use std::env;

use anyhow::Context as _;
use poise::serenity_prelude as serenity;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::discord::SerenityGateway;
use crate::api::settings_store::SettingsStore;
use crate::models::button::RolePolicy;
use crate::utils::config::BotConfig;

/// User data shared across all commands
pub struct Data {
    pub store: SettingsStore,
    pub gateway: SerenityGateway,
    pub policy: RolePolicy,
}

// Manual Debug impl since SerenityGateway doesn't impl Debug
impl std::fmt::Debug for Data {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Data")
            .field("store", &self.store.path())
            .field("gateway", &"SerenityGateway")
            .field("policy", &self.policy)
            .finish()
    }
}

type Error = Box<dyn std::error::Error + Send + Sync>;
type Context<'a> = poise::Context<'a, Data, Error>;

/// Register all slash commands
fn get_commands() -> Vec<poise::Command<Data, Error>> {
    vec![
        commands::setup::set_channel(),
        commands::setup::set_message_text(),
        commands::setup::set_button_label(),
        commands::setup::set_button_color(),
        commands::setup::set_button_role(),
        commands::publish::publish_message(),
        commands::publish::attach_button(),
        commands::settings::show_settings(),
        commands::help::help(),
    ]
}

async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    match event {
        serenity::FullEvent::Ready { data_about_bot } => {
            info!("Logged in as {}", data_about_bot.user.name);
        }
        serenity::FullEvent::InteractionCreate {
            interaction: serenity::Interaction::Component(component),
        } => {
            features::role_button::handle_interaction(ctx, component, data).await?;
        }
        _ => {}
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            env::var("RUST_LOG").unwrap_or_else(|_| "rolebutton_bot=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Nothing touches the network before the environment checks out
    let config = match BotConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return Err(e.into());
        }
    };

    info!("Starting Role Button Bot ({:?} policy)...", config.policy);

    let store = SettingsStore::open(&config.settings_path).await;
    let policy = config.policy;
    let discord_timeout = config.discord_timeout;

    // Setup framework
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: get_commands(),
            event_handler: |ctx, event, framework, data| {
                Box::pin(event_handler(ctx, event, framework, data))
            },
            on_error: |error| {
                Box::pin(async move {
                    match error {
                        poise::FrameworkError::Command { error, ctx, .. } => {
                            error!("Command error: {:?}", error);
                            let _ = ctx
                                .send(
                                    poise::CreateReply::default()
                                        .content(format!("❌ Error: {}", error))
                                        .ephemeral(true),
                                )
                                .await;
                        }
                        err => {
                            if let Err(e) = poise::builtins::on_error(err).await {
                                error!("Error while handling error: {:?}", e);
                            }
                        }
                    }
                })
            },
            ..Default::default()
        })
        .setup(move |ctx, _ready, framework| {
            Box::pin(async move {
                info!("Bot is ready! Registering commands...");
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                info!("Commands registered successfully!");

                Ok(Data {
                    store,
                    gateway: SerenityGateway::new(ctx.http.clone(), discord_timeout),
                    policy,
                })
            })
        })
        .build();

    // Slash commands and button clicks arrive as interactions; no privileged intents needed
    let intents = serenity::GatewayIntents::GUILDS;

    let mut client = serenity::ClientBuilder::new(&config.token, intents)
        .framework(framework)
        .await
        .context("Failed to create client")?;

    // Run with graceful shutdown
    let shard_manager = client.shard_manager.clone();

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to register Ctrl+C handler: {:?}", e);
            return;
        }
        info!("Shutting down...");
        shard_manager.shutdown_all().await;
    });

    if let Err(why) = client.start().await {
        error!("Client error: {:?}", why);
        return Err(why.into());
    }

    info!("Goodbye!");
    Ok(())
}
