mod analysis;
mod commands;
mod llm;
mod mentions;
mod roster;
mod sentiment;
mod state;
mod store;
mod trends;

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use poise::serenity_prelude as serenity;
use poise::{Framework, FrameworkOptions};
use tokio::sync::RwLock;
use tracing::{error, info, Level};

use llm::LlmClient;
use mentions::MentionLocator;
use roster::RosterIndex;
use sentiment::{IndicatorSet, LlmScorer, RuleScorer};
use state::{AppState, PulseConfig};
use store::SentimentStore;

const DEFAULT_REPORT_TEAMS: &str = "Boston Celtics,Los Angeles Lakers,Golden State Warriors";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .init();

    // Load env
    let _ = dotenv::dotenv();
    let token = dotenv::var("DISCORD_TOKEN").context("DISCORD_TOKEN required")?;
    let guild_id: Option<serenity::GuildId> = dotenv::var("DISCORD_GUILD_ID")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(serenity::GuildId::new);

    // Init storage
    let data_dir = PathBuf::from(
        dotenv::var("PULSE_DATA_DIR").unwrap_or_else(|_| "./data/pulse".to_string()),
    );
    let store = Arc::new(SentimentStore::new(&data_dir).await?);
    info!("Sentiment store initialized at {:?}", data_dir);

    // Roster and mention patterns
    let roster_path = dotenv::var("PULSE_ROSTER_PATH").ok().map(PathBuf::from);
    let rosters = roster::load_or_default(roster_path.as_deref())?;
    let index = RosterIndex::build(&rosters);
    info!(teams = rosters.len(), identifiers = index.len(), "Roster index built");
    let locator = Arc::new(MentionLocator::new(index)?);

    // Scorers
    let rules = Arc::new(RuleScorer::new(IndicatorSet::default()));
    let llm_client = Arc::new(LlmClient::from_env()?);
    info!(model = llm_client.model(), "LLM client initialized");
    let llm_scorer = Arc::new(LlmScorer::new(llm_client, rules.as_ref().clone()));

    let transcripts_dir = PathBuf::from(
        dotenv::var("PULSE_TRANSCRIPTS_DIR").unwrap_or_else(|_| "./transcripts".to_string()),
    );
    let report_teams: Vec<String> = dotenv::var("PULSE_REPORT_TEAMS")
        .unwrap_or_else(|_| DEFAULT_REPORT_TEAMS.to_string())
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    // Parse admin user IDs from env
    let admin_ids: HashSet<u64> = dotenv::var("ADMIN_USER_IDS")
        .unwrap_or_default()
        .split(',')
        .filter_map(|s| s.trim().parse::<u64>().ok())
        .collect();
    if !admin_ids.is_empty() {
        info!(count = admin_ids.len(), "Admin users configured");
    }

    let use_llm = dotenv::var("PULSE_USE_LLM")
        .ok()
        .and_then(|s| s.trim().parse::<bool>().ok())
        .unwrap_or(false);
    let pulse_config = Arc::new(RwLock::new(PulseConfig {
        use_llm,
        ..PulseConfig::default()
    }));

    let app_state = AppState {
        store,
        locator,
        rules,
        llm_scorer,
        transcripts_dir,
        report_teams,
        admin_ids,
        pulse_config,
    };

    let intents =
        serenity::GatewayIntents::GUILDS | serenity::GatewayIntents::GUILD_MESSAGES;

    let framework = Framework::builder()
        .options(FrameworkOptions {
            commands: vec![commands::pulse()],
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("Bot connected as: {} ({})", ready.user.name, ready.user.id);

                let commands = &framework.options().commands;
                info!("Registering {} top-level command(s):", commands.len());
                for cmd in commands {
                    info!("  /{} ({} subcommands)", cmd.name, cmd.subcommands.len());
                    for sub in &cmd.subcommands {
                        info!("    /{} {}", cmd.name, sub.name);
                    }
                }

                if let Some(gid) = guild_id {
                    info!("Registering to guild {} (instant)", gid);
                    poise::builtins::register_in_guild(
                        ctx,
                        &framework.options().commands,
                        gid,
                    )
                    .await?;
                } else {
                    info!("Registering globally (up to 1 hour delay)");
                    poise::builtins::register_globally(
                        ctx,
                        &framework.options().commands,
                    )
                    .await?;
                }

                Ok(app_state)
            })
        })
        .build();

    info!("Starting Coach Pulse bot...");

    let mut client = serenity::ClientBuilder::new(&token, intents)
        .framework(framework)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create client: {}", e))?;

    if let Err(e) = client.start().await {
        error!("Client error: {}", e);
    }

    Ok(())
}
