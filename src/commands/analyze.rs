use tracing::info;

use crate::analysis;
use crate::state::Context;

/// Analyze every downloaded transcript and store player sentiment (admin only)
#[poise::command(slash_command, guild_only)]
pub async fn analyze(
    ctx: Context<'_>,
    #[description = "Max transcripts to process"] limit: Option<u32>,
    #[description = "Score with the language model instead of keyword rules"] llm: Option<bool>,
) -> Result<(), anyhow::Error> {
    let user_id = ctx.author().id.get();
    if !ctx.data().is_admin(user_id) {
        ctx.say("This command is admin-only.").await?;
        return Ok(());
    }

    ctx.defer().await?;

    let (use_llm, limit) = {
        let config = ctx.data().pulse_config.read().await;
        (
            llm.unwrap_or(config.use_llm),
            limit.map(|l| l as usize).or(config.batch_limit),
        )
    };

    let data = ctx.data();
    info!(user = ctx.author().name, use_llm, ?limit, "Batch analysis started");

    let scorer = data.scorer(use_llm);
    let summary = analysis::run_batch(
        &data.transcripts_dir,
        limit,
        &data.locator,
        scorer.as_ref(),
        &data.store,
    )
    .await?;

    ctx.say(format!(
        "Analyzed **{}** of {} transcript(s) with `{}` scoring ({} failed).\n\
         Player mentions: {} ({} new, {} already stored)",
        summary.analyzed,
        summary.files,
        scorer.name(),
        summary.failed,
        summary.mentions,
        summary.inserted,
        summary.skipped
    ))
    .await?;

    Ok(())
}
