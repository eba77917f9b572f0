use crate::state::Context;
use crate::trends;

use super::say_chunked;

/// Summary of notable shifts plus favorites and watch lists per team
#[poise::command(slash_command)]
pub async fn report(ctx: Context<'_>) -> Result<(), anyhow::Error> {
    ctx.defer().await?;

    let min_shift = ctx.data().pulse_config.read().await.report_min_shift;
    let data = ctx.data();
    let text = trends::generate_report(&data.store, &data.report_teams, min_shift).await?;

    say_chunked(ctx, &text, false).await
}
