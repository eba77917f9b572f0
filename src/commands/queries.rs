use crate::roster::title_case;
use crate::state::Context;
use crate::trends;

use super::say_json;

/// Sentiment trend for one player
#[poise::command(slash_command)]
pub async fn player(
    ctx: Context<'_>,
    #[description = "Player full name"] name: String,
) -> Result<(), anyhow::Error> {
    // Stored names are title-cased
    let name = title_case(name.trim());
    match trends::player_trend(&ctx.data().store, &name).await? {
        Some(trend) => say_json(ctx, &trend).await?,
        None => {
            ctx.say(format!("No data found for {}", name)).await?;
        }
    }
    Ok(())
}

/// Player sentiment standings for one team
#[poise::command(slash_command)]
pub async fn team(
    ctx: Context<'_>,
    #[description = "Team name, e.g. Boston Celtics"] name: String,
) -> Result<(), anyhow::Error> {
    let name = name.trim();
    match trends::team_standings(&ctx.data().store, name).await? {
        Some(report) => say_json(ctx, &report).await?,
        None => {
            ctx.say(format!("No data found for {}", name)).await?;
        }
    }
    Ok(())
}

/// Players whose recent sentiment moved the most
#[poise::command(slash_command)]
pub async fn shifts(
    ctx: Context<'_>,
    #[description = "Minimum shift magnitude"] min: Option<f64>,
) -> Result<(), anyhow::Error> {
    let min = match min {
        Some(m) => m,
        None => ctx.data().pulse_config.read().await.min_shift,
    };
    let shifts = trends::sentiment_shifts(&ctx.data().store, min).await?;
    if shifts.is_empty() {
        ctx.say(format!("No shifts of at least {:.2} detected.", min))
            .await?;
        return Ok(());
    }
    say_json(ctx, &shifts).await
}
