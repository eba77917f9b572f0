use crate::state::{Context, PulseConfig};

const PARAMS: &str = "`use_llm`, `min_shift`, `report_min_shift`, `batch_limit`";

/// Configure analysis parameters (admin only)
#[poise::command(slash_command, guild_only)]
pub async fn config(
    ctx: Context<'_>,
    #[description = "use_llm | min_shift | report_min_shift | batch_limit"] param: Option<String>,
    #[description = "New value (batch_limit: 0 = no limit)"] value: Option<String>,
) -> Result<(), anyhow::Error> {
    let user_id = ctx.author().id.get();
    if !ctx.data().is_admin(user_id) {
        ctx.say("This command is admin-only.").await?;
        return Ok(());
    }

    match (param.as_deref(), value) {
        // Show current config
        (None, _) => {
            let config = ctx.data().pulse_config.read().await;
            ctx.say(describe(&config)).await?;
        }
        // Set a parameter
        (Some(key), Some(val)) => {
            let mut config = ctx.data().pulse_config.write().await;
            let reply = match apply(&mut config, key, &val) {
                Ok(()) => format!("`{}` set to {}", key, val.trim()),
                Err(msg) => msg,
            };
            ctx.say(reply).await?;
        }
        (Some(_), None) => {
            ctx.say("Provide both `param` and `value`. Example: `/pulse config min_shift 0.25`")
                .await?;
        }
    }

    Ok(())
}

fn describe(config: &PulseConfig) -> String {
    format!(
        "**Pulse Configuration:**\n\
         `use_llm`: {}\n\
         `min_shift`: {}\n\
         `report_min_shift`: {}\n\
         `batch_limit`: {}",
        config.use_llm,
        config.min_shift,
        config.report_min_shift,
        config
            .batch_limit
            .map_or_else(|| "none".to_string(), |l| l.to_string())
    )
}

/// Update one parameter; the error is the reply to show.
fn apply(config: &mut PulseConfig, key: &str, value: &str) -> Result<(), String> {
    let value = value.trim();
    let bad = || format!("Invalid value `{}` for `{}`", value, key);
    match key {
        "use_llm" => config.use_llm = value.parse().map_err(|_| bad())?,
        "min_shift" => config.min_shift = parse_threshold(value).ok_or_else(bad)?,
        "report_min_shift" => {
            config.report_min_shift = parse_threshold(value).ok_or_else(bad)?
        }
        "batch_limit" => {
            let limit: usize = value.parse().map_err(|_| bad())?;
            config.batch_limit = (limit > 0).then_some(limit);
        }
        _ => return Err(format!("Unknown param `{}`. Valid: {}", key, PARAMS)),
    }
    Ok(())
}

fn parse_threshold(value: &str) -> Option<f64> {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
}
