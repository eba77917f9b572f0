mod analyze;
mod config;
mod queries;
mod report;

use crate::state::Context;

/// Discord's per-message limit, less room for code fences.
const CHUNK_LIMIT: usize = 1900;

/// Coach Pulse - press-conference sentiment toward players
#[poise::command(
    slash_command,
    subcommands(
        "analyze::analyze",
        "queries::player",
        "queries::team",
        "queries::shifts",
        "report::report",
        "config::config"
    )
)]
pub async fn pulse(_ctx: Context<'_>) -> Result<(), anyhow::Error> {
    Ok(())
}

/// Split on line boundaries so each piece fits in one message.
fn chunks(output: &str, limit: usize) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut remaining = output;
    while !remaining.is_empty() {
        let mut end = remaining.len().min(limit);
        while !remaining.is_char_boundary(end) {
            end -= 1;
        }
        if end == 0 {
            end = remaining.chars().next().map_or(1, char::len_utf8);
        }
        let split_at = if end < remaining.len() {
            remaining[..end]
                .rfind('\n')
                .map(|i| i + 1)
                .unwrap_or(end)
        } else {
            end
        };
        pieces.push(&remaining[..split_at]);
        remaining = &remaining[split_at..];
    }
    pieces
}

/// Reply with `output`, chunked. Use ctx.say() for every chunk so follow-ups go
/// through the interaction webhook.
async fn say_chunked(ctx: Context<'_>, output: &str, as_code: bool) -> Result<(), anyhow::Error> {
    for piece in chunks(output, CHUNK_LIMIT) {
        if as_code {
            ctx.say(format!("```json\n{}\n```", piece.trim_end())).await?;
        } else {
            ctx.say(piece).await?;
        }
    }
    Ok(())
}

async fn say_json<T: serde::Serialize>(ctx: Context<'_>, value: &T) -> Result<(), anyhow::Error> {
    let json = serde_json::to_string_pretty(value)?;
    say_chunked(ctx, &json, true).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunks_split_on_newlines() {
        let text = "aaaa\nbbbb\ncccc\n";
        assert_eq!(chunks(text, 11), vec!["aaaa\nbbbb\n", "cccc\n"]);
    }

    #[test]
    fn test_chunks_hard_split_without_newline() {
        let text = "abcdefghij";
        assert_eq!(chunks(text, 4), vec!["abcd", "efgh", "ij"]);
        assert!(chunks("", 4).is_empty());
    }

    #[test]
    fn test_chunks_respect_char_boundaries() {
        let text = "ééé";
        assert_eq!(chunks(text, 3), vec!["é", "é", "é"]);
    }
}
