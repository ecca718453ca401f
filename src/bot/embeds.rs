//! Embed builders shared by the commands.

use crate::{bot::Context, errors::Result};
use poise::serenity_prelude as serenity;

/// Accent colour of ordinary replies.
pub const INFO_COLOUR: u32 = 0x00C2_A878;
/// Colour of successful actions.
pub const SUCCESS_COLOUR: u32 = 0x002E_CC71;
/// Colour of rejected actions and errors.
pub const ERROR_COLOUR: u32 = 0x00E7_4C3C;

/// Plain embed with a title and the default colour.
#[must_use]
pub fn info(title: impl Into<String>) -> serenity::CreateEmbed {
    serenity::CreateEmbed::default()
        .title(title)
        .colour(INFO_COLOUR)
}

/// Green embed for a completed action.
#[must_use]
pub fn success(title: impl Into<String>, description: impl Into<String>) -> serenity::CreateEmbed {
    serenity::CreateEmbed::default()
        .title(title)
        .description(description)
        .colour(SUCCESS_COLOUR)
}

/// Red embed for a rejected action.
#[must_use]
pub fn error(description: impl Into<String>) -> serenity::CreateEmbed {
    serenity::CreateEmbed::default()
        .title("❌ Error")
        .description(description)
        .colour(ERROR_COLOUR)
}

/// Sends one embed as the reply.
pub async fn send(ctx: Context<'_>, embed: serenity::CreateEmbed) -> Result<()> {
    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Splits `lines` into pages of at most `per_page` lines and shows them with page buttons.
pub async fn paginate_lines(ctx: Context<'_>, header: &str, lines: &[String], per_page: usize) -> Result<()> {
    let pages: Vec<String> = lines
        .chunks(per_page.max(1))
        .map(|chunk| format!("{header}\n\n{}", chunk.join("\n")))
        .collect();

    if pages.len() <= 1 {
        let page = pages.into_iter().next().unwrap_or_else(|| header.to_string());
        ctx.say(page).await?;
        return Ok(());
    }

    let page_refs: Vec<&str> = pages.iter().map(String::as_str).collect();
    poise::builtins::paginate(ctx, &page_refs).await?;
    Ok(())
}

/// Cuts `text` to at most `max` characters, marking the cut.
#[must_use]
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max.saturating_sub(1)).collect();
    cut.push('…');
    cut
}
