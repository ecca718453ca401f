//! Framework error handler.
//!
//! Game-rule errors are shown to the player as a red embed. Anything else is
//! logged, forwarded to the log channel when one is configured and reported
//! to the player as a generic failure (with a short debug string outside
//! production).

use crate::{
    bot::{BotData, Context, embeds, handlers::hooks},
    errors::Error,
};
use poise::serenity_prelude as serenity;
use tracing::{error, warn};

const DEBUG_SNIPPET_LEN: usize = 1000;

/// Entry point registered as `FrameworkOptions::on_error`.
pub async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    if let Some(ctx) = error.ctx() {
        hooks::release_flag(ctx).await;
    }

    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Failed to start bot: {error:?}");
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            report(ctx, &error).await;
        }
        poise::FrameworkError::CommandCheckFailed {
            error: Some(error),
            ctx,
            ..
        } => {
            report(ctx, &error).await;
        }
        other => {
            if let Err(e) = poise::builtins::on_error(other).await {
                error!("Error while handling error: {e}");
            }
        }
    }
}

async fn report(ctx: Context<'_>, error: &Error) {
    let command = &ctx.command().qualified_name;

    if error.is_user_facing() {
        warn!(command = %command, user = %ctx.author().id, "Command rejected: {error}");
        reply(ctx, embeds::error(error.to_string())).await;
        return;
    }

    error!(command = %command, user = %ctx.author().id, "Command failed: {error:?}");
    forward_to_log_channel(ctx, error).await;

    let mut description = "Something went wrong while running this command.".to_string();
    if !ctx.data().settings.production {
        let snippet = embeds::truncate(&format!("{error:?}"), DEBUG_SNIPPET_LEN);
        description.push_str(&format!("\n```\n{snippet}\n```"));
    }
    reply(ctx, embeds::error(description)).await;
}

async fn reply(ctx: Context<'_>, embed: serenity::CreateEmbed) {
    let message = poise::CreateReply::default().embed(embed).ephemeral(true);
    if let Err(e) = ctx.send(message).await {
        error!("Failed to send error message: {e}");
    }
}

async fn forward_to_log_channel(ctx: Context<'_>, error: &Error) {
    let Some(channel) = ctx.data().settings.log_channel else {
        return;
    };

    let embed = serenity::CreateEmbed::default()
        .title(format!("Error in /{}", ctx.command().qualified_name))
        .description(format!(
            "```\n{}\n```",
            embeds::truncate(&format!("{error:?}"), 3900)
        ))
        .field("User", format!("<@{}>", ctx.author().id), true)
        .colour(embeds::ERROR_COLOUR);

    if let Err(e) = channel
        .send_message(ctx.http(), serenity::CreateMessage::new().embed(embed))
        .await
    {
        error!("Failed to forward error to log channel: {e}");
    }
}
