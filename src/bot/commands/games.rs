//! Minigames - scavenging, mazes and trivia.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{Context, commands::author_id, embeds},
        core::{
            item,
            maze::{self, Direction, Maze},
            player, scavenge,
        },
        entities::Currency,
        errors::Result,
        services::trivia,
    };
    use poise::serenity_prelude as serenity;
    use std::fmt::Write;
    use std::time::Duration;
    use tracing::info;

    const MAZE_MOVE_TIMEOUT: Duration = Duration::from_secs(120);
    const TRIVIA_TIMEOUT: Duration = Duration::from_secs(30);
    const ANSWER_LETTERS: [&str; 4] = ["A", "B", "C", "D"];

    /// Searches the ruins for loot. Costs hunger.
    #[poise::command(slash_command)]
    pub async fn scavenge(ctx: Context<'_>) -> Result<()> {
        let db = &ctx.data().database;
        let config = ctx.data().game.scavenge;
        let user_id = author_id(ctx)?;

        let catalog = item::list_items(db, None).await?;
        let loot = scavenge::roll_loot(&mut rand::thread_rng(), &catalog, config.rolls);
        let outcome =
            scavenge::scavenge(db, user_id, loot, config.hunger_cost, config.experience).await?;

        let mut description = String::new();
        if outcome.loot.is_empty() {
            description.push_str("You came back empty-handed.\n");
        }
        for drop in &outcome.loot {
            writeln!(
                &mut description,
                "{}× {} ({})",
                drop.quantity,
                drop.item.display_name(),
                drop.item.rarity
            )?;
        }
        write!(
            &mut description,
            "\nHunger: **{}/{}** · Experience: **{}**",
            outcome.hunger,
            player::MAX_VITAL,
            outcome.experience
        )?;

        embeds::send(ctx, embeds::success("🔦 Scavenging trip", description)).await
    }

    fn maze_buttons(prefix: &str) -> Vec<serenity::CreateActionRow> {
        let button = |action: &str, emoji: &str| {
            serenity::CreateButton::new(format!("{prefix}_{action}"))
                .label(emoji)
                .style(serenity::ButtonStyle::Primary)
        };
        vec![serenity::CreateActionRow::Buttons(vec![
            button("left", "⬅️"),
            button("up", "⬆️"),
            button("down", "⬇️"),
            button("right", "➡️"),
            serenity::CreateButton::new(format!("{prefix}_quit"))
                .label("Give up")
                .style(serenity::ButtonStyle::Danger),
        ])]
    }

    fn maze_content(maze: &Maze, status: &str) -> String {
        format!("🧩 **Maze** · moves: {} · {status}\n{}", maze.moves(), maze.render())
    }

    /// Walk from the top-left corner to the flag to earn scrap metal.
    #[poise::command(slash_command)]
    pub async fn maze(
        ctx: Context<'_>,
        #[description = "Width in cells (2-10, defaults to 5)"]
        #[min = 2]
        #[max = 10]
        width: Option<u8>,
        #[description = "Height in cells (2-10, defaults to 5)"]
        #[min = 2]
        #[max = 10]
        height: Option<u8>,
    ) -> Result<()> {
        let user_id = author_id(ctx)?;
        let (width, height) = (
            usize::from(width.unwrap_or(5)),
            usize::from(height.unwrap_or(5)),
        );
        let mut maze = Maze::generate(&mut rand::thread_rng(), width, height)?;
        let reward = maze::reward(width, height);

        let prefix = ctx.id().to_string();
        let reply = ctx
            .send(
                poise::CreateReply::default()
                    .content(maze_content(&maze, &format!("reward: {reward} scrap metal")))
                    .components(maze_buttons(&prefix)),
            )
            .await?;

        loop {
            let filter_prefix = prefix.clone();
            let Some(mci) = serenity::ComponentInteractionCollector::new(ctx)
                .author_id(ctx.author().id)
                .channel_id(ctx.channel_id())
                .timeout(MAZE_MOVE_TIMEOUT)
                .filter(move |mci| mci.data.custom_id.starts_with(&filter_prefix))
                .await
            else {
                reply
                    .edit(
                        ctx,
                        poise::CreateReply::default()
                            .content(maze_content(&maze, "⌛ you wandered off"))
                            .components(vec![]),
                    )
                    .await?;
                return Ok(());
            };

            let direction = match mci.data.custom_id.rsplit('_').next() {
                Some("up") => Some(Direction::Up),
                Some("down") => Some(Direction::Down),
                Some("left") => Some(Direction::Left),
                Some("right") => Some(Direction::Right),
                _ => None,
            };

            let (status, finished) = match direction {
                None => ("🏳️ you gave up".to_string(), true),
                Some(direction) => {
                    let moved = maze.try_move(direction);
                    if maze.is_solved() {
                        let balance =
                            player::modify_currency(&ctx.data().database, user_id, Currency::ScrapMetal, reward)
                                .await?;
                        info!(user_id, reward, moves = maze.moves(), "Maze solved");
                        (format!("🎉 solved! +{reward} scrap metal (balance {balance})"), true)
                    } else if moved {
                        ("keep going".to_string(), false)
                    } else {
                        ("🧱 bumped into a wall".to_string(), false)
                    }
                }
            };

            let components = if finished { vec![] } else { maze_buttons(&prefix) };
            mci.create_response(
                ctx,
                serenity::CreateInteractionResponse::UpdateMessage(
                    serenity::CreateInteractionResponseMessage::new()
                        .content(maze_content(&maze, &status))
                        .components(components),
                ),
            )
            .await?;

            if finished {
                return Ok(());
            }
        }
    }

    /// Answers a multiple-choice question for scrap metal.
    #[poise::command(slash_command)]
    pub async fn trivia(ctx: Context<'_>) -> Result<()> {
        let user_id = author_id(ctx)?;
        ctx.defer().await?;
        let question = trivia::fetch_question(&ctx.data().http).await?;

        let prefix = ctx.id().to_string();
        let mut description = format!("**{}**\n\n", question.text);
        let mut buttons = Vec::with_capacity(question.answers.len());
        for (index, (answer, letter)) in question.answers.iter().zip(ANSWER_LETTERS).enumerate() {
            writeln!(&mut description, "**{letter}.** {answer}")?;
            buttons.push(
                serenity::CreateButton::new(format!("{prefix}_{index}"))
                    .label(letter)
                    .style(serenity::ButtonStyle::Primary),
            );
        }

        let embed = embeds::info(format!("❓ Trivia · {}", question.category))
            .description(description.clone())
            .footer(serenity::CreateEmbedFooter::new(format!(
                "{} · {} scrap metal · {} seconds",
                question.difficulty,
                question.difficulty.reward(),
                TRIVIA_TIMEOUT.as_secs()
            )));
        let reply = ctx
            .send(
                poise::CreateReply::default()
                    .embed(embed)
                    .components(vec![serenity::CreateActionRow::Buttons(buttons)]),
            )
            .await?;

        let filter_prefix = prefix.clone();
        let interaction = serenity::ComponentInteractionCollector::new(ctx)
            .author_id(ctx.author().id)
            .channel_id(ctx.channel_id())
            .timeout(TRIVIA_TIMEOUT)
            .filter(move |mci| mci.data.custom_id.starts_with(&filter_prefix))
            .await;

        let Some(mci) = interaction else {
            let result = embeds::error(format!(
                "{description}\n⌛ Time's up! The answer was **{}**.",
                question.correct_answer()
            ));
            reply
                .edit(ctx, poise::CreateReply::default().embed(result).components(vec![]))
                .await?;
            return Ok(());
        };

        let chosen = mci
            .data
            .custom_id
            .rsplit('_')
            .next()
            .and_then(|index| index.parse::<usize>().ok());

        let result = if chosen.is_some_and(|index| question.is_correct(index)) {
            let reward = question.difficulty.reward();
            player::modify_currency(&ctx.data().database, user_id, Currency::ScrapMetal, reward).await?;
            embeds::success(
                "✅ Correct!",
                format!("{description}\nThe answer was **{}**. +{reward} scrap metal.", question.correct_answer()),
            )
        } else {
            embeds::error(format!(
                "{description}\nWrong! The answer was **{}**.",
                question.correct_answer()
            ))
        };

        mci.create_response(
            ctx,
            serenity::CreateInteractionResponse::UpdateMessage(
                serenity::CreateInteractionResponseMessage::new()
                    .embed(result)
                    .components(vec![]),
            ),
        )
        .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
