use poise::{Context, CreateReply, FrameworkError};
use tracing::{error, warn};

use crate::{commands::CommandError, BotState};

pub async fn handle_error(error: FrameworkError<'_, BotState, CommandError>) {
    use FrameworkError::*;

    match error {
        Setup { error, .. } => {
            error!("Error in bot setup: {}", error);
        }

        EventHandler { error, event, .. } => {
            error!(
                "Error in {} event handler: {}",
                event.snake_case_name(),
                error
            );
        }

        Command { error, ctx, .. } => match error {
            CommandError::User { message } => {
                reply_with_error(ctx, &message).await;
            }

            CommandError::Internal { message } => {
                error!(
                    "Internal error in `/{}`: {}",
                    ctx.command().qualified_name,
                    message
                );
                reply_with_internal_error(ctx, &message).await;
            }

            CommandError::Serenity(error) => {
                error!(
                    "Serenity error in `/{}`: {}",
                    ctx.command().qualified_name,
                    error
                );
                reply_with_internal_error(ctx, &error.to_string()).await;
            }
        },

        ArgumentParse {
            error, input, ctx, ..
        } => {
            let response = match input {
                Some(input) => format!("**Sorry, cannot parse `{}`.**\n{}", input, error),
                None => format!("**{}**", error),
            };

            reply_with_error(ctx, &response).await;
        }

        SubcommandRequired { ctx, .. } => {
            let subcommands = ctx
                .command()
                .subcommands
                .iter()
                .map(|subcommand| format!("`/{}`", subcommand.qualified_name))
                .collect::<Vec<_>>()
                .join(", ");

            reply_with_error(ctx, &format!("Please use one of: {subcommands}.")).await;
        }

        CommandStructureMismatch {
            description, ctx, ..
        } => {
            error!(
                "Failed to deserialize interaction arguments for `/{}`: {}",
                ctx.command.qualified_name, description
            );
        }

        CooldownHit {
            remaining_cooldown,
            ctx,
            ..
        } => {
            reply_with_error(
                ctx,
                &format!(
                    "Sorry, you're too fast. Please try again in {} s.",
                    remaining_cooldown.as_secs()
                ),
            )
            .await;
        }

        MissingBotPermissions {
            missing_permissions,
            ctx,
            ..
        } => {
            warn!(
                "Missing bot permissions for `/{}`: {}",
                ctx.command().qualified_name,
                missing_permissions
            );
            reply_with_error(
                ctx,
                "Sorry, the bot lacks permissions necessary to execute this command.",
            )
            .await;
        }

        MissingUserPermissions { ctx, .. } => {
            reply_with_error(
                ctx,
                "Sorry, you don't have permissions necessary to run this command.",
            )
            .await;
        }

        GuildOnly { ctx, .. } => {
            reply_with_error(ctx, "Sorry, but you can only run this command in a server.").await;
        }

        CommandCheckFailed { error, ctx, .. } => {
            let message = match error {
                Some(error) => format!(
                    "Sorry, can't run this command due to a failed command check: {}",
                    error
                ),
                None => "Sorry, can't run this command due to a failed command check.".to_string(),
            };

            reply_with_error(ctx, &message).await;
        }

        UnknownInteraction { interaction, .. } => {
            warn!("Received an unknown interaction: {:?}", interaction.data.name);
        }

        error => {
            error!("Unhandled framework error: {}", error);
        }
    }
}

async fn reply_with_error(ctx: Context<'_, BotState, CommandError>, error_message: &str) {
    if let Err(send_error) = ctx
        .send(
            CreateReply::default()
                .content(error_message)
                .ephemeral(true),
        )
        .await
    {
        error!(
            "Failed to send an error message to the user: {}\nThe message was: {}",
            send_error, error_message
        );
    }
}

async fn reply_with_internal_error(ctx: Context<'_, BotState, CommandError>, error_message: &str) {
    reply_with_error(
        ctx,
        &format!(
            "Sorry, there was an internal error while executing your command: {}",
            error_message
        ),
    )
    .await;
}
