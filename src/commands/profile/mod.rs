mod set;
mod show;
mod skill;

use super::{CommandResult, Context};

#[poise::command(
    slash_command,
    subcommands("set::set", "skill::skill", "show::show"),
    subcommand_required
)]
pub async fn profile(_ctx: Context<'_>) -> CommandResult {
    Ok(())
}
