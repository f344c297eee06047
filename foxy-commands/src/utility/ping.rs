use foxy_core::{Context, Error};

use crate::{CommandMeta, CommandScope};

pub const META: CommandMeta = CommandMeta {
    name: "ping",
    desc: "Перевірити, що бот на звʼязку",
    category: "utility",
    usage: "!ping",
    min_level: 0,
    scope: CommandScope::Both,
};

#[poise::command(prefix_command, slash_command, category = "Utility")]
pub async fn ping(ctx: Context<'_>) -> Result<(), Error> {
    ctx.say("Pong!").await?;
    Ok(())
}
