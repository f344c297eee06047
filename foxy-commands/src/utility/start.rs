use foxy_core::{Context, Error};

use crate::{CommandMeta, CommandScope};

pub const META: CommandMeta = CommandMeta {
    name: "start",
    desc: "Познайомитися з ботом",
    category: "utility",
    usage: "!start",
    min_level: 0,
    scope: CommandScope::Private,
};

const GREETING_TEXT: &str = "Привіт, я - JRツFoxy.\n\
     Я помічничка клану JokerRecon CODM.\n\
     Для того, щоб я тобі сказала, що я можу - відправ /help";

#[poise::command(prefix_command, slash_command, category = "Utility")]
pub async fn start(ctx: Context<'_>) -> Result<(), Error> {
    ctx.say(GREETING_TEXT).await?;
    Ok(())
}
