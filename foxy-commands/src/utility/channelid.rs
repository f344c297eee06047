use poise::serenity_prelude as serenity;

use foxy_core::{Context, Error};
use foxy_utils::permissions::has_user_permission;

use crate::{CommandMeta, CommandScope};

pub const META: CommandMeta = CommandMeta {
    name: "channelid",
    desc: "Показати ID каналу та сервера",
    category: "utility",
    usage: "!channelid",
    min_level: 0,
    scope: CommandScope::Group,
};

#[poise::command(prefix_command, slash_command, category = "Utility")]
pub async fn channelid(ctx: Context<'_>) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say("Ця команда працює тільки в групових чатах, куди я додана.")
            .await?;
        return Ok(());
    };

    let bot_id = ctx.serenity_context().cache.current_user().id;
    if !has_user_permission(
        ctx.http(),
        guild_id,
        bot_id,
        serenity::Permissions::ADMINISTRATOR,
    )
    .await?
    {
        ctx.say(
            "Я не адміністраторка у цьому чаті. Дай мені права адміна, тоді зможу працювати коректно.",
        )
        .await?;
        return Ok(());
    }

    ctx.say(format!(
        "ID цього каналу:\n`{}`\nID сервера:\n`{}`",
        ctx.channel_id().get(),
        guild_id.get()
    ))
    .await?;

    Ok(())
}
