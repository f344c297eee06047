use foxy_core::{Context, Error};
use foxy_database::impls::warnings::{count_active_warnings, list_active_warnings};
use foxy_utils::time::now_unix_secs;

use crate::moderation::report::{NO_WARNINGS_TEXT, mywarns_text};
use crate::{CommandMeta, CommandScope};

pub const META: CommandMeta = CommandMeta {
    name: "mywarns",
    desc: "Переглянути свої активні попередження",
    category: "moderation",
    usage: "!mywarns",
    min_level: 0,
    scope: CommandScope::Both,
};

#[poise::command(prefix_command, slash_command, category = "Moderation")]
pub async fn mywarns(ctx: Context<'_>) -> Result<(), Error> {
    let db = &ctx.data().db;
    let user_id = ctx.author().id.get();
    let now = now_unix_secs();

    if count_active_warnings(db, user_id, now).await? == 0 {
        ctx.say(NO_WARNINGS_TEXT).await?;
        return Ok(());
    }

    let active = list_active_warnings(db, user_id, now).await?;
    ctx.say(mywarns_text(&active)).await?;
    Ok(())
}
