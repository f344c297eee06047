use foxy_core::{Context, Error};
use foxy_database::impls::admins::{get_admin_level, update_admin_profile};
use foxy_utils::formatting::{display_name, normalize_username};

use crate::access::{sync_owner_profile, user_display_name};
use crate::{CommandMeta, CommandScope};

pub const META: CommandMeta = CommandMeta {
    name: "myid",
    desc: "Показати свій ID",
    category: "admin",
    usage: "!myid",
    min_level: 0,
    scope: CommandScope::Private,
};

#[poise::command(prefix_command, slash_command, category = "Admin")]
pub async fn myid(ctx: Context<'_>) -> Result<(), Error> {
    if ctx.guild_id().is_some() {
        ctx.say("Тільки в приваті.").await?;
        return Ok(());
    }

    sync_owner_profile(ctx).await?;

    let author = ctx.author();
    let name = display_name([user_display_name(author).as_str()]);
    let username = normalize_username(&author.name);

    let db = &ctx.data().db;
    if get_admin_level(db, author.id.get()).await? > 0 {
        update_admin_profile(db, author.id.get(), &name, &username).await?;
    }

    ctx.say(id_line(&name, author.id.get(), &username)).await?;
    Ok(())
}

fn id_line(name: &str, user_id: u64, username: &str) -> String {
    let mut parts = vec![name.to_owned(), user_id.to_string()];
    if !username.is_empty() {
        parts.push(format!("@{}", username));
    }
    parts.join(" — ")
}

#[cfg(test)]
mod tests {
    use super::id_line;

    #[test]
    fn id_line_skips_missing_username() {
        assert_eq!(id_line("Лис", 42, "fox"), "Лис — 42 — @fox");
        assert_eq!(id_line("Лис", 42, ""), "Лис — 42");
    }
}
