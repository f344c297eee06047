use poise::serenity_prelude as serenity;
use tracing::info;

use foxy_core::{Context, Error};
use foxy_database::impls::admins::{add_admin, delete_admin, list_admins, set_admin_level};
use foxy_database::model::admins::{AdminEntry, MAX_ADMIN_LEVEL};
use foxy_utils::formatting::{display_name, normalize_username};
use foxy_utils::parse::parse_user_id;

use crate::access::{ensure_private, require_level, sync_owner_profile, user_display_name};
use crate::{CommandMeta, CommandScope};

pub const ADDA_META: CommandMeta = CommandMeta {
    name: "adda",
    desc: "Додати адміністратора (рівень 1)",
    category: "admin",
    usage: "!adda <id>",
    min_level: 4,
    scope: CommandScope::Private,
};

pub const ALVL_META: CommandMeta = CommandMeta {
    name: "alvl",
    desc: "Змінити рівень адміністратора",
    category: "admin",
    usage: "!alvl <id> <1-4>",
    min_level: 4,
    scope: CommandScope::Private,
};

pub const DELA_META: CommandMeta = CommandMeta {
    name: "dela",
    desc: "Видалити адміністратора",
    category: "admin",
    usage: "!dela <id>",
    min_level: 4,
    scope: CommandScope::Private,
};

pub const ADMLIST_META: CommandMeta = CommandMeta {
    name: "admlist",
    desc: "Список адміністраторів",
    category: "admin",
    usage: "!admlist",
    min_level: 4,
    scope: CommandScope::Private,
};

const MISSING_ID_TEXT: &str = "Вкажи ID.";
const INVALID_ID_TEXT: &str = "Невірний ID.";
const NOT_FOUND_TEXT: &str = "Не знайдено.";

/// Shared preamble of the admin management commands: DM only, owner synced, top tier.
async fn admin_gate(ctx: Context<'_>) -> Result<bool, Error> {
    if !ensure_private(ctx).await? {
        return Ok(false);
    }

    sync_owner_profile(ctx).await?;
    require_level(ctx, MAX_ADMIN_LEVEL).await
}

/// Parse the user id argument, answering with the matching error text when it is unusable.
async fn user_id_argument(ctx: Context<'_>, raw: Option<&str>) -> Result<Option<u64>, Error> {
    let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
        ctx.say(MISSING_ID_TEXT).await?;
        return Ok(None);
    };

    match parse_user_id(raw) {
        Some(user_id) => Ok(Some(user_id)),
        None => {
            ctx.say(INVALID_ID_TEXT).await?;
            Ok(None)
        }
    }
}

#[poise::command(prefix_command, slash_command, category = "Admin")]
pub async fn adda(
    ctx: Context<'_>,
    #[description = "ID користувача"] user_id: Option<String>,
) -> Result<(), Error> {
    if !admin_gate(ctx).await? {
        return Ok(());
    }

    let Some(user_id) = user_id_argument(ctx, user_id.as_deref()).await? else {
        return Ok(());
    };

    let (name, username) = match serenity::UserId::new(user_id).to_user(ctx.http()).await {
        Ok(user) => (user_display_name(&user), normalize_username(&user.name)),
        Err(_) => (String::new(), String::new()),
    };

    add_admin(&ctx.data().db, user_id, &name, &username).await?;
    info!(user_id, added_by = ctx.author().id.get(), "admin added");

    ctx.say("Додано.").await?;
    Ok(())
}

#[poise::command(prefix_command, slash_command, category = "Admin")]
pub async fn alvl(
    ctx: Context<'_>,
    #[description = "ID адміністратора"] user_id: Option<String>,
    #[description = "Новий рівень (1-4)"] level: Option<String>,
) -> Result<(), Error> {
    if !admin_gate(ctx).await? {
        return Ok(());
    }

    let (Some(raw_id), Some(raw_level)) = (user_id, level) else {
        ctx.say("Вкажи ID та рівень.").await?;
        return Ok(());
    };

    let Some(user_id) = user_id_argument(ctx, Some(&raw_id)).await? else {
        return Ok(());
    };

    let Ok(level) = raw_level.trim().parse::<i32>() else {
        ctx.say("Невірний рівень.").await?;
        return Ok(());
    };

    if !(1..=MAX_ADMIN_LEVEL).contains(&level) {
        ctx.say("Рівень 1-4.").await?;
        return Ok(());
    }

    if !set_admin_level(&ctx.data().db, user_id, level).await? {
        ctx.say(NOT_FOUND_TEXT).await?;
        return Ok(());
    }

    info!(user_id, level, changed_by = ctx.author().id.get(), "admin level changed");
    ctx.say("Готово.").await?;
    Ok(())
}

#[poise::command(prefix_command, slash_command, category = "Admin")]
pub async fn dela(
    ctx: Context<'_>,
    #[description = "ID адміністратора"] user_id: Option<String>,
) -> Result<(), Error> {
    if !admin_gate(ctx).await? {
        return Ok(());
    }

    let Some(user_id) = user_id_argument(ctx, user_id.as_deref()).await? else {
        return Ok(());
    };

    if !delete_admin(&ctx.data().db, user_id).await? {
        ctx.say(NOT_FOUND_TEXT).await?;
        return Ok(());
    }

    info!(user_id, removed_by = ctx.author().id.get(), "admin removed");
    ctx.say("Видалено.").await?;
    Ok(())
}

#[poise::command(prefix_command, slash_command, category = "Admin")]
pub async fn admlist(ctx: Context<'_>) -> Result<(), Error> {
    if !admin_gate(ctx).await? {
        return Ok(());
    }

    let admins = list_admins(&ctx.data().db).await?;
    if admins.is_empty() {
        ctx.say("Список порожній.").await?;
        return Ok(());
    }

    let text = admins.iter().map(admin_line).collect::<Vec<_>>().join("\n");
    ctx.say(text).await?;
    Ok(())
}

fn admin_line(admin: &AdminEntry) -> String {
    let name = display_name([admin.display_name.as_str()]);
    let mut line = format!("{} — {} — {}", name, admin.user_id, admin.level);
    if !admin.username.is_empty() {
        line.push_str(&format!(" — @{}", admin.username));
    }
    line
}

#[cfg(test)]
mod tests {
    use foxy_database::model::admins::AdminEntry;

    use super::admin_line;

    #[test]
    fn admin_lines_fall_back_to_nameless() {
        let named = AdminEntry {
            user_id: 1,
            display_name: "Alex".to_owned(),
            username: "alex".to_owned(),
            level: 4,
        };
        assert_eq!(admin_line(&named), "Alex — 1 — 4 — @alex");

        let bare = AdminEntry {
            user_id: 2,
            display_name: String::new(),
            username: String::new(),
            level: 1,
        };
        assert_eq!(admin_line(&bare), "Без імені — 2 — 1");
    }
}
