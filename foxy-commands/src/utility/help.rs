use foxy_core::{Context, Error};
use foxy_database::impls::admins::get_admin_level;
use foxy_utils::parse::parse_admin_level;

use crate::access::ensure_private;
use crate::{CommandMeta, CommandScope, commands_exact_level, commands_for_level};

pub const META: CommandMeta = CommandMeta {
    name: "help",
    desc: "Показати публічні команди",
    category: "utility",
    usage: "!help [1-4]",
    min_level: 0,
    scope: CommandScope::Both,
};

const TOO_EARLY_TEXT: &str = "Ще рано тобі використовувати такі команди. \
     Будь активний і принось користь - тоді можливо щось зміниться 😉";
const LEVEL_MISMATCH_TEXT: &str = "Нічого не вийде. Команди описані в цьому розділі не доступні тобі. \
     Використовуй цифру зі своїм рівнем.";
const INVALID_LEVEL_TEXT: &str = "Невірний рівень.";
const EMPTY_SECTION_TEXT: &str = "Поки що немає команд для цього розділу.";

#[poise::command(prefix_command, slash_command, category = "Utility")]
pub async fn help(
    ctx: Context<'_>,
    #[description = "Рівень адміністратора (1-4)"] level: Option<String>,
) -> Result<(), Error> {
    let Some(raw_level) = level else {
        let public = commands_for_level(0, Some(ctx.guild_id().is_some()));
        ctx.say(command_list("Публічні команди:", &public)).await?;
        return Ok(());
    };

    if !ensure_private(ctx).await? {
        return Ok(());
    }

    let Some(requested) = parse_admin_level(&raw_level) else {
        ctx.say(INVALID_LEVEL_TEXT).await?;
        return Ok(());
    };

    let current = get_admin_level(&ctx.data().db, ctx.author().id.get()).await?;
    if let Some(refusal) = level_gate(current, requested) {
        ctx.say(refusal).await?;
        return Ok(());
    }

    let commands = commands_exact_level(requested);
    ctx.say(command_list(&format!("Команди рівня {}:", requested), &commands))
        .await?;

    Ok(())
}

/// Refusal text when `current` may not browse the `requested` section.
fn level_gate(current: i32, requested: i32) -> Option<&'static str> {
    if current <= 0 {
        Some(TOO_EARLY_TEXT)
    } else if current < requested {
        Some(LEVEL_MISMATCH_TEXT)
    } else {
        None
    }
}

fn command_list(title: &str, commands: &[&CommandMeta]) -> String {
    if commands.is_empty() {
        return EMPTY_SECTION_TEXT.to_owned();
    }

    let mut lines = commands
        .iter()
        .map(|command| format!("/{} - {}", command.name, command.desc))
        .collect::<Vec<_>>();
    lines.sort_unstable();

    std::iter::once(title.to_owned())
        .chain(lines)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::{
        EMPTY_SECTION_TEXT, LEVEL_MISMATCH_TEXT, TOO_EARLY_TEXT, command_list, level_gate,
    };
    use crate::{commands_exact_level, commands_for_level};

    #[test]
    fn non_admins_are_too_early() {
        assert_eq!(level_gate(0, 1), Some(TOO_EARLY_TEXT));
        assert_eq!(level_gate(0, 4), Some(TOO_EARLY_TEXT));
    }

    #[test]
    fn higher_sections_are_refused() {
        assert_eq!(level_gate(2, 3), Some(LEVEL_MISMATCH_TEXT));
        assert_eq!(level_gate(3, 3), None);
        assert_eq!(level_gate(4, 1), None);
    }

    #[test]
    fn lists_are_titled_and_sorted() {
        let text = command_list("Публічні команди:", &commands_exact_level(0));
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("Публічні команди:"));
        let rest: Vec<&str> = lines.collect();
        let mut sorted = rest.clone();
        sorted.sort_unstable();
        assert_eq!(rest, sorted);
        assert!(rest.iter().any(|line| line.starts_with("/ping - ")));
    }

    #[test]
    fn empty_sections_say_so() {
        assert_eq!(command_list("Команди рівня 9:", &[]), EMPTY_SECTION_TEXT);
    }

    #[test]
    fn public_list_follows_the_invocation_context() {
        let private = command_list("Публічні команди:", &commands_for_level(0, Some(false)));
        assert!(private.contains("/mywarns - "));
        assert!(private.contains("/myid - "));
        assert!(!private.contains("/call - "));
        assert!(!private.contains("/warn - "));

        let group = command_list("Публічні команди:", &commands_for_level(0, Some(true)));
        assert!(group.contains("/call - "));
        assert!(group.contains("/mywarns - "));
        assert!(!group.contains("/myid - "));
    }
}
