pub mod access;
pub mod admin;
pub mod invite;
pub mod moderation;
pub mod utility;

use foxy_core::{Data, Error};

/// Where a command is meant to be used.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandScope {
    /// Direct messages with the bot.
    Private,
    /// Guild text channels.
    Group,
    Both,
}

impl CommandScope {
    /// Whether a command of this scope is listed for an invocation context.
    pub fn matches(self, in_guild: bool) -> bool {
        match self {
            Self::Both => true,
            Self::Private => !in_guild,
            Self::Group => in_guild,
        }
    }
}

pub struct CommandMeta {
    pub name: &'static str,
    pub desc: &'static str,
    pub category: &'static str,
    pub usage: &'static str,
    pub min_level: i32,
    pub scope: CommandScope,
}

pub const COMMANDS: &[CommandMeta] = &[
    utility::ping::META,
    utility::start::META,
    utility::help::META,
    utility::channelid::META,
    utility::predict::META,
    utility::call::CALL_META,
    utility::call::SCALL_META,
    moderation::warn::META,
    moderation::unwarn::META,
    moderation::winfo::META,
    moderation::mywarns::META,
    admin::myid::META,
    admin::admins::ADDA_META,
    admin::admins::ALVL_META,
    admin::admins::DELA_META,
    admin::admins::ADMLIST_META,
    admin::silence::ENABLE_META,
    admin::silence::DISABLE_META,
    admin::welcome::META,
    admin::broadcast::META,
    invite::candidate::META,
];

pub fn commands() -> Vec<poise::Command<Data, Error>> {
    vec![
        utility::ping::ping(),
        utility::start::start(),
        utility::help::help(),
        utility::channelid::channelid(),
        utility::predict::predict(),
        utility::call::call(),
        utility::call::scall(),
        moderation::warn::warn(),
        moderation::unwarn::unwarn(),
        moderation::winfo::winfo(),
        moderation::mywarns::mywarns(),
        admin::myid::myid(),
        admin::admins::adda(),
        admin::admins::alvl(),
        admin::admins::dela(),
        admin::admins::admlist(),
        admin::silence::silence_enable(),
        admin::silence::silence_disable(),
        admin::welcome::uploadwelcome(),
        admin::broadcast::send(),
        invite::candidate::candidate(),
    ]
}

/// Commands available at `level`, optionally narrowed to an invocation context.
pub fn commands_for_level(level: i32, in_guild: Option<bool>) -> Vec<&'static CommandMeta> {
    COMMANDS
        .iter()
        .filter(|command| command.min_level <= level)
        .filter(|command| in_guild.is_none_or(|in_guild| command.scope.matches(in_guild)))
        .collect()
}

/// Commands whose required level is exactly `level`.
pub fn commands_exact_level(level: i32) -> Vec<&'static CommandMeta> {
    COMMANDS
        .iter()
        .filter(|command| command.min_level == level)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::{COMMANDS, CommandScope, commands, commands_exact_level, commands_for_level};

    #[test]
    fn registry_matches_registered_commands() {
        let registered: HashSet<String> = commands().into_iter().map(|c| c.name).collect();
        let described: HashSet<String> = COMMANDS.iter().map(|c| c.name.to_owned()).collect();
        assert_eq!(registered, described);
        assert_eq!(COMMANDS.len(), described.len());
    }

    #[test]
    fn scope_matching() {
        assert!(CommandScope::Both.matches(true));
        assert!(CommandScope::Both.matches(false));
        assert!(CommandScope::Private.matches(false));
        assert!(!CommandScope::Private.matches(true));
        assert!(CommandScope::Group.matches(true));
        assert!(!CommandScope::Group.matches(false));
    }

    #[test]
    fn public_commands_include_checklist_entry_points() {
        let public: Vec<&str> = commands_exact_level(0).iter().map(|c| c.name).collect();
        assert!(public.contains(&"ping"));
        assert!(public.contains(&"mywarns"));
        assert!(!public.contains(&"warn"));
    }

    #[test]
    fn level_filter_is_cumulative() {
        let level_three: Vec<&str> = commands_for_level(3, None).iter().map(|c| c.name).collect();
        assert!(level_three.contains(&"warn"));
        assert!(level_three.contains(&"winfo"));
        assert!(!level_three.contains(&"adda"));

        let private_public: Vec<&str> = commands_for_level(0, Some(false))
            .iter()
            .map(|c| c.name)
            .collect();
        assert!(private_public.contains(&"ping"));
        assert!(!private_public.contains(&"call"));
    }

    #[test]
    fn exact_level_excludes_lower_tiers() {
        let level_four = commands_exact_level(4);
        assert!(!level_four.is_empty());
        assert!(level_four.iter().all(|c| c.min_level == 4));
    }
}
