use std::sync::LazyLock;

use regex::Regex;

static COMMAND_TEXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[!/]\w+").expect("command pattern is valid"));

/// Whether a message body looks like a bot command (`!warn`, `/mywarns`, ...).
///
/// Such messages belong to the command framework and must not be consumed by
/// passive collectors.
pub fn is_command_text(content: &str) -> bool {
    COMMAND_TEXT.is_match(content.trim_start())
}

/// Parse a raw snowflake or a user mention (`<@123>` / `<@!123>`).
pub fn parse_user_id(raw: &str) -> Option<u64> {
    let value = raw.trim();
    if let Ok(id) = value.parse::<u64>() {
        return Some(id).filter(|id| *id > 0);
    }

    value
        .strip_prefix("<@")
        .and_then(|rest| rest.strip_suffix('>'))
        .map(|inner| inner.trim_start_matches('!'))
        .and_then(|inner| inner.parse::<u64>().ok())
        .filter(|id| *id > 0)
}

/// Parse a comma or whitespace separated list of snowflakes.
///
/// Returns `None` when any entry is not a valid id.
pub fn parse_id_list(raw: &str) -> Option<Vec<u64>> {
    raw.split(|ch: char| ch == ',' || ch.is_whitespace())
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| entry.parse::<u64>().ok())
        .collect()
}

/// Parse an admin level argument, accepting only the 1..=4 tiers.
pub fn parse_admin_level(raw: &str) -> Option<i32> {
    raw.trim()
        .parse::<i32>()
        .ok()
        .filter(|level| (1..=4).contains(level))
}

#[cfg(test)]
mod tests {
    use super::{is_command_text, parse_admin_level, parse_id_list, parse_user_id};

    #[test]
    fn detects_command_messages() {
        assert!(is_command_text("!warn @fox spam"));
        assert!(is_command_text("/mywarns"));
        assert!(is_command_text("  !send hello"));
        assert!(!is_command_text("hello /warn"));
        assert!(!is_command_text("! warn"));
        assert!(!is_command_text(""));
        assert!(!is_command_text("просто повідомлення"));
    }

    #[test]
    fn parses_user_ids() {
        assert_eq!(parse_user_id("123"), Some(123));
        assert_eq!(parse_user_id("<@123>"), Some(123));
        assert_eq!(parse_user_id("<@!123>"), Some(123));
        assert_eq!(parse_user_id("<#123>"), None);
        assert_eq!(parse_user_id("0"), None);
        assert_eq!(parse_user_id("fox"), None);
    }

    #[test]
    fn parses_id_lists() {
        assert_eq!(parse_id_list("1,2, 3"), Some(vec![1, 2, 3]));
        assert_eq!(parse_id_list("4 5"), Some(vec![4, 5]));
        assert_eq!(parse_id_list(""), Some(vec![]));
        assert_eq!(parse_id_list("1,x"), None);
    }

    #[test]
    fn admin_levels_are_bounded() {
        assert_eq!(parse_admin_level("1"), Some(1));
        assert_eq!(parse_admin_level(" 4 "), Some(4));
        assert_eq!(parse_admin_level("0"), None);
        assert_eq!(parse_admin_level("5"), None);
        assert_eq!(parse_admin_level("two"), None);
    }
}
