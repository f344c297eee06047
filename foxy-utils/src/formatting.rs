/// Placeholder replaced with the newcomer mention in welcome templates.
pub const MENTION_PLACEHOLDER: &str = "{mention}";

/// Fallback display name when a profile has no usable name.
pub const NAMELESS: &str = "Без імені";

/// Render a clickable user mention.
pub fn user_mention(user_id: u64) -> String {
    format!("<@{}>", user_id)
}

/// Render a clickable channel mention.
pub fn channel_mention(channel_id: u64) -> String {
    format!("<#{}>", channel_id)
}

/// Break `@everyone`/`@here` style pings in user supplied text.
pub fn escape_mentions(raw: &str) -> String {
    raw.replace('@', "@\u{200B}")
}

/// Join non-empty name parts with a single space, falling back to [`NAMELESS`].
pub fn display_name<'a>(parts: impl IntoIterator<Item = &'a str>) -> String {
    let joined = parts
        .into_iter()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    if joined.is_empty() {
        NAMELESS.to_owned()
    } else {
        joined
    }
}

/// Strip a leading `@` from a stored username.
pub fn normalize_username(raw: &str) -> String {
    raw.trim().trim_start_matches('@').to_owned()
}

/// Make sure a sentence ends with terminal punctuation, appending a period when needed.
pub fn ensure_terminal_punctuation(raw: &str) -> String {
    let trimmed = raw.trim_end();
    match trimmed.chars().last() {
        Some('.' | '!' | '?' | '…') => trimmed.to_owned(),
        Some(_) => format!("{}.", trimmed),
        None => String::new(),
    }
}

/// Substitute the newcomer mention into a welcome template.
pub fn render_welcome(template: &str, user_id: u64) -> String {
    template.replace(MENTION_PLACEHOLDER, &user_mention(user_id))
}

/// Link to a channel inside a guild.
pub fn channel_url(guild_id: u64, channel_id: u64) -> String {
    format!("https://discord.com/channels/{}/{}", guild_id, channel_id)
}

#[cfg(test)]
mod tests {
    use super::{
        NAMELESS, display_name, ensure_terminal_punctuation, escape_mentions, normalize_username,
        render_welcome, user_mention,
    };

    #[test]
    fn mentions_use_discord_markup() {
        assert_eq!(user_mention(42), "<@42>");
    }

    #[test]
    fn escapes_mass_pings() {
        assert_eq!(escape_mentions("@everyone look"), "@\u{200B}everyone look");
        assert_eq!(escape_mentions("plain"), "plain");
    }

    #[test]
    fn display_names_skip_empty_parts() {
        assert_eq!(display_name(["Alex", "", "Roshe"]), "Alex Roshe");
        assert_eq!(display_name([" ", ""]), NAMELESS);
    }

    #[test]
    fn usernames_lose_leading_at() {
        assert_eq!(normalize_username("@fox"), "fox");
        assert_eq!(normalize_username("fox"), "fox");
    }

    #[test]
    fn terminal_punctuation_is_not_doubled() {
        assert_eq!(ensure_terminal_punctuation("Сьогодні щастить"), "Сьогодні щастить.");
        assert_eq!(ensure_terminal_punctuation("Так!  "), "Так!");
        assert_eq!(ensure_terminal_punctuation("Можливо…"), "Можливо…");
        assert_eq!(ensure_terminal_punctuation(""), "");
    }

    #[test]
    fn welcome_template_gets_mention() {
        assert_eq!(render_welcome("{mention}, вітаю!", 7), "<@7>, вітаю!");
        assert_eq!(render_welcome("без згадки", 7), "без згадки");
    }
}
