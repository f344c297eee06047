//! Text rendering for warning announcements and reports.

use foxy_database::model::warnings::WarningRecord;
use foxy_utils::formatting::escape_mentions;
use foxy_utils::time::format_ua_date;

/// Discord rejects message content above this many characters.
pub const MESSAGE_LIMIT: usize = 2000;

pub const NO_WARNINGS_TEXT: &str = "У тебе немає ні попереджень, ні совісті дарма мене турбувати!";
pub const NOTHING_TO_REVOKE_TEXT: &str = "Немає активних попереджень для зняття.";

pub fn warning_announcement(
    member_mention: &str,
    admin_mention: &str,
    reason: &str,
    expires_at: u64,
) -> String {
    [
        format!("Учасник клану {} - отримав попередження!", member_mention),
        format!(" Адміністратор, що виніс попередження: {}", admin_mention),
        format!(" Причина: {}", escape_mentions(reason)),
        format!(" Діє до: {}", format_ua_date(expires_at)),
    ]
    .join("\n")
}

pub fn revocation_announcement(member_mention: &str) -> String {
    format!("Знято останнє активне попередження з {}.", member_mention)
}

/// Admin log report: active warnings first, then the full history with status labels.
pub fn winfo_report(
    target_mention: &str,
    active: &[WarningRecord],
    history: &[WarningRecord],
    now: u64,
) -> String {
    let mut lines = vec![format!("Попередження для {}:", target_mention)];

    if active.is_empty() {
        lines.push("Активних попереджень немає.".to_owned());
    } else {
        lines.push(format!("Активні попередження: {}", active.len()));
        for warning in active {
            lines.push(format!(
                "- {} > {}",
                format_ua_date(warning.issued_at),
                escape_mentions(&warning.reason)
            ));
        }
    }

    if history.is_empty() {
        lines.push("Історія попереджень порожня.".to_owned());
    } else {
        lines.push("Повна історія:".to_owned());
        for warning in history {
            lines.push(format!(
                "- {} > {} ({})",
                format_ua_date(warning.issued_at),
                escape_mentions(&warning.reason),
                warning.status(now).label()
            ));
        }
    }

    clamp_lines(&lines, MESSAGE_LIMIT)
}

/// Summary shown to a member asking about their own warnings.
pub fn mywarns_text(active: &[WarningRecord]) -> String {
    let Some(latest_expiry) = active.iter().map(|warning| warning.expires_at).max() else {
        return NO_WARNINGS_TEXT.to_owned();
    };

    format!(
        "Активних попереджень: {}\nНайсвіжіше діє до: {}",
        active.len(),
        format_ua_date(latest_expiry)
    )
}

/// Join lines, dropping trailing ones that would push the text over `limit` characters.
fn clamp_lines(lines: &[String], limit: usize) -> String {
    const ELLIPSIS: &str = "…";

    let mut out = String::new();
    let mut used = 0;
    for (index, line) in lines.iter().enumerate() {
        let separator = usize::from(index > 0);
        let line_len = line.chars().count();
        if used + separator + line_len > limit.saturating_sub(2) {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(ELLIPSIS);
            return out;
        }
        if index > 0 {
            out.push('\n');
        }
        out.push_str(line);
        used += separator + line_len;
    }

    out
}

#[cfg(test)]
mod tests {
    use foxy_database::model::warnings::WarningRecord;

    use super::{NO_WARNINGS_TEXT, clamp_lines, mywarns_text, warning_announcement, winfo_report};

    // 2026-10-18 12:00 UTC
    const DAY: u64 = 1_792_324_800;

    fn warning(id: i64, reason: &str, expires_at: u64, is_revoked: bool) -> WarningRecord {
        WarningRecord {
            id,
            guild_id: 1,
            user_id: 2,
            reason: reason.to_owned(),
            issued_at: DAY,
            expires_at,
            issued_by: 3,
            issued_by_level: 3,
            is_revoked,
            revoked_at: None,
            revoked_by: None,
        }
    }

    #[test]
    fn announcement_names_everyone_and_the_expiry() {
        let text = warning_announcement("<@2>", "<@3>", "спам @everyone", DAY);
        assert_eq!(
            text,
            "Учасник клану <@2> - отримав попередження!\n \
             Адміністратор, що виніс попередження: <@3>\n \
             Причина: спам @\u{200B}everyone\n \
             Діє до: 18 жовтня 2026 року"
        );
    }

    #[test]
    fn report_lists_active_and_history() {
        let active = vec![warning(2, "флуд", DAY + 100, false)];
        let history = vec![
            warning(2, "флуд", DAY + 100, false),
            warning(1, "спам", DAY + 100, true),
            warning(0, "мат", DAY - 1, false),
        ];
        let report = winfo_report("<@2>", &active, &history, DAY);
        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(lines[0], "Попередження для <@2>:");
        assert_eq!(lines[1], "Активні попередження: 1");
        assert_eq!(lines[2], "- 18 жовтня 2026 року > флуд");
        assert_eq!(lines[3], "Повна історія:");
        assert!(lines[4].ends_with("(активне)"));
        assert!(lines[5].ends_with("(скасовано)"));
        assert!(lines[6].ends_with("(прострочено)"));
    }

    #[test]
    fn empty_report_says_so() {
        let report = winfo_report("<@2>", &[], &[], DAY);
        assert_eq!(
            report,
            "Попередження для <@2>:\nАктивних попереджень немає.\nІсторія попереджень порожня."
        );
    }

    #[test]
    fn mywarns_shows_latest_expiry() {
        assert_eq!(mywarns_text(&[]), NO_WARNINGS_TEXT);

        let active = vec![
            warning(1, "a", DAY, false),
            warning(2, "b", DAY + 86_400, false),
        ];
        assert_eq!(
            mywarns_text(&active),
            "Активних попереджень: 2\nНайсвіжіше діє до: 19 жовтня 2026 року"
        );
    }

    #[test]
    fn long_reports_are_clamped() {
        let lines: Vec<String> = (0..500).map(|i| format!("рядок {i}")).collect();
        let text = clamp_lines(&lines, 100);
        assert!(text.chars().count() <= 100);
        assert!(text.ends_with('…'));
        assert!(text.starts_with("рядок 0\n"));
    }
}
