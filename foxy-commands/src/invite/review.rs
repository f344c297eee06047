//! Candidate review in the reception guild: button ids, texts and the buttons message.

use poise::serenity_prelude as serenity;
use tracing::info;

use foxy_database::Database;
use foxy_database::impls::candidates::set_candidate_buttons_message;
use foxy_database::impls::tasks::{cancel_pending_tasks, schedule_task};
use foxy_database::model::tasks::TASK_INVITE_REVIEW_DUE;

/// Admin tier allowed to decide on candidates.
pub const MIN_REVIEW_LEVEL: i32 = 2;
pub const REVIEW_DELAY_SECS: u64 = 3 * 60 * 60;
pub const WAIT_DELAY_SECS: u64 = 36 * 60 * 60;
pub const INVITE_LIFETIME_SECS: u32 = 24 * 60 * 60;

const BUTTON_PREFIX: &str = "inv";

pub const INVITE_WELCOME_TEXT: &str = "Привіт! Цей канал - місце нашого першого знайомства з адміністрацією клану. \
     А за лаштунками все готується до твого прийняття в клан. Як тільки хтось \
     з адміністрації звільниться - ви поспілкуєтеся, а поки напиши нам: звідки \
     ти, скільки років, в якому клані був до і як дізнався про нас. Буде класно, \
     коли ми найдемо наш \"конект\".";

pub const ADMIN_LOG_NEW_CANDIDATE_TEXT: &str = "Долучився новий кандидат в Приймальню. Через 3 год з’являться кнопки дії \
     або /candidate на кандидата, щоб скоріше прийняти (якщо відповідає умовам). \
     Кнопка почекати - дасть ще 36 годин очікування на виконання умов кандидатом. \
     Поспілкуйтеся з ним";

pub const REVIEW_BUTTONS_TEXT: &str = "Настав час адміністрації прийняти рішення щодо кандидата. Натисніть на одну з трьох \
     кнопок: Прийняти - якщо кандидат відповідає всім вимогам, почекати - дати додатково \
     36 годин на виконання умов, Відмовити, якщо кандидат не відповідає вимогам клану.";

pub const WAIT_DONE_TEXT: &str = "Рішення щодо кандидата відкладено на 36 годин. За цей час кандидат повинен \
     виконати вимоги, поставлені адміністрацією.";

pub const LEFT_RECEPTION_TEXT: &str =
    "Не дочекавшись свого зіркового часу - прибульці полетіли далі";

pub const ADMINS_ONLY_TEXT: &str = "Слухаюся лише адміністраторів";
pub const NOT_A_CANDIDATE_TEXT: &str = "Немає тіла, немає діла! Кандидат уже не кандидат.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReviewAction {
    Accept,
    Wait,
    Reject,
}

impl ReviewAction {
    fn as_str(self) -> &'static str {
        match self {
            Self::Accept => "accept",
            Self::Wait => "wait",
            Self::Reject => "reject",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Accept => "Прийняти",
            Self::Wait => "Чекати",
            Self::Reject => "Відмовити",
        }
    }

    fn style(self) -> serenity::ButtonStyle {
        match self {
            Self::Accept => serenity::ButtonStyle::Success,
            Self::Wait => serenity::ButtonStyle::Secondary,
            Self::Reject => serenity::ButtonStyle::Danger,
        }
    }
}

/// Component id of a review button, `inv:<action>:<user_id>`.
pub fn review_button_id(action: ReviewAction, user_id: u64) -> String {
    format!("{}:{}:{}", BUTTON_PREFIX, action.as_str(), user_id)
}

pub fn parse_review_action(custom_id: &str) -> Option<(ReviewAction, u64)> {
    let mut parts = custom_id.splitn(3, ':');
    if parts.next()? != BUTTON_PREFIX {
        return None;
    }

    let action = match parts.next()? {
        "accept" => ReviewAction::Accept,
        "wait" => ReviewAction::Wait,
        "reject" => ReviewAction::Reject,
        _ => return None,
    };

    let user_id = parts.next()?.parse::<u64>().ok().filter(|id| *id > 0)?;
    Some((action, user_id))
}

pub fn review_buttons(user_id: u64) -> Vec<serenity::CreateActionRow> {
    let buttons = [ReviewAction::Accept, ReviewAction::Wait, ReviewAction::Reject]
        .into_iter()
        .map(|action| {
            serenity::CreateButton::new(review_button_id(action, user_id))
                .label(action.label())
                .style(action.style())
        })
        .collect();

    vec![serenity::CreateActionRow::Buttons(buttons)]
}

/// Post the review buttons for a candidate and remember the message for later edits.
pub async fn show_candidate_buttons(
    http: &serenity::Http,
    db: &Database,
    channel_id: serenity::ChannelId,
    reception_guild_id: u64,
    user_id: u64,
) -> anyhow::Result<()> {
    let message = channel_id
        .send_message(
            http,
            serenity::CreateMessage::new()
                .content(REVIEW_BUTTONS_TEXT)
                .components(review_buttons(user_id)),
        )
        .await?;

    set_candidate_buttons_message(db, user_id, reception_guild_id, message.id.get()).await?;
    info!(user_id, message_id = message.id.get(), "candidate review buttons posted");

    Ok(())
}

/// Replace any pending review reminder for the candidate with one due at `run_at`.
pub async fn reschedule_review(
    db: &Database,
    reception_guild_id: u64,
    user_id: u64,
    run_at: u64,
) -> anyhow::Result<()> {
    cancel_pending_tasks(db, TASK_INVITE_REVIEW_DUE, reception_guild_id, user_id).await?;
    schedule_task(
        db,
        TASK_INVITE_REVIEW_DUE,
        run_at,
        Some(reception_guild_id),
        Some(user_id),
    )
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{ReviewAction, parse_review_action, review_button_id};

    #[test]
    fn button_ids_carry_action_and_user() {
        assert_eq!(review_button_id(ReviewAction::Accept, 42), "inv:accept:42");
        assert_eq!(review_button_id(ReviewAction::Reject, 7), "inv:reject:7");
    }

    #[test]
    fn parses_review_buttons() {
        assert_eq!(
            parse_review_action("inv:wait:99"),
            Some((ReviewAction::Wait, 99))
        );
        assert_eq!(
            parse_review_action(&review_button_id(ReviewAction::Accept, 5)),
            Some((ReviewAction::Accept, 5))
        );
    }

    #[test]
    fn rejects_foreign_or_broken_ids() {
        assert_eq!(parse_review_action("inv:ban:1"), None);
        assert_eq!(parse_review_action("inv:accept:"), None);
        assert_eq!(parse_review_action("inv:accept:0"), None);
        assert_eq!(parse_review_action("page:next:1"), None);
        assert_eq!(parse_review_action("inv"), None);
    }
}
