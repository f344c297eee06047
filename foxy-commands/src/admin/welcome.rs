use poise::serenity_prelude as serenity;
use tracing::info;

use foxy_core::{Context, Error};
use foxy_database::Database;
use foxy_database::impls::admins::get_admin_level;
use foxy_database::impls::chat_settings::{
    WELCOME_TEMPLATE_KEY, get_chat_setting, set_chat_setting,
};
use foxy_utils::formatting::{MENTION_PLACEHOLDER, render_welcome};

use crate::access::acknowledge_slash;
use crate::{CommandMeta, CommandScope};

pub const META: CommandMeta = CommandMeta {
    name: "uploadwelcome",
    desc: "Оновити вітальне повідомлення для новачків",
    category: "admin",
    usage: "!uploadwelcome <текст з {mention}>",
    min_level: 3,
    scope: CommandScope::Group,
};

pub const DEFAULT_WELCOME_TEMPLATE: &str = "{mention}, вітаю в клані!\n\
Сьогодні твій перший день в клані і тобі слід познайомитися з наступною інформацією:\n \
- Ти потрапив(-ла) в основний канал, тут спілкуємося виключно про гру. Тут і оголошення і дуже корисна інформація. \
За можливістю канал не глушимо, надоїдати не будемо. А для спілкування у нас є канал **Родини**;\n \
- Вступаючи у клан ти уже погодився(-лася) з правилами клану. Тепер треба **ОБОВ'ЯЗКОВО** прочитати те, з чим ти погодився(-лася), \
щоб не виникали потім \"нюанси\". Натисни на кнопку внизу і ретельно прочитай!;\n \
- Щоб бути справді частиною клану треба поставити тег клану в початок свого ніку: `JRツ`\n\
Але обережно, не у всіх відображається цей смайлик. Чому? Питай в древніх старожилів цього чату...;\n \
- Обовʼязково реагуємо (за можливості) на повідомлення де тебе згадали, ти можеш бути потрібен(-бна) комусь тут і зараз;\n \
- Пояснення назви клану можеш прочитати в кінці правил. Там і легенда, і саме пояснення;\n \
- Зі своїми функціями і чим я можу бути тобі корисна, дізнаєшся згодом.\n\
\n\
**Корисні посилання:**\n\
📱 [TikTok](https://www.tiktok.com/@jr__ua)\n\
\n\
**Гарної та приємної гри!**";

const NOT_AVAILABLE_TEXT: &str = "Ця команда тут недоступна.";

#[poise::command(prefix_command, slash_command, category = "Admin")]
pub async fn uploadwelcome(
    ctx: Context<'_>,
    #[description = "Новий текст привітання з {mention}"]
    #[rest]
    template: Option<String>,
) -> Result<(), Error> {
    let config = &ctx.data().config;
    let author_id = ctx.author().id.get();
    let level = get_admin_level(&ctx.data().db, author_id).await?;
    if !may_upload_welcome(
        ctx.guild_id().map(|id| id.get()),
        config.main_guild_id,
        author_id,
        config.owner_id,
        level,
    ) {
        acknowledge_slash(ctx, NOT_AVAILABLE_TEXT).await?;
        return Ok(());
    }

    let Some(template) = template
        .map(|template| template.trim().to_owned())
        .filter(|template| !template.is_empty())
    else {
        ctx.say(format!(
            "Формат:\n!uploadwelcome <текст>\nТекст має містити {}.",
            MENTION_PLACEHOLDER
        ))
        .await?;
        return Ok(());
    };

    if !template.contains(MENTION_PLACEHOLDER) {
        ctx.say("Додай у текст плейсхолдер {mention} (щоб я могла згадати новачка).")
            .await?;
        return Ok(());
    }

    set_chat_setting(
        &ctx.data().db,
        config.main_guild_id,
        WELCOME_TEMPLATE_KEY,
        &template,
    )
    .await?;

    info!(updated_by = author_id, "welcome template updated");
    ctx.say("Вітальне повідомлення оновлено.").await?;
    Ok(())
}

/// Only the owner or a level 3+ admin may change the template, and only in the main guild.
fn may_upload_welcome(
    guild_id: Option<u64>,
    main_guild_id: u64,
    author_id: u64,
    owner_id: u64,
    level: i32,
) -> bool {
    guild_id == Some(main_guild_id) && (author_id == owner_id || level >= META.min_level)
}

/// Welcome message for a newcomer: stored template (or the default) plus the rules button.
pub async fn welcome_message(
    db: &Database,
    main_guild_id: u64,
    user_id: u64,
    rules_url: &str,
) -> anyhow::Result<serenity::CreateMessage> {
    let template = get_chat_setting(db, main_guild_id, WELCOME_TEMPLATE_KEY)
        .await?
        .unwrap_or_else(|| DEFAULT_WELCOME_TEMPLATE.to_owned());

    Ok(serenity::CreateMessage::new()
        .content(render_welcome(&template, user_id))
        .components(vec![serenity::CreateActionRow::Buttons(vec![
            serenity::CreateButton::new_link(rules_url).label("Правила клану"),
        ])]))
}

#[cfg(test)]
mod tests {
    use foxy_utils::formatting::{MENTION_PLACEHOLDER, render_welcome};

    use super::{DEFAULT_WELCOME_TEMPLATE, may_upload_welcome};

    #[test]
    fn default_template_greets_the_newcomer() {
        assert!(DEFAULT_WELCOME_TEMPLATE.starts_with(MENTION_PLACEHOLDER));
        let rendered = render_welcome(DEFAULT_WELCOME_TEMPLATE, 77);
        assert!(rendered.starts_with("<@77>, вітаю в клані!"));
        assert!(!rendered.contains(MENTION_PLACEHOLDER));
        assert!(rendered.chars().count() <= 2000);
    }

    #[test]
    fn upload_is_limited_to_owner_and_senior_admins_in_main_guild() {
        const MAIN: u64 = 100;
        const OWNER: u64 = 1;

        assert!(may_upload_welcome(Some(MAIN), MAIN, OWNER, OWNER, 0));
        assert!(may_upload_welcome(Some(MAIN), MAIN, 5, OWNER, 3));
        assert!(!may_upload_welcome(Some(MAIN), MAIN, 5, OWNER, 2));
        assert!(!may_upload_welcome(Some(200), MAIN, OWNER, OWNER, 4));
        assert!(!may_upload_welcome(None, MAIN, OWNER, OWNER, 4));
    }
}
