use rand::seq::SliceRandom;
use tracing::info;

use foxy_core::{Context, Error};
use foxy_database::impls::predictions::{get_daily_prediction, store_daily_prediction};
use foxy_utils::formatting::{ensure_terminal_punctuation, user_mention};
use foxy_utils::time::{iso_day, kyiv_now};

use crate::access::finish_silently;
use crate::{CommandMeta, CommandScope};

pub const META: CommandMeta = CommandMeta {
    name: "predict",
    desc: "Отримати передбачення на сьогодні (чат Родини)",
    category: "utility",
    usage: "!predict",
    min_level: 0,
    scope: CommandScope::Group,
};

const COME_BACK_TEXT: &str = "Приходи за новим передбаченням завтра!";

const PREDICTIONS: &[&str] = &[
    "Сьогодні кожен твій постріл знайде ціль",
    "Команда прикриє тебе саме тоді, коли це буде найпотрібніше",
    "Не поспішай у бій, терпіння принесе перемогу",
    "Сьогодні вдалий день, щоб спробувати нову зброю",
    "Твій камбек стане легендою чату",
    "Остерігайся кемперів за рогом",
    "Хтось із клану чекає на твою допомогу",
    "Удача на твоєму боці, але перезаряджайся вчасно",
    "Сьогодні ти станеш MVP хоча б одного матчу",
    "Краще зіграти в команді, ніж соло",
    "Твоя гранатка сьогодні прилетить куди треба",
    "Відпочинь між каточками, і рейтинг подякує",
    "Новий скін принесе тобі щастя",
    "Сьогодні варто послухати порадника з досвідом",
    "Тиша перед боєм обіцяє гучну перемогу",
    "Хтось згадає тебе добрим словом у чаті",
    "Твоя реакція сьогодні швидша за кулю",
    "Не сперечайся з рандомом, просто виграй",
    "Вечір принесе приємний сюрприз",
    "Сьогодні ідеальний день для клан-вару",
    "Твій нік сьогодні запамʼятають суперники",
    "Лис завжди знаходить вихід, знайдеш і ти",
    "Маленька перемога сьогодні відкриє шлях до великої",
    "Віддай першість другу, і карма повернеться сторицею",
];

#[poise::command(prefix_command, slash_command, category = "Utility")]
pub async fn predict(ctx: Context<'_>) -> Result<(), Error> {
    if ctx.channel_id().get() != ctx.data().config.family_channel_id {
        return Ok(());
    }

    finish_silently(ctx, "Передбачення готове.").await?;

    let user_id = ctx.author().id.get();
    let today = iso_day(&kyiv_now());
    let db = &ctx.data().db;

    let prediction = match get_daily_prediction(db, user_id, &today).await? {
        Some(stored) => stored,
        None => {
            let pick = pick_prediction().to_owned();
            store_daily_prediction(db, user_id, &today, &pick).await?;
            info!(user_id, day = %today, "drew a new daily prediction");
            pick
        }
    };

    ctx.channel_id()
        .say(
            ctx.http(),
            format!(
                "Передбачення для {},\n{}\n\n{}",
                user_mention(user_id),
                ensure_terminal_punctuation(&prediction),
                COME_BACK_TEXT
            ),
        )
        .await?;

    Ok(())
}

fn pick_prediction() -> &'static str {
    PREDICTIONS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(COME_BACK_TEXT)
}

#[cfg(test)]
mod tests {
    use super::{PREDICTIONS, pick_prediction};

    #[test]
    fn picks_come_from_the_pool() {
        for _ in 0..20 {
            assert!(PREDICTIONS.contains(&pick_prediction()));
        }
    }
}
