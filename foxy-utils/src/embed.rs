use poise::serenity_prelude as serenity;

/// Fox orange.
pub const DEFAULT_EMBED_COLOR: u32 = 0xF2_7A_1A;

pub fn titled_embed(title: impl Into<String>, description: impl Into<String>) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title(title)
        .color(DEFAULT_EMBED_COLOR)
        .description(description)
}
