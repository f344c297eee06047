//! Runtime configuration read once from the environment at startup.

use std::collections::BTreeSet;
use std::env;

use anyhow::{Context as _, anyhow};

use foxy_utils::parse::parse_id_list;

pub const DEFAULT_RULES_URL: &str = "https://teletype.in/@jokerrecon/OfRules";

/// Guild and channel that host the candidate reception flow.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReceptionConfig {
    pub guild_id: u64,
    pub channel_id: u64,
}

/// Outcome of the chat guard for an incoming update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardVerdict {
    /// Direct messages and allowed guilds are served normally.
    Pass,
    /// The guild is not served: answer with the wrong-chat text and leave.
    Reject,
}

#[derive(Clone, Debug)]
pub struct BotConfig {
    pub owner_id: u64,
    pub admin_log_channel_id: u64,
    pub allowed_guild_ids: BTreeSet<u64>,
    pub main_guild_id: u64,
    pub main_channel_id: u64,
    pub family_channel_id: u64,
    pub reception: Option<ReceptionConfig>,
    pub rules_url: String,
}

impl BotConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup.
    ///
    /// The main and reception guilds are always part of the allowed set.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let owner_id = required_id(&lookup, "BOT_OWNER_ID")?;
        let admin_log_channel_id = required_id(&lookup, "ADMIN_LOG_CHANNEL_ID")?;
        let main_guild_id = required_id(&lookup, "MAIN_GUILD_ID")?;
        let main_channel_id = required_id(&lookup, "MAIN_CHANNEL_ID")?;
        let family_channel_id = required_id(&lookup, "FAMILY_CHANNEL_ID")?;

        let allowed_raw = required(&lookup, "ALLOWED_GUILD_IDS")?;
        let mut allowed_guild_ids: BTreeSet<u64> = parse_id_list(&allowed_raw)
            .ok_or_else(|| anyhow!("ALLOWED_GUILD_IDS must be a comma-separated list of ids"))?
            .into_iter()
            .collect();

        let reception = match (
            optional(&lookup, "RECEPTION_GUILD_ID"),
            optional(&lookup, "RECEPTION_CHANNEL_ID"),
        ) {
            (Some(guild), Some(channel)) => Some(ReceptionConfig {
                guild_id: parse_id("RECEPTION_GUILD_ID", &guild)?,
                channel_id: parse_id("RECEPTION_CHANNEL_ID", &channel)?,
            }),
            (None, None) => None,
            _ => {
                return Err(anyhow!(
                    "RECEPTION_GUILD_ID and RECEPTION_CHANNEL_ID must be set together"
                ));
            }
        };

        allowed_guild_ids.insert(main_guild_id);
        if let Some(reception) = reception {
            allowed_guild_ids.insert(reception.guild_id);
        }

        let rules_url =
            optional(&lookup, "RULES_URL").unwrap_or_else(|| DEFAULT_RULES_URL.to_owned());

        Ok(Self {
            owner_id,
            admin_log_channel_id,
            allowed_guild_ids,
            main_guild_id,
            main_channel_id,
            family_channel_id,
            reception,
            rules_url,
        })
    }

    pub fn guard(&self, guild_id: Option<u64>) -> GuardVerdict {
        match guild_id {
            None => GuardVerdict::Pass,
            Some(id) if self.allowed_guild_ids.contains(&id) => GuardVerdict::Pass,
            Some(_) => GuardVerdict::Reject,
        }
    }

    pub fn is_allowed_guild(&self, guild_id: u64) -> bool {
        self.guard(Some(guild_id)) == GuardVerdict::Pass
    }

    /// Channels that go quiet during the daily minute of silence.
    pub fn silence_channel_ids(&self) -> Vec<u64> {
        let mut ids = vec![self.main_channel_id, self.family_channel_id];
        ids.dedup();
        ids
    }

    pub fn is_reception_channel(&self, channel_id: u64) -> bool {
        self.reception
            .is_some_and(|reception| reception.channel_id == channel_id)
    }

    pub fn is_reception_guild(&self, guild_id: u64) -> bool {
        self.reception
            .is_some_and(|reception| reception.guild_id == guild_id)
    }
}

pub fn env_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(value) => parse_bool(&value),
        Err(_) => default,
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn optional<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn required<F>(lookup: &F, key: &str) -> anyhow::Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    optional(lookup, key).ok_or_else(|| anyhow!("{key} not set in .env"))
}

fn required_id<F>(lookup: &F, key: &str) -> anyhow::Result<u64>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = required(lookup, key)?;
    parse_id(key, &raw)
}

fn parse_id(key: &str, raw: &str) -> anyhow::Result<u64> {
    let id = raw
        .parse::<u64>()
        .with_context(|| format!("{key} must be an integer id"))?;
    if id == 0 {
        return Err(anyhow!("{key} must be a non-zero id"));
    }

    Ok(id)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::{BotConfig, GuardVerdict, ReceptionConfig, parse_bool};

    fn base_env() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("BOT_OWNER_ID", "10"),
            ("ADMIN_LOG_CHANNEL_ID", "20"),
            ("ALLOWED_GUILD_IDS", "100, 200"),
            ("MAIN_GUILD_ID", "300"),
            ("MAIN_CHANNEL_ID", "31"),
            ("FAMILY_CHANNEL_ID", "32"),
        ])
    }

    fn load(env: &HashMap<&'static str, &'static str>) -> anyhow::Result<BotConfig> {
        BotConfig::from_lookup(|key| env.get(key).map(|value| (*value).to_owned()))
    }

    #[test]
    fn loads_required_values() {
        let config = load(&base_env()).unwrap();
        assert_eq!(config.owner_id, 10);
        assert_eq!(config.admin_log_channel_id, 20);
        assert!(config.allowed_guild_ids.contains(&100));
        assert!(config.allowed_guild_ids.contains(&300));
        assert_eq!(config.reception, None);
        assert_eq!(config.silence_channel_ids(), vec![31, 32]);
    }

    #[test]
    fn missing_or_invalid_ids_fail() {
        let mut env = base_env();
        env.remove("BOT_OWNER_ID");
        assert!(load(&env).is_err());

        let mut env = base_env();
        env.insert("ADMIN_LOG_CHANNEL_ID", "log");
        assert!(load(&env).is_err());

        let mut env = base_env();
        env.insert("ALLOWED_GUILD_IDS", "1,two");
        assert!(load(&env).is_err());

        let mut env = base_env();
        env.insert("MAIN_CHANNEL_ID", "0");
        assert!(load(&env).is_err());
    }

    #[test]
    fn reception_needs_both_ids() {
        let mut env = base_env();
        env.insert("RECEPTION_GUILD_ID", "400");
        assert!(load(&env).is_err());

        env.insert("RECEPTION_CHANNEL_ID", "41");
        let config = load(&env).unwrap();
        assert_eq!(
            config.reception,
            Some(ReceptionConfig {
                guild_id: 400,
                channel_id: 41
            })
        );
        assert!(config.is_allowed_guild(400));
        assert!(config.is_reception_channel(41));
        assert!(!config.is_reception_channel(31));
    }

    #[test]
    fn guard_passes_dms_and_allowed_guilds_only() {
        let config = load(&base_env()).unwrap();
        assert_eq!(config.guard(None), GuardVerdict::Pass);
        assert_eq!(config.guard(Some(200)), GuardVerdict::Pass);
        assert_eq!(config.guard(Some(999)), GuardVerdict::Reject);
    }

    #[test]
    fn bool_values() {
        assert!(parse_bool("TRUE"));
        assert!(parse_bool(" on "));
        assert!(!parse_bool("0"));
        assert!(!parse_bool("nope"));
    }
}
