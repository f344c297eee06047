pub mod config;

use std::sync::Arc;

use foxy_database::Database;

pub use config::{BotConfig, GuardVerdict, ReceptionConfig};

pub type Error = anyhow::Error;

#[derive(Clone, Debug)]
pub struct Data {
    pub db: Database,
    pub config: Arc<BotConfig>,
}

pub type Context<'a> = poise::Context<'a, Data, Error>;
