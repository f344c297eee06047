pub mod admins;
pub mod candidates;
pub mod chat_settings;
pub mod members;
pub mod predictions;
pub mod tasks;
pub mod warnings;

use std::time::{SystemTime, UNIX_EPOCH};

fn now_unix_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_secs())
}
