pub mod chat_guard;
pub mod collect_members;
pub mod reception;
pub mod welcome;
