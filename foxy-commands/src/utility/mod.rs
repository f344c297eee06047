pub mod call;
pub mod channelid;
pub mod help;
pub mod ping;
pub mod predict;
pub mod start;
