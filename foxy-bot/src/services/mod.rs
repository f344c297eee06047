pub mod db_scheduler;
pub mod silence;
