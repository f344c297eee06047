/// Task type that surfaces the review buttons for a reception candidate.
pub const TASK_INVITE_REVIEW_DUE: &str = "invite_review_due";

#[derive(Clone, Debug)]
pub struct ScheduledTask {
    pub id: i64,
    pub task_type: String,
    pub run_at: u64,
    pub guild_id: Option<u64>,
    pub user_id: Option<u64>,
}
