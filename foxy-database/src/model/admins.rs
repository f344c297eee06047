/// Highest admin tier; holders manage other admins.
pub const MAX_ADMIN_LEVEL: i32 = 4;

#[derive(Clone, Debug)]
pub struct AdminEntry {
    pub user_id: u64,
    pub display_name: String,
    pub username: String,
    pub level: i32,
}
