#[derive(Clone, Debug)]
pub struct CallMember {
    pub user_id: u64,
    pub display_name: Option<String>,
    pub last_seen: u64,
}
