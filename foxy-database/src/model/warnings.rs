/// Immutable snapshot of a warning row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WarningRecord {
    pub id: i64,
    pub guild_id: u64,
    pub user_id: u64,
    pub reason: String,
    pub issued_at: u64,
    pub expires_at: u64,
    pub issued_by: u64,
    pub issued_by_level: i32,
    pub is_revoked: bool,
    pub revoked_at: Option<u64>,
    pub revoked_by: Option<u64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WarningStatus {
    Active,
    Expired,
    Revoked,
}

impl WarningStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Active => "активне",
            Self::Expired => "прострочено",
            Self::Revoked => "скасовано",
        }
    }
}

impl WarningRecord {
    /// Revocation wins over expiry; a warning expiring exactly at `now` is expired.
    pub fn status(&self, now: u64) -> WarningStatus {
        if self.is_revoked {
            WarningStatus::Revoked
        } else if self.expires_at <= now {
            WarningStatus::Expired
        } else {
            WarningStatus::Active
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{WarningRecord, WarningStatus};

    fn record(expires_at: u64, is_revoked: bool) -> WarningRecord {
        WarningRecord {
            id: 1,
            guild_id: 1,
            user_id: 2,
            reason: "spam".to_owned(),
            issued_at: 0,
            expires_at,
            issued_by: 3,
            issued_by_level: 3,
            is_revoked,
            revoked_at: None,
            revoked_by: None,
        }
    }

    #[test]
    fn status_follows_expiry_and_revocation() {
        assert_eq!(record(100, false).status(50), WarningStatus::Active);
        assert_eq!(record(100, false).status(100), WarningStatus::Expired);
        assert_eq!(record(100, true).status(50), WarningStatus::Revoked);
        assert_eq!(record(100, true).status(500), WarningStatus::Revoked);
    }

    #[test]
    fn labels_are_ukrainian() {
        assert_eq!(WarningStatus::Active.label(), "активне");
        assert_eq!(WarningStatus::Expired.label(), "прострочено");
        assert_eq!(WarningStatus::Revoked.label(), "скасовано");
    }
}
