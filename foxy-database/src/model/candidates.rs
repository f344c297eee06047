#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CandidateStatus {
    /// Waiting for an admin decision.
    Candidate,
    /// Accepted; a single-use invite to the main guild was issued.
    Invited,
    /// Joined the main guild.
    Accepted,
    /// Rejected and removed from reception.
    Kicked,
}

impl CandidateStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Candidate => "candidate",
            Self::Invited => "invited",
            Self::Accepted => "accepted",
            Self::Kicked => "kicked",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "candidate" => Some(Self::Candidate),
            "invited" => Some(Self::Invited),
            "accepted" => Some(Self::Accepted),
            "kicked" => Some(Self::Kicked),
            _ => None,
        }
    }

    /// Whether joining the main guild should finalise this candidate.
    pub fn awaits_main_join(self) -> bool {
        matches!(self, Self::Candidate | Self::Invited)
    }
}

#[derive(Clone, Debug)]
pub struct Candidate {
    pub user_id: u64,
    pub reception_guild_id: u64,
    pub status: CandidateStatus,
    pub joined_at: u64,
    pub review_due_at: u64,
    pub buttons_message_id: Option<u64>,
    pub invite_link: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::CandidateStatus;

    #[test]
    fn status_round_trips_through_storage_names() {
        for status in [
            CandidateStatus::Candidate,
            CandidateStatus::Invited,
            CandidateStatus::Accepted,
            CandidateStatus::Kicked,
        ] {
            assert_eq!(CandidateStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(CandidateStatus::parse("ghost"), None);
    }

    #[test]
    fn only_open_candidates_await_main_join() {
        assert!(CandidateStatus::Candidate.awaits_main_join());
        assert!(CandidateStatus::Invited.awaits_main_join());
        assert!(!CandidateStatus::Accepted.awaits_main_join());
        assert!(!CandidateStatus::Kicked.awaits_main_join());
    }
}
