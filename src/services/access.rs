//! Central capability gate. Every privilege rule lives in [`require`] so the
//! access-control surface can be audited in one place instead of scattering
//! admin-flag checks across handlers.

use crate::error::ServiceError;

/// Authenticated caller as relayed by the fronting authentication layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
    pub is_admin: bool,
    pub email_verified: bool,
}

/// Privileged operations guarded by [`require`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    SubmitVote,
    ViewVoteAggregates,
    ManageJams,
    ReplaceThemes,
    RecalculateScores,
    ResetVotes,
    CreateBackup,
    ViewBackups,
    RestoreBackup,
}

/// Decide whether `identity` may perform `action`.
pub fn require(identity: &Identity, action: Action) -> Result<(), ServiceError> {
    match action {
        Action::SubmitVote => {
            if identity.email_verified {
                Ok(())
            } else {
                Err(ServiceError::Forbidden(
                    "a verified email address is required to vote".into(),
                ))
            }
        }
        Action::ViewVoteAggregates
        | Action::ManageJams
        | Action::ReplaceThemes
        | Action::RecalculateScores
        | Action::ResetVotes
        | Action::CreateBackup
        | Action::ViewBackups
        | Action::RestoreBackup => {
            if identity.is_admin {
                Ok(())
            } else {
                Err(ServiceError::Forbidden(format!(
                    "administrator privileges required for {action:?}"
                )))
            }
        }
    }
}

/// Non-erroring variant of [`require`] for paths that silently degrade.
pub fn allows(identity: &Identity, action: Action) -> bool {
    require(identity, action).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(is_admin: bool, email_verified: bool) -> Identity {
        Identity {
            user_id: "user-1".to_string(),
            is_admin,
            email_verified,
        }
    }

    #[test]
    fn voting_requires_verified_email_only() {
        assert!(require(&identity(false, true), Action::SubmitVote).is_ok());
        assert!(require(&identity(true, true), Action::SubmitVote).is_ok());
        assert!(require(&identity(false, false), Action::SubmitVote).is_err());
        // Admin flag does not bypass the verification requirement.
        assert!(require(&identity(true, false), Action::SubmitVote).is_err());
    }

    #[test]
    fn admin_actions_require_admin_flag() {
        let admin_actions = [
            Action::ViewVoteAggregates,
            Action::ManageJams,
            Action::ReplaceThemes,
            Action::RecalculateScores,
            Action::ResetVotes,
            Action::CreateBackup,
            Action::ViewBackups,
            Action::RestoreBackup,
        ];

        for action in admin_actions {
            assert!(require(&identity(true, false), action).is_ok());
            assert!(require(&identity(false, true), action).is_err());
        }
    }

    #[test]
    fn forbidden_errors_carry_forbidden_variant() {
        match require(&identity(false, true), Action::ResetVotes) {
            Err(ServiceError::Forbidden(_)) => {}
            other => panic!("unexpected result: {other:?}"),
        }

        match require(&identity(true, false), Action::SubmitVote) {
            Err(ServiceError::Forbidden(_)) => {}
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
