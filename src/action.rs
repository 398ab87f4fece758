//! Action selection.
//!
//! The two lifecycle flags (`--add-policy`, `--delete-policy`) collapse
//! into a single [`Action`] value at construction time. After that,
//! "neither selected" and "both selected" are unrepresentable; the
//! orchestrator only ever sees a well-formed request.

use crate::policy::PolicyKey;
use std::path::PathBuf;

/// The single operation this invocation will perform.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// Apply (create or replace) the policy described by a document.
    ///
    /// Carries the document path, not the parsed policy: the document
    /// is only read and parsed once a session exists.
    Apply { policy_file: PathBuf },
    /// Delete the policy addressed by a composite key.
    Delete { key: PolicyKey },
}

impl Action {
    /// Build the action from parsed CLI flags.
    ///
    /// A delete request is constructed even when some key components
    /// are absent; completeness is checked by the orchestrator before
    /// any I/O so the failure can name the missing component.
    pub fn from_flags(
        add_policy: bool,
        delete_policy: bool,
        policy_file: Option<PathBuf>,
        policy_id: Option<String>,
        enterprise: Option<String>,
        domain: Option<String>,
    ) -> Result<Self, UsageError> {
        match (add_policy, delete_policy) {
            (false, false) => Err(UsageError::NoActionSelected),
            (true, true) => Err(UsageError::ConflictingActions),
            (true, false) => {
                let policy_file = policy_file.ok_or(UsageError::MissingPolicyFile)?;
                Ok(Action::Apply { policy_file })
            }
            (false, true) => Ok(Action::Delete {
                key: PolicyKey::new(
                    policy_id.unwrap_or_default(),
                    enterprise.unwrap_or_default(),
                    domain.unwrap_or_default(),
                ),
            }),
        }
    }
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum UsageError {
    #[error("no policy action selected; pass --add-policy or --delete-policy")]
    NoActionSelected,

    #[error("--add-policy and --delete-policy are mutually exclusive")]
    ConflictingActions,

    #[error("--add-policy requires --policy-file")]
    MissingPolicyFile,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neither_flag_is_a_usage_error() {
        let err = Action::from_flags(false, false, None, None, None, None).unwrap_err();
        assert_eq!(err, UsageError::NoActionSelected);
    }

    #[test]
    fn both_flags_are_a_usage_error() {
        let err = Action::from_flags(
            true,
            true,
            Some(PathBuf::from("policy.yaml")),
            Some("p1".into()),
            Some("acme".into()),
            Some("production".into()),
        )
        .unwrap_err();
        assert_eq!(err, UsageError::ConflictingActions);
    }

    #[test]
    fn apply_requires_a_policy_file() {
        let err = Action::from_flags(true, false, None, None, None, None).unwrap_err();
        assert_eq!(err, UsageError::MissingPolicyFile);
    }

    #[test]
    fn apply_carries_the_document_path() {
        let action = Action::from_flags(
            true,
            false,
            Some(PathBuf::from("policy.yaml")),
            None,
            None,
            None,
        )
        .unwrap();
        assert_eq!(
            action,
            Action::Apply {
                policy_file: PathBuf::from("policy.yaml")
            }
        );
    }

    #[test]
    fn delete_constructs_a_key_even_from_partial_flags() {
        let action =
            Action::from_flags(false, true, None, Some("p1".into()), None, None).unwrap();
        let Action::Delete { key } = action else {
            panic!("expected a delete action");
        };
        assert_eq!(key.id, "p1");
        assert_eq!(key.missing_component(), Some("enterprise"));
    }
}
