//! Pure derivations from a policy ruling: execution requirements, cost
//! estimate, and the next-step instructions shown to callers.

use serde::{Deserialize, Serialize};

use lethe_state::{ForgettingAction, PolicyDecision, PolicyVerdict, PrivacyLevel};

/// Base cost of any forgetting execution.
pub const BASE_EXECUTION_MS: u64 = 1_000;
/// Added while waiting for a consent answer.
pub const CONSENT_WAIT_MS: u64 = 24 * 60 * 60 * 1_000;
/// Added for cryptographic erasure and verification.
pub const SECURE_DELETION_MS: u64 = 5_000;
/// Added for degrade actions.
pub const DEGRADE_MS: u64 = 2_000;

/// What must happen before and during execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionRequirements {
    pub execution_allowed: bool,
    pub consent_required: bool,
    pub secure_deletion_required: bool,
}

impl ExecutionRequirements {
    /// `deny` always blocks execution; sensitive privacy levels always need
    /// secure deletion regardless of the verdict.
    pub fn derive(policy: &PolicyDecision, privacy_level: PrivacyLevel) -> Self {
        Self {
            execution_allowed: policy.final_decision != PolicyVerdict::Deny,
            consent_required: policy.consent_required
                || policy.final_decision == PolicyVerdict::RequireConsent,
            secure_deletion_required: privacy_level.requires_secure_deletion()
                || policy.secure_deletion_required,
        }
    }
}

/// Additive cost estimate in milliseconds. Not a real-time delay.
pub fn estimate_execution_time(
    requirements: &ExecutionRequirements,
    action: ForgettingAction,
) -> u64 {
    let mut ms = BASE_EXECUTION_MS;
    if requirements.consent_required {
        ms += CONSENT_WAIT_MS;
    }
    if requirements.secure_deletion_required {
        ms += SECURE_DELETION_MS;
    }
    if action == ForgettingAction::Degrade {
        ms += DEGRADE_MS;
    }
    ms
}

/// Ordered, human-readable instructions keyed by the final verdict.
pub fn next_steps(verdict: PolicyVerdict, requirements: &ExecutionRequirements) -> Vec<String> {
    let steps: Vec<&str> = match verdict {
        PolicyVerdict::Deny => vec![
            "Forgetting request denied by policy",
            "No further action required",
        ],
        PolicyVerdict::RequireConsent => vec![
            "User consent requested",
            "Awaiting user response before execution",
        ],
        PolicyVerdict::Delay => vec![
            "Forgetting request delayed by policy",
            "Will execute after delay period",
        ],
        PolicyVerdict::Allow => {
            let mut steps = vec!["Forgetting request approved by policy"];
            if requirements.consent_required {
                steps.push("Awaiting user consent before execution");
            }
            if requirements.secure_deletion_required {
                steps.push("Secure deletion will be performed with verification");
            }
            if !requirements.consent_required {
                steps.push("Ready for execution");
            }
            steps
        }
        PolicyVerdict::Modify => vec![
            "Forgetting request approved with policy modifications",
            "Executing with modifications",
        ],
    };
    steps.into_iter().map(String::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ruling(verdict: PolicyVerdict) -> PolicyDecision {
        PolicyDecision {
            final_decision: verdict,
            ..PolicyDecision::allow()
        }
    }

    #[test]
    fn deny_blocks_execution() {
        let mut policy = ruling(PolicyVerdict::Deny);
        policy.consent_required = true;
        policy.secure_deletion_required = true;
        let req = ExecutionRequirements::derive(&policy, PrivacyLevel::Public);
        assert!(!req.execution_allowed);
    }

    #[test]
    fn require_consent_verdict_implies_consent() {
        let req =
            ExecutionRequirements::derive(&ruling(PolicyVerdict::RequireConsent), PrivacyLevel::Public);
        assert!(req.execution_allowed);
        assert!(req.consent_required);
    }

    #[test]
    fn sensitive_privacy_implies_secure_deletion() {
        for verdict in [PolicyVerdict::Allow, PolicyVerdict::Deny, PolicyVerdict::Delay] {
            let req = ExecutionRequirements::derive(&ruling(verdict), PrivacyLevel::Confidential);
            assert!(req.secure_deletion_required);
        }
        let req = ExecutionRequirements::derive(&ruling(PolicyVerdict::Allow), PrivacyLevel::Internal);
        assert!(!req.secure_deletion_required);
    }

    #[test]
    fn estimate_is_additive() {
        let none = ExecutionRequirements {
            execution_allowed: true,
            consent_required: false,
            secure_deletion_required: false,
        };
        assert_eq!(estimate_execution_time(&none, ForgettingAction::Delete), 1_000);
        assert_eq!(estimate_execution_time(&none, ForgettingAction::Degrade), 3_000);

        let all = ExecutionRequirements {
            execution_allowed: true,
            consent_required: true,
            secure_deletion_required: true,
        };
        assert_eq!(
            estimate_execution_time(&all, ForgettingAction::Degrade),
            1_000 + 86_400_000 + 5_000 + 2_000
        );
    }

    #[test]
    fn deny_steps_are_fixed() {
        let req = ExecutionRequirements::derive(&ruling(PolicyVerdict::Deny), PrivacyLevel::Public);
        assert_eq!(
            next_steps(PolicyVerdict::Deny, &req),
            vec!["Forgetting request denied by policy", "No further action required"]
        );
    }

    #[test]
    fn allow_steps_mention_consent_and_secure_deletion() {
        let req = ExecutionRequirements {
            execution_allowed: true,
            consent_required: true,
            secure_deletion_required: true,
        };
        let steps = next_steps(PolicyVerdict::Allow, &req);
        assert_eq!(steps.len(), 3);
        assert!(steps[1].contains("consent"));
        assert!(steps[2].contains("Secure deletion"));
    }
}
