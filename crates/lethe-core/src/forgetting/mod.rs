//! Forgetting governance.
//!
//! [`ForgettingControlSystem`] drives one forgetting request through the
//! audit ledger, the policy engine and, on approval, the secure deletion
//! executor. Consent answers and user overrides re-enter through the same
//! system and either execute or cancel the audited decision.

mod control;
mod error;
mod impact;
mod metadata;
mod planning;

pub use control::{
    ComponentHealth, ForgettingControlConfig, ForgettingControlResult, ForgettingControlSystem,
    ForgettingControlSystemStatus,
};
pub use error::{ForgettingError, ForgettingResult};
pub use impact::{FixedImpactEstimator, ImpactEstimator, SimulatedImpactEstimator};
pub use metadata::{summarize_content, DefaultMetadataExtractor, MetadataExtractor};
pub use planning::{
    estimate_execution_time, next_steps, ExecutionRequirements, BASE_EXECUTION_MS,
    CONSENT_WAIT_MS, DEGRADE_MS, SECURE_DELETION_MS,
};
