//! Memory-facing records consumed by the governance core
//!
//! These are produced upstream (by whatever decided a memory should be
//! forgotten) and are never mutated once handed to the core.

use serde::{Deserialize, Serialize};

/// Kind of stored memory a forgetting decision targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryType {
    Episodic,
    Semantic,
    Procedural,
    Working,
}

impl MemoryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemoryType::Episodic => "episodic",
            MemoryType::Semantic => "semantic",
            MemoryType::Procedural => "procedural",
            MemoryType::Working => "working",
        }
    }
}

impl std::fmt::Display for MemoryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a forgetting decision proposes to do with a memory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForgettingAction {
    /// Remove the memory entirely
    Delete,
    /// Reduce fidelity while keeping a recoverable fingerprint
    Degrade,
    /// Move out of the active working set
    Archive,
    /// Hide from retrieval without touching storage
    Suppress,
}

impl ForgettingAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ForgettingAction::Delete => "delete",
            ForgettingAction::Degrade => "degrade",
            ForgettingAction::Archive => "archive",
            ForgettingAction::Suppress => "suppress",
        }
    }
}

impl std::fmt::Display for ForgettingAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A proposed action on a memory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForgettingDecision {
    pub memory_id: String,
    pub action: ForgettingAction,
    /// Human-readable justification from the upstream evaluator
    pub rationale: String,
    /// Evaluator confidence (0.0 - 1.0)
    pub confidence: f64,
}

impl ForgettingDecision {
    pub fn new(
        memory_id: impl Into<String>,
        action: ForgettingAction,
        rationale: impl Into<String>,
        confidence: f64,
    ) -> Self {
        Self {
            memory_id: memory_id.into(),
            action,
            rationale: rationale.into(),
            confidence,
        }
    }
}

/// Scores backing a forgetting decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForgettingEvaluation {
    pub relevance_score: f64,
    pub importance_score: f64,
    pub redundancy_score: f64,
    pub interference_score: f64,
    pub age_days: f64,
    pub access_count: u64,
}

impl Default for ForgettingEvaluation {
    fn default() -> Self {
        Self {
            relevance_score: 0.5,
            importance_score: 0.5,
            redundancy_score: 0.0,
            interference_score: 0.0,
            age_days: 0.0,
            access_count: 0,
        }
    }
}

/// Sensitivity classification of a memory.
///
/// Ordered from least to most sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrivacyLevel {
    Public,
    Internal,
    Confidential,
    Restricted,
}

impl PrivacyLevel {
    /// Confidential and restricted memories must be cryptographically erased.
    pub fn requires_secure_deletion(&self) -> bool {
        matches!(self, PrivacyLevel::Confidential | PrivacyLevel::Restricted)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PrivacyLevel::Public => "public",
            PrivacyLevel::Internal => "internal",
            PrivacyLevel::Confidential => "confidential",
            PrivacyLevel::Restricted => "restricted",
        }
    }

    /// Parse a level name, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "public" => Some(PrivacyLevel::Public),
            "internal" => Some(PrivacyLevel::Internal),
            "confidential" => Some(PrivacyLevel::Confidential),
            "restricted" => Some(PrivacyLevel::Restricted),
            _ => None,
        }
    }
}

impl std::fmt::Display for PrivacyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Descriptive metadata derived from raw memory content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryMetadata {
    pub content_type: String,
    pub size_bytes: usize,
    pub category: String,
    pub privacy_level: PrivacyLevel,
    pub access_frequency: f64,
}
