//! # Status Endpoints
//!
//! Operation names understood by the status backends and the same-origin paths
//! the fallback client tries for each of them. Every list is ordered primary
//! first; the table is static and never changes at runtime.

use std::fmt;

/// Logical operations exposed by the hosted functions and their local stand-ins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusOperation {
    /// `status-overview`
    Overview,
    /// `status-aggregator`, sub-operation selected by the body's `action`
    Aggregator,
}

impl StatusOperation {
    pub const OVERVIEW_NAME: &'static str = "status-overview";
    pub const AGGREGATOR_NAME: &'static str = "status-aggregator";

    /// Resolve a function name. Anything outside the two known names is `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            Self::OVERVIEW_NAME => Some(Self::Overview),
            Self::AGGREGATOR_NAME => Some(Self::Aggregator),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Overview => Self::OVERVIEW_NAME,
            Self::Aggregator => Self::AGGREGATOR_NAME,
        }
    }
}

impl fmt::Display for StatusOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Aggregator sub-operations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum StatusAction {
    #[default]
    Overview,
    Incidents,
    Maintenances,
    Components,
}

impl StatusAction {
    pub const ALL: [StatusAction; 4] = [
        StatusAction::Overview,
        StatusAction::Incidents,
        StatusAction::Maintenances,
        StatusAction::Components,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Overview => "overview",
            Self::Incidents => "incidents",
            Self::Maintenances => "maintenances",
            Self::Components => "components",
        }
    }

    /// Exact-match lookup of an action string
    pub fn parse(action: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.as_str() == action)
    }

    /// Lenient lookup used by the aggregator: absent and unrecognized actions
    /// both resolve to `Overview`.
    pub fn resolve(action: Option<&str>) -> Self {
        action.and_then(Self::parse).unwrap_or_default()
    }

    /// Candidate paths for this action, primary first
    pub fn candidates(&self) -> &'static [&'static str] {
        match self {
            Self::Overview => OVERVIEW_CANDIDATES,
            Self::Incidents => &[
                "/status-aggregator?action=incidents",
                "/api/status/incidents",
            ],
            Self::Maintenances => &[
                "/status-aggregator?action=maintenances",
                "/api/status/maintenances",
            ],
            Self::Components => &[
                "/status-aggregator?action=components",
                "/api/status/components",
            ],
        }
    }
}

impl fmt::Display for StatusAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Paths for the overview, shared by `status-overview` and the aggregator's
/// `overview` action
pub const OVERVIEW_CANDIDATES: &[&str] = &["/status-overview", "/api/status/overview"];
