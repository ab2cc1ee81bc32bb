//! Messages into and out of a [`SearchSession`](super::SearchSession)

use crate::cache::RecentEntry;
use crate::models::{AddressDetail, BoundaryCandidate, WeatherSnapshot};
use crate::view_fit::{ViewFitPlan, Viewport};
use crate::LookupError;

/// What a commit refers to
#[derive(Debug, Clone, PartialEq)]
pub enum CommitTarget {
    /// A suggestion the user clicked
    Candidate(BoundaryCandidate),
    /// Raw text submitted with Enter; resolved to its first candidate
    Query(String),
}

/// User input delivered to the session by whatever drives the UI
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    Typed(String),
    Commit(CommitTarget),
    Clear,
    Recall(RecentEntry),
    ViewportChanged(Viewport),
}

/// Output consumed by the presentation sinks
#[derive(Debug, Clone, PartialEq)]
pub enum PresentationEvent {
    /// New suggestion list; empty means "hide suggestions"
    SuggestionsChanged(Vec<BoundaryCandidate>),
    /// The selection or one of its panels changed.
    ///
    /// `address`/`weather` are `None` until the matching lookup for this
    /// selection succeeds; sinks keep whatever they displayed before.
    SelectionChanged {
        candidate: BoundaryCandidate,
        address: Option<AddressDetail>,
        weather: Option<WeatherSnapshot>,
    },
    ViewPlanReady(ViewFitPlan),
    RecentListChanged(Vec<RecentEntry>),
    /// Reset to the world view and placeholder panels
    Cleared,
    /// A commit could not select anything; the previous selection stands
    CommitFailed(LookupError),
}
