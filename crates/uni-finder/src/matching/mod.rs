//! Program matching: the subject-group rule table, ranked interests, per-offering scoring
//! and the filter/sort pipeline, plus the service and router that expose them.

pub mod domain;
pub mod eligibility;
mod interests;
pub mod offering;
pub mod pipeline;
pub mod priority;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    AcademicTrack, Discipline, InterestMatch, InterestPriority, InterestPriorityInput,
    InterestRestriction, InvalidProfile, MatchBasis, MatchFactor, MatchResult, ProfileSubmission,
    ProgramOffering, QualificationKind, ScoreComponent, ScoreField, ScoreType, StudentProfile,
};
pub use eligibility::{EligibilityRuleTable, RuleTableError, TrackRulesView};
pub use offering::{MalformedOffering, OfferingDefect, OfferingRecord};
pub use pipeline::{
    apply_filters, sort_results, CityFilter, FilterCriteria, FlagFilter, MatchReport,
    OfferingFilter, SortDirection, SortKey, SortOrder,
};
pub use priority::{InterestList, MoveDirection, PriorityError};
pub use router::matching_router;
pub use scoring::{MatchEngine, ScoringWeights};
pub use service::{MatchRequest, MatchServiceError, ProgramMatchService};
