use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::domain::{AcademicTrack, InvalidProfile, ProfileSubmission};
use super::eligibility::TrackRulesView;
use super::pipeline::{FilterCriteria, MatchReport, SortOrder};
use super::scoring::MatchEngine;
use crate::catalog::{
    CatalogStats, OfferingCatalog, ProgramDetail, ProgramSummary, UniversityDetail,
    UniversitySummary,
};

/// Body of a match call: the profile plus optional filters, sort and inline offerings.
/// Inline offerings replace the loaded catalog for this call only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchRequest {
    pub profile: ProfileSubmission,
    #[serde(default)]
    pub filters: FilterCriteria,
    #[serde(default)]
    pub sort: SortOrder,
    #[serde(default)]
    pub offerings: Option<Vec<Value>>,
}

/// Service composing the match engine with the loaded offering catalog.
pub struct ProgramMatchService {
    engine: Arc<MatchEngine>,
    catalog: Arc<OfferingCatalog>,
    default_min_match: Option<f32>,
}

impl ProgramMatchService {
    pub fn new(engine: Arc<MatchEngine>, catalog: Arc<OfferingCatalog>) -> Self {
        Self {
            engine,
            catalog,
            default_min_match: None,
        }
    }

    /// Minimum match score applied when a request does not set its own.
    pub fn with_default_min_match(mut self, min_match: Option<f32>) -> Self {
        self.default_min_match = min_match;
        self
    }

    pub fn engine(&self) -> &MatchEngine {
        &self.engine
    }

    pub fn catalog(&self) -> &OfferingCatalog {
        &self.catalog
    }

    /// Validate the profile, then rank the catalog (or the inline offerings) for it.
    pub fn match_profile(&self, request: MatchRequest) -> Result<MatchReport, MatchServiceError> {
        let profile = request.profile.validate()?;

        let mut criteria = request.filters;
        if criteria.min_match_score.is_none() {
            criteria.min_match_score = self.default_min_match;
        }

        let report = match request.offerings {
            Some(values) => {
                let inline = OfferingCatalog::from_json_values(values);
                self.engine
                    .rank(&profile, inline.records(), &criteria, request.sort)
            }
            None => self
                .engine
                .rank(&profile, self.catalog.records(), &criteria, request.sort),
        };

        Ok(report)
    }

    pub fn tracks(&self) -> Vec<TrackRulesView> {
        self.engine.rules().track_views()
    }

    pub fn track(&self, raw: &str) -> Result<TrackRulesView, MatchServiceError> {
        let track = AcademicTrack::parse_label(raw).ok_or(MatchServiceError::EmptyTrack)?;
        Ok(self.engine.rules().track_view(track))
    }

    pub fn search(&self, query: &str) -> Result<Vec<ProgramSummary>, MatchServiceError> {
        if query.trim().is_empty() {
            return Err(MatchServiceError::EmptyQuery);
        }
        Ok(self.catalog.search(query))
    }

    pub fn stats(&self) -> CatalogStats {
        self.catalog.stats()
    }

    pub fn programs(&self) -> Vec<ProgramSummary> {
        self.catalog.programs()
    }

    pub fn program(&self, id: &str) -> Result<ProgramDetail, MatchServiceError> {
        self.catalog
            .program(id)
            .ok_or_else(|| MatchServiceError::ProgramNotFound(id.to_string()))
    }

    pub fn universities(&self) -> Vec<UniversitySummary> {
        self.catalog.universities()
    }

    pub fn university(&self, id: &str) -> Result<UniversityDetail, MatchServiceError> {
        self.catalog
            .university(id)
            .ok_or_else(|| MatchServiceError::UniversityNotFound(id.to_string()))
    }
}

/// Error raised by the match service.
#[derive(Debug, thiserror::Error)]
pub enum MatchServiceError {
    #[error(transparent)]
    Profile(#[from] InvalidProfile),
    #[error("search query must not be empty")]
    EmptyQuery,
    #[error("academic track must not be blank")]
    EmptyTrack,
    #[error("no program `{0}` in the catalog")]
    ProgramNotFound(String),
    #[error("no university `{0}` in the catalog")]
    UniversityNotFound(String),
}
