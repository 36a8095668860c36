mod config;
mod rules;

pub use config::ScoringWeights;

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::domain::{MatchResult, ProgramOffering, StudentProfile};
use super::eligibility::EligibilityRuleTable;
use super::offering::OfferingRecord;
use super::pipeline::{apply_filters, sort_results, FilterCriteria, MatchReport, SortOrder};

/// Stateless matcher applying the rule table and weights to a profile.
#[derive(Debug, Clone)]
pub struct MatchEngine {
    rules: Arc<EligibilityRuleTable>,
    weights: ScoringWeights,
}

impl MatchEngine {
    pub fn new(rules: Arc<EligibilityRuleTable>, weights: ScoringWeights) -> Self {
        Self { rules, weights }
    }

    /// Engine over the built-in rule table and default weights.
    pub fn standard() -> Self {
        Self::new(
            Arc::new(EligibilityRuleTable::standard().clone()),
            ScoringWeights::default(),
        )
    }

    pub fn rules(&self) -> &EligibilityRuleTable {
        &self.rules
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Score one offering. Pure: identical inputs give identical results.
    pub fn score(&self, profile: &StudentProfile, offering: &ProgramOffering) -> MatchResult {
        rules::score_offering(profile, offering, &self.rules, &self.weights)
    }

    /// Validate, score, filter and sort a batch of records. Malformed records are reported
    /// in [`MatchReport::skipped`] and never stop the rest from ranking.
    pub fn rank(
        &self,
        profile: &StudentProfile,
        records: &[OfferingRecord],
        criteria: &FilterCriteria,
        order: SortOrder,
    ) -> MatchReport {
        let mut skipped = Vec::new();
        let mut scored = Vec::with_capacity(records.len());

        for (index, record) in records.iter().enumerate() {
            match record.validate(index) {
                Ok(offering) => scored.push(self.score(profile, &offering)),
                Err(malformed) => {
                    warn!(
                        index = malformed.index,
                        offering_id = malformed.offering_id.as_deref().unwrap_or("-"),
                        defect = %malformed.defect,
                        "skipping malformed offering"
                    );
                    skipped.push(malformed);
                }
            }
        }

        let filters = criteria.active_filters(profile);
        let (mut results, filtered_out) = apply_filters(scored, &filters);
        debug!(
            active_filters = filters.len(),
            kept = results.len(),
            filtered_out,
            "applied offering filters"
        );

        sort_results(&mut results, order);

        info!(
            track = profile.track.slug(),
            ranked = results.len(),
            skipped = skipped.len(),
            filtered_out,
            "ranked program offerings"
        );

        MatchReport {
            results,
            skipped,
            filtered_out,
            restriction: self.rules.restriction_for(profile.track, &profile.interests),
        }
    }
}

impl Default for MatchEngine {
    fn default() -> Self {
        Self::standard()
    }
}
