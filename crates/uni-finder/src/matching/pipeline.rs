use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{InterestRestriction, MatchResult, StudentProfile};
use super::offering::MalformedOffering;

/// City criterion. `Preferred` resolves to the profile's preferred location at match time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum CityFilter {
    #[default]
    Any,
    Preferred,
    Exact(String),
}

impl From<Option<String>> for CityFilter {
    fn from(value: Option<String>) -> Self {
        let Some(raw) = value else {
            return Self::Any;
        };
        let trimmed = raw.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "" | "any" | "all" => Self::Any,
            "preferred" => Self::Preferred,
            _ => Self::Exact(trimmed.to_string()),
        }
    }
}

impl From<CityFilter> for Option<String> {
    fn from(value: CityFilter) -> Self {
        match value {
            CityFilter::Any => None,
            CityFilter::Preferred => Some("preferred".to_string()),
            CityFilter::Exact(city) => Some(city),
        }
    }
}

/// Tri-state flag criterion: keep everything, only flagged results, or only unflagged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagFilter {
    #[default]
    All,
    #[serde(alias = "compatible", alias = "eligible", alias = "compatible_only", alias = "eligible_only")]
    Only,
    #[serde(
        alias = "incompatible",
        alias = "ineligible",
        alias = "incompatible_only",
        alias = "ineligible_only"
    )]
    Exclude,
}

impl FlagFilter {
    fn required(self) -> Option<bool> {
        match self {
            Self::All => None,
            Self::Only => Some(true),
            Self::Exclude => Some(false),
        }
    }
}

/// Filter settings for one pipeline run. Every active criterion narrows the result set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    #[serde(alias = "location")]
    pub city: CityFilter,
    #[serde(alias = "programType")]
    pub program_type: Option<String>,
    #[serde(alias = "maxFees", alias = "maxFee")]
    pub max_fee: Option<u64>,
    #[serde(alias = "minMatch", alias = "minMatchScore")]
    pub min_match_score: Option<f32>,
    #[serde(alias = "subjectCompatibility")]
    pub compatibility: FlagFilter,
    pub eligibility: FlagFilter,
    #[serde(alias = "openOn")]
    pub open_on: Option<NaiveDate>,
}

impl FilterCriteria {
    /// Resolve the active criteria against a profile, one [`OfferingFilter`] each.
    pub fn active_filters(&self, profile: &StudentProfile) -> Vec<OfferingFilter> {
        let mut filters = Vec::new();

        let city = match &self.city {
            CityFilter::Any => None,
            CityFilter::Preferred => profile.preferred_location.clone(),
            CityFilter::Exact(city) => Some(city.clone()),
        };
        if let Some(city) = city.map(|value| value.trim().to_string()) {
            if !city.is_empty() {
                filters.push(OfferingFilter::City(city));
            }
        }

        if let Some(program_type) = &self.program_type {
            let needle = program_type.trim().to_lowercase();
            if !needle.is_empty() && needle != "all" {
                filters.push(OfferingFilter::ProgramType(needle));
            }
        }
        if let Some(max_fee) = self.max_fee {
            filters.push(OfferingFilter::MaxFee(max_fee));
        }
        if let Some(min_match) = self.min_match_score {
            filters.push(OfferingFilter::MinMatchScore(min_match));
        }
        if let Some(required) = self.compatibility.required() {
            filters.push(OfferingFilter::Compatibility(required));
        }
        if let Some(required) = self.eligibility.required() {
            filters.push(OfferingFilter::Eligibility(required));
        }
        if let Some(date) = self.open_on {
            filters.push(OfferingFilter::OpenOn(date));
        }

        filters
    }
}

/// One resolved criterion. Criteria are independent predicates over a scored result.
#[derive(Debug, Clone, PartialEq)]
pub enum OfferingFilter {
    City(String),
    /// Lower-cased needle matched against program name or discipline.
    ProgramType(String),
    MaxFee(u64),
    MinMatchScore(f32),
    Compatibility(bool),
    Eligibility(bool),
    OpenOn(NaiveDate),
}

impl OfferingFilter {
    pub fn accepts(&self, result: &MatchResult) -> bool {
        let offering = &result.offering;
        match self {
            Self::City(city) => offering.city.trim().eq_ignore_ascii_case(city),
            Self::ProgramType(needle) => {
                offering.program_name.to_lowercase().contains(needle.as_str())
                    || offering.discipline.as_str().contains(needle.as_str())
                    || offering
                        .discipline
                        .label()
                        .to_lowercase()
                        .contains(needle.as_str())
            }
            Self::MaxFee(max_fee) => offering.annual_fee <= *max_fee,
            Self::MinMatchScore(min) => result.match_score >= *min,
            Self::Compatibility(required) => result.subject_compatible == *required,
            Self::Eligibility(required) => result.eligible == *required,
            Self::OpenOn(date) => offering
                .application_deadline
                .map_or(true, |deadline| deadline >= *date),
        }
    }
}

/// Keep results that pass every filter, preserving order. Returns the kept results and
/// how many were dropped.
pub fn apply_filters(
    results: Vec<MatchResult>,
    filters: &[OfferingFilter],
) -> (Vec<MatchResult>, usize) {
    let before = results.len();
    let kept = results
        .into_iter()
        .filter(|result| filters.iter().all(|filter| filter.accepts(result)))
        .collect::<Vec<_>>();
    let dropped = before - kept.len();
    (kept, dropped)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Relevance,
    #[serde(alias = "fee", alias = "annual_fee")]
    Fees,
    #[serde(alias = "match_score", alias = "matchScore")]
    Match,
    #[serde(alias = "minScore", alias = "min_score_pct", alias = "minScorePct")]
    MinScore,
    /// Keep the input order, which the data source already ranked.
    #[serde(alias = "priority")]
    Backend,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[serde(alias = "ascending")]
    Asc,
    #[default]
    #[serde(alias = "descending")]
    Desc,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SortOrder {
    #[serde(alias = "sortBy", alias = "sort_by")]
    pub key: SortKey,
    #[serde(alias = "sortOrder", alias = "order")]
    pub direction: SortDirection,
}

impl SortOrder {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }
}

/// Stable sort; equal keys keep their input order. For `MinScore`, eligible results always
/// come first whatever the direction.
pub fn sort_results(results: &mut [MatchResult], order: SortOrder) {
    let directed = |ordering: Ordering| match order.direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    };

    match order.key {
        SortKey::Backend => {}
        SortKey::Relevance | SortKey::Match => {
            results.sort_by(|a, b| directed(a.match_score.total_cmp(&b.match_score)));
        }
        SortKey::Fees => {
            results.sort_by(|a, b| directed(a.offering.annual_fee.cmp(&b.offering.annual_fee)));
        }
        SortKey::MinScore => {
            results.sort_by(|a, b| {
                b.eligible.cmp(&a.eligible).then_with(|| {
                    directed(a.offering.min_score_pct.total_cmp(&b.offering.min_score_pct))
                })
            });
        }
    }
}

/// Output of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchReport {
    pub results: Vec<MatchResult>,
    pub skipped: Vec<MalformedOffering>,
    pub filtered_out: usize,
    pub restriction: InterestRestriction,
}

impl MatchReport {
    pub fn total_considered(&self) -> usize {
        self.results.len() + self.filtered_out
    }
}
