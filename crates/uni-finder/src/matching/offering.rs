use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{AcademicTrack, Discipline, ProgramOffering, ScoreType};
use crate::catalog::fields::{lenient_bool, lenient_number, lenient_string, string_list};

/// Offering as supplied by a data source. Every field is optional until validated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OfferingRecord {
    #[serde(alias = "id", alias = "offeringId", deserialize_with = "lenient_string")]
    pub offering_id: Option<String>,
    #[serde(alias = "programId", deserialize_with = "lenient_string")]
    pub program_id: Option<String>,
    #[serde(
        alias = "name",
        alias = "programName",
        alias = "program",
        deserialize_with = "lenient_string"
    )]
    pub program_name: Option<String>,
    #[serde(alias = "field", deserialize_with = "lenient_string")]
    pub discipline: Option<String>,
    #[serde(
        alias = "university_name",
        alias = "universityName",
        deserialize_with = "lenient_string"
    )]
    pub university: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub sector: Option<String>,
    #[serde(alias = "campus_city", alias = "location", deserialize_with = "lenient_string")]
    pub city: Option<String>,
    #[serde(
        alias = "annual_fees",
        alias = "annualFee",
        alias = "fees",
        deserialize_with = "lenient_number"
    )]
    pub annual_fee: Option<f64>,
    #[serde(alias = "minScorePct", alias = "min_score", deserialize_with = "lenient_number")]
    pub min_score_pct: Option<f64>,
    #[serde(alias = "minScoreType", deserialize_with = "lenient_string")]
    pub min_score_type: Option<String>,
    #[serde(alias = "requiredGroups", deserialize_with = "string_list")]
    pub required_groups: Vec<String>,
    #[serde(alias = "acceptedBoards", deserialize_with = "string_list")]
    pub accepted_boards: Vec<String>,
    #[serde(deserialize_with = "string_list")]
    pub tags: Vec<String>,
    #[serde(
        alias = "applicationDeadline",
        alias = "deadline",
        deserialize_with = "lenient_string"
    )]
    pub application_deadline: Option<String>,
    #[serde(alias = "hostelAvailable", alias = "hostel", deserialize_with = "lenient_bool")]
    pub hostel_available: Option<bool>,
    #[serde(skip)]
    pub(crate) unreadable: Option<String>,
}

impl OfferingRecord {
    /// Placeholder for a row the source could not decode, so it keeps its position.
    pub(crate) fn unreadable(reason: impl Into<String>) -> Self {
        Self {
            unreadable: Some(reason.into()),
            ..Self::default()
        }
    }

    /// Validate into a [`ProgramOffering`]; `index` is the record's position in its batch.
    pub fn validate(&self, index: usize) -> Result<ProgramOffering, MalformedOffering> {
        let reject = |defect: OfferingDefect| MalformedOffering {
            index,
            offering_id: self.offering_id.clone(),
            defect,
        };

        if let Some(reason) = &self.unreadable {
            return Err(reject(OfferingDefect::Unreadable {
                reason: reason.clone(),
            }));
        }

        let offering_id = required_text("offering_id", &self.offering_id).map_err(reject)?;
        let program_name = required_text("program_name", &self.program_name).map_err(reject)?;
        let discipline = self
            .discipline
            .as_deref()
            .map(Discipline::new)
            .filter(|discipline| !discipline.is_empty())
            .ok_or(OfferingDefect::MissingField {
                field: "discipline",
            })
            .map_err(reject)?;
        let city = required_text("city", &self.city).map_err(reject)?;

        let annual_fee = required_number("annual_fee", self.annual_fee, None).map_err(reject)?;
        let min_score_pct =
            required_number("min_score_pct", self.min_score_pct, Some(100.0)).map_err(reject)?;

        let application_deadline = match self.application_deadline.as_deref() {
            None => None,
            Some(raw) => Some(parse_date(raw).ok_or_else(|| {
                reject(OfferingDefect::InvalidDate {
                    field: "application_deadline",
                    value: raw.to_string(),
                })
            })?),
        };

        Ok(ProgramOffering {
            offering_id,
            program_id: self.program_id.clone(),
            program_name,
            discipline,
            university: self
                .university
                .clone()
                .unwrap_or_else(|| "Unknown university".to_string()),
            sector: self.sector.clone(),
            city,
            annual_fee: annual_fee.round() as u64,
            min_score_pct: min_score_pct as f32,
            min_score_type: self
                .min_score_type
                .as_deref()
                .map(ScoreType::parse_label)
                .unwrap_or_default(),
            required_groups: self
                .required_groups
                .iter()
                .filter_map(|group| AcademicTrack::parse_label(group))
                .collect(),
            accepted_boards: self.accepted_boards.clone(),
            tags: self.tags.clone(),
            application_deadline,
            hostel_available: self.hostel_available,
        })
    }
}

impl From<ProgramOffering> for OfferingRecord {
    fn from(offering: ProgramOffering) -> Self {
        Self {
            offering_id: Some(offering.offering_id),
            program_id: offering.program_id,
            program_name: Some(offering.program_name),
            discipline: Some(offering.discipline.into()),
            university: Some(offering.university),
            sector: offering.sector,
            city: Some(offering.city),
            annual_fee: Some(offering.annual_fee as f64),
            min_score_pct: Some(f64::from(offering.min_score_pct)),
            min_score_type: Some(
                serde_json::to_value(offering.min_score_type)
                    .ok()
                    .and_then(|value| value.as_str().map(str::to_string))
                    .unwrap_or_default(),
            ),
            required_groups: offering
                .required_groups
                .into_iter()
                .map(String::from)
                .collect(),
            accepted_boards: offering.accepted_boards,
            tags: offering.tags,
            application_deadline: offering
                .application_deadline
                .map(|date| date.format("%Y-%m-%d").to_string()),
            hostel_available: offering.hostel_available,
            unreadable: None,
        }
    }
}

fn required_text(field: &'static str, value: &Option<String>) -> Result<String, OfferingDefect> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
        .ok_or(OfferingDefect::MissingField { field })
}

fn required_number(
    field: &'static str,
    value: Option<f64>,
    max: Option<f64>,
) -> Result<f64, OfferingDefect> {
    let value = value.ok_or(OfferingDefect::MissingField { field })?;
    if !value.is_finite() {
        return Err(OfferingDefect::InvalidNumber { field });
    }
    if value < 0.0 || max.is_some_and(|max| value > max) {
        return Err(OfferingDefect::OutOfRange { field, value });
    }
    Ok(value)
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%d/%m/%Y"))
        .ok()
        .or_else(|| {
            chrono::DateTime::parse_from_rfc3339(trimmed)
                .ok()
                .map(|value| value.date_naive())
        })
}

/// Why an offering record was skipped.
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OfferingDefect {
    #[error("missing required field `{field}`")]
    MissingField { field: &'static str },
    #[error("field `{field}` is not a number")]
    InvalidNumber { field: &'static str },
    #[error("field `{field}` is out of range ({value})")]
    OutOfRange { field: &'static str, value: f64 },
    #[error("field `{field}` is not a date (`{value}`)")]
    InvalidDate { field: &'static str, value: String },
    #[error("record could not be read: {reason}")]
    Unreadable { reason: String },
}

/// An offering left out of ranking, reported alongside the results.
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[error("offering at position {index} skipped: {defect}")]
pub struct MalformedOffering {
    pub index: usize,
    pub offering_id: Option<String>,
    pub defect: OfferingDefect,
}
