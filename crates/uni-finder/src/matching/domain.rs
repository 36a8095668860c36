use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::priority::{InterestList, PriorityError};
use crate::catalog::fields::{lenient_number, lenient_string};
use crate::catalog::normalizer::{compact, normalize_label, slugify};

/// Higher-secondary subject group the student completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AcademicTrack {
    PreEngineering,
    PreMedical,
    ComputerScience,
    Commerce,
    Arts,
    Other,
}

impl AcademicTrack {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::PreEngineering,
            Self::PreMedical,
            Self::ComputerScience,
            Self::Commerce,
            Self::Arts,
            Self::Other,
        ]
    }

    pub const fn slug(self) -> &'static str {
        match self {
            Self::PreEngineering => "pre-engineering",
            Self::PreMedical => "pre-medical",
            Self::ComputerScience => "computer-science-track",
            Self::Commerce => "commerce-track",
            Self::Arts => "arts-track",
            Self::Other => "other",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::PreEngineering => "Pre-Engineering",
            Self::PreMedical => "Pre-Medical",
            Self::ComputerScience => "ICS (Computer Science)",
            Self::Commerce => "ICom (Commerce)",
            Self::Arts => "IA (Arts)",
            Self::Other => "Other",
        }
    }

    /// Parse a slug or form label. Blank input is `None`; anything unrecognised is `Other`.
    pub fn parse_label(raw: &str) -> Option<Self> {
        let key = compact(raw);
        if key.is_empty() {
            return None;
        }

        let track = match key.as_str() {
            "preengineering" | "fscpreengineering" | "engineering" => Self::PreEngineering,
            "premedical" | "fscpremedical" | "medical" => Self::PreMedical,
            "computersciencetrack" | "icscomputerscience" | "ics" | "computerscience" => {
                Self::ComputerScience
            }
            "commercetrack" | "icomcommerce" | "icom" | "commerce" => Self::Commerce,
            "artstrack" | "iaarts" | "ia" | "arts" | "humanities" => Self::Arts,
            _ => Self::Other,
        };
        Some(track)
    }
}

impl fmt::Display for AcademicTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl TryFrom<String> for AcademicTrack {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse_label(&value).ok_or_else(|| "academic track must not be blank".to_string())
    }
}

impl From<AcademicTrack> for String {
    fn from(value: AcademicTrack) -> Self {
        value.slug().to_string()
    }
}

/// Normalized field-of-study identifier (`computer-science`, `business`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Discipline(String);

impl Discipline {
    pub fn new(raw: &str) -> Self {
        Self(slugify(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Title-cased display form of the slug.
    pub fn label(&self) -> String {
        self.0
            .split('-')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Discipline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Discipline {
    fn from(value: String) -> Self {
        Self::new(&value)
    }
}

impl From<&str> for Discipline {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<Discipline> for String {
    fn from(value: Discipline) -> Self {
        value.0
    }
}

/// Qualification the student holds; decides which score comparison applies downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QualificationKind {
    Secondary,
    HigherSecondary,
    InternationalBaccalaureate,
    #[default]
    Other,
}

impl QualificationKind {
    pub fn parse_label(raw: &str) -> Self {
        let key = compact(raw);
        if key.starts_with("ssc") || key.starts_with("olevel") || key == "secondary" {
            Self::Secondary
        } else if key.starts_with("hsc")
            || key.starts_with("alevel")
            || key == "highersecondary"
            || key == "fsc"
        {
            Self::HigherSecondary
        } else if key.starts_with("ib") || key == "internationalbaccalaureate" {
            Self::InternationalBaccalaureate
        } else {
            Self::Other
        }
    }
}

/// The score an offering's minimum requirement is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreType {
    Ssc,
    Hsc,
    Ib,
    #[default]
    Aggregate,
}

impl ScoreType {
    pub fn parse_label(raw: &str) -> Self {
        match compact(raw).as_str() {
            "ssc" | "matric" | "olevel" | "secondary" => Self::Ssc,
            "hsc" | "fsc" | "inter" | "intermediate" | "alevel" | "highersecondary" => Self::Hsc,
            "ib" | "ibdiploma" | "internationalbaccalaureate" => Self::Ib,
            _ => Self::Aggregate,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Ssc => "SSC",
            Self::Hsc => "HSC",
            Self::Ib => "IB",
            Self::Aggregate => "aggregate",
        }
    }
}

/// Raw score field a requirement refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreField {
    Ssc,
    Hsc,
    Best,
}

/// One ranked interest: priority 1 is the strongest preference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterestPriority {
    pub discipline: Discipline,
    pub priority: u32,
}

/// Validated student profile consumed by the engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentProfile {
    pub ssc_percentage: f32,
    pub hsc_percentage: f32,
    pub track: AcademicTrack,
    pub qualification: QualificationKind,
    pub interests: InterestList,
    pub budget: u64,
    pub preferred_location: Option<String>,
}

impl StudentProfile {
    /// Higher of the two reported percentages; compared against every requirement.
    pub fn academic_score(&self) -> f32 {
        self.ssc_percentage.max(self.hsc_percentage)
    }
}

/// Ranked interest as submitted by the form (`{"interest": "Medicine", "priority": 1}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterestPriorityInput {
    #[serde(alias = "discipline")]
    pub interest: String,
    pub priority: u32,
}

/// Unvalidated profile as received from a client. Accepts the form's camelCase names and
/// numbers sent as strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileSubmission {
    #[serde(alias = "sscPercentage", deserialize_with = "lenient_number")]
    pub ssc_percentage: Option<f64>,
    #[serde(alias = "hscPercentage", deserialize_with = "lenient_number")]
    pub hsc_percentage: Option<f64>,
    #[serde(alias = "hscGroup", alias = "track", deserialize_with = "lenient_string")]
    pub hsc_group: Option<String>,
    #[serde(alias = "qualificationType", deserialize_with = "lenient_string")]
    pub qualification_type: Option<String>,
    #[serde(alias = "interestPriorities")]
    pub interest_priorities: Vec<InterestPriorityInput>,
    pub interests: Vec<String>,
    #[serde(deserialize_with = "lenient_number")]
    pub budget: Option<f64>,
    #[serde(alias = "preferredLocation", deserialize_with = "lenient_string")]
    pub preferred_location: Option<String>,
}

impl ProfileSubmission {
    /// Validate into a [`StudentProfile`]. Scoring never starts on a profile that fails here.
    pub fn validate(self) -> Result<StudentProfile, InvalidProfile> {
        let ssc_percentage = checked_percentage("ssc_percentage", self.ssc_percentage)?;
        let hsc_percentage = checked_percentage("hsc_percentage", self.hsc_percentage)?;

        let track = self
            .hsc_group
            .as_deref()
            .and_then(AcademicTrack::parse_label)
            .ok_or(InvalidProfile::MissingTrack)?;

        let qualification = self
            .qualification_type
            .as_deref()
            .map(QualificationKind::parse_label)
            .unwrap_or_default();

        let interests = if self.interest_priorities.is_empty() {
            let mut list = InterestList::default();
            for raw in &self.interests {
                let discipline = Discipline::new(raw);
                if discipline.is_empty() {
                    return Err(InvalidProfile::EmptyInterest);
                }
                list.add_interest(discipline)?;
            }
            list
        } else {
            let mut ranked = Vec::with_capacity(self.interest_priorities.len());
            for input in &self.interest_priorities {
                let discipline = Discipline::new(&input.interest);
                if discipline.is_empty() {
                    return Err(InvalidProfile::EmptyInterest);
                }
                ranked.push((discipline, input.priority));
            }
            InterestList::from_ranked(ranked)?
        };

        let budget = match self.budget {
            None => 0,
            Some(value) if value.is_finite() && value >= 0.0 => value.floor() as u64,
            Some(value) => return Err(InvalidProfile::InvalidBudget { value }),
        };

        let preferred_location = self
            .preferred_location
            .map(|value| normalize_label(&value))
            .filter(|value| !value.is_empty());

        Ok(StudentProfile {
            ssc_percentage,
            hsc_percentage,
            track,
            qualification,
            interests,
            budget,
            preferred_location,
        })
    }
}

fn checked_percentage(field: &'static str, value: Option<f64>) -> Result<f32, InvalidProfile> {
    let value = value.ok_or(InvalidProfile::MissingScore { field })?;
    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
        return Err(InvalidProfile::ScoreOutOfRange { field, value });
    }
    Ok(value as f32)
}

/// Raised when a profile cannot be scored at all.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidProfile {
    #[error("missing required score `{field}`")]
    MissingScore { field: &'static str },
    #[error("score `{field}` must be a percentage between 0 and 100 (found {value})")]
    ScoreOutOfRange { field: &'static str, value: f64 },
    #[error("missing academic track (subject group)")]
    MissingTrack,
    #[error("interest names must not be blank")]
    EmptyInterest,
    #[error("budget must be a non-negative amount (found {value})")]
    InvalidBudget { value: f64 },
    #[error("invalid interest list: {0}")]
    Interests(#[from] PriorityError),
}

/// One program offered at one campus, after validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramOffering {
    pub offering_id: String,
    pub program_id: Option<String>,
    pub program_name: String,
    pub discipline: Discipline,
    pub university: String,
    pub sector: Option<String>,
    pub city: String,
    pub annual_fee: u64,
    pub min_score_pct: f32,
    pub min_score_type: ScoreType,
    pub required_groups: Vec<AcademicTrack>,
    pub accepted_boards: Vec<String>,
    pub tags: Vec<String>,
    pub application_deadline: Option<NaiveDate>,
    pub hostel_available: Option<bool>,
}

/// Factors contributing to a match score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchFactor {
    Interest,
    SubjectCompatibility,
    AcademicEligibility,
    Budget,
    Location,
}

/// Discrete contribution to a match score, kept for transparent explanations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub factor: MatchFactor,
    pub points: f32,
    pub notes: String,
}

/// How a ranked interest was recognised in an offering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum MatchBasis {
    Discipline,
    Tag(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterestMatch {
    pub discipline: Discipline,
    pub priority: u32,
    pub basis: MatchBasis,
}

/// Per (profile, offering) verdict. Ephemeral: produced per call and never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub offering: ProgramOffering,
    pub match_score: f32,
    pub subject_compatible: bool,
    pub eligible: bool,
    pub academic_score: f32,
    pub within_budget: bool,
    pub group_requirement_met: bool,
    pub matched_interest: Option<InterestMatch>,
    pub components: Vec<ScoreComponent>,
    pub explanation: Vec<String>,
}

/// Which of the student's interests their track allows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterestRestriction {
    pub track: AcademicTrack,
    pub allowed: Vec<Discipline>,
    pub permitted_interests: Vec<Discipline>,
    pub restricted_interests: Vec<Discipline>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn track_labels_round_trip_through_parse() {
        for track in AcademicTrack::ordered() {
            assert_eq!(AcademicTrack::parse_label(track.label()), Some(track));
            assert_eq!(AcademicTrack::parse_label(track.slug()), Some(track));
        }
    }

    #[test]
    fn unknown_track_is_other_and_blank_is_missing() {
        assert_eq!(
            AcademicTrack::parse_label("O-Level Science"),
            Some(AcademicTrack::Other)
        );
        assert_eq!(AcademicTrack::parse_label("   "), None);
    }

    #[test]
    fn discipline_label_is_title_cased() {
        assert_eq!(Discipline::new("computer science").label(), "Computer Science");
    }

    #[test]
    fn qualification_and_score_type_parse_form_labels() {
        assert_eq!(
            QualificationKind::parse_label("HSC/A-Level"),
            QualificationKind::HigherSecondary
        );
        assert_eq!(
            QualificationKind::parse_label("SSC/O-Level"),
            QualificationKind::Secondary
        );
        assert_eq!(
            QualificationKind::parse_label("IB Diploma"),
            QualificationKind::InternationalBaccalaureate
        );
        assert_eq!(ScoreType::parse_label("HSC"), ScoreType::Hsc);
        assert_eq!(ScoreType::parse_label("ssc_hsc"), ScoreType::Aggregate);
    }
}
