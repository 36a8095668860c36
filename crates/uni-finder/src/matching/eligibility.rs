use std::collections::BTreeMap;
use std::sync::OnceLock;

use serde::Serialize;

use super::domain::{AcademicTrack, Discipline, InterestRestriction, ScoreField, ScoreType};
use super::priority::InterestList;

static STANDARD_TABLE: OnceLock<EligibilityRuleTable> = OnceLock::new();

const MEDICAL: &[&str] = &[
    "medicine",
    "dentistry",
    "pharmacy",
    "nursing",
    "physiotherapy",
    "medical-technology",
    "biotechnology",
    "biochemistry",
    "microbiology",
    "public-health",
    "nutrition",
];

const ENGINEERING: &[&str] = &[
    "computer-science",
    "engineering",
    "technology",
    "architecture",
    "software-engineering",
    "information-technology",
    "data-science",
    "artificial-intelligence",
    "cybersecurity",
    "robotics",
];

const ICS_COMPUTING: &[&str] = &[
    "computer-science",
    "software-engineering",
    "information-technology",
    "data-science",
    "artificial-intelligence",
    "cybersecurity",
    "web-development",
    "game-development",
    "mobile-development",
    "engineering",
    "technology",
    "architecture",
    "robotics",
];

const BUSINESS: &[&str] = &[
    "business",
    "commerce",
    "economics",
    "finance",
    "accounting",
    "marketing",
    "management",
    "banking",
    "insurance",
    "taxation",
];

const HUMANITIES: &[&str] = &[
    "arts",
    "humanities",
    "literature",
    "history",
    "philosophy",
    "psychology",
    "sociology",
    "political-science",
    "international-relations",
    "media-studies",
    "journalism",
    "education",
];

// Commerce and arts students may still take the applied computing programs.
const COMPUTING_ADJACENT: &[&str] = &[
    "computer-science",
    "information-technology",
    "data-science",
    "web-development",
    "game-development",
    "mobile-development",
];

const STANDARD_RULES: &[(AcademicTrack, &[&[&str]])] = &[
    (AcademicTrack::PreEngineering, &[ENGINEERING, BUSINESS, HUMANITIES]),
    (
        AcademicTrack::PreMedical,
        &[ENGINEERING, MEDICAL, BUSINESS, HUMANITIES],
    ),
    (
        AcademicTrack::ComputerScience,
        &[ICS_COMPUTING, BUSINESS, HUMANITIES],
    ),
    (
        AcademicTrack::Commerce,
        &[BUSINESS, HUMANITIES, COMPUTING_ADJACENT],
    ),
    (AcademicTrack::Arts, &[HUMANITIES, BUSINESS, COMPUTING_ADJACENT]),
];

/// Errors raised when building a custom rule table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleTableError {
    #[error("track {0} must allow at least one discipline")]
    EmptyTrack(AcademicTrack),
    #[error("rule table must list at least one track")]
    Empty,
}

/// Read-only mapping from subject group to the disciplines it may pursue.
///
/// `Other` (and any track a custom table leaves out) resolves to the union of every listed
/// discipline. This is an open-world default: an unspecified track is never denied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EligibilityRuleTable {
    allowed: BTreeMap<AcademicTrack, Vec<Discipline>>,
    superset: Vec<Discipline>,
}

impl EligibilityRuleTable {
    /// The built-in table, initialised once per process.
    pub fn standard() -> &'static Self {
        STANDARD_TABLE.get_or_init(|| {
            let entries = STANDARD_RULES.iter().map(|(track, groups)| {
                let disciplines = groups
                    .iter()
                    .flat_map(|group| group.iter())
                    .map(|slug| Discipline::new(slug))
                    .collect::<Vec<_>>();
                (*track, disciplines)
            });
            Self::build(entries)
        })
    }

    /// Build a table from explicit entries. Entries for `Other` are ignored; it is always
    /// recomputed as the superset.
    pub fn from_entries<I>(entries: I) -> Result<Self, RuleTableError>
    where
        I: IntoIterator<Item = (AcademicTrack, Vec<Discipline>)>,
    {
        let entries = entries
            .into_iter()
            .filter(|(track, _)| *track != AcademicTrack::Other)
            .collect::<Vec<_>>();

        if entries.is_empty() {
            return Err(RuleTableError::Empty);
        }
        if let Some((track, _)) = entries
            .iter()
            .find(|(_, disciplines)| disciplines.iter().all(Discipline::is_empty))
        {
            return Err(RuleTableError::EmptyTrack(*track));
        }

        Ok(Self::build(entries))
    }

    fn build<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (AcademicTrack, Vec<Discipline>)>,
    {
        let mut allowed = BTreeMap::new();
        let mut superset: Vec<Discipline> = Vec::new();

        for (track, disciplines) in entries {
            let mut unique: Vec<Discipline> = Vec::with_capacity(disciplines.len());
            for discipline in disciplines {
                if discipline.is_empty() || unique.contains(&discipline) {
                    continue;
                }
                if !superset.contains(&discipline) {
                    superset.push(discipline.clone());
                }
                unique.push(discipline);
            }
            allowed.insert(track, unique);
        }

        Self { allowed, superset }
    }

    pub fn allowed_disciplines(&self, track: AcademicTrack) -> &[Discipline] {
        match self.allowed.get(&track) {
            Some(disciplines) if track != AcademicTrack::Other => disciplines,
            _ => &self.superset,
        }
    }

    pub fn is_track_compatible(&self, track: AcademicTrack, discipline: &Discipline) -> bool {
        self.allowed_disciplines(track).contains(discipline)
    }

    /// Every discipline some track allows.
    pub fn known_disciplines(&self) -> &[Discipline] {
        &self.superset
    }

    /// Which raw score a requirement of the given type refers to.
    pub fn score_field(&self, score_type: ScoreType) -> ScoreField {
        match score_type {
            ScoreType::Ssc => ScoreField::Ssc,
            ScoreType::Hsc => ScoreField::Hsc,
            ScoreType::Ib | ScoreType::Aggregate => ScoreField::Best,
        }
    }

    /// Split a student's interests into those their track allows and those it does not.
    pub fn restriction_for(
        &self,
        track: AcademicTrack,
        interests: &InterestList,
    ) -> InterestRestriction {
        let allowed = self.allowed_disciplines(track).to_vec();
        let (permitted_interests, restricted_interests) = interests
            .disciplines()
            .cloned()
            .partition(|discipline| allowed.contains(discipline));

        InterestRestriction {
            track,
            allowed,
            permitted_interests,
            restricted_interests,
        }
    }

    /// One view per track, in display order.
    pub fn track_views(&self) -> Vec<TrackRulesView> {
        AcademicTrack::ordered()
            .into_iter()
            .map(|track| self.track_view(track))
            .collect()
    }

    pub fn track_view(&self, track: AcademicTrack) -> TrackRulesView {
        TrackRulesView {
            track,
            label: track.label(),
            disciplines: self.allowed_disciplines(track).to_vec(),
        }
    }
}

/// Serializable snapshot of one track's allowed disciplines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackRulesView {
    pub track: AcademicTrack,
    pub label: &'static str,
    pub disciplines: Vec<Discipline>,
}
