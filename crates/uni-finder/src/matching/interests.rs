use std::collections::HashMap;
use std::sync::OnceLock;

use super::domain::{Discipline, InterestMatch, MatchBasis, ProgramOffering};
use super::priority::InterestList;
use crate::catalog::normalizer::slugify;

/// Tag vocabulary for one interest. A core tag always matches; a general tag matches only
/// when none of the exclusion tags is present on the offering.
struct InterestCategory {
    core: &'static [&'static str],
    general: &'static [&'static str],
    exclusion: &'static [&'static str],
}

const CATEGORIES: &[(&str, InterestCategory)] = &[
    (
        "medicine",
        InterestCategory {
            core: &["mbbs", "doctor"],
            general: &["medicine", "medical"],
            exclusion: &["nursing", "pharmacy", "allied-health"],
        },
    ),
    (
        "nursing",
        InterestCategory {
            core: &["nursing"],
            general: &[],
            exclusion: &[],
        },
    ),
    (
        "pharmacy",
        InterestCategory {
            core: &["pharmacy"],
            general: &[],
            exclusion: &[],
        },
    ),
    (
        "dentistry",
        InterestCategory {
            core: &["dentistry", "dental"],
            general: &[],
            exclusion: &[],
        },
    ),
    (
        "engineering",
        InterestCategory {
            core: &[
                "civil",
                "electrical",
                "mechanical",
                "chemical",
                "aerospace",
                "industrial",
                "computer engineering",
            ],
            general: &["engineering", "computer"],
            exclusion: &["technology", "information technology", "it"],
        },
    ),
    (
        "computer science",
        InterestCategory {
            core: &[
                "computer science",
                "software engineering",
                "programming",
                "software",
            ],
            general: &["software", "programming", "computer science"],
            exclusion: &[
                "information technology",
                "it",
                "information systems",
                "computer engineering",
                "electronics",
                "engineering",
            ],
        },
    ),
    (
        "business",
        InterestCategory {
            core: &[
                "business administration",
                "finance",
                "accounting",
                "marketing",
                "economics",
            ],
            general: &["business"],
            exclusion: &["management", "administration"],
        },
    ),
    (
        "commerce",
        InterestCategory {
            core: &["commerce", "business administration"],
            general: &["business", "economics", "finance", "accounting"],
            exclusion: &[],
        },
    ),
    (
        "economics",
        InterestCategory {
            core: &["economics"],
            general: &["economy"],
            exclusion: &[],
        },
    ),
    (
        "finance",
        InterestCategory {
            core: &["finance", "financial"],
            general: &["banking"],
            exclusion: &[],
        },
    ),
    (
        "accounting",
        InterestCategory {
            core: &["accounting", "accountancy"],
            general: &[],
            exclusion: &[],
        },
    ),
    (
        "marketing",
        InterestCategory {
            core: &["marketing", "advertising"],
            general: &["branding"],
            exclusion: &[],
        },
    ),
    (
        "arts",
        InterestCategory {
            core: &[
                "fine arts",
                "visual arts",
                "performing arts",
                "design",
                "creative",
            ],
            general: &["arts"],
            exclusion: &["humanities", "liberal arts"],
        },
    ),
    (
        "humanities",
        InterestCategory {
            core: &["humanities", "liberal arts"],
            general: &["philosophy", "history", "literature"],
            exclusion: &[],
        },
    ),
    (
        "literature",
        InterestCategory {
            core: &["literature", "english"],
            general: &["linguistics"],
            exclusion: &[],
        },
    ),
    (
        "history",
        InterestCategory {
            core: &["history"],
            general: &["historical"],
            exclusion: &[],
        },
    ),
    (
        "philosophy",
        InterestCategory {
            core: &["philosophy"],
            general: &["philosophical"],
            exclusion: &[],
        },
    ),
    (
        "psychology",
        InterestCategory {
            core: &["psychology"],
            general: &["psychological", "mental health"],
            exclusion: &[],
        },
    ),
    (
        "sociology",
        InterestCategory {
            core: &["sociology"],
            general: &["social", "social sciences"],
            exclusion: &[],
        },
    ),
    (
        "political science",
        InterestCategory {
            core: &["political science", "politics"],
            general: &["international relations"],
            exclusion: &[],
        },
    ),
    (
        "international relations",
        InterestCategory {
            core: &["international relations"],
            general: &["diplomacy", "foreign policy"],
            exclusion: &[],
        },
    ),
    (
        "media studies",
        InterestCategory {
            core: &["media studies", "media"],
            general: &["communication", "journalism"],
            exclusion: &[],
        },
    ),
    (
        "journalism",
        InterestCategory {
            core: &["journalism"],
            general: &["media", "communication"],
            exclusion: &[],
        },
    ),
    (
        "education",
        InterestCategory {
            core: &["education", "teaching"],
            general: &["pedagogy"],
            exclusion: &[],
        },
    ),
    (
        "law",
        InterestCategory {
            core: &["law", "legal", "jurisprudence"],
            general: &["law"],
            exclusion: &["legal studies", "criminal justice"],
        },
    ),
    (
        "information technology",
        InterestCategory {
            core: &["information technology", "it"],
            general: &["information systems"],
            exclusion: &[],
        },
    ),
    (
        "data science",
        InterestCategory {
            core: &["data science", "data analytics"],
            general: &["machine learning"],
            exclusion: &[],
        },
    ),
    (
        "web development",
        InterestCategory {
            core: &["web development", "web"],
            general: &["frontend", "backend"],
            exclusion: &[],
        },
    ),
    (
        "game development",
        InterestCategory {
            core: &["game development", "gaming"],
            general: &["game design"],
            exclusion: &[],
        },
    ),
    (
        "mobile development",
        InterestCategory {
            core: &["mobile development", "mobile"],
            general: &["app development"],
            exclusion: &[],
        },
    ),
    (
        "banking",
        InterestCategory {
            core: &["banking"],
            general: &["finance", "financial"],
            exclusion: &[],
        },
    ),
    (
        "insurance",
        InterestCategory {
            core: &["insurance"],
            general: &["risk management"],
            exclusion: &[],
        },
    ),
    (
        "taxation",
        InterestCategory {
            core: &["taxation", "tax"],
            general: &["tax law"],
            exclusion: &[],
        },
    ),
];

static CATEGORY_INDEX: OnceLock<HashMap<String, &'static InterestCategory>> = OnceLock::new();

fn category_for(discipline: &Discipline) -> Option<&'static InterestCategory> {
    CATEGORY_INDEX
        .get_or_init(|| {
            CATEGORIES
                .iter()
                .map(|(name, category)| (slugify(name), category))
                .collect()
        })
        .get(discipline.as_str())
        .copied()
}

fn contains_slug(vocabulary: &[&str], tag: &str) -> bool {
    vocabulary.iter().any(|candidate| slugify(candidate) == tag)
}

/// Returns the offering tag that ties `interest` to the offering, if any.
pub(crate) fn matching_tag(interest: &Discipline, tags: &[String]) -> Option<String> {
    let slugs = tags
        .iter()
        .map(|tag| slugify(tag))
        .filter(|tag| !tag.is_empty())
        .collect::<Vec<_>>();

    match category_for(interest) {
        Some(category) => {
            if let Some(core) = slugs.iter().find(|tag| contains_slug(category.core, tag)) {
                return Some(core.clone());
            }
            if slugs.iter().any(|tag| contains_slug(category.exclusion, tag)) {
                return None;
            }
            slugs
                .iter()
                .find(|tag| contains_slug(category.general, tag))
                .cloned()
        }
        None => slugs.into_iter().find(|tag| tag == interest.as_str()),
    }
}

/// Ranked interest credited for the offering. The offering's own discipline wins when it is
/// ranked; tags are consulted only for disciplines the student never ranked.
pub(crate) fn best_interest_match(
    interests: &InterestList,
    offering: &ProgramOffering,
) -> Option<InterestMatch> {
    if let Some(priority) = interests.priority_of(&offering.discipline) {
        return Some(InterestMatch {
            discipline: offering.discipline.clone(),
            priority,
            basis: MatchBasis::Discipline,
        });
    }

    interests.iter().find_map(|entry| {
        let tag = matching_tag(&entry.discipline, &offering.tags)?;
        Some(InterestMatch {
            discipline: entry.discipline.clone(),
            priority: entry.priority,
            basis: MatchBasis::Tag(tag),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn core_tags_match_even_with_exclusions() {
        let interest = Discipline::new("Medicine");
        assert_eq!(
            matching_tag(&interest, &tags(&["MBBS", "nursing"])),
            Some("mbbs".to_string())
        );
    }

    #[test]
    fn exclusion_tags_block_general_matches() {
        let interest = Discipline::new("computer science");
        assert_eq!(matching_tag(&interest, &tags(&["software"])), Some("software".to_string()));
        assert_eq!(
            matching_tag(&interest, &tags(&["computer", "Information Technology"])),
            None
        );

        let engineering = Discipline::new("engineering");
        assert_eq!(matching_tag(&engineering, &tags(&["engineering", "IT"])), None);
    }

    #[test]
    fn uncategorised_interest_matches_its_own_slug() {
        let interest = Discipline::new("Veterinary Science");
        assert_eq!(
            matching_tag(&interest, &tags(&["veterinary science"])),
            Some("veterinary-science".to_string())
        );
        assert_eq!(matching_tag(&interest, &tags(&["animal care"])), None);
    }
}
