use super::super::domain::{
    MatchBasis, MatchFactor, MatchResult, ProgramOffering, ScoreComponent, ScoreField,
    StudentProfile,
};
use super::super::eligibility::EligibilityRuleTable;
use super::super::interests::best_interest_match;
use super::config::ScoringWeights;

pub(crate) fn score_offering(
    profile: &StudentProfile,
    offering: &ProgramOffering,
    rules: &EligibilityRuleTable,
    weights: &ScoringWeights,
) -> MatchResult {
    let mut components = Vec::with_capacity(5);

    let matched_interest = best_interest_match(&profile.interests, offering);
    match &matched_interest {
        Some(found) => {
            let ranked = profile.interests.len().max(1) as f32;
            let decay = (1.0 - (found.priority as f32 - 1.0) / ranked).max(0.0);
            let via = match &found.basis {
                MatchBasis::Discipline => "discipline".to_string(),
                MatchBasis::Tag(tag) => format!("tag `{tag}`"),
            };
            components.push(ScoreComponent {
                factor: MatchFactor::Interest,
                points: weights.interest * decay,
                notes: format!(
                    "matches your priority {} interest {} by {via}",
                    found.priority,
                    found.discipline.label()
                ),
            });
        }
        None if profile.interests.is_empty() => components.push(ScoreComponent {
            factor: MatchFactor::Interest,
            points: 0.0,
            notes: "no interests ranked".to_string(),
        }),
        None => components.push(ScoreComponent {
            factor: MatchFactor::Interest,
            points: 0.0,
            notes: format!(
                "{} is not among your ranked interests",
                offering.discipline.label()
            ),
        }),
    }

    let subject_compatible = rules.is_track_compatible(profile.track, &offering.discipline);
    components.push(if subject_compatible {
        ScoreComponent {
            factor: MatchFactor::SubjectCompatibility,
            points: weights.subject_compatible,
            notes: format!(
                "{} is open to {} students",
                offering.discipline.label(),
                profile.track
            ),
        }
    } else {
        ScoreComponent {
            factor: MatchFactor::SubjectCompatibility,
            points: weights.subject_incompatible,
            notes: format!(
                "{} students cannot pursue {}",
                profile.track,
                offering.discipline.label()
            ),
        }
    });

    let academic_score = profile.academic_score();
    let eligible = academic_score >= offering.min_score_pct;
    let basis = match rules.score_field(offering.min_score_type) {
        ScoreField::Best => String::new(),
        _ => format!(
            " (requirement stated as {}, compared against your best score)",
            offering.min_score_type.label()
        ),
    };
    components.push(if eligible {
        ScoreComponent {
            factor: MatchFactor::AcademicEligibility,
            points: weights.eligible,
            notes: format!(
                "academic score {academic_score:.1}% meets requirement {:.1}%{basis}",
                offering.min_score_pct
            ),
        }
    } else {
        ScoreComponent {
            factor: MatchFactor::AcademicEligibility,
            points: weights.ineligible,
            notes: format!(
                "academic score {academic_score:.1}% below requirement {:.1}%{basis}",
                offering.min_score_pct
            ),
        }
    });

    let within_budget = offering.annual_fee <= profile.budget;
    components.push(ScoreComponent {
        factor: MatchFactor::Budget,
        points: if within_budget {
            weights.within_budget
        } else {
            0.0
        },
        notes: if within_budget {
            format!(
                "annual fee PKR {} within budget PKR {}",
                offering.annual_fee, profile.budget
            )
        } else {
            format!(
                "annual fee PKR {} exceeds budget PKR {}",
                offering.annual_fee, profile.budget
            )
        },
    });

    if let Some(preferred) = &profile.preferred_location {
        let in_city = offering
            .city
            .to_lowercase()
            .contains(&preferred.to_lowercase());
        components.push(ScoreComponent {
            factor: MatchFactor::Location,
            points: if in_city {
                weights.preferred_location
            } else {
                0.0
            },
            notes: if in_city {
                format!("campus in your preferred location {preferred}")
            } else {
                format!("campus in {}, outside {preferred}", offering.city)
            },
        });
    }

    let group_requirement_met =
        offering.required_groups.is_empty() || offering.required_groups.contains(&profile.track);

    let total: f32 = components.iter().map(|component| component.points).sum();
    let match_score = (total.clamp(0.0, 100.0) * 10.0).round() / 10.0;

    let mut explanation = components
        .iter()
        .map(|component| component.notes.clone())
        .collect::<Vec<_>>();
    if !group_requirement_met {
        explanation.push(format!(
            "program lists required groups that do not include {}",
            profile.track
        ));
    }

    MatchResult {
        offering: offering.clone(),
        match_score,
        subject_compatible,
        eligible,
        academic_score,
        within_budget,
        group_requirement_met,
        matched_interest,
        components,
        explanation,
    }
}
