use chrono::NaiveDate;

use super::common::*;
use crate::matching::domain::MatchResult;
use crate::matching::offering::{OfferingDefect, OfferingRecord};
use crate::matching::pipeline::{
    apply_filters, sort_results, CityFilter, FilterCriteria, FlagFilter, SortDirection, SortKey,
    SortOrder,
};
use crate::matching::MatchEngine;

fn scored() -> Vec<MatchResult> {
    let engine = MatchEngine::standard();
    let profile = engineering_profile();
    sample_offerings()
        .iter()
        .map(|offering| engine.score(&profile, offering))
        .collect()
}

fn ids(results: &[MatchResult]) -> Vec<&str> {
    results
        .iter()
        .map(|result| result.offering.offering_id.as_str())
        .collect()
}

fn records() -> Vec<OfferingRecord> {
    sample_offerings()
        .into_iter()
        .map(OfferingRecord::from)
        .collect()
}

#[test]
fn city_filter_is_case_insensitive_and_trimmed() {
    let criteria = FilterCriteria {
        city: CityFilter::Exact("  lahore ".to_string()),
        ..FilterCriteria::default()
    };
    let filters = criteria.active_filters(&engineering_profile());
    let (kept, dropped) = apply_filters(scored(), &filters);

    assert_eq!(ids(&kept), vec!["lums-bba", "kemu-mbbs"]);
    assert_eq!(dropped, 2);
}

#[test]
fn preferred_city_uses_profile_location() {
    let criteria = FilterCriteria {
        city: CityFilter::Preferred,
        ..FilterCriteria::default()
    };

    let mut profile = engineering_profile();
    assert!(criteria.active_filters(&profile).is_empty());

    profile.preferred_location = Some("Karachi".to_string());
    let (kept, _) = apply_filters(scored(), &criteria.active_filters(&profile));
    assert_eq!(ids(&kept), vec!["fast-se"]);
}

#[test]
fn program_type_matches_name_or_discipline() {
    let criteria = FilterCriteria {
        program_type: Some("Software".to_string()),
        ..FilterCriteria::default()
    };
    let (kept, _) = apply_filters(scored(), &criteria.active_filters(&engineering_profile()));
    assert_eq!(ids(&kept), vec!["fast-se"]);
}

#[test]
fn tri_state_flags_select_either_side() {
    let compatible_only = FilterCriteria {
        compatibility: FlagFilter::Only,
        ..FilterCriteria::default()
    };
    let ineligible_only = FilterCriteria {
        eligibility: FlagFilter::Exclude,
        ..FilterCriteria::default()
    };
    let profile = engineering_profile();

    let (compatible, _) = apply_filters(scored(), &compatible_only.active_filters(&profile));
    assert!(compatible.iter().all(|result| result.subject_compatible));
    assert!(!ids(&compatible).contains(&"kemu-mbbs"));

    let (ineligible, _) = apply_filters(scored(), &ineligible_only.active_filters(&profile));
    assert_eq!(ids(&ineligible), vec!["kemu-mbbs"]);
}

#[test]
fn open_on_keeps_offerings_without_deadline() {
    let engine = MatchEngine::standard();
    let profile = engineering_profile();
    let mut offerings = sample_offerings();
    offerings[0].application_deadline = NaiveDate::from_ymd_opt(2025, 6, 30);
    offerings[1].application_deadline = NaiveDate::from_ymd_opt(2025, 9, 30);
    let results = offerings
        .iter()
        .map(|offering| engine.score(&profile, offering))
        .collect::<Vec<_>>();

    let criteria = FilterCriteria {
        open_on: NaiveDate::from_ymd_opt(2025, 7, 15),
        ..FilterCriteria::default()
    };
    let (kept, _) = apply_filters(results, &criteria.active_filters(&profile));
    assert_eq!(ids(&kept), vec!["lums-bba", "kemu-mbbs", "fast-se"]);
}

#[test]
fn filter_order_does_not_change_the_result_set() {
    let criteria = FilterCriteria {
        max_fee: Some(900_000),
        min_match_score: Some(10.0),
        compatibility: FlagFilter::Only,
        ..FilterCriteria::default()
    };
    let filters = criteria.active_filters(&engineering_profile());
    let mut reversed = filters.clone();
    reversed.reverse();

    let (forward, _) = apply_filters(scored(), &filters);
    let (backward, _) = apply_filters(scored(), &reversed);
    assert_eq!(forward, backward);
}

#[test]
fn fee_sort_honours_direction() {
    let mut results = scored();
    sort_results(&mut results, SortOrder::new(SortKey::Fees, SortDirection::Asc));
    assert_eq!(
        ids(&results),
        vec!["kemu-mbbs", "fast-se", "nust-cs", "lums-bba"]
    );

    sort_results(&mut results, SortOrder::new(SortKey::Fees, SortDirection::Desc));
    assert_eq!(
        ids(&results),
        vec!["lums-bba", "nust-cs", "fast-se", "kemu-mbbs"]
    );
}

#[test]
fn min_score_sort_puts_eligible_first_in_both_directions() {
    for direction in [SortDirection::Asc, SortDirection::Desc] {
        let mut results = scored();
        sort_results(&mut results, SortOrder::new(SortKey::MinScore, direction));

        let first_ineligible = results
            .iter()
            .position(|result| !result.eligible)
            .expect("medicine is out of reach");
        assert!(results[first_ineligible..].iter().all(|result| !result.eligible));
        assert_eq!(ids(&results).last(), Some(&"kemu-mbbs"));
    }

    let mut results = scored();
    sort_results(&mut results, SortOrder::new(SortKey::MinScore, SortDirection::Asc));
    assert_eq!(
        ids(&results),
        vec!["fast-se", "lums-bba", "nust-cs", "kemu-mbbs"]
    );
}

#[test]
fn equal_scores_keep_input_order() {
    let engine = MatchEngine::standard();
    let profile = engineering_profile();
    let twins = vec![
        offering("first", "history"),
        offering("second", "history"),
        offering("third", "history"),
    ];
    let mut results = twins
        .iter()
        .map(|offering| engine.score(&profile, offering))
        .collect::<Vec<_>>();

    for key in [SortKey::Relevance, SortKey::Match, SortKey::Fees, SortKey::MinScore] {
        for direction in [SortDirection::Asc, SortDirection::Desc] {
            sort_results(&mut results, SortOrder::new(key, direction));
            assert_eq!(ids(&results), vec!["first", "second", "third"]);
        }
    }
}

#[test]
fn backend_sort_preserves_input_order() {
    let mut results = scored();
    let before = ids(&results)
        .into_iter()
        .map(str::to_string)
        .collect::<Vec<_>>();
    sort_results(&mut results, SortOrder::new(SortKey::Backend, SortDirection::Asc));
    assert_eq!(ids(&results), before);
}

#[test]
fn rank_skips_records_missing_a_fee_and_ranks_the_rest() {
    let engine = MatchEngine::standard();
    let mut raw = records();
    raw[1].annual_fee = None;

    let report = engine.rank(
        &engineering_profile(),
        &raw,
        &FilterCriteria::default(),
        SortOrder::default(),
    );

    assert_eq!(report.results.len(), 3);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].index, 1);
    assert_eq!(report.skipped[0].offering_id.as_deref(), Some("lums-bba"));
    assert_eq!(
        report.skipped[0].defect,
        OfferingDefect::MissingField {
            field: "annual_fee"
        }
    );
    assert!(!ids(&report.results).contains(&"lums-bba"));
}

#[test]
fn rank_orders_by_relevance_and_reports_filtered_count() {
    let engine = MatchEngine::standard();
    let criteria = FilterCriteria {
        compatibility: FlagFilter::Only,
        ..FilterCriteria::default()
    };

    let report = engine.rank(
        &engineering_profile(),
        &records(),
        &criteria,
        SortOrder::default(),
    );

    assert_eq!(ids(&report.results), vec!["nust-cs", "fast-se", "lums-bba"]);
    assert_eq!(report.filtered_out, 1);
    assert_eq!(report.total_considered(), 4);
    assert!(report.restriction.restricted_interests.is_empty());
}

#[test]
fn criteria_accept_form_field_names() {
    let criteria: FilterCriteria = serde_json::from_value(serde_json::json!({
        "location": "all",
        "programType": "engineering",
        "maxFees": 700000,
        "minMatch": 40,
        "subjectCompatibility": "compatible_only"
    }))
    .expect("criteria parse");

    assert_eq!(criteria.city, CityFilter::Any);
    assert_eq!(criteria.max_fee, Some(700_000));
    assert_eq!(criteria.min_match_score, Some(40.0));
    assert_eq!(criteria.compatibility, FlagFilter::Only);

    let order: SortOrder =
        serde_json::from_value(serde_json::json!({"sortBy": "minScore", "sortOrder": "asc"}))
            .expect("order parses");
    assert_eq!(order, SortOrder::new(SortKey::MinScore, SortDirection::Asc));
}
