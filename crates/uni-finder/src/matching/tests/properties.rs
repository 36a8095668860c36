use proptest::prelude::*;

use super::common::*;
use crate::matching::domain::{AcademicTrack, Discipline};
use crate::matching::pipeline::{sort_results, SortDirection, SortKey, SortOrder};
use crate::matching::priority::{InterestList, MoveDirection};
use crate::matching::{EligibilityRuleTable, MatchEngine};

const POOL: [&str; 8] = [
    "medicine",
    "computer-science",
    "business",
    "history",
    "law",
    "nursing",
    "data-science",
    "finance",
];

#[derive(Debug, Clone)]
enum Edit {
    Add(usize),
    Remove(usize),
    Move(usize, bool),
}

fn edit() -> impl Strategy<Value = Edit> {
    prop_oneof![
        (0..POOL.len()).prop_map(Edit::Add),
        (0..POOL.len()).prop_map(Edit::Remove),
        (0..POOL.len(), any::<bool>()).prop_map(|(index, up)| Edit::Move(index, up)),
    ]
}

fn track() -> impl Strategy<Value = AcademicTrack> {
    prop::sample::select(AcademicTrack::ordered().to_vec())
}

proptest! {
    #[test]
    fn priorities_stay_contiguous_after_any_edits(edits in prop::collection::vec(edit(), 0..40)) {
        let mut list = InterestList::default();
        for edit in edits {
            // Errors (duplicates, missing entries) must leave the list untouched.
            let _ = match edit {
                Edit::Add(index) => list.add_interest(Discipline::new(POOL[index])).map(|_| ()),
                Edit::Remove(index) => list.remove_interest(&Discipline::new(POOL[index])),
                Edit::Move(index, up) => {
                    let direction = if up { MoveDirection::Up } else { MoveDirection::Down };
                    list.move_interest(&Discipline::new(POOL[index]), direction)
                }
            };
            prop_assert!(list.is_contiguous());
        }
    }

    #[test]
    fn every_track_is_allowed_something(track in track()) {
        let table = EligibilityRuleTable::standard();
        prop_assert!(!table.allowed_disciplines(track).is_empty());
    }

    #[test]
    fn scores_stay_in_range_and_repeat(
        track in track(),
        ssc in 0.0f32..=100.0,
        hsc in 0.0f32..=100.0,
        budget in 0u64..3_000_000,
        index in 0usize..4,
    ) {
        let engine = MatchEngine::standard();
        let mut profile = engineering_profile();
        profile.track = track;
        profile.ssc_percentage = ssc;
        profile.hsc_percentage = hsc;
        profile.budget = budget;
        let target = &sample_offerings()[index];

        let first = engine.score(&profile, target);
        prop_assert!((0.0..=100.0).contains(&first.match_score));
        prop_assert_eq!(first, engine.score(&profile, target));
    }

    #[test]
    fn eligibility_and_compatibility_always_raise_the_score(
        track in track(),
        best in 0.0f32..=100.0,
        budget in 0u64..3_000_000,
        preferred in any::<bool>(),
    ) {
        let engine = MatchEngine::standard();
        let mut profile = commerce_profile();
        profile.track = track;
        profile.ssc_percentage = best;
        profile.hsc_percentage = best;
        profile.budget = budget;
        profile.interests = interests(&[]);
        if !preferred {
            profile.preferred_location = None;
        }

        let allowed = engine.rules().allowed_disciplines(track)[0].clone();
        let compatible = with(offering("a", allowed.as_str()), |o| o.min_score_pct = 101.0);
        let incompatible = with(offering("b", "zoology"), |o| o.min_score_pct = 101.0);
        prop_assert!(
            engine.score(&profile, &compatible).match_score
                > engine.score(&profile, &incompatible).match_score
        );

        let eligible = with(offering("c", "zoology"), |o| o.min_score_pct = 0.0);
        prop_assert!(
            engine.score(&profile, &eligible).match_score
                > engine.score(&profile, &incompatible).match_score
        );
    }

    #[test]
    fn min_score_sort_never_puts_ineligible_first(
        ssc in 0.0f32..=100.0,
        ascending in any::<bool>(),
    ) {
        let engine = MatchEngine::standard();
        let mut profile = engineering_profile();
        profile.ssc_percentage = ssc;
        profile.hsc_percentage = 0.0;
        let mut results = sample_offerings()
            .iter()
            .map(|offering| engine.score(&profile, offering))
            .collect::<Vec<_>>();

        let direction = if ascending { SortDirection::Asc } else { SortDirection::Desc };
        sort_results(&mut results, SortOrder::new(SortKey::MinScore, direction));

        let flags = results.iter().map(|result| result.eligible).collect::<Vec<_>>();
        let mut expected = flags.clone();
        expected.sort_by(|a, b| b.cmp(a));
        prop_assert_eq!(flags, expected);
    }
}
