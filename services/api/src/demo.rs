use crate::infra::{load_catalog, parse_date, parse_direction, parse_sort_key};
use chrono::NaiveDate;
use clap::Args;
use std::path::PathBuf;
use uni_finder::catalog::OfferingCatalog;
use uni_finder::config::AppConfig;
use uni_finder::error::AppError;
use uni_finder::matching::{
    AcademicTrack, CityFilter, Discipline, EligibilityRuleTable, FilterCriteria, FlagFilter,
    InterestPriorityInput, MatchEngine, MatchReport, ProfileSubmission, ProgramOffering,
    ScoreType, SortDirection, SortKey, SortOrder,
};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Only list the top N offerings per profile.
    #[arg(long, default_value_t = 5)]
    pub(crate) limit: usize,
    /// Include the per-factor explanation for every listed offering.
    #[arg(long)]
    pub(crate) explain: bool,
}

#[derive(Args, Debug)]
pub(crate) struct MatchArgs {
    /// Student profile JSON (same shape as the web form payload)
    #[arg(long)]
    pub(crate) profile: PathBuf,
    /// Offering catalog (.csv or .json); falls back to UNI_FINDER_CATALOG, then sample data
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
    /// Sort key: relevance, fees, match, min-score or backend
    #[arg(long, value_parser = parse_sort_key, default_value = "relevance")]
    pub(crate) sort: SortKey,
    /// Sort direction: asc or desc
    #[arg(long, value_parser = parse_direction, default_value = "desc")]
    pub(crate) direction: SortDirection,
    /// Keep offerings in this city only ("preferred" uses the profile's location)
    #[arg(long)]
    pub(crate) city: Option<String>,
    /// Keep programs whose name or discipline contains this text
    #[arg(long)]
    pub(crate) program_type: Option<String>,
    /// Maximum annual fee in PKR
    #[arg(long)]
    pub(crate) max_fee: Option<u64>,
    /// Minimum match score (0-100)
    #[arg(long)]
    pub(crate) min_score: Option<f32>,
    /// Keep programs open to the student's subject group only
    #[arg(long)]
    pub(crate) compatible_only: bool,
    /// Keep programs whose academic requirement the student meets only
    #[arg(long)]
    pub(crate) eligible_only: bool,
    /// Drop offerings whose application deadline is before this date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) open_on: Option<NaiveDate>,
    /// Only print the top N results
    #[arg(long)]
    pub(crate) limit: Option<usize>,
    /// Print the full report as JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct TracksArgs {
    /// Only print one track (slug or form label, e.g. "ICom (Commerce)")
    #[arg(long)]
    pub(crate) track: Option<String>,
}

pub(crate) fn run_match(args: MatchArgs) -> Result<(), AppError> {
    let raw = std::fs::read_to_string(&args.profile)?;
    let submission: ProfileSubmission = serde_json::from_str(&raw)?;
    let profile = submission.validate()?;

    let catalog_path = match args.catalog {
        Some(path) => Some(path),
        None => AppConfig::load()?.catalog.path,
    };
    let catalog = load_catalog(catalog_path.as_deref())?;

    let criteria = FilterCriteria {
        city: CityFilter::from(args.city),
        program_type: args.program_type,
        max_fee: args.max_fee,
        min_match_score: args.min_score,
        compatibility: if args.compatible_only {
            FlagFilter::Only
        } else {
            FlagFilter::All
        },
        eligibility: if args.eligible_only {
            FlagFilter::Only
        } else {
            FlagFilter::All
        },
        open_on: args.open_on,
    };

    let engine = MatchEngine::standard();
    let report = engine.rank(
        &profile,
        catalog.records(),
        &criteria,
        SortOrder::new(args.sort, args.direction),
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        render_report(&report, args.limit.unwrap_or(usize::MAX), false);
    }

    Ok(())
}

pub(crate) fn run_tracks(args: TracksArgs) -> Result<(), AppError> {
    let table = EligibilityRuleTable::standard();
    let views = match args.track.as_deref() {
        Some(raw) => match AcademicTrack::parse_label(raw) {
            Some(track) => vec![table.track_view(track)],
            None => table.track_views(),
        },
        None => table.track_views(),
    };

    for view in views {
        println!("{} ({}):", view.label, view.track.slug());
        let names = view
            .disciplines
            .iter()
            .map(Discipline::label)
            .collect::<Vec<_>>();
        println!("  {}", names.join(", "));
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let catalog = sample_catalog();
    let engine = MatchEngine::standard();

    println!("University program finder demo");
    println!("{} sample offerings loaded\n", catalog.len());

    for (title, submission) in sample_submissions() {
        let profile = submission.validate()?;
        let report = engine.rank(
            &profile,
            catalog.records(),
            &FilterCriteria::default(),
            SortOrder::default(),
        );

        println!(
            "== {title} | {} | best score {:.1}% | budget PKR {}",
            profile.track,
            profile.academic_score(),
            profile.budget
        );
        if !report.restriction.restricted_interests.is_empty() {
            let restricted = report
                .restriction
                .restricted_interests
                .iter()
                .map(Discipline::label)
                .collect::<Vec<_>>();
            println!(
                "   interests not open to this group: {}",
                restricted.join(", ")
            );
        }
        render_report(&report, args.limit, args.explain);
        println!();
    }

    Ok(())
}

fn render_report(report: &MatchReport, limit: usize, explain: bool) {
    for (rank, result) in report.results.iter().take(limit).enumerate() {
        let offering = &result.offering;
        println!(
            "{:>3}. {:>5.1}  {} @ {} ({}) | PKR {} | min {:.0}% | {}{}",
            rank + 1,
            result.match_score,
            offering.program_name,
            offering.university,
            offering.city,
            offering.annual_fee,
            offering.min_score_pct,
            if result.eligible { "eligible" } else { "not eligible" },
            if result.subject_compatible {
                ""
            } else {
                " | subject mismatch"
            },
        );
        if explain {
            for line in &result.explanation {
                println!("       - {line}");
            }
        }
    }

    if report.filtered_out > 0 {
        println!("   ({} offerings hidden by filters)", report.filtered_out);
    }
    for skipped in &report.skipped {
        println!("   warning: {skipped}");
    }
}

fn submission(
    ssc: f64,
    hsc: f64,
    group: &str,
    interests: &[&str],
    budget: f64,
    location: Option<&str>,
) -> ProfileSubmission {
    ProfileSubmission {
        ssc_percentage: Some(ssc),
        hsc_percentage: Some(hsc),
        hsc_group: Some(group.to_string()),
        qualification_type: Some("HSC/A-Level".to_string()),
        interest_priorities: interests
            .iter()
            .enumerate()
            .map(|(index, interest)| InterestPriorityInput {
                interest: interest.to_string(),
                priority: index as u32 + 1,
            })
            .collect(),
        interests: Vec::new(),
        budget: Some(budget),
        preferred_location: location.map(str::to_string),
    }
}

fn sample_submissions() -> Vec<(&'static str, ProfileSubmission)> {
    vec![
        (
            "Pre-engineering student aiming for computing",
            submission(
                75.0,
                80.0,
                "Pre-Engineering",
                &["Computer Science", "Business"],
                900_000.0,
                None,
            ),
        ),
        (
            "Pre-medical student in Lahore",
            submission(
                88.0,
                91.0,
                "Pre-Medical",
                &["Medicine", "Pharmacy", "Data Science"],
                1_200_000.0,
                Some("Lahore"),
            ),
        ),
        (
            "Commerce student curious about computing",
            submission(
                68.0,
                72.0,
                "ICom (Commerce)",
                &["Accounting", "Computer Science", "Medicine"],
                500_000.0,
                Some("Karachi"),
            ),
        ),
    ]
}

struct Sample {
    id: &'static str,
    program: &'static str,
    discipline: &'static str,
    university: &'static str,
    sector: &'static str,
    city: &'static str,
    fee: u64,
    min_score: f32,
    score_type: ScoreType,
    tags: &'static [&'static str],
}

const SAMPLES: &[Sample] = &[
    Sample {
        id: "nust-bscs-isb",
        program: "BS Computer Science",
        discipline: "computer-science",
        university: "National University of Sciences and Technology",
        sector: "public",
        city: "Islamabad",
        fee: 850_000,
        min_score: 70.0,
        score_type: ScoreType::Hsc,
        tags: &["computer-science", "programming", "technology"],
    },
    Sample {
        id: "fast-bsse-khi",
        program: "BS Software Engineering",
        discipline: "software-engineering",
        university: "FAST National University",
        sector: "private",
        city: "Karachi",
        fee: 620_000,
        min_score: 60.0,
        score_type: ScoreType::Aggregate,
        tags: &["engineering", "software", "computer-science"],
    },
    Sample {
        id: "uet-ee-lhr",
        program: "BSc Electrical Engineering",
        discipline: "engineering",
        university: "University of Engineering and Technology",
        sector: "public",
        city: "Lahore",
        fee: 180_000,
        min_score: 72.0,
        score_type: ScoreType::Hsc,
        tags: &["engineering", "electrical", "electronics"],
    },
    Sample {
        id: "kemu-mbbs-lhr",
        program: "MBBS",
        discipline: "medicine",
        university: "King Edward Medical University",
        sector: "public",
        city: "Lahore",
        fee: 150_000,
        min_score: 88.0,
        score_type: ScoreType::Hsc,
        tags: &["medicine", "medical", "doctor", "mbbs"],
    },
    Sample {
        id: "dow-pharmd-khi",
        program: "Doctor of Pharmacy",
        discipline: "pharmacy",
        university: "Dow University of Health Sciences",
        sector: "public",
        city: "Karachi",
        fee: 240_000,
        min_score: 70.0,
        score_type: ScoreType::Hsc,
        tags: &["pharmacy", "allied-health", "medicine"],
    },
    Sample {
        id: "lums-bsc-acf-lhr",
        program: "BSc Accounting and Finance",
        discipline: "accounting",
        university: "Lahore University of Management Sciences",
        sector: "private",
        city: "Lahore",
        fee: 1_150_000,
        min_score: 65.0,
        score_type: ScoreType::Aggregate,
        tags: &["accounting", "business", "finance"],
    },
    Sample {
        id: "iba-bba-khi",
        program: "BBA (Hons)",
        discipline: "business",
        university: "Institute of Business Administration",
        sector: "public",
        city: "Karachi",
        fee: 480_000,
        min_score: 60.0,
        score_type: ScoreType::Aggregate,
        tags: &["business", "management", "administration"],
    },
    Sample {
        id: "itu-ds-lhr",
        program: "BS Data Science",
        discipline: "data-science",
        university: "Information Technology University",
        sector: "public",
        city: "Lahore",
        fee: 390_000,
        min_score: 60.0,
        score_type: ScoreType::Aggregate,
        tags: &["data-science", "computer-science", "analytics"],
    },
    Sample {
        id: "gcu-history-lhr",
        program: "BS History",
        discipline: "history",
        university: "Government College University",
        sector: "public",
        city: "Lahore",
        fee: 95_000,
        min_score: 45.0,
        score_type: ScoreType::Aggregate,
        tags: &["history", "humanities", "arts"],
    },
];

pub(crate) fn sample_offerings() -> Vec<ProgramOffering> {
    SAMPLES
        .iter()
        .map(|sample| ProgramOffering {
            offering_id: sample.id.to_string(),
            program_id: None,
            program_name: sample.program.to_string(),
            discipline: Discipline::new(sample.discipline),
            university: sample.university.to_string(),
            sector: Some(sample.sector.to_string()),
            city: sample.city.to_string(),
            annual_fee: sample.fee,
            min_score_pct: sample.min_score,
            min_score_type: sample.score_type,
            required_groups: Vec::new(),
            accepted_boards: Vec::new(),
            tags: sample.tags.iter().map(|tag| tag.to_string()).collect(),
            application_deadline: None,
            hostel_available: None,
        })
        .collect()
}

pub(crate) fn sample_catalog() -> OfferingCatalog {
    OfferingCatalog::from_offerings(sample_offerings())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_offerings_are_all_valid() {
        let catalog = sample_catalog();
        assert_eq!(catalog.offerings().len(), SAMPLES.len());
        assert_eq!(catalog.stats().malformed, 0);
    }

    #[test]
    fn sample_profiles_validate() {
        for (title, submission) in sample_submissions() {
            assert!(submission.validate().is_ok(), "{title} should validate");
        }
    }

    #[test]
    fn pre_engineering_sample_ranks_computing_first() {
        let (_, submission) = sample_submissions().remove(0);
        let profile = submission.validate().expect("valid profile");
        let report = MatchEngine::standard().rank(
            &profile,
            sample_catalog().records(),
            &FilterCriteria::default(),
            SortOrder::new(SortKey::Relevance, SortDirection::Desc),
        );

        assert_eq!(report.results[0].offering.offering_id, "nust-bscs-isb");
        assert!(report.skipped.is_empty());
    }
}
