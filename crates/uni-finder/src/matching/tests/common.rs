use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::catalog::OfferingCatalog;
use crate::matching::domain::{
    AcademicTrack, Discipline, ProgramOffering, QualificationKind, ScoreType, StudentProfile,
};
use crate::matching::priority::InterestList;
use crate::matching::{MatchEngine, ProgramMatchService};

pub(super) fn interests(ranked: &[&str]) -> InterestList {
    InterestList::from_ranked(
        ranked
            .iter()
            .enumerate()
            .map(|(index, name)| (Discipline::new(name), index as u32 + 1)),
    )
    .expect("valid ranking")
}

/// Pre-engineering student, 75/80, ranking computer science over business.
pub(super) fn engineering_profile() -> StudentProfile {
    StudentProfile {
        ssc_percentage: 75.0,
        hsc_percentage: 80.0,
        track: AcademicTrack::PreEngineering,
        qualification: QualificationKind::HigherSecondary,
        interests: interests(&["computer-science", "business"]),
        budget: 900_000,
        preferred_location: None,
    }
}

pub(super) fn commerce_profile() -> StudentProfile {
    StudentProfile {
        ssc_percentage: 68.0,
        hsc_percentage: 72.0,
        track: AcademicTrack::Commerce,
        qualification: QualificationKind::HigherSecondary,
        interests: interests(&["commerce", "computer-science"]),
        budget: 500_000,
        preferred_location: Some("Lahore".to_string()),
    }
}

pub(super) fn offering(id: &str, discipline: &str) -> ProgramOffering {
    ProgramOffering {
        offering_id: id.to_string(),
        program_id: Some(format!("program-{discipline}")),
        program_name: format!("BS {}", Discipline::new(discipline).label()),
        discipline: Discipline::new(discipline),
        university: "NUST".to_string(),
        sector: Some("public".to_string()),
        city: "Islamabad".to_string(),
        annual_fee: 850_000,
        min_score_pct: 70.0,
        min_score_type: ScoreType::Aggregate,
        required_groups: Vec::new(),
        accepted_boards: Vec::new(),
        tags: Vec::new(),
        application_deadline: None,
        hostel_available: None,
    }
}

pub(super) fn with(
    mut offering: ProgramOffering,
    update: impl FnOnce(&mut ProgramOffering),
) -> ProgramOffering {
    update(&mut offering);
    offering
}

pub(super) fn sample_offerings() -> Vec<ProgramOffering> {
    vec![
        offering("nust-cs", "computer-science"),
        with(offering("lums-bba", "business"), |o| {
            o.university = "LUMS".to_string();
            o.city = "Lahore".to_string();
            o.annual_fee = 1_100_000;
            o.min_score_pct = 65.0;
        }),
        with(offering("kemu-mbbs", "medicine"), |o| {
            o.university = "KEMU".to_string();
            o.city = "Lahore".to_string();
            o.annual_fee = 150_000;
            o.min_score_pct = 88.0;
            o.tags = vec!["MBBS".to_string()];
        }),
        with(offering("fast-se", "software-engineering"), |o| {
            o.university = "FAST".to_string();
            o.city = "Karachi".to_string();
            o.annual_fee = 600_000;
            o.min_score_pct = 60.0;
            o.tags = vec!["software".to_string(), "programming".to_string()];
        }),
    ]
}

pub(super) fn service() -> ProgramMatchService {
    ProgramMatchService::new(
        Arc::new(MatchEngine::standard()),
        Arc::new(OfferingCatalog::from_offerings(sample_offerings())),
    )
}

pub(super) fn submission_json() -> Value {
    serde_json::json!({
        "sscPercentage": "75",
        "hscPercentage": "80",
        "hscGroup": "Pre-Engineering",
        "qualificationType": "HSC/A-Level",
        "interestPriorities": [
            {"interest": "Computer Science", "priority": 1},
            {"interest": "Business", "priority": 2}
        ],
        "budget": "900000",
        "preferredLocation": ""
    })
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
