use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;
use uni_finder::catalog::OfferingCatalog;
use uni_finder::error::AppError;
use uni_finder::matching::{SortDirection, SortKey};

use crate::demo::sample_catalog;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Load the catalog at `path`, or the built-in sample offerings when none is configured.
pub(crate) fn load_catalog(path: Option<&Path>) -> Result<OfferingCatalog, AppError> {
    match path {
        Some(path) => Ok(OfferingCatalog::from_path(path)?),
        None => {
            let catalog = sample_catalog();
            info!(
                records = catalog.len(),
                "no catalog configured; using sample offerings"
            );
            Ok(catalog)
        }
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn parse_sort_key(raw: &str) -> Result<SortKey, String> {
    match raw.trim().to_ascii_lowercase().replace('_', "-").as_str() {
        "relevance" => Ok(SortKey::Relevance),
        "fees" | "fee" => Ok(SortKey::Fees),
        "match" | "match-score" => Ok(SortKey::Match),
        "min-score" | "minscore" => Ok(SortKey::MinScore),
        "backend" | "priority" => Ok(SortKey::Backend),
        other => Err(format!(
            "unknown sort key '{other}' (expected relevance, fees, match, min-score or backend)"
        )),
    }
}

pub(crate) fn parse_direction(raw: &str) -> Result<SortDirection, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "asc" | "ascending" => Ok(SortDirection::Asc),
        "desc" | "descending" => Ok(SortDirection::Desc),
        other => Err(format!("unknown sort direction '{other}' (expected asc or desc)")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_keys_accept_cli_spellings() {
        assert_eq!(parse_sort_key("min_score"), Ok(SortKey::MinScore));
        assert_eq!(parse_sort_key("Priority"), Ok(SortKey::Backend));
        assert!(parse_sort_key("popularity").is_err());
    }

    #[test]
    fn directions_parse() {
        assert_eq!(parse_direction("ASC"), Ok(SortDirection::Asc));
        assert!(parse_direction("sideways").is_err());
    }

    #[test]
    fn dates_parse_iso_format() {
        assert_eq!(
            parse_date(" 2025-08-31 "),
            Ok(NaiveDate::from_ymd_opt(2025, 8, 31).expect("valid date"))
        );
        assert!(parse_date("31/08/2025").is_err());
    }

    #[test]
    fn missing_catalog_path_uses_samples() {
        let catalog = load_catalog(None).expect("sample catalog");
        assert!(!catalog.is_empty());
    }
}
