//! Offering catalog: loads raw offering records from CSV or JSON exports and answers
//! catalog-level queries (counts, program search).
//!
//! Records are kept raw so malformed rows are reported by every match run instead of
//! disappearing at load time.

pub(crate) mod fields;
pub(crate) mod normalizer;
mod parser;

use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::matching::{OfferingRecord, ProgramOffering};
use normalizer::slugify;

#[derive(Debug)]
pub enum CatalogError {
    Io(std::io::Error),
    Csv(csv::Error),
    Json(serde_json::Error),
    UnsupportedFormat(String),
    UnexpectedShape,
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::Io(err) => write!(f, "failed to read offering catalog: {}", err),
            CatalogError::Csv(err) => write!(f, "invalid offering CSV data: {}", err),
            CatalogError::Json(err) => write!(f, "invalid offering JSON data: {}", err),
            CatalogError::UnsupportedFormat(extension) => write!(
                f,
                "unsupported catalog format `{}` (expected .csv or .json)",
                extension
            ),
            CatalogError::UnexpectedShape => write!(
                f,
                "offering JSON must be an array or an object with an `offerings` array"
            ),
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogError::Io(err) => Some(err),
            CatalogError::Csv(err) => Some(err),
            CatalogError::Json(err) => Some(err),
            CatalogError::UnsupportedFormat(_) | CatalogError::UnexpectedShape => None,
        }
    }
}

impl From<std::io::Error> for CatalogError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for CatalogError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFormat {
    Csv,
    Json,
}

impl CatalogFormat {
    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let extension = path
            .extension()
            .and_then(|value| value.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            _ => Err(CatalogError::UnsupportedFormat(extension)),
        }
    }
}

/// In-memory, read-only list of offering records in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OfferingCatalog {
    records: Vec<OfferingRecord>,
}

impl OfferingCatalog {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let format = CatalogFormat::from_path(path)?;
        let file = std::fs::File::open(path)?;
        let catalog = Self::from_reader(file, format)?;
        info!(
            path = %path.display(),
            records = catalog.len(),
            "loaded offering catalog"
        );
        Ok(catalog)
    }

    pub fn from_reader<R: Read>(reader: R, format: CatalogFormat) -> Result<Self, CatalogError> {
        let records = match format {
            CatalogFormat::Csv => parser::parse_csv(reader)?,
            CatalogFormat::Json => parser::parse_json(reader)?,
        };
        Ok(Self::from_records(records))
    }

    pub fn from_records(records: Vec<OfferingRecord>) -> Self {
        Self { records }
    }

    pub fn from_offerings(offerings: Vec<ProgramOffering>) -> Self {
        Self::from_records(offerings.into_iter().map(OfferingRecord::from).collect())
    }

    /// Build from loose JSON values; entries that are not offering objects stay in place
    /// as unreadable records.
    pub fn from_json_values(values: Vec<Value>) -> Self {
        Self::from_records(parser::records_from_values(values))
    }

    pub fn records(&self) -> &[OfferingRecord] {
        &self.records
    }

    /// Valid offerings only, in source order.
    pub fn offerings(&self) -> Vec<ProgramOffering> {
        self.records
            .iter()
            .enumerate()
            .filter_map(|(index, record)| record.validate(index).ok())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn stats(&self) -> CatalogStats {
        let offerings = self.offerings();
        let distinct = |key: fn(&ProgramOffering) -> String| {
            offerings.iter().map(key).collect::<BTreeSet<_>>().len()
        };

        CatalogStats {
            offerings: offerings.len(),
            programs: distinct(program_key),
            universities: distinct(|offering| offering.university.to_lowercase()),
            cities: distinct(|offering| offering.city.to_lowercase()),
            disciplines: distinct(|offering| offering.discipline.as_str().to_string()),
            malformed: self.records.len() - offerings.len(),
        }
    }

    /// Programs whose name or discipline contains `query` (case-insensitive), grouped across
    /// campuses and ordered by name. A blank query matches nothing.
    pub fn search(&self, query: &str) -> Vec<ProgramSummary> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        summarize_programs(self.offerings().into_iter().filter(|offering| {
            offering.program_name.to_lowercase().contains(&needle)
                || offering.discipline.as_str().contains(&needle)
                || offering.discipline.label().to_lowercase().contains(&needle)
        }))
    }

    /// Every program in the catalog, ordered by name.
    pub fn programs(&self) -> Vec<ProgramSummary> {
        summarize_programs(self.offerings())
    }

    /// One program with every campus offering it. `id` is the program id, or the slug of the
    /// program name for records without one.
    pub fn program(&self, id: &str) -> Option<ProgramDetail> {
        let key = id.trim();
        let offerings = self
            .offerings()
            .into_iter()
            .filter(|offering| program_key(offering) == key)
            .collect::<Vec<_>>();
        let summary = summarize_programs(offerings.iter().cloned()).into_iter().next()?;

        Some(ProgramDetail { summary, offerings })
    }

    /// Universities with campus and offering counts, ordered by name.
    pub fn universities(&self) -> Vec<UniversitySummary> {
        let mut grouped: BTreeMap<String, UniversitySummary> = BTreeMap::new();
        for offering in self.offerings() {
            let summary = grouped
                .entry(university_key(&offering.university))
                .or_insert_with(|| UniversitySummary::new(&offering));
            summary.absorb(&offering);
        }

        grouped.into_values().collect()
    }

    /// One university, looked up by name or name slug, with all of its offerings.
    pub fn university(&self, name: &str) -> Option<UniversityDetail> {
        let key = university_key(name);
        if key.is_empty() {
            return None;
        }

        let offerings = self
            .offerings()
            .into_iter()
            .filter(|offering| university_key(&offering.university) == key)
            .collect::<Vec<_>>();
        let mut summary = UniversitySummary::new(offerings.first()?);
        for offering in &offerings {
            summary.absorb(offering);
        }

        Some(UniversityDetail { summary, offerings })
    }
}

fn summarize_programs<I>(offerings: I) -> Vec<ProgramSummary>
where
    I: IntoIterator<Item = ProgramOffering>,
{
    let mut grouped: BTreeMap<(String, String), (ProgramSummary, f32)> = BTreeMap::new();
    for offering in offerings {
        let key = (offering.program_name.to_lowercase(), program_key(&offering));
        let (summary, score_total) = grouped.entry(key).or_insert_with(|| {
            (
                ProgramSummary {
                    program_id: program_key(&offering),
                    program_name: offering.program_name.clone(),
                    discipline: offering.discipline.as_str().to_string(),
                    offering_count: 0,
                    min_fee: offering.annual_fee,
                    max_fee: offering.annual_fee,
                    avg_min_score: 0.0,
                },
                0.0,
            )
        });
        summary.offering_count += 1;
        summary.min_fee = summary.min_fee.min(offering.annual_fee);
        summary.max_fee = summary.max_fee.max(offering.annual_fee);
        *score_total += offering.min_score_pct;
    }

    grouped
        .into_values()
        .map(|(mut summary, score_total)| {
            let average = score_total / summary.offering_count as f32;
            summary.avg_min_score = (average * 10.0).round() / 10.0;
            summary
        })
        .collect()
}

fn program_key(offering: &ProgramOffering) -> String {
    offering
        .program_id
        .clone()
        .unwrap_or_else(|| slugify(&offering.program_name))
}

fn university_key(name: &str) -> String {
    slugify(name)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub offerings: usize,
    pub programs: usize,
    pub universities: usize,
    pub cities: usize,
    pub disciplines: usize,
    pub malformed: usize,
}

/// One program across all campuses offering it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgramSummary {
    pub program_id: String,
    pub program_name: String,
    pub discipline: String,
    pub offering_count: usize,
    pub min_fee: u64,
    pub max_fee: u64,
    pub avg_min_score: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgramDetail {
    #[serde(flatten)]
    pub summary: ProgramSummary,
    pub offerings: Vec<ProgramOffering>,
}

/// One university across its campuses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UniversitySummary {
    pub university_id: String,
    pub name: String,
    pub sector: Option<String>,
    pub cities: Vec<String>,
    pub offering_count: usize,
    pub program_count: usize,
    #[serde(skip)]
    program_keys: BTreeSet<String>,
}

impl UniversitySummary {
    fn new(offering: &ProgramOffering) -> Self {
        Self {
            university_id: university_key(&offering.university),
            name: offering.university.clone(),
            sector: offering.sector.clone(),
            cities: Vec::new(),
            offering_count: 0,
            program_count: 0,
            program_keys: BTreeSet::new(),
        }
    }

    fn absorb(&mut self, offering: &ProgramOffering) {
        self.offering_count += 1;
        if self.sector.is_none() {
            self.sector = offering.sector.clone();
        }
        if !self
            .cities
            .iter()
            .any(|city| city.eq_ignore_ascii_case(&offering.city))
        {
            self.cities.push(offering.city.clone());
        }
        self.program_keys.insert(program_key(offering));
        self.program_count = self.program_keys.len();
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UniversityDetail {
    #[serde(flatten)]
    pub summary: UniversitySummary,
    pub offerings: Vec<ProgramOffering>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const CSV: &str = "\
Offering ID,Program ID,Program Name,Discipline,University,City,Annual Fee,Min Score Pct,Tags
1,bscs,BS Computer Science,Computer Science,NUST,Islamabad,850000,70,software;programming
2,bscs,BS Computer Science,Computer Science,FAST,Lahore,\"780,000\",65,software
3,bba,BBA,Business,IBA,Karachi,,60,business
";

    #[test]
    fn csv_headers_are_normalized_and_rows_kept_in_order() {
        let catalog =
            OfferingCatalog::from_reader(Cursor::new(CSV), CatalogFormat::Csv).expect("parses");

        assert_eq!(catalog.len(), 3);
        let offerings = catalog.offerings();
        assert_eq!(offerings.len(), 2);
        assert_eq!(offerings[1].annual_fee, 780_000);
        assert_eq!(offerings[0].tags, vec!["software", "programming"]);
    }

    #[test]
    fn stats_count_distinct_values_and_malformed_rows() {
        let catalog =
            OfferingCatalog::from_reader(Cursor::new(CSV), CatalogFormat::Csv).expect("parses");
        let stats = catalog.stats();

        assert_eq!(stats.offerings, 2);
        assert_eq!(stats.programs, 1);
        assert_eq!(stats.universities, 2);
        assert_eq!(stats.cities, 2);
        assert_eq!(stats.malformed, 1);
    }

    #[test]
    fn search_groups_campuses_with_fee_range() {
        let catalog =
            OfferingCatalog::from_reader(Cursor::new(CSV), CatalogFormat::Csv).expect("parses");
        let found = catalog.search("computer");

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].offering_count, 2);
        assert_eq!(found[0].min_fee, 780_000);
        assert_eq!(found[0].max_fee, 850_000);
        assert!(catalog.search("   ").is_empty());
    }

    #[test]
    fn program_lookup_collects_every_campus() {
        let catalog =
            OfferingCatalog::from_reader(Cursor::new(CSV), CatalogFormat::Csv).expect("parses");

        let detail = catalog.program("bscs").expect("program exists");
        assert_eq!(detail.summary.offering_count, 2);
        assert_eq!(detail.summary.avg_min_score, 67.5);
        assert_eq!(detail.offerings.len(), 2);
        assert!(catalog.program("bba").is_none());
        assert_eq!(catalog.programs().len(), 1);
    }

    #[test]
    fn universities_group_offerings_by_name() {
        let catalog =
            OfferingCatalog::from_reader(Cursor::new(CSV), CatalogFormat::Csv).expect("parses");

        let universities = catalog.universities();
        let names = universities
            .iter()
            .map(|university| university.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["FAST", "NUST"]);

        let nust = catalog.university("Nust").expect("university exists");
        assert_eq!(nust.summary.cities, vec!["Islamabad"]);
        assert_eq!(nust.summary.program_count, 1);
        assert!(catalog.university("  ").is_none());
    }

    #[test]
    fn json_accepts_wrapped_arrays_and_keeps_bad_entries() {
        let json = r#"{"matched_offerings": [
            {"id": 1, "name": "MBBS", "discipline": "Medicine", "city": "Lahore",
             "annual_fees": 1200000, "min_score_pct": 85},
            "not an offering"
        ]}"#;
        let catalog =
            OfferingCatalog::from_reader(Cursor::new(json), CatalogFormat::Json).expect("parses");

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.offerings().len(), 1);
    }

    #[test]
    fn json_scalar_document_is_rejected() {
        let error = OfferingCatalog::from_reader(Cursor::new("42"), CatalogFormat::Json)
            .expect_err("scalar is not a catalog");
        assert!(matches!(error, CatalogError::UnexpectedShape));
    }

    #[test]
    fn unknown_extension_is_unsupported() {
        let error = CatalogFormat::from_path(Path::new("offerings.xlsx")).expect_err("xlsx");
        assert!(matches!(error, CatalogError::UnsupportedFormat(ext) if ext == "xlsx"));
    }
}
