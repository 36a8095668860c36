use std::io::Read;

use csv::StringRecord;
use serde_json::Value;

use super::normalizer::slugify;
use super::CatalogError;
use crate::matching::OfferingRecord;

const COLLECTION_KEYS: [&str; 3] = ["offerings", "matched_offerings", "programs"];

/// Parse a CSV export. Header names are normalized (`Annual Fee` reads as `annual_fee`);
/// rows that fail to decode become unreadable placeholders instead of aborting the file.
pub(crate) fn parse_csv<R: Read>(reader: R) -> Result<Vec<OfferingRecord>, CatalogError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader
        .headers()?
        .iter()
        .map(|header| slugify(header).replace('-', "_"))
        .collect::<StringRecord>();
    csv_reader.set_headers(headers);

    let mut records = Vec::new();
    for row in csv_reader.deserialize::<OfferingRecord>() {
        match row {
            Ok(record) => records.push(record),
            Err(error) => records.push(OfferingRecord::unreadable(error.to_string())),
        }
    }

    Ok(records)
}

/// Parse a JSON array of offerings, or an object wrapping one under a known key.
pub(crate) fn parse_json<R: Read>(reader: R) -> Result<Vec<OfferingRecord>, CatalogError> {
    let document: Value = serde_json::from_reader(reader)?;
    let items = match document {
        Value::Array(items) => items,
        Value::Object(mut object) => COLLECTION_KEYS
            .iter()
            .find_map(|key| match object.remove(*key) {
                Some(Value::Array(items)) => Some(items),
                _ => None,
            })
            .ok_or(CatalogError::UnexpectedShape)?,
        _ => return Err(CatalogError::UnexpectedShape),
    };

    Ok(records_from_values(items))
}

pub(crate) fn records_from_values(items: Vec<Value>) -> Vec<OfferingRecord> {
    items
        .into_iter()
        .map(|item| match item {
            Value::Object(_) => serde_json::from_value::<OfferingRecord>(item)
                .unwrap_or_else(|error| OfferingRecord::unreadable(error.to_string())),
            other => OfferingRecord::unreadable(format!("expected an object, found {other}")),
        })
        .collect()
}
