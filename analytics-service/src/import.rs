use std::io::Read;

use csv::StringRecord;
use reading_client::domain::{NewReading, OwnerId};

use crate::validation::{validate_reading, ReadingInput};

#[derive(thiserror::Error, Debug)]
pub enum ImportError {
    #[error("failed to read CSV headers: {0}")]
    Headers(#[from] csv::Error),
    #[error("missing column '{0}' in CSV header")]
    MissingColumn(&'static str),
    #[error("owner id must not be blank")]
    BlankOwner,
}

/// Owner id given on the command line. Blank ids are refused, as they are
/// over HTTP.
pub fn parse_owner(raw: &str) -> Result<OwnerId, ImportError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ImportError::BlankOwner);
    }
    Ok(OwnerId::new(trimmed))
}

/// Rows that passed validation, plus a count of those that did not.
#[derive(Debug, Default)]
pub struct ParsedRows {
    pub readings: Vec<NewReading>,
    pub rejected: usize,
}

struct Columns {
    date: usize,
    appliance_name: usize,
    units: usize,
    cost_per_unit: usize,
    total_cost: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Result<Self, ImportError> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        let require = |name: &'static str| find(name).ok_or(ImportError::MissingColumn(name));

        Ok(Self {
            date: require("date")?,
            appliance_name: require("appliance_name")?,
            units: require("units")?,
            cost_per_unit: require("cost_per_unit")?,
            total_cost: find("total_cost"),
        })
    }

    fn to_input(&self, record: &StringRecord) -> ReadingInput {
        let field = |idx: usize| record.get(idx).map(str::trim).filter(|s| !s.is_empty());

        ReadingInput {
            date: field(self.date).map(str::to_string),
            // Appliance names are grouping keys and are kept verbatim.
            appliance_name: record
                .get(self.appliance_name)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            units: field(self.units).and_then(|s| s.parse().ok()),
            cost_per_unit: field(self.cost_per_unit).and_then(|s| s.parse().ok()),
            total_cost: self.total_cost.and_then(field).and_then(|s| s.parse().ok()),
        }
    }
}

/// Parse a headered CSV of readings.
///
/// Expected header columns (by name):
/// - date (RFC 3339 timestamp or YYYY-MM-DD)
/// - appliance_name
/// - units
/// - cost_per_unit
/// - total_cost (optional)
///
/// Unreadable or invalid rows are logged and counted in `rejected`.
pub fn parse_csv<R: Read>(reader: R) -> Result<ParsedRows, ImportError> {
    let mut rdr = csv::Reader::from_reader(reader);
    let columns = Columns::from_headers(rdr.headers()?)?;
    let mut parsed = ParsedRows::default();

    for (idx, result) in rdr.records().enumerate() {
        // Header is line 1.
        let line = idx + 2;
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(line, error = %e, "skipping unreadable CSV row");
                parsed.rejected += 1;
                continue;
            }
        };

        match validate_reading(columns.to_input(&record)) {
            Ok(reading) => parsed.readings.push(reading),
            Err(e) => {
                tracing::warn!(line, error = %e, "skipping invalid CSV row");
                metrics::counter!("validation_reading_rejected_total").increment(1);
                parsed.rejected += 1;
            }
        }
    }

    Ok(parsed)
}
