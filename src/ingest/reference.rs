use csv::ReaderBuilder;
use std::io::Read;
use std::path::PathBuf;

use crate::error::NicheError;
use crate::models::ReferenceIds;

/// Where the product-id checklist lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceLocation {
    Path(PathBuf),
    Url(String),
}

impl ReferenceLocation {
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        let lower = s.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Self::Url(s.to_string())
        } else {
            Self::Path(PathBuf::from(s))
        }
    }
}

impl std::fmt::Display for ReferenceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Path(p) => write!(f, "{}", p.display()),
            Self::Url(u) => write!(f, "{}", u),
        }
    }
}

/// Load the checklist CSV and collect the distinct values of `id_column`.
pub async fn load_reference_ids(
    location: &ReferenceLocation,
    id_column: &str,
) -> Result<ReferenceIds, NicheError> {
    let bytes = match location {
        ReferenceLocation::Path(path) => tokio::fs::read(path).await.map_err(|err| {
            NicheError::ReadFailure(format!(
                "unable to read checklist {}: {err}",
                path.display()
            ))
        })?,
        ReferenceLocation::Url(url) => fetch_checklist(url).await?,
    };
    let ids = parse_reference_csv(bytes.as_slice(), id_column)?;
    log::info!("Loaded {} reference ids from {}", ids.len(), location);
    Ok(ids)
}

async fn fetch_checklist(url: &str) -> Result<Vec<u8>, NicheError> {
    let client = reqwest::Client::new();
    log::info!("Fetching checklist: {}", url);
    let resp = client
        .get(url)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|err| NicheError::ReadFailure(format!("unable to fetch checklist {url}: {err}")))?;
    let body = resp
        .bytes()
        .await
        .map_err(|err| NicheError::ReadFailure(format!("unable to read checklist body: {err}")))?;
    Ok(body.to_vec())
}

/// Parse a headed CSV and return the non-empty values of `id_column`, verbatim and deduplicated.
pub fn parse_reference_csv<R: Read>(reader: R, id_column: &str) -> Result<ReferenceIds, NicheError> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = rdr
        .headers()
        .map_err(|err| NicheError::ReadFailure(format!("malformed checklist header: {err}")))?;
    let idx = headers
        .iter()
        .position(|h| h.trim_start_matches('\u{feff}') == id_column)
        .ok_or_else(|| {
            NicheError::ReadFailure(format!("checklist has no '{id_column}' column"))
        })?;

    let mut values = Vec::new();
    for (line, record) in rdr.records().enumerate() {
        let record = record.map_err(|err| {
            NicheError::ReadFailure(format!("malformed checklist row {}: {err}", line + 2))
        })?;
        if let Some(v) = record.get(idx) {
            values.push(v.to_string());
        }
    }
    Ok(ReferenceIds::new(values))
}
