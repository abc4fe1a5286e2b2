use _model::{first_line, subregion, Region, StoreRecord};
use thiserror::Error;

use super::driver::RawEntry;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("entry has no {0}")]
    Missing(&'static str),

    #[error("invalid {field}: {value:?}")]
    InvalidCoordinate { field: &'static str, value: String },
}

/// Turns one listed entry into a record for `region`.
///
/// The region always comes from the selection that produced the entry,
/// never from the address text. Entries without both coordinates yield
/// `Ok(None)`.
pub fn extract(entry: &RawEntry, region: Region) -> Result<Option<StoreRecord>, ExtractionError> {
    let (latitude, longitude) = match (
        present(&entry.latitude),
        present(&entry.longitude),
    ) {
        (Some(lat), Some(lng)) => (lat, lng),
        _ => return Ok(None),
    };
    coordinate("latitude", latitude)?;
    coordinate("longitude", longitude)?;

    let name = entry.name.as_deref().ok_or(ExtractionError::Missing("name"))?;
    let text = entry
        .address_text
        .as_deref()
        .ok_or(ExtractionError::Missing("address"))?;
    let address = first_line(text);

    Ok(Some(StoreRecord {
        name: name.to_string(),
        latitude: latitude.to_string(),
        longitude: longitude.to_string(),
        address: address.to_string(),
        region,
        subregion: subregion(address, region),
    }))
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|x| !x.trim().is_empty())
}

fn coordinate(field: &'static str, value: &str) -> Result<(), ExtractionError> {
    match value.trim().parse::<f64>() {
        Ok(x) if x.is_finite() => Ok(()),
        _ => Err(ExtractionError::InvalidCoordinate {
            field,
            value: value.to_string(),
        }),
    }
}
