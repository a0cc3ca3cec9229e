// Loads bins and items from headered CSV files
//
// Bins:  display_name (or id), volume (or volume_capacity), cost
// Items: display_name (or id), volume

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::domain::{Bin, Item, MAX_EXACT_QUANTITY};

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Cannot open {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed record in {origin}: {source}")]
    Csv { origin: String, source: csv::Error },

    #[error("Record {id} in {origin} exceeds {}", MAX_EXACT_QUANTITY)]
    OutOfRange { origin: String, id: String },
}

pub type Result<T> = std::result::Result<T, LoadError>;

trait Record: DeserializeOwned {
    fn id(&self) -> &str;
    fn is_exact(&self) -> bool;
}

impl Record for Bin {
    fn id(&self) -> &str {
        &self.id
    }

    fn is_exact(&self) -> bool {
        Bin::is_exact(self)
    }
}

impl Record for Item {
    fn id(&self) -> &str {
        &self.id
    }

    fn is_exact(&self) -> bool {
        Item::is_exact(self)
    }
}

fn read_records<T: Record, R: Read>(reader: R, origin: &str) -> Result<Vec<T>> {
    let records = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader)
        .deserialize()
        .collect::<std::result::Result<Vec<T>, _>>()
        .map_err(|source| LoadError::Csv {
            origin: origin.to_string(),
            source,
        })?;

    if let Some(record) = records.iter().find(|record| !record.is_exact()) {
        return Err(LoadError::OutOfRange {
            origin: origin.to_string(),
            id: record.id().to_string(),
        });
    }
    Ok(records)
}

fn load_records<T: Record>(path: &Path) -> Result<Vec<T>> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let records = read_records(file, &path.display().to_string())?;
    tracing::debug!(path = %path.display(), records = records.len(), "loaded csv");
    Ok(records)
}

pub fn read_bins<R: Read>(reader: R) -> Result<Vec<Bin>> {
    read_records(reader, "bins")
}

pub fn read_items<R: Read>(reader: R) -> Result<Vec<Item>> {
    read_records(reader, "items")
}

pub fn load_bins(path: impl AsRef<Path>) -> Result<Vec<Bin>> {
    load_records(path.as_ref())
}

pub fn load_items(path: impl AsRef<Path>) -> Result<Vec<Item>> {
    load_records(path.as_ref())
}
