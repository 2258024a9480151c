use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::{ConvertError, Result};

/// Lookup table from account-ID fragment to account display name, loaded
/// from a two-column CSV file.
///
/// Column 0 is a comma-separated list of fragments (quoted in the source
/// when it holds more than one), column 1 is the display name. Several
/// fragments mapping to the same name is the normal case.
#[derive(Debug, Default)]
pub struct AccountMap {
    names_by_fragment: HashMap<String, String>,
}

impl AccountMap {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ConvertError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::read(BufReader::new(file), path)
    }

    /// Parses the map from an already-open source. `origin` is only used to
    /// name the file in errors.
    pub fn read(source: impl Read, origin: &Path) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(source);

        let mut names_by_fragment = HashMap::new();
        for row in reader.records() {
            let row = row.map_err(|source| ConvertError::MapCsv {
                path: origin.to_path_buf(),
                source,
            })?;
            if row.len() != 2 {
                return Err(ConvertError::MapRowShape {
                    path: origin.to_path_buf(),
                    line: row.position().map(|p| p.line()).unwrap_or(0),
                    found: row.len(),
                });
            }
            let name = row[1].trim();
            for fragment in row[0].split(',') {
                // Last write wins for duplicate fragments.
                names_by_fragment.insert(fragment.trim().to_string(), name.to_string());
            }
        }

        Ok(Self { names_by_fragment })
    }

    pub fn get(&self, fragment: &str) -> Option<&str> {
        self.names_by_fragment.get(fragment).map(String::as_str)
    }

    /// Resolves a raw account ID of the form `<fragment>-<suffix...>`.
    /// Only the trimmed text before the first `-` is looked up. An ID
    /// without a `-` never resolves.
    pub fn resolve(&self, raw_account_id: &str) -> Option<&str> {
        let (fragment, _suffix) = raw_account_id.split_once('-')?;
        self.get(fragment.trim())
    }

    pub fn len(&self) -> usize {
        self.names_by_fragment.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names_by_fragment.is_empty()
    }
}
