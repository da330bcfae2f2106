//! File-based catalog source
//!
//! A data directory holds:
//! - `pokedex.csv`: one row per item, no header,
//!   `name,number,type1,type2,strength,ability1,ability2,hidden_ability`
//! - `<region>_national_dex_numbers.txt`: one catalog number per line

use crate::error::{CatalogError, Result};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use teamcover_domain::{Attribute, CatalogRecord, CatalogSource};
use tracing::{debug, info};

/// File name of the record list inside the data directory
pub const CATALOG_FILE: &str = "pokedex.csv";

/// Suffix of region membership files
pub const REGION_SUFFIX: &str = "_national_dex_numbers.txt";

/// Catalog stored as CSV and text files in one directory
#[derive(Debug, Clone)]
pub struct CsvCatalog {
    data_dir: PathBuf,
}

impl CsvCatalog {
    /// Create a source reading from `data_dir`
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
        }
    }

    /// The data directory
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Names of every region with a membership file, sorted
    pub fn regions(&self) -> Result<Vec<String>> {
        let entries = std::fs::read_dir(&self.data_dir).map_err(|source| CatalogError::Io {
            path: self.data_dir.clone(),
            source,
        })?;

        let mut regions = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| CatalogError::Io {
                path: self.data_dir.clone(),
                source,
            })?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if let Some(region) = name.strip_suffix(REGION_SUFFIX) {
                if !region.is_empty() {
                    regions.push(region.to_string());
                }
            }
        }
        regions.sort();
        Ok(regions)
    }

    fn parse_row(path: &Path, line: u64, row: &csv::StringRecord) -> Result<CatalogRecord> {
        let invalid = |reason: String| CatalogError::InvalidRecord {
            path: path.to_path_buf(),
            line,
            reason,
        };
        let field = |index: usize| row.get(index).unwrap_or("").trim();

        if row.len() < 5 {
            return Err(invalid(format!("expected at least 5 fields, found {}", row.len())));
        }

        let name = field(0);
        if name.is_empty() {
            return Err(invalid("empty name".to_string()));
        }
        let number = field(1)
            .parse::<u32>()
            .map_err(|e| invalid(format!("number '{}': {}", field(1), e)))?;
        let primary = Attribute::parse(field(2))
            .filter(|a| !a.is_none())
            .ok_or_else(|| invalid(format!("unknown first attribute '{}'", field(2))))?;
        let secondary = Attribute::parse(field(3))
            .ok_or_else(|| invalid(format!("unknown second attribute '{}'", field(3))))?;
        let strength = field(4)
            .parse::<u32>()
            .map_err(|e| invalid(format!("strength '{}': {}", field(4), e)))?;

        Ok(CatalogRecord {
            name: name.to_string(),
            number,
            primary,
            secondary,
            strength,
            ability1: field(5).to_string(),
            ability2: field(6).to_string(),
            hidden_ability: field(7).to_string(),
        })
    }
}

impl CatalogSource for CsvCatalog {
    type Error = CatalogError;

    fn load_records(&self) -> Result<Vec<CatalogRecord>> {
        let path = self.data_dir.join(CATALOG_FILE);
        if !path.is_file() {
            return Err(CatalogError::MissingData(path));
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&path)?;

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            let line = row.position().map(|p| p.line()).unwrap_or(0);
            if row.iter().all(|f| f.trim().is_empty()) {
                continue;
            }
            records.push(Self::parse_row(&path, line, &row)?);
        }

        info!(records = records.len(), path = %path.display(), "Loaded catalog");
        Ok(records)
    }

    fn region_numbers(&self, region: &str) -> Result<Option<BTreeSet<u32>>> {
        let path = self.data_dir.join(format!("{}{}", region, REGION_SUFFIX));
        if !path.is_file() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path).map_err(|source| CatalogError::Io {
            path: path.clone(),
            source,
        })?;

        let mut numbers = BTreeSet::new();
        for (index, line) in contents.lines().enumerate() {
            let line_text = line.trim();
            if line_text.is_empty() {
                continue;
            }
            let number = line_text
                .parse::<u32>()
                .map_err(|e| CatalogError::InvalidRecord {
                    path: path.clone(),
                    line: index as u64 + 1,
                    reason: format!("number '{}': {}", line_text, e),
                })?;
            numbers.insert(number);
        }

        debug!(region, numbers = numbers.len(), "Loaded region membership");
        Ok(Some(numbers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, contents: &str) {
        fs::write(dir.path().join(name), contents).unwrap();
    }

    #[test]
    fn test_load_records() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            CATALOG_FILE,
            "Bulbasaur,1,grass,poison,318,Overgrow,,Chlorophyll\n\
             Charmander,4,FIRE,NONE,309,Blaze,,Solar Power\n\
             Pikachu,25,electric,,320,Static,,Lightning Rod\n",
        );

        let records = CsvCatalog::new(dir.path()).load_records().unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].primary, Attribute::Grass);
        assert_eq!(records[0].secondary, Attribute::Poison);
        assert_eq!(records[0].ability2, "");
        assert_eq!(records[0].hidden_ability, "Chlorophyll");
        assert_eq!(records[1].secondary, Attribute::None);
        assert_eq!(records[2].secondary, Attribute::None);
        assert_eq!(records[2].strength, 320);
    }

    #[test]
    fn test_missing_catalog() {
        let dir = TempDir::new().unwrap();
        let result = CsvCatalog::new(dir.path()).load_records();
        assert!(matches!(result, Err(CatalogError::MissingData(_))));
    }

    #[test]
    fn test_invalid_attribute_reports_line() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            CATALOG_FILE,
            "Bulbasaur,1,grass,poison,318,Overgrow,,Chlorophyll\n\
             Missingno,0,bird,normal,0,,,\n",
        );

        let err = CsvCatalog::new(dir.path()).load_records().unwrap_err();
        match err {
            CatalogError::InvalidRecord { line, reason, .. } => {
                assert_eq!(line, 2);
                assert!(reason.contains("bird"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_region_numbers() {
        let dir = TempDir::new().unwrap();
        write(&dir, "kanto_national_dex_numbers.txt", "1\n4\n\n25\n");
        write(&dir, "johto_national_dex_numbers.txt", "152\n");
        write(&dir, "notes.txt", "ignored");

        let source = CsvCatalog::new(dir.path());
        let kanto = source.region_numbers("kanto").unwrap().unwrap();
        assert_eq!(kanto.into_iter().collect::<Vec<_>>(), vec![1, 4, 25]);
        assert!(source.region_numbers("sinnoh").unwrap().is_none());
        assert_eq!(source.regions().unwrap(), vec!["johto", "kanto"]);
    }

    #[test]
    fn test_region_bad_number() {
        let dir = TempDir::new().unwrap();
        write(&dir, "kanto_national_dex_numbers.txt", "1\nfour\n");
        let result = CsvCatalog::new(dir.path()).region_numbers("kanto");
        assert!(matches!(result, Err(CatalogError::InvalidRecord { line: 2, .. })));
    }
}
