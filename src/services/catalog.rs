use std::path::Path;

use crate::{
    error::AppResult,
    models::{movie::split_genres, CatalogEntry, CatalogRow},
};

/// In-memory movie catalog
///
/// Never empty: when no usable source exists the catalog holds a single
/// built-in entry.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Loads the catalog from a CSV file, falling back to the default entry
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            tracing::info!(path = %path.display(), "Catalog file not found, using default entry");
            return Self::default();
        }

        match read_csv(path) {
            Ok(entries) => {
                let catalog = Self::from_entries(entries);
                tracing::info!(path = %path.display(), size = catalog.len(), "Loaded catalog");
                catalog
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read catalog, using default entry");
                Self::default()
            }
        }
    }

    /// Builds a catalog from entries; an empty list yields the default entry
    pub fn from_entries(entries: Vec<CatalogEntry>) -> Self {
        if entries.is_empty() {
            return Self::default();
        }
        Self { entries }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&CatalogEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// False for every loaded catalog
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            entries: vec![CatalogEntry::new(
                1,
                "Toy Story (1995)",
                split_genres("Animation|Children|Comedy"),
            )],
        }
    }
}

fn read_csv(path: &Path) -> AppResult<Vec<CatalogEntry>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)?;

    let mut entries = Vec::new();
    for (line, record) in reader.deserialize::<CatalogRow>().enumerate() {
        match record {
            Ok(row) => entries.push(CatalogEntry::from(row)),
            Err(e) => {
                // +2: header line and 1-based numbering
                tracing::warn!(line = line + 2, error = %e, "Skipping malformed catalog row");
            }
        }
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_missing_file_uses_default() {
        let catalog = Catalog::load(Path::new("/nonexistent/movies.csv"));
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.entries()[0].title, "Toy Story (1995)");
        assert_eq!(catalog.entries()[0].genre_tags, vec!["Animation", "Children", "Comedy"]);
    }

    #[test]
    fn test_loads_rows() {
        let file = write_csv(
            "movieId,title,genres\n\
             1,Toy Story (1995),Adventure|Animation|Children|Comedy|Fantasy\n\
             2,Jumanji (1995),Adventure|Children|Fantasy\n\
             11,\"American President, The (1995)\",Comedy|Drama|Romance\n",
        );
        let catalog = Catalog::load(file.path());

        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.entries()[1].id, 2);
        assert_eq!(catalog.entries()[2].title, "American President, The (1995)");
        assert_eq!(catalog.entries()[2].genre_tags.len(), 3);
    }

    #[test]
    fn test_missing_values_become_empty() {
        let file = write_csv("movieId,title,genres\n5,,\n");
        let catalog = Catalog::load(file.path());

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.entries()[0].id, 5);
        assert_eq!(catalog.entries()[0].title, "");
        assert!(catalog.entries()[0].genre_tags.is_empty());
    }

    #[test]
    fn test_skips_malformed_rows() {
        let file = write_csv("movieId,title,genres\nabc,Broken,Drama\n3,Heat (1995),Action|Crime\n");
        let catalog = Catalog::load(file.path());

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.entries()[0].id, 3);
    }

    #[test]
    fn test_header_only_uses_default() {
        let file = write_csv("movieId,title,genres\n");
        let catalog = Catalog::load(file.path());

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.entries()[0].title, "Toy Story (1995)");
    }

    #[test]
    fn test_from_empty_entries_is_never_empty() {
        let catalog = Catalog::from_entries(vec![]);
        assert!(!catalog.is_empty());
    }
}
