use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;

use super::MigrationError;

static FILENAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{14})_(.+)\.sql$").expect("valid regex"));

/// Where a migration's SQL lives
#[derive(Debug, Clone, PartialEq, Eq)]
enum Body {
    Disk(PathBuf),
    Embedded(&'static str),
}

/// One migration, either on disk or compiled in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationFile {
    /// Full filename, also the key in the `migrations` table
    pub name: String,
    /// 14-digit timestamp prefix
    pub version: String,
    pub description: String,
    body: Body,
}

impl MigrationFile {
    fn parse_name(filename: &str, body: Body) -> Result<Self, MigrationError> {
        let caps = FILENAME
            .captures(filename)
            .ok_or_else(|| MigrationError::InvalidFilename(filename.to_string()))?;

        Ok(Self {
            name: filename.to_string(),
            version: caps[1].to_string(),
            description: caps[2].to_string(),
            body,
        })
    }

    /// Parse `YYYYMMDDHHMMSS_description.sql` located in `dir`.
    pub fn parse(dir: &Path, filename: &str) -> Result<Self, MigrationError> {
        Self::parse_name(filename, Body::Disk(dir.join(filename)))
    }

    /// A migration whose SQL is compiled into the binary.
    pub fn embedded(filename: &str, sql: &'static str) -> Result<Self, MigrationError> {
        Self::parse_name(filename, Body::Embedded(sql))
    }

    /// File location, `None` for embedded migrations.
    pub fn path(&self) -> Option<&Path> {
        match &self.body {
            Body::Disk(path) => Some(path),
            Body::Embedded(_) => None,
        }
    }

    /// Read the SQL body.
    pub async fn read_sql(&self) -> Result<String, MigrationError> {
        match &self.body {
            Body::Embedded(sql) => Ok(sql.to_string()),
            Body::Disk(path) => {
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| MigrationError::Io {
                        path: path.clone(),
                        source,
                    })
            }
        }
    }
}

/// List `.sql` files in `dir`, sorted by filename.
///
/// A missing directory is [`MigrationError::MissingDirectory`]. Other files
/// are ignored; a `.sql` file with a malformed name fails the whole listing.
pub async fn list_migration_files(dir: &Path) -> Result<Vec<MigrationFile>, MigrationError> {
    let io_err = |source: std::io::Error| MigrationError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(MigrationError::MissingDirectory(dir.to_path_buf()));
        }
        Err(e) => return Err(io_err(e)),
    };

    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(io_err)? {
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.ends_with(".sql") {
            names.push(name);
        }
    }
    names.sort();

    names
        .iter()
        .map(|name| MigrationFile::parse(dir, name))
        .collect()
}
