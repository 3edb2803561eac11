//! Migrations compiled into the binary
//!
//! Keep in sync with `roomctl-server/migrations/`; the listing test below
//! fails when a file is added there but not here.

use super::file::MigrationFile;
use super::MigrationError;

macro_rules! embed {
    ($($name:literal),+ $(,)?) => {
        &[$(($name, include_str!(concat!("../../migrations/", $name)))),+]
    };
}

/// `(filename, sql)` pairs in application order.
pub static EMBEDDED_MIGRATIONS: &[(&str, &str)] = embed![
    "20240101000000_create_users.sql",
    "20240101000100_create_employees.sql",
    "20240101000200_create_bookings.sql",
    "20240101000300_create_equipment.sql",
    "20240101000400_create_rooms.sql",
];

/// Parse the embedded list, sorted by filename like a directory listing.
pub fn embedded_migrations() -> Result<Vec<MigrationFile>, MigrationError> {
    let mut files = EMBEDDED_MIGRATIONS
        .iter()
        .map(|&(name, sql)| MigrationFile::embedded(name, sql))
        .collect::<Result<Vec<_>, _>>()?;
    files.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrations::list_migration_files;
    use std::path::Path;

    #[tokio::test]
    async fn embedded_list_matches_shipped_directory() {
        let dir = Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/migrations"));
        let on_disk = list_migration_files(dir).await.unwrap();
        let embedded = embedded_migrations().unwrap();

        let disk_names: Vec<_> = on_disk.iter().map(|f| f.name.as_str()).collect();
        let embedded_names: Vec<_> = embedded.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(embedded_names, disk_names);

        for (disk, compiled) in on_disk.iter().zip(&embedded) {
            assert_eq!(
                disk.read_sql().await.unwrap(),
                compiled.read_sql().await.unwrap()
            );
        }
    }

    #[tokio::test]
    async fn embedded_files_have_no_path() {
        let file = &embedded_migrations().unwrap()[0];
        assert_eq!(file.version, "20240101000000");
        assert!(file.path().is_none());
        assert!(file.read_sql().await.unwrap().contains("CREATE TABLE"));
    }
}
