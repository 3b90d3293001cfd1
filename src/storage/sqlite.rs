use rusqlite::{ffi, Connection, Error, Result};
use std::path::Path;
use tracing::debug;

/// Must match the `user_version` that `schema.sql` sets.
pub const SCHEMA_VERSION: i64 = 1;

/// The series/season/episode store. One connection, opened once per run.
pub struct Catalog {
    conn: Connection,
}

impl Catalog {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path.as_ref())?;
        let catalog = Catalog { conn };
        catalog.configure_pragmas()?;
        catalog.migrate_schema()?;
        debug!("Catalog opened at {}", path.as_ref().display());
        Ok(catalog)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let catalog = Catalog { conn };
        catalog.configure_pragmas()?;
        catalog.migrate_schema()?;
        Ok(catalog)
    }

    fn configure_pragmas(&self) -> Result<()> {
        self.conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             PRAGMA synchronous = NORMAL;
             PRAGMA busy_timeout = 5000;",
        )?;
        Ok(())
    }

    fn migrate_schema(&self) -> Result<()> {
        let version: i64 = self
            .conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))?;

        if version == SCHEMA_VERSION {
            debug!("Catalog schema already at version {}", version);
            return Ok(());
        }
        if version > SCHEMA_VERSION {
            return Err(Error::SqliteFailure(
                ffi::Error::new(ffi::SQLITE_MISMATCH),
                Some(format!(
                    "catalog schema version {} is newer than supported version {}",
                    version, SCHEMA_VERSION
                )),
            ));
        }

        debug!("Creating catalog schema (version {} -> {})", version, SCHEMA_VERSION);
        self.conn.execute_batch(include_str!("schema.sql"))?;
        Ok(())
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Closes the connection, surfacing any error SQLite reports on the way out.
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, err)| err)?;
        debug!("Catalog closed");
        Ok(())
    }
}
