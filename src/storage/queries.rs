use super::sqlite::Catalog;
use crate::model::{Episode, Season, Series};
use rusqlite::types::{Value, ValueRef};
use rusqlite::{params, OptionalExtension, Result, Row};
use std::path::{Path, PathBuf};
use tracing::info;

/// UTF-8 paths are stored as text. Anything else is stored as its raw
/// bytes so the catalog still points at the file on disk.
fn path_value(path: &Path) -> Value {
    match path.to_str() {
        Some(text) => Value::Text(text.to_string()),
        None => raw_path_value(path),
    }
}

#[cfg(unix)]
fn raw_path_value(path: &Path) -> Value {
    use std::os::unix::ffi::OsStrExt;
    Value::Blob(path.as_os_str().as_bytes().to_vec())
}

#[cfg(not(unix))]
fn raw_path_value(path: &Path) -> Value {
    Value::Text(path.to_string_lossy().into_owned())
}

fn path_column(row: &Row, idx: usize) -> Result<PathBuf> {
    if let ValueRef::Blob(bytes) = row.get_ref(idx)? {
        return Ok(path_from_bytes(bytes));
    }
    row.get::<_, String>(idx).map(PathBuf::from)
}

#[cfg(unix)]
fn path_from_bytes(bytes: &[u8]) -> PathBuf {
    use std::os::unix::ffi::OsStrExt;
    PathBuf::from(std::ffi::OsStr::from_bytes(bytes))
}

#[cfg(not(unix))]
fn path_from_bytes(bytes: &[u8]) -> PathBuf {
    PathBuf::from(String::from_utf8_lossy(bytes).into_owned())
}

fn series_from_row(row: &Row) -> Result<Series> {
    Ok(Series {
        id: row.get(0)?,
        name: row.get(1)?,
        path: path_column(row, 2)?,
        seasons: Vec::new(),
    })
}

fn season_from_row(row: &Row) -> Result<Season> {
    Ok(Season {
        id: row.get(0)?,
        series_id: row.get(1)?,
        name: row.get(2)?,
        path: path_column(row, 3)?,
        episodes: Vec::new(),
    })
}

fn episode_from_row(row: &Row) -> Result<Episode> {
    Ok(Episode {
        id: row.get(0)?,
        name: row.get(1)?,
        path: path_column(row, 2)?,
        series_id: row.get(3)?,
        season_id: row.get(4)?,
    })
}

impl Catalog {
    // ── Series ───────────────────────────────────────────────────

    /// Names are unique; inserting an existing name fails with a constraint error.
    pub fn insert_series(&self, name: &str, path: &Path) -> Result<Series> {
        self.connection().execute(
            "INSERT INTO series (name, path) VALUES (?1, ?2)",
            params![name, path_value(path)],
        )?;
        let id = self.connection().last_insert_rowid();
        info!("Cataloged series {} '{}'", id, name);

        Ok(Series {
            id,
            name: name.to_string(),
            path: path.to_path_buf(),
            seasons: Vec::new(),
        })
    }

    /// All series in insertion order.
    pub fn list_all_series(&self, include_seasons: bool) -> Result<Vec<Series>> {
        let mut stmt = self
            .connection()
            .prepare("SELECT id, name, path FROM series ORDER BY id")?;
        let mut series = stmt
            .query_map([], series_from_row)?
            .collect::<Result<Vec<_>>>()?;

        if include_seasons {
            for entry in series.iter_mut() {
                entry.seasons = self.list_seasons_for_series(entry.id, false)?;
            }
        }

        Ok(series)
    }

    pub fn get_series_by_name(&self, name: &str, include_seasons: bool) -> Result<Option<Series>> {
        let series = self
            .connection()
            .query_row(
                "SELECT id, name, path FROM series WHERE name = ?1",
                params![name],
                series_from_row,
            )
            .optional()?;

        match series {
            Some(mut series) if include_seasons => {
                series.seasons = self.list_seasons_for_series(series.id, false)?;
                Ok(Some(series))
            }
            other => Ok(other),
        }
    }

    // ── Season ───────────────────────────────────────────────────

    pub fn insert_season(&self, series_id: i64, name: &str, path: &Path) -> Result<Season> {
        self.connection().execute(
            "INSERT INTO season (series_id, name, path) VALUES (?1, ?2, ?3)",
            params![series_id, name, path_value(path)],
        )?;
        let id = self.connection().last_insert_rowid();
        info!("Cataloged season {} '{}' under series {}", id, name, series_id);

        Ok(Season {
            id,
            series_id,
            name: name.to_string(),
            path: path.to_path_buf(),
            episodes: Vec::new(),
        })
    }

    pub fn list_seasons_for_series(
        &self,
        series_id: i64,
        include_episodes: bool,
    ) -> Result<Vec<Season>> {
        let mut stmt = self.connection().prepare(
            "SELECT id, series_id, name, path FROM season WHERE series_id = ?1 ORDER BY id",
        )?;
        let mut seasons = stmt
            .query_map(params![series_id], season_from_row)?
            .collect::<Result<Vec<_>>>()?;

        if include_episodes {
            for season in seasons.iter_mut() {
                season.episodes = self.list_episodes_for_season(season.id)?;
            }
        }

        Ok(seasons)
    }

    // ── Episode ──────────────────────────────────────────────────

    pub fn insert_episode(
        &self,
        name: &str,
        path: &Path,
        series_id: Option<i64>,
        season_id: Option<i64>,
    ) -> Result<Episode> {
        self.connection().execute(
            "INSERT INTO episode (name, path, series_id, season_id) VALUES (?1, ?2, ?3, ?4)",
            params![name, path_value(path), series_id, season_id],
        )?;
        let id = self.connection().last_insert_rowid();

        Ok(Episode {
            id,
            name: name.to_string(),
            path: path.to_path_buf(),
            series_id,
            season_id,
        })
    }

    pub fn list_episodes_for_season(&self, season_id: i64) -> Result<Vec<Episode>> {
        let mut stmt = self.connection().prepare(
            "SELECT id, name, path, series_id, season_id FROM episode \
             WHERE season_id = ?1 ORDER BY id",
        )?;
        let episodes = stmt
            .query_map(params![season_id], episode_from_row)?
            .collect::<Result<Vec<_>>>()?;
        Ok(episodes)
    }

    /// Episodes filed directly under a series, outside any season.
    pub fn list_loose_episodes_for_series(&self, series_id: i64) -> Result<Vec<Episode>> {
        let mut stmt = self.connection().prepare(
            "SELECT id, name, path, series_id, season_id FROM episode \
             WHERE series_id = ?1 AND season_id IS NULL ORDER BY id",
        )?;
        let episodes = stmt
            .query_map(params![series_id], episode_from_row)?
            .collect::<Result<Vec<_>>>()?;
        Ok(episodes)
    }

    pub fn list_unclassified_episodes(&self) -> Result<Vec<Episode>> {
        let mut stmt = self.connection().prepare(
            "SELECT id, name, path, series_id, season_id FROM episode \
             WHERE series_id IS NULL ORDER BY id",
        )?;
        let episodes = stmt
            .query_map([], episode_from_row)?
            .collect::<Result<Vec<_>>>()?;
        Ok(episodes)
    }

    pub fn count_episodes(&self) -> Result<i64> {
        self.connection()
            .query_row("SELECT COUNT(*) FROM episode", [], |row| row.get(0))
    }

    pub fn count_unclassified_episodes(&self) -> Result<i64> {
        self.connection().query_row(
            "SELECT COUNT(*) FROM episode WHERE series_id IS NULL",
            [],
            |row| row.get(0),
        )
    }
}
