use crate::model::{Season, Series};
use crate::utils::path;
use std::ffi::{OsStr, OsString};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const UNCLASSIFIED_DIR_NAME: &str = "unclassified";
const DUPLICATE_MARKER: &str = " - DUP_";

/// Computes where things belong inside the library and moves files there.
#[derive(Debug, Clone)]
pub struct FileMover {
    library_root: PathBuf,
    unclassified_path: PathBuf,
}

impl FileMover {
    pub fn new<P: Into<PathBuf>>(library_root: P) -> Self {
        let library_root = library_root.into();
        let unclassified_path = library_root.join(UNCLASSIFIED_DIR_NAME);
        Self {
            library_root,
            unclassified_path,
        }
    }

    /// Creates the library root and its unclassified directory if missing.
    pub fn init(&self) -> io::Result<()> {
        path::create_directory(&self.library_root)?;
        path::create_directory(&self.unclassified_path)?;
        debug!("Library ready at {}", self.library_root.display());
        Ok(())
    }

    pub fn library_root(&self) -> &Path {
        &self.library_root
    }

    pub fn create_series_path(&self, series_name: &str) -> PathBuf {
        self.library_root.join(series_name)
    }

    pub fn create_season_path(&self, season_name: &str, series: &Series) -> PathBuf {
        self.create_series_path(&series.name).join(season_name)
    }

    pub fn create_episode_path_in_season(
        &self,
        series: &Series,
        season: &Season,
        file_name: impl AsRef<OsStr>,
    ) -> PathBuf {
        self.create_season_path(&season.name, series).join(file_name.as_ref())
    }

    pub fn create_episode_path_in_series(
        &self,
        series: &Series,
        file_name: impl AsRef<OsStr>,
    ) -> PathBuf {
        self.create_series_path(&series.name).join(file_name.as_ref())
    }

    pub fn create_unclassified_episode_path(&self, file_name: impl AsRef<OsStr>) -> PathBuf {
        self.unclassified_path.join(file_name.as_ref())
    }

    /// First path, starting at `destination`, that nothing occupies yet.
    pub fn free_destination(&self, destination: &Path) -> PathBuf {
        let mut candidate = destination.to_path_buf();
        while path::path_exists(&candidate) {
            candidate = duplicate_candidate(&candidate);
        }
        candidate
    }

    /// Moves `source` to `destination`, or to the next free duplicate name
    /// if something is already there. Returns where the file ended up.
    pub fn move_file_to_destination(&self, source: &Path, destination: &Path) -> io::Result<PathBuf> {
        if let Some(parent) = destination.parent() {
            path::create_directory(parent)?;
        }

        let final_destination = self.free_destination(destination);
        if final_destination != destination {
            warn!(
                "{} already exists, writing to {} instead",
                destination.display(),
                final_destination.display()
            );
        }

        path::move_file(source, &final_destination)?;
        debug!(
            "Moved {} -> {}",
            source.display(),
            final_destination.display()
        );
        Ok(final_destination)
    }
}

/// `name.ext` -> `name - DUP_1.ext`, `name - DUP_1.ext` -> `name - DUP_2.ext`.
fn duplicate_candidate(path: &Path) -> PathBuf {
    let stem = path.file_stem().unwrap_or_default();

    let mut renamed = match stem.to_str().and_then(bump_duplicate_counter) {
        Some(bumped) => OsString::from(bumped),
        None => {
            let mut first = stem.to_os_string();
            first.push(format!("{}1", DUPLICATE_MARKER));
            first
        }
    };
    if let Some(extension) = path.extension() {
        renamed.push(".");
        renamed.push(extension);
    }

    path.with_file_name(renamed)
}

/// `name - DUP_3` becomes `name - DUP_4`; anything else is not a marked name.
fn bump_duplicate_counter(stem: &str) -> Option<String> {
    let (base, counter) = stem.rsplit_once(DUPLICATE_MARKER)?;
    if counter.is_empty() || !counter.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let n = counter.parse::<u64>().ok()?;
    Some(format!("{}{}{}", base, DUPLICATE_MARKER, n + 1))
}
