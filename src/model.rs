use crate::error::{Error, Result};
use std::path::PathBuf;

/// Top-level grouping of episodes, e.g. a TV show.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub id: i64,
    pub name: String,
    pub path: PathBuf,
    /// Empty unless the catalog was asked to include seasons.
    pub seasons: Vec<Season>,
}

/// Grouping within a series. The name is only unique per series.
#[derive(Debug, Clone, PartialEq)]
pub struct Season {
    pub id: i64,
    pub series_id: i64,
    pub name: String,
    pub path: PathBuf,
    /// Empty unless the catalog was asked to include episodes.
    pub episodes: Vec<Episode>,
}

/// One relocated file. `path` is where the file lives after the move.
#[derive(Debug, Clone, PartialEq)]
pub struct Episode {
    pub id: i64,
    pub name: String,
    pub path: PathBuf,
    pub series_id: Option<i64>,
    pub season_id: Option<i64>,
}

/// Series/season assignment inherited by everything below a directory.
///
/// A context is never changed in place: `with_series` and `with_season`
/// return a new value, so a subdirectory can never alter what its parent or
/// its siblings see. A season is only ever present alongside the series it
/// belongs to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    series: Option<Series>,
    season: Option<Season>,
}

impl Context {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn series(&self) -> Option<&Series> {
        self.series.as_ref()
    }

    pub fn season(&self) -> Option<&Season> {
        self.season.as_ref()
    }

    pub fn series_name(&self) -> &str {
        self.series.as_ref().map_or("NONE", |s| s.name.as_str())
    }

    pub fn season_name(&self) -> &str {
        self.season.as_ref().map_or("NONE", |s| s.name.as_str())
    }

    /// Switching series drops any season, which belonged to the old one.
    pub fn with_series(&self, series: Series) -> Self {
        Self {
            series: Some(series),
            season: None,
        }
    }

    pub fn with_season(&self, season: Season) -> Result<Self> {
        let series = self.series.as_ref().ok_or_else(|| {
            Error::InvalidArgument(format!(
                "cannot assign season '{}' without a series in context",
                season.name
            ))
        })?;

        if season.series_id != series.id {
            return Err(Error::InvalidArgument(format!(
                "season '{}' belongs to series {} but context holds series {} ('{}')",
                season.name, season.series_id, series.id, series.name
            )));
        }

        Ok(Self {
            series: self.series.clone(),
            season: Some(season),
        })
    }

    pub fn series_id(&self) -> Option<i64> {
        self.series.as_ref().map(|s| s.id)
    }

    pub fn season_id(&self) -> Option<i64> {
        self.season.as_ref().map(|s| s.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(id: i64, name: &str) -> Series {
        Series {
            id,
            name: name.to_string(),
            path: PathBuf::from("library").join(name),
            seasons: Vec::new(),
        }
    }

    fn season(id: i64, series_id: i64, name: &str) -> Season {
        Season {
            id,
            series_id,
            name: name.to_string(),
            path: PathBuf::from(name),
            episodes: Vec::new(),
        }
    }

    #[test]
    fn test_empty_context_names() {
        let ctx = Context::empty();
        assert_eq!(ctx.series_name(), "NONE");
        assert_eq!(ctx.season_name(), "NONE");
        assert!(ctx.series_id().is_none());
        assert!(ctx.season_id().is_none());
    }

    #[test]
    fn test_season_requires_series() {
        let err = Context::empty().with_season(season(1, 1, "S1")).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_season_must_belong_to_context_series() {
        let ctx = Context::empty().with_series(series(1, "Show"));
        let err = ctx.with_season(season(7, 2, "S1")).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_deriving_leaves_parent_untouched() {
        let parent = Context::empty().with_series(series(1, "Show"));
        let child = parent.with_season(season(3, 1, "Season 1")).unwrap();

        assert!(parent.season().is_none());
        assert_eq!(child.season_name(), "Season 1");
        assert_eq!(child.series_name(), "Show");
    }

    #[test]
    fn test_switching_series_drops_season() {
        let ctx = Context::empty()
            .with_series(series(1, "Show"))
            .with_season(season(3, 1, "Season 1"))
            .unwrap();
        let other = ctx.with_series(series(2, "Other"));
        assert!(other.season().is_none());
        assert_eq!(other.series_id(), Some(2));
    }
}
