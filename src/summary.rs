use crate::error::Result;
use crate::storage::Catalog;
use colored::*;

#[derive(Debug, Clone, PartialEq)]
pub struct SeasonSummary {
    pub id: i64,
    pub name: String,
    pub episodes: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSummary {
    pub id: i64,
    pub name: String,
    pub seasons: Vec<SeasonSummary>,
    /// Episodes filed under the series but outside any season.
    pub loose_episodes: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogSummary {
    pub series: Vec<SeriesSummary>,
    pub unclassified: i64,
}

pub fn summarize(catalog: &Catalog) -> Result<CatalogSummary> {
    let mut series = Vec::new();

    for entry in catalog.list_all_series(false)? {
        let seasons = catalog
            .list_seasons_for_series(entry.id, true)?
            .into_iter()
            .map(|season| SeasonSummary {
                id: season.id,
                name: season.name,
                episodes: season.episodes.len(),
            })
            .collect();

        series.push(SeriesSummary {
            id: entry.id,
            name: entry.name,
            seasons,
            loose_episodes: catalog.list_loose_episodes_for_series(entry.id)?.len(),
        });
    }

    Ok(CatalogSummary {
        series,
        unclassified: catalog.count_unclassified_episodes()?,
    })
}

pub fn print_summary(summary: &CatalogSummary) {
    println!();
    println!("{}", "Series in catalog:".bold());
    for series in &summary.series {
        println!("{} : {}", series.id, series.name.green());
        println!("Seasons:");
        for season in &series.seasons {
            println!("  {} : {} ({} episodes)", season.id, season.name, season.episodes);
        }
        if series.loose_episodes > 0 {
            println!("  {} episodes outside any season", series.loose_episodes);
        }
        println!("========================");
    }
    println!(
        "{} unclassified episodes",
        summary.unclassified.to_string().yellow()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_summary_counts() {
        let catalog = Catalog::open_in_memory().unwrap();
        let show = catalog.insert_series("Show", Path::new("l/Show")).unwrap();
        let s1 = catalog
            .insert_season(show.id, "S1", Path::new("l/Show/S1"))
            .unwrap();
        catalog
            .insert_episode("a", Path::new("l/Show/S1/a"), Some(show.id), Some(s1.id))
            .unwrap();
        catalog
            .insert_episode("b", Path::new("l/Show/S1/b"), Some(show.id), Some(s1.id))
            .unwrap();
        catalog
            .insert_episode("c", Path::new("l/Show/c"), Some(show.id), None)
            .unwrap();
        catalog
            .insert_episode("d", Path::new("l/unclassified/d"), None, None)
            .unwrap();

        let summary = summarize(&catalog).unwrap();

        assert_eq!(summary.series.len(), 1);
        assert_eq!(summary.series[0].seasons[0].episodes, 2);
        assert_eq!(summary.series[0].loose_episodes, 1);
        assert_eq!(summary.unclassified, 1);
    }
}
