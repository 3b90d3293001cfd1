use super::matcher::{self, MAX_SUGGESTIONS};
use crate::error::{Error, Result};
use crate::library::FileMover;
use crate::model::{Context, Series};
use crate::storage::Catalog;
use crate::utils::path;
use crate::utils::prompt::Prompt;
use colored::*;
use tracing::debug;

/// Works out which series, if any, `directory_name` belongs to.
///
/// Returns the context to use for the directory: unchanged when the
/// operator keeps the current series or says it is not a series at all,
/// otherwise a new context holding the chosen or newly created series.
pub fn assign_series(
    directory_name: &str,
    context: &Context,
    catalog: &Catalog,
    mover: &FileMover,
    prompt: &mut dyn Prompt,
) -> Result<Context> {
    if let Some(current) = context.series() {
        let keep = prompt.ask_yes_no(&format!(
            "Is this part of the current series: {}? (y/n)",
            current.name
        ))?;
        if keep {
            return Ok(context.clone());
        }
    }

    let is_series = prompt.ask_yes_no(
        "Does this directory contain episodes from a series? \
         You will have a chance to change this for individual files. (y/n)",
    )?;
    if !is_series {
        return Ok(context.clone());
    }

    let all_series = catalog.list_all_series(false)?;
    let all_names: Vec<String> = all_series.iter().map(|s| s.name.clone()).collect();
    let suggestions = matcher::rank(directory_name, &all_names, MAX_SUGGESTIONS);

    let browse_option = suggestions.len() as i64 + 1;
    let create_option = browse_option + 1;
    let none_option = create_option + 1;

    println!("{}", "Best guess existing series:".bold());
    println!("==========================");
    for (i, rating) in suggestions.iter().enumerate() {
        println!("{}. {}", i + 1, rating.name);
        debug!("suggestion '{}' scored {:.3}", rating.name, rating.score);
    }
    println!("~~~~~~~~~~~~~~~~~~~~~~~~~~");
    println!("{}. List and pick from all series", browse_option);
    println!("{}. Add a new series", create_option);
    println!("{}. Not a series", none_option);

    let selected = prompt.ask_number(
        &format!("Select an option [1-{}]:", none_option),
        1,
        none_option,
    )?;

    let series = if selected < browse_option {
        let name = suggestions[(selected - 1) as usize].name;
        catalog.get_series_by_name(name, true)?.ok_or_else(|| {
            Error::Consistency(format!(
                "series '{}' was listed by the catalog but can no longer be found by name",
                name
            ))
        })?
    } else if selected == browse_option {
        match pick_from_all_series(all_series, directory_name, catalog, mover, prompt)? {
            Some(series) => series,
            None => return Ok(context.clone()),
        }
    } else if selected == create_option {
        add_new_series(directory_name, catalog, mover, prompt)?
    } else {
        return Ok(context.clone());
    };

    println!("Set series in context to: {}", series.name.green());
    Ok(context.with_series(series))
}

fn pick_from_all_series(
    all_series: Vec<Series>,
    directory_name: &str,
    catalog: &Catalog,
    mover: &FileMover,
    prompt: &mut dyn Prompt,
) -> Result<Option<Series>> {
    let count = all_series.len() as i64;

    println!("{}", "All known series:".bold());
    println!("========================");
    for (i, series) in all_series.iter().enumerate() {
        println!("{}. {}", i + 1, series.name);
    }
    println!("{}. None of these (create new)", count + 1);
    println!("{}. None of these (not a series)", count + 2);

    let selected = prompt.ask_number(
        &format!("Select an option [1-{}]:", count + 2),
        1,
        count + 2,
    )?;

    if selected <= count {
        Ok(all_series.into_iter().nth((selected - 1) as usize))
    } else if selected == count + 1 {
        add_new_series(directory_name, catalog, mover, prompt).map(Some)
    } else {
        Ok(None)
    }
}

fn add_new_series(
    directory_name: &str,
    catalog: &Catalog,
    mover: &FileMover,
    prompt: &mut dyn Prompt,
) -> Result<Series> {
    let name = ask_confirmed_name("series", directory_name, prompt, |name| {
        Ok(catalog.get_series_by_name(name, false)?.is_some())
    })?;

    let series_path = mover.create_series_path(&name);
    let series = catalog.insert_series(&name, &series_path)?;
    path::create_directory(&series_path)?;

    Ok(series)
}

/// Asks whether `directory_name` is a season of the context's series and,
/// if so, catalogs it and returns a context carrying it.
///
/// The context must already hold a series.
pub fn assign_season(
    directory_name: &str,
    context: &Context,
    catalog: &Catalog,
    mover: &FileMover,
    prompt: &mut dyn Prompt,
) -> Result<Context> {
    let series = context.series().ok_or_else(|| {
        Error::InvalidArgument(format!(
            "attempted to assign a season to '{}' outside the context of a series",
            directory_name
        ))
    })?;

    if !prompt.ask_yes_no("Is this directory a season? (y/n)")? {
        return Ok(context.clone());
    }

    let name = ask_confirmed_name("season", directory_name, prompt, |name| {
        Ok(catalog
            .list_seasons_for_series(series.id, false)?
            .iter()
            .any(|season| season.name == name))
    })?;
    let season_path = mover.create_season_path(&name, series);
    let season = catalog.insert_season(series.id, &name, &season_path)?;
    path::create_directory(&season_path)?;

    println!("Set season in context to: {}", season.name.green());
    context.with_season(season)
}

/// Name prompt with `suggested` as the default, repeated until the
/// operator confirms a usable directory name that `is_taken` accepts.
fn ask_confirmed_name(
    kind: &str,
    suggested: &str,
    prompt: &mut dyn Prompt,
    is_taken: impl Fn(&str) -> Result<bool>,
) -> Result<String> {
    loop {
        let name = prompt.ask_text(&format!("Enter {} name ({}):", kind, suggested), suggested)?;

        if !is_usable_name(&name) {
            println!(
                "{}",
                format!("'{}' cannot be used as a directory name.", name).yellow()
            );
            continue;
        }

        if is_taken(&name)? {
            println!(
                "{}",
                format!("A {} named '{}' already exists.", kind, name).yellow()
            );
            continue;
        }

        if prompt.ask_yes_no(&format!("Set {} name to {}? (y/n)", kind, name))? {
            return Ok(name);
        }
    }
}

fn is_usable_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}
