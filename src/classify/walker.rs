use super::resolver::{assign_season, assign_series};
use crate::error::{Error, Result};
use crate::library::FileMover;
use crate::model::{Context, Episode};
use crate::storage::Catalog;
use crate::utils::path;
use crate::utils::prompt::Prompt;
use colored::*;
use glob::Pattern;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct WalkStats {
    pub directories: usize,
    pub episodes: usize,
    pub deferred: usize,
    pub ignored: usize,
}

/// Depth-first classification of a source tree into the library.
///
/// Each directory inherits its parent's context, may extend it with a
/// series or season, and hands the result down to its own children. Files
/// are cataloged first and moved second, so an interrupted move still
/// leaves a catalog entry pointing at where the file should be.
pub struct Walker<'a> {
    catalog: &'a Catalog,
    mover: &'a FileMover,
    prompt: &'a mut dyn Prompt,
    ignore_patterns: Vec<Pattern>,
    confirm_files: bool,
    library_root: Option<PathBuf>,
    stats: WalkStats,
}

impl<'a> Walker<'a> {
    pub fn new(catalog: &'a Catalog, mover: &'a FileMover, prompt: &'a mut dyn Prompt) -> Self {
        Self {
            catalog,
            mover,
            prompt,
            ignore_patterns: Vec::new(),
            confirm_files: true,
            library_root: fs::canonicalize(mover.library_root()).ok(),
            stats: WalkStats::default(),
        }
    }

    /// Invalid patterns are logged and skipped.
    pub fn with_ignore_patterns(mut self, globs: &[String]) -> Self {
        self.ignore_patterns = globs
            .iter()
            .filter_map(|glob| match Pattern::new(glob) {
                Ok(p) => Some(p),
                Err(e) => {
                    error!("Invalid glob pattern '{}': {}", glob, e);
                    None
                }
            })
            .collect();
        self
    }

    pub fn with_file_confirmation(mut self, confirm_files: bool) -> Self {
        self.confirm_files = confirm_files;
        self
    }

    /// Walks everything below `root`. The root itself is never classified;
    /// files lying directly in it go to the unclassified area.
    pub fn process_root(&mut self, root: &Path) -> Result<WalkStats> {
        if !path::is_directory(root) {
            return Err(Error::InvalidArgument(format!(
                "must process a directory, not a file: {}",
                root.display()
            )));
        }

        let context = Context::empty();
        let (directories, files) = self.list_children(root)?;

        for directory in &directories {
            self.process_directory(&root.join(directory), &context)?;
        }
        for file in &files {
            self.process_file(&root.join(file), file, &context)?;
        }

        info!(
            "Walk of {} finished: {} directories, {} episodes, {} ignored",
            root.display(),
            self.stats.directories,
            self.stats.episodes,
            self.stats.ignored
        );
        Ok(self.stats.clone())
    }

    pub fn process_directory(&mut self, dir: &Path, context: &Context) -> Result<()> {
        if !path::is_directory(dir) {
            return Err(Error::InvalidArgument(format!(
                "must process a directory, not a file: {}",
                dir.display()
            )));
        }
        self.stats.directories += 1;

        let (directories, files) = self.list_children(dir)?;
        print_orientation(dir, context, &directories, &files);

        let directory_name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let resolved = if context.series().is_none() {
            assign_series(&directory_name, context, self.catalog, self.mover, &mut *self.prompt)?
        } else if context.season().is_none() {
            assign_season(&directory_name, context, self.catalog, self.mover, &mut *self.prompt)?
        } else {
            context.clone()
        };

        print_recap(dir, &resolved);

        // Without a series every file lands in unclassified, so there is nothing to confirm.
        let bypass = if !self.confirm_files || files.is_empty() || resolved.series().is_none() {
            true
        } else {
            self.prompt.ask_yes_no(
                "Are all files in this directory assigned to those things? (y/n)",
            )?
        };

        let mut deferred = Vec::new();
        for file in &files {
            let keep = bypass
                || self.prompt.ask_yes_no(&format!(
                    "File '{}': file it under {} / {}? (y/n)",
                    file.to_string_lossy(),
                    resolved.series_name(),
                    resolved.season_name()
                ))?;

            if keep {
                self.process_file(&dir.join(file), file, &resolved)?;
            } else {
                deferred.push(file);
            }
        }

        for directory in &directories {
            self.process_directory(&dir.join(directory), &resolved)?;
        }

        let unclassified = Context::empty();
        for file in deferred {
            println!(
                "Filing declined file {} as unclassified",
                file.to_string_lossy().yellow()
            );
            self.stats.deferred += 1;
            self.process_file(&dir.join(file), file, &unclassified)?;
        }

        Ok(())
    }

    /// The catalog stores a display form of `file_name`; the file itself
    /// keeps its name byte for byte.
    fn process_file(
        &mut self,
        source: &Path,
        file_name: &OsStr,
        context: &Context,
    ) -> Result<Episode> {
        let destination = match (context.series(), context.season()) {
            (Some(series), Some(season)) => {
                self.mover
                    .create_episode_path_in_season(series, season, file_name)
            }
            (Some(series), None) => self.mover.create_episode_path_in_series(series, file_name),
            _ => self.mover.create_unclassified_episode_path(file_name),
        };
        let destination = self.mover.free_destination(&destination);

        let episode = self.catalog.insert_episode(
            &file_name.to_string_lossy(),
            &destination,
            context.series_id(),
            context.season_id(),
        )?;

        match self.mover.move_file_to_destination(source, &destination) {
            Ok(landed) => {
                if landed != destination {
                    warn!(
                        "Episode {} was cataloged at {} but landed at {}",
                        episode.id,
                        destination.display(),
                        landed.display()
                    );
                }
                info!("Filed {} -> {}", source.display(), landed.display());
                self.stats.episodes += 1;
                Ok(episode)
            }
            Err(cause) => {
                error!(
                    "Catalog and filesystem diverged: episode {} points at {} but {} could not be moved: {}",
                    episode.id,
                    destination.display(),
                    source.display(),
                    cause
                );
                Err(Error::MoveDiverged {
                    episode_id: episode.id,
                    origin: source.to_path_buf(),
                    destination,
                    cause,
                })
            }
        }
    }

    /// Child directory and file names, minus ignored entries and the
    /// library itself when it sits inside the source tree.
    fn list_children(&mut self, dir: &Path) -> Result<(Vec<OsString>, Vec<OsString>)> {
        let mut directories = path::list_child_directories(dir)?;
        let mut files = path::list_child_files(dir)?;

        directories.retain(|name| self.keep_entry(&dir.join(name), name, true));
        files.retain(|name| self.keep_entry(&dir.join(name), name, false));

        debug!(
            "{}: {} directories, {} files",
            dir.display(),
            directories.len(),
            files.len()
        );
        Ok((directories, files))
    }

    fn keep_entry(&mut self, entry: &Path, name: &OsStr, is_dir: bool) -> bool {
        if is_dir {
            if let Some(library_root) = &self.library_root {
                if fs::canonicalize(entry).ok().as_ref() == Some(library_root) {
                    debug!("Skipping library directory {}", entry.display());
                    return false;
                }
            }
        }

        let name = name.to_string_lossy();
        let ignored = self
            .ignore_patterns
            .iter()
            .any(|pattern| pattern.matches(&name) || pattern.matches_path(entry));
        if ignored {
            warn!("Ignoring {}", entry.display());
            self.stats.ignored += 1;
        }
        !ignored
    }
}

fn print_orientation(
    dir: &Path,
    context: &Context,
    directories: &[OsString],
    files: &[OsString],
) {
    println!();
    println!();
    println!("===================================");
    println!("Directory - {}", dir.display().to_string().cyan());
    println!("Current Series - {}", context.series_name());
    println!("Current Season - {}", context.season_name());
    println!("===================================");
    println!("Directories:");
    for name in directories {
        println!("  {}{}", name.to_string_lossy(), std::path::MAIN_SEPARATOR);
    }
    println!("Files:");
    for name in files {
        println!("  {}", name.to_string_lossy());
    }
}

fn print_recap(dir: &Path, context: &Context) {
    println!("{}", "RECAP:".bold());
    println!("===================================");
    println!("Directory - {}", dir.display().to_string().cyan());
    println!("Current Series - {}", context.series_name().green());
    println!("Current Season - {}", context.season_name().green());
    println!("===================================");
}
