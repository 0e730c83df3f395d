use super::run_report::{CleanupOutcome, FileOutcome, FolderReport, RunReport, SkipReason};
use super::tree_organizer::TreeOrganizer;
use crate::config::OrganizerConfig;
use crate::tools::{LocalFileSystem, Mp4TagReader, validate_directory_exists};
use anyhow::Result;
use console::style;
use dialoguer::{Confirm, Input};
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

const REPORT_FILE_NAME: &str = "organize_report.json";

/// 互動式有聲書整理元件
pub struct AudiobookOrganizer {
    shutdown_signal: Arc<AtomicBool>,
}

impl AudiobookOrganizer {
    pub const fn new(shutdown_signal: Arc<AtomicBool>) -> Self {
        Self { shutdown_signal }
    }

    pub fn run(&self) -> Result<()> {
        println!("{}", style("=== Organize audiobooks by author, title and year ===").cyan().bold());

        let root = self.prompt_root_path()?;
        validate_directory_exists(&LocalFileSystem::new(), &root)?;

        let dry_run = self.confirm_dry_run()?;
        let remove_residual_files = self.confirm_residual_cleanup()?;

        let config = OrganizerConfig::new(root)
            .with_dry_run(dry_run)
            .with_residual_cleanup(remove_residual_files);
        let organizer = TreeOrganizer::new(
            config,
            LocalFileSystem::new(),
            Mp4TagReader::new(),
            Arc::clone(&self.shutdown_signal),
        );

        let folders = organizer.top_level_folders()?;
        if folders.is_empty() {
            println!("{}", style("No subfolders to process").yellow());
            return Ok(());
        }

        println!(
            "{}",
            style(format!("Found {} subfolders to process", folders.len())).green()
        );
        if !self.confirm_start(dry_run)? {
            println!("{}", style("Operation cancelled").yellow());
            return Ok(());
        }

        let progress_bar = ProgressBar::new(folders.len() as u64);
        progress_bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
                .progress_chars("#>-"),
        );

        let report = organizer.organize_folders(&folders, |folder_report| {
            print_folder_report(&progress_bar, folder_report);
            progress_bar.inc(1);
        });

        if report.interrupted {
            progress_bar.abandon_with_message("Interrupted");
        } else {
            progress_bar.finish_with_message("Done");
        }

        self.print_summary(&report);

        if self.confirm_save_report()? {
            let path = PathBuf::from(REPORT_FILE_NAME);
            report.save_json(&path)?;
            println!(
                "{}",
                style(format!("Report saved to {}", path.display())).green()
            );
        }

        Ok(())
    }

    fn prompt_root_path(&self) -> Result<PathBuf> {
        let path: String = Input::new()
            .with_prompt("Enter the full path to the folder you want to process")
            .interact_text()?;
        Ok(PathBuf::from(path.trim()))
    }

    fn confirm_dry_run(&self) -> Result<bool> {
        let confirm = Confirm::new()
            .with_prompt("Preview only (dry run, nothing is changed)?")
            .default(false)
            .interact()?;
        Ok(confirm)
    }

    fn confirm_residual_cleanup(&self) -> Result<bool> {
        println!(
            "{}",
            style("Warning: this permanently deletes every non-.m4b file (cover art, cue sheets, notes...) inside each processed subfolder.")
                .red()
        );
        let confirm = Confirm::new()
            .with_prompt("Delete non-.m4b files?")
            .default(false)
            .interact()?;
        Ok(confirm)
    }

    fn confirm_start(&self, dry_run: bool) -> Result<bool> {
        let prompt = if dry_run {
            "Start the preview?"
        } else {
            "Start organizing these folders?"
        };
        let confirm = Confirm::new().with_prompt(prompt).default(true).interact()?;
        Ok(confirm)
    }

    fn confirm_save_report(&self) -> Result<bool> {
        let confirm = Confirm::new()
            .with_prompt(format!("Save the run report as {REPORT_FILE_NAME}?"))
            .default(false)
            .interact()?;
        Ok(confirm)
    }

    fn print_summary(&self, report: &RunReport) {
        println!();
        println!("{}", style("=== Summary ===").cyan().bold());

        if report.dry_run {
            println!("  Planned moves: {}", style(report.planned()).green());
        } else {
            println!("  Moved: {}", style(report.moved()).green());
        }
        if report.skipped() > 0 {
            println!("  Skipped: {}", style(report.skipped()).yellow());
        }
        if report.failed() > 0 {
            println!("  Failed: {}", style(report.failed()).red());
        }
        if report.deleted_files() > 0 {
            let label = if report.dry_run { "Would delete" } else { "Deleted files" };
            println!("  {label}: {}", report.deleted_files());
        }
        if report.removed_directories() > 0 {
            println!("  Removed folders: {}", report.removed_directories());
        }
        if report.cleanup_failures() > 0 {
            println!("  Cleanup errors: {}", style(report.cleanup_failures()).red());
        }
        if report.interrupted {
            println!("{}", style("Run was interrupted before finishing").yellow());
        }

        info!(
            "Organize finished - moved: {}, skipped: {}, failed: {}",
            report.moved(),
            report.skipped(),
            report.failed()
        );
    }
}

fn print_folder_report(progress_bar: &ProgressBar, report: &FolderReport) {
    if let Some(error) = &report.error {
        progress_bar.println(format!(
            "{} Error scanning {}: {error}",
            style("✗").red(),
            report.folder.display()
        ));
        return;
    }

    for outcome in &report.files {
        progress_bar.println(describe_file_outcome(outcome));
    }
    for outcome in &report.cleanup {
        progress_bar.println(describe_cleanup_outcome(outcome));
    }

    progress_bar.println(format!(
        "{}",
        style(format!("Finished '{}'", display_name(&report.folder))).dim()
    ));
}

fn describe_file_outcome(outcome: &FileOutcome) -> String {
    match outcome {
        FileOutcome::Moved { source, target } => format!(
            "{} Renamed and moved: {} -> {}",
            style("→").green(),
            display_name(source),
            display_name(target)
        ),
        FileOutcome::Planned { source, target } => format!(
            "{} Would move: {} -> {}",
            style("→").cyan(),
            source.display(),
            target.display()
        ),
        FileOutcome::Skipped { source, reason } => match reason {
            SkipReason::AlreadyOrganized { target } => format!(
                "{} Skipping already processed file: {}",
                style("•").dim(),
                display_name(target)
            ),
            SkipReason::IncompleteTags => format!(
                "{} Skipping {} (missing author, title or year)",
                style("•").yellow(),
                source.display()
            ),
            SkipReason::ReservedAuthorName { author } => format!(
                "{} Skipping {} (author '{author}' cannot be used as a folder name)",
                style("•").yellow(),
                source.display()
            ),
        },
        FileOutcome::Failed { reason, .. } => {
            format!("{} {reason}", style("✗").red())
        }
    }
}

fn describe_cleanup_outcome(outcome: &CleanupOutcome) -> String {
    match outcome {
        CleanupOutcome::FileDeleted(path) => {
            format!("{} Deleted file: {}", style("-").dim(), path.display())
        }
        CleanupOutcome::WouldDeleteFile(path) => {
            format!("{} Would delete file: {}", style("-").cyan(), path.display())
        }
        CleanupOutcome::DirectoryRemoved(path) => {
            format!("{} Deleted empty folder: {}", style("-").dim(), path.display())
        }
        CleanupOutcome::Failed { reason, .. } => format!("{} {reason}", style("✗").red()),
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
