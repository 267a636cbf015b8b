use crate::app::cli::ParsedArgs;
use crate::app::models::{Configuration, EntryOrder, ExclusionSet};
use crate::app::selection::strategy_for;
use anyhow::Result;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

/// Names skipped in every run, on top of whatever the user asks for.
pub const DEFAULT_EXCLUDES: &[&str] = &[
    "node_modules",
    ".next",
    ".vscode",
    ".idea",
    ".git",
    "target",
    "Cargo.lock",
    "zig-cache",
    "zig-out",
    "vendor",
    "go.sum",
    "DerivedData",
    ".svelte-kit",
];

/// `file_tree_<HH-MM-SS>.md` for the given start time.
pub fn default_output_path(started_at: &DateTime<Local>) -> PathBuf {
    PathBuf::from(format!("file_tree_{}.md", started_at.format("%H-%M-%S")))
}

pub fn resolve_config(
    args: ParsedArgs,
    root: &Path,
    started_at: &DateTime<Local>,
) -> Result<Configuration> {
    let mut exclusions: ExclusionSet = args.exclude.into_iter().collect();
    exclusions.extend(DEFAULT_EXCLUDES.iter().copied());

    strategy_for(args.interactive).select(root, &mut exclusions)?;

    let order = if args.sort {
        EntryOrder::Name
    } else {
        EntryOrder::Filesystem
    };

    let config = Configuration {
        exclusions,
        output_path: args
            .output
            .unwrap_or_else(|| default_output_path(started_at)),
        interactive: args.interactive,
        clear: args.clear,
        order,
    };

    log::debug!(
        "Resolved config: output={}, order={:?}, interactive={}, clear={}, exclusions={:?}",
        config.output_path.display(),
        config.order,
        config.interactive,
        config.clear,
        config.exclusions.sorted()
    );
    Ok(config)
}
