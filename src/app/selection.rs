use crate::app::models::ExclusionSet;
use anyhow::Result;
use std::path::Path;

/// Lets the user adjust the exclusion set before the walk starts.
pub trait SelectionStrategy {
    fn select(&self, root: &Path, exclusions: &mut ExclusionSet) -> Result<()>;
}

/// Default strategy: the exclusion set is used as resolved.
pub struct NonInteractive;

impl SelectionStrategy for NonInteractive {
    fn select(&self, _root: &Path, _exclusions: &mut ExclusionSet) -> Result<()> {
        Ok(())
    }
}

/// Prompt-driven selection. Not available yet, so it leaves the set untouched.
pub struct Interactive;

impl SelectionStrategy for Interactive {
    fn select(&self, root: &Path, _exclusions: &mut ExclusionSet) -> Result<()> {
        log::warn!(
            "Interactive mode is not available yet; using the current exclusion list for {}",
            root.display()
        );
        Ok(())
    }
}

pub fn strategy_for(interactive: bool) -> Box<dyn SelectionStrategy> {
    if interactive {
        Box::new(Interactive)
    } else {
        Box::new(NonInteractive)
    }
}
