use crate::app::errors::FtgError;
use crate::app::formatter::OutputGenerator;
use crate::app::models::{Configuration, WalkStats};
use crate::app::scanner::Scanner;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Writes the markdown document: header, fenced tree, closing fence.
pub struct OutputWriter<'a> {
    config: &'a Configuration,
}

impl<'a> OutputWriter<'a> {
    pub fn new(config: &'a Configuration) -> Self {
        Self { config }
    }

    /// Creates (or truncates) the output file and streams the tree of `root` into it.
    pub fn write_tree(&self, root: &Path) -> Result<WalkStats, FtgError> {
        let path = &self.config.output_path;
        let file = File::create(path).map_err(|source| FtgError::OutputOpen {
            path: path.clone(),
            source,
        })?;
        let write_err = |source: io::Error| FtgError::OutputWrite {
            path: path.clone(),
            source,
        };

        let mut out = BufWriter::new(file);
        out.write_all(OutputGenerator::preamble(root).as_bytes())
            .map_err(write_err)?;

        let stats = Scanner::from_config(self.config)
            .walk(root, &mut out)
            .map_err(|err| err.into_ftg_error(path.clone()))?;

        out.write_all(OutputGenerator::postamble().as_bytes())
            .map_err(write_err)?;

        // Surfaces any error still buffered from earlier writes.
        out.into_inner()
            .map_err(|err| write_err(err.into_error()))?;

        Ok(stats)
    }
}
