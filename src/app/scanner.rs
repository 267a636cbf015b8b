use crate::app::errors::{FtgError, WalkError};
use crate::app::formatter::{OutputGenerator, TreeLine};
use crate::app::models::{
    Configuration, DirectoryEntry, EntryKind, EntryOrder, ExclusionSet, WalkStats,
};
use std::fs;
use std::io::Write;
use std::path::Path;

/// Depth-first, pre-order walker that streams one line per surviving entry.
///
/// Only the children of the directory currently being listed are held in memory.
pub struct Scanner<'a> {
    exclusions: &'a ExclusionSet,
    order: EntryOrder,
}

impl<'a> Scanner<'a> {
    pub fn new(exclusions: &'a ExclusionSet, order: EntryOrder) -> Self {
        Self { exclusions, order }
    }

    pub fn from_config(config: &'a Configuration) -> Self {
        Self::new(&config.exclusions, config.order)
    }

    /// Walks `root` and writes its tree into `out`.
    ///
    /// Failing to list `root` itself is fatal. Deeper directories that cannot be listed
    /// are reported with a warning and left empty in the output.
    pub fn walk<W: Write>(&self, root: &Path, out: &mut W) -> Result<WalkStats, WalkError> {
        let children = self.read_children(root)?;
        let mut stats = WalkStats::default();
        self.emit_children(children, "", out, &mut stats)?;
        Ok(stats)
    }

    fn walk_dir<W: Write>(
        &self,
        dir: &Path,
        indent: &str,
        out: &mut W,
        stats: &mut WalkStats,
    ) -> Result<(), WalkError> {
        match self.read_children(dir) {
            Ok(children) => self.emit_children(children, indent, out, stats),
            Err(FtgError::FilesystemQuery { source, .. }) => {
                log::warn!("Skipping contents of {}: {}", dir.display(), source);
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }

    fn emit_children<W: Write>(
        &self,
        children: Vec<DirectoryEntry>,
        indent: &str,
        out: &mut W,
        stats: &mut WalkStats,
    ) -> Result<(), WalkError> {
        let count = children.len();
        for (i, entry) in children.into_iter().enumerate() {
            let is_last = i + 1 == count;
            let line = TreeLine::new(&entry.name, entry.kind, indent, is_last);
            writeln!(out, "{}", line).map_err(WalkError::Write)?;
            stats.record(entry.kind);

            if entry.is_dir() {
                let child_indent = OutputGenerator::child_indent(indent, is_last);
                self.walk_dir(&entry.path, &child_indent, out, stats)?;
            }
        }
        Ok(())
    }

    /// Lists the children of `dir` that survive the exclusion set, in visiting order.
    fn read_children(&self, dir: &Path) -> Result<Vec<DirectoryEntry>, FtgError> {
        let listing = fs::read_dir(dir).map_err(|source| FtgError::FilesystemQuery {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut children = Vec::new();
        for result in listing {
            let entry = match result {
                Ok(entry) => entry,
                Err(err) => {
                    log::warn!("Error reading entry in {}: {}", dir.display(), err);
                    continue;
                }
            };

            let name = entry.file_name().to_string_lossy().into_owned();
            if self.exclusions.contains(&name) {
                log::debug!("Excluding {}", entry.path().display());
                continue;
            }

            // Symlinks are not followed: a link to a directory is listed as a file.
            let kind = match entry.file_type() {
                Ok(file_type) if file_type.is_dir() => EntryKind::Directory,
                Ok(_) => EntryKind::File,
                Err(err) => {
                    log::warn!("Cannot determine type of {}: {}", entry.path().display(), err);
                    continue;
                }
            };

            children.push(DirectoryEntry {
                name,
                path: entry.path(),
                kind,
            });
        }

        if self.order == EntryOrder::Name {
            children.sort_by(|a, b| a.name.cmp(&b.name));
        }
        Ok(children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "").unwrap();
    }

    fn render(root: &Path, excluded: &[&str]) -> (String, WalkStats) {
        let exclusions: ExclusionSet = excluded.iter().copied().collect();
        let scanner = Scanner::new(&exclusions, EntryOrder::Name);
        let mut out = Vec::new();
        let stats = scanner.walk(root, &mut out).unwrap();
        (String::from_utf8(out).unwrap(), stats)
    }

    #[test]
    fn excluded_directory_is_neither_printed_nor_counted() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a.txt");
        touch(dir.path(), "b.txt");
        touch(dir.path(), "node_modules/left-pad/index.js");

        let (text, stats) = render(dir.path(), &["node_modules"]);
        assert_eq!(text, "├── [File] a.txt\n└── [File] b.txt\n");
        assert_eq!(
            stats,
            WalkStats {
                directories: 0,
                files: 2
            }
        );
    }

    #[test]
    fn nested_directories_carry_ancestor_indent() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "README.md");
        touch(dir.path(), "src/app/cli.rs");
        touch(dir.path(), "src/main.rs");
        touch(dir.path(), "tests/cli.rs");

        let (text, stats) = render(dir.path(), &[]);
        let expected = "\
├── [File] README.md
├── [Directory] src
│   ├── [Directory] app
│   │   └── [File] cli.rs
│   └── [File] main.rs
└── [Directory] tests
    └── [File] cli.rs
";
        assert_eq!(text, expected);
        assert_eq!(stats.directories, 3);
        assert_eq!(stats.files, 4);
    }

    #[test]
    fn last_surviving_sibling_gets_the_elbow() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a.txt");
        touch(dir.path(), "b.txt");
        touch(dir.path(), "zig-out/bin");

        let (text, _) = render(dir.path(), &["zig-out"]);
        assert_eq!(text, "├── [File] a.txt\n└── [File] b.txt\n");
    }

    #[test]
    fn exclusion_applies_at_every_depth_by_base_name() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "pkg/vendor/lib.go");
        touch(dir.path(), "pkg/main.go");

        let (text, _) = render(dir.path(), &["vendor"]);
        assert_eq!(text, "└── [Directory] pkg\n    └── [File] main.go\n");
    }

    #[test]
    fn empty_directory_is_listed_without_children() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("empty")).unwrap();
        touch(dir.path(), "file");

        let (text, _) = render(dir.path(), &[]);
        assert_eq!(text, "├── [Directory] empty\n└── [File] file\n");
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_directory_is_listed_as_file() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "real/inner.txt");
        std::os::unix::fs::symlink(dir.path().join("real"), dir.path().join("link")).unwrap();

        let (text, _) = render(dir.path(), &[]);
        assert_eq!(
            text,
            "├── [File] link\n└── [Directory] real\n    └── [File] inner.txt\n"
        );
    }

    #[test]
    fn missing_root_is_a_query_error() {
        let dir = TempDir::new().unwrap();
        let exclusions = ExclusionSet::new();
        let scanner = Scanner::new(&exclusions, EntryOrder::Filesystem);
        let mut out = Vec::new();

        let err = scanner
            .walk(&dir.path().join("missing"), &mut out)
            .unwrap_err();
        assert!(matches!(
            err,
            WalkError::Query(FtgError::FilesystemQuery { .. })
        ));
        assert!(out.is_empty());
    }

    #[test]
    fn vanished_directory_is_listed_empty_and_walk_continues() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "later.txt");
        let exclusions = ExclusionSet::new();
        let scanner = Scanner::new(&exclusions, EntryOrder::Name);

        // Listed, then removed before the walker descends into it.
        let children = vec![
            DirectoryEntry {
                name: "gone".to_string(),
                path: dir.path().join("gone"),
                kind: EntryKind::Directory,
            },
            DirectoryEntry {
                name: "later.txt".to_string(),
                path: dir.path().join("later.txt"),
                kind: EntryKind::File,
            },
        ];
        let mut out = Vec::new();
        let mut stats = WalkStats::default();
        scanner
            .emit_children(children, "", &mut out, &mut stats)
            .unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "├── [Directory] gone\n└── [File] later.txt\n"
        );
        assert_eq!(
            stats,
            WalkStats {
                directories: 1,
                files: 1
            }
        );
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_subdirectory_leaves_a_partial_tree() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a_locked/secret.txt");
        touch(dir.path(), "b.txt");
        let locked = dir.path().join("a_locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Permission bits do not stop root.
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let (text, _) = render(dir.path(), &[]);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        assert_eq!(text, "├── [Directory] a_locked\n└── [File] b.txt\n");
    }

    struct BrokenSink;

    impl Write for BrokenSink {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_failure_stops_the_walk() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a.txt");
        let exclusions = ExclusionSet::new();
        let scanner = Scanner::new(&exclusions, EntryOrder::Filesystem);

        let err = scanner.walk(dir.path(), &mut BrokenSink).unwrap_err();
        assert!(matches!(err, WalkError::Write(_)));
    }

    #[test]
    fn filesystem_order_visits_every_entry() {
        let dir = TempDir::new().unwrap();
        for name in ["one", "two", "three"] {
            touch(dir.path(), name);
        }
        let exclusions = ExclusionSet::new();
        let scanner = Scanner::new(&exclusions, EntryOrder::Filesystem);
        let mut out = Vec::new();
        scanner.walk(dir.path(), &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines.iter().filter(|l| l.starts_with("└──")).count(), 1);
        assert!(lines[2].starts_with("└──"));
    }
}
