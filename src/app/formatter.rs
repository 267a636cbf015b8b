use crate::app::models::EntryKind;
use std::fmt;
use std::path::Path;

const TEE: &str = "├──";
const ELBOW: &str = "└──";
const BAR_PAD: &str = "│   ";
const BLANK_PAD: &str = "    ";

/// Branch-drawing prefix of a rendered entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    Tee,
    Elbow,
}

impl Glyph {
    pub fn for_position(is_last: bool) -> Self {
        if is_last {
            Glyph::Elbow
        } else {
            Glyph::Tee
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Glyph::Tee => TEE,
            Glyph::Elbow => ELBOW,
        }
    }
}

/// One rendered line of the tree, without the trailing newline.
#[derive(Debug, Clone, Copy)]
pub struct TreeLine<'a> {
    pub indent: &'a str,
    pub glyph: Glyph,
    pub kind: EntryKind,
    pub name: &'a str,
}

impl<'a> TreeLine<'a> {
    pub fn new(name: &'a str, kind: EntryKind, indent: &'a str, is_last: bool) -> Self {
        Self {
            indent,
            glyph: Glyph::for_position(is_last),
            kind,
            name,
        }
    }
}

impl fmt::Display for TreeLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{} [{}] {}",
            self.indent,
            self.glyph.as_str(),
            self.kind,
            self.name
        )
    }
}

pub struct OutputGenerator;

impl OutputGenerator {
    /// Indent handed down to the children of an entry.
    pub fn child_indent(indent: &str, is_last: bool) -> String {
        let pad = if is_last { BLANK_PAD } else { BAR_PAD };
        format!("{}{}", indent, pad)
    }

    pub fn preamble(root: &Path) -> String {
        format!(
            "# File Tree\n\nPath to Directory: {}\n\n```\n",
            root.display()
        )
    }

    pub fn postamble() -> &'static str {
        "```\n"
    }
}
