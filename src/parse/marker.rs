/// Line prefixes recognized in a chapter file's front-matter.
pub const NAME: &str = "%%~name:";
pub const ANCHOR: &str = "%%~date:";
pub const PLOT: &str = "@plot:";
pub const POV: &str = "@pov:";
pub const CHAR: &str = "@char:";
pub const SYNOPSIS: &str = "% Synopsis:";
pub const TIME: &str = "@time:";

/// Heading prefixes eligible for chapter-name substitution, checked in order.
pub const HEADINGS: [&str; 3] = ["# ", "## ", "### "];

/// A recognized front-matter line, carrying its raw (untrimmed) value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker<'a> {
    Name(&'a str),
    Plot(&'a str),
    Pov(&'a str),
    Char(&'a str),
    Synopsis(&'a str),
    Time(&'a str),
}

/// Classify a line by its prefix. First match wins; prefixes must start at column 0.
pub fn classify(line: &str) -> Option<Marker<'_>> {
    if let Some(v) = line.strip_prefix(NAME) {
        Some(Marker::Name(v))
    } else if let Some(v) = line.strip_prefix(PLOT) {
        Some(Marker::Plot(v))
    } else if let Some(v) = line.strip_prefix(POV) {
        Some(Marker::Pov(v))
    } else if let Some(v) = line.strip_prefix(CHAR) {
        Some(Marker::Char(v))
    } else if let Some(v) = line.strip_prefix(SYNOPSIS) {
        Some(Marker::Synopsis(v))
    } else {
        line.strip_prefix(TIME).map(Marker::Time)
    }
}

/// Lines the writer removes and regenerates.
pub fn is_front_matter(line: &str) -> bool {
    [PLOT, POV, CHAR, TIME, SYNOPSIS]
        .iter()
        .any(|p| line.starts_with(p))
}

pub fn is_anchor(line: &str) -> bool {
    line.starts_with(ANCHOR)
}

/// The heading prefix of `line`, if it is a `# `, `## ` or `### ` heading.
pub fn heading_prefix(line: &str) -> Option<&'static str> {
    HEADINGS.iter().copied().find(|p| line.starts_with(p))
}
