//! Registry mapping source file extensions to comment markers.
//!
//! Three marker families cover every supported extension: curly-brace
//! languages (`//`, `/* ... */`), Python (`#`, triple-quoted strings used
//! as block comments), and Lua (`--`, `--[[ ... ]]`).

/// Comment markers for one language family.
///
/// Marker slices are searched in registration order; the first marker
/// found anywhere in a line wins for its category.
#[derive(Debug)]
pub struct CommentTags {
    /// Markers that comment out the rest of the line.
    pub line: &'static [&'static str],
    /// Markers that open a comment span which may cross lines.
    pub block_open: &'static [&'static str],
    /// Markers that close such a span.
    pub block_close: &'static [&'static str],
}

static CURLY: CommentTags = CommentTags {
    line: &["//"],
    block_open: &["/*"],
    block_close: &["*/"],
};

static PYTHON: CommentTags = CommentTags {
    line: &["#"],
    block_open: &["'''", "\"\"\""],
    block_close: &["'''", "\"\"\""],
};

static LUA: CommentTags = CommentTags {
    line: &["--"],
    block_open: &["--[["],
    block_close: &["]]"],
};

/// Every extension the registry resolves, in help-text order.
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "c", "cc", "cpp", "h", "hh", "hpp", "m", "mm", "cs", "java", "go", "rs",
    "js", "jsx", "ts", "tsx", "swift", "scala", "py", "lua",
];

/// Looks up the comment tags for a file extension. Lookup is
/// case-insensitive and tolerates a leading dot; unregistered extensions
/// return `None`.
pub fn lookup(extension: &str) -> Option<&'static CommentTags> {
    let normalized = extension.trim_start_matches('.').to_lowercase();
    match normalized.as_str() {
        "c" | "cc" | "cpp" | "h" | "hh" | "hpp" | "m" | "mm" | "cs" | "java" | "go" | "rs"
        | "js" | "jsx" | "ts" | "tsx" | "swift" | "scala" => Some(&CURLY),
        "py" => Some(&PYTHON),
        "lua" => Some(&LUA),
        _ => None,
    }
}
