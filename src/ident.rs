//! Rust identifier helpers shared by grouping and code generation.

use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref IDENTIFIER: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap();
}

/// Keywords that can be used through a raw identifier (`r#type`).
const RAW_KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized",
    "use", "virtual", "where", "while", "yield",
];

/// Keywords that cannot be raw identifiers.
const RESERVED: &[&str] = &["self", "Self", "super", "crate"];

/// True for `[A-Za-z_][A-Za-z0-9_]*`, excluding a lone `_`.
pub fn is_identifier(s: &str) -> bool {
    s != "_" && IDENTIFIER.is_match(s)
}

/// Replaces every character outside `[A-Za-z0-9_]` with `_` and prefixes a
/// leading digit with `_`. A result of `_` (or nothing) becomes `__`.
pub fn sanitize(s: &str) -> String {
    let mut out: String = s
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    if out.is_empty() || out == "_" {
        out = "__".to_string();
    }
    out
}

/// Renders an identifier so it is usable in Rust source, escaping keywords.
pub fn render(ident: &str) -> String {
    if RESERVED.contains(&ident) {
        format!("{ident}_")
    } else if RAW_KEYWORDS.contains(&ident) {
        format!("r#{ident}")
    } else {
        ident.to_string()
    }
}

/// Hands out unique field names in call order: the first claimant of a name
/// keeps it, later ones get `_2`, `_3`, ...
#[derive(Debug, Default)]
pub struct IdentifierAllocator {
    used: HashSet<String>,
}

impl IdentifierAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sanitises `key` and returns a name not handed out before, rendered
    /// for Rust source.
    pub fn allocate(&mut self, key: &str) -> String {
        let mut base = sanitize(key);
        if RESERVED.contains(&base.as_str()) {
            base.push('_');
        }
        let mut candidate = base.clone();
        let mut suffix = 2;
        while self.used.contains(&candidate) {
            candidate = format!("{base}_{suffix}");
            suffix += 1;
        }
        self.used.insert(candidate.clone());
        render(&candidate)
    }
}
