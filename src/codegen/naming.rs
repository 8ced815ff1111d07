//! Identifier checks and case conversion for generated Rust

use crate::error::{Error, Result};
use regex::Regex;
use std::sync::OnceLock;

/// Rust keywords, strict and reserved, that cannot name an item
pub const RESERVED_WORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "gen", "if", "impl", "in", "let", "loop", "match", "mod",
    "move", "mut", "pub", "ref", "return", "self", "Self", "static", "struct", "super", "trait",
    "true", "try", "type", "unsafe", "use", "where", "while", "abstract", "become", "box", "do",
    "final", "macro", "override", "priv", "typeof", "unsized", "virtual", "yield",
];

/// Items every generated module declares next to the machine struct
pub const GENERATED_ITEMS: &[&str] = &[
    "State",
    "Event",
    "StateError",
    "DebugLogger",
    "Hooks",
    "Lifecycle",
    "PushGuard",
];

/// Names the generated module refers to without a path: its imports, the
/// prelude items and primitive types it spells out, and the hooks parameter
pub const REFERENCED_NAMES: &[&str] = &[
    "std", "Cell", "fmt", "FromStr", "Result", "Option", "Box", "String", "Sized", "Drop",
    "bool", "str", "H",
];

fn identifier_pattern() -> Result<&'static Regex> {
    static ONCE: OnceLock<std::result::Result<Regex, regex::Error>> = OnceLock::new();
    ONCE.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$"))
        .as_ref()
        .map_err(|e| Error::generate(format!("identifier pattern does not compile: {}", e)))
}

/// Check that `name` can be used verbatim as a Rust identifier.
/// `kind` names the construct in the error, e.g. "state" or "event".
pub fn validate_identifier(kind: &str, name: &str) -> Result<()> {
    let reason = if name.is_empty() {
        "identifier cannot be empty"
    } else if name == "_" {
        "identifier cannot be a lone underscore"
    } else if !identifier_pattern()?.is_match(name) {
        "only ASCII letters, digits and underscores are allowed, and it cannot start with a digit"
    } else if RESERVED_WORDS.contains(&name) {
        "reserved word"
    } else {
        return Ok(());
    };

    Err(Error::generate(format!(
        "invalid {} identifier '{}': {}",
        kind, name, reason
    )))
}

/// `GoingToTwo` -> `going_to_two`, `HTTPServer` -> `http_server`
pub fn snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_uppercase() {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1).copied();
            let boundary = match prev {
                Some('_') => false,
                Some(p) if p.is_ascii_lowercase() || p.is_ascii_digit() => true,
                Some(p) if p.is_ascii_uppercase() => next.is_some_and(|n| n.is_ascii_lowercase()),
                _ => false,
            };
            if boundary {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }

    out
}
