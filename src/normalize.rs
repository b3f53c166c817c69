use regex::Regex;
use std::sync::LazyLock;

static NON_ALNUM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9\s]").expect("valid regex"));

/// Canonical form for lexical comparison: lower-cased, ASCII letters, digits
/// and single spaces only. Commas are stripped too, so split multi-valued
/// fields first if the pieces matter.
pub fn normalize(text: &str) -> String {
    let lower = text.to_lowercase();
    let stripped = NON_ALNUM.replace_all(&lower, "");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}
