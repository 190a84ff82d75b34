use std::sync::LazyLock;

use regex::Regex;

static QUOTES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"["“”]"#).expect("quote pattern"));
static NON_ALNUM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("separator pattern"));
static HYPHENS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-+").expect("hyphen pattern"));

/// URL slug for a display name. Detail-page links are built from this, so the
/// transform must stay stable.
pub fn slugify(name: &str) -> String {
    let s = name.to_lowercase();
    let s = QUOTES.replace_all(s.trim(), "");
    let s = NON_ALNUM.replace_all(&s, "-");
    let s = HYPHENS.replace_all(&s, "-");
    s.trim_matches('-').to_string()
}
