//! Card text utilities
//!
//! Anki card fields arrive as HTML with embedded `[sound:...]` media tags.
//! These helpers reduce a field to plain terminal text and pull out the
//! ordered audio references.

use regex::Regex;
use std::sync::OnceLock;

fn sound_tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[sound:([^\]]+)\]").unwrap())
}

fn style_block_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<style[^>]*>.*?</style>").unwrap())
}

fn line_break_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)<(?:br|/div|/p)\s*/?>").unwrap())
}

fn html_tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)</?[a-z][^>]*>").unwrap())
}

/// Extract the `[sound:...]` filenames from a card field, in order.
pub fn audio_refs(field: &str) -> Vec<String> {
    sound_tag_re()
        .captures_iter(field)
        .map(|c| c[1].to_string())
        .collect()
}

/// Reduce an HTML card field to plain text suitable for the terminal and for
/// completion prompts: media tags removed, style blocks dropped, line-break
/// elements folded to newlines, remaining tags stripped, common entities
/// decoded.
pub fn plain_text(field: &str) -> String {
    let text = sound_tag_re().replace_all(field, "");
    let text = style_block_re().replace_all(&text, "");
    let text = line_break_re().replace_all(&text, "\n");
    let text = html_tag_re().replace_all(&text, "");
    let text = text
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");
    text.trim().to_string()
}
