//! Title normalization.
//!
//! Movies are stored and looked up by a cleaned, lowercase title so that
//! "Jailer (2023)", "JAILER (2023) 🎬" and " jailer  (2023) " all land on the
//! same catalog entry. Uploaded files usually carry release noise in their
//! names; [`extract_title`] strips it before cleaning.

use std::sync::LazyLock;

use regex::Regex;

static NON_TITLE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s()]").expect("valid regex"));
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));
static HANDLES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"@\S+").expect("valid regex"));
static RELEASE_TAGS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(480p|720p|1080p|x264|x265|HEVC|HDRip|WEBRip|AAC|10bit|DS4K|UNTOUCHED|mkv|mp4|HD|HQ|Tamil|Telugu|Hindi|English|Dubbed|Org|Original|Proper)\b",
    )
    .expect("valid regex")
});
static BRACKETS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\[\](){}]").expect("valid regex"));
static NAME_AND_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-zA-Z\s]+)\(?(20\d{2})\)?").expect("valid regex"));
static NAME_END: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[-0-9]").expect("valid regex"));

pub fn clean_title(title: &str) -> String {
    let lowered: String = title
        .to_lowercase()
        .chars()
        .filter(|c| c.is_whitespace() || !(c.is_control() || is_format_char(*c)))
        .collect();
    let stripped = NON_TITLE_CHARS.replace_all(&lowered, "");
    WHITESPACE.replace_all(&stripped, " ").trim().to_string()
}

pub fn extract_title(file_name: &str) -> String {
    let name = HANDLES.replace_all(file_name, "");
    let name = RELEASE_TAGS.replace_all(&name, "");
    let name = BRACKETS.replace_all(&name, " ");
    let name = WHITESPACE.replace_all(&name, " ");
    let name = name.trim();

    if let Some(caps) = NAME_AND_YEAR.captures(name) {
        return format!("{} ({})", caps[1].trim(), &caps[2]);
    }

    NAME_END.split(name).next().unwrap_or_default().trim().to_string()
}

// Zero-width and other invisible formatting characters; \w would keep the joiners.
fn is_format_char(c: char) -> bool {
    matches!(
        c,
        '\u{00AD}' | '\u{200B}'..='\u{200F}' | '\u{202A}'..='\u{202E}' | '\u{2060}'..='\u{2064}' | '\u{FEFF}'
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_title_lowercases_and_collapses_spaces() {
        assert_eq!(clean_title("  The   Dark\tKnight "), "the dark knight");
    }

    #[test]
    fn clean_title_keeps_parentheses_and_drops_symbols() {
        assert_eq!(clean_title("Jailer (2023) 🎬!"), "jailer (2023)");
        assert_eq!(clean_title("Spider-Man: No Way Home"), "spiderman no way home");
        assert_eq!(clean_title("snake_case"), "snake_case");
    }

    #[test]
    fn clean_title_drops_invisible_characters() {
        assert_eq!(clean_title("ama\u{200D}ran\u{0007}"), "amaran");
    }

    #[test]
    fn clean_title_keeps_non_latin_scripts() {
        assert_eq!(clean_title("விக்ரம்"), "விக்ரம்");
    }

    #[test]
    fn extract_title_with_parenthesized_year() {
        assert_eq!(extract_title("Jailer (2023) Tamil 1080p HDRip.mkv"), "Jailer (2023)");
    }

    #[test]
    fn extract_title_strips_channel_handles() {
        assert_eq!(extract_title("@SKMovies Vikram 2022 720p.mkv"), "Vikram (2022)");
    }

    #[test]
    fn extract_title_without_year_stops_at_first_digit_or_dash() {
        assert_eq!(extract_title("Master - HQ x264.mp4"), "Master");
        assert_eq!(extract_title("Kaithi 1999 print"), "Kaithi");
    }

    #[test]
    fn extracted_titles_clean_to_lookup_keys() {
        let title = extract_title("[TamilRockers] Leo (2023) Tamil HQ HDRip 720p x264 AAC.mkv");
        assert_eq!(clean_title(&title), "tamilrockers leo (2023)");
    }
}
