//! Text canonicalization shared by every phrase matcher.

/// Lowercase `text` and delete every whitespace character.
///
/// Phrase matching runs on normalized text on both sides, so it is
/// insensitive to case and to internal spacing: "bad word" matches
/// "badword" and "b a d  w o r d". All Unicode whitespace counts, not
/// just ASCII space.
pub fn normalize(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_strips_spaces() {
        assert_eq!(normalize("Great  Deal!"), "greatdeal!");
    }

    #[test]
    fn strips_tabs_and_newlines() {
        assert_eq!(normalize("b a d\tw o\nr d"), "badword");
    }

    #[test]
    fn strips_unicode_whitespace() {
        // NBSP and ideographic space
        assert_eq!(normalize("bad\u{a0}word\u{3000}"), "badword");
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize(" \t\n"), "");
    }

    #[test]
    fn idempotent() {
        for sample in ["", "Hello World", "B A D word", "Уже Слышали?", "İstanbul"] {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "not idempotent for {sample:?}");
        }
    }
}
