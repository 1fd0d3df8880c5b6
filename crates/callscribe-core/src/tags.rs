//! Tag sanitization for transcription metadata
//!
//! Operators attach free-form tags while transcribing. Input is messy, so
//! every candidate is normalized and anything that fails the rules is
//! dropped silently rather than bounced back as an error.

/// Minimum tag length after normalization
pub const MIN_TAG_LEN: usize = 2;

/// Maximum tag length after normalization
pub const MAX_TAG_LEN: usize = 30;

fn is_tag_char(c: char) -> bool {
    c.is_alphabetic() || c.is_ascii_digit() || c == ' ' || c == '-'
}

/// Normalize a single tag candidate
///
/// Trims and lowercases, then rejects candidates outside the 2 to 30
/// character range, containing anything besides letters (accented
/// included), digits, spaces and hyphens, or already present in
/// `existing`. Returns the normalized tag when it passes.
#[must_use]
pub fn sanitize_tag(raw: &str, existing: &[String]) -> Option<String> {
    let tag = raw.trim().to_lowercase();

    let len = tag.chars().count();
    if !(MIN_TAG_LEN..=MAX_TAG_LEN).contains(&len) {
        return None;
    }
    if !tag.chars().all(is_tag_char) {
        return None;
    }
    if existing.iter().any(|e| e == &tag) {
        return None;
    }

    Some(tag)
}

/// Sanitize a batch of tag candidates
///
/// Applies [`sanitize_tag`] to each candidate, deduplicating against both
/// `existing` and earlier accepted entries. Invalid candidates are dropped
/// without error; order of the survivors follows the input.
#[must_use]
pub fn sanitize_tags(raws: &[String], existing: &[String]) -> Vec<String> {
    let mut accepted: Vec<String> = Vec::new();
    for raw in raws {
        if let Some(tag) = sanitize_tag(raw, existing)
            && !accepted.contains(&tag)
        {
            accepted.push(tag);
        }
    }
    accepted
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, clippy::uninlined_format_args)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn strings(raw: &[&str]) -> Vec<String> {
        raw.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_sanitize_tag_trims_and_lowercases() {
        assert_eq!(
            sanitize_tag("  Cobrança  ", &[]),
            Some("cobrança".to_string())
        );
    }

    #[test]
    fn test_sanitize_tag_accepts_digits_spaces_hyphens() {
        assert_eq!(
            sanitize_tag("2a via - boleto", &[]),
            Some("2a via - boleto".to_string())
        );
    }

    #[test]
    fn test_sanitize_tag_rejects_too_short() {
        assert_eq!(sanitize_tag("a", &[]), None);
        assert_eq!(sanitize_tag(" x ", &[]), None);
    }

    #[test]
    fn test_sanitize_tag_rejects_too_long() {
        let long = "a".repeat(31);
        assert_eq!(sanitize_tag(&long, &[]), None);

        let max = "a".repeat(30);
        assert_eq!(sanitize_tag(&max, &[]), Some(max));
    }

    #[test]
    fn test_sanitize_tag_counts_accented_chars_once() {
        // 30 accented letters stay within the limit even though the UTF-8
        // byte length is 60.
        let accented = "á".repeat(30);
        assert_eq!(sanitize_tag(&accented, &[]), Some(accented));
    }

    #[test]
    fn test_sanitize_tag_rejects_punctuation() {
        assert_eq!(sanitize_tag("tag!", &[]), None);
        assert_eq!(sanitize_tag("tag_um", &[]), None);
        assert_eq!(sanitize_tag("tag@home", &[]), None);
    }

    #[test]
    fn test_sanitize_tag_rejects_duplicate_after_normalization() {
        let existing = strings(&["urgente"]);
        assert_eq!(sanitize_tag("  URGENTE ", &existing), None);
    }

    #[test]
    fn test_sanitize_tags_drops_invalid_silently() {
        let raws = strings(&["  Valid Tag ", "!", "x", "outra"]);
        let result = sanitize_tags(&raws, &[]);
        assert_eq!(result, strings(&["valid tag", "outra"]));
    }

    #[test]
    fn test_sanitize_tags_dedupes_within_batch() {
        let raws = strings(&["Suporte", "suporte", " SUPORTE "]);
        let result = sanitize_tags(&raws, &[]);
        assert_eq!(result, strings(&["suporte"]));
    }

    #[test]
    fn test_sanitize_tags_dedupes_against_existing() {
        let raws = strings(&["novo", "urgente"]);
        let existing = strings(&["urgente"]);
        let result = sanitize_tags(&raws, &existing);
        assert_eq!(result, strings(&["novo"]));
    }

    #[test]
    fn test_sanitize_tags_empty_input() {
        assert_eq!(sanitize_tags(&[], &[]), Vec::<String>::new());
    }

    proptest! {
        #[test]
        fn prop_accepted_tags_are_normalized(raw in "[A-Za-z0-9 -]{0,40}") {
            if let Some(tag) = sanitize_tag(&raw, &[]) {
                prop_assert_eq!(tag.trim(), tag.as_str());
                prop_assert_eq!(tag.to_lowercase(), tag.clone());
                let len = tag.chars().count();
                prop_assert!((MIN_TAG_LEN..=MAX_TAG_LEN).contains(&len));
            }
        }

        #[test]
        fn prop_sanitize_tags_never_duplicates(raws in proptest::collection::vec("[A-Za-z]{1,10}", 0..20)) {
            let result = sanitize_tags(&raws, &[]);
            let mut sorted = result.clone();
            sorted.sort();
            sorted.dedup();
            prop_assert_eq!(sorted.len(), result.len());
        }
    }
}
