//! Text normalization for keyword matching.
//!
//! Spoken text and keyword synonyms are reduced to comparable token sets:
//! lowercase, punctuation stripped, and each token expanded into its raw
//! form plus noun and verb lemmas. Running the same expansion on both sides
//! of a comparison makes the lexical tier insensitive to inflection without
//! needing a dictionary.

use std::collections::HashSet;

/// Normalize a text into a set of raw tokens and their lemmas.
///
/// Empty input yields an empty set, never an error.
pub fn normalize(text: &str) -> HashSet<String> {
    let mut tokens = HashSet::new();
    for word in clean(text).split_whitespace() {
        tokens.insert(lemmatize_noun(word));
        tokens.insert(lemmatize_verb(word));
        tokens.insert(word.to_string());
    }
    tokens
}

/// Lowercase and drop punctuation, keeping letters, digits, and whitespace.
fn clean(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect()
}

/// Split a transcript into sentences on terminal punctuation, falling back
/// to the whole text when no terminator is present.
pub fn split_sentences(text: &str) -> Vec<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    let sentences: Vec<String> = trimmed
        .split(|c| matches!(c, '.' | '!' | '?'))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if sentences.is_empty() {
        vec![trimmed.to_string()]
    } else {
        sentences
    }
}

const IRREGULAR_NOUNS: &[(&str, &str)] = &[
    ("children", "child"),
    ("feet", "foot"),
    ("geese", "goose"),
    ("men", "man"),
    ("mice", "mouse"),
    ("people", "person"),
    ("teeth", "tooth"),
    ("women", "woman"),
];

const IRREGULAR_VERBS: &[(&str, &str)] = &[
    ("am", "be"),
    ("are", "be"),
    ("began", "begin"),
    ("begun", "begin"),
    ("brought", "bring"),
    ("came", "come"),
    ("did", "do"),
    ("done", "do"),
    ("felt", "feel"),
    ("found", "find"),
    ("gave", "give"),
    ("given", "give"),
    ("gone", "go"),
    ("got", "get"),
    ("had", "have"),
    ("has", "have"),
    ("heard", "hear"),
    ("held", "hold"),
    ("is", "be"),
    ("kept", "keep"),
    ("knew", "know"),
    ("known", "know"),
    ("left", "leave"),
    ("made", "make"),
    ("meant", "mean"),
    ("met", "meet"),
    ("paid", "pay"),
    ("ran", "run"),
    ("said", "say"),
    ("saw", "see"),
    ("seen", "see"),
    ("showed", "show"),
    ("shown", "show"),
    ("spoke", "speak"),
    ("spoken", "speak"),
    ("stood", "stand"),
    ("taken", "take"),
    ("thought", "think"),
    ("told", "tell"),
    ("took", "take"),
    ("was", "be"),
    ("went", "go"),
    ("were", "be"),
    ("wrote", "write"),
];

fn lemmatize_noun(word: &str) -> String {
    if let Ok(idx) = IRREGULAR_NOUNS.binary_search_by_key(&word, |&(form, _)| form) {
        return IRREGULAR_NOUNS[idx].1.to_string();
    }
    strip_plural(word)
}

fn lemmatize_verb(word: &str) -> String {
    if let Ok(idx) = IRREGULAR_VERBS.binary_search_by_key(&word, |&(form, _)| form) {
        return IRREGULAR_VERBS[idx].1.to_string();
    }
    if let Some(stem) = word.strip_suffix("ing") {
        if stem.len() >= 2 {
            return undouble(stem);
        }
    }
    if let Some(stem) = word.strip_suffix("ed") {
        if stem.len() >= 2 {
            return undouble(stem);
        }
    }
    strip_plural(word)
}

/// Reverse regular plural / third-person endings.
fn strip_plural(word: &str) -> String {
    if let Some(stem) = word.strip_suffix("ies") {
        if stem.len() >= 2 {
            return format!("{}y", stem);
        }
    }
    for suffix in ["ches", "shes", "sses", "xes", "zes"] {
        if let Some(stem) = word.strip_suffix(suffix) {
            return format!("{}{}", stem, &suffix[..suffix.len() - 2]);
        }
    }
    if let Some(stem) = word.strip_suffix('s') {
        if !stem.is_empty() && !stem.ends_with('s') && !stem.ends_with('u') {
            return stem.to_string();
        }
    }
    word.to_string()
}

/// Clean up a stem after stripping -ing/-ed: collapse the doubled final
/// consonant ("running" -> "run") or restore a dropped final 'e'
/// ("making" -> "make").
fn undouble(stem: &str) -> String {
    let chars: Vec<char> = stem.chars().collect();
    let n = chars.len();
    if n >= 3 {
        let last = chars[n - 1];
        if last == chars[n - 2] && is_consonant(last) && !matches!(last, 'l' | 's' | 'z') {
            return chars[..n - 1].iter().collect();
        }
        // consonant-vowel-consonant ending usually came from an -e verb
        if is_consonant(chars[n - 1])
            && !matches!(chars[n - 1], 'w' | 'x' | 'y')
            && !is_consonant(chars[n - 2])
            && is_consonant(chars[n - 3])
        {
            return format!("{}e", stem);
        }
    }
    stem.to_string()
}

fn is_consonant(c: char) -> bool {
    c.is_ascii_alphabetic() && !matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_yields_empty_set() {
        assert!(normalize("").is_empty());
        assert!(normalize("   \n").is_empty());
    }

    #[test]
    fn strips_punctuation_and_lowercases() {
        let tokens = normalize("Hello, World!");
        assert!(tokens.contains("hello"));
        assert!(tokens.contains("world"));
    }

    #[test]
    fn plural_and_singular_intersect() {
        let spoken = normalize("the plants are growing");
        let keyword = normalize("plant");
        assert!(!spoken.is_disjoint(&keyword));
    }

    #[test]
    fn inflected_verbs_intersect() {
        // Both sides run the same expansion, so "making" and "make" meet at
        // the shared verb lemma.
        assert!(!normalize("making").is_disjoint(&normalize("make")));
        assert!(!normalize("running").is_disjoint(&normalize("run")));
        assert!(!normalize("explained").is_disjoint(&normalize("explain")));
    }

    #[test]
    fn irregular_forms_map_to_base() {
        assert!(!normalize("went").is_disjoint(&normalize("go")));
        assert!(!normalize("children").is_disjoint(&normalize("child")));
    }

    #[test]
    fn raw_token_is_always_kept() {
        let tokens = normalize("photosynthesis");
        assert!(tokens.contains("photosynthesis"));
    }

    #[test]
    fn sentence_split_on_terminators() {
        let sentences = split_sentences("First point. Second point! Third?");
        assert_eq!(sentences, vec!["First point", "Second point", "Third"]);
    }

    #[test]
    fn sentence_split_falls_back_to_whole_text() {
        let sentences = split_sentences("no terminator here");
        assert_eq!(sentences, vec!["no terminator here"]);
        assert!(split_sentences("  ").is_empty());
    }

    #[test]
    fn irregular_tables_are_sorted_for_binary_search() {
        for table in [IRREGULAR_NOUNS, IRREGULAR_VERBS] {
            for pair in table.windows(2) {
                assert!(pair[0].0 < pair[1].0, "{} >= {}", pair[0].0, pair[1].0);
            }
        }
    }
}
