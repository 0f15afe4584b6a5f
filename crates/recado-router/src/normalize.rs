// SPDX-FileCopyrightText: 2026 Recado Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Text normalization and tokenization.
//!
//! Pure functions with no side effects: identical input always produces
//! identical output, which the fast-path determinism tests rely on.

/// Case-fold and strip diacritics.
///
/// Spanish accented vowels fold to their base letter and `ñ` folds to `n`,
/// so keyword tables can be stored accent-free and still match sloppy or
/// fully accented input alike.
pub fn normalize(text: &str) -> String {
    text.chars()
        .flat_map(char::to_lowercase)
        .map(strip_diacritic)
        .collect()
}

fn strip_diacritic(c: char) -> char {
    match c {
        'á' | 'à' | 'ä' | 'â' => 'a',
        'é' | 'è' | 'ë' | 'ê' => 'e',
        'í' | 'ì' | 'ï' | 'î' => 'i',
        'ó' | 'ò' | 'ö' | 'ô' => 'o',
        'ú' | 'ù' | 'ü' | 'û' => 'u',
        'ñ' => 'n',
        'ç' => 'c',
        _ => c,
    }
}

/// Suffixes stripped when `stem` is requested. Small on purpose: just enough
/// to unify common verb/adverb inflections, not a real stemmer.
const STEM_SUFFIXES: &[&str] = &["mente", "iendo", "ando", "aste", "iste"];

/// Minimum characters a token must keep after suffix stripping.
const STEM_MIN_REMAINDER: usize = 3;

/// Normalize and split text into word tokens.
///
/// Splits on whitespace, trims surrounding punctuation, and drops
/// single-character tokens. With `stem`, strips a small set of common
/// verb/adverb suffixes to unify inflected forms.
pub fn tokenize(text: &str, stem: bool) -> Vec<String> {
    normalize(text)
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|w| w.chars().count() > 1)
        .map(|w| {
            if stem {
                strip_suffix(w).to_string()
            } else {
                w.to_string()
            }
        })
        .collect()
}

fn strip_suffix(word: &str) -> &str {
    for suffix in STEM_SUFFIXES {
        if let Some(stemmed) = word.strip_suffix(suffix) {
            if stemmed.chars().count() >= STEM_MIN_REMAINDER {
                return stemmed;
            }
        }
    }
    word
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_lowercases_and_strips_accents() {
        assert_eq!(normalize("Qué Hora Es"), "que hora es");
        assert_eq!(normalize("MAÑANA"), "manana");
        assert_eq!(normalize("pingüino"), "pinguino");
    }

    #[test]
    fn tokenize_splits_and_drops_short_tokens() {
        let tokens = tokenize("¿Qué hora es y a qué día estamos?", false);
        assert_eq!(tokens, vec!["que", "hora", "es", "que", "dia", "estamos"]);
    }

    #[test]
    fn tokenize_trims_punctuation() {
        let tokens = tokenize("hola, ¿recordatorios?", false);
        assert_eq!(tokens, vec!["hola", "recordatorios"]);
    }

    #[test]
    fn tokenize_with_stemming_unifies_inflections() {
        let tokens = tokenize("rápidamente caminando", true);
        assert_eq!(tokens, vec!["rapida", "camin"]);
    }

    #[test]
    fn stemming_never_leaves_a_stub() {
        // "ando" alone would stem to nothing; remainder guard keeps it whole.
        let tokens = tokenize("ando", true);
        assert_eq!(tokens, vec!["ando"]);
    }

    #[test]
    fn tokenize_is_deterministic() {
        let input = "Recuérdame llamar al médico mañana a las 9";
        assert_eq!(tokenize(input, false), tokenize(input, false));
        assert_eq!(tokenize(input, true), tokenize(input, true));
    }
}
