use unicode_normalization::UnicodeNormalization;

/// Punctuation dropped during normalization: quotes, sentence punctuation,
/// currency/percent signs, brackets, connectors, spacing accent marks, and
/// the inverted Spanish marks.
const STRIPPED_PUNCTUATION: &[char] = &[
    '\'', '"', '.', ',', '/', '#', '!', '$', '%', '^', '&', '*', ';', ':', '{', '}', '=', '-',
    '_', '`', '´', 'ˆ', '˜', '¨', '~', '(', ')', '¡', '¿', '?',
];

fn is_combining_diacritic(ch: char) -> bool {
    ('\u{0300}'..='\u{036F}').contains(&ch)
}

/// Canonicalize a string for answer comparison.
///
/// Steps, in order: decompose accented characters (NFD), drop the combining
/// diacritics, map line breaks to spaces, drop the punctuation set, collapse
/// runs of two-or-more whitespace characters to a single space, trim, and
/// lowercase. Diacritic stripping has to happen before punctuation stripping:
/// decomposition can introduce characters the punctuation filter would
/// otherwise mis-handle.
pub fn normalize(text: &str) -> String {
    let mut folded = String::with_capacity(text.len());
    for ch in text.nfd() {
        if is_combining_diacritic(ch) {
            continue;
        }
        if ch == '\n' || ch == '\r' {
            folded.push(' ');
            continue;
        }
        if STRIPPED_PUNCTUATION.contains(&ch) {
            continue;
        }
        folded.push(ch);
    }

    let mut collapsed = String::with_capacity(folded.len());
    let mut chars = folded.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch.is_whitespace() && chars.peek().is_some_and(|next| next.is_whitespace()) {
            while chars.peek().is_some_and(|next| next.is_whitespace()) {
                chars.next();
            }
            collapsed.push(' ');
        } else {
            collapsed.push(ch);
        }
    }

    collapsed.trim().to_lowercase()
}
