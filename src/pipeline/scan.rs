//! Equation scanning: find delimited LaTeX spans in free-form text.
//!
//! Five delimiter conventions are recognised concurrently. Each convention is
//! matched independently over the whole text with a non-greedy body that may
//! span newlines; the resulting pools are merged and stably sorted by span
//! start. The scanner deliberately does NOT de-duplicate overlapping spans:
//! a `$..$` nested inside a `$$..$$` yields two matches, both kept.
//! First-match-wins is not enforced. Downstream composition pairs images to
//! matches by identity (see [`crate::output::EquationRender`]), so
//! overlapping spans degrade output aesthetics, never correctness of pairing.
//!
//! Scanning is a pure function over the input string: deterministic,
//! side-effect-free, and infallible (empty input yields an empty list).

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// One recognised equation span, including its delimiters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EquationMatch {
    /// Byte offset of the first delimiter character in the original text.
    pub start: usize,
    /// Byte offset one past the last delimiter character.
    pub end: usize,
    /// Delimiter-stripped body with newlines collapsed to spaces and
    /// surrounding whitespace trimmed. Never empty.
    pub equation: String,
    /// Whether the convention carries display (block) intent rather than
    /// inline intent. Carried through to consumers; does not change how the
    /// equation is rasterised.
    pub is_display: bool,
    /// The full delimited span exactly as it appears in the input.
    pub raw_span: String,
}

/// The five delimiter conventions, each paired with its display intent.
///
/// Order here is irrelevant to output: all pools are merged and re-sorted.
/// `(?s)` makes `.` match newlines; `.*?` keeps bodies non-greedy so two
/// adjacent `$..$` spans do not fuse into one.
static CONVENTIONS: Lazy<[(Regex, bool); 5]> = Lazy::new(|| {
    [
        (Regex::new(r"(?s)\\\[(.*?)\\\]").unwrap(), true),
        (Regex::new(r"(?s)\\\((.*?)\\\)").unwrap(), false),
        (Regex::new(r"(?s)\$\$(.*?)\$\$").unwrap(), true),
        (Regex::new(r"(?s)\$(.*?)\$").unwrap(), false),
        (
            Regex::new(r"(?s)\\begin\{equation\}(.*?)\\end\{equation\}").unwrap(),
            true,
        ),
    ]
});

/// Scan `text` for equation spans across all five conventions.
///
/// Returns matches sorted ascending by `start` (stable, so equal starts keep
/// convention order). Whitespace-only bodies are dropped before sorting.
/// Overlapping matches from different conventions are all retained.
pub fn scan(text: &str) -> Vec<EquationMatch> {
    if text.is_empty() {
        return Vec::new();
    }

    let mut matches: Vec<EquationMatch> = Vec::new();
    for (pattern, is_display) in CONVENTIONS.iter() {
        for caps in pattern.captures_iter(text) {
            let whole = caps.get(0).expect("group 0 always present");
            let body = caps.get(1).map(|m| m.as_str()).unwrap_or("");
            let equation = normalize_body(body);
            if equation.is_empty() {
                continue;
            }
            matches.push(EquationMatch {
                start: whole.start(),
                end: whole.end(),
                equation,
                is_display: *is_display,
                raw_span: whole.as_str().to_string(),
            });
        }
    }

    matches.sort_by_key(|m| m.start);
    matches
}

/// Collapse newlines to spaces and trim, matching how equation bodies are
/// normalised before they reach a backend.
fn normalize_body(body: &str) -> String {
    body.trim().replace('\n', " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_no_matches() {
        assert!(scan("").is_empty());
    }

    #[test]
    fn text_without_delimiters_yields_no_matches() {
        assert!(scan("plain prose with no math at all").is_empty());
        assert!(scan("price is 5 dollars and 10 cents").is_empty());
    }

    #[test]
    fn recognises_all_five_conventions() {
        let text = r"a \[d1\] b \(i1\) c $$d2$$ d $i2$ e \begin{equation}d3\end{equation} f";
        let matches = scan(text);
        // $$d2$$ also matches the single-dollar convention (empty body "$ d $"
        // variants aside); count the conventions that must be present.
        let bodies: Vec<&str> = matches.iter().map(|m| m.equation.as_str()).collect();
        assert!(bodies.contains(&"d1"));
        assert!(bodies.contains(&"i1"));
        assert!(bodies.contains(&"d2"));
        assert!(bodies.contains(&"i2"));
        assert!(bodies.contains(&"d3"));
    }

    #[test]
    fn display_flags_per_convention() {
        assert!(scan(r"\[x\]")[0].is_display);
        assert!(!scan(r"\(x\)")[0].is_display);
        assert!(scan(r"\begin{equation}x\end{equation}")[0].is_display);
        let inline = scan("$x$");
        assert_eq!(inline.len(), 1);
        assert!(!inline[0].is_display);
    }

    #[test]
    fn round_trip_two_matches_ordered() {
        let matches = scan(r"See \(x^2\) and \[y^2\]");
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].equation, "x^2");
        assert_eq!(matches[1].equation, "y^2");
        assert!(matches[0].start < matches[0].end);
        assert!(matches[1].start < matches[1].end);
        assert!(matches[0].start < matches[1].start);
        assert!(!matches[0].is_display);
        assert!(matches[1].is_display);
    }

    #[test]
    fn spans_include_delimiters() {
        let text = r"pre \(a+b\) post";
        let m = &scan(text)[0];
        assert_eq!(&text[m.start..m.end], r"\(a+b\)");
        assert_eq!(m.raw_span, r"\(a+b\)");
    }

    #[test]
    fn whitespace_only_body_dropped() {
        assert!(scan(r"\[   \]").is_empty());
        assert!(scan("$ \n $").is_empty());
        assert!(scan(r"\begin{equation}  \end{equation}").is_empty());
    }

    #[test]
    fn multiline_body_collapsed_to_spaces() {
        let matches = scan("\\[\nx^2\n- 36\n\\]");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].equation, "x^2 - 36");
    }

    #[test]
    fn nested_dollar_overlap_is_preserved() {
        // The $..$ convention finds a span inside the $$..$$ span; both are
        // kept and sorted by start, per the documented overlap policy.
        let matches = scan("$$a$b$$");
        assert_eq!(matches.len(), 2);
        let display = matches.iter().find(|m| m.is_display).unwrap();
        let inline = matches.iter().find(|m| !m.is_display).unwrap();
        assert_eq!(display.equation, "a$b");
        assert_eq!(inline.equation, "b");
        assert!(display.start <= inline.start && inline.end <= display.end);
        for w in matches.windows(2) {
            assert!(w[0].start <= w[1].start);
        }
    }

    #[test]
    fn plain_double_dollar_yields_single_display_match() {
        // $..$ over "$$a+b$$" only sees the two empty "$$" pairs, which are
        // dropped, so no spurious inline match appears.
        let matches = scan("$$a+b$$");
        assert_eq!(matches.len(), 1);
        assert!(matches[0].is_display);
        assert_eq!(matches[0].equation, "a+b");
    }

    #[test]
    fn sort_is_by_start_across_conventions() {
        let text = r"$late$ comes after \[early\] in convention order but not in text";
        let matches = scan(text);
        assert_eq!(matches[0].equation, "late");
        assert_eq!(matches[1].equation, "early");
        for w in matches.windows(2) {
            assert!(w[0].start <= w[1].start);
        }
    }

    #[test]
    fn adjacent_inline_spans_do_not_fuse() {
        let matches = scan("$a$ and $b$");
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].equation, "a");
        assert_eq!(matches[1].equation, "b");
    }

    #[test]
    fn scan_is_deterministic() {
        let text = r"mix $i$ and \[d\] and $$dd$$";
        assert_eq!(scan(text), scan(text));
    }
}
