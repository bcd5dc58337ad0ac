//! Excel-style wildcard patterns used by the reference host's exact search.

/// One pattern position: a literal (already case-folded) or `?`.
type Slot = Option<char>;

/// A case-insensitive pattern where `*` matches any run of characters, `?` matches exactly one
/// character and `~` escapes the next `*`, `?` or `~`.
///
/// The pattern is kept as the runs between stars. Without a star there is exactly one run, and
/// it has to cover the whole text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WildcardPattern {
    runs: Vec<Vec<Slot>>,
    has_qmark: bool,
}

impl WildcardPattern {
    pub fn new(pattern: &str) -> Self {
        let mut runs = Vec::new();
        let mut run: Vec<Slot> = Vec::new();
        let mut has_qmark = false;
        let mut chars = pattern.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '*' => runs.push(std::mem::take(&mut run)),
                '?' => {
                    has_qmark = true;
                    run.push(None);
                }
                // A stray or trailing `~` is literal.
                '~' if matches!(chars.peek(), Some('*' | '?' | '~')) => {
                    if let Some(escaped) = chars.next() {
                        run.push(Some(escaped));
                    }
                }
                other => run.extend(other.to_uppercase().map(Some)),
            }
        }
        runs.push(run);
        Self { runs, has_qmark }
    }

    pub fn has_wildcards(&self) -> bool {
        self.has_qmark || self.runs.len() > 1
    }

    pub fn matches(&self, text: &str) -> bool {
        let text: Vec<char> = fold(text).collect();
        let (first, rest) = match self.runs.split_first() {
            Some(split) => split,
            None => return text.is_empty(),
        };
        let Some((last, middle)) = rest.split_last() else {
            return run_matches(first, &text);
        };

        if text.len() < first.len() + last.len() {
            return false;
        }
        let (head, tail) = text.split_at(first.len());
        let (mut inner, suffix) = tail.split_at(tail.len() - last.len());
        if !run_matches(first, head) || !run_matches(last, suffix) {
            return false;
        }

        // Between the anchored ends, taking each run at its leftmost fit never loses a match.
        for run in middle.iter().filter(|run| !run.is_empty()) {
            let Some(at) = inner.windows(run.len()).position(|w| run_matches(run, w)) else {
                return false;
            };
            inner = &inner[at + run.len()..];
        }
        true
    }
}

/// Uppercases like Excel's case-insensitive comparisons, so `ß` folds to `SS`.
pub(crate) fn fold(text: &str) -> impl Iterator<Item = char> + '_ {
    text.chars().flat_map(char::to_uppercase)
}

fn run_matches(run: &[Slot], text: &[char]) -> bool {
    run.len() == text.len()
        && run
            .iter()
            .zip(text)
            .all(|(slot, c)| slot.map_or(true, |lit| lit == *c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_patterns_compare_whole_text_ignoring_case() {
        let pat = WildcardPattern::new("Total");
        assert!(!pat.has_wildcards());
        assert!(pat.matches("TOTAL"));
        assert!(pat.matches("total"));
        assert!(!pat.matches("totals"));
        assert!(WildcardPattern::new("").matches(""));
    }

    #[test]
    fn stars_and_question_marks() {
        let pat = WildcardPattern::new("q?-*-x*");
        assert!(pat.has_wildcards());
        assert!(pat.matches("Q1-north-X"));
        assert!(pat.matches("q4--xyz"));
        assert!(!pat.matches("q-north-x"));
        assert!(!pat.matches("q1-x"));
        assert!(WildcardPattern::new("*").matches(""));
        assert!(WildcardPattern::new("*a*a").matches("banana"));
        assert!(!WildcardPattern::new("*a*ab").matches("banana"));
    }

    #[test]
    fn folding_expands_sharp_s() {
        let pat = WildcardPattern::new("fuß*");
        assert!(pat.matches("FUSSBALL"));
        assert!(!pat.matches("FUS"));
    }

    #[test]
    fn tilde_escapes_operators() {
        let pat = WildcardPattern::new("50~%~?");
        assert!(!pat.has_wildcards());
        assert!(pat.matches("50~%?"));
        assert!(!pat.matches("50~%x"));
        assert!(WildcardPattern::new("~*").matches("*"));
        assert!(!WildcardPattern::new("~*").matches("x"));
        assert!(WildcardPattern::new("~~").matches("~"));
        assert!(WildcardPattern::new("end~").matches("END~"));
    }
}
