//! Queue name selection.
//!
//! # Design Decisions
//! - Shell-style wildcards: `*` matches any run, `?` one character
//! - Case-sensitive and anchored to the full name
//! - No pattern = always matches
//! - No regex; backtracking only over the last `*`, so matching is linear

/// Optional wildcard pattern over queue names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueuePattern {
    pattern: Option<String>,
}

impl QueuePattern {
    pub fn new(pattern: Option<impl Into<String>>) -> Self {
        Self {
            pattern: pattern.map(Into::into),
        }
    }

    /// Pattern matching every queue.
    pub fn all() -> Self {
        Self::default()
    }

    /// The pattern text, if one was given.
    pub fn as_str(&self) -> Option<&str> {
        self.pattern.as_deref()
    }

    pub fn matches(&self, name: &str) -> bool {
        match &self.pattern {
            None => true,
            Some(pattern) => wildcard_match(pattern, name),
        }
    }
}

fn wildcard_match(pattern: &str, name: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let name: Vec<char> = name.chars().collect();

    let (mut p, mut n) = (0, 0);
    // Position of the last `*` seen and the name index it is tried against.
    let mut star: Option<(usize, usize)> = None;

    while n < name.len() {
        match pattern.get(p) {
            Some('*') => {
                star = Some((p, n));
                p += 1;
            }
            Some('?') => {
                p += 1;
                n += 1;
            }
            Some(c) if *c == name[n] => {
                p += 1;
                n += 1;
            }
            _ => match star {
                Some((star_p, star_n)) => {
                    p = star_p + 1;
                    n = star_n + 1;
                    star = Some((star_p, star_n + 1));
                }
                None => return false,
            },
        }
    }

    pattern[p..].iter().all(|c| *c == '*')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pat(p: &str) -> QueuePattern {
        QueuePattern::new(Some(p))
    }

    #[test]
    fn test_prefix_star() {
        assert!(pat("ORDER_*").matches("ORDER_2024"));
        assert!(pat("ORDER_*").matches("ORDER_"));
        assert!(!pat("ORDER_*").matches("BACKLOG_ORDER"));
    }

    #[test]
    fn test_anchored_and_case_sensitive() {
        assert!(pat("orders").matches("orders"));
        assert!(!pat("orders").matches("orders.dlq"));
        assert!(!pat("orders").matches("ORDERS"));
    }

    #[test]
    fn test_question_mark_and_inner_star() {
        assert!(pat("q?").matches("q1"));
        assert!(!pat("q?").matches("q12"));
        assert!(pat("*.dlq").matches("billing.orders.dlq"));
        assert!(pat("a*b*c").matches("aXXbYYbc"));
        assert!(!pat("a*b*c").matches("aXXbYY"));
        assert!(pat("**").matches(""));
    }

    #[test]
    fn test_no_pattern_matches_everything() {
        let all = QueuePattern::all();
        assert!(all.matches("anything"));
        assert!(all.matches(""));
        assert_eq!(all.as_str(), None);
    }
}
