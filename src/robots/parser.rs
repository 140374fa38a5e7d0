//! Minimal robots.txt parser
//!
//! Only `Disallow:` lines are read. User-agent groups, `Allow:`, wildcards
//! and crawl delays are ignored, so every rule applies to every crawler and
//! matching is a plain path-prefix test.

/// Disallowed path prefixes for one origin
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RobotsPolicy {
    disallow: Vec<String>,
}

impl RobotsPolicy {
    /// Creates a permissive policy that disallows nothing
    ///
    /// This is used when robots.txt cannot be fetched.
    pub fn allow_all() -> Self {
        Self::default()
    }

    /// Parses raw robots.txt content
    ///
    /// A line counts when, after leading whitespace, it starts with
    /// `disallow:` in any letter case. The rest of the line, trimmed, is the
    /// rule. Empty rules are dropped: a bare `Disallow:` allows everything.
    ///
    /// # Example
    ///
    /// ```
    /// use prospector::robots::RobotsPolicy;
    ///
    /// let policy = RobotsPolicy::parse("User-agent: *\nDisallow: /private\n");
    /// assert!(policy.is_disallowed("/private/staff"));
    /// assert!(!policy.is_disallowed("/contact"));
    /// ```
    pub fn parse(content: &str) -> Self {
        const DIRECTIVE: &str = "disallow:";

        let disallow = content
            .lines()
            .filter_map(|line| {
                let line = line.trim_start();
                let head = line.get(..DIRECTIVE.len())?;
                if !head.eq_ignore_ascii_case(DIRECTIVE) {
                    return None;
                }
                let rule = line[DIRECTIVE.len()..].trim();
                (!rule.is_empty()).then(|| rule.to_string())
            })
            .collect();

        Self { disallow }
    }

    /// Returns true iff `path` starts with at least one rule prefix
    pub fn is_disallowed(&self, path: &str) -> bool {
        self.disallow.iter().any(|rule| path.starts_with(rule.as_str()))
    }

    /// The parsed rules, in file order
    pub fn rules(&self) -> &[String] {
        &self.disallow
    }

    pub fn is_empty(&self) -> bool {
        self.disallow.is_empty()
    }
}
