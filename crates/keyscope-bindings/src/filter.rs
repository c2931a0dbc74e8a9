//! Text search over the command catalog

use std::sync::{Arc, Mutex};

use nucleo::pattern::{AtomKind, CaseMatching, Normalization, Pattern};
use nucleo::{Config, Matcher, Utf32Str};
use serde::{Deserialize, Serialize};

use crate::model::Command;

/// Narrows a command list by a user-typed query
pub trait CommandFilter: Send + Sync {
    /// Filter `commands` by `query`; an empty query returns every command unchanged
    fn filter<'a>(&self, commands: &[&'a Command], query: &str) -> Vec<&'a Command>;

    /// Name used in logs
    fn name(&self) -> &'static str;
}

/// Substring containment on each command's display text
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactFilter {
    pub match_case: bool,
}

impl ExactFilter {
    pub fn new(match_case: bool) -> Self {
        ExactFilter { match_case }
    }

    fn matches(&self, text: &str, query: &str) -> bool {
        if self.match_case {
            text.contains(query)
        } else {
            text.to_lowercase().contains(&query.to_lowercase())
        }
    }
}

impl CommandFilter for ExactFilter {
    fn filter<'a>(&self, commands: &[&'a Command], query: &str) -> Vec<&'a Command> {
        if query.is_empty() {
            return commands.to_vec();
        }
        commands
            .iter()
            .copied()
            .filter(|command| self.matches(command.display_text(), query))
            .collect()
    }

    fn name(&self) -> &'static str {
        "exact"
    }
}

/// Scores how well candidate strings match a search pattern
pub trait PatternMatcher: Send + Sync {
    /// Score each of `texts` against `pattern`, in input order
    ///
    /// Higher is better; `None` means no match. The pattern is compiled once
    /// per call. `match_case` forces case-sensitive matching.
    fn score_all(&self, pattern: &str, texts: &[&str], match_case: bool) -> Vec<Option<u32>>;

    fn score(&self, pattern: &str, text: &str, match_case: bool) -> Option<u32> {
        self.score_all(pattern, &[text], match_case)
            .into_iter()
            .next()
            .flatten()
    }
}

/// Pattern matching backed by nucleo (Helix editor's fuzzy matcher)
///
/// One `Matcher` (and its scratch memory) is reused across calls.
pub struct NucleoMatcher {
    matcher: Mutex<Matcher>,
}

impl NucleoMatcher {
    pub fn new() -> Self {
        NucleoMatcher {
            matcher: Mutex::new(Matcher::new(Config::DEFAULT)),
        }
    }
}

impl Default for NucleoMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternMatcher for NucleoMatcher {
    fn score_all(&self, pattern: &str, texts: &[&str], match_case: bool) -> Vec<Option<u32>> {
        if pattern.is_empty() {
            return vec![None; texts.len()];
        }

        let case_matching = if match_case {
            CaseMatching::Respect
        } else {
            CaseMatching::Smart
        };
        let pattern = Pattern::new(pattern, case_matching, Normalization::Smart, AtomKind::Fuzzy);

        let mut matcher = self
            .matcher
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut buf = Vec::new();
        texts
            .iter()
            .map(|text| pattern.score(Utf32Str::new(text, &mut buf), &mut matcher))
            .collect()
    }
}

/// Ranks commands by a pattern matcher's score, best first
pub struct FuzzyFilter {
    matcher: Arc<dyn PatternMatcher>,
    match_case: bool,
}

impl FuzzyFilter {
    pub fn new(matcher: Arc<dyn PatternMatcher>) -> Self {
        FuzzyFilter {
            matcher,
            match_case: false,
        }
    }

    /// Require query letters to match case exactly
    pub fn with_match_case(mut self, match_case: bool) -> Self {
        self.match_case = match_case;
        self
    }
}

impl CommandFilter for FuzzyFilter {
    fn filter<'a>(&self, commands: &[&'a Command], query: &str) -> Vec<&'a Command> {
        if query.is_empty() {
            return commands.to_vec();
        }

        let texts: Vec<&str> = commands.iter().map(|command| command.display_text()).collect();
        let scores = self.matcher.score_all(query, &texts, self.match_case);

        let mut scored: Vec<(u32, &'a Command)> = commands
            .iter()
            .copied()
            .zip(scores)
            .filter_map(|(command, score)| score.map(|score| (score, command)))
            .collect();

        // Stable sort keeps catalog order among equal scores
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored.into_iter().map(|(_, command)| command).collect()
    }

    fn name(&self) -> &'static str {
        "fuzzy"
    }
}

/// Optional capability that may supply a pattern matcher
pub trait MatcherProvider {
    fn pattern_matcher(&self) -> Option<Arc<dyn PatternMatcher>>;
}

/// Always offers the built-in nucleo matcher
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinMatcherProvider;

impl MatcherProvider for BuiltinMatcherProvider {
    fn pattern_matcher(&self) -> Option<Arc<dyn PatternMatcher>> {
        Some(Arc::new(NucleoMatcher::new()))
    }
}

/// Provider for environments without any pattern-matching service
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMatcherProvider;

impl MatcherProvider for NoMatcherProvider {
    fn pattern_matcher(&self) -> Option<Arc<dyn PatternMatcher>> {
        None
    }
}

/// Search preferences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    pub match_case: bool,
    pub fuzzy: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        SearchOptions {
            match_case: false,
            fuzzy: true,
        }
    }
}

/// Chooses a filter implementation once, based on available capabilities
pub struct FilterFactory;

impl FilterFactory {
    /// Fuzzy filter when requested and a matcher is available, exact filter otherwise
    pub fn create(
        options: SearchOptions,
        provider: &dyn MatcherProvider,
    ) -> Box<dyn CommandFilter> {
        if options.fuzzy {
            match provider.pattern_matcher() {
                Some(matcher) => {
                    return Box::new(FuzzyFilter::new(matcher).with_match_case(options.match_case))
                }
                None => {
                    tracing::debug!("Pattern matcher unavailable, falling back to exact filter");
                }
            }
        }
        Box::new(ExactFilter::new(options.match_case))
    }
}
