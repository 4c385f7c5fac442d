use std::collections::HashSet;

use nucleo_matcher::pattern::{AtomKind, CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Matcher, Utf32String};

use crate::codebase::DeclarationIndex;
use crate::types::{Declaration, ScoredDeclaration};

const EXACT_SCORE: u32 = 100;
const PREFIX_SCORE: u32 = 80;
const CONTAINS_SCORE: u32 = 60;
const EDIT_BASE: u32 = 40;
const EDIT_STEP: u32 = 10;
const TRIGRAM_BASE: u32 = 20;
const TRIGRAM_RANGE: u32 = 20;
const SUBSEQUENCE_SCORE: u32 = 10;
const DOCS_BONUS: u32 = 15;
const SIGNATURE_BONUS: u32 = 10;

/// Ranks declarations against a query. Holds the nucleo matcher scratch space,
/// so one instance serves one search at a time.
pub struct FuzzyMatcher {
    matcher: Matcher,
}

impl Default for FuzzyMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl FuzzyMatcher {
    pub fn new() -> Self {
        Self {
            matcher: Matcher::new(nucleo_matcher::Config::DEFAULT),
        }
    }

    /// Up to `limit` declarations ranked by descending score, ties in index order.
    pub fn search<'a>(
        &mut self,
        index: &'a DeclarationIndex,
        query: &str,
        limit: usize,
    ) -> Vec<ScoredDeclaration<'a>> {
        let Some(query) = Query::new(query) else {
            return Vec::new();
        };
        if limit == 0 {
            return Vec::new();
        }

        let mut scored: Vec<ScoredDeclaration<'a>> = index
            .all()
            .iter()
            .filter_map(|declaration| {
                let score = self.score(&query, declaration);
                (score > 0).then_some(ScoredDeclaration { declaration, score })
            })
            .collect();

        scored.sort_by(|a, b| b.score.cmp(&a.score));
        scored.truncate(limit);
        scored
    }

    fn score(&mut self, query: &Query, declaration: &Declaration) -> u32 {
        let mut score = self.name_score(query, &declaration.name.to_lowercase());

        if declaration
            .docs
            .as_ref()
            .is_some_and(|docs| docs.to_lowercase().contains(&query.text))
        {
            score += DOCS_BONUS;
        }
        if declaration.signature.to_lowercase().contains(&query.text) {
            score += SIGNATURE_BONUS;
        }

        score
    }

    fn name_score(&mut self, query: &Query, name: &str) -> u32 {
        let q = query.text.as_str();
        if name == q {
            return EXACT_SCORE;
        }
        if name.starts_with(q) {
            return PREFIX_SCORE;
        }
        if name.contains(q) {
            return CONTAINS_SCORE;
        }

        let bound = (query.len / 3).max(1);
        let edit = match bounded_levenshtein(name, q, bound) {
            Some(distance) => EDIT_BASE.saturating_sub(EDIT_STEP * distance as u32),
            None => 0,
        };

        let trigram = if query.trigrams.is_empty() {
            0
        } else {
            let name_trigrams = trigrams(name);
            let shared = query
                .trigrams
                .iter()
                .filter(|t| name_trigrams.contains(*t))
                .count() as u32;
            if shared == 0 {
                0
            } else {
                TRIGRAM_BASE + TRIGRAM_RANGE * shared / query.trigrams.len() as u32
            }
        };

        let haystack = Utf32String::from(name);
        let subsequence = match query.pattern.score(haystack.slice(..), &mut self.matcher) {
            Some(_) => SUBSEQUENCE_SCORE,
            None => 0,
        };

        edit.max(trigram).max(subsequence)
    }
}

struct Query {
    text: String,
    len: usize,
    trigrams: HashSet<String>,
    pattern: Pattern,
}

impl Query {
    fn new(raw: &str) -> Option<Self> {
        let text = raw.trim().to_lowercase();
        if text.is_empty() {
            return None;
        }
        let pattern = Pattern::new(
            &text,
            CaseMatching::Ignore,
            Normalization::Smart,
            AtomKind::Fuzzy,
        );
        Some(Self {
            len: text.chars().count(),
            trigrams: trigrams(&text),
            pattern,
            text,
        })
    }
}

fn trigrams(text: &str) -> HashSet<String> {
    let chars: Vec<char> = text.chars().collect();
    chars.windows(3).map(|w| w.iter().collect()).collect()
}

/// Levenshtein distance over chars, or `None` once it must exceed `bound`.
pub fn bounded_levenshtein(a: &str, b: &str, bound: usize) -> Option<usize> {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.len().abs_diff(b.len()) > bound {
        return None;
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        let mut row_min = curr[0];
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(curr[j] + 1);
            row_min = row_min.min(curr[j + 1]);
        }
        if row_min > bound {
            return None;
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    let distance = prev[b.len()];
    (distance <= bound).then_some(distance)
}
