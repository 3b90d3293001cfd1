use std::cmp::Ordering;

pub const MAX_SUGGESTIONS: usize = 5;

/// A candidate name and how closely it resembles the query (0.0 ..= 1.0).
#[derive(Debug, Clone, PartialEq)]
pub struct Rating<'a> {
    pub name: &'a str,
    pub score: f64,
}

pub fn similarity(a: &str, b: &str) -> f64 {
    strsim::sorensen_dice(&a.to_lowercase(), &b.to_lowercase())
}

/// Scores every candidate against `query` and returns the best `limit`,
/// highest first. Equal scores keep the candidates' original order.
pub fn rank<'a>(query: &str, candidates: &'a [String], limit: usize) -> Vec<Rating<'a>> {
    let mut ratings: Vec<Rating<'a>> = candidates
        .iter()
        .map(|name| Rating {
            name: name.as_str(),
            score: similarity(query, name),
        })
        .collect();

    // sort_by is stable, so ties stay in catalog order
    ratings.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    ratings.truncate(limit);
    ratings
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_closest_name_ranks_first() {
        let candidates = names(&["Gardening Weekly", "The Expanse", "Expanse Extras"]);
        let ranked = rank("the.expanse", &candidates, MAX_SUGGESTIONS);
        assert_eq!(ranked[0].name, "The Expanse");
        assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_ranking_is_limited() {
        let candidates = names(&["a1", "a2", "a3", "a4", "a5", "a6", "a7"]);
        assert_eq!(rank("a", &candidates, MAX_SUGGESTIONS).len(), 5);
        assert!(rank("a", &[], MAX_SUGGESTIONS).is_empty());
    }

    #[test]
    fn test_ties_keep_catalog_order() {
        let candidates = names(&["zzzz", "yyyy", "xxxx"]);
        let ranked = rank("abcd", &candidates, MAX_SUGGESTIONS);
        let order: Vec<_> = ranked.iter().map(|r| r.name).collect();
        assert_eq!(order, vec!["zzzz", "yyyy", "xxxx"]);
    }

    #[test]
    fn test_similarity_ignores_case() {
        assert_eq!(similarity("My Show", "my show"), 1.0);
    }
}
