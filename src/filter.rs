//! Text filtering over cached shows and episodes.
//!
//! Filters never reorder: the output keeps the relative order of the input.

use crate::types::{Episode, Show};

/// A case-folded search query.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Query(String);

impl Query {
    /// Fold `text` to lowercase once so matching does not have to.
    pub fn new(text: &str) -> Self {
        Self(text.to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The empty query matches everything.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn found_in(&self, haystack: &str) -> bool {
        haystack.to_lowercase().contains(&self.0)
    }

    /// Name, summary or any genre contains the query.
    pub fn matches_show(&self, show: &Show) -> bool {
        self.is_empty()
            || self.found_in(&show.name)
            || show.summary.as_deref().is_some_and(|s| self.found_in(s))
            || show.genres.iter().any(|g| self.found_in(g))
    }

    /// Name or summary contains the query.
    pub fn matches_episode(&self, episode: &Episode) -> bool {
        self.is_empty()
            || self.found_in(&episode.name)
            || episode.summary.as_deref().is_some_and(|s| self.found_in(s))
    }
}

pub fn filter_shows<'a>(shows: &'a [Show], query: &Query) -> Vec<&'a Show> {
    shows.iter().filter(|s| query.matches_show(s)).collect()
}

pub fn filter_episodes<'a>(episodes: &'a [Episode], query: &Query) -> Vec<&'a Episode> {
    episodes.iter().filter(|e| query.matches_episode(e)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EpisodeId, Rating, ShowId};

    fn show(name: &str, summary: Option<&str>, genres: &[&str]) -> Show {
        Show {
            id: ShowId(name.len() as u64),
            name: name.to_string(),
            summary: summary.map(str::to_string),
            genres: genres.iter().map(|g| g.to_string()).collect(),
            status: String::new(),
            rating: Rating::default(),
            runtime: None,
            image: None,
        }
    }

    fn episode(name: &str, summary: Option<&str>) -> Episode {
        Episode {
            id: EpisodeId(1),
            name: name.to_string(),
            season: 1,
            number: 1,
            summary: summary.map(str::to_string),
            runtime: None,
            image: None,
        }
    }

    #[test]
    fn test_query_is_case_folded() {
        assert_eq!(Query::new("ArCh").as_str(), "arch");
    }

    #[test]
    fn test_show_matches_name_case_insensitively() {
        let s = show("Breaking Bad", None, &[]);
        assert!(Query::new("BAD").matches_show(&s));
        assert!(!Query::new("good").matches_show(&s));
    }

    #[test]
    fn test_show_matches_summary_and_genre() {
        let s = show("Lost", Some("<p>Survivors of a plane crash</p>"), &["Mystery"]);
        assert!(Query::new("plane").matches_show(&s));
        assert!(Query::new("myst").matches_show(&s));
        assert!(!Query::new("comedy").matches_show(&s));
    }

    #[test]
    fn test_missing_summary_never_matches() {
        let s = show("Lost", None, &[]);
        assert!(!Query::new("plane").matches_show(&s));
    }

    #[test]
    fn test_episode_ignores_genre_like_text() {
        let e = episode("Pilot", Some("The <b>first</b> one"));
        assert!(Query::new("first").matches_episode(&e));
        assert!(Query::new("pil").matches_episode(&e));
        assert!(!Query::new("second").matches_episode(&e));
    }

    #[test]
    fn test_filter_keeps_input_order() {
        let shows = vec![
            show("Archer", None, &[]),
            show("Breaking Bad", None, &["Crime"]),
            show("Arcane", None, &[]),
        ];
        let names: Vec<_> = filter_shows(&shows, &Query::new("ar"))
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(names, vec!["Archer", "Arcane"]);
    }

    #[test]
    fn test_empty_query_is_identity() {
        let shows = vec![show("B", None, &[]), show("A", None, &[])];
        let narrowed = filter_shows(&shows, &Query::new("a"));
        assert_eq!(narrowed.len(), 1);

        let all = filter_shows(&shows, &Query::new(""));
        assert_eq!(all, shows.iter().collect::<Vec<_>>());
    }

    #[test]
    fn test_filter_episodes() {
        let eps = vec![episode("Pilot", None), episode("Finale", Some("the end"))];
        assert_eq!(filter_episodes(&eps, &Query::new("end")).len(), 1);
        assert_eq!(filter_episodes(&eps, &Query::default()).len(), 2);
    }
}
