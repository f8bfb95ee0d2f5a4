use std::{collections::HashSet, fmt, str::FromStr};

use anyhow::anyhow;
use async_trait::async_trait;

#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    Hash,
    PartialEq,
    bolero::generator::TypeGenerator,
    serde::Deserialize,
    serde::Serialize,
)]
pub enum Perspective {
    Survivor,
    Rescuer,
    Journalist,
    Family,
}

impl Perspective {
    pub const ALL: [Perspective; 4] = [
        Perspective::Survivor,
        Perspective::Rescuer,
        Perspective::Journalist,
        Perspective::Family,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Perspective::Survivor => "survivor",
            Perspective::Rescuer => "rescuer",
            Perspective::Journalist => "journalist",
            Perspective::Family => "family",
        }
    }
}

impl fmt::Display for Perspective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Perspective {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Perspective> {
        let wanted = crate::normalize_variant(s);
        Perspective::ALL
            .into_iter()
            .find(|p| p.name() == wanted)
            .ok_or_else(|| anyhow!("unknown perspective {s:?}"))
    }
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct RealStory {
    pub uri: String,
    pub title: String,
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct StorySearchResult {
    pub summary: String,
    pub stories: Vec<RealStory>,
}

impl StorySearchResult {
    /// What to show when the search backend failed
    pub fn unavailable() -> StorySearchResult {
        StorySearchResult {
            summary: String::from(
                "Sorry, an error occurred while searching for related stories. Please try again later.",
            ),
            stories: Vec::new(),
        }
    }

    /// Drops stories without an uri, and all but the first story for each uri
    pub fn dedup_by_uri(mut self) -> StorySearchResult {
        let mut seen = HashSet::new();
        self.stories
            .retain(|s| !s.uri.is_empty() && seen.insert(s.uri.clone()));
        self
    }
}

/// External service finding real-world stories about a disaster
///
/// Only the UI layer talks to it: the core never depends on a search
/// succeeding.
#[async_trait]
pub trait StorySearch {
    async fn search_stories(
        &self,
        disaster_name: &str,
        perspective: Perspective,
    ) -> anyhow::Result<StorySearchResult>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn story(uri: &str, title: &str) -> RealStory {
        RealStory {
            uri: uri.to_string(),
            title: title.to_string(),
        }
    }

    #[test]
    fn dedup_keeps_first_per_uri() {
        let res = StorySearchResult {
            summary: String::from("s"),
            stories: vec![
                story("https://a.test", "first"),
                story("", "no uri"),
                story("https://b.test", "b"),
                story("https://a.test", "second"),
            ],
        }
        .dedup_by_uri();
        assert_eq!(
            res.stories,
            vec![story("https://a.test", "first"), story("https://b.test", "b")],
        );
    }

    #[test]
    fn perspective_parsing() {
        assert_eq!("Rescuer".parse::<Perspective>().unwrap(), Perspective::Rescuer);
        assert!("bystander".parse::<Perspective>().is_err());
    }
}
