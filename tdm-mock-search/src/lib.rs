use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
use tdm_api::{Perspective, RealStory, StorySearch, StorySearchResult};

/// Offline stand-in for the story-search service
///
/// Answers every query with a simulated summary and placeholder links.
#[derive(Clone, Debug)]
pub struct MockStorySearch {
    delay: Duration,
    fail: bool,
}

impl Default for MockStorySearch {
    fn default() -> MockStorySearch {
        MockStorySearch::new()
    }
}

impl MockStorySearch {
    pub fn new() -> MockStorySearch {
        MockStorySearch {
            delay: Duration::from_millis(1500),
            fail: false,
        }
    }

    /// How long each search pretends to take
    pub fn with_delay(mut self, delay: Duration) -> MockStorySearch {
        self.delay = delay;
        self
    }

    /// Make every search fail, to exercise the caller's fallback
    pub fn failing(mut self) -> MockStorySearch {
        self.fail = true;
        self
    }
}

#[async_trait]
impl StorySearch for MockStorySearch {
    async fn search_stories(
        &self,
        disaster_name: &str,
        perspective: Perspective,
    ) -> anyhow::Result<StorySearchResult> {
        tracing::debug!(disaster_name, %perspective, "mock story search");
        tokio::time::sleep(self.delay).await;
        if self.fail {
            return Err(anyhow!("mock story search configured to fail"));
        }
        let story = |title: String| RealStory {
            uri: String::from("#"),
            title,
        };
        Ok(StorySearchResult {
            summary: format!(
                "Simulated search about {disaster_name:?} from the {perspective} perspective. \
                 Real reports recorded the shock of the disaster and how people helped each \
                 other rebuild."
            ),
            stories: vec![
                story(format!("[mock] {disaster_name}: {perspective} interviews")),
                story(format!("[mock] Back to {disaster_name}, ten years later")),
                story(format!("[mock] Front line: a {perspective}'s account")),
            ],
        })
    }
}
