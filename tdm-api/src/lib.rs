use chrono::Utc;

pub type Time = chrono::DateTime<Utc>;

mod comment;
pub use comment::{Comment, CommentId, CommentTag};

mod disaster;
pub use disaster::{Disaster, DisasterId, DisasterKind, Location, NewDisaster, StoryLink};

mod error;
pub use error::{Error, Target};

mod search;
pub use search::{Perspective, RealStory, StorySearch, StorySearchResult};

mod user;
pub use user::{RegisteredAccount, SessionUser};

/// Lowercases `s` and strips everything that is not alphanumeric
fn normalize_variant(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(|c| c.to_lowercase())
        .collect()
}
