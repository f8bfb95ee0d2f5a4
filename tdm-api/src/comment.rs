use std::{fmt, str::FromStr};

use anyhow::anyhow;

#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    serde::Deserialize,
    serde::Serialize,
)]
#[serde(transparent)]
pub struct CommentId(pub i64);

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

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
pub enum CommentTag {
    Reflection,
    Experience,
    Suggestion,
}

impl CommentTag {
    pub const ALL: [CommentTag; 3] = [
        CommentTag::Reflection,
        CommentTag::Experience,
        CommentTag::Suggestion,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CommentTag::Reflection => "reflection",
            CommentTag::Experience => "experience",
            CommentTag::Suggestion => "suggestion",
        }
    }
}

impl fmt::Display for CommentTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CommentTag {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<CommentTag> {
        let wanted = crate::normalize_variant(s);
        CommentTag::ALL
            .into_iter()
            .find(|t| t.name() == wanted)
            .ok_or_else(|| anyhow!("unknown comment tag {s:?}"))
    }
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Derived from the creation time, unique in the whole tree of its disaster
    pub id: CommentId,

    pub author: String,
    pub avatar: String,

    /// Only meant for display, not necessarily sortable
    pub timestamp: String,

    pub text: String,
    pub tag: CommentTag,

    /// Names of the users who liked this comment
    #[serde(default)]
    pub liked_by: im::OrdSet<String>,

    /// Replies, in insertion order
    #[serde(default)]
    pub replies: im::Vector<Comment>,
}

impl Comment {
    pub fn like_count(&self) -> usize {
        self.liked_by.len()
    }

    pub fn is_liked_by(&self, user: &str) -> bool {
        self.liked_by.contains(user)
    }

    /// Adds `user` to the likes if absent, removes it otherwise
    pub fn toggle_like(&mut self, user: &str) {
        if self.liked_by.remove(user).is_none() {
            self.liked_by.insert(user.to_string());
        }
    }

    /// Depth-first iteration over this comment and all its replies
    pub fn walk(&self) -> Box<dyn Iterator<Item = &Comment> + '_> {
        Box::new(std::iter::once(self).chain(self.replies.iter().flat_map(|c| c.walk())))
    }

    pub fn find<'a>(comments: &'a im::Vector<Comment>, id: CommentId) -> Option<&'a Comment> {
        comments.iter().flat_map(|c| c.walk()).find(|c| c.id == id)
    }
}
