use chrono::Utc;

use crate::{
    api::{Comment, CommentId, CommentTag, DisasterId, Error, SessionUser, Target, Time},
    store::keys,
    IdGen, Store, StoreExt,
};

pub type Forest = im::Vector<Comment>;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NewComment {
    pub text: String,
    pub tag: CommentTag,
    /// Reply to this comment instead of posting at the top level
    pub parent: Option<CommentId>,
}

/// The threaded discussion of every disaster
#[derive(Clone, Debug)]
pub struct CommentDb {
    forests: im::OrdMap<DisasterId, Forest>,
    ids: IdGen,
}

/// Rebuilds the path from the top of `comments` down to comment `id`, applying
/// `f` to it. Untouched siblings stay shared with `comments`.
fn update_in(
    comments: &Forest,
    id: CommentId,
    f: &mut dyn FnMut(&mut Comment),
) -> Option<Forest> {
    for (i, c) in comments.iter().enumerate() {
        let updated = if c.id == id {
            let mut c = c.clone();
            f(&mut c);
            c
        } else if let Some(replies) = update_in(&c.replies, id, f) {
            Comment {
                replies,
                ..c.clone()
            }
        } else {
            continue;
        };
        return Some(comments.update(i, updated));
    }
    None
}

impl CommentDb {
    pub fn new(forests: im::OrdMap<DisasterId, Forest>) -> CommentDb {
        let last_id = forests
            .values()
            .flat_map(|f| f.iter())
            .flat_map(|c| c.walk())
            .map(|c| c.id.0)
            .max()
            .unwrap_or(0);
        CommentDb {
            forests,
            ids: IdGen::after(last_id),
        }
    }

    /// Loads the stored comments, or `seed` if there are none
    pub fn load<S: Store + ?Sized>(store: &mut S, seed: im::OrdMap<DisasterId, Forest>) -> CommentDb {
        let forests = store
            .take_valid::<im::OrdMap<DisasterId, Forest>>(keys::COMMENTS)
            .filter(|f| !f.is_empty())
            .unwrap_or(seed);
        CommentDb::new(forests)
    }

    pub fn save<S: Store + ?Sized>(&self, store: &mut S) {
        store.set(keys::COMMENTS, &self.forests);
    }

    /// Top-level comments of a disaster, in posting order
    pub fn comments_for(&self, disaster: DisasterId) -> Forest {
        self.forests.get(&disaster).cloned().unwrap_or_default()
    }

    pub fn find(&self, disaster: DisasterId, id: CommentId) -> Option<&Comment> {
        Comment::find(self.forests.get(&disaster)?, id)
    }

    pub fn post(
        &mut self,
        disaster: DisasterId,
        author: Option<&SessionUser>,
        new: NewComment,
    ) -> Result<CommentId, Error> {
        self.post_at(disaster, author, new, Utc::now())
    }

    pub fn post_at(
        &mut self,
        disaster: DisasterId,
        author: Option<&SessionUser>,
        new: NewComment,
        now: Time,
    ) -> Result<CommentId, Error> {
        let author = author.ok_or(Error::NotAuthenticated)?;
        let text = new.text.trim();
        if text.is_empty() {
            return Err(Error::EmptyText);
        }
        if let Some(parent) = new.parent {
            if self.find(disaster, parent).is_none() {
                return Err(Error::ParentNotFound(parent));
            }
        }

        let id = CommentId(self.ids.next_at(now));
        let comment = Comment {
            id,
            author: author.name.clone(),
            avatar: author.avatar.clone(),
            timestamp: now.format("%Y-%m-%d %H:%M").to_string(),
            text: text.to_string(),
            tag: new.tag,
            liked_by: im::OrdSet::new(),
            replies: im::Vector::new(),
        };
        let mut forest = self.comments_for(disaster);
        match new.parent {
            None => forest.push_back(comment),
            Some(parent) => {
                forest = update_in(&forest, parent, &mut |p| p.replies.push_back(comment.clone()))
                    .ok_or(Error::ParentNotFound(parent))?;
            }
        }
        self.forests.insert(disaster, forest);
        tracing::debug!(%disaster, %id, parent = ?new.parent, "posted comment");
        Ok(id)
    }

    /// Flips `user`'s like on the comment, wherever it is in the tree
    ///
    /// Whether `user` is allowed to like is up to the caller.
    pub fn toggle_like(
        &mut self,
        disaster: DisasterId,
        id: CommentId,
        user: &str,
    ) -> Result<(), Error> {
        let updated = self
            .forests
            .get(&disaster)
            .and_then(|forest| update_in(forest, id, &mut |c| c.toggle_like(user)))
            .ok_or(Error::NotFound(Target::Comment(id)))?;
        self.forests.insert(disaster, updated);
        Ok(())
    }
}
