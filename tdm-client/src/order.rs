use std::{cmp::Reverse, fmt, str::FromStr};

use anyhow::anyhow;

use crate::api::Comment;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum CommentOrder {
    /// Most liked first, newest first among equally liked
    #[default]
    Likes,
    Newest,
}

impl CommentOrder {
    /// Only reorders the top-level comments, replies keep their insertion order
    pub fn sort(&self, comments: &mut im::Vector<Comment>) {
        match self {
            CommentOrder::Likes => {
                comments.sort_by(|a, b| {
                    (Reverse(a.like_count()), Reverse(a.id))
                        .cmp(&(Reverse(b.like_count()), Reverse(b.id)))
                })
            }
            // ids are derived from the creation time
            CommentOrder::Newest => comments.sort_by(|a, b| Reverse(a.id).cmp(&Reverse(b.id))),
        }
    }
}

pub fn sort_for_display(comments: &im::Vector<Comment>, order: CommentOrder) -> im::Vector<Comment> {
    let mut res = comments.clone();
    order.sort(&mut res);
    res
}

impl fmt::Display for CommentOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommentOrder::Likes => f.write_str("likes"),
            CommentOrder::Newest => f.write_str("newest"),
        }
    }
}

impl FromStr for CommentOrder {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<CommentOrder> {
        match &s.to_lowercase() as &str {
            "likes" => Ok(CommentOrder::Likes),
            "newest" => Ok(CommentOrder::Newest),
            _ => Err(anyhow!("unknown comment order {s:?}, expected likes or newest")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{CommentId, CommentTag};

    fn comment(id: i64, likes: &[&str], replies: im::Vector<Comment>) -> Comment {
        Comment {
            id: CommentId(id),
            author: String::from("a"),
            avatar: String::new(),
            timestamp: String::new(),
            text: format!("comment {id}"),
            tag: CommentTag::Experience,
            liked_by: likes.iter().map(|l| l.to_string()).collect(),
            replies,
        }
    }

    fn ids(comments: &im::Vector<Comment>) -> Vec<i64> {
        comments.iter().map(|c| c.id.0).collect()
    }

    #[test]
    fn by_likes_then_id() {
        let comments = im::vector![
            comment(1, &["a"], im::Vector::new()),
            comment(2, &[], im::Vector::new()),
            comment(3, &["a", "b"], im::Vector::new()),
            comment(4, &["b"], im::Vector::new()),
        ];
        assert_eq!(ids(&sort_for_display(&comments, CommentOrder::Likes)), vec![3, 4, 1, 2]);
        assert_eq!(ids(&sort_for_display(&comments, CommentOrder::Newest)), vec![4, 3, 2, 1]);
        // the input is left untouched
        assert_eq!(ids(&comments), vec![1, 2, 3, 4]);
    }

    #[test]
    fn replies_are_not_sorted() {
        let replies = im::vector![
            comment(10, &[], im::Vector::new()),
            comment(11, &["a", "b"], im::Vector::new()),
        ];
        let comments = im::vector![
            comment(1, &[], replies),
            comment(2, &[], im::Vector::new()),
        ];
        let sorted = sort_for_display(&comments, CommentOrder::Newest);
        assert_eq!(ids(&sorted), vec![2, 1]);
        assert_eq!(ids(&sorted[1].replies), vec![10, 11]);
    }

    #[test]
    fn by_likes_is_ordered() {
        bolero::check!()
            .with_type::<Vec<(u8, u8)>>()
            .cloned()
            .for_each(|shape| {
                // distinct ids, arbitrary like counts
                let comments = shape
                    .iter()
                    .enumerate()
                    .map(|(i, (id, likes))| {
                        let users = (0..*likes % 5).map(|u| format!("user{u}")).collect::<Vec<_>>();
                        let users = users.iter().map(|u| u as &str).collect::<Vec<_>>();
                        comment(i64::from(*id) * 1000 + i as i64, &users, im::Vector::new())
                    })
                    .collect::<im::Vector<_>>();
                let sorted = sort_for_display(&comments, CommentOrder::Likes);
                assert_eq!(sorted.len(), comments.len());
                for (a, b) in sorted.iter().zip(sorted.iter().skip(1)) {
                    assert!(a.like_count() >= b.like_count());
                    if a.like_count() == b.like_count() {
                        assert!(a.id > b.id);
                    }
                }
            });
    }
}
