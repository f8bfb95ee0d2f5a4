use crate::{
    api::{
        Comment, CommentId, CommentTag, Disaster, DisasterId, Error, NewDisaster,
        RegisteredAccount, SessionUser, StoryLink,
    },
    seed, sort_for_display, CommentDb, CommentOrder, DisasterDb, Filter, NewComment, Session, Store,
};

/// Everything the map UI reads and mutates, persisted through `S`
///
/// Every mutation is persisted right after it succeeded. Failed mutations
/// leave both the state and the store untouched.
pub struct Db<S> {
    store: S,
    session: Session,
    comments: CommentDb,
    disasters: DisasterDb,
}

impl<S: Store> Db<S> {
    /// Loads the state saved in `store`, on top of the built-in seed data
    pub fn load(store: S) -> Db<S> {
        Db::load_with_seed(store, seed::disasters(), seed::comments())
    }

    pub fn load_with_seed(
        mut store: S,
        seed_disasters: Vec<Disaster>,
        seed_comments: im::OrdMap<DisasterId, im::Vector<Comment>>,
    ) -> Db<S> {
        let session = Session::load(&mut store);
        let comments = CommentDb::load(&mut store, seed_comments);
        let disasters = DisasterDb::load(&mut store, seed_disasters);
        Db {
            store,
            session,
            comments,
            disasters,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn current_user(&self) -> Option<&SessionUser> {
        self.session.current()
    }

    pub fn register(
        &mut self,
        name: String,
        avatar: String,
        password: String,
    ) -> Result<&SessionUser, Error> {
        self.session.register(
            &mut self.store,
            RegisteredAccount {
                name,
                avatar,
                password,
            },
        )
    }

    pub fn login(&mut self, name: &str, password: &str) -> Result<&SessionUser, Error> {
        self.session.login(&mut self.store, name, password)
    }

    pub fn logout(&mut self) {
        self.session.logout(&mut self.store)
    }

    pub fn disasters(&self) -> &DisasterDb {
        &self.disasters
    }

    pub fn merged_view(&self) -> Vec<&Disaster> {
        self.disasters.merged_view()
    }

    pub fn filtered(&self, filter: &Filter) -> Vec<&Disaster> {
        self.disasters.filtered(filter)
    }

    pub fn available_decades(&self) -> Vec<i32> {
        self.disasters.available_decades()
    }

    pub fn disaster(&self, id: DisasterId) -> Option<&Disaster> {
        self.disasters.get(id)
    }

    pub fn select(&mut self, id: DisasterId) -> Result<&Disaster, Error> {
        self.disasters.select(id)
    }

    pub fn clear_selection(&mut self) {
        self.disasters.clear_selection()
    }

    pub fn selected(&self) -> Option<&Disaster> {
        self.disasters.selected()
    }

    pub fn submit_disaster(&mut self, new: NewDisaster) -> Result<DisasterId, Error> {
        self.disasters.submit(&mut self.store, new)
    }

    pub fn add_story(&mut self, id: DisasterId, story: StoryLink) -> Result<(), Error> {
        self.disasters.add_story(&mut self.store, id, story)
    }

    pub fn comments_for(&self, disaster: DisasterId) -> im::Vector<Comment> {
        self.comments.comments_for(disaster)
    }

    pub fn sorted_comments(&self, disaster: DisasterId, order: CommentOrder) -> im::Vector<Comment> {
        sort_for_display(&self.comments.comments_for(disaster), order)
    }

    /// Posts as the current user, as a reply to `parent` if set
    pub fn post_comment(
        &mut self,
        disaster: DisasterId,
        text: &str,
        tag: CommentTag,
        parent: Option<CommentId>,
    ) -> Result<CommentId, Error> {
        let id = self.comments.post(
            disaster,
            self.session.current(),
            NewComment {
                text: text.to_string(),
                tag,
                parent,
            },
        )?;
        self.comments.save(&mut self.store);
        Ok(id)
    }

    /// Toggles the current user's like. Without a session this does nothing:
    /// the UI is expected to hide the control.
    pub fn toggle_like(&mut self, disaster: DisasterId, comment: CommentId) -> Result<(), Error> {
        let user = match self.session.current() {
            Some(u) => u.name.clone(),
            None => {
                tracing::debug!(%disaster, %comment, "ignoring like without a session");
                return Ok(());
            }
        };
        self.comments.toggle_like(disaster, comment, &user)?;
        self.comments.save(&mut self.store);
        Ok(())
    }
}
