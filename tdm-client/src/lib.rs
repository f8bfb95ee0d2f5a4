mod comments;
pub use comments::{CommentDb, NewComment};

mod db;
pub use db::Db;

mod disasters;
pub use disasters::DisasterDb;

mod filter;
pub use filter::{available_decades, DecadeFilter, Filter, KindFilter};

mod ids;
pub use ids::IdGen;

mod order;
pub use order::{sort_for_display, CommentOrder};

pub mod seed;

mod session;
pub use session::Session;

pub mod store;
pub use store::{MemoryStore, Store, StoreExt};

#[cfg(feature = "web")]
pub use store::BrowserStore;

pub mod api {
    pub use tdm_api::*;
}
