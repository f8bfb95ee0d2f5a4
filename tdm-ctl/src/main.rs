use std::path::PathBuf;

use anyhow::{anyhow, bail, Context};
use chrono::NaiveDate;
use tdm_client::{
    api::{
        Comment, CommentId, CommentTag, Disaster, DisasterId, DisasterKind, Error, Location,
        NewDisaster, Perspective, StoryLink, StorySearch, StorySearchResult, Target,
    },
    CommentOrder, DecadeFilter, Db, Filter, KindFilter, Store,
};
use tdm_mock_search::MockStorySearch;

mod file_store;
use file_store::FileStore;

const DEFAULT_DATA_FILE: &str = "tdm-state.json";

#[derive(structopt::StructOpt)]
struct Opt {
    /// State file, defaults to $TDM_DATA then ./tdm-state.json
    #[structopt(short, long, parse(from_os_str))]
    data: Option<PathBuf>,

    #[structopt(subcommand)]
    cmd: Command,
}

#[derive(structopt::StructOpt)]
enum Command {
    /// Create an account and log into it
    Register {
        name: String,
        password: String,

        #[structopt(long, default_value = "https://i.pravatar.cc/150?u=default-user-avatar")]
        avatar: String,
    },

    Login {
        name: String,
        password: String,
    },

    Logout,

    /// Show the logged-in user
    Whoami,

    /// List the disasters on the map
    List {
        /// A disaster kind, or "all"
        #[structopt(long, default_value = "all")]
        kind: KindFilter,

        /// A decade like 1990, or "all"
        #[structopt(long, default_value = "all")]
        decade: DecadeFilter,
    },

    /// List the decades that have disasters
    Decades,

    /// Show a disaster with its stories and discussion
    Show {
        id: i64,

        /// "likes" or "newest"
        #[structopt(long, default_value = "likes")]
        order: CommentOrder,
    },

    /// Post a comment, or reply to one
    Comment {
        disaster: i64,
        text: String,

        #[structopt(long, default_value = "experience")]
        tag: CommentTag,

        #[structopt(long)]
        reply_to: Option<i64>,
    },

    /// Like a comment, or remove the like
    Like { disaster: i64, comment: i64 },

    /// Attach a news link to a disaster
    AddStory {
        disaster: i64,
        title: String,
        url: String,
    },

    /// Submit a new disaster
    Report {
        #[structopt(long)]
        name: String,

        #[structopt(long)]
        kind: DisasterKind,

        /// YYYY-MM-DD
        #[structopt(long)]
        date: NaiveDate,

        #[structopt(long, allow_hyphen_values = true)]
        lat: Option<f64>,

        #[structopt(long, allow_hyphen_values = true)]
        lng: Option<f64>,

        #[structopt(long)]
        description: String,

        #[structopt(long)]
        casualties: String,

        /// TITLE=URL, may be repeated
        #[structopt(long = "story")]
        stories: Vec<String>,
    },

    /// Look for real-world stories about a disaster
    SearchStories {
        disaster: i64,

        #[structopt(long, default_value = "survivor")]
        perspective: Perspective,
    },
}

fn data_path(opt: Option<PathBuf>) -> PathBuf {
    opt.or_else(|| std::env::var_os("TDM_DATA").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE))
}

fn non_empty(field: &str, value: &str) -> anyhow::Result<String> {
    let value = value.trim();
    if value.is_empty() {
        bail!("{field} must not be empty");
    }
    Ok(value.to_string())
}

/// Only absolute http(s) urls are accepted as story links
fn validate_url(url: &str) -> anyhow::Result<String> {
    let url = non_empty("url", url)?;
    let uri = url
        .parse::<http::Uri>()
        .with_context(|| format!("parsing url {url:?}"))?;
    match uri.scheme_str() {
        Some("http") | Some("https") => (),
        _ => bail!("url {url:?} must start with http:// or https://"),
    }
    if uri.host().map_or(true, str::is_empty) {
        bail!("url {url:?} has no host");
    }
    Ok(url)
}

fn parse_story(s: &str) -> anyhow::Result<StoryLink> {
    let (title, url) = s
        .split_once('=')
        .ok_or_else(|| anyhow!("story {s:?} is not of the form TITLE=URL"))?;
    Ok(StoryLink {
        title: non_empty("story title", title)?,
        url: validate_url(url)?,
    })
}

fn location(lat: Option<f64>, lng: Option<f64>) -> anyhow::Result<Option<Location>> {
    match (lat, lng) {
        (Some(lat), Some(lng)) => {
            if !(-90. ..=90.).contains(&lat) || !(-180. ..=180.).contains(&lng) {
                bail!("location ({lat}, {lng}) is out of range");
            }
            Ok(Some(Location { lat, lng }))
        }
        (None, None) => Ok(None),
        _ => bail!("both --lat and --lng are needed to place the disaster"),
    }
}

fn disaster_or_not_found<S: Store>(db: &Db<S>, id: DisasterId) -> Result<&Disaster, Error> {
    db.disaster(id).ok_or(Error::NotFound(Target::Disaster(id)))
}

fn print_disaster_line(d: &Disaster) {
    println!("{:>14}  {}  {:<10}  {}", d.id, d.occurred_on, d.kind, d.name);
}

fn print_comment(c: &Comment, depth: usize, me: Option<&str>) {
    let indent = "    ".repeat(depth);
    let liked = match me {
        Some(me) if c.is_liked_by(me) => " (liked)",
        _ => "",
    };
    println!(
        "{indent}[{}] {} ({}, {}) {} likes{liked}",
        c.id,
        c.author,
        c.tag,
        c.timestamp,
        c.like_count(),
    );
    for line in c.text.lines() {
        println!("{indent}  {line}");
    }
    for r in c.replies.iter() {
        print_comment(r, depth + 1, me);
    }
}

async fn run<S: Store>(db: &mut Db<S>, cmd: Command) -> anyhow::Result<()> {
    match cmd {
        Command::Register {
            name,
            password,
            avatar,
        } => {
            let name = non_empty("name", &name)?;
            let user = db.register(name, avatar, password)?;
            println!("Registered and logged in as {}", user.name);
        }
        Command::Login { name, password } => {
            let user = db.login(name.trim(), &password)?;
            println!("Logged in as {}", user.name);
        }
        Command::Logout => {
            db.logout();
            println!("Logged out");
        }
        Command::Whoami => match db.current_user() {
            Some(u) => println!("{} ({})", u.name, u.avatar),
            None => println!("Not logged in"),
        },
        Command::List { kind, decade } => {
            for d in db.filtered(&Filter { kind, decade }) {
                print_disaster_line(d);
            }
        }
        Command::Decades => {
            for d in db.available_decades() {
                println!("{d}s");
            }
        }
        Command::Show { id, order } => {
            let id = DisasterId(id);
            let d = db.select(id)?;
            println!("{} ({}, {})", d.name, d.kind, d.occurred_on);
            println!("Location: {}, {}", d.location.lat, d.location.lng);
            println!("Casualties: {}", d.casualty_summary);
            println!();
            println!("{}", d.description);
            if !d.stories.is_empty() {
                println!();
                println!("Stories:");
                for s in &d.stories {
                    println!("  {}: {}", s.title, s.url);
                }
            }
            let comments = db.sorted_comments(id, order);
            println!();
            println!("Discussion ({} comments, by {order}):", comments.len());
            let me = db.current_user().map(|u| &u.name as &str);
            for c in comments.iter() {
                print_comment(c, 1, me);
            }
        }
        Command::Comment {
            disaster,
            text,
            tag,
            reply_to,
        } => {
            let id = db.post_comment(DisasterId(disaster), &text, tag, reply_to.map(CommentId))?;
            println!("Posted comment {id}");
        }
        Command::Like { disaster, comment } => {
            if db.current_user().is_none() {
                bail!("log in to like comments");
            }
            let (disaster, comment) = (DisasterId(disaster), CommentId(comment));
            db.toggle_like(disaster, comment)?;
            let me = db.current_user().map(|u| u.name.clone()).unwrap_or_default();
            let liked = Comment::find(&db.comments_for(disaster), comment)
                .map_or(false, |c| c.is_liked_by(&me));
            println!("{}", if liked { "Liked" } else { "Like removed" });
        }
        Command::AddStory {
            disaster,
            title,
            url,
        } => {
            let story = StoryLink {
                title: non_empty("title", &title)?,
                url: validate_url(&url)?,
            };
            db.add_story(DisasterId(disaster), story)?;
            println!("Story added");
        }
        Command::Report {
            name,
            kind,
            date,
            lat,
            lng,
            description,
            casualties,
            stories,
        } => {
            let new = NewDisaster {
                name: non_empty("name", &name)?,
                kind,
                occurred_on: date,
                location: location(lat, lng)?,
                description: non_empty("description", &description)?,
                casualty_summary: non_empty("casualties", &casualties)?,
                stories: stories
                    .iter()
                    .map(|s| parse_story(s))
                    .collect::<anyhow::Result<_>>()?,
            };
            let id = db.submit_disaster(new)?;
            println!("Reported disaster {id}");
        }
        Command::SearchStories {
            disaster,
            perspective,
        } => {
            let name = disaster_or_not_found(db, DisasterId(disaster))?.name.clone();
            let res = match MockStorySearch::new()
                .search_stories(&name, perspective)
                .await
            {
                Ok(res) => res.dedup_by_uri(),
                Err(err) => {
                    tracing::warn!(?err, "story search failed");
                    StorySearchResult::unavailable()
                }
            };
            println!("{}", res.summary);
            for s in res.stories {
                println!("  {}: {}", s.title, s.uri);
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let opt = <Opt as structopt::StructOpt>::from_args();
    let path = data_path(opt.data);
    tracing::debug!(?path, "opening state file");
    let mut db = Db::load(FileStore::open(&path)?);
    run(&mut db, opt.cmd).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use tdm_client::MemoryStore;

    fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("failed initializing tokio runtime")
    }

    #[test]
    fn urls() {
        assert_eq!(validate_url(" https://x.test/a ").unwrap(), "https://x.test/a");
        assert!(validate_url("http://example.org").is_ok());
        assert!(validate_url("").is_err());
        assert!(validate_url("x.test").is_err());
        assert!(validate_url("ftp://x.test").is_err());
    }

    #[test]
    fn stories() {
        assert_eq!(
            parse_story("Looking back=https://x.test/a?b=c").unwrap(),
            StoryLink {
                title: String::from("Looking back"),
                url: String::from("https://x.test/a?b=c"),
            },
        );
        assert!(parse_story("no url").is_err());
        assert!(parse_story(" =https://x.test").is_err());
    }

    #[test]
    fn locations() {
        assert_eq!(location(None, None).unwrap(), None);
        assert_eq!(
            location(Some(23.5), Some(-121.)).unwrap(),
            Some(Location { lat: 23.5, lng: -121. }),
        );
        assert!(location(Some(23.5), None).is_err());
        assert!(location(Some(123.5), Some(0.)).is_err());
    }

    #[test]
    fn like_needs_login() {
        let mut db = Db::load(MemoryStore::new());
        let res = runtime().block_on(run(
            &mut db,
            Command::Like {
                disaster: 1,
                comment: 101,
            },
        ));
        assert!(res.is_err());
    }

    #[test]
    fn report_without_location() {
        let mut db = Db::load(MemoryStore::new());
        let res = runtime().block_on(run(
            &mut db,
            Command::Report {
                name: String::from("slope"),
                kind: DisasterKind::Landslide,
                date: "2010-04-25".parse().unwrap(),
                lat: None,
                lng: None,
                description: String::from("d"),
                casualties: String::from("c"),
                stories: Vec::new(),
            },
        ));
        let err = res.unwrap_err();
        assert_eq!(err.downcast_ref::<Error>(), Some(&Error::InvalidLocation));
        assert!(db.disasters().submitted().is_empty());
    }

    #[test]
    fn comment_and_show() {
        let mut db = Db::load(MemoryStore::new());
        let rt = runtime();
        rt.block_on(run(
            &mut db,
            Command::Register {
                name: String::from(" Alice "),
                password: String::from("p1"),
                avatar: String::from("a"),
            },
        ))
        .unwrap();
        assert_eq!(db.current_user().map(|u| &u.name as &str), Some("Alice"));
        rt.block_on(run(
            &mut db,
            Command::Comment {
                disaster: 1,
                text: String::from("hello"),
                tag: CommentTag::Experience,
                reply_to: Some(1011),
            },
        ))
        .unwrap();
        rt.block_on(run(
            &mut db,
            Command::Show {
                id: 1,
                order: CommentOrder::Newest,
            },
        ))
        .unwrap();
        assert_eq!(db.selected().map(|d| d.id), Some(DisasterId(1)));
    }
}
