use std::time::Duration;

use anyhow::Result;
use clap::Subcommand;
use log::info;
use uuid::Uuid;

use crate::auth::{AuthStore, MockDirectory, SubscriptionKind};
use crate::configuration::Settings;
use crate::favorites::FavoritesStore;
use crate::mangadex::{Manga, RelationshipKind};
use crate::mangadex_client::{
    ChapterQuery, ListQuery, MangaDexClient, MangaListQuery, SortDirection,
};
use crate::pagination::PagedList;
use crate::search::{SearchOutcome, SearchResolver};
use crate::session::ReaderSession;
use crate::storage::JsonFileStore;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Most-followed manga, first
    Popular {
        #[arg(short, long, default_value_t = 1)]
        pages: u32,
    },
    /// Most recently updated manga, first
    Latest {
        #[arg(short, long, default_value_t = 1)]
        pages: u32,
    },
    /// Title search (debounced, like the search box)
    Search { query: String },
    /// One random manga
    Random,
    /// Details and chapter list for one manga
    Manga { id: Uuid },
    /// Open a chapter and print its page URLs
    Read { manga_id: Uuid, chapter_id: Uuid },
    /// Manage the favorites shelf
    Favorites {
        #[command(subcommand)]
        action: FavoritesCommand,
    },
    /// Sign in with an existing account
    SignIn { email: String, password: String },
    /// Create an account and sign in
    SignUp { email: String, password: String },
    SignOut,
    /// Show the signed-in user
    Whoami,
    /// Put a subscription on the signed-in user
    Subscribe {
        #[arg(value_enum)]
        plan: Plan,
    },
    /// List the catalog's tags
    Tags,
    /// Reading history (needs a real API session)
    History,
    /// Browse authors, optionally filtered by name
    Authors {
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Show a scanlation group
    Group { id: Uuid },
    /// Covers uploaded for a manga
    Covers { manga_id: Uuid },
    /// Reading status for a manga (needs a real API session)
    Status { manga_id: Uuid },
}

#[derive(Subcommand, Debug)]
pub enum FavoritesCommand {
    Add { id: Uuid },
    Remove { id: Uuid },
    List,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum Plan {
    Monthly,
    Annual,
}

impl From<Plan> for SubscriptionKind {
    fn from(plan: Plan) -> Self {
        match plan {
            Plan::Monthly => SubscriptionKind::Monthly,
            Plan::Annual => SubscriptionKind::Annual,
        }
    }
}

pub async fn run(settings: Settings, command: Command) -> Result<()> {
    let client = MangaDexClient::new(&settings)?;

    match command {
        Command::Popular { pages } => {
            let list = browse(&client, "followedCount", pages).await?;
            print_manga_rows(&client, list.items());
        }
        Command::Latest { pages } => {
            let list = browse(&client, "latestUploadedChapter", pages).await?;
            print_manga_rows(&client, list.items());
        }
        Command::Search { query } => {
            let resolver = SearchResolver::new(
                &client,
                Duration::from_millis(settings.search_debounce_ms),
            );
            match resolver.submit(&query).await? {
                SearchOutcome::Results(results) if results.is_empty() => {
                    println!("No results found");
                }
                SearchOutcome::Results(results) => print_manga_rows(&client, &results),
                SearchOutcome::Cleared => println!("Empty query"),
                SearchOutcome::Superseded => {}
            }
        }
        Command::Random => {
            let manga = client.random_manga().await?;
            print_manga_detail(&client, &manga);
        }
        Command::Manga { id } => {
            let manga = client.get_manga(id).await?;
            print_manga_detail(&client, &manga);

            if let Some(entry) = client.manga_statistics(id).await?.entry(id) {
                let rating = entry.rating.bayesian.or(entry.rating.average);
                println!(
                    "rating: {}  follows: {}",
                    rating.map_or("n/a".into(), |r| format!("{r:.2}")),
                    entry.follows
                );
            }

            let feed = client.manga_feed(id, &ChapterQuery::default()).await?;
            println!("chapters ({} of {}):", feed.data.len(), feed.total);
            for chapter in &feed.data {
                println!("  {}  {}", chapter.id, chapter.label());
            }
        }
        Command::Read {
            manga_id,
            chapter_id,
        } => {
            let session = ReaderSession::open(&client, manga_id, chapter_id).await?;
            match session.current_chapter() {
                Some(chapter) => println!("Reading {}", chapter.label()),
                None => println!("Chapter not found"),
            }
            for page in session.pages() {
                println!("{page}");
            }
            if let Some(i) = session.current_index() {
                let chapters = session.chapters();
                if i > 0 {
                    println!("next: {}", chapters[i - 1].label());
                }
                if i + 1 < chapters.len() {
                    println!("previous: {}", chapters[i + 1].label());
                }
            }
        }
        Command::Favorites { action } => {
            let store = JsonFileStore::new(&settings.data_path())?;
            let mut favorites = FavoritesStore::load(store)?;
            match action {
                FavoritesCommand::Add { id } => {
                    let manga = client.get_manga(id).await?;
                    let title = manga.title().to_string();
                    if favorites.add(manga)? {
                        println!("Added {title}");
                    } else {
                        println!("{title} is already a favorite");
                    }
                }
                FavoritesCommand::Remove { id } => {
                    if favorites.remove(id)? {
                        println!("Removed {id}");
                    } else {
                        println!("{id} was not a favorite");
                    }
                }
                FavoritesCommand::List => print_manga_rows(&client, favorites.all()),
            }
        }
        Command::SignIn { email, password } => {
            let mut auth = auth_store(&settings)?;
            let user = auth.sign_in(&email, &password)?;
            println!("Signed in as {} ({:?})", user.email, user.role);
        }
        Command::SignUp { email, password } => {
            let mut auth = auth_store(&settings)?;
            let user = auth.sign_up(&email, &password)?;
            println!("Welcome, {}", user.email);
        }
        Command::SignOut => {
            let mut auth = auth_store(&settings)?;
            auth.sign_out()?;
            println!("Signed out");
        }
        Command::Whoami => {
            let auth = auth_store(&settings)?;
            match auth.current_user() {
                Some(user) => {
                    println!("{} ({:?}, since {})", user.email, user.role, user.created_at);
                    match &user.subscription {
                        Some(sub) => {
                            println!("subscription: {:?} until {}", sub.kind, sub.expires_at)
                        }
                        None => println!("no subscription"),
                    }
                }
                None => println!("Signed out"),
            }
        }
        Command::Subscribe { plan } => {
            let mut auth = auth_store(&settings)?;
            match auth.update_subscription(plan.into())? {
                Some(sub) => println!("Subscribed until {}", sub.expires_at),
                None => println!("Sign in first"),
            }
        }
        Command::Tags => {
            for tag in client.list_tags().await? {
                println!(
                    "{}  [{}]",
                    tag.attributes.name.preferred().unwrap_or("?"),
                    tag.attributes.group.as_deref().unwrap_or("none")
                );
            }
        }
        Command::History => {
            for entry in client.reading_history(settings.catalog_limit, 0).await? {
                println!("{}  {}", entry.read_date, entry.chapter_id);
            }
        }
        Command::Authors { name } => {
            let page = client.list_authors(&ListQuery { name, ..ListQuery::default() }).await?;
            for author in &page.data {
                println!(
                    "{}  {}",
                    author.id,
                    author.attributes.name.as_deref().unwrap_or("?")
                );
            }
        }
        Command::Group { id } => {
            let group = client.get_group(id).await?;
            println!(
                "{}  {}",
                group.attributes.name.as_deref().unwrap_or("?"),
                group.attributes.website.as_deref().unwrap_or("")
            );
        }
        Command::Covers { manga_id } => {
            let page = client.list_covers(&[manga_id], &ListQuery::default()).await?;
            for cover in &page.data {
                println!(
                    "vol {}  {}",
                    cover.attributes.volume.as_deref().unwrap_or("?"),
                    cover.attributes.file_name
                );
            }
        }
        Command::Status { manga_id } => match client.reading_status(manga_id).await? {
            Some(status) => println!("{status:?}"),
            None => println!("No reading status set"),
        },
    }

    Ok(())
}

fn auth_store(settings: &Settings) -> Result<AuthStore<MockDirectory, JsonFileStore>> {
    let store = JsonFileStore::new(&settings.data_path())?;
    Ok(AuthStore::load(MockDirectory::seeded(), store)?)
}

async fn browse(
    client: &MangaDexClient,
    order_field: &str,
    pages: u32,
) -> Result<PagedList<Manga>> {
    let mut list = PagedList::new(client.catalog_limit());
    for _ in 0..pages {
        if !list.has_more() {
            break;
        }
        let fetched = list
            .load_more(|limit, offset| {
                let query = MangaListQuery {
                    limit: Some(limit),
                    offset,
                    ..MangaListQuery::ordered_by(order_field, SortDirection::Descending)
                };
                async move { client.list_manga(&query).await }
            })
            .await?;
        info!("fetched {fetched} catalog entries");
    }
    Ok(list)
}

fn print_manga_rows(client: &MangaDexClient, entries: &[Manga]) {
    for manga in entries {
        let cover = client
            .cover_url(manga)
            .map_or("no cover".into(), |u| u.to_string());
        println!(
            "{}  {}  [{}]  {}",
            manga.id,
            manga.title(),
            manga.attributes.status.as_str(),
            cover
        );
    }
}

fn print_manga_detail(client: &MangaDexClient, manga: &Manga) {
    println!("{}  ({})", manga.title(), manga.id);
    println!(
        "status: {}  rating: {}  year: {}",
        manga.attributes.status.as_str(),
        manga.attributes.content_rating.as_str(),
        manga
            .attributes
            .year
            .map_or("unknown".into(), |y| y.to_string())
    );
    if let Some(description) = manga.attributes.description.preferred() {
        println!("{description}");
    }
    if let Some(cover) = client.cover_url(manga) {
        println!("cover: {cover}");
    }
    let credits: Vec<&str> = manga
        .credits(RelationshipKind::Author)
        .chain(manga.credits(RelationshipKind::Artist))
        .filter_map(|r| r.attributes.as_ref())
        .filter_map(|a| a.name.as_deref())
        .collect();
    if !credits.is_empty() {
        println!("by: {}", credits.join(", "));
    }
    let tags: Vec<&str> = manga
        .attributes
        .tags
        .iter()
        .filter_map(|t| t.attributes.name.preferred())
        .collect();
    if !tags.is_empty() {
        println!("tags: {}", tags.join(", "));
    }
}
