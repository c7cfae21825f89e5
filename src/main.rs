use iced::widget::{column, container, scrollable, text};
use iced::{Element, Length, Task, Theme};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

mod api;
mod config;
mod discover;
mod error;
mod poster;
mod state;
mod ui;

use api::{appwrite::AppwriteStore, tmdb::TmdbClient, MovieCatalog, TrendingStore};
use config::Config;
use poster::{PosterCache, PosterIndex};
use state::data::{Fetch, Movie, TrendingEntry};
use state::search::{SearchRequest, SearchState};
use state::trending_db::TrendingDb;

/// Shown when the trending list cannot be loaded
const TRENDING_ERROR: &str = "Error in fetching featured movies";

/// Cards per row in the results grid
const CARDS_PER_ROW: usize = 4;

/// Main application state
struct MovieFinder {
    catalog: Arc<dyn MovieCatalog>,
    store: Arc<dyn TrendingStore>,
    poster_cache: PosterCache,
    debounce: Duration,
    trending_limit: usize,
    /// Search field, debounce bookkeeping and the results list
    search: SearchState,
    trending: Fetch<Vec<TrendingEntry>>,
    /// Downloaded and in-flight posters, by URL
    posters: PosterIndex,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// User edited the search field
    SearchChanged(String),
    /// Debounce timer for the given keystroke generation fired
    DebounceElapsed(u64),
    /// Catalog response for a search request id
    MoviesFetched(u64, Result<Vec<Movie>, String>),
    TrendingFetched(Result<Vec<TrendingEntry>, String>),
    PosterFetched(String, Option<PathBuf>),
}

impl MovieFinder {
    /// Create the app and kick off the trending load and the discovery listing
    fn new(
        catalog: Arc<dyn MovieCatalog>,
        store: Arc<dyn TrendingStore>,
        poster_cache: PosterCache,
        config: &Config,
    ) -> (Self, Task<Message>) {
        let mut app = MovieFinder {
            catalog,
            store,
            poster_cache,
            debounce: config.debounce,
            trending_limit: config.trending_limit,
            search: SearchState::new(),
            trending: Fetch::Loading,
            posters: PosterIndex::new(),
        };

        let initial = app.search.initial_request();
        let task = Task::batch([app.load_trending(), app.run_search(initial)]);

        (app, task)
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::SearchChanged(value) => {
                let generation = self.search.on_input(value);
                Task::perform(tokio::time::sleep(self.debounce), move |_| {
                    Message::DebounceElapsed(generation)
                })
            }
            Message::DebounceElapsed(generation) => match self.search.debounce_elapsed(generation) {
                Some(request) => self.run_search(request),
                None => Task::none(),
            },
            Message::MoviesFetched(id, result) => {
                if !self.search.finish(id, result) {
                    return Task::none();
                }

                let urls: Vec<String> = self
                    .search
                    .movies
                    .ready()
                    .into_iter()
                    .flatten()
                    .filter_map(Movie::poster_url)
                    .collect();
                self.load_posters(urls)
            }
            Message::TrendingFetched(result) => match result {
                Ok(entries) => {
                    let urls: Vec<String> = entries
                        .iter()
                        .map(|e| e.poster_url.clone())
                        .filter(|url| !url.is_empty())
                        .collect();
                    self.trending = Fetch::Ready(entries);
                    self.load_posters(urls)
                }
                Err(_) => {
                    self.trending = Fetch::Failed(TRENDING_ERROR);
                    Task::none()
                }
            },
            Message::PosterFetched(url, path) => {
                self.posters.finish(url, path);
                Task::none()
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let trending = ui::fetch_view(&self.trending, |entries| {
            ui::trending::trending_strip(entries, &self.posters)
        });

        let movies = ui::fetch_view(&self.search.movies, |movies| {
            let cards = movies
                .iter()
                .map(|movie| {
                    let path = movie.poster_url().and_then(|url| self.posters.get(&url));
                    ui::movie_card::movie_card(movie, path)
                })
                .collect();
            ui::grid(cards, CARDS_PER_ROW)
        });

        let content = column![
            ui::header(self.search.input()),
            text("Trending Movies").size(28),
            trending,
            text("All Movies").size(28),
            movies,
        ]
        .spacing(24)
        .padding(40);

        container(scrollable(content).width(Length::Fill))
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }

    fn run_search(&self, request: SearchRequest) -> Task<Message> {
        let catalog = Arc::clone(&self.catalog);
        let store = Arc::clone(&self.store);
        let SearchRequest { id, query } = request;

        Task::perform(
            async move {
                discover::fetch_movies(catalog.as_ref(), store.as_ref(), &query)
                    .await
                    .map_err(|e| {
                        tracing::error!(error = %e, "error in getting movies");
                        e.to_string()
                    })
            },
            move |result| Message::MoviesFetched(id, result),
        )
    }

    fn load_trending(&self) -> Task<Message> {
        let store = Arc::clone(&self.store);
        let limit = self.trending_limit;

        Task::perform(
            async move {
                discover::fetch_trending(store.as_ref(), limit)
                    .await
                    .map_err(|e| {
                        tracing::error!(error = %e, "error in fetching trending searches");
                        e.to_string()
                    })
            },
            Message::TrendingFetched,
        )
    }

    /// Download posters that are not cached or already on their way.
    /// Failed ones are forgotten and retried the next time they are listed.
    fn load_posters(&mut self, urls: Vec<String>) -> Task<Message> {
        let mut tasks = Vec::new();

        for url in urls {
            if !self.posters.begin(&url) {
                continue;
            }

            let cache = self.poster_cache.clone();
            tasks.push(Task::perform(
                async move {
                    let path = match cache.fetch(&url).await {
                        Ok(path) => Some(path),
                        Err(e) => {
                            tracing::warn!(%url, error = %e, "failed to load poster");
                            None
                        }
                    };
                    (url, path)
                },
                |(url, path)| Message::PosterFetched(url, path),
            ));
        }

        Task::batch(tasks)
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("movie_finder=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> error::Result<()> {
    init_logging();

    let config = Config::load()?;

    let http = reqwest::Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(15))
        .build()?;

    let catalog: Arc<dyn MovieCatalog> = Arc::new(TmdbClient::new(http.clone(), &config.tmdb));

    let store: Arc<dyn TrendingStore> = match &config.appwrite {
        Some(appwrite) => {
            tracing::info!(endpoint = %appwrite.endpoint, "using hosted trending store");
            Arc::new(AppwriteStore::new(http.clone(), appwrite.clone()))
        }
        None => {
            let db = TrendingDb::open(config.database_path.clone())?;
            tracing::info!("📁 No hosted store configured, counting searches in {}", db.path().display());
            Arc::new(db)
        }
    };

    let poster_cache = PosterCache::in_user_cache(http)?;

    tracing::info!("🎬 Movie Finder starting");

    iced::application("Movie Finder", MovieFinder::update, MovieFinder::view)
        .theme(MovieFinder::theme)
        .window_size((1200.0, 860.0))
        .centered()
        .run_with(move || MovieFinder::new(catalog, store, poster_cache, &config))?;

    Ok(())
}
