/// Debounced search controller
///
/// Keystrokes bump a generation counter. The UI schedules a timer per
/// keystroke and reports back with the generation it was scheduled for;
/// only the timer for the latest keystroke commits the term. Each commit
/// gets a request id and responses for older ids are dropped, so a slow
/// response can never overwrite a newer one.
use super::data::{Fetch, Movie};

/// Shown when any part of a movie search fails
pub const MOVIES_ERROR: &str = "Error fetching movies, please try again later!";

/// A search that should be sent to the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub id: u64,
    /// Trimmed term; empty means the discovery listing
    pub query: String,
}

#[derive(Debug)]
pub struct SearchState {
    /// Raw text in the search field
    input: String,
    /// Generation of the latest keystroke
    generation: u64,
    /// Last term sent to the catalog
    committed: Option<String>,
    /// Id of the latest request sent
    latest_request: u64,
    pub movies: Fetch<Vec<Movie>>,
}

impl Default for SearchState {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchState {
    pub fn new() -> Self {
        Self {
            input: String::new(),
            generation: 0,
            committed: None,
            latest_request: 0,
            movies: Fetch::Loading,
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Record a keystroke. Returns the generation the debounce timer
    /// should report back with.
    pub fn on_input(&mut self, value: String) -> u64 {
        self.input = value;
        self.generation += 1;
        self.generation
    }

    /// The discovery listing shown before the user types anything
    pub fn initial_request(&mut self) -> SearchRequest {
        self.commit(String::new())
    }

    /// A debounce timer fired. Returns a request only if no keystroke
    /// happened since it was scheduled and the term actually changed.
    pub fn debounce_elapsed(&mut self, generation: u64) -> Option<SearchRequest> {
        if generation != self.generation {
            return None;
        }

        let term = self.input.trim().to_string();
        if self.committed.as_deref() == Some(term.as_str()) {
            return None;
        }

        Some(self.commit(term))
    }

    /// Apply a catalog response. Returns false if the response was stale
    /// and has been dropped.
    pub fn finish(&mut self, id: u64, result: Result<Vec<Movie>, String>) -> bool {
        if id != self.latest_request {
            tracing::debug!(id, latest = self.latest_request, "dropping stale search response");
            return false;
        }

        self.movies = match result {
            Ok(movies) => Fetch::Ready(movies),
            Err(_) => Fetch::Failed(MOVIES_ERROR),
        };
        true
    }

    fn commit(&mut self, term: String) -> SearchRequest {
        self.latest_request += 1;
        self.committed = Some(term.clone());
        self.movies = Fetch::Loading;
        SearchRequest {
            id: self.latest_request,
            query: term,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn titled(title: &str) -> Movie {
        Movie {
            title: title.into(),
            ..Movie::default()
        }
    }

    #[test]
    fn test_initial_request_is_discovery() {
        let mut state = SearchState::new();
        let req = state.initial_request();
        assert_eq!(req.query, "");
        assert_eq!(state.movies, Fetch::Loading);
    }

    #[test]
    fn test_only_latest_keystroke_commits() {
        let mut state = SearchState::new();
        state.initial_request();

        let g1 = state.on_input("m".into());
        let g2 = state.on_input("ma".into());
        let g3 = state.on_input("matrix".into());

        assert_eq!(state.debounce_elapsed(g1), None);
        assert_eq!(state.debounce_elapsed(g2), None);

        let req = state.debounce_elapsed(g3).unwrap();
        assert_eq!(req.query, "matrix");
        assert_eq!(req.id, 2);

        // The same timer firing twice must not issue a second request
        assert_eq!(state.debounce_elapsed(g3), None);
    }

    #[test]
    fn test_unchanged_term_is_not_refetched() {
        let mut state = SearchState::new();
        state.initial_request();

        let g = state.on_input("dune".into());
        assert!(state.debounce_elapsed(g).is_some());

        // Typing a space and deleting it lands on the same term
        state.on_input("dune ".into());
        let g = state.on_input("dune".into());
        assert_eq!(state.debounce_elapsed(g), None);
    }

    #[test]
    fn test_whitespace_only_falls_back_to_discovery() {
        let mut state = SearchState::new();
        state.initial_request();

        let g = state.on_input("alien".into());
        state.debounce_elapsed(g).unwrap();

        let g = state.on_input("   ".into());
        let req = state.debounce_elapsed(g).unwrap();
        assert_eq!(req.query, "");
    }

    #[test]
    fn test_failure_clears_list() {
        let mut state = SearchState::new();
        let req = state.initial_request();
        assert!(state.finish(req.id, Ok(vec![titled("Heat")])));
        assert_eq!(state.movies.ready().map(Vec::len), Some(1));

        let g = state.on_input("heat".into());
        let req = state.debounce_elapsed(g).unwrap();
        assert!(state.finish(req.id, Err("500".into())));
        assert_eq!(state.movies, Fetch::Failed(MOVIES_ERROR));
    }

    #[test]
    fn test_stale_response_is_dropped() {
        let mut state = SearchState::new();
        let first = state.initial_request();

        let g = state.on_input("alien".into());
        let second = state.debounce_elapsed(g).unwrap();

        // The newer response arrives first
        assert!(state.finish(second.id, Ok(vec![titled("Alien")])));
        assert!(!state.finish(first.id, Ok(vec![titled("Popular")])));

        assert_eq!(state.movies, Fetch::Ready(vec![titled("Alien")]));
    }
}
