/// State management module
///
/// This module handles all application state, including:
/// - Shared data structures (data.rs)
/// - The debounced search controller (search.rs)
/// - The local SQLite trending store (trending_db.rs)

pub mod data;
pub mod search;
pub mod trending_db;
