pub mod storage;
pub mod watchlist;
pub mod search;
pub mod detail;
pub mod view;
pub mod session;

#[cfg(test)]
mod testing;

pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError, load_or_default, save};
pub use watchlist::{WatchlistError, WatchlistStore};
pub use search::{QueryState, SearchCompletion, SearchController};
pub use detail::{DetailCompletion, DetailLoader};
pub use view::{BoxPanels, DetailSession, LayoutMode, ViewError, ViewState, DEFAULT_WINDOW_TITLE};
pub use session::{Session, SessionChannels, SessionSettings};
