pub mod history;
pub mod models;

pub use history::HistoryEntry;
pub use models::*;
