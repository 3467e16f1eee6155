// Data Models
pub mod clipboard;
pub mod download;
pub mod entry;
pub mod history;
pub mod selection;

pub use clipboard::{ClipboardContent, ClipboardController};
pub use download::{CancelSignal, Download, DownloadEvent, DownloadId, ProgressSink};
pub use entry::{Blob, EntryId, ListItem};
pub use history::HistoryNavigator;
pub use selection::{SelectionNavigator, ToggleOutcome};
