// System Layer
pub mod archive_fs;
pub mod host;
pub mod terminal;
pub mod zip_codec;

pub use archive_fs::{ArchiveFs, ExportJob, FileJob};
pub use host::{Host, PickedFile};
pub use terminal::TerminalHost;
