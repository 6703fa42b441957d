pub mod cli;
pub mod item;

pub use cli::{Cli, ScriptFormat, SourceKind};
pub use item::{sanitize_filename, DownloadItem, RemoteLocator};
