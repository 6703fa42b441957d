pub mod configuration;
pub mod error;
pub mod models;
pub mod run;
pub mod script;
pub mod source;
pub mod wiki;

pub use configuration::Settings;
pub use models::{Cli, DownloadItem};
pub use run::{run, Fetcher, Outcome, Summary};
pub use source::Source;
