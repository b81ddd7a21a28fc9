pub mod config;
pub mod error;
pub mod note;
pub mod patch;
pub mod project;
pub mod task;
pub mod wikilinks;

pub use config::Config;
pub use error::*;
pub use note::*;
pub use project::*;
pub use task::*;
