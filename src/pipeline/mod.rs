//! Pipeline entry points for watcher operations.
//!
//! - `run_watch`: Fetch → extract → diff → persist → notify
//! - `run_validate`: Check configuration and schema selectors
//! - `run_info`: Show stored snapshot status per source

pub mod info;
pub mod validate;
pub mod watch;

pub use info::run_info;
pub use validate::run_validate;
pub use watch::run_watch;
