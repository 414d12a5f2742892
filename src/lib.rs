pub mod cli;
pub mod collect;
pub mod config;
pub mod contract;
pub mod enrich;
pub mod mailer;
pub mod pipeline;
pub mod report;
pub mod resolve;
pub mod source;

pub use cli::{run, Cli};
pub use contract::JobRecord;
pub use pipeline::run_report;
