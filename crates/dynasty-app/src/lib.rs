pub mod client;
pub mod fetch;
pub mod logging;
pub mod players;
pub mod report;
pub mod sleeper;
pub mod snapshot;
pub mod source;
