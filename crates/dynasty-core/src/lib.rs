// Shared records and configuration for the dynasty league dashboard.
//
// Everything here is plain data: the fetch layer produces these records and
// the analytics engine consumes them.

pub mod config;
pub mod model;
