// Analytics engine: per-team performance metrics, composite power rankings,
// playoff bracket resolution, draft-pick ownership, league history and
// roster breakdowns.
//
// Every function here is a pure transformation over already-fetched league
// records. Sparse data (bye weeks, unplayed weeks, undecided brackets) maps
// to neutral defaults instead of errors.

pub mod acquisition;
pub mod ages;
pub mod all_play;
pub mod awards;
pub mod bracket;
pub mod consistency;
pub mod form;
pub mod picks;
pub mod power;
pub mod records;
pub mod schedule;
pub mod scores;
pub mod standings;
