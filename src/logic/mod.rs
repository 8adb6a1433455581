//! Tournament business logic: authorization, brackets, results, standings.

mod admin;
mod bracket;
mod results;
mod standings;

pub use admin::{authorize, generate_admin_code};
pub use bracket::{replace_knockout_matches, suggested_knockout_pairings, validate_matches};
pub use results::{apply_match_result, detect_winner_and_runner_up};
pub use standings::{group_standings, league_standings, StandingRow};
