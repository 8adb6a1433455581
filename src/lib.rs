//! Cricket league tournament engine: teams, group stages, knockout brackets,
//! match results, and winner detection, guarded by per-tournament admin
//! codes. Storage and transport are collaborator concerns; see `store` for
//! the contracts and `service` for the operation surface.

pub mod logic;
pub mod models;
pub mod service;
pub mod store;

pub use logic::{
    apply_match_result, authorize, detect_winner_and_runner_up, generate_admin_code,
    group_standings, league_standings, replace_knockout_matches, suggested_knockout_pairings,
    validate_matches, StandingRow,
};
pub use models::{
    EngineError, ErrorKind, GameMatch, KnockoutFormat, MatchId, Stage, StageConfig, Team, TeamId,
    Tournament, TournamentId, TournamentOutcome, TournamentStatus, TournamentType, UserId,
};
pub use service::{NewTournament, TournamentService};
pub use store::{MemoryStore, StoredTournament, TeamStore, TournamentFilter, TournamentStore};
