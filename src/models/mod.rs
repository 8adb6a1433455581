//! Data structures for the league engine: teams, matches, tournaments.

mod game;
mod team;
mod tournament;

pub use game::{GameMatch, MatchId, Stage};
pub use team::{Team, TeamId, UserId};
pub use tournament::{
    EngineError, ErrorKind, KnockoutFormat, StageConfig, Tournament, TournamentId,
    TournamentOutcome, TournamentStatus, TournamentType,
};
