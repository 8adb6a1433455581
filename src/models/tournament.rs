//! Tournament record, stage configuration, and engine errors.

use crate::models::game::{GameMatch, MatchId, Stage};
use crate::models::team::{Team, TeamId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Errors that can occur during engine operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum EngineError {
    /// No tournament with this id in the store.
    TournamentNotFound(TournamentId),
    /// No match with this id in the tournament's match list.
    MatchNotFound(MatchId),
    /// Team absent from the registry, or not owned by the requester.
    TeamNotFound(TeamId),
    /// A match references a team outside the tournament's snapshot list.
    TeamNotInTournament(TeamId),
    /// Match ids must be unique within a tournament.
    DuplicateMatchId(MatchId),
    /// Team ids must be unique within a tournament's team list.
    DuplicateTeamId(TeamId),
    /// A required field was missing or empty.
    MissingField(&'static str),
    /// Tournaments need at least two teams.
    NotEnoughTeams { supplied: usize },
    /// The configured knockout entry round is not a knockout stage.
    InvalidKnockoutStage(Stage),
    /// Mutating requests must carry the admin code (request-shape error,
    /// distinct from a mismatch).
    AdminCodeRequired,
    /// Supplied admin code does not match the tournament's.
    InvalidAdminCode,
    /// Knockout rounds supplied while group/league matches are still pending.
    IncompleteStage { pending: usize },
    /// A reported winner is not one of the match's two teams.
    MalformedMatch(MatchId),
    /// Completed tournaments cannot go back to ongoing.
    TournamentCompleted,
    /// The team is embedded in at least one tournament and cannot be deleted.
    TeamInUse(TeamId),
    /// A concurrent update won the write; the caller may retry.
    WriteConflict,
    /// The storage collaborator failed; not a domain error.
    StoreUnavailable(String),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::TournamentNotFound(_) => write!(f, "Tournament not found"),
            EngineError::MatchNotFound(_) => write!(f, "Match not found"),
            EngineError::TeamNotFound(_) => write!(f, "Team not found or not authorized"),
            EngineError::TeamNotInTournament(id) => {
                write!(f, "Team {} is not part of this tournament", id)
            }
            EngineError::DuplicateMatchId(id) => {
                write!(f, "Match id {} appears more than once", id)
            }
            EngineError::DuplicateTeamId(id) => {
                write!(f, "Team id {} appears more than once", id)
            }
            EngineError::MissingField(field) => write!(f, "{} required", field),
            EngineError::NotEnoughTeams { supplied } => {
                write!(f, "At least 2 teams required (got {})", supplied)
            }
            EngineError::InvalidKnockoutStage(stage) => {
                write!(f, "{} is not a knockout stage", stage)
            }
            EngineError::AdminCodeRequired => write!(f, "Admin code required"),
            EngineError::InvalidAdminCode => write!(f, "Invalid admin code"),
            EngineError::IncompleteStage { pending } => {
                write!(f, "{} group/league match(es) still pending", pending)
            }
            EngineError::MalformedMatch(_) => {
                write!(f, "Winner must be one of the match's two teams")
            }
            EngineError::TournamentCompleted => write!(f, "Tournament is already completed"),
            EngineError::TeamInUse(_) => {
                write!(f, "Cannot delete team that is used in tournaments")
            }
            EngineError::WriteConflict => write!(f, "Tournament was modified concurrently"),
            EngineError::StoreUnavailable(msg) => write!(f, "Storage unavailable: {}", msg),
        }
    }
}

impl std::error::Error for EngineError {}

/// Coarse classification for callers that render errors as status codes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    NotFound,
    BadRequest,
    Forbidden,
    Conflict,
    Unavailable,
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::TournamentNotFound(_)
            | EngineError::MatchNotFound(_)
            | EngineError::TeamNotFound(_) => ErrorKind::NotFound,
            EngineError::InvalidAdminCode => ErrorKind::Forbidden,
            EngineError::WriteConflict => ErrorKind::Conflict,
            EngineError::StoreUnavailable(_) => ErrorKind::Unavailable,
            _ => ErrorKind::BadRequest,
        }
    }
}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Tournament status. Completed is sticky: once a winner is determined the
/// status never reverts inside the engine.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TournamentStatus {
    #[default]
    Ongoing,
    Completed,
}

/// Supported tournament formats.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TournamentType {
    League,
    Knockout,
    GroupKnockout,
}

/// How the knockout bracket is seeded from standings.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KnockoutFormat {
    /// Rank 1 vs rank N, rank 2 vs rank N-1, and so on.
    #[default]
    Standard,
    Random,
}

/// Stage configuration, resolved once at tournament creation.
///
/// Defaults: 2 groups, knockout entry at the semi-final, standard seeding,
/// group stage enabled.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageConfig {
    pub group_count: u32,
    /// Entry round of the knockout bracket.
    pub knockout_stage: Stage,
    pub knockout_format: KnockoutFormat,
    pub has_group_stage: bool,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            group_count: 2,
            knockout_stage: Stage::SemiFinal,
            knockout_format: KnockoutFormat::Standard,
            has_group_stage: true,
        }
    }
}

/// Winner and runner-up of a tournament, derived from its Final match.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentOutcome {
    pub winner: Option<Team>,
    pub runner_up: Option<Team>,
}

impl TournamentOutcome {
    pub fn is_decided(&self) -> bool {
        self.winner.is_some()
    }
}

/// Full tournament record: the unit of mutation and of persistence. Mutating
/// operations read the whole record, compute a new one, and write it back.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TournamentType,
    /// Point-in-time copies of the canonical team records.
    pub teams: Vec<Team>,
    /// Append/update only; never reordered, individual entries never deleted.
    pub matches: Vec<GameMatch>,
    /// Group label -> ordered member team ids.
    pub groups: HashMap<String, Vec<TeamId>>,
    /// Shared mutation token; generated at creation, never regenerated.
    pub admin_code: String,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    pub status: TournamentStatus,
    /// Set only by the result resolver.
    pub winner: Option<Team>,
    pub runner_up: Option<Team>,
    #[serde(flatten)]
    pub config: StageConfig,
}

impl Tournament {
    /// Find a match by id.
    pub fn get_match(&self, id: MatchId) -> Option<&GameMatch> {
        self.matches.iter().find(|m| m.id == id)
    }

    /// Mutable reference to a match by id.
    pub fn get_match_mut(&mut self, id: MatchId) -> Option<&mut GameMatch> {
        self.matches.iter_mut().find(|m| m.id == id)
    }

    /// True iff the team id is in this tournament's snapshot list.
    pub fn has_team(&self, id: TeamId) -> bool {
        self.teams.iter().any(|t| t.id == id)
    }
}
