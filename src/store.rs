//! Storage collaborator contracts and the in-memory reference store.
//!
//! The engine is storage-agnostic: it only needs "read full record, compute
//! next record in isolation, persist full record" per request. A document
//! store keyed by tournament id satisfies the contract; `MemoryStore` is the
//! in-process implementation used in tests and small deployments.

use crate::models::{EngineError, Team, TeamId, Tournament, TournamentId, TournamentType, UserId};
use std::collections::HashMap;
use std::sync::RwLock;

/// A tournament plus the version the store held when it was read. Writes
/// must present this version back to detect lost concurrent updates.
#[derive(Clone, Debug)]
pub struct StoredTournament {
    pub tournament: Tournament,
    pub version: u64,
}

/// Filters for listing tournaments.
#[derive(Clone, Debug, Default)]
pub struct TournamentFilter {
    /// Case-insensitive name substring.
    pub search: Option<String>,
    pub kind: Option<TournamentType>,
    pub created_by: Option<UserId>,
}

impl TournamentFilter {
    fn matches(&self, tournament: &Tournament) -> bool {
        if let Some(search) = &self.search {
            if !tournament
                .name
                .to_lowercase()
                .contains(&search.to_lowercase())
            {
                return false;
            }
        }
        if let Some(kind) = self.kind {
            if tournament.kind != kind {
                return false;
            }
        }
        if let Some(creator) = &self.created_by {
            if &tournament.created_by != creator {
                return false;
            }
        }
        true
    }
}

/// Tournament persistence contract consumed by the service layer.
pub trait TournamentStore {
    fn insert(&self, tournament: Tournament) -> Result<(), EngineError>;

    fn find(&self, id: TournamentId) -> Result<Option<StoredTournament>, EngineError>;

    /// Replace the record iff its stored version still equals
    /// `expected_version`. A moved version or a missing record both fail
    /// with `WriteConflict`.
    fn replace(
        &self,
        id: TournamentId,
        expected_version: u64,
        tournament: Tournament,
    ) -> Result<(), EngineError>;

    /// True when a record was removed.
    fn delete(&self, id: TournamentId) -> Result<bool, EngineError>;

    /// Matching tournaments, newest first.
    fn list(&self, filter: &TournamentFilter) -> Result<Vec<Tournament>, EngineError>;

    /// True when any tournament's team snapshot embeds this team id.
    fn references_team(&self, team_id: TeamId) -> Result<bool, EngineError>;
}

/// Canonical team registry contract.
pub trait TeamStore {
    fn insert_team(&self, team: Team) -> Result<(), EngineError>;

    fn find_team(&self, id: TeamId) -> Result<Option<Team>, EngineError>;

    /// True when a record was removed.
    fn delete_team(&self, id: TeamId) -> Result<bool, EngineError>;

    fn list_teams(&self) -> Result<Vec<Team>, EngineError>;
}

/// In-memory store over `RwLock<HashMap<..>>`. Versions start at 1 and
/// increase by one per replaced record.
#[derive(Default)]
pub struct MemoryStore {
    tournaments: RwLock<HashMap<TournamentId, StoredTournament>>,
    teams: RwLock<HashMap<TeamId, Team>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error<T>(_: T) -> EngineError {
    EngineError::StoreUnavailable("lock error".to_string())
}

impl TournamentStore for MemoryStore {
    fn insert(&self, tournament: Tournament) -> Result<(), EngineError> {
        let mut g = self.tournaments.write().map_err(lock_error)?;
        g.insert(
            tournament.id,
            StoredTournament {
                tournament,
                version: 1,
            },
        );
        Ok(())
    }

    fn find(&self, id: TournamentId) -> Result<Option<StoredTournament>, EngineError> {
        let g = self.tournaments.read().map_err(lock_error)?;
        Ok(g.get(&id).cloned())
    }

    fn replace(
        &self,
        id: TournamentId,
        expected_version: u64,
        tournament: Tournament,
    ) -> Result<(), EngineError> {
        let mut g = self.tournaments.write().map_err(lock_error)?;
        let entry = g.get_mut(&id).ok_or(EngineError::WriteConflict)?;
        if entry.version != expected_version {
            return Err(EngineError::WriteConflict);
        }
        entry.tournament = tournament;
        entry.version += 1;
        Ok(())
    }

    fn delete(&self, id: TournamentId) -> Result<bool, EngineError> {
        let mut g = self.tournaments.write().map_err(lock_error)?;
        Ok(g.remove(&id).is_some())
    }

    fn list(&self, filter: &TournamentFilter) -> Result<Vec<Tournament>, EngineError> {
        let g = self.tournaments.read().map_err(lock_error)?;
        let mut items: Vec<Tournament> = g
            .values()
            .filter(|e| filter.matches(&e.tournament))
            .map(|e| e.tournament.clone())
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }

    fn references_team(&self, team_id: TeamId) -> Result<bool, EngineError> {
        let g = self.tournaments.read().map_err(lock_error)?;
        Ok(g.values().any(|e| e.tournament.has_team(team_id)))
    }
}

impl TeamStore for MemoryStore {
    fn insert_team(&self, team: Team) -> Result<(), EngineError> {
        let mut g = self.teams.write().map_err(lock_error)?;
        g.insert(team.id, team);
        Ok(())
    }

    fn find_team(&self, id: TeamId) -> Result<Option<Team>, EngineError> {
        let g = self.teams.read().map_err(lock_error)?;
        Ok(g.get(&id).cloned())
    }

    fn delete_team(&self, id: TeamId) -> Result<bool, EngineError> {
        let mut g = self.teams.write().map_err(lock_error)?;
        Ok(g.remove(&id).is_some())
    }

    fn list_teams(&self) -> Result<Vec<Team>, EngineError> {
        let g = self.teams.read().map_err(lock_error)?;
        let mut teams: Vec<Team> = g.values().cloned().collect();
        teams.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(teams)
    }
}
