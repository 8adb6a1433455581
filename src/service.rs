//! Mutation coordinator and the engine's exposed operation surface.
//!
//! Every mutating operation is one read-compute-write cycle against a single
//! tournament record: load the current snapshot, authorize, compute the next
//! full record in isolation, and replace it against the version that was
//! read. Validation and authorization always precede mutation, so a failed
//! operation never leaves a partial update behind.

use crate::logic;
use crate::models::{
    EngineError, GameMatch, KnockoutFormat, MatchId, Stage, StageConfig, Team, TeamId, Tournament,
    TournamentId, TournamentOutcome, TournamentStatus, TournamentType, UserId,
};
use crate::store::{StoredTournament, TeamStore, TournamentFilter, TournamentStore};
use chrono::Utc;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// Attempts per read-compute-write cycle before a lost concurrent write is
/// reported to the caller instead of retried.
const MAX_WRITE_ATTEMPTS: usize = 3;

/// Creation payload. Matches, groups, and stage configuration are optional;
/// absent configuration fields resolve to the documented defaults (2 groups,
/// semi-final entry, standard seeding, group stage on).
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTournament {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TournamentType,
    pub teams: Vec<Team>,
    #[serde(default)]
    pub matches: Vec<GameMatch>,
    #[serde(default)]
    pub groups: HashMap<String, Vec<TeamId>>,
    #[serde(default)]
    pub group_count: Option<u32>,
    #[serde(default)]
    pub knockout_stage: Option<Stage>,
    #[serde(default)]
    pub knockout_format: Option<KnockoutFormat>,
    #[serde(default)]
    pub has_group_stage: Option<bool>,
    pub created_by: UserId,
}

impl NewTournament {
    /// Resolve the optional configuration fields once, at construction.
    fn resolve_config(&self) -> StageConfig {
        let defaults = StageConfig::default();
        StageConfig {
            group_count: self.group_count.unwrap_or(defaults.group_count),
            knockout_stage: self.knockout_stage.unwrap_or(defaults.knockout_stage),
            knockout_format: self.knockout_format.unwrap_or(defaults.knockout_format),
            has_group_stage: self.has_group_stage.unwrap_or(defaults.has_group_stage),
        }
    }
}

/// The engine's entry point. Owns an injected storage handle; the handle's
/// lifecycle belongs to the embedding service.
pub struct TournamentService<S> {
    store: S,
}

impl<S> TournamentService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: TournamentStore> TournamentService<S> {
    /// Create a tournament from an atomically supplied team list, optional
    /// match list, and optional groups. Returns the stored record and its
    /// freshly generated admin code.
    pub fn create_tournament(
        &self,
        new: NewTournament,
    ) -> Result<(Tournament, String), EngineError> {
        if new.name.trim().is_empty() {
            return Err(EngineError::MissingField("Tournament name"));
        }
        if new.teams.len() < 2 {
            return Err(EngineError::NotEnoughTeams {
                supplied: new.teams.len(),
            });
        }
        let mut team_ids = HashSet::with_capacity(new.teams.len());
        for team in &new.teams {
            if !team_ids.insert(team.id) {
                return Err(EngineError::DuplicateTeamId(team.id));
            }
        }
        let config = new.resolve_config();
        if !config.knockout_stage.is_knockout() {
            return Err(EngineError::InvalidKnockoutStage(config.knockout_stage));
        }
        logic::validate_matches(&new.teams, &new.matches)?;
        for member_ids in new.groups.values() {
            for id in member_ids {
                if !team_ids.contains(id) {
                    return Err(EngineError::TeamNotInTournament(*id));
                }
            }
        }

        let admin_code = logic::generate_admin_code();
        let tournament = Tournament {
            id: Uuid::new_v4(),
            name: new.name.trim().to_string(),
            kind: new.kind,
            teams: new.teams,
            matches: new.matches,
            groups: new.groups,
            admin_code: admin_code.clone(),
            created_by: new.created_by,
            created_at: Utc::now(),
            status: TournamentStatus::Ongoing,
            winner: None,
            runner_up: None,
            config,
        };
        self.store.insert(tournament.clone())?;
        log::info!("created tournament {} ({})", tournament.id, tournament.name);
        Ok((tournament, admin_code))
    }

    pub fn get_tournament(&self, id: TournamentId) -> Result<Tournament, EngineError> {
        Ok(self
            .store
            .find(id)?
            .ok_or(EngineError::TournamentNotFound(id))?
            .tournament)
    }

    /// Matching tournaments, newest first.
    pub fn list_tournaments(
        &self,
        filter: &TournamentFilter,
    ) -> Result<Vec<Tournament>, EngineError> {
        self.store.list(filter)
    }

    /// Replace the match list after group/league completion with the
    /// caller-built knockout bracket. Returns the re-derived outcome.
    pub fn set_knockout_matches(
        &self,
        id: TournamentId,
        admin_code: Option<&str>,
        matches: Vec<GameMatch>,
    ) -> Result<TournamentOutcome, EngineError> {
        self.update(id, admin_code, move |t| {
            logic::replace_knockout_matches(t, matches.clone())
        })
    }

    /// Record a single match result. Scores not supplied keep the stored
    /// values. Returns the re-derived outcome.
    pub fn record_match_result(
        &self,
        id: TournamentId,
        match_id: MatchId,
        admin_code: Option<&str>,
        winner: TeamId,
        team1_score: Option<u32>,
        team2_score: Option<u32>,
    ) -> Result<TournamentOutcome, EngineError> {
        self.update(id, admin_code, move |t| {
            logic::apply_match_result(t, match_id, winner, team1_score, team2_score)
        })
    }

    /// Set the tournament status. Completed is sticky: reverting to ongoing
    /// is rejected.
    pub fn set_status(
        &self,
        id: TournamentId,
        admin_code: Option<&str>,
        status: TournamentStatus,
    ) -> Result<(), EngineError> {
        self.update(id, admin_code, move |t| {
            if t.status == TournamentStatus::Completed && status == TournamentStatus::Ongoing {
                return Err(EngineError::TournamentCompleted);
            }
            t.status = status;
            Ok(())
        })
    }

    /// True iff the supplied code matches the tournament's admin code.
    pub fn verify_admin_code(&self, id: TournamentId, code: &str) -> Result<bool, EngineError> {
        let stored = self
            .store
            .find(id)?
            .ok_or(EngineError::TournamentNotFound(id))?;
        Ok(stored.tournament.admin_code == code)
    }

    pub fn delete_tournament(
        &self,
        id: TournamentId,
        admin_code: Option<&str>,
    ) -> Result<(), EngineError> {
        let stored = self
            .store
            .find(id)?
            .ok_or(EngineError::TournamentNotFound(id))?;
        logic::authorize(&stored.tournament, admin_code)?;
        if self.store.delete(id)? {
            log::info!("deleted tournament {}", id);
        }
        Ok(())
    }

    /// One read-compute-write cycle: load, authorize, compute the next full
    /// record in isolation, replace against the loaded version. A lost write
    /// is retried with a fresh read instead of silently dropping the update.
    fn update<R>(
        &self,
        id: TournamentId,
        admin_code: Option<&str>,
        apply: impl Fn(&mut Tournament) -> Result<R, EngineError>,
    ) -> Result<R, EngineError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let StoredTournament {
                tournament,
                version,
            } = self
                .store
                .find(id)?
                .ok_or(EngineError::TournamentNotFound(id))?;
            logic::authorize(&tournament, admin_code)?;

            let mut next = tournament;
            let result = apply(&mut next)?;
            match self.store.replace(id, version, next) {
                Ok(()) => return Ok(result),
                Err(EngineError::WriteConflict) if attempt < MAX_WRITE_ATTEMPTS => {
                    log::warn!(
                        "write conflict on tournament {}, retrying ({}/{})",
                        id,
                        attempt,
                        MAX_WRITE_ATTEMPTS
                    );
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl<S: TournamentStore + TeamStore> TournamentService<S> {
    /// Register a canonical team record.
    pub fn add_team(
        &self,
        name: &str,
        color: &str,
        created_by: impl Into<UserId>,
    ) -> Result<Team, EngineError> {
        if name.trim().is_empty() {
            return Err(EngineError::MissingField("Name"));
        }
        if color.trim().is_empty() {
            return Err(EngineError::MissingField("Color"));
        }
        let team = Team::new(name.trim(), color.trim(), created_by);
        self.store.insert_team(team.clone())?;
        Ok(team)
    }

    /// Delete a canonical team record. Blocked while any tournament snapshot
    /// embeds the team; creator-scoped, and a foreign team reads as not
    /// found.
    pub fn delete_team(&self, id: TeamId, requested_by: &str) -> Result<(), EngineError> {
        if self.store.references_team(id)? {
            return Err(EngineError::TeamInUse(id));
        }
        let team = self
            .store
            .find_team(id)?
            .ok_or(EngineError::TeamNotFound(id))?;
        if team.created_by != requested_by {
            return Err(EngineError::TeamNotFound(id));
        }
        self.store.delete_team(id)?;
        Ok(())
    }

    pub fn list_teams(&self) -> Result<Vec<Team>, EngineError> {
        self.store.list_teams()
    }
}
