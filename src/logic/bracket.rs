//! Bracket/stage engine: validates stage transitions and externally built
//! match lists against the tournament's team snapshot.

use crate::logic::results::resolve_outcome;
use crate::logic::standings::StandingRow;
use crate::models::{
    EngineError, GameMatch, KnockoutFormat, Team, Tournament, TournamentOutcome,
};
use rand::seq::SliceRandom;
use std::collections::HashSet;

/// Validate a match list against a team snapshot: match ids unique, both
/// teams members of the snapshot, winners (where set) well-formed.
pub fn validate_matches(teams: &[Team], matches: &[GameMatch]) -> Result<(), EngineError> {
    let member_ids: HashSet<_> = teams.iter().map(|t| t.id).collect();
    let mut seen = HashSet::with_capacity(matches.len());
    for m in matches {
        if !seen.insert(m.id) {
            return Err(EngineError::DuplicateMatchId(m.id));
        }
        for team in [&m.team1, &m.team2] {
            if !member_ids.contains(&team.id) {
                return Err(EngineError::TeamNotInTournament(team.id));
            }
        }
        if !m.is_valid() {
            return Err(EngineError::MalformedMatch(m.id));
        }
    }
    Ok(())
}

/// Replace the tournament's match list with an externally built one.
///
/// The caller supplies the full intended list (group/league matches
/// included); the engine checks that it is well-formed and that no knockout
/// round arrives while group/league matches in the same list are still
/// pending, then replaces the previous list outright. Supplying the same
/// list twice is idempotent: replace, not append.
pub fn replace_knockout_matches(
    tournament: &mut Tournament,
    matches: Vec<GameMatch>,
) -> Result<TournamentOutcome, EngineError> {
    validate_matches(&tournament.teams, &matches)?;

    let has_knockout = matches.iter().any(|m| m.stage.is_knockout());
    let pending = matches
        .iter()
        .filter(|m| !m.stage.is_knockout() && m.is_pending())
        .count();
    if has_knockout && pending > 0 {
        return Err(EngineError::IncompleteStage { pending });
    }

    tournament.matches = matches;
    Ok(resolve_outcome(tournament))
}

/// Pair teams for the knockout entry round from resolved standings.
///
/// Standard seeding pairs rank 1 vs rank N, rank 2 vs rank N-1, and so on;
/// random seeding shuffles first. With an odd number of rows the middle seed
/// is left unpaired (a bye the bracket builder must place itself).
pub fn suggested_knockout_pairings(
    standings: &[StandingRow],
    format: KnockoutFormat,
) -> Vec<(Team, Team)> {
    let mut seeds: Vec<Team> = standings.iter().map(|row| row.team.clone()).collect();
    if format == KnockoutFormat::Random {
        seeds.shuffle(&mut rand::thread_rng());
    }
    let pairs = seeds.len() / 2;
    (0..pairs)
        .map(|i| (seeds[i].clone(), seeds[seeds.len() - 1 - i].clone()))
        .collect()
}
