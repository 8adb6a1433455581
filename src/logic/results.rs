//! Result resolver: apply a reported match result and re-derive the
//! tournament-level outcome.

use crate::models::{
    EngineError, GameMatch, MatchId, TeamId, Tournament, TournamentOutcome, TournamentStatus,
};

/// Derive winner and runner-up from the Final-stage match.
///
/// No Final, or a Final without a winner, yields `(None, None)`. A winner id
/// matching neither team (pre-existing bad data; `is_valid` rejects it on the
/// way in) is treated the same rather than guessing a runner-up.
pub fn detect_winner_and_runner_up(matches: &[GameMatch]) -> TournamentOutcome {
    let final_match = match matches.iter().find(|m| m.stage.is_final()) {
        Some(m) => m,
        None => return TournamentOutcome::default(),
    };
    let winner_id = match final_match.winner {
        Some(id) => id,
        None => return TournamentOutcome::default(),
    };

    if winner_id == final_match.team1.id {
        TournamentOutcome {
            winner: Some(final_match.team1.clone()),
            runner_up: Some(final_match.team2.clone()),
        }
    } else if winner_id == final_match.team2.id {
        TournamentOutcome {
            winner: Some(final_match.team2.clone()),
            runner_up: Some(final_match.team1.clone()),
        }
    } else {
        TournamentOutcome::default()
    }
}

/// Apply a single match result and recompute the tournament outcome.
///
/// Scores not supplied keep their previously stored values (a result update
/// may report only the winner). Only the targeted match is modified. Status
/// flips to completed iff a winner is now determined; otherwise it is left
/// unchanged.
pub fn apply_match_result(
    tournament: &mut Tournament,
    match_id: MatchId,
    winner: TeamId,
    team1_score: Option<u32>,
    team2_score: Option<u32>,
) -> Result<TournamentOutcome, EngineError> {
    let m = tournament
        .get_match_mut(match_id)
        .ok_or(EngineError::MatchNotFound(match_id))?;
    if winner != m.team1.id && winner != m.team2.id {
        return Err(EngineError::MalformedMatch(match_id));
    }

    m.winner = Some(winner);
    m.team1_score = team1_score.or(m.team1_score);
    m.team2_score = team2_score.or(m.team2_score);

    Ok(resolve_outcome(tournament))
}

/// Recompute winner/runner-up over the current match list and fold the
/// result into the record.
pub(crate) fn resolve_outcome(tournament: &mut Tournament) -> TournamentOutcome {
    let outcome = detect_winner_and_runner_up(&tournament.matches);
    tournament.winner = outcome.winner.clone();
    tournament.runner_up = outcome.runner_up.clone();
    if outcome.is_decided() {
        tournament.status = TournamentStatus::Completed;
    }
    outcome
}
