//! Derived group/league standings: computed from matches, never stored.

use crate::models::{GameMatch, Team, Tournament};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One team's row in a standings table. Wins are worth two points; a match
/// either resolves to a winner or stays pending, so draws do not appear.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingRow {
    pub team: Team,
    pub played: u32,
    pub wins: u32,
    pub losses: u32,
    pub points: u32,
}

/// Standings per group, keyed by group label. Rows cover the group's member
/// teams and count only decided matches tagged with that group.
pub fn group_standings(tournament: &Tournament) -> BTreeMap<String, Vec<StandingRow>> {
    let mut tables = BTreeMap::new();
    for (label, member_ids) in &tournament.groups {
        let mut rows: Vec<StandingRow> = tournament
            .teams
            .iter()
            .filter(|t| member_ids.contains(&t.id))
            .map(|team| {
                tally(
                    team,
                    tournament
                        .matches
                        .iter()
                        .filter(|m| m.group.as_deref() == Some(label.as_str())),
                )
            })
            .collect();
        sort_rows(&mut rows);
        tables.insert(label.clone(), rows);
    }
    tables
}

/// Standings over the whole team list, counting every non-knockout match.
/// Used by league-format tournaments without a group partition.
pub fn league_standings(tournament: &Tournament) -> Vec<StandingRow> {
    let mut rows: Vec<StandingRow> = tournament
        .teams
        .iter()
        .map(|team| {
            tally(
                team,
                tournament.matches.iter().filter(|m| !m.stage.is_knockout()),
            )
        })
        .collect();
    sort_rows(&mut rows);
    rows
}

fn tally<'a>(team: &Team, matches: impl Iterator<Item = &'a GameMatch>) -> StandingRow {
    let mut row = StandingRow {
        team: team.clone(),
        played: 0,
        wins: 0,
        losses: 0,
        points: 0,
    };
    for m in matches {
        if m.team1.id != team.id && m.team2.id != team.id {
            continue;
        }
        if let Some(winner) = m.winner {
            row.played += 1;
            if winner == team.id {
                row.wins += 1;
            } else {
                row.losses += 1;
            }
        }
    }
    row.points = row.wins * 2;
    row
}

/// Points, then wins, then name for a stable display order.
fn sort_rows(rows: &mut [StandingRow]) {
    rows.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then(b.wins.cmp(&a.wins))
            .then_with(|| a.team.name.cmp(&b.team.name))
    });
}
