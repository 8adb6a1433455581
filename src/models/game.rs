//! Match and stage definitions for group play and the knockout bracket.

use crate::models::team::{Team, TeamId};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a match (unique within its tournament).
pub type MatchId = Uuid;

/// Labeled phase of a tournament's match sequence.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    GroupStage,
    League,
    QuarterFinal,
    SemiFinal,
    Final,
}

impl Stage {
    /// Persisted label for this stage.
    pub fn label(self) -> &'static str {
        match self {
            Stage::GroupStage => "group-stage",
            Stage::League => "league",
            Stage::QuarterFinal => "quarter-final",
            Stage::SemiFinal => "semi-final",
            Stage::Final => "final",
        }
    }

    /// True for rounds of the knockout bracket (quarter-final onwards).
    pub fn is_knockout(self) -> bool {
        matches!(self, Stage::QuarterFinal | Stage::SemiFinal | Stage::Final)
    }

    /// True iff this is the terminal stage that decides the tournament.
    pub fn is_final(self) -> bool {
        self == Stage::Final
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single match between two embedded team snapshots.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameMatch {
    pub id: MatchId,
    pub stage: Stage,
    pub team1: Team,
    pub team2: Team,
    /// None until a score is reported.
    pub team1_score: Option<u32>,
    pub team2_score: Option<u32>,
    /// None while the match is pending; must reference team1 or team2.
    pub winner: Option<TeamId>,
    /// Group label, set only for group-stage matches of a grouped tournament.
    pub group: Option<String>,
}

impl GameMatch {
    pub fn new(stage: Stage, team1: Team, team2: Team) -> Self {
        Self {
            id: Uuid::new_v4(),
            stage,
            team1,
            team2,
            team1_score: None,
            team2_score: None,
            winner: None,
            group: None,
        }
    }

    /// A match without a winner is pending.
    pub fn is_pending(&self) -> bool {
        self.winner.is_none()
    }

    /// Teams present and distinct; winner (if set) is one of the two.
    pub fn is_valid(&self) -> bool {
        self.team1.id != self.team2.id
            && self
                .winner
                .map_or(true, |w| w == self.team1.id || w == self.team2.id)
    }
}
