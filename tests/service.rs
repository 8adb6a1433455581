//! Integration tests for the service layer: creation, authorization,
//! status transitions, the team registry, and concurrent updates.

use cricket_league_engine::{
    generate_admin_code, EngineError, ErrorKind, GameMatch, MemoryStore, NewTournament, Stage,
    Team, TournamentFilter, TournamentService, TournamentStatus, TournamentType,
};
use std::collections::HashMap;
use std::sync::Arc;

fn service() -> TournamentService<MemoryStore> {
    let _ = env_logger::builder().is_test(true).try_init();
    TournamentService::new(MemoryStore::new())
}

fn team(name: &str) -> Team {
    Team::new(name, "blue", "user-1")
}

fn payload(teams: Vec<Team>, matches: Vec<GameMatch>) -> NewTournament {
    NewTournament {
        name: "Premier Cup".to_string(),
        kind: TournamentType::GroupKnockout,
        teams,
        matches,
        groups: HashMap::new(),
        group_count: None,
        knockout_stage: None,
        knockout_format: None,
        has_group_stage: None,
        created_by: "user-1".to_string(),
    }
}

#[test]
fn create_requires_name_and_two_teams() {
    let svc = service();

    let mut unnamed = payload(vec![team("A"), team("B")], vec![]);
    unnamed.name = "  ".to_string();
    assert!(matches!(
        svc.create_tournament(unnamed),
        Err(EngineError::MissingField(_))
    ));

    assert!(matches!(
        svc.create_tournament(payload(vec![team("A")], vec![])),
        Err(EngineError::NotEnoughTeams { supplied: 1 })
    ));
}

#[test]
fn create_rejects_group_members_outside_snapshot() {
    let svc = service();
    let (a, b) = (team("A"), team("B"));
    let outsider = team("C");
    let mut new = payload(vec![a, b], vec![]);
    new.groups = HashMap::from([("Group A".to_string(), vec![outsider.id])]);

    assert!(matches!(
        svc.create_tournament(new),
        Err(EngineError::TeamNotInTournament(id)) if id == outsider.id
    ));
}

#[test]
fn create_rejects_non_knockout_entry_round() {
    let svc = service();
    let mut new = payload(vec![team("A"), team("B")], vec![]);
    new.knockout_stage = Some(Stage::GroupStage);

    assert!(matches!(
        svc.create_tournament(new),
        Err(EngineError::InvalidKnockoutStage(Stage::GroupStage))
    ));
}

#[test]
fn create_applies_documented_defaults() {
    let svc = service();
    let (t, code) = svc
        .create_tournament(payload(vec![team("A"), team("B")], vec![]))
        .unwrap();

    assert_eq!(t.admin_code, code);
    assert_eq!(t.status, TournamentStatus::Ongoing);
    assert_eq!(t.config.group_count, 2);
    assert_eq!(t.config.knockout_stage, Stage::SemiFinal);
    assert!(t.config.has_group_stage);
    assert!(t.winner.is_none());
}

#[test]
fn admin_codes_are_short_uppercase_tokens() {
    for _ in 0..50 {
        let code = generate_admin_code();
        assert_eq!(code.len(), 8);
        assert!(code
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }
}

#[test]
fn wrong_admin_code_is_forbidden_and_leaves_record_untouched() {
    let svc = service();
    let (a, b) = (team("A"), team("B"));
    let m = GameMatch::new(Stage::Final, a.clone(), b.clone());
    let (t, _code) = svc
        .create_tournament(payload(vec![a.clone(), b], vec![m.clone()]))
        .unwrap();

    let before = svc.get_tournament(t.id).unwrap();
    let err = svc
        .record_match_result(t.id, m.id, Some("WRONG123"), a.id, Some(10), Some(5))
        .unwrap_err();

    assert_eq!(err, EngineError::InvalidAdminCode);
    assert_eq!(err.kind(), ErrorKind::Forbidden);
    assert_eq!(svc.get_tournament(t.id).unwrap(), before);
}

#[test]
fn missing_admin_code_is_a_bad_request() {
    let svc = service();
    let (a, b) = (team("A"), team("B"));
    let m = GameMatch::new(Stage::Final, a.clone(), b.clone());
    let (t, _code) = svc
        .create_tournament(payload(vec![a.clone(), b], vec![m.clone()]))
        .unwrap();

    let err = svc
        .record_match_result(t.id, m.id, None, a.id, None, None)
        .unwrap_err();
    assert_eq!(err, EngineError::AdminCodeRequired);
    assert_eq!(err.kind(), ErrorKind::BadRequest);
}

#[test]
fn recording_the_final_completes_the_stored_tournament() {
    let svc = service();
    let (a, b) = (team("A"), team("B"));
    let m = GameMatch::new(Stage::Final, a.clone(), b.clone());
    let (t, code) = svc
        .create_tournament(payload(vec![a.clone(), b.clone()], vec![m.clone()]))
        .unwrap();

    let outcome = svc
        .record_match_result(t.id, m.id, Some(&code), a.id, Some(203), Some(198))
        .unwrap();
    assert_eq!(outcome.winner.as_ref().unwrap().id, a.id);
    assert_eq!(outcome.runner_up.as_ref().unwrap().id, b.id);

    let stored = svc.get_tournament(t.id).unwrap();
    assert_eq!(stored.status, TournamentStatus::Completed);
    assert_eq!(stored.winner.unwrap().id, a.id);
    assert_eq!(stored.runner_up.unwrap().id, b.id);
}

#[test]
fn completed_status_is_sticky() {
    let svc = service();
    let (t, code) = svc
        .create_tournament(payload(vec![team("A"), team("B")], vec![]))
        .unwrap();

    svc.set_status(t.id, Some(&code), TournamentStatus::Completed)
        .unwrap();
    assert!(matches!(
        svc.set_status(t.id, Some(&code), TournamentStatus::Ongoing),
        Err(EngineError::TournamentCompleted)
    ));
    assert_eq!(
        svc.get_tournament(t.id).unwrap().status,
        TournamentStatus::Completed
    );
}

#[test]
fn verify_admin_code_does_not_gate_reads() {
    let svc = service();
    let (t, code) = svc
        .create_tournament(payload(vec![team("A"), team("B")], vec![]))
        .unwrap();

    assert!(svc.verify_admin_code(t.id, &code).unwrap());
    assert!(!svc.verify_admin_code(t.id, "WRONG123").unwrap());
}

#[test]
fn delete_requires_the_admin_code() {
    let svc = service();
    let (t, code) = svc
        .create_tournament(payload(vec![team("A"), team("B")], vec![]))
        .unwrap();

    assert!(matches!(
        svc.delete_tournament(t.id, Some("WRONG123")),
        Err(EngineError::InvalidAdminCode)
    ));
    svc.delete_tournament(t.id, Some(&code)).unwrap();
    assert!(matches!(
        svc.get_tournament(t.id),
        Err(EngineError::TournamentNotFound(_))
    ));
}

#[test]
fn list_filters_by_search_kind_and_creator() {
    let svc = service();
    let mut cup = payload(vec![team("A"), team("B")], vec![]);
    cup.name = "Summer Cup".to_string();
    let mut league = payload(vec![team("C"), team("D")], vec![]);
    league.name = "Winter League".to_string();
    league.kind = TournamentType::League;
    league.created_by = "user-2".to_string();
    svc.create_tournament(cup).unwrap();
    svc.create_tournament(league).unwrap();

    let by_search = svc
        .list_tournaments(&TournamentFilter {
            search: Some("summer".to_string()),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(by_search.len(), 1);
    assert_eq!(by_search[0].name, "Summer Cup");

    let by_kind = svc
        .list_tournaments(&TournamentFilter {
            kind: Some(TournamentType::League),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(by_kind.len(), 1);

    let by_creator = svc
        .list_tournaments(&TournamentFilter {
            created_by: Some("user-2".to_string()),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(by_creator.len(), 1);
    assert_eq!(by_creator[0].created_by, "user-2");

    assert_eq!(svc.list_tournaments(&TournamentFilter::default()).unwrap().len(), 2);
}

#[test]
fn team_deletion_is_blocked_while_referenced() {
    let svc = service();
    let a = svc.add_team("A", "blue", "user-1").unwrap();
    let b = svc.add_team("B", "red", "user-1").unwrap();
    let (t, code) = svc
        .create_tournament(payload(vec![a.clone(), b.clone()], vec![]))
        .unwrap();

    assert!(matches!(
        svc.delete_team(a.id, "user-1"),
        Err(EngineError::TeamInUse(id)) if id == a.id
    ));

    // Deleting the tournament releases the reference.
    svc.delete_tournament(t.id, Some(&code)).unwrap();
    svc.delete_team(a.id, "user-1").unwrap();
    assert_eq!(svc.list_teams().unwrap().len(), 1);
}

#[test]
fn team_deletion_is_creator_scoped() {
    let svc = service();
    let a = svc.add_team("A", "blue", "user-1").unwrap();

    assert!(matches!(
        svc.delete_team(a.id, "someone-else"),
        Err(EngineError::TeamNotFound(_))
    ));
    assert_eq!(svc.list_teams().unwrap().len(), 1);
}

#[test]
fn concurrent_results_on_different_matches_both_land() {
    let svc = Arc::new(service());
    let (a, b, c, d) = (team("A"), team("B"), team("C"), team("D"));
    let first = GameMatch::new(Stage::GroupStage, a.clone(), b.clone());
    let second = GameMatch::new(Stage::GroupStage, c.clone(), d.clone());
    let (t, code) = svc
        .create_tournament(payload(
            vec![a.clone(), b, c, d.clone()],
            vec![first.clone(), second.clone()],
        ))
        .unwrap();

    let mut handles = Vec::new();
    for (match_id, winner) in [(first.id, a.id), (second.id, d.id)] {
        let svc = Arc::clone(&svc);
        let code = code.clone();
        let tournament_id = t.id;
        handles.push(std::thread::spawn(move || {
            svc.record_match_result(
                tournament_id,
                match_id,
                Some(&code),
                winner,
                Some(150),
                Some(140),
            )
            .unwrap();
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    let stored = svc.get_tournament(t.id).unwrap();
    assert_eq!(stored.get_match(first.id).unwrap().winner, Some(a.id));
    assert_eq!(stored.get_match(second.id).unwrap().winner, Some(d.id));
}

#[test]
fn persisted_layout_matches_the_document_schema() {
    let svc = service();
    let (a, b) = (team("A"), team("B"));
    let m = GameMatch::new(Stage::GroupStage, a.clone(), b.clone());
    let (t, _code) = svc
        .create_tournament(payload(vec![a, b], vec![m]))
        .unwrap();

    let value = serde_json::to_value(&t).unwrap();
    assert!(value.get("adminCode").is_some());
    assert!(value.get("createdBy").is_some());
    assert!(value.get("createdAt").is_some());
    assert!(value.get("type").is_some());
    assert_eq!(value["status"], "ongoing");
    assert_eq!(value["groupCount"], 2);
    assert_eq!(value["knockoutStage"], "semi-final");
    assert_eq!(value["knockoutFormat"], "standard");
    assert_eq!(value["hasGroupStage"], true);

    let stored_match = &value["matches"][0];
    assert_eq!(stored_match["stage"], "group-stage");
    assert!(stored_match.get("team1Score").is_some());
    assert!(stored_match.get("team2Score").is_some());

    // The persisted record deserializes back to the same entity.
    let back: cricket_league_engine::Tournament = serde_json::from_value(value).unwrap();
    assert_eq!(back, t);
}
