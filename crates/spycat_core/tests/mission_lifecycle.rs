use rusqlite::Connection;
use spycat_core::db::open_db_in_memory;
use spycat_core::{
    MissionRepository, MissionService, RepoError, SqliteMissionRepository, TargetDraft,
    TargetUpdate, ValidationError,
};

fn target(name: &str, country: &str) -> TargetDraft {
    TargetDraft::new(name, country)
}

fn table_count(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
        row.get(0)
    })
    .unwrap()
}

#[test]
fn create_mission_with_one_to_three_targets() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteMissionRepository::try_new(&mut conn).unwrap();

    for count in 1..=3 {
        let drafts: Vec<_> = (0..count)
            .map(|i| target(&format!("T{i}"), "FR"))
            .collect();
        let mission = repo.create_mission(&drafts).unwrap();

        assert_eq!(mission.targets.len(), count);
        assert!(!mission.is_complete);
        assert!(mission.agent_id.is_none());
        for t in &mission.targets {
            assert_eq!(t.mission_id, mission.id);
            assert!(!t.is_complete);
            assert!(t.notes.is_empty());
        }
    }
}

#[test]
fn create_mission_preserves_target_order_and_draft_notes() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteMissionRepository::try_new(&mut conn).unwrap();

    let mut second = target("T2", "DE");
    second.notes = "briefing attached".to_string();
    let mission = repo
        .create_mission(&[target("T1", "FR"), second])
        .unwrap();

    assert_eq!(mission.targets[0].name, "T1");
    assert_eq!(mission.targets[0].country, "FR");
    assert_eq!(mission.targets[1].name, "T2");
    assert_eq!(mission.targets[1].notes, "briefing attached");
}

#[test]
fn create_mission_rejects_invalid_target_counts_without_partial_rows() {
    let mut conn = open_db_in_memory().unwrap();
    {
        let mut repo = SqliteMissionRepository::try_new(&mut conn).unwrap();

        let err = repo.create_mission(&[]).unwrap_err();
        assert!(matches!(err, RepoError::InvalidTargetCount(0)));

        let four: Vec<_> = (0..4).map(|i| target(&format!("T{i}"), "FR")).collect();
        let err = repo.create_mission(&four).unwrap_err();
        assert!(matches!(err, RepoError::InvalidTargetCount(4)));
    }

    assert_eq!(table_count(&conn, "missions"), 0);
    assert_eq!(table_count(&conn, "targets"), 0);
}

#[test]
fn create_mission_rejects_invalid_target_fields_without_partial_rows() {
    let mut conn = open_db_in_memory().unwrap();
    {
        let mut repo = SqliteMissionRepository::try_new(&mut conn).unwrap();

        let err = repo
            .create_mission(&[target("T1", "FR"), target("", "DE")])
            .unwrap_err();
        assert!(matches!(
            err,
            RepoError::Validation(ValidationError::EmptyTargetName)
        ));
    }

    assert_eq!(table_count(&conn, "missions"), 0);
    assert_eq!(table_count(&conn, "targets"), 0);
}

#[test]
fn mission_completes_exactly_when_last_target_completes() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteMissionRepository::try_new(&mut conn).unwrap();

    let mission = repo
        .create_mission(&[target("T1", "FR"), target("T2", "DE"), target("T3", "IT")])
        .unwrap();
    let ids: Vec<_> = mission.targets.iter().map(|t| t.id).collect();

    repo.update_target(ids[0], &TargetUpdate::complete()).unwrap();
    assert!(!repo.get_mission(mission.id).unwrap().unwrap().is_complete);

    repo.update_target(ids[1], &TargetUpdate::complete()).unwrap();
    assert!(!repo.get_mission(mission.id).unwrap().unwrap().is_complete);

    let last = repo.update_target(ids[2], &TargetUpdate::complete()).unwrap();
    assert!(last.is_complete);
    assert!(repo.get_mission(mission.id).unwrap().unwrap().is_complete);

    // Further completion writes are idempotent and never unset the mission.
    repo.update_target(ids[2], &TargetUpdate::complete()).unwrap();
    assert!(repo.get_mission(mission.id).unwrap().unwrap().is_complete);
}

#[test]
fn target_completion_is_monotonic() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteMissionRepository::try_new(&mut conn).unwrap();

    let mission = repo.create_mission(&[target("T1", "FR")]).unwrap();
    let target_id = mission.targets[0].id;

    repo.update_target(target_id, &TargetUpdate::complete()).unwrap();

    let reverted = repo
        .update_target(
            target_id,
            &TargetUpdate {
                notes: None,
                is_complete: Some(false),
            },
        )
        .unwrap();
    assert!(reverted.is_complete);
    assert!(repo.get_mission(mission.id).unwrap().unwrap().is_complete);
}

#[test]
fn notes_update_applies_while_target_and_mission_are_incomplete() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteMissionRepository::try_new(&mut conn).unwrap();

    let mission = repo
        .create_mission(&[target("T1", "FR"), target("T2", "DE")])
        .unwrap();
    let target_id = mission.targets[0].id;

    let updated = repo
        .update_target(target_id, &TargetUpdate::notes("spotted at dawn"))
        .unwrap();
    assert_eq!(updated.notes, "spotted at dawn");
    assert!(!updated.is_complete);
}

#[test]
fn notes_are_locked_once_the_target_is_complete() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteMissionRepository::try_new(&mut conn).unwrap();

    let mission = repo
        .create_mission(&[target("T1", "FR"), target("T2", "DE")])
        .unwrap();
    let target_id = mission.targets[0].id;

    repo.update_target(target_id, &TargetUpdate::complete()).unwrap();

    let err = repo
        .update_target(target_id, &TargetUpdate::notes("late note"))
        .unwrap_err();
    assert!(matches!(err, RepoError::LockedForEditing(id) if id == target_id));

    let unchanged = repo.get_target(target_id).unwrap().unwrap();
    assert!(unchanged.notes.is_empty());
}

#[test]
fn notes_are_locked_once_the_mission_is_complete() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteMissionRepository::try_new(&mut conn).unwrap();

    let mission = repo
        .create_mission(&[target("T1", "FR"), target("T2", "DE")])
        .unwrap();
    let first = mission.targets[0].id;
    let second = mission.targets[1].id;

    repo.update_target(first, &TargetUpdate::complete()).unwrap();
    repo.update_target(second, &TargetUpdate::complete()).unwrap();
    assert!(repo.get_mission(mission.id).unwrap().unwrap().is_complete);

    // The first target is complete, but even an incomplete sibling would be
    // locked now that the owning mission is complete.
    let err = repo
        .update_target(first, &TargetUpdate::notes("late note"))
        .unwrap_err();
    assert!(matches!(err, RepoError::LockedForEditing(_)));
}

#[test]
fn locked_combined_update_rejects_the_whole_call() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteMissionRepository::try_new(&mut conn).unwrap();

    let mission = repo
        .create_mission(&[target("T1", "FR"), target("T2", "DE")])
        .unwrap();
    let first = mission.targets[0].id;
    let second = mission.targets[1].id;

    repo.update_target(first, &TargetUpdate::complete()).unwrap();

    // Notes are locked on the first target; the legal is_complete write in
    // the same call must not be applied either.
    let err = repo
        .update_target(
            first,
            &TargetUpdate {
                notes: Some("smuggled note".to_string()),
                is_complete: Some(true),
            },
        )
        .unwrap_err();
    assert!(matches!(err, RepoError::LockedForEditing(_)));

    // The sibling is untouched and the mission is still incomplete.
    let sibling = repo.get_target(second).unwrap().unwrap();
    assert!(!sibling.is_complete);
    assert!(!repo.get_mission(mission.id).unwrap().unwrap().is_complete);
}

#[test]
fn combined_update_applies_both_fields_when_unlocked() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteMissionRepository::try_new(&mut conn).unwrap();

    let mission = repo
        .create_mission(&[target("T1", "FR"), target("T2", "DE")])
        .unwrap();
    let target_id = mission.targets[0].id;

    let updated = repo
        .update_target(
            target_id,
            &TargetUpdate {
                notes: Some("confirmed sighting".to_string()),
                is_complete: Some(true),
            },
        )
        .unwrap();
    assert_eq!(updated.notes, "confirmed sighting");
    assert!(updated.is_complete);
}

#[test]
fn update_target_reports_missing_targets() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteMissionRepository::try_new(&mut conn).unwrap();

    let err = repo
        .update_target(404, &TargetUpdate::notes("ghost"))
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound { id: 404, .. }));
}

#[test]
fn service_wraps_repository_calls() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteMissionRepository::try_new(&mut conn).unwrap();
    let mut service = MissionService::new(repo);

    let mission = service.create_mission(&[target("T1", "FR")]).unwrap();
    let fetched = service.get_mission(mission.id).unwrap().unwrap();
    assert_eq!(fetched.id, mission.id);

    let updated = service
        .update_target(mission.targets[0].id, &TargetUpdate::complete())
        .unwrap();
    assert!(updated.is_complete);
    assert!(service.get_mission(mission.id).unwrap().unwrap().is_complete);
}

#[test]
fn target_draft_deserializes_with_default_notes() {
    let draft: TargetDraft = serde_json::from_str(r#"{"name":"T1","country":"FR"}"#).unwrap();
    assert_eq!(draft, TargetDraft::new("T1", "FR"));
}
