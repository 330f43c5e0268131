//! Mission rule-engine repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist the mission aggregate (mission row + owned target rows).
//! - Enforce cross-entity invariants inside single immediate transactions:
//!   creation atomicity, assignment exclusivity, the notes lock, completion
//!   propagation, and the deletion guard.
//!
//! # Invariants
//! - A mission and its 1..=3 targets are written atomically or not at all.
//! - `agent_id` is written through a guarded UPDATE (`AND agent_id IS NULL`),
//!   so two racing assignments cannot both succeed.
//! - "All targets complete" is recomputed from persisted target rows on every
//!   completion write; no counter is maintained.
//! - Completion flags never move backward, on targets or missions.

use crate::model::agent::AgentId;
use crate::model::mission::{
    target_count_in_range, Mission, MissionId, Target, TargetDraft, TargetId, TargetUpdate,
};
use crate::repo::{
    bool_to_int, ensure_connection_ready, int_to_bool, EntityKind, ListQuery, RepoError,
    RepoResult,
};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row, TransactionBehavior};

const TARGET_SELECT_SQL: &str = "SELECT
    id,
    mission_id,
    name,
    country,
    notes,
    is_complete
FROM targets";

/// Repository interface for the mission/target lifecycle and assignment.
pub trait MissionRepository {
    /// Creates one mission with its targets in a single atomic unit.
    fn create_mission(&mut self, targets: &[TargetDraft]) -> RepoResult<Mission>;
    /// Gets one mission with its targets by id.
    fn get_mission(&self, id: MissionId) -> RepoResult<Option<Mission>>;
    /// Lists missions ordered by id using offset/limit pagination.
    fn list_missions(&self, query: &ListQuery) -> RepoResult<Vec<Mission>>;
    /// Deletes one unassigned mission, cascading its targets.
    fn delete_mission(&mut self, id: MissionId) -> RepoResult<()>;
    /// Assigns an agent to a mission; assignment is permanent.
    fn assign_agent(&mut self, mission_id: MissionId, agent_id: AgentId) -> RepoResult<Mission>;
    /// Applies a notes/completion update to one target.
    fn update_target(&mut self, target_id: TargetId, update: &TargetUpdate) -> RepoResult<Target>;
    /// Gets one target by id.
    fn get_target(&self, id: TargetId) -> RepoResult<Option<Target>>;
}

/// SQLite-backed mission repository.
///
/// Holds a mutable connection borrow because every rule-engine write runs in
/// an immediate transaction.
pub struct SqliteMissionRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteMissionRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl MissionRepository for SqliteMissionRepository<'_> {
    fn create_mission(&mut self, targets: &[TargetDraft]) -> RepoResult<Mission> {
        if !target_count_in_range(targets.len()) {
            return Err(RepoError::InvalidTargetCount(targets.len()));
        }
        for draft in targets {
            draft.validate()?;
        }

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        tx.execute(
            "INSERT INTO missions (agent_id, is_complete) VALUES (NULL, 0);",
            [],
        )?;
        let mission_id = tx.last_insert_rowid();

        for draft in targets {
            tx.execute(
                "INSERT INTO targets (mission_id, name, country, notes, is_complete)
                 VALUES (?1, ?2, ?3, ?4, 0);",
                params![
                    mission_id,
                    draft.name.as_str(),
                    draft.country.as_str(),
                    draft.notes.as_str(),
                ],
            )?;
        }

        let mission = load_mission(&tx, mission_id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("created mission {mission_id} not found in read-back"))
        })?;
        tx.commit()?;
        Ok(mission)
    }

    fn get_mission(&self, id: MissionId) -> RepoResult<Option<Mission>> {
        load_mission(self.conn, id)
    }

    fn list_missions(&self, query: &ListQuery) -> RepoResult<Vec<Mission>> {
        let mut sql = String::from("SELECT id FROM missions ORDER BY id ASC");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
            if query.offset > 0 {
                sql.push_str(" OFFSET ?");
                bind_values.push(Value::Integer(i64::from(query.offset)));
            }
        } else if query.offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut ids = Vec::new();
        while let Some(row) = rows.next()? {
            ids.push(row.get::<_, MissionId>(0)?);
        }
        drop(rows);

        let mut missions = Vec::with_capacity(ids.len());
        for id in ids {
            let mission = load_mission(self.conn, id)?.ok_or_else(|| {
                RepoError::InvalidData(format!("listed mission {id} vanished during read"))
            })?;
            missions.push(mission);
        }
        Ok(missions)
    }

    fn delete_mission(&mut self, id: MissionId) -> RepoResult<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let agent_id: Option<AgentId> = tx
            .query_row("SELECT agent_id FROM missions WHERE id = ?1;", [id], |row| {
                row.get(0)
            })
            .optional()?
            .ok_or(RepoError::NotFound {
                kind: EntityKind::Mission,
                id,
            })?;

        if agent_id.is_some() {
            return Err(RepoError::AssignedConflict(id));
        }

        let changed = tx.execute(
            "DELETE FROM missions WHERE id = ?1 AND agent_id IS NULL;",
            [id],
        )?;
        if changed == 0 {
            return Err(RepoError::AssignedConflict(id));
        }

        tx.commit()?;
        Ok(())
    }

    fn assign_agent(&mut self, mission_id: MissionId, agent_id: AgentId) -> RepoResult<Mission> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let current_agent: Option<AgentId> = tx
            .query_row(
                "SELECT agent_id FROM missions WHERE id = ?1;",
                [mission_id],
                |row| row.get(0),
            )
            .optional()?
            .ok_or(RepoError::NotFound {
                kind: EntityKind::Mission,
                id: mission_id,
            })?;

        let agent_exists: i64 = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM agents WHERE id = ?1);",
            [agent_id],
            |row| row.get(0),
        )?;
        if agent_exists == 0 {
            return Err(RepoError::NotFound {
                kind: EntityKind::Agent,
                id: agent_id,
            });
        }

        if current_agent.is_some() {
            return Err(RepoError::AlreadyAssigned(mission_id));
        }

        let busy: i64 = tx.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM missions
                WHERE agent_id = ?1
                  AND is_complete = 0
            );",
            [agent_id],
            |row| row.get(0),
        )?;
        if busy == 1 {
            return Err(RepoError::AgentBusy(agent_id));
        }

        let changed = tx.execute(
            "UPDATE missions
             SET agent_id = ?2
             WHERE id = ?1
               AND agent_id IS NULL;",
            params![mission_id, agent_id],
        )?;
        if changed == 0 {
            return Err(RepoError::AlreadyAssigned(mission_id));
        }

        let mission = load_mission(&tx, mission_id)?.ok_or_else(|| {
            RepoError::InvalidData(format!(
                "assigned mission {mission_id} not found in read-back"
            ))
        })?;
        tx.commit()?;
        Ok(mission)
    }

    fn update_target(&mut self, target_id: TargetId, update: &TargetUpdate) -> RepoResult<Target> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let target = load_target(&tx, target_id)?.ok_or(RepoError::NotFound {
            kind: EntityKind::Target,
            id: target_id,
        })?;

        let mission_complete = tx
            .query_row(
                "SELECT is_complete FROM missions WHERE id = ?1;",
                [target.mission_id],
                |row| row.get::<_, i64>(0),
            )
            .optional()?
            .map(|value| int_to_bool(value, "missions.is_complete"))
            .transpose()?
            .ok_or_else(|| {
                RepoError::InvalidData(format!(
                    "target {target_id} references missing mission {}",
                    target.mission_id
                ))
            })?;

        // All-or-nothing: a locked notes write rejects the whole update before
        // any field, including is_complete, is applied.
        if update.notes.is_some() && (target.is_complete || mission_complete) {
            return Err(RepoError::LockedForEditing(target_id));
        }

        if let Some(notes) = update.notes.as_deref() {
            tx.execute(
                "UPDATE targets SET notes = ?2 WHERE id = ?1;",
                params![target_id, notes],
            )?;
        }

        if let Some(requested) = update.is_complete {
            // Monotonic: an already-complete target never reverts.
            let next = target.is_complete || requested;
            tx.execute(
                "UPDATE targets SET is_complete = ?2 WHERE id = ?1;",
                params![target_id, bool_to_int(next)],
            )?;

            if next {
                propagate_mission_completion(&tx, target.mission_id)?;
            }
        }

        let updated = load_target(&tx, target_id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("updated target {target_id} not found in read-back"))
        })?;
        tx.commit()?;
        Ok(updated)
    }

    fn get_target(&self, id: TargetId) -> RepoResult<Option<Target>> {
        load_target(self.conn, id)
    }
}

/// Marks the mission complete when no incomplete target remains.
///
/// Recomputes from the current persisted target set; runs on every completion
/// write, not just the last one.
fn propagate_mission_completion(conn: &Connection, mission_id: MissionId) -> RepoResult<()> {
    let remaining: i64 = conn.query_row(
        "SELECT COUNT(*)
         FROM targets
         WHERE mission_id = ?1
           AND is_complete = 0;",
        [mission_id],
        |row| row.get(0),
    )?;

    if remaining == 0 {
        conn.execute(
            "UPDATE missions
             SET is_complete = 1
             WHERE id = ?1
               AND is_complete = 0;",
            [mission_id],
        )?;
    }

    Ok(())
}

fn load_mission(conn: &Connection, id: MissionId) -> RepoResult<Option<Mission>> {
    let header = conn
        .query_row(
            "SELECT id, agent_id, is_complete FROM missions WHERE id = ?1;",
            [id],
            |row| {
                Ok((
                    row.get::<_, MissionId>(0)?,
                    row.get::<_, Option<AgentId>>(1)?,
                    row.get::<_, i64>(2)?,
                ))
            },
        )
        .optional()?;

    let Some((mission_id, agent_id, complete_raw)) = header else {
        return Ok(None);
    };

    Ok(Some(Mission {
        id: mission_id,
        agent_id,
        is_complete: int_to_bool(complete_raw, "missions.is_complete")?,
        targets: load_targets_for_mission(conn, mission_id)?,
    }))
}

fn load_targets_for_mission(conn: &Connection, mission_id: MissionId) -> RepoResult<Vec<Target>> {
    let mut stmt = conn.prepare(&format!(
        "{TARGET_SELECT_SQL} WHERE mission_id = ?1 ORDER BY id ASC;"
    ))?;
    let mut rows = stmt.query([mission_id])?;
    let mut targets = Vec::new();
    while let Some(row) = rows.next()? {
        targets.push(parse_target_row(row)?);
    }
    Ok(targets)
}

fn load_target(conn: &Connection, id: TargetId) -> RepoResult<Option<Target>> {
    let mut stmt = conn.prepare(&format!("{TARGET_SELECT_SQL} WHERE id = ?1;"))?;
    let mut rows = stmt.query([id])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_target_row(row)?));
    }
    Ok(None)
}

fn parse_target_row(row: &Row<'_>) -> RepoResult<Target> {
    Ok(Target {
        id: row.get("id")?,
        mission_id: row.get("mission_id")?,
        name: row.get("name")?,
        country: row.get("country")?,
        notes: row.get("notes")?,
        is_complete: int_to_bool(row.get("is_complete")?, "targets.is_complete")?,
    })
}
