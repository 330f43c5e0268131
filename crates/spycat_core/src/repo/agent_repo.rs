//! Agent roster repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over the `agents` table.
//! - Answer the derived "has active mission" query for the rule engine.
//!
//! # Invariants
//! - Write paths validate drafts before SQL mutations.
//! - `salary` is the only column updated after creation.
//! - Agent deletion is unconditional; no mission-state guard exists here.
//! - Agent workload is derived from `missions` rows, never a stored pointer.

use crate::model::agent::{Agent, AgentDraft, AgentId};
use crate::model::ValidationError;
use crate::repo::{ensure_connection_ready, EntityKind, ListQuery, RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const AGENT_SELECT_SQL: &str = "SELECT
    id,
    name,
    years_of_experience,
    breed,
    salary
FROM agents";

/// Repository interface for the agent roster.
pub trait AgentRepository {
    /// Creates one agent and returns the persisted row.
    fn create_agent(&self, draft: &AgentDraft) -> RepoResult<Agent>;
    /// Gets one agent by id.
    fn get_agent(&self, id: AgentId) -> RepoResult<Option<Agent>>;
    /// Lists agents ordered by id using offset/limit pagination.
    fn list_agents(&self, query: &ListQuery) -> RepoResult<Vec<Agent>>;
    /// Replaces the agent's salary, the only mutable field.
    fn update_salary(&self, id: AgentId, salary: f64) -> RepoResult<Agent>;
    /// Deletes one agent unconditionally.
    fn delete_agent(&self, id: AgentId) -> RepoResult<()>;
    /// Returns whether the agent holds an assigned, incomplete mission.
    fn has_active_mission(&self, id: AgentId) -> RepoResult<bool>;
}

/// SQLite-backed agent repository.
pub struct SqliteAgentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAgentRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl AgentRepository for SqliteAgentRepository<'_> {
    fn create_agent(&self, draft: &AgentDraft) -> RepoResult<Agent> {
        draft.validate()?;

        self.conn.execute(
            "INSERT INTO agents (name, years_of_experience, breed, salary)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                draft.name.as_str(),
                draft.years_of_experience,
                draft.breed.as_str(),
                draft.salary,
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        load_agent(self.conn, id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("created agent {id} not found in read-back"))
        })
    }

    fn get_agent(&self, id: AgentId) -> RepoResult<Option<Agent>> {
        load_agent(self.conn, id)
    }

    fn list_agents(&self, query: &ListQuery) -> RepoResult<Vec<Agent>> {
        let mut sql = format!("{AGENT_SELECT_SQL} ORDER BY id ASC");
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
        let mut agents = Vec::new();

        while let Some(row) = rows.next()? {
            agents.push(parse_agent_row(row)?);
        }

        Ok(agents)
    }

    fn update_salary(&self, id: AgentId, salary: f64) -> RepoResult<Agent> {
        if salary <= 0.0 {
            return Err(ValidationError::NonPositiveSalary.into());
        }

        let changed = self.conn.execute(
            "UPDATE agents SET salary = ?2 WHERE id = ?1;",
            params![id, salary],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                kind: EntityKind::Agent,
                id,
            });
        }

        load_agent(self.conn, id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("updated agent {id} not found in read-back"))
        })
    }

    fn delete_agent(&self, id: AgentId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM agents WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                kind: EntityKind::Agent,
                id,
            });
        }

        Ok(())
    }

    fn has_active_mission(&self, id: AgentId) -> RepoResult<bool> {
        let active: i64 = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM missions
                WHERE agent_id = ?1
                  AND is_complete = 0
            );",
            [id],
            |row| row.get(0),
        )?;
        Ok(active == 1)
    }
}

fn load_agent(conn: &Connection, id: AgentId) -> RepoResult<Option<Agent>> {
    let mut stmt = conn.prepare(&format!("{AGENT_SELECT_SQL} WHERE id = ?1;"))?;
    let mut rows = stmt.query([id])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_agent_row(row)?));
    }
    Ok(None)
}

fn parse_agent_row(row: &Row<'_>) -> RepoResult<Agent> {
    Ok(Agent {
        id: row.get("id")?,
        name: row.get("name")?,
        years_of_experience: row.get("years_of_experience")?,
        breed: row.get("breed")?,
        salary: row.get("salary")?,
    })
}
