//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for agents and missions.
//! - Isolate SQLite query and transaction details from service orchestration.
//!
//! # Invariants
//! - Repository writes must enforce draft `validate()` before persistence.
//! - Every rule-engine operation executes as one immediate transaction.
//! - Repository APIs return the semantic failure taxonomy (`NotFound`,
//!   `AlreadyAssigned`, ...) in addition to DB transport errors.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::agent::AgentId;
use crate::model::mission::{MissionId, TargetId};
use crate::model::ValidationError;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod agent_repo;
pub mod mission_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Entity kinds referenced by `RepoError::NotFound`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Agent,
    Mission,
    Target,
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Agent => write!(f, "agent"),
            Self::Mission => write!(f, "mission"),
            Self::Target => write!(f, "target"),
        }
    }
}

/// Repository error covering storage faults and rule-engine outcomes.
///
/// Every variant is a recoverable, caller-facing outcome; none is
/// process-fatal and none is retried internally.
#[derive(Debug)]
pub enum RepoError {
    /// Storage transport or schema failure.
    Db(DbError),
    /// Draft input failed the field validation boundary.
    Validation(ValidationError),
    /// Referenced entity does not exist.
    NotFound { kind: EntityKind, id: i64 },
    /// Mission creation requested a target count outside 1..=3.
    InvalidTargetCount(usize),
    /// Mission already has an assigned agent.
    AlreadyAssigned(MissionId),
    /// Agent already holds an assigned, incomplete mission.
    AgentBusy(AgentId),
    /// Delete attempted on a mission with an assigned agent.
    AssignedConflict(MissionId),
    /// Notes write rejected because target or mission is complete.
    LockedForEditing(TargetId),
    /// Persisted state failed row parsing or referential checks.
    InvalidData(String),
    /// Connection has not been migrated to the supported schema version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::InvalidTargetCount(count) => write!(
                f,
                "mission must have between 1 and 3 targets, got {count}"
            ),
            Self::AlreadyAssigned(id) => {
                write!(f, "mission {id} is already assigned to an agent")
            }
            Self::AgentBusy(id) => write!(f, "agent {id} already has an active mission"),
            Self::AssignedConflict(id) => {
                write!(f, "mission {id} cannot be deleted while assigned to an agent")
            }
            Self::LockedForEditing(id) => write!(
                f,
                "target {id} notes are locked: target or mission is already complete"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Offset/limit options for listing operations.
///
/// `limit = None` returns all rows from `offset` onward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub limit: Option<u32>,
    pub offset: u32,
}

const REQUIRED_SCHEMA: &[(&str, &[&str])] = &[
    (
        "agents",
        &["id", "name", "years_of_experience", "breed", "salary"],
    ),
    ("missions", &["id", "agent_id", "is_complete"]),
    (
        "targets",
        &["id", "mission_id", "name", "country", "notes", "is_complete"],
    ),
];

/// Verifies the connection carries the migrated schema this crate expects.
pub(crate) fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for &(table, columns) in REQUIRED_SCHEMA {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
        for &column in columns {
            if !table_has_column(conn, table, column)? {
                return Err(RepoError::MissingRequiredColumn { table, column });
            }
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

pub(crate) fn int_to_bool(value: i64, context: &str) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid boolean value `{other}` in {context}"
        ))),
    }
}
