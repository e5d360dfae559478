//! Person store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide find/insert/replace/delete primitives over the `persons` table.
//! - Assign identifiers on insert.
//!
//! # Invariants
//! - Ids are UUID strings; anything that does not parse as a UUID is a
//!   malformed id.
//! - Every write is a single statement, so a record is never half-updated.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::{DbError, DbResult};
use crate::model::person::{Person, PersonDraft, PersonId};
use log::info;
use parking_lot::Mutex;
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const PERSON_SELECT_SQL: &str = "SELECT id, name, number FROM persons";

pub type StoreResult<T> = Result<T, StoreError>;

/// Error returned by person store operations.
#[derive(Debug)]
pub enum StoreError {
    /// Identifier does not have the store's id shape.
    MalformedId(String),
    Db(DbError),
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedId(id) => write!(f, "malformed person id: `{id}`"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted person data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::MalformedId(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Storage capability for person records.
///
/// Implementations own the identifier format: every `&str` id is parsed by
/// the store, and one that cannot be parsed fails with `MalformedId`.
pub trait PersonStore: Send + Sync {
    fn find_all(&self) -> StoreResult<Vec<Person>>;

    /// Returns `Ok(None)` for a well-formed id with no record.
    fn find_by_id(&self, id: &str) -> StoreResult<Option<Person>>;

    /// Persists a new record under a freshly assigned id.
    fn insert(&self, draft: &PersonDraft) -> StoreResult<Person>;

    /// Replaces all mutable fields; `Ok(None)` when the record is absent.
    fn replace_by_id(&self, id: &str, draft: &PersonDraft) -> StoreResult<Option<Person>>;

    /// Returns whether a record was removed.
    fn delete_by_id(&self, id: &str) -> StoreResult<bool>;

    fn count(&self) -> StoreResult<usize> {
        Ok(self.find_all()?.len())
    }
}

/// Parses a client-supplied id into the store's identifier shape.
pub fn parse_person_id(id: &str) -> StoreResult<PersonId> {
    Uuid::parse_str(id).map_err(|_| StoreError::MalformedId(id.to_string()))
}

/// SQLite-backed person store.
///
/// Holds the single connection opened at startup; the mutex serializes
/// statements from concurrent requests.
pub struct SqlitePersonStore {
    conn: Mutex<Connection>,
}

impl SqlitePersonStore {
    /// Wraps a connection returned by `open_db` / `open_db_in_memory`.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Closes the underlying connection, flushing pending work.
    pub fn close(self) -> DbResult<()> {
        let conn = self.conn.into_inner();
        match conn.close() {
            Ok(()) => {
                info!("event=db_close module=db status=ok");
                Ok(())
            }
            Err((_, err)) => Err(err.into()),
        }
    }
}

impl PersonStore for SqlitePersonStore {
    fn find_all(&self) -> StoreResult<Vec<Person>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&format!("{PERSON_SELECT_SQL} ORDER BY rowid ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut persons = Vec::new();

        while let Some(row) = rows.next()? {
            persons.push(parse_person_row(row)?);
        }

        Ok(persons)
    }

    fn find_by_id(&self, id: &str) -> StoreResult<Option<Person>> {
        let id = parse_person_id(id)?;
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&format!("{PERSON_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_person_row(row)?));
        }

        Ok(None)
    }

    fn insert(&self, draft: &PersonDraft) -> StoreResult<Person> {
        let id = Uuid::new_v4();
        self.conn.lock().execute(
            "INSERT INTO persons (id, name, number) VALUES (?1, ?2, ?3);",
            params![id.to_string(), draft.name.as_str(), draft.number.as_str()],
        )?;

        Ok(draft.clone().into_person(id))
    }

    fn replace_by_id(&self, id: &str, draft: &PersonDraft) -> StoreResult<Option<Person>> {
        let id = parse_person_id(id)?;
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "UPDATE persons
             SET
                name = ?1,
                number = ?2,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?3
             RETURNING id, name, number;",
        )?;

        let mut rows = stmt.query(params![
            draft.name.as_str(),
            draft.number.as_str(),
            id.to_string()
        ])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_person_row(row)?));
        }

        Ok(None)
    }

    fn delete_by_id(&self, id: &str) -> StoreResult<bool> {
        let id = parse_person_id(id)?;
        let changed = self
            .conn
            .lock()
            .execute("DELETE FROM persons WHERE id = ?1;", [id.to_string()])?;

        Ok(changed > 0)
    }

    fn count(&self) -> StoreResult<usize> {
        let count = self
            .conn
            .lock()
            .query_row("SELECT COUNT(*) FROM persons;", [], |row| row.get::<_, i64>(0))?;

        usize::try_from(count)
            .map_err(|_| StoreError::InvalidData(format!("negative person count `{count}`")))
    }
}

fn parse_person_row(row: &Row<'_>) -> StoreResult<Person> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        StoreError::InvalidData(format!("invalid uuid value `{id_text}` in persons.id"))
    })?;

    Ok(Person {
        id,
        name: row.get("name")?,
        number: row.get("number")?,
    })
}
