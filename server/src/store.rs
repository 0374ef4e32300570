//! File-backed todo collection.
//!
//! # Design
//! `TodoStore` owns the in-memory list and the path of its JSON mirror. The
//! list is loaded once by `open` and rewritten in full after every successful
//! mutation. Mutations build the next list, write it, and only then swap it
//! in, so a failed write leaves the in-memory state untouched.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime, SubsecRound};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::StoreError;

/// A single todo record as stored on disk and returned by the API.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(with = "timestamp")]
    pub created_at: NaiveDateTime,
    #[serde(with = "timestamp::option", default)]
    pub completed_at: Option<NaiveDateTime>,
}

/// Owner of the todo list and its persisted copy.
#[derive(Debug)]
pub struct TodoStore {
    path: PathBuf,
    todos: Vec<Todo>,
}

impl TodoStore {
    /// Load the collection from `path`.
    ///
    /// A missing, unreadable or malformed file yields an empty store. The
    /// condition is logged and never reported to the caller.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let todos = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|err| {
                warn!(path = %path.display(), error = %err, "todo file is malformed, starting empty");
                Vec::new()
            }),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no todo file yet, starting empty");
                Vec::new()
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "todo file is unreadable, starting empty");
                Vec::new()
            }
        };
        info!(path = %path.display(), count = todos.len(), "todo store opened");
        Self { path, todos }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All records in insertion order.
    pub fn list(&self) -> &[Todo] {
        &self.todos
    }

    /// Overwrite the persisted file with the current collection.
    pub fn persist(&self) -> Result<(), StoreError> {
        write_todos(&self.path, &self.todos)
    }

    /// Append a new record and persist.
    ///
    /// The id is the collection length plus one, so an add that follows a
    /// delete can reuse an id still held by a later record.
    pub fn add(
        &mut self,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Todo, StoreError> {
        let todo = Todo {
            id: self.todos.len() as u64 + 1,
            title: title.into(),
            description: description.into(),
            completed: false,
            created_at: now(),
            completed_at: None,
        };
        let mut next = self.todos.clone();
        next.push(todo.clone());
        self.commit(next)?;
        Ok(todo)
    }

    /// Flip completion on the first record with `id`.
    ///
    /// Returns `Ok(None)` without touching the file when no record matches.
    pub fn toggle(&mut self, id: u64) -> Result<Option<Todo>, StoreError> {
        let Some(index) = self.todos.iter().position(|todo| todo.id == id) else {
            return Ok(None);
        };
        let mut next = self.todos.clone();
        let todo = &mut next[index];
        todo.completed = !todo.completed;
        todo.completed_at = todo.completed.then(now);
        let updated = todo.clone();
        self.commit(next)?;
        Ok(Some(updated))
    }

    /// Remove every record with `id`.
    ///
    /// Returns `Ok(false)` without touching the file when nothing was removed.
    pub fn delete(&mut self, id: u64) -> Result<bool, StoreError> {
        let next: Vec<Todo> = self
            .todos
            .iter()
            .filter(|todo| todo.id != id)
            .cloned()
            .collect();
        if next.len() == self.todos.len() {
            return Ok(false);
        }
        self.commit(next)?;
        Ok(true)
    }

    fn commit(&mut self, next: Vec<Todo>) -> Result<(), StoreError> {
        write_todos(&self.path, &next)?;
        self.todos = next;
        Ok(())
    }
}

fn write_todos(path: &Path, todos: &[Todo]) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(todos)?;
    fs::write(path, json).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), count = todos.len(), "todos persisted");
    Ok(())
}

// Microsecond precision so a value survives a write/read cycle unchanged.
fn now() -> NaiveDateTime {
    Local::now().naive_local().trunc_subsecs(6)
}

/// ISO-8601 local timestamps with microseconds, e.g. `2024-05-01T09:30:00.123456`.
mod timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }

    pub mod option {
        use chrono::NaiveDateTime;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            value: &Option<NaiveDateTime>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(value) => super::serialize(value, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<NaiveDateTime>, D::Error> {
            Option::<String>::deserialize(deserializer)?
                .map(|raw| raw.parse().map_err(serde::de::Error::custom))
                .transpose()
        }
    }
}
