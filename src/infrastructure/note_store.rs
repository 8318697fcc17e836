// src/infrastructure/note_store.rs
use crate::application::NoteStore;
use crate::domain::{DomainError, Identity, NewNote, Note, NoteId};
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use rusqlite::{params, Connection, Row};
use tracing::{debug, instrument};
use uuid::Uuid;

/// Note records in the local database, partitioned by owner identity.
pub struct SqliteNoteStore {
    conn: Connection,
}

impl SqliteNoteStore {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }
}

fn note_from_row(row: &Row<'_>) -> rusqlite::Result<Note> {
    let created_at: String = row.get(4)?;
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
        })?;
    Ok(Note {
        id: NoteId(row.get(0)?),
        name: row.get(1)?,
        description: row.get(2)?,
        image_key: row.get(3)?,
        created_at,
    })
}

impl NoteStore for SqliteNoteStore {
    #[instrument(level = "debug", skip(self, owner))]
    fn list(&self, owner: &Identity) -> Result<Vec<Note>, DomainError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, name, description, image_key, created_at FROM notes
                 WHERE owner_id = ?1
                 ORDER BY created_at ASC, rowid ASC",
            )
            .map_err(DomainError::record)?;
        let notes = stmt
            .query_map(params![owner.identity_id], note_from_row)
            .map_err(DomainError::record)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(DomainError::record)?;
        Ok(notes)
    }

    #[instrument(level = "debug", skip(self, owner, note))]
    fn create(&self, owner: &Identity, note: NewNote) -> Result<Note, DomainError> {
        let note = Note {
            id: NoteId(Uuid::new_v4().to_string()),
            name: note.name,
            description: note.description,
            image_key: note.image_key,
            // stored with microsecond precision
            created_at: Utc::now().trunc_subsecs(6),
        };
        self.conn
            .execute(
                "INSERT INTO notes (id, owner_id, name, description, image_key, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    note.id.as_str(),
                    owner.identity_id,
                    note.name,
                    note.description,
                    note.image_key,
                    note.created_at.to_rfc3339_opts(SecondsFormat::Micros, true)
                ],
            )
            .map_err(DomainError::record)?;
        debug!(note_id = %note.id, "Inserted note");
        Ok(note)
    }

    #[instrument(level = "debug", skip(self, owner))]
    fn delete(&self, owner: &Identity, id: &NoteId) -> Result<(), DomainError> {
        let removed = self
            .conn
            .execute(
                "DELETE FROM notes WHERE id = ?1 AND owner_id = ?2",
                params![id.as_str(), owner.identity_id],
            )
            .map_err(DomainError::record)?;
        if removed == 0 {
            return Err(DomainError::NoteNotFound(id.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::open_database;
    use tempfile::TempDir;

    fn identity(name: &str) -> Identity {
        Identity {
            identity_id: format!("id-{name}"),
            username: name.to_string(),
        }
    }

    fn new_note(name: &str, image_key: Option<&str>) -> NewNote {
        NewNote {
            name: name.to_string(),
            description: format!("{name} description"),
            image_key: image_key.map(str::to_string),
        }
    }

    fn store(temp_dir: &TempDir) -> SqliteNoteStore {
        SqliteNoteStore::new(open_database(&temp_dir.path().join("notes.db")).unwrap())
    }

    #[test]
    fn given_created_notes_when_listing_then_returns_them_in_creation_order() {
        // Arrange
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir);
        let alice = identity("alice");

        // Act
        let first = store.create(&alice, new_note("First", None)).unwrap();
        let second = store.create(&alice, new_note("Second", Some("photo.jpg"))).unwrap();
        let listed = store.list(&alice).unwrap();

        // Assert
        assert_ne!(first.id, second.id);
        assert_eq!(listed, vec![first, second]);
        assert_eq!(listed[1].image_key.as_deref(), Some("photo.jpg"));
    }

    #[test]
    fn given_notes_of_other_owner_when_listing_then_excludes_them() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir);
        store.create(&identity("bob"), new_note("Bob's", None)).unwrap();

        let listed = store.list(&identity("alice")).unwrap();

        assert!(listed.is_empty());
    }

    #[test]
    fn given_existing_note_when_deleting_then_no_longer_listed() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir);
        let alice = identity("alice");
        let note = store.create(&alice, new_note("Gone", None)).unwrap();

        store.delete(&alice, &note.id).unwrap();

        assert!(store.list(&alice).unwrap().is_empty());
    }

    #[test]
    fn given_unknown_or_foreign_id_when_deleting_then_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir);
        let note = store.create(&identity("bob"), new_note("Bob's", None)).unwrap();

        let foreign = store.delete(&identity("alice"), &note.id);
        let unknown = store.delete(&identity("bob"), &NoteId::from("nope"));

        assert_eq!(foreign, Err(DomainError::NoteNotFound(note.id.clone())));
        assert!(matches!(unknown, Err(DomainError::NoteNotFound(_))));
        assert_eq!(store.list(&identity("bob")).unwrap().len(), 1);
    }
}
