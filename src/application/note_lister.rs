// src/application/note_lister.rs
use crate::application::{NoteStore, ObjectStore};
use crate::domain::{DomainError, Identity, ImageDisplay, Note, NoteView, ObjectPath};
use std::time::Duration;
use tracing::{debug, instrument, warn};

pub struct NoteLister<S: NoteStore, O: ObjectStore> {
    store: S,
    objects: O,
    url_ttl: Duration,
}

impl<S: NoteStore, O: ObjectStore> NoteLister<S, O> {
    pub fn new(store: S, objects: O, url_ttl: Duration) -> Self {
        Self {
            store,
            objects,
            url_ttl,
        }
    }

    /// List all notes of `identity` with their images resolved for display
    ///
    /// A failing record store fails the whole listing. A failing URL resolution
    /// only marks that note's image as missing.
    #[instrument(level = "debug", skip(self, identity), fields(identity = %identity.identity_id))]
    pub fn list_notes(&self, identity: &Identity) -> Result<Vec<NoteView>, DomainError> {
        let notes = self.store.list(identity)?;
        debug!(count = notes.len(), "Fetched notes");

        Ok(notes
            .into_iter()
            .map(|note| {
                let image = self.resolve_image(identity, &note);
                NoteView { note, image }
            })
            .collect())
    }

    fn resolve_image(&self, identity: &Identity, note: &Note) -> ImageDisplay {
        let key = match note.image_key.as_deref() {
            Some(key) if !key.is_empty() => key,
            _ => return ImageDisplay::None,
        };

        let path = ObjectPath::media(identity, key);
        match self.objects.signed_url(&path, self.url_ttl) {
            Ok(url) => ImageDisplay::Url { url },
            Err(e) => {
                warn!(note_id = %note.id, %path, error = %e, "Image unavailable");
                ImageDisplay::Missing {
                    reason: e.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::testing::{Failure, MockBackend};

    const TTL: Duration = Duration::from_secs(60);

    #[test]
    fn given_notes_without_images_when_listing_then_images_are_none() {
        // Arrange
        let backend = MockBackend::builder()
            .with_user("alice", "pw")
            .with_note("alice", "Groceries", "Milk, eggs", None)
            .build();
        let alice = backend.identity_of("alice").expect("seeded");
        let lister = NoteLister::new(&backend, &backend, TTL);

        // Act
        let views = lister.list_notes(&alice).expect("list");

        // Assert
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].note.name, "Groceries");
        assert_eq!(views[0].image, ImageDisplay::None);
    }

    #[test]
    fn given_note_with_stored_image_when_listing_then_resolves_url_and_keeps_key() {
        // Arrange
        let backend = MockBackend::builder()
            .with_user("alice", "pw")
            .with_note("alice", "Trip", "Beach", Some("photo.jpg"))
            .with_object("alice", "photo.jpg", b"jpeg-bytes")
            .build();
        let alice = backend.identity_of("alice").expect("seeded");
        let lister = NoteLister::new(&backend, &backend, TTL);

        // Act
        let views = lister.list_notes(&alice).expect("list");

        // Assert
        let url = views[0].image.url().expect("resolved url");
        assert!(url.url.contains("media/identity-alice/photo.jpg"));
        assert_eq!(views[0].note.image_key.as_deref(), Some("photo.jpg"));
        assert_eq!(backend.fetch(&alice, &url.url).expect("fetch"), b"jpeg-bytes");
    }

    #[test]
    fn given_note_whose_object_is_missing_when_listing_then_flags_missing_image() {
        // Arrange
        let backend = MockBackend::builder()
            .with_user("alice", "pw")
            .with_note("alice", "Trip", "Beach", Some("photo.jpg"))
            .build();
        let alice = backend.identity_of("alice").expect("seeded");
        let lister = NoteLister::new(&backend, &backend, TTL);

        // Act
        let views = lister.list_notes(&alice).expect("list");

        // Assert
        assert!(views[0].image.is_missing());
    }

    #[test]
    fn given_empty_image_key_when_listing_then_treated_as_no_image() {
        let backend = MockBackend::builder()
            .with_user("alice", "pw")
            .with_note("alice", "Blank", "Key", Some(""))
            .build();
        let alice = backend.identity_of("alice").expect("seeded");
        let lister = NoteLister::new(&backend, &backend, TTL);

        let views = lister.list_notes(&alice).expect("list");

        assert_eq!(views[0].image, ImageDisplay::None);
    }

    #[test]
    fn given_failing_store_when_listing_then_returns_record_error() {
        let backend = MockBackend::builder()
            .with_user("alice", "pw")
            .failing(Failure::List)
            .build();
        let alice = backend.identity_of("alice").expect("seeded");
        let lister = NoteLister::new(&backend, &backend, TTL);

        let result = lister.list_notes(&alice);

        assert!(matches!(result, Err(DomainError::RecordOperationFailure(_))));
    }
}
