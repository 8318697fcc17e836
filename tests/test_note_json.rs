use anyhow::Result;
use chrono::{TimeZone, Utc};
use notesapp::domain::{ImageDisplay, Note, NoteId, NoteView, SignedUrl};

fn note(image_key: Option<&str>) -> Note {
    Note {
        id: NoteId::from("3f2b"),
        name: "Trip".to_string(),
        description: "Beach".to_string(),
        image_key: image_key.map(str::to_string),
        created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
    }
}

#[test]
fn given_note_view_when_serializing_to_json_then_contains_all_fields() -> Result<()> {
    // Arrange
    let view = NoteView {
        note: note(Some("photo.jpg")),
        image: ImageDisplay::Url {
            url: SignedUrl {
                url: "file:///data/media/id/photo.jpg?expires=10&signature=ab".to_string(),
                expires_at: 10,
            },
        },
    };

    // Act
    let json = serde_json::to_string_pretty(&view)?;

    // Assert
    assert!(json.contains(r#""id": "3f2b""#));
    assert!(json.contains(r#""name": "Trip""#));
    assert!(json.contains(r#""description": "Beach""#));
    assert!(json.contains(r#""image_key": "photo.jpg""#));
    assert!(json.contains(r#""status": "url""#));
    assert!(json.contains(r#""expires_at": 10"#));
    Ok(())
}

#[test]
fn given_persisted_note_when_serializing_then_has_no_display_url() -> Result<()> {
    // Arrange
    let note = note(Some("photo.jpg"));

    // Act
    let json = serde_json::to_string(&note)?;

    // Assert - the stored form only ever carries the object key
    assert!(json.contains(r#""image_key":"photo.jpg""#));
    assert!(!json.contains("file://"));
    assert!(!json.contains(r#""image""#));
    Ok(())
}

#[test]
fn given_missing_image_when_serializing_then_reports_reason() -> Result<()> {
    // Arrange
    let view = NoteView {
        note: note(Some("photo.jpg")),
        image: ImageDisplay::Missing {
            reason: "object does not exist".to_string(),
        },
    };

    // Act
    let json = serde_json::to_string(&view)?;

    // Assert
    assert!(json.contains(r#""status":"missing""#));
    assert!(json.contains("object does not exist"));
    Ok(())
}
