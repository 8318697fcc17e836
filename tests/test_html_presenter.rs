mod helpers;

use anyhow::Result;
use helpers::{test_users, TestBackend, PNG_BYTES};
use notesapp::domain::{ImageUpload, NoteDraft};
use notesapp::ports::{HtmlPresenter, PageModel};

#[test]
fn given_note_with_uploaded_image_when_rendering_then_img_points_at_signed_file_url() -> Result<()> {
    // Arrange
    let backend = TestBackend::new()?;
    let mut client = backend.signed_in_client(test_users::ALICE)?;
    let image = ImageUpload::new("photo.png", PNG_BYTES.to_vec())?;
    client.create(&NoteDraft::new("Trip", "Beach", Some(image))?)?;

    // Act
    let html = HtmlPresenter::new().render(&PageModel {
        username: test_users::ALICE,
        notes: client.notes(),
        stale: client.is_stale(),
        notifications: client.notifications().as_slice(),
    });

    // Assert
    assert!(html.contains("<img src=\"file://"));
    assert!(html.contains("photo.png?expires="));
    assert!(html.contains(&backend.data_dir.to_string_lossy().to_string()));
    assert!(html.contains("Signed in as alice"));
    Ok(())
}

#[test]
fn given_empty_list_when_rendering_then_shows_placeholder() -> Result<()> {
    // Arrange
    let backend = TestBackend::new()?;
    let client = backend.signed_in_client(test_users::ALICE)?;

    // Act
    let html = HtmlPresenter::new().render(&PageModel {
        username: test_users::ALICE,
        notes: client.notes(),
        stale: false,
        notifications: &[],
    });

    // Assert
    assert!(html.contains("No notes yet."));
    assert!(html.contains("notesapp sign-out"));
    Ok(())
}
