// src/ports/text.rs
use crate::domain::{ImageDisplay, NoteView};
use crate::util::text::summary_line;

const DESCRIPTION_WIDTH: usize = 60;

/// One line per note for terminal output
#[derive(Debug, Default)]
pub struct TextPresenter;

impl TextPresenter {
    pub fn new() -> Self {
        Self
    }

    pub fn render_line(&self, view: &NoteView) -> String {
        let marker = match &view.image {
            ImageDisplay::None => "",
            ImageDisplay::Url { .. } => "  [image]",
            ImageDisplay::Missing { .. } => "  [image missing]",
        };
        format!(
            "{}\t{}\t{}{}",
            view.note.id,
            view.note.name,
            summary_line(&view.note.description, DESCRIPTION_WIDTH),
            marker
        )
    }

    pub fn render(&self, notes: &[NoteView]) -> String {
        notes
            .iter()
            .map(|n| self.render_line(n))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Note, NoteId};
    use chrono::Utc;

    fn view(image: ImageDisplay) -> NoteView {
        NoteView {
            note: Note {
                id: NoteId::from("n-1"),
                name: "Trip".to_string(),
                description: "Beach\nSunscreen".to_string(),
                image_key: Some("photo.jpg".to_string()),
                created_at: Utc::now(),
            },
            image,
        }
    }

    #[test]
    fn given_note_when_rendering_line_then_shows_id_name_and_summary() {
        let line = TextPresenter::new().render_line(&view(ImageDisplay::None));

        assert_eq!(line, "n-1\tTrip\tBeach…");
    }

    #[test]
    fn given_missing_image_when_rendering_line_then_marks_it() {
        let image = ImageDisplay::Missing {
            reason: "gone".to_string(),
        };

        let line = TextPresenter::new().render_line(&view(image));

        assert!(line.ends_with("[image missing]"));
    }
}
