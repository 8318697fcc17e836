// src/ports/html.rs
use crate::application::{Notification, NotificationLevel};
use crate::domain::{ImageDisplay, NoteView};
use html_escape::{encode_double_quoted_attribute, encode_text};
use tracing::instrument;

/// Everything the notes page shows
#[derive(Debug, Clone, Copy)]
pub struct PageModel<'a> {
    pub username: &'a str,
    pub notes: &'a [NoteView],
    pub stale: bool,
    pub notifications: &'a [Notification],
}

#[derive(Debug, Default)]
pub struct HtmlPresenter;

impl HtmlPresenter {
    pub fn new() -> Self {
        Self
    }

    fn render_card(&self, view: &NoteView) -> String {
        let note = &view.note;
        let name = encode_text(&note.name);
        let image = match &view.image {
            ImageDisplay::None => String::new(),
            ImageDisplay::Url { url } => format!(
                r#"<img src="{}" alt="visual for {}" class="note-img">"#,
                encode_double_quoted_attribute(&url.url),
                encode_double_quoted_attribute(&note.name),
            ),
            ImageDisplay::Missing { reason } => format!(
                r#"<div class="note-img-missing" title="{}">Image unavailable</div>"#,
                encode_double_quoted_attribute(reason),
            ),
        };

        format!(
            r#"        <div class="note-card" id="note-{id}">
            <h3 class="note-title">{name}</h3>
            <p class="note-desc">{description}</p>
            {image}
            <code class="note-delete">notesapp delete {id}</code>
        </div>
"#,
            id = encode_text(note.id.as_str()),
            name = name,
            description = encode_text(&note.description),
            image = image,
        )
    }

    fn render_notification(&self, notification: &Notification) -> String {
        let level = match notification.level {
            NotificationLevel::Info => "info",
            NotificationLevel::Warning => "warning",
            NotificationLevel::Error => "error",
        };
        format!(
            "        <div class=\"notification {}\">{}</div>\n",
            level,
            encode_text(&notification.message)
        )
    }

    #[instrument(level = "debug", skip(self, page), fields(notes = page.notes.len()))]
    pub fn render(&self, page: &PageModel<'_>) -> String {
        let notifications: String = page
            .notifications
            .iter()
            .map(|n| self.render_notification(n))
            .collect();
        let cards: String = if page.notes.is_empty() {
            "        <p class=\"empty\">No notes yet.</p>\n".to_string()
        } else {
            page.notes.iter().map(|n| self.render_card(n)).collect()
        };
        let stale = if page.stale {
            "    <p class=\"stale\">The list could not be refreshed and may be out of date.</p>\n"
        } else {
            ""
        };

        format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>My Notes App</title>
    <style>
        body {{
            font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif;
            line-height: 1.6;
            max-width: 1000px;
            margin: 2rem auto;
            padding: 0 1rem;
            background-color: #f5f5f5;
        }}
        .notes-grid {{
            display: grid;
            grid-template-columns: repeat(auto-fill, minmax(240px, 1fr));
            gap: 1rem;
        }}
        .note-card {{
            background: white;
            border-radius: 8px;
            padding: 1rem;
            box-shadow: 0 2px 4px rgba(0,0,0,0.1);
        }}
        .note-img {{
            max-width: 100%;
            border-radius: 4px;
        }}
        .note-img-missing {{
            padding: 1rem;
            border: 1px dashed #c00;
            color: #c00;
            font-size: 0.9em;
        }}
        .note-delete, .signout {{
            font-size: 0.8em;
            color: #666;
        }}
        .notification {{
            padding: 0.5rem 1rem;
            margin-bottom: 0.5rem;
            border-radius: 4px;
        }}
        .notification.info {{ background: #e7f1ff; }}
        .notification.warning {{ background: #fff4d6; }}
        .notification.error {{ background: #fde2e1; }}
        .stale {{ color: #a60; }}
    </style>
</head>
<body>
    <h1 class="title">My Notes App</h1>
    <p class="user">Signed in as {username}</p>
{notifications}{stale}    <h2 class="subtitle">Current Notes</h2>
    <div class="notes-grid">
{cards}    </div>
    <p class="signout"><code>notesapp sign-out</code></p>
</body>
</html>"#,
            username = encode_text(page.username),
            notifications = notifications,
            stale = stale,
            cards = cards,
        )
    }
}
