// src/lib.rs
pub mod application;
pub mod cli;
pub mod constants;
pub mod domain;
pub mod infrastructure;
pub mod ports;
pub mod util;

use std::path::{Path, PathBuf};
use anyhow::{bail, Context, Result};
use application::{NoteForm, NotesClient, UploadStatus};
use domain::{ImageUpload, NoteId};
use infrastructure::{
    open_database, BrowserRenderer, Config, LocalObjectStore, SessionFile, SqliteAuth,
    SqliteNoteStore,
};
use ports::{HtmlPresenter, PageModel, TextPresenter};
use tracing::{debug, info};
use crate::cli::args::{Args, Command};
use crate::constants::{DATABASE_FILE, PAGE_FILE, SESSION_FILE};

pub type LocalNotesClient = NotesClient<SqliteAuth, SqliteNoteStore, LocalObjectStore>;

pub fn run(args: Args) -> Result<()> {
    debug!(?args, "Starting notesapp with arguments");

    let config = Config::load_or_default(args.config.as_deref())?;
    let data_dir = absolute(config.data_dir(args.data_dir.as_deref())?)?;
    debug!(?data_dir, "Using data directory");

    // Initialize infrastructure
    let mut client = open_local_client(&data_dir, &config)?;
    let session_file = SessionFile::new(data_dir.join(SESSION_FILE));

    match args.command {
        Command::SignUp { username, password } => {
            client.sign_up(&username, &password)?;
            sign_in(&mut client, &session_file, &username, &password)?;
        }
        Command::SignIn { username, password } => {
            sign_in(&mut client, &session_file, &username, &password)?;
        }
        Command::SignOut => match session_file.load()? {
            Some(token) => {
                // an expired session only needs the local file removed
                let result = match client.resume(&token) {
                    Ok(()) => client.sign_out(),
                    Err(_) => Ok(()),
                };
                session_file.clear()?;
                result?;
                println!("Signed out");
            }
            None => println!("Not signed in"),
        },
        Command::List { json } => {
            resume(&mut client, &session_file)?;
            if json {
                println!("{}", serde_json::to_string_pretty(client.notes())?);
            } else if client.notes().is_empty() {
                println!("No notes");
            } else {
                println!("{}", TextPresenter::new().render(client.notes()));
            }
            report_notifications(&client);
        }
        Command::View => {
            resume(&mut client, &session_file)?;
            let username = client
                .identity()
                .map(|i| i.username.clone())
                .unwrap_or_default();
            let html = HtmlPresenter::new().render(&PageModel {
                username: &username,
                notes: client.notes(),
                stale: client.is_stale(),
                notifications: client.notifications().as_slice(),
            });

            if config.display.open_browser {
                let mut renderer = BrowserRenderer::new();
                let page = renderer.write_page(&html)?;
                renderer.open_in_browser(&page)?;
            } else {
                let page = data_dir.join(PAGE_FILE);
                std::fs::write(&page, html)
                    .with_context(|| format!("Failed to write {}", page.display()))?;
                println!("{}", page.display());
            }
        }
        Command::Create {
            name,
            description,
            image,
        } => {
            resume(&mut client, &session_file)?;
            let mut form = NoteForm {
                name,
                description,
                image: None,
            };
            if let Some(path) = image {
                form = form.with_image(read_image(&path)?);
            }
            let outcome = client.submit(&mut form)?;
            info!(note_id = %outcome.note.id, "Note created");
            println!("{}", outcome.note.id);
            if let UploadStatus::Failed(e) = &outcome.upload {
                eprintln!("warning: note saved without its image: {e}");
            }
        }
        Command::Delete { note_id } => {
            resume(&mut client, &session_file)?;
            let outcome = client.delete(&NoteId(note_id.clone()))?;
            debug!(?outcome, "Delete finished");
            match outcome {
                application::DeleteOutcome::Deleted => println!("Deleted note {note_id}"),
                application::DeleteOutcome::AlreadyAbsent => {
                    println!("Note {note_id} does not exist")
                }
            }
        }
    }

    Ok(())
}

/// Build a client over the local backend stored in `data_dir`
pub fn open_local_client(data_dir: &Path, config: &Config) -> Result<LocalNotesClient> {
    let db_path = data_dir.join(DATABASE_FILE);
    let auth = SqliteAuth::new(open_database(&db_path)?);
    let store = SqliteNoteStore::new(open_database(&db_path)?);
    let objects = LocalObjectStore::open(data_dir)?
        .with_existence_check(config.backend.validate_object_existence);

    Ok(NotesClient::new(auth, store, objects, config.backend.url_ttl()))
}

fn sign_in(
    client: &mut LocalNotesClient,
    session_file: &SessionFile,
    username: &str,
    password: &str,
) -> Result<()> {
    // resuming the saved session lets the new sign-in revoke its token
    if let Some(token) = session_file.load()? {
        if let Err(e) = client.resume(&token) {
            debug!(error = %e, "Saved session is no longer valid");
        }
    }
    client.sign_in(username, password)?;
    let session = client.session().context("Sign-in did not yield a session")?;
    session_file.save(&session.token, &session.identity.username)?;
    println!("Signed in as {}", session.identity.username);
    Ok(())
}

fn resume(client: &mut LocalNotesClient, session_file: &SessionFile) -> Result<()> {
    let token = match session_file.load()? {
        Some(token) => token,
        None => bail!("Not signed in. Run `notesapp sign-in <USERNAME>` first."),
    };
    if let Err(e) = client.resume(&token) {
        session_file.clear()?;
        bail!("{e}. Please sign in again.");
    }
    Ok(())
}

fn read_image(path: &Path) -> Result<ImageUpload> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("Invalid image path {}", path.display()))?;
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read image {}", path.display()))?;
    Ok(ImageUpload::new(file_name, bytes)?)
}

fn report_notifications(client: &LocalNotesClient) {
    for notification in client.notifications().iter() {
        eprintln!("{:?}: {}", notification.level, notification.message);
    }
}

fn absolute(path: PathBuf) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path);
    }
    let cwd = std::env::current_dir().context("Could not determine current directory")?;
    Ok(cwd.join(path))
}

#[cfg(test)]
/// must be public to be used from integration tests
mod tests {
    use crate::util::testing;
    #[ctor::ctor]
    fn init() {
        testing::init_test_setup().expect("Failed to initialize test setup");
    }
}
