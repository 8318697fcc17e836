// src/application/notification.rs
use crate::domain::DomainError;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
}

/// What a notification is about; failures map one-to-one onto error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Authentication,
    Validation,
    RecordOperation,
    Upload,
    UrlResolution,
    Info,
}

impl From<&DomainError> for NotificationKind {
    fn from(err: &DomainError) -> Self {
        match err {
            DomainError::AuthenticationFailure(_) | DomainError::NotAuthenticated => {
                NotificationKind::Authentication
            }
            DomainError::Validation(_) => NotificationKind::Validation,
            DomainError::NoteNotFound(_) | DomainError::RecordOperationFailure(_) => {
                NotificationKind::RecordOperation
            }
            DomainError::UploadFailure { .. } => NotificationKind::Upload,
            DomainError::UrlResolutionFailure { .. } => NotificationKind::UrlResolution,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub id: u64,
    pub kind: NotificationKind,
    pub level: NotificationLevel,
    pub message: String,
}

/// User-visible, dismissible messages in the order they were raised.
#[derive(Debug, Default)]
pub struct Notifications {
    next_id: u64,
    items: Vec<Notification>,
}

impl Notifications {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(
        &mut self,
        kind: NotificationKind,
        level: NotificationLevel,
        message: impl Into<String>,
    ) -> u64 {
        self.next_id += 1;
        self.items.push(Notification {
            id: self.next_id,
            kind,
            level,
            message: message.into(),
        });
        self.next_id
    }

    pub fn push_error(&mut self, err: &DomainError) -> u64 {
        self.push(NotificationKind::from(err), NotificationLevel::Error, err.to_string())
    }

    /// Returns false if no notification had this id.
    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.items.len();
        self.items.retain(|n| n.id != id);
        self.items.len() != before
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn as_slice(&self) -> &[Notification] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
