use crate::db::DatabaseError;
use crate::s3::StorageError;
use std::fmt;
use thiserror::Error;
use tracing::error;

/// The entity a gateway call was working on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    MediaItem,
    Speaker,
    SurveyResponse,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Entity::MediaItem => "media item",
            Entity::Speaker => "speaker",
            Entity::SurveyResponse => "survey response",
        })
    }
}

/// Backend failure underneath a transport error
#[derive(Error, Debug)]
pub enum TransportSource {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Error, Debug)]
pub enum GatewayError {
    /// Bad input, reported to the user without touching any backend
    #[error("Validation failed: {0}")]
    Validation(String),

    /// An object-store or relational-store call failed
    #[error("Failed to {operation} {entity}{}: {source}", format_id(.id))]
    Transport {
        entity: Entity,
        operation: &'static str,
        id: Option<String>,
        source: TransportSource,
    },
}

fn format_id(id: &Option<String>) -> String {
    id.as_ref().map(|id| format!(" {id}")).unwrap_or_default()
}

impl GatewayError {
    /// Build a transport error and log it with its context
    pub fn transport(
        entity: Entity,
        operation: &'static str,
        id: Option<&str>,
        source: impl Into<TransportSource>,
    ) -> Self {
        let source = source.into();
        error!(
            "Failed to {} {} (id={}): {}",
            operation,
            entity,
            id.unwrap_or("-"),
            source
        );
        GatewayError::Transport {
            entity,
            operation,
            id: id.map(str::to_string),
            source,
        }
    }

    /// Message suitable for showing to the person who triggered the action
    pub fn user_message(&self) -> String {
        match self {
            GatewayError::Validation(message) => message.clone(),
            GatewayError::Transport {
                entity, operation, ..
            } => format!("Could not {operation} the {entity}. Please try again."),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            GatewayError::Transport {
                source: TransportSource::Database(DatabaseError::NotFound(_)),
                ..
            }
        )
    }
}
