use crate::database::error::DatabaseError;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ServiceError {
    #[error("Subscriber {user_id} is not registered.")]
    SubscriberNotFound { user_id: i64 },

    #[error("Unknown region: {name}")]
    UnknownRegion { name: String },

    #[error("Subscriber {actor} is not allowed to perform this operation.")]
    PermissionDenied { actor: i64 },

    #[error("DatabaseError: {0}")]
    DatabaseError(#[from] DatabaseError),
}
