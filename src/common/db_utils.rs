// src/common/db_utils.rs

// ---
// Constraint helpers: translate store violations into domain errors
// ---

/// Name of the unique constraint a statement tripped over, if that is why it failed.
pub(crate) fn unique_violation(err: &sqlx::Error) -> Option<&str> {
    match err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            Some(db_err.constraint().unwrap_or_default())
        }
        _ => None,
    }
}

/// Name of the foreign key a statement tripped over.
pub(crate) fn foreign_key_violation(err: &sqlx::Error) -> Option<&str> {
    match err {
        sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
            Some(db_err.constraint().unwrap_or_default())
        }
        _ => None,
    }
}
