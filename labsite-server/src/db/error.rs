//! Database error type

/// Database error, classified by what went wrong
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// Database unreachable, credentials rejected, or pool exhausted
    #[error("database connection failed: {0}")]
    Connection(#[source] sqlx::Error),

    /// Database refused the statement (constraint, type mismatch)
    #[error("database rejected statement: {0}")]
    Constraint(#[source] sqlx::Error),

    /// Any other statement or commit failure
    #[error("database error: {0}")]
    Statement(#[source] sqlx::Error),
}

impl From<sqlx::Error> for DbError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::Database(_) => Self::Constraint(e),
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Protocol(_)
            | sqlx::Error::Configuration(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed => Self::Connection(e),
            _ => Self::Statement(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_sqlx_errors() {
        let io = sqlx::Error::Io(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "refused",
        ));
        assert!(matches!(DbError::from(io), DbError::Connection(_)));
        assert!(matches!(
            DbError::from(sqlx::Error::PoolTimedOut),
            DbError::Connection(_)
        ));
        assert!(matches!(
            DbError::from(sqlx::Error::RowNotFound),
            DbError::Statement(_)
        ));
    }
}
