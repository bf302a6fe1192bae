use crate::query;

/// Message reported when a single-row fetch does not match exactly one row.
pub const NOT_SINGLE_ROW: &str = "JSON object requested, multiple (or no) rows returned";

/// Classification of a relational store failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A single-row fetch matched zero (or more than one) rows
    NotFound,
    /// The store rejected the data: integrity constraints (SQLSTATE class 23)
    /// and data exceptions (class 22) such as malformed ids or literals
    ConstraintViolation,
    /// Connection, pool and protocol failures, and any other backend error
    ConnectivityFailure,
}

/// Store operation failure.
///
/// The message of the underlying store error is kept verbatim since it is
/// forwarded to API callers as is.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    ConstraintViolation(String),
    #[error("{0}")]
    ConnectivityFailure(String),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::ConstraintViolation(_) => ErrorKind::ConstraintViolation,
            Error::ConnectivityFailure(_) => ErrorKind::ConnectivityFailure,
        }
    }

    pub fn not_single_row() -> Self {
        Error::NotFound(NOT_SINGLE_ROW.to_owned())
    }
}

impl From<sqlx::Error> for Error {
    fn from(value: sqlx::Error) -> Self {
        match value {
            sqlx::Error::RowNotFound => Error::not_single_row(),
            sqlx::Error::Database(err) => {
                let msg = err.message().to_owned();
                let class: Option<String> = err.code().map(|c| c.chars().take(2).collect());
                match class.as_deref() {
                    Some("22") | Some("23") => Error::ConstraintViolation(msg),
                    _ => Error::ConnectivityFailure(msg),
                }
            }
            other => Error::ConnectivityFailure(other.to_string()),
        }
    }
}

impl From<query::Error> for Error {
    fn from(value: query::Error) -> Self {
        Error::ConnectivityFailure(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds() {
        assert_eq!(Error::not_single_row().kind(), ErrorKind::NotFound);
        assert_eq!(Error::not_single_row().to_string(), NOT_SINGLE_ROW);

        let err: Error = sqlx::Error::PoolTimedOut.into();
        assert_eq!(err.kind(), ErrorKind::ConnectivityFailure);

        let err: Error = query::Error::UnrelatedTables {
            base: "clientes",
            target: "habilidades",
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::ConnectivityFailure);
    }
}
