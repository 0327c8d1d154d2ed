//! Postgres adapters for confession records and the ban registry.
//!
//! All shared state lives here; requests hold nothing between calls, so the
//! admission checks are only as consistent as the database read that backs
//! them (read-your-writes through a single pool).

pub mod bans;
pub mod confessions;
mod schema;

pub use bans::BanOutcome;
pub use confessions::{Confession, NewConfession, Stats};
pub use schema::init_schema;

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().is_some_and(|code| code.as_ref() == "23505"),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::error::{DatabaseError, ErrorKind};
    use std::borrow::Cow;
    use std::error::Error as StdError;
    use std::fmt;

    #[derive(Debug)]
    struct FakeDbError(&'static str);

    impl fmt::Display for FakeDbError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "constraint violation")
        }
    }

    impl StdError for FakeDbError {}

    impl DatabaseError for FakeDbError {
        fn message(&self) -> &str {
            "constraint violation"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            Some(Cow::Borrowed(self.0))
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> ErrorKind {
            ErrorKind::UniqueViolation
        }
    }

    #[test]
    fn unique_violation_detected_by_sqlstate() {
        let err = sqlx::Error::Database(Box::new(FakeDbError("23505")));
        assert!(is_unique_violation(&err));

        let err = sqlx::Error::Database(Box::new(FakeDbError("23503")));
        assert!(!is_unique_violation(&err));

        assert!(!is_unique_violation(&sqlx::Error::RowNotFound));
    }
}
