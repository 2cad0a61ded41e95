use crate::application::repos::RepoError;

/// Classify a driver error: row-mapping failures versus everything that
/// prevented the query from running (network, auth, syntax, pool timeout).
pub fn map_sqlx_error(err: sqlx::Error) -> RepoError {
    match err {
        sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::TypeNotFound { .. } => RepoError::row_decode(err),
        other => RepoError::source_unavailable(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_failures_map_to_row_decode() {
        let err = sqlx::Error::ColumnNotFound("eslora".to_string());
        assert!(matches!(map_sqlx_error(err), RepoError::RowDecode(_)));

        let err = sqlx::Error::ColumnDecode {
            index: "partida".to_string(),
            source: "unexpected null".into(),
        };
        assert!(matches!(map_sqlx_error(err), RepoError::RowDecode(_)));
    }

    #[test]
    fn connectivity_failures_map_to_source_unavailable() {
        assert!(matches!(
            map_sqlx_error(sqlx::Error::PoolTimedOut),
            RepoError::SourceUnavailable(_)
        ));
        assert!(matches!(
            map_sqlx_error(sqlx::Error::PoolClosed),
            RepoError::SourceUnavailable(_)
        ));
    }
}
