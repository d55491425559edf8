use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::{
    auth::tokens::generate_opaque_token,
    db::dao::SessionDao,
    db::entities::session,
    error::AppError,
};

/// Server-side sessions behind the `refresh_token` cookie.
#[derive(Clone)]
pub struct SessionService {
    sessions: SessionDao,
    ttl_days: i64,
}

impl SessionService {
    pub fn new(sessions: SessionDao, ttl_days: i64) -> Self {
        Self { sessions, ttl_days }
    }

    pub async fn create_session(&self, user_id: Uuid) -> Result<session::Model, AppError> {
        let expires = Utc::now().fixed_offset() + Duration::days(self.ttl_days);
        let token = generate_opaque_token();
        Ok(self
            .sessions
            .create_session(user_id, &token, expires)
            .await?)
    }

    /// `None` when the token is unknown or past its expiry.
    pub async fn validate_session(&self, token: &str) -> Result<Option<session::Model>, AppError> {
        let Some(session) = self.sessions.find_by_token(token).await? else {
            return Ok(None);
        };
        if session.expires <= Utc::now().fixed_offset() {
            tracing::debug!(user_id = %session.user_id, "session expired");
            return Ok(None);
        }
        Ok(Some(session))
    }

    /// Reports whether a session was removed; callers decide if absence matters.
    pub async fn revoke_session(&self, token: &str) -> Result<bool, AppError> {
        let removed = self.sessions.delete_by_token(token).await?;
        if removed {
            tracing::info!("session revoked");
        }
        Ok(removed)
    }

    pub async fn revoke_all(&self, user_id: Uuid) -> Result<u64, AppError> {
        let removed = self.sessions.delete_for_user(user_id).await?;
        tracing::info!(%user_id, removed, "sessions revoked");
        Ok(removed)
    }

    /// Swaps a valid session for a fresh one.
    pub async fn rotate(&self, token: &str) -> Result<session::Model, AppError> {
        let current = self
            .validate_session(token)
            .await?
            .ok_or_else(|| AppError::unauthorized("Sesi tidak valid atau kedaluwarsa"))?;
        // Another refresh or a logout got here first.
        if !self.sessions.delete_by_token(token).await? {
            return Err(AppError::unauthorized("Sesi tidak valid atau kedaluwarsa"));
        }
        self.create_session(current.user_id).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use uuid::Uuid;

    use super::SessionService;
    use crate::{
        db::dao::{DaoBase, SessionDao},
        db::entities::session,
        error::AppError,
        test_helpers::session_model,
    };

    fn service(db: MockDatabase) -> SessionService {
        SessionService::new(SessionDao::new(&db.into_connection()), 7)
    }

    fn exec(rows_affected: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected,
        }
    }

    #[tokio::test]
    async fn validate_returns_live_session() {
        let user_id = Uuid::new_v4();
        let live = session_model(user_id, "live", Utc::now().fixed_offset() + Duration::days(1));
        let db = MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[live]]);

        let found = service(db)
            .validate_session("live")
            .await
            .expect("query should succeed");
        assert_eq!(found.map(|s| s.user_id), Some(user_id));
    }

    #[tokio::test]
    async fn validate_returns_none_once_expired() {
        let expired = session_model(
            Uuid::new_v4(),
            "old",
            Utc::now().fixed_offset() - Duration::seconds(1),
        );
        let db = MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[expired]]);

        let found = service(db)
            .validate_session("old")
            .await
            .expect("query should succeed");
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn validate_returns_none_for_unknown_token() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<session::Model>::new()]);

        let found = service(db)
            .validate_session("nope")
            .await
            .expect("query should succeed");
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn revoke_reports_whether_a_row_was_removed() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec(1), exec(0)]);
        let service = service(db);

        assert!(service.revoke_session("a").await.expect("delete should run"));
        assert!(!service.revoke_session("a").await.expect("delete should run"));
    }

    #[tokio::test]
    async fn rotate_replaces_session() {
        let user_id = Uuid::new_v4();
        let future = Utc::now().fixed_offset() + Duration::days(1);
        let old = session_model(user_id, "old", future);
        let new = session_model(user_id, "new", future);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[old]])
            .append_exec_results([exec(1)])
            .append_query_results([[new]]);

        let rotated = service(db).rotate("old").await.expect("rotation should succeed");
        assert_eq!(rotated.session_token, "new");
        assert_eq!(rotated.user_id, user_id);
    }

    #[tokio::test]
    async fn rotate_refuses_session_already_consumed() {
        let user_id = Uuid::new_v4();
        let old = session_model(user_id, "old", Utc::now().fixed_offset() + Duration::days(1));
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[old]])
            .append_exec_results([exec(0)]);

        let err = service(db)
            .rotate("old")
            .await
            .expect_err("a consumed session must not be rotated twice");
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn rotate_rejects_unknown_session() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<session::Model>::new()]);

        let err = service(db).rotate("ghost").await.expect_err("rotation should fail");
        assert!(matches!(err, AppError::Unauthorized(_)));
    }
}
