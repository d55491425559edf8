use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, sea_query::Expr,
};
use uuid::Uuid;

use super::{DaoBase, DaoLayerError, DaoResult};
use crate::auth::OtpPurpose;
use crate::db::entities::{otp_verification, prelude::OtpVerification};

#[derive(Clone)]
pub struct OtpDao {
    db: DatabaseConnection,
}

impl DaoBase for OtpDao {
    type Entity = OtpVerification;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl OtpDao {
    pub async fn create_code(
        &self,
        user_id: Uuid,
        code: &str,
        purpose: OtpPurpose,
        expires_at: DateTime<FixedOffset>,
    ) -> DaoResult<otp_verification::Model> {
        let model = otp_verification::ActiveModel {
            user_id: Set(user_id),
            code: Set(code.to_string()),
            purpose: Set(purpose.as_str().to_string()),
            expires_at: Set(expires_at),
            is_used: Set(false),
            attempts: Set(0),
            ..Default::default()
        };
        self.create(model).await
    }

    /// Newest unused code of `purpose` for the user, expired or not.
    pub async fn find_latest_unused(
        &self,
        user_id: Uuid,
        purpose: OtpPurpose,
    ) -> DaoResult<Option<otp_verification::Model>> {
        self.find_one(move |query| {
            query
                .filter(otp_verification::Column::UserId.eq(user_id))
                .filter(otp_verification::Column::Purpose.eq(purpose.as_str()))
                .filter(otp_verification::Column::IsUsed.eq(false))
        })
        .await
    }

    pub async fn find_by_code(
        &self,
        code: &str,
        purpose: OtpPurpose,
    ) -> DaoResult<Option<otp_verification::Model>> {
        let code = code.to_string();
        self.find_one(move |query| {
            query
                .filter(otp_verification::Column::Code.eq(code))
                .filter(otp_verification::Column::Purpose.eq(purpose.as_str()))
        })
        .await
    }

    pub async fn mark_used(&self, id: Uuid) -> DaoResult<()> {
        let result = OtpVerification::update_many()
            .col_expr(otp_verification::Column::IsUsed, Expr::value(true))
            .col_expr(
                otp_verification::Column::UpdatedAt,
                Expr::value(Utc::now().fixed_offset()),
            )
            .filter(otp_verification::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(DaoLayerError::Db)?;
        if result.rows_affected == 0 {
            return Err(Self::not_found(id));
        }
        Ok(())
    }

    pub async fn set_attempts(&self, id: Uuid, attempts: i32) -> DaoResult<()> {
        OtpVerification::update_many()
            .col_expr(otp_verification::Column::Attempts, Expr::value(attempts))
            .col_expr(
                otp_verification::Column::UpdatedAt,
                Expr::value(Utc::now().fixed_offset()),
            )
            .filter(otp_verification::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(DaoLayerError::Db)?;
        Ok(())
    }

    /// Burns every unused code of `purpose` so only a fresh one is trusted.
    pub async fn invalidate_unused(&self, user_id: Uuid, purpose: OtpPurpose) -> DaoResult<u64> {
        let result = OtpVerification::update_many()
            .col_expr(otp_verification::Column::IsUsed, Expr::value(true))
            .filter(otp_verification::Column::UserId.eq(user_id))
            .filter(otp_verification::Column::Purpose.eq(purpose.as_str()))
            .filter(otp_verification::Column::IsUsed.eq(false))
            .exec(&self.db)
            .await
            .map_err(DaoLayerError::Db)?;
        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use uuid::Uuid;

    use super::OtpDao;
    use crate::auth::OtpPurpose;
    use crate::db::dao::{DaoBase, DaoLayerError};
    use crate::db::entities::otp_verification;
    use crate::test_helpers::{otp_model, ts};

    #[tokio::test]
    async fn create_code_persists_purpose_and_expiry() {
        let user_id = Uuid::new_v4();
        let expires = ts() + Duration::minutes(10);
        let stored = otp_model(user_id, "123456", OtpPurpose::Register, expires, false);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[stored]])
            .into_connection();
        let dao = OtpDao::new(&db);

        let created = dao
            .create_code(user_id, "123456", OtpPurpose::Register, expires)
            .await
            .expect("insert should succeed");
        assert_eq!(created.purpose, "REGISTER");
        assert_eq!(created.expires_at, expires);
        assert!(!created.is_used);
    }

    #[tokio::test]
    async fn find_latest_unused_returns_none_without_rows() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<otp_verification::Model>::new()])
            .into_connection();
        let dao = OtpDao::new(&db);

        let found = dao
            .find_latest_unused(Uuid::new_v4(), OtpPurpose::Register)
            .await
            .expect("query should succeed");
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn mark_used_reports_missing_code() {
        let id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();
        let dao = OtpDao::new(&db);

        let err = dao.mark_used(id).await.expect_err("update should fail");
        assert!(matches!(err, DaoLayerError::NotFound { entity: "Kode OTP", .. }));
    }

    #[tokio::test]
    async fn invalidate_unused_returns_rows_affected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 2,
            }])
            .into_connection();
        let dao = OtpDao::new(&db);

        let burned = dao
            .invalidate_unused(Uuid::new_v4(), OtpPurpose::Register)
            .await
            .expect("update should succeed");
        assert_eq!(burned, 2);
    }
}
