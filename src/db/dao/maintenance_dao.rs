use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, TransactionTrait,
};

use super::{DaoLayerError, DaoResult};
use crate::auth::Role;
use crate::db::entities::prelude::{
    Announcement, Bookmark, Category, Comment, History, Image, Masjid, OtpVerification, Post,
    PostCategory, Session, User,
};
use crate::db::entities::user;

/// Cross-table operations that do not belong to a single entity DAO.
#[derive(Clone)]
pub struct MaintenanceDao {
    db: DatabaseConnection,
}

#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct ClearReport {
    pub posts: u64,
    pub categories: u64,
    pub announcements: u64,
    pub users: u64,
}

impl MaintenanceDao {
    pub fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    /// Deletes all content and every account below super admin in one transaction.
    pub async fn clear_database(&self) -> DaoResult<ClearReport> {
        let txn = self.db.begin().await.map_err(DaoLayerError::Db)?;

        History::delete_many().exec(&txn).await?;
        Bookmark::delete_many().exec(&txn).await?;
        Comment::delete_many().exec(&txn).await?;
        Image::delete_many().exec(&txn).await?;
        Masjid::delete_many().exec(&txn).await?;
        PostCategory::delete_many().exec(&txn).await?;
        let posts = Post::delete_many().exec(&txn).await?.rows_affected;
        let categories = Category::delete_many().exec(&txn).await?.rows_affected;
        let announcements = Announcement::delete_many().exec(&txn).await?.rows_affected;
        Session::delete_many().exec(&txn).await?;
        OtpVerification::delete_many().exec(&txn).await?;
        let users = User::delete_many()
            .filter(user::Column::Role.ne(Role::SuperAdmin.as_str()))
            .exec(&txn)
            .await?
            .rows_affected;

        txn.commit().await.map_err(DaoLayerError::Db)?;

        Ok(ClearReport {
            posts,
            categories,
            announcements,
            users,
        })
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult};

    use super::MaintenanceDao;
    use crate::db::dao::DaoLayerError;

    fn exec(rows_affected: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected,
        }
    }

    #[tokio::test]
    async fn clear_database_reports_deleted_rows() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([
                exec(4),
                exec(2),
                exec(9),
                exec(3),
                exec(1),
                exec(5),
                exec(6),
                exec(2),
                exec(1),
                exec(7),
                exec(8),
                exec(11),
            ])
            .into_connection();
        let dao = MaintenanceDao::new(&db);

        let report = dao.clear_database().await.expect("clear should succeed");
        assert_eq!(report.posts, 6);
        assert_eq!(report.categories, 2);
        assert_eq!(report.announcements, 1);
        assert_eq!(report.users, 11);
    }

    #[tokio::test]
    async fn clear_database_stops_on_first_failure() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec(1)])
            .append_exec_errors([DbErr::Custom("locked".to_string())])
            .into_connection();
        let dao = MaintenanceDao::new(&db);

        let err = dao.clear_database().await.expect_err("clear should fail");
        assert!(matches!(err, DaoLayerError::Db(_)));
    }
}
