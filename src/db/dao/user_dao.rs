use chrono::Utc;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, Order, QueryFilter, Set,
    sea_query::{Expr, SimpleExpr},
};
use uuid::Uuid;

use super::{DaoBase, DaoLayerError, DaoResult, PageParams, PaginatedResponse};
use crate::auth::Role;
use crate::db::entities::{prelude::User, user};

#[derive(Clone)]
pub struct UserDao {
    db: DatabaseConnection,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub fullname: String,
    pub password_hash: Option<String>,
    pub role: Role,
    pub is_verified: bool,
    pub has_google_account: bool,
}

#[derive(Debug, Clone, Default)]
pub struct UserListFilter {
    pub email_contains: Option<String>,
    pub role: Option<Role>,
}

impl DaoBase for UserDao {
    type Entity = User;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl UserDao {
    pub async fn find_by_email(&self, email: &str) -> DaoResult<Option<user::Model>> {
        let email = email.to_string();
        self.find_one(move |query| query.filter(user::Column::Email.eq(email)))
            .await
    }

    pub async fn find_by_ids(&self, ids: Vec<Uuid>) -> DaoResult<Vec<user::Model>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.find_all(None, move |query| query.filter(user::Column::Id.is_in(ids)))
            .await
    }

    pub async fn create_user(&self, new_user: NewUser) -> DaoResult<user::Model> {
        let model = user::ActiveModel {
            email: Set(new_user.email),
            fullname: Set(new_user.fullname),
            password_hash: Set(new_user.password_hash),
            role: Set(new_user.role.as_str().to_string()),
            is_verified: Set(new_user.is_verified),
            has_google_account: Set(new_user.has_google_account),
            avatar_url: Set(None),
            ..Default::default()
        };
        self.create(model).await
    }

    pub async fn list(
        &self,
        params: PageParams,
        filter: UserListFilter,
    ) -> DaoResult<PaginatedResponse<user::Model>> {
        self.find_page(params, Some((user::Column::Email, Order::Asc)), move |query| {
            let query = match filter.email_contains {
                Some(needle) => query.filter(user::Column::Email.contains(needle)),
                None => query,
            };
            match filter.role {
                Some(role) => query.filter(user::Column::Role.eq(role.as_str())),
                None => query,
            }
        })
        .await
    }

    pub async fn mark_verified(&self, id: Uuid) -> DaoResult<()> {
        self.set_columns(
            id,
            vec![(user::Column::IsVerified, Expr::value(true))],
        )
        .await
    }

    pub async fn set_password_hash(&self, id: Uuid, password_hash: &str) -> DaoResult<()> {
        self.set_columns(
            id,
            vec![(
                user::Column::PasswordHash,
                Expr::value(Some(password_hash.to_string())),
            )],
        )
        .await
    }

    /// Google vouches for the address, so linking also verifies the account.
    /// An unverified account was never proven to belong to the mailbox owner,
    /// so its password is dropped in the same statement.
    pub async fn link_google_account(&self, id: Uuid, was_verified: bool) -> DaoResult<()> {
        let mut columns = vec![
            (user::Column::HasGoogleAccount, Expr::value(true)),
            (user::Column::IsVerified, Expr::value(true)),
        ];
        if !was_verified {
            columns.push((user::Column::PasswordHash, Expr::value(Option::<String>::None)));
        }
        self.set_columns(id, columns).await
    }

    pub async fn update_profile(
        &self,
        id: Uuid,
        fullname: Option<String>,
        avatar_url: Option<Option<String>>,
    ) -> DaoResult<user::Model> {
        self.update(id, move |active| {
            if let Some(fullname) = fullname {
                active.fullname = Set(fullname);
            }
            if let Some(avatar_url) = avatar_url {
                active.avatar_url = Set(avatar_url);
            }
        })
        .await
    }

    pub async fn set_role(&self, id: Uuid, role: Role) -> DaoResult<user::Model> {
        self.update(id, move |active| {
            active.role = Set(role.as_str().to_string());
        })
        .await
    }

    async fn set_columns(&self, id: Uuid, columns: Vec<(user::Column, SimpleExpr)>) -> DaoResult<()> {
        let update = columns.into_iter().fold(
            User::update_many()
                .col_expr(user::Column::UpdatedAt, Expr::value(Utc::now().fixed_offset())),
            |update, (column, value)| update.col_expr(column, value),
        );
        let result = update
            .filter(user::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(DaoLayerError::Db)?;
        if result.rows_affected == 0 {
            return Err(Self::not_found(id));
        }
        Ok(())
    }
}
