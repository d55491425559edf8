use sea_orm::Set;
use uuid::Uuid;

use crate::{
    db::dao::{DaoBase, DaoContext},
    db::entities::category,
    error::AppError,
    services::post_service::slugify,
};

const NAME_TAKEN: &str = "Nama kategori sudah digunakan";

#[derive(Clone)]
pub struct CategoryService {
    daos: DaoContext,
}

impl CategoryService {
    pub fn new(daos: DaoContext) -> Self {
        Self { daos }
    }

    pub async fn list(&self) -> Result<Vec<category::Model>, AppError> {
        Ok(self.daos.category().list_all().await?)
    }

    async fn ensure_free(&self, name: &str, slug: &str, except: Option<Uuid>) -> Result<(), AppError> {
        let categories = self.daos.category();
        let clash = match categories.find_by_name(name).await? {
            Some(found) => Some(found),
            None => categories.find_by_slug(slug).await?,
        };
        match clash {
            Some(found) if Some(found.id) != except => Err(AppError::conflict(NAME_TAKEN)),
            _ => Ok(()),
        }
    }

    pub async fn create(&self, name: &str, description: Option<String>) -> Result<category::Model, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::bad_request("Nama kategori tidak boleh kosong"));
        }
        let slug = slugify(name);
        self.ensure_free(name, &slug, None).await?;
        Ok(self
            .daos
            .category()
            .create_category(name, &slug, description.filter(|d| !d.trim().is_empty()))
            .await?)
    }

    /// Renaming also moves the slug.
    pub async fn update(
        &self,
        id: Uuid,
        name: Option<String>,
        description: Option<Option<String>>,
    ) -> Result<category::Model, AppError> {
        let renamed = match name.as_deref().map(str::trim) {
            Some("") => return Err(AppError::bad_request("Nama kategori tidak boleh kosong")),
            Some(name) => {
                let slug = slugify(name);
                self.ensure_free(name, &slug, Some(id)).await?;
                Some((name.to_string(), slug))
            }
            None => None,
        };
        Ok(self
            .daos
            .category()
            .update(id, move |active: &mut category::ActiveModel| {
                if let Some((name, slug)) = renamed {
                    active.name = Set(name);
                    active.slug = Set(slug);
                }
                if let Some(description) = description {
                    active.description = Set(description);
                }
            })
            .await?)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.daos.category().delete(id).await?;
        Ok(())
    }
}
