use crate::error::ServiceError;
use crate::pagination::{Page, PageQuery, Pagination};
use crate::service::{Service, ToActiveModel};
use chrono::Utc;
use db::filters::ResourceFilter;
use db::models::resource::{ActiveModel, Entity};
use db::repositories::resource_repository::ResourceRepository;
use sea_orm::{ActiveValue::Set, DatabaseConnection, EntityTrait};
use serde::Deserialize;
use validator::Validate;

pub use db::models::resource::Model as Resource;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateResource {
    #[validate(
        required(message = "Please add a title"),
        length(min = 1, max = 100, message = "Title must be between 1 and 100 characters")
    )]
    pub title: Option<String>,
    #[validate(
        required(message = "Please add a description"),
        length(min = 1, message = "Please add a description")
    )]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateResource {
    #[serde(skip)]
    pub id: i64,
    #[validate(length(min = 1, max = 100, message = "Title must be between 1 and 100 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Please add a description"))]
    pub description: Option<String>,
}

impl ToActiveModel<Entity> for CreateResource {
    fn into_active_model(self) -> ActiveModel {
        let now = Utc::now();
        ActiveModel {
            title: Set(self.title.unwrap_or_default().trim().to_string()),
            description: Set(self.description.unwrap_or_default()),
            average_rating: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
    }
}

impl ToActiveModel<Entity> for UpdateResource {
    fn into_active_model(self) -> ActiveModel {
        let mut active = ActiveModel {
            id: sea_orm::ActiveValue::Unchanged(self.id),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };
        if let Some(title) = self.title {
            active.title = Set(title.trim().to_string());
        }
        if let Some(description) = self.description {
            active.description = Set(description);
        }
        active
    }
}

/// `GET /resources` query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResourceQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    pub sort: Option<String>,
    /// Title substring.
    pub query: Option<String>,
}

pub struct ResourceService;

impl Service<Entity, CreateResource, UpdateResource, ResourceFilter, ResourceRepository>
    for ResourceService
{
    const FIELD_ORDER: &'static [&'static str] = &["title", "description"];
}

impl ResourceService {
    pub async fn list(
        db: &DatabaseConnection,
        query: ResourceQuery,
    ) -> Result<Page<Resource>, ServiceError> {
        let paging = PageQuery {
            page: query.page,
            per_page: query.per_page,
            sort: query.sort,
        };
        let mut filter = ResourceFilter::new();
        if let Some(q) = query.query.filter(|q| !q.trim().is_empty()) {
            filter = filter.with_query(q.trim().to_string());
        }

        let (page, per_page) = (paging.page(), paging.per_page());
        let (items, total) = Self::filter(db, filter, page, per_page, paging.sort).await?;
        Ok(Page {
            items,
            pagination: Pagination::new(page, per_page, total),
        })
    }

    pub async fn get(db: &DatabaseConnection, id: i64) -> Result<Resource, ServiceError> {
        Self::find_by_id(db, id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    pub async fn edit(
        db: &DatabaseConnection,
        id: i64,
        mut params: UpdateResource,
    ) -> Result<Resource, ServiceError> {
        Self::get(db, id).await?;
        params.id = id;
        Self::update(db, params).await
    }

    pub async fn remove(db: &DatabaseConnection, id: i64) -> Result<(), ServiceError> {
        if !Self::delete(db, id).await? {
            return Err(not_found(id));
        }
        tracing::info!(resource_id = id, "Deleted resource and its reviews");
        Ok(())
    }

    /// Recomputes `average_rating` from every review of the resource: the mean
    /// rounded to one decimal, or `None` without reviews.
    ///
    /// A resource deleted in the meantime is not an error; nothing is written.
    pub async fn recompute_average_rating(
        db: &DatabaseConnection,
        resource_id: i64,
    ) -> Result<Option<f64>, ServiceError> {
        if ResourceRepository::refresh_average_rating(db, resource_id).await? == 0 {
            tracing::warn!(resource_id, "Resource vanished before its rating was recomputed");
            return Ok(None);
        }

        let average = Entity::find_by_id(resource_id)
            .one(db)
            .await?
            .and_then(|r| r.average_rating);
        tracing::debug!(resource_id, ?average, "Recomputed average rating");
        Ok(average)
    }
}

fn not_found(id: i64) -> ServiceError {
    ServiceError::NotFound(format!("Resource not found with id of {id}"))
}
