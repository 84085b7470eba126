//! Review workflow.
//!
//! Reviews are mutable only by their author or an admin. Every successful
//! create, update or delete schedules a recomputation of the parent resource's
//! `average_rating` on the process [`Supervisor`](util::supervisor::Supervisor).
//! The recompute is not awaited, so it may land after the response is sent.

use crate::caller::Caller;
use crate::error::ServiceError;
use crate::pagination::{Page, PageQuery, Pagination};
use crate::resource::ResourceService;
use crate::service::{Service, ToActiveModel};
use chrono::{DateTime, Utc};
use db::filters::ReviewFilter;
use db::models::resource;
use db::models::review::{ActiveModel, Entity};
use db::repositories::review_repository::ReviewRepository;
use sea_orm::{ActiveValue::Set, DatabaseConnection, EntityTrait};
use serde::{Deserialize, Serialize};
use util::state::AppState;
use validator::Validate;

pub use db::models::review::Model as Review;

/// Body of `POST /resources/{resource_id}/reviews`.
///
/// `resource_id` and `user_id` are never read from the body; they are taken
/// from the path and the authenticated caller.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateReview {
    #[serde(skip)]
    pub resource_id: i64,
    #[serde(skip)]
    pub user_id: i64,
    #[validate(required(message = "Please add a rating between 1 and 5"), range(min = 1, max = 5, message = "Please add a rating between 1 and 5"))]
    pub rating: Option<i32>,
    #[validate(required(message = "Please add some text"), length(min = 1, max = 2000, message = "Please add some text"))]
    pub text: Option<String>,
}

/// Partial update; absent fields are left untouched.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateReview {
    #[serde(skip)]
    pub id: i64,
    #[validate(range(min = 1, max = 5, message = "Please add a rating between 1 and 5"))]
    pub rating: Option<i32>,
    #[validate(length(min = 1, max = 2000, message = "Please add some text"))]
    pub text: Option<String>,
}

impl ToActiveModel<Entity> for CreateReview {
    fn into_active_model(self) -> ActiveModel {
        let now = Utc::now();
        ActiveModel {
            resource_id: Set(self.resource_id),
            user_id: Set(self.user_id),
            rating: Set(self.rating.unwrap_or_default()),
            text: Set(self.text.unwrap_or_default()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
    }
}

impl ToActiveModel<Entity> for UpdateReview {
    fn into_active_model(self) -> ActiveModel {
        let mut active = ActiveModel {
            id: sea_orm::ActiveValue::Unchanged(self.id),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };
        if let Some(rating) = self.rating {
            active.rating = Set(rating);
        }
        if let Some(text) = self.text {
            active.text = Set(text);
        }
        active
    }
}

/// `GET /reviews` query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    pub sort: Option<String>,
    pub rating: Option<i32>,
    pub user_id: Option<i64>,
    pub resource_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResourceSummary {
    pub id: i64,
    pub title: String,
}

/// A review with its resource reference resolved to the resource's title.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewDetail {
    pub id: i64,
    pub rating: i32,
    pub text: String,
    pub user_id: i64,
    pub resource: Option<ResourceSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct ReviewService;

impl Service<Entity, CreateReview, UpdateReview, ReviewFilter, ReviewRepository> for ReviewService {
    const FIELD_ORDER: &'static [&'static str] = &["rating", "text"];
}

impl ReviewService {
    /// Every review of one resource, oldest first.
    pub async fn list_for_resource(
        db: &DatabaseConnection,
        resource_id: i64,
    ) -> Result<Vec<Review>, ServiceError> {
        Self::find_all(db, ReviewFilter::new().with_resource_id(resource_id), None).await
    }

    /// Filtered, sorted and paginated listing across all resources.
    pub async fn list(
        db: &DatabaseConnection,
        query: ReviewQuery,
    ) -> Result<Page<Review>, ServiceError> {
        let paging = PageQuery {
            page: query.page,
            per_page: query.per_page,
            sort: query.sort,
        };

        let mut filter = ReviewFilter::new();
        if let Some(rating) = query.rating {
            filter = filter.with_rating(rating);
        }
        if let Some(user_id) = query.user_id {
            filter = filter.with_user_id(user_id);
        }
        if let Some(resource_id) = query.resource_id {
            filter = filter.with_resource_id(resource_id);
        }

        let (page, per_page) = (paging.page(), paging.per_page());
        let (items, total) = Self::filter(db, filter, page, per_page, paging.sort).await?;
        Ok(Page {
            items,
            pagination: Pagination::new(page, per_page, total),
        })
    }

    pub async fn get(db: &DatabaseConnection, id: i64) -> Result<ReviewDetail, ServiceError> {
        let (review, resource) = Entity::find_by_id(id)
            .find_also_related(resource::Entity)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("No review found with the id of {id}")))?;

        Ok(ReviewDetail {
            id: review.id,
            rating: review.rating,
            text: review.text,
            user_id: review.user_id,
            resource: resource.map(|r| ResourceSummary {
                id: r.id,
                title: r.title,
            }),
            created_at: review.created_at,
            updated_at: review.updated_at,
        })
    }

    /// Creates a review of `resource_id` authored by `caller`.
    pub async fn add(
        state: &AppState,
        caller: &Caller,
        resource_id: i64,
        mut params: CreateReview,
    ) -> Result<Review, ServiceError> {
        params.resource_id = resource_id;
        params.user_id = caller.id;

        if resource::Entity::find_by_id(resource_id)
            .one(state.db())
            .await?
            .is_none()
        {
            return Err(ServiceError::NotFound(format!(
                "No resource with the id of {resource_id}"
            )));
        }

        let review = Self::create(state.db(), params).await?;
        tracing::info!(review_id = review.id, resource_id, user_id = caller.id, "Review created");

        schedule_recompute(state, review.resource_id);
        Ok(review)
    }

    pub async fn edit(
        state: &AppState,
        caller: &Caller,
        id: i64,
        mut params: UpdateReview,
    ) -> Result<Review, ServiceError> {
        let existing = Self::find_owned(state.db(), caller, id, "update").await?;

        params.id = existing.id;
        let review = Self::update(state.db(), params).await?;
        tracing::info!(review_id = review.id, user_id = caller.id, "Review updated");

        schedule_recompute(state, review.resource_id);
        Ok(review)
    }

    pub async fn remove(state: &AppState, caller: &Caller, id: i64) -> Result<(), ServiceError> {
        let existing = Self::find_owned(state.db(), caller, id, "delete").await?;

        Self::delete(state.db(), existing.id).await?;
        tracing::info!(review_id = id, user_id = caller.id, "Review deleted");

        schedule_recompute(state, existing.resource_id);
        Ok(())
    }

    async fn find_owned(
        db: &DatabaseConnection,
        caller: &Caller,
        id: i64,
        action: &str,
    ) -> Result<Review, ServiceError> {
        let review = Self::find_by_id(db, id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("No review with the id of {id}")))?;

        if !caller.owns_or_admin(review.user_id) {
            tracing::warn!(review_id = id, user_id = caller.id, action, "Rejected review mutation by non-owner");
            return Err(ServiceError::Unauthorized(format!(
                "Not authorized to {action} review"
            )));
        }
        Ok(review)
    }
}

fn schedule_recompute(state: &AppState, resource_id: i64) {
    let db = state.db_clone();
    state.supervisor().spawn("recompute_average_rating", async move {
        ResourceService::recompute_average_rating(&db, resource_id)
            .await
            .map(|_| ())
    });
}
