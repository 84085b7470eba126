use crate::filters::ResourceFilter;
use crate::models::resource;
use crate::repositories::repository::{Repository, contains_ci, parse_sort};
use crate::repositories::review_repository::ReviewRepository;
use sea_orm::{ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder, Select};

pub struct ResourceRepository;

impl ResourceRepository {
    /// Sets `average_rating` from the resource's reviews in a single
    /// `UPDATE ... SET average_rating = (SELECT ...)`, so concurrent refreshes
    /// never write an average read before another review change. Returns the
    /// number of rows touched: 0 when the resource no longer exists.
    pub async fn refresh_average_rating<C: ConnectionTrait>(
        db: &C,
        resource_id: i64,
    ) -> Result<u64, DbErr> {
        let res = resource::Entity::update_many()
            .col_expr(
                resource::Column::AverageRating,
                ReviewRepository::rounded_average_rating(resource_id),
            )
            .filter(resource::Column::Id.eq(resource_id))
            .exec(db)
            .await?;
        Ok(res.rows_affected)
    }
}

impl Repository<resource::Entity, ResourceFilter> for ResourceRepository {
    fn build_condition(filter: &ResourceFilter) -> Condition {
        let mut condition = Condition::all();
        if let Some(id) = filter.id {
            condition = condition.add(resource::Column::Id.eq(id));
        }
        if let Some(query_str) = &filter.query {
            condition = condition.add(contains_ci(resource::Column::Title, query_str));
        }
        condition
    }

    fn apply_sorting(
        mut query: Select<resource::Entity>,
        sort_by: Option<String>,
    ) -> Select<resource::Entity> {
        if let Some(sort) = sort_by {
            for (field, order) in parse_sort(&sort) {
                query = match field.as_str() {
                    "title" => query.order_by(resource::Column::Title, order),
                    "average_rating" | "averageRating" => {
                        query.order_by(resource::Column::AverageRating, order)
                    }
                    "created_at" | "createdAt" => {
                        query.order_by(resource::Column::CreatedAt, order)
                    }
                    _ => query,
                };
            }
        }
        query.order_by_asc(resource::Column::Id)
    }
}
