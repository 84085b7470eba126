use crate::filters::ReviewFilter;
use crate::models::review;
use crate::repositories::repository::{Repository, parse_sort};
use sea_orm::sea_query::{Expr, Func, Query, SimpleExpr};
use sea_orm::{ColumnTrait, Condition, QueryOrder, Select};

pub struct ReviewRepository;

impl ReviewRepository {
    /// Scalar subquery for the mean rating of `resource_id`, rounded to one
    /// decimal. `NULL` when the resource has no reviews.
    pub fn rounded_average_rating(resource_id: i64) -> SimpleExpr {
        let select = Query::select()
            .expr(Func::round_with_precision(
                Func::avg(Expr::col((review::Entity, review::Column::Rating))),
                1,
            ))
            .from(review::Entity)
            .and_where(Expr::col((review::Entity, review::Column::ResourceId)).eq(resource_id))
            .to_owned();
        SimpleExpr::SubQuery(None, Box::new(select.into_sub_query_statement()))
    }
}

impl Repository<review::Entity, ReviewFilter> for ReviewRepository {
    fn build_condition(filter: &ReviewFilter) -> Condition {
        let mut condition = Condition::all();
        if let Some(id) = filter.id {
            condition = condition.add(review::Column::Id.eq(id));
        }
        if let Some(resource_id) = filter.resource_id {
            condition = condition.add(review::Column::ResourceId.eq(resource_id));
        }
        if let Some(user_id) = filter.user_id {
            condition = condition.add(review::Column::UserId.eq(user_id));
        }
        if let Some(rating) = filter.rating {
            condition = condition.add(review::Column::Rating.eq(rating));
        }
        condition
    }

    fn apply_sorting(
        mut query: Select<review::Entity>,
        sort_by: Option<String>,
    ) -> Select<review::Entity> {
        if let Some(sort) = sort_by {
            for (field, order) in parse_sort(&sort) {
                query = match field.as_str() {
                    "rating" => query.order_by(review::Column::Rating, order),
                    "created_at" | "createdAt" => query.order_by(review::Column::CreatedAt, order),
                    "updated_at" | "updatedAt" => query.order_by(review::Column::UpdatedAt, order),
                    _ => query,
                };
            }
        }
        query.order_by_asc(review::Column::Id)
    }
}
