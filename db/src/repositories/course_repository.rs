use crate::filters::CourseFilter;
use crate::models::course;
use crate::repositories::repository::{Repository, contains_ci, parse_sort};
use sea_orm::{ColumnTrait, Condition, QueryOrder, Select};

pub struct CourseRepository;

impl Repository<course::Entity, CourseFilter> for CourseRepository {
    fn build_condition(filter: &CourseFilter) -> Condition {
        let mut condition = Condition::all();
        if let Some(id) = filter.id {
            condition = condition.add(course::Column::Id.eq(id));
        }
        if let Some(status) = filter.status {
            condition = condition.add(course::Column::Status.eq(status));
        }
        if let Some(category) = filter.category {
            condition = condition.add(course::Column::Category.eq(category));
        }
        if let Some(query_str) = &filter.query {
            condition = condition.add(
                Condition::any()
                    .add(contains_ci(course::Column::Title, query_str))
                    .add(contains_ci(course::Column::Description, query_str)),
            );
        }
        condition
    }

    /// Unknown fields are ignored. Without a sort the newest course comes
    /// first; id breaks ties between rows created in the same instant.
    fn apply_sorting(
        mut query: Select<course::Entity>,
        sort_by: Option<String>,
    ) -> Select<course::Entity> {
        let fields = sort_by.as_deref().map(parse_sort).unwrap_or_default();
        let mut sorted = false;

        for (field, order) in fields {
            let column = match field.as_str() {
                "title" => course::Column::Title,
                "price" => course::Column::Price,
                "category" => course::Column::Category,
                "status" => course::Column::Status,
                "created_at" | "createdAt" => course::Column::CreatedAt,
                "updated_at" | "updatedAt" => course::Column::UpdatedAt,
                _ => continue,
            };
            query = query.order_by(column, order);
            sorted = true;
        }

        if !sorted {
            query = query.order_by_desc(course::Column::CreatedAt);
        }
        query.order_by_desc(course::Column::Id)
    }
}
