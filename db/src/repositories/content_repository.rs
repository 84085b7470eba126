use crate::filters::ContentFilter;
use crate::models::content;
use crate::repositories::repository::Repository;
use sea_orm::{ColumnTrait, Condition, QueryOrder, Select};

pub struct ContentRepository;

impl Repository<content::Entity, ContentFilter> for ContentRepository {
    fn build_condition(filter: &ContentFilter) -> Condition {
        let mut condition = Condition::all();
        if let Some(id) = filter.id {
            condition = condition.add(content::Column::Id.eq(id));
        }
        if let Some(course_id) = filter.course_id {
            condition = condition.add(content::Column::CourseId.eq(course_id));
        }
        condition
    }

    /// Contents are always returned in insertion order.
    fn apply_sorting(
        query: Select<content::Entity>,
        _sort_by: Option<String>,
    ) -> Select<content::Entity> {
        query.order_by_asc(content::Column::Id)
    }
}
