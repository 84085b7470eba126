use std::future::Future;
use std::pin::Pin;

use sea_orm::sea_query::{Expr, LikeExpr, SimpleExpr};
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbErr,
    EntityTrait, IntoActiveModel, Order, PaginatorTrait, PrimaryKeyTrait, QueryFilter, Select,
};

pub type RepoFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, DbErr>> + Send + 'a>>;

/// Generic data access for one entity, parameterised by its filter type `F`.
///
/// Every method takes the connection explicitly so the same repository works
/// on a `DatabaseConnection` or inside a `DatabaseTransaction`.
pub trait Repository<E, F>: Send + Sync + 'static
where
    E: EntityTrait,
    E::Model: Sync + Send + IntoActiveModel<E::ActiveModel> + 'static,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send + 'static,
    F: Sync + 'static,
{
    fn build_condition(filter: &F) -> Condition;

    fn apply_sorting(query: Select<E>, sort_by: Option<String>) -> Select<E>;

    fn apply_filter(query: Select<E>, filter: &F) -> Select<E> {
        query.filter(Self::build_condition(filter))
    }

    fn create<'a, C>(db: &'a C, active_model: E::ActiveModel) -> RepoFuture<'a, E::Model>
    where
        C: ConnectionTrait,
    {
        Box::pin(async move { active_model.insert(db).await })
    }

    fn update<'a, C>(db: &'a C, active_model: E::ActiveModel) -> RepoFuture<'a, E::Model>
    where
        C: ConnectionTrait,
    {
        Box::pin(async move { active_model.update(db).await })
    }

    fn delete<'a, C>(
        db: &'a C,
        id: <E::PrimaryKey as PrimaryKeyTrait>::ValueType,
    ) -> RepoFuture<'a, u64>
    where
        C: ConnectionTrait,
    {
        Box::pin(async move {
            let res = E::delete_by_id(id).exec(db).await?;
            Ok(res.rows_affected)
        })
    }

    /// Deletes every row matching `filter`. Refuses an empty filter.
    fn delete_where<'a, C>(db: &'a C, filter: &'a F) -> RepoFuture<'a, u64>
    where
        C: ConnectionTrait,
    {
        Box::pin(async move {
            let condition = Self::build_condition(filter);
            if condition.is_empty() {
                return Err(DbErr::Custom(
                    "Refusing to delete without a filter".to_string(),
                ));
            }
            let res = E::delete_many().filter(condition).exec(db).await?;
            Ok(res.rows_affected)
        })
    }

    fn find_by_id<'a, C>(
        db: &'a C,
        id: <E::PrimaryKey as PrimaryKeyTrait>::ValueType,
    ) -> RepoFuture<'a, Option<E::Model>>
    where
        C: ConnectionTrait,
    {
        Box::pin(async move { E::find_by_id(id).one(db).await })
    }

    fn find_one<'a, C>(
        db: &'a C,
        filter: &'a F,
        sort_by: Option<String>,
    ) -> RepoFuture<'a, Option<E::Model>>
    where
        C: ConnectionTrait,
    {
        Box::pin(async move {
            let query = Self::apply_filter(E::find(), filter);
            let query = Self::apply_sorting(query, sort_by);
            query.one(db).await
        })
    }

    fn find_all<'a, C>(
        db: &'a C,
        filter: &'a F,
        sort_by: Option<String>,
    ) -> RepoFuture<'a, Vec<E::Model>>
    where
        C: ConnectionTrait,
    {
        Box::pin(async move {
            let query = Self::apply_filter(E::find(), filter);
            let query = Self::apply_sorting(query, sort_by);
            query.all(db).await
        })
    }

    /// One page of matches plus the total number of matches. `page` is 1-based.
    fn filter<'a, C>(
        db: &'a C,
        filter: &'a F,
        page: u64,
        per_page: u64,
        sort_by: Option<String>,
    ) -> RepoFuture<'a, (Vec<E::Model>, u64)>
    where
        C: ConnectionTrait,
    {
        Box::pin(async move {
            let query = Self::apply_filter(E::find(), filter);
            let query = Self::apply_sorting(query, sort_by);
            let paginator = query.paginate(db, per_page.max(1));
            let total = paginator.num_items().await?;
            let items = paginator.fetch_page(page.saturating_sub(1)).await?;
            Ok((items, total))
        })
    }

    fn count<'a, C>(db: &'a C, filter: &'a F) -> RepoFuture<'a, u64>
    where
        C: ConnectionTrait,
    {
        Box::pin(async move {
            let query = Self::apply_filter(E::find(), filter);
            <Select<E> as PaginatorTrait<'_, C>>::count(query, db).await
        })
    }

    fn exists<'a, C>(db: &'a C, filter: &'a F) -> RepoFuture<'a, bool>
    where
        C: ConnectionTrait,
    {
        Box::pin(async move { Ok(Self::count(db, filter).await? > 0) })
    }
}

/// Splits a `sort` parameter such as `"-created_at,title"` into
/// `(field, order)` pairs. A leading `-` means descending.
pub fn parse_sort(sort_by: &str) -> Vec<(String, Order)> {
    sort_by
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| match s.strip_prefix('-') {
            Some(field) => (field.to_string(), Order::Desc),
            None => (s.to_string(), Order::Asc),
        })
        .collect()
}

/// "column contains needle" with LIKE wildcards in the needle matched
/// literally. SQLite's `LIKE` ignores case for ASCII letters only; other
/// characters must match exactly.
pub fn contains_ci<C: ColumnTrait>(column: C, needle: &str) -> SimpleExpr {
    let escaped = needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    Expr::col(column)
        .like(LikeExpr::new(format!("%{escaped}%")).escape('\\'))
}
