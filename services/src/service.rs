use std::future::Future;
use std::pin::Pin;

use crate::error::ServiceError;
use db::repositories::repository::Repository;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PrimaryKeyTrait,
};
use validator::Validate;

pub type ServiceFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ServiceError>> + Send + 'a>>;

/// Converts validated request parameters into an active model.
pub trait ToActiveModel<E>
where
    E: EntityTrait,
{
    fn into_active_model(self) -> E::ActiveModel;
}

/// Validated CRUD over one entity, delegating persistence to `R`.
///
/// `C` and `U` are the create and update parameter types. Both are validated
/// before anything touches the database; the first violation (walking
/// [`Service::FIELD_ORDER`]) becomes a `BadRequest`.
pub trait Service<E, C, U, F, R>: Send + Sync + 'static
where
    E: EntityTrait,
    E::Model: Sync + Send + IntoActiveModel<E::ActiveModel> + 'static,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send + 'static,
    C: ToActiveModel<E> + Validate + Send + 'static,
    U: ToActiveModel<E> + Validate + Send + 'static,
    F: Send + Sync + 'static,
    R: Repository<E, F>,
{
    const FIELD_ORDER: &'static [&'static str];

    fn create<'a>(db: &'a DatabaseConnection, params: C) -> ServiceFuture<'a, E::Model> {
        Box::pin(async move {
            params
                .validate()
                .map_err(|e| ServiceError::invalid(&e, Self::FIELD_ORDER))?;
            Ok(R::create(db, params.into_active_model()).await?)
        })
    }

    fn update<'a>(db: &'a DatabaseConnection, params: U) -> ServiceFuture<'a, E::Model> {
        Box::pin(async move {
            params
                .validate()
                .map_err(|e| ServiceError::invalid(&e, Self::FIELD_ORDER))?;
            Ok(R::update(db, params.into_active_model()).await?)
        })
    }

    /// Deletes by id and reports whether a row was removed.
    fn delete<'a>(
        db: &'a DatabaseConnection,
        id: <E::PrimaryKey as PrimaryKeyTrait>::ValueType,
    ) -> ServiceFuture<'a, bool> {
        Box::pin(async move { Ok(R::delete(db, id).await? > 0) })
    }

    fn find_by_id<'a>(
        db: &'a DatabaseConnection,
        id: <E::PrimaryKey as PrimaryKeyTrait>::ValueType,
    ) -> ServiceFuture<'a, Option<E::Model>> {
        Box::pin(async move { Ok(R::find_by_id(db, id).await?) })
    }

    fn find_all<'a>(
        db: &'a DatabaseConnection,
        filter: F,
        sort_by: Option<String>,
    ) -> ServiceFuture<'a, Vec<E::Model>> {
        Box::pin(async move { Ok(R::find_all(db, &filter, sort_by).await?) })
    }

    fn filter<'a>(
        db: &'a DatabaseConnection,
        filter: F,
        page: u64,
        per_page: u64,
        sort_by: Option<String>,
    ) -> ServiceFuture<'a, (Vec<E::Model>, u64)> {
        Box::pin(async move { Ok(R::filter(db, &filter, page, per_page, sort_by).await?) })
    }

    fn count<'a>(db: &'a DatabaseConnection, filter: F) -> ServiceFuture<'a, u64> {
        Box::pin(async move { Ok(R::count(db, &filter).await?) })
    }
}
