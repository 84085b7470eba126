use chrono::{DateTime, Utc};
use sea_orm::FromJsonQueryResult;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// A sellable learning unit. `content` holds the ids of the course's content
/// items in display order; every id points at a `contents` row whose
/// `course_id` is this course.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "courses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(column_type = "Double")]
    pub price: f64,
    pub category: Category,

    /// Public URL of the uploaded thumbnail image.
    pub thumbnail: String,
    pub status: Status,

    #[sea_orm(column_type = "Json")]
    pub content: ContentIds,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Ordered list of owned content ids, stored as a JSON array.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(transparent)]
pub struct ContentIds(pub Vec<i64>);

impl From<Vec<i64>> for ContentIds {
    fn from(ids: Vec<i64>) -> Self {
        Self(ids)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, EnumString, Display, DeriveActiveEnum, Serialize, Deserialize)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "course_category_enum")]
pub enum Category {
    #[strum(serialize = "video")]
    #[sea_orm(string_value = "video")]
    Video,
    #[strum(serialize = "book")]
    #[sea_orm(string_value = "book")]
    Book,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, EnumString, Display, DeriveActiveEnum, Serialize, Deserialize)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "course_status_enum")]
pub enum Status {
    #[strum(serialize = "published")]
    #[sea_orm(string_value = "published")]
    Published,
    #[strum(serialize = "draft")]
    #[sea_orm(string_value = "draft")]
    Draft,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::content::Entity")]
    Content,
}

impl Related<super::content::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Content.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn is_published(&self) -> bool {
        self.status == Status::Published
    }
}
