pub mod m202510010001_create_courses;
pub mod m202510010002_create_contents;
pub mod m202510010003_create_resources;
pub mod m202510010004_create_reviews;
