pub mod content_repository;
pub mod course_repository;
pub mod repository;
pub mod resource_repository;
pub mod review_repository;
