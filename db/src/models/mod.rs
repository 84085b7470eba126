pub mod content;
pub mod course;
pub mod resource;
pub mod review;

pub use content::Entity as Content;
pub use course::Entity as Course;
pub use resource::Entity as Resource;
pub use review::Entity as Review;
