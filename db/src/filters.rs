use crate::models::course::{Category, Status};

#[derive(Debug, Clone, Default)]
pub struct CourseFilter {
    pub id: Option<i64>,
    pub status: Option<Status>,
    pub category: Option<Category>,
    /// Case-insensitive substring match on title OR description.
    pub query: Option<String>,
}

impl CourseFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn published() -> Self {
        Self::new().with_status(Status::Published)
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_query(mut self, query: String) -> Self {
        self.query = Some(query);
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct ContentFilter {
    pub id: Option<i64>,
    pub course_id: Option<i64>,
}

impl ContentFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_course_id(mut self, course_id: i64) -> Self {
        self.course_id = Some(course_id);
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct ResourceFilter {
    pub id: Option<i64>,
    /// Case-insensitive substring match on title.
    pub query: Option<String>,
}

impl ResourceFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_query(mut self, query: String) -> Self {
        self.query = Some(query);
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReviewFilter {
    pub id: Option<i64>,
    pub resource_id: Option<i64>,
    pub user_id: Option<i64>,
    pub rating: Option<i32>,
}

impl ReviewFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_resource_id(mut self, resource_id: i64) -> Self {
        self.resource_id = Some(resource_id);
        self
    }

    pub fn with_user_id(mut self, user_id: i64) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn with_rating(mut self, rating: i32) -> Self {
        self.rating = Some(rating);
        self
    }
}
