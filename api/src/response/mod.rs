use serde::Serialize;
use services::pagination::Pagination;

/// Standardized API response wrapper for all successful JSON responses.
///
/// ```json
/// {
///   "success": true,
///   "message": "Course created successfully",
///   "data": { ... }
/// }
/// ```
///
/// List endpoints may add `count` (number of items in `data`) and
/// `pagination` (page links). Both are omitted when unset.
///
/// Failures never use this type; they are rendered by
/// [`crate::error::ApiError`] as `{ "success": false, "error": "..." }`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T>
where
    T: Serialize,
{
    pub success: bool,
    pub message: String,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl<T> ApiResponse<T>
where
    T: Serialize,
{
    /// Constructs a success response with the given data and message.
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
            count: None,
            pagination: None,
        }
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }
}
