use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Role carried in the caller's token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Role {
    User,
    Publisher,
    Admin,
    SuperAdmin,
}

impl Role {
    pub fn is_admin(self) -> bool {
        matches!(self, Role::Admin | Role::SuperAdmin)
    }

    /// Only admins create, edit or delete courses.
    pub fn can_manage_courses(self) -> bool {
        self.is_admin()
    }
}

/// The authenticated identity a workflow runs on behalf of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub id: i64,
    pub role: Role,
}

impl Caller {
    pub fn new(id: i64, role: Role) -> Self {
        Self { id, role }
    }

    /// True when the caller authored the record or is an admin.
    pub fn owns_or_admin(&self, author_id: i64) -> bool {
        self.id == author_id || self.role.is_admin()
    }
}
