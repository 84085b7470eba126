use serde::{Deserialize, Serialize};
use services::caller::{Caller, Role};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: i64,
    pub role: Role,
    pub exp: usize,
}

#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// The identity handed to service workflows.
    pub fn caller(&self) -> Caller {
        Caller::new(self.0.sub, self.0.role)
    }
}
