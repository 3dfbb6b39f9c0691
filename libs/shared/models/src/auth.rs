use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,
    pub exp: Option<u64>,
    pub iat: Option<u64>,
    pub email: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: Option<String>,
    pub role: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    /// Maps the token's role claim onto the clinic's permission model.
    /// Unknown roles are treated as anonymous rather than rejected here;
    /// the scheduler decides what anonymous actors may do.
    pub fn actor_role(&self) -> ActorRole {
        match self.role.as_deref() {
            Some("admin") => ActorRole::Admin,
            Some("employee") => ActorRole::Employee,
            _ => ActorRole::Anonymous,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorRole {
    Admin,
    Employee,
    Anonymous,
}

impl ActorRole {
    pub fn is_admin(self) -> bool {
        self == ActorRole::Admin
    }

    /// Employees and administrators alike may work the appointment panel.
    pub fn is_staff(self) -> bool {
        matches!(self, ActorRole::Admin | ActorRole::Employee)
    }
}
