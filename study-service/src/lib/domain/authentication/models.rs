use auth::IssuedToken;

use crate::domain::user::models::User;

/// Successful login: the user and a fresh session token for them.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: User,
    pub issued: IssuedToken,
}
