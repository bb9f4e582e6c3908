use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthError;
use auth::Authenticator;
use auth::PasswordError;

use crate::domain::authentication::models::LoginOutcome;
use crate::domain::authentication::ports::AuthGate;
use crate::domain::authentication::ports::AuthServicePort;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;

/// Authentication service resolving credentials and tokens against the
/// user store.
pub struct AuthService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
}

impl<UR> AuthService<UR>
where
    UR: UserRepository,
{
    /// Create a new auth service.
    ///
    /// # Arguments
    /// * `repository` - User store to resolve identities against
    /// * `authenticator` - Shared hasher and token coordinator
    pub fn new(repository: Arc<UR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }

    /// Run an Argon2 bound step on the blocking pool.
    async fn run_blocking<T, F>(&self, task: F) -> Result<T, AuthError>
    where
        T: Send + 'static,
        F: FnOnce(&Authenticator) -> T + Send + 'static,
    {
        let authenticator = Arc::clone(&self.authenticator);
        tokio::task::spawn_blocking(move || task(&authenticator))
            .await
            .map_err(|e| AuthError::Password(PasswordError::HashingFailed(e.to_string())))
    }

    async fn reject_unknown_user(&self, password: String) -> AuthError {
        match self
            .run_blocking(move |authenticator| authenticator.reject_unknown_user(&password))
            .await
        {
            Ok(rejection) | Err(rejection) => rejection,
        }
    }
}

#[async_trait]
impl<UR> AuthGate for AuthService<UR>
where
    UR: UserRepository,
{
    async fn authenticate(&self, token: &str) -> Result<User, AuthError> {
        let identity = self.authenticator.verify_token(token)?;

        let user_id = UserId::from_string(&identity).map_err(|e| {
            tracing::debug!(error = %e, "Token subject is not a user id");
            AuthError::InvalidToken
        })?;

        self.repository
            .find_by_id(&user_id)
            .await
            .map_err(|e| AuthError::Store(e.to_string()))?
            .ok_or(AuthError::UnknownUser)
    }
}

#[async_trait]
impl<UR> AuthServicePort for AuthService<UR>
where
    UR: UserRepository,
{
    async fn login(&self, username: &str, password: &str) -> Result<LoginOutcome, AuthError> {
        let password = password.to_string();
        let username = match Username::new(username.to_string()) {
            Ok(username) => username,
            Err(_) => return Err(self.reject_unknown_user(password).await),
        };

        let user = self
            .repository
            .find_by_username(&username)
            .await
            .map_err(|e| AuthError::Store(e.to_string()))?;

        let Some(user) = user else {
            return Err(self.reject_unknown_user(password).await);
        };

        let stored_hash = user.password_hash.clone();
        let identity = user.id.to_string();
        let issued = self
            .run_blocking(move |authenticator| {
                authenticator.authenticate(&password, &stored_hash, &identity)
            })
            .await??;

        tracing::info!(user_id = %user.id, "User logged in");

        Ok(LoginOutcome { user, issued })
    }
}
