use std::sync::Arc;

use crate::domain::{User, UserMetadata};
use crate::errors::DonationError;
use crate::storage::AuthProvider;
use crate::wizard::ValidationError;

use super::ServiceResult;

/// Session changes pushed by the auth collaborator.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthEvent {
    SignedIn(User),
    SignedOut,
    UserUpdated(User),
}

/// Fields of the registration form.
#[derive(Debug, Clone, Default)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub name: String,
    pub age: Option<u8>,
    pub profession: Option<String>,
    pub accept_terms: bool,
}

impl SignUpRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if [&self.email, &self.password, &self.name, &self.confirm_password]
            .iter()
            .any(|value| value.trim().is_empty())
        {
            return Err(ValidationError::new(
                "Missing information",
                "Please fill in all required fields.",
            ));
        }
        if self.password != self.confirm_password {
            return Err(ValidationError::new(
                "Passwords don't match",
                "Please ensure your passwords match.",
            ));
        }
        if !self.accept_terms {
            return Err(ValidationError::new(
                "Terms of Service",
                "Please agree to the Terms of Service to continue.",
            ));
        }
        Ok(())
    }
}

/// Explicit, injected session state. Initialised at start-up, refreshed by
/// [`AuthEvent`]s, and cleared on sign-out.
pub struct AuthContext {
    provider: Arc<dyn AuthProvider>,
    user: Option<User>,
    initialized: bool,
}

impl AuthContext {
    pub fn new(provider: Arc<dyn AuthProvider>) -> Self {
        Self {
            provider,
            user: None,
            initialized: false,
        }
    }

    /// Loads the current session from the provider.
    pub async fn initialize(&mut self) -> ServiceResult<Option<&User>> {
        self.user = self.provider.current_user().await?;
        self.initialized = true;
        tracing::debug!(signed_in = self.user.is_some(), "auth context initialised");
        Ok(self.user.as_ref())
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn require_user(&self) -> ServiceResult<&User> {
        self.user.as_ref().ok_or(DonationError::Unauthenticated)
    }

    pub fn apply(&mut self, event: AuthEvent) {
        match event {
            AuthEvent::SignedIn(user) | AuthEvent::UserUpdated(user) => {
                tracing::info!(user = %user.id, "session updated");
                self.user = Some(user);
            }
            AuthEvent::SignedOut => {
                tracing::info!("session cleared");
                self.user = None;
            }
        }
    }

    pub async fn sign_up(&mut self, request: SignUpRequest) -> ServiceResult<User> {
        request.validate()?;
        let metadata = UserMetadata {
            name: request.name.trim().to_string(),
            age: request.age,
            profession: request
                .profession
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty()),
        };
        let user = self
            .provider
            .sign_up(&request.email, &request.password, metadata)
            .await?;
        self.apply(AuthEvent::SignedIn(user.clone()));
        Ok(user)
    }

    pub async fn sign_in(&mut self, email: &str, password: &str) -> ServiceResult<User> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(ValidationError::new(
                "Missing information",
                "Please enter your email and password.",
            )
            .into());
        }
        let user = self.provider.sign_in(email, password).await?;
        self.apply(AuthEvent::SignedIn(user.clone()));
        Ok(user)
    }

    pub async fn sign_out(&mut self) -> ServiceResult<()> {
        self.provider.sign_out().await?;
        self.apply(AuthEvent::SignedOut);
        Ok(())
    }
}
