use crate::{
    auth::{hash_password, verify_password},
    error::ServiceError,
    identifier::generate_uuid,
    models::{LoginRequest, NewUser, Role, SignupRequest, User},
    repository::{RepositoryError, RepositoryState},
};

/// UserService
///
/// Account creation and credential checks. Session binding itself happens at the
/// HTTP boundary (see `auth::bind_session`), so this service stays session-agnostic.
///
/// Signups are `regular` unless the email is in `admin_emails` (the `ADMIN_EMAILS`
/// setting). Clients never choose their own role.
#[derive(Clone)]
pub struct UserService {
    repo: RepositoryState,
    admin_emails: Vec<String>,
}

impl UserService {
    pub fn new(repo: RepositoryState) -> Self {
        Self {
            repo,
            admin_emails: Vec::new(),
        }
    }

    /// Grants the admin role to signups from these (lowercased) emails.
    pub fn with_admin_emails(mut self, admin_emails: Vec<String>) -> Self {
        self.admin_emails = admin_emails;
        self
    }

    /// Creates an account. Emails are unique and compared lowercase.
    pub async fn signup(&self, request: SignupRequest) -> Result<User, ServiceError> {
        let email = request.email.trim().to_lowercase();
        let role = if self.admin_emails.contains(&email) {
            Role::Admin
        } else {
            Role::Regular
        };

        if self.repo.find_user_by_email(&email).await?.is_some() {
            return Err(email_taken(&email));
        }

        let password_hash = hash_password(&request.password)?;
        let user = self
            .repo
            .create_user(NewUser {
                uuid: generate_uuid(),
                name: request.name.trim().to_string(),
                email: email.clone(),
                password_hash,
                role,
            })
            .await
            .map_err(|e| match e {
                // Lost a race with a concurrent signup for the same email.
                RepositoryError::Duplicate(_) => email_taken(&email),
                other => other.into(),
            })?;

        tracing::info!(user = %user.uuid, role = ?user.role, "user signed up");
        Ok(user)
    }

    /// Verifies credentials and returns the matching user.
    /// Unknown email and wrong password are indistinguishable to the caller.
    pub async fn login(&self, request: LoginRequest) -> Result<User, ServiceError> {
        let email = request.email.trim().to_lowercase();

        let Some(user) = self.repo.find_user_by_email(&email).await? else {
            tracing::debug!("login attempt for unknown email");
            return Err(ServiceError::InvalidCredentials);
        };

        if !verify_password(&request.password, &user.password_hash)? {
            tracing::debug!(user = %user.uuid, "login attempt with wrong password");
            return Err(ServiceError::InvalidCredentials);
        }

        tracing::info!(user = %user.uuid, "user logged in");
        Ok(user)
    }
}

fn email_taken(email: &str) -> ServiceError {
    ServiceError::conflict("User already exists", format!("{} is already registered", email))
}
