//! Account and session use-case service.
//!
//! # Responsibility
//! - Register accounts with argon2 password hashes.
//! - Exchange credentials for session tokens and resolve tokens back to users.
//!
//! # Invariants
//! - Plain passwords never reach storage or logs.
//! - Failed logins do not reveal whether the username exists.
//! - Logging out an unknown token is a no-op.

use crate::form::{clean_account, FormErrors, SignupForm, USERNAME_TAKEN};
use crate::model::user::User;
use crate::repo::session_repo::SessionRepository;
use crate::repo::user_repo::UserRepository;
use crate::repo::{RepoError, RepoResult};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Service error for account/session use-cases.
#[derive(Debug)]
pub enum AuthError {
    /// Account fields did not validate.
    Invalid(FormErrors),
    /// Username/password pair did not match an account.
    InvalidCredentials,
    /// Hashing backend failure or malformed stored hash.
    PasswordHash(String),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid(errors) => write!(f, "invalid account data: {errors}"),
            Self::InvalidCredentials => write!(f, "invalid credentials"),
            Self::PasswordHash(message) => write!(f, "password hashing failed: {message}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AuthError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for AuthError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Conflict(_) => Self::Invalid(FormErrors::single("username", USERNAME_TAKEN)),
            other => Self::Repo(other),
        }
    }
}

/// Successful login: the account plus its fresh session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub user: User,
    pub token: String,
}

/// Argon2id cost parameters used when hashing new passwords.
///
/// Verification always uses the parameters embedded in the stored hash, so
/// changing the cost never locks existing accounts out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordCost {
    /// Memory in KiB; at least 8.
    pub memory_kib: u32,
    /// Passes over memory; at least 1.
    pub iterations: u32,
}

impl Default for PasswordCost {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
        }
    }
}

impl PasswordCost {
    /// Builds an argon2id hasher for these parameters.
    pub fn hasher(&self) -> Result<Argon2<'static>, AuthError> {
        let params = Params::new(self.memory_kib, self.iterations, 1, None)
            .map_err(|err| AuthError::PasswordHash(err.to_string()))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

/// Account service facade over user and session repositories.
pub struct AuthService<U: UserRepository, S: SessionRepository> {
    users: U,
    sessions: S,
    hasher: Argon2<'static>,
}

impl<U: UserRepository, S: SessionRepository> AuthService<U, S> {
    /// Creates a service with argon2's default cost parameters.
    pub fn new(users: U, sessions: S) -> Self {
        Self::with_hasher(users, sessions, Argon2::default())
    }

    /// Creates a service hashing new passwords with `cost`.
    pub fn with_cost(users: U, sessions: S, cost: PasswordCost) -> Result<Self, AuthError> {
        Ok(Self::with_hasher(users, sessions, cost.hasher()?))
    }

    pub fn with_hasher(users: U, sessions: S, hasher: Argon2<'static>) -> Self {
        Self {
            users,
            sessions,
            hasher,
        }
    }

    /// Registers a regular account from a signup form.
    pub fn signup(&self, form: &SignupForm) -> Result<User, AuthError> {
        let username = form.clean().map_err(AuthError::Invalid)?;
        if self.users.find_by_username(&username)?.is_some() {
            return Err(AuthError::Invalid(FormErrors::single(
                "username",
                USERNAME_TAKEN,
            )));
        }
        self.register(&username, &form.password1, false)
    }

    /// Creates a regular account; the username is trimmed and checked.
    pub fn create_user(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let username = clean_account(username, password).map_err(AuthError::Invalid)?;
        self.register(&username, password, false)
    }

    /// Creates an administrative account; same checks as `create_user`.
    pub fn create_superuser(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let username = clean_account(username, password).map_err(AuthError::Invalid)?;
        self.register(&username, password, true)
    }

    /// Verifies credentials and opens a new session.
    pub fn login(&self, username: &str, password: &str) -> Result<LoginOutcome, AuthError> {
        let Some(user) = self.users.find_by_username(username.trim())? else {
            // Spend the same argon2 work as a real verification.
            let salt = SaltString::generate(&mut OsRng);
            let _ = self.hasher.hash_password(password.as_bytes(), &salt);
            warn!("event=login module=auth_service status=rejected");
            return Err(AuthError::InvalidCredentials);
        };

        let parsed = PasswordHash::new(&user.password_hash)
            .map_err(|err| AuthError::PasswordHash(err.to_string()))?;
        if self
            .hasher
            .verify_password(password.as_bytes(), &parsed)
            .is_err()
        {
            warn!(
                "event=login module=auth_service status=rejected user_id={}",
                user.id
            );
            return Err(AuthError::InvalidCredentials);
        }

        let token = Uuid::new_v4().simple().to_string();
        self.sessions.create_session(&token, user.id)?;
        info!(
            "event=login module=auth_service status=ok user_id={}",
            user.id
        );
        Ok(LoginOutcome { user, token })
    }

    /// Resolves a session token to its account.
    pub fn resolve_session(&self, token: &str) -> RepoResult<Option<User>> {
        self.sessions.find_user(token)
    }

    /// Ends a session.
    pub fn logout(&self, token: &str) -> RepoResult<()> {
        self.sessions.delete_session(token)?;
        info!("event=logout module=auth_service status=ok");
        Ok(())
    }

    fn register(&self, username: &str, password: &str, is_superuser: bool) -> Result<User, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = self
            .hasher
            .hash_password(password.as_bytes(), &salt)
            .map_err(|err| AuthError::PasswordHash(err.to_string()))?
            .to_string();

        let user = self
            .users
            .create_user(username, &password_hash, is_superuser)?;
        info!(
            "event=user_create module=auth_service status=ok user_id={} superuser={}",
            user.id, is_superuser
        );
        Ok(user)
    }
}
