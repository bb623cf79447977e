//! Account registration, login and sessions

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::error::{Error, Result, ValidationErrors};
use crate::models::{Identity, RegistrationForm, Session, User};
use crate::storage::UserRepository;
use crate::validation::{validate_registration, EMAIL_TAKEN, USERNAME_TAKEN};

/// One week
pub const DEFAULT_SESSION_HOURS: i64 = 24 * 7;

/// Hash a password with a fresh random salt
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| Error::PasswordHash(e.to_string()))
}

/// Check a password against a stored PHC string
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(stored_hash).map_err(|e| Error::PasswordHash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Result of a successful login
#[derive(Debug, Clone)]
pub struct SignedIn {
    pub session: Session,
    pub identity: Identity,
}

pub struct AuthService<'a, S: ?Sized> {
    storage: &'a S,
    session_hours: i64,
}

impl<'a, S: UserRepository + ?Sized> AuthService<'a, S> {
    pub fn new(storage: &'a S) -> Self {
        Self {
            storage,
            session_hours: DEFAULT_SESSION_HOURS,
        }
    }

    /// Override how long new sessions last
    pub fn with_session_hours(mut self, hours: i64) -> Self {
        self.session_hours = hours;
        self
    }

    /// Create an account. Nothing is written unless every check passes.
    #[instrument(skip(self, form), fields(username = %form.username.trim()))]
    pub fn register(&self, form: &RegistrationForm) -> Result<Identity> {
        let account = validate_registration(form)?;

        let mut taken = ValidationErrors::default();
        if self
            .storage
            .find_user_by_username(&account.username)?
            .is_some()
        {
            taken.push("username", USERNAME_TAKEN);
        }
        if self.storage.find_user_by_email(&account.email)?.is_some() {
            taken.push("email", EMAIL_TAKEN);
        }
        taken.into_result()?;

        let password_hash = hash_password(&account.password)?;
        let user = User::new(account.username, account.email, password_hash);
        self.storage.create_user(&user)?;

        info!(user_id = %user.id, "Registered user");
        Ok(user.identity())
    }

    /// Verify credentials and open a session
    #[instrument(skip(self, password))]
    pub fn login(&self, username: &str, password: &str) -> Result<SignedIn> {
        let user = self
            .storage
            .find_user_by_username(username.trim())?
            .ok_or_else(|| {
                debug!("Unknown user name");
                Error::Authentication("Incorrect user name".into())
            })?;

        if !verify_password(password, &user.password_hash)? {
            warn!(user_id = %user.id, "Password mismatch");
            return Err(Error::Authentication("Incorrect password".into()));
        }

        self.storage.update_last_login(user.id)?;

        let session = Session::new(user.id, self.session_hours);
        self.storage.create_session(&session)?;

        info!(user_id = %user.id, session_id = %session.id, "User logged in");
        Ok(SignedIn {
            session,
            identity: user.identity(),
        })
    }

    /// End a session. Unknown or missing sessions are fine.
    #[instrument(skip(self))]
    pub fn logout(&self, session_id: Option<Uuid>) -> Result<()> {
        if let Some(id) = session_id {
            self.storage.delete_session(id)?;
        }
        Ok(())
    }

    /// Resolve a session id to the signed-in user, if still valid
    #[instrument(skip(self))]
    pub fn current_identity(&self, session_id: Uuid) -> Result<Option<Identity>> {
        let Some(session) = self.storage.find_valid_session(session_id)? else {
            return Ok(None);
        };
        let user = self.storage.find_user_by_id(session.user_id)?;
        Ok(user.map(|u| u.identity()))
    }

    /// Drop sessions past their expiry
    #[instrument(skip(self))]
    pub fn purge_expired_sessions(&self) -> Result<u64> {
        let removed = self.storage.cleanup_expired_sessions()?;
        if removed > 0 {
            info!(removed, "Purged expired sessions");
        }
        Ok(removed)
    }
}
