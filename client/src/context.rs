//! Application context: the signed-in session, the active language and the
//! persisted preferences, held in one value the front-end owns and passes
//! by reference.
//!
//! Lifecycle: [`AppContext::init`] at start-up (restores language and any
//! stored session), [`AppContext::login`] / [`AppContext::logout`] while
//! running.

use crate::api::{ApiClient, SessionToken};
use crate::config::settings::ApiSettings;
use crate::error::ClientError;
use crate::i18n::Translator;
use crate::notice::Notices;
use crate::prefs::{Preferences, LANGUAGE_KEY, TOKEN_KEY, USER_KEY};
use chrono::{DateTime, Utc};
use serde_json::Value;
use shared::models::Row;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct Session {
    pub username: String,
    pub user: Row,
    pub signed_in_at: DateTime<Utc>,
}

impl Session {
    /// Name to greet the user with: `name`, then `username`, then the login.
    pub fn display_name(&self) -> String {
        ["name", "username"]
            .iter()
            .find_map(|key| self.user.get(*key).and_then(Value::as_str))
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.username)
            .to_string()
    }
}

pub struct AppContext {
    api: ApiClient,
    token: SessionToken,
    session: Option<Session>,
    translator: Translator,
    prefs: Preferences,
    notices: Notices,
}

impl AppContext {
    pub fn init(settings: &ApiSettings, prefs: Preferences) -> Result<Self, ClientError> {
        Self::with_translator(settings, prefs, Translator::bundled())
    }

    pub fn with_translator(
        settings: &ApiSettings,
        prefs: Preferences,
        mut translator: Translator,
    ) -> Result<Self, ClientError> {
        let token = SessionToken::new();
        let api = ApiClient::new(settings, Arc::new(token.clone()))?;

        if let Some(language) = prefs.get(LANGUAGE_KEY) {
            if let Err(e) = translator.set_language(language) {
                tracing::warn!(language, error = %e, "Ignoring stored language");
            }
        }

        let session = restore_session(&prefs, &token);
        if let Some(s) = &session {
            tracing::info!(username = %s.username, "Restored stored session");
        }

        Ok(Self {
            api,
            token,
            session,
            translator,
            prefs,
            notices: Notices::new(),
        })
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    pub fn prefs(&self) -> &Preferences {
        &self.prefs
    }

    pub fn prefs_mut(&mut self) -> &mut Preferences {
        &mut self.prefs
    }

    pub fn notices(&self) -> &Notices {
        &self.notices
    }

    pub fn notices_mut(&mut self) -> &mut Notices {
        &mut self.notices
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn require_session(&self) -> Result<&Session, ClientError> {
        self.session.as_ref().ok_or(ClientError::Unauthenticated)
    }

    /// Signs in and stores the session. Empty credentials are rejected
    /// without contacting the backend.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<&Session, ClientError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(self.validation_failure("messages.username_required"));
        }
        if password.is_empty() {
            return Err(self.validation_failure("messages.password_required"));
        }

        let response = match self.api.login(username, password).await {
            Ok(resp) => resp,
            Err(e) => {
                let fallback = self.translator.t("messages.login_failed");
                self.notices.from_error(&e, &fallback);
                return Err(e);
            }
        };

        let user = response.user.unwrap_or_default();
        self.token.set(response.token.clone());
        self.prefs.set(TOKEN_KEY, response.token)?;
        let stored = StoredUser {
            username: username.to_string(),
            user: user.clone(),
        };
        self.prefs.set(USER_KEY, serde_json::to_string(&stored)?)?;

        let session = Session {
            username: username.to_string(),
            user,
            signed_in_at: Utc::now(),
        };
        let greeting = self
            .translator
            .t_with("messages.login_success", &[("user", &session.display_name())]);
        self.notices.success(greeting);
        Ok(self.session.insert(session))
    }

    /// Clears the session, the token held by the HTTP client and the stored
    /// credentials.
    pub fn logout(&mut self) -> Result<(), ClientError> {
        self.token.clear();
        let previous = self.session.take();
        self.prefs.remove(TOKEN_KEY)?;
        self.prefs.remove(USER_KEY)?;
        if let Some(s) = previous {
            tracing::info!(username = %s.username, "Signed out");
        }
        let text = self.translator.t("messages.logout_success");
        self.notices.success(text);
        Ok(())
    }

    /// Switches the interface language for this run only; the stored
    /// choice is left untouched.
    pub fn use_language(&mut self, language: &str) -> Result<(), ClientError> {
        self.translator.set_language(language)
    }

    pub fn set_language(&mut self, language: &str) -> Result<(), ClientError> {
        self.translator.set_language(language)?;
        self.prefs.set(LANGUAGE_KEY, language)?;
        let text = self
            .translator
            .t_with("messages.language_changed", &[("language", language)]);
        self.notices.info(text);
        Ok(())
    }

    fn validation_failure(&mut self, key: &str) -> ClientError {
        let err = ClientError::ValidationError(self.translator.t(key));
        self.notices.from_error(&err, key);
        err
    }
}

#[derive(serde::Serialize, serde::Deserialize)]
struct StoredUser {
    username: String,
    #[serde(default)]
    user: Row,
}

fn restore_session(prefs: &Preferences, token: &SessionToken) -> Option<Session> {
    let stored_token = prefs.get(TOKEN_KEY)?;
    let stored: StoredUser = match prefs.get(USER_KEY).map(serde_json::from_str) {
        Some(Ok(user)) => user,
        Some(Err(e)) => {
            tracing::warn!(error = %e, "Stored user is unreadable; session not restored");
            return None;
        }
        None => return None,
    };
    token.set(stored_token);
    Some(Session {
        username: stored.username,
        user: stored.user,
        signed_in_at: Utc::now(),
    })
}
