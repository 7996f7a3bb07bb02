// Session authentication
//
// Token-based login/logout against `SYNO.API.Auth`. The login call is
// issued exactly once -- there are no alternate auth candidates -- and
// the session token rides every subsequent request as `_sid`.

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};

use crate::client::{DsmClient, Session};
use crate::endpoints::{AUTH_API, Candidate, RequestShape};
use crate::error::Error;

const AUTH_LOGIN: Candidate = Candidate {
    endpoint: "auth.cgi",
    api: AUTH_API,
    method: "login",
    shape: RequestShape::Get,
};

const AUTH_LOGOUT: Candidate = Candidate {
    endpoint: "auth.cgi",
    api: AUTH_API,
    method: "logout",
    shape: RequestShape::Get,
};

impl DsmClient {
    /// Authenticate with the appliance using account name and secret.
    ///
    /// Success requires both the envelope's explicit success flag and a
    /// token in `data.sid` -- a success flag without a token is treated
    /// as login failure rather than trusted.
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<Session, Error> {
        debug!("logging in at {}", self.base_url());

        let envelope = self
            .request_envelope(
                AUTH_LOGIN,
                &[
                    ("account", username),
                    ("passwd", password.expose_secret()),
                    ("session", "DSM"),
                    ("format", "sid"),
                ],
            )
            .await
            .map_err(|e| match e {
                Error::Deserialization { message, .. } => Error::Authentication {
                    message: format!("malformed login response: {message}"),
                },
                other => other,
            })?;

        if !envelope.success {
            let code = envelope.error.map_or(-1, |e| e.code);
            return Err(Error::Authentication {
                message: format!("login rejected (error code {code})"),
            });
        }

        let sid = envelope
            .data
            .as_ref()
            .and_then(|d| d.get("sid"))
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty());

        match sid {
            Some(sid) => {
                debug!("login successful");
                Ok(Session::new(sid.to_owned()))
            }
            None => Err(Error::Authentication {
                message: "login reported success but returned no session token".into(),
            }),
        }
    }

    /// End the session. Best-effort: failures are logged, never raised.
    pub async fn logout(&self, session: &Session) {
        debug!("logging out at {}", self.base_url());

        match self
            .request_envelope(AUTH_LOGOUT, &[("_sid", session.token())])
            .await
        {
            Ok(_) => debug!("logout complete"),
            Err(e) => warn!("logout failed: {e}"),
        }
    }
}
