// DSM HTTP client
//
// Wraps `reqwest::Client` with DSM-specific URL construction, envelope
// decoding, and tri-state response classification. Operation groups
// (auth, system, bundles) are implemented as inherent methods via
// separate files to keep this module focused on transport mechanics.

use std::time::Duration;

use tracing::debug;
use url::Url;

use crate::endpoints::{api_version, Candidate, IdQuoting, RequestShape};
use crate::error::Error;
use crate::models::Envelope;
use crate::outcome::OperationOutcome;
use crate::transport::TransportConfig;

/// Opaque session token issued by the appliance on login.
///
/// Exists only between a successful `login` and the matching `logout`;
/// every authenticated call borrows it, so operations cannot be issued
/// without one.
#[derive(Clone)]
pub struct Session {
    sid: String,
}

impl Session {
    pub(crate) fn new(sid: String) -> Self {
        Self { sid }
    }

    /// The raw token value, attached as `_sid` to authenticated calls.
    pub fn token(&self) -> &str {
        &self.sid
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Token is a credential; never log it verbatim.
        f.debug_struct("Session").field("sid", &"<redacted>").finish()
    }
}

/// Raw HTTP client for the DSM web API.
///
/// Auth calls go to `/webapi/auth.cgi`; everything else goes to
/// `/webapi/{endpoint}` named by the candidate. Requests carry `api`,
/// `method`, `version`, and (post-login) `_sid`.
pub struct DsmClient {
    http: reqwest::Client,
    base_url: Url,
    verify_delay: Duration,
}

impl DsmClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the appliance root, e.g. `https://nas.local:5001`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url,
            verify_delay: Duration::from_secs(2),
        })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            verify_delay: Duration::from_secs(2),
        }
    }

    /// Override the delay before a state-verification poll.
    ///
    /// The default (2s) gives the appliance's asynchronous operations
    /// time to take effect; tests set this to zero.
    pub fn with_verify_delay(mut self, delay: Duration) -> Self {
        self.verify_delay = delay;
        self
    }

    pub(crate) fn verify_delay(&self) -> Duration {
        self.verify_delay
    }

    /// The appliance base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build a full URL for a web API endpoint: `{base}/webapi/{endpoint}`.
    pub(crate) fn webapi_url(&self, endpoint: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/webapi/{endpoint}"))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a candidate's request and return the decoded envelope.
    ///
    /// Used where a decodable envelope is mandatory (login, list). A
    /// non-JSON body here is a `Deserialization` error, not ambiguity.
    pub(crate) async fn request_envelope(
        &self,
        candidate: Candidate,
        extra: &[(&str, &str)],
    ) -> Result<Envelope, Error> {
        let body = self.send(candidate, extra).await?;
        serde_json::from_str(&body).map_err(|e| {
            let preview = preview(&body);
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body,
            }
        })
    }

    /// Send a candidate's request and classify the response.
    ///
    /// Transport-level failures surface as `Err`; an HTTP-success body
    /// that is not a decodable envelope classifies as `Ambiguous`.
    pub(crate) async fn attempt(
        &self,
        candidate: Candidate,
        extra: &[(&str, &str)],
    ) -> Result<OperationOutcome, Error> {
        let body = self.send(candidate, extra).await?;

        let Ok(envelope) = serde_json::from_str::<Envelope>(&body) else {
            debug!(
                api = candidate.api,
                method = candidate.method,
                "non-envelope response, classifying as ambiguous"
            );
            return Ok(OperationOutcome::Ambiguous);
        };

        if envelope.success {
            Ok(OperationOutcome::Success)
        } else {
            let code = envelope.error.map_or(-1, |e| e.code);
            Ok(OperationOutcome::Failure { code })
        }
    }

    /// Issue the request for one candidate, returning the raw body text.
    async fn send(&self, candidate: Candidate, extra: &[(&str, &str)]) -> Result<String, Error> {
        let url = self.webapi_url(candidate.endpoint)?;
        let version = api_version(candidate.api).to_string();

        let resp = match candidate.shape {
            RequestShape::Get => {
                debug!("GET {} api={} method={}", url, candidate.api, candidate.method);
                let mut params: Vec<(&str, &str)> = vec![
                    ("api", candidate.api),
                    ("method", candidate.method),
                    ("version", &version),
                ];
                params.extend_from_slice(extra);
                self.http.get(url).query(&params).send().await?
            }
            RequestShape::FormPost { quoting } => {
                debug!("POST {} api={} method={}", url, candidate.api, candidate.method);
                let body = form_body(candidate.api, candidate.method, &version, extra, quoting);
                self.http
                    .post(url)
                    .header(
                        reqwest::header::CONTENT_TYPE,
                        "application/x-www-form-urlencoded",
                    )
                    .body(body)
                    .send()
                    .await?
            }
        };

        let resp = resp.error_for_status()?;
        Ok(resp.text().await?)
    }
}

/// Truncate a body for error previews.
///
/// The cut must land on a char boundary: appliances answer with HTML
/// error pages that can carry multibyte text past the cutoff.
fn preview(body: &str) -> &str {
    let mut end = body.len().min(200);
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}

/// Assemble a form-encoded body by hand.
///
/// The quoted-id shape wraps the encoded `id` value in literal `%22`
/// sequences, which must reach the wire byte-for-byte -- running the
/// finished pair through a form serializer would re-encode the percent
/// signs. All other values are percent-encoded normally.
fn form_body(
    api: &str,
    method: &str,
    version: &str,
    extra: &[(&str, &str)],
    quoting: IdQuoting,
) -> String {
    let encode = |v: &str| -> String { url::form_urlencoded::byte_serialize(v.as_bytes()).collect() };

    let mut pairs: Vec<String> = vec![
        format!("api={}", encode(api)),
        format!("method={}", encode(method)),
        format!("version={version}"),
    ];
    for (key, value) in extra {
        let encoded = encode(value);
        if *key == "id" && quoting == IdQuoting::Quoted {
            pairs.push(format!("id=%22{encoded}%22"));
        } else {
            pairs.push(format!("{key}={encoded}"));
        }
    }
    pairs.join("&")
}
