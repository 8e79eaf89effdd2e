//! The request builder, dispatch pipeline, and result accessors.
//!
//! [`Client`] accumulates method, URL parts, query parameters, headers,
//! auth, cookies, and payload through a fluent chain, then [`Client::send`]
//! materializes and executes the wire request and resolves the response in
//! either enveloped or raw mode. Failures are captured into the client's
//! fault slot instead of being returned, so one structured record describes
//! the whole exchange.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};

use http::{header, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::codec::{Codec, JsonCodec};
use crate::error::{BoxError, ConfigError, Error, Fault, Phase};
use crate::params::ParamValue;
use crate::response::{Envelope, ResponseInfo};
use crate::segments;

/// Short timeout tier (also the slow-round-trip warning threshold).
pub const TIMEOUT_SHORT: Duration = Duration::from_secs(10);

/// Medium timeout tier, the default for [`Client::standard`].
pub const TIMEOUT_MEDIUM: Duration = Duration::from_secs(30);

/// Long timeout tier, the clamp ceiling.
pub const TIMEOUT_LONG: Duration = Duration::from_secs(60);

/// The conventional success code carried in response envelopes.
pub const OK_CODE: i64 = 0;

/// `Accept-Language` value for English.
pub const LOCALE_EN: &str = "en-US,en;q=0.9";

/// `Accept-Language` value for Chinese.
pub const LOCALE_ZH: &str = "zh-CN,zh;q=0.9";

/// JSON content type.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Form-encoded content type.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Plain-text content type.
pub const PLAIN_TEXT_TYPE: &str = "text/plain; charset=utf-8";

/// A `-` argument means "use the default" in URL part setters.
pub const PLACEHOLDER: &str = "-";

const DEFAULT_HOST: &str = "127.0.0.1:8080";
const SCHEME_HTTP: &str = "http";
const SCHEME_HTTPS: &str = "https";

const METHODS: [Method; 7] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::PATCH,
    Method::HEAD,
    Method::OPTIONS,
];

/// An interceptor running before dispatch or after the round trip.
///
/// The first hook returning an error aborts the pipeline and records a
/// transport fault; the remaining hooks do not run.
pub type Hook<T> = Box<dyn FnMut(&mut Client<T>) -> Result<(), BoxError> + Send>;

/// Response decoding mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// The whole body decodes into the `{code, msg, data}` envelope.
    #[default]
    Enveloped,
    /// The whole body decodes directly into the `data` slot.
    Raw,
}

impl Mode {
    /// Human-readable mode label.
    pub fn label(self) -> &'static str {
        match self {
            Mode::Enveloped => "enveloped",
            Mode::Raw => "raw",
        }
    }
}

/// A request cookie, sent through the `Cookie` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
}

impl Cookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Request authorization. Setting one variant wholly replaces the previous.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Auth {
    #[default]
    None,
    Basic { username: String, password: String },
    Bearer { token: String },
}

/// The header portion of builder state.
///
/// Scalars cover the common negotiation headers; `extra` is an open map
/// merged key-by-key, and `cookies` join into a single `Cookie` header.
/// Hooks reach this through [`Client::headers_mut`].
#[derive(Debug, Clone, Default)]
pub struct HeaderSet {
    pub accept: Option<String>,
    pub content_type: Option<String>,
    pub language: Option<String>,
    pub user_agent: Option<String>,
    pub cookies: Vec<Cookie>,
    pub extra: BTreeMap<String, String>,
}

impl HeaderSet {
    /// `true` when nothing has been set yet.
    pub fn is_empty(&self) -> bool {
        self.accept.is_none()
            && self.content_type.is_none()
            && self.language.is_none()
            && self.user_agent.is_none()
            && self.cookies.is_empty()
            && self.extra.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
struct UrlParts {
    scheme: String,
    host: String,
    base_path: String,
    endpoint: String,
}

#[derive(Debug, Clone)]
struct Meta {
    method: Method,
    url: Option<Url>,
    duration: Duration,
    received_at: Option<SystemTime>,
}

impl Default for Meta {
    fn default() -> Self {
        Self {
            method: Method::GET,
            url: None,
            duration: Duration::ZERO,
            received_at: None,
        }
    }
}

struct Config {
    timeout: Duration,
    skip_tls: bool,
    debug: bool,
    trim_slash: bool,
    mode: Mode,
    ok_code: i64,
    codec: Arc<dyn Codec>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timeout: TIMEOUT_MEDIUM,
            skip_tls: false,
            debug: false,
            trim_slash: false,
            mode: Mode::Enveloped,
            ok_code: OK_CODE,
            codec: Arc::new(JsonCodec),
        }
    }
}

/// A single-use HTTP request builder and its resolved outcome.
///
/// The client is consumed and returned by every chained call, finalized by
/// [`send`](Client::send), then inspected through accessors and discarded.
/// It is not meant to be shared or reused across requests.
///
/// # Examples
///
/// ```no_run
/// use herald::Client;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct User {
///     id: u64,
///     name: String,
/// }
///
/// # async fn example() -> Result<(), herald::ConfigError> {
/// let client = Client::<User>::standard()
///     .set_request("GET", "https://api.example.com/v1/users/:id", &["123"])?
///     .set_query_param("expand", "profile")
///     .set_bearer_auth("token-123")
///     .send()
///     .await;
///
/// if let Some(user) = client.data() {
///     println!("user {} is {}", user.id, user.name);
/// }
/// println!("{}", client.unwrap());
/// # Ok(())
/// # }
/// ```
pub struct Client<T> {
    meta: Meta,
    config: Config,
    urls: UrlParts,
    params: BTreeMap<String, String>,
    headers: HeaderSet,
    auth: Auth,
    payload: Option<Value>,
    payload_err: Option<String>,
    pre_hooks: Vec<Hook<T>>,
    post_hooks: Vec<Hook<T>>,
    fault: Option<Fault>,
    result: Option<Envelope<T>>,
    response: Option<ResponseInfo>,
}

impl<T> Default for Client<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Client<T> {
    /// Creates an empty client in enveloped mode.
    pub fn new() -> Self {
        Self {
            meta: Meta::default(),
            config: Config::default(),
            urls: UrlParts::default(),
            params: BTreeMap::new(),
            headers: HeaderSet::default(),
            auth: Auth::None,
            payload: None,
            payload_err: None,
            pre_hooks: Vec::new(),
            post_hooks: Vec::new(),
            fault: None,
            result: None,
            response: None,
        }
    }

    /// Creates an empty client in raw mode: the entire response body decodes
    /// directly into the payload type, no envelope assumed.
    pub fn raw() -> Self {
        let mut client = Self::new();
        client.config.mode = Mode::Raw;
        client
    }

    /// Creates a client preconfigured the way most callers want it: medium
    /// timeout plus a pre-hook that fills in `Accept`, `Content-Type`,
    /// `Accept-Language`, and `User-Agent` defaults when no header was set
    /// by the time the request dispatches.
    pub fn standard() -> Self
    where
        T: Send + 'static,
    {
        Self::new()
            .set_timeout(TIMEOUT_MEDIUM)
            .use_pre_hook(|c: &mut Client<T>| {
                if c.headers.is_empty() {
                    let headers = c.headers_mut();
                    headers.accept = Some(JSON_CONTENT_TYPE.to_string());
                    headers.content_type = Some(JSON_CONTENT_TYPE.to_string());
                    headers.language = Some(LOCALE_EN.to_string());
                    headers.user_agent = Some(default_user_agent());
                }
                Ok(())
            })
    }

    /// Applies an arbitrary configuration closure, for settings that do not
    /// warrant a dedicated setter.
    ///
    /// # Examples
    ///
    /// ```
    /// use herald::{Client, Mode};
    ///
    /// let client = Client::<()>::new().apply(|c| c.set_debug(true).toggle_mode());
    /// assert_eq!(client.mode(), Mode::Raw);
    /// ```
    pub fn apply(self, f: impl FnOnce(Self) -> Self) -> Self {
        f(self)
    }

    /*
        Configuration setters
    */

    /// Sets the round-trip timeout, clamped to
    /// [`TIMEOUT_SHORT`]..=[`TIMEOUT_LONG`].
    pub fn set_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout.clamp(TIMEOUT_SHORT, TIMEOUT_LONG);
        self
    }

    /// Skips TLS certificate verification. Off by default; only enable
    /// against endpoints you control.
    pub fn set_skip_tls(mut self, skip: bool) -> Self {
        self.config.skip_tls = skip;
        self
    }

    /// Enables extra debug logging (response bodies, hook registration).
    pub fn set_debug(mut self, debug: bool) -> Self {
        self.config.debug = debug;
        self
    }

    /// Flips between enveloped and raw decoding.
    pub fn toggle_mode(mut self) -> Self {
        self.config.mode = match self.config.mode {
            Mode::Enveloped => Mode::Raw,
            Mode::Raw => Mode::Enveloped,
        };
        self
    }

    /// Overrides the business success code (default 0).
    pub fn define_ok_code(mut self, code: i64) -> Self {
        self.config.ok_code = code;
        self
    }

    /// Trims trailing slashes from endpoints set after this call.
    pub fn filter_url_slash(mut self) -> Self {
        self.config.trim_slash = true;
        self
    }

    /// Registers a custom serialization backend.
    pub fn register_codec(mut self, codec: impl Codec + 'static) -> Self {
        self.config.codec = Arc::new(codec);
        self
    }

    /*
        Request setters
    */

    /// Sets the HTTP method. Input is uppercased and must be one of the
    /// seven supported verbs.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidMethod`] for anything outside the verb set.
    pub fn set_method(mut self, method: &str) -> Result<Self, ConfigError> {
        let upper = method.to_ascii_uppercase();
        let found = METHODS
            .iter()
            .find(|m| m.as_str() == upper)
            .ok_or_else(|| ConfigError::InvalidMethod(method.to_string()))?;
        self.meta.method = found.clone();
        Ok(self)
    }

    /// Sets all four URL parts at once. Pass `""` or `"-"` to take the
    /// default for any part (scheme `http`, host `127.0.0.1:8080`,
    /// endpoint `/`).
    ///
    /// # Errors
    ///
    /// Fails on an unsupported scheme or an implausible host.
    pub fn set_url(
        self,
        scheme: &str,
        host: &str,
        base_path: &str,
        endpoint: &str,
    ) -> Result<Self, ConfigError> {
        Ok(self
            .set_scheme(scheme)?
            .set_host(host)?
            .set_base_path(base_path)
            .set_endpoint(endpoint))
    }

    /// Sets the URL scheme; empty or `-` defaults to `http`.
    pub fn set_scheme(mut self, scheme: &str) -> Result<Self, ConfigError> {
        let scheme = if is_placeholder(scheme) {
            SCHEME_HTTP
        } else {
            scheme
        };
        if scheme != SCHEME_HTTP && scheme != SCHEME_HTTPS {
            return Err(ConfigError::InvalidScheme(scheme.to_string()));
        }
        self.urls.scheme = scheme.to_string();
        Ok(self)
    }

    /// Sets the host; empty or `-` defaults to `127.0.0.1:8080`.
    pub fn set_host(mut self, host: &str) -> Result<Self, ConfigError> {
        let host = if is_placeholder(host) {
            DEFAULT_HOST
        } else {
            host
        };
        if !is_valid_host(host) {
            return Err(ConfigError::InvalidHost(host.to_string()));
        }
        self.urls.host = host.trim_end_matches('/').to_string();
        Ok(self)
    }

    /// Sets the base path. Trailing `/` and `-` are trimmed.
    pub fn set_base_path(mut self, base_path: &str) -> Self {
        if is_placeholder(base_path) && self.config.debug {
            tracing::debug!("no base path set; minimal URLs are easier to reason about");
        }
        self.urls.base_path = base_path.trim_end_matches(['/', '-']).to_string();
        self
    }

    /// Sets the endpoint; empty or `-` defaults to the root path. Trailing
    /// slashes are trimmed only when slash filtering is on.
    pub fn set_endpoint(mut self, endpoint: &str) -> Self {
        if is_placeholder(endpoint) {
            if self.config.debug {
                tracing::debug!("no endpoint set; the root path / will be requested");
            }
            self.urls.endpoint = "/".to_string();
        } else if self.config.trim_slash {
            self.urls.endpoint = endpoint.trim_end_matches('/').to_string();
        } else {
            self.urls.endpoint = endpoint.to_string();
        }
        self
    }

    /// Presets the full request URL, bypassing part-by-part composition.
    /// Query parameters set on the client are still appended at dispatch.
    pub fn set_full_url(mut self, url: &str) -> Result<Self, ConfigError> {
        self.meta.url = Some(Url::parse(url)?);
        Ok(self)
    }

    /// Sets method and URL from a path template in one call, substituting
    /// up to two positional route values for the `:id` and `:sid`
    /// placeholders, in that order. Query parameters embedded in the path
    /// merge into the client (skipped for OPTIONS).
    ///
    /// # Examples
    ///
    /// ```
    /// use herald::Client;
    ///
    /// let client = Client::<()>::new()
    ///     .set_request("GET", "/users/:id", &["123"])
    ///     .unwrap();
    /// assert_eq!(client.method(), &http::Method::GET);
    /// ```
    ///
    /// # Errors
    ///
    /// Fails on an invalid method, a malformed path, or more than two
    /// route values.
    pub fn set_request(
        self,
        method: &str,
        path: &str,
        route_values: &[&str],
    ) -> Result<Self, ConfigError> {
        let substituted = match route_values {
            [] => path.to_string(),
            [id] => path.replacen(":id", id, 1),
            [id, sid] => path.replacen(":id", id, 1).replacen(":sid", sid, 1),
            _ => return Err(ConfigError::TooManyRouteValues),
        };

        let seg = segments::parse(&substituted)?;
        let mut client = self.set_method(method)?.set_url(
            &seg.scheme,
            &seg.host,
            &seg.base_path,
            &seg.endpoint,
        )?;

        if client.meta.method != Method::OPTIONS && !seg.params.is_empty() {
            client.merge_params(seg.params);
        }

        Ok(client)
    }

    /// Sets one query parameter; a repeated key overwrites only that key.
    pub fn set_query_param(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.insert(key.into(), value.into().coerce());
        self
    }

    /// Bulk-sets query parameters. When no parameters exist yet the mapping
    /// replaces wholesale; otherwise it merges key-by-key.
    pub fn set_query_params<K, V, I>(mut self, params: I) -> Self
    where
        K: Into<String>,
        V: Into<ParamValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        self.merge_params(crate::params::coerce_table(params));
        self
    }

    /// Sets one extra header.
    pub fn set_header(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.headers.extra.insert(key.into(), value.into().coerce());
        self
    }

    /// Bulk-sets extra headers with the same merge law as query parameters.
    pub fn set_headers<K, V, I>(mut self, headers: I) -> Self
    where
        K: Into<String>,
        V: Into<ParamValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        let coerced = crate::params::coerce_table(headers);
        if self.headers.extra.is_empty() {
            self.headers.extra = coerced;
        } else {
            self.headers.extra.extend(coerced);
        }
        self
    }

    /// Appends a cookie.
    pub fn set_cookie(mut self, cookie: Cookie) -> Self {
        self.headers.cookies.push(cookie);
        self
    }

    /// Replaces the cookie list.
    pub fn set_cookies(mut self, cookies: Vec<Cookie>) -> Self {
        self.headers.cookies = cookies;
        self
    }

    /// Uses Basic authentication, replacing any previous authorization.
    pub fn set_basic_auth(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.auth = Auth::Basic {
            username: username.into(),
            password: password.into(),
        };
        self
    }

    /// Uses Bearer authentication, replacing any previous authorization.
    pub fn set_bearer_auth(mut self, token: impl Into<String>) -> Self {
        self.auth = Auth::Bearer {
            token: token.into(),
        };
        self
    }

    /// Sets the `Accept` header.
    pub fn set_accept(mut self, accept: impl Into<String>) -> Self {
        self.headers.accept = Some(accept.into());
        self
    }

    /// Sets the `Content-Type` header.
    pub fn set_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.headers.content_type = Some(content_type.into());
        self
    }

    /// Sets the `Content-Language` header.
    pub fn set_language(mut self, language: impl Into<String>) -> Self {
        self.headers.language = Some(language.into());
        self
    }

    /// Sets the `User-Agent` header.
    pub fn set_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.headers.user_agent = Some(user_agent.into());
        self
    }

    /// Sets the request payload from any serializable value. A capture
    /// failure is deferred and surfaces as a transport fault at dispatch.
    /// GET and OPTIONS requests should not carry a payload; the shorthand
    /// layer enforces that exclusion.
    pub fn set_payload<P: Serialize>(mut self, data: &P) -> Self {
        match serde_json::to_value(data) {
            Ok(value) => {
                self.payload = Some(value);
                self.payload_err = None;
            }
            Err(e) => {
                self.payload = None;
                self.payload_err = Some(e.to_string());
            }
        }
        self
    }

    /// Sets the request payload from a prebuilt JSON value
    /// (pairs well with `serde_json::json!`).
    pub fn set_json_payload(mut self, data: Value) -> Self {
        self.payload = Some(data);
        self.payload_err = None;
        self
    }

    /*
        Hook registration
    */

    /// Appends a pre-send interceptor. Pre-hooks run in registration order
    /// before the wire request is materialized, and may mutate the client —
    /// the supported way to inject late-bound configuration such as a
    /// computed signature header.
    pub fn use_pre_hook<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&mut Client<T>) -> Result<(), BoxError> + Send + 'static,
    {
        if self.config.debug {
            tracing::debug!("registering pre-hook");
        }
        self.pre_hooks.push(Box::new(hook));
        self
    }

    /// Appends a post-receive interceptor. Post-hooks run in registration
    /// order after the round trip and before the body is read, so they see
    /// response status/headers but never decoded content.
    pub fn use_post_hook<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&mut Client<T>) -> Result<(), BoxError> + Send + 'static,
    {
        if self.config.debug {
            tracing::debug!("registering post-hook");
        }
        self.post_hooks.push(Box::new(hook));
        self
    }

    /*
        State getters (echo accumulated configuration)
    */

    /// One query parameter's coerced value.
    pub fn query(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// All accumulated query parameters.
    pub fn query_params(&self) -> &BTreeMap<String, String> {
        &self.params
    }

    /// One extra header's value.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.extra.get(key).map(String::as_str)
    }

    /// The accumulated header set.
    pub fn headers(&self) -> &HeaderSet {
        &self.headers
    }

    /// Mutable header access, mainly for hooks.
    pub fn headers_mut(&mut self) -> &mut HeaderSet {
        &mut self.headers
    }

    /// Mutable query-parameter access, mainly for hooks.
    pub fn params_mut(&mut self) -> &mut BTreeMap<String, String> {
        &mut self.params
    }

    /// The current authorization.
    pub fn auth(&self) -> &Auth {
        &self.auth
    }

    /// Mutable authorization access, mainly for hooks.
    pub fn auth_mut(&mut self) -> &mut Auth {
        &mut self.auth
    }

    /// The request method.
    pub fn method(&self) -> &Method {
        &self.meta.method
    }

    /// The resolved request URL (set once dispatch has composed it, or
    /// earlier via [`set_full_url`](Client::set_full_url)).
    pub fn url(&self) -> Option<&Url> {
        self.meta.url.as_ref()
    }

    /// The response decoding mode.
    pub fn mode(&self) -> Mode {
        self.config.mode
    }

    /// The configured business success code.
    pub fn ok_code(&self) -> i64 {
        self.config.ok_code
    }

    fn merge_params(&mut self, coerced: BTreeMap<String, String>) {
        if self.params.is_empty() {
            self.params = coerced;
        } else {
            self.params.extend(coerced);
        }
    }
}

impl<T: DeserializeOwned> Client<T> {
    /// Sends the request: pre-hooks, materialization, the timed round trip,
    /// post-hooks, body read, mode-dependent decode, and business-failure
    /// classification, strictly in that order with no retries.
    ///
    /// The returned client carries either no fault, one transport fault, or
    /// one business fault; decoded data (when the decode succeeded) stays
    /// accessible either way.
    pub async fn send(mut self) -> Self {
        if self.run_hooks(HookStage::Pre) {
            return self;
        }

        let (http, request) = match self.materialize() {
            Ok(pair) => pair,
            Err(e) => {
                self.fault = Some(Fault::transport(Phase::Materialize, e));
                return self;
            }
        };

        tracing::debug!(
            method = %self.meta.method,
            url = %request.url(),
            timeout_secs = self.config.timeout.as_secs(),
            "dispatching request"
        );

        let started = Instant::now();
        let outcome = http.execute(request).await;
        let duration = started.elapsed();
        self.meta.duration = duration;
        self.meta.received_at = Some(SystemTime::now());

        let response = match outcome {
            Ok(r) => r,
            Err(e) => {
                let err = if e.is_timeout() {
                    Error::Timeout
                } else {
                    Error::Network(e)
                };
                self.fault = Some(Fault::transport(Phase::Execute, err));
                return self;
            }
        };

        let status = response.status();
        if duration > TIMEOUT_SHORT {
            tracing::warn!(
                status = status.as_u16(),
                latency_ms = duration.as_millis() as u64,
                "slow round trip"
            );
        } else {
            tracing::info!(
                status = status.as_u16(),
                latency_ms = duration.as_millis() as u64,
                "received response"
            );
        }

        self.response = Some(ResponseInfo::new(
            status,
            response.version(),
            response.headers().clone(),
        ));

        // Post-hooks observe status/headers only; the body is still unread.
        if self.run_hooks(HookStage::Post) {
            return self;
        }

        let text = match response.text().await {
            Ok(t) => t,
            Err(e) => {
                self.fault = Some(Fault::transport(Phase::ReadBody, Error::Network(e)));
                return self;
            }
        };
        if let Some(info) = self.response.as_mut() {
            info.raw = Some(text.clone());
        }
        if text.is_empty() {
            self.fault = Some(Fault::transport(Phase::ReadBody, Error::EmptyBody));
            return self;
        }

        if self.config.debug {
            tracing::debug!(body = %text, "response body");
        }

        match self.decode_body(&text, status) {
            Ok(envelope) => self.result = Some(envelope),
            Err(e) => {
                tracing::error!(error = %e, "failed to decode response");
                self.fault = Some(Fault::transport(Phase::Decode, e));
                return self;
            }
        }

        // Non-success status after a successful decode is a business
        // failure; the decoded data remains available to the caller.
        if status != StatusCode::OK {
            let reason = self
                .result
                .as_ref()
                .map(|r| r.msg.clone())
                .unwrap_or_default();
            self.fault = Some(Fault::business(reason));
        }

        self
    }

    /// Runs one hook stage; returns `true` when a hook aborted the pipeline.
    fn run_hooks(&mut self, stage: HookStage) -> bool {
        let mut hooks = match stage {
            HookStage::Pre => std::mem::take(&mut self.pre_hooks),
            HookStage::Post => std::mem::take(&mut self.post_hooks),
        };
        let mut aborted = false;
        for hook in hooks.iter_mut() {
            if let Err(e) = hook(self) {
                let phase = match stage {
                    HookStage::Pre => Phase::PreHook,
                    HookStage::Post => Phase::PostHook,
                };
                self.fault = Some(Fault::transport(phase, Error::Hook(e)));
                aborted = true;
                break;
            }
        }
        match stage {
            HookStage::Pre => self.pre_hooks = hooks,
            HookStage::Post => self.post_hooks = hooks,
        }
        aborted
    }

    /// Materializes builder state into an immutable wire request.
    fn materialize(&mut self) -> Result<(reqwest::Client, reqwest::Request), Error> {
        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(self.config.skip_tls)
            .build()?;

        let url = self.full_url()?;
        self.meta.url = Some(url.clone());

        let mut builder = http
            .request(self.meta.method.clone(), url)
            .timeout(self.config.timeout);

        for (key, value) in &self.headers.extra {
            builder = builder.header(key, value);
        }
        if let Some(ua) = &self.headers.user_agent {
            builder = builder.header(header::USER_AGENT, ua);
        }
        if let Some(accept) = &self.headers.accept {
            builder = builder.header(header::ACCEPT, accept);
        }
        if let Some(ct) = &self.headers.content_type {
            builder = builder.header(header::CONTENT_TYPE, ct);
        }
        if let Some(lang) = &self.headers.language {
            builder = builder.header(header::CONTENT_LANGUAGE, lang);
        }

        match &self.auth {
            Auth::None => {}
            Auth::Basic { username, password } => {
                builder = builder.basic_auth(username, Some(password));
            }
            Auth::Bearer { token } => {
                builder = builder.bearer_auth(token);
            }
        }

        if !self.headers.cookies.is_empty() {
            let jar = self
                .headers
                .cookies
                .iter()
                .map(|c| format!("{}={}", c.name, c.value))
                .collect::<Vec<_>>()
                .join("; ");
            builder = builder.header(header::COOKIE, jar);
        }

        if let Some(detail) = &self.payload_err {
            return Err(Error::Encode(detail.clone()));
        }
        if let Some(value) = &self.payload {
            let bytes = self
                .config
                .codec
                .marshal(value)
                .map_err(|e| Error::Encode(e.to_string()))?;
            builder = builder.body(bytes);
        }

        // Invalid header names or values surface here.
        let request = builder.build()?;
        Ok((http, request))
    }

    /// Composes the full URL from the preset URL or the accumulated parts,
    /// then appends any query parameters.
    fn full_url(&self) -> Result<Url, Error> {
        let mut url = match &self.meta.url {
            Some(preset) => preset.clone(),
            None => {
                let scheme = if self.urls.scheme.is_empty() {
                    SCHEME_HTTP
                } else {
                    &self.urls.scheme
                };
                let host = if self.urls.host.is_empty() {
                    DEFAULT_HOST
                } else {
                    &self.urls.host
                };
                let base = if self.urls.base_path == "/" {
                    ""
                } else {
                    &self.urls.base_path
                };
                let endpoint = &self.urls.endpoint;
                Url::parse(&format!("{scheme}://{host}{base}{endpoint}"))?
            }
        };
        if !self.params.is_empty() {
            url.query_pairs_mut().extend_pairs(self.params.iter());
        }
        Ok(url)
    }

    fn decode_body(&self, text: &str, status: StatusCode) -> Result<Envelope<T>, Error> {
        let decode_err = |detail: String| Error::Decode {
            raw: text.to_string(),
            detail,
            status,
        };
        let value = self
            .config
            .codec
            .unmarshal(text.as_bytes())
            .map_err(|e| decode_err(e.to_string()))?;
        match self.config.mode {
            Mode::Enveloped => {
                serde_json::from_value::<Envelope<T>>(value).map_err(|e| decode_err(e.to_string()))
            }
            Mode::Raw => serde_json::from_value::<T>(value)
                .map(|data| Envelope {
                    code: 0,
                    msg: String::new(),
                    data,
                })
                .map_err(|e| decode_err(e.to_string())),
        }
    }

    /// Re-decodes the raw response body into another type through the codec.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyBody`] when no body was read, or [`Error::Decode`] when
    /// the body does not fit the target shape.
    pub fn decode_as<U: DeserializeOwned>(&self) -> Result<U, Error> {
        let raw = self
            .raw_body()
            .filter(|t| !t.is_empty())
            .ok_or(Error::EmptyBody)?;
        let status = self
            .response
            .as_ref()
            .map(|r| r.status)
            .unwrap_or(StatusCode::OK);
        let value = self
            .config
            .codec
            .unmarshal(raw.as_bytes())
            .map_err(|e| Error::Decode {
                raw: raw.to_string(),
                detail: e.to_string(),
                status,
            })?;
        serde_json::from_value(value).map_err(|e| Error::Decode {
            raw: raw.to_string(),
            detail: e.to_string(),
            status,
        })
    }
}

enum HookStage {
    Pre,
    Post,
}

impl<T> Client<T> {
    /*
        Outcome accessors
    */

    /// The decoded payload, when decoding succeeded.
    pub fn data(&self) -> Option<&T> {
        self.result.as_ref().map(|r| &r.data)
    }

    /// Consumes the client, yielding the decoded payload.
    pub fn into_data(self) -> Option<T> {
        self.result.map(|r| r.data)
    }

    /// The decoded envelope.
    pub fn result(&self) -> Option<&Envelope<T>> {
        self.result.as_ref()
    }

    /// The captured fault, if any.
    pub fn fault(&self) -> Option<&Fault> {
        self.fault.as_ref()
    }

    /// Wire-level response details.
    pub fn response(&self) -> Option<&ResponseInfo> {
        self.response.as_ref()
    }

    /// The raw response body, once read.
    pub fn raw_body(&self) -> Option<&str> {
        self.response.as_ref().and_then(|r| r.raw_body())
    }

    /// `true` when `send` completed without any fault.
    pub fn is_ok(&self) -> bool {
        self.fault.is_none()
    }

    /// Resolves the outcome the loud way.
    ///
    /// A business fault returns a formatted diagnostic (method, URL, status,
    /// business code, reason, timestamp) without raising — the recoverable
    /// path. No fault returns an empty string.
    ///
    /// # Panics
    ///
    /// Panics on a transport-class fault: the pipeline itself could not
    /// complete trustworthily, which indicates programmer or environment
    /// error rather than a per-request condition.
    pub fn unwrap(&self) -> String {
        match &self.fault {
            Some(fault @ Fault::Transport { .. }) => panic!("{fault}"),
            Some(fault @ Fault::Business { reason, .. }) => {
                let status = self
                    .response
                    .as_ref()
                    .map(|r| r.status.as_u16())
                    .unwrap_or(0);
                let code = self.result.as_ref().map(|r| r.code).unwrap_or(0);
                let (method, url) = self.method_url();
                format!(
                    r#"HTTP request method: [{method}], url: "{url}", status: {status}, business code: {code}, reason: "{reason}", occurred at: {ts}"#,
                    ts = fault.occurred_at_unix()
                )
            }
            None => String::new(),
        }
    }

    /// The request method and resolved URL.
    pub fn method_url(&self) -> (Method, String) {
        (
            self.meta.method.clone(),
            self.meta
                .url
                .as_ref()
                .map(Url::to_string)
                .unwrap_or_default(),
        )
    }

    /// An estimated queries-per-second figure: the reciprocal of the single
    /// measured duration. This is an approximation, not a throughput
    /// metric, and is infinite when the duration is near zero.
    pub fn qps(&self) -> f64 {
        let qps = 1.0 / self.meta.duration.as_secs_f64();
        if self.config.debug {
            tracing::debug!(qps, "approximate queries per second");
        }
        qps
    }

    /// The measured round-trip duration and response-received timestamp.
    pub fn elapsed(&self) -> (Duration, Option<SystemTime>) {
        (self.meta.duration, self.meta.received_at)
    }

    /// Rounded QPS plus the round-trip duration in nanoseconds.
    pub fn benchmark(&self) -> (u64, u128) {
        (self.qps().round() as u64, self.meta.duration.as_nanos())
    }

    /// The response protocol label (e.g. `HTTP/1.1`).
    pub fn proto(&self) -> Option<&'static str> {
        self.response.as_ref().map(ResponseInfo::proto)
    }

    /// The transport status code and business return code pair.
    pub fn status_codes(&self) -> (Option<StatusCode>, i64) {
        (
            self.response.as_ref().map(|r| r.status),
            self.result.as_ref().map(|r| r.code).unwrap_or(0),
        )
    }

    /// The transport status text and envelope message pair.
    pub fn messages(&self) -> (String, String) {
        let status_text = self
            .response
            .as_ref()
            .and_then(|r| r.status.canonical_reason())
            .unwrap_or_default()
            .to_string();
        let msg = self
            .result
            .as_ref()
            .map(|r| r.msg.clone())
            .unwrap_or_default();
        (status_text, msg)
    }

    /// The response-mode label (`enveloped` or `raw`).
    pub fn mode_label(&self) -> &'static str {
        self.config.mode.label()
    }

    /// Emits a structured summary of the whole exchange, fault-aware.
    pub fn report(&self) {
        let (method, url) = self.method_url();
        match &self.fault {
            Some(Fault::Transport {
                phase, source, ..
            }) => {
                tracing::error!(
                    method = %method,
                    url = %url,
                    phase = %phase,
                    error = %source,
                    "api call failed"
                );
            }
            Some(Fault::Business { reason, .. }) => {
                let (status, code) = self.status_codes();
                tracing::warn!(
                    method = %method,
                    url = %url,
                    status = status.map(|s| s.as_u16()).unwrap_or(0),
                    code,
                    reason = %reason,
                    "api call reported a business failure"
                );
            }
            None => {
                let (status, code) = self.status_codes();
                let (status_text, msg) = self.messages();
                tracing::info!(
                    mode = self.mode_label(),
                    method = %method,
                    url = %url,
                    status = status.map(|s| s.as_u16()).unwrap_or(0),
                    status_text = %status_text,
                    code,
                    msg = %msg,
                    proto = self.proto().unwrap_or("HTTP/?"),
                    qps = self.qps(),
                    duration_ms = self.meta.duration.as_millis() as u64,
                    "api call insights"
                );
            }
        }
    }
}

#[cfg(test)]
impl<T> Client<T> {
    pub(crate) fn test_resolve(&mut self, envelope: Envelope<T>) {
        self.result = Some(envelope);
    }

    pub(crate) fn test_fault(&mut self, fault: Fault) {
        self.fault = Some(fault);
    }
}

/// The default `User-Agent`: crate name, version, OS, and architecture.
pub fn default_user_agent() -> String {
    format!(
        "{}/{} ({} {})",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}

fn is_placeholder(s: &str) -> bool {
    s.is_empty() || s == PLACEHOLDER
}

/// A conservative plausibility check: the candidate must parse as the host
/// of a URL with nothing besides an optional port attached.
fn is_valid_host(host: &str) -> bool {
    if host.is_empty()
        || host
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '/' | '?' | '#' | '@' | '\\'))
    {
        return false;
    }
    match Url::parse(&format!("http://{host}")) {
        Ok(probe) => {
            probe.host_str().is_some()
                && probe.path() == "/"
                && probe.query().is_none()
                && probe.fragment().is_none()
                && probe.username().is_empty()
        }
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParamValue;

    type Plain = Client<serde_json::Value>;

    #[test]
    fn set_method_uppercases_and_validates() {
        for verb in ["get", "POST", "Put", "delete", "PATCH", "head", "options"] {
            let client = Plain::new().set_method(verb).unwrap();
            assert_eq!(client.method().as_str(), verb.to_ascii_uppercase());
        }
        assert!(Plain::new().set_method("FETCH").is_err());
        assert!(Plain::new().set_method("").is_err());
    }

    #[test]
    fn scheme_defaults_and_validation() {
        let client = Plain::new().set_scheme("").unwrap();
        assert_eq!(client.urls.scheme, "http");
        let client = Plain::new().set_scheme("-").unwrap();
        assert_eq!(client.urls.scheme, "http");
        let client = Plain::new().set_scheme("https").unwrap();
        assert_eq!(client.urls.scheme, "https");
        assert!(Plain::new().set_scheme("ftp").is_err());
    }

    #[test]
    fn host_defaults_and_validation() {
        let client = Plain::new().set_host("").unwrap();
        assert_eq!(client.urls.host, "127.0.0.1:8080");
        let client = Plain::new().set_host("example.com").unwrap();
        assert_eq!(client.urls.host, "example.com");
        let client = Plain::new().set_host("localhost:3000").unwrap();
        assert_eq!(client.urls.host, "localhost:3000");

        assert!(Plain::new().set_host("exa mple.com").is_err());
        assert!(Plain::new().set_host("example.com/path").is_err());
        assert!(Plain::new().set_host("user@example.com").is_err());
        assert!(Plain::new().set_host("example.com:99999").is_err());
    }

    #[test]
    fn endpoint_trailing_slash_respects_filter_flag() {
        let kept = Plain::new().set_endpoint("/users/");
        assert_eq!(kept.urls.endpoint, "/users/");

        let trimmed = Plain::new().filter_url_slash().set_endpoint("/users/");
        assert_eq!(trimmed.urls.endpoint, "/users");
    }

    #[test]
    fn query_param_merge_laws() {
        // Merge adds distinct keys, overwrites matching ones.
        let client = Plain::new()
            .set_query_params([("a", ParamValue::from(1))])
            .set_query_params([("b", ParamValue::from(2))]);
        assert_eq!(client.query("a"), Some("1"));
        assert_eq!(client.query("b"), Some("2"));

        let client = Plain::new()
            .set_query_params([("a", ParamValue::from(1))])
            .set_query_params([("a", ParamValue::from(2))]);
        assert_eq!(client.query("a"), Some("2"));
        assert_eq!(client.query_params().len(), 1);
    }

    #[test]
    fn bulk_setters_are_idempotent() {
        let once = Plain::new().set_headers([("X-A", ParamValue::from("1"))]);
        let twice = Plain::new()
            .set_headers([("X-A", ParamValue::from("1"))])
            .set_headers([("X-A", ParamValue::from("1"))]);
        assert_eq!(once.headers().extra, twice.headers().extra);
    }

    #[test]
    fn heterogeneous_values_coerce_on_the_way_in() {
        let client = Plain::new()
            .set_query_param("page", 3)
            .set_query_param("ratio", 0.5)
            .set_query_param("active", true)
            .set_query_param("tags", vec!["x", "y"]);
        assert_eq!(client.query("page"), Some("3"));
        assert_eq!(client.query("ratio"), Some("0.5"));
        assert_eq!(client.query("active"), Some("true"));
        assert_eq!(client.query("tags"), Some("x,y"));
    }

    #[test]
    fn auth_setters_replace_wholesale() {
        let client = Plain::new()
            .set_basic_auth("user", "pass")
            .set_bearer_auth("token-1");
        assert_eq!(
            client.auth(),
            &Auth::Bearer {
                token: "token-1".to_string()
            }
        );

        let client = Plain::new()
            .set_bearer_auth("token-1")
            .set_basic_auth("user", "pass");
        assert!(matches!(client.auth(), Auth::Basic { .. }));
    }

    #[test]
    fn set_request_substitutes_route_values() {
        let client = Plain::new()
            .set_request("get", "/users/:id", &["123"])
            .unwrap();
        assert_eq!(client.method(), &Method::GET);
        assert_eq!(client.urls.base_path, "/users");
        assert_eq!(client.urls.endpoint, "/123");

        let client = Plain::new()
            .set_request("POST", "/users/:id/:sid", &["123", "456"])
            .unwrap();
        assert_eq!(client.urls.base_path, "/users");
        assert_eq!(client.urls.endpoint, "/123/456");

        let err = Plain::new().set_request("GET", "/a/:id", &["1", "2", "3"]);
        assert!(matches!(err, Err(ConfigError::TooManyRouteValues)));
    }

    #[test]
    fn set_request_merges_path_query_params() {
        let client = Plain::new()
            .set_request("GET", "/search?q=rust&limit=5", &[])
            .unwrap();
        assert_eq!(client.query("q"), Some("rust"));
        assert_eq!(client.query("limit"), Some("5"));

        // OPTIONS requests skip the query merge.
        let client = Plain::new()
            .set_request("OPTIONS", "/search?q=rust", &[])
            .unwrap();
        assert!(client.query_params().is_empty());
    }

    #[test]
    fn full_url_composes_parts_and_params() {
        let client = Plain::new()
            .set_url("https", "example.com", "/api", "/users")
            .unwrap()
            .set_query_param("page", 2);
        let url = client.full_url().unwrap();
        assert_eq!(url.as_str(), "https://example.com/api/users?page=2");
    }

    #[test]
    fn full_url_defaults_when_unset() {
        let client = Plain::new().set_url("", "", "", "/ping").unwrap();
        let url = client.full_url().unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/ping");
    }

    #[test]
    fn root_base_path_is_elided() {
        let client = Plain::new()
            .set_url("http", "example.com", "/", "/users")
            .unwrap();
        let url = client.full_url().unwrap();
        assert_eq!(url.as_str(), "http://example.com/users");
    }

    #[test]
    fn preset_url_short_circuits_parts_but_appends_params() {
        let client = Plain::new()
            .set_full_url("https://preset.example.com/fixed")
            .unwrap()
            .set_url("http", "ignored.example.com", "/x", "/y")
            .unwrap()
            .set_query_param("k", "v");
        let url = client.full_url().unwrap();
        assert_eq!(url.as_str(), "https://preset.example.com/fixed?k=v");
    }

    #[test]
    fn timeout_is_clamped_to_tiers() {
        let low = Plain::new().set_timeout(Duration::from_secs(1));
        assert_eq!(low.config.timeout, TIMEOUT_SHORT);
        let high = Plain::new().set_timeout(Duration::from_secs(600));
        assert_eq!(high.config.timeout, TIMEOUT_LONG);
        let mid = Plain::new().set_timeout(Duration::from_secs(45));
        assert_eq!(mid.config.timeout, Duration::from_secs(45));
    }

    #[test]
    fn qps_and_benchmark_derive_from_duration() {
        let mut client = Plain::new();
        client.meta.duration = Duration::from_millis(250);
        assert!((client.qps() - 4.0).abs() < f64::EPSILON);
        let (rounded, nanos) = client.benchmark();
        assert_eq!(rounded, 4);
        assert_eq!(nanos, 250_000_000);
    }

    #[test]
    fn unwrap_is_quiet_without_fault_and_formats_business_faults() {
        let client = Plain::new();
        assert_eq!(client.unwrap(), "");

        let mut client = Plain::new();
        client.fault = Some(Fault::business("record not found"));
        client.result = Some(Envelope {
            code: 40400,
            msg: "record not found".to_string(),
            data: serde_json::Value::Null,
        });
        let diagnostic = client.unwrap();
        assert!(diagnostic.contains("record not found"), "{diagnostic}");
        assert!(diagnostic.contains("40400"), "{diagnostic}");
    }

    #[test]
    #[should_panic(expected = "transport fault")]
    fn unwrap_panics_on_transport_fault() {
        let mut client = Plain::new();
        client.fault = Some(Fault::transport(Phase::Execute, Error::EmptyBody));
        let _ = client.unwrap();
    }

    #[test]
    fn toggle_mode_flips_decoding() {
        let client = Plain::new();
        assert_eq!(client.mode(), Mode::Enveloped);
        let client = client.toggle_mode();
        assert_eq!(client.mode(), Mode::Raw);
        assert_eq!(client.mode_label(), "raw");
    }

    #[test]
    fn default_user_agent_names_the_crate() {
        let ua = default_user_agent();
        assert!(ua.starts_with("herald/"), "{ua}");
    }
}
