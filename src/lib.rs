//! # Herald - a convenience layer for calling JSON HTTP APIs
//!
//! Herald wraps `reqwest` in a fluent, single-use request builder aimed at
//! the common REST shape: compose a request from small parts, send it, and
//! decode the body either raw or as a `{code, msg, data}` envelope into a
//! type you declare. One structured outcome per exchange — decoded data,
//! wire details, and at most one fault — instead of a nest of `Result`s.
//!
//! ## Quick Start
//!
//! ```no_run
//! use herald::Client;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct User {
//!     id: u64,
//!     name: String,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), herald::ConfigError> {
//!     let client = Client::<Vec<User>>::standard()
//!         .set_request("GET", "https://api.example.com/v1/users", &[])?
//!         .set_query_param("page", 1)
//!         .set_bearer_auth("secret-token")
//!         .send()
//!         .await;
//!
//!     if let Some(users) = client.data() {
//!         println!("fetched {} users", users.len());
//!     }
//!     // Panics on a transport fault, formats a diagnostic on a business
//!     // failure, stays empty on success.
//!     println!("{}", client.unwrap());
//!     Ok(())
//! }
//! ```
//!
//! ## Request styles
//!
//! Three surfaces share one execution path:
//!
//! - the fluent builder above, for full control;
//! - [`shorthand`] verb functions for one-liners:
//!
//! ```no_run
//! # async fn example() -> Result<(), herald::ConfigError> {
//! use herald::{shorthand, Table};
//!
//! let client = shorthand::get::<serde_json::Value>(
//!     "https://api.example.com/v1/users?page=1",
//!     Table::new(),
//! )
//! .await?;
//! # Ok(())
//! # }
//! ```
//!
//! - the callback chain, when promise style reads better:
//!
//! ```no_run
//! # async fn example() -> Result<(), herald::ConfigError> {
//! # use herald::{shorthand, Table};
//! shorthand::get::<serde_json::Value>("https://api.example.com/v1/users", Table::new())
//!     .await?
//!     .then(|data| println!("{data}"))
//!     .catch(|fault| eprintln!("{fault}"))
//!     .finally(|client| client.report());
//! # Ok(())
//! # }
//! ```
//!
//! ## Faults instead of early returns
//!
//! `send` never returns an error. Runtime failures are captured into the
//! client as a [`Fault`]: transport-class when the pipeline itself broke
//! (network, timeout, hook abort, undecodable body), business-class when the
//! wire exchange succeeded but the server answered a non-success status. A
//! business failure keeps its decoded envelope, so error payloads remain
//! fully typed:
//!
//! ```no_run
//! # async fn example() -> Result<(), herald::ConfigError> {
//! # use herald::{shorthand, Table};
//! let client = shorthand::get::<serde_json::Value>(
//!     "https://api.example.com/v1/users/404",
//!     Table::new(),
//! )
//! .await?;
//!
//! if let Some(fault) = client.fault() {
//!     if fault.is_business() {
//!         let (status, code) = client.status_codes();
//!         eprintln!("server said no: {status:?} / {code}");
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Hooks
//!
//! Pre-hooks run before the wire request is materialized and may mutate the
//! client, which makes them the place for late-bound configuration such as
//! computed signature headers. Post-hooks run after the round trip, before
//! the body is read. The first hook error aborts the pipeline:
//!
//! ```no_run
//! use herald::Client;
//!
//! # async fn example() -> Result<(), herald::ConfigError> {
//! let client = Client::<serde_json::Value>::standard()
//!     .set_request("GET", "https://api.example.com/v1/me", &[])?
//!     .use_pre_hook(|c| {
//!         let stamp = format!("{:?}", std::time::SystemTime::now());
//!         c.headers_mut().extra.insert("X-Request-At".to_string(), stamp);
//!         Ok(())
//!     })
//!     .send()
//!     .await;
//! # Ok(())
//! # }
//! ```

mod callback;
mod client;
mod error;
mod response;

pub mod codec;
pub mod params;
pub mod segments;
pub mod shorthand;

pub use client::{
    default_user_agent, Auth, Client, Cookie, HeaderSet, Hook, Mode, FORM_CONTENT_TYPE,
    JSON_CONTENT_TYPE, LOCALE_EN, LOCALE_ZH, OK_CODE, PLACEHOLDER, PLAIN_TEXT_TYPE, TIMEOUT_LONG,
    TIMEOUT_MEDIUM, TIMEOUT_SHORT,
};
pub use codec::{Codec, JsonCodec, PrettyJsonCodec};
pub use error::{BoxError, ConfigError, Error, Fault, Phase};
pub use params::{ParamValue, Table};
pub use response::{Envelope, ResponseInfo};
