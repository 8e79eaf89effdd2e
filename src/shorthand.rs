//! Free-function request style, one call per verb.
//!
//! Each function builds a [`Client::standard`] instance, applies the verb's
//! argument shape, and awaits the exchange, returning the resolved client.
//! Query parameters embedded in the path take precedence: when the path
//! carries its own query string, the argument map is ignored outright.
//!
//! For header control beyond the defaults, use [`request`] directly or fall
//! back to the fluent builder.

use http::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::client::Client;
use crate::error::ConfigError;
use crate::params::Table;
use crate::segments;

/// The generic orchestrator behind the verb functions.
///
/// Validates the verb, decomposes the path, and builds a standard client.
/// Parameters never apply to OPTIONS; the payload never applies to GET or
/// OPTIONS; headers merge in when non-empty.
///
/// # Errors
///
/// Fatal configuration mistakes (unknown verb, malformed path) propagate as
/// [`ConfigError`]. Runtime failures never do; they land in the returned
/// client's fault slot.
pub async fn request<T, B>(
    method: &str,
    path: &str,
    params: Table,
    body: Option<&B>,
    headers: Table,
) -> Result<Client<T>, ConfigError>
where
    T: DeserializeOwned + Send + 'static,
    B: Serialize,
{
    let seg = segments::parse(path)?;

    let mut client = Client::<T>::standard().set_method(method)?.set_url(
        &seg.scheme,
        &seg.host,
        &seg.base_path,
        &seg.endpoint,
    )?;

    if client.method() != &Method::OPTIONS {
        if seg.params.is_empty() {
            if !params.is_empty() {
                client = client.set_query_params(params);
            }
        } else {
            client.params_mut().extend(seg.params);
        }
    }

    if client.method() != &Method::GET && client.method() != &Method::OPTIONS {
        if let Some(body) = body {
            client = client.set_payload(body);
        }
    }

    if !headers.is_empty() {
        client = client.set_headers(headers);
    }

    Ok(client.send().await)
}

/// Sends a GET request. Never carries a payload.
///
/// # Examples
///
/// ```no_run
/// use herald::{shorthand, Table};
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct User { id: u64 }
///
/// # async fn example() -> Result<(), herald::ConfigError> {
/// let client = shorthand::get::<User>(
///     "https://api.example.com/v1/users",
///     Table::from([("page".to_string(), 1.into())]),
/// )
/// .await?;
/// # Ok(())
/// # }
/// ```
pub async fn get<T>(path: &str, params: Table) -> Result<Client<T>, ConfigError>
where
    T: DeserializeOwned + Send + 'static,
{
    request::<T, ()>("GET", path, params, None, Table::new()).await
}

/// Sends a POST request with a serializable payload.
pub async fn post<T, B>(path: &str, params: Table, body: &B) -> Result<Client<T>, ConfigError>
where
    T: DeserializeOwned + Send + 'static,
    B: Serialize,
{
    request("POST", path, params, Some(body), Table::new()).await
}

/// Sends a PUT request with a serializable payload.
pub async fn put<T, B>(path: &str, params: Table, body: &B) -> Result<Client<T>, ConfigError>
where
    T: DeserializeOwned + Send + 'static,
    B: Serialize,
{
    request("PUT", path, params, Some(body), Table::new()).await
}

/// Sends a DELETE request with a serializable payload.
pub async fn delete<T, B>(path: &str, params: Table, body: &B) -> Result<Client<T>, ConfigError>
where
    T: DeserializeOwned + Send + 'static,
    B: Serialize,
{
    request("DELETE", path, params, Some(body), Table::new()).await
}

/// Sends a PATCH request with a serializable payload.
pub async fn patch<T, B>(path: &str, params: Table, body: &B) -> Result<Client<T>, ConfigError>
where
    T: DeserializeOwned + Send + 'static,
    B: Serialize,
{
    request("PATCH", path, params, Some(body), Table::new()).await
}

/// Sends a HEAD request. Never carries a payload.
pub async fn head<T>(path: &str, params: Table) -> Result<Client<T>, ConfigError>
where
    T: DeserializeOwned + Send + 'static,
{
    request::<T, ()>("HEAD", path, params, None, Table::new()).await
}

/// Sends an OPTIONS request. Never carries parameters or a payload.
pub async fn options<T>(path: &str) -> Result<Client<T>, ConfigError>
where
    T: DeserializeOwned + Send + 'static,
{
    request::<T, ()>("OPTIONS", path, Table::new(), None, Table::new()).await
}
