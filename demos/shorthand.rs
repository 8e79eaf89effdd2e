//! One-line verb calls against an enveloped API.
//!
//! The shorthand functions assume the conventional `{code, msg, data}`
//! envelope and default to `http://127.0.0.1:8080`, so bare paths work
//! against a local service. Point the paths at your own API to run this.
//!
//! Run with: `cargo run --example shorthand`

use herald::{shorthand, Table};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
#[allow(dead_code)]
struct User {
    id: u64,
    name: String,
}

#[tokio::main]
async fn main() -> Result<(), herald::ConfigError> {
    tracing_subscriber::fmt()
        .with_env_filter("herald=info,shorthand=info")
        .init();

    // GET with query parameters; a bare path targets the default local host.
    let mut params = Table::new();
    params.insert("page".to_string(), 1.into());
    params.insert("limit".to_string(), 20.into());

    let client = shorthand::get::<Vec<User>>("/api/users", params).await?;
    client
        .then(|users| println!("fetched {} users", users.len()))
        .catch(|fault| eprintln!("list failed: {fault}"))
        .finally(|c| c.report());

    // POST with a typed payload.
    let new_user = User {
        id: 0,
        name: "Alice".to_string(),
    };
    let client = shorthand::post::<User, User>("/api/users", Table::new(), &new_user).await?;
    if let Some(created) = client.data() {
        println!("created user {}", created.id);
    }
    println!("{}", client.unwrap());

    // Query parameters embedded in the path win over the argument map.
    let mut ignored = Table::new();
    ignored.insert("page".to_string(), 99.into());
    let client = shorthand::get::<Vec<User>>("/api/users?page=2", ignored).await?;
    let (method, url) = client.method_url();
    println!("requested [{method}] {url}");

    Ok(())
}
