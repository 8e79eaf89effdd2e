//! Promise-style callback chain over a resolved request.
//!
//! This example shows how to:
//! - Chain `then` / `catch` / `finally` after `send`
//! - Keep success and failure handling in one fluent expression
//! - Use `report` for a structured summary inside `finally`
//!
//! Run with: `cargo run --example callback_style`

use herald::Client;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct Todo {
    id: u32,
    title: String,
    completed: bool,
}

#[tokio::main]
async fn main() -> Result<(), herald::ConfigError> {
    tracing_subscriber::fmt()
        .with_env_filter("herald=info,callback_style=info")
        .init();

    Client::<Todo>::raw()
        .set_request("GET", "https://jsonplaceholder.typicode.com/todos/1", &[])?
        .send()
        .await
        .then(|todo| {
            println!("todo #{}: {} (done: {})", todo.id, todo.title, todo.completed);
        })
        .catch(|fault| {
            if fault.is_transport() {
                eprintln!("could not complete the exchange: {fault}");
            } else {
                eprintln!("server declined the request: {fault}");
            }
        })
        .finally(|client| client.report());

    // A request that cannot succeed, to exercise the catch arm.
    Client::<Todo>::raw()
        .set_request("GET", "https://jsonplaceholder.typicode.com/todos/0", &[])?
        .send()
        .await
        .then(|_| println!("unexpectedly found todo zero"))
        .catch(|fault| eprintln!("as expected, the request failed: {fault}"))
        .finally(|client| client.report());

    Ok(())
}
