//! Basic example demonstrating simple GET and POST requests.
//!
//! This example shows how to:
//! - Build a request from parts with the fluent chain
//! - Decode a raw (non-enveloped) JSON body into a declared type
//! - Access decoded data, timing, and wire details after the exchange
//!
//! Run with: `cargo run --example basic_call`

use herald::Client;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct Post {
    #[serde(rename = "userId")]
    user_id: u32,
    id: u32,
    title: String,
    body: String,
}

#[derive(Debug, Serialize)]
struct NewPost {
    title: String,
    body: String,
    #[serde(rename = "userId")]
    user_id: u32,
}

#[tokio::main]
async fn main() -> Result<(), herald::ConfigError> {
    // Initialize tracing for logging
    tracing_subscriber::fmt()
        .with_env_filter("herald=debug,basic_call=info")
        .init();

    println!("=== GET Request Example ===");
    // JSONPlaceholder serves plain JSON, so raw mode decodes the whole body.
    let client = Client::<Post>::raw()
        .set_request("GET", "https://jsonplaceholder.typicode.com/posts/1", &[])?
        .send()
        .await;

    if let Some(post) = client.data() {
        println!("Post ID: {}", post.id);
        println!("Title: {}", post.title);
    }
    let (duration, _) = client.elapsed();
    println!("Request latency: {duration:?}");
    println!("Protocol: {}", client.proto().unwrap_or("unknown"));
    println!("Approximate QPS: {:.1}", client.qps());
    println!();

    println!("=== POST Request Example ===");
    let new_post = NewPost {
        title: "My New Post".to_string(),
        body: "This is the content of my new post!".to_string(),
        user_id: 1,
    };

    let client = Client::<Post>::raw()
        .set_request("POST", "https://jsonplaceholder.typicode.com/posts", &[])?
        .set_content_type(herald::JSON_CONTENT_TYPE)
        .set_payload(&new_post)
        .send()
        .await;

    // JSONPlaceholder answers 201 to creations; with an undecodable or
    // non-200 outcome `unwrap` explains instead of staying silent.
    let diagnostic = client.unwrap();
    if diagnostic.is_empty() {
        if let Some(created) = client.data() {
            println!("Created post with ID: {}", created.id);
        }
    } else {
        println!("Request did not fully succeed: {diagnostic}");
        if let Some(created) = client.data() {
            println!("Decoded data is still available: ID {}", created.id);
        }
    }

    // Structured summary of the whole exchange through tracing.
    client.report();

    Ok(())
}
