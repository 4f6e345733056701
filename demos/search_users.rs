//! Authorizes with the password grant and searches users.
//!
//! This example shows how to:
//! - Create a client with application credentials
//! - Obtain an access token with `authorize`
//! - Call a method from the method table and read the envelope
//!
//! Run with: `cargo run --example search_users -- <login> <password>`

use vkapi::{methods, Client, Error, Params};

fn main() -> Result<(), Error> {
    // Initialize tracing for logging
    tracing_subscriber::fmt()
        .with_env_filter("vkapi=debug,search_users=info")
        .init();

    let mut args = std::env::args().skip(1);
    let login = args.next().unwrap_or_else(|| "example@example.com".to_string());
    let password = args.next().unwrap_or_else(|| "examplepassword".to_string());

    let mut client = Client::builder()
        .app_id("3697615")
        .app_secret("AlVXZFMUqyrnABp8ncuU")
        .api_version("5.45")
        .lang("en")
        .build()?;

    client.authorize(&login, &password)?;
    println!("Authorized, token starts with {:.8}", client.access_token().unwrap_or(""));

    let envelope = client.invoke(
        methods::users::SEARCH,
        Params::new().with("count", "500").with("fields", "city"),
    )?;

    let response = envelope.response().cloned().unwrap_or_default();
    println!("Found {} users", response["count"]);
    for user in response["items"].as_array().into_iter().flatten() {
        println!("{}", user["id"]);
    }

    Ok(())
}
