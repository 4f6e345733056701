//! # vkapi - A blocking client for the VK API
//!
//! vkapi calls remote procedures of the VK social network over its HTTP/JSON
//! interface. It injects the default `access_token`, `v` and `lang`
//! parameters, throttles itself to a requests-per-second ceiling, retries
//! timed out attempts and turns error envelopes into typed errors.
//!
//! ## Quick Start
//!
//! ```no_run
//! use vkapi::{Client, Params, methods};
//!
//! fn main() -> Result<(), vkapi::Error> {
//!     let mut client = Client::builder()
//!         .app_id("3697615")
//!         .app_secret("AlVXZFMUqyrnABp8ncuU")
//!         .api_version("5.45")
//!         .build()?;
//!
//!     // Password grant; the token is used by every following call
//!     client.authorize("example@example.com", "examplepassword")?;
//!
//!     let envelope = client.invoke(
//!         methods::users::GET,
//!         Params::new().with("user_ids", "1").with("fields", "city"),
//!     )?;
//!     println!("{}", envelope["response"][0]["first_name"]);
//!
//!     // Any remote string works too
//!     let time = client.call("utils.getServerTime", Params::new())?;
//!     println!("Server time: {}", time["response"]);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Default injection** - `access_token`, `v` and `lang` are added unless the caller passes them
//! - **Rate limiting** - a fixed one-second window sleeps the caller instead of letting VK answer "too many requests"
//! - **Timeout retries** - each attempt is bounded, timed out attempts are retried, other failures are not
//! - **Typed errors** - VK error envelopes become [`ApiError`] with the numeric code and echoed parameters
//! - **Structured logging** - every stage logs through `tracing`
//! - **Method table** - every documented remote procedure as a [`Method`] constant
//!
//! ## Error Handling
//!
//! The first failing stage of a call decides the error:
//!
//! ```no_run
//! use vkapi::{Client, Error, ErrorCode, Params};
//!
//! # fn example() -> Result<(), Error> {
//! # let mut client = Client::builder().build()?;
//! match client.call("wall.get", Params::new().with("owner_id", "1")) {
//!     Ok(envelope) => println!("Success: {:?}", envelope.response()),
//!     Err(Error::Api(e)) if e.code == ErrorCode::ACCESS_DENIED => {
//!         eprintln!("Access denied, request was {:?}", e.request_params);
//!     }
//!     Err(Error::Transport { source, attempts }) => {
//!         eprintln!("Gave up after {} attempt(s): {}", attempts, source);
//!     }
//!     Err(Error::Decode { raw_response, .. }) => {
//!         eprintln!("Not JSON: {}", raw_response);
//!     }
//!     Err(e) => eprintln!("Other error: {}", e),
//! }
//! # Ok(())
//! # }
//! ```

pub mod classify;
mod client;
mod config;
mod error;
pub mod methods;
pub mod params;
pub mod rate_limit;
pub mod request_url;
pub mod response;
pub mod retry;
pub mod transport;

pub use client::{Client, ClientBuilder, DEFAULT_API_URL, DEFAULT_OAUTH_URL};
pub use config::{Credentials, LogOptions};
pub use error::{ApiError, Error, ErrorCode, Result};
pub use methods::Method;
pub use params::Params;
pub use rate_limit::RateLimiter;
pub use response::Envelope;
pub use retry::RetryPolicy;
pub use transport::{ReqwestTransport, Transport, TransportError, TransportErrorKind};
