//! Request URL construction.

use crate::params::Params;

/// Builds the absolute URL of a call: `base + method + "?" + params`.
///
/// Literal spaces are escaped as `%20`; nothing else is touched and the base
/// is not validated.
///
/// ```
/// use vkapi::{Params, request_url::build_url};
///
/// let url = build_url(
///     "https://api.vk.com/method/",
///     "users.get",
///     &Params::new().with("user_id", "1"),
/// );
/// assert_eq!(url, "https://api.vk.com/method/users.get?user_id=1");
/// ```
pub fn build_url(base: &str, method: &str, params: &Params) -> String {
    let url = format!("{}{}?{}", base, method, params.encode());
    url.replace(' ', "%20")
}

/// Query parameters whose values never reach the log.
pub const SECRET_KEYS: [&str; 3] = ["access_token", "client_secret", "password"];

/// Masks the values of [`SECRET_KEYS`] in a request URL for log output.
///
/// ```
/// use vkapi::request_url::redact_secrets;
///
/// assert_eq!(
///     redact_secrets("https://oauth.vk.com/token?client_secret=s&password=p&username=me"),
///     "https://oauth.vk.com/token?client_secret=***&password=***&username=me"
/// );
/// ```
pub fn redact_secrets(url: &str) -> String {
    let Some((head, query)) = url.split_once('?') else {
        return url.to_string();
    };

    let pairs: Vec<String> = query
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) if SECRET_KEYS.contains(&key) && !value.is_empty() => {
                format!("{}=***", key)
            }
            _ => pair.to_string(),
        })
        .collect();

    format!("{}?{}", head, pairs.join("&"))
}
