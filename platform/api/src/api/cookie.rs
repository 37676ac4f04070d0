use hyper::header;
use hyper::HeaderMap;

use crate::config::CookieConfig;

/// The value of cookie `name`, if the request carries it.
pub fn read_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
	headers
		.get_all(header::COOKIE)
		.iter()
		.filter_map(|value| value.to_str().ok())
		.flat_map(|value| value.split(';'))
		.filter_map(|pair| pair.trim().split_once('='))
		.find(|(key, _)| *key == name)
		.map(|(_, value)| value.trim_matches('"'))
		.filter(|value| !value.is_empty())
}

fn build(config: &CookieConfig, value: &str, max_age: i64) -> String {
	let mut cookie = format!("{}={}; HttpOnly; Path=/; SameSite=Lax; Max-Age={}", config.name, value, max_age);

	if config.secure {
		cookie.push_str("; Secure");
	}

	if let Some(domain) = &config.domain {
		cookie.push_str("; Domain=");
		cookie.push_str(domain);
	}

	cookie
}

/// A `Set-Cookie` value storing the session token.
pub fn session_cookie(config: &CookieConfig, token: &str) -> String {
	build(config, token, config.max_age_secs)
}

/// A `Set-Cookie` value that removes the session cookie.
pub fn clear_session_cookie(config: &CookieConfig) -> String {
	build(config, "", 0)
}
