//! Helpers shared by unit tests.

use jsonwebtoken::{EncodingKey, Header, encode};
use serde::Serialize;

#[derive(Serialize)]
struct Claims<'a> {
    sub: &'a str,
    exp: i64,
}

/// Mint an HS256 token the way the backend does.
pub fn mint_token(sub: &str, exp: i64) -> String {
    encode(
        &Header::default(),
        &Claims { sub, exp },
        &EncodingKey::from_secret(b"test-secret"),
    )
    .expect("jwt encode")
}
