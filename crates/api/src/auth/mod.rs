//! Authentication: bearer tokens, password hashing, account lifecycle, and
//! the cookie that carries the token between requests.

pub mod cookie;
pub mod credentials;
pub mod jwt;
pub mod password;
