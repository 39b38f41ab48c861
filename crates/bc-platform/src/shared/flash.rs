//! One-shot flash messages backed by a cookie.
//!
//! The contract is set / read-and-clear: a flash survives exactly one
//! redirect. `set` is used by the redirect-after-post path; the list
//! view pops whatever is pending with `take`.

use axum_extra::extract::cookie::{Cookie, CookieJar};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};

const FLASH_COOKIE: &str = "bc_flash";

// Octets RFC 6265 disallows in a cookie-value, plus `%` itself.
const COOKIE_VALUE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b',')
    .add(b';')
    .add(b'\\')
    .add(b'%');

/// Severity of a flash message; controls styling in the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashLevel {
    Notice,
    Error,
}

/// A one-shot user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    pub fn notice(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Notice,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Error,
            message: message.into(),
        }
    }

    fn encode(&self) -> String {
        let level = match self.level {
            FlashLevel::Notice => "notice",
            FlashLevel::Error => "error",
        };
        format!("{}:{}", level, utf8_percent_encode(&self.message, COOKIE_VALUE))
    }

    fn decode(value: &str) -> Option<Self> {
        let (level, message) = value.split_once(':')?;
        let level = match level {
            "notice" => FlashLevel::Notice,
            "error" => FlashLevel::Error,
            _ => return None,
        };
        let message = percent_decode_str(message).decode_utf8().ok()?;
        Some(Self {
            level,
            message: message.into_owned(),
        })
    }
}

/// Store a flash for the next request.
pub fn set(jar: CookieJar, flash: &Flash) -> CookieJar {
    let cookie = Cookie::build((FLASH_COOKIE, flash.encode()))
        .path("/")
        .http_only(true)
        .build();
    jar.add(cookie)
}

/// Read and clear the pending flash, if any.
pub fn take(jar: CookieJar) -> (CookieJar, Option<Flash>) {
    let flash = jar
        .get(FLASH_COOKIE)
        .and_then(|cookie| Flash::decode(cookie.value()));

    if flash.is_some() {
        let mut removal = Cookie::from(FLASH_COOKIE);
        removal.set_path("/");
        (jar.remove(removal), flash)
    } else {
        (jar, None)
    }
}
