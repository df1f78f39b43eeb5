/// Application-level failure reported inside a successfully decoded response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{code} {message}")]
pub struct StatusError {
    pub code: i32,
    pub message: &'static str,
}

/// Delivery refused until the account has acquired the app.
pub const PURCHASE_REQUIRED: StatusError = StatusError {
    code: 3,
    message: "purchase required",
};

const KNOWN: &[StatusError] = &[PURCHASE_REQUIRED];

/// `Ok` unless `code` is a known failure. Unknown codes are left for the
/// caller to read off the decoded value.
pub fn check_status(code: i32) -> Result<(), StatusError> {
    match KNOWN.iter().find(|known| known.code == code) {
        Some(known) => Err(*known),
        None => Ok(()),
    }
}
