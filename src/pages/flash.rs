//! One-shot success message that survives a single redirect.

use tower_sessions::Session;

pub const SUCCESS_MESSAGE_KEY: &str = "flash.success";

pub async fn set_success(
    session: &Session,
    message: &str,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(SUCCESS_MESSAGE_KEY, message).await
}

/// Returns the pending message and removes it, so it renders exactly once.
pub async fn take_success(
    session: &Session,
) -> Result<Option<String>, tower_sessions::session::Error> {
    session.remove::<String>(SUCCESS_MESSAGE_KEY).await
}
