//! Desktop notifications through notify-rust

use std::time::Duration;

use async_trait::async_trait;
use notify_rust::{Notification, Timeout};

use crate::application::ports::{Notice, NotificationError, Notifier};

const APP_NAME: &str = "Clipmark";

/// Shows notices as freedesktop / macOS notifications
pub struct NotifyRustNotifier {
    expire_after: Duration,
}

impl NotifyRustNotifier {
    pub fn new() -> Self {
        Self {
            expire_after: Duration::from_secs(5),
        }
    }

    fn build(&self, notice: &Notice) -> Notification {
        let mut notification = Notification::new();
        notification
            .appname(APP_NAME)
            .summary(notice.title())
            .body(&notice.body())
            .icon(notice.icon().icon_name())
            .timeout(Timeout::Milliseconds(self.expire_after.as_millis() as u32));
        notification
    }
}

impl Default for NotifyRustNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Notifier for NotifyRustNotifier {
    async fn notify(&self, notice: &Notice) -> Result<(), NotificationError> {
        let notification = self.build(notice);

        // show() waits on the D-Bus reply
        tokio::task::spawn_blocking(move || notification.show().map(|_| ()))
            .await
            .map_err(|e| NotificationError::SendFailed(e.to_string()))?
            .map_err(|e| NotificationError::SendFailed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notice_fields_reach_the_notification() {
        let notification = NotifyRustNotifier::new().build(&Notice::HistoryFull);
        assert_eq!(notification.appname, APP_NAME);
        assert_eq!(notification.summary, "History full");
        assert!(notification.body.contains("favorite"));
        assert_eq!(notification.icon, "edit-paste");
    }
}
