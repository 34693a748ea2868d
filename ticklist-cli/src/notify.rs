//! Desktop notifications for reminders

use notify_rust::Notification;
use tracing::debug;

use ticklist_core::{CoreError, Notifier, Permission, Result};

/// Shows reminders through the desktop notification service
///
/// Permission follows the `reminders.notifications` config switch; asking
/// for it resolves the pending state without prompting.
pub struct DesktopNotifier {
    enabled: bool,
    permission: Permission,
}

impl DesktopNotifier {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            permission: Permission::Default,
        }
    }
}

impl Notifier for DesktopNotifier {
    fn permission(&self) -> Permission {
        self.permission
    }

    fn request_permission(&mut self) -> Permission {
        if self.permission == Permission::Default {
            self.permission = if self.enabled {
                Permission::Granted
            } else {
                Permission::Denied
            };
            debug!(permission = ?self.permission, "notification permission resolved");
        }
        self.permission
    }

    fn notify(&mut self, title: &str, body: &str) -> Result<()> {
        Notification::new()
            .summary(title)
            .body(body)
            .appname("ticklist")
            .show()
            .map(|_| ())
            .map_err(|e| CoreError::notify(e.to_string()))
    }
}
