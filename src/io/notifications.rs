//! Desktop notifications over `org.freedesktop.Notifications`.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::thread;
use zbus::blocking::Connection;
use zbus::zvariant::Value;

use crate::common::constants::APP_ID;

const APP_NAME: &str = "Salatr";
const APP_ICON: &str = "appointment-soon";
const URGENCY_CRITICAL: u8 = 2;

#[zbus::proxy(
    interface = "org.freedesktop.Notifications",
    default_service = "org.freedesktop.Notifications",
    default_path = "/org/freedesktop/Notifications"
)]
trait Notifications {
    #[allow(clippy::too_many_arguments)]
    fn notify(
        &self,
        app_name: &str,
        replaces_id: u32,
        app_icon: &str,
        summary: &str,
        body: &str,
        actions: &[&str],
        hints: HashMap<&str, &Value<'_>>,
        expire_timeout: i32,
    ) -> zbus::Result<u32>;
}

/// Sink for user-facing notifications.
#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send {
    fn notify(&self, body: &str);
    fn notify_error(&self, body: &str);
}

/// Sends notifications on the session bus from a short-lived thread so the
/// main loop never waits on the notification daemon.
#[derive(Debug, Default, Clone, Copy)]
pub struct DesktopNotifier;

impl DesktopNotifier {
    fn dispatch(body: &str, critical: bool) {
        let body = body.to_string();
        thread::spawn(move || {
            if let Err(e) = send_notification(&body, critical) {
                log_pipe!();
                log_warning!("Failed to send notification: {e:#}");
            }
        });
    }
}

impl Notifier for DesktopNotifier {
    fn notify(&self, body: &str) {
        Self::dispatch(body, false);
    }

    fn notify_error(&self, body: &str) {
        Self::dispatch(body, true);
    }
}

fn send_notification(body: &str, critical: bool) -> Result<()> {
    let connection = Connection::session().context("Failed to connect to session D-Bus")?;
    let proxy = NotificationsProxyBlocking::new(&connection)
        .context("Failed to create notifications proxy")?;

    let urgency = Value::U8(URGENCY_CRITICAL);
    let desktop_entry = Value::from(APP_ID);
    let mut hints: HashMap<&str, &Value<'_>> = HashMap::new();
    hints.insert("desktop-entry", &desktop_entry);
    if critical {
        hints.insert("urgency", &urgency);
    }

    proxy
        .notify(APP_NAME, 0, APP_ICON, APP_NAME, body, &[], hints, -1)
        .context("Notification daemon rejected the notification")?;
    Ok(())
}
