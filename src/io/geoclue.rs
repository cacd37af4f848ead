//! Geoclue2 location monitor.
//!
//! Asks Geoclue for street-level accuracy with a 60 second / 200 metre update
//! threshold and forwards each position to the main loop as
//! [`SignalMessage::LocationUpdated`]. If Geoclue cannot be reached before the
//! first fix, a single [`SignalMessage::LocationFailed`] is sent and the thread
//! exits; the main loop then falls back to the manual coordinates.

use anyhow::{Context, Result};
use std::sync::mpsc::Sender;
use std::thread;
use zbus::blocking::Connection;
use zbus::zvariant::{ObjectPath, OwnedObjectPath};

use crate::common::constants::{
    APP_ID, GEOCLUE_ACCURACY_STREET, GEOCLUE_DISTANCE_THRESHOLD_METERS, GEOCLUE_TIME_THRESHOLD_SECS,
};
use crate::io::signals::SignalMessage;

#[zbus::proxy(
    interface = "org.freedesktop.GeoClue2.Manager",
    default_service = "org.freedesktop.GeoClue2",
    default_path = "/org/freedesktop/GeoClue2/Manager"
)]
trait GeoclueManager {
    fn get_client(&self) -> zbus::Result<OwnedObjectPath>;
}

#[zbus::proxy(
    interface = "org.freedesktop.GeoClue2.Client",
    default_service = "org.freedesktop.GeoClue2"
)]
trait GeoclueClient {
    fn start(&self) -> zbus::Result<()>;

    #[zbus(property)]
    fn set_desktop_id(&self, id: &str) -> zbus::Result<()>;

    #[zbus(property)]
    fn set_requested_accuracy_level(&self, level: u32) -> zbus::Result<()>;

    #[zbus(property)]
    fn set_time_threshold(&self, seconds: u32) -> zbus::Result<()>;

    #[zbus(property)]
    fn set_distance_threshold(&self, meters: u32) -> zbus::Result<()>;

    #[zbus(signal)]
    fn location_updated(&self, old: ObjectPath<'_>, new: ObjectPath<'_>) -> zbus::Result<()>;
}

#[zbus::proxy(
    interface = "org.freedesktop.GeoClue2.Location",
    default_service = "org.freedesktop.GeoClue2"
)]
trait GeoclueLocation {
    #[zbus(property)]
    fn latitude(&self) -> zbus::Result<f64>;

    #[zbus(property)]
    fn longitude(&self) -> zbus::Result<f64>;
}

/// Build the message for a reported position, dropping impossible fixes.
pub(crate) fn location_message(latitude: f64, longitude: f64) -> Option<SignalMessage> {
    let valid = latitude.is_finite()
        && longitude.is_finite()
        && (-90.0..=90.0).contains(&latitude)
        && (-180.0..=180.0).contains(&longitude);
    valid.then_some(SignalMessage::LocationUpdated {
        latitude,
        longitude,
    })
}

/// Spawn the Geoclue monitor thread.
pub fn start_location_monitor(signal_sender: Sender<SignalMessage>, debug_enabled: bool) {
    thread::spawn(move || {
        if let Err(e) = monitor_location(&signal_sender, debug_enabled) {
            let _ = signal_sender.send(SignalMessage::LocationFailed(format!("{e:#}")));
        }
    });
}

fn monitor_location(signal_sender: &Sender<SignalMessage>, debug_enabled: bool) -> Result<()> {
    let connection = Connection::system().context("Failed to connect to system D-Bus")?;
    let manager =
        GeoclueManagerProxyBlocking::new(&connection).context("Failed to create Geoclue manager proxy")?;
    let client_path = manager.get_client().context("Geoclue refused to create a client")?;

    let client = GeoclueClientProxyBlocking::builder(&connection)
        .path(client_path)?
        .build()
        .context("Failed to create Geoclue client proxy")?;

    client.set_desktop_id(APP_ID)?;
    client.set_requested_accuracy_level(GEOCLUE_ACCURACY_STREET)?;
    client.set_time_threshold(GEOCLUE_TIME_THRESHOLD_SECS)?;
    client.set_distance_threshold(GEOCLUE_DISTANCE_THRESHOLD_METERS)?;

    let updates = client
        .receive_location_updated()
        .context("Failed to subscribe to Geoclue location updates")?;
    client.start().context("Failed to start Geoclue client")?;

    if debug_enabled {
        log_pipe!();
        log_debug!("Geoclue client started, waiting for a location");
    }

    for update in updates {
        let args = match update.args() {
            Ok(args) => args,
            Err(e) => {
                log_pipe!();
                log_warning!("Failed to parse Geoclue LocationUpdated args: {}", e);
                continue;
            }
        };

        let location = GeoclueLocationProxyBlocking::builder(&connection)
            .path(args.new.to_owned())?
            .build()
            .context("Failed to create Geoclue location proxy")?;
        let (latitude, longitude) = (location.latitude()?, location.longitude()?);

        match location_message(latitude, longitude) {
            Some(message) => {
                if debug_enabled {
                    log_pipe!();
                    log_debug!("Geoclue location: {latitude:.4}, {longitude:.4}");
                }
                if signal_sender.send(message).is_err() {
                    return Ok(());
                }
            }
            None => {
                log_pipe!();
                log_warning!("Ignoring invalid Geoclue location: {latitude}, {longitude}");
            }
        }
    }

    Err(anyhow::anyhow!("Geoclue location stream ended"))
}
