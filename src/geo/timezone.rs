//! Timezone lookup for observer coordinates.

use chrono_tz::Tz;
use once_cell::sync::Lazy;
use tzf_rs::DefaultFinder;

// Building the finder decodes the embedded boundary data, so do it once
static FINDER: Lazy<DefaultFinder> = Lazy::new(DefaultFinder::new);

/// IANA zone containing the coordinates, if tzf knows one that chrono-tz can parse.
pub fn lookup(latitude: f64, longitude: f64) -> Option<Tz> {
    let name = FINDER.get_tz_name(longitude, latitude);
    name.parse::<Tz>().ok()
}

/// Zone for the coordinates, falling back to UTC.
pub fn determine_timezone_from_coordinates(latitude: f64, longitude: f64) -> Tz {
    lookup(latitude, longitude).unwrap_or_else(|| {
        log_warning!(
            "No timezone found for {latitude:.4}, {longitude:.4}; using UTC. Set `timezone` to override."
        );
        Tz::UTC
    })
}
