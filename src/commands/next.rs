//! `salatr next`: print the upcoming prayer and the time remaining.

use anyhow::Result;

use crate::state::display::DisplayState;
use crate::time_source;
use crate::tracker::Tracker;

pub fn handle_next_command(json_output: bool) -> Result<()> {
    let settings = super::load_settings()?;
    let tracker = Tracker::start(settings.tracker_settings(), time_source::now());
    let display = DisplayState::from_tracker(&tracker, None, settings.notifications.clock_format);

    if json_output {
        println!("{}", display.to_json_line()?);
    } else if tracker.is_ready() {
        println!("{}", display.plain_line());
    } else {
        log_error_standalone!("No upcoming prayer could be determined for this location");
    }
    Ok(())
}
