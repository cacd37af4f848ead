// External I/O collaborators
pub mod announcer; // Event -> notification/sound routing
pub mod dbus; // logind sleep/resume and clock change monitoring
pub mod geoclue; // Geoclue2 location updates
pub mod notifications; // Desktop notifications
pub mod signals; // Unix signal handling and the main loop message type
pub mod sound; // Audio cue via an external player
