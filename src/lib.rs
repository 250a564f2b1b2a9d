pub mod cursor;
pub mod hotkey;
pub mod logging;
pub mod permissions;
pub mod power;
pub mod session;
pub mod settings;
pub mod timer;

#[cfg(target_os = "macos")]
pub mod gui;
#[cfg(target_os = "macos")]
pub mod tray;
