pub mod display;
pub mod driver;
pub mod logging;
#[cfg(unix)]
pub mod player;
pub mod settings;
pub mod transition;
pub mod window;
