//! Desktop capabilities: notifications and alarm playback.

pub mod notifier;
pub mod sound;

pub use notifier::DesktopNotifier;
pub use sound::CommandSoundPlayer;
