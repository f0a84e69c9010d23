//! Runtime glue around the query controller: logging setup, the channel
//! notifier feeding the view, and a dry-run search dispatcher.

pub mod dry_run;
pub mod logging;
pub mod view_bridge;

pub use dry_run::DryRunDispatcher;
pub use logging::init_logging;
pub use view_bridge::ChannelNotifier;
