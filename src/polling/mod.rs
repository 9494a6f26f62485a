//! Sensor polling
//!
//! Sensors report only when asked, so readings the host wants continuously are
//! requested on a timer. Each [`PollChannel`] owns at most one timer.

mod channel;
mod registry;

pub use self::channel::PollChannel;
pub use self::registry::PollingRegistry;
