use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, trace};

use crate::core::{Error, Result};
use crate::protocol::Frame;
use crate::transport::{SerialRequest, Transport};
use super::channel::PollChannel;

/// Shortest period a poll can run at
const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// An active recurring read
struct PollTask {
    /// Distinguishes this task from earlier ones on the same channel
    id: u64,
    /// Frame sent on every tick
    frame: Frame,
    /// Tick period
    interval: Duration,
    /// Timer task
    handle: JoinHandle<()>,
}

/// State shared with the timer tasks
struct SharedState {
    /// Where ticks deliver their frame
    transport: Arc<dyn Transport>,
    /// At most one task per channel
    tasks: Mutex<HashMap<PollChannel, PollTask>>,
}

impl SharedState {
    fn lock(&self) -> MutexGuard<'_, HashMap<PollChannel, PollTask>> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Recurring sensor reads, one per channel
///
/// A tick only delivers while its task is still the channel's current task, and
/// that check and the delivery happen under the same lock `stop_polling` takes.
/// Once `stop_polling` returns, the stopped task can no longer send.
pub struct PollingRegistry {
    /// Shared state
    shared: Arc<SharedState>,
    /// Period used when a start call does not give one
    default_interval: Duration,
    /// Source of task ids
    next_id: AtomicU64,
    /// Runtime the timer tasks are spawned on
    runtime: Handle,
}

impl PollingRegistry {
    /// Creates a registry on the current tokio runtime
    pub fn new(transport: Arc<dyn Transport>, default_interval: Duration) -> Result<Self> {
        let runtime = Handle::try_current()
            .map_err(|e| Error::runtime(format!("polling needs a tokio runtime: {}", e)))?;
        Ok(Self::with_handle(runtime, transport, default_interval))
    }

    /// Creates a registry that spawns its timers on `runtime`
    pub fn with_handle(
        runtime: Handle,
        transport: Arc<dyn Transport>,
        default_interval: Duration,
    ) -> Self {
        PollingRegistry {
            shared: Arc::new(SharedState {
                transport,
                tasks: Mutex::new(HashMap::new()),
            }),
            default_interval,
            next_id: AtomicU64::new(0),
            runtime,
        }
    }

    /// Period used when none is given
    pub fn default_interval(&self) -> Duration {
        self.default_interval
    }

    /// Starts sending `frame` every `interval` (default period when `None`)
    ///
    /// An active poll on the same channel is cancelled first. The first send
    /// happens one period after the call.
    pub fn start_polling(&self, channel: PollChannel, frame: Frame, interval: Option<Duration>) {
        let period = interval.unwrap_or(self.default_interval).max(MIN_INTERVAL);
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        let mut tasks = self.shared.lock();
        if let Some(previous) = tasks.remove(&channel) {
            previous.handle.abort();
            debug!(%channel, "replacing active poll");
        }

        let handle = self.runtime.spawn(run_poll(Arc::clone(&self.shared), channel, id, period));
        debug!(%channel, frame = %frame, period_ms = period.as_millis() as u64, "poll started");
        tasks.insert(
            channel,
            PollTask {
                id,
                frame,
                interval: period,
                handle,
            },
        );
    }

    /// Cancels the poll on `channel`; returns whether one was active
    pub fn stop_polling(&self, channel: PollChannel) -> bool {
        match self.shared.lock().remove(&channel) {
            Some(task) => {
                task.handle.abort();
                debug!(%channel, "poll stopped");
                true
            }
            None => false,
        }
    }

    /// Cancels every poll; returns how many were active
    pub fn stop_all(&self) -> usize {
        let mut tasks = self.shared.lock();
        let count = tasks.len();
        for (_, task) in tasks.drain() {
            task.handle.abort();
        }
        if count > 0 {
            debug!(count, "all polls stopped");
        }
        count
    }

    /// Whether `channel` is being polled
    pub fn is_active(&self, channel: PollChannel) -> bool {
        self.shared.lock().contains_key(&channel)
    }

    /// Active channels in declaration order
    pub fn active_channels(&self) -> Vec<PollChannel> {
        let mut channels: Vec<_> = self.shared.lock().keys().copied().collect();
        channels.sort();
        channels
    }

    /// Frame and period of the poll on `channel`
    pub fn task_info(&self, channel: PollChannel) -> Option<(Frame, Duration)> {
        self.shared
            .lock()
            .get(&channel)
            .map(|task| (task.frame.clone(), task.interval))
    }

    /// Number of active polls
    pub fn len(&self) -> usize {
        self.shared.lock().len()
    }

    /// Whether no poll is active
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Drop for PollingRegistry {
    fn drop(&mut self) {
        self.stop_all();
    }
}

/// Timer loop of one poll
async fn run_poll(shared: Arc<SharedState>, channel: PollChannel, id: u64, period: Duration) {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        let delivered = {
            let tasks = shared.lock();
            match tasks.get(&channel) {
                Some(task) if task.id == id => {
                    trace!(%channel, frame = %task.frame, "poll tick");
                    shared.transport.deliver(SerialRequest::from_frame(&task.frame));
                    true
                }
                _ => false,
            }
        };

        if !delivered {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::Command;
    use crate::transport::ChannelTransport;
    use tokio::sync::mpsc::UnboundedReceiver;
    use tokio::time::sleep;

    const PERIOD: Duration = Duration::from_millis(800);

    fn registry() -> (PollingRegistry, UnboundedReceiver<SerialRequest>) {
        let (transport, rx) = ChannelTransport::new();
        let registry = PollingRegistry::new(Arc::new(transport), PERIOD).unwrap();
        (registry, rx)
    }

    fn drain(rx: &mut UnboundedReceiver<SerialRequest>) -> Vec<Vec<u8>> {
        let mut sent = Vec::new();
        while let Ok(request) = rx.try_recv() {
            sent.push(request.params);
        }
        sent
    }

    fn ultrasonic(port: u8) -> Frame {
        Command::Ultrasonic { port }.to_frame(None)
    }

    #[test]
    fn test_new_outside_runtime_fails() {
        let (transport, _rx) = ChannelTransport::new();
        let err = PollingRegistry::new(Arc::new(transport), PERIOD).err().unwrap();
        assert!(matches!(err, Error::Runtime(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_repeats_every_period() {
        let (registry, mut rx) = registry();
        registry.start_polling(PollChannel::Ultrasonic, ultrasonic(3), None);

        sleep(Duration::from_millis(700)).await;
        assert!(drain(&mut rx).is_empty(), "first send waits one period");

        sleep(Duration::from_millis(1800)).await;
        let sent = drain(&mut rx);
        assert_eq!(sent.len(), 3);
        assert!(sent.iter().all(|bytes| bytes == ultrasonic(3).as_bytes()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_replaces_timer() {
        let (registry, mut rx) = registry();
        registry.start_polling(PollChannel::Ultrasonic, ultrasonic(1), None);
        registry.start_polling(PollChannel::Ultrasonic, ultrasonic(2), None);

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.task_info(PollChannel::Ultrasonic).unwrap().0, ultrasonic(2));

        sleep(Duration::from_millis(900)).await;
        let sent = drain(&mut rx);
        assert_eq!(sent, vec![ultrasonic(2).as_bytes().to_vec()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_cancels_pending_tick() {
        let (registry, mut rx) = registry();
        registry.start_polling(PollChannel::Light, ultrasonic(1), None);

        sleep(Duration::from_millis(799)).await;
        assert!(registry.stop_polling(PollChannel::Light));

        sleep(Duration::from_millis(5000)).await;
        assert!(drain(&mut rx).is_empty());
        assert!(!registry.is_active(PollChannel::Light));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_unknown_channel_is_noop() {
        let (registry, mut rx) = registry();
        assert!(!registry.stop_polling(PollChannel::Gas));
        assert!(registry.is_empty());

        sleep(Duration::from_millis(2000)).await;
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_channels_are_independent() {
        let (registry, mut rx) = registry();
        registry.start_polling(PollChannel::GyroX, ultrasonic(1), Some(Duration::from_millis(300)));
        registry.start_polling(PollChannel::GyroY, ultrasonic(2), None);
        assert_eq!(registry.active_channels(), vec![PollChannel::GyroX, PollChannel::GyroY]);

        sleep(Duration::from_millis(1000)).await;
        let sent = drain(&mut rx);
        let gyro_x = sent.iter().filter(|b| b.as_slice() == ultrasonic(1).as_bytes()).count();
        let gyro_y = sent.iter().filter(|b| b.as_slice() == ultrasonic(2).as_bytes()).count();
        assert_eq!(gyro_x, 3);
        assert_eq!(gyro_y, 1);

        registry.stop_polling(PollChannel::GyroX);
        sleep(Duration::from_millis(800)).await;
        let sent = drain(&mut rx);
        assert_eq!(sent, vec![ultrasonic(2).as_bytes().to_vec()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_all_and_drop() {
        let (registry, mut rx) = registry();
        registry.start_polling(PollChannel::Sound, ultrasonic(1), None);
        registry.start_polling(PollChannel::Pir, ultrasonic(2), None);
        assert_eq!(registry.stop_all(), 2);
        assert_eq!(registry.stop_all(), 0);

        registry.start_polling(PollChannel::Fire, ultrasonic(3), None);
        drop(registry);

        sleep(Duration::from_millis(3000)).await;
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_interval_is_clamped() {
        let (registry, mut rx) = registry();
        registry.start_polling(PollChannel::Encoder, ultrasonic(1), Some(Duration::ZERO));
        assert_eq!(registry.task_info(PollChannel::Encoder).unwrap().1, MIN_INTERVAL);

        sleep(Duration::from_millis(5)).await;
        registry.stop_polling(PollChannel::Encoder);
        assert!(!drain(&mut rx).is_empty());
    }
}
