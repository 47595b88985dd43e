//! The dispatch loop.

use crate::config::SchedulerConfig;
use crate::delivery::DeliveryService;
use crate::error::Result;
use chrono::Utc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tickler_core::EventStatus;
use tickler_store::EventQueue;
use tokio::sync::Notify;
use tracing::{debug, error, info};

/// Drives pending events to delivery when their fire instant arrives.
///
/// The loop sleeps until the soonest pending instant (capped by the poll
/// interval) or until an insert notification arrives, whichever comes
/// first, so inserting a sooner event shortens the current wait instead of
/// waiting out the old timer. Due events are claimed atomically from the
/// queue and delivered in independently spawned tasks; one event's failure
/// never blocks the next.
pub struct Dispatcher {
    queue: Arc<EventQueue>,
    delivery: Arc<DeliveryService>,
    config: SchedulerConfig,
    shutdown: Arc<AtomicBool>,
    wake: Arc<Notify>,
    in_flight: Arc<AtomicUsize>,
}

impl Dispatcher {
    pub(crate) fn new(
        queue: Arc<EventQueue>,
        delivery: Arc<DeliveryService>,
        config: SchedulerConfig,
    ) -> Self {
        Self {
            queue,
            delivery,
            config,
            shutdown: Arc::new(AtomicBool::new(false)),
            wake: Arc::new(Notify::new()),
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Run the dispatch loop until shutdown is signaled.
    ///
    /// In-flight deliveries run to completion before this returns.
    pub async fn run(&self) -> Result<()> {
        info!("dispatcher starting");

        while !self.shutdown.load(Ordering::SeqCst) {
            let due = match self.queue.due_before(Utc::now()) {
                Ok(due) => due,
                Err(e) => {
                    error!("failed to claim due events: {e}");
                    tokio::time::sleep(Duration::from_secs(1)).await;
                    continue;
                }
            };

            if due.is_empty() {
                self.idle().await;
                continue;
            }

            debug!(count = due.len(), "dispatching due events");

            for event in due {
                let delivery = self.delivery.clone();
                let queue = self.queue.clone();
                let in_flight = self.in_flight.clone();
                in_flight.fetch_add(1, Ordering::SeqCst);

                tokio::spawn(async move {
                    let report = delivery.deliver(&event).await;
                    let (status, failure) = if report.is_delivered() {
                        (EventStatus::Delivered, None)
                    } else {
                        (EventStatus::Failed, report.failure())
                    };

                    if let Err(e) = queue.resolve(&event.event_id, status, failure.as_deref()) {
                        error!(event_id = %event.event_id, "failed to record delivery outcome: {e}");
                    }
                    in_flight.fetch_sub(1, Ordering::SeqCst);
                });
            }
        }

        info!("dispatcher shutting down, draining in-flight deliveries");
        while self.in_flight.load(Ordering::SeqCst) > 0 {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }

        info!("dispatcher stopped");
        Ok(())
    }

    /// Signal graceful shutdown.
    pub fn shutdown(&self) {
        info!("shutdown signal received");
        self.shutdown.store(true, Ordering::SeqCst);
        self.wake.notify_waiters();
    }

    /// Number of deliveries currently in flight.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Wake the loop early; called after every insert. Uses `notify_one` so
    /// an insert landing between due checks is not lost.
    pub(crate) fn notify_inserted(&self) {
        self.wake.notify_one();
    }

    async fn idle(&self) {
        let wait = match self.queue.next_fire_at() {
            Ok(Some(next)) => (next - Utc::now())
                .to_std()
                .unwrap_or(Duration::ZERO)
                .min(self.config.poll_interval),
            Ok(None) => self.config.poll_interval,
            Err(e) => {
                error!("failed to read next fire instant: {e}");
                self.config.poll_interval
            }
        };

        tokio::select! {
            _ = tokio::time::sleep(wait) => {}
            _ = self.wake.notified() => {
                debug!("woken early by insert");
            }
        }
    }
}
