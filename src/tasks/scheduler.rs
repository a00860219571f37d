use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;

use crate::services::database::DatabaseService;
use crate::services::notify::NotificationService;
use crate::tasks::status_check::{check_delivery_status, check_ride_status};

/// Outcome of an externally triggered check, as reported by the HTTP trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// The scans ran; the next eligible check is one interval away.
    Completed { next_check: DateTime<Utc> },
    /// Called again inside the spacing window; nothing ran.
    OnSchedule { next_check: DateTime<Utc> },
}

/// Owns every piece of scheduler state the process has: the repeating timer,
/// the last on-demand run, and the single-slot lock that keeps overlapping
/// passes from double-processing the same rows.
#[derive(Clone)]
pub struct CheckScheduler {
    inner: Arc<SchedulerInner>,
}

struct SchedulerInner {
    db: DatabaseService,
    notifier: NotificationService,
    interval: Duration,
    scan_lock: tokio::sync::Mutex<()>,
    last_run: Mutex<Option<DateTime<Utc>>>,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl CheckScheduler {
    pub fn new(db: DatabaseService, notifier: NotificationService, interval: Duration) -> Self {
        Self {
            inner: Arc::new(SchedulerInner {
                db,
                notifier,
                interval,
                scan_lock: tokio::sync::Mutex::new(()),
                last_run: Mutex::new(None),
                timer: Mutex::new(None),
            }),
        }
    }

    /// Arm the repeating timer, replacing any previous one. The first pass
    /// runs immediately, then once per interval.
    pub fn start(&self) {
        let scheduler = self.clone();
        let interval = self.inner.interval;

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                log::info!("Scheduled status check triggered");
                // Failures are logged per-scan inside run_once.
                let _ = scheduler.run_once().await;
            }
        });

        let mut timer = self.inner.timer.lock().unwrap();
        if let Some(previous) = timer.replace(handle) {
            previous.abort();
            log::info!("Replaced an already-running status check timer");
        }

        log::info!("Status check timer started, running every {:?}", interval);
    }

    /// Cancel the timer; calling while already stopped is a no-op.
    pub fn stop(&self) {
        let mut timer = self.inner.timer.lock().unwrap();
        match timer.take() {
            Some(handle) => {
                handle.abort();
                log::info!("Status check timer stopped");
            }
            None => log::info!("No active status check timer to stop"),
        }
    }

    /// One combined pass: both scans run concurrently and a failure in one
    /// never stops the other. Each failure is logged here; the first error is
    /// also returned for callers that have to surface it.
    pub async fn run_once(&self) -> Result<()> {
        let _guard = self.inner.scan_lock.lock().await;

        let (deliveries, rides) = tokio::join!(
            check_delivery_status(&self.inner.db, &self.inner.notifier),
            check_ride_status(&self.inner.db, &self.inner.notifier),
        );

        if let Err(e) = &deliveries {
            log::error!("Delivery status check failed: {:#}", e);
        }
        if let Err(e) = &rides {
            log::error!("Ride status check failed: {:#}", e);
        }

        deliveries?;
        rides?;
        Ok(())
    }

    /// Externally triggered entry point. Enforces one-interval spacing using
    /// the last-run timestamp; a call inside the window reports when the next
    /// check is due instead of re-running the scans.
    pub async fn run_on_demand(&self) -> Result<RunStatus> {
        let interval = chrono::Duration::from_std(self.inner.interval)?;
        let now = Utc::now();

        {
            let last_run = self.inner.last_run.lock().unwrap();
            if let Some(previous) = *last_run {
                let next_check = previous + interval;
                if now < next_check {
                    return Ok(RunStatus::OnSchedule { next_check });
                }
            }
        }

        self.run_once().await?;

        *self.inner.last_run.lock().unwrap() = Some(now);
        Ok(RunStatus::Completed {
            next_check: now + interval,
        })
    }
}
