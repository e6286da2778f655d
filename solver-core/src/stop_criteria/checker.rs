//! Background polling of stop criteria.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::listener::SearchInfo;
use crate::model::Problem;

use super::StopCriterion;

const DEFAULT_CHECK_PERIOD: Duration = Duration::from_secs(1);

/// Polls a search's attached stop criteria on a fixed period from a
/// dedicated background thread, and calls `stop()` on the search as soon as
/// one reports true.
///
/// Mirrors the stop criteria list and check period under its own lock so
/// `add_stop_criterion`/`remove_stop_criterion`/
/// `set_stop_criterion_check_period` can be called while a run is active.
pub struct StopCriterionChecker<P: Problem> {
    criteria: Arc<Mutex<Vec<Arc<dyn StopCriterion<P>>>>>,
    period: Arc<Mutex<Duration>>,
    handle: Mutex<Option<(JoinHandle<()>, mpsc::Sender<()>)>>,
}

impl<P: Problem + 'static> StopCriterionChecker<P> {
    /// Builds a checker with no criteria attached, at the default check
    /// period.
    pub fn new() -> Self {
        Self {
            criteria: Arc::new(Mutex::new(Vec::new())),
            period: Arc::new(Mutex::new(DEFAULT_CHECK_PERIOD)),
            handle: Mutex::new(None),
        }
    }

    /// Attaches a stop criterion.
    pub fn add_criterion(&self, criterion: Arc<dyn StopCriterion<P>>) {
        self.criteria.lock().unwrap().push(criterion);
    }

    /// Detaches every criterion pointer-equal to `criterion`.
    pub fn remove_criterion(&self, criterion: &Arc<dyn StopCriterion<P>>) {
        self.criteria
            .lock()
            .unwrap()
            .retain(|c| !Arc::ptr_eq(c, criterion));
    }

    /// Sets the polling period used from the next `start()` onward.
    pub fn set_check_period(&self, period: Duration) {
        *self.period.lock().unwrap() = period;
    }

    /// Starts the background polling thread for the duration of one run.
    ///
    /// `info` is a handle the poller reads to evaluate criteria; `on_stop`
    /// is invoked (off the caller's thread) the first time a criterion
    /// reports true.
    pub fn start<F>(&self, info: Arc<dyn SearchInfo<P> + Send + Sync>, on_stop: F)
    where
        F: Fn() + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<()>();
        let criteria = Arc::clone(&self.criteria);
        let period = Arc::clone(&self.period);

        let join = std::thread::spawn(move || loop {
            let wait = *period.lock().unwrap();
            match rx.recv_timeout(wait) {
                Ok(()) | Err(mpsc::RecvTimeoutError::Disconnected) => return,
                Err(mpsc::RecvTimeoutError::Timeout) => {}
            }
            let stop = criteria
                .lock()
                .unwrap()
                .iter()
                .any(|c| c.should_stop(info.as_ref()));
            if stop {
                on_stop();
                return;
            }
        });

        *self.handle.lock().unwrap() = Some((join, tx));
    }

    /// Stops the background polling thread, if running, and waits for it
    /// to exit.
    pub fn stop(&self) {
        if let Some((join, tx)) = self.handle.lock().unwrap().take() {
            let _ = tx.send(());
            let _ = join.join();
        }
    }
}

impl<P: Problem + 'static> Default for StopCriterionChecker<P> {
    fn default() -> Self {
        Self::new()
    }
}
