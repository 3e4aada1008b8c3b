//! Periodic job runner.
//!
//! A [`PeriodicJob`] is ticked on a fixed period by a tokio task. The job's state lives behind
//! a mutex shared with the [`JobHandle`], so callers read it with
//! [`JobHandle::with_state`] and can [`subscribe`](JobHandle::subscribe) to be called after
//! every tick. Dropping the handle (or calling [`JobHandle::stop`]) cancels the timer.
//!
//! The first tick happens one full period after spawning, never immediately.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Work performed on every timer tick.
pub trait PeriodicJob: Send + 'static {
    /// Short name used in log lines.
    fn name(&self) -> &str;

    /// Advances the job by one step. `rng` is owned by the scheduler task.
    fn tick(&mut self, rng: &mut dyn RngCore);
}

type Subscriber<J> = Box<dyn Fn(&J) + Send>;

struct Shared<J> {
    job: Mutex<J>,
    subscribers: Mutex<Vec<Subscriber<J>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // A panicking subscriber must not wedge the job for everyone else.
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Spawns periodic jobs onto the current tokio runtime.
#[derive(Clone, Debug, Default)]
pub struct Scheduler {
    seed: Option<u64>,
}

impl Scheduler {
    /// Scheduler whose jobs draw randomness from the OS.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scheduler whose jobs use a deterministic random stream derived from `seed`.
    pub fn seeded(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }

    /// Starts ticking `job` every `period`.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime, or if `period` is zero.
    pub fn spawn<J: PeriodicJob>(&self, job: J, period: Duration) -> JobHandle<J> {
        let name = job.name().to_string();
        let shared = Arc::new(Shared {
            job: Mutex::new(job),
            subscribers: Mutex::new(Vec::new()),
        });
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let task_shared = Arc::clone(&shared);
        let task_name = name.clone();
        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            interval.tick().await;

            loop {
                interval.tick().await;
                {
                    let mut job = lock(&task_shared.job);
                    job.tick(&mut rng);
                    for subscriber in lock(&task_shared.subscribers).iter() {
                        subscriber(&job);
                    }
                }
                tracing::trace!("job {} ticked", task_name);
            }
        });

        tracing::debug!("started job {} every {:?}", name, period);
        JobHandle { name, shared, task }
    }
}

/// Owner of a running job. Dropping it stops the job.
pub struct JobHandle<J> {
    name: String,
    shared: Arc<Shared<J>>,
    task: JoinHandle<()>,
}

impl<J> JobHandle<J> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runs `f` against the current job state.
    ///
    /// Must not be called from inside a subscriber of the same job.
    pub fn with_state<R>(&self, f: impl FnOnce(&mut J) -> R) -> R {
        let mut job = lock(&self.shared.job);
        f(&mut job)
    }

    /// Registers `callback` to run after every tick with the updated state.
    pub fn subscribe(&self, callback: impl Fn(&J) + Send + 'static) {
        lock(&self.shared.subscribers).push(Box::new(callback));
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Cancels the timer. The last state stays readable through the handle.
    pub fn stop(&self) {
        if !self.task.is_finished() {
            tracing::debug!("stopping job {}", self.name);
        }
        self.task.abort();
    }
}

impl<J> Drop for JobHandle<J> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl<J> fmt::Debug for JobHandle<J> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JobHandle")
            .field("name", &self.name)
            .field("running", &self.is_running())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Counter {
        ticks: usize,
    }

    impl PeriodicJob for Counter {
        fn name(&self) -> &str {
            "counter"
        }

        fn tick(&mut self, _rng: &mut dyn RngCore) {
            self.ticks += 1;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_job_ticks_once_per_period() {
        let handle = Scheduler::seeded(1).spawn(Counter::default(), Duration::from_secs(5));

        tokio::time::sleep(Duration::from_millis(4_900)).await;
        assert_eq!(handle.with_state(|c| c.ticks), 0, "no tick before one period");

        tokio::time::sleep(Duration::from_millis(10_200)).await;
        assert_eq!(handle.with_state(|c| c.ticks), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscribers_see_every_tick() {
        let handle = Scheduler::seeded(2).spawn(Counter::default(), Duration::from_secs(1));
        let seen = Arc::new(AtomicUsize::new(0));
        let seen_clone = Arc::clone(&seen);
        handle.subscribe(move |counter| {
            seen_clone.store(counter.ticks, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(2_500)).await;

        assert_eq!(seen.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_freezes_state() {
        let handle = Scheduler::seeded(3).spawn(Counter::default(), Duration::from_secs(1));
        tokio::time::sleep(Duration::from_millis(1_500)).await;

        handle.stop();
        tokio::task::yield_now().await;
        tokio::time::sleep(Duration::from_secs(10)).await;

        assert_eq!(handle.with_state(|c| c.ticks), 1);
        assert!(!handle.is_running());
    }
}
