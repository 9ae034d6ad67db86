//! Timer tasks on a tokio runtime, owned through handles that cancel them.

use std::future::Future;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

/// Owned handle to a spawned timer task. The task is aborted when the handle is cancelled or
/// dropped, so whoever holds the handle controls the task's lifetime.
#[derive(Debug)]
pub struct TimerHandle {
	task: JoinHandle<()>,
}

impl TimerHandle {
	pub fn spawn<F>(runtime: &Handle, future: F) -> Self
	where
		F: Future<Output = ()> + Send + 'static,
	{
		Self {
			task: runtime.spawn(future),
		}
	}

	/// Calls `tick` every `period`, first after one full period.
	pub fn repeat<F>(runtime: &Handle, period: Duration, mut tick: F) -> Self
	where
		F: FnMut() + Send + 'static,
	{
		Self::spawn(runtime, async move {
			let mut interval = time::interval_at(Instant::now() + period, period);
			interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
			loop {
				interval.tick().await;
				tick();
			}
		})
	}

	/// Calls `fire` once after `delay`.
	pub fn after<F>(runtime: &Handle, delay: Duration, fire: F) -> Self
	where
		F: FnOnce() + Send + 'static,
	{
		Self::spawn(runtime, async move {
			time::sleep(delay).await;
			fire();
		})
	}

	/// Calls `step` with 1, 2, ... every `period` until it returns `false`. The first call
	/// happens after one period.
	pub fn frames<F>(runtime: &Handle, period: Duration, mut step: F) -> Self
	where
		F: FnMut(u32) -> bool + Send + 'static,
	{
		Self::spawn(runtime, async move {
			let mut interval = time::interval_at(Instant::now() + period, period);
			let mut frame = 0;
			loop {
				interval.tick().await;
				frame += 1;
				if !step(frame) {
					break;
				}
			}
		})
	}

	/// Whether the task ran to completion (or was aborted and reaped).
	pub fn is_finished(&self) -> bool {
		self.task.is_finished()
	}

	pub fn cancel(self) {
		drop(self);
	}
}

impl Drop for TimerHandle {
	fn drop(&mut self) {
		self.task.abort();
	}
}

#[cfg(test)]
mod tests {
	use std::sync::atomic::{AtomicU32, Ordering};
	use std::sync::Arc;

	use super::*;

	#[tokio::test(start_paused = true)]
	async fn repeat_ticks_until_cancelled() {
		let count = Arc::new(AtomicU32::new(0));
		let counter = count.clone();
		let timer = TimerHandle::repeat(&Handle::current(), Duration::from_millis(10), move || {
			counter.fetch_add(1, Ordering::SeqCst);
		});

		time::sleep(Duration::from_millis(55)).await;
		assert_eq!(count.load(Ordering::SeqCst), 5);

		timer.cancel();
		time::sleep(Duration::from_millis(100)).await;
		assert_eq!(count.load(Ordering::SeqCst), 5);
	}

	#[tokio::test(start_paused = true)]
	async fn after_fires_once() {
		let count = Arc::new(AtomicU32::new(0));
		let counter = count.clone();
		let timer = TimerHandle::after(&Handle::current(), Duration::from_millis(200), move || {
			counter.fetch_add(1, Ordering::SeqCst);
		});

		time::sleep(Duration::from_millis(199)).await;
		assert_eq!(count.load(Ordering::SeqCst), 0);
		time::sleep(Duration::from_millis(2)).await;
		assert_eq!(count.load(Ordering::SeqCst), 1);
		assert!(timer.is_finished());
	}

	#[tokio::test(start_paused = true)]
	async fn dropping_the_handle_cancels() {
		let count = Arc::new(AtomicU32::new(0));
		let counter = count.clone();
		drop(TimerHandle::after(&Handle::current(), Duration::from_millis(10), move || {
			counter.fetch_add(1, Ordering::SeqCst);
		}));

		time::sleep(Duration::from_millis(50)).await;
		assert_eq!(count.load(Ordering::SeqCst), 0);
	}

	#[tokio::test(start_paused = true)]
	async fn frames_stop_when_step_says_so() {
		let seen = Arc::new(AtomicU32::new(0));
		let last = seen.clone();
		let _timer = TimerHandle::frames(&Handle::current(), Duration::from_millis(16), move |frame| {
			last.store(frame, Ordering::SeqCst);
			frame < 4
		});

		time::sleep(Duration::from_millis(500)).await;
		assert_eq!(seen.load(Ordering::SeqCst), 4);
	}
}
