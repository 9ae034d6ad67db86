use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio::runtime::Handle;

use crate::math::transform::SharedTransform;
use crate::timer::TimerHandle;

/// Breathing update rate, about 60 Hz.
pub const BREATHING_PERIOD: Duration = Duration::from_millis(16);
/// Breathing scale stays within `1 ± BREATHING_AMPLITUDE`.
pub const BREATHING_AMPLITUDE: f32 = 0.03;
/// Radians of breathing phase per millisecond.
const BREATHING_RATE: f64 = 0.002;

pub const TAP_SQUASH: f32 = 0.9;
pub const TAP_RESTORE_DELAY: Duration = Duration::from_millis(200);

/// Frames in a shake, the last of which restores the rotation.
pub const SHAKE_FRAMES: u32 = 8;
const SHAKE_FRAME_PERIOD: Duration = Duration::from_millis(16);
const SHAKE_AMPLITUDE: f32 = 0.3;

/// Canned animations a placeholder model can play.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Motion {
	/// Endless breathing: uniform scale follows a sine of wall-clock time.
	Idle,
	/// Squash to 90%, spring back after 200 ms.
	TapBody,
	/// Eight frames of head shaking around the current rotation.
	Shake,
}

impl Motion {
	pub const VALUES: [Motion; 3] = [Motion::Idle, Motion::TapBody, Motion::Shake];

	/// `None` for names outside `idle`, `tap_body` and `shake`.
	pub fn from_name(name: &str) -> Option<Self> {
		Self::VALUES.into_iter().find(|motion| motion.name() == name)
	}

	pub fn name(self) -> &'static str {
		match self {
			Motion::Idle => "idle",
			Motion::TapBody => "tap_body",
			Motion::Shake => "shake",
		}
	}
}

pub fn breathing_scale(now_ms: f64) -> f32 {
	1. + (now_ms * BREATHING_RATE).sin() as f32 * BREATHING_AMPLITUDE
}

/// Rotation offset of shake frame `frame` (1-based).
pub fn shake_offset(frame: u32) -> f32 {
	(frame as f32 * 3.).sin() * SHAKE_AMPLITUDE
}

fn wall_clock_ms() -> f64 {
	SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.unwrap_or_default()
		.as_secs_f64()
		* 1000.
}

pub(super) fn start_breathing(runtime: &Handle, transform: SharedTransform) -> TimerHandle {
	TimerHandle::repeat(runtime, BREATHING_PERIOD, move || {
		let scale = breathing_scale(wall_clock_ms());
		transform.update(|t| t.set_uniform_scale(scale));
	})
}

/// Squashes right away and returns the timer that restores the pre-tap scale.
///
/// Overlapping taps each restore the scale they saw, so the last restore can bring back an
/// already-squashed value.
pub(super) fn play_tap(runtime: &Handle, transform: SharedTransform) -> TimerHandle {
	let original = transform.update(|t| {
		let original = t.scale.x;
		t.set_uniform_scale(original * TAP_SQUASH);
		original
	});

	TimerHandle::after(runtime, TAP_RESTORE_DELAY, move || {
		transform.update(|t| t.set_uniform_scale(original));
	})
}

/// Runs frame 1 right away and returns the timer driving the remaining frames.
pub(super) fn play_shake(runtime: &Handle, transform: SharedTransform) -> TimerHandle {
	let original = transform.update(|t| {
		let original = t.rotation;
		t.rotation = original + shake_offset(1);
		original
	});

	TimerHandle::frames(runtime, SHAKE_FRAME_PERIOD, move |tick| {
		let frame = tick + 1;
		transform.update(|t| {
			t.rotation = if frame < SHAKE_FRAMES {
				original + shake_offset(frame)
			} else {
				original
			};
		});
		frame < SHAKE_FRAMES
	})
}
