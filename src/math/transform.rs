use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use glam::{Mat4, Vec2, Vec3};

/// Packed `0xRRGGBB` colour.
pub type Color = u32;

pub const WHITE: Color = 0xffffff;

/// Splits a packed colour into normalized RGB.
pub fn color_to_rgb(color: Color) -> Vec3 {
	Vec3::new(
		((color >> 16) & 0xff) as f32 / 255.,
		((color >> 8) & 0xff) as f32 / 255.,
		(color & 0xff) as f32 / 255.,
	)
}

/// What the host reads off a node every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeTransform {
	/// X Y
	pub position: Vec2,
	/// Radians, around the node origin
	pub rotation: f32,
	/// X Y zoom
	pub scale: Vec2,
	/// Multiplied into every drawn colour
	pub tint: Color,
}

impl Default for NodeTransform {
	fn default() -> Self {
		Self {
			position: Vec2::ZERO,
			rotation: 0.,
			scale: Vec2::ONE,
			tint: WHITE,
		}
	}
}

impl NodeTransform {
	pub fn set_uniform_scale(&mut self, scale: f32) {
		self.scale = Vec2::splat(scale);
	}

	pub fn tint_rgb(&self) -> Vec3 {
		color_to_rgb(self.tint)
	}

	pub fn to_matrix(&self) -> Mat4 {
		Mat4::from_translation(self.position.extend(0.))
			* Mat4::from_rotation_z(self.rotation)
			* Mat4::from_scale(Vec3::new(self.scale.x, self.scale.y, 1.))
	}
}

/// A [`NodeTransform`] shared between a node and the timers animating it.
#[derive(Debug, Clone, Default)]
pub struct SharedTransform(Arc<Mutex<NodeTransform>>);

impl SharedTransform {
	fn lock(&self) -> MutexGuard<'_, NodeTransform> {
		// the transform is plain data, a panicking writer cannot leave it half-updated
		self.0.lock().unwrap_or_else(PoisonError::into_inner)
	}

	/// Snapshot of the current values.
	pub fn get(&self) -> NodeTransform {
		*self.lock()
	}

	pub fn update<R>(&self, f: impl FnOnce(&mut NodeTransform) -> R) -> R {
		f(&mut *self.lock())
	}
}
