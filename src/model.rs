pub mod character;
pub mod expression;
pub mod motion;

use glam::Vec2;
use tokio::runtime::Handle;
use tracing::{debug, info};

use crate::math::transform::{Color, NodeTransform, SharedTransform};
use crate::settings::{CubismGeneration, ModelSettings};
use crate::surface::Surface;
use crate::texture::{decode_model_textures, ModelTexture, ShallowTexture};
use crate::timer::TimerHandle;

pub use expression::{Expression, ExpressionPreset};
pub use motion::Motion;

#[derive(Debug, thiserror::Error)]
pub enum RenderSetupError {
	#[error("No tokio runtime to drive the model's timers")]
	NoRuntime,
	#[error("Drawing surface failed\n  - {0}")]
	Surface(Box<dyn std::error::Error + Send + Sync>),
}

impl RenderSetupError {
	fn surface<E: std::error::Error + Send + Sync + 'static>(err: E) -> Self {
		Self::Surface(Box::new(err))
	}
}

/// Pointer behaviour a host should give the model's hit area.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Interaction {
	pub interactive: bool,
	pub pointer_cursor: bool,
}

/// Mock Live2D character: a procedurally drawn face with canned motions and expressions.
///
/// Timers run on the tokio runtime the model was created in and only touch the model's
/// [`SharedTransform`]. Every timer is cancelled when the model is destroyed or dropped.
pub struct PlaceholderModel<S: Surface> {
	name: &'static str,
	settings: ModelSettings,
	transform: SharedTransform,
	surface: S,
	runtime: Handle,
	/// At most one breathing loop at a time.
	breathing: Option<TimerHandle>,
	/// Tap restores and shakes still in flight.
	animations: Vec<TimerHandle>,
	/// Held for hosts that upload them. The placeholder drawing never samples them.
	textures: Vec<ShallowTexture>,
	interaction: Interaction,
	destroyed: bool,
}

impl<S: Surface> PlaceholderModel<S> {
	/// Must be called from within a tokio runtime.
	pub fn new(settings: ModelSettings, surface: S) -> Result<Self, RenderSetupError> {
		let runtime = Handle::try_current().map_err(|_| RenderSetupError::NoRuntime)?;
		let name = settings.generation().model_name();
		info!("[{name}] Creating model: {}", settings.moc_name());

		Ok(Self {
			name,
			settings,
			transform: SharedTransform::default(),
			surface,
			runtime,
			breathing: None,
			animations: Vec::new(),
			textures: Vec::new(),
			interaction: Interaction::default(),
			destroyed: false,
		})
	}

	/// Decodes `textures`, draws the character and makes it interactive.
	pub fn load(&mut self, textures: &[ModelTexture]) -> Result<(), RenderSetupError> {
		debug!("[{}] Loading model resources", self.name);

		for path in &self.settings.file_references.textures {
			debug!("[{}] Texture reference: {path}", self.name);
		}
		if !textures.is_empty() {
			self.textures = decode_model_textures(textures);
			debug!("[{}] Decoded {} of {} textures", self.name, self.textures.len(), textures.len());
		}

		self.draw()?;
		self.interaction = Interaction {
			interactive: true,
			pointer_cursor: true,
		};

		info!("[{}] Model loaded", self.name);
		Ok(())
	}

	/// Clears the surface and draws the character again. Same shapes on every call.
	pub fn draw(&mut self) -> Result<(), RenderSetupError> {
		character::draw_character(&mut self.surface).map_err(RenderSetupError::surface)
	}

	/// Plays the motion called `name`. Unknown names are ignored.
	pub fn play_motion(&mut self, name: &str) -> &mut Self {
		match Motion::from_name(name) {
			Some(motion) => self.play(motion),
			None => {
				debug!("[{}] Ignoring unknown motion {name:?}", self.name);
				self
			}
		}
	}

	pub fn play(&mut self, motion: Motion) -> &mut Self {
		info!("[{}] Playing motion: {}", self.name, motion.name());

		match motion {
			Motion::Idle => {
				if let Some(previous) = self.breathing.take() {
					previous.cancel();
				}
				self.breathing = Some(motion::start_breathing(&self.runtime, self.transform.clone()));
			}
			Motion::TapBody => {
				let timer = motion::play_tap(&self.runtime, self.transform.clone());
				self.track(timer);
			}
			Motion::Shake => {
				let timer = motion::play_shake(&self.runtime, self.transform.clone());
				self.track(timer);
			}
		}

		self
	}

	fn track(&mut self, timer: TimerHandle) {
		self.animations.retain(|t| !t.is_finished());
		self.animations.push(timer);
	}

	/// Tints the model after the expression called `name`, falling back to `f01` for unknown
	/// names.
	pub fn set_expression(&mut self, name: &str) -> &mut Self {
		let expression = Expression::from_name(name).unwrap_or_else(|| {
			debug!("[{}] Unknown expression {name:?}, using the default", self.name);
			Expression::default()
		});
		self.apply_expression(expression)
	}

	pub fn apply_expression(&mut self, expression: Expression) -> &mut Self {
		info!("[{}] Switching expression: {}", self.name, expression.name());
		self.set_tint(expression.preset().color);
		self
	}

	/// Current transform, for the host to composite the surface with.
	pub fn transform(&self) -> NodeTransform {
		self.transform.get()
	}

	/// The transform the model's timers write to. Stays valid after the model is gone.
	pub fn transform_handle(&self) -> SharedTransform {
		self.transform.clone()
	}

	pub fn set_scale(&mut self, scale: f32) {
		self.transform.update(|t| t.set_uniform_scale(scale));
	}

	pub fn set_position(&mut self, position: Vec2) {
		self.transform.update(|t| t.position = position);
	}

	pub fn set_x(&mut self, x: f32) {
		self.transform.update(|t| t.position.x = x);
	}

	pub fn set_y(&mut self, y: f32) {
		self.transform.update(|t| t.position.y = y);
	}

	pub fn set_rotation(&mut self, rotation: f32) {
		self.transform.update(|t| t.rotation = rotation);
	}

	pub fn set_tint(&mut self, tint: Color) {
		self.transform.update(|t| t.tint = tint);
	}

	/// Number of breathing loops currently running, 0 or 1.
	pub fn active_timers(&self) -> usize {
		self.breathing.iter().filter(|t| !t.is_finished()).count()
	}

	pub fn name(&self) -> &'static str {
		self.name
	}

	pub fn generation(&self) -> CubismGeneration {
		self.settings.generation()
	}

	pub fn settings(&self) -> &ModelSettings {
		&self.settings
	}

	pub fn surface(&self) -> &S {
		&self.surface
	}

	pub fn textures(&self) -> &[ShallowTexture] {
		&self.textures
	}

	pub fn interaction(&self) -> Interaction {
		self.interaction
	}

	/// Stops every timer, then releases the surface.
	pub fn destroy(self) {
		// teardown runs in Drop
		drop(self);
	}

	fn teardown(&mut self) {
		if self.destroyed {
			return;
		}
		self.destroyed = true;

		if let Some(breathing) = self.breathing.take() {
			breathing.cancel();
		}
		self.animations.clear();
		self.surface.destroy();

		info!("[{}] Model destroyed", self.name);
	}
}

impl<S: Surface> Drop for PlaceholderModel<S> {
	fn drop(&mut self) {
		self.teardown();
	}
}

#[cfg(test)]
mod tests {
	use std::time::Duration;

	use tokio::time;

	use super::*;
	use crate::surface::{RecordingSurface, SurfaceDestroyed};

	fn model() -> PlaceholderModel<RecordingSurface> {
		let mut model = PlaceholderModel::new(ModelSettings::simple("test.moc3"), RecordingSurface::new()).unwrap();
		model.load(&[]).unwrap();
		model
	}

	#[test]
	fn needs_a_runtime() {
		let result = PlaceholderModel::new(ModelSettings::simple("test.moc3"), RecordingSurface::new());
		assert!(matches!(result, Err(RenderSetupError::NoRuntime)));
	}

	#[tokio::test]
	async fn load_draws_and_enables_interaction() {
		let model = model();

		assert_eq!(model.name(), "Cubism4Model");
		assert_eq!(model.surface().circles().count(), 7);
		assert_eq!(model.surface().hit_area(), Some(character::BODY));
		assert_eq!(
			model.interaction(),
			Interaction {
				interactive: true,
				pointer_cursor: true
			}
		);
	}

	#[tokio::test]
	async fn draw_is_idempotent() {
		let mut model = model();
		let first = model.surface().commands().to_vec();

		model.draw().unwrap();
		model.draw().unwrap();
		assert_eq!(model.surface().commands(), first.as_slice());
	}

	#[tokio::test]
	async fn surface_errors_surface_as_setup_errors() {
		let mut surface = RecordingSurface::new();
		surface.destroy();
		let mut model = PlaceholderModel::new(ModelSettings::simple("test.moc3"), surface).unwrap();

		match model.load(&[]) {
			Err(RenderSetupError::Surface(err)) => assert!(err.downcast_ref::<SurfaceDestroyed>().is_some()),
			other => panic!("expected a surface error, got {other:?}"),
		}
	}

	#[tokio::test(start_paused = true)]
	async fn idle_breathes_within_band() {
		let mut model = model();
		model.set_scale(5.);
		model.play_motion("idle");

		for _ in 0..20 {
			time::sleep(Duration::from_millis(37)).await;
			let scale = model.transform().scale;
			assert_eq!(scale.x, scale.y);
			assert!((0.97..=1.03).contains(&scale.x), "scale {} out of band", scale.x);
		}
	}

	#[tokio::test(start_paused = true)]
	async fn idle_restarts_instead_of_stacking() {
		let mut model = model();
		assert_eq!(model.active_timers(), 0);

		model.play_motion("idle").play_motion("idle").play(Motion::Idle);
		time::sleep(Duration::from_millis(50)).await;
		assert_eq!(model.active_timers(), 1);
	}

	#[tokio::test(start_paused = true)]
	async fn destroy_stops_breathing() {
		let mut model = model();
		let transform = model.transform_handle();
		model.play_motion("idle");
		time::sleep(Duration::from_millis(50)).await;

		model.destroy();
		transform.update(|t| t.set_uniform_scale(5.));
		time::sleep(Duration::from_millis(500)).await;

		assert_eq!(transform.get().scale, Vec2::splat(5.));
	}

	#[tokio::test]
	async fn destroy_without_timers_is_fine() {
		let model = model();
		model.destroy();
	}

	#[tokio::test(start_paused = true)]
	async fn tap_squashes_then_restores() {
		let mut model = model();
		model.set_scale(2.);

		model.play_motion("tap_body");
		assert!((model.transform().scale.x - 1.8).abs() < 1e-6);

		time::sleep(Duration::from_millis(250)).await;
		assert_eq!(model.transform().scale, Vec2::splat(2.));
	}

	#[tokio::test(start_paused = true)]
	async fn shake_returns_to_the_original_rotation() {
		let mut model = model();
		model.set_rotation(0.5);

		model.play_motion("shake");
		assert!((model.transform().rotation - (0.5 + motion::shake_offset(1))).abs() < 1e-6);

		time::sleep(Duration::from_millis(300)).await;
		assert_eq!(model.transform().rotation, 0.5);
	}

	#[tokio::test(start_paused = true)]
	async fn pending_animations_die_with_the_model() {
		let mut model = model();
		let transform = model.transform_handle();
		model.set_scale(2.);
		model.play_motion("tap_body");

		model.destroy();
		time::sleep(Duration::from_millis(250)).await;
		assert!((transform.get().scale.x - 1.8).abs() < 1e-6);
	}

	#[tokio::test]
	async fn unknown_motion_is_ignored() {
		let mut model = model();
		let before = model.transform();

		model.play_motion("backflip");
		assert_eq!(model.transform(), before);
		assert_eq!(model.active_timers(), 0);
	}

	#[tokio::test]
	async fn unknown_expression_matches_f01() {
		let mut model = model();

		model.set_expression("f01");
		let smile = model.transform().tint;
		model.set_expression("f03");
		assert_ne!(model.transform().tint, smile);

		model.set_expression("unknown-name");
		assert_eq!(model.transform().tint, smile);
	}
}
