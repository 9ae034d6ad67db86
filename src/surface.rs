use glam::Vec2;

use crate::math::transform::Color;

/// Circle in node-local coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
	pub x: f32,
	pub y: f32,
	pub radius: f32,
}

impl Circle {
	pub const fn new(x: f32, y: f32, radius: f32) -> Self {
		Self { x, y, radius }
	}

	pub fn contains(&self, point: Vec2) -> bool {
		Vec2::new(self.x, self.y).distance_squared(point) <= self.radius * self.radius
	}
}

/// A retained-mode vector canvas a placeholder model draws itself onto.
///
/// This is the whole contract between a model and the host renderer: the model issues primitive
/// shape calls in node-local space, and the host applies the model's transform when compositing.
/// Fill and line state persist until changed, the way immediate 2D canvases work.
pub trait Surface {
	type Error: std::error::Error + Send + Sync + 'static;

	/// Drop every shape drawn so far.
	fn clear(&mut self) -> Result<(), Self::Error>;

	/// Fill subsequent shapes with `color` at `alpha`.
	fn begin_fill(&mut self, color: Color, alpha: f32) -> Result<(), Self::Error>;
	/// Stop filling.
	fn end_fill(&mut self) -> Result<(), Self::Error>;
	/// Stroke subsequent paths.
	fn line_style(&mut self, width: f32, color: Color, alpha: f32) -> Result<(), Self::Error>;

	fn draw_circle(&mut self, circle: Circle) -> Result<(), Self::Error>;
	/// Angles in radians, clockwise from +X.
	fn arc(&mut self, center: Vec2, radius: f32, start_angle: f32, end_angle: f32) -> Result<(), Self::Error>;

	/// Region that receives pointer interaction.
	fn set_hit_area(&mut self, area: Circle);

	/// Release whatever the host allocated for this surface. Called exactly once.
	fn destroy(&mut self);
}

/// Primitive calls as recorded by [`RecordingSurface`].
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
	BeginFill {
		color: Color,
		alpha: f32,
	},
	EndFill,
	LineStyle {
		width: f32,
		color: Color,
		alpha: f32,
	},
	Circle(Circle),
	Arc {
		center: Vec2,
		radius: f32,
		start_angle: f32,
		end_angle: f32,
	},
}

#[derive(Debug, thiserror::Error)]
#[error("Surface has already been destroyed")]
pub struct SurfaceDestroyed;

/// Headless surface that keeps the draw calls it receives.
///
/// Useful as a display list for hosts that do their own tessellation, and for tests.
#[derive(Debug, Default)]
pub struct RecordingSurface {
	commands: Vec<DrawCommand>,
	hit_area: Option<Circle>,
	destroyed: bool,
}

impl RecordingSurface {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn commands(&self) -> &[DrawCommand] {
		&self.commands
	}

	pub fn circles(&self) -> impl Iterator<Item = &Circle> {
		self.commands.iter().filter_map(|cmd| match cmd {
			DrawCommand::Circle(circle) => Some(circle),
			_ => None,
		})
	}

	pub fn hit_area(&self) -> Option<Circle> {
		self.hit_area
	}

	pub fn is_destroyed(&self) -> bool {
		self.destroyed
	}

	fn record(&mut self, cmd: DrawCommand) -> Result<(), SurfaceDestroyed> {
		if self.destroyed {
			return Err(SurfaceDestroyed);
		}
		self.commands.push(cmd);
		Ok(())
	}
}

impl Surface for RecordingSurface {
	type Error = SurfaceDestroyed;

	fn clear(&mut self) -> Result<(), SurfaceDestroyed> {
		if self.destroyed {
			return Err(SurfaceDestroyed);
		}
		self.commands.clear();
		Ok(())
	}

	fn begin_fill(&mut self, color: Color, alpha: f32) -> Result<(), SurfaceDestroyed> {
		self.record(DrawCommand::BeginFill { color, alpha })
	}

	fn end_fill(&mut self) -> Result<(), SurfaceDestroyed> {
		self.record(DrawCommand::EndFill)
	}

	fn line_style(&mut self, width: f32, color: Color, alpha: f32) -> Result<(), SurfaceDestroyed> {
		self.record(DrawCommand::LineStyle { width, color, alpha })
	}

	fn draw_circle(&mut self, circle: Circle) -> Result<(), SurfaceDestroyed> {
		self.record(DrawCommand::Circle(circle))
	}

	fn arc(&mut self, center: Vec2, radius: f32, start_angle: f32, end_angle: f32) -> Result<(), SurfaceDestroyed> {
		self.record(DrawCommand::Arc {
			center,
			radius,
			start_angle,
			end_angle,
		})
	}

	fn set_hit_area(&mut self, area: Circle) {
		self.hit_area = Some(area);
	}

	fn destroy(&mut self) {
		self.commands.clear();
		self.hit_area = None;
		self.destroyed = true;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn clear_drops_recorded_shapes() {
		let mut surface = RecordingSurface::new();
		surface.begin_fill(0xff0000, 1.).unwrap();
		surface.draw_circle(Circle::new(0., 0., 1.)).unwrap();
		assert_eq!(surface.commands().len(), 2);

		surface.clear().unwrap();
		assert!(surface.commands().is_empty());
	}

	#[test]
	fn destroyed_surface_refuses_drawing() {
		let mut surface = RecordingSurface::new();
		surface.set_hit_area(Circle::new(0., 0., 5.));
		surface.destroy();

		assert!(surface.is_destroyed());
		assert!(surface.hit_area().is_none());
		assert!(surface.draw_circle(Circle::new(0., 0., 1.)).is_err());
		assert!(surface.clear().is_err());
	}

	#[test]
	fn circle_hit_test() {
		let body = Circle::new(0., 0., 70.);
		assert!(body.contains(Vec2::new(0., 0.)));
		assert!(body.contains(Vec2::new(70., 0.)));
		assert!(!body.contains(Vec2::new(50., 50.)));
	}
}
