//! The procedural face every placeholder model draws.

use std::f32::consts::PI;

use glam::Vec2;

use crate::math::transform::{Color, WHITE};
use crate::surface::{Circle, Surface};

pub const BODY: Circle = Circle::new(0., 0., 70.);
pub const BODY_COLOR: Color = 0xff6b9d;

const EYES: [Circle; 2] = [Circle::new(-25., -20., 12.), Circle::new(25., -20., 12.)];
const PUPILS: [Circle; 2] = [Circle::new(-25., -20., 5.), Circle::new(25., -20., 5.)];
const PUPIL_COLOR: Color = 0x333333;
const CHEEKS: [Circle; 2] = [Circle::new(-40., 10., 15.), Circle::new(40., 10., 15.)];
const BLUSH_COLOR: Color = 0xff9999;

const MOUTH_CENTER: Vec2 = Vec2::new(0., 20.);
const MOUTH_RADIUS: f32 = 25.;
const MOUTH_WIDTH: f32 = 5.;

/// Clears `surface` and draws body, eyes, pupils, mouth and cheeks, then sets the hit area to
/// the body. Always issues the same calls, whatever the node's transform.
pub fn draw_character<S: Surface>(surface: &mut S) -> Result<(), S::Error> {
	surface.clear()?;

	surface.begin_fill(BODY_COLOR, 0.95)?;
	surface.draw_circle(BODY)?;
	surface.end_fill()?;

	surface.begin_fill(WHITE, 0.9)?;
	for eye in EYES {
		surface.draw_circle(eye)?;
	}
	surface.end_fill()?;

	surface.begin_fill(PUPIL_COLOR, 0.8)?;
	for pupil in PUPILS {
		surface.draw_circle(pupil)?;
	}
	surface.end_fill()?;

	surface.line_style(MOUTH_WIDTH, WHITE, 0.8)?;
	surface.arc(MOUTH_CENTER, MOUTH_RADIUS, 0.2, 0.8 * PI)?;

	surface.begin_fill(BLUSH_COLOR, 0.3)?;
	for cheek in CHEEKS {
		surface.draw_circle(cheek)?;
	}
	surface.end_fill()?;

	surface.set_hit_area(BODY);
	Ok(())
}
