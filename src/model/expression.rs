use crate::math::transform::Color;

use super::character::BODY_COLOR;

/// Named mood presets. Each one only changes the model's tint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Expression {
	/// `f01`
	#[default]
	Smile,
	/// `f02`
	Sad,
	/// `f03`
	Angry,
	/// `f04`
	Surprised,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExpressionPreset {
	pub color: Color,
	/// How far the mouth opens. Carried for parity with real expression files; nothing reads it.
	pub mouth: f32,
}

impl Expression {
	pub const VALUES: [Expression; 4] = [
		Expression::Smile,
		Expression::Sad,
		Expression::Angry,
		Expression::Surprised,
	];

	/// `None` for names outside `f01`..`f04`.
	pub fn from_name(name: &str) -> Option<Self> {
		Self::VALUES.into_iter().find(|expr| expr.name() == name)
	}

	pub fn name(self) -> &'static str {
		match self {
			Expression::Smile => "f01",
			Expression::Sad => "f02",
			Expression::Angry => "f03",
			Expression::Surprised => "f04",
		}
	}

	pub fn preset(self) -> ExpressionPreset {
		match self {
			Expression::Smile => ExpressionPreset {
				color: BODY_COLOR,
				mouth: 0.7,
			},
			Expression::Sad => ExpressionPreset {
				color: 0x6b9dff,
				mouth: 0.4,
			},
			Expression::Angry => ExpressionPreset {
				color: 0xff3333,
				mouth: 0.9,
			},
			Expression::Surprised => ExpressionPreset {
				color: 0xffff66,
				mouth: 1.0,
			},
		}
	}
}
