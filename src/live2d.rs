//! Entry point mirroring the `Live2DModel.from(source, options)` loader API.

use std::fmt;

use glam::Vec2;
use json::JsonValue;
use tracing::{error, info};

use crate::fetch::{LoadError, Loader, LoaderConfig};
use crate::model::{PlaceholderModel, RenderSetupError};
use crate::settings::ModelSettings;
use crate::surface::Surface;

/// Where settings come from.
#[derive(Clone, Debug)]
pub enum ModelSource {
	/// `http(s)://` URL, `file://` URL or filesystem path of a settings document.
	Url(String),
	/// An already parsed settings document. Must be a JSON object.
	Json(JsonValue),
}

impl From<&str> for ModelSource {
	fn from(url: &str) -> Self {
		ModelSource::Url(url.to_owned())
	}
}

impl From<String> for ModelSource {
	fn from(url: String) -> Self {
		ModelSource::Url(url)
	}
}

impl From<JsonValue> for ModelSource {
	fn from(json: JsonValue) -> Self {
		ModelSource::Json(json)
	}
}

impl fmt::Display for ModelSource {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ModelSource::Url(url) => write!(f, "{url}"),
			ModelSource::Json(_) => write!(f, "<inline settings>"),
		}
	}
}

fn json_kind(json: &JsonValue) -> &'static str {
	match json {
		JsonValue::Null => "null",
		JsonValue::Short(_) | JsonValue::String(_) => "a string",
		JsonValue::Number(_) => "a number",
		JsonValue::Boolean(_) => "a bool",
		JsonValue::Object(_) => "an object",
		JsonValue::Array(_) => "a list",
	}
}

/// Initial placement applied after the model is built.
#[derive(Clone, Debug, Default)]
pub struct FromOptions {
	/// Uniform scale. `Some(0.)` is ignored like an absent scale.
	pub scale: Option<f32>,
	pub x: Option<f32>,
	pub y: Option<f32>,
	/// Fetch and decode the textures named by the settings.
	pub load_textures: bool,
}

impl FromOptions {
	pub fn at(position: Vec2) -> Self {
		Self {
			x: Some(position.x),
			y: Some(position.y),
			..Default::default()
		}
	}

	pub fn with_scale(mut self, scale: f32) -> Self {
		self.scale = Some(scale);
		self
	}

	fn apply<S: Surface>(&self, model: &mut PlaceholderModel<S>) {
		if let Some(scale) = self.scale.filter(|scale| *scale != 0.) {
			model.set_scale(scale);
		}
		if let Some(x) = self.x {
			model.set_x(x);
		}
		if let Some(y) = self.y {
			model.set_y(y);
		}
	}
}

#[derive(Debug, thiserror::Error)]
pub enum FromError {
	#[error(transparent)]
	Load(#[from] LoadError),
	#[error(transparent)]
	RenderSetup(#[from] RenderSetupError),
}

/// Loader front door. See [`Live2DModel::from`].
pub struct Live2DModel;

impl Live2DModel {
	/// Resolves `source` into settings, builds a placeholder model drawn on `surface`, and
	/// applies `options`. Uses a [`Loader`] with the default [`LoaderConfig`].
	///
	/// Every call builds its own HTTP client. Callers loading many models should keep one
	/// [`Loader`] and go through [`Live2DModel::from_with`].
	///
	/// Fails with [`LoadError::InvalidSource`] when `source` is JSON but not an object.
	pub async fn from<S: Surface>(
		source: impl Into<ModelSource>,
		options: &FromOptions,
		surface: S,
	) -> Result<PlaceholderModel<S>, FromError> {
		let loader = Loader::new(&LoaderConfig::default())?;
		Self::from_with(&loader, source, options, surface).await
	}

	/// [`Live2DModel::from`] with a caller-provided loader.
	pub async fn from_with<S: Surface>(
		loader: &Loader,
		source: impl Into<ModelSource>,
		options: &FromOptions,
		surface: S,
	) -> Result<PlaceholderModel<S>, FromError> {
		let source = source.into();
		info!("[Live2DModel] Loading: {source}");

		let result = Self::build(loader, source, options, surface).await;
		match &result {
			Ok(model) => info!("[Live2DModel] Loaded: {}", model.settings().moc_name()),
			Err(e) => error!("[Live2DModel] Load failed: {e}"),
		}
		result
	}

	async fn build<S: Surface>(
		loader: &Loader,
		source: ModelSource,
		options: &FromOptions,
		surface: S,
	) -> Result<PlaceholderModel<S>, FromError> {
		let (settings, base) = match source {
			ModelSource::Url(url) => (loader.load_settings(&url).await?, Some(url)),
			ModelSource::Json(json) if json.is_object() => {
				(ModelSettings::from_json(json).map_err(LoadError::from)?, None)
			}
			ModelSource::Json(json) => {
				return Err(LoadError::InvalidSource(format!("expected a URL or an object, got {}", json_kind(&json))).into())
			}
		};

		let textures = if options.load_textures {
			loader.load_textures(&settings, base.as_deref()).await?
		} else {
			Vec::new()
		};

		let mut model = PlaceholderModel::new(settings, surface)?;
		model.load(&textures)?;
		options.apply(&mut model);
		Ok(model)
	}
}

/// Shortcuts for common cases.
pub mod utils {
	use super::*;
	use crate::math::transform::Color;

	/// `Live2DModel::from(url)` with default options.
	pub async fn load_model<S: Surface>(url: &str, surface: S) -> Result<PlaceholderModel<S>, FromError> {
		Live2DModel::from(url, &FromOptions::default(), surface).await
	}

	/// A drawn model tinted `color`, without any settings document.
	pub fn create_simple_model<S: Surface>(surface: S, color: Color) -> Result<PlaceholderModel<S>, RenderSetupError> {
		let mut model = PlaceholderModel::new(ModelSettings::simple("simple-model"), surface)?;
		model.draw()?;
		model.set_tint(color);
		Ok(model)
	}
}

#[cfg(test)]
mod tests {
	use super::utils::create_simple_model;
	use super::*;
	use crate::fetch::tests::{serve_once, test_loader};
	use crate::model::character::BODY;
	use crate::settings::CubismGeneration;
	use crate::surface::RecordingSurface;

	fn parse(src: &str) -> JsonValue {
		json::parse(src).unwrap()
	}

	#[tokio::test]
	async fn inline_settings_with_placement() {
		let options = FromOptions::at(Vec2::new(10., 20.)).with_scale(2.);
		let model = Live2DModel::from_with(
			&test_loader(),
			parse(r#"{"FileReferences": {"Moc": "x"}}"#),
			&options,
			RecordingSurface::new(),
		)
		.await
		.unwrap();

		let transform = model.transform();
		assert_eq!(transform.scale, Vec2::splat(2.));
		assert_eq!(transform.position, Vec2::new(10., 20.));
		// scale is a transform, the drawing stays in local units
		assert_eq!(model.surface().circles().next(), Some(&BODY));
		assert_eq!(model.settings().moc_name(), "x");
	}

	#[tokio::test]
	async fn zero_scale_is_ignored() {
		let options = FromOptions {
			scale: Some(0.),
			..Default::default()
		};
		let model = Live2DModel::from_with(&test_loader(), parse("{}"), &options, RecordingSurface::new())
			.await
			.unwrap();

		assert_eq!(model.transform().scale, Vec2::ONE);
	}

	#[tokio::test]
	async fn non_object_json_is_an_invalid_source() {
		for src in ["42", "\"model3.json\"", "[]", "null"] {
			let result = Live2DModel::from_with(
				&test_loader(),
				parse(src),
				&FromOptions::default(),
				RecordingSurface::new(),
			)
			.await;
			assert!(
				matches!(result, Err(FromError::Load(LoadError::InvalidSource(_)))),
				"{src} was accepted"
			);
		}
	}

	#[tokio::test]
	async fn old_settings_build_a_cubism2_model() {
		let model = Live2DModel::from_with(
			&test_loader(),
			parse(r#"{"Version": 2}"#),
			&FromOptions::default(),
			RecordingSurface::new(),
		)
		.await
		.unwrap();

		assert_eq!(model.generation(), CubismGeneration::Cubism2);
		assert_eq!(model.name(), "Cubism2Model");
	}

	#[tokio::test]
	async fn loads_from_url() {
		let url = serve_once("200 OK", r#"{"FileReferences": {"Moc": "remote.moc3"}, "Groups": []}"#).await;

		let model = Live2DModel::from_with(&test_loader(), url, &FromOptions::default(), RecordingSurface::new())
			.await
			.unwrap();
		assert_eq!(model.settings().moc_name(), "remote.moc3");
		assert!(model.interaction().interactive);
	}

	#[tokio::test]
	async fn http_failure_yields_no_model() {
		let url = serve_once("500 Internal Server Error", "").await;

		let result = Live2DModel::from_with(&test_loader(), url, &FromOptions::default(), RecordingSurface::new()).await;
		assert!(matches!(
			result,
			Err(FromError::Load(LoadError::HttpStatus { status: 500, .. }))
		));
	}

	#[tokio::test]
	async fn missing_texture_fails_the_load() {
		let options = FromOptions {
			load_textures: true,
			..Default::default()
		};
		let result = Live2DModel::from_with(
			&test_loader(),
			parse(r#"{"FileReferences": {"Textures": ["/nonexistent/cubism-placeholder/texture_00.png"]}}"#),
			&options,
			RecordingSurface::new(),
		)
		.await;

		assert!(matches!(result, Err(FromError::Load(LoadError::Texture { .. }))));
	}

	#[tokio::test]
	async fn textures_load_relative_to_the_settings_file() {
		use std::io::Cursor;

		use image::{ImageBuffer, ImageFormat, Rgba};

		let dir = std::env::temp_dir().join(format!("cubism-placeholder-tex-{}", std::process::id()));
		std::fs::create_dir_all(dir.join("tex")).unwrap();

		let img = ImageBuffer::from_pixel(4, 2, Rgba([255_u8, 107, 157, 255]));
		let mut png = Vec::new();
		img.write_to(&mut Cursor::new(&mut png), ImageFormat::Png).unwrap();
		std::fs::write(dir.join("tex/texture_00.png"), png).unwrap();

		let settings_path = dir.join("model3.json");
		std::fs::write(
			&settings_path,
			r#"{"Version": 3, "FileReferences": {"Moc": "tex.moc3", "Textures": ["tex/texture_00.png"]}}"#,
		)
		.unwrap();

		let options = FromOptions {
			load_textures: true,
			..Default::default()
		};
		let result = Live2DModel::from_with(
			&test_loader(),
			settings_path.to_str().unwrap(),
			&options,
			RecordingSurface::new(),
		)
		.await;
		std::fs::remove_dir_all(&dir).unwrap();

		let model = result.unwrap();
		assert_eq!(model.textures().len(), 1);
		assert_eq!(model.textures()[0].width(), 4);
		assert_eq!(model.textures()[0].height(), 2);
		assert_eq!(model.textures()[0].pixels().len(), 4 * 2 * 4);
	}

	#[tokio::test]
	async fn simple_model_is_drawn_and_tinted() {
		let model = create_simple_model(RecordingSurface::new(), 0x6b9dff).unwrap();

		assert_eq!(model.transform().tint, 0x6b9dff);
		assert_eq!(model.surface().circles().count(), 7);
		assert_eq!(model.settings().moc_name(), "simple-model");
	}
}
