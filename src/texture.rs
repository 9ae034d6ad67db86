use std::sync::Arc;

use image::{ImageBuffer, ImageFormat, Rgba};
use rayon::prelude::{IntoParallelRefIterator, ParallelIterator};
use tracing::error;

/// Encoded texture file as fetched, before decoding.
#[derive(Clone, Debug)]
pub struct ModelTexture {
	/// Path as written in the settings document.
	pub path: String,
	pub format: ImageFormat,
	pub data: Arc<[u8]>,
}

/// Decoded RGBA8 texture.
pub struct ShallowTexture {
	pixels: Vec<u8>,
	width: u32,
	height: u32,
}

impl ShallowTexture {
	pub fn pixels(&self) -> &[u8] {
		&self.pixels
	}

	pub fn width(&self) -> u32 {
		self.width
	}

	pub fn height(&self) -> u32 {
		self.height
	}
}

impl From<ImageBuffer<Rgba<u8>, Vec<u8>>> for ShallowTexture {
	fn from(value: ImageBuffer<Rgba<u8>, Vec<u8>>) -> Self {
		Self {
			width: value.width(),
			height: value.height(),
			pixels: value.into_raw(),
		}
	}
}

/// Decodes textures in parallel. Textures that fail to decode are logged and skipped.
pub fn decode_model_textures(model_textures: &[ModelTexture]) -> Vec<ShallowTexture> {
	model_textures
		.par_iter()
		.filter_map(|mtex| match image::load_from_memory_with_format(&mtex.data, mtex.format) {
			Ok(img_buf) => Some(ShallowTexture::from(img_buf.into_rgba8())),
			Err(e) => {
				error!("Could not decode texture {:?}: {}", mtex.path, e);
				None
			}
		})
		.collect::<Vec<_>>()
}
