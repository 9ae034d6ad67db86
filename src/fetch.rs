//! Loading settings documents and texture files over HTTP or from disk.

use std::io;
use std::path::{Path, PathBuf};
use std::str::Utf8Error;
use std::sync::Arc;
use std::time::Duration;

use json::JsonValue;
use reqwest::{Client, Url};
use tracing::{debug, warn};

use crate::formats::json::JsonError;
use crate::settings::ModelSettings;
use crate::texture::ModelTexture;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
	#[error("Invalid model source: {0}")]
	InvalidSource(String),
	#[error("HTTP {status}: {url}")]
	HttpStatus { status: u16, url: String },
	#[error(transparent)]
	Http(#[from] reqwest::Error),
	#[error("Could not read {path:?}\n  - {source}")]
	Io { path: PathBuf, source: io::Error },
	#[error("Settings document is not UTF-8\n  - {0}")]
	Utf8(#[from] Utf8Error),
	#[error("Could not parse settings JSON\n  - {0}")]
	JsonParse(#[from] json::Error),
	#[error("Invalid model settings\n  - {0}")]
	Settings(#[from] JsonError),
	#[error("Could not load texture {path:?}\n  - {msg}")]
	Texture { path: String, msg: String },
}

/// Knobs for the HTTP client behind a [`Loader`].
#[derive(Clone, Debug)]
pub struct LoaderConfig {
	/// Upper bound for a whole request. `None` waits forever.
	pub timeout: Option<Duration>,
	pub user_agent: String,
	/// Honour `HTTP_PROXY` and friends.
	pub use_system_proxy: bool,
}

impl Default for LoaderConfig {
	fn default() -> Self {
		Self {
			timeout: Some(Duration::from_secs(30)),
			user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_owned(),
			use_system_proxy: true,
		}
	}
}

/// Where a location string points to.
#[derive(Debug, PartialEq)]
enum Location {
	Remote(Url),
	Local(PathBuf),
}

impl Location {
	/// `http(s)://` goes over the network, `file://` and anything that is not a URL is a path.
	fn parse(location: &str) -> Result<Self, LoadError> {
		match Url::parse(location) {
			Ok(url) => match url.scheme() {
				"http" | "https" => Ok(Location::Remote(url)),
				"file" => url
					.to_file_path()
					.map(Location::Local)
					.map_err(|_| LoadError::InvalidSource(format!("bad file URL {location:?}"))),
				// Windows drive letters parse as one-letter schemes
				scheme if scheme.len() == 1 => Ok(Location::Local(PathBuf::from(location))),
				scheme => Err(LoadError::InvalidSource(format!("unsupported URL scheme {scheme:?}"))),
			},
			Err(_) => Ok(Location::Local(PathBuf::from(location))),
		}
	}

	/// Resolves `relative` against the directory of this location.
	fn join(&self, relative: &str) -> Result<Self, LoadError> {
		match self {
			Location::Remote(url) => url
				.join(relative)
				.map(Location::Remote)
				.map_err(|e| LoadError::InvalidSource(format!("cannot resolve {relative:?} against {url}: {e}"))),
			Location::Local(path) => {
				let dir = path.parent().unwrap_or_else(|| Path::new(""));
				Ok(Location::Local(dir.join(relative)))
			}
		}
	}
}

/// Fetches settings documents and their textures.
#[derive(Clone, Debug)]
pub struct Loader {
	client: Client,
}

impl Loader {
	pub fn new(config: &LoaderConfig) -> Result<Self, LoadError> {
		let mut builder = Client::builder().user_agent(config.user_agent.as_str());
		if let Some(timeout) = config.timeout {
			builder = builder.timeout(timeout);
		}
		if !config.use_system_proxy {
			builder = builder.no_proxy();
		}

		Ok(Self {
			client: builder.build()?,
		})
	}

	async fn read(&self, location: &Location) -> Result<Vec<u8>, LoadError> {
		match location {
			Location::Remote(url) => {
				debug!("GET {url}");
				let res = self.client.get(url.clone()).send().await?;
				let status = res.status();
				if !status.is_success() {
					return Err(LoadError::HttpStatus {
						status: status.as_u16(),
						url: url.to_string(),
					});
				}
				Ok(res.bytes().await?.to_vec())
			}
			Location::Local(path) => {
				debug!("Reading {}", path.display());
				tokio::fs::read(path).await.map_err(|source| LoadError::Io {
					path: path.clone(),
					source,
				})
			}
		}
	}

	/// Raw bytes behind a URL or path.
	pub async fn load_bytes(&self, location: &str) -> Result<Vec<u8>, LoadError> {
		self.read(&Location::parse(location)?).await
	}

	/// Fetches and parses a JSON document.
	pub async fn load_json(&self, location: &str) -> Result<JsonValue, LoadError> {
		let data = self.load_bytes(location).await?;
		let text = std::str::from_utf8(&data)?;
		Ok(json::parse(text)?)
	}

	pub async fn load_settings(&self, location: &str) -> Result<ModelSettings, LoadError> {
		let json = self.load_json(location).await?;
		Ok(ModelSettings::from_json(json)?)
	}

	/// Fetches every texture named by `settings`, resolved against `base` (the settings
	/// document's own location). Without a base, texture paths are used as given.
	pub async fn load_textures(&self, settings: &ModelSettings, base: Option<&str>) -> Result<Vec<ModelTexture>, LoadError> {
		let base = base.map(Location::parse).transpose()?;
		let mut textures = Vec::with_capacity(settings.file_references.textures.len());

		for path in &settings.file_references.textures {
			let format = image::ImageFormat::from_path(path).map_err(|e| LoadError::Texture {
				path: path.clone(),
				msg: e.to_string(),
			})?;
			let location = match &base {
				Some(base) => base.join(path)?,
				None => Location::parse(path)?,
			};

			let data = match self.read(&location).await {
				Ok(data) => data,
				Err(e) => {
					warn!("Texture {path:?} failed to load");
					return Err(LoadError::Texture {
						path: path.clone(),
						msg: e.to_string(),
					});
				}
			};

			textures.push(ModelTexture {
				path: path.clone(),
				format,
				data: Arc::from(data),
			});
		}

		Ok(textures)
	}
}
