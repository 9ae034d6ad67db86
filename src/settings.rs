use std::collections::BTreeMap;
use std::fmt;

use json::JsonValue;

use crate::formats::json::{JsonError, JsonObject, JsonResult};

/// Version assumed when a settings document does not carry one.
pub const DEFAULT_SETTINGS_VERSION: f64 = 3.;

/// Which runtime a settings document targets. Both build the same placeholder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CubismGeneration {
	/// Settings version below 3 (`model.json`).
	Cubism2,
	/// Settings version 3 and up (`model3.json`).
	Cubism4,
}

impl CubismGeneration {
	pub fn from_version(version: f64) -> Self {
		if version >= 3. {
			CubismGeneration::Cubism4
		} else {
			CubismGeneration::Cubism2
		}
	}

	/// Name given to nodes built for this generation.
	pub fn model_name(self) -> &'static str {
		match self {
			CubismGeneration::Cubism2 => "Cubism2Model",
			CubismGeneration::Cubism4 => "Cubism4Model",
		}
	}
}

/// The `FileReferences` block of a settings document.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FileReferences {
	/// Path of the `.moc3` file. Only ever used as a display name.
	pub moc: Option<String>,
	/// Texture paths, relative to the settings document.
	pub textures: Vec<String>,
	/// Every other entry (`Physics`, `Pose`, `Expressions`, ...), kept as-is.
	pub others: BTreeMap<String, JsonValue>,
}

impl FileReferences {
	fn from_object(obj: JsonObject) -> JsonResult<Self> {
		let mut refs = FileReferences {
			moc: obj.get_str("Moc")?.map(str::to_owned),
			textures: obj.get_str_list("Textures")?.unwrap_or_default(),
			others: BTreeMap::new(),
		};

		for (key, value) in obj.iter() {
			if key != "Moc" && key != "Textures" {
				refs.others.insert(key.to_owned(), value.clone());
			}
		}

		Ok(refs)
	}

	pub fn is_empty(&self) -> bool {
		self.moc.is_none() && self.textures.is_empty() && self.others.is_empty()
	}
}

/// One entry of `Groups`, e.g. `{"Target": "Parameter", "Name": "EyeBlink", "Ids": [...]}`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Group {
	pub target: Option<String>,
	pub name: Option<String>,
	pub ids: Vec<String>,
}

impl Group {
	fn from_object(obj: JsonObject) -> JsonResult<Self> {
		Ok(Group {
			target: obj.get_str("Target")?.map(str::to_owned),
			name: obj.get_str("Name")?.map(str::to_owned),
			ids: obj.get_str_list("Ids")?.unwrap_or_default(),
		})
	}
}

/// Flattened view of a model settings document.
///
/// Immutable once built; the known fields are validated for type, everything else is
/// reachable through [`ModelSettings::json`].
#[derive(Clone, Debug)]
pub struct ModelSettings {
	/// Any JSON number. Compared against 3 to pick the generation.
	pub version: f64,
	pub file_references: FileReferences,
	pub groups: Vec<Group>,
	json: JsonValue,
}

impl ModelSettings {
	/// `Version` defaults to 3 when absent, `null`, `0` or NaN. Missing `FileReferences` and
	/// `Groups` read as empty.
	pub fn from_json(json: JsonValue) -> JsonResult<Self> {
		let obj = JsonObject::from_value("<root>", &json)?;

		let version = match obj.get_f64("Version")? {
			Some(version) if version != 0. && !version.is_nan() => version,
			_ => DEFAULT_SETTINGS_VERSION,
		};

		let file_references = match obj.get_object("FileReferences")? {
			Some(refs) => FileReferences::from_object(refs).map_err(|e| e.nested("FileReferences"))?,
			None => FileReferences::default(),
		};

		let groups = obj
			.get_list("Groups")?
			.unwrap_or_default()
			.iter()
			.enumerate()
			.map(|(i, val)| {
				JsonObject::from_value(&i.to_string(), val)
					.and_then(Group::from_object)
					.map_err(|e| e.in_list(i).nested("Groups"))
			})
			.collect::<JsonResult<Vec<_>>>()?;

		Ok(Self {
			version,
			file_references,
			groups,
			json,
		})
	}

	/// Settings of a bare model that only names its moc file, with no I/O involved.
	pub fn simple(moc: &str) -> Self {
		let mut json = JsonValue::new_object();
		json["FileReferences"]["Moc"] = moc.into();
		json["Version"] = DEFAULT_SETTINGS_VERSION.into();

		Self {
			version: DEFAULT_SETTINGS_VERSION,
			file_references: FileReferences {
				moc: Some(moc.to_owned()),
				..Default::default()
			},
			groups: Vec::new(),
			json,
		}
	}

	/// The document these settings were read from.
	pub fn json(&self) -> &JsonValue {
		&self.json
	}

	pub fn generation(&self) -> CubismGeneration {
		CubismGeneration::from_version(self.version)
	}

	/// Moc path for log lines.
	pub fn moc_name(&self) -> &str {
		self.file_references.moc.as_deref().unwrap_or("<no moc specified>")
	}

	pub fn group(&self, name: &str) -> Option<&Group> {
		self.groups.iter().find(|group| group.name.as_deref() == Some(name))
	}
}

impl fmt::Display for ModelSettings {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = self.moc_name();
		#[cfg(feature = "owo")]
		let name = {
			use owo_colors::OwoColorize;
			name.green()
		};
		writeln!(f, "{name} (settings v{})", self.version)?;
		for texture in &self.file_references.textures {
			writeln!(f, "  texture {texture}")?;
		}
		for group in &self.groups {
			writeln!(
				f,
				"  group {} [{}] {} ids",
				group.name.as_deref().unwrap_or("?"),
				group.target.as_deref().unwrap_or("?"),
				group.ids.len()
			)?;
		}
		Ok(())
	}
}

impl From<ModelSettings> for JsonValue {
	fn from(settings: ModelSettings) -> Self {
		settings.json
	}
}
