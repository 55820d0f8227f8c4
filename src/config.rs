use anyhow::Context as _;
use serde::{Deserialize, Serialize};
use std::path::Path;

static DEFAULT_CONFIG_PATH: &str = "notedata.json";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
	/// None means guess from the pattern
	pub keymode: Option<u32>,
	pub rows_per_step: notedata::Row,
	pub mirror: bool,
	/// Shuffle the tracks with this seed
	pub shuffle_seed: Option<u64>,
	/// Print every note in addition to the statistics
	pub dump_notes: bool,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			keymode: None,
			// 16ths at 48 rows per beat
			rows_per_step: 12,
			mirror: false,
			shuffle_seed: None,
			dump_notes: false,
		}
	}
}

impl Config {
	/// Read the JSON config file, falling back to defaults if there is none, then apply
	/// overrides from the environment
	pub fn load() -> anyhow::Result<Self> {
		let config_path =
			std::env::var("NOTEDATA_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_owned());
		let config_path = Path::new(&config_path);

		let mut config: Self = if config_path.exists() {
			let config_contents = std::fs::read_to_string(config_path)
				.with_context(|| format!("Couldn't read config file {}", config_path.display()))?;
			serde_json::from_str(&config_contents)
				.with_context(|| format!("Config file {} had invalid format", config_path.display()))?
		} else {
			log::debug!("No config at {}, using defaults", config_path.display());
			Self::default()
		};

		if let Ok(keymode) = std::env::var("NOTEDATA_KEYMODE") {
			config.keymode = Some(keymode.parse().context("Invalid NOTEDATA_KEYMODE")?);
		}
		if let Ok(rows_per_step) = std::env::var("NOTEDATA_ROWS_PER_STEP") {
			config.rows_per_step = rows_per_step
				.parse()
				.context("Invalid NOTEDATA_ROWS_PER_STEP")?;
		}
		if config.rows_per_step <= 0 {
			anyhow::bail!("rows_per_step must be positive, got {}", config.rows_per_step);
		}

		Ok(config)
	}
}
