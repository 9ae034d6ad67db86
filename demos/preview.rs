use std::error::Error;
use std::time::Duration;

use clap::Parser;
use cubism_placeholder::{FromOptions, Live2DModel, Loader, LoaderConfig, RecordingSurface};
use tokio::time::{self, Instant};
use tracing::info;
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
	#[arg(help = "URL or path of a model3.json settings document")]
	source: String,
	#[arg(long, default_value_t = 3.0, help = "Seconds to keep the model breathing")]
	seconds: f32,
	#[arg(long, default_value = "f01", help = "Expression to apply (f01..f04)")]
	expression: String,
	#[arg(long, help = "Initial uniform scale")]
	scale: Option<f32>,
	#[arg(long, help = "Fetch and decode the model textures")]
	textures: bool,
	#[arg(long, help = "Request timeout in seconds, 0 to wait forever")]
	timeout: Option<u64>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
	let cli = Cli::parse();

	tracing_subscriber::registry()
		.with(fmt::layer())
		.with(LevelFilter::INFO)
		.init();

	let mut config = LoaderConfig::default();
	if let Some(secs) = cli.timeout {
		config.timeout = (secs > 0).then(|| Duration::from_secs(secs));
	}
	let loader = Loader::new(&config)?;

	let options = FromOptions {
		scale: cli.scale,
		load_textures: cli.textures,
		..Default::default()
	};
	let mut model = Live2DModel::from_with(&loader, cli.source.as_str(), &options, RecordingSurface::new()).await?;
	print!("{}", model.settings());
	info!(
		"Drew {} shapes, {} textures decoded",
		model.surface().commands().len(),
		model.textures().len()
	);

	model.set_expression(&cli.expression).play_motion("idle");

	let start = Instant::now();
	let mut ticker = time::interval(Duration::from_millis(250));
	while start.elapsed().as_secs_f32() < cli.seconds {
		ticker.tick().await;
		let t = model.transform();
		info!("scale {:.4} rotation {:.4} tint {:06x}", t.scale.x, t.rotation, t.tint);
	}

	model.play_motion("tap_body").play_motion("shake");
	time::sleep(Duration::from_millis(300)).await;
	let t = model.transform();
	info!("after tap and shake: scale {:.4} rotation {:.4}", t.scale.x, t.rotation);

	model.destroy();
	Ok(())
}
