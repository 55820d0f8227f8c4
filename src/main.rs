#![allow(clippy::len_zero, clippy::tabs_in_doc_comments)]

//! Load a pattern into a note timeline and print its statistics as JSON.
//!
//! Usage: `notedata <pattern>...`, e.g. `notedata "[12]3[24]1x4"`. Multiple arguments are joined.

mod config;

use anyhow::Context as _;
use notedata::NoteTimeline;
use rand::SeedableRng as _;

fn main() -> anyhow::Result<()> {
	if let Err(e) = dotenvy::dotenv() {
		// A missing .env is fine, a broken one is not
		if !e.not_found() {
			return Err(e).context("Couldn't load .env");
		}
	}
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	let config = config::Config::load()?;
	log::debug!("Running with {:?}", config);

	let pattern = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
	if pattern.trim().is_empty() {
		anyhow::bail!("Usage: notedata <pattern>");
	}

	let mut timeline =
		NoteTimeline::from_pattern_str(&pattern, config.keymode, config.rows_per_step)
			.context("Couldn't load pattern")?;
	log::info!(
		"Loaded pattern with {} notes on {} tracks",
		timeline.all_tracks(0, notedata::MAX_NOTE_ROW).count(),
		timeline.num_tracks()
	);

	let num_tracks = timeline.num_tracks();
	if config.mirror {
		timeline = NoteTimeline::load_transformed(
			&timeline,
			num_tracks,
			&notedata::mirror_mapping(num_tracks),
		);
	}
	if let Some(seed) = config.shuffle_seed {
		let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
		let mapping = notedata::shuffle_mapping(num_tracks, &mut rng);
		log::info!("Shuffled tracks with {:?}", mapping);
		timeline = NoteTimeline::load_transformed(&timeline, num_tracks, &mapping);
	}

	let stats = timeline.row_stats();
	println!("{}", serde_json::to_string_pretty(&stats)?);
	if config.dump_notes {
		println!("{}", serde_json::to_string_pretty(&timeline)?);
	}

	Ok(())
}
