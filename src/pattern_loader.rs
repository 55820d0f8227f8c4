//! Building timelines from the compact pattern notation of the `pattern` crate.

use crate::{Error, HoldSubtype, NoteTimeline, Row, TapNote, MAX_NOTE_ROW};
use pattern::{NoteType, Pattern};

/// Most tracks a pattern can be loaded into, enough for every play style
pub const MAX_KEYMODE: u32 = 16;

fn tap_note_for(note_type: NoteType) -> TapNote {
	match note_type {
		NoteType::Tap => TapNote::TAP,
		NoteType::Mine => TapNote::MINE,
		NoteType::Lift => TapNote::LIFT,
		NoteType::Fake => TapNote::FAKE,
		NoteType::Hold { .. } => TapNote::HOLD_HEAD,
		NoteType::Roll { .. } => TapNote::ROLL_HEAD,
	}
}

fn steps_to_rows(steps: usize, rows_per_step: Row) -> Result<Row, Error> {
	let rows = (steps as u64) * (rows_per_step as u64);
	if rows > MAX_NOTE_ROW as u64 {
		return Err(Error::PatternTooLong { rows });
	}
	Ok(rows as Row)
}

impl NoteTimeline {
	/// Place a pattern at row 0 with `keymode` tracks, each pattern step taking `rows_per_step`
	/// rows. A hold of length n spans n steps, starting at its head.
	///
	/// Panics if `rows_per_step` isn't positive.
	pub fn from_pattern(
		pattern: &Pattern,
		keymode: u32,
		rows_per_step: Row,
	) -> Result<Self, Error> {
		assert!(
			rows_per_step > 0,
			"rows per step must be positive, got {}",
			rows_per_step
		);

		if pattern.num_notes() == 0 {
			return Err(Error::EmptyPattern);
		}
		if keymode > MAX_KEYMODE {
			return Err(Error::KeymodeTooLarge {
				keymode,
				limit: MAX_KEYMODE,
			});
		}

		// Validate all lanes up front so that an invalid lane doesn't leave half a timeline behind
		for (lane, _) in pattern.rows.iter().flat_map(|row| &row.notes) {
			let column = lane.column_number_with_keymode(keymode);
			if column >= keymode {
				return Err(Error::InvalidLaneForKeymode {
					human_readable_lane: column as usize + 1,
					keymode: keymode as usize,
				});
			}
		}

		let mut timeline = Self::new(keymode as usize);
		// Row order matters: a hold erases a note lying on its end row, but notes placed after it
		// are kept
		for (step, row) in pattern.rows.iter().enumerate() {
			let start = steps_to_rows(step, rows_per_step)?;
			for &(lane, note_type) in &row.notes {
				let track = lane.column_number_with_keymode(keymode) as usize;
				let note = tap_note_for(note_type);
				match note_type.length() {
					Some(length) => {
						let end = steps_to_rows(step + length as usize, rows_per_step)?;
						timeline.add_hold_note(track, start, end, note);
					}
					None => timeline.set(track, start, note),
				}
			}
		}

		log::debug!(
			"Loaded {}-step pattern into {} tracks, {} holds and {} rolls",
			pattern.rows.len(),
			keymode,
			timeline.count_hold_subtype(HoldSubtype::Hold),
			timeline.count_hold_subtype(HoldSubtype::Roll),
		);
		Ok(timeline)
	}

	/// Parse and place a pattern. Without an explicit keymode it's guessed from the pattern
	pub fn from_pattern_str(
		text: &str,
		keymode: Option<u32>,
		rows_per_step: Row,
	) -> Result<Self, Error> {
		let pattern = pattern::parse_pattern(text)?;
		let keymode = match keymode.or_else(|| pattern.keymode()) {
			Some(keymode) => keymode,
			None => return Err(Error::EmptyPattern),
		};
		Self::from_pattern(&pattern, keymode, rows_per_step)
	}

	fn count_hold_subtype(&self, subtype: HoldSubtype) -> usize {
		match subtype {
			HoldSubtype::Hold => self.num_hold_notes(0, MAX_NOTE_ROW),
			HoldSubtype::Roll => self.num_rolls(0, MAX_NOTE_ROW),
		}
	}
}
