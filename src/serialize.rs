//! Flat, self-describing representation of a timeline for storage and for the inspector.

use crate::{Error, NoteTimeline, Row, TapNote, MAX_NOTE_ROW};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteEntry {
	pub track: usize,
	pub row: Row,
	pub note: TapNote,
}

/// All notes of a timeline in row order, ties ordered by track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineDump {
	pub num_tracks: usize,
	pub notes: Vec<NoteEntry>,
}

impl From<&NoteTimeline> for TimelineDump {
	fn from(timeline: &NoteTimeline) -> Self {
		Self {
			num_tracks: timeline.num_tracks(),
			notes: timeline
				.all_tracks(0, MAX_NOTE_ROW)
				.map(|(track, row, &note)| NoteEntry { track, row, note })
				.collect(),
		}
	}
}

impl std::convert::TryFrom<TimelineDump> for NoteTimeline {
	type Error = Error;

	fn try_from(dump: TimelineDump) -> Result<Self, Self::Error> {
		if dump.num_tracks == 0 {
			return Err(Error::ZeroTracks);
		}

		let mut timeline = NoteTimeline::new(dump.num_tracks);
		for NoteEntry { track, row, note } in dump.notes {
			if track >= dump.num_tracks {
				return Err(Error::TrackOutOfRange {
					track,
					num_tracks: dump.num_tracks,
				});
			}
			if row < 0 {
				return Err(Error::NegativeRow { row });
			}
			if row >= MAX_NOTE_ROW {
				return Err(Error::RowTooLarge { row });
			}
			if note.duration() < 0 {
				return Err(Error::NegativeDuration {
					row,
					duration: note.duration(),
				});
			}

			// Holds from outside might overlap, so give them the same treatment as freshly
			// inserted ones
			if note.is_hold_head() {
				let end = row.saturating_add(note.duration());
				timeline.add_hold_note(track, row, end, note);
			} else {
				timeline.set(track, row, note);
			}
		}
		Ok(timeline)
	}
}

impl Serialize for NoteTimeline {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		TimelineDump::from(self).serialize(serializer)
	}
}

impl<'de> Deserialize<'de> for NoteTimeline {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		use std::convert::TryFrom as _;

		let dump = TimelineDump::deserialize(deserializer)?;
		NoteTimeline::try_from(dump).map_err(serde::de::Error::custom)
	}
}
