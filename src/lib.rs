#![allow(clippy::len_zero, clippy::tabs_in_doc_comments)]

//! Storage and editing of the notes of a rhythm game chart.
//!
//! A [`NoteTimeline`] holds a fixed number of tracks, each a sparse ordered map from [`Row`] to
//! [`TapNote`]. On top of that sit hold merging ([`NoteTimeline::add_hold_note`]), range
//! transforms (clearing, copying, remapping tracks), chronological iteration over all tracks at
//! once, and chart statistics.

mod note;
pub use note::*;

mod timeline;
pub use timeline::{NoteTimeline, TrackMap};

mod hold;

mod iter;
pub use iter::{AllTracksIter, Direction, Inclusion, RangeEdit};

mod transform;
pub use transform::{mirror_mapping, shuffle_mapping};

mod stats;
pub use stats::{RowStats, HAND_PRESSES, JUMP_PRESSES};

mod scoring;
pub use scoring::{HoldNoteScore, ScoredTimeline, TapNoteScore};

mod serialize;
pub use serialize::{NoteEntry, TimelineDump};

mod pattern_loader;
pub use pattern_loader::MAX_KEYMODE;

pub use pattern;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Pattern doesn't contain any notes")]
	EmptyPattern,
	#[error("{keymode}k is more than the {limit} tracks a chart can have")]
	KeymodeTooLarge { keymode: u32, limit: u32 },
	#[error("Lane {human_readable_lane} is invalid in {keymode}k")]
	InvalidLaneForKeymode {
		human_readable_lane: usize,
		keymode: usize,
	},
	#[error("Pattern would span {rows} rows, which is more than a chart can hold")]
	PatternTooLong { rows: u64 },
	#[error("Note on track {track} out of range for {num_tracks} tracks")]
	TrackOutOfRange { track: usize, num_tracks: usize },
	#[error("Note on negative row {row}")]
	NegativeRow { row: Row },
	#[error("Note on row {row}, past the last row a chart can hold")]
	RowTooLarge { row: Row },
	#[error("Hold at row {row} has negative duration {duration}")]
	NegativeDuration { row: Row, duration: Row },
	#[error("A timeline needs at least one track")]
	ZeroTracks,
	#[error("Invalid pattern: {0}")]
	Pattern(#[from] pattern::Error),
}
