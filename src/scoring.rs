//! Judgments for the notes of a timeline, kept next to the notes instead of inside them so the
//! plain timeline stays usable for editing.

use crate::{NoteTimeline, Row};
use itertools::Itertools as _;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Judgment of a single tap, from worst to best. Mines get their own two outcomes
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TapNoteScore {
	/// Not judged yet
	None,
	HitMine,
	AvoidMine,
	Miss,
	Boo,
	Good,
	Great,
	Perfect,
	Marvelous,
}

impl Default for TapNoteScore {
	fn default() -> Self {
		Self::None
	}
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoldNoteScore {
	/// Not judged yet
	None,
	/// Released too early
	LetGo,
	Held,
}

impl Default for HoldNoteScore {
	fn default() -> Self {
		Self::None
	}
}

/// A timeline plus the judgments made while playing it. Judgments are keyed by the note they
/// belong to; a hold is identified by its head. The notes can't be edited through this, because
/// the judgments would go stale.
#[derive(Debug, Clone)]
pub struct ScoredTimeline {
	notes: NoteTimeline,
	tap_scores: HashMap<(usize, Row), TapNoteScore>,
	hold_scores: HashMap<(usize, Row), HoldNoteScore>,
	hold_life: HashMap<(usize, Row), f32>,
}

impl ScoredTimeline {
	pub fn new(notes: NoteTimeline) -> Self {
		Self {
			notes,
			tap_scores: HashMap::new(),
			hold_scores: HashMap::new(),
			hold_life: HashMap::new(),
		}
	}

	pub fn notes(&self) -> &NoteTimeline {
		&self.notes
	}

	/// Drop the judgments and get the notes back for editing
	pub fn into_notes(self) -> NoteTimeline {
		self.notes
	}

	fn assert_note(&self, track: usize, row: Row) {
		assert!(
			!self.notes.get(track, row).is_empty(),
			"no note to judge at track {} row {}",
			track,
			row
		);
	}

	fn assert_hold(&self, track: usize, row: Row) {
		assert!(
			self.notes.get(track, row).is_hold_head(),
			"no hold starts at track {} row {}",
			track,
			row
		);
	}

	pub fn tap_note_score(&self, track: usize, row: Row) -> TapNoteScore {
		self.tap_scores
			.get(&(track, row))
			.copied()
			.unwrap_or_default()
	}

	/// Panics if there's no note at the given spot
	pub fn set_tap_note_score(&mut self, track: usize, row: Row, score: TapNoteScore) {
		self.assert_note(track, row);
		self.tap_scores.insert((track, row), score);
	}

	pub fn hold_note_score(&self, track: usize, head_row: Row) -> HoldNoteScore {
		self.hold_scores
			.get(&(track, head_row))
			.copied()
			.unwrap_or_default()
	}

	/// Panics if no hold starts at the given spot
	pub fn set_hold_note_score(&mut self, track: usize, head_row: Row, score: HoldNoteScore) {
		self.assert_hold(track, head_row);
		self.hold_scores.insert((track, head_row), score);
	}

	/// 1.0 means the hold has full life, 0.0 means it's dead. Holds start out at full life
	pub fn hold_note_life(&self, track: usize, head_row: Row) -> f32 {
		self.hold_life
			.get(&(track, head_row))
			.copied()
			.unwrap_or(1.0)
	}

	/// Values outside `0.0..=1.0` are clamped. Panics if no hold starts at the given spot
	pub fn set_hold_note_life(&mut self, track: usize, head_row: Row, life: f32) {
		self.assert_hold(track, head_row);
		self.hold_life
			.insert((track, head_row), life.max(0.0).min(1.0));
	}

	/// Presses in `[start, end)` judged with exactly `score`
	pub fn num_tap_notes_with_score(&self, score: TapNoteScore, start: Row, end: Row) -> usize {
		self.notes
			.all_tracks(start, end)
			.filter(|&(track, row, note)| {
				note.is_press() && self.tap_note_score(track, row) == score
			})
			.count()
	}

	/// Rows in `[start, end)` with at least two presses, where even the worst judgment on the row
	/// is `score` or better
	pub fn num_doubles_with_score(&self, score: TapNoteScore, start: Row, end: Row) -> usize {
		self.notes
			.all_tracks(start, end)
			.filter(|(_, _, note)| note.is_press())
			.group_by(|&(_, row, _)| row)
			.into_iter()
			.map(|(_, presses)| {
				presses
					.map(|(track, row, _)| self.tap_note_score(track, row))
					.collect::<Vec<_>>()
			})
			.filter(|judgments| {
				judgments.len() >= 2 && judgments.iter().all(|&judgment| judgment >= score)
			})
			.count()
	}

	/// Holds and rolls with a head in `[start, end)` judged with exactly `score`
	pub fn num_hold_notes_with_score(&self, score: HoldNoteScore, start: Row, end: Row) -> usize {
		self.notes
			.all_tracks(start, end)
			.filter(|&(track, row, note)| {
				note.is_hold_head() && self.hold_note_score(track, row) == score
			})
			.count()
	}

	/// Whether every press on the row has been hit. A miss or a missing judgment leaves the row
	/// incomplete; rows without presses are always complete
	pub fn is_row_complete(&self, row: Row) -> bool {
		(0..self.notes.num_tracks())
			.filter(|&track| self.notes.get(track, row).is_press())
			.all(|track| self.tap_note_score(track, row) >= TapNoteScore::Boo)
	}

	/// Forget all judgments, e.g. when restarting a song
	pub fn reset(&mut self) {
		self.tap_scores.clear();
		self.hold_scores.clear();
		self.hold_life.clear();
	}
}

impl From<NoteTimeline> for ScoredTimeline {
	fn from(notes: NoteTimeline) -> Self {
		Self::new(notes)
	}
}
