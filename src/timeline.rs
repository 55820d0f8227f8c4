//! The track store: one sparse ordered map from row to note per track.

use crate::{Row, TapNote, MAX_NOTE_ROW};
use std::collections::BTreeMap;

pub type TrackMap = BTreeMap<Row, TapNote>;

/// The notes of one chart, organized by
/// - track: one column of notes on the screen
/// - row: quantized subdivision of beats
///
/// Rows without an entry are empty, and the timeline pretends to go on with empty rows forever.
/// Holds are stored as a single head entry that carries the hold duration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteTimeline {
	// Private so that every write goes through `set`, which never stores an empty note
	tracks: Vec<TrackMap>,
}

impl NoteTimeline {
	/// Panics if `num_tracks` is zero
	pub fn new(num_tracks: usize) -> Self {
		let mut timeline = Self { tracks: Vec::new() };
		timeline.set_num_tracks(num_tracks);
		timeline
	}

	pub fn num_tracks(&self) -> usize {
		self.tracks.len()
	}

	/// Tracks beyond the new count are dropped with their notes, new tracks start out empty.
	pub fn set_num_tracks(&mut self, num_tracks: usize) {
		assert!(num_tracks > 0, "a timeline needs at least one track");
		self.tracks.resize_with(num_tracks, TrackMap::new);
	}

	pub(crate) fn assert_track(&self, track: usize) {
		assert!(
			track < self.num_tracks(),
			"track {} out of range for {} tracks",
			track,
			self.num_tracks()
		);
	}

	/// Read-only view of a single track.
	pub fn track(&self, track: usize) -> &TrackMap {
		self.assert_track(track);
		&self.tracks[track]
	}

	pub(crate) fn track_mut(&mut self, track: usize) -> &mut TrackMap {
		self.assert_track(track);
		&mut self.tracks[track]
	}

	pub(crate) fn take_track(&mut self, track: usize) -> TrackMap {
		std::mem::take(self.track_mut(track))
	}

	pub(crate) fn replace_track(&mut self, track: usize, notes: TrackMap) {
		*self.track_mut(track) = notes;
	}

	/// The note at the given spot. Rows outside of the stored data, including negative ones,
	/// are empty.
	pub fn get(&self, track: usize, row: Row) -> TapNote {
		self.track(track)
			.get(&row)
			.copied()
			.unwrap_or(TapNote::EMPTY)
	}

	/// Store a note. Setting an empty note erases whatever is at that spot. Rows outside
	/// `[0, MAX_NOTE_ROW)` are silently ignored.
	pub fn set(&mut self, track: usize, row: Row, note: TapNote) {
		self.assert_track(track);

		if !(0..MAX_NOTE_ROW).contains(&row) {
			log::trace!("Ignoring write of {:?} to out-of-range row {}", note.kind, row);
			return;
		}

		// There's no point in inserting empty notes into the map. Any blank space in the map
		// is defined to be empty
		if note.is_empty() {
			self.tracks[track].remove(&row);
		} else {
			self.tracks[track].insert(row, note);
		}
	}

	/// Move all notes of `src` into `dest`, leaving `src` empty. Whatever was on `dest` is lost.
	pub fn move_track(&mut self, dest: usize, src: usize) {
		if dest == src {
			return;
		}
		let notes = self.take_track(src);
		self.replace_track(dest, notes);
	}

	pub fn swap_tracks(&mut self, a: usize, b: usize) {
		self.assert_track(a);
		self.assert_track(b);
		self.tracks.swap(a, b);
	}

	/// Entries of one track with a row in `[start, end)`.
	pub fn track_range(
		&self,
		track: usize,
		start: Row,
		end: Row,
	) -> std::collections::btree_map::Range<'_, Row, TapNote> {
		assert_range(start, end);
		self.track(track).range(start..end)
	}

	/// Row of the first entry after `row` on the given track
	pub fn next_row_for_track(&self, track: usize, row: Row) -> Option<Row> {
		if row >= MAX_NOTE_ROW {
			return None;
		}
		self.track(track)
			.range(row + 1..)
			.next()
			.map(|(&row, _)| row)
	}

	/// Row of the last entry before `row` on the given track
	pub fn prev_row_for_track(&self, track: usize, row: Row) -> Option<Row> {
		self.track(track)
			.range(..row)
			.next_back()
			.map(|(&row, _)| row)
	}

	/// Closest row after `row` that has an entry on any track
	pub fn next_row_all_tracks(&self, row: Row) -> Option<Row> {
		(0..self.num_tracks())
			.filter_map(|track| self.next_row_for_track(track, row))
			.min()
	}

	/// Closest row before `row` that has an entry on any track
	pub fn prev_row_all_tracks(&self, row: Row) -> Option<Row> {
		(0..self.num_tracks())
			.filter_map(|track| self.prev_row_for_track(track, row))
			.max()
	}
}

/// Row ranges are half-open; an inverted one is a caller bug.
pub(crate) fn assert_range(start: Row, end: Row) {
	assert!(start <= end, "invalid row range [{}, {})", start, end);
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::NoteKind;

	#[test]
	fn test_set_and_get() {
		let mut nd = NoteTimeline::new(4);
		nd.set(2, 48, TapNote::TAP);
		assert_eq!(nd.get(2, 48), TapNote::TAP);
		assert_eq!(nd.get(2, 47), TapNote::EMPTY);
		assert_eq!(nd.get(2, -5), TapNote::EMPTY);
		assert_eq!(nd.get(2, MAX_NOTE_ROW + 7), TapNote::EMPTY);
		assert_eq!(nd.get(2, Row::MAX), TapNote::EMPTY);

		nd.set(2, 48, TapNote::EMPTY);
		assert_eq!(nd.get(2, 48), TapNote::EMPTY);
		assert!(nd.track(2).is_empty());
	}

	#[test]
	fn test_out_of_range_rows_are_ignored() {
		let mut nd = NoteTimeline::new(4);
		nd.set(0, -1, TapNote::TAP);
		nd.set(0, MAX_NOTE_ROW, TapNote::TAP);
		nd.set(0, MAX_NOTE_ROW + 5, TapNote::MINE);
		assert!(nd.track(0).is_empty());

		nd.set(0, MAX_NOTE_ROW - 1, TapNote::TAP);
		assert_eq!(nd.get(0, MAX_NOTE_ROW - 1), TapNote::TAP);
	}

	#[test]
	#[should_panic]
	fn test_track_out_of_range() {
		let mut nd = NoteTimeline::new(4);
		nd.set(4, 0, TapNote::TAP);
	}

	#[test]
	fn test_resize() {
		let mut nd = NoteTimeline::new(6);
		nd.set(5, 0, TapNote::MINE);
		nd.set(1, 0, TapNote::TAP);
		nd.set_num_tracks(4);
		assert_eq!(nd.num_tracks(), 4);
		nd.set_num_tracks(6);
		assert_eq!(nd.get(5, 0), TapNote::EMPTY);
		assert_eq!(nd.get(1, 0), TapNote::TAP);
	}

	#[test]
	fn test_move_and_swap() {
		let mut nd = NoteTimeline::new(4);
		nd.set(0, 10, TapNote::TAP);
		nd.set(1, 20, TapNote::MINE);

		nd.move_track(3, 0);
		assert!(nd.track(0).is_empty());
		assert_eq!(nd.get(3, 10), TapNote::TAP);

		nd.swap_tracks(1, 3);
		assert_eq!(nd.get(1, 10), TapNote::TAP);
		assert_eq!(nd.get(3, 20).kind, NoteKind::Mine);

		// moving onto itself keeps the notes
		nd.move_track(1, 1);
		assert_eq!(nd.get(1, 10), TapNote::TAP);
	}

	#[test]
	fn test_neighbour_rows() {
		let mut nd = NoteTimeline::new(3);
		nd.set(0, 12, TapNote::TAP);
		nd.set(2, 24, TapNote::TAP);
		nd.set(1, 36, TapNote::TAP);

		assert_eq!(nd.next_row_for_track(0, 0), Some(12));
		assert_eq!(nd.next_row_for_track(0, 12), None);
		assert_eq!(nd.prev_row_for_track(0, 12), None);
		assert_eq!(nd.prev_row_for_track(0, 13), Some(12));

		assert_eq!(nd.next_row_all_tracks(12), Some(24));
		assert_eq!(nd.next_row_all_tracks(36), None);
		assert_eq!(nd.prev_row_all_tracks(36), Some(24));
		assert_eq!(nd.prev_row_all_tracks(12), None);
	}
}
