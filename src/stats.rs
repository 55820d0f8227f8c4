//! Read-only counts and queries. Nothing in here mutates, so calling any of these twice gives the
//! same answer.

use crate::{HoldSubtype, NoteKind, NoteTimeline, Row, TapNote, MAX_NOTE_ROW};
use itertools::Itertools as _;
use serde::Serialize;

/// Rows needing at least this many simultaneous presses count as jumps
pub const JUMP_PRESSES: usize = 2;
/// Rows needing at least this many simultaneous presses count as hands
pub const HAND_PRESSES: usize = 3;

/// Overview of a chart, as shown on song select screens
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowStats {
	pub num_tracks: usize,
	pub first_row: Option<Row>,
	pub last_row: Option<Row>,
	pub taps: usize,
	pub holds: usize,
	pub rolls: usize,
	pub mines: usize,
	pub lifts: usize,
	pub fakes: usize,
	pub jumps: usize,
	pub hands: usize,
}

impl NoteTimeline {
	fn count_notes(&self, start: Row, end: Row, mut pred: impl FnMut(&TapNote) -> bool) -> usize {
		self.all_tracks(start, end)
			.filter(|&(_, _, note)| pred(note))
			.count()
	}

	/// Distinct rows in `[start, end)` that have at least one note
	fn occupied_rows(&self, start: Row, end: Row) -> impl Iterator<Item = Row> + '_ {
		self.all_tracks(start, end).map(|(_, row, _)| row).dedup()
	}

	/// Notes that need a press: taps, lifts, hold heads and attacks.
	///
	/// Autokeysounds are not counted even though they sit on the chart like taps. They play on
	/// their own, so counting them would inflate the number of notes a player has to hit.
	pub fn num_tap_notes(&self, start: Row, end: Row) -> usize {
		self.count_notes(start, end, TapNote::is_press)
	}

	pub fn num_mines(&self, start: Row, end: Row) -> usize {
		self.count_notes(start, end, |note| note.kind == NoteKind::Mine)
	}

	pub fn num_lifts(&self, start: Row, end: Row) -> usize {
		self.count_notes(start, end, |note| note.kind == NoteKind::Lift)
	}

	pub fn num_fakes(&self, start: Row, end: Row) -> usize {
		self.count_notes(start, end, |note| note.kind == NoteKind::Fake)
	}

	/// Holds (not rolls) whose head lies in `[start, end)`
	pub fn num_hold_notes(&self, start: Row, end: Row) -> usize {
		self.count_notes(start, end, |note| {
			note.hold_subtype() == Some(HoldSubtype::Hold)
		})
	}

	/// Rolls whose head lies in `[start, end)`
	pub fn num_rolls(&self, start: Row, end: Row) -> usize {
		self.count_notes(start, end, |note| {
			note.hold_subtype() == Some(HoldSubtype::Roll)
		})
	}

	/// Holds (not rolls) on a single track whose head lies in `[start, end)`
	pub fn num_hold_notes_for_track(&self, track: usize, start: Row, end: Row) -> usize {
		self.track_range(track, start, end)
			.filter(|(_, note)| note.hold_subtype() == Some(HoldSubtype::Hold))
			.count()
	}

	pub fn num_rows_with_tap(&self, start: Row, end: Row) -> usize {
		self.occupied_rows(start, end)
			.filter(|&row| self.first_track_with_tap(row).is_some())
			.count()
	}

	pub fn num_rows_with_tap_or_hold_head(&self, start: Row, end: Row) -> usize {
		self.occupied_rows(start, end)
			.filter(|&row| self.first_track_with_tap_or_hold_head(row).is_some())
			.count()
	}

	/// Rows with at least `min_taps` presses starting on them. Holds being held don't count
	pub fn num_rows_with_simultaneous_taps(&self, min_taps: usize, start: Row, end: Row) -> usize {
		self.occupied_rows(start, end)
			.filter(|&row| self.num_presses_in_row(row) >= min_taps)
			.count()
	}

	/// Count the number of times you have to use your hands. This includes three taps at the
	/// same time, a tap while two holds are being held, etc. Only rows with at least one press
	/// count, otherwise every row of three simultaneous holds would be a "hand".
	pub fn num_rows_with_simultaneous_presses(
		&self,
		min_presses: usize,
		start: Row,
		end: Row,
	) -> usize {
		self.occupied_rows(start, end)
			.filter(|&row| self.row_needs_at_least_simultaneous_presses(min_presses, row))
			.count()
	}

	pub fn num_jumps(&self, start: Row, end: Row) -> usize {
		self.num_rows_with_simultaneous_presses(JUMP_PRESSES, start, end)
	}

	pub fn num_hands(&self, start: Row, end: Row) -> usize {
		self.num_rows_with_simultaneous_presses(HAND_PRESSES, start, end)
	}

	fn num_presses_in_row(&self, row: Row) -> usize {
		(0..self.num_tracks())
			.filter(|&track| self.get(track, row).is_press())
			.count()
	}

	/// Whether the row has at least one press and, counting the holds held through it, at least
	/// `min_presses` tracks busy.
	pub fn row_needs_at_least_simultaneous_presses(&self, min_presses: usize, row: Row) -> bool {
		let num_presses = self.num_presses_in_row(row);
		if num_presses == 0 {
			return false;
		}
		if num_presses >= min_presses {
			return true;
		}
		num_presses + self.num_tracks_held_at_row(row) >= min_presses
	}

	pub fn is_empty(&self) -> bool {
		(0..self.num_tracks()).all(|track| self.track(track).is_empty())
	}

	pub fn is_row_empty(&self, row: Row) -> bool {
		(0..self.num_tracks()).all(|track| self.get(track, row).is_empty())
	}

	pub fn is_range_empty(&self, track: usize, start: Row, end: Row) -> bool {
		self.track_range(track, start, end).next().is_none()
	}

	pub fn num_tracks_with_tap(&self, row: Row) -> usize {
		self.tracks_where(row, TapNote::is_tap_or_lift).count()
	}

	pub fn num_tracks_with_tap_or_hold_head(&self, row: Row) -> usize {
		self.tracks_where(row, TapNote::is_tap_or_hold_head).count()
	}

	pub fn first_track_with_tap(&self, row: Row) -> Option<usize> {
		self.tracks_where(row, TapNote::is_tap_or_lift).next()
	}

	pub fn first_track_with_tap_or_hold_head(&self, row: Row) -> Option<usize> {
		self.tracks_where(row, TapNote::is_tap_or_hold_head).next()
	}

	pub fn last_track_with_tap_or_hold_head(&self, row: Row) -> Option<usize> {
		self.tracks_where(row, TapNote::is_tap_or_hold_head)
			.next_back()
	}

	pub fn non_empty_tracks(&self, row: Row) -> Vec<usize> {
		self.tracks_where(row, |note| !note.is_empty()).collect()
	}

	pub fn first_empty_track(&self, row: Row) -> Option<usize> {
		self.tracks_where(row, TapNote::is_empty).next()
	}

	pub fn last_empty_track(&self, row: Row) -> Option<usize> {
		self.tracks_where(row, TapNote::is_empty).next_back()
	}

	fn tracks_where(
		&self,
		row: Row,
		pred: fn(&TapNote) -> bool,
	) -> impl DoubleEndedIterator<Item = usize> + '_ {
		(0..self.num_tracks()).filter(move |&track| pred(&self.get(track, row)))
	}

	/// Row of the earliest note, None if there are no notes
	pub fn first_row(&self) -> Option<Row> {
		(0..self.num_tracks())
			.filter_map(|track| self.track(track).keys().next().copied())
			.min()
	}

	/// Row where the last note ends. For a hold that's its end row
	pub fn last_row(&self) -> Option<Row> {
		(0..self.num_tracks())
			.filter_map(|track| {
				let (&row, note) = self.track(track).iter().next_back()?;
				Some(row + note.duration())
			})
			.max()
	}

	/// Gather the usual statistics over the whole timeline
	pub fn row_stats(&self) -> RowStats {
		RowStats {
			num_tracks: self.num_tracks(),
			first_row: self.first_row(),
			last_row: self.last_row(),
			taps: self.num_tap_notes(0, MAX_NOTE_ROW),
			holds: self.num_hold_notes(0, MAX_NOTE_ROW),
			rolls: self.num_rolls(0, MAX_NOTE_ROW),
			mines: self.num_mines(0, MAX_NOTE_ROW),
			lifts: self.num_lifts(0, MAX_NOTE_ROW),
			fakes: self.num_fakes(0, MAX_NOTE_ROW),
			jumps: self.num_jumps(0, MAX_NOTE_ROW),
			hands: self.num_hands(0, MAX_NOTE_ROW),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{AttackId, KeysoundId};

	fn chart() -> NoteTimeline {
		let mut nd = NoteTimeline::new(4);
		// jump
		nd.set(0, 0, TapNote::TAP);
		nd.set(1, 0, TapNote::TAP);
		// two holds, then a tap while both are held
		nd.add_hold_note(0, 12, 48, TapNote::HOLD_HEAD);
		nd.add_hold_note(1, 12, 48, TapNote::ROLL_HEAD);
		nd.set(2, 24, TapNote::TAP);
		nd.set(3, 24, TapNote::MINE);
		// hand of plain taps, one of them a lift
		nd.set(1, 60, TapNote::TAP);
		nd.set(2, 60, TapNote::LIFT);
		nd.set(3, 60, TapNote::attack(AttackId(1)));
		// things nobody presses
		nd.set(0, 72, TapNote::FAKE);
		nd.set(1, 72, TapNote::auto_keysound(KeysoundId(3)));
		nd
	}

	#[test]
	fn test_note_counts() {
		let nd = chart();
		assert_eq!(nd.num_tap_notes(0, MAX_NOTE_ROW), 8);
		assert_eq!(nd.num_hold_notes(0, MAX_NOTE_ROW), 1);
		assert_eq!(nd.num_rolls(0, MAX_NOTE_ROW), 1);
		assert_eq!(nd.num_mines(0, MAX_NOTE_ROW), 1);
		assert_eq!(nd.num_lifts(0, MAX_NOTE_ROW), 1);
		assert_eq!(nd.num_fakes(0, MAX_NOTE_ROW), 1);
		assert_eq!(nd.num_tap_notes(12, 60), 3);
		// the fake and the autokeysound on row 72 need no press
		assert_eq!(nd.num_tap_notes(72, 73), 0);
		assert_eq!(nd.count_notes(72, 73, |note| !note.is_empty()), 2);
		assert_eq!(nd.num_hold_notes_for_track(0, 0, 100), 1);
		assert_eq!(nd.num_hold_notes_for_track(1, 0, 100), 0);
	}

	#[test]
	fn test_row_counts() {
		let nd = chart();
		assert_eq!(nd.num_rows_with_tap(0, MAX_NOTE_ROW), 3);
		assert_eq!(nd.num_rows_with_tap_or_hold_head(0, MAX_NOTE_ROW), 4);
		assert_eq!(nd.num_rows_with_simultaneous_taps(2, 0, MAX_NOTE_ROW), 3);
		assert_eq!(nd.num_rows_with_simultaneous_taps(3, 0, MAX_NOTE_ROW), 1);
	}

	#[test]
	fn test_hands_count_held_tracks() {
		let nd = chart();
		// row 0, row 12, row 24 (tap plus two holds) and row 60
		assert_eq!(nd.num_jumps(0, MAX_NOTE_ROW), 4);
		// row 24 and row 60
		assert_eq!(nd.num_hands(0, MAX_NOTE_ROW), 2);
		assert!(nd.row_needs_at_least_simultaneous_presses(3, 24));
		// a row with nothing but holds going through it isn't a hand
		assert!(!nd.row_needs_at_least_simultaneous_presses(2, 30));
	}

	#[test]
	fn test_per_row_queries() {
		let nd = chart();
		assert!(nd.is_row_empty(1));
		assert!(!nd.is_row_empty(72));
		assert!(nd.is_range_empty(0, 13, 48));
		assert!(!nd.is_range_empty(0, 12, 13));
		assert_eq!(nd.num_tracks_with_tap(60), 2);
		assert_eq!(nd.num_tracks_with_tap_or_hold_head(12), 2);
		assert_eq!(nd.first_track_with_tap(60), Some(1));
		assert_eq!(nd.first_track_with_tap(72), None);
		assert_eq!(nd.first_track_with_tap_or_hold_head(12), Some(0));
		assert_eq!(nd.last_track_with_tap_or_hold_head(60), Some(2));
		assert_eq!(nd.non_empty_tracks(24), vec![2, 3]);
		assert_eq!(nd.first_empty_track(0), Some(2));
		assert_eq!(nd.last_empty_track(60), Some(0));
	}

	#[test]
	fn test_first_and_last_row() {
		let mut nd = NoteTimeline::new(2);
		assert_eq!(nd.first_row(), None);
		assert_eq!(nd.last_row(), None);
		assert!(nd.is_empty());

		nd.set(1, 30, TapNote::TAP);
		nd.add_hold_note(0, 20, 40, TapNote::HOLD_HEAD);
		assert_eq!(nd.first_row(), Some(20));
		assert_eq!(nd.last_row(), Some(40));
	}

	#[test]
	fn test_stats_are_idempotent() {
		let nd = chart();
		let before = nd.clone();
		let stats = nd.row_stats();
		assert_eq!(nd.row_stats(), stats);
		assert_eq!(nd, before);
		assert_eq!(stats.hands, 2);
		assert_eq!(stats.last_row, Some(72));
	}
}
