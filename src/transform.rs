//! Range operations used by the editor (cut/copy/paste, insert/delete beat) and by style
//! conversions that remap tracks.

use crate::iter::{track_bounds, Inclusion};
use crate::timeline::assert_range;
use crate::{NoteKind, NoteTimeline, Row, TapNote, MAX_NOTE_ROW};
use rand::seq::SliceRandom as _;

impl NoteTimeline {
	/// Clear `[start, end)` on one track. Holds reaching into the range are cut at its edges, a
	/// hold spanning the whole range is split in two.
	pub fn clear_range_for_track(&mut self, track: usize, start: Row, end: Row) {
		assert_range(start, end);

		// Optimization: if the range encloses everything, just clear the whole map
		if start <= 0 && end >= MAX_NOTE_ROW {
			self.track_mut(track).clear();
			return;
		}

		// An empty range must not split any holds
		if start == end {
			return;
		}

		let before = self
			.track(track)
			.range(..start)
			.next_back()
			.map(|(&row, &note)| (row, note));
		if let Some((row, note)) = before {
			let hold_end = row + note.duration();
			if note.is_hold_head() && hold_end > start {
				self.set(track, row, note.with_duration(start - row));
				if hold_end > end {
					// The hold spans the whole range, keep what's left after it
					self.set(track, end, note.with_duration(hold_end - end));
					log::trace!(
						"Split hold at row {} on track {} around [{}, {})",
						row,
						track,
						start,
						end
					);
				}
			}
		}

		let last_inside = self
			.track_range(track, start, end)
			.next_back()
			.map(|(&row, &note)| (row, note));
		if let Some((row, note)) = last_inside {
			let hold_end = row + note.duration();
			if note.is_hold_head() && hold_end > end {
				// The hold reaches out of the range, keep its tail
				self.set(track, end, note.with_duration(hold_end - end));
			}
		}

		self.edit_track_range(track, start, end, Inclusion::Exact)
			.clear();
	}

	/// Clear `[start, end)` on every track.
	pub fn clear_range(&mut self, start: Row, end: Row) {
		for track in 0..self.num_tracks() {
			self.clear_range_for_track(track, start, end);
		}
	}

	pub fn clear_all(&mut self) {
		for track in 0..self.num_tracks() {
			self.track_mut(track).clear();
		}
	}

	/// Overwrite `[to_start, to_start + (from_end - from_start))` on `track` with the notes of
	/// `from_track` in `[from_start, from_end)` of `from`. This doesn't overlay, everything in the
	/// destination range is replaced. Holds are clipped to the range, so nothing from outside
	/// `[from_start, from_end)` is copied and no note outside the destination range is touched.
	/// Copied holds that end up touching a hold are joined with it, also across the range edges.
	pub fn copy_range_for_track(
		&mut self,
		track: usize,
		from: &NoteTimeline,
		from_track: usize,
		from_start: Row,
		from_end: Row,
		to_start: Row,
	) {
		assert_range(from_start, from_end);
		let to_end = to_start.saturating_add(from_end - from_start);
		let move_by = to_start - from_start;

		self.clear_range_for_track(track, to_start, to_end);

		let source = from.track(from_track);
		let (first, last) = track_bounds(source, from_start, from_end, Inclusion::OverlappingHolds);
		for (&row, &note) in source.range(first..last) {
			if note.is_hold_head() {
				let start_row = (row + move_by).clamp(to_start, to_end);
				let end_row = (row + note.duration() + move_by).clamp(to_start, to_end);
				self.set(track, start_row, note.with_duration(end_row - start_row));
			} else {
				self.set(track, row + move_by, note);
			}
		}

		self.join_touching_holds(track, to_start, to_end);
	}

	/// [`Self::copy_range_for_track`] for every track. Both timelines need the same track count.
	pub fn copy_range(&mut self, from: &NoteTimeline, from_start: Row, from_end: Row, to_start: Row) {
		assert_eq!(
			from.num_tracks(),
			self.num_tracks(),
			"can't copy between timelines with different track counts"
		);
		for track in 0..self.num_tracks() {
			self.copy_range_for_track(track, from, track, from_start, from_end, to_start);
		}
	}

	/// Turn this into an independent deep copy of `from`.
	pub fn copy_all(&mut self, from: &NoteTimeline) {
		self.clone_from(from);
	}

	/// Push everything from `start` on back by `num_rows`. Holds that are held through `start`
	/// get longer.
	pub fn insert_rows(&mut self, start: Row, num_rows: Row) {
		assert!(num_rows >= 0, "can't insert {} rows", num_rows);
		if num_rows == 0 {
			return;
		}

		let crossing = self.holds_crossing(start);
		let original = self.clone();
		self.clear_range(start, MAX_NOTE_ROW);
		self.copy_range(&original, start, MAX_NOTE_ROW, start + num_rows);

		for (track, row, note) in crossing {
			// the copy left the tail of the hold behind as a separate hold
			self.set(track, start + num_rows, TapNote::EMPTY);
			self.set(track, row, note.with_duration(note.duration() + num_rows));
		}
	}

	/// Remove `[start, start + num_rows)` and pull everything after it forward. Holds that are
	/// held through `start` lose the deleted part, and holds brought together by the deletion are
	/// joined.
	pub fn delete_rows(&mut self, start: Row, num_rows: Row) {
		assert!(num_rows >= 0, "can't delete {} rows", num_rows);
		if num_rows == 0 {
			return;
		}

		let original = self.clone();
		self.clear_range(start, MAX_NOTE_ROW);
		self.copy_range(
			&original,
			start.saturating_add(num_rows).min(MAX_NOTE_ROW),
			MAX_NOTE_ROW,
			start,
		);
	}

	/// Holds that start before `row` and are still held on it
	fn holds_crossing(&self, row: Row) -> Vec<(usize, Row, TapNote)> {
		(0..self.num_tracks())
			.filter_map(|track| {
				let head_row = self.is_hold_note_at_row(track, row)?;
				Some((track, head_row, self.get(track, head_row)))
			})
			.collect()
	}

	/// Build a timeline with `num_tracks` tracks, where track `i` is a copy of track
	/// `mapping[i]` of `source`, or empty if that's `None`.
	pub fn load_transformed(
		source: &NoteTimeline,
		num_tracks: usize,
		mapping: &[Option<usize>],
	) -> Self {
		assert_eq!(
			mapping.len(),
			num_tracks,
			"track mapping has the wrong length"
		);

		let mut timeline = NoteTimeline::new(num_tracks);
		for (track, &original_track) in mapping.iter().enumerate() {
			if let Some(original_track) = original_track {
				timeline.replace_track(track, source.track(original_track).clone());
			}
		}
		timeline
	}

	/// Keep only the first tap, lift or hold head in the given row.
	pub fn eliminate_all_but_one_tap(&mut self, row: Row) {
		let mut found_one = false;
		for track in 0..self.num_tracks() {
			if self.get(track, row).is_tap_or_hold_head() {
				if found_one {
					self.set(track, row, TapNote::EMPTY);
				}
				found_one = true;
			}
		}
	}

	/// Replace every hold and roll with a tap on its head row.
	pub fn convert_holds_to_taps(&mut self) {
		self.edit_range(0, MAX_NOTE_ROW).map(|_, _, note| {
			if note.is_hold_head() {
				TapNote {
					kind: NoteKind::Tap,
					..note
				}
			} else {
				note
			}
		});
	}

	/// Returns how many mines were removed
	pub fn remove_mines(&mut self) -> usize {
		self.edit_range(0, MAX_NOTE_ROW)
			.retain(|_, _, note| note.kind != NoteKind::Mine)
	}
}

/// Track mapping for [`NoteTimeline::load_transformed`] that flips the playfield horizontally.
pub fn mirror_mapping(num_tracks: usize) -> Vec<Option<usize>> {
	(0..num_tracks).rev().map(Some).collect()
}

/// Track mapping for [`NoteTimeline::load_transformed`] that puts the tracks in random order.
pub fn shuffle_mapping<R: rand::Rng + ?Sized>(num_tracks: usize, rng: &mut R) -> Vec<Option<usize>> {
	let mut mapping = (0..num_tracks).map(Some).collect::<Vec<_>>();
	mapping.shuffle(rng);
	mapping
}
