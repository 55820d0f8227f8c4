//! Chronological iteration over all tracks at once, plus the mutable counterpart that edits a
//! range without invalidating the traversal.

use crate::timeline::{assert_range, TrackMap};
use crate::{NoteTimeline, Row, TapNote};
use std::collections::btree_map;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
	/// Ascending rows, ties go to the lower track
	Forward,
	/// Descending rows, ties go to the higher track
	Reverse,
}

/// Which holds around the edges of a row range belong to it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Inclusion {
	/// Only notes whose row lies inside the range
	Exact,
	/// Also a hold that starts before the range and reaches into it
	OverlappingHolds,
	/// Also holds that end exactly where the range starts, or start exactly where it ends. This
	/// is the notion of "touching" that hold merging uses
	AdjacentHolds,
}

/// Bounds `[first, last)` of the entries of one track that belong to `[start, end)`.
pub(crate) fn track_bounds(
	track: &TrackMap,
	start: Row,
	end: Row,
	inclusion: Inclusion,
) -> (Row, Row) {
	let mut first = start;
	let mut last = end;

	// Nothing can overlap an empty range
	if start == end {
		return (first, last);
	}

	if inclusion != Inclusion::Exact {
		if let Some((&row, note)) = track.range(..start).next_back() {
			let mut hold_end = row + note.duration();
			if inclusion == Inclusion::AdjacentHolds {
				hold_end += 1;
			}
			if note.is_hold_head() && hold_end > start {
				first = row;
			}
		}
	}

	if inclusion == Inclusion::AdjacentHolds {
		if let Some(note) = track.get(&end) {
			if note.is_hold_head() {
				last = end.saturating_add(1);
			}
		}
	}

	(first, last)
}

/// N-way merge of one cursor per track. Every step looks at all tracks to find the next row,
/// which is fine because there are only a handful of tracks.
///
/// Each call to [`NoteTimeline::all_tracks`] and friends starts a fresh, independent traversal;
/// cloning an iterator forks the traversal at its current position.
#[derive(Debug, Clone)]
pub struct AllTracksIter<'a> {
	cursors: Vec<btree_map::Range<'a, Row, TapNote>>,
	// The entry each cursor is sitting on, None once a track is exhausted
	heads: Vec<Option<(Row, &'a TapNote)>>,
	direction: Direction,
}

impl<'a> AllTracksIter<'a> {
	fn new(
		timeline: &'a NoteTimeline,
		start: Row,
		end: Row,
		direction: Direction,
		inclusion: Inclusion,
	) -> Self {
		assert_range(start, end);

		let mut cursors = (0..timeline.num_tracks())
			.map(|track| {
				let track = timeline.track(track);
				let (first, last) = track_bounds(track, start, end, inclusion);
				track.range(first..last)
			})
			.collect::<Vec<_>>();
		let heads = cursors
			.iter_mut()
			.map(|cursor| Self::advance(cursor, direction))
			.collect();

		Self {
			cursors,
			heads,
			direction,
		}
	}

	fn advance(
		cursor: &mut btree_map::Range<'a, Row, TapNote>,
		direction: Direction,
	) -> Option<(Row, &'a TapNote)> {
		let entry = match direction {
			Direction::Forward => cursor.next(),
			Direction::Reverse => cursor.next_back(),
		};
		entry.map(|(&row, note)| (row, note))
	}

	/// Track whose cursor comes next, None when all are exhausted
	fn next_track(&self) -> Option<usize> {
		let mut found: Option<(usize, Row)> = None;
		for (track, head) in self.heads.iter().enumerate() {
			if let Some((row, _)) = *head {
				let better = match (found, self.direction) {
					(None, _) => true,
					(Some((_, best)), Direction::Forward) => row < best,
					// `>=` hands ties to the later track
					(Some((_, best)), Direction::Reverse) => row >= best,
				};
				if better {
					found = Some((track, row));
				}
			}
		}
		found.map(|(track, _)| track)
	}
}

impl<'a> Iterator for AllTracksIter<'a> {
	type Item = (usize, Row, &'a TapNote);

	fn next(&mut self) -> Option<Self::Item> {
		let track = self.next_track()?;
		let (row, note) = self.heads[track]?;
		self.heads[track] = Self::advance(&mut self.cursors[track], self.direction);
		Some((track, row, note))
	}
}

impl NoteTimeline {
	/// All notes with a row in `[start, end)`, ordered by row and then by track.
	pub fn all_tracks(&self, start: Row, end: Row) -> AllTracksIter<'_> {
		self.all_tracks_with(start, end, Direction::Forward, Inclusion::Exact)
	}

	/// The exact reverse of [`Self::all_tracks`].
	pub fn all_tracks_rev(&self, start: Row, end: Row) -> AllTracksIter<'_> {
		self.all_tracks_with(start, end, Direction::Reverse, Inclusion::Exact)
	}

	pub fn all_tracks_with(
		&self,
		start: Row,
		end: Row,
		direction: Direction,
		inclusion: Inclusion,
	) -> AllTracksIter<'_> {
		AllTracksIter::new(self, start, end, direction, inclusion)
	}

	/// Edit every note with a row in `[start, end)`, on all tracks.
	pub fn edit_range(&mut self, start: Row, end: Row) -> RangeEdit<'_> {
		let keys = self
			.all_tracks(start, end)
			.map(|(track, row, _)| (track, row))
			.collect();
		RangeEdit {
			timeline: self,
			keys,
		}
	}

	/// Edit the notes of a single track, with holds at the edges included as `inclusion` says.
	pub fn edit_track_range(
		&mut self,
		track: usize,
		start: Row,
		end: Row,
		inclusion: Inclusion,
	) -> RangeEdit<'_> {
		assert_range(start, end);
		let track_map = self.track(track);
		let (first, last) = track_bounds(track_map, start, end, inclusion);
		let keys = track_map
			.range(first..last)
			.map(|(&row, _)| (track, row))
			.collect();
		RangeEdit {
			timeline: self,
			keys,
		}
	}
}

/// Mutable cursor over a snapshot of `(track, row)` keys. The keys are collected before anything
/// changes and every write goes through [`NoteTimeline::set`], so edits can never trip up the
/// traversal or leave an empty note behind.
#[derive(Debug)]
pub struct RangeEdit<'a> {
	timeline: &'a mut NoteTimeline,
	keys: Vec<(usize, Row)>,
}

impl RangeEdit<'_> {
	pub fn len(&self) -> usize {
		self.keys.len()
	}

	pub fn is_empty(&self) -> bool {
		self.keys.is_empty()
	}

	/// Erase every note for which `keep` returns false. Returns how many were erased
	pub fn retain(self, mut keep: impl FnMut(usize, Row, &TapNote) -> bool) -> usize {
		let mut num_erased = 0;
		for (track, row) in self.keys {
			let note = self.timeline.get(track, row);
			if !keep(track, row, &note) {
				self.timeline.set(track, row, TapNote::EMPTY);
				num_erased += 1;
			}
		}
		num_erased
	}

	/// Replace every note with what `f` returns. Returning [`TapNote::EMPTY`] erases the note
	pub fn map(self, mut f: impl FnMut(usize, Row, TapNote) -> TapNote) {
		for (track, row) in self.keys {
			let note = self.timeline.get(track, row);
			let new_note = f(track, row, note);
			if new_note != note {
				self.timeline.set(track, row, new_note);
			}
		}
	}

	/// Erase everything
	pub fn clear(self) -> usize {
		self.retain(|_, _, _| false)
	}
}
