//! Inserting holds while keeping them apart, and finding the hold that covers a row.

use crate::timeline::assert_range;
use crate::{NoteTimeline, Row, TapNote};

impl NoteTimeline {
	/// Add a hold covering `[start_row, end_row)`. Holds that overlap or touch it are merged into
	/// it, and every other note underneath the merged hold is destroyed, as well as a note lying
	/// directly on its end row. The merged hold takes over `head`'s subtype and keysound.
	///
	/// Panics if `head` isn't a hold head or the range is negative or inverted.
	pub fn add_hold_note(&mut self, track: usize, start_row: Row, end_row: Row, head: TapNote) {
		assert!(
			start_row >= 0 && end_row >= 0,
			"negative hold [{}, {})",
			start_row,
			end_row
		);
		assert_range(start_row, end_row);
		assert!(head.is_hold_head(), "{:?} is not a hold head", head.kind);
		self.assert_track(track);

		// Merging can make the hold touch yet another hold, so keep growing until nothing changes
		let (mut start, mut end) = (start_row, end_row);
		loop {
			let (new_start, new_end) = self.touching_hold_union(track, start, end);
			if (new_start, new_end) == (start, end) {
				break;
			}
			start = new_start;
			end = new_end;
		}

		let track_map = self.track_mut(track);
		let swallowed = track_map
			.range(start..end)
			.map(|(&row, _)| row)
			.collect::<Vec<_>>();
		for row in &swallowed {
			track_map.remove(row);
		}
		// A note right at the end of the hold is redundant with the hold release. Nothing here can
		// be a hold head, that one would have been merged above
		let removed_at_end = track_map.remove(&end);

		if !swallowed.is_empty() || removed_at_end.is_some() || (start, end) != (start_row, end_row)
		{
			log::debug!(
				"Hold [{}, {}) on track {} merged into [{}, {}), replacing {} notes",
				start_row,
				end_row,
				track,
				start,
				end,
				swallowed.len() + removed_at_end.iter().count(),
			);
		}

		self.set(track, start, head.with_duration(end - start));
	}

	/// Union of `[start, end)` with every hold that overlaps or is adjacent to it.
	fn touching_hold_union(&self, track: usize, mut start: Row, mut end: Row) -> (Row, Row) {
		let track_map = self.track(track);

		if let Some((&row, note)) = track_map.range(..start).next_back() {
			if note.is_hold_head() && row + note.duration() >= start {
				start = row;
				end = end.max(row + note.duration());
			}
		}

		// Inclusive end: a hold starting right where this one ends touches it
		for (&row, note) in track_map.range(start..=end) {
			if note.is_hold_head() {
				end = end.max(row + note.duration());
			}
		}

		(start, end)
	}

	/// Join holds that end exactly on the head of another hold, looking at heads in
	/// `[start, end]` and at a hold reaching `start` from before. The earlier head survives with
	/// its subtype and keysound. Other notes are left alone, so this is safe to run after
	/// writing a range note by note.
	pub(crate) fn join_touching_holds(&mut self, track: usize, start: Row, end: Row) {
		let mut row = match self.track(track).range(..start).next_back() {
			Some((&head_row, note)) if note.is_hold_head() => head_row,
			_ => start,
		};

		while row <= end {
			let (head_row, head) = match self.track(track).range(row..).next() {
				Some((&head_row, &note)) if head_row <= end => (head_row, note),
				_ => break,
			};
			if !head.is_hold_head() {
				row = head_row + 1;
				continue;
			}

			let mut hold_end = head_row + head.duration();
			let mut num_joined = 0;
			while hold_end > head_row {
				match self.track(track).get(&hold_end) {
					Some(next) if next.is_hold_head() => {
						let next_end = hold_end + next.duration();
						self.track_mut(track).remove(&hold_end);
						num_joined += 1;
						if next_end == hold_end {
							break;
						}
						hold_end = next_end;
					}
					_ => break,
				}
			}

			if num_joined > 0 {
				log::debug!(
					"Joined {} touching holds into [{}, {}) on track {}",
					num_joined + 1,
					head_row,
					hold_end,
					track
				);
				self.set(track, head_row, head.with_duration(hold_end - head_row));
			}
			row = hold_end.max(head_row + 1);
		}
	}

	/// If a hold body lies on the given spot, return the row of its head. The head row itself
	/// doesn't count as body, and neither does the row the hold ends on.
	pub fn is_hold_note_at_row(&self, track: usize, row: Row) -> Option<Row> {
		// Search upwards. A hold head means we're in a hold if it reaches far enough; a tap, mine,
		// etc. means we're not, those never lie within holds. Keysounds are skipped
		for (&head_row, note) in self.track(track).range(..row).rev() {
			if note.is_hold_head() {
				return if head_row + note.duration() > row {
					Some(head_row)
				} else {
					None
				};
			}
			if note.blocks_hold_body() {
				return None;
			}
		}
		None
	}

	/// Like [`Self::is_hold_note_at_row`], but a hold head on `row` counts as well.
	pub fn is_hold_head_or_body_at_row(&self, track: usize, row: Row) -> Option<Row> {
		if self.get(track, row).is_hold_head() {
			return Some(row);
		}
		self.is_hold_note_at_row(track, row)
	}

	/// Tracks on which a hold body is being held through `row`
	pub fn tracks_held_at_row(&self, row: Row) -> Vec<usize> {
		(0..self.num_tracks())
			.filter(|&track| self.is_hold_note_at_row(track, row).is_some())
			.collect()
	}

	pub fn num_tracks_held_at_row(&self, row: Row) -> usize {
		(0..self.num_tracks())
			.filter(|&track| self.is_hold_note_at_row(track, row).is_some())
			.count()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{HoldSubtype, KeysoundId};

	fn heads(nd: &NoteTimeline, track: usize) -> Vec<(Row, Row)> {
		nd.track(track)
			.iter()
			.filter(|(_, note)| note.is_hold_head())
			.map(|(&row, note)| (row, note.duration()))
			.collect()
	}

	#[test]
	fn test_overlapping_holds_merge() {
		let mut nd = NoteTimeline::new(4);
		nd.add_hold_note(0, 0, 10, TapNote::HOLD_HEAD);
		nd.add_hold_note(0, 8, 20, TapNote::HOLD_HEAD);
		assert_eq!(heads(&nd, 0), vec![(0, 20)]);
		assert_eq!(nd.get(0, 8), TapNote::EMPTY);
		assert_eq!(nd.get(0, 10), TapNote::EMPTY);
	}

	#[test]
	fn test_adjacent_holds_merge() {
		let mut nd = NoteTimeline::new(4);
		nd.add_hold_note(1, 0, 10, TapNote::HOLD_HEAD);
		nd.add_hold_note(1, 10, 20, TapNote::HOLD_HEAD);
		assert_eq!(heads(&nd, 1), vec![(0, 20)]);

		// adjacent on the other side
		nd.add_hold_note(2, 30, 40, TapNote::HOLD_HEAD);
		nd.add_hold_note(2, 20, 30, TapNote::HOLD_HEAD);
		assert_eq!(heads(&nd, 2), vec![(20, 20)]);
	}

	#[test]
	fn test_chained_merge() {
		let mut nd = NoteTimeline::new(4);
		// two touching holds that were never merged, as a loader might write them
		nd.set(0, 5, TapNote::hold_head(HoldSubtype::Hold, 10));
		nd.set(0, 15, TapNote::hold_head(HoldSubtype::Hold, 5));
		nd.set(0, 25, TapNote::hold_head(HoldSubtype::Hold, 5));
		nd.set(0, 30, TapNote::TAP);

		// [0, 10) touches [5, 15) directly and [15, 20) only through it
		nd.add_hold_note(0, 0, 10, TapNote::HOLD_HEAD);
		assert_eq!(heads(&nd, 0), vec![(0, 20), (25, 5)]);

		// [0, 20) and [25, 30) are bridged, and the tap on the new end is dropped
		nd.add_hold_note(0, 18, 25, TapNote::HOLD_HEAD);
		assert_eq!(heads(&nd, 0), vec![(0, 30)]);
		assert_eq!(nd.get(0, 30), TapNote::EMPTY);
	}

	#[test]
	fn test_hold_swallows_notes() {
		let mut nd = NoteTimeline::new(4);
		nd.set(3, 4, TapNote::TAP);
		nd.set(3, 6, TapNote::MINE);
		nd.set(3, 12, TapNote::TAP);
		nd.set(3, 13, TapNote::TAP);
		nd.add_hold_note(3, 4, 12, TapNote::ROLL_HEAD.with_keysound(KeysoundId(2)));

		assert_eq!(nd.track(3).len(), 2);
		let head = nd.get(3, 4);
		assert_eq!(head.duration(), 8);
		assert_eq!(head.hold_subtype(), Some(HoldSubtype::Roll));
		assert_eq!(head.keysound, Some(KeysoundId(2)));
		assert_eq!(nd.get(3, 13), TapNote::TAP);
	}

	#[test]
	fn test_newest_head_wins() {
		let mut nd = NoteTimeline::new(1);
		nd.add_hold_note(0, 0, 10, TapNote::HOLD_HEAD);
		nd.add_hold_note(0, 5, 15, TapNote::ROLL_HEAD);
		assert_eq!(nd.get(0, 0).hold_subtype(), Some(HoldSubtype::Roll));
	}

	#[test]
	fn test_zero_duration_hold() {
		let mut nd = NoteTimeline::new(1);
		nd.set(0, 7, TapNote::TAP);
		nd.add_hold_note(0, 7, 7, TapNote::HOLD_HEAD);
		assert_eq!(nd.get(0, 7), TapNote::HOLD_HEAD);
		assert_eq!(nd.track(0).len(), 1);
	}

	#[test]
	#[should_panic]
	fn test_inverted_hold_panics() {
		NoteTimeline::new(1).add_hold_note(0, 10, 5, TapNote::HOLD_HEAD);
	}

	#[test]
	#[should_panic]
	fn test_tap_template_panics() {
		NoteTimeline::new(1).add_hold_note(0, 0, 5, TapNote::TAP);
	}

	#[test]
	fn test_join_touching_holds() {
		let mut nd = NoteTimeline::new(2);
		nd.set(0, 0, TapNote::hold_head(HoldSubtype::Roll, 10));
		nd.set(0, 10, TapNote::hold_head(HoldSubtype::Hold, 5));
		nd.set(0, 15, TapNote::hold_head(HoldSubtype::Hold, 0));
		nd.set(0, 20, TapNote::TAP);
		nd.set(0, 30, TapNote::hold_head(HoldSubtype::Hold, 10));
		nd.set(0, 40, TapNote::hold_head(HoldSubtype::Hold, 10));

		// the roll reaches in from before the window, the pair at 30 and 40 lies outside of it
		nd.join_touching_holds(0, 5, 20);
		assert_eq!(heads(&nd, 0), vec![(0, 15), (30, 10), (40, 10)]);
		assert_eq!(nd.get(0, 0).hold_subtype(), Some(HoldSubtype::Roll));
		assert_eq!(nd.get(0, 20), TapNote::TAP);

		// a gap of one row is not touching
		nd.set(1, 0, TapNote::hold_head(HoldSubtype::Hold, 10));
		nd.set(1, 11, TapNote::hold_head(HoldSubtype::Hold, 10));
		nd.join_touching_holds(1, 0, 100);
		assert_eq!(heads(&nd, 1), vec![(0, 10), (11, 10)]);
	}

	#[test]
	fn test_hold_body_lookup() {
		let mut nd = NoteTimeline::new(4);
		nd.add_hold_note(0, 12, 24, TapNote::HOLD_HEAD);
		nd.set(1, 0, TapNote::TAP);

		assert_eq!(nd.is_hold_note_at_row(0, 12), None);
		assert_eq!(nd.is_hold_note_at_row(0, 13), Some(12));
		assert_eq!(nd.is_hold_note_at_row(0, 23), Some(12));
		assert_eq!(nd.is_hold_note_at_row(0, 24), None);
		assert_eq!(nd.is_hold_head_or_body_at_row(0, 12), Some(12));
		assert_eq!(nd.is_hold_note_at_row(1, 5), None);

		// keysounds don't interrupt the search, taps do
		nd.set(0, 18, TapNote::auto_keysound(KeysoundId(0)));
		assert_eq!(nd.is_hold_note_at_row(0, 20), Some(12));

		assert_eq!(nd.tracks_held_at_row(20), vec![0]);
		assert_eq!(nd.num_tracks_held_at_row(12), 0);
	}
}
