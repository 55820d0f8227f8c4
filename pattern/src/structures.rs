/// Represents a note pattern without snap changes. Each row is one step of the pattern; how many
/// timeline rows a step spans is up to whoever places the pattern.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Pattern {
	pub rows: Vec<Row>,
}

impl Pattern {
	/// Guesses the keymode (e.g. 4k/5k/6k/...) by adding 1 to the rightmost lane. The number is
	/// clamped to a minimum of 4k - there is no such thing as 3k, 2k, 1k.
	///
	/// Returns None if the pattern has no notes.
	///
	/// Note that this function returns only a _guess_. Nobody knows if \[12\]\[34\] was intended as
	/// a 4k pattern, or a 5k, 6k, 7k...
	pub fn keymode(&self) -> Option<u32> {
		let rightmost_lane = self
			.rows
			.iter()
			.flat_map(|row| &row.notes)
			.map(|(lane, _)| match *lane {
				Lane::Index(index) => index,
				// LDUR always lives in the first four lanes
				_ => lane.column_number_with_keymode(4),
			})
			.max()?;

		// clamp to a minimum of 4 because even if the pattern is `2323`, it's still 4k
		Some((rightmost_lane + 1).max(4))
	}

	pub fn num_notes(&self) -> usize {
		self.rows.iter().map(|row| row.notes.len()).sum()
	}
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct Row {
	pub notes: Vec<(Lane, NoteType)>,
}

#[derive(PartialEq, Eq, Copy, Clone, Debug, Hash)]
pub enum Lane {
	Index(u32),
	Left,
	Down,
	Up,
	Right,
}

impl Lane {
	pub fn column_number_with_keymode(&self, keymode: u32) -> u32 {
		match *self {
			Lane::Index(lane) => lane,
			Lane::Left => 0,
			Lane::Down => 1,
			Lane::Up => 2,
			Lane::Right => {
				if keymode == 3 {
					2
				} else {
					3
				}
			} // in 3k it goes left-down-right
		}
	}
}

/// Hold and roll lengths are counted in pattern steps, including the step of the head.
#[derive(PartialEq, Eq, Clone, Debug, Hash, Copy)]
pub enum NoteType {
	Tap,
	Mine,
	Lift,
	Fake,
	Hold { length: u32 },
	Roll { length: u32 },
}

impl NoteType {
	pub fn length(&self) -> Option<u32> {
		match *self {
			NoteType::Hold { length } | NoteType::Roll { length } => Some(length),
			_ => None,
		}
	}

	/// Turns a note into a hold or roll of the given length. Mines and fakes can't be held and are
	/// returned unchanged.
	pub(crate) fn into_sustained(self, length: u32, roll: bool) -> Self {
		match (self, roll) {
			(NoteType::Mine, _) | (NoteType::Fake, _) => self,
			(_, false) => NoteType::Hold { length },
			(_, true) => NoteType::Roll { length },
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn row(notes: &[(Lane, NoteType)]) -> Row {
		Row {
			notes: notes.to_vec(),
		}
	}

	#[test]
	fn test_keymode() {
		let pattern = Pattern {
			rows: vec![
				row(&[(Lane::Index(0), NoteType::Tap)]),
				row(&[(Lane::Index(6), NoteType::Mine)]),
			],
		};
		assert_eq!(pattern.keymode(), Some(7));

		let pattern = Pattern {
			rows: vec![row(&[(Lane::Right, NoteType::Tap)])],
		};
		assert_eq!(pattern.keymode(), Some(4));

		assert_eq!(Pattern::default().keymode(), None);
		assert_eq!(Pattern { rows: vec![row(&[])] }.keymode(), None);
	}

	#[test]
	fn test_sustained_conversion() {
		assert_eq!(
			NoteType::Tap.into_sustained(3, false),
			NoteType::Hold { length: 3 }
		);
		assert_eq!(
			NoteType::Lift.into_sustained(3, true),
			NoteType::Roll { length: 3 }
		);
		assert_eq!(NoteType::Mine.into_sustained(3, false), NoteType::Mine);
		assert_eq!(NoteType::Roll { length: 2 }.length(), Some(2));
		assert_eq!(NoteType::Fake.length(), None);
	}
}
