use serde::{Deserialize, Serialize};

/// Quantized time coordinate. 48 rows make up one beat, but the timeline itself doesn't care;
/// converting beats to rows is up to the caller.
pub type Row = i32;

/// End of the addressable row range. Operations on "everything" cover `[0, MAX_NOTE_ROW)`.
pub const MAX_NOTE_ROW: Row = 1 << 30;

/// Opaque reference to attack parameters owned by whoever loaded the chart.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AttackId(pub u32);

/// Opaque reference into the keysound list of a song.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct KeysoundId(pub u32);

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoldSubtype {
	Hold,
	Roll,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum NoteKind {
	/// Never stored. Any row without an entry reads as empty
	Empty,
	Tap,
	Mine,
	Lift,
	Fake,
	Attack { attack: AttackId },
	AutoKeysound,
	/// The hold covers `[row, row + duration)`. Only the head row has an entry
	HoldHead { subtype: HoldSubtype, duration: Row },
}

/// A single entry on a track.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TapNote {
	#[serde(flatten)]
	pub kind: NoteKind,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub keysound: Option<KeysoundId>,
}

impl TapNote {
	pub const EMPTY: TapNote = TapNote::new(NoteKind::Empty);
	pub const TAP: TapNote = TapNote::new(NoteKind::Tap);
	pub const MINE: TapNote = TapNote::new(NoteKind::Mine);
	pub const LIFT: TapNote = TapNote::new(NoteKind::Lift);
	pub const FAKE: TapNote = TapNote::new(NoteKind::Fake);
	/// Templates for [`crate::NoteTimeline::add_hold_note`], which fills in the duration
	pub const HOLD_HEAD: TapNote = TapNote::hold_head(HoldSubtype::Hold, 0);
	pub const ROLL_HEAD: TapNote = TapNote::hold_head(HoldSubtype::Roll, 0);

	pub const fn new(kind: NoteKind) -> Self {
		Self {
			kind,
			keysound: None,
		}
	}

	pub const fn hold_head(subtype: HoldSubtype, duration: Row) -> Self {
		Self::new(NoteKind::HoldHead { subtype, duration })
	}

	pub const fn attack(attack: AttackId) -> Self {
		Self::new(NoteKind::Attack { attack })
	}

	pub const fn auto_keysound(keysound: KeysoundId) -> Self {
		Self {
			kind: NoteKind::AutoKeysound,
			keysound: Some(keysound),
		}
	}

	pub fn with_keysound(mut self, keysound: KeysoundId) -> Self {
		self.keysound = Some(keysound);
		self
	}

	pub fn is_empty(&self) -> bool {
		self.kind == NoteKind::Empty
	}

	pub fn is_hold_head(&self) -> bool {
		matches!(self.kind, NoteKind::HoldHead { .. })
	}

	pub fn hold_subtype(&self) -> Option<HoldSubtype> {
		match self.kind {
			NoteKind::HoldHead { subtype, .. } => Some(subtype),
			_ => None,
		}
	}

	/// Length of the hold in rows, 0 for everything that isn't a hold head
	pub fn duration(&self) -> Row {
		match self.kind {
			NoteKind::HoldHead { duration, .. } => duration,
			_ => 0,
		}
	}

	/// Same note with a different hold length.
	///
	/// Panics if this isn't a hold head or the duration is negative.
	pub fn with_duration(self, duration: Row) -> Self {
		assert!(duration >= 0, "negative hold duration {}", duration);
		match self.kind {
			NoteKind::HoldHead { subtype, .. } => Self {
				kind: NoteKind::HoldHead { subtype, duration },
				..self
			},
			other => panic!("Can't give a duration to a {:?} note", other),
		}
	}

	/// Taps and lifts, the notes that are hit without anything attached
	pub fn is_tap_or_lift(&self) -> bool {
		matches!(self.kind, NoteKind::Tap | NoteKind::Lift)
	}

	pub fn is_tap_or_hold_head(&self) -> bool {
		self.is_tap_or_lift() || self.is_hold_head()
	}

	/// Whether the player has to press something for this note. Mines, fakes and keysounds are
	/// never pressed
	pub fn is_press(&self) -> bool {
		self.is_tap_or_hold_head() || matches!(self.kind, NoteKind::Attack { .. })
	}

	/// Notes that can't lie inside a hold body. An entry like this ends a backwards search for
	/// the hold covering a row
	pub(crate) fn blocks_hold_body(&self) -> bool {
		!matches!(
			self.kind,
			NoteKind::Empty | NoteKind::AutoKeysound | NoteKind::HoldHead { .. }
		)
	}
}

impl Default for TapNote {
	fn default() -> Self {
		Self::EMPTY
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_hold_duration() {
		let roll = TapNote::ROLL_HEAD.with_duration(12);
		assert_eq!(roll.duration(), 12);
		assert_eq!(roll.hold_subtype(), Some(HoldSubtype::Roll));
		assert_eq!(TapNote::TAP.duration(), 0);
		assert_eq!(TapNote::TAP.hold_subtype(), None);
	}

	#[test]
	#[should_panic]
	fn test_duration_on_tap_panics() {
		TapNote::TAP.with_duration(4);
	}

	#[test]
	fn test_press_classification() {
		assert!(TapNote::TAP.is_press());
		assert!(TapNote::LIFT.is_press());
		assert!(TapNote::HOLD_HEAD.is_press());
		assert!(TapNote::attack(AttackId(3)).is_press());
		assert!(!TapNote::MINE.is_press());
		assert!(!TapNote::FAKE.is_press());
		assert!(!TapNote::auto_keysound(KeysoundId(0)).is_press());
		assert!(!TapNote::EMPTY.is_press());
	}

	#[test]
	fn test_json_shape() {
		let note = TapNote::HOLD_HEAD.with_duration(24).with_keysound(KeysoundId(7));
		let json = serde_json::to_value(&note).unwrap();
		assert_eq!(
			json,
			serde_json::json!({
				"type": "hold_head",
				"subtype": "hold",
				"duration": 24,
				"keysound": 7,
			})
		);
		assert_eq!(serde_json::from_value::<TapNote>(json).unwrap(), note);

		let tap = serde_json::from_str::<TapNote>(r#"{"type":"tap"}"#).unwrap();
		assert_eq!(tap, TapNote::TAP);
	}
}
