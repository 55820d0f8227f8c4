//! Parser for pattern strings, built from small combinators. Each `pop_*`/`parse_*` function
//! takes the remaining input and, on success, returns what's left of it together with what it
//! read.

use crate::{Error, Lane, NoteType, Pattern, Row};

type Parsed<'a, T> = Option<(&'a str, T)>;

/// Pop a group like `(12)`. A missing closing delimiter, or an opening one appearing before it,
/// ends the group early; [`check_delimiters`] reports those cases as errors.
fn pop_delimited<'a>(t: &'a str, open: &str, close: &str) -> Parsed<'a, &'a str> {
	let t = t.strip_prefix(open)?;
	let reopened = t.find(open).unwrap_or_else(|| t.len());
	match t.find(close) {
		Some(close_i) if close_i < reopened => Some((&t[(close_i + close.len())..], &t[..close_i])),
		_ => Some((&t[reopened..], &t[..reopened])),
	}
}

/// Pop a literal, ignoring ASCII case
fn pop_prefix<'a>(t: &'a str, prefix: &str) -> Option<&'a str> {
	if t.get(..prefix.len())?.eq_ignore_ascii_case(prefix) {
		t.get(prefix.len()..)
	} else {
		None
	}
}

fn pop_char(t: &str) -> Parsed<'_, char> {
	let c = t.chars().next()?;
	Some((&t[c.len_utf8()..], c))
}

/// Apply `f` until it fails
fn parse_all<'a, T: 'a>(
	mut t: &'a str,
	f: fn(&str) -> Option<(&str, T)>,
) -> impl Iterator<Item = T> + 'a {
	std::iter::from_fn(move || {
		let (rest, item) = f(t)?;
		t = rest;
		Some(item)
	})
}

/// A group is unclosed when it's opened again, or the input ends, before it's closed
fn check_delimiters(t: &str) -> Result<(), Error> {
	let mut in_chord = false;
	let mut in_number = false;
	for c in t.chars() {
		match c {
			'[' if in_chord => return Err(Error::UnclosedBracket),
			'(' if in_number => return Err(Error::UnclosedParanthesis),
			'[' | ']' => in_chord = c == '[',
			'(' | ')' => in_number = c == '(',
			_ => {}
		}
	}

	match (in_chord, in_number) {
		(true, _) => Err(Error::UnclosedBracket),
		(_, true) => Err(Error::UnclosedParanthesis),
		(false, false) => Ok(()),
	}
}

/// Pop a single digit `8` or a multi-digit group `(16)`. The number is None if the popped text
/// isn't one
fn parse_number(t: &str) -> Parsed<'_, Option<u32>> {
	let (rest, digits) = match pop_delimited(t, "(", ")") {
		Some(group) => group,
		None => {
			let (rest, _) = pop_char(t)?;
			(rest, &t[..(t.len() - rest.len())])
		}
	};
	Some((rest, digits.parse().ok()))
}

/// Pop a hold (`x<number>`) or roll (`*<number>`) suffix. The bool is true for rolls
fn parse_sustain_suffix(t: &str) -> Option<(&str, u32, bool)> {
	for &(marker, roll) in &[("x", false), ("*", true)] {
		if let Some((rest, Some(length))) = pop_prefix(t, marker).and_then(parse_number) {
			return Some((rest, length, roll));
		}
	}
	None
}

/// What a lane token stands for
enum Slot {
	Lane(Lane),
	/// `0`, takes up a step without placing a note
	Gap,
	/// Unknown character
	Skip,
}

fn parse_slot(t: &str) -> Parsed<'_, Slot> {
	if let Some((rest, Some(number))) = parse_number(t) {
		let slot = match number.checked_sub(1) {
			Some(index) => Slot::Lane(Lane::Index(index)),
			None => Slot::Gap,
		};
		return Some((rest, slot));
	}

	let (rest, c) = pop_char(t)?;
	let slot = match c.to_ascii_lowercase() {
		'l' => Slot::Lane(Lane::Left),
		'd' => Slot::Lane(Lane::Down),
		'u' => Slot::Lane(Lane::Up),
		'r' => Slot::Lane(Lane::Right),
		_ => Slot::Skip,
	};
	Some((rest, slot))
}

/// A note with optional type prefix and sustain suffix. The lane is None for gaps, and the whole
/// note is None for unknown characters
fn parse_note(t: &str) -> Parsed<'_, Option<(Option<Lane>, NoteType)>> {
	let (t, mut note_type) = [("m", NoteType::Mine), ("^", NoteType::Lift), ("~", NoteType::Fake)]
		.iter()
		.find_map(|&(prefix, note_type)| Some((pop_prefix(t, prefix)?, note_type)))
		.unwrap_or((t, NoteType::Tap));

	let (mut t, slot) = parse_slot(t)?;
	if let Some((rest, length, roll)) = parse_sustain_suffix(t) {
		t = rest;
		note_type = note_type.into_sustained(length, roll);
	}

	let note = match slot {
		Slot::Lane(lane) => Some((Some(lane), note_type)),
		Slot::Gap => Some((None, note_type)),
		Slot::Skip => None,
	};
	Some((t, note))
}

/// A chord `[...]` or a single note, together with the number of empty steps that follow it.
/// A lone hold keeps the following notes from starting before it ends, a held chord doesn't
fn parse_row(t: &str) -> Parsed<'_, Option<(Row, u32)>> {
	let (t, notes, trailing_steps) = if let Some((t, inside)) = pop_delimited(t, "[", "]") {
		let mut notes = parse_all(inside, parse_note).flatten().collect::<Vec<_>>();
		let mut trailing_steps = 0;
		let t = match parse_sustain_suffix(t) {
			Some((rest, length, roll)) => {
				// `[]x10` means the same as `0x10`
				if notes.is_empty() {
					trailing_steps = length.saturating_sub(1);
				}
				for (_, note_type) in &mut notes {
					*note_type = note_type.into_sustained(length, roll);
				}
				rest
			}
			None => t,
		};
		(t, notes, trailing_steps)
	} else {
		let (t, note) = parse_note(t)?;
		let (lane, note_type) = match note {
			Some(note) => note,
			None => return Some((t, None)),
		};
		let trailing_steps = note_type.length().map_or(0, |length| length.saturating_sub(1));
		(t, vec![(lane, note_type)], trailing_steps)
	};

	let notes = notes
		.into_iter()
		.filter_map(|(lane, note_type)| Some((lane?, note_type)))
		.collect();
	Some((t, Some((Row { notes }, trailing_steps))))
}

/// Parse a pattern from the format as it has established itself in the Etterna community, plus
/// a few extensions for the note types a chart can contain.
///
/// - `1234` for a roll, `[12][34][12][34]` for a jumptrill, `0` or `[]` for a gap
/// - `(12)` for lanes above 9, `ldur` for the usual 4k lanes
/// - `m1` for a mine, `^1` for a lift, `~1` for a fake
/// - `1x4` for a hold and `1*4` for a roll lasting four rows, `[12]x4` for a held jump
///
/// Whitespace and unknown characters are skipped. Unclosed brackets and parantheses are errors.
pub fn parse_pattern(pattern: &str) -> Result<Pattern, Error> {
	let pattern = pattern.split_whitespace().collect::<String>();
	check_delimiters(&pattern)?;

	let mut rows = Vec::new();
	for (row, trailing_steps) in parse_all(&pattern, parse_row).flatten() {
		rows.push(row);
		rows.extend((0..trailing_steps).map(|_| Row::default()));
	}

	log::trace!("Parsed pattern into {} rows", rows.len());
	Ok(Pattern { rows })
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::Lane as L;

	fn lanes_of(pattern: &Pattern) -> Vec<Vec<(L, NoteType)>> {
		pattern.rows.iter().map(|row| row.notes.clone()).collect()
	}

	#[test]
	fn test_pop_delimited() {
		assert_eq!(pop_delimited("(12)34", "(", ")"), Some(("34", "12")));
		assert_eq!(pop_delimited("(12(34)", "(", ")"), Some(("(34)", "12")));
		assert_eq!(pop_delimited("12", "(", ")"), None);
	}

	#[test]
	fn test_taps_and_gaps() {
		let pattern = parse_pattern("[12]0 3(10)").unwrap();
		assert_eq!(
			lanes_of(&pattern),
			vec![
				vec![(L::Index(0), NoteType::Tap), (L::Index(1), NoteType::Tap)],
				vec![],
				vec![(L::Index(2), NoteType::Tap)],
				vec![(L::Index(9), NoteType::Tap)],
			]
		);
	}

	#[test]
	fn test_note_types() {
		let pattern = parse_pattern("m1^2~3ld").unwrap();
		assert_eq!(
			lanes_of(&pattern),
			vec![
				vec![(L::Index(0), NoteType::Mine)],
				vec![(L::Index(1), NoteType::Lift)],
				vec![(L::Index(2), NoteType::Fake)],
				vec![(L::Left, NoteType::Tap)],
				vec![(L::Down, NoteType::Tap)],
			]
		);
	}

	#[test]
	fn test_holds_advance_the_cursor() {
		let pattern = parse_pattern("1x3 2").unwrap();
		assert_eq!(
			lanes_of(&pattern),
			vec![
				vec![(L::Index(0), NoteType::Hold { length: 3 })],
				vec![],
				vec![],
				vec![(L::Index(1), NoteType::Tap)],
			]
		);

		// chords don't move the cursor to the end of the hold
		let pattern = parse_pattern("[12]*2 3").unwrap();
		assert_eq!(
			lanes_of(&pattern),
			vec![
				vec![
					(L::Index(0), NoteType::Roll { length: 2 }),
					(L::Index(1), NoteType::Roll { length: 2 }),
				],
				vec![(L::Index(2), NoteType::Tap)],
			]
		);

		// a held gap is just a longer gap
		let pattern = parse_pattern("0x3").unwrap();
		assert_eq!(pattern.rows.len(), 3);
		assert_eq!(pattern.num_notes(), 0);
	}

	#[test]
	fn test_invalid_characters_are_skipped() {
		let pattern = parse_pattern("1?!2").unwrap();
		assert_eq!(pattern.rows.len(), 2);
	}

	#[test]
	fn test_unclosed_delimiters() {
		assert!(matches!(parse_pattern("[12"), Err(Error::UnclosedBracket)));
		assert!(matches!(parse_pattern("[1[2]"), Err(Error::UnclosedBracket)));
		assert!(matches!(parse_pattern("(12"), Err(Error::UnclosedParanthesis)));
		assert!(parse_pattern("[1(12)]").is_ok());
	}
}
