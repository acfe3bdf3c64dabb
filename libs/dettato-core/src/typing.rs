//! Keystroke grading for the active card's answer.
//!
//! Input only ever grows: each change is expected to add one character to
//! the previously accepted input. The new character is graded against the
//! answer cell at its position. On a match the accepted input is the new
//! input's leading characters followed by the answer's own character, so the
//! graded key is normalized for accents and case. Earlier characters are
//! taken from the new input as given and are not checked again.

use crate::diacritics::DiacriticTable;
use crate::mask::MaskSource;
use crate::types::{Cell, CellStyle, SchedulingState};
use serde::Serialize;

/// Result of a single input change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputOutcome {
    /// Deletion, or more characters than the answer has.
    Rejected,
    /// Same input as already accepted.
    Unchanged,
    /// The newest character was graded.
    Graded {
        position: usize,
        style: CellStyle,
        completed: bool,
    },
}

impl InputOutcome {
    /// Whether this change filled the last cell.
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Graded { completed: true, .. })
    }
}

/// Accepted input after a change, with what happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputChange {
    pub accepted: String,
    pub outcome: InputOutcome,
}

/// Characters eligible for masking.
fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Create fresh cells for `answer`.
///
/// Cards that have never been recalled are shown in full. Otherwise each
/// word character is hidden when its draw exceeds `efactor / 3`, so easier
/// cards hide fewer characters.
pub fn init_cells(answer: &str, state: &SchedulingState, mask: &mut dyn MaskSource) -> Vec<Cell> {
    let threshold = state.efactor / 3.0;
    answer
        .chars()
        .map(|content| Cell {
            content,
            style: CellStyle::New,
            hidden: is_word_char(content) && state.repetition != 0 && mask.next_draw() > threshold,
        })
        .collect()
}

/// Grade a change of the input from `previous` to `new_input`.
pub fn on_input_change(
    previous: &str,
    new_input: &str,
    cells: &mut [Cell],
    table: &DiacriticTable,
) -> InputChange {
    let previous_len = previous.chars().count();
    let new_len = new_input.chars().count();

    if new_len < previous_len || new_len > cells.len() {
        return InputChange {
            accepted: previous.to_string(),
            outcome: InputOutcome::Rejected,
        };
    }

    let typed = match new_input.chars().last() {
        Some(c) if new_input != previous => c,
        _ => {
            return InputChange {
                accepted: previous.to_string(),
                outcome: InputOutcome::Unchanged,
            }
        }
    };

    let position = new_len - 1;
    let expected = cells[position].content;
    let is_letter = table.is_letter(expected);
    let is_match = table.accepts(expected, typed);

    let accepted = if is_match || !is_letter {
        let mut accepted: String = new_input.chars().take(position).collect();
        accepted.push(expected);
        accepted
    } else {
        previous.to_string()
    };

    let cell = &mut cells[position];
    cell.hidden = false;
    cell.style = if !is_letter {
        CellStyle::Blank
    } else if is_match {
        match cell.style {
            CellStyle::New => CellStyle::Correct,
            style => style,
        }
    } else {
        CellStyle::Incorrect
    };

    InputChange {
        accepted,
        outcome: InputOutcome::Graded {
            position,
            style: cell.style,
            completed: new_len == cells.len(),
        },
    }
}

/// Put every cell back to `New`. Masks are left as they are.
pub fn reset_cells(cells: &mut [Cell]) {
    for cell in cells.iter_mut() {
        cell.style = CellStyle::New;
    }
}

/// Number of cells graded incorrect. This is the grade fed to the scheduler.
pub fn mistake_count(cells: &[Cell]) -> usize {
    cells
        .iter()
        .filter(|cell| cell.style == CellStyle::Incorrect)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mask::SequenceMask;
    use pretty_assertions::assert_eq;

    fn cells_for(answer: &str) -> Vec<Cell> {
        init_cells(answer, &SchedulingState::default(), &mut SequenceMask::never())
    }

    fn italian() -> DiacriticTable {
        DiacriticTable::italian().unwrap()
    }

    /// Feed `keys` one at a time, the way a text field reports changes.
    fn type_keys(input: &mut String, keys: &str, cells: &mut [Cell], table: &DiacriticTable) -> InputOutcome {
        let mut outcome = InputOutcome::Unchanged;
        for key in keys.chars() {
            let mut next = input.clone();
            next.push(key);
            let change = on_input_change(input, &next, cells, table);
            *input = change.accepted;
            outcome = change.outcome;
        }
        outcome
    }

    fn styles(cells: &[Cell]) -> Vec<CellStyle> {
        cells.iter().map(|cell| cell.style).collect()
    }

    #[test]
    fn new_cards_are_never_masked() {
        let mut source = SequenceMask::new(vec![0.99]);
        let cells = init_cells("due", &SchedulingState::default(), &mut source);
        assert!(cells.iter().all(|cell| !cell.hidden));
        assert!(cells.iter().all(|cell| cell.style == CellStyle::New));
    }

    #[test]
    fn masking_compares_draw_with_ease() {
        let state = SchedulingState {
            interval: 4,
            repetition: 1,
            efactor: 1.5,
        };
        // threshold 0.5; one draw per word character
        let mut source = SequenceMask::new(vec![0.6, 0.4, 0.5, 0.9]);
        let cells = init_cells("ab c!", &state, &mut source);
        let hidden: Vec<bool> = cells.iter().map(|cell| cell.hidden).collect();
        assert_eq!(hidden, vec![true, false, false, false, false]);
    }

    #[test]
    fn accented_characters_are_not_masked() {
        let state = SchedulingState {
            interval: 4,
            repetition: 2,
            efactor: 1.3,
        };
        let cells = init_cells("è_1", &state, &mut SequenceMask::new(vec![0.99]));
        let hidden: Vec<bool> = cells.iter().map(|cell| cell.hidden).collect();
        assert_eq!(hidden, vec![false, true, true]);
    }

    #[test]
    fn correct_answer_completes_without_mistakes() {
        let table = italian();
        let mut cells = cells_for("due");
        let mut input = String::new();
        let outcome = type_keys(&mut input, "due", &mut cells, &table);
        assert!(outcome.is_completed());
        assert_eq!(input, "due");
        assert_eq!(styles(&cells), vec![CellStyle::Correct; 3]);
        assert_eq!(mistake_count(&cells), 0);
    }

    #[test]
    fn wrong_key_is_recorded_but_not_appended() {
        let table = italian();
        let mut cells = cells_for("due");
        let mut input = String::new();
        let outcome = type_keys(&mut input, "x", &mut cells, &table);
        assert_eq!(
            outcome,
            InputOutcome::Graded {
                position: 0,
                style: CellStyle::Incorrect,
                completed: false,
            }
        );
        assert_eq!(input, "");

        let outcome = type_keys(&mut input, "due", &mut cells, &table);
        assert!(outcome.is_completed());
        assert_eq!(input, "due");
        assert_eq!(
            styles(&cells),
            vec![CellStyle::Incorrect, CellStyle::Correct, CellStyle::Correct]
        );
        assert_eq!(mistake_count(&cells), 1);
    }

    #[test]
    fn input_is_normalized_to_answer_characters() {
        let table = italian();
        let mut cells = cells_for("Un caffè!");
        let mut input = String::new();
        let outcome = type_keys(&mut input, "un caffe!", &mut cells, &table);
        assert!(outcome.is_completed());
        assert_eq!(input, "Un caffè!");
        assert_eq!(mistake_count(&cells), 0);
        assert_eq!(cells[2].style, CellStyle::Blank);
        assert_eq!(cells[8].style, CellStyle::Blank);
        assert_eq!(cells[7].style, CellStyle::Correct);
    }

    #[test]
    fn earlier_characters_come_from_new_input() {
        let table = italian();
        let mut cells = cells_for("due");
        let mut input = String::new();
        type_keys(&mut input, "du", &mut cells, &table);

        let change = on_input_change(&input, "xu", &mut cells, &table);
        assert_eq!(
            change.outcome,
            InputOutcome::Graded {
                position: 1,
                style: CellStyle::Correct,
                completed: false,
            }
        );
        assert_eq!(change.accepted, "xu");
        assert_eq!(styles(&cells), vec![CellStyle::Correct, CellStyle::Correct, CellStyle::New]);
    }

    #[test]
    fn non_letters_accept_any_key() {
        let table = italian();
        let mut cells = cells_for("a b");
        let mut input = String::new();
        type_keys(&mut input, "axb", &mut cells, &table);
        assert_eq!(input, "a b");
        assert_eq!(cells[1].style, CellStyle::Blank);
        assert_eq!(mistake_count(&cells), 0);
    }

    #[test]
    fn last_key_wrong_still_completes() {
        let table = italian();
        let mut cells = cells_for("due");
        let mut input = String::new();
        let outcome = type_keys(&mut input, "duo", &mut cells, &table);
        assert!(outcome.is_completed());
        assert_eq!(input, "du");
        assert_eq!(mistake_count(&cells), 1);
    }

    #[test]
    fn deletion_is_rejected() {
        let table = italian();
        let mut cells = cells_for("due");
        let mut input = String::new();
        type_keys(&mut input, "du", &mut cells, &table);
        let before = cells.clone();

        let change = on_input_change(&input, "d", &mut cells, &table);
        assert_eq!(change.outcome, InputOutcome::Rejected);
        assert_eq!(change.accepted, "du");
        assert_eq!(cells, before);
    }

    #[test]
    fn overflow_is_rejected() {
        let table = italian();
        let mut cells = cells_for("due");
        let before = cells.clone();
        let change = on_input_change("", "dues", &mut cells, &table);
        assert_eq!(change.outcome, InputOutcome::Rejected);
        assert_eq!(change.accepted, "");
        assert_eq!(cells, before);
    }

    #[test]
    fn same_input_is_a_no_op() {
        let table = italian();
        let mut cells = cells_for("due");
        let mut input = String::new();
        type_keys(&mut input, "x", &mut cells, &table);
        let before = cells.clone();

        let change = on_input_change("", "", &mut cells, &table);
        assert_eq!(change.outcome, InputOutcome::Unchanged);
        assert_eq!(cells, before);

        type_keys(&mut input, "du", &mut cells, &table);
        let before = cells.clone();
        let change = on_input_change("du", "du", &mut cells, &table);
        assert_eq!(change.outcome, InputOutcome::Unchanged);
        assert_eq!(change.accepted, "du");
        assert_eq!(cells, before);
    }

    #[test]
    fn incorrect_is_sticky() {
        let table = italian();
        let mut cells = cells_for("due");
        let mut input = String::new();
        for key in ['x', 'y', 'd'] {
            type_keys(&mut input, &key.to_string(), &mut cells, &table);
            assert_eq!(cells[0].style, CellStyle::Incorrect);
        }
        assert_eq!(input, "d");
    }

    #[test]
    fn revealed_cells_stay_revealed() {
        let table = italian();
        let state = SchedulingState {
            interval: 5,
            repetition: 3,
            efactor: 1.3,
        };
        let mut cells = init_cells("due", &state, &mut SequenceMask::new(vec![0.99]));
        assert!(cells.iter().all(|cell| cell.hidden));

        let mut input = String::new();
        let mut revealed = vec![false; cells.len()];
        for keys in ["q", "d", "z", "u"] {
            type_keys(&mut input, keys, &mut cells, &table);
            for (cell, was_revealed) in cells.iter().zip(revealed.iter_mut()) {
                assert!(!(*was_revealed && cell.hidden));
                *was_revealed = !cell.hidden;
            }
        }
        assert_eq!(input, "du");
        assert_eq!(revealed, vec![true, true, false]);

        let change = on_input_change(&input, "d", &mut cells, &table);
        assert_eq!(change.outcome, InputOutcome::Rejected);
        assert!(!cells[0].hidden && !cells[1].hidden && cells[2].hidden);
    }

    #[test]
    fn reset_keeps_masks() {
        let table = italian();
        let state = SchedulingState {
            interval: 5,
            repetition: 3,
            efactor: 1.3,
        };
        let mut cells = init_cells("due", &state, &mut SequenceMask::new(vec![0.99]));
        let mut input = String::new();
        type_keys(&mut input, "x", &mut cells, &table);

        reset_cells(&mut cells);
        assert_eq!(styles(&cells), vec![CellStyle::New; 3]);
        assert_eq!(
            cells.iter().map(|cell| cell.hidden).collect::<Vec<_>>(),
            vec![false, true, true]
        );
    }
}
