use alloc::string::{String, ToString};
use core::time::Duration;
use serde::{Deserialize, Serialize};

use crate::*;

/// How long the conflict message stays up before the host clears it.
pub const CONFLICT_MESSAGE_TIMEOUT: Duration = Duration::from_millis(3000);

pub const CONFLICT_MESSAGE: &str = "The blocks overlap, this selection was ignored. Please try again.";

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        start: Coord2,
        current: Coord2,
    },
}

impl DragState {
    pub const fn is_dragging(self) -> bool {
        matches!(self, Self::Dragging { .. })
    }

    pub fn rect(self) -> Option<Rect> {
        match self {
            Self::Idle => None,
            Self::Dragging { start, current } => Some(Rect::from_corners(start, current)),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DragStart {
    Started,
    /// A gesture was already in progress; its start point is kept.
    AlreadyDragging,
}

/// Identifies the message a scheduled clear is allowed to remove.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageTicket(u32);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DragOutcome {
    /// No gesture was in progress.
    Idle,
    /// The rectangle mixed selected and unselected cells and was rejected.
    Conflict(MessageTicket),
    Committed(Term),
}

impl DragOutcome {
    pub const fn has_update(self) -> bool {
        use DragOutcome::*;
        match self {
            Idle => false,
            Conflict(_) => true,
            Committed(_) => true,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
struct MessageSlot {
    text: Option<String>,
    generation: u32,
}

impl MessageSlot {
    fn show(&mut self, text: &str) -> MessageTicket {
        self.generation = self.generation.wrapping_add(1);
        self.text = Some(text.into());
        MessageTicket(self.generation)
    }

    fn expire(&mut self, ticket: MessageTicket) -> bool {
        if ticket.0 == self.generation && self.text.is_some() {
            self.text = None;
            true
        } else {
            false
        }
    }

    fn clear(&mut self) {
        // bump so that any outstanding ticket goes stale
        self.generation = self.generation.wrapping_add(1);
        self.text = None;
    }
}

/// Turns drag gestures over the grid into an arithmetic equation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionEngine {
    grid: Grid,
    equation: Equation,
    answer: String,
    drag: DragState,
    message: MessageSlot,
}

impl SelectionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn cell_at(&self, coords: Coord2) -> Cell {
        self.grid.cell_at(coords)
    }

    pub fn equation(&self) -> &Equation {
        &self.equation
    }

    pub fn message(&self) -> Option<&str> {
        self.message.text.as_deref()
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    /// Live rectangle of the gesture in progress, if any.
    pub fn selection(&self) -> Option<Rect> {
        self.drag.rect()
    }

    pub fn is_highlighted(&self, coords: Coord2) -> bool {
        self.selection().is_some_and(|rect| rect.contains(coords))
    }

    pub fn selected_count(&self) -> CellCount {
        self.grid.selected_count()
    }

    pub fn begin_drag(&mut self, coords: Coord2) -> Result<DragStart> {
        let coords = self.grid.validate_coords(coords)?;

        if self.drag.is_dragging() {
            log::debug!("ignoring drag start at {:?}, gesture already active", coords);
            return Ok(DragStart::AlreadyDragging);
        }

        self.drag = DragState::Dragging {
            start: coords,
            current: coords,
        };
        Ok(DragStart::Started)
    }

    /// Moves the free corner of the gesture; returns whether it moved.
    pub fn update_drag(&mut self, coords: Coord2) -> Result<bool> {
        let coords = self.grid.validate_coords(coords)?;

        Ok(match &mut self.drag {
            DragState::Idle => false,
            DragState::Dragging { current, .. } if *current == coords => false,
            DragState::Dragging { current, .. } => {
                *current = coords;
                true
            }
        })
    }

    pub fn cancel_drag(&mut self) -> bool {
        core::mem::take(&mut self.drag).is_dragging()
    }

    pub fn end_drag(&mut self) -> DragOutcome {
        let Some(rect) = core::mem::take(&mut self.drag).rect() else {
            return DragOutcome::Idle;
        };

        let mut include_count: CellCount = 0;
        let mut exclude_count: CellCount = 0;
        for (_, cell) in self.grid.iter_rect(rect) {
            match cell {
                Cell::Unselected => include_count += 1,
                Cell::Selected => exclude_count += 1,
                Cell::Excluded => {}
            }
        }

        if include_count > 0 && exclude_count > 0 {
            log::debug!(
                "conflict in {:?}: {} to include, {} to exclude",
                rect,
                include_count,
                exclude_count
            );
            return DragOutcome::Conflict(self.message.show(CONFLICT_MESSAGE));
        }

        // a rectangle of only excluded cells still counts as crossing out
        let sign = if include_count > 0 {
            Sign::Plus
        } else {
            Sign::Minus
        };

        for coords in rect.iter_coords() {
            self.grid[coords] = self.grid[coords].toggled();
        }

        let term = Term::new(sign, TermShape::from_rect(rect));
        self.equation.push(term);
        log::debug!("committed {:?} over {:?}", term, rect);
        DragOutcome::Committed(term)
    }

    /// Clears the message if `ticket` still names the one on display.
    pub fn expire_message(&mut self, ticket: MessageTicket) -> bool {
        self.message.expire(ticket)
    }

    pub fn set_answer(&mut self, answer: impl Into<String>) {
        self.answer = answer.into();
    }

    /// Compares `submitted` with the decimal count of selected cells, verbatim.
    pub fn check_answer(&self, submitted: &str) -> bool {
        self.selected_count().to_string() == submitted
    }

    pub fn check_current_answer(&self) -> bool {
        self.check_answer(&self.answer)
    }

    pub fn reset(&mut self) {
        self.grid.clear();
        self.equation.clear();
        self.answer.clear();
        self.drag = DragState::Idle;
        self.message.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drag(engine: &mut SelectionEngine, start: Coord2, end: Coord2) -> DragOutcome {
        assert_eq!(engine.begin_drag(start).unwrap(), DragStart::Started);
        engine.update_drag(end).unwrap();
        engine.end_drag()
    }

    #[test]
    fn single_cell_drag_adds_one() {
        let mut engine = SelectionEngine::new();

        let outcome = drag(&mut engine, (4, 4), (4, 4));

        assert_eq!(
            outcome,
            DragOutcome::Committed(Term::new(Sign::Plus, TermShape::Count(1)))
        );
        assert_eq!(engine.cell_at((4, 4)), Cell::Selected);
        assert_eq!(engine.equation().to_string(), "1 =");
        assert!(!engine.is_dragging());
    }

    #[test]
    fn block_drag_appends_product_term() {
        let mut engine = SelectionEngine::new();

        let outcome = drag(&mut engine, (1, 2), (0, 0));

        assert_eq!(
            outcome,
            DragOutcome::Committed(Term::new(Sign::Plus, TermShape::Product(2, 3)))
        );
        assert_eq!(engine.equation().to_string(), "2 × 3 =");
        assert_eq!(engine.selected_count(), 6);
    }

    #[test]
    fn horizontal_and_vertical_runs_add_counts() {
        let mut engine = SelectionEngine::new();

        drag(&mut engine, (0, 0), (0, 4));
        drag(&mut engine, (2, 9), (8, 9));

        assert_eq!(engine.equation().to_string(), "5 + 7 =");
        assert_eq!(engine.selected_count(), 12);
    }

    #[test]
    fn dragging_over_selected_cells_subtracts() {
        let mut engine = SelectionEngine::new();
        drag(&mut engine, (0, 0), (0, 4));

        let outcome = drag(&mut engine, (0, 3), (0, 4));

        assert_eq!(
            outcome,
            DragOutcome::Committed(Term::new(Sign::Minus, TermShape::Count(2)))
        );
        assert_eq!(engine.cell_at((0, 3)), Cell::Excluded);
        assert_eq!(engine.cell_at((0, 4)), Cell::Excluded);
        assert_eq!(engine.equation().to_string(), "5 - 2 =");
        assert_eq!(engine.selected_count(), 3);
    }

    #[test]
    fn excluded_cells_do_not_count_toward_either_side() {
        let mut engine = SelectionEngine::new();
        drag(&mut engine, (0, 0), (0, 1));
        drag(&mut engine, (0, 0), (0, 0));

        // (0, 0) is excluded, (0, 1) selected: only an exclusion remains
        let outcome = drag(&mut engine, (0, 0), (0, 1));

        assert_eq!(
            outcome,
            DragOutcome::Committed(Term::new(Sign::Minus, TermShape::Count(2)))
        );
        assert_eq!(engine.cell_at((0, 0)), Cell::Excluded);
        assert_eq!(engine.cell_at((0, 1)), Cell::Excluded);
    }

    #[test]
    fn all_excluded_rect_appends_minus_term_without_touching_grid() {
        let mut engine = SelectionEngine::new();
        drag(&mut engine, (5, 5), (5, 5));
        drag(&mut engine, (5, 5), (5, 5));
        let grid = engine.grid().clone();

        let outcome = drag(&mut engine, (5, 5), (5, 5));

        assert_eq!(
            outcome,
            DragOutcome::Committed(Term::new(Sign::Minus, TermShape::Count(1)))
        );
        assert_eq!(engine.equation().to_string(), "1 - 1 - 1 =");
        assert_eq!(engine.grid(), &grid);
        assert_eq!(engine.cell_at((5, 5)), Cell::Excluded);
    }

    #[test]
    fn term_counts_whole_rect_even_over_excluded_cells() {
        let mut engine = SelectionEngine::new();
        drag(&mut engine, (0, 0), (0, 1));
        drag(&mut engine, (0, 0), (0, 0));

        drag(&mut engine, (0, 0), (0, 1));

        assert_eq!(engine.equation().to_string(), "2 - 1 - 2 =");
        assert_eq!(engine.selected_count(), 0);
        assert!(engine.check_answer("0"));
    }

    #[test]
    fn mixed_rect_is_rejected_with_message() {
        let mut engine = SelectionEngine::new();
        drag(&mut engine, (0, 0), (0, 0));
        let grid = engine.grid().clone();
        let equation = engine.equation().clone();

        let outcome = drag(&mut engine, (0, 0), (1, 1));

        let DragOutcome::Conflict(ticket) = outcome else {
            panic!("expected conflict, got {:?}", outcome);
        };
        assert_eq!(engine.grid(), &grid);
        assert_eq!(engine.equation(), &equation);
        assert_eq!(engine.message(), Some(CONFLICT_MESSAGE));
        assert!(!engine.is_dragging());

        assert!(engine.expire_message(ticket));
        assert_eq!(engine.message(), None);
    }

    #[test]
    fn conflict_message_lasts_three_seconds() {
        assert_eq!(CONFLICT_MESSAGE_TIMEOUT.as_millis(), 3000);
    }

    #[test]
    fn newer_conflict_supersedes_older_ticket() {
        let mut engine = SelectionEngine::new();
        drag(&mut engine, (0, 0), (0, 0));

        let DragOutcome::Conflict(first) = drag(&mut engine, (0, 0), (0, 1)) else {
            panic!("expected conflict");
        };
        let DragOutcome::Conflict(second) = drag(&mut engine, (0, 0), (1, 0)) else {
            panic!("expected conflict");
        };

        assert!(!engine.expire_message(first));
        assert_eq!(engine.message(), Some(CONFLICT_MESSAGE));
        assert!(engine.expire_message(second));
        assert_eq!(engine.message(), None);
    }

    #[test]
    fn reset_invalidates_pending_message() {
        let mut engine = SelectionEngine::new();
        drag(&mut engine, (0, 0), (0, 0));
        let DragOutcome::Conflict(ticket) = drag(&mut engine, (0, 0), (0, 1)) else {
            panic!("expected conflict");
        };

        engine.reset();

        assert_eq!(engine.message(), None);
        assert!(!engine.expire_message(ticket));
    }

    #[test]
    fn stray_begin_drag_keeps_original_start() {
        let mut engine = SelectionEngine::new();
        engine.begin_drag((1, 1)).unwrap();

        assert_eq!(engine.begin_drag((7, 7)).unwrap(), DragStart::AlreadyDragging);
        assert_eq!(engine.selection(), Some(Rect::from_corners((1, 1), (1, 1))));
    }

    #[test]
    fn update_and_end_while_idle_do_nothing() {
        let mut engine = SelectionEngine::new();

        assert!(!engine.update_drag((3, 3)).unwrap());
        assert_eq!(engine.end_drag(), DragOutcome::Idle);
        assert_eq!(engine, SelectionEngine::new());
    }

    #[test]
    fn out_of_bounds_coords_are_rejected() {
        let mut engine = SelectionEngine::new();

        assert_eq!(engine.begin_drag((10, 0)), Err(GridError::InvalidCoords));
        assert!(!engine.is_dragging());

        engine.begin_drag((0, 0)).unwrap();
        assert_eq!(engine.update_drag((0, 10)), Err(GridError::InvalidCoords));
        assert_eq!(engine.selection(), Some(Rect::from_corners((0, 0), (0, 0))));
    }

    #[test]
    fn update_drag_only_highlights() {
        let mut engine = SelectionEngine::new();
        engine.begin_drag((2, 2)).unwrap();

        assert!(engine.update_drag((3, 4)).unwrap());
        assert!(!engine.update_drag((3, 4)).unwrap());

        assert!(engine.is_highlighted((3, 3)));
        assert!(!engine.is_highlighted((4, 4)));
        assert_eq!(engine.selected_count(), 0);
    }

    #[test]
    fn cancel_drag_discards_gesture() {
        let mut engine = SelectionEngine::new();
        engine.begin_drag((2, 2)).unwrap();

        assert!(engine.cancel_drag());
        assert!(!engine.cancel_drag());
        assert_eq!(engine.end_drag(), DragOutcome::Idle);
        assert!(engine.equation().is_empty());
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut engine = SelectionEngine::new();
        drag(&mut engine, (0, 0), (3, 3));
        drag(&mut engine, (0, 0), (0, 0));
        engine.set_answer("15");
        engine.begin_drag((9, 9)).unwrap();

        engine.reset();

        assert!(engine.grid().iter().all(|(_, cell)| cell == Cell::Unselected));
        assert_eq!(engine.equation().to_string(), "");
        assert_eq!(engine.answer(), "");
        assert!(!engine.is_dragging());
    }

    #[test]
    fn check_answer_compares_decimal_text_exactly() {
        let mut engine = SelectionEngine::new();
        drag(&mut engine, (0, 0), (1, 1));

        assert!(engine.check_answer("4"));
        assert!(!engine.check_answer("04"));
        assert!(!engine.check_answer(" 4"));
        assert!(!engine.check_answer("four"));
        assert!(!engine.check_answer(""));
    }

    #[test]
    fn check_answer_ignores_excluded_cells() {
        let mut engine = SelectionEngine::new();
        drag(&mut engine, (0, 0), (0, 9));
        drag(&mut engine, (0, 0), (0, 2));
        engine.set_answer("7");

        assert!(engine.check_current_answer());
    }

    #[test]
    fn empty_grid_answer_is_zero() {
        let engine = SelectionEngine::new();

        assert!(engine.check_answer("0"));
    }
}
