//! Pointer-drag reordering within a single column.
//!
//! `Idle -> Dragging -> (Dropped | Cancelled) -> Idle`. At most one session
//! exists at a time; starting a new drag replaces the old one.

use tracing::{debug, warn};

use crate::column_store::{Change, ColumnStore, IgnoreReason};
use crate::error::BoardError;
use crate::model::{Board, Column, PlayerId};
use crate::store::BackingStore;

/// Vertical extent of one rendered card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardBounds {
    pub player_id: PlayerId,
    pub top: f64,
    pub height: f64,
}

impl CardBounds {
    #[must_use]
    pub fn midpoint(&self) -> f64 {
        self.top + self.height / 2.0
    }
}

/// Geometry of one column as rendered, supplied by the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnLayout {
    pub column: Column,
    pub cards: Vec<CardBounds>,
}

impl ColumnLayout {
    #[must_use]
    pub const fn new(column: Column, cards: Vec<CardBounds>) -> Self {
        Self { column, cards }
    }

    /// Stack `ids` top to bottom with equal row heights, starting at 0.
    #[must_use]
    pub fn uniform(column: Column, ids: &[PlayerId], row_height: f64) -> Self {
        let cards = ids
            .iter()
            .zip(0_u32..)
            .map(|(id, row)| CardBounds {
                player_id: *id,
                top: f64::from(row) * row_height,
                height: row_height,
            })
            .collect();
        Self { column, cards }
    }
}

/// Where the dragged player would land.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPoint {
    Before(PlayerId),
    End,
}

/// Insertion point for `dragged` with the pointer at `pointer_y`.
///
/// Among the other cards whose midpoint lies below the pointer, the nearest
/// one is chosen; with none, the player goes to the end of the column.
#[must_use]
pub fn insertion_point(layout: &ColumnLayout, dragged: PlayerId, pointer_y: f64) -> InsertPoint {
    let mut best: Option<(f64, PlayerId)> = None;
    for card in layout.cards.iter().filter(|c| c.player_id != dragged) {
        let offset = pointer_y - card.midpoint();
        if offset < 0.0 && best.is_none_or(|(closest, _)| offset > closest) {
            best = Some((offset, card.player_id));
        }
    }
    best.map_or(InsertPoint::End, |(_, id)| InsertPoint::Before(id))
}

/// `order` with `dragged` moved to `point`.
#[must_use]
pub fn apply_insert(order: &[PlayerId], dragged: PlayerId, point: InsertPoint) -> Vec<PlayerId> {
    let mut out: Vec<PlayerId> = order.iter().copied().filter(|id| *id != dragged).collect();
    let at = match point {
        InsertPoint::Before(anchor) => out.iter().position(|id| *id == anchor),
        InsertPoint::End => None,
    };
    match at {
        Some(index) => out.insert(index, dragged),
        None => out.push(dragged),
    }
    out
}

/// An in-flight drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragSession {
    pub player_id: PlayerId,
    pub origin: Column,
    /// Last computed insertion point; `None` until the pointer moves.
    pub candidate: Option<InsertPoint>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
}

/// Where the pointer was released.
#[derive(Debug, Clone, Copy)]
pub enum DropTarget<'a> {
    Column {
        layout: &'a ColumnLayout,
        pointer_y: f64,
    },
    Outside,
}

/// How a drag ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragOutcome {
    /// Release inside the origin column; `order` is the full new order.
    Dropped { column: Column, order: Vec<PlayerId> },
    /// Release that reordering does not allow, such as another column.
    Rejected(IgnoreReason),
    Cancelled,
}

/// Owner of the single drag session.
#[derive(Debug, Clone, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    #[must_use]
    pub const fn state(&self) -> DragState {
        self.state
    }

    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    /// Begin dragging `player_id` out of `origin`.
    pub fn start(&mut self, player_id: PlayerId, origin: Column) {
        if let DragState::Dragging(previous) = self.state {
            warn!(
                previous = %previous.player_id,
                next = %player_id,
                "drag started while another was active; replacing it"
            );
        }
        self.state = DragState::Dragging(DragSession {
            player_id,
            origin,
            candidate: None,
        });
    }

    /// Recompute the candidate insertion point as the pointer moves.
    ///
    /// Returns `None` when idle or when hovering over another column.
    pub fn hover(&mut self, layout: &ColumnLayout, pointer_y: f64) -> Option<InsertPoint> {
        let DragState::Dragging(session) = &mut self.state else {
            return None;
        };
        if layout.column != session.origin {
            session.candidate = None;
            return None;
        }
        let point = insertion_point(layout, session.player_id, pointer_y);
        session.candidate = Some(point);
        Some(point)
    }

    /// Abort the gesture.
    pub fn cancel(&mut self) -> DragOutcome {
        self.state = DragState::Idle;
        DragOutcome::Cancelled
    }

    /// End the gesture and work out the resulting column order.
    ///
    /// The order is built from `board`, not from the layout, so the result is
    /// always a permutation of the column as the store last reported it.
    pub fn release(&mut self, target: DropTarget<'_>, board: &Board) -> DragOutcome {
        let DragState::Dragging(session) = std::mem::take(&mut self.state) else {
            return DragOutcome::Rejected(IgnoreReason::NoActiveDrag);
        };

        let DropTarget::Column { layout, pointer_y } = target else {
            debug!(player = %session.player_id, "drag released outside any column");
            return DragOutcome::Cancelled;
        };

        if layout.column != session.origin {
            return DragOutcome::Rejected(IgnoreReason::CrossColumnDrop {
                from: session.origin,
                to: layout.column,
            });
        }

        let current = board.ids(session.origin);
        if !current.contains(&session.player_id) {
            return DragOutcome::Rejected(IgnoreReason::NotInColumn {
                id: session.player_id,
                column: session.origin,
            });
        }

        let point = insertion_point(layout, session.player_id, pointer_y);
        DragOutcome::Dropped {
            column: session.origin,
            order: apply_insert(&current, session.player_id, point),
        }
    }
}

impl<S: BackingStore> ColumnStore<S> {
    /// Release the active drag and submit the resulting order, if any.
    ///
    /// Rejected and cancelled drags leave the board as it was and send
    /// nothing.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Sync`] if the store rejects the new order.
    pub fn finish_drag(
        &mut self,
        drag: &mut DragController,
        target: DropTarget<'_>,
    ) -> Result<Change, BoardError> {
        match drag.release(target, self.board()) {
            DragOutcome::Dropped { column, order } => self.reorder(column, order),
            DragOutcome::Rejected(reason) => Ok(Self::ignore(reason)),
            DragOutcome::Cancelled => Ok(Self::ignore(IgnoreReason::DragCancelled)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Player;

    const A: PlayerId = PlayerId(1);
    const B: PlayerId = PlayerId(2);
    const C: PlayerId = PlayerId(3);
    const D: PlayerId = PlayerId(4);

    fn board() -> Board {
        Board {
            guards: [A, B, C, D]
                .iter()
                .map(|id| Player::new(id.0, format!("P{id}"), Column::G))
                .collect(),
            forwards: vec![Player::new(9, "F", Column::F)],
            ..Board::default()
        }
    }

    fn layout(column: Column) -> ColumnLayout {
        ColumnLayout::uniform(column, &board().ids(column), 10.0)
    }

    #[test]
    fn pointer_just_below_first_card_lands_before_second() {
        // midpoints: A=5 B=15 C=25 D=35
        let point = insertion_point(&layout(Column::G), C, 8.0);
        assert_eq!(point, InsertPoint::Before(B));
        assert_eq!(apply_insert(&[A, B, C, D], C, point), vec![A, C, B, D]);
    }

    #[test]
    fn pointer_below_every_card_goes_to_end() {
        assert_eq!(insertion_point(&layout(Column::G), A, 100.0), InsertPoint::End);
        assert_eq!(apply_insert(&[A, B, C, D], A, InsertPoint::End), vec![B, C, D, A]);
    }

    #[test]
    fn dragged_card_is_never_its_own_anchor() {
        // Pointer above C's own midpoint: C is skipped, D is next below.
        assert_eq!(insertion_point(&layout(Column::G), C, 24.0), InsertPoint::Before(D));
    }

    #[test]
    fn drop_in_origin_column_produces_full_order() {
        let mut drag = DragController::default();
        drag.start(C, Column::G);
        let l = layout(Column::G);
        assert_eq!(drag.hover(&l, 8.0), Some(InsertPoint::Before(B)));

        let outcome = drag.release(
            DropTarget::Column {
                layout: &l,
                pointer_y: 8.0,
            },
            &board(),
        );
        assert_eq!(
            outcome,
            DragOutcome::Dropped {
                column: Column::G,
                order: vec![A, C, B, D]
            }
        );
        assert_eq!(drag.state(), DragState::Idle);
    }

    #[test]
    fn cross_column_drop_is_rejected() {
        let mut drag = DragController::default();
        drag.start(B, Column::G);
        let other = layout(Column::F);
        assert_eq!(drag.hover(&other, 3.0), None);
        let outcome = drag.release(
            DropTarget::Column {
                layout: &other,
                pointer_y: 3.0,
            },
            &board(),
        );
        assert_eq!(
            outcome,
            DragOutcome::Rejected(IgnoreReason::CrossColumnDrop {
                from: Column::G,
                to: Column::F
            })
        );
        assert!(!drag.is_dragging());
    }

    #[test]
    fn release_outside_cancels() {
        let mut drag = DragController::default();
        drag.start(A, Column::G);
        assert_eq!(drag.release(DropTarget::Outside, &board()), DragOutcome::Cancelled);
        assert!(!drag.is_dragging());
    }

    #[test]
    fn release_without_drag_is_rejected() {
        let mut drag = DragController::default();
        assert_eq!(
            drag.release(DropTarget::Outside, &board()),
            DragOutcome::Rejected(IgnoreReason::NoActiveDrag)
        );
    }

    #[test]
    fn new_drag_replaces_active_one() {
        let mut drag = DragController::default();
        drag.start(A, Column::G);
        drag.start(PlayerId(9), Column::F);
        let DragState::Dragging(session) = drag.state() else {
            panic!("expected an active drag");
        };
        assert_eq!(session.player_id, PlayerId(9));
        assert_eq!(session.origin, Column::F);
    }

    #[test]
    fn cancel_returns_to_idle() {
        let mut drag = DragController::default();
        drag.start(A, Column::G);
        assert_eq!(drag.cancel(), DragOutcome::Cancelled);
        assert_eq!(drag.state(), DragState::Idle);
    }
}
