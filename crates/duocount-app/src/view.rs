#![forbid(unsafe_code)]

//! Root view: the loading placeholder or the full counter screen.
//!
//! Layout (rows):
//!
//! ```text
//! 0  Tests example
//! 1  Change Language
//! 2
//! 3  [ Decrease ]    0     [ Increment ]
//! 4
//! 5  [ + 5 ] [ - 5 ]
//! ```

use duocount_core::geometry::Rect;
use duocount_render::frame::{Frame, HitId};
use duocount_widgets::{Button, CounterField, Header, Label, Widget};

use crate::state::AppState;

/// Hit ids of the clickable controls.
pub mod ids {
    pub const CHANGE_LANGUAGE: u32 = 1;
    pub const DECREASE_ONE: u32 = 2;
    pub const INCREASE_ONE: u32 = 3;
    pub const INCREASE_FIVE: u32 = 4;
    pub const DECREASE_FIVE: u32 = 5;
}

pub const LOADING_TEXT: &str = "Loading...";
pub const INCREASE_FIVE_LABEL: &str = "+ 5";
pub const DECREASE_FIVE_LABEL: &str = "- 5";

/// Columns between controls on a row.
const GAP: u16 = 1;
/// Rows between the header and the ±1 row, and between the two button rows.
const ROW_SPACING: u16 = 1;

/// Draw `state` into `frame`.
pub fn render(state: &AppState, frame: &mut Frame) {
    let area = frame.bounds();
    let Some(labels) = state.content.as_ref() else {
        Label::new(LOADING_TEXT).render(area.row(0), frame);
        return;
    };

    let header = Header::new(
        labels.title(),
        labels.change_language(),
        HitId::new(ids::CHANGE_LANGUAGE),
    );
    let (header_area, rest) = area.split_top(header.height());
    header.render(header_area, frame);

    let (_, rest) = rest.split_top(ROW_SPACING);
    let (step_row, rest) = rest.split_top(1);
    render_row(
        step_row,
        frame,
        &[
            Control::Button(Button::new(labels.decrease(), HitId::new(ids::DECREASE_ONE))),
            Control::Field(CounterField::new(state.counter)),
            Control::Button(Button::new(labels.increment(), HitId::new(ids::INCREASE_ONE))),
        ],
    );

    let (_, rest) = rest.split_top(ROW_SPACING);
    let (five_row, _) = rest.split_top(1);
    render_row(
        five_row,
        frame,
        &[
            Control::Button(Button::new(INCREASE_FIVE_LABEL, HitId::new(ids::INCREASE_FIVE))),
            Control::Button(Button::new(DECREASE_FIVE_LABEL, HitId::new(ids::DECREASE_FIVE))),
        ],
    );
}

enum Control<'a> {
    Button(Button<'a>),
    Field(CounterField),
}

impl Control<'_> {
    fn width(&self) -> u16 {
        match self {
            Self::Button(button) => button.width(),
            Self::Field(field) => field.width(),
        }
    }

    fn render(&self, area: Rect, frame: &mut Frame) {
        match self {
            Self::Button(button) => button.render(area, frame),
            Self::Field(field) => field.render(area, frame),
        }
    }
}

/// Lay controls left to right, clipping whatever runs past the row.
fn render_row(row: Rect, frame: &mut Frame, controls: &[Control<'_>]) {
    let mut rest = row;
    for control in controls {
        if rest.is_empty() {
            break;
        }
        let (slot, after) = rest.split_left(control.width());
        control.render(slot, frame);
        let (_, after) = after.split_left(GAP);
        rest = after;
    }
}
