pub mod debug;
pub mod feed;
pub mod help_overlay;
pub mod html;
pub mod spinner;
pub mod status_bar;


use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
};

use crate::app::App;

/// Header rows: two lines of statistics plus the bottom border.
pub const HEADER_HEIGHT: u16 = 3;
pub const DEBUG_PANE_HEIGHT: u16 = 10;

/// Screen regions, shared by rendering and by the app's scroll geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Areas {
    pub header: Rect,
    pub document: Rect,
    pub status: Rect,
    pub debug: Option<Rect>,
}

pub fn layout(area: Rect, debug_visible: bool) -> Areas {
    let (main_area, debug) = if debug_visible {
        let chunks = Layout::vertical([
            Constraint::Min(0),                    // Main content
            Constraint::Length(DEBUG_PANE_HEIGHT), // Debug pane
        ])
        .split(area);
        (chunks[0], Some(chunks[1]))
    } else {
        (area, None)
    };

    let chunks = Layout::vertical([
        Constraint::Length(HEADER_HEIGHT),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .split(main_area);

    Areas {
        header: chunks[0],
        document: chunks[1],
        status: chunks[2],
        debug,
    }
}

pub fn render(app: &App, frame: &mut Frame) {
    let area = frame.area();
    let areas = layout(area, app.debug.visible);

    feed::render(frame, app, areas.header, areas.document, areas.status);

    if let Some(debug_area) = areas.debug {
        debug::render(frame, app, debug_area);
    }

    help_overlay::render(frame, app, area);
}
