//! Shared selection and scroll position of two panes.
//!
//! Each pane registers callbacks for the events raised by the other pane.
//! Updates that do not change the stored position are dropped, so two panes
//! forwarding each other's events do not loop.

use crate::split::{Pane, SplitTables};

/// A position change forwarded to the other pane.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncEvent {
    /// A real row was selected. `display_row` is where that row sits in the
    /// receiving pane, or `None` if the pane's filter hides it.
    Selected { real_row: usize, display_row: Option<usize> },
    /// The sending pane scrolled to `offset`.
    Scrolled { offset: usize },
}

type Listener = Box<dyn FnMut(SyncEvent)>;

/// Position state shared by the left and right pane.
#[derive(Default)]
pub struct PaneSync {
    selected: Option<usize>,
    scroll: Option<usize>,
    left_listeners: Vec<Listener>,
    right_listeners: Vec<Listener>,
}

impl PaneSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback for events delivered to `pane`.
    pub fn subscribe(&mut self, pane: Pane, listener: impl FnMut(SyncEvent) + 'static) {
        match pane {
            Pane::Left => self.left_listeners.push(Box::new(listener)),
            Pane::Right => self.right_listeners.push(Box::new(listener)),
        }
    }

    /// Real row of the last selection.
    pub fn selected_real_row(&self) -> Option<usize> {
        self.selected
    }

    /// Record that `from` selected `display_row` and notify the other pane.
    ///
    /// Returns `false` when nothing changed and no callback ran.
    pub fn select(&mut self, tables: &SplitTables, from: Pane, display_row: usize) -> bool {
        let Some(real_row) = tables.pane(from).real_row(display_row) else {
            return false;
        };
        if self.selected == Some(real_row) {
            return false;
        }
        self.selected = Some(real_row);
        let to = from.other();
        let event = SyncEvent::Selected {
            real_row,
            display_row: tables.pane(to).display_row(real_row),
        };
        self.notify(to, event);
        true
    }

    /// Record a scroll offset of `from` and mirror it to the other pane.
    pub fn scroll(&mut self, from: Pane, offset: usize) -> bool {
        if self.scroll == Some(offset) {
            return false;
        }
        self.scroll = Some(offset);
        self.notify(from.other(), SyncEvent::Scrolled { offset });
        true
    }

    fn notify(&mut self, to: Pane, event: SyncEvent) {
        let listeners = match to {
            Pane::Left => &mut self.left_listeners,
            Pane::Right => &mut self.right_listeners,
        };
        for listener in listeners.iter_mut() {
            listener(event);
        }
    }
}
