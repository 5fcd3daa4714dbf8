//! Tab-delimited table loading.

use std::ops::ControlFlow;
use std::path::Path;

use datadiff_table::{fit_row, Row};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::encoding::TextEncoding;
use crate::loaded::Loaded;
use crate::text::{present, read_text_file};

/// A parsed tab-delimited file. Every row has the header's width.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabTable {
    /// First non-blank line.
    pub header: Row,
    /// Remaining non-blank lines.
    pub rows: Vec<Row>,
}

impl TabTable {
    /// Number of columns.
    pub fn width(&self) -> usize {
        self.header.len()
    }

    /// Returns `true` if the file held no data lines.
    pub fn is_empty(&self) -> bool {
        self.header.is_empty() && self.rows.is_empty()
    }
}

fn split_fields(line: &str) -> Row {
    line.strip_suffix('\r')
        .unwrap_or(line)
        .split('\t')
        .map(str::to_owned)
        .collect()
}

/// Parse tab-delimited text.
pub fn parse_table(text: &str) -> TabTable {
    match parse_table_with(text, 0, &mut |_, _| ControlFlow::Continue(())) {
        ControlFlow::Continue(table) => table,
        ControlFlow::Break(()) => TabTable::default(),
    }
}

/// Parse tab-delimited text, reporting progress every `tick_every` lines.
///
/// `on_progress` receives `(lines_done, lines_total)`; returning `Break`
/// abandons parsing and no partial table is produced. A `tick_every` of
/// zero disables progress reports.
pub fn parse_table_with(
    text: &str,
    tick_every: usize,
    on_progress: &mut dyn FnMut(usize, usize) -> ControlFlow<()>,
) -> ControlFlow<(), TabTable> {
    let total = text.lines().count();
    let mut lines = text.lines().enumerate().filter(|(_, line)| !line.trim().is_empty());

    let Some((_, first)) = lines.next() else {
        return ControlFlow::Continue(TabTable::default());
    };
    let header = split_fields(first);
    let width = header.len();

    let mut rows = Vec::new();
    for (index, line) in lines {
        if tick_every > 0 && index % tick_every == 0 {
            on_progress(index, total)?;
        }
        rows.push(fit_row(split_fields(line), width));
    }
    if tick_every > 0 {
        on_progress(total, total)?;
    }
    debug!(width, rows = rows.len(), "parsed tab-delimited table");
    ControlFlow::Continue(TabTable { header, rows })
}

/// Load a tab-delimited file. An absent or missing file is an empty table.
pub fn load_table(path: Option<&Path>, encodings: &[TextEncoding]) -> Loaded<TabTable> {
    match load_table_with(path, encodings, 0, &mut |_, _| ControlFlow::Continue(())) {
        ControlFlow::Continue(loaded) => loaded,
        ControlFlow::Break(()) => Loaded::ok(TabTable::default()),
    }
}

/// [`load_table`] with progress reports while parsing; see [`parse_table_with`].
pub fn load_table_with(
    path: Option<&Path>,
    encodings: &[TextEncoding],
    tick_every: usize,
    on_progress: &mut dyn FnMut(usize, usize) -> ControlFlow<()>,
) -> ControlFlow<(), Loaded<TabTable>> {
    let Some(path) = present(path) else {
        return ControlFlow::Continue(Loaded::ok(TabTable::default()));
    };
    match read_text_file(path, encodings) {
        Ok(text) => {
            let table = parse_table_with(&text, tick_every, on_progress)?;
            ControlFlow::Continue(Loaded::ok(table))
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "table load failed");
            ControlFlow::Continue(Loaded::with_problem(TabTable::default(), err))
        }
    }
}
