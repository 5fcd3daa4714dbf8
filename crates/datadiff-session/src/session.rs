//! The diff session: load both sides of a pair and build its renderable diff.

use std::fs;
use std::ops::ControlFlow;
use std::path::Path;

use datadiff_align::AlignedView;
use datadiff_load::{
    load_json_lines, load_json_value, load_sprite, load_table_with, load_text_lines, JsonEntryDiff, LoadError, Loaded,
    SpriteDiff, TabTable,
};
use datadiff_table::SplitTables;
use tracing::{debug, info};

use crate::config::SessionConfig;
use crate::content::{ContentType, FilePair};
use crate::error::{SessionError, SessionResult};
use crate::progress::{LoadStage, Progress};

/// The renderable difference of one file pair.
#[derive(Clone, Debug)]
pub enum SessionDiff {
    /// Aligned text or canonical JSON lines.
    Lines(AlignedView),
    /// Top-level JSON entries side by side.
    Entries(JsonEntryDiff),
    /// Side-by-side record tables.
    Table(SplitTables),
    Sprite(SpriteDiff),
    /// Only byte equality is known.
    Binary { identical: bool },
}

impl SessionDiff {
    /// Whether the two sides show no difference.
    pub fn is_identical(&self) -> bool {
        match self {
            Self::Lines(view) => view.is_identical(),
            Self::Entries(diff) => diff.is_identical(),
            Self::Table(tables) => tables.left().diff_rows().is_empty() && tables.right().diff_rows().is_empty(),
            Self::Sprite(diff) => diff.is_identical(),
            Self::Binary { identical } => *identical,
        }
    }
}

/// A finished comparison.
#[derive(Debug)]
pub struct Comparison {
    /// How the pair was compared.
    pub content_type: ContentType,
    pub diff: SessionDiff,
    /// Per-side load failures; their sides hold placeholder content.
    pub problems: Vec<LoadError>,
}

/// Loads and compares file pairs with an injected configuration.
///
/// Each call to [`DiffSession::open`] owns the data it loads; nothing is
/// cached between comparisons.
#[derive(Clone, Debug, Default)]
pub struct DiffSession {
    config: SessionConfig,
}

impl DiffSession {
    pub fn new(config: SessionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Content type implied by the pair's extension.
    pub fn content_type(&self, pair: &FilePair) -> ContentType {
        pair.extension()
            .map_or(ContentType::Binary, |ext| self.config.content_type_for(&ext))
    }

    /// Compare a pair using the content type implied by its extension.
    pub fn open(&self, pair: &FilePair, progress: &mut dyn Progress) -> SessionResult<Comparison> {
        self.open_as(pair, self.content_type(pair), progress)
    }

    /// Compare a pair as `content_type`.
    ///
    /// Both sides load sequentially, left first. If `progress` breaks at
    /// any tick the session stops and returns [`SessionError::Cancelled`].
    pub fn open_as(
        &self,
        pair: &FilePair,
        content_type: ContentType,
        progress: &mut dyn Progress,
    ) -> SessionResult<Comparison> {
        if pair.is_empty() {
            return Err(SessionError::NoInput);
        }
        info!(left = ?pair.left, right = ?pair.right, ?content_type, "opening comparison");

        let (diff, problems) = match content_type {
            ContentType::Text | ContentType::Json => self.compare_lines(pair, content_type, progress)?,
            ContentType::JsonEntries => self.compare_json_entries(pair, progress)?,
            ContentType::Table => self.compare_tables(pair, progress)?,
            ContentType::Sprite => compare_sprites(pair, progress)?,
            ContentType::Binary => compare_bytes(pair, progress)?,
        };
        debug!(identical = diff.is_identical(), problems = problems.len(), "comparison ready");
        Ok(Comparison {
            content_type,
            diff,
            problems,
        })
    }

    fn compare_lines(
        &self,
        pair: &FilePair,
        content_type: ContentType,
        progress: &mut dyn Progress,
    ) -> SessionResult<(SessionDiff, Vec<LoadError>)> {
        let load = |path: Option<&Path>| match content_type {
            ContentType::Json => load_json_lines(path, &self.config.encodings),
            _ => load_text_lines(path, &self.config.encodings),
        };
        let left = load_side(progress, LoadStage::Left, || load(pair.left()))?;
        let right = load_side(progress, LoadStage::Right, || load(pair.right()))?;

        step(progress, LoadStage::Compare, 0, 1)?;
        let view = AlignedView::build(&left.content, &right.content, self.config.granularity);
        step(progress, LoadStage::Compare, 1, 1)?;
        Ok((SessionDiff::Lines(view), problems(left.problem, right.problem)))
    }

    fn compare_json_entries(
        &self,
        pair: &FilePair,
        progress: &mut dyn Progress,
    ) -> SessionResult<(SessionDiff, Vec<LoadError>)> {
        let encodings = &self.config.encodings;
        let left = load_side(progress, LoadStage::Left, || load_json_value(pair.left(), encodings))?;
        let right = load_side(progress, LoadStage::Right, || load_json_value(pair.right(), encodings))?;

        step(progress, LoadStage::Compare, 0, 1)?;
        let diff = JsonEntryDiff::compare_sides(left.content.as_ref(), right.content.as_ref());
        step(progress, LoadStage::Compare, 1, 1)?;
        Ok((SessionDiff::Entries(diff), problems(left.problem, right.problem)))
    }

    fn compare_tables(
        &self,
        pair: &FilePair,
        progress: &mut dyn Progress,
    ) -> SessionResult<(SessionDiff, Vec<LoadError>)> {
        let left = self.load_table_side(pair.left(), LoadStage::Left, progress)?;
        let right = self.load_table_side(pair.right(), LoadStage::Right, progress)?;

        step(progress, LoadStage::Compare, 0, 1)?;
        let TabTable { header: left_header, rows: left_rows } = left.content;
        let TabTable { header: right_header, rows: right_rows } = right.content;
        let tables = SplitTables::new(left_rows, left_header, right_rows, right_header);
        step(progress, LoadStage::Compare, 1, 1)?;
        Ok((SessionDiff::Table(tables), problems(left.problem, right.problem)))
    }

    fn load_table_side(
        &self,
        path: Option<&Path>,
        stage: LoadStage,
        progress: &mut dyn Progress,
    ) -> SessionResult<Loaded<TabTable>> {
        let interval = self.config.progress_interval;
        let flow = load_table_with(path, &self.config.encodings, interval, &mut |done, total| {
            progress.tick(stage, done, total)
        });
        match flow {
            ControlFlow::Continue(loaded) => Ok(loaded),
            ControlFlow::Break(()) => Err(cancelled(stage)),
        }
    }
}

fn compare_sprites(pair: &FilePair, progress: &mut dyn Progress) -> SessionResult<(SessionDiff, Vec<LoadError>)> {
    let left = load_side(progress, LoadStage::Left, || load_sprite(pair.left()))?;
    let right = load_side(progress, LoadStage::Right, || load_sprite(pair.right()))?;
    step(progress, LoadStage::Compare, 0, 1)?;
    let diff = SpriteDiff::compare(left.content.as_ref(), right.content.as_ref());
    Ok((SessionDiff::Sprite(diff), problems(left.problem, right.problem)))
}

fn compare_bytes(pair: &FilePair, progress: &mut dyn Progress) -> SessionResult<(SessionDiff, Vec<LoadError>)> {
    let left = load_side(progress, LoadStage::Left, || read_bytes(pair.left()))?;
    let right = load_side(progress, LoadStage::Right, || read_bytes(pair.right()))?;
    step(progress, LoadStage::Compare, 0, 1)?;
    let identical = match (&left.content, &right.content) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    };
    Ok((SessionDiff::Binary { identical }, problems(left.problem, right.problem)))
}

fn read_bytes(path: Option<&Path>) -> Loaded<Option<Vec<u8>>> {
    let Some(path) = path else {
        return Loaded::ok(None);
    };
    match fs::read(path) {
        Ok(bytes) => Loaded::ok(Some(bytes)),
        Err(source) => Loaded::with_problem(
            None,
            LoadError::Io {
                path: path.to_path_buf(),
                source,
            },
        ),
    }
}

/// Load one side between a start and a finish tick.
fn load_side<T>(progress: &mut dyn Progress, stage: LoadStage, load: impl FnOnce() -> T) -> SessionResult<T> {
    step(progress, stage, 0, 1)?;
    let loaded = load();
    step(progress, stage, 1, 1)?;
    Ok(loaded)
}

fn step(progress: &mut dyn Progress, stage: LoadStage, done: usize, total: usize) -> SessionResult<()> {
    match progress.tick(stage, done, total) {
        ControlFlow::Continue(()) => Ok(()),
        ControlFlow::Break(()) => Err(cancelled(stage)),
    }
}

fn cancelled(stage: LoadStage) -> SessionError {
    info!(?stage, "comparison cancelled");
    SessionError::Cancelled
}

fn problems(left: Option<LoadError>, right: Option<LoadError>) -> Vec<LoadError> {
    left.into_iter().chain(right).collect()
}
