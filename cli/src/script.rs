//! Offline drivers: plan one outline, or replay a JSONL command script,
//! against a local engine.

use std::io::BufRead;

use layout::command::Command;
use layout::doc::{Ignored, LayoutSettings};
use layout::engine::{Action, EngineCore};
use layout::geom::Point;
use layout::planner;
use serde::Serialize;
use tracing::{debug, warn};

use crate::CliError;

/// What the CLI prints after a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Report {
    View,
    Overlay,
    Metrics,
}

/// Result of replaying a script.
#[derive(Debug, Default)]
pub struct ReplaySummary {
    pub applied: usize,
    /// `(line, reason)` for every command the engine ignored.
    pub ignored: Vec<(usize, Ignored)>,
}

/// Layout settings from the command line. The gap must keep planned panels
/// apart.
pub fn settings(gap_px: f64, history_limit: Option<usize>) -> Result<LayoutSettings, CliError> {
    if !planner::is_valid_gap(gap_px) {
        return Err(CliError::InvalidGap(gap_px));
    }
    Ok(LayoutSettings { gap_px, history_limit })
}

/// Parse an outline file: a JSON array of `{x, y}` points.
pub fn parse_polygon(text: &str) -> Result<Vec<Point>, CliError> {
    let points: Vec<Point> = serde_json::from_str(text)?;
    if points.len() < 3 {
        return Err(CliError::TooFewVertices(points.len()));
    }
    Ok(points)
}

/// Trace `points` as one roof outline and auto-tile it with `model_name`.
pub fn plan(engine: &mut EngineCore, points: &[Point], model_name: &str) -> Result<(), CliError> {
    let mut steps = vec![Command::SelectPanel { model_name: model_name.to_owned() }];
    steps.extend(points.iter().map(|&position| Command::AddVertex { position }));
    steps.push(Command::FinishPolygon);

    for (step, command) in steps.into_iter().enumerate() {
        let op = command.op();
        if let Some(reason) = ignored_reason(&engine.execute(command)) {
            return Err(CliError::Rejected { line: step + 1, op, reason });
        }
    }
    Ok(())
}

/// Apply each non-blank line of `input` as one `Command`. With `strict`,
/// the first ignored command aborts the replay.
pub fn replay(engine: &mut EngineCore, input: impl BufRead, strict: bool) -> Result<ReplaySummary, CliError> {
    let mut summary = ReplaySummary::default();
    for (index, line) in input.lines().enumerate() {
        let line_no = index + 1;
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let command: Command =
            serde_json::from_str(trimmed).map_err(|source| CliError::Script { line: line_no, source })?;
        let op = command.op();
        let actions = engine.execute(command);
        match ignored_reason(&actions) {
            Some(reason) if strict => return Err(CliError::Rejected { line: line_no, op, reason }),
            Some(reason) => {
                warn!(line = line_no, op, ?reason, "replay: command ignored");
                summary.ignored.push((line_no, reason));
            }
            None => {
                debug!(line = line_no, op, actions = actions.len(), "replay: command applied");
                summary.applied += 1;
            }
        }
    }
    Ok(summary)
}

/// Render the requested report as pretty JSON.
pub fn render(engine: &EngineCore, report: Report) -> Result<String, CliError> {
    match report {
        Report::View => to_pretty(&engine.view()),
        Report::Overlay => to_pretty(&engine.overlay()),
        Report::Metrics => {
            let metrics = engine.metrics().ok_or(CliError::NoPanelSelected)?;
            to_pretty(&metrics)
        }
    }
}

fn ignored_reason(actions: &[Action]) -> Option<Ignored> {
    actions.iter().find_map(|action| match action {
        Action::Ignored { reason } => Some(*reason),
        _ => None,
    })
}

fn to_pretty<T: Serialize>(value: &T) -> Result<String, CliError> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
#[path = "script_test.rs"]
mod tests;
