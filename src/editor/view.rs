//! Presentation layer of the cell editor.
//!
//! The input control is transparent; what the user sees is this overlay,
//! painted at the same font metrics: the session text split into colored
//! runs, one per highlighter token, followed by the pending reference chip.

use crate::config::GridConfig;
use crate::formula::highlight;
use crate::render::colors::reference_color;
use crate::render::Surface;
use crate::types::EditingSession;

/// Gap between text and the top or bottom edge of a cell or the editor box.
pub(crate) const VERTICAL_PADDING: f64 = 4.0;

/// Line height as a multiple of the font size.
pub(crate) const LINE_HEIGHT: f64 = 1.5;

/// A span of text drawn in one color. `None` uses the default text color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayRun {
    pub text: String,
    pub color: Option<String>,
}

/// Overlay runs for `session`, one `Vec` per line of text.
pub fn overlay_lines(session: &EditingSession, sheet_names: &[String]) -> Vec<Vec<OverlayRun>> {
    let highlighted = highlight(&session.text, session.sheet, sheet_names);
    let mut runs: Vec<OverlayRun> = highlighted
        .tokens
        .into_iter()
        .map(|t| OverlayRun {
            text: t.text,
            color: t.color,
        })
        .collect();
    if let Some(referenced) = &session.referenced_range {
        runs.push(OverlayRun {
            text: referenced.str.clone(),
            color: Some(reference_color(highlighted.active_ranges.len()).to_string()),
        });
    }

    let mut lines = vec![Vec::new()];
    for run in runs {
        let mut parts = run.text.split('\n');
        if let Some(first) = parts.next() {
            push_run(&mut lines, first, run.color.as_ref());
        }
        for part in parts {
            lines.push(Vec::new());
            push_run(&mut lines, part, run.color.as_ref());
        }
    }
    lines
}

/// Grows the editor box so the overlay text fits. The box never shrinks
/// below its current size while editing.
pub fn fit_editor_box<S: Surface + ?Sized>(
    surface: &mut S,
    session: &mut EditingSession,
    sheet_names: &[String],
    config: &GridConfig,
) {
    let font = config.cell_font(config.font_size, false, false);
    let lines = overlay_lines(session, sheet_names);
    let mut text_width: f64 = 0.0;
    for line in &lines {
        let width: f64 = line.iter().map(|run| surface.measure_text(&run.text, &font)).sum();
        text_width = text_width.max(width);
    }
    let content_width = text_width + config.cell_padding;
    if content_width > session.editor_width - 5.0 {
        session.editor_width = content_width + 10.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let content_height = lines.len() as f64 * config.font_size * LINE_HEIGHT;
    if content_height > session.editor_height {
        session.editor_height = content_height;
    }
}

fn push_run(lines: &mut [Vec<OverlayRun>], text: &str, color: Option<&String>) {
    if text.is_empty() {
        return;
    }
    if let Some(line) = lines.last_mut() {
        line.push(OverlayRun {
            text: text.to_string(),
            color: color.cloned(),
        });
    }
}
