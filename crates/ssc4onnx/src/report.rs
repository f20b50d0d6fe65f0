use std::{fmt, path::PathBuf};

use ssc4onnx_core::op_stats::OpHistogram;

use crate::{
    reconcile::{IoKind, IoReport, Reconciliation},
    size::human_readable_size,
    style::Style,
};

/// Where the analysed model came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLabel {
    File(PathBuf),
    /// The structure came from an in-memory model; the session was still
    /// created from this file.
    InMemory(PathBuf),
}

impl fmt::Display for SourceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceLabel::File(path) => write!(f, "{}", path.display()),
            SourceLabel::InMemory(path) => {
                write!(f, "in-memory model (session: {})", path.display())
            }
        }
    }
}

const HEADER: [&str; 2] = ["OP Type", "OPs"];
const SEPARATOR: [&str; 2] = ["----------------------", "----------"];

/// Renders the full report. The output depends only on the arguments.
pub fn render(
    hist: &OpHistogram,
    rec: &Reconciliation,
    source: &SourceLabel,
    style: &Style,
) -> String {
    let mut rows = hist
        .counts
        .iter()
        .map(|(op, count)| [op.clone(), count.to_string()])
        .collect::<Vec<_>>();
    rows.push(SEPARATOR.map(String::from));
    rows.push([
        "Model Size".to_string(),
        human_readable_size(hist.model_size as f64),
    ]);

    let mut out = render_table(HEADER, &rows);

    out.push_str(&format!("{} {} {source}\n", style.info(), style.key("file")));
    for (kind, reports) in [(IoKind::Input, &rec.inputs), (IoKind::Output, &rec.outputs)] {
        for report in reports {
            out.push_str(&render_io(kind, report, style));
        }
    }
    for d in &rec.discrepancies {
        out.push_str(&format!("{} {d}\n", style.warning()));
    }
    out.push_str(&format!("{} Finish!\n", style.info()));

    out
}

fn render_io(kind: IoKind, report: &IoReport, style: &Style) -> String {
    format!(
        "{} {} {} {} {} {} {}\n",
        style.info(),
        style.key(&format!("{kind}_name.{}", report.index)),
        report.name,
        style.key("shape"),
        report.shape,
        style.key("dtype"),
        report.dtype
    )
}

fn render_table(header: [&str; 2], rows: &[[String; 2]]) -> String {
    let mut widths = header.map(|h| h.chars().count());
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let rule = |left: &str, fill: &str, mid: &str, right: &str| {
        format!(
            "{left}{}{mid}{}{right}\n",
            fill.repeat(widths[0] + 2),
            fill.repeat(widths[1] + 2)
        )
    };
    let line = |sep: &str, cells: [&str; 2]| {
        format!(
            "{sep} {:<w0$} {sep} {:<w1$} {sep}\n",
            cells[0],
            cells[1],
            w0 = widths[0],
            w1 = widths[1]
        )
    };

    let mut out = String::new();
    out.push_str(&rule("┏", "━", "┳", "┓"));
    out.push_str(&line("┃", header));
    out.push_str(&rule("┡", "━", "╇", "┩"));
    for row in rows {
        out.push_str(&line("│", [row[0].as_str(), row[1].as_str()]));
    }
    out.push_str(&rule("└", "─", "┴", "┘"));
    out
}
