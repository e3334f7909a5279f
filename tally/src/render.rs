//! Plain-text rendering of reports.

use std::fmt::{self, Write};

use crate::workbench::{Report, Snapshot};

/// Renders a two-column table with a border, sized to its widest cell.
///
/// ```text
/// +----------+-------+
/// | Position | Value |
/// +----------+-------+
/// | 0        | a     |
/// +----------+-------+
/// ```
pub fn table(header: (&str, &str), rows: &[(String, String)]) -> String {
    let left = rows
        .iter()
        .map(|(l, _)| l.chars().count())
        .chain([header.0.chars().count()])
        .max()
        .unwrap_or(0);
    let right = rows
        .iter()
        .map(|(_, r)| r.chars().count())
        .chain([header.1.chars().count()])
        .max()
        .unwrap_or(0);

    let rule = format!("+{}+{}+\n", "-".repeat(left + 2), "-".repeat(right + 2));
    let mut out = String::with_capacity(rule.len() * (rows.len() + 4));

    out.push_str(&rule);
    // Writing to a String cannot fail
    let _ = writeln!(out, "| {:<left$} | {:<right$} |", header.0, header.1);
    out.push_str(&rule);
    for (l, r) in rows {
        let _ = writeln!(out, "| {l:<left$} | {r:<right$} |");
    }
    if !rows.is_empty() {
        out.push_str(&rule);
    }
    out
}

/// One-line summary under a table: count, ring figures, time and memory.
pub fn footer(snapshot: Option<&Snapshot>, report: &Report) -> String {
    let mut parts = Vec::with_capacity(4);
    if let Some(snapshot) = snapshot {
        parts.push(format!("count: {}", snapshot.len));
        if let Some(ring) = snapshot.ring {
            parts.push(format!(
                "capacity: {}, free: {}, front: {}, rear: {}",
                ring.capacity, ring.free, ring.front, ring.rear
            ));
        }
    }
    parts.push(format!("time: {:.3} µs", report.totals.elapsed_micros()));
    parts.push(match report.totals.memory_delta() {
        Some(bytes) => format!("memory: {bytes} bytes"),
        None => "memory: n/a".to_string(),
    });
    parts.join(" | ")
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.structure {
            Some(structure) => writeln!(f, "== {structure} ==")?,
            None => writeln!(f, "== all ==")?,
        }
        for message in &self.messages {
            writeln!(f, "  {message}")?;
        }
        if let Some(snapshot) = &self.snapshot {
            f.write_str(&table(snapshot.columns, &snapshot.rows))?;
        }
        writeln!(f, "{}", footer(self.snapshot.as_ref(), self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Structure;
    use crate::workbench::{Message, RingFigures};
    use tally_probe::Totals;

    #[test]
    fn table_pads_to_widest_cell() {
        let rows = vec![
            ("0".to_string(), "apple".to_string()),
            ("1".to_string(), "fig".to_string()),
        ];
        let rendered = table(("Position", "Value"), &rows);

        let expected = "\
+----------+-------+
| Position | Value |
+----------+-------+
| 0        | apple |
| 1        | fig   |
+----------+-------+
";
        assert_eq!(rendered, expected);
    }

    #[test]
    fn empty_table_is_just_the_header() {
        let rendered = table(("Slot", "Value"), &[]);
        assert_eq!(rendered.lines().count(), 3);
    }

    #[test]
    fn footer_shows_ring_figures_and_unknown_memory() {
        let snapshot = Snapshot {
            columns: Structure::Ring.columns(),
            rows: Vec::new(),
            len: 1,
            ring: Some(RingFigures {
                capacity: 3,
                free: 2,
                front: 0,
                rear: 1,
            }),
        };
        let report = Report {
            structure: Some(Structure::Ring),
            messages: vec![Message::Inserted("a".into())],
            totals: Totals::new(),
            snapshot: Some(snapshot),
        };

        assert_eq!(
            footer(report.snapshot.as_ref(), &report),
            "count: 1 | capacity: 3, free: 2, front: 0, rear: 1 | time: 0.000 µs | memory: n/a"
        );
        let text = report.to_string();
        assert!(text.starts_with("== ring ==\n  a: inserted\n"));
    }
}
