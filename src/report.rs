//! Report rendering: a plain-text table for the console and an HTML table
//! for email. Both renderers are pure functions of their inputs.

use crate::config::DateWindow;
use crate::contract::{JobRecord, DATE_FORMAT};

// The last column keeps its historical name even though it carries the
// resolved login once enrichment has run.
const HEADERS: [&str; 6] = ["NAME", "UUID", "DATE", "ORIGIN", "EXECUTION", "CREATOR_UUID"];

fn title(window: &DateWindow) -> String {
    format!(
        "Jobs from {} to {}",
        window.start.format(DATE_FORMAT),
        window.end.format(DATE_FORMAT)
    )
}

fn row_cells(job: &JobRecord) -> [String; 6] {
    [
        job.name.clone(),
        job.id.clone(),
        job.display_date(),
        job.origin.clone(),
        job.execution_state.clone(),
        job.creator_name.clone(),
    ]
}

/// Render the plain-text table printed in console mode.
pub fn render_console(jobs: &[JobRecord], window: &DateWindow) -> String {
    let rows: Vec<[String; 6]> = jobs.iter().map(row_cells).collect();

    let mut widths: Vec<usize> = HEADERS.iter().map(|h| h.len()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.len());
        }
    }

    let separator = format!(
        "+{}+",
        widths
            .iter()
            .map(|w| "-".repeat(w + 2))
            .collect::<Vec<_>>()
            .join("+")
    );
    let format_row = |cells: &[String]| {
        let body = cells
            .iter()
            .zip(&widths)
            .map(|(cell, w)| format!(" {:<width$} ", cell, width = *w))
            .collect::<Vec<_>>()
            .join("|");
        format!("|{body}|")
    };

    let mut lines = Vec::with_capacity(rows.len() + 5);
    lines.push(title(window));
    lines.push(separator.clone());
    lines.push(format_row(&HEADERS.map(String::from)));
    lines.push(separator.clone());
    for row in &rows {
        lines.push(format_row(&row[..]));
    }
    lines.push(separator);
    lines.join("\n")
}

/// Render the single-string HTML document mailed in email mode.
pub fn render_email(jobs: &[JobRecord], window: &DateWindow) -> String {
    let mut html = Vec::new();
    html.push("<html>".to_string());
    html.push("<body>".to_string());
    html.push(format!("<span><strong>{}</strong></span>", title(window)));
    html.push("<table border=\"1\">".to_string());
    html.push(format!(
        "<tr>{}</tr>",
        HEADERS
            .iter()
            .map(|h| format!("<th>{h}</th>"))
            .collect::<String>()
    ));
    for job in jobs {
        html.push(format!(
            "<tr>{}</tr>",
            row_cells(job)
                .iter()
                .map(|cell| format!("<td>{cell}</td>"))
                .collect::<String>()
        ));
    }
    html.push("</table>".to_string());
    html.push("</body>".to_string());
    html.push("</html>".to_string());
    html.concat()
}
