use colored::Colorize;
use docseek::SearchOutput;
use std::path::Path;

const RULE_WIDTH: usize = 60;

/// Renders the search report. Records must already be in aggregate order;
/// a `File:` header is emitted whenever the file changes.
pub fn render(output: &SearchOutput, color: bool) -> String {
    if output.is_empty() {
        return "No matches found.".to_string();
    }

    let mut lines = vec![format!("Found {} matches:", output.total_matches())];
    let mut current: Option<&Path> = None;
    for record in &output.records {
        if current != Some(record.file()) {
            current = Some(record.file());
            lines.push(format!("\n{}", file_header(record.file(), color)));
        }
        lines.push(format!(
            "Match for '{}' at line {}:",
            record.term(),
            record.line_number()
        ));
        lines.push(record.context().to_string());
        lines.push("-".repeat(RULE_WIDTH));
    }
    lines.join("\n")
}

fn file_header(path: &Path, color: bool) -> String {
    let header = format!("File: {}", path.display());
    if color {
        header.blue().bold().to_string()
    } else {
        header
    }
}
