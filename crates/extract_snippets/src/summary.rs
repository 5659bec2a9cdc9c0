// crates/extract_snippets/src/summary.rs

use write_snippet_output::WriteOutcome;

use crate::orchestrator::ExtractionReport;

const RULE: &str = "--------------------------------------------------";

/// Human-readable account of a run: succeeded sources first, then failures
/// with their reasons.
pub fn render_summary(report: &ExtractionReport) -> String {
    let mut out = String::new();
    out.push_str(RULE);
    out.push('\n');
    out.push_str(&format!(
        "Processed {} source(s): {} succeeded, {} failed\n",
        report.total(),
        report.succeeded.len(),
        report.failed.len()
    ));

    if !report.succeeded.is_empty() {
        out.push_str(RULE);
        out.push_str("\nSucceeded:\n");
        for success in &report.succeeded {
            let action = match success.outcome {
                WriteOutcome::Written { .. } => "written to",
                WriteOutcome::KeptExisting => "kept existing",
            };
            out.push_str(&format!(
                "  {}: {} block(s) from {} {} {}\n",
                success.identifier,
                success.block_count(),
                success.input_path.display(),
                action,
                success.output_path.display()
            ));
            if let Some(doc) = &success.companion_created {
                out.push_str(&format!("    created {}\n", doc.display()));
            }
        }
    }

    if !report.failed.is_empty() {
        out.push_str(RULE);
        out.push_str("\nFailed:\n");
        for failure in &report.failed {
            out.push_str(&format!(
                "  {}: [{}] {}\n",
                failure.identifier,
                failure.error.kind(),
                failure.error
            ));
        }
    }

    out.push_str(RULE);
    out.push('\n');
    out
}
