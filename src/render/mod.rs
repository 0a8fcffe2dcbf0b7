use std::time::Duration;

use console::style;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

use crate::events::InboundEvent;
use crate::models::{Finding, PathNode};
use crate::session::SessionSnapshot;

/// Manages the indicatif progress display during a streaming scan: a
/// spinner while the unit total is unknown, a bar once it arrives.
pub struct ScanProgress {
    multi: MultiProgress,
    bar: ProgressBar,
    has_total: bool,
}

impl ScanProgress {
    pub fn new(label: &str) -> Self {
        let multi = MultiProgress::new();
        let bar = multi.add(ProgressBar::new_spinner());
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("  {spinner:.cyan} {msg}")
                .unwrap(),
        );
        bar.set_message(format!("Scanning {}...", label));
        bar.enable_steady_tick(Duration::from_millis(120));

        Self { multi, bar, has_total: false }
    }

    /// Update the display for one applied event, using the session snapshot
    /// as the single source of truth for counts.
    pub fn handle_event(&mut self, event: &InboundEvent, snapshot: &SessionSnapshot) {
        match event {
            InboundEvent::TotalUnits(total) => {
                if self.has_total {
                    self.bar.set_length(*total);
                } else {
                    self.bar.finish_and_clear();
                    let bar = self.multi.add(ProgressBar::new(*total));
                    bar.set_style(
                        ProgressStyle::default_bar()
                            .template("  {bar:30.cyan/dark_gray} {pos}/{len} files | {msg}")
                            .unwrap()
                            .progress_chars("█▓░"),
                    );
                    self.bar = bar;
                    self.has_total = true;
                }
                self.bar.set_position(snapshot.processed_units);
                self.bar.set_message("analyzing".to_string());
            }
            InboundEvent::UnitProcessed(finding) => {
                self.bar.set_position(snapshot.processed_units);
                self.bar.set_message(format!(
                    "{}% | {} findings",
                    snapshot.percentage,
                    snapshot.findings.len(),
                ));
                self.println(&render_finding_line(finding));
            }
            InboundEvent::FileList(paths) => {
                self.println(&format!(
                    "  {} file structure received ({} paths)",
                    style("i").cyan(),
                    paths.len(),
                ));
            }
            InboundEvent::Completed => {
                self.bar.finish_with_message(format!(
                    "analysis complete: {} findings",
                    snapshot.findings.len(),
                ));
            }
            InboundEvent::Error(message) => {
                self.bar.abandon_with_message(format!("scan failed: {}", message));
            }
        }
    }

    /// Print a line through the multi-progress (won't interfere with bars).
    pub fn println(&self, msg: &str) {
        let _ = self.multi.println(msg);
    }
}

fn render_finding_line(finding: &Finding) -> String {
    format!(
        "  {} {} {}",
        style("▸").red(),
        style(&finding.category).white().bold(),
        style(&finding.location).dim(),
    )
}

/// Full finding cards for the end-of-scan report.
pub fn render_findings(findings: &[Finding]) -> String {
    if findings.is_empty() {
        return format!("\n  {}\n", style("No vulnerabilities reported.").green());
    }

    let mut out = String::new();
    out.push_str(&format!(
        "\n{}\n",
        style(format!("Findings ({}):", findings.len())).white().bold(),
    ));
    for (i, finding) in findings.iter().enumerate() {
        out.push_str(&format!(
            "\n  {} {}\n",
            style(format!("[{}]", i + 1)).cyan().bold(),
            style(&finding.category).white().bold(),
        ));
        out.push_str(&format!("      {} {}\n", style("File:").dim(), finding.location));
        out.push_str(&format!("      {} {}\n", style("Issue:").dim(), finding.description));
        out.push_str(&format!("      {} {}\n", style("Fix:").dim(), finding.remediation));
    }
    out
}

/// Indented file-tree listing, directories before their contents.
pub fn render_tree(nodes: &[PathNode]) -> String {
    fn walk(nodes: &[PathNode], depth: usize, out: &mut String) {
        for node in nodes {
            let indent = "  ".repeat(depth + 1);
            match node {
                PathNode::Interior { label, children } => {
                    out.push_str(&format!("{}{}/\n", indent, style(label).cyan().bold()));
                    walk(children, depth + 1, out);
                }
                PathNode::Leaf { label } => {
                    out.push_str(&format!("{}{}\n", indent, label));
                }
            }
        }
    }

    let mut out = String::new();
    walk(nodes, 0, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::build_tree;

    #[test]
    fn test_render_tree_indents_children() {
        console::set_colors_enabled(false);
        let tree = build_tree(["a/b.js", "d.js"]);
        let rendered = render_tree(&tree);
        assert_eq!(rendered, "  a/\n    b.js\n  d.js\n");
    }

    #[test]
    fn test_render_findings_empty() {
        console::set_colors_enabled(false);
        assert!(render_findings(&[]).contains("No vulnerabilities"));
    }

    #[test]
    fn test_render_findings_numbers_entries() {
        console::set_colors_enabled(false);
        let findings = vec![
            Finding {
                category: "XSS".to_string(),
                location: "a.js".to_string(),
                description: "d".to_string(),
                remediation: "r".to_string(),
            };
            2
        ];
        let rendered = render_findings(&findings);
        assert!(rendered.contains("[1]"));
        assert!(rendered.contains("[2]"));
        assert!(rendered.contains("Findings (2):"));
    }
}
