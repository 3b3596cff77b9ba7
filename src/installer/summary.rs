//! Display and output functions for install operation
//! Handles printing the version transition and end-of-run summary

use console::Style;

use super::InstallReport;
use crate::domain::ArtifactGroup;

/// Lines of the summary, without styling
pub fn summary_lines(report: &InstallReport) -> Vec<String> {
    let mut lines = Vec::new();

    if report.dry_run {
        lines.push(format!(
            "[DRY RUN] {} from {}",
            report.transition, report.revision.reference
        ));
        lines.push(format!(
            "[DRY RUN] Would install {} artifact(s):",
            report.planned.len()
        ));
        lines.extend(report.planned.iter().map(|path| format!("  - {path}")));
        if !report.legacy.removed.is_empty() {
            lines.push(format!(
                "[DRY RUN] Would remove {} legacy artifact(s):",
                report.legacy.removed.len()
            ));
            lines.extend(report.legacy.removed.iter().map(|path| format!("  - {path}")));
        }
        return lines;
    }

    let tally = &report.tally;
    lines.push(report.transition.to_string());

    let groups = ArtifactGroup::ALL
        .iter()
        .map(|group| format!("{group} {}", tally.in_group(*group)))
        .collect::<Vec<_>>()
        .join(", ");
    lines.push(format!(
        "Installed {}/{} artifact(s): {groups}",
        tally.succeeded,
        tally.total()
    ));
    lines.push(format!(
        "  {} changed, {} unchanged, {} bytes",
        tally.changed(),
        tally.unchanged,
        tally.bytes
    ));

    if !report.legacy.removed.is_empty() {
        lines.push(format!(
            "Removed {} legacy artifact(s):",
            report.legacy.removed.len()
        ));
        lines.extend(report.legacy.removed.iter().map(|path| format!("  - {path}")));
    }
    for command in &report.deregistered {
        lines.push(format!("Deregistered legacy install: {command}"));
    }

    if tally.failed > 0 {
        lines.push(format!("Failed {} artifact(s):", tally.failed));
        lines.extend(
            tally
                .failures
                .iter()
                .map(|failure| format!("  - {}: {}", failure.path, failure.reason)),
        );
    }

    lines.push(closing_line(report));
    lines
}

/// Final status line of a non-dry run
fn closing_line(report: &InstallReport) -> String {
    let tally = &report.tally;
    if tally.failed == 0 {
        format!(
            "Install complete: {} file(s), {} bytes",
            tally.succeeded, tally.bytes
        )
    } else {
        format!(
            "Install incomplete: {} of {} failed, {} bytes",
            tally.failed,
            tally.total(),
            tally.bytes
        )
    }
}

/// Print the summary, colouring the headline and failures
pub fn print_install_summary(report: &InstallReport) {
    let bold = Style::new().bold();
    let warn = Style::new().yellow();
    let bad = Style::new().red().bold();
    let good = Style::new().green().bold();

    for (index, line) in summary_lines(report).iter().enumerate() {
        if index == 0 {
            println!("{}", bold.apply_to(line));
        } else if line.starts_with("Install complete") {
            println!("{}", good.apply_to(line));
        } else if line.starts_with("Failed") || line.starts_with("Install incomplete") {
            println!("{}", bad.apply_to(line));
        } else if line.starts_with("Removed") {
            println!("{}", warn.apply_to(line));
        } else {
            println!("{line}");
        }
    }
    for warning in &report.legacy.warnings {
        eprintln!("{} {warning}", warn.apply_to("warning:"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::installer::{ArtifactFailure, InstallTally};
    use crate::reconciler::ReconcileReport;
    use crate::resolver::{RemoteRevision, VersionTransition};
    use std::collections::BTreeMap;

    fn report(tally: InstallTally) -> InstallReport {
        InstallReport {
            revision: RemoteRevision::tag("v4.2.0"),
            transition: VersionTransition::between(Some("4.1.0"), "4.2.0"),
            tally,
            legacy: ReconcileReport {
                removed: vec!["rules/core.md".to_string()],
                warnings: Vec::new(),
            },
            deregistered: Vec::new(),
            previous_run_interrupted: false,
            dry_run: false,
            planned: Vec::new(),
        }
    }

    #[test]
    fn test_summary_counts() {
        let tally = InstallTally {
            succeeded: 12,
            failed: 1,
            per_group: BTreeMap::from([
                (ArtifactGroup::Rules, 1),
                (ArtifactGroup::Skills, 8),
                (ArtifactGroup::Agents, 3),
            ]),
            bytes: 2048,
            unchanged: 2,
            failures: vec![ArtifactFailure {
                path: "skills/cco-pr/SKILL.md".to_string(),
                reason: "HTTP 404 Not Found".to_string(),
            }],
        };
        let lines = summary_lines(&report(tally));

        assert_eq!(lines[0], "4.1.0 → 4.2.0");
        assert_eq!(lines[1], "Installed 12/13 artifact(s): rules 1, skills 8, agents 3");
        assert_eq!(lines[2], "  10 changed, 2 unchanged, 2048 bytes");
        assert!(lines.contains(&"  - rules/core.md".to_string()));
        assert!(lines.contains(&"  - skills/cco-pr/SKILL.md: HTTP 404 Not Found".to_string()));
        assert_eq!(
            lines.last().unwrap(),
            "Install incomplete: 1 of 13 failed, 2048 bytes"
        );
    }

    #[test]
    fn test_summary_ends_with_completion_line() {
        let tally = InstallTally {
            succeeded: 13,
            bytes: 4096,
            ..InstallTally::default()
        };
        let lines = summary_lines(&report(tally));
        assert_eq!(lines.last().unwrap(), "Install complete: 13 file(s), 4096 bytes");
    }

    #[test]
    fn test_dry_run_summary() {
        let mut report = report(InstallTally::default());
        report.dry_run = true;
        report.planned = vec!["rules/cco-rules.md".to_string()];
        let lines = summary_lines(&report);

        assert_eq!(lines[0], "[DRY RUN] 4.1.0 → 4.2.0 from v4.2.0");
        assert!(lines.contains(&"  - rules/cco-rules.md".to_string()));
        assert!(lines.iter().any(|l| l.starts_with("[DRY RUN] Would remove 1")));
        assert!(!lines.iter().any(|l| l.starts_with("Install complete")));
    }
}
