//! `resym` command.

use crate::cli::AuditCli;
use crate::context::ServiceContext;
use crate::links::audit::{AuditOptions, AuditReport, LinkAuditor, PrefixSubstitution};
use crate::paths;

/// Execute the audit command.
///
/// # Errors
///
/// Returns an error string if the JSON report cannot be serialized.
pub fn run(cli: &AuditCli) -> Result<(), String> {
    let root = paths::resolve_existing(&paths::expand_path(&cli.root));
    let relink = match (&cli.relink_from, &cli.relink_to) {
        (Some(from), Some(to)) => {
            Some(PrefixSubstitution::new(paths::expand_path(from), paths::expand_path(to)))
        }
        _ => None,
    };
    let options = AuditOptions { relink, dry_run: cli.dry_run };

    let ctx = ServiceContext::live();
    let report = LinkAuditor::new(ctx.fs.as_ref(), options).audit(&[root], &[]);

    if cli.json {
        println!("{}", render_json(&report)?);
    } else {
        for line in render_text(&report) {
            println!("{line}");
        }
    }
    Ok(())
}

/// One line per broken link, one per repair, then the summary.
fn render_text(report: &AuditReport) -> Vec<String> {
    let mut lines = Vec::with_capacity(report.broken.len() + report.repaired.len() + 1);
    for broken in &report.broken {
        lines.push(format!("broken: {} -> {}", broken.symlink.display(), broken.target.display()));
        if let Some(repair) = report.repaired.iter().find(|r| r.symlink == broken.symlink) {
            let verb = if repair.applied { "relinked" } else { "would relink" };
            lines.push(format!(
                "{verb}: {} (was {}, now {})",
                repair.symlink.display(),
                repair.old_target.display(),
                repair.new_target.display()
            ));
        }
    }
    lines.push(report.summary_line());
    lines
}

fn render_json(report: &AuditReport) -> Result<String, String> {
    let value = serde_json::json!({
        "total": report.total,
        "bad": report.bad,
        "percent_bad": report.percent_bad(),
        "broken": report.broken,
        "repaired": report.repaired,
    });
    serde_json::to_string_pretty(&value).map_err(|e| format!("Failed to serialize report: {e}"))
}
