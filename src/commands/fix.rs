//! `symfix` command.

use crate::cli::FixCli;
use crate::context::ServiceContext;
use crate::driver::{self, CandidateOutcome, CandidateReport, FixOptions, FixReport};
use crate::links::classify::Scope;
use crate::paths;

use super::format_paths;

/// Execute the fix command.
///
/// Per-link failures are printed and do not make the command fail.
///
/// # Errors
///
/// Returns an error string if the answers file is unusable.
pub fn run(cli: &FixCli) -> Result<(), String> {
    let args = paths::split_arguments(&cli.paths, &cli.ignore);
    println!("root = {}", format_paths(&args.roots));
    println!("ignore = {}", format_paths(&args.ignores));

    let ctx = match &cli.answers {
        Some(path) => ServiceContext::from_answers_file(path)?,
        None => ServiceContext::live(),
    };
    let scope = Scope::new(args.roots, args.ignores);
    let options = FixOptions { auto_yes: cli.yes, dry_run: cli.dry_run };

    let report = run_with_context(&ctx, &scope, options);
    println!("{}", report.summary_line());
    Ok(())
}

/// Execute a fix run with the given service context, printing each result.
///
/// The candidate count is printed before the first question is asked.
#[must_use]
pub fn run_with_context(ctx: &ServiceContext, scope: &Scope, options: FixOptions) -> FixReport {
    let candidates = driver::collect_candidates(ctx.fs.as_ref(), scope);
    println!("{}", count_line(candidates.len()));
    driver::process(ctx, candidates, options, |visit| {
        if let Some(line) = describe(visit) {
            println!("{line}");
        }
    })
}

fn count_line(count: usize) -> String {
    if count == 1 {
        "1 candidate".to_string()
    } else {
        format!("{count} candidates")
    }
}

/// Renders one visited candidate; skipped links print nothing.
fn describe(visit: &CandidateReport) -> Option<String> {
    let symlink = visit.candidate.symlink.display();
    let proposal = visit.proposal.as_deref().unwrap_or(visit.candidate.target.as_path()).display();
    match &visit.outcome {
        CandidateOutcome::Fixed => Some(format!("fixed {symlink} -> {proposal}")),
        CandidateOutcome::WouldFix => Some(format!("would fix {symlink} -> {proposal}")),
        CandidateOutcome::Skipped => None,
        CandidateOutcome::Failed(err) if err.touched_filesystem() => {
            Some(format!("error: {err} (restore it manually)"))
        }
        CandidateOutcome::Failed(err) => Some(format!("error: {err}")),
    }
}
