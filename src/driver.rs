//! Drives a fix run: scan, decide per candidate, rewrite.
//!
//! The candidate list is built completely before the first question is
//! asked, so the count shown to the user is stable. Each candidate is then
//! processed to completion before the next one. `quit` is checked between
//! candidates and stops the run; a failed rewrite is reported and the run
//! moves on.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::context::ServiceContext;
use crate::links::classify::{classify, Classification, LinkCandidate, Scope};
use crate::links::rewrite::{LinkRewriter, RewriteError, RewriteOutcome};
use crate::links::scan::scan;
use crate::ports::filesystem::LinkFileSystem;
use crate::ports::prompt::Decision;

/// Settings for a fix run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixOptions {
    /// Apply every candidate without asking.
    pub auto_yes: bool,
    /// Verify rewrites but leave the filesystem untouched.
    pub dry_run: bool,
}

/// Whether the next candidate needs a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Ask the decision source.
    Ask,
    /// Treat every answer as `yes`.
    ForceYes,
}

impl Policy {
    /// The policy a run starts with.
    #[must_use]
    pub fn initial(auto_yes: bool) -> Self {
        if auto_yes {
            Self::ForceYes
        } else {
            Self::Ask
        }
    }
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Every candidate was visited.
    Done,
    /// `quit` was chosen; later candidates were not visited.
    Aborted,
}

/// What happened to one visited candidate.
#[derive(Debug)]
pub enum CandidateOutcome {
    /// The link now stores a relative target.
    Fixed,
    /// Dry run: the rewrite verified and would have been applied.
    WouldFix,
    /// The answer was `no`.
    Skipped,
    /// The rewrite was refused or failed.
    Failed(RewriteError),
}

/// One visited candidate and its result.
#[derive(Debug)]
pub struct CandidateReport {
    /// The candidate as found by the scan.
    pub candidate: LinkCandidate,
    /// The relative target that was proposed, if one could be computed.
    pub proposal: Option<PathBuf>,
    /// The result.
    pub outcome: CandidateOutcome,
}

/// Results of a fix run.
#[derive(Debug)]
pub struct FixReport {
    /// Number of in-scope candidates found by the scan.
    pub candidates: usize,
    /// Visited candidates, in order.
    pub visited: Vec<CandidateReport>,
    /// How the run ended.
    pub state: RunState,
}

impl FixReport {
    fn count(&self, wanted: impl Fn(&CandidateOutcome) -> bool) -> usize {
        self.visited.iter().filter(|report| wanted(&report.outcome)).count()
    }

    /// Links rewritten, or that would be in a dry run.
    #[must_use]
    pub fn fixed(&self) -> usize {
        self.count(|o| matches!(o, CandidateOutcome::Fixed | CandidateOutcome::WouldFix))
    }

    /// Candidates answered with `no`.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, CandidateOutcome::Skipped))
    }

    /// Candidates whose rewrite failed.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, CandidateOutcome::Failed(_)))
    }

    /// The closing tally, e.g. `fixed 2, skipped 1, failed 0 of 3 candidates`.
    #[must_use]
    pub fn summary_line(&self) -> String {
        let mut line = format!(
            "fixed {}, skipped {}, failed {} of {} candidates",
            self.fixed(),
            self.skipped(),
            self.failed(),
            self.candidates
        );
        if self.state == RunState::Aborted {
            line.push_str(" (aborted)");
        }
        line
    }
}

/// Scans `scope` and returns every in-scope candidate, each link once.
pub fn collect_candidates(fs: &dyn LinkFileSystem, scope: &Scope) -> Vec<LinkCandidate> {
    let mut seen = HashSet::new();
    scan(&scope.roots, &scope.ignores)
        .filter(|symlink| seen.insert(symlink.clone()))
        .filter_map(|symlink| match classify(fs, &symlink, scope) {
            Classification::Candidate(candidate) => {
                debug!("candidate: {} (root {})", symlink.display(), candidate.root.display());
                Some(candidate)
            }
            other => {
                debug!("not a candidate: {} ({other:?})", symlink.display());
                None
            }
        })
        .collect()
}

/// Runs a fix over `scope` without observing individual results.
#[must_use]
pub fn run(ctx: &ServiceContext, scope: &Scope, options: FixOptions) -> FixReport {
    run_with(ctx, scope, options, |_| {})
}

/// Runs a fix over `scope`, calling `on_visit` after each candidate.
pub fn run_with(
    ctx: &ServiceContext,
    scope: &Scope,
    options: FixOptions,
    on_visit: impl FnMut(&CandidateReport),
) -> FixReport {
    let candidates = collect_candidates(ctx.fs.as_ref(), scope);
    process(ctx, candidates, options, on_visit)
}

/// Decides and rewrites an already collected candidate list, in order.
pub fn process(
    ctx: &ServiceContext,
    candidates: Vec<LinkCandidate>,
    options: FixOptions,
    mut on_visit: impl FnMut(&CandidateReport),
) -> FixReport {
    let rewriter = LinkRewriter::new(ctx.fs.as_ref(), options.dry_run);
    let mut policy = Policy::initial(options.auto_yes);
    let mut report =
        FixReport { candidates: candidates.len(), visited: Vec::new(), state: RunState::Done };

    for candidate in candidates {
        let proposal = match rewriter.propose(&candidate.symlink, &candidate.target) {
            Ok(proposal) => proposal,
            Err(err) => {
                warn!("{err}");
                let outcome = CandidateOutcome::Failed(err);
                let visited = CandidateReport { candidate, proposal: None, outcome };
                on_visit(&visited);
                report.visited.push(visited);
                continue;
            }
        };

        let decision = match policy {
            Policy::ForceYes => Decision::Yes,
            Policy::Ask => ctx.prompt.decide(&candidate.symlink, &proposal),
        };

        let outcome = match decision {
            Decision::Quit => {
                report.state = RunState::Aborted;
                break;
            }
            Decision::No => CandidateOutcome::Skipped,
            Decision::YesToAll => {
                policy = Policy::ForceYes;
                apply(&rewriter, &candidate, &proposal)
            }
            Decision::Yes => apply(&rewriter, &candidate, &proposal),
        };

        let visited = CandidateReport { candidate, proposal: Some(proposal), outcome };
        on_visit(&visited);
        report.visited.push(visited);
    }
    report
}

fn apply(
    rewriter: &LinkRewriter<'_>,
    candidate: &LinkCandidate,
    proposal: &Path,
) -> CandidateOutcome {
    match rewriter.apply(&candidate.symlink, proposal) {
        Ok(RewriteOutcome::Rewritten) => CandidateOutcome::Fixed,
        Ok(RewriteOutcome::DryRun) => CandidateOutcome::WouldFix,
        Err(err) => {
            warn!("{err}");
            CandidateOutcome::Failed(err)
        }
    }
}
