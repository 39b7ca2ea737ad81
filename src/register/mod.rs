//! Automatic registration of webhooks and branch protection across
//! organizations.
//!
//! One sweep walks every configured organization, discovers DCO
//! repositories, and brings each to the desired state: sign-off webhook
//! present, sign-off context required on the default branch. Reads gate
//! writes, so an already-configured repository is left untouched. The first
//! error aborts the whole sweep; the next scheduled tick is the retry
//! mechanism.

pub mod discovery;
pub mod hook;
pub mod protection;

pub use discovery::dco_repositories;
pub use hook::{add_hook, has_hook};
pub use protection::{add_protection, has_protection};

use std::time::{Duration, Instant};

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::github::{ApiError, GitHubClient};
use crate::types::Repository;

/// Settings for the sweep, supplied by the bootstrap configuration.
#[derive(Debug, Clone)]
pub struct RegisterConfig {
    /// Organizations to walk.
    pub organizations: Vec<String>,

    /// Public callback URL newly created hooks deliver to, and the URL
    /// existing hooks are matched against.
    pub webhook_url: String,

    /// Secret embedded in newly created hooks.
    pub webhook_secret: String,

    /// Log intended mutations without issuing them.
    pub dry_run: bool,

    /// Interval between sweeps.
    pub interval: Duration,
}

/// Counters for one completed sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepOutcome {
    /// DCO repositories inspected.
    pub repos_checked: usize,
    /// Webhooks created (always zero in dry-run mode).
    pub hooks_added: usize,
    /// Branch protections written (always zero in dry-run mode).
    pub protections_added: usize,
}

/// A mutation the sweep decided a repository needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Action {
    InstallHook,
    ProtectBranch,
}

/// Decides which mutations a repository needs from its check results.
///
/// Dry-run and live sweeps share this decision; dry-run only skips carrying
/// the actions out.
pub(crate) fn plan_actions(has_hook: bool, has_protection: bool) -> Vec<Action> {
    let mut actions = Vec::new();
    if !has_hook {
        actions.push(Action::InstallHook);
    }
    if !has_protection {
        actions.push(Action::ProtectBranch);
    }
    actions
}

/// Walks every configured organization and reconciles each DCO repository.
///
/// Fail-fast: the first error from discovery or either reconciler aborts the
/// whole sweep, remaining organizations included. There is no in-sweep retry.
pub async fn register_all(
    gh: &GitHubClient,
    config: &RegisterConfig,
) -> Result<SweepOutcome, ApiError> {
    let mut outcome = SweepOutcome::default();

    for org in &config.organizations {
        info!(org = %org, "Checking all repos in organization");
        let repos = dco_repositories(gh, org).await?;

        for repo in &repos {
            outcome.repos_checked += 1;
            reconcile_repository(gh, config, repo, &mut outcome).await?;
        }
    }

    Ok(outcome)
}

async fn reconcile_repository(
    gh: &GitHubClient,
    config: &RegisterConfig,
    repo: &Repository,
    outcome: &mut SweepOutcome,
) -> Result<(), ApiError> {
    let dry_run_msg = if config.dry_run { " (DRY RUN)" } else { "" };

    let has_hook = has_hook(gh, repo, &config.webhook_url).await?;
    let has_protection = has_protection(gh, repo).await?;

    for action in plan_actions(has_hook, has_protection) {
        match action {
            Action::InstallHook => {
                info!(repo = %repo.html_url, "Installing webhook{}", dry_run_msg);
                if !config.dry_run {
                    add_hook(gh, repo, &config.webhook_url, &config.webhook_secret).await?;
                    outcome.hooks_added += 1;
                }
            }
            Action::ProtectBranch => {
                info!(repo = %repo.html_url, "Configuring branch protection{}", dry_run_msg);
                if !config.dry_run {
                    add_protection(gh, repo).await?;
                    outcome.protections_added += 1;
                }
            }
        }
    }

    Ok(())
}

/// Runs sweeps on a fixed interval until cancelled.
///
/// The first sweep starts immediately. Sweeps are awaited inline, so at most
/// one is in flight at a time; a tick landing while a sweep is still running
/// is skipped rather than queued behind it. Every sweep is logged with its
/// elapsed duration, success or failure.
pub async fn run_scheduler(gh: GitHubClient, config: RegisterConfig, shutdown: CancellationToken) {
    let mut ticker = tokio::time::interval(config.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                info!("Sweep scheduler shutting down");
                return;
            }
            _ = ticker.tick() => {
                let started = Instant::now();
                match register_all(&gh, &config).await {
                    Ok(outcome) => {
                        info!(
                            repos = outcome.repos_checked,
                            hooks_added = outcome.hooks_added,
                            protections_added = outcome.protections_added,
                            elapsed_ms = started.elapsed().as_millis() as u64,
                            "Sweep complete"
                        );
                    }
                    Err(e) => {
                        error!(
                            error = %e,
                            elapsed_ms = started.elapsed().as_millis() as u64,
                            "Sweep aborted"
                        );
                    }
                }
            }
        }
    }
}
