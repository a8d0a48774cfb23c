use anyhow::Result;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::CacheRule;
use crate::error::{Advisory, CloveError};
use crate::git::{CommandLine, GitCli};
use crate::naming::{repo_name, sibling_dir, worktree_dir_name};
use crate::session::Session;
use crate::worktree::heads_ref;

/// Input for `clove add`.
#[derive(Debug, Clone, Default)]
pub struct AddRequest {
    pub branch: String,
    /// Start point for a brand-new branch (defaults to the remote's default branch)
    pub base: Option<String>,
    pub prefix: Option<String>,
    pub suffix: Option<String>,
    /// Directory name used verbatim instead of `{prefix}-{branch}{suffix}`
    pub dir_name: Option<String>,
    /// Program to open the new directory with, e.g. `code`
    pub open_with: Option<String>,
    pub dry_run: bool,
    pub no_fetch: bool,
}

/// How the worktree gets its branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateStrategy {
    /// Check out the existing local branch
    CheckoutLocal,
    /// New local branch starting at the remote-tracking branch
    TrackRemote { remote_branch: String },
    /// New local branch starting at the resolved base
    NewFromBase { base: String },
}

/// Everything decided before anything is mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddPlan {
    pub target: PathBuf,
    pub base: String,
    pub strategy: CreateStrategy,
    pub commands: Vec<CommandLine>,
}

#[derive(Debug)]
pub struct AddOutcome {
    pub plan: AddPlan,
    pub executed: bool,
    pub advisories: Vec<Advisory>,
}

/// Creates a worktree in the repository containing the current directory (or `repo`)
///
/// # Errors
/// Returns an error if:
/// - The repository root cannot be resolved
/// - The target directory already exists
/// - Any git command in the plan fails
pub fn add_worktree(request: &AddRequest, repo: Option<&Path>) -> Result<()> {
    let session = Session::open(&GitCli, repo)?;
    add_worktree_with_session(&session, request)?;
    Ok(())
}

/// Plans and (unless dry-run) executes `request` against an explicit session
///
/// # Errors
/// Returns an error if planning fails or a planned command exits non-zero.
/// Cache-copy and open-command failures are returned as advisories instead.
pub fn add_worktree_with_session(session: &Session, request: &AddRequest) -> Result<AddOutcome> {
    let plan = plan_add(session, request)?;

    println!("repo:   {}", session.repo_root.display());
    println!("base:   {}", plan.base);
    println!("branch: {}", request.branch);
    println!("dir:    {}", plan.target.display());

    if request.dry_run {
        println!();
        println!("(dry-run) planned commands:");
        for command in &plan.commands {
            println!("  {}", command);
        }
        return Ok(AddOutcome {
            plan,
            executed: false,
            advisories: Vec::new(),
        });
    }

    for command in &plan.commands {
        info!(%command, "running");
        command.execute(session.git)?;
    }

    let mut advisories = Vec::new();
    if session.config.copy_caches {
        advisories.extend(copy_dependency_caches(
            &session.repo_root,
            &plan.target,
            &session.config.dependency_caches,
        ));
    }

    if let Some(program) = request.open_with.as_deref().filter(|p| !p.is_empty()) {
        let open = CommandLine {
            program: program.to_string(),
            args: vec![plan.target.clone().into_os_string()],
        };
        if let Err(e) = open.execute(session.git) {
            let advisory = Advisory::OpenCommandFailed {
                command: open.to_string(),
                reason: format!("{:#}", e),
            };
            debug!("{}", advisory);
            advisories.push(advisory);
        }
    }

    println!("✓ Worktree created: {}", plan.target.display());

    Ok(AddOutcome {
        plan,
        executed: true,
        advisories,
    })
}

/// Decides target, base, and strategy, running only read-only git queries
///
/// # Errors
/// Returns [`CloveError::TargetExists`] before any git call if the target
/// directory is already there
pub fn plan_add(session: &Session, request: &AddRequest) -> Result<AddPlan> {
    let target = resolve_target(&session.repo_root, request)?;
    if target.symlink_metadata().is_ok() {
        return Err(CloveError::TargetExists(target).into());
    }

    let base = resolve_base(session, request.base.as_deref());

    let local_exists = session.git.succeeds(
        &session.repo_root,
        &["show-ref", "--verify", "--quiet", &heads_ref(&request.branch)],
    );
    let remote_exists = session.git.succeeds(
        &session.repo_root,
        &[
            "show-ref",
            "--verify",
            "--quiet",
            &session.config.remote_tracking_ref(&request.branch),
        ],
    );
    debug!(
        branch = %request.branch,
        local_exists, remote_exists, "branch existence"
    );

    let strategy = choose_strategy(
        local_exists,
        remote_exists,
        session.config.remote_branch(&request.branch),
        base.clone(),
    );
    if request.base.is_some() && !matches!(strategy, CreateStrategy::NewFromBase { .. }) {
        debug!("branch already exists, ignoring --base {}", base);
    }

    let mut commands = Vec::new();
    if !request.no_fetch {
        commands.push(CommandLine::git(
            &session.repo_root,
            ["fetch", "--prune", session.config.remote.as_str()],
        ));
    }
    commands.push(worktree_add_command(
        &session.repo_root,
        &target,
        &request.branch,
        &strategy,
    ));

    Ok(AddPlan {
        target,
        base,
        strategy,
        commands,
    })
}

/// Target directory beside the repository root.
///
/// # Errors
/// Returns an error if the repository root has no name or no parent
pub fn resolve_target(repo_root: &Path, request: &AddRequest) -> Result<PathBuf> {
    let dir_name = match request.dir_name.as_deref().filter(|d| !d.is_empty()) {
        Some(explicit) => explicit.to_string(),
        None => worktree_dir_name(
            &repo_name(repo_root)?,
            &request.branch,
            request.prefix.as_deref(),
            request.suffix.as_deref(),
        ),
    };
    sibling_dir(repo_root, &dir_name)
}

/// Explicit base, else the remote's symbolic HEAD, else `<remote>/<default-branch>`.
///
/// Lookup failure is expected (many clones have no remote HEAD) and never an error.
#[must_use]
pub fn resolve_base(session: &Session, base_override: Option<&str>) -> String {
    if let Some(base) = base_override.filter(|b| !b.is_empty()) {
        return base.to_string();
    }

    let remote_head = session.config.remote_head_ref();
    match session.git.run(
        &session.repo_root,
        &["symbolic-ref", "-q", "--short", &remote_head],
    ) {
        Ok(output) if !output.trim().is_empty() => output.trim().to_string(),
        _ => {
            debug!("{} is not set, using fallback base", remote_head);
            session.config.fallback_base()
        }
    }
}

/// A local branch wins over a remote one, which wins over starting fresh.
#[must_use]
pub fn choose_strategy(
    local_exists: bool,
    remote_exists: bool,
    remote_branch: String,
    base: String,
) -> CreateStrategy {
    if local_exists {
        CreateStrategy::CheckoutLocal
    } else if remote_exists {
        CreateStrategy::TrackRemote { remote_branch }
    } else {
        CreateStrategy::NewFromBase { base }
    }
}

fn worktree_add_command(
    repo_root: &Path,
    target: &Path,
    branch: &str,
    strategy: &CreateStrategy,
) -> CommandLine {
    let cmd = CommandLine::git(repo_root, ["worktree", "add"]).arg(target);
    match strategy {
        CreateStrategy::CheckoutLocal => cmd.arg(branch),
        CreateStrategy::TrackRemote { remote_branch } => {
            cmd.arg("-b").arg(branch).arg(remote_branch.as_str())
        }
        CreateStrategy::NewFromBase { base } => cmd.arg("-b").arg(branch).arg(base.as_str()),
    }
}

/// Copies each applicable cache directory into `target`; failures become advisories.
pub fn copy_dependency_caches(source: &Path, target: &Path, rules: &[CacheRule]) -> Vec<Advisory> {
    let mut advisories = Vec::new();

    for rule in rules {
        if !manifest_present(source, &rule.manifest) {
            continue;
        }
        let cache_dir = source.join(&rule.directory);
        if !cache_dir.is_dir() {
            continue;
        }

        println!("Copying {} into the new worktree...", rule.directory);
        match copy_dir_recursive(&cache_dir, &target.join(&rule.directory)) {
            Ok(()) => println!("  Copied: {}", rule.directory),
            Err(e) => {
                let advisory = Advisory::CacheCopyFailed {
                    directory: rule.directory.clone(),
                    reason: e.to_string(),
                };
                warn!("{}", advisory);
                advisories.push(advisory);
            }
        }
    }

    advisories
}

fn manifest_present(source: &Path, manifest: &str) -> bool {
    if !manifest.contains(['*', '?', '[']) {
        return source.join(manifest).is_file();
    }

    let pattern = format!(
        "{}/{}",
        glob::Pattern::escape(&source.to_string_lossy()),
        manifest
    );
    match glob::glob(&pattern) {
        Ok(mut paths) => paths.any(|entry| entry.is_ok_and(|path| path.is_file())),
        Err(e) => {
            warn!("invalid manifest pattern {}: {}", manifest, e);
            false
        }
    }
}

/// Recursive copy that recreates symlinks and keeps file permissions.
fn copy_dir_recursive(source: &Path, target: &Path) -> io::Result<()> {
    fs::create_dir_all(target)?;

    for entry in fs::read_dir(source)? {
        let entry = entry?;
        let file_type = entry.file_type()?;
        let source_path = entry.path();
        let target_path = target.join(entry.file_name());

        if file_type.is_symlink() {
            copy_symlink(&source_path, &target_path)?;
        } else if file_type.is_dir() {
            copy_dir_recursive(&source_path, &target_path)?;
        } else {
            fs::copy(&source_path, &target_path)?;
        }
    }

    fs::set_permissions(target, fs::metadata(source)?.permissions())
}

#[cfg(unix)]
fn copy_symlink(source: &Path, target: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(fs::read_link(source)?, target)
}

#[cfg(not(unix))]
fn copy_symlink(source: &Path, target: &Path) -> io::Result<()> {
    if source.is_dir() {
        copy_dir_recursive(source, target)
    } else {
        fs::copy(source, target).map(|_| ())
    }
}
