use anyhow::Result;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::ffi::OsString;
use std::path::Path;

use crate::error::CloveError;
use crate::naming::shell_join;
use crate::traits::GitExecutor;

/// What a [`FakeGit`] was asked to do, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Run(String),
    Succeeds(String),
    Interactive(String),
}

/// Scripted executor: refs that "exist", canned query output, programs that fail.
#[derive(Default)]
pub(crate) struct FakeGit {
    refs: HashSet<String>,
    outputs: HashMap<String, String>,
    failing: Vec<String>,
    calls: RefCell<Vec<Call>>,
}

impl FakeGit {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_ref(mut self, reference: &str) -> Self {
        self.refs.insert(reference.to_string());
        self
    }

    /// `run` with exactly these args returns `output`; anything else fails.
    pub(crate) fn with_output(mut self, args: &[&str], output: &str) -> Self {
        self.outputs.insert(args.join(" "), output.to_string());
        self
    }

    /// Interactive commands whose rendered line contains `needle` exit non-zero.
    pub(crate) fn failing_on(mut self, needle: &str) -> Self {
        self.failing.push(needle.to_string());
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub(crate) fn interactive_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Interactive(line) => Some(line),
                _ => None,
            })
            .collect()
    }
}

impl GitExecutor for FakeGit {
    fn run(&self, _repo_root: &Path, args: &[&str]) -> Result<String> {
        let key = args.join(" ");
        self.calls.borrow_mut().push(Call::Run(key.clone()));
        match self.outputs.get(&key) {
            Some(output) => Ok(output.clone()),
            None => Err(CloveError::CommandFailed {
                command: format!("git {}", key),
                status: "exit status: 1".to_string(),
                output: "fatal: scripted failure".to_string(),
            }
            .into()),
        }
    }

    fn succeeds(&self, _repo_root: &Path, args: &[&str]) -> bool {
        self.calls.borrow_mut().push(Call::Succeeds(args.join(" ")));
        match args {
            ["show-ref", "--verify", "--quiet", reference] => self.refs.contains(*reference),
            _ => false,
        }
    }

    fn run_interactive(&self, program: &str, args: &[OsString]) -> Result<()> {
        let mut words = vec![program.to_string()];
        words.extend(args.iter().map(|arg| arg.to_string_lossy().into_owned()));
        let line = shell_join(&words);
        self.calls.borrow_mut().push(Call::Interactive(line.clone()));

        if self.failing.iter().any(|needle| line.contains(needle.as_str())) {
            return Err(CloveError::CommandFailed {
                command: line,
                status: "exit status: 1".to_string(),
                output: String::new(),
            }
            .into());
        }
        Ok(())
    }
}
