//! Shared mock infrastructure for unit tests.
//!
//! Hand-written port implementations: a recording remote shell with scripted
//! outcomes, a scripted HTTP probe, an in-memory deploy log and artifact
//! writer, a fixed DNS answer, and a recording command runner for `SshShell`.

#![allow(dead_code, clippy::expect_used)]

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::process::Output;
use std::rc::Rc;
use std::time::Duration;

use anyhow::Result;
use site_doctor::application::ports::{
    ArtifactWriter, CommandRunner, DeployLogStore, FileInventory, HttpProbe, NetworkProbe,
    ProjectArchiver, RemoteShell,
};
use site_doctor::domain::deploy_log::{DeployLog, DeployLogEntry};
use site_doctor::domain::probe::ProbeResult;
use site_doctor::domain::remote::RemoteOutcome;
use site_doctor::domain::upload::{PackedArchive, PackedFile, UploadConfig, UploadManifest};

// ── Remote shell ──────────────────────────────────────────────────────────────

pub fn ok(stdout: &str) -> RemoteOutcome {
    RemoteOutcome {
        exit_code: 0,
        stdout: stdout.to_string(),
        stderr: String::new(),
        error: None,
    }
}

pub fn fail(code: i32, stderr: &str) -> RemoteOutcome {
    RemoteOutcome {
        exit_code: code,
        stdout: String::new(),
        stderr: stderr.to_string(),
        error: None,
    }
}

/// Records every command; the first rule whose pattern occurs in the
/// command decides the outcome, otherwise the default applies.
pub struct RecordingShell {
    rules: Vec<(String, RemoteOutcome)>,
    default: RemoteOutcome,
    commands: RefCell<Vec<String>>,
    stdin: RefCell<Vec<Vec<u8>>>,
}

impl RecordingShell {
    /// Every command succeeds with empty output.
    pub fn new() -> Self {
        Self::with_default(ok(""))
    }

    pub fn with_default(default: RemoteOutcome) -> Self {
        Self {
            rules: Vec::new(),
            default,
            commands: RefCell::new(Vec::new()),
            stdin: RefCell::new(Vec::new()),
        }
    }

    /// Every command fails as if the host were unreachable.
    pub fn unreachable() -> Self {
        Self::with_default(RemoteOutcome::transport_failure(
            "ssh: connect to host 203.0.113.10 port 22: Connection refused",
        ))
    }

    #[must_use]
    pub fn on(mut self, pattern: &str, outcome: RemoteOutcome) -> Self {
        self.rules.push((pattern.to_string(), outcome));
        self
    }

    pub fn commands(&self) -> Vec<String> {
        self.commands.borrow().clone()
    }

    pub fn stdin_payloads(&self) -> Vec<Vec<u8>> {
        self.stdin.borrow().clone()
    }

    /// Index of the first command containing `needle`.
    pub fn position(&self, needle: &str) -> Option<usize> {
        self.commands.borrow().iter().position(|c| c.contains(needle))
    }

    pub fn ran(&self, needle: &str) -> bool {
        self.position(needle).is_some()
    }

    fn respond(&self, command: &str) -> RemoteOutcome {
        self.commands.borrow_mut().push(command.to_string());
        self.rules
            .iter()
            .find(|(pattern, _)| command.contains(pattern.as_str()))
            .map_or_else(|| self.default.clone(), |(_, outcome)| outcome.clone())
    }
}

impl RemoteShell for RecordingShell {
    fn target(&self) -> String {
        "deploy@203.0.113.10:22".to_string()
    }

    async fn exec(&self, command: &str, _timeout: Duration) -> RemoteOutcome {
        self.respond(command)
    }

    async fn exec_with_stdin(
        &self,
        command: &str,
        input: &[u8],
        _timeout: Duration,
    ) -> RemoteOutcome {
        self.stdin.borrow_mut().push(input.to_vec());
        self.respond(command)
    }
}

// ── HTTP probe ────────────────────────────────────────────────────────────────

/// `Some(code)` answers with that status; `None` is a connection error.
pub struct ScriptedProbe {
    queue: RefCell<VecDeque<Option<u16>>>,
    per_url: HashMap<String, u16>,
    body: String,
    calls: RefCell<Vec<String>>,
}

impl ScriptedProbe {
    /// Answer successive requests from `statuses`; exhausted means connection error.
    pub fn statuses(statuses: &[Option<u16>]) -> Self {
        Self {
            queue: RefCell::new(statuses.iter().copied().collect()),
            per_url: HashMap::new(),
            body: String::new(),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Answer by URL; unknown URLs are connection errors.
    pub fn by_url(pairs: &[(String, u16)]) -> Self {
        let mut probe = Self::statuses(&[]);
        probe.per_url = pairs.iter().cloned().collect();
        probe
    }

    #[must_use]
    pub fn with_body(mut self, body: &str) -> Self {
        self.body = body.to_string();
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl HttpProbe for ScriptedProbe {
    async fn get(&self, url: &str, _timeout: Duration) -> Result<ProbeResult> {
        self.calls.borrow_mut().push(url.to_string());
        let status = match self.per_url.get(url) {
            Some(code) => Some(*code),
            None => self.queue.borrow_mut().pop_front().flatten(),
        };
        match status {
            Some(status_code) => Ok(ProbeResult {
                status_code,
                response_time: Duration::from_millis(12),
                body_snippet: self.body.clone(),
            }),
            None => anyhow::bail!("error sending request for url ({url}): connection refused"),
        }
    }
}

// ── DNS ───────────────────────────────────────────────────────────────────────

pub struct FixedDns(pub bool);

impl NetworkProbe for FixedDns {
    async fn check_dns_resolution(&self, _hostname: &str) -> Result<bool> {
        Ok(self.0)
    }
}

// ── Deploy log ────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryLog {
    log: RefCell<DeployLog>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<DeployLogEntry> {
        self.log.borrow().entries().to_vec()
    }
}

impl DeployLogStore for MemoryLog {
    async fn load(&self) -> Result<DeployLog> {
        Ok(self.log.borrow().clone())
    }

    async fn append(&self, entry: DeployLogEntry) -> Result<()> {
        self.log.borrow_mut().append(entry);
        Ok(())
    }
}

/// Log store whose appends always fail.
pub struct BrokenLog;

impl DeployLogStore for BrokenLog {
    async fn load(&self) -> Result<DeployLog> {
        Ok(DeployLog::new())
    }

    async fn append(&self, _entry: DeployLogEntry) -> Result<()> {
        anyhow::bail!("disk full")
    }
}

// ── Local files ───────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryFiles {
    written: RefCell<Vec<(String, String)>>,
    sizes: HashMap<PathBuf, u64>,
}

impl MemoryFiles {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_file(mut self, path: impl Into<PathBuf>, size: u64) -> Self {
        self.sizes.insert(path.into(), size);
        self
    }

    pub fn written(&self) -> Vec<(String, String)> {
        self.written.borrow().clone()
    }

    pub fn contents(&self, name: &str) -> Option<String> {
        self.written
            .borrow()
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, c)| c.clone())
    }
}

impl ArtifactWriter for MemoryFiles {
    fn write(&self, name: &str, contents: &str) -> Result<PathBuf> {
        self.written
            .borrow_mut()
            .push((name.to_string(), contents.to_string()));
        Ok(PathBuf::from("out").join(name))
    }
}

impl FileInventory for MemoryFiles {
    fn size_of(&self, path: &Path) -> Option<u64> {
        self.sizes.get(path).copied()
    }
}

// ── Project archiver ──────────────────────────────────────────────────────────

/// Returns a fixed archive whose bytes are a marker, not a real tarball.
pub struct FixedArchiver {
    manifest: UploadManifest,
}

impl FixedArchiver {
    pub const BYTES: &'static [u8] = b"tar.gz bytes";

    pub fn with_files(paths: &[&str]) -> Self {
        Self {
            manifest: UploadManifest {
                files: paths
                    .iter()
                    .map(|p| PackedFile {
                        path: (*p).to_string(),
                        size: 100,
                    })
                    .collect(),
                missing: Vec::new(),
                excluded: 0,
            },
        }
    }

    #[must_use]
    pub fn missing(mut self, names: &[&str]) -> Self {
        self.manifest.missing = names.iter().map(ToString::to_string).collect();
        self
    }
}

impl ProjectArchiver for FixedArchiver {
    fn pack(&self, _source: &Path, _selection: &UploadConfig) -> Result<PackedArchive> {
        Ok(PackedArchive {
            bytes: Self::BYTES.to_vec(),
            manifest: self.manifest.clone(),
        })
    }
}

// ── Command runner ────────────────────────────────────────────────────────────

/// One recorded process invocation.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub stdin: Option<Vec<u8>>,
}

/// Shared view of the invocations a [`RecordingRunner`] has seen.
pub type Calls = Rc<RefCell<Vec<Invocation>>>;

/// Returns the same scripted result for every process and records the call.
///
/// The runner is moved into `SshShell`, so tests keep a [`Calls`] handle.
pub struct RecordingRunner {
    result: Box<dyn Fn() -> Result<Output>>,
    calls: Calls,
}

impl RecordingRunner {
    pub fn returning(output: Output) -> Self {
        Self {
            result: Box::new(move || Ok(output.clone())),
            calls: Calls::default(),
        }
    }

    pub fn failing(message: &'static str) -> Self {
        Self {
            result: Box::new(move || Err(anyhow::anyhow!(message))),
            calls: Calls::default(),
        }
    }

    pub fn calls(&self) -> Calls {
        Rc::clone(&self.calls)
    }

    fn record(&self, program: &str, args: &[&str], stdin: Option<&[u8]>) -> Result<Output> {
        self.calls.borrow_mut().push(Invocation {
            program: program.to_string(),
            args: args.iter().map(ToString::to_string).collect(),
            stdin: stdin.map(<[u8]>::to_vec),
        });
        (self.result)()
    }
}

impl CommandRunner for RecordingRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        self.record(program, args, None)
    }

    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        _timeout: Duration,
    ) -> Result<Output> {
        self.record(program, args, None)
    }

    async fn run_with_stdin(
        &self,
        program: &str,
        args: &[&str],
        input: &[u8],
        _timeout: Duration,
    ) -> Result<Output> {
        self.record(program, args, Some(input))
    }
}
