//! Sound playback through the host's native player command.
//!
//! Each backend spawns an external player, waits for it synchronously and
//! kills it once the timeout expires. The child never outlives the call.

use std::io::ErrorKind;
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use log::{debug, info, warn};

use crate::config::PlaybackConfig;
use crate::error::PlaybackError;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Upper bound on any playback timeout; longer values are clamped.
pub const MAX_TIMEOUT: Duration = Duration::from_secs(60 * 60);

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// OS family used to pick a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    MacOs,
    Linux,
    Windows,
}

impl Platform {
    pub fn current() -> Self {
        Self::from_os(std::env::consts::OS)
    }

    /// Map an `std::env::consts::OS` value. Unknown Unix flavours use the Linux player chain.
    pub fn from_os(os: &str) -> Self {
        match os {
            "macos" => Platform::MacOs,
            "windows" => Platform::Windows,
            _ => Platform::Linux,
        }
    }
}

pub trait PlaybackBackend {
    fn name(&self) -> &str;

    /// Play `path` to completion. Returns the player that played it.
    fn try_play(&self, path: &Path, timeout: Duration) -> Result<String, PlaybackError>;

    fn play(&self, path: &Path, timeout: Duration) -> bool {
        match self.try_play(path, timeout) {
            Ok(player) => {
                info!("Played {} with {player}", path.display());
                true
            }
            Err(e) => {
                warn!("Playback of {} failed: {e}", path.display());
                false
            }
        }
    }
}

/// Pick the backend for `platform`, once, at startup.
pub fn backend_for(platform: Platform, config: &PlaybackConfig) -> Box<dyn PlaybackBackend> {
    match platform {
        Platform::MacOs => Box::new(MacBackend),
        Platform::Windows => Box::new(WindowsBackend),
        Platform::Linux => Box::new(LinuxBackend::from_names(&config.linux_players)),
    }
}

/// A player program plus fixed leading arguments. The sound path is appended last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl PlayerCommand {
    pub fn new(program: impl Into<String>) -> Self {
        PlayerCommand { program: program.into(), args: Vec::new() }
    }

    pub fn with_args<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        PlayerCommand {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Split a config entry such as `"aplay -q"` on whitespace.
    pub fn parse(spec: &str) -> Option<Self> {
        let mut parts = spec.split_whitespace();
        let program = parts.next()?;
        Some(Self::with_args(program, parts))
    }

    fn run(&self, path: &Path, timeout: Duration) -> Result<(), PlaybackError> {
        let mut command = Command::new(&self.program);
        command.args(&self.args).arg(path);
        run_with_timeout(&mut command, &self.program, timeout)
    }
}

/// macOS: `afplay <path>`.
#[derive(Debug, Default)]
pub struct MacBackend;

impl PlaybackBackend for MacBackend {
    fn name(&self) -> &str {
        "macos"
    }

    fn try_play(&self, path: &Path, timeout: Duration) -> Result<String, PlaybackError> {
        ensure_exists(path)?;
        let player = PlayerCommand::new("afplay");
        player.run(path, timeout)?;
        Ok(player.program)
    }
}

/// Linux and other Unix: first player in the chain that exists and exits cleanly.
#[derive(Debug)]
pub struct LinuxBackend {
    players: Vec<PlayerCommand>,
}

impl LinuxBackend {
    pub fn with_players(players: Vec<PlayerCommand>) -> Self {
        LinuxBackend { players }
    }

    pub fn from_names(names: &[String]) -> Self {
        Self::with_players(names.iter().filter_map(|n| PlayerCommand::parse(n)).collect())
    }

    pub fn players(&self) -> &[PlayerCommand] {
        &self.players
    }
}

impl PlaybackBackend for LinuxBackend {
    fn name(&self) -> &str {
        "linux"
    }

    fn try_play(&self, path: &Path, timeout: Duration) -> Result<String, PlaybackError> {
        ensure_exists(path)?;
        if self.players.is_empty() {
            return Err(PlaybackError::NoPlayers);
        }

        let mut failures = Vec::new();
        for player in &self.players {
            match player.run(path, timeout) {
                Ok(()) => return Ok(player.program.clone()),
                Err(e) if e.allows_fallback() => {
                    debug!("{e}, trying next player");
                    failures.push(e);
                }
                // A timed-out player may have been audible; don't stack another one on top.
                Err(e) => return Err(e),
            }
        }

        if failures.len() == 1 {
            Err(failures.remove(0))
        } else {
            Err(PlaybackError::AllFailed(failures))
        }
    }
}

/// Windows: synchronous `Media.SoundPlayer` through PowerShell.
#[derive(Debug, Default)]
pub struct WindowsBackend;

impl PlaybackBackend for WindowsBackend {
    fn name(&self) -> &str {
        "windows"
    }

    fn try_play(&self, path: &Path, timeout: Duration) -> Result<String, PlaybackError> {
        ensure_exists(path)?;
        let program = "powershell";
        let mut command = Command::new(program);
        command.args(["-NoProfile", "-NonInteractive", "-c"]).arg(powershell_script(path));
        run_with_timeout(&mut command, program, timeout)?;
        Ok(program.to_string())
    }
}

fn powershell_script(path: &Path) -> String {
    // PowerShell escapes a single quote inside a single-quoted string by doubling it.
    let quoted = path.display().to_string().replace('\'', "''");
    format!("(New-Object Media.SoundPlayer '{quoted}').PlaySync()")
}

fn ensure_exists(path: &Path) -> Result<(), PlaybackError> {
    if path.exists() {
        Ok(())
    } else {
        Err(PlaybackError::MissingFile(path.to_path_buf()))
    }
}

/// Spawn `command` detached from the terminal and wait at most `timeout` for it.
fn run_with_timeout(command: &mut Command, program: &str, timeout: Duration) -> Result<(), PlaybackError> {
    let timeout = timeout.min(MAX_TIMEOUT);
    debug!("Running {command:?} (timeout {}s)", timeout.as_secs_f32());
    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| match e.kind() {
            ErrorKind::NotFound => PlaybackError::NotFound { program: program.to_string() },
            _ => PlaybackError::Io { program: program.to_string(), source: e },
        })?;

    let started = Instant::now();
    let deadline = started.checked_add(timeout).unwrap_or(started);
    loop {
        match child.try_wait() {
            Ok(Some(status)) if status.success() => return Ok(()),
            Ok(Some(status)) => {
                return Err(PlaybackError::ExitStatus { program: program.to_string(), status });
            }
            Ok(None) => {}
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(PlaybackError::Io { program: program.to_string(), source: e });
            }
        }

        let now = Instant::now();
        if now >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            return Err(PlaybackError::Timeout { program: program.to_string(), timeout });
        }
        std::thread::sleep(POLL_INTERVAL.min(deadline - now));
    }
}
