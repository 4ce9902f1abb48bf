//! Command-line surface: `play-sound [OPTIONS] <CATEGORY>`.

use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

use clap::error::ErrorKind;
use clap::Parser;
use log::debug;

use crate::backend::{backend_for, PlaybackBackend, Platform, MAX_TIMEOUT};
use crate::category::Category;
use crate::config::{find_sound_root, PlaybackConfig, SoundConfig};
use crate::dispatcher::Dispatcher;
use crate::library::SoundLibrary;

pub const EXIT_OK: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;

#[derive(Debug, Parser)]
#[command(name = "play-sound", version)]
#[command(about = "Play a random sound for an event category using the system audio player")]
pub struct Cli {
    /// Sound category: notification, blocked or completed (case-insensitive, surrounding whitespace ignored)
    pub category: String,

    /// Configuration file (TOML)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory holding one subdirectory per category
    #[arg(long, value_name = "DIR")]
    pub base_dir: Option<PathBuf>,

    /// Playback timeout in seconds (1-3600)
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..=MAX_TIMEOUT.as_secs()))]
    pub timeout: Option<u64>,

    /// Print every candidate file instead of playing
    #[arg(long, conflicts_with = "dry_run")]
    pub list: bool,

    /// Pick a file and print it without playing
    #[arg(long)]
    pub dry_run: bool,
}

/// Parse arguments. On failure returns the exit code after printing usage or help.
pub fn parse_args<I, T>(args: I) -> Result<Cli, u8>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    Cli::try_parse_from(args).map_err(|e| {
        let _ = e.print();
        match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => EXIT_OK,
            _ => EXIT_FAILURE,
        }
    })
}

/// Parse the category argument into the message printed on failure.
pub fn validate_category(name: &str) -> Result<Category, String> {
    Category::parse(name).map_err(|e| format!("Error: {e}"))
}

pub fn run(cli: &Cli) -> u8 {
    run_with(cli, |playback| backend_for(Platform::current(), playback))
}

/// `run` with the backend supplied by `make_backend`, called at most once.
pub fn run_with<F>(cli: &Cli, make_backend: F) -> u8
where
    F: FnOnce(&PlaybackConfig) -> Box<dyn PlaybackBackend>,
{
    // Validate before any config or sound lookup touches the filesystem.
    let category = match validate_category(&cli.category) {
        Ok(category) => category,
        Err(message) => {
            eprintln!("{message}");
            return EXIT_FAILURE;
        }
    };

    let root = find_sound_root();
    let config = SoundConfig::find_and_load(cli.config.as_deref(), &root);
    let base_dir = cli.base_dir.clone().unwrap_or_else(|| config.resolve_base_dir(&root));
    debug!("Sound base directory: {}", base_dir.display());
    let library = SoundLibrary::new(base_dir, &config.extensions);

    if cli.list {
        let candidates = library.candidates(category);
        for file in &candidates {
            println!("{}", file.display());
        }
        if candidates.is_empty() {
            eprintln!("Warning: No audio files found for type '{category}'");
            return EXIT_FAILURE;
        }
        return EXIT_OK;
    }

    let timeout = cli
        .timeout
        .map(Duration::from_secs)
        .unwrap_or_else(|| config.playback.timeout());
    let backend = make_backend(&config.playback);
    let mut dispatcher = Dispatcher::new(library, backend).timeout(timeout);

    if cli.dry_run {
        return match dispatcher.pick(category) {
            Ok(file) => {
                println!("{}", file.display());
                EXIT_OK
            }
            Err(e) => {
                eprintln!("Warning: {e}");
                EXIT_FAILURE
            }
        };
    }

    if dispatcher.play_random(category) {
        EXIT_OK
    } else {
        eprintln!("Warning: Could not play audio for type '{category}'");
        EXIT_FAILURE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlaybackError;
    use std::cell::{Cell, RefCell};
    use std::fs;
    use std::path::Path;
    use std::rc::Rc;

    fn cli(args: &[&str]) -> Cli {
        parse_args(std::iter::once("play-sound").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn wrong_argument_count_is_usage_error() {
        assert_eq!(parse_args(["play-sound"]).unwrap_err(), EXIT_FAILURE);
        assert_eq!(parse_args(["play-sound", "completed", "extra"]).unwrap_err(), EXIT_FAILURE);
        assert_eq!(parse_args(["play-sound", "--bogus-flag", "completed"]).unwrap_err(), EXIT_FAILURE);
    }

    #[test]
    fn help_exits_cleanly() {
        assert_eq!(parse_args(["play-sound", "--help"]).unwrap_err(), EXIT_OK);
    }

    #[test]
    fn parses_options() {
        let parsed = cli(&["--base-dir", "/tmp/sounds", "--timeout", "3", "--dry-run", "Completed"]);
        assert_eq!(parsed.category, "Completed");
        assert_eq!(parsed.base_dir.as_deref(), Some(std::path::Path::new("/tmp/sounds")));
        assert_eq!(parsed.timeout, Some(3));
        assert!(parsed.dry_run);
        assert!(parse_args(["play-sound", "--list", "--dry-run", "completed"]).is_err());
    }

    /// Records every path it is asked to play and always succeeds.
    struct RecordingBackend {
        calls: Rc<RefCell<Vec<PathBuf>>>,
    }

    impl PlaybackBackend for RecordingBackend {
        fn name(&self) -> &str {
            "recording"
        }

        fn try_play(&self, path: &Path, _timeout: Duration) -> Result<String, PlaybackError> {
            self.calls.borrow_mut().push(path.to_path_buf());
            Ok("recording".into())
        }
    }

    /// Run with a recording backend; returns the exit code, whether the backend
    /// was built, and the paths it played.
    fn run_recorded(parsed: &Cli) -> (u8, bool, Vec<PathBuf>) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let built = Cell::new(false);
        let code = run_with(parsed, |_| {
            built.set(true);
            Box::new(RecordingBackend { calls: calls.clone() }) as Box<dyn PlaybackBackend>
        });
        let played = calls.borrow().clone();
        (code, built.get(), played)
    }

    fn populated_base(categories: &[&str]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for name in categories {
            fs::create_dir_all(dir.path().join(name)).unwrap();
            fs::write(dir.path().join(name).join("a.wav"), b"RIFF").unwrap();
        }
        dir
    }

    #[test]
    fn invalid_category_never_reaches_lookup_or_backend() {
        let dir = populated_base(&["bogus", "completed"]);
        let base = dir.path().to_str().unwrap();

        let (code, built, played) = run_recorded(&cli(&["--base-dir", base, "bogus"]));
        assert_eq!(code, EXIT_FAILURE);
        assert!(!built);
        assert!(played.is_empty());

        // Same setup with a known category does reach the backend.
        let (code, built, played) = run_recorded(&cli(&["--base-dir", base, "completed"]));
        assert_eq!(code, EXIT_OK);
        assert!(built);
        assert_eq!(played, vec![dir.path().join("completed/a.wav")]);
    }

    #[test]
    fn invalid_category_message_lists_valid_types() {
        let message = validate_category("bogus").unwrap_err();
        assert!(message.starts_with("Error: "));
        assert!(message.contains("'bogus'"));
        for name in ["notification", "blocked", "completed"] {
            assert!(message.contains(name), "{message} is missing {name}");
        }
    }

    #[test]
    fn category_argument_ignores_case_and_whitespace() {
        assert_eq!(validate_category(" Completed\n").unwrap(), Category::Completed);
    }

    #[test]
    fn timeout_flag_is_bounded() {
        assert_eq!(parse_args(["play-sound", "--timeout", "18446744073709551615", "completed"]).unwrap_err(), EXIT_FAILURE);
        assert_eq!(parse_args(["play-sound", "--timeout", "0", "completed"]).unwrap_err(), EXIT_FAILURE);
        assert_eq!(cli(&["--timeout", "3600", "completed"]).timeout, Some(3600));
    }

    #[test]
    fn huge_config_timeout_still_plays() {
        let dir = populated_base(&["notification"]);
        let config = dir.path().join("sounds.toml");
        fs::write(&config, "[playback]\ntimeout_secs = 9223372036854775807\n").unwrap();

        let parsed = cli(&[
            "--config",
            config.to_str().unwrap(),
            "--base-dir",
            dir.path().to_str().unwrap(),
            "notification",
        ]);
        let (code, _, played) = run_recorded(&parsed);
        assert_eq!(code, EXIT_OK);
        assert_eq!(played.len(), 1);
    }

    #[test]
    fn dry_run_picks_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("completed")).unwrap();
        fs::write(dir.path().join("completed/a.wav"), b"RIFF").unwrap();

        let parsed = cli(&["--base-dir", dir.path().to_str().unwrap(), "--dry-run", "COMPLETED"]);
        assert_eq!(run(&parsed), EXIT_OK);
    }

    #[test]
    fn empty_category_fails_without_playing() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("blocked")).unwrap();

        let parsed = cli(&["--base-dir", dir.path().to_str().unwrap(), "--dry-run", "blocked"]);
        assert_eq!(run(&parsed), EXIT_FAILURE);
        let parsed = cli(&["--base-dir", dir.path().to_str().unwrap(), "--list", "blocked"]);
        assert_eq!(run(&parsed), EXIT_FAILURE);
        let parsed = cli(&["--base-dir", dir.path().to_str().unwrap(), "blocked"]);
        assert_eq!(run(&parsed), EXIT_FAILURE);
    }

    #[test]
    fn list_prints_candidates() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("notification")).unwrap();
        fs::write(dir.path().join("notification/ping.wav"), b"RIFF").unwrap();

        let parsed = cli(&["--base-dir", dir.path().to_str().unwrap(), "--list", "notification"]);
        assert_eq!(run(&parsed), EXIT_OK);
    }
}
