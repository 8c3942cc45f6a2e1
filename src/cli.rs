use crate::app::AppState;
use crate::content;
use crate::error::StorageError;
use crate::model::OrderingPolicy;
use crate::preferences::{self, Preferences};
use anyhow::{Context, Result};
use clap::Parser;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Parser, Clone)]
#[command(
    name = "text-liner",
    version,
    about = "Trim, clean up and reorder the lines of a text file, with optional TUI"
)]
pub struct Cli {
    /// Text file to open ("-" or absent reads stdin in text mode)
    pub file: Option<PathBuf>,

    /// Print the ordered lines and exit (no TUI)
    #[arg(long)]
    pub text: bool,

    /// Ordering for text mode: min-length, max-length, ascending, descending.
    /// Defaults to the last action used.
    #[arg(long, value_parser = parse_policy)]
    pub policy: Option<OrderingPolicy>,

    /// Use --trim-lines true or --trim-lines false to override the saved option
    #[arg(long, action = clap::ArgAction::Set)]
    pub trim_lines: Option<bool>,

    /// Use --remove-blank-lines true or --remove-blank-lines false to override the saved option
    #[arg(long, action = clap::ArgAction::Set)]
    pub remove_blank_lines: Option<bool>,

    /// Write the result to this file instead of stdout (text mode)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Settings file
    #[arg(long, default_value = preferences::DEFAULT_FILE_NAME)]
    pub settings: PathBuf,

    /// Write logs to this file (the TUI otherwise discards them)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

fn parse_policy(s: &str) -> Result<OrderingPolicy, String> {
    OrderingPolicy::from_stored(s).ok_or_else(|| {
        let names: Vec<&str> = OrderingPolicy::ALL.iter().map(|p| p.cli_name()).collect();
        format!("unknown policy '{s}', expected one of: {}", names.join(", "))
    })
}

impl Cli {
    /// Apply command-line toggle overrides on top of loaded preferences.
    pub fn apply_overrides(&self, prefs: &mut Preferences) {
        if let Some(trim) = self.trim_lines {
            prefs.trim_lines = trim;
        }
        if let Some(remove) = self.remove_blank_lines {
            prefs.remove_blank_lines = remove;
        }
    }

    fn reads_stdin(&self) -> bool {
        match self.file.as_deref() {
            None => true,
            Some(p) => p == Path::new("-"),
        }
    }
}

pub fn run(args: Cli) -> Result<()> {
    if !args.text {
        #[cfg(feature = "tui")]
        {
            return crate::tui::run(args);
        }
        #[cfg(not(feature = "tui"))]
        {
            // Fallback when built without TUI support.
            return run_text(args);
        }
    }

    run_text(args)
}

/// Load the settings file, falling back to defaults when it cannot be read.
///
/// The flag is false when an existing file could not be parsed; such a file
/// is left alone rather than replaced with defaults.
fn load_or_default(path: &Path) -> (Preferences, bool) {
    match preferences::load(path) {
        Ok(prefs) => (prefs, true),
        Err(e) => {
            tracing::warn!("{e}; continuing with default settings");
            let writable = !matches!(e, StorageError::Parse { .. });
            (Preferences::default(), writable)
        }
    }
}

/// Non-interactive mode: read, order, write, remember the action.
///
/// Toggle overrides only affect this run; the only preference that is saved
/// back is the last action.
fn run_text(args: Cli) -> Result<()> {
    let (mut stored, writable) = load_or_default(&args.settings);
    let mut session = stored.clone();
    args.apply_overrides(&mut session);
    let policy = args.policy.unwrap_or(session.last_action);

    let lines = match args.file.as_deref() {
        Some(path) if !args.reads_stdin() => {
            content::read_lines(path).with_context(|| format!("open {}", path.display()))?
        }
        _ => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("read stdin")?;
            content::split_lines(&input)
        }
    };

    let mut app = AppState::new(lines, session);
    app.apply(policy);

    match args.output.as_deref() {
        Some(out) => content::write_lines(out, &app.buffer)?,
        None => {
            let stdout = std::io::stdout();
            let mut out = std::io::BufWriter::new(stdout.lock());
            out.write_all(content::join_lines(&app.buffer, content::PLATFORM_EOL).as_bytes())
                .context("write stdout")?;
            out.flush().context("flush stdout")?;
        }
    }

    if !writable {
        tracing::warn!(
            path = %args.settings.display(),
            "settings file not updated, it could not be parsed"
        );
        return Ok(());
    }
    stored.last_action = app.prefs.last_action;
    preferences::save(&args.settings, &stored).context("save settings")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_policy_and_overrides() {
        let args = Cli::try_parse_from([
            "text-liner",
            "--text",
            "--policy",
            "max-length",
            "--trim-lines",
            "true",
            "--remove-blank-lines",
            "false",
            "notes.txt",
        ])
        .unwrap();

        assert!(args.text);
        assert_eq!(args.policy, Some(OrderingPolicy::ByLengthDescending));
        assert_eq!(args.file.as_deref(), Some(Path::new("notes.txt")));
        assert_eq!(args.settings, PathBuf::from(preferences::DEFAULT_FILE_NAME));

        let mut prefs = Preferences::default();
        args.apply_overrides(&mut prefs);
        assert!(prefs.trim_lines);
        assert!(!prefs.remove_blank_lines);
    }

    #[test]
    fn missing_overrides_keep_saved_values() {
        let args = Cli::try_parse_from(["text-liner"]).unwrap();
        let mut prefs = Preferences {
            trim_lines: true,
            ..Default::default()
        };
        args.apply_overrides(&mut prefs);
        assert!(prefs.trim_lines);
        assert!(prefs.remove_blank_lines);
        assert!(args.reads_stdin());
    }

    #[test]
    fn rejects_unknown_policy() {
        let err = Cli::try_parse_from(["text-liner", "--policy", "random"]).unwrap_err();
        assert!(err.to_string().contains("min-length"));
    }

    #[test]
    fn text_mode_writes_output_and_remembers_action() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.txt");
        let output = dir.path().join("out.txt");
        let settings = dir.path().join("settings.txt");
        std::fs::write(&input, "  beta\n\nalpha  \n").unwrap();

        let argv: Vec<std::ffi::OsString> = vec![
            "text-liner".into(),
            "--text".into(),
            "--policy".into(),
            "ascending".into(),
            "--trim-lines".into(),
            "true".into(),
            "--output".into(),
            output.clone().into_os_string(),
            "--settings".into(),
            settings.clone().into_os_string(),
            input.into_os_string(),
        ];
        let args = Cli::try_parse_from(argv).unwrap();
        run(args).unwrap();

        assert_eq!(content::read_lines(&output).unwrap(), vec!["alpha", "beta"]);
        let saved = preferences::load(&settings).unwrap();
        assert_eq!(saved.last_action, OrderingPolicy::LexicographicAscending);
        // The override was for this run only.
        assert!(!saved.trim_lines);
    }

    #[test]
    fn text_mode_leaves_unparseable_settings_alone() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.txt");
        let output = dir.path().join("out.txt");
        let settings = dir.path().join("settings.txt");
        let legacy = "<SettingsData><LastAction>Max. length</LastAction></SettingsData>";
        std::fs::write(&input, "bb\na\n").unwrap();
        std::fs::write(&settings, legacy).unwrap();

        let argv: Vec<std::ffi::OsString> = vec![
            "text-liner".into(),
            "--text".into(),
            "--output".into(),
            output.clone().into_os_string(),
            "--settings".into(),
            settings.clone().into_os_string(),
            input.into_os_string(),
        ];
        run(Cli::try_parse_from(argv).unwrap()).unwrap();

        // Defaults were used for the run (Min. length).
        assert_eq!(content::read_lines(&output).unwrap(), vec!["a", "bb"]);
        assert_eq!(std::fs::read_to_string(&settings).unwrap(), legacy);
    }
}
