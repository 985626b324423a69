// ABOUTME: CLI argument parsing for tmx
//
// With no flags tmx launches the interactive session manager (which must
// run inside a tmux session). --install/--uninstall manage the tmux key
// binding and the shell `quit` helper; help and version come from clap.

use clap::{ArgAction, Parser};

/// Keyboard-driven session manager for tmux
#[derive(Parser, Debug)]
#[command(name = "tmx")]
#[command(author, about, long_about = None)]
#[command(disable_version_flag = true)]
#[command(version)]
#[command(after_help = "\
tmx must run inside a tmux session:
  tmux              # start tmux
  tmx               # run the manager inside it

Keys: Enter attach · n new · d detach · x kill · j/k navigate · q quit
Run `tmx --install` to bind Ctrl+b t to tmx and add a shell `quit` command.")]
pub struct Cli {
    /// Install the tmux key binding and the shell `quit` helper
    #[arg(long, conflicts_with = "uninstall")]
    pub install: bool,

    /// Remove everything --install added
    #[arg(long)]
    pub uninstall: bool,

    /// Print version information
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    version: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn test_short_v_requests_version() {
        let err = Cli::try_parse_from(["tmx", "-v"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_long_version_requests_version() {
        let err = Cli::try_parse_from(["tmx", "--version"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_help_flags_request_help() {
        for flag in ["-h", "--help"] {
            let err = Cli::try_parse_from(["tmx", flag]).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::DisplayHelp);
        }
    }

    #[test]
    fn test_unknown_argument_is_an_error() {
        let err = Cli::try_parse_from(["tmx", "--bogus"]).unwrap_err();
        assert!(!matches!(
            err.kind(),
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
        ));
    }

    #[test]
    fn test_install_and_uninstall_flags() {
        let cli = Cli::try_parse_from(["tmx", "--install"]).unwrap();
        assert!(cli.install);
        assert!(!cli.uninstall);

        let cli = Cli::try_parse_from(["tmx", "--uninstall"]).unwrap();
        assert!(cli.uninstall);

        assert!(Cli::try_parse_from(["tmx", "--install", "--uninstall"]).is_err());
    }
}
