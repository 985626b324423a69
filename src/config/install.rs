// ABOUTME: Install/uninstall of the tmux key binding and the shell `quit` helper
//
// Both files get a sentinel-delimited block appended: ~/.tmux.conf gains a
// Ctrl+b t binding that launches tmx plus a status-bar hint, and the shell
// rc gains a `quit` function that detaches the current client. Install is
// idempotent; uninstall removes exactly the lines between the sentinels.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const TMUX_MARKER_BEGIN: &str = "# ========== tmx config ==========";
pub const TMUX_MARKER_END: &str = "# ========== tmx config end ==========";

pub const SHELL_MARKER_BEGIN: &str = "# ========== tmx quit command ==========";
pub const SHELL_MARKER_END: &str = "# ========== tmx quit command end ==========";

const TMUX_CONFIG_BLOCK: &str = "\
# ========== tmx config ==========
# Press Ctrl+b t to open the session manager
bind-key t run-shell \"tmx\"

# Show the shortcut hint in the status bar
set -g status-right '#[fg=green][Ctrl+B T] tmx#[default] | %H:%M %Y-%m-%d'
# ========== tmx config end ==========
";

const SHELL_QUIT_BLOCK: &str = "\
# ========== tmx quit command ==========
# Detach from the current tmux session but keep it running (same as Ctrl+b d)
quit() {
    if [ -n \"$TMUX\" ]; then
        tmux detach-client
    else
        echo \"not inside a tmux session\"
    fi
}
# ========== tmx quit command end ==========
";

/// Install the tmux binding and the shell `quit` helper for the current user.
pub fn install_config() -> Result<()> {
    let home = home_dir()?;

    let tmux_conf = home.join(".tmux.conf");
    install_block(&tmux_conf, TMUX_CONFIG_BLOCK, TMUX_MARKER_BEGIN)?;

    let shell_rc = preferred_shell_rc(&home);
    install_block(&shell_rc, SHELL_QUIT_BLOCK, SHELL_MARKER_BEGIN)?;

    println!();
    println!("Reload the tmux configuration with:");
    println!("  tmux source-file ~/.tmux.conf");
    println!("and reload your shell configuration with:");
    println!("  source {}", shell_rc.display());
    Ok(())
}

/// Remove everything `install_config` added.
pub fn uninstall_config() -> Result<()> {
    let home = home_dir()?;

    let tmux_conf = home.join(".tmux.conf");
    uninstall_block(&tmux_conf, TMUX_MARKER_BEGIN, TMUX_MARKER_END)?;

    let mut removed_quit = false;
    for rc in [home.join(".zshrc"), home.join(".bashrc")] {
        if uninstall_block(&rc, SHELL_MARKER_BEGIN, SHELL_MARKER_END)? {
            removed_quit = true;
        }
    }
    if !removed_quit {
        println!("quit command not found, nothing to remove");
    }

    println!();
    println!("Reload the tmux configuration with:");
    println!("  tmux source-file ~/.tmux.conf");
    Ok(())
}

fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().context("could not determine home directory")
}

/// The shell rc file the quit helper goes into: ~/.zshrc when it exists,
/// otherwise ~/.bashrc (created if neither is present).
fn preferred_shell_rc(home: &Path) -> PathBuf {
    let zshrc = home.join(".zshrc");
    if zshrc.exists() {
        zshrc
    } else {
        home.join(".bashrc")
    }
}

/// Append `block` to the file at `path` unless `marker` is already present.
/// Creates the file if it does not exist. Returns true if the block was
/// written.
pub fn install_block(path: &Path, block: &str, marker: &str) -> Result<bool> {
    let existing = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => {
            return Err(e).with_context(|| format!("could not read {}", path.display()));
        }
    };

    if existing.contains(marker) {
        println!("already installed in {}, skipping", path.display());
        return Ok(false);
    }

    let mut updated = existing;
    if !updated.is_empty() && !updated.ends_with('\n') {
        updated.push('\n');
    }
    if !updated.is_empty() {
        updated.push('\n');
    }
    updated.push_str(block);

    fs::write(path, updated).with_context(|| format!("could not write {}", path.display()))?;
    info!("installed config block into {}", path.display());
    println!("installed into {}", path.display());
    Ok(true)
}

/// Remove the lines from `begin` through `end` (inclusive) from the file at
/// `path`, then collapse trailing blank lines to a single newline. Returns
/// true if a block was removed.
pub fn uninstall_block(path: &Path, begin: &str, end: &str) -> Result<bool> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(e) => {
            return Err(e).with_context(|| format!("could not read {}", path.display()));
        }
    };

    if !content.contains(begin) {
        return Ok(false);
    }

    let mut kept = Vec::new();
    let mut in_block = false;
    for line in content.lines() {
        if line.contains(begin) {
            in_block = true;
            continue;
        }
        if in_block {
            if line.contains(end) {
                in_block = false;
            }
            continue;
        }
        kept.push(line);
    }

    let trimmed = kept.join("\n");
    let trimmed = trimmed.trim_end();
    let updated = if trimmed.is_empty() {
        String::new()
    } else {
        format!("{trimmed}\n")
    };

    fs::write(path, updated).with_context(|| format!("could not write {}", path.display()))?;
    info!("removed config block from {}", path.display());
    println!("removed from {}", path.display());
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_blocks_carry_their_markers() {
        assert!(TMUX_CONFIG_BLOCK.starts_with(TMUX_MARKER_BEGIN));
        assert!(TMUX_CONFIG_BLOCK.trim_end().ends_with(TMUX_MARKER_END));
        assert!(SHELL_QUIT_BLOCK.starts_with(SHELL_MARKER_BEGIN));
        assert!(SHELL_QUIT_BLOCK.trim_end().ends_with(SHELL_MARKER_END));
    }

    #[test]
    fn test_install_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".tmux.conf");

        let written = install_block(&path, TMUX_CONFIG_BLOCK, TMUX_MARKER_BEGIN).unwrap();
        assert!(written);

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("bind-key t run-shell"));
    }

    #[test]
    fn test_uninstall_missing_file_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".tmux.conf");

        let removed = uninstall_block(&path, TMUX_MARKER_BEGIN, TMUX_MARKER_END).unwrap();
        assert!(!removed);
        assert!(!path.exists());
    }

    #[test]
    fn test_uninstall_leaves_unrelated_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".bashrc");
        fs::write(&path, "alias ll='ls -l'\n").unwrap();

        install_block(&path, SHELL_QUIT_BLOCK, SHELL_MARKER_BEGIN).unwrap();
        uninstall_block(&path, SHELL_MARKER_BEGIN, SHELL_MARKER_END).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "alias ll='ls -l'\n");
    }
}
