//! Shell completion scripts

use std::io::Write;

use clap::CommandFactory;
use clap_complete::Shell as ClapShell;

use crate::cli::args::{Cli, CompletionsArgs, Shell};

impl From<Shell> for ClapShell {
    fn from(shell: Shell) -> Self {
        match shell {
            Shell::Bash => Self::Bash,
            Shell::Zsh => Self::Zsh,
            Shell::Fish => Self::Fish,
            Shell::PowerShell => Self::PowerShell,
            Shell::Elvish => Self::Elvish,
        }
    }
}

/// Writes the completion script for `shell`, covering every subcommand
/// and its flags.
pub fn write_script(shell: Shell, out: &mut dyn Write) {
    let mut cmd = Cli::command();
    let bin = cmd.get_name().to_string();
    clap_complete::generate(ClapShell::from(shell), &mut cmd, bin, out);
}

/// Print the completion script to stdout.
pub fn run(args: &CompletionsArgs) {
    write_script(args.shell, &mut std::io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script(shell: Shell) -> String {
        let mut out = Vec::new();
        write_script(shell, &mut out);
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn bash_script_knows_check_flags() {
        let bash = script(Shell::Bash);
        assert!(bash.contains("tracephase"));
        assert!(bash.contains("validate"));
        assert!(bash.contains("--plan"));
        assert!(bash.contains("--checksum"));
    }

    #[test]
    fn every_shell_produces_a_script() {
        for shell in [
            Shell::Bash,
            Shell::Zsh,
            Shell::Fish,
            Shell::PowerShell,
            Shell::Elvish,
        ] {
            assert!(!script(shell).is_empty(), "{shell:?}");
        }
    }
}
