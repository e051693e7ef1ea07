//! Shell completions generation command.
//!
//! ```bash
//! gtest-report completions bash > ~/.local/share/bash-completion/completions/gtest-report
//! gtest-report completions zsh -o ~/.zsh/completions/_gtest-report
//! ```

use crate::cli::{Cli, CompletionsArgs, ShellType};
use crate::error::{Result, ResultExt};
use clap::CommandFactory;
use clap_complete::{Shell, generate};
use std::fs::File;
use std::io;
use tracing::info;

const BIN_NAME: &str = "gtest-report";

/// Execute the completions command.
///
/// # Errors
///
/// Returns an error if the output file cannot be created.
pub fn execute(args: &CompletionsArgs) -> Result<()> {
    info!(shell = ?args.shell, output = ?args.output, "Generating shell completions");

    let mut cmd = Cli::command();
    let shell = convert_shell_type(args.shell);

    if let Some(output_path) = &args.output {
        let mut file = File::create(output_path).with_path_context(output_path)?;
        generate(shell, &mut cmd, BIN_NAME, &mut file);
        eprintln!(
            "Generated {} completions to {}",
            shell_name(args.shell),
            output_path.display()
        );
        print_install_instructions(args.shell);
    } else {
        generate(shell, &mut cmd, BIN_NAME, &mut io::stdout());
    }

    Ok(())
}

const fn convert_shell_type(shell: ShellType) -> Shell {
    match shell {
        ShellType::Bash => Shell::Bash,
        ShellType::Zsh => Shell::Zsh,
        ShellType::Fish => Shell::Fish,
        ShellType::PowerShell => Shell::PowerShell,
        ShellType::Elvish => Shell::Elvish,
    }
}

const fn shell_name(shell: ShellType) -> &'static str {
    match shell {
        ShellType::Bash => "bash",
        ShellType::Zsh => "zsh",
        ShellType::Fish => "fish",
        ShellType::PowerShell => "PowerShell",
        ShellType::Elvish => "elvish",
    }
}

/// Print where to put a generated completion script.
pub fn print_install_instructions(shell: ShellType) {
    match shell {
        ShellType::Bash => {
            eprintln!("\n# bash: place the script in ~/.local/share/bash-completion/completions/{BIN_NAME}");
        }
        ShellType::Zsh => {
            eprintln!("\n# zsh: place the script as _{BIN_NAME} in a directory on $fpath");
            eprintln!("# e.g. fpath=(~/.zsh/completions $fpath) in ~/.zshrc");
        }
        ShellType::Fish => {
            eprintln!("\n# fish: place the script in ~/.config/fish/completions/{BIN_NAME}.fish");
        }
        ShellType::PowerShell => {
            eprintln!("\n# PowerShell: add to $PROFILE:");
            eprintln!("{BIN_NAME} completions powershell | Out-String | Invoke-Expression");
        }
        ShellType::Elvish => {
            eprintln!("\n# elvish: place the script in ~/.elvish/lib/{BIN_NAME}.elv and `use` it from rc.elv");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script_for(shell: Shell) -> String {
        let mut cmd = Cli::command();
        let mut output = Vec::new();
        generate(shell, &mut cmd, BIN_NAME, &mut output);
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_convert_shell_type() {
        assert_eq!(convert_shell_type(ShellType::Bash), Shell::Bash);
        assert_eq!(convert_shell_type(ShellType::PowerShell), Shell::PowerShell);
        assert_eq!(convert_shell_type(ShellType::Elvish), Shell::Elvish);
    }

    #[test]
    fn test_bash_completion_contains_commands() {
        let script = script_for(Shell::Bash);
        assert!(script.contains("complete"));
        for command in ["generate", "report", "summary", "sa", "completions"] {
            assert!(script.contains(command), "missing {command}");
        }
        assert!(script.contains("--json"));
        assert!(script.contains("--verbose"));
    }

    #[test]
    fn test_zsh_and_fish_syntax() {
        assert!(script_for(Shell::Zsh).contains("#compdef gtest-report"));
        assert!(script_for(Shell::Fish).contains("complete -c gtest-report"));
    }
}
