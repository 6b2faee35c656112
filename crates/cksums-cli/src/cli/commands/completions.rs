//! `--completions SHELL`: print a completion script to stdout.

use clap::Command;
use clap_complete::{generate, Shell};
use std::io;

pub fn run_completions(shell: Shell, cmd: &mut Command) {
    let name = cmd.get_name().to_string();
    generate(shell, cmd, name, &mut io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::CommandFactory;

    #[test]
    fn bash_completions_mention_check_flag() {
        let mut cmd = Cli::command();
        let mut buf = Vec::new();
        generate(Shell::Bash, &mut cmd, "cksums", &mut buf);
        let script = String::from_utf8(buf).unwrap();
        assert!(script.contains("--check"));
    }
}
