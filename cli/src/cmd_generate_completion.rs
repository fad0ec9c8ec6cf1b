// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{error::Error, io, path::PathBuf};

use clap::{ArgMatches, Command, ValueEnum, ValueHint, arg, value_parser};
use clap_complete::{Generator, generate, generate_to};
use shortlist_core::APP_NAME;

use crate::Cli;

#[derive(Debug, Clone)]
pub struct CmdGenerateCompletion {
    pub shell: Shell,
    pub out_dir: Option<PathBuf>,
}

impl CmdGenerateCompletion {
    pub const NAME: &str = "generate-completion";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Generate shell completion for the shortlist command")
            .hide(true)
            .arg(arg!(shell: <SHELL> "Target shell").value_parser(value_parser!(Shell)))
            .arg(
                arg!(--"out-dir" <DIR> "Write the script into DIR instead of stdout")
                    .value_parser(value_parser!(PathBuf))
                    .value_hint(ValueHint::DirPath),
            )
    }

    pub fn from(matches: &ArgMatches) -> Self {
        let shell = match matches.get_one::<Shell>("shell") {
            Some(shell) => *shell,
            None => unreachable!("SHELL is required"),
        };
        Self {
            shell,
            out_dir: matches.get_one("out-dir").cloned(),
        }
    }

    pub fn run(self) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "generating shell completion...");
        let mut cmd = Cli::command();
        match self.out_dir {
            Some(dir) => {
                let path = generate_to(self.shell, &mut cmd, APP_NAME, dir)?;
                println!("Completion script written to {}", path.display());
            }
            None => generate(self.shell, &mut cmd, APP_NAME, &mut io::stdout()),
        }
        Ok(())
    }
}

/// Shells a completion script can be generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    Bash,
    Elvish,
    Fish,
    Nushell,
    #[clap(name = "powershell")]
    #[allow(clippy::enum_variant_names)]
    PowerShell,
    Zsh,
}

impl Generator for Shell {
    fn file_name(&self, name: &str) -> String {
        match self {
            Self::Bash => clap_complete::Shell::Bash.file_name(name),
            Self::Elvish => clap_complete::Shell::Elvish.file_name(name),
            Self::Fish => clap_complete::Shell::Fish.file_name(name),
            Self::Nushell => clap_complete_nushell::Nushell.file_name(name),
            Self::PowerShell => clap_complete::Shell::PowerShell.file_name(name),
            Self::Zsh => clap_complete::Shell::Zsh.file_name(name),
        }
    }

    fn generate(&self, cmd: &Command, buf: &mut dyn io::Write) {
        match self {
            Self::Bash => clap_complete::Shell::Bash.generate(cmd, buf),
            Self::Elvish => clap_complete::Shell::Elvish.generate(cmd, buf),
            Self::Fish => clap_complete::Shell::Fish.generate(cmd, buf),
            Self::Nushell => clap_complete_nushell::Nushell.generate(cmd, buf),
            Self::PowerShell => clap_complete::Shell::PowerShell.generate(cmd, buf),
            Self::Zsh => clap_complete::Shell::Zsh.generate(cmd, buf),
        }
    }
}
