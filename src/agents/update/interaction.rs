use crate::agents::update::context::AffectedProject;
use crate::error::{NuvcError, Result};
use colored::Colorize;
use std::io::{self, BufRead, Write};

/// Asks the user to confirm a rewrite before any file is touched
///
/// When disabled (`--yes`) every confirmation succeeds without prompting.
pub struct UpdateInteraction {
    enabled: bool,
}

impl UpdateInteraction {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Confirm a single-package update on stdin/stdout
    pub fn confirm_update(
        &self,
        package: &str,
        target_version: &str,
        affected: &[AffectedProject],
    ) -> Result<bool> {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut output = io::stdout();
        self.confirm_update_with(package, target_version, affected, &mut input, &mut output)
    }

    /// Confirm a bulk update on stdin/stdout
    pub fn confirm_bulk(&self, packages: &[String], target_version: &str) -> Result<bool> {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut output = io::stdout();
        self.confirm_bulk_with(packages, target_version, &mut input, &mut output)
    }

    pub fn confirm_update_with<R: BufRead, W: Write>(
        &self,
        package: &str,
        target_version: &str,
        affected: &[AffectedProject],
        input: &mut R,
        output: &mut W,
    ) -> Result<bool> {
        if !self.enabled {
            return Ok(true);
        }

        writeln!(
            output,
            "\n{} {} {} {}",
            "Update".cyan().bold(),
            package.white().bold(),
            "to".dimmed(),
            target_version.green().bold()
        )?;
        writeln!(output, "The following projects will be updated:")?;
        for project in affected {
            writeln!(
                output,
                "  • {} {} → {}",
                project.project.white(),
                project.current_version.red(),
                target_version.green()
            )?;
        }

        self.ask(input, output)
    }

    pub fn confirm_bulk_with<R: BufRead, W: Write>(
        &self,
        packages: &[String],
        target_version: &str,
        input: &mut R,
        output: &mut W,
    ) -> Result<bool> {
        if !self.enabled {
            return Ok(true);
        }

        writeln!(
            output,
            "\n{} {} package(s) to {}:",
            "Update".cyan().bold(),
            packages.len(),
            target_version.green().bold()
        )?;
        for package in packages {
            writeln!(output, "  • {}", package.white())?;
        }

        self.ask(input, output)
    }

    fn ask<R: BufRead, W: Write>(&self, input: &mut R, output: &mut W) -> Result<bool> {
        loop {
            write!(output, "{}", "Apply this update? [y/N/q]: ".bold())?;
            output.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                return Ok(false);
            }

            match line.trim().to_lowercase().as_str() {
                "y" | "yes" => return Ok(true),
                "" | "n" | "no" => {
                    writeln!(output, "{}", "Skipping this update.".dimmed())?;
                    return Ok(false);
                }
                "q" | "quit" => return Err(NuvcError::UserCancelled),
                _ => {
                    writeln!(
                        output,
                        "{}",
                        "Please answer with y(es), n(o), or q(uit).".red()
                    )?;
                }
            }
        }
    }
}
