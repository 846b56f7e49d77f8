use lazy_format::lazy_format;
use owo_colors::Style;
use std::fmt::Display;

use crate::styled;

/// The closing message telling the user how to start the new project.
#[derive(Debug, Clone, Copy)]
pub struct Guidance<'a> {
    pub name: &'a str,
    pub package_manager: &'a str,
    pub start_script: &'a str,
    /// Dependencies still need installing
    pub install_pending: bool,
}

impl Guidance<'_> {
    pub fn cd_line(&self) -> impl Display + '_ {
        lazy_format!("  cd {}", self.name)
    }

    pub fn install_line(&self) -> impl Display + '_ {
        lazy_format!("  {} install", self.package_manager)
    }

    pub fn start_line(&self) -> impl Display + '_ {
        lazy_format!("  {} {}", self.package_manager, self.start_script)
    }

    /// Commands to type, in order.
    #[must_use]
    pub fn commands(&self) -> Vec<String> {
        let mut res = vec![self.cd_line().to_string()];
        if self.install_pending {
            res.push(self.install_line().to_string());
        }
        res.push(self.start_line().to_string());
        res
    }

    pub fn print(&self) {
        let command = Style::new().yellow().bold();

        println!();
        styled!(Style::new().bright_green(), "Setup complete! To get started:");
        for line in self.commands() {
            styled!(command, "{line}");
        }
        styled!(
            Style::new().blue(),
            "For more information, check out the README.md file."
        );
    }
}
