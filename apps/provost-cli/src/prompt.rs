//! Interactive duplicate-account confirmation.

use dialoguer::Confirm;
use provost_provision::{AccountSummary, OperatorPrompt};

/// Prompt backed by the operator's terminal.
///
/// An empty answer accepts: the common case is a namesake, not a
/// duplicate. `assume_yes` (the `--yes` flag) accepts without asking, for
/// unattended runs.
#[derive(Debug, Clone, Copy)]
pub struct ConsolePrompt {
    pub assume_yes: bool,
}

fn describe(summary: &AccountSummary) -> String {
    let name = summary.display_name.as_deref().unwrap_or("(no name)");
    let upn = summary.user_principal_name.as_deref().unwrap_or("(no upn)");
    let mut line = format!("  {name} <{upn}>");
    if let Some(department) = &summary.department {
        line.push_str(&format!("  {department}"));
    }
    if let Some(job_title) = &summary.job_title {
        line.push_str(&format!(", {job_title}"));
    }
    if let Some(company) = &summary.company_name {
        line.push_str(&format!("  [{company}]"));
    }
    line
}

impl OperatorPrompt for ConsolePrompt {
    fn confirm_duplicate(
        &self,
        given_name: &str,
        surname: &str,
        matches: &[AccountSummary],
    ) -> std::io::Result<bool> {
        println!("The following accounts may already exist for {given_name} {surname}:");
        for summary in matches {
            println!("{}", describe(summary));
        }

        if self.assume_yes {
            println!("--yes given, creating the account anyway");
            return Ok(true);
        }

        Confirm::new()
            .with_prompt(format!(
                "Are you sure {given_name} {surname} isn't a duplicate? Create anyway"
            ))
            .default(true)
            .interact()
            .map_err(std::io::Error::other)
    }
}
