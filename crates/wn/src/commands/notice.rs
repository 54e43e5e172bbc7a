//! `wn notice` command implementation.

use std::io::Write;

use chrono::{Local, NaiveDate};
use clap::Args;
use wn_transclude::{Notice, Resolver, Schedule, TicketFields};

use super::SourceArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the notice command.
#[derive(Args)]
pub(crate) struct NoticeArgs {
    /// Root page name.
    page: String,

    #[command(flatten)]
    pub source: SourceArgs,

    /// Sender address.
    #[arg(long)]
    from: String,

    /// Recipient address.
    #[arg(long)]
    to: String,

    /// Subject prefix; `{}` is replaced by the date label.
    #[arg(long)]
    subject: String,

    /// Notification schedule; selects the date label format.
    #[arg(long, value_enum)]
    schedule: Schedule,

    /// Run date in YYYY-MM-DD (default: today).
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Label for this run, overriding the one derived from the schedule.
    #[arg(long)]
    date_label: Option<String>,

    /// Ticket project.
    #[arg(long)]
    project: String,

    /// Ticket category.
    #[arg(long)]
    category: String,

    /// Ticket status.
    #[arg(long)]
    status: String,

    /// Ticket priority.
    #[arg(long)]
    priority: String,

    /// Ticket due date.
    #[arg(long)]
    due_date: Option<String>,
}

impl NoticeArgs {
    /// Execute the notice command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, the page cannot be resolved,
    /// or the subject prefix is malformed.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let session = self.source.open(None)?;
        let namespace = session.namespace()?;

        let resolution = Resolver::new(&session.source)
            .with_options(session.options())
            .resolve_page(namespace, &self.page)
            .map_err(|source| CliError::Resolve {
                page: self.page.clone(),
                source,
            })?;
        for diagnostic in &resolution.diagnostics {
            output.warning(&format!("Warning: {}: {diagnostic}", self.page));
        }

        let notice = Notice {
            from: self.from,
            to: self.to,
            subject_prefix: self.subject,
            schedule: self.schedule,
            ticket: TicketFields {
                project: self.project,
                category: self.category,
                status: self.status,
                priority: self.priority,
                due_date: self.due_date,
            },
        };
        let date = self.date.unwrap_or_else(|| Local::now().date_naive());
        let date_label = run_date_label(notice.schedule, date, self.date_label);
        let message = notice.render(&resolution.text, &date_label)?;

        let mut stdout = std::io::stdout().lock();
        stdout.write_all(message.as_bytes())?;
        stdout.flush()?;
        Ok(())
    }
}

/// Explicit label if given, otherwise `date` at the schedule's granularity.
fn run_date_label(schedule: Schedule, date: NaiveDate, explicit: Option<String>) -> String {
    explicit.unwrap_or_else(|| schedule.date_label(date))
}
