//! Notification message composition.
//!
//! Wraps an expanded page in a plain-text mail message: envelope lines,
//! an empty header block, the body, and a ticket footer. The exact layout
//! matters because the receiving ticket system parses it; a stray blank line
//! between envelope and header makes it treat header values as body text.

use chrono::NaiveDate;

use crate::schedule::Schedule;

/// Placeholder in the subject prefix replaced by the date label.
const SUBJECT_PLACEHOLDER: &str = "{}";

/// Error composing a notice.
#[derive(Debug, thiserror::Error)]
pub enum NoticeError {
    /// Subject prefix has more than one `{}` placeholder.
    #[error("Subject prefix '{template}' has {placeholders} placeholders, expected at most one")]
    SubjectTemplate {
        /// The offending subject prefix.
        template: String,
        /// Number of `{}` occurrences found.
        placeholders: usize,
    },
}

/// Ticket fields listed in the footer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketFields {
    /// Target project.
    pub project: String,
    /// Issue category.
    pub category: String,
    /// Initial issue status.
    pub status: String,
    /// Issue priority.
    pub priority: String,
    /// Due date, if the task has one.
    pub due_date: Option<String>,
}

impl TicketFields {
    fn footer(&self) -> String {
        let mut footer = format!(
            "\nProject: {}\nCategory: {}\nStatus: {}\nPriority: {}\n",
            self.project, self.category, self.status, self.priority
        );
        if let Some(due_date) = &self.due_date {
            footer.push_str("Due date: ");
            footer.push_str(due_date);
            footer.push('\n');
        }
        footer
    }
}

/// A notification to compose around an expanded page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notice {
    /// Sender address.
    pub from: String,
    /// Recipient address.
    pub to: String,
    /// Subject prefix; a single `{}` is replaced by the lower-cased date label.
    pub subject_prefix: String,
    /// Schedule, shown as its keyword after the subject.
    pub schedule: Schedule,
    /// Footer fields.
    pub ticket: TicketFields,
}

impl Notice {
    /// Expand the subject prefix with a date label.
    pub fn subject(&self, date_label: &str) -> Result<String, NoticeError> {
        match self.subject_prefix.matches(SUBJECT_PLACEHOLDER).count() {
            0 => Ok(self.subject_prefix.clone()),
            1 => Ok(self
                .subject_prefix
                .replacen(SUBJECT_PLACEHOLDER, &date_label.to_lowercase(), 1)),
            placeholders => Err(NoticeError::SubjectTemplate {
                template: self.subject_prefix.clone(),
                placeholders,
            }),
        }
    }

    /// Compose the full message text around `body`.
    ///
    /// # Arguments
    ///
    /// * `body` - Expanded page text
    /// * `date_label` - Label for the run (e.g., "2026-10-18", "October 2026")
    pub fn render(&self, body: &str, date_label: &str) -> Result<String, NoticeError> {
        let envelope = format!(
            "From: {}\nTo: {}\nSubject: {} ({})\n",
            self.from,
            self.to,
            self.subject(date_label)?,
            self.schedule
        );
        let header = "";
        let footer = self.ticket.footer();

        Ok(format!("{envelope}{header}\n{body}\n{footer}\n"))
    }

    /// Compose the message for a run on `date`, labelled per the schedule.
    pub fn render_on(&self, body: &str, date: NaiveDate) -> Result<String, NoticeError> {
        self.render(body, &self.schedule.date_label(date))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn notice() -> Notice {
        Notice {
            from: "ops@example.com".to_owned(),
            to: "tickets@example.com".to_owned(),
            subject_prefix: "Backup review for {}".to_owned(),
            schedule: Schedule::Monthly,
            ticket: TicketFields {
                project: "Ops".to_owned(),
                category: "Maintenance".to_owned(),
                status: "New".to_owned(),
                priority: "Normal".to_owned(),
                due_date: None,
            },
        }
    }

    #[test]
    fn test_render_without_due_date() {
        let message = notice().render("Check the tapes.", "October 2026").unwrap();

        assert_eq!(
            message,
            "From: ops@example.com\n\
             To: tickets@example.com\n\
             Subject: Backup review for october 2026 (monthly)\n\
             \n\
             Check the tapes.\n\
             \n\
             Project: Ops\n\
             Category: Maintenance\n\
             Status: New\n\
             Priority: Normal\n\
             \n"
        );
    }

    #[test]
    fn test_render_with_due_date() {
        let mut notice = notice();
        notice.ticket.due_date = Some("2026-10-31".to_owned());

        let message = notice.render("body", "October 2026").unwrap();

        assert!(message.ends_with("Priority: Normal\nDue date: 2026-10-31\n\n"));
    }

    #[test]
    fn test_render_on_uses_schedule_label() {
        let mut notice = notice();
        let date = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();

        let monthly = notice.render_on("body", date).unwrap();
        assert!(monthly.contains("Subject: Backup review for october 2026 (monthly)\n"));

        notice.schedule = Schedule::WeeklyFriday;
        let weekly = notice.render_on("body", date).unwrap();
        assert!(weekly.contains("Subject: Backup review for 2026-10-18 (weekly_friday)\n"));

        notice.schedule = Schedule::Yearly;
        let yearly = notice.render_on("body", date).unwrap();
        assert!(yearly.contains("Subject: Backup review for 2026 (yearly)\n"));
    }

    #[test]
    fn test_subject_without_placeholder_is_verbatim() {
        let mut notice = notice();
        notice.subject_prefix = "Weekly sync".to_owned();

        assert_eq!(notice.subject("2026-10-18").unwrap(), "Weekly sync");
    }

    #[test]
    fn test_subject_with_two_placeholders_fails() {
        let mut notice = notice();
        notice.subject_prefix = "{} and {}".to_owned();

        let err = notice.render("body", "x").unwrap_err();

        assert!(matches!(
            err,
            NoticeError::SubjectTemplate {
                placeholders: 2,
                ..
            }
        ));
    }
}
