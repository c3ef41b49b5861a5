//! Notification email rendering.
//!
//! Each notification category gets its own subject line and body copy.
//! Titles and descriptions are user-controlled and must be escaped before
//! they reach the HTML part.

use chrono::{DateTime, Utc};
use duetick_entity::notification::{NotificationCandidate, NotificationCategory};

/// Subject and both body variants for one notification email.
#[derive(Debug, Clone)]
pub struct RenderedEmail {
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}

/// Renders the email for a notification candidate.
pub fn render(candidate: &NotificationCandidate, recipient_name: &str) -> RenderedEmail {
    let (subject, lede) = match candidate.category {
        NotificationCategory::UserMessage => (
            format!("Upcoming reminder: {}", candidate.title),
            "is coming up",
        ),
        NotificationCategory::DeadlineMessage => (
            format!("Deadline approaching: {}", candidate.title),
            "is due soon",
        ),
    };
    let deadline = format_deadline(candidate.deadline);

    let mut text = format!(
        "Hi {recipient_name},\n\n\
         Your reminder \"{}\" {lede}.\n\
         Due: {deadline}\n",
        candidate.title
    );
    if !candidate.description.is_empty() {
        text.push_str(&format!("\n{}\n", candidate.description));
    }
    text.push_str("\n- Duetick\n");

    let mut html = format!(
        "<p>Hi {},</p>\
         <p>Your reminder <strong>{}</strong> {lede}.</p>\
         <p>Due: {}</p>",
        escape_html(recipient_name),
        escape_html(&candidate.title),
        escape_html(&deadline),
    );
    if !candidate.description.is_empty() {
        html.push_str(&format!("<p>{}</p>", escape_html(&candidate.description)));
    }
    html.push_str("<p>- Duetick</p>");

    RenderedEmail {
        subject,
        text_body: text,
        html_body: html,
    }
}

fn format_deadline(deadline: DateTime<Utc>) -> String {
    deadline.format("%a, %d %b %Y at %H:%M UTC").to_string()
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use duetick_core::types::{ReminderId, UserId};

    fn candidate(category: NotificationCategory) -> NotificationCandidate {
        NotificationCandidate {
            reminder_id: ReminderId::new(),
            user_id: UserId::new(),
            title: "Quarterly report".to_string(),
            description: "Send the figures to finance".to_string(),
            deadline: Utc.with_ymd_and_hms(2025, 6, 30, 17, 0, 0).unwrap(),
            category,
            fired_period: None,
        }
    }

    #[test]
    fn test_upcoming_subject_and_deadline() {
        let rendered = render(&candidate(NotificationCategory::UserMessage), "Ada");
        assert_eq!(rendered.subject, "Upcoming reminder: Quarterly report");
        assert!(rendered.text_body.contains("30 Jun 2025"));
        assert!(rendered.text_body.contains("Send the figures to finance"));
        assert!(rendered.html_body.contains("Hi Ada"));
    }

    #[test]
    fn test_deadline_subject() {
        let rendered = render(&candidate(NotificationCategory::DeadlineMessage), "Ada");
        assert_eq!(rendered.subject, "Deadline approaching: Quarterly report");
        assert!(rendered.text_body.contains("due soon"));
    }

    #[test]
    fn test_html_body_escapes_user_content() {
        let mut c = candidate(NotificationCategory::UserMessage);
        c.title = "<script>alert(1)</script>".to_string();
        let rendered = render(&c, "Ada & Bob");

        assert!(!rendered.html_body.contains("<script>"));
        assert!(rendered.html_body.contains("&lt;script&gt;"));
        assert!(rendered.html_body.contains("Ada &amp; Bob"));
    }

    #[test]
    fn test_empty_description_omitted() {
        let mut c = candidate(NotificationCategory::DeadlineMessage);
        c.description = String::new();
        let rendered = render(&c, "Ada");
        assert!(!rendered.text_body.contains("figures"));
        assert!(!rendered.html_body.contains("<p></p>"));
    }
}
