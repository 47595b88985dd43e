//! Rendering of fired events into channel messages.
//!
//! Confirmation events get a summary email listing the task, deadline and
//! reminder display strings captured at creation time; reminder and deadline
//! events share one short announcement across both channels.

use tickler_core::{EventKind, Notification, OutgoingEmail, ScheduledEvent};

pub(crate) fn compose(event: &ScheduledEvent) -> (Notification, OutgoingEmail) {
    let payload = &event.payload;
    match event.kind {
        EventKind::Confirmation => {
            let note = Notification {
                title: "Task Confirmation".to_string(),
                body: format!("A new task has been added: {}", payload.description),
            };
            let html_body = format!(
                r#"<html>
<body>
    <p>A new task has been added to your plan:</p>
    <p><b>Task:</b><br>{}</p>
    <p><b>Deadline:</b><br>{}</p>
    <p><b>Reminders:</b><br>{}</p>
    <p>Thank you for using Tickler!</p>
</body>
</html>"#,
                payload.description,
                payload.deadline_text,
                payload.reminder_texts.join("<br>"),
            );
            let mail = OutgoingEmail {
                recipient: payload.recipient.clone(),
                subject: "A new task has been added to your plan".to_string(),
                html_body,
            };
            (note, mail)
        }
        EventKind::Reminder | EventKind::Deadline => {
            let title = match event.kind {
                EventKind::Deadline => "Task Deadline",
                _ => "Task Reminder",
            };
            let body = format!("Your task is due: {}", payload.description);
            let note = Notification {
                title: title.to_string(),
                body: body.clone(),
            };
            let mail = OutgoingEmail {
                recipient: payload.recipient.clone(),
                subject: title.to_string(),
                html_body: body,
            };
            (note, mail)
        }
    }
}
