//! Basic reminder engine example
//!
//! Demonstrates:
//! - Scheduling a task with a deadline and two reminders
//! - The immediate confirmation event
//! - A custom mailer implementation

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use std::sync::Arc;
use std::time::Duration;
use tickler_channels::LogNotifier;
use tickler_scheduler::prelude::*;

// Mailer that prints messages instead of talking to a relay.
struct ConsoleMailer;

#[async_trait]
impl Mailer for ConsoleMailer {
    async fn send(&self, mail: &OutgoingEmail) -> std::result::Result<(), ChannelError> {
        println!(
            "--- email to {} ---\nSubject: {}\n{}\n",
            mail.recipient, mail.subject, mail.html_body
        );
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter("tickler_scheduler=debug,tickler_store=info")
        .init();

    println!("=== Tickler basic example ===\n");

    let queue = Arc::new(EventQueue::open("./data/reminders-example/queue.db")?);

    let scheduler = Scheduler::builder(queue)
        .with_notifier(LogNotifier::new())
        .with_mailer(ConsoleMailer)
        .with_config(SchedulerConfig::new().with_poll_interval(Duration::from_millis(500)))
        .build()?;

    let now = Utc::now();
    let task_id = scheduler.schedule_task(
        TaskRequest::builder("Water the plants")
            .deadline_at(now + ChronoDuration::minutes(10))
            .reminder_at(now + ChronoDuration::seconds(10))
            .reminder_at(now + ChronoDuration::seconds(30))
            .recipient("you@example.com")
            .build()?,
    )?;

    println!("Scheduled task {task_id}: confirmation now, reminders in 10s and 30s.\n");

    // Run the dispatcher with a demo window.
    tokio::select! {
        res = scheduler.run() => {
            res?;
        }
        _ = tokio::time::sleep(Duration::from_secs(45)) => {
            println!("\nDemo window over, stopping dispatcher...");
            scheduler.shutdown();
        }
    }

    println!("Dispatcher stopped.");
    Ok(())
}
