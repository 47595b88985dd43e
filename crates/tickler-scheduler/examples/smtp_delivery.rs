//! End-to-end delivery through a real SMTP relay
//!
//! Relay settings come from the environment:
//! - `TICKLER_SMTP_HOST` — relay hostname
//! - `TICKLER_SMTP_PORT` — submission port (defaults to 587)
//! - `TICKLER_SMTP_USER` / `TICKLER_SMTP_PASS` — relay credentials
//! - `TICKLER_SMTP_FROM` — sender address
//! - `TICKLER_SMTP_TO` — recipient for the confirmation email

use chrono::{Duration as ChronoDuration, Utc};
use std::env;
use std::sync::Arc;
use std::time::Duration;
use tickler_channels::{LogNotifier, SmtpConfig, SmtpMailer};
use tickler_scheduler::prelude::*;

fn env_var(name: &str) -> anyhow::Result<String> {
    env::var(name).map_err(|_| anyhow::anyhow!("set {name} to run this example"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("tickler_scheduler=debug,tickler_channels=debug")
        .init();

    let config = SmtpConfig {
        host: env_var("TICKLER_SMTP_HOST")?,
        port: env::var("TICKLER_SMTP_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(587),
        username: env_var("TICKLER_SMTP_USER")?,
        password: env_var("TICKLER_SMTP_PASS")?,
        from_address: env_var("TICKLER_SMTP_FROM")?,
        from_name: "Tickler".to_string(),
    };
    let recipient = env_var("TICKLER_SMTP_TO")?;

    let queue = Arc::new(EventQueue::open_in_memory()?);
    let scheduler = Scheduler::builder(queue)
        .with_notifier(LogNotifier::new())
        .with_mailer(SmtpMailer::new(config)?)
        .build()?;

    let task_id = scheduler.schedule_task(
        TaskRequest::builder("Try out Tickler")
            .deadline_at(Utc::now() + ChronoDuration::minutes(30))
            .recipient(recipient)
            .build()?,
    )?;
    println!("Scheduled task {task_id}; sending the confirmation email...");

    tokio::select! {
        res = scheduler.run() => {
            res?;
        }
        _ = tokio::time::sleep(Duration::from_secs(15)) => {
            scheduler.shutdown();
        }
    }

    println!("Done.");
    Ok(())
}
