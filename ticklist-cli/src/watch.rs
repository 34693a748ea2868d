//! Recurring reminder loop for the `watch` command

use std::future::Future;
use std::time::Duration;

use chrono::Local;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info};

use ticklist_core::{Controller, KeyValueStore, Notifier};

use crate::error::{CliError, Result};

/// Run reminder passes every `interval` until Ctrl-C
pub fn watch<S: KeyValueStore>(
    controller: &mut Controller<S>,
    notifier: &mut dyn Notifier,
    interval: Duration,
) -> Result<usize> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::io("Failed to start async runtime", e))?;

    runtime.block_on(async {
        let shutdown = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                debug!(error = %e, "failed to listen for Ctrl-C");
            }
        };
        Ok(watch_until(controller, notifier, interval, shutdown).await)
    })
}

/// Run reminder passes until `shutdown` completes, returning how many fired
///
/// The first pass runs immediately. Tasks are re-read before every pass so
/// changes made by other commands are picked up.
pub async fn watch_until<S, F>(
    controller: &mut Controller<S>,
    notifier: &mut dyn Notifier,
    interval: Duration,
    shutdown: F,
) -> usize
where
    S: KeyValueStore,
    F: Future<Output = ()>,
{
    let mut ticker = time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::pin!(shutdown);

    let mut total = 0;
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                controller.reload();
                let fired = controller.check_reminders(Local::now(), notifier);
                if fired > 0 {
                    info!(fired, "sent reminders");
                }
                total += fired;
            }
            _ = &mut shutdown => {
                info!(total, "stopping reminder watch");
                break;
            }
        }
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use ticklist_core::{MemoryStore, NewTask, Permission, ReminderPolicy, Result as CoreResult};

    struct Recorder {
        bodies: Vec<String>,
    }

    impl Notifier for Recorder {
        fn permission(&self) -> Permission {
            Permission::Granted
        }

        fn request_permission(&mut self) -> Permission {
            Permission::Granted
        }

        fn notify(&mut self, _title: &str, body: &str) -> CoreResult<()> {
            self.bodies.push(body.to_string());
            Ok(())
        }
    }

    fn controller_with_due_reminder(policy: ReminderPolicy) -> Controller<MemoryStore> {
        let mut controller = Controller::load(MemoryStore::new()).with_policy(policy);
        let past = Local::now() - chrono::Duration::minutes(1);
        controller.add(NewTask::new("stretch").with_reminder(Some(past)));
        controller
    }

    #[tokio::test]
    async fn test_once_policy_fires_a_single_time() {
        let mut controller = controller_with_due_reminder(ReminderPolicy::Once);
        let mut notifier = Recorder { bodies: Vec::new() };

        let total = watch_until(
            &mut controller,
            &mut notifier,
            Duration::from_millis(10),
            time::sleep(Duration::from_millis(60)),
        )
        .await;

        assert_eq!(total, 1);
        assert_eq!(notifier.bodies, vec!["Reminder for task: stretch"]);
    }

    #[tokio::test]
    async fn test_every_pass_policy_repeats() {
        let mut controller = controller_with_due_reminder(ReminderPolicy::EveryPass);
        let mut notifier = Recorder { bodies: Vec::new() };

        let total = watch_until(
            &mut controller,
            &mut notifier,
            Duration::from_millis(10),
            time::sleep(Duration::from_millis(60)),
        )
        .await;

        assert!(total >= 2);
    }
}
