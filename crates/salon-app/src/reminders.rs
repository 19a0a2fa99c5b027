//! Daily reminder sweeps run alongside the HTTP server.

use std::sync::Arc;

use salon_core::config::ScheduleConfig;
use salon_service::appointment::reminder::{self, ReminderKind};
use salon_service::error::ServiceResult;
use salon_service::notify::Notifier;

use crate::db_handler::SharedDb;

/// ## Summary
/// Spawns one task per [`ReminderKind`], each sleeping until its configured
/// local hour and then sweeping that day's bookings.
///
/// A failed sweep is logged and retried at the next scheduled hour.
#[must_use]
pub fn spawn_reminder_sweeps(
    provider: &SharedDb,
    schedule: &ScheduleConfig,
    notifier: &Arc<dyn Notifier>,
) -> Vec<tokio::task::JoinHandle<()>> {
    let schedule = Arc::new(schedule.clone());

    ReminderKind::ALL
        .into_iter()
        .map(|kind| {
            let provider = Arc::clone(provider);
            let schedule = Arc::clone(&schedule);
            let notifier = Arc::clone(notifier);

            tokio::spawn(async move {
                loop {
                    let wait = match reminder::time_until_next_run(&schedule, kind) {
                        Ok(wait) => wait,
                        Err(e) => {
                            tracing::error!(error = %e, %kind, "Reminder sweeps stopped");
                            return;
                        }
                    };
                    tracing::debug!(%kind, wait_secs = wait.as_secs(), "Next reminder sweep scheduled");
                    tokio::time::sleep(wait).await;

                    if let Err(e) = sweep(&provider, &schedule, notifier.as_ref(), kind).await {
                        tracing::error!(error = %e, %kind, "Reminder sweep failed");
                    }
                }
            })
        })
        .collect()
}

async fn sweep(
    provider: &SharedDb,
    schedule: &ScheduleConfig,
    notifier: &dyn Notifier,
    kind: ReminderKind,
) -> ServiceResult<usize> {
    let mut conn = provider.get_connection().await?;
    reminder::send_reminders(&mut conn, schedule, notifier, kind).await
}
