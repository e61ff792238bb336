//! The reminder batch loop.
//!
//! One run claims every active loan due on the cycle date, drives the
//! pipeline for each, and persists a terminal status per reminder. A
//! loan's failure is contained to that loan: the loop always advances
//! to the next one.

use chrono::NaiveDate;
use emivid_core::script::EVENT_EMI_DUE;
use emivid_db::models::loan::DueLoan;
use emivid_db::models::reminder::CreateReminder;
use emivid_db::repositories::{LoanRepo, ReminderRepo};
use emivid_pipeline::{ReminderPipeline, ReminderRequest};
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

/// Per-run outcome accounting.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Due loans seen this run.
    pub processed: usize,
    /// Reminders delivered and marked sent.
    pub sent: usize,
    /// Reminders that ended in failed status (or could not be created).
    pub failed: usize,
    /// Loans whose cycle was already claimed by another run.
    pub skipped: usize,
}

/// What happened to one loan.
enum LoanOutcome {
    Sent,
    Failed,
    Skipped,
}

impl BatchSummary {
    fn record(&mut self, outcome: LoanOutcome) {
        self.processed += 1;
        match outcome {
            LoanOutcome::Sent => self.sent += 1,
            LoanOutcome::Failed => self.failed += 1,
            LoanOutcome::Skipped => self.skipped += 1,
        }
    }
}

/// Run one reminder batch for `cycle_date`.
///
/// Errors only when the due-loan query itself fails; everything past
/// that point is contained per loan.
pub async fn run_batch(
    pool: &PgPool,
    pipeline: &ReminderPipeline<'_>,
    cycle_date: NaiveDate,
    cancel: &CancellationToken,
) -> Result<BatchSummary, sqlx::Error> {
    let due = LoanRepo::find_due_without_reminder(pool, cycle_date).await?;
    tracing::info!(cycle_date = %cycle_date, due = due.len(), "Reminder batch starting");

    let mut summary = BatchSummary::default();
    for loan in &due {
        let outcome = process_loan(pool, pipeline, loan, cycle_date, cancel).await;
        summary.record(outcome);
    }

    tracing::info!(
        cycle_date = %cycle_date,
        processed = summary.processed,
        sent = summary.sent,
        failed = summary.failed,
        skipped = summary.skipped,
        "Reminder batch complete",
    );
    Ok(summary)
}

/// Drive one loan through claim, pipeline, and status bookkeeping.
///
/// Never returns an error: every failure path logs and resolves to an
/// outcome so the batch loop keeps moving.
async fn process_loan(
    pool: &PgPool,
    pipeline: &ReminderPipeline<'_>,
    loan: &DueLoan,
    cycle_date: NaiveDate,
    cancel: &CancellationToken,
) -> LoanOutcome {
    let reminder = match ReminderRepo::create_if_absent(
        pool,
        &CreateReminder {
            customer_id: loan.customer_id,
            loan_id: loan.id,
            event_type: EVENT_EMI_DUE.to_string(),
            cycle_date,
        },
    )
    .await
    {
        Ok(Some(reminder)) => reminder,
        Ok(None) => {
            tracing::info!(
                loan_number = %loan.loan_number,
                cycle_date = %cycle_date,
                "Cycle already claimed, skipping",
            );
            return LoanOutcome::Skipped;
        }
        Err(e) => {
            tracing::error!(
                loan_number = %loan.loan_number,
                error = %e,
                "Could not create reminder",
            );
            return LoanOutcome::Failed;
        }
    };

    let request = ReminderRequest {
        event_type: reminder.event_type.clone(),
        customer_name: loan.customer_name.clone(),
        whatsapp_number: loan.whatsapp_number.clone(),
        preferred_language: loan.preferred_language.clone(),
        loan_number: loan.loan_number.clone(),
        emi_amount: loan.emi_amount,
        due_date: loan.due_date,
    };

    match pipeline.run(&request, cancel).await {
        Ok(sent) => {
            if let Err(e) =
                ReminderRepo::mark_sent(pool, reminder.id, &sent.video.relative_path).await
            {
                tracing::error!(
                    reminder_id = reminder.id,
                    error = %e,
                    "Reminder delivered but could not be marked sent",
                );
                return LoanOutcome::Failed;
            }
            tracing::info!(
                loan_number = %loan.loan_number,
                customer = %loan.customer_name,
                "Reminder sent",
            );
            LoanOutcome::Sent
        }
        Err(failure) => {
            tracing::warn!(
                loan_number = %loan.loan_number,
                stage = failure.stage.as_str(),
                reason = %failure.reason,
                "Reminder pipeline failed",
            );
            if let Err(e) = ReminderRepo::mark_failed(pool, reminder.id).await {
                tracing::error!(
                    reminder_id = reminder.id,
                    error = %e,
                    "Could not mark reminder failed",
                );
            }
            LoanOutcome::Failed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_accounts_every_outcome() {
        let mut summary = BatchSummary::default();
        summary.record(LoanOutcome::Sent);
        summary.record(LoanOutcome::Failed);
        summary.record(LoanOutcome::Failed);
        summary.record(LoanOutcome::Skipped);

        assert_eq!(
            summary,
            BatchSummary {
                processed: 4,
                sent: 1,
                failed: 2,
                skipped: 1,
            }
        );
    }
}
