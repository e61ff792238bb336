//! Reminder script composition.
//!
//! Fills a fixed per-event-type template with customer and loan fields.
//! Composition is pure and always in English; translation into the
//! customer's preferred language is the pipeline's job.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Event type constants
// ---------------------------------------------------------------------------

/// An EMI payment is coming due.
pub const EVENT_EMI_DUE: &str = "EMI_DUE";
/// Second NACH presentation is scheduled.
pub const EVENT_NACH_REMINDER: &str = "NACH_REMINDER";
/// An automatic debit attempt bounced.
pub const EVENT_BOUNCE_REMINDER: &str = "BOUNCE_REMINDER";

/// All valid reminder event types.
pub const VALID_EVENT_TYPES: &[&str] =
    &[EVENT_EMI_DUE, EVENT_NACH_REMINDER, EVENT_BOUNCE_REMINDER];

/// Fallback script for an event type outside [`VALID_EVENT_TYPES`].
pub const DEFAULT_SCRIPT: &str = "Default message: Please pay your EMI.";

/// Penalty quoted in bounce reminders. Fixed business constant, not
/// read from the loan.
pub const PENALTY_AMOUNT: &str = "\u{20b9}500";

/// Validate that an event type string is one of the known types.
pub fn validate_event_type(event_type: &str) -> Result<(), CoreError> {
    if VALID_EVENT_TYPES.contains(&event_type) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Unknown event type: '{event_type}'. Valid types: {}",
            VALID_EVENT_TYPES.join(", ")
        )))
    }
}

// ---------------------------------------------------------------------------
// Composition
// ---------------------------------------------------------------------------

/// Customer and loan fields a script template can reference.
#[derive(Debug, Clone)]
pub struct ScriptParams {
    pub customer_name: String,
    pub loan_number: String,
    pub emi_amount: Decimal,
    pub due_date: NaiveDate,
}

/// Render a due date the way it is spoken, e.g. `23 October 2025`.
fn spoken_date(date: NaiveDate) -> String {
    date.format("%-d %B %Y").to_string()
}

/// Compose the English reminder script for an event type.
///
/// An unknown event type yields [`DEFAULT_SCRIPT`] rather than an error:
/// the batch must keep moving even if a bad event type reaches it.
pub fn compose_script(event_type: &str, params: &ScriptParams) -> String {
    match event_type {
        EVENT_EMI_DUE => format!(
            "Hello {}, your EMI of {} for loan {} is due on {}. \
             Please make the payment to avoid penalties. Thank you.",
            params.customer_name,
            params.emi_amount,
            params.loan_number,
            spoken_date(params.due_date),
        ),
        EVENT_NACH_REMINDER => format!(
            "Hello {}, this is a reminder for your second NACH presentation \
             for loan {}. Please ensure you have sufficient balance. Thank you.",
            params.customer_name, params.loan_number,
        ),
        EVENT_BOUNCE_REMINDER => format!(
            "Hello {}, your recent EMI payment for loan {} has bounced. \
             A penalty of {} has been applied. Please make the payment \
             immediately to avoid further charges. Thank you.",
            params.customer_name, params.loan_number, PENALTY_AMOUNT,
        ),
        _ => DEFAULT_SCRIPT.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> ScriptParams {
        ScriptParams {
            customer_name: "Raj".to_string(),
            loan_number: "E12345".to_string(),
            emi_amount: Decimal::from(20000),
            due_date: NaiveDate::from_ymd_opt(2025, 10, 23).unwrap(),
        }
    }

    #[test]
    fn emi_due_script_matches_template() {
        assert_eq!(
            compose_script(EVENT_EMI_DUE, &params()),
            "Hello Raj, your EMI of 20000 for loan E12345 is due on \
             23 October 2025. Please make the payment to avoid penalties. \
             Thank you."
        );
    }

    #[test]
    fn all_known_event_types_mention_name_and_loan() {
        let p = params();
        for event_type in VALID_EVENT_TYPES {
            let script = compose_script(event_type, &p);
            assert!(script.contains("Raj"), "{event_type} missing name");
            assert!(script.contains("E12345"), "{event_type} missing loan");
        }
    }

    #[test]
    fn emi_due_mentions_due_date() {
        let script = compose_script(EVENT_EMI_DUE, &params());
        assert!(script.contains("23 October 2025"));
    }

    #[test]
    fn bounce_reminder_quotes_penalty() {
        let script = compose_script(EVENT_BOUNCE_REMINDER, &params());
        assert!(script.contains(PENALTY_AMOUNT));
    }

    #[test]
    fn unknown_event_type_returns_default_script() {
        assert_eq!(compose_script("MYSTERY_EVENT", &params()), DEFAULT_SCRIPT);
    }

    #[test]
    fn spoken_date_has_no_zero_padding() {
        let d = NaiveDate::from_ymd_opt(2025, 3, 5).unwrap();
        assert_eq!(spoken_date(d), "5 March 2025");
    }

    #[test]
    fn validate_event_type_accepts_known() {
        for event_type in VALID_EVENT_TYPES {
            assert!(validate_event_type(event_type).is_ok());
        }
    }

    #[test]
    fn validate_event_type_rejects_unknown() {
        assert!(validate_event_type("EMI_OVERDUE").is_err());
    }
}
