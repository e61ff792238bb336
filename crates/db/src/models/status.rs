//! Status helper enums mapping to SMALLSERIAL/SMALLINT lookup tables.
//!
//! Each enum variant's discriminant matches the seed data order (1-based)
//! in the corresponding `*_statuses` database table.

/// Status ID type matching SMALLINT/SMALLSERIAL in the database.
pub type StatusId = i16;

macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $val:expr ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(i16)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $val ),+
        }

        impl $name {
            /// Return the database status ID.
            pub fn id(self) -> StatusId {
                self as StatusId
            }
        }

        impl From<$name> for StatusId {
            fn from(value: $name) -> Self {
                value as StatusId
            }
        }
    };
}

define_status_enum! {
    /// Reminder lifecycle status.
    ReminderStatus {
        /// Row created, pipeline not yet started.
        Pending = 1,
        /// Pipeline claimed the cycle and is producing the video.
        Generating = 2,
        /// Video delivered (or delivery simulated).
        Sent = 3,
        /// Pipeline failed; no further attempts this cycle.
        Failed = 4,
    }
}

impl ReminderStatus {
    /// Terminal statuses: sent, failed.
    pub fn is_terminal(self) -> bool {
        matches!(self, ReminderStatus::Sent | ReminderStatus::Failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reminder_status_ids_match_seed_data() {
        assert_eq!(ReminderStatus::Pending.id(), 1);
        assert_eq!(ReminderStatus::Generating.id(), 2);
        assert_eq!(ReminderStatus::Sent.id(), 3);
        assert_eq!(ReminderStatus::Failed.id(), 4);
    }

    #[test]
    fn status_into_status_id() {
        let id: StatusId = ReminderStatus::Generating.into();
        assert_eq!(id, 2);
    }

    #[test]
    fn terminal_statuses() {
        assert!(ReminderStatus::Sent.is_terminal());
        assert!(ReminderStatus::Failed.is_terminal());
        assert!(!ReminderStatus::Pending.is_terminal());
        assert!(!ReminderStatus::Generating.is_terminal());
    }
}
