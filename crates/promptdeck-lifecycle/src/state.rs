// SPDX-FileCopyrightText: 2026 Promptdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! States of the short-lived create/update/delete state machines.
//!
//! Create: idle -> validating_files -> uploading_output -> uploading_reference -> inserting_record -> done
//! Update: idle -> validating_files -> [uploading_output] -> [uploading_reference] -> updating -> cleaning_up -> done
//! Delete: idle -> deleting_assets -> deleting_record -> done
//!
//! `rolling_back` is reachable from any upload or record-write failure.

use std::fmt;

/// Which operation a state machine run belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Create => write!(f, "create"),
            Operation::Update => write!(f, "update"),
            Operation::Delete => write!(f, "delete"),
        }
    }
}

/// One step of a card operation. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Idle,
    ValidatingFiles,
    UploadingOutput,
    UploadingReference,
    InsertingRecord,
    Updating,
    CleaningUp,
    DeletingAssets,
    DeletingRecord,
    RollingBack,
    Done,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LifecycleState::Idle => "idle",
            LifecycleState::ValidatingFiles => "validating_files",
            LifecycleState::UploadingOutput => "uploading_output",
            LifecycleState::UploadingReference => "uploading_reference",
            LifecycleState::InsertingRecord => "inserting_record",
            LifecycleState::Updating => "updating",
            LifecycleState::CleaningUp => "cleaning_up",
            LifecycleState::DeletingAssets => "deleting_assets",
            LifecycleState::DeletingRecord => "deleting_record",
            LifecycleState::RollingBack => "rolling_back",
            LifecycleState::Done => "done",
        };
        f.write_str(name)
    }
}

impl LifecycleState {
    /// True for states that only issue best-effort deletes.
    pub fn is_compensating(&self) -> bool {
        matches!(
            self,
            LifecycleState::RollingBack | LifecycleState::CleaningUp | LifecycleState::DeletingAssets
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn states_display_snake_case() {
        assert_eq!(LifecycleState::RollingBack.to_string(), "rolling_back");
        assert_eq!(LifecycleState::UploadingReference.to_string(), "uploading_reference");
        assert_eq!(Operation::Update.to_string(), "update");
    }

    #[test]
    fn only_delete_steps_are_compensating() {
        assert!(LifecycleState::RollingBack.is_compensating());
        assert!(LifecycleState::CleaningUp.is_compensating());
        assert!(!LifecycleState::InsertingRecord.is_compensating());
        assert!(!LifecycleState::Done.is_compensating());
    }
}
