//! The session-held wizard state machine.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::models::session_keys;
use crate::validate::FieldErrors;

use super::{STEP_COUNT, StoreDraft, StoreDraftPatch, descriptor};

/// Error persisting or restoring wizard state from the session.
#[derive(Debug, thiserror::Error)]
pub enum DraftStoreError {
    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}

/// The single source of truth for in-progress wizard input.
///
/// Holds the accumulated [`StoreDraft`], the current step pointer, and the
/// set of steps the seller has passed validation for. Serialized into the
/// session after every mutation; restored (or defaulted) on every wizard
/// request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WizardState {
    draft: StoreDraft,
    current_step: u8,
    completed: BTreeSet<u8>,
}

impl Default for WizardState {
    fn default() -> Self {
        Self {
            draft: StoreDraft::default(),
            current_step: 1,
            completed: BTreeSet::new(),
        }
    }
}

impl WizardState {
    /// The accumulated draft.
    #[must_use]
    pub const fn data(&self) -> &StoreDraft {
        &self.draft
    }

    /// The current 1-based step ordinal.
    #[must_use]
    pub const fn current_step(&self) -> u8 {
        self.current_step
    }

    /// Whether the seller has passed validation for `ordinal`.
    #[must_use]
    pub fn is_completed(&self, ordinal: u8) -> bool {
        self.completed.contains(&ordinal)
    }

    /// Shallow-merge a patch into the draft.
    pub fn apply(&mut self, patch: StoreDraftPatch) {
        self.draft.apply(patch);
    }

    /// Move the step pointer forward, clamped to the last step.
    pub fn advance(&mut self) {
        self.current_step = (self.current_step + 1).min(STEP_COUNT);
    }

    /// Move the step pointer back, clamped to the first step.
    ///
    /// Completed steps stay completed; only the pointer moves.
    pub fn retreat(&mut self) {
        self.current_step = self.current_step.saturating_sub(1).max(1);
    }

    /// Jump to a step the seller already completed (or the first
    /// not-yet-completed step). Prevents skipping ahead via the URL.
    pub fn jump_to(&mut self, ordinal: u8) {
        let ordinal = ordinal.clamp(1, STEP_COUNT);
        if ordinal <= self.first_incomplete_step() {
            self.current_step = ordinal;
        }
    }

    /// The earliest step the seller has not yet completed.
    #[must_use]
    pub fn first_incomplete_step(&self) -> u8 {
        (1..=STEP_COUNT)
            .find(|ordinal| !self.completed.contains(ordinal))
            .unwrap_or(STEP_COUNT)
    }

    /// Validate the current step's slice of the draft.
    ///
    /// A step without a schema (review) trivially passes.
    ///
    /// # Errors
    ///
    /// Returns the step's field errors; the pointer is not moved.
    pub fn validate_current_step(&self) -> Result<(), FieldErrors> {
        match descriptor(self.current_step).and_then(|step| step.schema) {
            Some(schema) => schema(&self.draft),
            None => Ok(()),
        }
    }

    /// Validate the current step and, on success, mark it completed and
    /// advance the pointer.
    ///
    /// # Errors
    ///
    /// Returns the step's field errors; the pointer and completed set are
    /// unchanged on failure.
    pub fn complete_current_step(&mut self) -> Result<(), FieldErrors> {
        self.validate_current_step()?;
        self.completed.insert(self.current_step);
        self.advance();
        Ok(())
    }

    /// Whether every input step (all but review) has been completed.
    #[must_use]
    pub fn ready_to_submit(&self) -> bool {
        (1..STEP_COUNT).all(|ordinal| self.completed.contains(&ordinal))
    }

    /// Restore the wizard state from the session, or start fresh.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn load(session: &Session) -> Result<Self, DraftStoreError> {
        Ok(session
            .get::<Self>(session_keys::STORE_WIZARD)
            .await?
            .unwrap_or_default())
    }

    /// Persist the wizard state into the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn save(&self, session: &Session) -> Result<(), DraftStoreError> {
        session.insert(session_keys::STORE_WIZARD, self).await?;
        Ok(())
    }

    /// Drop the wizard state from the session (successful submission or
    /// explicit abandon).
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn clear(session: &Session) -> Result<(), DraftStoreError> {
        session
            .remove::<Self>(session_keys::STORE_WIZARD)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn state_with_valid_basics() -> WizardState {
        let mut state = WizardState::default();
        state.apply(StoreDraftPatch {
            name: Some("Acme Outdoors".to_string()),
            description: Some("Everything for the trail.".to_string()),
            logo_url: Some("http://img/logo.png".to_string()),
            cover_url: Some("http://img/cover.png".to_string()),
            ..StoreDraftPatch::default()
        });
        state
    }

    #[test]
    fn test_starts_at_step_one_with_empty_draft() {
        let state = WizardState::default();
        assert_eq!(state.current_step(), 1);
        assert_eq!(state.data(), &StoreDraft::default());
        assert!(!state.is_completed(1));
    }

    #[test]
    fn test_advance_and_retreat_clamp() {
        let mut state = WizardState::default();
        state.retreat();
        assert_eq!(state.current_step(), 1);

        for _ in 0..10 {
            state.advance();
        }
        assert_eq!(state.current_step(), STEP_COUNT);
    }

    #[test]
    fn test_complete_current_step_gates_on_validation() {
        let mut state = WizardState::default();
        let errors = state.complete_current_step().unwrap_err();
        assert!(errors.message_for("name").is_some());
        // Pointer unchanged on failure
        assert_eq!(state.current_step(), 1);
        assert!(!state.is_completed(1));
    }

    #[test]
    fn test_complete_current_step_advances_on_success() {
        let mut state = state_with_valid_basics();
        state.complete_current_step().unwrap();
        assert_eq!(state.current_step(), 2);
        assert!(state.is_completed(1));
    }

    #[test]
    fn test_back_navigation_keeps_completed_set() {
        let mut state = state_with_valid_basics();
        state.complete_current_step().unwrap();
        state.retreat();
        assert_eq!(state.current_step(), 1);
        assert!(state.is_completed(1));
    }

    #[test]
    fn test_jump_cannot_skip_ahead() {
        let mut state = state_with_valid_basics();
        state.jump_to(4);
        assert_eq!(state.current_step(), 1);

        state.complete_current_step().unwrap();
        state.jump_to(1);
        assert_eq!(state.current_step(), 1);
        // Step 2 is the first incomplete step, so it is reachable
        state.jump_to(2);
        assert_eq!(state.current_step(), 2);
        // Step 3 is not
        state.jump_to(3);
        assert_eq!(state.current_step(), 2);
    }

    #[test]
    fn test_review_step_validates_trivially() {
        let mut state = WizardState::default();
        for _ in 0..3 {
            state.advance();
        }
        assert_eq!(state.current_step(), STEP_COUNT);
        assert!(state.validate_current_step().is_ok());
    }

    #[test]
    fn test_ready_to_submit_requires_all_input_steps() {
        let mut state = state_with_valid_basics();
        assert!(!state.ready_to_submit());

        state.complete_current_step().unwrap();
        state.apply(StoreDraftPatch {
            email: Some("store@acme.test".to_string()),
            phone: Some("+15551234567".to_string()),
            ..StoreDraftPatch::default()
        });
        state.complete_current_step().unwrap();
        // Shipping step passes with defaults
        state.complete_current_step().unwrap();

        assert!(state.ready_to_submit());
        assert_eq!(state.current_step(), STEP_COUNT);
    }

    #[test]
    fn test_serde_roundtrip() {
        let mut state = state_with_valid_basics();
        state.complete_current_step().unwrap();

        let json = serde_json::to_string(&state).unwrap();
        let back: WizardState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}
