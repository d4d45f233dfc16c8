//! Store onboarding wizard.
//!
//! The wizard walks a seller through four steps (basic info, contact,
//! shipping policy, review) before the store submission action runs. All
//! in-progress input lives in a [`WizardState`] serialized into the
//! session, so it survives navigation and page reloads for as long as the
//! browsing session does. Nothing is persisted to the catalog until the
//! final submission.

mod draft;
mod state;
mod steps;

pub use draft::{StoreDraft, StoreDraftPatch};
pub use state::{DraftStoreError, WizardState};
pub use steps::{STEP_COUNT, StepDescriptor, descriptor, steps};
