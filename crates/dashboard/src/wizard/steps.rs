//! Static wizard step metadata.

use crate::validate::{
    FieldErrors, validate_store_basics, validate_store_contact, validate_store_shipping,
};

use super::StoreDraft;

/// Number of wizard steps, review included.
pub const STEP_COUNT: u8 = 4;

/// Static metadata for one wizard step.
pub struct StepDescriptor {
    /// 1-based position in the wizard.
    pub ordinal: u8,
    /// Heading shown on the step page and in the progress rail.
    pub title: &'static str,
    /// URL path segment for the step.
    pub slug: &'static str,
    /// Validator for this step's slice of the draft; `None` for the
    /// review step, which collects no input.
    pub schema: Option<fn(&StoreDraft) -> Result<(), FieldErrors>>,
}

const STEPS: [StepDescriptor; STEP_COUNT as usize] = [
    StepDescriptor {
        ordinal: 1,
        title: "Store details",
        slug: "details",
        schema: Some(validate_store_basics),
    },
    StepDescriptor {
        ordinal: 2,
        title: "Contact",
        slug: "contact",
        schema: Some(validate_store_contact),
    },
    StepDescriptor {
        ordinal: 3,
        title: "Shipping policy",
        slug: "shipping",
        schema: Some(validate_store_shipping),
    },
    StepDescriptor {
        ordinal: 4,
        title: "Review & submit",
        slug: "review",
        schema: None,
    },
];

/// All steps in order.
#[must_use]
pub fn steps() -> &'static [StepDescriptor] {
    &STEPS
}

/// Look up the descriptor for a 1-based ordinal.
#[must_use]
pub fn descriptor(ordinal: u8) -> Option<&'static StepDescriptor> {
    STEPS.iter().find(|s| s.ordinal == ordinal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordinals_are_dense_and_one_based() {
        for (i, step) in steps().iter().enumerate() {
            assert_eq!(usize::from(step.ordinal), i + 1);
        }
    }

    #[test]
    fn test_only_review_step_has_no_schema() {
        for step in steps() {
            assert_eq!(step.schema.is_none(), step.ordinal == STEP_COUNT);
        }
    }

    #[test]
    fn test_descriptor_lookup() {
        assert_eq!(descriptor(1).map(|s| s.slug), Some("details"));
        assert_eq!(descriptor(4).map(|s| s.slug), Some("review"));
        assert!(descriptor(0).is_none());
        assert!(descriptor(5).is_none());
    }
}
