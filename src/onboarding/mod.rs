//! Onboarding wizard: the answer catalog and validation of submitted answers.

pub mod catalog;
pub mod profile;

pub use catalog::{InstructionLevel, Region, INSTRUCTION_LEVELS, REGIONS};
pub use profile::{AgeInput, InstructionInput, LocationInput, OnboardingProfile, RegisterRequest, ValidationFailure};
