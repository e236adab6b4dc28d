use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::catalog;
use crate::gateway::models::NewProfile;

const MIN_AGE: f64 = 1.0;
const MAX_AGE: f64 = 120.0;

/// The wizard submits age from a text field; API clients usually send a number
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AgeInput {
    Number(f64),
    Text(String),
}

impl AgeInput {
    fn parse(&self) -> Option<f64> {
        match self {
            AgeInput::Number(n) => Some(*n),
            AgeInput::Text(s) if s.trim().is_empty() => None,
            AgeInput::Text(s) => s.trim().parse().ok().or(Some(f64::NAN)),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InstructionInput {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub option: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationInput {
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub province: String,
}

/// Body of `POST /api/auth/register`: credentials plus the wizard answers
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub age: Option<AgeInput>,
    #[serde(default)]
    pub instruction: InstructionInput,
    #[serde(default)]
    pub location: LocationInput,
}

/// Wizard answers that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnboardingProfile {
    pub name: String,
    pub age: u8,
    pub instruction_category: String,
    pub instruction_option: Option<String>,
    pub region: String,
    pub province: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    /// A required value was absent rather than wrong
    pub incomplete: bool,
    pub field_errors: HashMap<String, String>,
}

impl ValidationFailure {
    pub fn message(&self) -> &'static str {
        if self.incomplete {
            "Incomplete registration data"
        } else {
            "Invalid onboarding answers"
        }
    }
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<OnboardingProfile, ValidationFailure> {
        let mut missing = HashMap::new();
        let mut invalid = HashMap::new();

        let required = [
            ("email", self.email.trim()),
            ("password", self.password.as_str()),
            ("name", self.name.trim()),
            ("instruction.category", self.instruction.category.trim()),
            ("location.region", self.location.region.trim()),
            ("location.province", self.location.province.trim()),
        ];
        for (field, value) in required {
            if value.is_empty() {
                missing.insert(field.to_string(), "This field is required".to_string());
            }
        }

        let age = match self.age.as_ref().and_then(AgeInput::parse) {
            None => {
                missing.insert("age".to_string(), "This field is required".to_string());
                0
            }
            Some(n) if n.fract() == 0.0 && (MIN_AGE..=MAX_AGE).contains(&n) => n as u8,
            Some(_) => {
                invalid.insert("age".to_string(), "Age must be a whole number between 1 and 120".to_string());
                0
            }
        };

        let category = self.instruction.category.trim();
        let option = self
            .instruction
            .option
            .as_deref()
            .map(str::trim)
            .filter(|o| !o.is_empty());
        let mut instruction_option = None;
        if !category.is_empty() {
            match catalog::instruction_level(category) {
                None => {
                    invalid.insert("instruction.category".to_string(), format!("Unknown category: {}", category));
                }
                Some(level) if level.has_options() => match option {
                    None => {
                        missing.insert("instruction.option".to_string(), "This field is required".to_string());
                    }
                    Some(o) if !level.options.contains(&o) => {
                        invalid.insert("instruction.option".to_string(), format!("Unknown option: {}", o));
                    }
                    Some(o) => instruction_option = Some(o.to_string()),
                },
                // Options sent for a level without any are dropped
                Some(_) => {}
            }
        }

        let region_name = self.location.region.trim();
        let province = self.location.province.trim();
        if !region_name.is_empty() {
            match catalog::region(region_name) {
                None => {
                    invalid.insert("location.region".to_string(), format!("Unknown region: {}", region_name));
                }
                Some(region) if !province.is_empty() && !region.contains(province) => {
                    invalid.insert(
                        "location.province".to_string(),
                        format!("{} is not a province of {}", province, region_name),
                    );
                }
                Some(_) => {}
            }
        }

        if !missing.is_empty() {
            missing.extend(invalid);
            return Err(ValidationFailure { incomplete: true, field_errors: missing });
        }
        if !invalid.is_empty() {
            return Err(ValidationFailure { incomplete: false, field_errors: invalid });
        }

        Ok(OnboardingProfile {
            name: self.name.trim().to_string(),
            age,
            instruction_category: category.to_string(),
            instruction_option,
            region: region_name.to_string(),
            province: province.to_string(),
        })
    }
}

impl OnboardingProfile {
    pub fn to_row(&self, id: Uuid) -> NewProfile {
        NewProfile {
            id,
            name: self.name.clone(),
            age: self.age,
            instruction_category: self.instruction_category.clone(),
            instruction_option: self.instruction_option.clone(),
            region: self.region.clone(),
            province: self.province.clone(),
        }
    }
}
