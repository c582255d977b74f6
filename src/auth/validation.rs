use serde::Serialize;

use crate::auth::dto::{LoginRequest, SignupRequest};

pub const MIN_PASSWORD_CHARS: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A single field rule. Values are checked after [`Validate::sanitize`].
#[derive(Debug, Clone, Copy)]
pub enum Rule {
    Required,
    MinChars(usize),
}

impl Rule {
    fn check(self, label: &str, value: &str) -> Option<String> {
        match self {
            Rule::Required if value.is_empty() => Some(format!("{label} is required")),
            Rule::MinChars(n) if value.chars().count() < n => {
                Some(format!("{label} must be at least {n} characters"))
            }
            _ => None,
        }
    }
}

/// Rules that apply to one field of a request.
pub struct FieldRules<'a> {
    pub field: &'static str,
    pub label: &'static str,
    pub value: &'a str,
    pub rules: &'static [Rule],
}

const USERNAME_RULES: &[Rule] = &[Rule::Required];
const SIGNUP_PASSWORD_RULES: &[Rule] = &[Rule::MinChars(MIN_PASSWORD_CHARS)];
const LOGIN_PASSWORD_RULES: &[Rule] = &[Rule::Required];

/// Per-request-type rule table. Every failing field is reported, in declaration order.
pub trait Validate {
    /// Normalize in place before the rules run.
    fn sanitize(&mut self) {}

    fn rules(&self) -> Vec<FieldRules<'_>>;

    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let errors: Vec<FieldError> = self
            .rules()
            .into_iter()
            .filter_map(|f| {
                // first failing rule wins for a field
                f.rules
                    .iter()
                    .find_map(|rule| rule.check(f.label, f.value))
                    .map(|msg| FieldError::new(f.field, msg))
            })
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl Validate for SignupRequest {
    fn sanitize(&mut self) {
        trim_in_place(&mut self.username);
        trim_in_place(&mut self.password);
    }

    fn rules(&self) -> Vec<FieldRules<'_>> {
        vec![
            FieldRules {
                field: "username",
                label: "Username",
                value: &self.username,
                rules: USERNAME_RULES,
            },
            FieldRules {
                field: "password",
                label: "Password",
                value: &self.password,
                rules: SIGNUP_PASSWORD_RULES,
            },
        ]
    }
}

impl Validate for LoginRequest {
    fn sanitize(&mut self) {
        trim_in_place(&mut self.username);
        trim_in_place(&mut self.password);
    }

    fn rules(&self) -> Vec<FieldRules<'_>> {
        vec![
            FieldRules {
                field: "username",
                label: "Username",
                value: &self.username,
                rules: USERNAME_RULES,
            },
            FieldRules {
                field: "password",
                label: "Password",
                value: &self.password,
                rules: LOGIN_PASSWORD_RULES,
            },
        ]
    }
}

fn trim_in_place(s: &mut String) {
    let trimmed = s.trim();
    if trimmed.len() != s.len() {
        *s = trimmed.to_owned();
    }
}
