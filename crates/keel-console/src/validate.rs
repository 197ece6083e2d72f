//! Form validation and the password policy table.
//!
//! # Purpose
//! Catches malformed input before a request is issued, producing per-field
//! errors the UI can render inline. The password rules are a data table of
//! character-class predicates plus thresholds, so tightening policy means
//! editing the table, not the control flow.
use crate::error::{ConsoleError, ConsoleResult};
use crate::types::NewUser;

/// One character class a password can draw from.
pub struct CharClass {
    pub name: &'static str,
    pub matches: fn(char) -> bool,
}

/// The classes the policy counts. Order matters only for messages.
pub const CHAR_CLASSES: [CharClass; 4] = [
    CharClass {
        name: "upper",
        matches: |c| c.is_ascii_uppercase(),
    },
    CharClass {
        name: "lower",
        matches: |c| c.is_ascii_lowercase(),
    },
    CharClass {
        name: "digit",
        matches: |c| c.is_ascii_digit(),
    },
    CharClass {
        name: "symbol",
        matches: |c| !c.is_ascii_alphanumeric() && !c.is_whitespace(),
    },
];

/// Password acceptance thresholds over [`CHAR_CLASSES`].
#[derive(Debug, Clone, Copy)]
pub struct PasswordPolicy {
    pub min_length: usize,
    pub min_classes: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        // Length 8+, any 3 of the 4 classes.
        Self {
            min_length: 8,
            min_classes: 3,
        }
    }
}

impl PasswordPolicy {
    pub fn meets(&self, password: &str) -> bool {
        let value = password.trim();
        let classes = CHAR_CLASSES
            .iter()
            .filter(|class| value.chars().any(class.matches))
            .count();
        value.chars().count() >= self.min_length && classes >= self.min_classes
    }

    pub fn requirement_message(&self) -> String {
        format!(
            "Use upper, lower, number, symbol (any {} of {})",
            self.min_classes,
            CHAR_CLASSES.len()
        )
    }
}

/// Score a password 0–100: one point per satisfied check (length plus each
/// character class), scaled to the number of checks.
pub fn strength_score(password: &str) -> u8 {
    let checks = CHAR_CLASSES.len() + 1;
    let mut score = usize::from(password.chars().count() >= 8);
    score += CHAR_CLASSES
        .iter()
        .filter(|class| password.chars().any(class.matches))
        .count();
    ((score * 100) / checks).min(100) as u8
}

pub fn strength_label(password: &str) -> &'static str {
    let score = strength_score(password);
    if score >= 80 {
        "Strong"
    } else if score >= 60 {
        "Good"
    } else if score >= 40 {
        "Fair"
    } else if score > 0 {
        "Weak"
    } else {
        "Very weak"
    }
}

/// Loose shape check equivalent to `\S+@\S+\.\S+`: something before the `@`,
/// a dotted domain after it, no whitespace anywhere.
pub fn email_ok(value: &str) -> bool {
    let value = value.trim();
    if value.is_empty() || value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((head, tail)) => !head.is_empty() && !tail.is_empty(),
        None => false,
    }
}

fn require(field: &str, value: &str) -> ConsoleResult<()> {
    if value.trim().is_empty() {
        return Err(ConsoleError::validation(field, "Required"));
    }
    Ok(())
}

fn check_email(value: &str) -> ConsoleResult<()> {
    require("email", value)?;
    if !email_ok(value) {
        return Err(ConsoleError::validation("email", "Invalid email"));
    }
    Ok(())
}

/// Validate a create form. `existing_usernames` must be lowercased.
pub fn validate_new_user(
    draft: &NewUser,
    existing_usernames: &[String],
    policy: &PasswordPolicy,
) -> ConsoleResult<()> {
    require("username", &draft.username)?;
    if existing_usernames.contains(&draft.username.trim().to_lowercase()) {
        return Err(ConsoleError::validation(
            "username",
            "Username already exists",
        ));
    }
    require("name", &draft.name)?;
    check_email(&draft.email)?;
    require("password", &draft.password)?;
    if !policy.meets(&draft.password) {
        return Err(ConsoleError::validation(
            "password",
            policy.requirement_message(),
        ));
    }
    Ok(())
}

/// Validate the fields present on an edit form.
pub fn validate_patch_fields(
    name: Option<&str>,
    email: Option<&str>,
) -> ConsoleResult<()> {
    if let Some(name) = name {
        require("name", name)?;
    }
    if let Some(email) = email {
        check_email(email)?;
    }
    Ok(())
}

/// Validate a temporary password against the policy.
pub fn validate_temp_password(password: &str, policy: &PasswordPolicy) -> ConsoleResult<()> {
    let value = password.trim();
    if value.chars().count() < policy.min_length {
        return Err(ConsoleError::validation(
            "password",
            format!("Minimum {} characters", policy.min_length),
        ));
    }
    if !policy.meets(value) {
        return Err(ConsoleError::validation(
            "password",
            policy.requirement_message(),
        ));
    }
    Ok(())
}
