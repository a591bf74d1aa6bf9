//! Input validation functions
//!
//! Range checks used by request conversion, plus the custom password rule
//! plugged into the `validator` derive macros.

use validator::ValidationError;

/// Reported whenever a required input is absent or empty
pub const REQUIRED_FIELDS: &str = "All fields are required";

/// Minimum password length in characters
pub const MIN_PASSWORD_LEN: usize = 8;
/// bcrypt ignores everything past 72 bytes
pub const MAX_PASSWORD_LEN: usize = 72;

/// Canonical form of an email address: trimmed and lowercased
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validate password length
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err("Password must be at least 8 characters long.".to_string());
    }
    if password.len() > MAX_PASSWORD_LEN {
        return Err("Password must be at most 72 bytes long.".to_string());
    }
    Ok(())
}

/// `validator` adapter for [`validate_password`]
pub fn validate_password_field(password: &str) -> Result<(), ValidationError> {
    validate_password(password).map_err(|msg| {
        let mut error = ValidationError::new("password");
        error.message = Some(msg.into());
        error
    })
}

/// Validate age in years
pub fn validate_age(age: u32) -> Result<(), String> {
    if age < 1 {
        return Err("Age must be at least 1 year".to_string());
    }
    if age > 120 {
        return Err("Age must be at most 120 years".to_string());
    }
    Ok(())
}

/// Validate height value (in cm)
pub fn validate_height_cm(height_cm: f64) -> Result<(), String> {
    if height_cm.is_nan() || height_cm.is_infinite() {
        return Err("Height must be a valid number".to_string());
    }
    if height_cm < 50.0 {
        return Err("Height must be at least 50 cm".to_string());
    }
    if height_cm > 300.0 {
        return Err("Height must be at most 300 cm".to_string());
    }
    Ok(())
}

/// Validate weight value (in kg)
pub fn validate_weight(weight_kg: f64) -> Result<(), String> {
    if weight_kg.is_nan() || weight_kg.is_infinite() {
        return Err("Weight must be a valid number".to_string());
    }
    if weight_kg < 20.0 {
        return Err("Weight must be at least 20 kg".to_string());
    }
    if weight_kg > 500.0 {
        return Err("Weight must be at most 500 kg".to_string());
    }
    Ok(())
}
