use crate::api::errors::ApiError;

pub(crate) const MIN_PASSWORD_LEN: usize = 8;
const IIN_LEN: usize = 12;

pub(crate) fn validate_iin(iin: &str) -> Result<(), ApiError> {
    let valid = iin.len() == IIN_LEN && iin.chars().all(|c| c.is_ascii_digit());
    if valid {
        Ok(())
    } else {
        Err(ApiError::BadRequest("Invalid IIN format".to_string()))
    }
}

pub(crate) fn validate_password_len(password: &str) -> Result<(), ApiError> {
    if password.chars().count() >= MIN_PASSWORD_LEN {
        Ok(())
    } else {
        Err(ApiError::BadRequest(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters long"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iin_requires_twelve_digits() {
        assert!(validate_iin("123456789012").is_ok());
        assert!(validate_iin("12345678901").is_err());
        assert!(validate_iin("1234567890123").is_err());
        assert!(validate_iin("12345678901a").is_err());
        assert!(validate_iin("").is_err());
    }

    #[test]
    fn password_length_floor() {
        assert!(validate_password_len("12345678").is_ok());
        assert!(validate_password_len("1234567").is_err());
    }
}
