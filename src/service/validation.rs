//! Field rules for registration, profile and product input.

use crate::error::AppError;
use crate::model::max_price;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;

pub struct RequestValidator;

impl RequestValidator {
    pub fn required<'a>(col: &str, value: Option<&'a str>) -> Result<&'a str, AppError> {
        value
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::Validation(format!("{} is required", col)))
    }

    pub fn min_length(col: &str, value: &str, min: usize) -> Result<(), AppError> {
        if value.chars().count() < min {
            return Err(AppError::Validation(format!(
                "{} must be at least {} characters",
                col, min
            )));
        }
        Ok(())
    }

    pub fn email(col: &str, value: &str) -> Result<(), AppError> {
        if !value.contains('@') || value.len() < 3 {
            return Err(AppError::Validation(format!("{} must be a valid email", col)));
        }
        Ok(())
    }

    /// At least ten characters of digits, spaces and `+`.
    pub fn phone(col: &str, value: &str) -> Result<(), AppError> {
        Self::pattern(col, value, r"^[0-9+ ]{10,}$", "must be a phone number of at least 10 characters")
    }

    /// National id: exactly eleven digits.
    pub fn national_id(col: &str, value: &str) -> Result<(), AppError> {
        Self::pattern(col, value, r"^[0-9]{11}$", "must be exactly 11 digits")
    }

    pub fn positive_int(col: &str, value: &str) -> Result<i32, AppError> {
        match value.trim().parse::<i32>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(AppError::Validation(format!("{} must be a positive integer", col))),
        }
    }

    pub fn non_negative_int(col: &str, value: &str) -> Result<i32, AppError> {
        match value.trim().parse::<i32>() {
            Ok(n) if n >= 0 => Ok(n),
            _ => Err(AppError::Validation(format!("{} must be a non-negative integer", col))),
        }
    }

    /// Non-negative amount with at most two decimals that fits a `NUMERIC(10, 2)` column.
    pub fn price(col: &str, value: &str) -> Result<Decimal, AppError> {
        let amount = Decimal::from_str(value.trim())
            .map_err(|_| AppError::Validation(format!("{} must be a number", col)))?;
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(AppError::Validation(format!("{} must be at least 0", col)));
        }
        if amount.normalize().scale() > 2 {
            return Err(AppError::Validation(format!("{} must have at most 2 decimals", col)));
        }
        if amount > max_price() {
            return Err(AppError::Validation(format!("{} must be at most {}", col, max_price())));
        }
        Ok(amount.round_dp(2))
    }

    fn pattern(col: &str, value: &str, pattern: &str, message: &str) -> Result<(), AppError> {
        let re = Regex::new(pattern).map_err(|_| AppError::Validation(format!("invalid pattern for {}", col)))?;
        if !re.is_match(value) {
            return Err(AppError::Validation(format!("{} {}", col, message)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_rejects_blank() {
        assert!(RequestValidator::required("farm_name", Some("  ")).is_err());
        assert!(RequestValidator::required("farm_name", None).is_err());
        assert_eq!(RequestValidator::required("farm_name", Some(" Yeşil ")).unwrap(), "Yeşil");
    }

    #[test]
    fn phone_and_national_id() {
        assert!(RequestValidator::phone("p", "+90 555 123 45 67").is_ok());
        assert!(RequestValidator::phone("p", "555-1234567").is_err());
        assert!(RequestValidator::phone("p", "12345").is_err());
        assert!(RequestValidator::national_id("t", "12345678901").is_ok());
        assert!(RequestValidator::national_id("t", "1234567890").is_err());
        assert!(RequestValidator::national_id("t", "1234567890a").is_err());
    }

    #[test]
    fn price_allows_two_decimals() {
        assert_eq!(RequestValidator::price("p", "12.50").unwrap(), Decimal::new(1250, 2));
        assert_eq!(RequestValidator::price("p", "0").unwrap(), Decimal::ZERO);
        assert!(RequestValidator::price("p", "1.234").is_err());
        assert!(RequestValidator::price("p", "-1").is_err());
        assert!(RequestValidator::price("p", "abc").is_err());
    }

    #[test]
    fn price_is_capped_at_column_range() {
        assert_eq!(
            RequestValidator::price("p", "99999999.99").unwrap(),
            Decimal::new(9_999_999_999, 2)
        );
        assert!(RequestValidator::price("p", "100000000").is_err());
        assert!(RequestValidator::price("p", "79228162514264337593543950335").is_err());
    }

    #[test]
    fn integers() {
        assert_eq!(RequestValidator::non_negative_int("s", "0").unwrap(), 0);
        assert!(RequestValidator::non_negative_int("s", "-3").is_err());
        assert!(RequestValidator::non_negative_int("s", "2.5").is_err());
        assert!(RequestValidator::positive_int("age", "0").is_err());
    }

    #[test]
    fn email_needs_at_sign() {
        assert!(RequestValidator::email("e", "a@b.c").is_ok());
        assert!(RequestValidator::email("e", "ab.c").is_err());
    }
}
