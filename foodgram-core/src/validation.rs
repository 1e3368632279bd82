//! Payload validation for recipes and user accounts.
//!
//! Every check that doesn't need the database lives here and reports
//! field-level messages through [`ValidationErrors`]. Whether referenced tags
//! and ingredients exist is checked by the caller with [`check_known_ids`].

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::ValidationErrors;
use crate::image::validate_image_reference;
use crate::types::{
    MAX_EMAIL_LENGTH, MAX_NAME_LENGTH, MAX_RECIPE_NAME, MIN_COOKING_TIME, MIN_INGREDIENT_AMOUNT,
};

pub const REQUIRED: &str = "This field is required.";
pub const MIN_PASSWORD_LENGTH: usize = 8;
const RESERVED_USERNAMES: &[&str] = &["me"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientAmount {
    pub id: i32,
    pub amount: i32,
}

/// A recipe as submitted for create or update. Missing fields are `None`.
#[derive(Debug, Clone, Default)]
pub struct RecipeDraft<'a> {
    pub name: Option<&'a str>,
    pub text: Option<&'a str>,
    pub image: Option<&'a str>,
    pub cooking_time: Option<i32>,
    pub tags: Option<&'a [i32]>,
    pub ingredients: Option<&'a [IngredientAmount]>,
}

/// Validate a recipe draft.
///
/// `require_image` is true on create; an update may keep the stored image.
pub fn validate_recipe(draft: &RecipeDraft<'_>, require_image: bool) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    match draft.name.map(str::trim) {
        None => errors.add("name", REQUIRED),
        Some("") => errors.add("name", "Name cannot be empty"),
        Some(name) if name.chars().count() > MAX_RECIPE_NAME => errors.add(
            "name",
            format!("Name must be at most {} characters", MAX_RECIPE_NAME),
        ),
        Some(_) => {}
    }

    match draft.text.map(str::trim) {
        None => errors.add("text", REQUIRED),
        Some("") => errors.add("text", "Description cannot be empty"),
        Some(_) => {}
    }

    match draft.cooking_time {
        None => errors.add("cooking_time", REQUIRED),
        Some(t) if t < MIN_COOKING_TIME => errors.add(
            "cooking_time",
            format!("Cooking time cannot be less than {}", MIN_COOKING_TIME),
        ),
        Some(_) => {}
    }

    match draft.image {
        None if require_image => errors.add("image", REQUIRED),
        None => {}
        Some(image) => {
            if let Err(message) = validate_image_reference(image) {
                errors.add("image", message);
            }
        }
    }

    match draft.tags {
        None => errors.add("tags", REQUIRED),
        Some([]) => errors.add("tags", "This field cannot be empty"),
        Some(tags) => {
            if has_duplicates(tags.iter().copied()) {
                errors.add("tags", "Tags must not repeat");
            }
        }
    }

    match draft.ingredients {
        None => errors.add("ingredients", REQUIRED),
        Some([]) => errors.add("ingredients", "This field cannot be empty"),
        Some(ingredients) => {
            if has_duplicates(ingredients.iter().map(|i| i.id)) {
                errors.add("ingredients", "Ingredients must not repeat");
            }
            if ingredients.iter().any(|i| i.amount < MIN_INGREDIENT_AMOUNT) {
                errors.add(
                    "ingredients",
                    format!(
                        "Ingredient amount cannot be less than {}",
                        MIN_INGREDIENT_AMOUNT
                    ),
                );
            }
        }
    }

    errors.into_result()
}

/// Record an error for every requested id missing from `known`.
pub fn check_known_ids(
    errors: &mut ValidationErrors,
    field: &str,
    requested: &[i32],
    known: &HashSet<i32>,
) {
    let mut missing: Vec<i32> = requested
        .iter()
        .copied()
        .filter(|id| !known.contains(id))
        .collect();
    missing.sort_unstable();
    missing.dedup();
    for id in missing {
        errors.add(field, format!("Object with id {} does not exist", id));
    }
}

fn has_duplicates(ids: impl Iterator<Item = i32>) -> bool {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return true;
        }
    }
    false
}

/// A registration request.
#[derive(Debug, Clone, Default)]
pub struct SignupDraft<'a> {
    pub email: &'a str,
    pub username: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub password: &'a str,
}

/// Take a submitted text field, recording [`REQUIRED`] when it is absent or blank.
pub fn required<'a>(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<&'a str>,
) -> Option<&'a str> {
    match value {
        Some(value) if !value.trim().is_empty() => Some(value),
        _ => {
            errors.add(field, REQUIRED);
            None
        }
    }
}

pub fn validate_signup(draft: &SignupDraft<'_>) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if let Err(message) = validate_email(draft.email) {
        errors.add("email", message);
    }
    if let Err(message) = validate_username(draft.username) {
        errors.add("username", message);
    }
    for (field, value) in [
        ("first_name", draft.first_name),
        ("last_name", draft.last_name),
    ] {
        let value = value.trim();
        if value.is_empty() {
            errors.add(field, REQUIRED);
        } else if value.chars().count() > MAX_NAME_LENGTH {
            errors.add(
                field,
                format!("Must be at most {} characters", MAX_NAME_LENGTH),
            );
        }
    }
    if let Err(message) = validate_password(draft.password) {
        errors.add("password", message);
    }

    errors.into_result()
}

pub fn validate_email(email: &str) -> Result<(), String> {
    let email = email.trim();
    if email.is_empty() {
        return Err(REQUIRED.to_string());
    }
    if email.chars().count() > MAX_EMAIL_LENGTH {
        return Err(format!(
            "Email must be at most {} characters",
            MAX_EMAIL_LENGTH
        ));
    }
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err("Enter a valid email address".to_string())
    }
}

/// Usernames may contain letters, digits and `@ . + - _`.
pub fn validate_username(username: &str) -> Result<(), String> {
    if username.is_empty() {
        return Err(REQUIRED.to_string());
    }
    if username.chars().count() > MAX_NAME_LENGTH {
        return Err(format!(
            "Username must be at most {} characters",
            MAX_NAME_LENGTH
        ));
    }
    if RESERVED_USERNAMES
        .iter()
        .any(|reserved| username.eq_ignore_ascii_case(reserved))
    {
        return Err(format!("Username '{}' is reserved", username));
    }
    if let Some(bad) = username
        .chars()
        .find(|c| !(c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_')))
    {
        return Err(format!("Username cannot contain {:?}", bad));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err(REQUIRED.to_string());
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        ));
    }
    if password.chars().all(|c| c.is_ascii_digit()) {
        return Err("Password cannot be entirely numeric".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const IMAGE: &str = "/media/recipes/pancakes.png";

    fn ingredients(pairs: &[(i32, i32)]) -> Vec<IngredientAmount> {
        pairs
            .iter()
            .map(|&(id, amount)| IngredientAmount { id, amount })
            .collect()
    }

    fn valid_draft<'a>(tags: &'a [i32], items: &'a [IngredientAmount]) -> RecipeDraft<'a> {
        RecipeDraft {
            name: Some("Pancakes"),
            text: Some("Mix and fry."),
            image: Some(IMAGE),
            cooking_time: Some(20),
            tags: Some(tags),
            ingredients: Some(items),
        }
    }

    #[test]
    fn test_required_field() {
        let mut errors = ValidationErrors::new();
        assert_eq!(
            required(&mut errors, "email", Some("cook@example.com")),
            Some("cook@example.com")
        );
        assert_eq!(required(&mut errors, "password", None), None);
        assert_eq!(required(&mut errors, "username", Some("  ")), None);
        assert!(!errors.has("email"));
        assert_eq!(errors.messages("password"), [REQUIRED.to_string()]);
        assert_eq!(errors.messages("username"), [REQUIRED.to_string()]);
    }

    #[test]
    fn test_valid_recipe() {
        let items = ingredients(&[(1, 200), (2, 100)]);
        assert!(validate_recipe(&valid_draft(&[1, 2], &items), true).is_ok());
    }

    #[test]
    fn test_missing_fields() {
        let errors = validate_recipe(&RecipeDraft::default(), true).unwrap_err();
        for field in ["name", "text", "image", "cooking_time", "tags", "ingredients"] {
            assert_eq!(errors.messages(field), [REQUIRED.to_string()], "{}", field);
        }
    }

    #[test]
    fn test_image_optional_on_update() {
        let items = ingredients(&[(1, 200)]);
        let mut draft = valid_draft(&[1], &items);
        draft.image = None;
        assert!(validate_recipe(&draft, false).is_ok());
        assert!(validate_recipe(&draft, true).unwrap_err().has("image"));
    }

    #[test]
    fn test_empty_and_duplicate_collections() {
        let none: Vec<IngredientAmount> = Vec::new();
        let errors = validate_recipe(&valid_draft(&[], &none), true).unwrap_err();
        assert!(errors.has("tags"));
        assert!(errors.has("ingredients"));

        let items = ingredients(&[(1, 200), (1, 50)]);
        let errors = validate_recipe(&valid_draft(&[3, 3], &items), true).unwrap_err();
        assert_eq!(errors.messages("tags"), ["Tags must not repeat".to_string()]);
        assert_eq!(
            errors.messages("ingredients"),
            ["Ingredients must not repeat".to_string()]
        );
    }

    #[test]
    fn test_minimums() {
        let items = ingredients(&[(1, 0)]);
        let mut draft = valid_draft(&[1], &items);
        draft.cooking_time = Some(0);
        let errors = validate_recipe(&draft, true).unwrap_err();
        assert!(errors.has("cooking_time"));
        assert!(errors.has("ingredients"));
        assert!(!errors.has("tags"));
    }

    #[test]
    fn test_long_name() {
        let items = ingredients(&[(1, 1)]);
        let long = "x".repeat(MAX_RECIPE_NAME + 1);
        let mut draft = valid_draft(&[1], &items);
        draft.name = Some(&long);
        assert!(validate_recipe(&draft, true).unwrap_err().has("name"));
    }

    #[test]
    fn test_check_known_ids() {
        let known: HashSet<i32> = [1, 2, 3].into_iter().collect();
        let mut errors = ValidationErrors::new();
        check_known_ids(&mut errors, "tags", &[1, 9, 9, 7], &known);
        assert_eq!(
            errors.messages("tags"),
            [
                "Object with id 7 does not exist".to_string(),
                "Object with id 9 does not exist".to_string()
            ]
        );
    }

    #[test]
    fn test_signup() {
        let draft = SignupDraft {
            email: "cook@example.com",
            username: "cook.master",
            first_name: "Ann",
            last_name: "Lee",
            password: "s3cret-pass",
        };
        assert!(validate_signup(&draft).is_ok());

        let bad = SignupDraft {
            email: "nope",
            username: "me",
            first_name: " ",
            last_name: "Lee",
            password: "12345678",
        };
        let errors = validate_signup(&bad).unwrap_err();
        for field in ["email", "username", "first_name", "password"] {
            assert!(errors.has(field), "{}", field);
        }
        assert!(!errors.has("last_name"));
    }

    #[test]
    fn test_usernames() {
        assert!(validate_username("anna_b+1@x-y.z").is_ok());
        assert!(validate_username("Ёжик").is_ok());
        assert!(validate_username("with space").is_err());
        assert!(validate_username("ME").is_err());
        assert!(validate_username("").is_err());
    }

    #[test]
    fn test_emails() {
        assert!(validate_email("a@b.co").is_ok());
        assert!(validate_email("a@b").is_err());
        assert!(validate_email("@b.co").is_err());
        assert!(validate_email("a b@c.de").is_err());
        assert!(validate_email("a@@b.co").is_err());
    }
}
