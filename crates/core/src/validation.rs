//! Field validation for submitted forms
//!
//! Pure functions: nothing here touches storage. Every check on a form is
//! run so that all field problems are reported together.

use chrono::{NaiveDate, NaiveTime};
use validator::ValidateEmail;

use crate::error::{Error, Result, ValidationErrors};
use crate::models::{
    Category, Choice, EventDraft, EventForm, GameMode, NewAccount, Region, RegistrationForm,
    TeamSize,
};

pub const USERNAME_MIN: usize = 3;
pub const USERNAME_MAX: usize = 20;
pub const EMAIL_MAX: usize = 120;
pub const PASSWORD_MIN: usize = 8;
pub const PASSWORD_MAX: usize = 128;
pub const TITLE_MAX: usize = 140;
pub const PRIZE_MAX: usize = 64;
pub const DESCRIPTION_MAX: usize = 2000;
pub const BANNER_URL_MAX: usize = 255;

pub const USERNAME_TAKEN: &str = "Username already exists. Please choose a different username.";
pub const EMAIL_TAKEN: &str = "Email already registered. Please use a different email.";

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Trimmed value, or None when blank
fn optional_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn check_max(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: Option<&str>,
    max: usize,
) {
    if let Some(v) = value {
        if char_len(v) > max {
            errors.push(field, format!("must be at most {} characters", max));
        }
    }
}

fn choice<T: Choice>(errors: &mut ValidationErrors, field: &'static str, raw: &str) -> Option<T> {
    let parsed = T::parse(raw.trim());
    if parsed.is_none() {
        errors.push(field, "select one of the listed options");
    }
    parsed
}

/// Check a registration form. Uniqueness is checked by the caller.
pub fn validate_registration(form: &RegistrationForm) -> Result<NewAccount> {
    let mut errors = ValidationErrors::default();

    let username = form.username.trim();
    let name_len = char_len(username);
    if name_len < USERNAME_MIN || name_len > USERNAME_MAX {
        errors.push(
            "username",
            format!(
                "must be between {} and {} characters",
                USERNAME_MIN, USERNAME_MAX
            ),
        );
    }

    let email = form.email.trim();
    if email.is_empty() {
        errors.push("email", "is required");
    } else if char_len(email) > EMAIL_MAX {
        errors.push("email", format!("must be at most {} characters", EMAIL_MAX));
    } else if !email.validate_email() {
        errors.push("email", "please enter a valid email");
    }

    let pass_len = char_len(&form.password);
    if pass_len < PASSWORD_MIN || pass_len > PASSWORD_MAX {
        errors.push(
            "password",
            format!(
                "must be between {} and {} characters",
                PASSWORD_MIN, PASSWORD_MAX
            ),
        );
    }
    if form.password != form.confirm_password {
        errors.push("confirm_password", "passwords should match");
    }

    errors.into_result()?;
    Ok(NewAccount {
        username: username.to_string(),
        email: email.to_string(),
        password: form.password.clone(),
    })
}

/// Check an event form and turn it into typed fields
pub fn validate_event_fields(form: &EventForm) -> Result<EventDraft> {
    let mut errors = ValidationErrors::default();

    let title = form.title.trim();
    if title.is_empty() {
        errors.push("title", "is required");
    }
    check_max(&mut errors, "title", Some(title), TITLE_MAX);

    let category = choice::<Category>(&mut errors, "category", &form.category);
    let region = choice::<Region>(&mut errors, "region", &form.region);
    let team_size = choice::<TeamSize>(&mut errors, "team_size", &form.team_size);
    let mode = choice::<GameMode>(&mut errors, "mode", &form.mode);

    let date = NaiveDate::parse_from_str(form.date.trim(), "%Y-%m-%d").ok();
    if date.is_none() {
        errors.push("date", "expected YYYY-MM-DD");
    }
    let time = NaiveTime::parse_from_str(form.time.trim(), "%H:%M").ok();
    if time.is_none() {
        errors.push("time", "expected HH:MM");
    }

    let prize = optional_text(&form.prize);
    check_max(&mut errors, "prize", prize.as_deref(), PRIZE_MAX);

    let description = optional_text(&form.description);
    check_max(&mut errors, "description", description.as_deref(), DESCRIPTION_MAX);

    let banner_url = optional_text(&form.banner_url);
    check_max(&mut errors, "banner_url", banner_url.as_deref(), BANNER_URL_MAX);

    match (category, region, team_size, mode, date, time) {
        (Some(category), Some(region), Some(team_size), Some(mode), Some(date), Some(time))
            if errors.is_empty() =>
        {
            Ok(EventDraft {
                title: title.to_string(),
                category,
                region,
                team_size,
                mode,
                prize,
                description,
                banner_url,
                start_at: date.and_time(time),
            })
        }
        _ => Err(Error::Validation(errors)),
    }
}

/// Parse a seat count; must be a positive integer
pub fn validate_quantity(raw: &str) -> Result<u32> {
    match raw.trim().parse::<u32>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(Error::invalid("quantity", "must be a positive whole number")),
    }
}

/// Trimmed comment body; must not be blank
pub fn validate_comment_body(body: &str) -> Result<String> {
    optional_text(body).ok_or_else(|| Error::invalid("body", "comment cannot be empty"))
}

/// Accept a redirect target only if it stays on this site.
///
/// Returns the path unchanged when it is a plain absolute path such as
/// `/events/1`; anything with a scheme, a host, or control characters is
/// refused.
pub fn safe_next_path(next: &str) -> Option<&str> {
    if !next.starts_with('/') || next.starts_with("//") || next.starts_with("/\\") {
        return None;
    }
    if next.chars().any(|c| c.is_control()) {
        return None;
    }
    // No embedded absolute URLs ahead of the query string
    let head = next.split(['?', '#']).next().unwrap_or(next);
    if head.contains("://") || head.contains(":\\") {
        return None;
    }
    Some(next)
}
