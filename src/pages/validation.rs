use super::form::{FieldError, TitleField, TitleForm};
use crate::domain::{TitleId, TitleUpsert};

pub const MAX_TITLE_LENGTH: usize = 500;
pub const MIN_YEAR: i32 = 1900;
pub const MAX_YEAR: i32 = 2100;
pub const MIN_RUNTIME_MINUTES: i32 = 1;
pub const MAX_RUNTIME_MINUTES: i32 = 9999;
pub const MAX_GENRES: usize = 3;

/// Checks a bound form and, if every field passes, produces the upsert.
/// All failing fields are reported, not just the first one.
pub fn validate_title_form(
    id: Option<TitleId>,
    form: &TitleForm,
) -> Result<TitleUpsert, Vec<FieldError>> {
    let mut errors = Vec::new();

    let primary_title = validate_required_text(
        TitleField::PrimaryTitle,
        form.primary_title.as_deref(),
        &mut errors,
    );
    let original_title = validate_required_text(
        TitleField::OriginalTitle,
        form.original_title.as_deref(),
        &mut errors,
    );

    validate_range(
        TitleField::StartYear,
        form.start_year,
        MIN_YEAR,
        MAX_YEAR,
        &mut errors,
    );
    validate_range(
        TitleField::EndYear,
        form.end_year,
        MIN_YEAR,
        MAX_YEAR,
        &mut errors,
    );
    validate_range(
        TitleField::RuntimeMinutes,
        form.runtime_minutes,
        MIN_RUNTIME_MINUTES,
        MAX_RUNTIME_MINUTES,
        &mut errors,
    );

    if form.genres.len() > MAX_GENRES {
        errors.push(FieldError::new(
            TitleField::Genres,
            format!("Maximum {} genres allowed.", MAX_GENRES),
        ));
    }

    match (primary_title, original_title) {
        (Some(primary_title), Some(original_title)) if errors.is_empty() => Ok(TitleUpsert {
            id,
            primary_title,
            original_title,
            title_type: form.title_type,
            start_year: form.start_year,
            end_year: form.end_year,
            runtime_minutes: form.runtime_minutes,
            genre_ids: form.genres.clone(),
        }),
        _ => Err(errors),
    }
}

fn validate_required_text(
    field: TitleField,
    value: Option<&str>,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    let Some(value) = value.filter(|v| !v.trim().is_empty()) else {
        errors.push(FieldError::new(
            field,
            format!("The {} field is required.", field.label()),
        ));
        return None;
    };

    if value.chars().count() > MAX_TITLE_LENGTH {
        errors.push(FieldError::new(
            field,
            format!(
                "The field {} must be a string with a maximum length of {}.",
                field.label(),
                MAX_TITLE_LENGTH
            ),
        ));
        return None;
    }

    Some(value.to_string())
}

fn validate_range(
    field: TitleField,
    value: Option<i32>,
    min: i32,
    max: i32,
    errors: &mut Vec<FieldError>,
) {
    if let Some(value) = value
        && !(min..=max).contains(&value)
    {
        errors.push(FieldError::new(
            field,
            format!(
                "The field {} must be between {} and {}.",
                field.label(),
                min,
                max
            ),
        ));
    }
}
