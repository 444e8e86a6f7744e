//! Validation - turn a raw form payload into a PropertyDescriptor.
//! Every violated field is reported, not just the first one.

use crate::error::{FieldError, ValidationError};
use crate::estimation::types::{
    Category, Dwelling, EstimateRequest, FormNumber, PropertyDescriptor, PropertyKind, Region,
    ViewType,
};
use tracing::debug;

pub const MIN_YEAR_BUILT: i64 = 1800;
pub const MIN_BUILDING_UNITS: i64 = 2;

/// Validate a raw submission against the descriptor invariants
pub fn validate(
    req: &EstimateRequest,
    current_year: i32,
) -> Result<PropertyDescriptor, ValidationError> {
    let mut errors = Vec::new();

    let category = keep(&mut errors, parse_category(req.category.as_deref()));
    let region = keep(&mut errors, parse_region(req.region.as_deref()));
    let municipality = keep(
        &mut errors,
        required_text("municipality", req.municipality.as_deref()),
    );
    let postal_code = keep(&mut errors, parse_postal_code(req.postal_code.as_deref()));
    let street_address = keep(
        &mut errors,
        required_text("streetAddress", req.street_address.as_deref()),
    );
    let area = keep(&mut errors, parse_area(req.area.as_ref()));

    // Category-specific rules only make sense once the category is known
    let kind = match category {
        Some(category) => match build_kind(category, req, current_year) {
            Ok(kind) => Some(kind),
            Err(mut kind_errors) => {
                errors.append(&mut kind_errors);
                None
            }
        },
        None => None,
    };

    let view = parse_view(req.view_type.as_deref());

    match (kind, region, municipality, postal_code, street_address, area) {
        (Some(kind), Some(region), Some(municipality), Some(postal_code), Some(street_address), Some(area))
            if errors.is_empty() =>
        {
            Ok(PropertyDescriptor {
                kind,
                region,
                municipality,
                postal_code,
                street_address,
                area,
                has_balcony: req.has_balcony,
                has_terrace: req.has_terrace,
                view,
            })
        }
        _ => Err(ValidationError { errors }),
    }
}

fn keep<T>(errors: &mut Vec<FieldError>, result: Result<T, FieldError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            errors.push(e);
            None
        }
    }
}

fn parse_category(value: Option<&str>) -> Result<Category, FieldError> {
    let value = non_empty(value).ok_or_else(|| FieldError::new("category", "is required"))?;
    value
        .parse()
        .map_err(|e: String| FieldError::new("category", e))
}

fn parse_region(value: Option<&str>) -> Result<Region, FieldError> {
    let value = non_empty(value).ok_or_else(|| FieldError::new("region", "is required"))?;
    value.parse().map_err(|e: String| FieldError::new("region", e))
}

fn required_text(field: &'static str, value: Option<&str>) -> Result<String, FieldError> {
    non_empty(value)
        .map(|s| s.to_string())
        .ok_or_else(|| FieldError::new(field, "is required"))
}

fn parse_postal_code(value: Option<&str>) -> Result<String, FieldError> {
    let value =
        non_empty(value).ok_or_else(|| FieldError::new("postalCode", "is required"))?;

    if value.len() == 4 && value.chars().all(|c| c.is_ascii_digit()) {
        Ok(value.to_string())
    } else {
        Err(FieldError::new(
            "postalCode",
            format!("must be exactly 4 digits, got '{}'", value),
        ))
    }
}

fn parse_area(value: Option<&FormNumber>) -> Result<f64, FieldError> {
    positive_real("area", value)
}

/// Empty and unrecognised views count as no view
fn parse_view(value: Option<&str>) -> Option<ViewType> {
    let raw = non_empty(value)?;
    let view = ViewType::parse_lenient(raw);
    if view.is_none() {
        debug!("Ignoring unrecognised view type '{}'", raw);
    }
    view
}

fn build_kind(
    category: Category,
    req: &EstimateRequest,
    current_year: i32,
) -> Result<PropertyKind, Vec<FieldError>> {
    if category == Category::Land {
        return Ok(PropertyKind::Land);
    }

    let mut errors = Vec::new();

    let year_built = keep(&mut errors, parse_year_built(req.year_built.as_ref(), current_year));
    let room_count = keep(&mut errors, parse_room_count(req.room_count.as_ref()));
    let bathroom_count = keep(
        &mut errors,
        required_count("bathroomCount", req.bathroom_count.as_ref(), 1),
    );

    let floor_count = match category {
        Category::House | Category::Villa => keep(
            &mut errors,
            optional_count("floorCount", req.floor_count.as_ref(), 1),
        )
        .flatten(),
        _ => None,
    };

    let building = match category {
        Category::MultiUnitBuilding => {
            let units = keep(
                &mut errors,
                required_count("unitCount", req.unit_count.as_ref(), MIN_BUILDING_UNITS),
            );
            let avg_rooms = keep(
                &mut errors,
                positive_real("avgUnitRoomCount", req.avg_unit_room_count.as_ref()),
            );
            units.zip(avg_rooms)
        }
        _ => None,
    };

    if !errors.is_empty() {
        return Err(errors);
    }

    let dwelling = match (year_built, room_count, bathroom_count) {
        (Some(year_built), Some(room_count), Some(bathroom_count)) => Dwelling {
            year_built,
            room_count,
            bathroom_count,
        },
        _ => return Err(errors),
    };

    let kind = match category {
        Category::Apartment => PropertyKind::Apartment { dwelling },
        Category::House => PropertyKind::House {
            dwelling,
            floor_count,
        },
        Category::Villa => PropertyKind::Villa {
            dwelling,
            floor_count,
        },
        Category::MultiUnitBuilding => match building {
            Some((unit_count, avg_unit_room_count)) => PropertyKind::MultiUnitBuilding {
                dwelling,
                unit_count,
                avg_unit_room_count,
            },
            None => return Err(errors),
        },
        Category::Land => PropertyKind::Land,
    };

    Ok(kind)
}

fn parse_year_built(value: Option<&FormNumber>, current_year: i32) -> Result<i32, FieldError> {
    let year = match number("yearBuilt", value)? {
        Some(year) => whole("yearBuilt", year)?,
        None => return Err(FieldError::new("yearBuilt", "is required")),
    };
    let current = i64::from(current_year);

    if year < MIN_YEAR_BUILT || year > current {
        return Err(FieldError::new(
            "yearBuilt",
            format!("must be between {} and {}", MIN_YEAR_BUILT, current),
        ));
    }

    // Bounded by current_year above, always fits
    Ok(year as i32)
}

fn parse_room_count(value: Option<&FormNumber>) -> Result<f64, FieldError> {
    let rooms = positive_real("roomCount", value)?;

    if (rooms * 2.0).fract() != 0.0 {
        return Err(FieldError::new(
            "roomCount",
            "must be a whole or half number of rooms",
        ));
    }

    Ok(rooms)
}

fn positive_real(field: &'static str, value: Option<&FormNumber>) -> Result<f64, FieldError> {
    match number(field, value)? {
        None => Err(FieldError::new(field, "is required")),
        Some(v) if v.is_finite() && v > 0.0 => Ok(v),
        Some(_) => Err(FieldError::new(field, "must be greater than 0")),
    }
}

fn required_count(
    field: &'static str,
    value: Option<&FormNumber>,
    min: i64,
) -> Result<u32, FieldError> {
    optional_count(field, value, min)?.ok_or_else(|| FieldError::new(field, "is required"))
}

fn optional_count(
    field: &'static str,
    value: Option<&FormNumber>,
    min: i64,
) -> Result<Option<u32>, FieldError> {
    let value = match number(field, value)? {
        Some(v) => Some(whole(field, v)?),
        None => None,
    };

    match value {
        None => Ok(None),
        Some(v) if v >= min => u32::try_from(v)
            .map(Some)
            .map_err(|_| FieldError::new(field, "is too large")),
        Some(_) => Err(FieldError::new(field, format!("must be at least {}", min))),
    }
}

/// Blank input counts as absent
fn number(field: &'static str, value: Option<&FormNumber>) -> Result<Option<f64>, FieldError> {
    match value.and_then(FormNumber::value) {
        None => Ok(None),
        Some(Ok(v)) => Ok(Some(v)),
        Some(Err(text)) => Err(FieldError::new(
            field,
            format!("must be a number, got '{}'", text),
        )),
    }
}

fn whole(field: &'static str, value: f64) -> Result<i64, FieldError> {
    if !value.is_finite() || value.fract() != 0.0 {
        return Err(FieldError::new(field, "must be a whole number"));
    }
    Ok(value as i64)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}
