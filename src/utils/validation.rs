//! Utilidades de validación
//!
//! Funciones helper de validación compartidas por los controllers.
//! Los mensajes devueltos al cliente son en francés.

use chrono::NaiveDate;

use crate::utils::errors::AppError;

/// Validar que un string obligatorio no esté vacío
pub fn require_not_empty(value: &str, message: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(message.to_string()));
    }
    Ok(())
}

/// Validar coordenadas GPS: finitas y dentro de los rangos WGS84
pub fn validate_coordinates(lat: f64, lon: f64) -> Result<(), AppError> {
    if !lat.is_finite() || !lon.is_finite() {
        return Err(AppError::Validation(
            "Les coordonnées GPS sont invalides".to_string(),
        ));
    }
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return Err(AppError::Validation(
            "Les coordonnées GPS sont hors limites".to_string(),
        ));
    }
    Ok(())
}

/// Parsear una fecha `YYYY-MM-DD`
pub fn parse_date(value: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        AppError::Validation(format!("Date invalide '{}', format attendu AAAA-MM-JJ", value))
    })
}

/// Validar un intervalo de dates: fin >= début
pub fn validate_date_range(debut: NaiveDate, fin: NaiveDate) -> Result<(), AppError> {
    if fin < debut {
        return Err(AppError::Validation(
            "La date de fin doit être supérieure à la date de début".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_not_empty() {
        assert!(require_not_empty("CHINA MALL VGE", "champ requis").is_ok());
        assert!(require_not_empty("   ", "champ requis").is_err());
        assert!(require_not_empty("", "champ requis").is_err());
    }

    #[test]
    fn test_validate_coordinates_range() {
        assert!(validate_coordinates(5.3268, -4.0227).is_ok());
        assert!(validate_coordinates(91.0, 0.0).is_err());
        assert!(validate_coordinates(0.0, -181.0).is_err());
        assert!(validate_coordinates(f64::NAN, 0.0).is_err());
        assert!(validate_coordinates(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-06-03").unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()
        );
        assert!(parse_date("03/06/2024").is_err());
    }

    #[test]
    fn test_validate_date_range() {
        let debut = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let fin = NaiveDate::from_ymd_opt(2024, 6, 7).unwrap();
        assert!(validate_date_range(debut, fin).is_ok());
        assert!(validate_date_range(debut, debut).is_ok());
        assert!(validate_date_range(fin, debut).is_err());
    }
}
