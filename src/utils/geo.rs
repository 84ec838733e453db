//! Cálculo de distancias geográficas
//!
//! Distancia de gran círculo (haversine) entre dos coordenadas GPS,
//! en metros. Es la base del control de presencia física en los
//! puntos marchands.

/// Radio de la Tierra en metros
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Distancia de superficie entre dos puntos (grados decimales), en metros.
///
/// Función pura, sin estado. No valida los rangos de entrada: una
/// coordenada no finita produce NaN y el caller decide qué hacer.
pub fn calculate_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let delta_phi = (lat2 - lat1).to_radians();
    let delta_lambda = (lon2 - lon1).to_radians();

    let a = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

#[cfg(test)]
mod tests {
    use super::*;

    // Plateau, Abidjan
    const LAT_A: f64 = 5.3268;
    const LON_A: f64 = -4.0227;

    #[test]
    fn test_distance_same_point_is_zero() {
        assert_eq!(calculate_distance(LAT_A, LON_A, LAT_A, LON_A), 0.0);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let d1 = calculate_distance(LAT_A, LON_A, 5.3600, -3.9874);
        let d2 = calculate_distance(5.3600, -3.9874, LAT_A, LON_A);
        assert_eq!(d1, d2);
    }

    #[test]
    fn test_known_reference_distance() {
        // Paris -> Marseille, ~660.5 km según el valor haversine de referencia
        let d = calculate_distance(48.8566, 2.3522, 43.2965, 5.3698);
        let reference = 660_500.0;
        let relative_error = (d - reference).abs() / reference;
        assert!(relative_error < 0.001, "distance = {} m", d);
    }

    #[test]
    fn test_ten_meter_scale() {
        // ~10 m hacia el norte: 1 grado de latitud ≈ 111 195 m con R = 6371 km
        let delta_lat = 10.0 / 111_195.0;
        let d = calculate_distance(LAT_A, LON_A, LAT_A + delta_lat, LON_A);
        assert!((d - 10.0).abs() < 0.01, "distance = {} m", d);
    }

    #[test]
    fn test_non_finite_input_propagates() {
        let d = calculate_distance(f64::NAN, LON_A, LAT_A, LON_A);
        assert!(d.is_nan());
    }
}
