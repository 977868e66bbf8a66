//! Conversión de zonas horarias
//!
//! Los timestamps se almacenan siempre en UTC; las empresas llevan un
//! identificador IANA opcional. Un identificador desconocido o ausente se
//! trata como UTC: los datos de un vehículo deben poder consultarse aunque
//! los metadatos de zona horaria falten o estén corruptos.

use chrono::{DateTime, LocalResult, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Resolver un identificador IANA; `None` si es desconocido o ausente
pub fn resolve_tz(tz_id: Option<&str>) -> Option<Tz> {
    tz_id.and_then(|id| id.parse::<Tz>().ok())
}

/// Convertir un instante local del huso dado a UTC.
///
/// Horas ambiguas (repetidas al salir del horario de verano) resuelven al
/// instante más temprano; horas inexistentes (saltadas al entrar) se
/// interpretan como UTC.
pub fn local_to_utc(local: NaiveDateTime, tz_id: Option<&str>) -> DateTime<Utc> {
    match resolve_tz(tz_id) {
        Some(tz) => match tz.from_local_datetime(&local) {
            LocalResult::Single(dt) => dt.with_timezone(&Utc),
            LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
            LocalResult::None => Utc.from_utc_datetime(&local),
        },
        None => Utc.from_utc_datetime(&local),
    }
}

/// Convertir un instante UTC a la hora local del huso dado
pub fn utc_to_local(utc: DateTime<Utc>, tz_id: Option<&str>) -> NaiveDateTime {
    match resolve_tz(tz_id) {
        Some(tz) => utc.with_timezone(&tz).naive_local(),
        None => utc.naive_utc(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn naive(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    #[test]
    fn test_local_utc_round_trip() {
        let local = naive(2024, 6, 15, 12, 30);
        for tz in ["Europe/Moscow", "America/New_York", "Asia/Tokyo", "UTC"] {
            let utc = local_to_utc(local, Some(tz));
            assert_eq!(utc_to_local(utc, Some(tz)), local, "round trip via {}", tz);
        }
    }

    #[test]
    fn test_moscow_offset() {
        // Moscú es UTC+3 todo el año
        let local = naive(2024, 1, 10, 15, 0);
        let utc = local_to_utc(local, Some("Europe/Moscow"));
        assert_eq!(utc.naive_utc(), naive(2024, 1, 10, 12, 0));
    }

    #[test]
    fn test_unknown_tz_behaves_as_utc() {
        let local = naive(2024, 3, 1, 8, 0);
        assert_eq!(
            local_to_utc(local, Some("Not/AZone")),
            local_to_utc(local, None)
        );
        assert_eq!(
            local_to_utc(local, None).naive_utc(),
            local,
        );
    }

    #[test]
    fn test_ambiguous_local_time_resolves_earliest() {
        // 2024-11-03 01:30 ocurre dos veces en America/New_York
        let local = naive(2024, 11, 3, 1, 30);
        let utc = local_to_utc(local, Some("America/New_York"));
        // La más temprana es la de EDT (UTC-4)
        assert_eq!(utc.naive_utc(), naive(2024, 11, 3, 5, 30));
    }
}
