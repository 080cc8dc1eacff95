use crate::domain::calendar::parse_date;
use crate::forecast::{predict_range, Forecast};
use crate::model::Models;
use chrono::NaiveDate;
use serde::Deserialize;

/// Longest accepted distance between start and end, in days (so at most 31 predictions).
pub const MAX_RANGE_DAYS: i64 = 30;

pub const MSG_MISSING_DATES: &str = "Fechas no proporcionadas";
pub const MSG_MODELS_UNAVAILABLE: &str = "Modelos no cargados correctamente";
pub const MSG_END_BEFORE_START: &str = "La fecha final debe ser posterior a la inicial";
pub const MSG_RANGE_TOO_LARGE: &str = "El rango máximo es de 30 días";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PredictRequest {
    pub fecha_inicio: Option<String>,
    pub fecha_fin: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PredictError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("Modelos no cargados correctamente")]
    ModelUnavailable,
    #[error("{0}")]
    Internal(String),
}

impl PredictError {
    pub fn is_client_error(&self) -> bool {
        matches!(self, PredictError::InvalidInput(_))
    }
}

impl PredictRequest {
    /// Decodes a raw request body. An empty body is treated as a request without dates.
    pub fn from_body(body: &[u8]) -> Result<Self, PredictError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body).map_err(|e| PredictError::InvalidInput(e.to_string()))
    }

    fn required_dates(&self) -> Result<(&str, &str), PredictError> {
        match (present(&self.fecha_inicio), present(&self.fecha_fin)) {
            (Some(start), Some(end)) => Ok((start, end)),
            _ => Err(PredictError::InvalidInput(MSG_MISSING_DATES.to_string())),
        }
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

fn parse_range(start: &str, end: &str) -> Result<(NaiveDate, NaiveDate), PredictError> {
    let parse = |s: &str| parse_date(s).map_err(|e| PredictError::InvalidInput(e.to_string()));
    let start = parse(start)?;
    let end = parse(end)?;

    if end < start {
        return Err(PredictError::InvalidInput(MSG_END_BEFORE_START.to_string()));
    }
    if (end - start).num_days() > MAX_RANGE_DAYS {
        return Err(PredictError::InvalidInput(MSG_RANGE_TOO_LARGE.to_string()));
    }
    Ok((start, end))
}

/// Runs the full validation sequence and predicts the requested range.
///
/// Missing dates are reported before unavailable models; unavailable models are reported
/// before any date parsing, so a degraded server answers 500 for every well-formed request.
pub fn handle_predict(
    models: Option<&Models>,
    request: &PredictRequest,
) -> Result<Forecast, PredictError> {
    let (start, end) = request.required_dates()?;
    let models = models.ok_or(PredictError::ModelUnavailable)?;
    let (start, end) = parse_range(start, end)?;

    predict_range(models, start, end).map_err(|e| PredictError::Internal(format!("{e:#}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::testing::{encoder, season_models, FailingClassifier};

    fn request(start: Option<&str>, end: Option<&str>) -> PredictRequest {
        PredictRequest {
            fecha_inicio: start.map(str::to_string),
            fecha_fin: end.map(str::to_string),
        }
    }

    fn invalid(msg: &str) -> PredictError {
        PredictError::InvalidInput(msg.to_string())
    }

    #[test]
    fn new_year_day_is_single_summer_prediction() {
        let models = season_models();
        let forecast =
            handle_predict(Some(&models), &request(Some("2024-01-01"), Some("2024-01-01")))
                .unwrap();
        assert_eq!(forecast.predictions.len(), 1);
        assert_eq!(forecast.predictions[0].date.to_string(), "2024-01-01");
        // The stand-in classifier maps Summer to "Bueno".
        assert_eq!(forecast.predictions[0].state.as_str(), "Bueno");
    }

    #[test]
    fn missing_or_empty_dates_are_rejected() {
        let models = season_models();
        for req in [
            request(Some("2024-01-01"), None),
            request(None, Some("2024-01-01")),
            request(Some(""), Some("2024-01-01")),
            PredictRequest::default(),
        ] {
            assert_eq!(
                handle_predict(Some(&models), &req).unwrap_err(),
                invalid(MSG_MISSING_DATES)
            );
        }
    }

    #[test]
    fn missing_dates_win_over_unavailable_models() {
        assert_eq!(
            handle_predict(None, &request(None, None)).unwrap_err(),
            invalid(MSG_MISSING_DATES)
        );
    }

    #[test]
    fn unavailable_models_win_over_date_validation() {
        for req in [
            request(Some("2024-01-01"), Some("2024-01-05")),
            request(Some("not-a-date"), Some("2024-01-05")),
            request(Some("2024-02-01"), Some("2024-01-05")),
        ] {
            assert_eq!(
                handle_predict(None, &req).unwrap_err(),
                PredictError::ModelUnavailable
            );
        }
        assert_eq!(PredictError::ModelUnavailable.to_string(), MSG_MODELS_UNAVAILABLE);
    }

    #[test]
    fn malformed_date_surfaces_parse_error() {
        let models = season_models();
        let err =
            handle_predict(Some(&models), &request(Some("2024/01/01"), Some("2024-01-02")))
                .unwrap_err();
        assert!(err.is_client_error());
        assert!(!err.to_string().is_empty());
        assert_ne!(err, invalid(MSG_MISSING_DATES));
    }

    #[test]
    fn end_before_start_is_rejected() {
        let models = season_models();
        assert_eq!(
            handle_predict(Some(&models), &request(Some("2024-03-02"), Some("2024-03-01")))
                .unwrap_err(),
            invalid(MSG_END_BEFORE_START)
        );
    }

    #[test]
    fn span_limit_is_thirty_days_apart() {
        let models = season_models();
        let ok = handle_predict(Some(&models), &request(Some("2024-01-01"), Some("2024-01-31")))
            .unwrap();
        assert_eq!(ok.predictions.len(), 31);

        assert_eq!(
            handle_predict(Some(&models), &request(Some("2024-01-01"), Some("2024-02-01")))
                .unwrap_err(),
            invalid(MSG_RANGE_TOO_LARGE)
        );
    }

    #[test]
    fn classifier_failure_is_internal_error() {
        let models = crate::model::Models::new(FailingClassifier, encoder()).unwrap();
        let err = handle_predict(Some(&models), &request(Some("2024-01-01"), Some("2024-01-02")))
            .unwrap_err();
        assert_eq!(err, PredictError::Internal("feature vector rejected".to_string()));
        assert!(!err.is_client_error());
    }

    #[test]
    fn body_decoding() {
        let req = PredictRequest::from_body(br#"{"fecha_inicio":"2024-01-01"}"#).unwrap();
        assert_eq!(req.fecha_inicio.as_deref(), Some("2024-01-01"));
        assert_eq!(req.fecha_fin, None);

        let empty = PredictRequest::from_body(b"  ").unwrap();
        assert!(empty.fecha_inicio.is_none() && empty.fecha_fin.is_none());

        assert!(matches!(
            PredictRequest::from_body(b"{not json"),
            Err(PredictError::InvalidInput(_))
        ));
        assert!(matches!(
            PredictRequest::from_body(br#"{"fecha_inicio": 20240101}"#),
            Err(PredictError::InvalidInput(_))
        ));
    }
}
