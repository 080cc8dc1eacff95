use crate::domain::calendar::DateFeature;
use crate::domain::state::{StateLabel, StateMetadata};
use crate::model::Models;
use anyhow::ensure;
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyPrediction {
    #[serde(rename = "fecha")]
    pub date: NaiveDate,
    #[serde(rename = "dia")]
    pub day_of_month: String,
    #[serde(rename = "mes")]
    pub month_abbrev: String,
    #[serde(rename = "diaSemana")]
    pub weekday: String,
    #[serde(rename = "estado")]
    pub state: StateLabel,
    #[serde(flatten)]
    pub metadata: StateMetadata,
}

impl DailyPrediction {
    pub fn new(date: NaiveDate, state: StateLabel) -> Self {
        let metadata = state.metadata().clone();
        Self {
            date,
            day_of_month: date.format("%d").to_string(),
            month_abbrev: date.format("%b").to_string(),
            weekday: date.format("%A").to_string(),
            state,
            metadata,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeSummary {
    #[serde(rename = "total")]
    pub total_days: usize,
    #[serde(rename = "buenos")]
    pub count_good: usize,
    #[serde(rename = "regulares")]
    pub count_regular: usize,
    #[serde(rename = "malos")]
    pub count_bad: usize,
    #[serde(rename = "porcentaje_bueno")]
    pub percent_good: f64,
}

impl RangeSummary {
    /// Unrecognized labels are displayed as "Regular", so they are counted there too.
    pub fn from_predictions(predictions: &[DailyPrediction]) -> Self {
        let mut summary = Self {
            total_days: predictions.len(),
            count_good: 0,
            count_regular: 0,
            count_bad: 0,
            percent_good: 0.0,
        };

        for p in predictions {
            match p.state {
                StateLabel::Good => summary.count_good += 1,
                StateLabel::Bad => summary.count_bad += 1,
                StateLabel::Regular | StateLabel::Unrecognized(_) => summary.count_regular += 1,
            }
        }

        summary.percent_good = percent_one_decimal(summary.count_good, summary.total_days);
        summary
    }
}

// Half-to-even on the last digit; an empty range reports 0.0.
fn percent_one_decimal(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let pct = (part as f64 / total as f64) * 100.0;
    (pct * 10.0).round_ties_even() / 10.0
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Forecast {
    #[serde(rename = "predicciones")]
    pub predictions: Vec<DailyPrediction>,
    #[serde(rename = "estadisticas")]
    pub summary: RangeSummary,
}

/// Predicts every day from `start` to `end` inclusive, in chronological order.
///
/// A classifier failure on any day fails the whole range.
pub fn predict_range(
    models: &Models,
    start: NaiveDate,
    end: NaiveDate,
) -> anyhow::Result<Forecast> {
    ensure!(end >= start, "range end {end} precedes start {start}");

    let predictions = start
        .iter_days()
        .take_while(|d| *d <= end)
        .map(|date| -> anyhow::Result<DailyPrediction> {
            let state = models.predict(&DateFeature::from_date(date))?;
            Ok(DailyPrediction::new(date, state))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let summary = RangeSummary::from_predictions(&predictions);

    tracing::debug!(
        %start,
        %end,
        total = summary.total_days,
        buenos = summary.count_good,
        "range predicted"
    );

    Ok(Forecast {
        predictions,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::testing::{encoder, season_models, FailingClassifier};
    use crate::model::{Models, StateClassifier};
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn one_prediction_per_day_in_order() {
        let models = season_models();
        let start = date(2024, 2, 20);
        let end = date(2024, 3, 10);
        let forecast = predict_range(&models, start, end).unwrap();

        let expected_len = (end - start).num_days() as usize + 1;
        assert_eq!(forecast.predictions.len(), expected_len);
        assert_eq!(forecast.summary.total_days, expected_len);
        assert!(forecast
            .predictions
            .windows(2)
            .all(|w| w[1].date == w[0].date.succ_opt().unwrap()));
        assert_eq!(forecast.predictions.first().unwrap().date, start);
        assert_eq!(forecast.predictions.last().unwrap().date, end);
    }

    #[test]
    fn single_day_range() {
        let models = season_models();
        let day = date(2024, 1, 1);
        let forecast = predict_range(&models, day, day).unwrap();
        assert_eq!(forecast.predictions.len(), 1);

        let p = &forecast.predictions[0];
        assert_eq!(p.date, day);
        assert_eq!(p.day_of_month, "01");
        assert_eq!(p.month_abbrev, "Jan");
        assert_eq!(p.weekday, "Monday");
        assert_eq!(p.state, StateLabel::Good);
        assert_eq!(p.metadata.color, "#10b981");
    }

    #[test]
    fn summary_counts_and_percent() {
        let models = season_models();
        // Crosses the leap day: two Summer days in February, two Autumn days in March.
        let forecast = predict_range(&models, date(2024, 2, 28), date(2024, 3, 2)).unwrap();
        let s = &forecast.summary;
        assert_eq!(s.total_days, 4);
        assert_eq!(s.count_good, 2);
        assert_eq!(s.count_regular, 2);
        assert_eq!(s.count_bad, 0);
        assert_eq!(s.count_good + s.count_regular + s.count_bad, s.total_days);
        assert_eq!(s.percent_good, 50.0);
    }

    #[test]
    fn percent_rounds_to_one_decimal() {
        assert_eq!(percent_one_decimal(1, 3), 33.3);
        assert_eq!(percent_one_decimal(2, 3), 66.7);
        assert_eq!(percent_one_decimal(1, 16), 6.2);
        assert_eq!(percent_one_decimal(31, 31), 100.0);
        assert_eq!(percent_one_decimal(0, 0), 0.0);
    }

    #[test]
    fn unrecognized_labels_display_and_count_as_regular() {
        #[derive(Debug)]
        struct Constant;
        impl StateClassifier for Constant {
            fn n_classes(&self) -> usize {
                1
            }
            fn predict_class(&self, _: &DateFeature) -> anyhow::Result<usize> {
                Ok(0)
            }
        }

        let enc = crate::model::encoder::LabelEncoder::new(vec!["Niebla".into()]).unwrap();
        let models = Models::new(Constant, enc).unwrap();
        let forecast = predict_range(&models, date(2024, 5, 1), date(2024, 5, 2)).unwrap();

        assert_eq!(forecast.predictions[0].state.as_str(), "Niebla");
        assert_eq!(forecast.predictions[0].metadata, *StateLabel::Regular.metadata());
        assert_eq!(forecast.summary.count_regular, 2);
        assert_eq!(forecast.summary.percent_good, 0.0);
    }

    #[test]
    fn classifier_failure_fails_whole_range() {
        let models = Models::new(FailingClassifier, encoder()).unwrap();
        let err = predict_range(&models, date(2024, 5, 1), date(2024, 5, 3)).unwrap_err();
        assert!(err.to_string().contains("feature vector rejected"));
    }

    #[test]
    fn rejects_reversed_range() {
        let models = season_models();
        assert!(predict_range(&models, date(2024, 5, 2), date(2024, 5, 1)).is_err());
    }

    #[test]
    fn identical_input_yields_identical_output() {
        let models = season_models();
        let a = predict_range(&models, date(2024, 6, 1), date(2024, 6, 30)).unwrap();
        let b = predict_range(&models, date(2024, 6, 1), date(2024, 6, 30)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn serializes_wire_shape() {
        let models = season_models();
        let day = date(2024, 7, 4);
        let forecast = predict_range(&models, day, day).unwrap();
        let value = serde_json::to_value(&forecast).unwrap();

        assert_eq!(
            value,
            json!({
                "predicciones": [{
                    "fecha": "2024-07-04",
                    "dia": "04",
                    "mes": "Jul",
                    "diaSemana": "Thursday",
                    "estado": "Malo",
                    "color": "#ef4444",
                    "icono": "🌧️",
                    "descripcion": "No recomendado para turismo",
                    "recomendacion": "Considere reprogramar actividades al aire libre"
                }],
                "estadisticas": {
                    "total": 1,
                    "buenos": 0,
                    "regulares": 0,
                    "malos": 1,
                    "porcentaje_bueno": 0.0
                }
            })
        );
    }
}
