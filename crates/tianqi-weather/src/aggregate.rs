//! Reshape a location's time series into per-day and per-hour figures.
//!
//! The chat lookup, the daily table and the hourly breakdown all read the
//! same samples through this module.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};

use crate::payload::{
    LocationForecast, RAIN_PROBABILITY, RELATIVE_HUMIDITY, TEMPERATURE, WEATHER, WIND_DIRECTION,
    WIND_SPEED,
};
use crate::types::{
    weekday_name, DailySummary, HourlyEntry, HourlyForecast, WeatherSummary, NO_DESCRIPTION,
};

/// Summary of one calendar day, or `None` when the day has no temperature samples.
pub fn summarize_day(location: &LocationForecast, date: NaiveDate) -> Option<WeatherSummary> {
    let day = collect_days(location, date, date).remove(&date)?;

    let min_temp = day.temps.iter().map(|(t, _)| *t).min()?;
    let max_temp = day.temps.iter().map(|(t, _)| *t).max()?;

    Some(WeatherSummary {
        date,
        min_temp,
        max_temp,
        rain_probability: day.rain.iter().copied().max().unwrap_or(0),
        average_humidity: truncated_mean(&day.humidity).unwrap_or(0),
        description: mode(&day.weather).unwrap_or_else(|| NO_DESCRIPTION.to_string()),
    })
}

/// One row per date in `[start, end]` that has any samples, ascending.
pub fn daily_summaries(
    location: &LocationForecast,
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<DailySummary> {
    collect_days(location, start, end)
        .into_iter()
        .map(|(date, day)| {
            let min = first_sample_at(&day.temps, day.temps.iter().map(|(t, _)| *t).min());
            let max = first_sample_at(&day.temps, day.temps.iter().map(|(t, _)| *t).max());

            DailySummary {
                date,
                weekday: weekday_name(date).to_string(),
                weather: mode(&day.weather),
                rain_prob: day.rain.iter().copied().max().unwrap_or(0),
                min_temp: min.as_ref().map(|(t, _)| *t),
                min_temp_time: min.map(|(_, at)| at),
                max_temp: max.as_ref().map(|(t, _)| *t),
                max_temp_time: max.map(|(_, at)| at),
                avg_humidity: truncated_mean(&day.humidity),
                max_wind: day
                    .wind_speed
                    .iter()
                    .copied()
                    .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))))
                    .map(|v| (v * 10.0).round() / 10.0),
                wind_dir: mode(&day.wind_dir),
            }
        })
        .collect()
}

/// Every timestamp in `[start, end]` with the values reported for it.
/// When an element reports the same timestamp twice, the later sample wins.
pub fn hourly_breakdown(
    location: &LocationForecast,
    start: NaiveDate,
    end: NaiveDate,
) -> HourlyForecast {
    let mut hourly = HourlyForecast::new();

    for (at, raw) in location.samples(TEMPERATURE) {
        if let (Some(entry), Some(v)) = (slot(&mut hourly, at, start, end), parse_int(&raw)) {
            entry.temp = Some(v);
        }
    }
    for (at, raw) in location.samples(RAIN_PROBABILITY) {
        if let (Some(entry), Some(v)) = (slot(&mut hourly, at, start, end), parse_percent(&raw)) {
            entry.rain = Some(v);
        }
    }
    for (at, raw) in location.samples(RELATIVE_HUMIDITY) {
        if let (Some(entry), Some(v)) = (slot(&mut hourly, at, start, end), parse_percent(&raw)) {
            entry.humidity = Some(v);
        }
    }
    for (at, raw) in location.samples(WEATHER) {
        if let Some(entry) = slot(&mut hourly, at, start, end) {
            entry.weather = Some(raw);
        }
    }
    for (at, raw) in location.samples(WIND_SPEED) {
        if let (Some(entry), Ok(v)) = (slot(&mut hourly, at, start, end), raw.trim().parse::<f64>()) {
            entry.wind_speed = Some(v);
        }
    }
    for (at, raw) in location.samples(WIND_DIRECTION) {
        if let Some(entry) = slot(&mut hourly, at, start, end) {
            entry.wind_dir = Some(raw);
        }
    }

    hourly
}

fn slot(
    hourly: &mut HourlyForecast,
    at: NaiveDateTime,
    start: NaiveDate,
    end: NaiveDate,
) -> Option<&mut HourlyEntry> {
    let date = at.date();
    if date < start || date > end {
        return None;
    }
    Some(
        hourly
            .entry(date)
            .or_default()
            .entry(at.format("%H:%M").to_string())
            .or_default(),
    )
}

#[derive(Debug, Default)]
struct DaySamples {
    /// Temperature with its "HH:MM" time
    temps: Vec<(i32, String)>,
    rain: Vec<u8>,
    humidity: Vec<u8>,
    weather: Vec<String>,
    wind_speed: Vec<f64>,
    wind_dir: Vec<String>,
}

fn collect_days(
    location: &LocationForecast,
    start: NaiveDate,
    end: NaiveDate,
) -> BTreeMap<NaiveDate, DaySamples> {
    let mut days: BTreeMap<NaiveDate, DaySamples> = BTreeMap::new();
    let in_range = |at: &NaiveDateTime| at.date() >= start && at.date() <= end;

    for (at, raw) in location.samples(TEMPERATURE).into_iter().filter(|(at, _)| in_range(at)) {
        match parse_int(&raw) {
            Some(t) => days
                .entry(at.date())
                .or_default()
                .temps
                .push((t, at.format("%H:%M").to_string())),
            None => tracing::debug!("Skipping unparseable temperature {:?} at {}", raw, at),
        }
    }
    for (at, raw) in location.samples(RAIN_PROBABILITY).into_iter().filter(|(at, _)| in_range(at)) {
        if let Some(v) = parse_percent(&raw) {
            days.entry(at.date()).or_default().rain.push(v);
        }
    }
    for (at, raw) in location.samples(RELATIVE_HUMIDITY).into_iter().filter(|(at, _)| in_range(at)) {
        if let Some(v) = parse_percent(&raw) {
            days.entry(at.date()).or_default().humidity.push(v);
        }
    }
    for (at, raw) in location.samples(WEATHER).into_iter().filter(|(at, _)| in_range(at)) {
        days.entry(at.date()).or_default().weather.push(raw);
    }
    for (at, raw) in location.samples(WIND_SPEED).into_iter().filter(|(at, _)| in_range(at)) {
        if let Ok(v) = raw.trim().parse::<f64>() {
            days.entry(at.date()).or_default().wind_speed.push(v);
        }
    }
    for (at, raw) in location.samples(WIND_DIRECTION).into_iter().filter(|(at, _)| in_range(at)) {
        days.entry(at.date()).or_default().wind_dir.push(raw);
    }

    days
}

fn first_sample_at(temps: &[(i32, String)], value: Option<i32>) -> Option<(i32, String)> {
    let value = value?;
    temps.iter().find(|(t, _)| *t == value).cloned()
}

fn parse_int(raw: &str) -> Option<i32> {
    let raw = raw.trim();
    raw.parse::<i32>()
        .ok()
        .or_else(|| raw.parse::<f64>().ok().filter(|v| v.is_finite()).map(|v| v.trunc() as i32))
}

fn parse_percent(raw: &str) -> Option<u8> {
    parse_int(raw).map(|v| v.clamp(0, 100) as u8)
}

fn truncated_mean(values: &[u8]) -> Option<u8> {
    if values.is_empty() {
        return None;
    }
    let sum: u32 = values.iter().map(|v| u32::from(*v)).sum();
    Some((sum / values.len() as u32) as u8)
}

/// Most frequent value; ties go to the value seen first.
fn mode(values: &[String]) -> Option<String> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for value in values {
        match counts.iter_mut().find(|(v, _)| *v == value.as_str()) {
            Some((_, n)) => *n += 1,
            None => counts.push((value.as_str(), 1)),
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (value, n) in counts {
        if best.map_or(true, |(_, top)| n > top) {
            best = Some((value, n));
        }
    }
    best.map(|(v, _)| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::ForecastPayload;
    use serde_json::json;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    fn series(name: &str, key: &str, time_key: &str, samples: &[(&str, &str)]) -> serde_json::Value {
        let times: Vec<_> = samples
            .iter()
            .map(|(at, v)| json!({ time_key: at, "ElementValue": [{ key: v }] }))
            .collect();
        json!({ "ElementName": name, "Time": times })
    }

    fn taipei() -> LocationForecast {
        let payload: ForecastPayload = serde_json::from_value(json!({
            "success": "true",
            "records": {"Locations": [{"Location": [{
                "LocationName": "臺北市",
                "WeatherElement": [
                    series("溫度", "Temperature", "DataTime", &[
                        ("2025-06-01T00:00:00+08:00", "24"),
                        ("2025-06-01T06:00:00+08:00", "23"),
                        ("2025-06-01T12:00:00+08:00", "31"),
                        ("2025-06-01T15:00:00+08:00", "31"),
                        ("2025-06-01T21:00:00+08:00", "23"),
                        ("2025-06-02T12:00:00+08:00", "29"),
                    ]),
                    series("3小時降雨機率", "ProbabilityOfPrecipitation", "StartTime", &[
                        ("2025-06-01T00:00:00+08:00", "10"),
                        ("2025-06-01T12:00:00+08:00", "75"),
                        ("2025-06-01T18:00:00+08:00", "40"),
                    ]),
                    series("相對濕度", "RelativeHumidity", "DataTime", &[
                        ("2025-06-01T00:00:00+08:00", "80"),
                        ("2025-06-01T12:00:00+08:00", "65"),
                        ("2025-06-01T18:00:00+08:00", "70"),
                    ]),
                    series("天氣現象", "Weather", "StartTime", &[
                        ("2025-06-01T00:00:00+08:00", "多雲"),
                        ("2025-06-01T06:00:00+08:00", "陰短暫雨"),
                        ("2025-06-01T12:00:00+08:00", "陰短暫雨"),
                        ("2025-06-01T18:00:00+08:00", "多雲"),
                        ("2025-06-01T21:00:00+08:00", "晴"),
                    ]),
                    series("風速", "WindSpeed", "StartTime", &[
                        ("2025-06-01T00:00:00+08:00", "2.44"),
                        ("2025-06-01T12:00:00+08:00", "3.46"),
                        ("2025-06-01T18:00:00+08:00", "n/a"),
                    ]),
                    series("風向", "WindDirection", "StartTime", &[
                        ("2025-06-01T00:00:00+08:00", "偏北風"),
                        ("2025-06-01T12:00:00+08:00", "偏東風"),
                        ("2025-06-01T18:00:00+08:00", "偏東風"),
                    ]),
                ]
            }]}]}
        }))
        .unwrap();

        payload.location("臺北市").unwrap().clone()
    }

    #[test]
    fn test_summarize_day() {
        let summary = summarize_day(&taipei(), date(6, 1)).unwrap();
        assert_eq!(summary.min_temp, 23);
        assert_eq!(summary.max_temp, 31);
        assert_eq!(summary.rain_probability, 75);
        // (80 + 65 + 70) / 3 = 71.67, truncated
        assert_eq!(summary.average_humidity, 71);
        // "多雲" and "陰短暫雨" tie at two; "多雲" was seen first
        assert_eq!(summary.description, "多雲");
    }

    #[test]
    fn test_summarize_day_defaults_when_only_temperatures() {
        let summary = summarize_day(&taipei(), date(6, 2)).unwrap();
        assert_eq!(summary.min_temp, 29);
        assert_eq!(summary.max_temp, 29);
        assert_eq!(summary.rain_probability, 0);
        assert_eq!(summary.average_humidity, 0);
        assert_eq!(summary.description, NO_DESCRIPTION);
    }

    #[test]
    fn test_summarize_day_without_temperatures_is_a_miss() {
        assert!(summarize_day(&taipei(), date(6, 3)).is_none());
        assert!(summarize_day(&taipei(), date(5, 31)).is_none());
    }

    #[test]
    fn test_daily_summaries_range_and_times() {
        let days = daily_summaries(&taipei(), date(6, 1), date(6, 7));
        assert_eq!(days.len(), 2);

        let first = &days[0];
        assert_eq!(first.date, date(6, 1));
        assert_eq!(first.weekday, "星期日");
        assert_eq!(first.min_temp, Some(23));
        assert_eq!(first.min_temp_time.as_deref(), Some("06:00"));
        assert_eq!(first.max_temp, Some(31));
        assert_eq!(first.max_temp_time.as_deref(), Some("12:00"));
        assert_eq!(first.max_wind, Some(3.5));
        assert_eq!(first.wind_dir.as_deref(), Some("偏東風"));
        assert_eq!(first.avg_humidity, Some(71));

        let second = &days[1];
        assert_eq!(second.weather, None);
        assert_eq!(second.max_wind, None);
        assert_eq!(second.avg_humidity, None);
    }

    #[test]
    fn test_daily_summaries_excludes_out_of_range() {
        let days = daily_summaries(&taipei(), date(6, 2), date(6, 2));
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].date, date(6, 2));
    }

    #[test]
    fn test_hourly_breakdown() {
        let hourly = hourly_breakdown(&taipei(), date(6, 1), date(6, 1));
        assert_eq!(hourly.len(), 1);

        let day = &hourly[&date(6, 1)];
        let noon = &day["12:00"];
        assert_eq!(noon.temp, Some(31));
        assert_eq!(noon.rain, Some(75));
        assert_eq!(noon.humidity, Some(65));
        assert_eq!(noon.weather.as_deref(), Some("陰短暫雨"));
        assert_eq!(noon.wind_speed, Some(3.46));
        assert_eq!(noon.wind_dir.as_deref(), Some("偏東風"));

        let evening = &day["18:00"];
        assert_eq!(evening.temp, None);
        assert_eq!(evening.wind_speed, None);
    }

    #[test]
    fn test_mode_prefers_first_on_tie() {
        let values = vec!["b".to_string(), "a".to_string(), "a".to_string(), "b".to_string()];
        assert_eq!(mode(&values).as_deref(), Some("b"));
        assert_eq!(mode(&[]), None);
    }

    #[test]
    fn test_parse_helpers() {
        assert_eq!(parse_int(" 27 "), Some(27));
        assert_eq!(parse_int("26.8"), Some(26));
        assert_eq!(parse_int("-"), None);
        assert_eq!(parse_percent("120"), Some(100));
        assert_eq!(truncated_mean(&[1, 2]), Some(1));
    }
}
