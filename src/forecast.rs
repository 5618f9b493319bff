//! Plain-text rendering of the forecast table.

use std::fmt::Write;

use tianqi_weather::{DailySummary, HourlyForecast};

fn or_dash<T: std::fmt::Display>(value: Option<T>, unit: &str) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v}{unit}"))
}

fn temp_at(temp: Option<i32>, time: Option<&str>) -> String {
    match (temp, time) {
        (Some(t), Some(at)) => format!("{t}°C ({at})"),
        (Some(t), None) => format!("{t}°C"),
        _ => "-".to_string(),
    }
}

pub fn render_daily(days: &[DailySummary]) -> String {
    if days.is_empty() {
        return "沒有符合日期範圍的預報資料。\n".to_string();
    }

    let mut out = String::new();
    for day in days {
        let _ = writeln!(
            out,
            "{} {}  {}  降雨 {}%  低溫 {}  高溫 {}  濕度 {}  風速 {}  風向 {}",
            day.date.format("%Y/%m/%d"),
            day.weekday,
            day.weather.as_deref().unwrap_or("-"),
            day.rain_prob,
            temp_at(day.min_temp, day.min_temp_time.as_deref()),
            temp_at(day.max_temp, day.max_temp_time.as_deref()),
            or_dash(day.avg_humidity, "%"),
            or_dash(day.max_wind, " m/s"),
            day.wind_dir.as_deref().unwrap_or("-"),
        );
    }
    out
}

pub fn render_hourly(hourly: &HourlyForecast) -> String {
    let mut out = String::new();
    for (date, slots) in hourly {
        let _ = writeln!(out, "\n{}", date.format("%Y/%m/%d"));
        for (time, entry) in slots {
            let _ = writeln!(
                out,
                "  {time}  {}  降雨 {}  濕度 {}  {}",
                or_dash(entry.temp, "°C"),
                or_dash(entry.rain, "%"),
                or_dash(entry.humidity, "%"),
                entry.weather.as_deref().unwrap_or("-"),
            );
        }
    }
    out
}
