//! Everything the assistant says.

use chrono::NaiveDate;
use tianqi_weather::{weekday_name, WeatherSummary};

use crate::resolver::date_examples;

/// Rain probability at which the report tells the user to take an umbrella
pub const UMBRELLA_THRESHOLD: u8 = 70;
/// Rain probability at which the report suggests rain gear
pub const RAIN_GEAR_THRESHOLD: u8 = 40;

fn ymd(date: NaiveDate) -> String {
    date.format("%Y/%m/%d").to_string()
}

pub fn greeting(today: NaiveDate) -> String {
    format!(
        "你好！我是天氣小助手 🌤️\n\n請問你想查詢哪一天的台北天氣？\n\n（例如：{}）",
        date_examples(today)
    )
}

pub fn ask_confirm(date: NaiveDate) -> String {
    format!(
        "你想要查詢 **{}** 的天氣對嗎？\n\n（請回答「是」或「不是」）",
        ymd(date)
    )
}

pub fn restate(today: NaiveDate) -> String {
    format!(
        "好的，請重新告訴我你想查詢的日期。\n\n（例如：{}）",
        date_examples(today)
    )
}

pub fn be_clear() -> String {
    "到底是「是」還是「不是」？請講清楚一點。".to_string()
}

pub fn no_data(date: NaiveDate) -> String {
    format!(
        "抱歉，我找不到 {} 的天氣資料。\n\n可能是這個日期超出預報範圍（通常只有未來 7 天的資料）。",
        ymd(date)
    )
}

pub fn confirm_nag() -> String {
    "請回答「是」或「不是」，或者直接告訴我新的日期。".to_string()
}

pub fn confirm_escalated() -> String {
    "叫你選個「是」或「不是」很難嗎？".to_string()
}

pub fn date_nag(today: NaiveDate) -> String {
    let examples = date_examples(today);
    let list: Vec<String> = examples.split('、').map(|e| format!("- {e}")).collect();
    format!(
        "我找不到你要查詢的日期 🤔\n\n請給我一個日期，例如：\n{}",
        list.join("\n")
    )
}

pub fn date_escalated() -> String {
    "我真的需要一個日期才能查天氣喔！".to_string()
}

/// Advisory line for a rain probability, if any.
pub fn rain_advisory(rain_probability: u8) -> Option<&'static str> {
    if rain_probability >= UMBRELLA_THRESHOLD {
        Some("⚠️ **降雨機率高，記得帶傘！**")
    } else if rain_probability >= RAIN_GEAR_THRESHOLD {
        Some("💡 建議攜帶雨具以防萬一。")
    } else {
        None
    }
}

/// Markdown weather report for one day.
pub fn weather_report(summary: &WeatherSummary) -> String {
    let date = summary.date;
    let mut report = format!(
        "### {} {} ({}) 台北天氣\n\n\
         | 項目 | 資訊 |\n\
         |------|------|\n\
         | 🌡️ 溫度 | {}°C ~ {}°C |\n\
         | 🌧️ 降雨機率 | {}% |\n\
         | 💧 平均濕度 | {}% |\n\
         | 🌤️ 天氣狀況 | {} |\n",
        summary.condition().emoji(),
        ymd(date),
        weekday_name(date),
        summary.min_temp,
        summary.max_temp,
        summary.rain_probability,
        summary.average_humidity,
        summary.description,
    );

    if let Some(advisory) = rain_advisory(summary.rain_probability) {
        report.push('\n');
        report.push_str(advisory);
        report.push('\n');
    }

    report.push_str("\n---\n還想查詢其他日期嗎？直接告訴我日期就好！");
    report
}
