//! Plain-text rendering of the shared weather state.

use std::fmt::Write as _;

use cityweather_core::{Condition, WeatherReport};

/// Shown in place of the table while no lookup has succeeded.
pub const EMPTY_STATE_PROMPT: &str = "Enter a city to get weather details.";

/// Render the result area: the placeholder prompt, or the report as a
/// day-by-day table.
pub fn render(weather_data: Option<&WeatherReport>) -> String {
    match weather_data {
        None => EMPTY_STATE_PROMPT.to_string(),
        Some(report) => render_report(report),
    }
}

fn render_report(report: &WeatherReport) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Weather for {} (via {}, fetched {})",
        report.city,
        report.provider,
        report.fetched_at.format("%Y-%m-%d %H:%M UTC"),
    );

    for day in &report.days {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", day.date.format("%A, %d %B %Y"));
        let _ = writeln!(out, "  {:<6}{:>5}  {:<30}{}", "Time", "Temp", "Conditions", "Advice");

        for entry in &day.entries {
            let time = entry.time.format("%H:%M").to_string();
            let temp = format!("{:.0}°", entry.temperature_c);
            let conditions = describe_conditions(&entry.conditions);

            let _ = writeln!(out, "  {time:<6}{temp:>5}  {conditions:<30}{}", entry.advice);
        }
    }

    out
}

fn describe_conditions(conditions: &[Condition]) -> String {
    if conditions.is_empty() {
        return "-".to_string();
    }

    conditions
        .iter()
        .map(|c| {
            if c.status.eq_ignore_ascii_case(&c.description) {
                c.description.clone()
            } else {
                format!("{} ({})", c.description, c.status)
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
    use cityweather_core::{DayForecast, ForecastEntry};

    fn sample_report() -> WeatherReport {
        let entry = |h, temp, status: &str, description: &str, advice: &str| ForecastEntry {
            time: NaiveTime::from_hms_opt(h, 0, 0).unwrap(),
            temperature_c: temp,
            conditions: vec![Condition {
                status: status.to_string(),
                description: description.to_string(),
            }],
            advice: advice.to_string(),
        };

        WeatherReport {
            provider: "openweather".to_string(),
            city: "Kyiv, UA".to_string(),
            fetched_at: Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
            days: vec![
                DayForecast {
                    date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                    entries: vec![entry(21, 4.2, "Rain", "light rain", "Carry an umbrella.")],
                },
                DayForecast {
                    date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
                    entries: vec![entry(0, 2.0, "Snow", "light snow", "No advice as of now!!")],
                },
            ],
        }
    }

    #[test]
    fn nothing_renders_the_empty_state_prompt() {
        assert_eq!(render(None), EMPTY_STATE_PROMPT);
    }

    #[test]
    fn report_renders_a_day_by_day_table() {
        let text = render(Some(&sample_report()));

        assert!(text.contains("Weather for Kyiv, UA (via openweather, fetched 2024-01-01 12:00 UTC)"));
        assert!(text.contains("Monday, 01 January 2024"));
        assert!(text.contains("Tuesday, 02 January 2024"));
        assert!(text.contains("21:00"));
        assert!(text.contains("4°"));
        assert!(text.contains("light rain (Rain)"));
        assert!(text.contains("Carry an umbrella."));
        assert!(!text.contains(EMPTY_STATE_PROMPT));
    }

    #[test]
    fn identical_status_and_description_collapse() {
        assert_eq!(
            describe_conditions(&[Condition {
                status: "Sunny".to_string(),
                description: "Sunny".to_string(),
            }]),
            "Sunny"
        );
    }

    #[test]
    fn missing_conditions_render_a_dash() {
        assert_eq!(describe_conditions(&[]), "-");
    }
}
