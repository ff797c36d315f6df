//! Advice lines derived from forecast values.

use crate::model::Condition;

const HOT_TEMPERATURE_C: f64 = 40.0;
const WINDY_SPEED_MPS: f64 = 10.0;

/// Fallback when no rule applies.
pub const NO_ADVICE: &str = "No advice as of now!!";

/// Build the advice line for one forecast entry.
///
/// Condition-based tips come first, then the temperature rule, then the
/// wind rule. Both thresholds are strict.
pub fn advice_for(temperature_c: f64, wind_speed_mps: f64, conditions: &[Condition]) -> String {
    let mut advice = String::new();

    for condition in conditions {
        if let Some(tip) = condition_tip(&condition.status) {
            advice.push_str(tip);
        }
    }

    if temperature_c > HOT_TEMPERATURE_C {
        advice.push_str("Use sunscreen lotion. ");
    }

    if wind_speed_mps > WINDY_SPEED_MPS {
        advice.push_str("It's too windy, watch out! ");
    }

    if advice.is_empty() {
        NO_ADVICE.to_string()
    } else {
        advice.trim_end().to_string()
    }
}

fn condition_tip(status: &str) -> Option<&'static str> {
    let status = status.to_ascii_lowercase();

    if status.contains("thunder") {
        Some("Don't step out! A storm is brewing! ")
    } else if status.contains("rain") || status.contains("drizzle") {
        Some("Carry an umbrella. ")
    } else if status.contains("snow") || status.contains("sleet") {
        Some("Dress warmly and watch your step. ")
    } else if status.contains("mist") || status.contains("fog") || status.contains("haze") {
        Some("Visibility is low, take care on the road. ")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn condition(status: &str) -> Condition {
        Condition { status: status.to_string(), description: status.to_lowercase() }
    }

    #[test]
    fn calm_weather_has_no_advice() {
        assert_eq!(advice_for(20.0, 3.0, &[condition("Clear")]), NO_ADVICE);
    }

    #[test]
    fn heat_above_forty_suggests_sunscreen() {
        assert_eq!(advice_for(40.5, 3.0, &[]), "Use sunscreen lotion.");
    }

    #[test]
    fn wind_above_ten_warns() {
        assert_eq!(advice_for(20.0, 10.5, &[]), "It's too windy, watch out!");
    }

    #[test]
    fn thresholds_are_strict() {
        assert_eq!(advice_for(40.0, 10.0, &[]), NO_ADVICE);
    }

    #[test]
    fn rain_suggests_an_umbrella() {
        assert_eq!(advice_for(15.0, 3.0, &[condition("Rain")]), "Carry an umbrella.");
        assert_eq!(advice_for(15.0, 3.0, &[condition("Drizzle")]), "Carry an umbrella.");
    }

    #[test]
    fn thunderstorm_warns_to_stay_in() {
        assert_eq!(
            advice_for(15.0, 3.0, &[condition("Thunderstorm")]),
            "Don't step out! A storm is brewing!"
        );
    }

    #[test]
    fn tips_combine_in_a_fixed_order() {
        assert_eq!(
            advice_for(41.0, 12.0, &[condition("Light rain")]),
            "Carry an umbrella. Use sunscreen lotion. It's too windy, watch out!"
        );
    }
}
