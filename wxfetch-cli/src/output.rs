//! Human-readable report followed by the delimited strings.

use std::{fmt::Display, io::Write};

use wxfetch_core::{
    CurrentObservation, ForecastPeriod, HazardAlert, RunReport, build_condition_string,
    build_forecast_string,
};

/// Write the whole report for one run.
///
/// The forecast string is printed last on its own even though the condition
/// string already ends with it; downstream scripts read either line.
pub fn render(report: &RunReport, forecast_only: bool, out: &mut impl Write) -> anyhow::Result<()> {
    for line in &report.diagnostics {
        writeln!(out, "{line}")?;
    }

    writeln!(out, "Current Hazards: {}", hazard_summary(report.hazards.as_deref()))?;

    let periods = report
        .forecast
        .as_ref()
        .map(|f| f.periods.as_slice())
        .unwrap_or_default();

    if periods.is_empty() {
        writeln!(out, "No weather data found.")?;
    } else if !forecast_only {
        let update_time = report.forecast.as_ref().and_then(|f| f.update_time.as_deref());
        writeln!(out, "Update Time: {}", opt(update_time))?;
        writeln!(out, "Forecast ZoneUrl: {}", opt(report.context.forecast_zone_url.as_deref()))?;
        writeln!(out, "Forecast Zone: {}", opt(report.context.forecast_zone.as_deref()))?;
        writeln!(out, "Weather Forecast:")?;
        for period in periods {
            write_period(out, period)?;
        }
    }

    match &report.observation {
        Some(obs) => {
            let condition = build_condition_string(obs, &report.context, periods)?;
            if !forecast_only {
                write_observation(out, obs)?;
            }
            writeln!(out, "{condition}")?;
        }
        None => writeln!(out, "No current conditions data found for the specified airport.")?,
    }

    writeln!(out, "{}", build_forecast_string(periods))?;
    Ok(())
}

fn write_period(out: &mut impl Write, period: &ForecastPeriod) -> std::io::Result<()> {
    writeln!(out, "Number: {}", opt(period.number))?;
    writeln!(out, "Name: {}", opt(period.name.as_deref()))?;
    writeln!(out, "Start Time: {}", opt(period.start_time.as_deref()))?;
    writeln!(out, "End Time: {}", opt(period.end_time.as_deref()))?;
    let is_daytime = period.is_daytime.map(|day| if day { "True" } else { "False" });
    writeln!(out, "Is Daytime: {}", opt(is_daytime))?;
    writeln!(
        out,
        "Temperature: {} {}",
        period.temperature,
        opt(period.temperature_unit.as_deref())
    )?;
    writeln!(out, "Temperature Trend: {}", opt(period.temperature_trend.as_deref()))?;
    writeln!(out, "Probability of Precipitation: {}", opt(period.precip_percent))?;
    writeln!(out, "Wind Speed: {}", opt(period.wind_speed.as_deref()))?;
    writeln!(out, "Wind Direction: {}", opt(period.wind_direction.as_deref()))?;
    writeln!(out, "Icon: {}", opt(period.icon.as_deref()))?;
    writeln!(out, "Detailed Forecast: {}", opt(period.detailed_forecast.as_deref()))?;
    writeln!(out)
}

fn write_observation(out: &mut impl Write, obs: &CurrentObservation) -> std::io::Result<()> {
    writeln!(out, "current_conditions:")?;
    writeln!(out, "Location: {}", opt(obs.location.as_deref()))?;
    writeln!(out, "Weather: {}", opt(obs.weather.as_deref()))?;
    writeln!(out, "Temperature: {}", opt(obs.temperature_string.as_deref()))?;
    writeln!(out, "Wind: {}", opt(obs.wind_string.as_deref()))?;
    writeln!(out, "Pressure: {}", opt(obs.pressure_string.as_deref()))?;

    for (name, value) in obs.fields() {
        writeln!(out, "{}: {}", title_case(name), opt(value))?;
    }
    Ok(())
}

/// `None`, or `[event: headline, ...]`.
fn hazard_summary(hazards: Option<&[HazardAlert]>) -> String {
    let Some(alerts) = hazards else {
        return "None".to_string();
    };

    let items: Vec<String> = alerts
        .iter()
        .map(|alert| {
            let event = alert.event.as_deref().unwrap_or("Unknown event");
            match alert.headline.as_deref() {
                Some(headline) => format!("{event}: {headline}"),
                None => event.to_string(),
            }
        })
        .collect();

    format!("[{}]", items.join(", "))
}

fn opt<T: Display>(value: Option<T>) -> String {
    value.map_or_else(|| "None".to_string(), |v| v.to_string())
}

/// `station_id` -> `Station Id`
fn title_case(name: &str) -> String {
    name.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use wxfetch_core::{Forecast, ForecastContext};

    fn period(name: &str, temp: f64, detailed: &str) -> ForecastPeriod {
        ForecastPeriod {
            number: Some(1),
            name: Some(name.into()),
            start_time: Some("2026-10-16T06:00:00-04:00".into()),
            end_time: Some("2026-10-16T18:00:00-04:00".into()),
            is_daytime: Some(true),
            temperature: temp,
            temperature_unit: Some("F".into()),
            temperature_trend: None,
            precip_percent: Some(20.0),
            wind_speed: Some("5 to 10 mph".into()),
            wind_direction: Some("NW".into()),
            icon: None,
            short_forecast: Some("Sunny".into()),
            detailed_forecast: Some(detailed.into()),
        }
    }

    fn observation() -> CurrentObservation {
        CurrentObservation {
            location: Some("Central Park".into()),
            station_id: Some("KNYC".into()),
            weather: Some("Fair".into()),
            temp_f: Some("64.0".into()),
            temp_c: Some("17.8".into()),
            relative_humidity: Some("50".into()),
            wind_mph: Some("5.8".into()),
            dewpoint_f: Some("45.0".into()),
            ..CurrentObservation::default()
        }
    }

    fn report() -> RunReport {
        RunReport {
            diagnostics: vec![],
            context: ForecastContext::new(
                Some("New York".into()),
                Some("NY".into()),
                Some("https://api.weather.gov/zones/forecast/NYZ072".into()),
            ),
            forecast: Some(Forecast {
                update_time: Some("2026-10-16T10:00:00+00:00".into()),
                periods: vec![period("Today", 68.0, "Sunny, with a high near 68.")],
            }),
            observation: Some(observation()),
            hazards: Some(vec![]),
        }
    }

    fn render_to_string(report: &RunReport, forecast_only: bool) -> String {
        let mut buf = Vec::new();
        render(report, forecast_only, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn forecast_only_prints_hazards_and_strings() {
        let text = render_to_string(&report(), true);
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Current Hazards: []");
        assert!(lines[1].starts_with("loc:New York,NY;temp:64;dew:45;cond:Fair;speed:5.8;humid:50;"));
        assert!(lines[1].ends_with(":FCAST:;Today:Sunny__,.,__High:68__,.,__Sunny, with a high near 68."));
        assert_eq!(lines[2], "Today:Sunny__,.,__High:68__,.,__Sunny, with a high near 68.");
    }

    #[test]
    fn verbose_output_sections_in_order() {
        let text = render_to_string(&report(), false);

        let order = [
            "Current Hazards:",
            "Update Time: 2026-10-16T10:00:00+00:00",
            "Forecast ZoneUrl: https://api.weather.gov/zones/forecast/NYZ072",
            "Forecast Zone: NYZ072",
            "Weather Forecast:",
            "Is Daytime: True",
            "Temperature: 68 F",
            "Probability of Precipitation: 20",
            "current_conditions:",
            "Station Id: KNYC",
            "Ob Url: None",
            "loc:New York,NY",
        ];
        let mut from = 0;
        for needle in order {
            let at = text[from..].find(needle).unwrap_or_else(|| panic!("missing {needle}"));
            from += at + needle.len();
        }
    }

    #[test]
    fn missing_data_messages() {
        let report = RunReport {
            diagnostics: vec!["Unable to retrieve latitude and longitude.".into()],
            ..RunReport::default()
        };
        let text = render_to_string(&report, false);

        assert_eq!(
            text,
            "Unable to retrieve latitude and longitude.\n\
             Current Hazards: None\n\
             No weather data found.\n\
             No current conditions data found for the specified airport.\n\
             \n"
        );
    }

    #[test]
    fn condition_failure_is_an_error() {
        let mut report = report();
        report.observation = Some(CurrentObservation { temp_f: None, ..observation() });

        let mut buf = Vec::new();
        let err = render(&report, true, &mut buf).unwrap_err();
        assert_eq!(err.to_string(), "observation field 'temp_f' is missing");
        assert!(String::from_utf8(buf).unwrap().starts_with("Current Hazards: []"));
    }

    #[test]
    fn hazard_summary_lists_events() {
        let alerts = [
            HazardAlert {
                event: Some("Wind Advisory".into()),
                headline: Some("Wind Advisory until 6 PM".into()),
                ..HazardAlert::default()
            },
            HazardAlert { event: Some("Flood Watch".into()), ..HazardAlert::default() },
        ];
        assert_eq!(
            hazard_summary(Some(&alerts)),
            "[Wind Advisory: Wind Advisory until 6 PM, Flood Watch]"
        );
        assert_eq!(hazard_summary(None), "None");
    }

    #[test]
    fn title_case_field_names() {
        assert_eq!(title_case("station_id"), "Station Id");
        assert_eq!(title_case("icon_url_base"), "Icon Url Base");
        assert_eq!(title_case("location"), "Location");
    }
}
