use outfit_advisor::forecast::{
    check_wind_speed, parse_wind_speed, primary_condition, primary_condition_label, BandSpan,
    BandTable, Condition, ConditionDetector, ConditionFlags, ConditionKeywords, ForecastPeriod, ForecastProcessor,
    TemperatureBand, TemperatureClassifier, TemperatureUnit,
};
use outfit_advisor::config::Thresholds;
use outfit_advisor::{EngineConfig, EngineError};
use std::str::FromStr;

fn classifier() -> TemperatureClassifier {
    TemperatureClassifier::new(BandTable::default())
}

fn detector() -> ConditionDetector {
    ConditionDetector::new(ConditionKeywords::default(), Thresholds::default())
}

fn period(short: &str, temperature: f64, wind: &str, precipitation: Option<f64>) -> ForecastPeriod {
    ForecastPeriod {
        short_forecast: short.to_string(),
        detailed_forecast: String::new(),
        temperature,
        temperature_unit: "F".to_string(),
        apparent_temperature_c: None,
        wind_speed: wind.to_string(),
        precipitation_probability: precipitation,
    }
}

#[test]
fn classifier_puts_shared_boundary_in_warmer_band() {
    let classifier = classifier();
    let f = TemperatureUnit::Fahrenheit;

    assert_eq!(classifier.classify(45.0, f), TemperatureBand::Crisp);
    assert_eq!(classifier.classify(44.9, f), TemperatureBand::Cold);
}

#[test]
fn classifier_boundaries_resolve_to_exactly_one_band() {
    let classifier = classifier();
    let f = TemperatureUnit::Fahrenheit;
    let cases = [
        (95.0, TemperatureBand::Dangerous),
        (94.9, TemperatureBand::Hot),
        (80.0, TemperatureBand::Hot),
        (79.9, TemperatureBand::Warm),
        (70.0, TemperatureBand::Warm),
        (69.9, TemperatureBand::Mild),
        (58.0, TemperatureBand::Mild),
        (57.9, TemperatureBand::Crisp),
        (32.0, TemperatureBand::Cold),
        (31.9, TemperatureBand::Frigid),
        (20.0, TemperatureBand::Frigid),
        (19.9, TemperatureBand::Freezing),
        (-40.0, TemperatureBand::Freezing),
        (130.0, TemperatureBand::Dangerous),
    ];

    for (value, expected) in cases {
        assert_eq!(classifier.classify(value, f), expected, "{}F", value);
    }
}

#[test]
fn classifier_converts_celsius_input() {
    let classifier = classifier();
    assert_eq!(
        classifier.classify(0.0, TemperatureUnit::Celsius),
        TemperatureBand::Cold
    );
    assert_eq!(
        classifier.classify(-10.0, TemperatureUnit::Celsius),
        TemperatureBand::Freezing
    );
    assert_eq!(
        classifier.classify(30.0, TemperatureUnit::Celsius),
        TemperatureBand::Hot
    );
}

#[test]
fn classifier_falls_back_to_default_band_when_nothing_matches() {
    let classifier = classifier();
    assert_eq!(classifier.default_band(), TemperatureBand::Mild);
    assert_eq!(
        classifier.classify(f64::NAN, TemperatureUnit::Fahrenheit),
        TemperatureBand::Mild
    );

    let sparse = TemperatureClassifier::new(BandTable {
        default_band: TemperatureBand::Crisp,
        rules: Vec::new(),
    });
    assert_eq!(sparse.classify_celsius(21.0), TemperatureBand::Crisp);
}

#[test]
fn unknown_labels_are_errors() {
    assert!(matches!(
        TemperatureBand::from_str("Balmy"),
        Err(EngineError::UnknownBand(_))
    ));
    assert!(matches!(
        TemperatureUnit::from_str("K"),
        Err(EngineError::UnknownUnit(_))
    ));
    assert!(matches!(
        Condition::from_str("humid"),
        Err(EngineError::UnknownCondition(_))
    ));
    assert_eq!(TemperatureBand::from_str("cold").ok(), Some(TemperatureBand::Cold));
    assert_eq!(Condition::from_str("is_rainy").ok(), Some(Condition::Rainy));
}

#[test]
fn severe_thunderstorm_suppresses_rain() {
    let flags = detector().detect(
        "Severe Thunderstorms",
        "Heavy rain expected after midnight",
        5.0,
        0.0,
        TemperatureBand::Warm,
    );

    assert!(flags.is(Condition::Severe));
    assert!(flags.is(Condition::Thunderstorm));
    assert!(!flags.is(Condition::Rainy));
    assert!(!flags.is(Condition::Drizzling));
}

#[test]
fn rain_suppresses_drizzle_and_severe_suppresses_snow() {
    let detector = detector();

    let rain = detector.detect("Rain and drizzle", "", 0.0, 0.0, TemperatureBand::Mild);
    assert!(rain.is(Condition::Rainy));
    assert!(!rain.is(Condition::Drizzling));

    let blizzard = detector.detect("Blizzard", "Heavy snow", 30.0, 0.0, TemperatureBand::Freezing);
    assert!(blizzard.is(Condition::Severe));
    assert!(!blizzard.is(Condition::Snowy));
    assert!(blizzard.is(Condition::Windy));
}

#[test]
fn wind_threshold_sets_windy_without_keywords() {
    let detector = detector();

    let calm = detector.detect("Sunny", "", 14.0, 0.0, TemperatureBand::Warm);
    let gusty = detector.detect("Sunny", "", 15.0, 0.0, TemperatureBand::Warm);

    assert!(!calm.is(Condition::Windy));
    assert!(gusty.is(Condition::Windy));
    assert!(gusty.is(Condition::Sunny));
}

#[test]
fn precipitation_probability_infers_missing_precipitation_flag() {
    let detector = detector();

    let likely = detector.detect("Mostly Cloudy", "", 0.0, 45.0, TemperatureBand::Mild);
    assert!(likely.is(Condition::Drizzling));
    assert!(!likely.is(Condition::Rainy));

    let heavy = detector.detect("Mostly Cloudy", "", 0.0, 80.0, TemperatureBand::Mild);
    assert!(heavy.is(Condition::Rainy));

    let wintry = detector.detect("Cloudy", "chance of snow", 0.0, 30.0, TemperatureBand::Cold);
    assert!(wintry.is(Condition::Snowy));

    let unlikely = detector.detect("Mostly Cloudy", "", 0.0, 20.0, TemperatureBand::Mild);
    assert!(!unlikely.any(&Condition::PRECIPITATION));
}

#[test]
fn dangerous_band_sets_scorching() {
    let flags = detector().detect("Hot", "", 0.0, 0.0, TemperatureBand::Dangerous);
    assert!(flags.is(Condition::Scorching));
    assert_eq!(primary_condition(&flags), Some(Condition::Scorching));
}

#[test]
fn text_without_known_keywords_leaves_flags_empty() {
    let flags = detector().detect("Patchy conditions", "", 0.0, 0.0, TemperatureBand::Mild);
    assert!(flags.is_empty());
    assert_eq!(primary_condition_label(&flags), "Variable");
}

#[test]
fn primary_condition_follows_fixed_priority() {
    let flags = ConditionFlags::new()
        .with(Condition::Sunny)
        .with(Condition::Windy)
        .with(Condition::Drizzling);
    assert_eq!(primary_condition_label(&flags), "Drizzling");

    let flags = ConditionFlags::new()
        .with(Condition::Windy)
        .with(Condition::Scorching);
    assert_eq!(primary_condition_label(&flags), "Scorching");

    let flags = ConditionFlags::new()
        .with(Condition::Cloudy)
        .with(Condition::Foggy);
    assert_eq!(primary_condition_label(&flags), "Foggy");
}

#[test]
fn special_condition_keywords_map_through_flag_names() {
    let flags = ConditionFlags::new().with(Condition::Rainy);
    assert!(flags.matches_keywords(&["rainy".to_string()]));
    assert!(!flags.matches_keywords(&["rain".to_string()]));
    assert!(!flags.matches_keywords(&["cold".to_string()]));
    assert_eq!(Condition::Rainy.flag_name(), "is_rainy");
}

#[test]
fn condition_flags_read_from_json_map() {
    let flags: ConditionFlags =
        serde_json::from_str(r#"{"rainy": true, "windy": false, "sunny": true}"#)
            .expect("flags json");
    assert!(flags.is(Condition::Rainy));
    assert!(flags.is(Condition::Sunny));
    assert!(!flags.is(Condition::Windy));
}

#[test]
fn wind_speed_uses_first_number() {
    assert!((parse_wind_speed("10 mph") - 10.0).abs() < 1e-6);
    assert!((parse_wind_speed("5 to 15 mph") - 5.0).abs() < 1e-6);
    assert!((parse_wind_speed("calm") - 0.0).abs() < 1e-6);
}

#[test]
fn wind_speed_must_be_non_negative() {
    assert!((check_wind_speed(0.0).expect("calm") - 0.0).abs() < 1e-6);
    assert!((check_wind_speed(12.5).expect("breezy") - 12.5).abs() < 1e-6);
    assert!(matches!(
        check_wind_speed(-1.0),
        Err(EngineError::InvalidWindSpeed(_))
    ));
    assert!(check_wind_speed(f64::NAN).is_err());
}

#[test]
fn summarize_marks_heavy_precipitation_only_with_precipitation_flag() {
    let processor = ForecastProcessor::new(&EngineConfig::default());

    let storm = processor
        .summarize(&period("Rain Showers", 50.0, "10 mph", Some(85.0)))
        .expect("summary");
    assert_eq!(storm.temperature_band, TemperatureBand::Crisp);
    assert!(storm.conditions.is(Condition::Rainy));
    assert!(storm.is_heavy_precipitation);
    assert!((storm.wind_speed_mph - 10.0).abs() < 1e-6);

    let foggy = processor
        .summarize(&period("Dense Fog", 50.0, "3 mph", Some(20.0)))
        .expect("summary");
    assert!(!foggy.is_heavy_precipitation);
    assert_eq!(foggy.primary_condition(), "Foggy");
}

#[test]
fn summarize_rejects_unknown_unit() {
    let processor = ForecastProcessor::new(&EngineConfig::default());
    let mut raw = period("Sunny", 70.0, "5 mph", None);
    raw.temperature_unit = "K".to_string();

    assert!(matches!(
        processor.summarize(&raw),
        Err(EngineError::UnknownUnit(_))
    ));
}

#[test]
fn window_summary_tracks_band_span() {
    let processor = ForecastProcessor::new(&EngineConfig::default());
    let periods = vec![
        period("Sunny", 62.0, "5 mph", None),
        period("Sunny", 75.0, "5 mph", None),
        period("Clear", 40.0, "5 mph", None),
    ];

    let summary = processor
        .summarize_window(&periods)
        .expect("summary")
        .expect("non-empty");
    assert_eq!(summary.temperature_band, TemperatureBand::Mild);
    assert_eq!(
        summary.span(),
        BandSpan {
            low: TemperatureBand::Cold,
            high: TemperatureBand::Warm,
        }
    );

    assert!(processor.summarize_window(&[]).expect("empty").is_none());
}

#[test]
fn simulated_summary_derives_heavy_flag() {
    let processor = ForecastProcessor::new(&EngineConfig::default());
    let flags = ConditionFlags::new().with(Condition::Snowy);

    let heavy = processor.simulate(TemperatureBand::Cold, flags.clone(), 5.0, 75.0);
    let light = processor.simulate(TemperatureBand::Cold, flags, 5.0, 50.0);
    let dry = processor.simulate(TemperatureBand::Cold, ConditionFlags::new(), 5.0, 90.0);

    assert!(heavy.is_heavy_precipitation);
    assert!(!light.is_heavy_precipitation);
    assert!(!dry.is_heavy_precipitation);
}
