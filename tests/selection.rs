use outfit_advisor::catalog::{Catalog, Category, GarmentRecord, GarmentType, Layer};
use outfit_advisor::forecast::{
    Condition, ConditionFlags, ForecastPeriod, ForecastSummary, TemperatureBand,
};
use outfit_advisor::selection::{CandidateFilter, Engine, Exclusion, SelectionResult};
use outfit_advisor::{recommend, recommend_for_periods, EngineConfig};

use Condition::*;
use TemperatureBand::*;

fn engine() -> Engine {
    Engine::new(Catalog::builtin().expect("builtin catalog"), EngineConfig::default())
}

fn forecast(band: TemperatureBand, conditions: &[Condition], wind: f64) -> ForecastSummary {
    ForecastSummary::new(band, conditions.iter().copied().collect(), wind)
}

fn select(
    engine: &Engine,
    category: Category,
    band: TemperatureBand,
    conditions: &[Condition],
    wind: f64,
) -> SelectionResult {
    engine.select(&forecast(band, conditions, wind), category)
}

fn count_layered(result: &SelectionResult, types: &[GarmentType], layer: Layer) -> usize {
    result
        .selected_items
        .iter()
        .filter(|entry| types.contains(&entry.item.garment_type) && entry.item.layer == layer)
        .count()
}

#[test]
fn hiking_in_cold_rain_wears_rain_shell_and_boots() {
    let engine = engine();
    let result = select(&engine, Category::Hiking, Cold, &[Rainy], 10.0);

    assert_eq!(result.prominent_item_key.as_deref(), Some("jacket-rain-shell"));
    assert_eq!(result.count_of(&[GarmentType::Socks]), 1);
    assert!(result.contains("boots-hiking"));
    assert_eq!(
        result.count_of(&[GarmentType::Boots, GarmentType::Shoes, GarmentType::Sneakers]),
        1
    );
    assert!(result.contains("pants-outer-rain"));
    assert!(result.contains("base-pants-thermal"));
    assert_eq!(result.count_of(&[GarmentType::Umbrella]), 0);
    assert!(result.warnings.is_empty());
}

#[test]
fn casual_hot_sunny_day_needs_no_jacket() {
    let engine = engine();
    let result = select(&engine, Category::Casual, Hot, &[Sunny], 3.0);

    assert!(result.prominent_item_key.is_none());
    assert!(result.contains("shorts-casual"));
    assert!(result.contains("sunglasses"));
    assert!(result.contains("hat-sun"));
    assert!(result.contains("sneakers-casual-light"));
    assert_eq!(result.count_of(&[GarmentType::Pants]), 0);
    assert_eq!(count_layered(&result, &[GarmentType::Jacket, GarmentType::Coat], Layer::Outer), 0);
}

#[test]
fn professional_dress_shirt_brings_hidden_undershirt() {
    let engine = engine();
    let result = select(&engine, Category::Professional, Warm, &[], 5.0);

    assert!(result.contains("shirt-base-professional-light"));
    assert!(result.contains("shirt-base-tee"));
    assert!(result.is_grouped("shirt-base-professional-light"));
    assert!(!result.is_grouped("shirt-base-tee"));
}

#[test]
fn casual_tee_is_grouped_normally() {
    let engine = engine();
    let result = select(&engine, Category::Casual, Warm, &[], 5.0);

    assert!(result.contains("shirt-base-tee"));
    assert!(result.is_grouped("shirt-base-tee"));
}

#[test]
fn umbrella_depends_on_wind_speed() {
    let engine = engine();

    let calm = select(&engine, Category::Casual, Mild, &[Rainy], 10.0);
    assert!(calm.contains("umbrella-compact"));

    let at_limit = select(&engine, Category::Casual, Mild, &[Rainy], 20.0);
    assert!(!at_limit.contains("umbrella-compact"));

    let gusty = select(&engine, Category::Casual, Mild, &[Rainy], 25.0);
    assert!(!gusty.contains("umbrella-compact"));
}

#[test]
fn hikers_never_carry_umbrellas() {
    let engine = engine();
    for band in TemperatureBand::ALL {
        let result = select(&engine, Category::Hiking, band, &[Rainy], 0.0);
        assert_eq!(result.count_of(&[GarmentType::Umbrella]), 0, "{}", band);
    }
}

#[test]
fn wind_without_rain_prefers_windproof_shell() {
    let engine = engine();
    let result = select(&engine, Category::Casual, Crisp, &[Windy], 18.0);

    assert_eq!(result.prominent_item_key.as_deref(), Some("jacket-windbreaker"));
}

#[test]
fn snow_picks_snow_gear_over_warmest_coat() {
    let engine = engine();
    let result = select(&engine, Category::Casual, Frigid, &[Snowy], 5.0);

    assert_eq!(result.prominent_item_key.as_deref(), Some("jacket-snow-shell"));
    assert!(result.contains("boots-insulated"));
    assert!(result.contains("pants-outer-insulated"));
    assert!(result.contains("hat-snow"));
    assert!(result.contains("gloves-heavy"));
    assert!(result.contains("scarf-warm"));
}

#[test]
fn dry_freezing_day_falls_back_to_warmest_coat() {
    let engine = engine();
    let result = select(&engine, Category::Casual, Freezing, &[], 5.0);

    assert_eq!(result.prominent_item_key.as_deref(), Some("coat-parka"));
    assert!(!result.contains("jacket-snow-shell"));
}

#[test]
fn heavy_rain_reaches_for_rain_boots() {
    let engine = engine();
    let light = forecast(Mild, &[Rainy], 5.0);
    let heavy = forecast(Mild, &[Rainy], 5.0).with_heavy_precipitation(true);

    let light = engine.select(&light, Category::Casual);
    let heavy = engine.select(&heavy, Category::Casual);

    assert!(light.contains("sneakers-casual-resistant"));
    assert!(heavy.contains("boots-rain"));
}

#[test]
fn exclusions_veto_jeans_in_rain() {
    let catalog = Catalog::builtin().expect("builtin catalog");
    let exclusions = vec![Exclusion::new("pants-outer-casual-jeans", &[Rainy, Drizzling])];
    let dry = ConditionFlags::new();
    let wet = ConditionFlags::new().with(Drizzling);

    let dry_filter = CandidateFilter::new(&catalog, Category::Casual, Cold, &dry, &exclusions);
    let wet_filter = CandidateFilter::new(&catalog, Category::Casual, Cold, &wet, &exclusions);

    let dry_keys: Vec<&str> = dry_filter
        .candidates(&[GarmentType::Pants], Some(Layer::Outer))
        .iter()
        .map(|candidate| candidate.key)
        .collect();
    let wet_keys: Vec<&str> = wet_filter
        .candidates(&[GarmentType::Pants], Some(Layer::Outer))
        .iter()
        .map(|candidate| candidate.key)
        .collect();

    assert!(dry_keys.contains(&"pants-outer-casual-jeans"));
    assert!(!dry_keys.contains(&"pants-outer-rain"));
    assert!(!wet_keys.contains(&"pants-outer-casual-jeans"));
    assert!(wet_keys.contains(&"pants-outer-rain"));
}

#[test]
fn candidates_are_sorted_warmest_first() {
    let catalog = Catalog::builtin().expect("builtin catalog");
    let flags = ConditionFlags::new();
    let filter = CandidateFilter::new(&catalog, Category::Casual, Cold, &flags, &[]);

    let thermal: Vec<u8> = filter
        .candidates(&[GarmentType::Jacket, GarmentType::Coat], Some(Layer::Outer))
        .iter()
        .map(|candidate| candidate.item.thermal_value)
        .collect();

    assert!(!thermal.is_empty());
    assert!(thermal.windows(2).all(|pair| pair[0] >= pair[1]));
}

#[test]
fn professional_rain_prefers_overcoat_over_warmer_coat() {
    let catalog = Catalog::from_entries(vec![
        (
            "dress-shirt".to_string(),
            GarmentRecord::new("Dress Shirt", GarmentType::Shirt, Layer::Base, &[Category::Professional], &[Mild], 1),
        ),
        (
            "overcoat".to_string(),
            GarmentRecord::new("Overcoat", GarmentType::Coat, Layer::Outer, &[Category::Professional], &[Mild], 1),
        ),
        (
            "wool-coat".to_string(),
            GarmentRecord::new("Wool Coat", GarmentType::Coat, Layer::Outer, &[Category::Professional], &[Mild], 3),
        ),
    ])
    .expect("catalog");
    let mut config = EngineConfig::default();
    config.rules.light_overcoat = "overcoat".to_string();
    let engine = Engine::new(catalog, config);

    let wet = select(&engine, Category::Professional, Mild, &[Rainy], 5.0);
    let dry = select(&engine, Category::Professional, Mild, &[], 5.0);

    assert_eq!(wet.prominent_item_key.as_deref(), Some("overcoat"));
    assert_eq!(dry.prominent_item_key.as_deref(), Some("wool-coat"));
}

#[test]
fn sunny_warm_day_prefers_sun_protective_shirt() {
    let catalog = Catalog::from_entries(vec![
        (
            "flannel".to_string(),
            GarmentRecord::new("Flannel", GarmentType::Shirt, Layer::Base, &[Category::Tourism], &[Warm], 2),
        ),
        (
            "sun-shirt".to_string(),
            GarmentRecord::new("Sun Shirt", GarmentType::Shirt, Layer::Base, &[Category::Tourism], &[Warm], 1)
                .with_sun_protection(),
        ),
    ])
    .expect("catalog");
    let engine = Engine::new(catalog, EngineConfig::default());

    let sunny = select(&engine, Category::Tourism, Warm, &[Sunny], 0.0);
    let cloudy = select(&engine, Category::Tourism, Warm, &[Cloudy], 0.0);

    assert!(sunny.contains("sun-shirt"));
    assert!(!sunny.contains("flannel"));
    assert!(cloudy.contains("flannel"));
}

#[test]
fn sweater_is_prominent_when_no_outer_layer_fits() {
    let catalog = Catalog::from_entries(vec![(
        "cardigan".to_string(),
        GarmentRecord::new("Cardigan", GarmentType::Sweater, Layer::Mid, &[Category::Casual], &[Mild], 2),
    )])
    .expect("catalog");
    let engine = Engine::new(catalog, EngineConfig::default());

    let result = select(&engine, Category::Casual, Mild, &[], 0.0);
    assert_eq!(result.prominent_item_key.as_deref(), Some("cardigan"));
    assert!(!result.is_grouped("cardigan"));
}

#[test]
fn selection_is_deterministic() {
    let engine = engine();
    let summary = forecast(Crisp, &[Drizzling, Windy], 16.0);

    let first = recommend(&engine, summary.clone(), Category::Tourism);
    let second = recommend(&engine, summary, Category::Tourism);
    assert_eq!(first, second);
}

#[test]
fn slots_stay_exclusive_across_every_scenario() {
    let engine = engine();
    let scenarios: [&[Condition]; 6] = [
        &[],
        &[Sunny],
        &[Rainy],
        &[Snowy, Windy],
        &[Thunderstorm, Severe],
        &[Drizzling, Foggy],
    ];

    for category in Category::ALL {
        for band in TemperatureBand::ALL {
            for conditions in scenarios {
                let result = select(&engine, category, band, conditions, 12.0);
                let context = format!("{} {} {:?}", category, band, conditions);

                let visible_shirts = result
                    .selected_items
                    .iter()
                    .filter(|entry| {
                        entry.item.garment_type == GarmentType::Shirt
                            && entry.item.layer == Layer::Base
                            && result.is_grouped(&entry.key)
                    })
                    .count();
                assert!(visible_shirts <= 1, "{}", context);
                assert!(
                    count_layered(&result, &[GarmentType::Jacket, GarmentType::Coat], Layer::Outer) <= 1,
                    "{}",
                    context
                );
                assert!(
                    count_layered(&result, &[GarmentType::Pants, GarmentType::Shorts], Layer::Outer) <= 1,
                    "{}",
                    context
                );
                assert!(
                    result.count_of(&[GarmentType::Boots, GarmentType::Shoes, GarmentType::Sneakers]) <= 1,
                    "{}",
                    context
                );
                assert!(result.count_of(&[GarmentType::Socks]) <= 1, "{}", context);

                let mut keys: Vec<&str> = result.keys().collect();
                let total = keys.len();
                keys.sort_unstable();
                keys.dedup();
                assert_eq!(keys.len(), total, "{}", context);
            }
        }
    }
}

#[test]
fn builtin_catalog_covers_essentials_everywhere() {
    let engine = engine();
    for category in Category::ALL {
        for band in TemperatureBand::ALL {
            let result = select(&engine, category, band, &[], 5.0);
            let context = format!("{} {}", category, band);

            assert!(result.warnings.is_empty(), "{}: {:?}", context, result.warnings);
            assert!(result.count_of(&[GarmentType::Shirt]) >= 1, "{}", context);
            assert_eq!(
                result.count_of(&[GarmentType::Pants, GarmentType::Shorts]),
                1,
                "{}",
                context
            );
            assert_eq!(
                result.count_of(&[GarmentType::Boots, GarmentType::Shoes, GarmentType::Sneakers]),
                1,
                "{}",
                context
            );
        }
    }
}

#[test]
fn prominent_item_is_excluded_from_groups() {
    let engine = engine();
    let result = select(&engine, Category::Casual, Cold, &[], 5.0);

    let prominent = result.prominent().expect("cold weather outer layer");
    assert!(!result.is_grouped(&prominent.key));

    let names: Vec<&str> = result.grouped_items.iter().map(|group| group.name.as_str()).collect();
    assert_eq!(names, vec!["Tops", "Bottoms", "Footwear", "Accessories"]);
    assert!(result.grouped_items.iter().all(|group| !group.items.is_empty()));
}

#[test]
fn raw_periods_drive_a_full_recommendation() {
    let engine = engine();
    let periods = vec![
        ForecastPeriod {
            short_forecast: "Light Rain".to_string(),
            detailed_forecast: "Rain likely, mainly after noon.".to_string(),
            temperature: 40.0,
            temperature_unit: "F".to_string(),
            apparent_temperature_c: None,
            wind_speed: "5 to 10 mph".to_string(),
            precipitation_probability: Some(60.0),
        },
        ForecastPeriod {
            temperature: 30.0,
            temperature_unit: "F".to_string(),
            ..ForecastPeriod::default()
        },
    ];

    let output = recommend_for_periods(&engine, &periods, Category::Hiking)
        .expect("recommendation")
        .expect("non-empty periods");

    assert_eq!(output.primary_condition, "Rainy");
    assert_eq!(output.forecast.temperature_band, Cold);
    assert_eq!(output.selection.prominent_item_key.as_deref(), Some("jacket-rain-shell"));

    assert!(recommend_for_periods(&engine, &[], Category::Hiking)
        .expect("empty")
        .is_none());
}
