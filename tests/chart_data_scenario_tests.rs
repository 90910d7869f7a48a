use bs_history::api::{ChartData, ChartDataConfig, ChartRequest, LinePoint, MinMaxBand};
use bs_history::core::{BloodSugarType, BloodSugarUnit, Reading, ReadingCollection};
use chrono::{NaiveDate, NaiveDateTime};

fn at(year: i32, month: u32, day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, 0, 0))
        .expect("valid timestamp")
}

fn reading(
    subtype: BloodSugarType,
    value: &str,
    unit: BloodSugarUnit,
    when: NaiveDateTime,
) -> Reading {
    Reading::new(subtype, value, unit, when).expect("valid reading")
}

fn fasting(value: &str, when: NaiveDateTime) -> Reading {
    reading(BloodSugarType::Fasting, value, BloodSugarUnit::MgDl, when)
}

#[test]
fn march_fasting_scenario_buckets_and_bands() {
    let readings = ReadingCollection::new(vec![
        fasting("95", at(2024, 3, 5, 7)),
        fasting("130", at(2024, 3, 5, 20)),
        fasting("80", at(2024, 3, 20, 7)),
    ]);
    let request =
        ChartRequest::single_month(BloodSugarType::Fasting, 2, 2024, readings).expect("request");
    let data = ChartData::new(&request).expect("chart data");

    assert_eq!(data.axis().len(), 31);
    assert_eq!(data.title(), "March 2024");

    let day5 = data.bucket_at(4).expect("bucket for day 5");
    assert_eq!(day5.min().map(Reading::value), Some(95.0));
    assert_eq!(day5.max().map(Reading::value), Some(130.0));

    let day20 = data.bucket_at(19).expect("bucket for day 20");
    assert_eq!(day20.min().map(Reading::value), Some(80.0));
    assert_eq!(day20.max().map(Reading::value), Some(80.0));

    assert_eq!(
        data.min_max_bands(),
        vec![MinMaxBand {
            index: 4,
            min: 95.0,
            max: 130.0
        }]
    );
    assert_eq!(data.overall_min(), Some(80.0));
    assert_eq!(data.overall_max(), Some(130.0));
    assert_eq!(data.scatter_points().len(), 3);
    assert!(data.line_series().is_empty());
    assert_eq!(data.dropped_reading_count(), 0);
}

#[test]
fn empty_subtype_yields_no_aggregates_and_no_navigation() {
    let readings = ReadingCollection::new(vec![reading(
        BloodSugarType::Hemoglobic,
        "6.1",
        BloodSugarUnit::Percent,
        at(2023, 6, 1, 9),
    )]);
    let request =
        ChartRequest::single_month(BloodSugarType::Fasting, 5, 2023, readings).expect("request");
    let data = ChartData::new(&request).expect("chart data");

    assert!(!data.has_previous_period());
    assert!(!data.has_next_period());
    assert_eq!(data.overall_min(), None);
    assert_eq!(data.overall_max(), None);
    assert!(data.scatter_points().is_empty());
    assert!(data.min_max_bands().is_empty());
    assert_eq!(data.buckets().count(), 0);
    assert!(data.has_hemoglobic_readings());
    assert!(!data.has_fasting_readings());
}

#[test]
fn hemoglobic_year_view_draws_one_line_point() {
    let readings = ReadingCollection::new(vec![reading(
        BloodSugarType::Hemoglobic,
        "8.2",
        BloodSugarUnit::Percent,
        at(2023, 9, 14, 10),
    )]);
    let request = ChartRequest::hemoglobic(2023, readings);
    let data = ChartData::new(&request).expect("chart data");

    assert_eq!(data.axis().len(), 12);
    assert_eq!(data.title(), "2023");

    let points = data.scatter_points();
    assert_eq!(points.len(), 1);
    assert!(points[0].is_out_of_range);
    assert_eq!(points[0].index, 8);

    assert_eq!(
        data.line_series(),
        vec![LinePoint {
            index: 8,
            value: 8.2
        }]
    );
}

#[test]
fn hemoglobic_line_uses_latest_result_per_month() {
    let readings = ReadingCollection::new(vec![
        reading(
            BloodSugarType::Hemoglobic,
            "7.9",
            BloodSugarUnit::Percent,
            at(2023, 2, 20, 10),
        ),
        reading(
            BloodSugarType::Hemoglobic,
            "7.1",
            BloodSugarUnit::Percent,
            at(2023, 2, 2, 10),
        ),
        reading(
            BloodSugarType::Hemoglobic,
            "6.4",
            BloodSugarUnit::Percent,
            at(2023, 11, 2, 10),
        ),
        reading(
            BloodSugarType::Hemoglobic,
            "9.0",
            BloodSugarUnit::Percent,
            at(2022, 11, 2, 10),
        ),
    ]);
    let request = ChartRequest::hemoglobic(2023, readings);
    let data = ChartData::new(&request).expect("chart data");

    assert_eq!(
        data.line_series(),
        vec![
            LinePoint {
                index: 1,
                value: 7.9
            },
            LinePoint {
                index: 10,
                value: 6.4
            },
        ]
    );
    assert!(data.has_previous_period());
    assert!(!data.has_next_period());
}

#[test]
fn after_eating_view_groups_random_and_post_prandial() {
    let readings = ReadingCollection::new(vec![
        reading(
            BloodSugarType::Random,
            "150",
            BloodSugarUnit::MgDl,
            at(2024, 3, 1, 12),
        ),
        reading(
            BloodSugarType::PostPrandial,
            "210",
            BloodSugarUnit::MgDl,
            at(2024, 3, 1, 14),
        ),
        fasting("99", at(2024, 3, 1, 7)),
        reading(
            BloodSugarType::Random,
            "140",
            BloodSugarUnit::MgDl,
            at(2024, 4, 1, 12),
        ),
    ]);
    let request = ChartRequest::single_month(BloodSugarType::PostPrandial, 2, 2024, readings)
        .expect("request");
    let data = ChartData::new(&request).expect("chart data");

    let points = data.scatter_points();
    assert_eq!(points.len(), 2);
    assert_eq!(points[0].value, 150.0);
    assert!(!points[0].is_out_of_range);
    assert_eq!(points[1].value, 210.0);
    assert!(points[1].is_out_of_range);
    assert_eq!(
        data.min_max_bands(),
        vec![MinMaxBand {
            index: 0,
            min: 150.0,
            max: 210.0
        }]
    );
}

#[test]
fn domain_keeps_threshold_visible_when_data_is_in_range() {
    let readings = ReadingCollection::new(vec![
        fasting("95", at(2024, 3, 5, 7)),
        fasting("100", at(2024, 3, 6, 7)),
    ]);
    let request =
        ChartRequest::single_month(BloodSugarType::Fasting, 2, 2024, readings).expect("request");
    let data = ChartData::new(&request).expect("chart data");

    // high 126 + 12.6 headroom, low 70 - 7 headroom
    assert!((data.domain_ceiling() - 138.6).abs() <= 1e-9);
    assert!((data.domain_floor() - 63.0).abs() <= 1e-9);
}

#[test]
fn domain_extends_past_threshold_for_outlying_data() {
    let readings = ReadingCollection::new(vec![
        fasting("320", at(2024, 3, 5, 7)),
        fasting("55", at(2024, 3, 6, 7)),
    ]);
    let request =
        ChartRequest::single_month(BloodSugarType::Fasting, 2, 2024, readings).expect("request");
    let data = ChartData::new(&request).expect("chart data");

    assert!((data.domain_ceiling() - (320.0 + 12.6)).abs() <= 1e-9);
    assert!((data.domain_floor() - (55.0 - 7.0)).abs() <= 1e-9);
    assert!(data.scatter_points().iter().all(|point| point.shows_warning));
}

#[test]
fn empty_chart_domain_falls_back_to_thresholds() {
    let request = ChartRequest::hemoglobic(2023, ReadingCollection::default());
    let data = ChartData::new(&request).expect("chart data");

    assert!((data.domain_ceiling() - 7.7).abs() <= 1e-9);
    assert!((data.domain_floor() - 6.3).abs() <= 1e-9);
}

#[test]
fn mmol_display_unit_rescales_domain_thresholds() {
    let readings = ReadingCollection::new(vec![
        reading(
            BloodSugarType::Random,
            "12.5",
            BloodSugarUnit::MmolL,
            at(2024, 3, 5, 13),
        ),
        reading(
            BloodSugarType::Random,
            "6.0",
            BloodSugarUnit::MmolL,
            at(2024, 3, 5, 18),
        ),
    ]);
    let request =
        ChartRequest::single_month(BloodSugarType::Random, 2, 2024, readings).expect("request");
    let config = ChartDataConfig::default().with_display_unit(BloodSugarUnit::MmolL);
    let data = ChartData::with_config(&request, config).expect("chart data");

    let high = 200.0 / 18.0;
    assert!((data.thresholds().high - high).abs() <= 1e-9);
    assert!((data.domain_ceiling() - (12.5 + high * 0.1)).abs() <= 1e-9);

    let points = data.scatter_points();
    assert!(points[0].is_out_of_range);
    assert!(!points[1].is_out_of_range);
}

#[test]
fn mmol_readings_are_plotted_in_default_display_unit() {
    let readings = ReadingCollection::new(vec![
        reading(
            BloodSugarType::Random,
            "12.5",
            BloodSugarUnit::MmolL,
            at(2024, 3, 5, 13),
        ),
        reading(
            BloodSugarType::Random,
            "6.0",
            BloodSugarUnit::MmolL,
            at(2024, 3, 5, 18),
        ),
    ]);
    let request =
        ChartRequest::single_month(BloodSugarType::Random, 2, 2024, readings).expect("request");
    let data = ChartData::new(&request).expect("chart data");

    assert_eq!(data.thresholds().high, 200.0);
    assert_eq!(data.overall_max(), Some(225.0));
    assert_eq!(data.overall_min(), Some(108.0));
    // data max 225 above the 200 threshold, plus 20 headroom
    assert!((data.domain_ceiling() - 245.0).abs() <= 1e-9);
    assert!((data.domain_floor() - 63.0).abs() <= 1e-9);

    let points = data.scatter_points();
    assert_eq!(points[0].value, 225.0);
    assert!(points[0].is_out_of_range);
    assert_eq!(points[1].value, 108.0);
    assert!(!points[1].is_out_of_range);
    assert_eq!(
        data.min_max_bands(),
        vec![MinMaxBand {
            index: 4,
            min: 108.0,
            max: 225.0
        }]
    );
}

#[test]
fn mixed_unit_bucket_compares_in_display_unit() {
    let mg = reading(
        BloodSugarType::Random,
        "150",
        BloodSugarUnit::MgDl,
        at(2024, 3, 5, 13),
    );
    let mmol = reading(
        BloodSugarType::PostPrandial,
        "6",
        BloodSugarUnit::MmolL,
        at(2024, 3, 5, 18),
    );
    let request = ChartRequest::single_month(
        BloodSugarType::Random,
        2,
        2024,
        ReadingCollection::new(vec![mg, mmol]),
    )
    .expect("request");
    let data = ChartData::new(&request).expect("chart data");

    let bucket = data.bucket_at(4).expect("bucket for day 5");
    assert_eq!(bucket.min().map(Reading::unit), Some(BloodSugarUnit::MmolL));
    assert_eq!(bucket.max().map(Reading::unit), Some(BloodSugarUnit::MgDl));
    assert_eq!(
        data.min_max_bands(),
        vec![MinMaxBand {
            index: 4,
            min: 108.0,
            max: 150.0
        }]
    );
}

#[test]
fn axis_labels_group_days_of_one_month() {
    let request = ChartRequest::single_month(
        BloodSugarType::Fasting,
        1,
        2023,
        ReadingCollection::default(),
    )
    .expect("request");
    let data = ChartData::new(&request).expect("chart data");

    assert_eq!(data.index_values(), (0..28).collect::<Vec<_>>());
    let labels = data.axis_labels();
    assert_eq!(labels.len(), 1);
    assert_eq!(labels[0].primary, "Feb");
    assert_eq!(labels[0].span, 28);
    assert_eq!(data.bucket_labels().len(), 28);
}
