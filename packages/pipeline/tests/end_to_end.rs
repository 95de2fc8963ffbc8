use std::collections::BTreeSet;

use exposure_pipeline::{HostNationPartition, PipelineError, PipelineOptions, run};
use exposure_pipeline_models::AdjustedRow;
use exposure_source::progress::null_progress;
use exposure_source::reader::read_extract_from;
use exposure_source::registry::default_extract;

const HEADER: &str = "date_time_occ,ADM3NAME,type\n";

fn run_csv(body: &str, options: &PipelineOptions) -> Result<Vec<AdjustedRow>, PipelineError> {
    let def = default_extract();
    let csv = format!("{HEADER}{body}");
    let records = read_extract_from(csv.as_bytes(), &def)?;
    Ok(run(&records, &def, options, &null_progress())?.rows)
}

fn find<'a>(rows: &'a [AdjustedRow], locality: &str, week: &str) -> &'a AdjustedRow {
    rows.iter()
        .find(|r| r.locality == locality && r.year_week.to_string() == week)
        .unwrap_or_else(|| panic!("no row for {locality} {week}"))
}

fn assert_close(actual: f64, expected: f64) {
    assert!((actual - expected).abs() < 1e-12, "{actual} != {expected}");
}

#[test]
fn single_attack_decays_over_the_trailing_window() {
    let rows = run_csv(
        "2004-04-05 10:00:00,Fallujah,Enemy Action\n\
         2004-05-20 09:00:00,Ramadi,Criminal Event\n",
        &PipelineOptions::default(),
    )
    .unwrap();

    assert_close(find(&rows, "Fallujah", "2004-14").adjusted.enemy_action, 1.0 / 7.0);
    assert_close(find(&rows, "Fallujah", "2004-15").adjusted.enemy_action, 1.0 / 14.0);
    assert_close(find(&rows, "Fallujah", "2004-16").adjusted.enemy_action, 1.0 / 21.0);
    assert_close(find(&rows, "Fallujah", "2004-17").adjusted.enemy_action, 1.0 / 28.0);
    assert_eq!(find(&rows, "Fallujah", "2004-18").adjusted.enemy_action, 0.0);

    for row in rows.iter().filter(|r| r.locality == "Fallujah") {
        assert_eq!(row.adjusted.explosive_hazard, 0.0);
        assert_eq!(row.adjusted.friendly_fire, 0.0);
        assert_eq!(row.adjusted.host_nation_activity, 0.0);
    }
    assert!(
        rows.iter()
            .filter(|r| r.locality == "Ramadi")
            .all(|r| r.adjusted.is_zero())
    );
}

#[test]
fn output_covers_every_locality_and_week() {
    let rows = run_csv(
        "2004-04-05,Fallujah,Enemy Action\n\
         2004-04-21,Ramadi,IED Explosion\n\
         2004-05-20,Tikrit,Friendly Action\n",
        &PipelineOptions::default(),
    )
    .unwrap();

    let localities: BTreeSet<&str> = rows.iter().map(|r| r.locality.as_str()).collect();
    let weeks: BTreeSet<String> = rows.iter().map(|r| r.year_week.to_string()).collect();
    assert_eq!(localities.len(), 3);
    // 2004-14 through 2004-20.
    assert_eq!(weeks.len(), 7);
    assert_eq!(rows.len(), localities.len() * weeks.len());

    let keys: BTreeSet<(&str, String)> = rows
        .iter()
        .map(|r| (r.locality.as_str(), r.year_week.to_string()))
        .collect();
    assert_eq!(keys.len(), rows.len());
}

#[test]
fn values_are_probabilities() {
    let rows = run_csv(
        "2004-04-04,Fallujah,Enemy Action\n\
         2004-04-04,Fallujah,Enemy Action\n\
         2004-04-05,Fallujah,Enemy Action\n\
         2004-04-06,Fallujah,Enemy Action\n\
         2004-04-07,Fallujah,Enemy Action\n\
         2004-04-08,Fallujah,Enemy Action\n\
         2004-04-09,Fallujah,Enemy Action\n\
         2004-04-10,Fallujah,Enemy Action\n\
         2004-04-20,Fallujah,Explosive Hazard\n",
        &PipelineOptions::default(),
    )
    .unwrap();

    assert_close(find(&rows, "Fallujah", "2004-14").adjusted.enemy_action, 1.0);
    for row in &rows {
        for (_, value) in row.adjusted.iter() {
            assert!((0.0..=1.0).contains(&value));
        }
    }
}

#[test]
fn host_nation_week_partition_disables_its_smoothing() {
    let body = "2004-04-05,Fallujah,Host Nation Activity\n\
                2004-05-01,Fallujah,Enemy Action\n";

    let default = run_csv(body, &PipelineOptions::default()).unwrap();
    assert_close(
        find(&default, "Fallujah", "2004-15").adjusted.host_nation_activity,
        1.0 / 14.0,
    );

    let options = PipelineOptions {
        host_nation_partition: HostNationPartition::LocalityWeek,
        ..PipelineOptions::default()
    };
    let compat = run_csv(body, &options).unwrap();
    assert_eq!(
        find(&compat, "Fallujah", "2004-15").adjusted.host_nation_activity,
        0.0
    );
}

#[test]
fn split_year_boundary_weeks_are_kept() {
    let rows = run_csv(
        "2004-12-27,Baghdad,Enemy Action\n\
         2005-01-03,Baghdad,Enemy Action\n",
        &PipelineOptions::default(),
    )
    .unwrap();
    let weeks: Vec<String> = rows.iter().map(|r| r.year_week.to_string()).collect();
    assert_eq!(weeks, vec!["2004-52", "2005-00", "2005-01"]);
    // 2005-00 is only Saturday 2005-01-01 and takes the rolling mean.
    assert_close(rows[1].adjusted.enemy_action, 1.0 / 14.0);
}

#[test]
fn identical_input_gives_identical_output() {
    let body = "2004-04-05,Fallujah,Enemy Action\n\
                2004-04-21,Ramadi,IED Explosion\n\
                2004-04-22,Ramadi,Friendly Fire\n";
    let first = run_csv(body, &PipelineOptions::default()).unwrap();
    let second = run_csv(body, &PipelineOptions::default()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn invalid_timestamp_aborts_the_run() {
    let err = run_csv(
        "2004-04-05,Fallujah,Enemy Action\nnot a date,Fallujah,Enemy Action\n",
        &PipelineOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, PipelineError::InputFormat { line: 3, .. }));
}

#[test]
fn header_only_extract_is_empty_input() {
    let err = run_csv("", &PipelineOptions::default()).unwrap_err();
    assert!(matches!(err, PipelineError::EmptyInput));
}

#[test]
fn zero_window_is_rejected() {
    let options = PipelineOptions {
        rolling_window: 0,
        ..PipelineOptions::default()
    };
    let err = run_csv("2004-04-05,Fallujah,Enemy Action\n", &options).unwrap_err();
    assert!(matches!(err, PipelineError::Options { .. }));
}
