use chrono::{NaiveDate, TimeZone, Utc};
use rand::seq::SliceRandom;
use rand::{rngs::StdRng, SeedableRng};
use sov_studio::aggregator::{aggregate_by_entity, daily_trend, AggregatedEntity};
use sov_studio::normalizer::NormalizedRecord;

fn metrics(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

fn rec(entity: &str, views: f64, likes: Option<f64>) -> NormalizedRecord {
    let record = NormalizedRecord::new(entity, None).with_metric("views", views);
    match likes {
        Some(likes) => record.with_metric("likes", likes),
        None => record,
    }
}

fn find<'a>(entities: &'a [AggregatedEntity], name: &str) -> &'a AggregatedEntity {
    entities.iter().find(|e| e.entity == name).unwrap()
}

#[test]
fn test_sums_per_entity() {
    let records = vec![
        rec("A", 10.0, Some(1.0)),
        rec("B", 5.0, Some(2.0)),
        rec("A", 20.0, Some(3.0)),
    ];

    let entities = aggregate_by_entity(&records, &metrics(&["views", "likes"]));

    assert_eq!(entities.len(), 2);
    let a = find(&entities, "A");
    assert_eq!(a.metric("views"), 30.0);
    assert_eq!(a.metric("likes"), 4.0);
    assert_eq!(a.record_count, 2);
    assert_eq!(find(&entities, "B").metric("views"), 5.0);
}

#[test]
fn test_missing_metric_counts_as_zero() {
    let records = vec![rec("A", 10.0, None), rec("A", 1.0, Some(4.0))];

    let entities = aggregate_by_entity(&records, &metrics(&["views", "likes"]));

    assert_eq!(entities[0].metric("likes"), 4.0);
    assert_eq!(entities[0].metrics.len(), 2);
}

#[test]
fn test_untracked_metrics_ignored() {
    let records = vec![rec("A", 10.0, Some(4.0))];

    let entities = aggregate_by_entity(&records, &metrics(&["views"]));

    assert!(!entities[0].metrics.contains_key("likes"));
}

#[test]
fn test_one_row_per_distinct_entity() {
    let records: Vec<NormalizedRecord> = ["C", "A", "B", "A", "C", "C"]
        .iter()
        .map(|e| rec(e, 1.0, None))
        .collect();

    let entities = aggregate_by_entity(&records, &metrics(&["views"]));

    let names: Vec<&str> = entities.iter().map(|e| e.entity.as_str()).collect();
    assert_eq!(names, vec!["A", "B", "C"]);
    assert_eq!(find(&entities, "C").metric("views"), 3.0);
}

#[test]
fn test_empty_input() {
    let entities = aggregate_by_entity(&[], &metrics(&["views"]));
    assert!(entities.is_empty());
}

#[test]
fn test_sums_invariant_under_permutation() {
    let mut rng = StdRng::seed_from_u64(7);
    let entities = ["Axie", "Pixels", "Ronin", "Sorare"];

    let records: Vec<NormalizedRecord> = (0..400)
        .map(|i| {
            let entity = entities[i % entities.len()];
            let views = (i as f64) * 0.1 + 1.0 / (i as f64 + 3.0);
            rec(entity, views, Some(1e12 / (i as f64 + 1.0)))
        })
        .collect();

    let tracked = metrics(&["views", "likes"]);
    let baseline = aggregate_by_entity(&records, &tracked);

    for _ in 0..20 {
        let mut shuffled = records.clone();
        shuffled.shuffle(&mut rng);
        let again = aggregate_by_entity(&shuffled, &tracked);

        assert_eq!(again.len(), baseline.len());
        for expected in &baseline {
            let got = find(&again, &expected.entity);
            for metric in &tracked {
                assert_eq!(
                    got.metric(metric).to_bits(),
                    expected.metric(metric).to_bits(),
                    "{} / {}",
                    expected.entity,
                    metric
                );
            }
        }
    }
}

#[test]
fn test_non_negative_inputs_give_non_negative_sums() {
    let records = vec![rec("A", 0.0, Some(0.0)), rec("B", 3.0, Some(0.0))];

    let entities = aggregate_by_entity(&records, &metrics(&["views", "likes"]));

    for entity in &entities {
        assert!(entity.metrics.values().all(|v| *v >= 0.0 && v.is_sign_positive()));
    }
}

#[test]
fn test_daily_trend() {
    let at = |d: u32, h: u32| Some(Utc.with_ymd_and_hms(2024, 1, d, h, 0, 0).unwrap());
    let records = vec![
        NormalizedRecord::new("A", at(2, 9)).with_metric("views", 10.0),
        NormalizedRecord::new("B", at(2, 18)).with_metric("views", 5.0),
        NormalizedRecord::new("A", at(1, 12)).with_metric("views", 1.0),
        NormalizedRecord::new("A", None).with_metric("views", 100.0),
    ];

    let all = daily_trend(&records, &metrics(&["views"]), None);
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    assert_eq!(all[1].metric("views"), 15.0);
    assert_eq!(all[1].record_count, 2);

    let only_a = daily_trend(&records, &metrics(&["views"]), Some("A"));
    assert_eq!(only_a[1].metric("views"), 10.0);
}
