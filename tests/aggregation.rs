use cafe_hub_be::models::rating::{AspectTotals, DistributionEntry, Tally};
use cafe_hub_be::services::aggregator::{
    aspect_averages, distribution, percentage, round_tenths, summarize,
};

#[test]
fn test_empty_rating_set_summarizes_to_zero() {
    let summary = summarize(&[]);
    assert_eq!(summary.average, 0.0);
    assert_eq!(summary.count, 0);
}

#[test]
fn test_summary_rounds_half_up_to_one_decimal() {
    // 4 + 5
    assert_eq!(summarize(&[(5, 1), (4, 1)]).average, 4.5);
    // 10 / 3 = 3.333..
    assert_eq!(round_tenths(10, 3), 3.3);
    // 11 / 3 = 3.666..
    assert_eq!(round_tenths(11, 3), 3.7);
    // 13 / 4 = 3.25 exactly, rounds up
    assert_eq!(round_tenths(13, 4), 3.3);
    // 17 / 4 = 4.25 exactly, rounds up
    assert_eq!(round_tenths(17, 4), 4.3);
    assert_eq!(round_tenths(5, 1), 5.0);
    assert_eq!(round_tenths(0, 0), 0.0);
}

#[test]
fn test_summary_counts_every_rating() {
    let summary = summarize(&[(5, 2), (4, 1), (3, 1), (1, 1)]);
    assert_eq!(summary.count, 5);
    // 18 / 5
    assert_eq!(summary.average, 3.6);
}

#[test]
fn test_distribution_matches_example() {
    let histogram = [(5, 2), (4, 1), (3, 1), (1, 1)];
    let entries = distribution(&histogram, 5);

    assert_eq!(
        entries,
        vec![
            DistributionEntry { rating: 5, count: 2, percentage: 40 },
            DistributionEntry { rating: 4, count: 1, percentage: 20 },
            DistributionEntry { rating: 3, count: 1, percentage: 20 },
            DistributionEntry { rating: 2, count: 0, percentage: 0 },
            DistributionEntry { rating: 1, count: 1, percentage: 20 },
        ]
    );
}

#[test]
fn test_distribution_with_no_ratings_is_all_zero() {
    let entries = distribution(&[], 0);
    assert_eq!(entries.len(), 5);
    assert!(entries.iter().all(|e| e.count == 0 && e.percentage == 0));
    assert_eq!(
        entries.iter().map(|e| e.rating).collect::<Vec<_>>(),
        vec![5, 4, 3, 2, 1]
    );
}

#[test]
fn test_percentage_rounds_to_nearest_whole() {
    assert_eq!(percentage(1, 3), 33);
    assert_eq!(percentage(2, 3), 67);
    assert_eq!(percentage(1, 8), 13);
    assert_eq!(percentage(0, 0), 0);
    assert_eq!(percentage(4, 4), 100);
}

#[test]
fn test_aspect_averages_skip_unrated_aspects() {
    let totals = AspectTotals {
        food: Tally { sum: 9, count: 2 },
        service: Tally::default(),
        ambiance: Tally { sum: 10, count: 3 },
        value: Tally { sum: 5, count: 1 },
    };

    let averages = aspect_averages(&totals);
    assert_eq!(averages.food, Some(4.5));
    assert_eq!(averages.service, None);
    assert_eq!(averages.ambiance, Some(3.3));
    assert_eq!(averages.value, Some(5.0));
}
