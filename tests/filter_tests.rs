mod common;

use common::setup_logging;
use friendbridge::filter::{self, PeopleFilter};
use friendbridge::{seed, Category, PresenceStatus};

#[test]
fn test_high_compatibility_keeps_seed_order() {
    setup_logging();
    let people = seed::people();
    let scores: Vec<u8> = filter::filter_people(&people, PeopleFilter::HighCompatibility, "", None)
        .iter()
        .map(|p| p.compatibility)
        .collect();
    assert_eq!(scores, vec![95, 92, 95, 92]);
}

#[test]
fn test_online_filter_with_search() {
    let people = seed::people();
    let found = filter::filter_people(&people, PeopleFilter::Online, "india", None);
    let names: Vec<&str> = found.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Fatima Ali", "Priya Sharma"]);
    assert!(found.iter().all(|p| p.status == PresenceStatus::Online));
}

#[test]
fn test_search_is_case_insensitive_over_name_major_country() {
    let people = seed::people();
    for query in ["ENGINEERING", "engineering", "EnGiNeErInG"] {
        let names: Vec<&str> = filter::filter_people(&people, PeopleFilter::All, query, None)
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["Hassan Sheikh", "Wei Chen"]);
    }
    // Interests are not searched
    assert!(filter::filter_people(&people, PeopleFilter::All, "cricket", None).is_empty());
}

#[test]
fn test_min_compatibility_preference_narrows_people() {
    let people = seed::people();
    let found = filter::filter_people(&people, PeopleFilter::All, "", Some(90));
    assert_eq!(found.len(), 4);
    let found = filter::filter_people(&people, PeopleFilter::Online, "", Some(95));
    let ids: Vec<&str> = found.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "4"]);
}

#[test]
fn test_location_category_keeps_order() {
    let locations = seed::locations();
    let ids: Vec<&str> = filter::filter_locations(&locations, Some(Category::Campus), "")
        .iter()
        .map(|l| l.id.as_str())
        .collect();
    assert_eq!(ids, vec!["1", "7"]);

    let all = filter::filter_locations(&locations, None, "");
    assert_eq!(all.len(), locations.len());
}

#[test]
fn test_location_search_covers_description() {
    let locations = seed::locations();
    let names: Vec<&str> = filter::filter_locations(&locations, None, "STUDY")
        .iter()
        .map(|l| l.name.as_str())
        .collect();
    assert_eq!(names, vec!["Thompson Library"]);

    let names: Vec<&str> = filter::filter_locations(&locations, Some(Category::Social), "lake")
        .iter()
        .map(|l| l.name.as_str())
        .collect();
    assert_eq!(names, vec!["Mirror Lake Cafe"]);
}

#[test]
fn test_challenge_categories_from_filter_ids() {
    let challenges = seed::challenges();
    let cultural = filter::parse_category_filter("cultural").unwrap();
    let titles: Vec<&str> = filter::filter_challenges(&challenges, cultural)
        .iter()
        .map(|c| c.title.as_str())
        .collect();
    assert_eq!(titles, vec!["Buckeye Spirit", "Food Truck Adventure", "Wexner Center Visit"]);

    let all = filter::parse_category_filter("all").unwrap();
    assert_eq!(filter::filter_challenges(&challenges, all).len(), 8);

    let err = filter::parse_category_filter("sports").unwrap_err();
    assert_eq!(err.to_string(), "Unknown filter: sports");
}

#[test]
fn test_people_filter_ids() {
    for f in PeopleFilter::ALL {
        assert_eq!(f.id().parse::<PeopleFilter>().unwrap(), f);
    }
    assert!("nearby".parse::<PeopleFilter>().is_err());
}
