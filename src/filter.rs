//! Filter and search over in-memory collections.
//!
//! Every filter is a set of predicates applied in one pass; results keep
//! the order of the input and nothing is ranked or paginated.

use std::str::FromStr;

use crate::models::{
    Category, Challenge, Conversation, Location, Person, PresenceStatus, UnknownFilter,
};

/// Items that can be found with a free-text search.
pub trait Searchable {
    fn search_fields(&self) -> Vec<&str>;
}

pub trait Categorized {
    fn category(&self) -> Category;
}

pub trait HasPresence {
    fn presence(&self) -> PresenceStatus;
}

pub trait Scored {
    fn score(&self) -> u8;
}

/// Case-insensitive substring match of `query` against any of `fields`.
/// An empty query matches everything.
pub fn text_matches<'a, I>(query: &str, fields: I) -> bool
where
    I: IntoIterator<Item = &'a str>,
{
    let needle = query.to_lowercase();
    if needle.is_empty() {
        return true;
    }
    fields
        .into_iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

pub struct Filter<'a, T> {
    predicates: Vec<Box<dyn Fn(&T) -> bool + 'a>>,
}

impl<'a, T> Default for Filter<'a, T> {
    fn default() -> Self {
        Filter { predicates: Vec::new() }
    }
}

impl<'a, T: 'a> Filter<'a, T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&T) -> bool + 'a,
    {
        self.predicates.push(Box::new(predicate));
        self
    }

    pub fn matches(&self, item: &T) -> bool {
        self.predicates.iter().all(|p| p(item))
    }

    /// Items for which every predicate holds, in input order.
    pub fn apply<'b>(&self, items: &'b [T]) -> Vec<&'b T> {
        items.iter().filter(|item| self.matches(item)).collect()
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }
}

impl<'a, T: Categorized + 'a> Filter<'a, T> {
    /// `None` means all categories
    pub fn in_category(self, category: Option<Category>) -> Self {
        match category {
            Some(category) => self.with(move |item: &T| item.category() == category),
            None => self,
        }
    }
}

impl<'a, T: HasPresence + 'a> Filter<'a, T> {
    pub fn with_status(self, status: PresenceStatus) -> Self {
        self.with(move |item: &T| item.presence() == status)
    }
}

impl<'a, T: Scored + 'a> Filter<'a, T> {
    pub fn min_score(self, threshold: u8) -> Self {
        self.with(move |item: &T| item.score() >= threshold)
    }
}

impl<'a, T: Searchable + 'a> Filter<'a, T> {
    pub fn matching(self, query: &str) -> Self {
        if query.is_empty() {
            return self;
        }
        let query = query.to_string();
        self.with(move |item: &T| text_matches(&query, item.search_fields()))
    }
}

// --- People ---

pub const HIGH_COMPATIBILITY: u8 = 90;

/// Filter tabs of the people browser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeopleFilter {
    All,
    Online,
    HighCompatibility,
    Recent,
}

impl PeopleFilter {
    pub const ALL: [PeopleFilter; 4] = [
        PeopleFilter::All,
        PeopleFilter::Online,
        PeopleFilter::HighCompatibility,
        PeopleFilter::Recent,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            PeopleFilter::All => "all",
            PeopleFilter::Online => "online",
            PeopleFilter::HighCompatibility => "high-compatibility",
            PeopleFilter::Recent => "recent",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PeopleFilter::All => "All People",
            PeopleFilter::Online => "Online",
            PeopleFilter::HighCompatibility => "High Match",
            PeopleFilter::Recent => "Recent Activity",
        }
    }
}

impl FromStr for PeopleFilter {
    type Err = UnknownFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PeopleFilter::ALL
            .iter()
            .copied()
            .find(|f| f.id() == s)
            .ok_or_else(|| UnknownFilter(s.to_string()))
    }
}

/// Parses a category tab id, where "all" means no category filter.
pub fn parse_category_filter(id: &str) -> Result<Option<Category>, UnknownFilter> {
    if id == "all" {
        return Ok(None);
    }
    id.parse().map(Some)
}

pub fn people_query<'a>(filter: PeopleFilter, search: &str, min_compatibility: Option<u8>) -> Filter<'a, Person> {
    let query: Filter<'a, Person> = match filter {
        PeopleFilter::All => Filter::new(),
        PeopleFilter::Online => Filter::new().with_status(PresenceStatus::Online),
        PeopleFilter::HighCompatibility => Filter::new().min_score(HIGH_COMPATIBILITY),
        // "Recent" means activity reported in hours, e.g. "2 hours ago"
        PeopleFilter::Recent => Filter::new().with(|p: &Person| p.last_activity.contains("hour")),
    };
    let query = match min_compatibility {
        Some(threshold) => query.min_score(threshold),
        None => query,
    };
    query.matching(search)
}

pub fn filter_people<'b>(
    people: &'b [Person],
    filter: PeopleFilter,
    search: &str,
    min_compatibility: Option<u8>,
) -> Vec<&'b Person> {
    people_query(filter, search, min_compatibility).apply(people)
}

pub fn filter_locations<'b>(locations: &'b [Location], category: Option<Category>, search: &str) -> Vec<&'b Location> {
    Filter::<Location>::new().in_category(category).matching(search).apply(locations)
}

pub fn filter_challenges(challenges: &[Challenge], category: Option<Category>) -> Vec<&Challenge> {
    Filter::<Challenge>::new().in_category(category).apply(challenges)
}

pub fn search_conversations<'b>(conversations: &'b [Conversation], search: &str) -> Vec<&'b Conversation> {
    Filter::<Conversation>::new().matching(search).apply(conversations)
}

// --- Trait impls for the domain types ---

impl Searchable for Person {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.major.as_str(), self.country.as_str()]
    }
}

impl HasPresence for Person {
    fn presence(&self) -> PresenceStatus {
        self.status
    }
}

impl Scored for Person {
    fn score(&self) -> u8 {
        self.compatibility
    }
}

impl Searchable for Location {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.description.as_str()]
    }
}

impl Categorized for Location {
    fn category(&self) -> Category {
        self.category
    }
}

impl Categorized for Challenge {
    fn category(&self) -> Category {
        self.category
    }
}

impl Searchable for Conversation {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str()]
    }
}

impl HasPresence for Conversation {
    fn presence(&self) -> PresenceStatus {
        self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;

    #[test]
    fn test_text_matches() {
        assert!(text_matches("", ["anything"]));
        assert!(text_matches("LAKE", ["Mirror Lake"]));
        assert!(text_matches("lib", ["Thompson Library", "Main library"]));
        assert!(!text_matches("stadium", ["Mirror Lake", "Peaceful lake"]));
        assert!(!text_matches("x", Vec::<&str>::new()));
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        let people = seed::people();
        let filter: Filter<Person> = Filter::new();
        assert!(filter.is_empty());
        assert_eq!(filter.apply(&people).len(), people.len());
    }

    #[test]
    fn test_predicates_are_conjunctive() {
        let people = seed::people();
        let result = Filter::<Person>::new()
            .with_status(PresenceStatus::Online)
            .min_score(93)
            .apply(&people);
        let names: Vec<&str> = result.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Ahmed Khan", "Priya Sharma"]);
    }

    #[test]
    fn test_people_filter_ids() {
        assert_eq!("high-compatibility".parse::<PeopleFilter>().unwrap(), PeopleFilter::HighCompatibility);
        assert_eq!("all".parse::<PeopleFilter>().unwrap(), PeopleFilter::All);
        assert!("nearby".parse::<PeopleFilter>().is_err());
    }

    #[test]
    fn test_category_filter_ids() {
        assert_eq!(parse_category_filter("all").unwrap(), None);
        assert_eq!(parse_category_filter("cultural").unwrap(), Some(Category::Cultural));
        assert!(parse_category_filter("sports").is_err());
    }

    #[test]
    fn test_recent_people() {
        let people = seed::people();
        let recent = filter_people(&people, PeopleFilter::Recent, "", None);
        let ids: Vec<&str> = recent.iter().map(|p| p.id.as_str()).collect();
        // "30 minutes ago" and "1 day ago" are not reported in hours
        assert_eq!(ids, vec!["1", "2", "3", "6"]);
    }
}
