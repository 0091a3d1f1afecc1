//! Listing request canonicalization and the option lists derived from it.
//!
//! The listing page is driven entirely by its query string. An incoming query
//! is first bound into a [`ListingQuery`] whose fields are all optional; one
//! completeness check then either yields a fully-populated [`ListingRequest`]
//! or tells the caller to redirect to [`ListingRequest::default`].

use serde::Serialize;

use super::{TitleFilter, TitleSort};

pub const PAGE_SIZE_KEY: &str = "pageSize";
pub const PAGE_NUMBER_KEY: &str = "pageNumber";
pub const TITLE_SORT_KEY: &str = "titleSort";
pub const SORT_DESCENDING_KEY: &str = "sortDescending";

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const DEFAULT_PAGE_NUMBER: u32 = 1;
pub const DEFAULT_TITLE_SORT: TitleSort = TitleSort::ReleaseYear;
pub const DEFAULT_SORT_DESCENDING: bool = true;

/// Page sizes offered by the page-size menu.
pub const PAGE_SIZE_CHOICES: [u32; 5] = [10, 20, 30, 60, 120];

/// One entry of a select control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
    pub selected: bool,
}

impl SelectOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>, selected: bool) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            selected,
        }
    }
}

/// Listing parameters as bound from the query string, before canonicalization.
///
/// A field is `None` only when its key is absent. A key that is present with a
/// value that fails to parse binds to that parameter's default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingQuery {
    pub page_size: Option<u32>,
    pub page_number: Option<u32>,
    pub title_sort: Option<TitleSort>,
    pub sort_descending: Option<bool>,
    pub filter: TitleFilter,
}

impl ListingQuery {
    /// Binds decoded query pairs. Keys match case-insensitively and the first
    /// occurrence of a key wins.
    pub fn from_query_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)> + Clone,
    {
        let mut query = Self {
            filter: TitleFilter::from_query_pairs(pairs.clone()),
            ..Self::default()
        };

        for (key, value) in pairs {
            let value = value.trim();

            if key.eq_ignore_ascii_case(PAGE_SIZE_KEY) {
                bind_first(&mut query.page_size, value.parse().ok(), DEFAULT_PAGE_SIZE);
            } else if key.eq_ignore_ascii_case(PAGE_NUMBER_KEY) {
                bind_first(&mut query.page_number, value.parse().ok(), DEFAULT_PAGE_NUMBER);
            } else if key.eq_ignore_ascii_case(TITLE_SORT_KEY) {
                bind_first(&mut query.title_sort, value.parse().ok(), DEFAULT_TITLE_SORT);
            } else if key.eq_ignore_ascii_case(SORT_DESCENDING_KEY) {
                bind_first(
                    &mut query.sort_descending,
                    parse_bool(value),
                    DEFAULT_SORT_DESCENDING,
                );
            }
        }

        query
    }

    /// The fully-specified request, or `None` when any of the four paging and
    /// sorting parameters is missing. The filter never takes part in this check.
    #[must_use]
    pub fn into_request(self) -> Option<ListingRequest> {
        Some(ListingRequest {
            page_size: self.page_size?,
            page_number: self.page_number?,
            title_sort: self.title_sort?,
            sort_descending: self.sort_descending?,
            filter: self.filter,
        })
    }
}

fn bind_first<T>(slot: &mut Option<T>, parsed: Option<T>, default: T) {
    if slot.is_none() {
        *slot = Some(parsed.unwrap_or(default));
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// A canonical, fully-populated listing request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingRequest {
    pub page_size: u32,
    pub page_number: u32,
    pub title_sort: TitleSort,
    pub sort_descending: bool,
    pub filter: TitleFilter,
}

impl Default for ListingRequest {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            page_number: DEFAULT_PAGE_NUMBER,
            title_sort: DEFAULT_TITLE_SORT,
            sort_descending: DEFAULT_SORT_DESCENDING,
            filter: TitleFilter::default(),
        }
    }
}

impl ListingRequest {
    /// Encoded query string (without the leading `?`) that binds back to this request.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        let mut pairs: Vec<(&str, String)> = vec![
            (PAGE_SIZE_KEY, self.page_size.to_string()),
            (PAGE_NUMBER_KEY, self.page_number.to_string()),
            (TITLE_SORT_KEY, self.title_sort.to_string()),
            (SORT_DESCENDING_KEY, self.sort_descending.to_string()),
        ];
        pairs.extend(self.filter.to_query_pairs());

        pairs
            .iter()
            .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// The same request pointed at another page.
    #[must_use]
    pub fn with_page_number(&self, page_number: u32) -> Self {
        Self {
            page_number,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn page_size_options(&self) -> Vec<SelectOption> {
        PAGE_SIZE_CHOICES
            .iter()
            .map(|&size| {
                SelectOption::new(
                    format!("{size} items/page"),
                    size.to_string(),
                    size == self.page_size,
                )
            })
            .collect()
    }

    #[must_use]
    pub fn title_sort_options(&self) -> Vec<SelectOption> {
        TitleSort::ALL
            .iter()
            .map(|&sort| SelectOption::new(sort.as_str(), sort.as_str(), sort == self.title_sort))
            .collect()
    }

    #[must_use]
    pub fn sort_direction_options(&self) -> Vec<SelectOption> {
        vec![
            SelectOption::new("Ascending", "false", !self.sort_descending),
            SelectOption::new("Descending", "true", self.sort_descending),
        ]
    }
}

/// Page numbers for the jump-to-page control.
///
/// Candidates are the first three pages, the neighbours of `current`, and the
/// pages around `last` including one past it. Candidates outside
/// `1..=last + 1` are dropped; the result is ascending and duplicate-free.
#[must_use]
pub fn page_number_window(current: u32, last: u32) -> Vec<u32> {
    let current = i64::from(current);
    let last = i64::from(last);
    let upper = last + 1;

    let mut pages: Vec<u32> = [
        1,
        2,
        3,
        current - 1,
        current,
        current + 1,
        last - 1,
        last,
        last + 1,
    ]
    .into_iter()
    .filter(|&page| (1..=upper).contains(&page))
    .filter_map(|page| u32::try_from(page).ok())
    .collect();

    pages.sort_unstable();
    pages.dedup();
    pages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::GenreId;

    fn full_query() -> Vec<(&'static str, &'static str)> {
        vec![
            ("pageSize", "30"),
            ("pageNumber", "4"),
            ("titleSort", "PrimaryTitle"),
            ("sortDescending", "false"),
        ]
    }

    #[test]
    fn complete_query_becomes_request() {
        let request = ListingQuery::from_query_pairs(full_query())
            .into_request()
            .unwrap();

        assert_eq!(request.page_size, 30);
        assert_eq!(request.page_number, 4);
        assert_eq!(request.title_sort, TitleSort::PrimaryTitle);
        assert!(!request.sort_descending);
        assert!(request.filter.is_empty());
    }

    #[test]
    fn any_missing_parameter_makes_query_incomplete() {
        for skipped in 0..4 {
            let pairs: Vec<_> = full_query()
                .into_iter()
                .enumerate()
                .filter(|(i, _)| *i != skipped)
                .map(|(_, pair)| pair)
                .collect();

            assert!(
                ListingQuery::from_query_pairs(pairs.clone())
                    .into_request()
                    .is_none(),
                "query {pairs:?} should be incomplete"
            );
        }
    }

    #[test]
    fn filter_alone_does_not_complete_query() {
        let query = ListingQuery::from_query_pairs([("filter.text", "heat")]);
        assert_eq!(query.filter.text.as_deref(), Some("heat"));
        assert!(query.into_request().is_none());
    }

    #[test]
    fn unparseable_value_binds_to_its_default() {
        let pairs = [
            ("pageSize", "-5"),
            ("pageNumber", ""),
            ("titleSort", "Rating"),
            ("sortDescending", "1"),
        ];

        let request = ListingQuery::from_query_pairs(pairs).into_request().unwrap();

        assert_eq!(request, ListingRequest::default());
    }

    #[test]
    fn unparseable_first_occurrence_still_wins() {
        let mut pairs = full_query();
        pairs.insert(0, ("pageSize", "lots"));

        let request = ListingQuery::from_query_pairs(pairs).into_request().unwrap();

        assert_eq!(request.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(request.page_number, 4);
    }

    #[test]
    fn keys_match_case_insensitively_and_first_wins() {
        let pairs = [
            ("PAGESIZE", "10"),
            ("pagesize", "60"),
            ("pagenumber", "2"),
            ("TitleSort", "runtimeminutes"),
            ("SortDescending", "TRUE"),
        ];

        let request = ListingQuery::from_query_pairs(pairs).into_request().unwrap();

        assert_eq!(request.page_size, 10);
        assert_eq!(request.page_number, 2);
        assert_eq!(request.title_sort, TitleSort::RuntimeMinutes);
        assert!(request.sort_descending);
    }

    #[test]
    fn default_request_query_string() {
        assert_eq!(
            ListingRequest::default().to_query_string(),
            "pageSize=20&pageNumber=1&titleSort=ReleaseYear&sortDescending=true"
        );
    }

    #[test]
    fn query_string_carries_and_encodes_filter() {
        let mut request = ListingRequest::default();
        request.filter.text = Some("la dolce vita".to_string());
        request.filter.genre_ids = vec![GenreId::new(5)];

        let query = request.to_query_string();

        assert!(query.ends_with("&filter.text=la%20dolce%20vita&filter.genreIds=5"));
    }

    #[test]
    fn page_size_options_mark_the_effective_size() {
        let request = ListingRequest {
            page_size: 60,
            ..ListingRequest::default()
        };

        let options = request.page_size_options();

        assert_eq!(options.len(), 5);
        assert_eq!(options[0].label, "10 items/page");
        let selected: Vec<_> = options.iter().filter(|o| o.selected).collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].value, "60");
    }

    #[test]
    fn unlisted_page_size_selects_nothing() {
        let request = ListingRequest {
            page_size: 25,
            ..ListingRequest::default()
        };
        assert!(request.page_size_options().iter().all(|o| !o.selected));
    }

    #[test]
    fn title_sort_options_follow_the_enumeration() {
        let options = ListingRequest::default().title_sort_options();

        let labels: Vec<_> = options.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(
            labels,
            ["PrimaryTitle", "OriginalTitle", "ReleaseYear", "RuntimeMinutes"]
        );
        assert!(options[2].selected);
        assert_eq!(options.iter().filter(|o| o.selected).count(), 1);
    }

    #[test]
    fn sort_direction_options() {
        let descending = ListingRequest::default().sort_direction_options();
        assert_eq!(
            descending,
            vec![
                SelectOption::new("Ascending", "false", false),
                SelectOption::new("Descending", "true", true),
            ]
        );

        let ascending = ListingRequest {
            sort_descending: false,
            ..ListingRequest::default()
        }
        .sort_direction_options();
        assert!(ascending[0].selected);
        assert!(!ascending[1].selected);
    }

    #[test]
    fn window_at_last_page() {
        assert_eq!(page_number_window(5, 5), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn window_single_page() {
        assert_eq!(page_number_window(1, 1), vec![1, 2]);
    }

    #[test]
    fn window_in_the_middle_of_many_pages() {
        assert_eq!(
            page_number_window(50, 100),
            vec![1, 2, 3, 49, 50, 51, 99, 100, 101]
        );
    }

    #[test]
    fn window_drops_pages_beyond_one_past_last() {
        assert_eq!(page_number_window(9, 2), vec![1, 2, 3]);
    }

    #[test]
    fn window_with_page_zero() {
        assert_eq!(page_number_window(0, 3), vec![1, 2, 3, 4]);
    }

    #[test]
    fn window_is_strictly_ascending() {
        for last in 1..12 {
            for current in 0..15 {
                let window = page_number_window(current, last);
                assert!(window.windows(2).all(|w| w[0] < w[1]));
                assert!(window.iter().all(|&p| p >= 1 && p <= last + 1));
                assert_eq!(window[0], 1);
            }
        }
    }
}
