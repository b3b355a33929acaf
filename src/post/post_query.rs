use crate::post::post_model::Post;
use crate::utils::error::CustomError;
use crate::utils::helpers::PAGE_SIZE;

/// Parses the 1-based `page` query value. Absent or blank means the first page.
pub fn parse_page(raw: Option<&str>) -> Result<usize, CustomError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(1);
    };

    match raw.parse::<i64>() {
        Ok(page) if page >= 1 => Ok(page as usize),
        _ => Err(CustomError::InvalidQueryError("Invalid page number".into())),
    }
}

/// Bookmarked posts first, then newest first. Stable for equal keys.
pub fn sort_for_listing(posts: &mut [Post]) {
    posts.sort_by(|a, b| {
        b.bookmarked
            .cmp(&a.bookmarked)
            .then_with(|| b.date.cmp(&a.date))
    });
}

/// Returns `[(page-1)*PAGE_SIZE, page*PAGE_SIZE)`; empty past the end.
pub fn paginate(posts: Vec<Post>, page: usize) -> Vec<Post> {
    let start = page.saturating_sub(1).saturating_mul(PAGE_SIZE);
    posts.into_iter().skip(start).take(PAGE_SIZE).collect()
}

pub fn list_page(mut posts: Vec<Post>, page: usize) -> Vec<Post> {
    sort_for_listing(&mut posts);
    paginate(posts, page)
}

/// Case-insensitive title search. Without a query the first page is returned
/// in stored order, unsorted; with one, every match is returned.
pub fn search_by_title(posts: Vec<Post>, query: Option<&str>) -> Vec<Post> {
    let query = match query {
        Some(q) if !q.is_empty() => q.to_lowercase(),
        _ => return posts.into_iter().take(PAGE_SIZE).collect(),
    };

    posts
        .into_iter()
        .filter(|p| p.title.to_lowercase().contains(&query))
        .collect()
}

/// Keeps posts carrying `selected` as a tag or as their author.
pub fn filter_by_tag_or_author(posts: Vec<Post>, selected: Option<&str>) -> Vec<Post> {
    match selected {
        Some(value) if !value.is_empty() => posts
            .into_iter()
            .filter(|p| p.author == value || p.tags.iter().any(|t| t == value))
            .collect(),
        _ => posts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn post(id: usize, title: &str, minutes: i64, bookmarked: bool) -> Post {
        Post {
            id: id.to_string(),
            title: title.to_string(),
            content: "Some content".to_string(),
            author: "ana".to_string(),
            tags: vec![],
            date: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(minutes),
            bookmarked,
        }
    }

    fn ids(posts: &[Post]) -> Vec<&str> {
        posts.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn page_defaults_to_one() {
        assert_eq!(parse_page(None).unwrap(), 1);
        assert_eq!(parse_page(Some(" 3 ")).unwrap(), 3);
    }

    #[test]
    fn blank_page_means_first_page() {
        assert_eq!(parse_page(Some("")).unwrap(), 1);
        assert_eq!(parse_page(Some("   ")).unwrap(), 1);
    }

    #[test]
    fn rejects_non_positive_or_non_numeric_pages() {
        for raw in ["0", "-2", "abc", "1.5"] {
            let err = parse_page(Some(raw)).unwrap_err();
            assert!(matches!(err, CustomError::InvalidQueryError(_)), "{raw}");
        }
    }

    #[test]
    fn bookmarked_first_then_newest() {
        let posts = vec![
            post(1, "old", 1, false),
            post(2, "new", 5, false),
            post(3, "old pinned", 2, true),
            post(4, "new pinned", 9, true),
        ];

        let page = list_page(posts, 1);
        assert_eq!(ids(&page), vec!["4", "3", "2", "1"]);
    }

    #[test]
    fn pages_hold_at_most_fifteen() {
        let posts: Vec<Post> = (0..40).map(|i| post(i, "t", i as i64, false)).collect();

        let first = list_page(posts.clone(), 1);
        assert_eq!(first.len(), PAGE_SIZE);
        assert_eq!(first[0].id, "39");

        let third = list_page(posts.clone(), 3);
        assert_eq!(third.len(), 10);
        assert_eq!(third.last().unwrap().id, "0");

        assert!(list_page(posts, 4).is_empty());
    }

    #[test]
    fn empty_search_returns_first_fifteen_in_stored_order() {
        let posts: Vec<Post> = (0..20).map(|i| post(i, "t", -(i as i64), i % 2 == 0)).collect();

        let found = search_by_title(posts.clone(), Some(""));
        assert_eq!(found.len(), PAGE_SIZE);
        assert_eq!(found[0].id, "0");
        assert_eq!(found[1].id, "1");

        assert_eq!(search_by_title(posts, None).len(), PAGE_SIZE);
    }

    #[test]
    fn search_matches_title_case_insensitively_without_cap() {
        let mut posts: Vec<Post> = (0..20).map(|i| post(i, "Hello world", 0, false)).collect();
        posts.push(post(99, "Goodbye", 0, false));
        posts.push(post(100, "say HELLO", 0, false));

        let found = search_by_title(posts, Some("hello"));
        assert_eq!(found.len(), 21);
        assert!(found.iter().all(|p| p.id != "99"));
    }

    #[test]
    fn filter_matches_tag_or_author() {
        let mut a = post(1, "a", 0, false);
        a.tags = vec!["rust".into()];
        let mut b = post(2, "b", 0, false);
        b.author = "rust".into();
        let c = post(3, "c", 0, false);

        let all = vec![a, b, c];
        assert_eq!(ids(&filter_by_tag_or_author(all.clone(), Some("rust"))), vec!["1", "2"]);
        assert_eq!(filter_by_tag_or_author(all.clone(), Some("")).len(), 3);
        assert_eq!(filter_by_tag_or_author(all, None).len(), 3);
    }
}
