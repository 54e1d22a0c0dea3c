//! Pure selection rules over a tab snapshot.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::tabs::Tab;

/// Which tab property a keyword filter looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordField {
    Title,
    Url,
}

impl KeywordField {
    #[must_use]
    pub fn property(self, tab: &Tab) -> &str {
        match self {
            Self::Title => &tab.title,
            Self::Url => &tab.url,
        }
    }
}

/// True if any keyword is a case-insensitive substring of the tab's `field`.
#[must_use]
pub fn matches_any(field: KeywordField, tab: &Tab, keywords: &[String]) -> bool {
    let haystack = field.property(tab).to_lowercase();
    keywords
        .iter()
        .any(|keyword| haystack.contains(&keyword.to_lowercase()))
}

/// Tabs matched by at least one keyword, each once, in snapshot order.
#[must_use]
pub fn select_by_keywords<'a>(
    tabs: &'a [Tab],
    field: KeywordField,
    keywords: &[String],
) -> Vec<&'a Tab> {
    tabs.iter()
        .filter(|tab| matches_any(field, tab, keywords))
        .collect()
}

/// Every tab whose URL already appeared earlier in the snapshot.
#[must_use]
pub fn duplicates(tabs: &[Tab]) -> Vec<&Tab> {
    let mut seen = HashSet::new();
    tabs.iter()
        .filter(|tab| !seen.insert(tab.url.as_str()))
        .collect()
}

/// Listing entries: one tab per URL, then one per title, sorted by title.
///
/// Both collapses keep the last tab seen, so two different pages that share a
/// title show up once.
#[must_use]
pub fn collapse_for_listing(tabs: &[Tab]) -> Vec<&Tab> {
    let mut by_url: Vec<&Tab> = Vec::new();
    let mut url_slots: HashMap<&str, usize> = HashMap::new();
    for tab in tabs {
        match url_slots.get(tab.url.as_str()) {
            Some(&slot) => by_url[slot] = tab,
            None => {
                url_slots.insert(&tab.url, by_url.len());
                by_url.push(tab);
            }
        }
    }

    // Titles order by UTF-16 code units, as JavaScript string comparison does.
    let mut by_title: BTreeMap<Vec<u16>, &Tab> = BTreeMap::new();
    for tab in by_url {
        by_title.insert(tab.display_title().encode_utf16().collect(), tab);
    }
    by_title.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::TabRef;

    fn tab(window: usize, index: usize, title: &str, url: &str) -> Tab {
        Tab {
            title: title.into(),
            url: url.into(),
            address: TabRef { window, tab: index },
        }
    }

    fn keywords(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| (*w).to_string()).collect()
    }

    #[test]
    fn keyword_match_ignores_case() {
        let t = tab(0, 0, "Inbox (3) - Gmail", "https://mail.google.com/mail/u/0");
        assert!(matches_any(KeywordField::Title, &t, &keywords(&["inbox"])));
        assert!(matches_any(KeywordField::Url, &t, &keywords(&["MAIL.GOOGLE"])));
        assert!(!matches_any(KeywordField::Url, &t, &keywords(&["inbox"])));
    }

    #[test]
    fn keyword_match_is_substring() {
        let t = tab(0, 0, "iPhone - Apple", "https://apple.com/iphone");
        assert!(matches_any(KeywordField::Title, &t, &keywords(&["iphone - apple"])));
        assert!(matches_any(KeywordField::Title, &t, &keywords(&["one - a"])));
        assert!(!matches_any(KeywordField::Title, &t, &keywords(&["ipad"])));
    }

    #[test]
    fn tab_matched_by_several_keywords_is_selected_once() {
        let tabs = vec![
            tab(0, 0, "Inbox - Gmail", "https://mail.google.com"),
            tab(0, 1, "News", "https://news.test"),
        ];
        let selected = select_by_keywords(&tabs, KeywordField::Title, &keywords(&["inbox", "gmail"]));
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].address, TabRef { window: 0, tab: 0 });
    }

    #[test]
    fn no_keyword_match_selects_nothing() {
        let tabs = vec![tab(0, 0, "News", "https://news.test")];
        assert!(select_by_keywords(&tabs, KeywordField::Url, &keywords(&["nope"])).is_empty());
    }

    #[test]
    fn duplicates_keep_first_occurrence() {
        let tabs = vec![
            tab(0, 0, "a1", "a"),
            tab(0, 1, "b", "b"),
            tab(0, 2, "a2", "a"),
            tab(1, 0, "c", "c"),
            tab(1, 1, "a3", "a"),
        ];
        let dups: Vec<&str> = duplicates(&tabs).iter().map(|t| t.title.as_str()).collect();
        assert_eq!(dups, vec!["a2", "a3"]);
    }

    #[test]
    fn no_duplicates_in_distinct_urls() {
        let tabs = vec![tab(0, 0, "a", "a"), tab(0, 1, "b", "b")];
        assert!(duplicates(&tabs).is_empty());
    }

    #[test]
    fn listing_sorted_by_title() {
        let tabs = vec![
            tab(0, 0, "zeta", "https://z.test"),
            tab(0, 1, "Alpha", "https://a.test"),
            tab(1, 0, "beta", "https://b.test"),
        ];
        let titles: Vec<&str> = collapse_for_listing(&tabs)
            .iter()
            .map(|t| t.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Alpha", "beta", "zeta"]);
    }

    #[test]
    fn listing_collapses_same_url_to_last_seen() {
        let tabs = vec![
            tab(0, 0, "first", "https://same.test"),
            tab(1, 0, "second", "https://same.test"),
        ];
        let listed = collapse_for_listing(&tabs);
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].address, TabRef { window: 1, tab: 0 });
    }

    #[test]
    fn listing_collapses_same_title_to_last_seen() {
        let tabs = vec![
            tab(0, 0, "Docs", "https://one.test"),
            tab(0, 1, "Docs", "https://two.test"),
        ];
        let listed = collapse_for_listing(&tabs);
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].url, "https://two.test");
    }

    #[test]
    fn listing_sorts_astral_titles_before_high_bmp_titles() {
        let tabs = vec![
            tab(0, 0, "\u{FF21}BC fullwidth", "https://one.test"),
            tab(0, 1, "\u{1F600} smiley", "https://two.test"),
        ];
        let titles: Vec<&str> = collapse_for_listing(&tabs)
            .into_iter()
            .map(|t| t.title.as_str())
            .collect();
        assert_eq!(titles, vec!["\u{1F600} smiley", "\u{FF21}BC fullwidth"]);
    }

    #[test]
    fn untitled_tabs_collapse_under_placeholder() {
        let tabs = vec![tab(0, 0, "", "https://one.test"), tab(0, 1, "", "https://two.test")];
        let listed = collapse_for_listing(&tabs);
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].display_title(), "No Title");
    }
}
