//! Filter/sort engine for the users table.
//!
//! [`derive_display_list`] is a pure function: callers re-run it whenever the
//! search text, the sort key or the source list changes.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::api::User;

/// Field the displayed list is ordered by.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum SortKey {
    #[default]
    Name,
    /// `company.name`
    Company,
}

impl SortKey {
    pub const ALL: [SortKey; 2] = [SortKey::Name, SortKey::Company];

    pub fn field<'a>(&self, user: &'a User) -> &'a str {
        match self {
            SortKey::Name => &user.name,
            SortKey::Company => &user.company.name,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Name => "name",
            SortKey::Company => "company",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(SortKey::Name),
            "company" | "company.name" => Ok(SortKey::Company),
            other => Err(format!("unknown sort key '{other}' (expected name|company)")),
        }
    }
}

/// Search text plus sort key. Lives only for one session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Query {
    pub search: String,
    pub sort_key: SortKey,
}

impl Query {
    pub fn new(search: impl Into<String>, sort_key: SortKey) -> Self {
        Self {
            search: search.into(),
            sort_key,
        }
    }
}

/// Case-insensitive substring match on name or email. Empty needle matches.
pub fn matches(user: &User, needle_lower: &str) -> bool {
    needle_lower.is_empty()
        || user.name.to_lowercase().contains(needle_lower)
        || user.email.to_lowercase().contains(needle_lower)
}

/// Locale-aware string ordering.
///
/// Levels, compared in turn: transliterated letters ignoring case, then
/// accents, then case (lower before upper), then raw code points.
pub fn collate(a: &str, b: &str) -> Ordering {
    let primary = |s: &str| deunicode::deunicode(s).to_lowercase();
    primary(a)
        .cmp(&primary(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| {
            a.chars()
                .map(char::is_uppercase)
                .cmp(b.chars().map(char::is_uppercase))
        })
        .then_with(|| a.cmp(b))
}

/// Filter `source` by the query text and order it by the query's sort key.
///
/// The sort is stable, so users comparing equal keep their source order.
pub fn derive_display_list(source: &[User], query: &Query) -> Vec<User> {
    let needle = query.search.to_lowercase();
    let key = query.sort_key;
    let mut shown: Vec<User> = source
        .iter()
        .filter(|u| matches(u, &needle))
        .cloned()
        .collect();
    shown.sort_by(|a, b| collate(key.field(a), key.field(b)));
    tracing::debug!(
        search = %query.search,
        sort = %key,
        source = source.len(),
        shown = shown.len(),
        "derived display list"
    );
    shown
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Address, Company, Id, UserId};

    fn mk_user(id: u64, name: &str, email: &str, company: &str) -> User {
        User {
            id: UserId::from(id),
            name: name.to_string(),
            username: String::new(),
            email: email.to_string(),
            address: Address {
                street: "Kulas Light".into(),
                city: "Gwenborough".into(),
                ..Address::default()
            },
            phone: String::new(),
            website: String::new(),
            company: Company {
                name: company.to_string(),
                ..Company::default()
            },
        }
    }

    fn sample() -> Vec<User> {
        vec![
            mk_user(1, "Leanne Graham", "Sincere@april.biz", "Romaguera-Crona"),
            mk_user(2, "Ervin Howell", "Shanna@melissa.tv", "Deckow-Crist"),
        ]
    }

    fn ids(users: &[User]) -> Vec<u64> {
        users
            .iter()
            .map(|u| match u.id.0 {
                Id::Num(n) => n,
                Id::Text(ref s) => panic!("unexpected text id {s}"),
            })
            .collect()
    }

    #[test]
    fn search_matches_name_case_insensitively() {
        let shown = derive_display_list(&sample(), &Query::new("ervin", SortKey::Name));
        assert_eq!(ids(&shown), vec![2]);
    }

    #[test]
    fn search_matches_email() {
        let shown = derive_display_list(&sample(), &Query::new("APRIL.BIZ", SortKey::Name));
        assert_eq!(ids(&shown), vec![1]);
    }

    #[test]
    fn empty_search_sorts_everything_by_name() {
        let shown = derive_display_list(&sample(), &Query::default());
        assert_eq!(ids(&shown), vec![2, 1]);
    }

    #[test]
    fn company_key_orders_by_company_name() {
        let shown = derive_display_list(&sample(), &Query::new("", SortKey::Company));
        // Deckow-Crist < Romaguera-Crona
        assert_eq!(ids(&shown), vec![2, 1]);
    }

    #[test]
    fn no_match_yields_empty_list() {
        let shown = derive_display_list(&sample(), &Query::new("zzz", SortKey::Name));
        assert!(shown.is_empty());
    }

    #[test]
    fn ties_keep_source_order() {
        let users = vec![
            mk_user(5, "Sam", "b@x", "c"),
            mk_user(3, "Sam", "a@x", "c"),
            mk_user(4, "Alex", "c@x", "c"),
        ];
        let shown = derive_display_list(&users, &Query::default());
        assert_eq!(ids(&shown), vec![4, 5, 3]);
    }

    #[test]
    fn collation_ignores_case_at_primary_level() {
        assert_eq!(collate("apple", "Banana"), Ordering::Less);
        assert_eq!(collate("Banana", "apple"), Ordering::Greater);
        // byte order would put 'Z' before 'a'
        assert_eq!(collate("alpha", "Zulu"), Ordering::Less);
    }

    #[test]
    fn collation_places_accented_letters_with_base_letter() {
        assert_eq!(collate("Émile", "Fred"), Ordering::Less);
        assert_eq!(collate("Emile", "Émile"), Ordering::Less);
    }

    #[test]
    fn collation_puts_lower_case_first_on_tie() {
        assert_eq!(collate("a", "A"), Ordering::Less);
        assert_eq!(collate("same", "same"), Ordering::Equal);
    }

    #[test]
    fn sort_key_parses_loosely() {
        assert_eq!("Name".parse::<SortKey>(), Ok(SortKey::Name));
        assert_eq!("company.name".parse::<SortKey>(), Ok(SortKey::Company));
        assert!("email".parse::<SortKey>().is_err());
    }
}
