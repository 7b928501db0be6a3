//! Dashboard core: two loaders, the query and the selection.
//!
//! This is a pure state machine. It never performs I/O: operations that need
//! the network return a [`FetchRequest`] for the runtime to execute, and the
//! runtime feeds the result back as a [`FetchOutcome`].

use crate::api::{Post, User, UserId};
use crate::error::{FetchError, POSTS_FETCH_FAILED, USERS_FETCH_FAILED};
use crate::search::{Query, SortKey, derive_display_list};

use super::loader::{LoadStatus, Loader, RequestTicket};

/// Network work the dashboard wants done.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FetchRequest {
    Users {
        ticket: RequestTicket,
    },
    Posts {
        ticket: RequestTicket,
        user_id: UserId,
    },
}

impl FetchRequest {
    pub fn ticket(&self) -> RequestTicket {
        match self {
            FetchRequest::Users { ticket } | FetchRequest::Posts { ticket, .. } => *ticket,
        }
    }
}

/// Completed network work, routed back into the dashboard.
#[derive(Debug)]
pub enum FetchOutcome {
    Users {
        ticket: RequestTicket,
        result: Result<Vec<User>, FetchError>,
    },
    Posts {
        ticket: RequestTicket,
        user_id: UserId,
        result: Result<Vec<Post>, FetchError>,
    },
}

#[derive(Debug, Default)]
pub struct Dashboard {
    users: Loader<Vec<User>>,
    displayed: Vec<User>,
    query: Query,
    selected: Option<User>,
    posts: Loader<Vec<Post>>,
    activated: bool,
    next_ticket: u64,
}

impl Dashboard {
    pub fn new(sort_key: SortKey) -> Self {
        Self {
            query: Query::new(String::new(), sort_key),
            ..Self::default()
        }
    }

    /// First activation issues the one and only users request.
    pub fn activate(&mut self) -> Option<FetchRequest> {
        if self.activated {
            return None;
        }
        self.activated = true;
        let ticket = self.issue_ticket();
        self.users.begin(ticket);
        tracing::info!(%ticket, "requesting user list");
        Some(FetchRequest::Users { ticket })
    }

    /// Route a completed request to its loader. Returns `false` if it was stale.
    pub fn apply(&mut self, outcome: FetchOutcome) -> bool {
        match outcome {
            FetchOutcome::Users { ticket, result } => self.users_loaded(ticket, result),
            FetchOutcome::Posts {
                ticket,
                user_id,
                result,
            } => self.posts_loaded(ticket, user_id, result),
        }
    }

    pub fn users_loaded(
        &mut self,
        ticket: RequestTicket,
        result: Result<Vec<User>, FetchError>,
    ) -> bool {
        let applied = match result {
            Ok(users) => {
                let count = users.len();
                let applied = self.users.succeed(ticket, users);
                if applied {
                    tracing::info!(%ticket, count, "user list loaded");
                    self.refresh();
                }
                applied
            }
            Err(err) => {
                let applied = self.users.fail(ticket, USERS_FETCH_FAILED);
                if applied {
                    tracing::warn!(%ticket, kind = err.kind(), error = %err, "user list fetch failed");
                }
                applied
            }
        };
        if !applied {
            tracing::debug!(%ticket, "dropping stale users response");
        }
        applied
    }

    pub fn posts_loaded(
        &mut self,
        ticket: RequestTicket,
        user_id: UserId,
        result: Result<Vec<Post>, FetchError>,
    ) -> bool {
        let applied = match result {
            Ok(posts) => {
                let count = posts.len();
                let applied = self.posts.succeed(ticket, posts);
                if applied {
                    tracing::info!(%ticket, %user_id, count, "posts loaded");
                }
                applied
            }
            Err(err) => {
                let applied = self.posts.fail(ticket, POSTS_FETCH_FAILED);
                if applied {
                    tracing::warn!(%ticket, %user_id, kind = err.kind(), error = %err, "posts fetch failed");
                }
                applied
            }
        };
        if !applied {
            tracing::debug!(%ticket, %user_id, "dropping stale posts response");
        }
        applied
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        let search = search.into();
        if search == self.query.search {
            return;
        }
        self.query.search = search;
        self.refresh();
    }

    pub fn set_sort_key(&mut self, sort_key: SortKey) {
        if sort_key == self.query.sort_key {
            return;
        }
        self.query.sort_key = sort_key;
        self.refresh();
    }

    /// Select `user` and request its posts. The selection sticks whatever the
    /// fetch outcome; re-selecting the same user fetches again.
    pub fn select_user(&mut self, user: User) -> FetchRequest {
        let user_id = user.id.clone();
        let switching = self.selected.as_ref().map(|u| &u.id) != Some(&user_id);
        if switching {
            self.posts.reset_value(Vec::new());
        }
        self.selected = Some(user);
        let ticket = self.issue_ticket();
        self.posts.begin(ticket);
        tracing::info!(%ticket, %user_id, switching, "requesting posts");
        FetchRequest::Posts { ticket, user_id }
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    /// Source list as last fetched.
    pub fn users(&self) -> &[User] {
        self.users.value()
    }

    /// Filtered and sorted view of [`Self::users`].
    pub fn displayed(&self) -> &[User] {
        &self.displayed
    }

    pub fn selected(&self) -> Option<&User> {
        self.selected.as_ref()
    }

    pub fn posts(&self) -> &[Post] {
        self.posts.value()
    }

    pub fn users_status(&self) -> &LoadStatus {
        self.users.status()
    }

    pub fn posts_status(&self) -> &LoadStatus {
        self.posts.status()
    }

    pub fn users_loading(&self) -> bool {
        self.users.is_loading()
    }

    pub fn posts_loading(&self) -> bool {
        self.posts.is_loading()
    }

    pub fn users_error(&self) -> Option<&str> {
        self.users.error()
    }

    pub fn posts_error(&self) -> Option<&str> {
        self.posts.error()
    }

    /// Ticket of the posts request currently awaited, if any.
    pub fn pending_posts(&self) -> Option<RequestTicket> {
        self.posts.pending()
    }

    fn refresh(&mut self) {
        self.displayed = derive_display_list(self.users.value(), &self.query);
    }

    fn issue_ticket(&mut self) -> RequestTicket {
        self.next_ticket += 1;
        RequestTicket(self.next_ticket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Address, Company, PostId};

    fn mk_user(id: u64, name: &str, email: &str) -> User {
        User {
            id: UserId::from(id),
            name: name.into(),
            username: String::new(),
            email: email.into(),
            address: Address::default(),
            phone: String::new(),
            website: String::new(),
            company: Company::default(),
        }
    }

    fn mk_post(id: u64, user: u64) -> Post {
        Post {
            id: PostId::from(id),
            user_id: UserId::from(user),
            title: format!("post {id}"),
            body: "body".into(),
        }
    }

    fn two_users() -> Vec<User> {
        vec![
            mk_user(1, "Leanne Graham", "Sincere@april.biz"),
            mk_user(2, "Ervin Howell", "Shanna@melissa.tv"),
        ]
    }

    fn loaded() -> Dashboard {
        let mut d = Dashboard::new(SortKey::Name);
        let Some(FetchRequest::Users { ticket }) = d.activate() else {
            panic!("expected users request");
        };
        assert!(d.users_loaded(ticket, Ok(two_users())));
        d
    }

    fn transport_error() -> FetchError {
        FetchError::Status {
            status: 500,
            url: "http://test/".into(),
        }
    }

    #[test]
    fn activation_requests_users_once() {
        let mut d = Dashboard::new(SortKey::Name);
        assert!(matches!(d.activate(), Some(FetchRequest::Users { .. })));
        assert!(d.users_loading());
        assert_eq!(d.activate(), None);
    }

    #[test]
    fn loaded_users_are_displayed_sorted() {
        let d = loaded();
        let names: Vec<_> = d.displayed().iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["Ervin Howell", "Leanne Graham"]);
        assert!(!d.users_loading());
        assert_eq!(d.users_error(), None);
    }

    #[test]
    fn search_typed_before_load_applies_on_arrival() {
        let mut d = Dashboard::new(SortKey::Name);
        let ticket = d.activate().unwrap().ticket();
        d.set_search("ervin");
        assert!(d.displayed().is_empty());
        d.users_loaded(ticket, Ok(two_users()));
        assert_eq!(d.displayed().len(), 1);
        assert_eq!(d.displayed()[0].id, UserId::from(2));
    }

    #[test]
    fn users_failure_keeps_empty_list_and_sets_message() {
        let mut d = Dashboard::new(SortKey::Name);
        let ticket = d.activate().unwrap().ticket();
        assert!(d.users_loaded(ticket, Err(transport_error())));
        assert_eq!(d.users_error(), Some("Failed to fetch users"));
        assert!(d.users().is_empty());
        assert!(d.displayed().is_empty());
        assert!(!d.users_loading());
    }

    #[test]
    fn sort_key_change_rederives() {
        let mut d = loaded();
        d.set_search("a");
        let before = d.displayed().len();
        d.set_sort_key(SortKey::Company);
        assert_eq!(d.query().sort_key, SortKey::Company);
        assert_eq!(d.displayed().len(), before);
    }

    #[test]
    fn selection_sticks_even_when_posts_fail() {
        let mut d = loaded();
        let user = d.displayed()[0].clone();
        let req = d.select_user(user.clone());
        assert!(d.posts_loading());
        assert_eq!(d.selected(), Some(&user));
        assert!(d.posts_loaded(req.ticket(), user.id.clone(), Err(transport_error())));
        assert_eq!(d.selected(), Some(&user));
        assert_eq!(d.posts_error(), Some("Failed to fetch posts"));
    }

    #[test]
    fn empty_posts_response_is_not_an_error() {
        let mut d = loaded();
        let user = d.displayed()[0].clone();
        let req = d.select_user(user.clone());
        assert!(d.posts_loaded(req.ticket(), user.id.clone(), Ok(vec![])));
        assert!(d.posts().is_empty());
        assert_eq!(d.posts_error(), None);
        assert_eq!(d.posts_status(), &LoadStatus::Loaded);
    }

    #[test]
    fn switching_user_clears_previous_posts() {
        let mut d = loaded();
        let first = d.users()[0].clone();
        let second = d.users()[1].clone();
        let req = d.select_user(first.clone());
        d.posts_loaded(req.ticket(), first.id.clone(), Ok(vec![mk_post(1, 1), mk_post(2, 1)]));
        assert_eq!(d.posts().len(), 2);

        d.select_user(second);
        assert!(d.posts().is_empty());
    }

    #[test]
    fn reselecting_same_user_refetches_and_keeps_posts_meanwhile() {
        let mut d = loaded();
        let user = d.users()[0].clone();
        let first = d.select_user(user.clone());
        d.posts_loaded(first.ticket(), user.id.clone(), Ok(vec![mk_post(1, 1)]));

        let second = d.select_user(user.clone());
        assert_ne!(first.ticket(), second.ticket());
        assert!(d.posts_loading());
        assert_eq!(d.posts().len(), 1);
    }

    #[test]
    fn stale_posts_response_cannot_override_newer_selection() {
        let mut d = loaded();
        let leanne = d.users()[0].clone();
        let ervin = d.users()[1].clone();
        let slow = d.select_user(leanne.clone());
        let fast = d.select_user(ervin.clone());

        assert!(d.posts_loaded(fast.ticket(), ervin.id.clone(), Ok(vec![mk_post(11, 2)])));
        assert!(!d.posts_loaded(slow.ticket(), leanne.id.clone(), Ok(vec![mk_post(1, 1)])));

        assert_eq!(d.selected().map(|u| &u.id), Some(&ervin.id));
        assert!(d.posts().iter().all(|p| p.user_id == ervin.id));
    }

    #[test]
    fn loader_errors_are_scoped() {
        let mut d = Dashboard::new(SortKey::Name);
        let ticket = d.activate().unwrap().ticket();
        d.users_loaded(ticket, Err(transport_error()));

        let req = d.select_user(mk_user(9, "Nobody", "n@x"));
        d.posts_loaded(req.ticket(), UserId::from(9), Err(transport_error()));

        assert_eq!(d.users_error(), Some("Failed to fetch users"));
        assert_eq!(d.posts_error(), Some("Failed to fetch posts"));

        let again = d.select_user(mk_user(9, "Nobody", "n@x"));
        d.posts_loaded(again.ticket(), UserId::from(9), Ok(vec![]));
        assert_eq!(d.posts_error(), None);
        assert_eq!(d.users_error(), Some("Failed to fetch users"));
    }

    #[test]
    fn apply_routes_outcomes() {
        let mut d = Dashboard::new(SortKey::Name);
        let ticket = d.activate().unwrap().ticket();
        assert!(d.apply(FetchOutcome::Users {
            ticket,
            result: Ok(two_users()),
        }));
        assert_eq!(d.users().len(), 2);
    }
}
