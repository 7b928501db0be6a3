use std::sync::Arc;

use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::api::DirectoryClient;
use crate::app::fetcher::Fetcher;
use crate::app::{AppAction, AppState};
use crate::error::Result;
use crate::ui;

/// Drive the dashboard until the user quits.
///
/// Terminal input and fetch completions are multiplexed on one task; fetches
/// themselves run as separate tasks on the same (current-thread) runtime.
pub async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    mut app: AppState,
    client: Arc<dyn DirectoryClient>,
) -> Result<()> {
    let (mut fetcher, mut outcomes) = Fetcher::channel(client);
    let initial = app.activate();
    dispatch(&mut fetcher, initial);

    let mut events = EventStream::new();
    loop {
        terminal.draw(|f| ui::render(f, &mut app))?;

        let quit = tokio::select! {
            maybe_event = events.next() => match maybe_event {
                Some(Ok(event)) => {
                    let actions = handle_event(&mut app, event);
                    dispatch(&mut fetcher, actions)
                }
                Some(Err(err)) => return Err(err.into()),
                None => true,
            },
            Some(outcome) = outcomes.recv() => {
                app.apply_outcome(outcome);
                false
            }
        };
        if quit {
            break;
        }
    }

    fetcher.shutdown();
    tracing::info!("event loop finished");
    Ok(())
}

/// Translate one terminal event into app actions.
pub fn handle_event(app: &mut AppState, event: Event) -> Vec<AppAction> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
        Event::Mouse(mouse) => app.handle_mouse(mouse),
        _ => Vec::new(),
    }
}

/// Execute actions. Returns `true` when the loop should stop.
fn dispatch(fetcher: &mut Fetcher, actions: Vec<AppAction>) -> bool {
    let mut quit = false;
    for action in actions {
        match action {
            AppAction::Quit => quit = true,
            AppAction::Fetch(request) => fetcher.execute(request),
        }
    }
    quit
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Address, Company, Post, PostId, User, UserId};
    use crate::error::FetchError;
    use async_trait::async_trait;
    use crossterm::event::{KeyCode, KeyEvent, KeyEventState, KeyModifiers};

    struct OneUser;

    #[async_trait]
    impl DirectoryClient for OneUser {
        async fn fetch_users(&self) -> std::result::Result<Vec<User>, FetchError> {
            Ok(vec![User {
                id: UserId::from(1),
                name: "Leanne Graham".into(),
                username: "Bret".into(),
                email: "Sincere@april.biz".into(),
                address: Address::default(),
                phone: String::new(),
                website: String::new(),
                company: Company::default(),
            }])
        }

        async fn fetch_posts(&self, user_id: UserId) -> std::result::Result<Vec<Post>, FetchError> {
            Ok(vec![Post {
                id: PostId::from(1),
                user_id,
                title: "sunt aut facere".into(),
                body: "quia et suscipit".into(),
            }])
        }
    }

    #[test]
    fn key_release_is_ignored() {
        let mut app = AppState::default();
        let release = KeyEvent {
            code: KeyCode::Char('q'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert!(handle_event(&mut app, Event::Key(release)).is_empty());
        let press = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        assert_eq!(handle_event(&mut app, Event::Key(press)), vec![AppAction::Quit]);
    }

    #[tokio::test]
    async fn activation_and_selection_round_trip_through_fetcher() {
        let mut app = AppState::default();
        let (mut fetcher, mut outcomes) = Fetcher::channel(Arc::new(OneUser));

        assert!(!dispatch(&mut fetcher, app.activate()));
        let outcome = outcomes.recv().await.unwrap();
        app.apply_outcome(outcome);
        assert_eq!(app.dashboard.displayed().len(), 1);

        let enter = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        let actions = handle_event(&mut app, Event::Key(enter));
        assert!(!dispatch(&mut fetcher, actions));
        assert!(app.dashboard.posts_loading());

        let outcome = outcomes.recv().await.unwrap();
        app.apply_outcome(outcome);
        assert!(!app.dashboard.posts_loading());
        assert_eq!(app.dashboard.posts().len(), 1);
        assert_eq!(app.dashboard.posts()[0].user_id, UserId::from(1));
    }
}
