//! UI state shared by every view, owned by the application root.

use crate::models::GameId;

/// Top-level screens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum View {
    /// Game catalog.
    #[default]
    Games,
    /// Weekly events calendar.
    Events,
    /// Leaks and rumours listing.
    Leaks,
}

impl View {
    /// Every view in tab order.
    pub const ALL: [View; 3] = [View::Games, View::Events, View::Leaks];

    /// Tab title.
    pub fn title(self) -> &'static str {
        match self {
            View::Games => "Games",
            View::Events => "Events",
            View::Leaks => "Leaks & Rumours",
        }
    }

    /// Following view, wrapping around.
    pub fn next(self) -> Self {
        match self {
            View::Games => View::Events,
            View::Events => View::Leaks,
            View::Leaks => View::Games,
        }
    }
}

/// Dialog shown above the current view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal {
    /// Admin sign-in.
    Login,
    /// New game form.
    AddGame,
    /// Edit form for a game.
    EditGame(GameId),
    /// Delete confirmation for a game.
    ConfirmDelete(GameId),
}

impl Modal {
    /// Dialogs that only make sense for a signed-in admin.
    pub fn requires_admin(&self) -> bool {
        !matches!(self, Modal::Login)
    }
}

/// View, search, dialog and admin flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    view: View,
    search: String,
    modal: Option<Modal>,
    edit_mode: bool,
    expand_all: bool,
    featured_focus: Option<GameId>,
    signed_in: bool,
}

impl AppState {
    /// Initial state: games view, signed out.
    pub fn new() -> Self {
        Self::default()
    }

    /// Active view.
    pub fn view(&self) -> View {
        self.view
    }

    /// Search text of the active view.
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Open dialog.
    pub fn modal(&self) -> Option<&Modal> {
        self.modal.as_ref()
    }

    /// Whether admin controls are shown.
    pub fn edit_mode(&self) -> bool {
        self.edit_mode
    }

    /// Whether every game card is expanded.
    pub fn expand_all(&self) -> bool {
        self.expand_all
    }

    /// Game highlighted from the "next release" banner.
    pub fn featured_focus(&self) -> Option<&GameId> {
        self.featured_focus.as_ref()
    }

    /// Whether an admin session is open.
    pub fn signed_in(&self) -> bool {
        self.signed_in
    }

    /// Change view; search text does not carry over.
    pub fn switch_view(&mut self, view: View) {
        if self.view != view {
            self.view = view;
            self.search.clear();
            self.featured_focus = None;
        }
    }

    /// Replace the search text.
    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    /// Open the add form, or the login dialog when signed out.
    pub fn request_add(&mut self) {
        self.modal = Some(if self.signed_in {
            Modal::AddGame
        } else {
            Modal::Login
        });
    }

    /// Open the login dialog unless a session is already open.
    pub fn request_login(&mut self) {
        if !self.signed_in {
            self.modal = Some(Modal::Login);
        }
    }

    /// Open the edit form for a game. Only available in edit mode.
    pub fn request_edit(&mut self, id: GameId) -> bool {
        if !self.signed_in || !self.edit_mode {
            return false;
        }
        self.modal = Some(Modal::EditGame(id));
        true
    }

    /// Ask for confirmation before deleting a game. Only available in edit mode.
    pub fn request_delete(&mut self, id: GameId) -> bool {
        if !self.signed_in || !self.edit_mode {
            return false;
        }
        self.modal = Some(Modal::ConfirmDelete(id));
        true
    }

    /// Flip edit mode; signed-out users get the login dialog instead.
    ///
    /// Entering edit mode expands every card.
    pub fn toggle_edit_mode(&mut self) -> bool {
        if !self.signed_in {
            self.modal = Some(Modal::Login);
            return false;
        }
        self.edit_mode = !self.edit_mode;
        self.expand_all = self.edit_mode;
        true
    }

    /// Expand or collapse every card.
    pub fn toggle_expand_all(&mut self) {
        self.expand_all = !self.expand_all;
    }

    /// Follow the auth session.
    ///
    /// Signing in closes the login dialog. Signing out leaves edit mode and
    /// closes any admin dialog.
    pub fn set_signed_in(&mut self, signed_in: bool) {
        self.signed_in = signed_in;
        if signed_in {
            if self.modal == Some(Modal::Login) {
                self.modal = None;
            }
            return;
        }
        self.edit_mode = false;
        self.expand_all = false;
        if self.modal.as_ref().map_or(false, Modal::requires_admin) {
            self.modal = None;
        }
    }

    /// Dismiss the open dialog.
    pub fn close_modal(&mut self) {
        self.modal = None;
    }

    /// Highlight a game from the banner, switching to the games view.
    pub fn focus_featured(&mut self, id: GameId) {
        self.switch_view(View::Games);
        self.featured_focus = Some(id);
    }

    /// Drop the banner highlight.
    pub fn clear_focus(&mut self) {
        self.featured_focus = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn switching_view_clears_search() {
        let mut state = AppState::new();
        state.set_search("zelda");
        state.switch_view(View::Events);
        assert_eq!(state.view(), View::Events);
        assert_eq!(state.search(), "");

        state.set_search("direct");
        state.switch_view(View::Events);
        assert_eq!(state.search(), "direct");
        assert_eq!(View::Leaks.next(), View::Games);
    }

    #[test]
    fn admin_actions_require_sign_in() {
        let mut state = AppState::new();
        state.request_add();
        assert_eq!(state.modal(), Some(&Modal::Login));

        assert!(!state.toggle_edit_mode());
        assert!(!state.edit_mode());
        assert!(!state.request_edit(GameId::new("g1")));

        state.set_signed_in(true);
        assert_eq!(state.modal(), None);
        state.request_add();
        assert_eq!(state.modal(), Some(&Modal::AddGame));
    }

    #[test]
    fn edit_mode_expands_cards_and_unlocks_edits() {
        let mut state = AppState::new();
        state.set_signed_in(true);
        assert!(state.toggle_edit_mode());
        assert!(state.edit_mode());
        assert!(state.expand_all());

        assert!(state.request_delete(GameId::new("g1")));
        assert_eq!(state.modal(), Some(&Modal::ConfirmDelete(GameId::new("g1"))));
        state.close_modal();
        assert!(state.request_edit(GameId::new("g2")));
    }

    #[test]
    fn signing_out_leaves_admin_state() {
        let mut state = AppState::new();
        state.set_signed_in(true);
        state.toggle_edit_mode();
        state.request_edit(GameId::new("g1"));

        state.set_signed_in(false);
        assert!(!state.edit_mode());
        assert!(!state.expand_all());
        assert_eq!(state.modal(), None);

        state.request_add();
        state.set_signed_in(false);
        assert_eq!(state.modal(), Some(&Modal::Login));
    }

    #[test]
    fn login_dialog_only_when_signed_out() {
        let mut state = AppState::new();
        state.request_login();
        assert_eq!(state.modal(), Some(&Modal::Login));

        state.set_signed_in(true);
        state.request_login();
        assert_eq!(state.modal(), None);
    }

    #[test]
    fn featured_focus_returns_to_games() {
        let mut state = AppState::new();
        state.switch_view(View::Leaks);
        state.focus_featured(GameId::new("next"));
        assert_eq!(state.view(), View::Games);
        assert_eq!(state.featured_focus(), Some(&GameId::new("next")));
        state.switch_view(View::Events);
        assert_eq!(state.featured_focus(), None);
    }
}
