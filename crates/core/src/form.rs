//! Add/edit form for catalog entries.
//!
//! Fields are addressed with [`FieldPath`] and changed through [`FormEdit`]
//! values. [`GameForm`] tracks the submission phase so a second submit is
//! refused while the first one is still being written.

use std::{collections::BTreeMap, fmt};

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    dates::utc_midnight,
    error::FormError,
    models::{Company, Game, GameDocument, GameId, Platform, Platforms, Ratings, ReleaseDate},
};

static ISO_DAY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date pattern is valid"));

/// Which credit list a field belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CreditList {
    /// Studios that made the game.
    Developers,
    /// Publishers.
    Editors,
}

impl CreditList {
    /// Singular label.
    pub fn label(self) -> &'static str {
        match self {
            CreditList::Developers => "Developer",
            CreditList::Editors => "Editor",
        }
    }
}

/// Part of a credit entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CreditField {
    /// Company name.
    Name,
    /// Company website.
    Link,
}

/// Address of a single text field in the draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldPath {
    /// Game title.
    Name,
    /// Game website.
    Link,
    /// `YYYY-MM-DD` or a free label.
    ReleaseDate,
    /// One field of one credit entry.
    Credit {
        /// Developers or editors.
        list: CreditList,
        /// Position in the list.
        index: usize,
        /// Name or link.
        field: CreditField,
    },
    /// Critics score text.
    RatingCritics,
    /// Players score text.
    RatingPlayers,
    /// Scores page.
    RatingLink,
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldPath::Name => f.write_str("Name"),
            FieldPath::Link => f.write_str("Link"),
            FieldPath::ReleaseDate => f.write_str("Release date"),
            FieldPath::Credit { list, index, field } => {
                let part = match field {
                    CreditField::Name => "name",
                    CreditField::Link => "link",
                };
                write!(f, "{} {} {}", list.label(), index + 1, part)
            }
            FieldPath::RatingCritics => f.write_str("Critics score"),
            FieldPath::RatingPlayers => f.write_str("Players score"),
            FieldPath::RatingLink => f.write_str("Scores link"),
        }
    }
}

/// Editable copy of a game, all scores kept as typed text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameDraft {
    /// Title.
    pub name: String,
    /// Website.
    pub link: String,
    /// Raw release date text.
    pub release_date: String,
    /// Whether the release date is entered as a free label.
    pub release_is_label: bool,
    /// Developer credits.
    pub developers: Vec<Company>,
    /// Publisher credits.
    pub editors: Vec<Company>,
    /// Platform flags.
    pub platforms: Platforms,
    /// Critics score text.
    pub critics: String,
    /// Players score text.
    pub players: String,
    /// Scores page.
    pub rating_link: String,
}

impl Default for GameDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            link: String::new(),
            release_date: String::new(),
            release_is_label: false,
            developers: vec![Company::default()],
            editors: vec![Company::default()],
            platforms: Platforms::with([Platform::Pc]),
            critics: "0".to_string(),
            players: "0".to_string(),
            rating_link: String::new(),
        }
    }
}

impl GameDraft {
    /// Prefill from a stored game.
    pub fn from_game(game: &Game) -> Self {
        let document = &game.document;
        let (release_date, release_is_label) = match &document.release_date {
            ReleaseDate::Label(label) => (label.clone(), true),
            stamp => (
                stamp
                    .instant()
                    .map(|instant| instant.date_naive().format("%Y-%m-%d").to_string())
                    .unwrap_or_default(),
                false,
            ),
        };
        Self {
            name: document.name.clone(),
            link: document.link.clone(),
            release_date,
            release_is_label,
            developers: document.developers.clone(),
            editors: document.editors.clone(),
            platforms: document.platforms.clone(),
            critics: document.ratings.critics.to_string(),
            players: document.ratings.players.to_string(),
            rating_link: document.ratings.link.clone().unwrap_or_default(),
        }
    }

    /// Every text field in display order.
    pub fn fields(&self) -> Vec<FieldPath> {
        let mut fields = vec![FieldPath::Name, FieldPath::Link, FieldPath::ReleaseDate];
        for list in [CreditList::Developers, CreditList::Editors] {
            for index in 0..self.credits(list).len() {
                for field in [CreditField::Name, CreditField::Link] {
                    fields.push(FieldPath::Credit { list, index, field });
                }
            }
        }
        fields.extend([
            FieldPath::RatingCritics,
            FieldPath::RatingPlayers,
            FieldPath::RatingLink,
        ]);
        fields
    }

    /// Current text of a field.
    pub fn value(&self, path: FieldPath) -> Option<&str> {
        let text = match path {
            FieldPath::Name => &self.name,
            FieldPath::Link => &self.link,
            FieldPath::ReleaseDate => &self.release_date,
            FieldPath::Credit { list, index, field } => {
                let company = self.credits(list).get(index)?;
                match field {
                    CreditField::Name => &company.name,
                    CreditField::Link => &company.link,
                }
            }
            FieldPath::RatingCritics => &self.critics,
            FieldPath::RatingPlayers => &self.players,
            FieldPath::RatingLink => &self.rating_link,
        };
        Some(text.as_str())
    }

    /// Credit list by kind.
    pub fn credits(&self, list: CreditList) -> &[Company] {
        match list {
            CreditList::Developers => &self.developers,
            CreditList::Editors => &self.editors,
        }
    }

    fn credits_mut(&mut self, list: CreditList) -> &mut Vec<Company> {
        match list {
            CreditList::Developers => &mut self.developers,
            CreditList::Editors => &mut self.editors,
        }
    }

    fn slot_mut(&mut self, path: FieldPath) -> Option<&mut String> {
        let slot = match path {
            FieldPath::Name => &mut self.name,
            FieldPath::Link => &mut self.link,
            FieldPath::ReleaseDate => &mut self.release_date,
            FieldPath::Credit { list, index, field } => {
                let company = self.credits_mut(list).get_mut(index)?;
                match field {
                    CreditField::Name => &mut company.name,
                    CreditField::Link => &mut company.link,
                }
            }
            FieldPath::RatingCritics => &mut self.critics,
            FieldPath::RatingPlayers => &mut self.players,
            FieldPath::RatingLink => &mut self.rating_link,
        };
        Some(slot)
    }

    /// Apply one edit. Edits addressing a missing credit entry are ignored.
    pub fn apply(&mut self, edit: FormEdit) {
        match edit {
            FormEdit::Set(path, value) => {
                if let Some(slot) = self.slot_mut(path) {
                    *slot = value;
                }
            }
            FormEdit::TogglePlatform(platform) => self.platforms.toggle(platform),
            FormEdit::AddCredit(list) => self.credits_mut(list).push(Company::default()),
            FormEdit::RemoveCredit(list, index) => {
                let credits = self.credits_mut(list);
                if index < credits.len() {
                    credits.remove(index);
                }
            }
            FormEdit::ToggleReleaseLabel => {
                self.release_is_label = !self.release_is_label;
                self.release_date.clear();
            }
            FormEdit::ApplySuggestion {
                list,
                index,
                company,
            } => {
                if let Some(slot) = self.credits_mut(list).get_mut(index) {
                    *slot = company;
                }
            }
        }
    }

    /// Check every rule and build the document to store.
    pub fn validate(&self) -> Result<GameDocument, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        if self.name.trim().is_empty() {
            errors.insert(ErrorField::Name, "Name is required");
        }
        if self.link.trim().is_empty() {
            errors.insert(ErrorField::Link, "Link is required");
        }
        if self.developers.is_empty() || !self.developers.iter().all(Company::is_complete) {
            errors.insert(
                ErrorField::Developers,
                "All developers must have a name and a link",
            );
        }
        if self.editors.is_empty() || !self.editors.iter().all(Company::is_complete) {
            errors.insert(ErrorField::Editors, "All editors must have a name and a link");
        }
        if self.release_date.trim().is_empty() {
            errors.insert(ErrorField::ReleaseDate, "Release date is required");
        }
        if !self.platforms.any_enabled() {
            errors.insert(ErrorField::Platforms, "Select at least one platform");
        }
        let critics = parse_score(&self.critics);
        let players = parse_score(&self.players);
        if critics.is_none() || players.is_none() {
            errors.insert(
                ErrorField::Ratings,
                "Ratings must be whole numbers between 0 and 100",
            );
        }

        match (critics, players) {
            (Some(critics), Some(players)) if errors.is_empty() => Ok(GameDocument {
                name: self.name.trim().to_string(),
                link: self.link.trim().to_string(),
                release_date: parse_release_date(&self.release_date),
                developers: trimmed(&self.developers),
                editors: trimmed(&self.editors),
                platforms: self.platforms.clone(),
                ratings: Ratings {
                    critics,
                    players,
                    link: Some(self.rating_link.trim().to_string()).filter(|link| !link.is_empty()),
                },
            }),
            _ => Err(errors),
        }
    }
}

fn trimmed(companies: &[Company]) -> Vec<Company> {
    companies
        .iter()
        .map(|company| Company::new(company.name.trim(), company.link.trim()))
        .collect()
}

fn parse_score(text: &str) -> Option<u8> {
    let text = text.trim();
    if text.is_empty() {
        return Some(0);
    }
    text.parse::<u8>().ok().filter(|score| *score <= 100)
}

/// `YYYY-MM-DD` naming a real day becomes midnight UTC; anything else is kept as a label.
pub fn parse_release_date(text: &str) -> ReleaseDate {
    let text = text.trim();
    if ISO_DAY.is_match(text) {
        if let Ok(day) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
            return ReleaseDate::from(utc_midnight(day));
        }
    }
    ReleaseDate::Label(text.to_string())
}

/// A single change to the draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEdit {
    /// Replace the text of one field.
    Set(FieldPath, String),
    /// Flip one platform flag.
    TogglePlatform(Platform),
    /// Append a blank credit.
    AddCredit(CreditList),
    /// Drop the credit at an index.
    RemoveCredit(CreditList, usize),
    /// Switch between a day and a free label; clears the entered text.
    ToggleReleaseLabel,
    /// Fill a credit from a known company.
    ApplySuggestion {
        /// Target list.
        list: CreditList,
        /// Target entry.
        index: usize,
        /// Company to copy.
        company: Company,
    },
}

/// Groups reported by validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorField {
    /// Title.
    Name,
    /// Website.
    Link,
    /// Release date.
    ReleaseDate,
    /// Developer list.
    Developers,
    /// Editor list.
    Editors,
    /// Platform flags.
    Platforms,
    /// Scores.
    Ratings,
}

/// Field-level messages from a failed validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<ErrorField, &'static str>);

impl ValidationErrors {
    fn insert(&mut self, field: ErrorField, message: &'static str) {
        self.0.insert(field, message);
    }

    /// Message for a field, if it failed.
    pub fn get(&self, field: ErrorField) -> Option<&'static str> {
        self.0.get(&field).copied()
    }

    /// Whether validation passed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Failed fields with their messages.
    pub fn iter(&self) -> impl Iterator<Item = (ErrorField, &'static str)> + '_ {
        self.0.iter().map(|(field, message)| (*field, *message))
    }
}

/// Whether the form creates or updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    /// New entry.
    Add,
    /// Existing entry.
    Edit(GameId),
}

/// Submission lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPhase {
    /// Nothing entered yet.
    Empty,
    /// Being edited; carries the last failed write, if any.
    Editing {
        /// Message from the last failed write.
        failure: Option<String>,
    },
    /// Submit refused; messages stay until the next submit.
    Invalid(ValidationErrors),
    /// Write in flight.
    Submitting,
    /// Write confirmed.
    Succeeded,
}

/// Result of [`GameForm::begin_submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Valid document to write; the form is now submitting.
    Ready(GameDocument),
    /// Validation failed; nothing to write.
    Invalid(ValidationErrors),
}

/// Draft plus submission state.
#[derive(Debug, Clone)]
pub struct GameForm {
    mode: FormMode,
    draft: GameDraft,
    original: GameDraft,
    phase: FormPhase,
}

impl GameForm {
    /// Blank form for a new entry.
    pub fn add() -> Self {
        Self {
            mode: FormMode::Add,
            draft: GameDraft::default(),
            original: GameDraft::default(),
            phase: FormPhase::Empty,
        }
    }

    /// Form prefilled from an existing entry.
    pub fn edit(game: &Game) -> Self {
        let draft = GameDraft::from_game(game);
        Self {
            mode: FormMode::Edit(game.id.clone()),
            original: draft.clone(),
            draft,
            phase: FormPhase::Editing { failure: None },
        }
    }

    /// Add or edit.
    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    /// Current values.
    pub fn draft(&self) -> &GameDraft {
        &self.draft
    }

    /// Current phase.
    pub fn phase(&self) -> &FormPhase {
        &self.phase
    }

    /// Whether a write is in flight.
    pub fn is_submitting(&self) -> bool {
        self.phase == FormPhase::Submitting
    }

    /// Validation messages from the last refused submit.
    pub fn errors(&self) -> Option<&ValidationErrors> {
        match &self.phase {
            FormPhase::Invalid(errors) => Some(errors),
            _ => None,
        }
    }

    /// Whether the draft differs from what the form was opened with.
    pub fn has_changes(&self) -> bool {
        self.draft != self.original
    }

    /// Change the draft. Refused while a write is in flight.
    pub fn apply(&mut self, edit: FormEdit) -> Result<(), FormError> {
        if self.is_submitting() {
            return Err(FormError::AlreadySubmitting);
        }
        self.draft.apply(edit);
        if matches!(self.phase, FormPhase::Empty | FormPhase::Succeeded) {
            self.phase = FormPhase::Editing { failure: None };
        }
        Ok(())
    }

    /// Validate and, when valid, enter the submitting phase.
    pub fn begin_submit(&mut self) -> Result<SubmitOutcome, FormError> {
        if self.is_submitting() {
            return Err(FormError::AlreadySubmitting);
        }
        if matches!(self.mode, FormMode::Edit(_)) && !self.has_changes() {
            return Err(FormError::Unchanged);
        }
        match self.draft.validate() {
            Ok(document) => {
                self.phase = FormPhase::Submitting;
                Ok(SubmitOutcome::Ready(document))
            }
            Err(errors) => {
                self.phase = FormPhase::Invalid(errors.clone());
                Ok(SubmitOutcome::Invalid(errors))
            }
        }
    }

    /// Record the outcome of the write started by [`GameForm::begin_submit`].
    ///
    /// A successful add resets the draft; a successful edit makes the saved
    /// values the new baseline.
    pub fn finish_submit(&mut self, result: Result<(), String>) -> Result<(), FormError> {
        if !self.is_submitting() {
            return Err(FormError::NotSubmitting);
        }
        match result {
            Ok(()) => {
                match self.mode {
                    FormMode::Add => self.draft = GameDraft::default(),
                    FormMode::Edit(_) => self.original = self.draft.clone(),
                }
                self.phase = FormPhase::Succeeded;
            }
            Err(message) => {
                self.phase = FormPhase::Editing {
                    failure: Some(message),
                };
            }
        }
        Ok(())
    }
}

/// Known companies of one list whose name contains `query`, ignoring case.
///
/// Each name appears once, in first-seen order, with the most recently seen link.
pub fn suggestions(games: &[Game], list: CreditList, query: &str) -> Vec<Company> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    let mut known: Vec<Company> = Vec::new();
    for game in games {
        let credits = match list {
            CreditList::Developers => &game.document.developers,
            CreditList::Editors => &game.document.editors,
        };
        for company in credits.iter().filter(|company| !company.name.is_empty()) {
            match known.iter_mut().find(|seen| seen.name == company.name) {
                Some(seen) => seen.link = company.link.clone(),
                None => known.push(company.clone()),
            }
        }
    }
    known.retain(|company| company.name.to_lowercase().contains(&needle));
    known
}

#[cfg(test)]
mod tests {
    use super::*;

    fn developer_name(index: usize) -> FieldPath {
        FieldPath::Credit {
            list: CreditList::Developers,
            index,
            field: CreditField::Name,
        }
    }

    fn filled() -> GameForm {
        let mut form = GameForm::add();
        let edits = vec![
            FormEdit::Set(FieldPath::Name, "Hades II".to_string()),
            FormEdit::Set(FieldPath::Link, "https://supergiantgames.com".to_string()),
            FormEdit::Set(FieldPath::ReleaseDate, "2025-09-25".to_string()),
            FormEdit::ApplySuggestion {
                list: CreditList::Developers,
                index: 0,
                company: Company::new("Supergiant Games", "https://supergiantgames.com"),
            },
            FormEdit::ApplySuggestion {
                list: CreditList::Editors,
                index: 0,
                company: Company::new("Supergiant Games", "https://supergiantgames.com"),
            },
            FormEdit::Set(FieldPath::RatingCritics, "95".to_string()),
        ];
        for edit in edits {
            form.apply(edit).unwrap();
        }
        form
    }

    fn stored(name: &str, developers: Vec<Company>) -> Game {
        Game::new(
            GameId::new(name),
            GameDocument {
                name: name.to_string(),
                link: "https://example.com".to_string(),
                release_date: ReleaseDate::Label("TBA".to_string()),
                developers,
                editors: vec![Company::new("Annapurna", "https://annapurna.com")],
                platforms: Platforms::with([Platform::Pc]),
                ratings: Ratings::default(),
            },
        )
    }

    #[test]
    fn valid_draft_builds_document() {
        let mut form = filled();
        assert_eq!(form.phase(), &FormPhase::Editing { failure: None });

        let SubmitOutcome::Ready(document) = form.begin_submit().unwrap() else {
            panic!("expected a valid form");
        };
        assert_eq!(document.name, "Hades II");
        assert_eq!(document.release_date, ReleaseDate::Timestamp(1_758_758_400));
        assert_eq!(document.ratings.critics, 95);
        assert_eq!(document.ratings.players, 0);
        assert_eq!(document.ratings.link, None);
        assert!(form.is_submitting());
    }

    #[test]
    fn duplicate_submit_is_refused() {
        let mut form = filled();
        form.begin_submit().unwrap();
        assert_eq!(form.begin_submit(), Err(FormError::AlreadySubmitting));
        assert_eq!(
            form.apply(FormEdit::Set(FieldPath::Name, "x".to_string())),
            Err(FormError::AlreadySubmitting)
        );
    }

    #[test]
    fn failed_write_returns_to_editing_with_message() {
        let mut form = filled();
        form.begin_submit().unwrap();
        form.finish_submit(Err("disk full".to_string())).unwrap();
        assert_eq!(
            form.phase(),
            &FormPhase::Editing {
                failure: Some("disk full".to_string())
            }
        );
        assert_eq!(form.draft().name, "Hades II");
        assert_eq!(form.finish_submit(Ok(())), Err(FormError::NotSubmitting));
    }

    #[test]
    fn successful_add_resets_the_draft() {
        let mut form = filled();
        form.begin_submit().unwrap();
        form.finish_submit(Ok(())).unwrap();
        assert_eq!(form.phase(), &FormPhase::Succeeded);
        assert_eq!(form.draft(), &GameDraft::default());
    }

    #[test]
    fn empty_form_reports_every_required_field() {
        let mut form = GameForm::add();
        form.apply(FormEdit::TogglePlatform(Platform::Pc)).unwrap();
        form.apply(FormEdit::Set(FieldPath::RatingPlayers, "101".to_string()))
            .unwrap();

        let SubmitOutcome::Invalid(errors) = form.begin_submit().unwrap() else {
            panic!("expected validation errors");
        };
        for field in [
            ErrorField::Name,
            ErrorField::Link,
            ErrorField::ReleaseDate,
            ErrorField::Developers,
            ErrorField::Editors,
            ErrorField::Platforms,
            ErrorField::Ratings,
        ] {
            assert!(errors.get(field).is_some(), "{field:?} should fail");
        }
        assert_eq!(form.errors(), Some(&errors));
        assert!(!form.is_submitting());
    }

    #[test]
    fn credits_need_name_and_link() {
        let mut form = filled();
        form.apply(FormEdit::AddCredit(CreditList::Developers)).unwrap();
        form.apply(FormEdit::Set(developer_name(1), "Half done".to_string()))
            .unwrap();
        let SubmitOutcome::Invalid(errors) = form.begin_submit().unwrap() else {
            panic!("expected validation errors");
        };
        assert_eq!(
            errors.get(ErrorField::Developers),
            Some("All developers must have a name and a link")
        );

        form.apply(FormEdit::RemoveCredit(CreditList::Developers, 1))
            .unwrap();
        assert!(matches!(form.begin_submit(), Ok(SubmitOutcome::Ready(_))));
    }

    #[test]
    fn release_text_becomes_timestamp_or_label() {
        assert_eq!(
            parse_release_date("2026-03-01"),
            ReleaseDate::Timestamp(1_772_323_200)
        );
        assert_eq!(parse_release_date("Q3 2026"), ReleaseDate::Label("Q3 2026".into()));
        assert_eq!(parse_release_date("2026-02-30"), ReleaseDate::Label("2026-02-30".into()));
        assert_eq!(parse_release_date("2026-3-1"), ReleaseDate::Label("2026-3-1".into()));
    }

    #[test]
    fn edit_form_tracks_changes() {
        let game = stored("Hollow Knight Silksong", vec![Company::new("Team Cherry", "https://teamcherry.com.au")]);
        let mut form = GameForm::edit(&game);
        assert_eq!(form.mode(), &FormMode::Edit(GameId::new("Hollow Knight Silksong")));
        assert!(form.draft().release_is_label);
        assert!(!form.has_changes());
        assert_eq!(form.begin_submit(), Err(FormError::Unchanged));

        form.apply(FormEdit::ToggleReleaseLabel).unwrap();
        form.apply(FormEdit::Set(FieldPath::ReleaseDate, "2025-09-04".to_string()))
            .unwrap();
        assert!(form.has_changes());

        let SubmitOutcome::Ready(document) = form.begin_submit().unwrap() else {
            panic!("expected a valid form");
        };
        assert!(document.release_date.is_timestamp());
        form.finish_submit(Ok(())).unwrap();
        assert!(!form.has_changes());
    }

    #[test]
    fn field_listing_follows_credit_counts() {
        let mut draft = GameDraft::default();
        assert_eq!(draft.fields().len(), 3 + 2 + 2 + 3);
        draft.apply(FormEdit::AddCredit(CreditList::Editors));
        let fields = draft.fields();
        assert_eq!(fields.len(), 12);
        assert_eq!(draft.value(fields[0]), Some(""));
        assert_eq!(draft.value(FieldPath::RatingCritics), Some("0"));
        assert_eq!(draft.value(developer_name(4)), None);
        assert_eq!(developer_name(0).to_string(), "Developer 1 name");
    }

    #[test]
    fn suggestions_are_unique_and_case_insensitive() {
        let games = vec![
            stored("A", vec![Company::new("Team Cherry", "https://old.example")]),
            stored(
                "B",
                vec![
                    Company::new("Team Cherry", "https://teamcherry.com.au"),
                    Company::new("Cherry Bomb", "https://cherry.example"),
                    Company::new("", "https://nameless.example"),
                ],
            ),
        ];
        let found = suggestions(&games, CreditList::Developers, "CHERRY");
        assert_eq!(
            found,
            vec![
                Company::new("Team Cherry", "https://teamcherry.com.au"),
                Company::new("Cherry Bomb", "https://cherry.example"),
            ]
        );
        assert!(suggestions(&games, CreditList::Developers, " ").is_empty());
        assert_eq!(suggestions(&games, CreditList::Editors, "anna").len(), 1);
    }
}
