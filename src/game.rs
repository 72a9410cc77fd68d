use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::{info, warn};

use crate::catalog::Catalog;
use crate::round::{GuessResult, Round, RoundError, RoundPhase, MAX_ATTEMPTS};

/// Portraits per row on the board
pub const BOARD_COLUMNS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    NameEntry,
    Playing,
    /// Every attempt is spent; only a non-blank guess gets out of here.
    FinalGuess,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Board,
    Questions,
    Guess,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Focus::Board => Focus::Questions,
            Focus::Questions => Focus::Guess,
            Focus::Guess => Focus::Board,
        }
    }

    fn prev(self) -> Self {
        match self {
            Focus::Board => Focus::Guess,
            Focus::Questions => Focus::Board,
            Focus::Guess => Focus::Questions,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    fn new(kind: NoticeKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// What the host loop should do after a key was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameCommand {
    Continue,
    Quit { record: bool },
}

/// Everything the terminal host shows and edits around the live round
#[derive(Debug)]
pub struct Game {
    catalog: Catalog,
    round: Round,
    player: String,
    mode: Mode,
    focus: Focus,
    board_cursor: usize,
    crossed: Vec<bool>,
    question_cursor: usize,
    /// answer per question, `None` until asked
    answers: Vec<Option<bool>>,
    input: String,
    notice: Option<Notice>,
}

impl Game {
    pub fn new(catalog: Catalog, player: Option<String>) -> Result<Self, RoundError> {
        let round = Round::start(&catalog)?;
        Ok(Self::with_round(catalog, round, player))
    }

    /// Host around an already started round
    pub fn with_round(catalog: Catalog, round: Round, player: Option<String>) -> Self {
        let player = player
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());
        let mode = if player.is_some() {
            Mode::Playing
        } else {
            Mode::NameEntry
        };
        Self {
            crossed: vec![false; catalog.characters.len()],
            answers: vec![None; catalog.questions.len()],
            catalog,
            round,
            player: player.unwrap_or_default(),
            mode,
            focus: Focus::Questions,
            board_cursor: 0,
            question_cursor: 0,
            input: String::new(),
            notice: None,
        }
    }

    /// Throw the live round away and deal a new secret to the same player.
    pub fn new_round(&mut self) -> Result<(), RoundError> {
        let round = Round::start(&self.catalog)?;
        self.reset_with(round);
        Ok(())
    }

    fn reset_with(&mut self, round: Round) {
        self.round = round;
        self.mode = Mode::Playing;
        self.focus = Focus::Questions;
        self.board_cursor = 0;
        self.question_cursor = 0;
        self.crossed = vec![false; self.catalog.characters.len()];
        self.answers = vec![None; self.catalog.questions.len()];
        self.input.clear();
        self.notice = None;
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn round(&self) -> &Round {
        &self.round
    }

    pub fn player(&self) -> &str {
        &self.player
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn board_cursor(&self) -> usize {
        self.board_cursor
    }

    pub fn is_crossed(&self, idx: usize) -> bool {
        self.crossed.get(idx).copied().unwrap_or(false)
    }

    pub fn question_cursor(&self) -> usize {
        self.question_cursor
    }

    pub fn answer(&self, idx: usize) -> Option<bool> {
        self.answers.get(idx).copied().flatten()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn attempts_label(&self) -> String {
        match (self.round.attempts(), self.round.remaining()) {
            (0, _) => format!("Think before you ask: you have {MAX_ATTEMPTS} attempts"),
            (_, 0) => "No attempts left".to_string(),
            (_, 1) => "1 attempt left".to_string(),
            (_, n) => format!("{n} attempts left"),
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) -> GameCommand {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') => GameCommand::Quit {
                    record: self.mode == Mode::Finished,
                },
                KeyCode::Char('r') if matches!(self.mode, Mode::Playing | Mode::Finished) => {
                    self.restart();
                    GameCommand::Continue
                }
                _ => GameCommand::Continue,
            };
        }

        match self.mode {
            Mode::NameEntry => self.on_name_key(key),
            Mode::Playing => self.on_play_key(key),
            Mode::FinalGuess => self.on_final_guess_key(key),
            Mode::Finished => self.on_finished_key(key),
        }
    }

    fn restart(&mut self) {
        if let Err(e) = self.new_round() {
            warn!("could not start a new round: {e}");
            self.notice = Some(Notice::new(NoticeKind::Error, e.to_string()));
        }
    }

    fn on_name_key(&mut self, key: KeyEvent) -> GameCommand {
        match key.code {
            KeyCode::Esc => return GameCommand::Quit { record: false },
            KeyCode::Enter => {
                let name = self.input.trim();
                if name.is_empty() {
                    self.notice = Some(Notice::new(NoticeKind::Error, "Tell me your name first."));
                } else {
                    self.player = name.to_string();
                    info!("player {} joined", self.player);
                    self.input.clear();
                    self.notice = None;
                    self.mode = Mode::Playing;
                }
            }
            _ => self.edit_input(key),
        }
        GameCommand::Continue
    }

    fn on_play_key(&mut self, key: KeyEvent) -> GameCommand {
        match key.code {
            KeyCode::Esc => return GameCommand::Quit { record: false },
            KeyCode::Tab => self.focus = self.focus.next(),
            KeyCode::BackTab => self.focus = self.focus.prev(),
            _ => match self.focus {
                Focus::Board => self.on_board_key(key),
                Focus::Questions => self.on_questions_key(key),
                Focus::Guess => match key.code {
                    KeyCode::Enter => self.submit_guess(),
                    _ => self.edit_input(key),
                },
            },
        }
        GameCommand::Continue
    }

    fn on_board_key(&mut self, key: KeyEvent) {
        let len = self.crossed.len();
        if len == 0 {
            return;
        }
        let cur = self.board_cursor;
        self.board_cursor = match key.code {
            KeyCode::Left => cur.saturating_sub(1),
            KeyCode::Right => (cur + 1).min(len - 1),
            KeyCode::Up => cur.checked_sub(BOARD_COLUMNS).unwrap_or(cur),
            KeyCode::Down if cur + BOARD_COLUMNS < len => cur + BOARD_COLUMNS,
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.crossed[cur] = !self.crossed[cur];
                cur
            }
            _ => cur,
        };
    }

    fn on_questions_key(&mut self, key: KeyEvent) {
        let len = self.answers.len();
        match key.code {
            KeyCode::Up => self.question_cursor = self.question_cursor.saturating_sub(1),
            KeyCode::Down if self.question_cursor + 1 < len => self.question_cursor += 1,
            KeyCode::Enter | KeyCode::Char(' ') => self.ask_selected(),
            _ => {}
        }
    }

    /// Questions are one-shot: an answered one stays disabled for the round.
    fn ask_selected(&mut self) {
        let idx = self.question_cursor;
        if self.answer(idx).is_some() {
            return;
        }
        let Some(question) = self.catalog.questions.get(idx) else {
            return;
        };
        match self.round.ask_attribute(&question.tag) {
            Ok(outcome) => {
                self.answers[idx] = Some(outcome.matches);
                if self.round.phase() == RoundPhase::Exhausted {
                    self.mode = Mode::FinalGuess;
                    self.focus = Focus::Guess;
                    self.input.clear();
                    self.notice = Some(Notice::new(
                        NoticeKind::Info,
                        "Out of attempts: now you have to guess the character.",
                    ));
                } else if outcome.matches {
                    self.notice = Some(Notice::new(NoticeKind::Success, "Correct!"));
                } else {
                    self.notice = Some(Notice::new(NoticeKind::Info, "Sorry to tell you: NO."));
                }
            }
            Err(e) => self.notice = Some(Notice::new(NoticeKind::Error, e.to_string())),
        }
    }

    fn submit_guess(&mut self) {
        let guess = std::mem::take(&mut self.input);
        match self.round.submit_guess(&guess) {
            Ok(GuessResult::Empty) => {
                self.notice = Some(Notice::new(NoticeKind::Error, "This field can't be empty."));
            }
            Ok(GuessResult::Correct) => {
                self.mode = Mode::Finished;
                self.notice = Some(Notice::new(
                    NoticeKind::Success,
                    format!("You're a machine! Yes, I am {}.", self.round.secret().name()),
                ));
            }
            Ok(GuessResult::Incorrect) => {
                self.notice = Some(Notice::new(
                    NoticeKind::Info,
                    format!("No way! I'm not {}, think a little more...", guess.trim().to_lowercase()),
                ));
            }
            Err(e) => self.notice = Some(Notice::new(NoticeKind::Error, e.to_string())),
        }
    }

    fn on_final_guess_key(&mut self, key: KeyEvent) -> GameCommand {
        match key.code {
            KeyCode::Esc => {
                self.notice = Some(Notice::new(
                    NoticeKind::Error,
                    "Sorry, you have to guess the character.",
                ));
            }
            KeyCode::Enter => {
                let guess = std::mem::take(&mut self.input);
                match self.round.forced_final_guess(&guess) {
                    Ok(GuessResult::Empty) => {
                        self.notice = Some(Notice::new(NoticeKind::Error, "It can't be empty."));
                    }
                    Ok(GuessResult::Correct) => {
                        self.mode = Mode::Finished;
                        self.notice = Some(Notice::new(
                            NoticeKind::Success,
                            format!("You're a machine! Yes, I am {}.", guess.trim().to_lowercase()),
                        ));
                    }
                    Ok(GuessResult::Incorrect) => {
                        self.mode = Mode::Finished;
                        self.notice = Some(Notice::new(
                            NoticeKind::Error,
                            format!("Game over. I was {}.", self.round.secret().name()),
                        ));
                    }
                    Err(e) => self.notice = Some(Notice::new(NoticeKind::Error, e.to_string())),
                }
            }
            _ => self.edit_input(key),
        }
        GameCommand::Continue
    }

    fn on_finished_key(&mut self, key: KeyEvent) -> GameCommand {
        match key.code {
            KeyCode::Char('n') | KeyCode::Char('N') => {
                self.restart();
                GameCommand::Continue
            }
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                GameCommand::Quit { record: true }
            }
            _ => GameCommand::Continue,
        }
    }

    fn edit_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(c) if !key.modifiers.intersects(KeyModifiers::ALT) => {
                self.input.push(c);
            }
            _ => {}
        }
    }
}
