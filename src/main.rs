//! Memory Match entry point
//!
//! Loads settings and progress, then runs the terminal game loop.

use std::io::{self, Stdout, stdout};
use std::time::{Duration, Instant};

use crossterm::ExecutableCommand;
use crossterm::event::{self, Event};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use memory_match::audio::AudioManager;
use memory_match::persistence::FileLedger;
use memory_match::session::{GameSession, Screen};
use memory_match::sim::{GameEvent, Symbol};
use memory_match::ui::{self, Command, Cursor, GameView, LEVELS_PER_ROW};
use memory_match::{GameError, MemoryLedger, ProgressionStore, Settings, UnlockLedger};

type Ledger = Box<dyn UnlockLedger>;

/// Redraw and timer resolution
const FRAME: Duration = Duration::from_millis(100);

/// A mismatched pair held face up until `until`
struct Reveal {
    cards: [(usize, Symbol); 2],
    until: Instant,
}

struct Game {
    session: GameSession<Ledger>,
    settings: Settings,
    cursor: Cursor,
    reveal: Option<Reveal>,
    status: Option<String>,
    show_help: bool,
    last_frame: Instant,
}

impl Game {
    fn new(settings: Settings) -> Self {
        let ledger: Ledger = match settings.resolved_data_dir() {
            Some(dir) => {
                log::info!("Progress stored in {}", dir.display());
                Box::new(FileLedger::in_dir(dir))
            }
            None => {
                log::warn!("No data directory, progress will not be kept");
                Box::new(MemoryLedger::new())
            }
        };

        let progress = ProgressionStore::open(ledger);
        let status = progress
            .load_error()
            .map(|err| format!("Saved progress could not be read: {err}"));

        let mut session = GameSession::new(progress, settings.seed);
        session.add_sink(Box::new(AudioManager::new(settings.sound)));

        Self {
            session,
            settings,
            cursor: Cursor::default(),
            reveal: None,
            status,
            show_help: false,
            last_frame: Instant::now(),
        }
    }

    fn run(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> io::Result<()> {
        loop {
            let snapshot = self.session.snapshot();
            let levels = self.session.levels();
            let reveal = self.reveal.as_ref().map_or(&[][..], |r| &r.cards[..]);
            terminal.draw(|frame| {
                let view = GameView {
                    snapshot: &snapshot,
                    levels: &levels,
                    cursor: self.cursor.index,
                    reveal,
                    status: self.status.as_deref(),
                    show_timer: self.settings.show_timer,
                    show_help: self.show_help,
                };
                frame.render_widget(view, frame.area());
            })?;

            let timeout = FRAME.saturating_sub(self.last_frame.elapsed());
            if event::poll(timeout)? {
                if let Event::Key(key) = event::read()? {
                    if let Some(command) = ui::map_key(key, self.session.screen()) {
                        if command == Command::Quit {
                            return Ok(());
                        }
                        self.handle(command);
                    }
                }
            }

            let now = Instant::now();
            self.session.tick(now - self.last_frame);
            self.last_frame = now;
            if self.reveal.as_ref().is_some_and(|r| now >= r.until) {
                self.reveal = None;
            }
        }
    }

    fn handle(&mut self, command: Command) {
        let before = self.session.screen();
        self.status = None;
        if let Err(err) = self.dispatch(command) {
            self.report(&err);
        }

        let screen = self.session.screen();
        if screen != before {
            self.reveal = None;
            self.cursor = match screen {
                Screen::LevelSelect => {
                    Cursor::at(self.session.highest_unlocked().ordinal() as usize - 1)
                }
                _ => Cursor::default(),
            };
        }
    }

    fn dispatch(&mut self, command: Command) -> Result<(), GameError> {
        match command {
            Command::Start => self.session.start(),
            Command::Move(step) => {
                let (len, cols) = match self.session.screen() {
                    Screen::LevelSelect => (self.session.levels().len(), LEVELS_PER_ROW),
                    _ => {
                        let cards = self.session.round().map_or(0, |r| r.deck.len());
                        (cards, ui::columns(cards))
                    }
                };
                self.cursor.step(step, len, cols);
                Ok(())
            }
            Command::Confirm => self.confirm(),
            Command::Restart => {
                self.session.restart()?;
                self.reveal = None;
                Ok(())
            }
            Command::Next => self.session.advance(),
            Command::Menu => self.session.exit_to_menu(),
            Command::Back => self.session.back_to_title(),
            Command::RetrySave => {
                self.session.retry_save()?;
                self.status = Some("Progress saved".to_string());
                Ok(())
            }
            Command::Help => {
                self.show_help = !self.show_help;
                Ok(())
            }
            Command::Quit => Ok(()),
        }
    }

    fn confirm(&mut self) -> Result<(), GameError> {
        match self.session.screen() {
            Screen::LevelSelect => {
                let levels = self.session.levels();
                match levels.get(self.cursor.index) {
                    Some(entry) => self.session.select_level(entry.level.get() as u32),
                    None => Ok(()),
                }
            }
            Screen::Playing => self.flip(self.cursor.index),
            _ => Ok(()),
        }
    }

    fn flip(&mut self, index: usize) -> Result<(), GameError> {
        // Input stays locked while a mismatched pair is on show
        if self.reveal.is_some() {
            log::debug!("Ignored selection of card {index} during reveal");
            return Ok(());
        }

        let turn = self.session.select_card(index)?;
        if let Some(err) = &turn.save_error {
            self.report(err);
        }

        let still_playing = self
            .session
            .round()
            .is_some_and(|r| !r.phase.is_terminal());
        if !still_playing {
            return Ok(());
        }
        self.reveal = turn.events.iter().find_map(|event| match event {
            GameEvent::MismatchFound {
                first,
                second,
                symbols: [a, b],
                ..
            } => Some(Reveal {
                cards: [(*first, *a), (*second, *b)],
                until: Instant::now() + Duration::from_millis(self.settings.mismatch_reveal_ms),
            }),
            _ => None,
        });
        Ok(())
    }

    fn report(&mut self, err: &GameError) {
        if err.is_soft() {
            log::debug!("{err}");
        } else {
            log::warn!("{err}");
        }
        self.status = Some(err.to_string());
    }
}

fn main() -> io::Result<()> {
    env_logger::init();
    log::info!("Memory Match starting...");

    let settings = Settings::load();
    let mut game = Game::new(settings);

    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = game.run(&mut terminal);

    // Always try to restore terminal state
    let _ = disable_raw_mode();
    let _ = stdout().execute(LeaveAlternateScreen);
    let _ = terminal.show_cursor();

    log::info!("Memory Match exiting");
    result
}
