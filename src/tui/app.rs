//! Main TUI application state machine.
//!
//! Handles:
//! - Screen navigation (home and one prediction page per model)
//! - Input event handling
//! - Background prediction requests via the worker

use std::io;
use std::sync::mpsc::TryRecvError;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};

use crate::adapters::HttpPredictor;
use crate::application::{PredictionService, PredictionSession};
use crate::config::ClientConfig;
use crate::domain::ModelKind;
use crate::ports::{PredictionError, Predictor};

use super::ui::{
    form::{render_prediction_form, FormFocus, FormState},
    home::{render_home, HomeState},
    render_disclaimer,
    result::render_result_popup,
};
use super::worker::{PredictionProgress, PredictionWorker, PredictionWorkerHandle};

/// Current screen/view in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Home,
    Predict(ModelKind),
}

/// Session plus view state of one model page. Pages keep their values
/// while the user goes back to the home screen.
struct ModelPage {
    session: PredictionSession,
    form: FormState,
}

impl ModelPage {
    fn new(model: ModelKind) -> Self {
        Self {
            session: PredictionSession::new(model),
            form: FormState::default(),
        }
    }
}

/// Main application state
pub struct App<P = HttpPredictor>
where
    P: Predictor + 'static,
{
    /// Current screen
    screen: Screen,

    /// Whether the app should quit
    should_quit: bool,

    /// Prediction service shared with the workers
    service: Arc<PredictionService<P>>,

    /// Endpoints shown on the home screen
    config: ClientConfig,

    /// Home screen state
    home_state: HomeState,

    /// One page per entry of `ModelKind::ALL`
    pages: Vec<ModelPage>,

    /// Running prediction workers
    pending_workers: Vec<PredictionWorkerHandle>,
}

impl App<HttpPredictor> {
    /// Create a new application talking to the configured HTTP endpoints.
    ///
    /// # Errors
    /// Returns error if the application cannot be initialized.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let predictor = Arc::new(HttpPredictor::new(config.clone()));
        let service = Arc::new(PredictionService::new(predictor));

        Self::with_dependencies(service, config)
    }
}

impl<P> App<P>
where
    P: Predictor + 'static,
{
    /// Create application with an injected service (Composition Root pattern).
    ///
    /// # Errors
    /// Returns error if initialization fails.
    pub fn with_dependencies(service: Arc<PredictionService<P>>, config: ClientConfig) -> Result<Self> {
        Ok(Self {
            screen: Screen::Home,
            should_quit: false,
            service,
            config,
            home_state: HomeState::default(),
            pages: ModelKind::ALL.iter().map(|model| ModelPage::new(*model)).collect(),
            pending_workers: Vec::new(),
        })
    }

    /// Current screen.
    #[must_use]
    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Session of a model page.
    #[must_use]
    pub fn session(&self, model: ModelKind) -> &PredictionSession {
        &self.pages[page_index(model)].session
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        // Main loop
        let result = self.main_loop(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            // Poll pending workers for progress updates
            self.poll_workers();

            // Draw current screen
            terminal.draw(|f| {
                let area = f.area();
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(0), Constraint::Length(3)])
                    .split(area);

                let content_area = chunks[0];
                let disclaimer_area = chunks[1];

                match self.screen {
                    Screen::Home => render_home(f, content_area, &self.home_state, &self.config),
                    Screen::Predict(model) => {
                        let page = &self.pages[page_index(model)];
                        render_prediction_form(f, content_area, &page.session, &page.form);
                        if let Some(result) = page.session.result() {
                            render_result_popup(f, content_area, result);
                        }
                    }
                }

                render_disclaimer(f, disclaimer_area);
            })?;

            // Handle input (short poll to stay responsive)
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, key.modifiers);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Poll the background workers and apply finished requests.
    fn poll_workers(&mut self) {
        if self.pending_workers.is_empty() {
            return;
        }

        let mut finished = Vec::new();
        for (i, worker) in self.pending_workers.iter().enumerate() {
            loop {
                match worker.try_recv() {
                    Ok(PredictionProgress::Sending) => {}
                    Ok(PredictionProgress::Complete { generation, outcome }) => {
                        finished.push((i, generation, outcome));
                        break;
                    }
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        finished.push((
                            i,
                            worker.generation,
                            Err(PredictionError::Transport(
                                "Prediction worker stopped unexpectedly".to_string(),
                            )),
                        ));
                        break;
                    }
                }
            }
        }

        // Remove back to front so earlier indices stay valid.
        for (i, generation, outcome) in finished.into_iter().rev() {
            let worker = self.pending_workers.remove(i);
            let page = &mut self.pages[page_index(worker.model)];
            if page.session.complete(generation, outcome) {
                page.form.sending_since = None;
            }
        }
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        // Global quit handling
        if key == KeyCode::Char('q') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.screen {
            Screen::Home => self.handle_home_key(key),
            Screen::Predict(model) => self.handle_predict_key(model, key, modifiers),
        }
    }

    fn handle_home_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Up | KeyCode::Char('k') => self.home_state.prev(),
            KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => self.home_state.next(),
            KeyCode::Enter => {
                self.screen = Screen::Predict(self.home_state.selected_model());
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            _ => {}
        }
    }

    fn handle_predict_key(&mut self, model: ModelKind, key: KeyCode, modifiers: KeyModifiers) {
        let page = &mut self.pages[page_index(model)];

        // The result popup captures input until closed.
        if page.session.result().is_some() {
            if matches!(key, KeyCode::Enter | KeyCode::Esc) {
                page.session.dismiss_result();
            }
            return;
        }

        if modifiers.contains(KeyModifiers::CONTROL) {
            match key {
                KeyCode::Char('s') => page.session.load_sample(),
                KeyCode::Char('r') => {
                    page.session.reset();
                    page.form = FormState::default();
                }
                _ => {}
            }
            return;
        }

        match key {
            KeyCode::Esc => {
                self.screen = Screen::Home;
            }
            KeyCode::Up | KeyCode::BackTab => {
                page.form.focus = page.form.focus.prev();
            }
            KeyCode::Down | KeyCode::Tab => {
                page.form.focus = page.form.focus.next();
            }
            KeyCode::Char(c) => match page.form.focus {
                FormFocus::QuickInput => page.session.push_quick_input(c),
                FormFocus::Field(feature) => page.session.push_char(feature, c),
            },
            KeyCode::Backspace => match page.form.focus {
                FormFocus::QuickInput => page.session.pop_quick_input(),
                FormFocus::Field(feature) => page.session.pop_char(feature),
            },
            KeyCode::Delete => match page.form.focus {
                FormFocus::QuickInput => page.session.set_quick_input(""),
                FormFocus::Field(feature) => page.session.clear_field(feature),
            },
            KeyCode::Enter => match page.form.focus {
                FormFocus::QuickInput => {
                    // The parse error is already shown on the page.
                    let _ = page.session.apply_quick_input();
                }
                FormFocus::Field(_) => self.submit(model),
            },
            KeyCode::F(5) => self.submit(model),
            _ => {}
        }
    }

    /// Send the form of `model` unless a request is already outstanding.
    fn submit(&mut self, model: ModelKind) {
        let page = &mut self.pages[page_index(model)];
        let Some(request) = page.session.begin_request() else {
            return;
        };

        page.form.sending_since = Some(Instant::now());
        let worker = PredictionWorker::spawn(self.service.clone(), request);
        self.pending_workers.push(worker);
    }
}

fn page_index(model: ModelKind) -> usize {
    ModelKind::ALL
        .iter()
        .position(|m| *m == model)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::Outcome;
    use crate::domain::{Classification, Feature, FeatureVector, PerformanceMetrics, PredictionResult};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingPredictor {
        calls: AtomicUsize,
    }

    impl Predictor for CountingPredictor {
        fn predict(
            &self,
            model: ModelKind,
            _features: &FeatureVector,
        ) -> std::result::Result<PredictionResult, PredictionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(PredictionResult::new(
                model,
                Classification::Positive,
                PerformanceMetrics {
                    accuracy: Some(0.95),
                    precision: "0.93".to_string(),
                    recall: "0.91".to_string(),
                    f1_score: "0.92".to_string(),
                },
            ))
        }
    }

    fn app() -> (App<CountingPredictor>, Arc<CountingPredictor>) {
        let predictor = Arc::new(CountingPredictor::default());
        let service = Arc::new(PredictionService::new(predictor.clone()));
        let app = App::with_dependencies(service, ClientConfig::default()).expect("Should build");
        (app, predictor)
    }

    fn press(app: &mut App<CountingPredictor>, key: KeyCode) {
        app.handle_key(key, KeyModifiers::NONE);
    }

    fn type_text(app: &mut App<CountingPredictor>, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn wait_for_workers(app: &mut App<CountingPredictor>) {
        for _ in 0..500 {
            app.poll_workers();
            if app.pending_workers.is_empty() {
                return;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        panic!("worker did not finish");
    }

    #[test]
    fn test_home_navigation_opens_model_page() {
        let (mut app, _) = app();
        assert_eq!(app.screen(), Screen::Home);

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.screen(), Screen::Predict(ModelKind::RandomForest));

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.screen(), Screen::Home);

        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_quick_input_then_predict_shows_result() {
        let (mut app, predictor) = app();
        press(&mut app, KeyCode::Enter);
        let model = ModelKind::XgBoost;
        assert_eq!(app.screen(), Screen::Predict(model));

        type_text(&mut app, "2 120 70 30 150 28.5 0.6 45");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.session(model).form(), &FeatureVector::sample());

        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Enter);
        assert!(app.session(model).is_loading());

        // A second submit while loading is ignored.
        press(&mut app, KeyCode::F(5));

        wait_for_workers(&mut app);
        assert_eq!(predictor.calls.load(Ordering::SeqCst), 1);
        let result = app.session(model).result().expect("Should show result");
        assert_eq!(result.classification, Classification::Positive);

        // Popup swallows typing and closes on Esc without leaving the page.
        press(&mut app, KeyCode::Char('9'));
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.session(model).outcome(), &Outcome::None);
        assert_eq!(app.screen(), Screen::Predict(model));
        assert_eq!(app.session(model).form(), &FeatureVector::sample());
    }

    #[test]
    fn test_bad_quick_input_shows_error_without_request() {
        let (mut app, predictor) = app();
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "1,2,3");
        press(&mut app, KeyCode::Enter);

        let model = ModelKind::XgBoost;
        assert!(app.session(model).error().is_some());
        assert!(app.session(model).form().is_empty());
        assert_eq!(predictor.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_field_typing_and_control_keys() {
        let (mut app, _) = app();
        press(&mut app, KeyCode::Enter);
        let model = ModelKind::XgBoost;

        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "1a4b0");
        assert_eq!(app.session(model).form().get(Feature::Glucose), "140");

        app.handle_key(KeyCode::Char('s'), KeyModifiers::CONTROL);
        assert_eq!(app.session(model).form(), &FeatureVector::sample());

        app.handle_key(KeyCode::Char('r'), KeyModifiers::CONTROL);
        assert!(app.session(model).form().is_empty());
    }

    #[test]
    fn test_pages_keep_separate_state() {
        let (mut app, _) = app();
        press(&mut app, KeyCode::Enter);
        app.handle_key(KeyCode::Char('s'), KeyModifiers::CONTROL);
        press(&mut app, KeyCode::Esc);

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert!(app.session(ModelKind::RandomForest).form().is_empty());
        assert_eq!(
            app.session(ModelKind::XgBoost).form(),
            &FeatureVector::sample()
        );
    }
}
