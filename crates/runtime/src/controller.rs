use catalog::{CatalogError, StarCatalog};
use quiz::{Feedback, Question, QuizConfig, QuizEngine, QuizError, QuizStats};
use rand::Rng;
use rand::rngs::StdRng;
use render::{FrameOptions, RenderFrame, RenderStyle, Renderer};
use scene::picking::pick_named_star;
use scene::projection::{SkyProjection, Viewport};
use scene::view::{ViewConfig, ViewState};
use tracing::{debug, info, warn};

use crate::frame::Frame;
use crate::input::{InputEvent, InputHandler};

/// Prompt shown when the answer form is submitted empty.
pub const SELECT_PROMPT: &str = "Please select an answer";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Loading,
    Ready,
    Failed(String),
}

/// A change the UI layer has to apply, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEffect {
    Redraw,
    ShowQuestion(Question),
    HideQuestion,
    ShowFeedback(Feedback),
    HideFeedback,
    /// Non-blocking prompt; nothing else changed.
    Prompt(String),
    UpdateStats(QuizStats),
    ShowResults(QuizStats),
    HideResults,
    /// Blocking one-shot notice (data load failure).
    Notice(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct UiUpdate {
    pub effects: Vec<UiEffect>,
}

impl UiUpdate {
    pub fn none() -> Self {
        Self::default()
    }

    fn with(effect: UiEffect) -> Self {
        Self {
            effects: vec![effect],
        }
    }

    fn push(&mut self, effect: UiEffect) {
        self.effects.push(effect);
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn needs_redraw(&self) -> bool {
        self.effects.contains(&UiEffect::Redraw)
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub view: ViewConfig,
    pub style: RenderStyle,
    pub quiz: QuizConfig,
}

/// Everything the running app knows. Owned by [`Controller`]; mutated only
/// through [`InputHandler::handle`] and the load callbacks.
#[derive(Debug, Clone)]
pub struct AppState {
    pub viewport: Viewport,
    pub view: ViewState,
    pub load: LoadState,
    pub catalog: StarCatalog,
    pub quiz: QuizEngine,
    pub show_grid: bool,
    pub feedback: Option<Feedback>,
    pub results_visible: bool,
}

impl AppState {
    fn new(config: &AppConfig) -> Self {
        Self {
            viewport: Viewport::default(),
            view: ViewState::with_config(config.view),
            load: LoadState::Loading,
            catalog: StarCatalog::new(),
            quiz: QuizEngine::new(config.quiz),
            show_grid: false,
            feedback: None,
            results_visible: false,
        }
    }

    pub fn projection(&self) -> SkyProjection {
        SkyProjection::new(self.viewport, &self.view)
    }
}

/// Single owner of application state.
///
/// UI glue feeds it [`InputEvent`]s and applies the returned [`UiUpdate`];
/// nothing here touches a rendering surface directly.
pub struct Controller<R: Rng = StdRng> {
    state: AppState,
    style: RenderStyle,
    rng: R,
    frame: Frame,
}

impl<R: Rng> Controller<R> {
    pub fn new(config: AppConfig, rng: R) -> Self {
        Self {
            state: AppState::new(&config),
            style: config.style,
            rng,
            frame: Frame::default(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn frame_index(&self) -> u64 {
        self.frame.index
    }

    /// Installs a loaded catalog, or records the failure and asks the UI to
    /// show it once. Loading is not retried.
    pub fn on_catalog_loaded(&mut self, result: Result<StarCatalog, CatalogError>) -> UiUpdate {
        match result {
            Ok(catalog) => {
                info!(
                    stars = catalog.len(),
                    named = catalog.named().len(),
                    "catalog ready"
                );
                self.state.catalog = catalog;
                self.state.load = LoadState::Ready;
                self.state.view.reset();
                self.redraw()
            }
            Err(err) => {
                warn!(error = %err, "catalog load failed");
                let msg = format!("Error loading star data: {err}");
                self.state.load = LoadState::Failed(msg.clone());
                UiUpdate::with(UiEffect::Notice(msg))
            }
        }
    }

    /// Parses a star document and installs it.
    pub fn on_catalog_text(&mut self, text: &str) -> UiUpdate {
        self.on_catalog_loaded(StarCatalog::from_json_str(text))
    }

    /// Draw commands for the current state. Blank until the catalog is ready.
    pub fn render_frame(&self) -> RenderFrame {
        let proj = self.state.projection();
        if self.state.load != LoadState::Ready {
            return Renderer::collect_blank(&proj, &self.style);
        }
        Renderer::collect(
            self.state.catalog.stars(),
            &proj,
            &self.style,
            FrameOptions {
                show_grid: self.state.show_grid,
            },
        )
    }

    fn redraw(&mut self) -> UiUpdate {
        self.frame = self.frame.next();
        debug!(frame = self.frame.index, "redraw");
        UiUpdate::with(UiEffect::Redraw)
    }

    fn click(&mut self, x: f64, y: f64) -> UiUpdate {
        if self.state.quiz.is_active() || self.state.load != LoadState::Ready {
            return UiUpdate::none();
        }

        let proj = self.state.projection();
        let radius = self.state.view.hit_radius();
        let Some(hit) = pick_named_star(self.state.catalog.stars(), &proj, x, y, radius) else {
            return UiUpdate::none();
        };

        let started = self
            .state
            .quiz
            .start(hit.star, self.state.catalog.named(), &mut self.rng);
        match started {
            Ok(question) => {
                info!(
                    star = question.star.id,
                    options = question.options.len(),
                    "asked about {}",
                    question.star.proper
                );
                UiUpdate::with(UiEffect::ShowQuestion(question.clone()))
            }
            Err(err) => {
                debug!(error = %err, "click ignored");
                UiUpdate::none()
            }
        }
    }

    fn submit(&mut self, selected: Option<i64>) -> UiUpdate {
        match self.state.quiz.submit(selected) {
            Ok(feedback) => {
                info!(
                    selected = feedback.selected_id,
                    correct = feedback.is_correct,
                    "answer submitted"
                );
                self.state.feedback = Some(feedback.clone());
                let mut update = UiUpdate::with(UiEffect::HideQuestion);
                update.push(UiEffect::UpdateStats(self.state.quiz.stats()));
                update.push(UiEffect::ShowFeedback(feedback));
                update
            }
            Err(err @ (QuizError::NoSelection | QuizError::UnknownOption(_))) => {
                debug!(error = %err, "submission rejected");
                UiUpdate::with(UiEffect::Prompt(SELECT_PROMPT.into()))
            }
            Err(_) => UiUpdate::none(),
        }
    }

    fn reset(&mut self) -> UiUpdate {
        self.state.quiz.reset();
        self.state.feedback = None;
        self.state.results_visible = false;
        info!("quiz reset");
        UiUpdate {
            effects: vec![
                UiEffect::HideQuestion,
                UiEffect::HideFeedback,
                UiEffect::UpdateStats(self.state.quiz.stats()),
                UiEffect::HideResults,
            ],
        }
    }
}

impl<R: Rng> InputHandler for Controller<R> {
    type Output = UiUpdate;

    fn handle(&mut self, event: InputEvent) -> UiUpdate {
        match event {
            InputEvent::Resize { width, height } => {
                self.state.viewport = Viewport::new(width, height);
                self.redraw()
            }
            InputEvent::DragStart { x, y } => {
                self.state.view.begin_drag(x, y);
                UiUpdate::none()
            }
            InputEvent::DragMove { x, y } => match self.state.view.update_drag(x, y) {
                Some(_) => self.redraw(),
                None => UiUpdate::none(),
            },
            InputEvent::DragEnd => {
                self.state.view.end_drag();
                UiUpdate::none()
            }
            InputEvent::Wheel { x, y, delta_y } => {
                self.state.view.wheel(self.state.viewport, x, y, delta_y);
                debug!(zoom = self.state.view.zoom(), "wheel zoom");
                self.redraw()
            }
            InputEvent::Click { x, y } => self.click(x, y),
            InputEvent::ToggleGrid(on) => {
                self.state.show_grid = on;
                self.redraw()
            }
            InputEvent::Submit { selected } => self.submit(selected),
            InputEvent::Skip => {
                if self.state.quiz.skip() {
                    info!("question skipped");
                }
                UiUpdate::with(UiEffect::HideQuestion)
            }
            InputEvent::CloseFeedback => {
                self.state.feedback = None;
                UiUpdate::with(UiEffect::HideFeedback)
            }
            InputEvent::ShowResults => {
                self.state.results_visible = true;
                UiUpdate::with(UiEffect::ShowResults(self.state.quiz.stats()))
            }
            InputEvent::Reset => self.reset(),
        }
    }
}
