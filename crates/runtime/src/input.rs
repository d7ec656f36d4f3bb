/// Everything the UI can tell the controller, in canvas pixel coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Resize { width: f64, height: f64 },
    DragStart { x: f64, y: f64 },
    DragMove { x: f64, y: f64 },
    /// Pointer released or left the canvas.
    DragEnd,
    /// Wheel scroll; positive `delta_y` zooms out.
    Wheel { x: f64, y: f64, delta_y: f64 },
    Click { x: f64, y: f64 },
    ToggleGrid(bool),
    /// Answer form submitted with the selected option id, if any.
    Submit { selected: Option<i64> },
    Skip,
    CloseFeedback,
    /// "Done" button: show the session summary.
    ShowResults,
    Reset,
}

/// Named entry points for UI glue that prefers callbacks over an event enum.
///
/// Every method has a default that forwards to [`InputHandler::handle`].
pub trait InputHandler {
    type Output;

    fn handle(&mut self, event: InputEvent) -> Self::Output;

    fn on_drag_start(&mut self, x: f64, y: f64) -> Self::Output {
        self.handle(InputEvent::DragStart { x, y })
    }

    fn on_drag_move(&mut self, x: f64, y: f64) -> Self::Output {
        self.handle(InputEvent::DragMove { x, y })
    }

    fn on_drag_end(&mut self) -> Self::Output {
        self.handle(InputEvent::DragEnd)
    }

    fn on_wheel(&mut self, x: f64, y: f64, delta_y: f64) -> Self::Output {
        self.handle(InputEvent::Wheel { x, y, delta_y })
    }

    fn on_click(&mut self, x: f64, y: f64) -> Self::Output {
        self.handle(InputEvent::Click { x, y })
    }

    fn on_submit(&mut self, selected: Option<i64>) -> Self::Output {
        self.handle(InputEvent::Submit { selected })
    }
}
