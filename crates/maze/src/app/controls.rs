use intent::Control;
use winit::keyboard::{Key, NamedKey};

pub const CONTROL_BAR_HEIGHT_PX: u32 = 48;
const BUTTON_GAP_PX: u32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenRect {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

impl ScreenRect {
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left as f64
            && y >= self.top as f64
            && x < (self.left + self.width) as f64
            && y < (self.top + self.height) as f64
    }
}

/// On-screen buttons along the bottom edge, one per control.
#[derive(Debug, Clone, Default)]
pub struct ControlBar {
    buttons: Vec<(Control, ScreenRect)>,
}

impl ControlBar {
    pub fn layout(window_width: u32, window_height: u32) -> Self {
        if window_height < CONTROL_BAR_HEIGHT_PX {
            return Self::default();
        }
        let count = Control::ALL.len() as u32;
        let usable = window_width.saturating_sub(BUTTON_GAP_PX * (count + 1));
        let button_width = usable / count;
        if button_width == 0 {
            return Self::default();
        }

        let top = window_height - CONTROL_BAR_HEIGHT_PX + BUTTON_GAP_PX;
        let height = CONTROL_BAR_HEIGHT_PX - 2 * BUTTON_GAP_PX;
        let buttons = Control::ALL
            .iter()
            .enumerate()
            .map(|(index, control)| {
                let left = BUTTON_GAP_PX + index as u32 * (button_width + BUTTON_GAP_PX);
                (
                    *control,
                    ScreenRect {
                        left,
                        top,
                        width: button_width,
                        height,
                    },
                )
            })
            .collect();
        Self { buttons }
    }

    pub fn buttons(&self) -> &[(Control, ScreenRect)] {
        &self.buttons
    }

    pub fn hit_test(&self, x: f64, y: f64) -> Option<Control> {
        self.buttons
            .iter()
            .find(|(_, rect)| rect.contains(x, y))
            .map(|(control, _)| *control)
    }
}

/// Keyboard shortcuts that activate a control as if it were clicked.
pub fn control_for_shortcut(key: &Key) -> Option<Control> {
    match key {
        Key::Named(NamedKey::Enter) => Some(Control::Teleport),
        Key::Named(NamedKey::Space) => Some(Control::PlaceObstacle),
        _ => None,
    }
}

/// Key identifier in the W3C `KeyboardEvent.key` vocabulary, e.g. `ArrowUp`.
pub fn key_identifier(key: &Key) -> Option<String> {
    match key {
        Key::Named(named) => Some(format!("{named:?}")),
        Key::Character(text) => Some(text.to_string()),
        _ => None,
    }
}
