//! Input routing: raw pointer/touch/keyboard events to gallery actions.

use super::Point;

/// Platform-neutral input, already converted to scene coordinates.
#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    PointerMove(Point),
    PointerDown(Point),
    TouchMove(Point),
    TouchStart(Point),
    /// `code` is a `KeyboardEvent.code` value such as `"Space"`.
    KeyDown { code: String },
    Restart,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Action {
    /// Move the crosshair.
    Aim(Point),
    Fire(Point),
    Restart,
}

/// Maps an event to an action. Presses fire where they land; the fire key fires at
/// the current crosshair position. Every press fires, there is no cooldown.
pub fn route(event: &InputEvent, pointer: Point, fire_key: &str) -> Option<Action> {
    match event {
        InputEvent::PointerMove(p) | InputEvent::TouchMove(p) => Some(Action::Aim(*p)),
        InputEvent::PointerDown(p) | InputEvent::TouchStart(p) => Some(Action::Fire(*p)),
        InputEvent::KeyDown { code } if code == fire_key => Some(Action::Fire(pointer)),
        InputEvent::KeyDown { .. } => None,
        InputEvent::Restart => Some(Action::Restart),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AIM: Point = Point { x: 320.0, y: 240.0 };

    #[test]
    fn moves_aim() {
        let p = Point::new(1.0, 2.0);
        assert_eq!(route(&InputEvent::PointerMove(p), AIM, "Space"), Some(Action::Aim(p)));
        assert_eq!(route(&InputEvent::TouchMove(p), AIM, "Space"), Some(Action::Aim(p)));
    }

    #[test]
    fn presses_fire_at_press_point() {
        let p = Point::new(5.0, 6.0);
        assert_eq!(route(&InputEvent::PointerDown(p), AIM, "Space"), Some(Action::Fire(p)));
        assert_eq!(route(&InputEvent::TouchStart(p), AIM, "Space"), Some(Action::Fire(p)));
    }

    #[test]
    fn fire_key_fires_at_crosshair() {
        let space = InputEvent::KeyDown { code: "Space".into() };
        assert_eq!(route(&space, AIM, "Space"), Some(Action::Fire(AIM)));
        let enter = InputEvent::KeyDown { code: "Enter".into() };
        assert_eq!(route(&enter, AIM, "Space"), None);
        assert_eq!(route(&enter, AIM, "Enter"), Some(Action::Fire(AIM)));
    }

    #[test]
    fn restart_passes_through() {
        assert_eq!(route(&InputEvent::Restart, AIM, "Space"), Some(Action::Restart));
    }
}
