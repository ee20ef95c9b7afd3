//! UI state transition logic
//!
//! Pure functions for UI state cycling and transitions.

use crate::Screen;

/// How long a success toast stays up
pub const TOAST_INFO_MS: u128 = 1500;

/// Error toasts stay longer so the message can be read
pub const TOAST_ERROR_MS: u128 = 4000;

/// Cycle to the next tab, wrapping from the last to the first
///
/// # Examples
/// ```
/// use wargatui::Screen;
/// use wargatui::logic::ui::next_screen;
///
/// assert_eq!(next_screen(Screen::Beranda), Screen::Kost);
/// assert_eq!(next_screen(Screen::Pasar), Screen::Beranda);
/// ```
pub fn next_screen(current: Screen) -> Screen {
    let idx = (current.index() + 1) % Screen::ALL.len();
    Screen::ALL[idx]
}

/// Cycle to the previous tab, wrapping from the first to the last
pub fn prev_screen(current: Screen) -> Screen {
    let len = Screen::ALL.len();
    let idx = (current.index() + len - 1) % len;
    Screen::ALL[idx]
}

/// Check whether a toast has been visible long enough
pub fn should_dismiss_toast(elapsed_ms: u128, is_error: bool) -> bool {
    let limit = if is_error { TOAST_ERROR_MS } else { TOAST_INFO_MS };
    elapsed_ms >= limit
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prev_screen_wraps() {
        assert_eq!(prev_screen(Screen::Beranda), Screen::Pasar);
        assert_eq!(prev_screen(Screen::Kost), Screen::Beranda);
    }

    #[test]
    fn test_cycle_visits_every_screen() {
        let mut screen = Screen::Beranda;
        for expected in Screen::ALL.iter().skip(1) {
            screen = next_screen(screen);
            assert_eq!(screen, *expected);
        }
        assert_eq!(next_screen(screen), Screen::Beranda);
    }

    #[test]
    fn test_error_toast_outlives_info_toast() {
        assert!(!should_dismiss_toast(1000, false));
        assert!(should_dismiss_toast(1500, false));
        assert!(!should_dismiss_toast(3000, true));
        assert!(should_dismiss_toast(4000, true));
    }
}
