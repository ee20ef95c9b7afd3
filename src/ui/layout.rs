use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Layout information for rendering
pub struct LayoutInfo {
    /// Top bar with tabs and the signed-in user
    pub system_area: Rect,
    /// Body of the active tab
    pub content_area: Rect,
    /// Hotkey legend area (full width)
    pub legend_area: Rect,
    /// Bottom status bar area
    pub status_area: Rect,
}

/// Calculate the screen layout for all UI components
pub fn calculate_layout(terminal_size: Rect, legend_height: u16, status_height: u16) -> LayoutInfo {
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),             // Tabs + user (top border, text, bottom border)
            Constraint::Min(3),                // Active tab
            Constraint::Length(legend_height), // Legend (exact fit for wrapped content)
            Constraint::Length(status_height), // Status bar
        ])
        .split(terminal_size);

    LayoutInfo {
        system_area: main_chunks[0],
        content_area: main_chunks[1],
        legend_area: main_chunks[2],
        status_area: main_chunks[3],
    }
}

/// Split an area into two side-by-side panes (left gets `left_percent`)
pub fn split_horizontal(area: Rect, left_percent: u16) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(left_percent),
            Constraint::Percentage(100 - left_percent.min(100)),
        ])
        .split(area);
    (chunks[0], chunks[1])
}

/// Split an area into a fixed-height top part and the rest
pub fn split_top(area: Rect, top_height: u16) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(top_height), Constraint::Min(0)])
        .split(area);
    (chunks[0], chunks[1])
}

/// Centered popup rectangle, clamped to the available area
pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    }
}
