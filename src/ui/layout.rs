use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Main layout structure
pub struct MainLayout {
    pub keybindings_area: Rect,
    pub timer_area: Rect,
    pub stats_area: Rect,
    pub todo_area: Rect,
}

/// Create the main layout
/// - Top bar: keybindings / status line (1 row)
/// - Main area: Timer pane (40%) | Stats (top) over Todos (bottom)
pub fn create_layout(area: Rect) -> MainLayout {
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Keybindings bar
            Constraint::Min(0),    // Main content
        ])
        .split(area);

    let keybindings_area = main_chunks[0];
    let content_area = main_chunks[1];

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40), // Timer pane
            Constraint::Percentage(60), // Stats + todos
        ])
        .split(content_area);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(60), // Stats pane
            Constraint::Percentage(40), // Todo pane
        ])
        .split(horizontal[1]);

    MainLayout {
        keybindings_area,
        timer_area: horizontal[0],
        stats_area: right[0],
        todo_area: right[1],
    }
}

/// Create a centered area for modals and input forms
pub fn create_modal_area(area: Rect) -> Rect {
    let width = (area.width * 3 / 5).clamp(30, 70).min(area.width);
    let height = 9.min(area.height);

    Rect::new(
        area.x + (area.width.saturating_sub(width)) / 2,
        area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_covers_frame() {
        let area = Rect::new(0, 0, 120, 40);
        let layout = create_layout(area);

        assert_eq!(layout.keybindings_area.height, 1);
        assert_eq!(
            layout.timer_area.height,
            layout.stats_area.height + layout.todo_area.height
        );
        assert_eq!(
            layout.timer_area.width + layout.stats_area.width,
            area.width
        );
    }

    #[test]
    fn test_modal_area_is_centered_and_bounded() {
        let area = Rect::new(0, 0, 120, 40);
        let modal = create_modal_area(area);

        assert!(modal.width <= area.width);
        assert!(modal.height <= area.height);
        assert!(modal.x >= area.x && modal.x + modal.width <= area.x + area.width);
        assert!(modal.y >= area.y && modal.y + modal.height <= area.y + area.height);
    }

    #[test]
    fn test_modal_area_on_tiny_frame() {
        let area = Rect::new(0, 0, 20, 5);
        let modal = create_modal_area(area);
        assert!(modal.width <= area.width);
        assert!(modal.height <= area.height);
    }
}
