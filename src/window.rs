//! Window representation - the editor pane's viewport into the buffer

/// The visible portion of the buffer plus the cursor
#[derive(Debug)]
pub struct Window {
    /// First visible line in the window
    top_line: usize,
    /// Cursor line position (0-indexed)
    cursor_line: usize,
    /// Cursor column position (byte offset within line)
    cursor_col: usize,
    /// Number of text rows in window (excluding mode line)
    height: u16,
    /// Goal display column for vertical movement
    goal_col: usize,
}

impl Window {
    /// Create a new window
    pub fn new(height: u16) -> Self {
        Self {
            top_line: 0,
            cursor_line: 0,
            cursor_col: 0,
            height: height.max(1),
            goal_col: 0,
        }
    }

    /// Get the top visible line
    pub fn top_line(&self) -> usize {
        self.top_line
    }

    /// Get cursor line
    pub fn cursor_line(&self) -> usize {
        self.cursor_line
    }

    /// Get cursor column (byte offset)
    pub fn cursor_col(&self) -> usize {
        self.cursor_col
    }

    /// Set cursor position
    pub fn set_cursor(&mut self, line: usize, col: usize) {
        self.cursor_line = line;
        self.cursor_col = col;
    }

    /// Get the goal column for vertical movement
    pub fn goal_col(&self) -> usize {
        self.goal_col
    }

    /// Set the goal column
    pub fn set_goal_col(&mut self, col: usize) {
        self.goal_col = col;
    }

    /// Get window height in rows
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Set window height (after a terminal resize)
    pub fn set_height(&mut self, height: u16) {
        self.height = height.max(1);
        self.ensure_cursor_visible();
    }

    /// Jump back to the start of the buffer
    pub fn reset(&mut self) {
        self.top_line = 0;
        self.cursor_line = 0;
        self.cursor_col = 0;
        self.goal_col = 0;
    }

    /// Ensure cursor is visible, adjusting top_line if needed
    pub fn ensure_cursor_visible(&mut self) {
        if self.cursor_line < self.top_line {
            self.top_line = self.cursor_line;
        } else if self.cursor_line >= self.top_line + self.height as usize {
            self.top_line = self.cursor_line - self.height as usize + 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scrolls_to_cursor() {
        let mut window = Window::new(5);
        window.set_cursor(10, 0);
        window.ensure_cursor_visible();
        assert_eq!(window.top_line(), 6);

        window.set_cursor(2, 0);
        window.ensure_cursor_visible();
        assert_eq!(window.top_line(), 2);
    }

    #[test]
    fn test_resize_keeps_cursor_visible() {
        let mut window = Window::new(20);
        window.set_cursor(15, 3);
        window.set_height(4);
        assert_eq!(window.top_line(), 12);
        assert_eq!(window.cursor_col(), 3);

        window.reset();
        assert_eq!((window.top_line(), window.cursor_line()), (0, 0));
    }

    #[test]
    fn test_zero_height_clamped() {
        let window = Window::new(0);
        assert_eq!(window.height(), 1);
    }
}
