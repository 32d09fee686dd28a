//! Navigation commands - cursor movement

use super::CommandStatus;
use crate::editor::Editor;
use crate::error::Result;

/// Move cursor forward one character
pub fn forward_char(editor: &mut Editor) -> Result<CommandStatus> {
    editor.move_cursor_right();
    Ok(CommandStatus::Success)
}

/// Move cursor backward one character
pub fn backward_char(editor: &mut Editor) -> Result<CommandStatus> {
    editor.move_cursor_left();
    Ok(CommandStatus::Success)
}

/// Move cursor to next line
pub fn next_line(editor: &mut Editor) -> Result<CommandStatus> {
    editor.move_cursor_down();
    Ok(CommandStatus::Success)
}

/// Move cursor to previous line
pub fn previous_line(editor: &mut Editor) -> Result<CommandStatus> {
    editor.move_cursor_up();
    Ok(CommandStatus::Success)
}

/// Move cursor to beginning of line
pub fn beginning_of_line(editor: &mut Editor) -> Result<CommandStatus> {
    editor.move_to_bol();
    Ok(CommandStatus::Success)
}

/// Move cursor to end of line
pub fn end_of_line(editor: &mut Editor) -> Result<CommandStatus> {
    editor.move_to_eol();
    Ok(CommandStatus::Success)
}

pub fn scroll_down(editor: &mut Editor) -> Result<CommandStatus> {
    editor.page_down();
    Ok(CommandStatus::Success)
}

pub fn scroll_up(editor: &mut Editor) -> Result<CommandStatus> {
    editor.page_up();
    Ok(CommandStatus::Success)
}

/// Move to beginning of buffer (M-<)
pub fn beginning_of_buffer(editor: &mut Editor) -> Result<CommandStatus> {
    editor.move_to_buffer_start();
    Ok(CommandStatus::Success)
}

/// Move to end of buffer (M->)
pub fn end_of_buffer(editor: &mut Editor) -> Result<CommandStatus> {
    editor.move_to_buffer_end();
    Ok(CommandStatus::Success)
}
