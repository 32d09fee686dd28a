//! Miscellaneous commands

use super::CommandStatus;
use crate::editor::Editor;
use crate::error::Result;

/// Toggle line numbers display (M-l)
pub fn toggle_line_numbers(editor: &mut Editor) -> Result<CommandStatus> {
    editor.display.toggle_line_numbers();
    let status = if editor.display.show_line_numbers {
        "Line numbers enabled"
    } else {
        "Line numbers disabled"
    };
    editor.display.set_message(status);
    Ok(CommandStatus::Success)
}

/// Toggle syntax highlighting (M-s)
pub fn toggle_syntax_highlighting(editor: &mut Editor) -> Result<CommandStatus> {
    editor.syntax.toggle();
    editor.display.force_redraw();
    let status = if editor.syntax.enabled {
        "Syntax highlighting enabled"
    } else {
        "Syntax highlighting disabled"
    };
    editor.display.set_message(status);
    Ok(CommandStatus::Success)
}

/// List key bindings in the console (F1)
pub fn describe_bindings(editor: &mut Editor) -> Result<CommandStatus> {
    editor.describe_bindings();
    Ok(CommandStatus::Success)
}

/// Abort the current operation (C-g)
pub fn abort(_editor: &mut Editor) -> Result<CommandStatus> {
    Ok(CommandStatus::Abort)
}

/// Quit the editor, asking first when the buffer is modified (C-q)
pub fn quit(editor: &mut Editor) -> Result<CommandStatus> {
    editor.request_quit();
    Ok(CommandStatus::Success)
}
