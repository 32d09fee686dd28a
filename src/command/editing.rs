//! Editing commands - insertion and deletion

use super::CommandStatus;
use crate::editor::Editor;
use crate::error::Result;

/// Split the line at the cursor
pub fn newline(editor: &mut Editor) -> Result<CommandStatus> {
    editor.insert_newline();
    Ok(CommandStatus::Success)
}

/// Insert spaces up to the next tab stop
pub fn insert_tab(editor: &mut Editor) -> Result<CommandStatus> {
    editor.insert_tab();
    Ok(CommandStatus::Success)
}

/// Delete the character before the cursor, joining lines at column 0
pub fn delete_char_backward(editor: &mut Editor) -> Result<CommandStatus> {
    if editor.delete_backward() {
        Ok(CommandStatus::Success)
    } else {
        Ok(CommandStatus::Failure)
    }
}

/// Delete the character under the cursor, joining lines at end of line
pub fn delete_char_forward(editor: &mut Editor) -> Result<CommandStatus> {
    if editor.delete_forward() {
        Ok(CommandStatus::Success)
    } else {
        Ok(CommandStatus::Failure)
    }
}
