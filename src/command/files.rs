//! File commands

use super::CommandStatus;
use crate::editor::{Editor, PromptAction};
use crate::error::Result;

/// Open a file (C-o)
pub fn find_file(editor: &mut Editor) -> Result<CommandStatus> {
    editor.start_prompt("Find file", PromptAction::FindFile, None);
    Ok(CommandStatus::Success)
}

/// Write buffer to a new file (Save As) (C-w)
pub fn write_file(editor: &mut Editor) -> Result<CommandStatus> {
    // Default to current filename if any
    let default = editor.current_path().map(|p| p.display().to_string());
    editor.start_prompt("Write file", PromptAction::WriteFile, default);
    Ok(CommandStatus::Success)
}

/// Save current buffer to file (C-s)
pub fn save_buffer(editor: &mut Editor) -> Result<CommandStatus> {
    // Unnamed buffers ask for a name first
    if editor.current_path().is_none() {
        return write_file(editor);
    }

    if !editor.buffer.is_modified() {
        editor.display.set_message("(No changes need to be saved)");
        return Ok(CommandStatus::Success);
    }

    match editor.save() {
        Ok(()) => Ok(CommandStatus::Success),
        Err(e) => {
            editor.display.set_message(format!("Error saving: {}", e));
            Ok(CommandStatus::Failure)
        }
    }
}
