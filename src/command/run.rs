//! Run commands - executing the open file

use super::CommandStatus;
use crate::editor::Editor;
use crate::error::Result;

/// Run the open file with its language's interpreter (F5, C-r)
pub fn run_file(editor: &mut Editor) -> Result<CommandStatus> {
    match editor.run_current_file() {
        Ok(()) => Ok(CommandStatus::Success),
        Err(e) => {
            editor.display.set_message(e.to_string());
            Ok(CommandStatus::Failure)
        }
    }
}

/// Empty the console pane (C-l)
pub fn clear_console(editor: &mut Editor) -> Result<CommandStatus> {
    editor.clear_console();
    Ok(CommandStatus::Success)
}
