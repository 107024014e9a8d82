/*!
 * # Editing Core Module
 *
 * Every edit is a pure function from one [`EditorState`] to the next. Nothing
 * is mutated in place; the application controller decides which state becomes
 * current.
 *
 * ## Pipeline
 *
 * 1. A key press is resolved by [`keys::resolve_key`]. Enter always becomes
 *    `split-block`, which [`keys::handle_command`] handles itself; other
 *    commands fall back to [`keys::apply_default_command`]. Printable
 *    characters go through [`rich::insert_text`].
 * 2. The resulting candidate state is offered to [`triggers::apply_triggers`].
 *    If the block under the caret now reads exactly like one of the shortcut
 *    prefixes, the prefix is consumed and the rule's formatting applied.
 * 3. The controller commits whichever state came out and notifies persistence.
 *
 * ## Module Structure
 *
 * - **`state`**: `EditorState`, change types, undo/redo history
 * - **`modifier`**: content-level primitives (remove range, replace text, split)
 * - **`rich`**: typing, deletion and formatting transitions
 * - **`cursor`**: caret movement and selection extension
 * - **`triggers`**: the shortcut table and trigger engine
 * - **`keys`**: key bindings and key command handling
 */

pub mod cursor;
pub mod keys;
pub mod modifier;
pub mod rich;
pub mod state;
pub mod triggers;

pub use cursor::Motion;
pub use keys::{
    CommandStatus, EditorCommand, Key, KeyInput, apply_default_command, handle_command,
    resolve_key,
};
pub use state::{ChangeType, EditorState};
pub use triggers::{TRIGGERS, TriggerRule, apply_triggers, try_apply_trigger};
