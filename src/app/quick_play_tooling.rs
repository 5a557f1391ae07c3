use super::{EditorShell, StatusKind};
use crate::registry::BuildRegistry;

const QUICK_PLAY_ACTIVE_KEY: &str = "quick_play.active";
const QUICK_PLAY_LAST_SCENE_KEY: &str = "quick_play.last_scene";

impl<R: BuildRegistry + 'static> EditorShell<R> {
    /// Jump straight into the first playable scene in the build list,
    /// remembering what was open so it comes back after play mode ends.
    /// Invoked while already playing it stops instead.
    pub fn quick_play(&mut self) {
        if self.playing {
            self.exit_play_mode();
            return;
        }
        self.apply_pending_edits();

        let scenes = self.registry.scenes();
        let Some(first) = scenes.iter().find(|scene| scene.enabled && !scene.path.is_empty()) else {
            self.set_status(StatusKind::Info, "No playable scenes in build.");
            return;
        };

        if let Some(open) = self.open_scene.clone() {
            self.prefs.set_bool(QUICK_PLAY_ACTIVE_KEY, true);
            self.prefs.set_string(QUICK_PLAY_LAST_SCENE_KEY, open);
        }

        let path = first.path.clone();
        self.open_scene(path);
        self.playing = true;
    }

    /// Leave play mode and return the editor to its editing state.
    pub fn exit_play_mode(&mut self) {
        if !self.playing {
            return;
        }
        self.playing = false;
        self.handle_entered_edit_mode();
    }

    /// Runs when the lifecycle returns to the editing state: reopen the
    /// remembered scene if one was stored, then drop both keys so a stale
    /// session can never replay later.
    pub fn handle_entered_edit_mode(&mut self) {
        let active = self.prefs.get_bool(QUICK_PLAY_ACTIVE_KEY, false);
        let last = self.prefs.get_string(QUICK_PLAY_LAST_SCENE_KEY, "");
        if active && !last.trim().is_empty() {
            self.open_scene(last);
        }
        self.prefs.delete_key(QUICK_PLAY_ACTIVE_KEY);
        self.prefs.delete_key(QUICK_PLAY_LAST_SCENE_KEY);
    }
}
