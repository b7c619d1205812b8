//! Fire-and-forget event seam toward the view layer.
//!
//! The coordinator never renders anything; it emits [`UiEvent`]s and the
//! embedding application drives its grid from them. Send failures are
//! ignored: a dropped receiver means the UI is gone, which only happens on
//! shutdown.

use tokio::sync::mpsc;

/// Events emitted toward the view layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEvent {
    /// The limited-stream set was rebuilt; re-render the grid.
    RefreshGrid {
        /// Whether a screen-share/whiteboard transition triggered the rebuild.
        screen_changed: bool,
    },

    /// Advise the user to rotate to landscape (screen share on a narrow
    /// viewport). Emitted at most once per share round.
    RotateToLandscape,

    /// Not all remote videos were received before the screen share ended;
    /// the application should re-request the full video list.
    RefetchVideos,

    /// Re-populate the main display slot after a screen share ended.
    RepopulateMainSlot,
}

/// Sender half of the UI event seam.
#[derive(Debug, Clone)]
pub struct UiEventSender {
    sender: mpsc::UnboundedSender<UiEvent>,
}

impl UiEventSender {
    /// Create a sender plus the receiver the view layer should drain.
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<UiEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    /// Request a grid re-render.
    pub fn refresh_grid(&self, screen_changed: bool) {
        let _ = self.sender.send(UiEvent::RefreshGrid { screen_changed });
    }

    /// Emit the rotate-to-landscape advisory.
    pub fn rotate_to_landscape(&self) {
        let _ = self.sender.send(UiEvent::RotateToLandscape);
    }

    /// Request a full re-fetch of remote videos.
    pub fn refetch_videos(&self) {
        let _ = self.sender.send(UiEvent::RefetchVideos);
    }

    /// Request re-population of the main display slot.
    pub fn repopulate_main_slot(&self) {
        let _ = self.sender.send(UiEvent::RepopulateMainSlot);
    }
}
