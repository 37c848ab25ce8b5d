//! Inputs the host feeds to the director.

/// Something the player did, or a completion reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
    /// Start a new game from the title menu.
    StartGame,
    /// Return to the title menu.
    BackToMenu,
    /// Open the about page.
    ShowAbout,
    /// Advance past the current line.
    NextDialogue,
    /// The renderer finished showing the current line.
    DialogueComplete,
    /// The player picked the choice at this index.
    SelectChoice(usize),
    /// The fullscreen video finished playing.
    VideoEnded,
    /// Skip the fullscreen video.
    SkipVideo,
    /// Flip autoplay.
    ToggleAutoplay,
    /// Save into the given slot.
    Save(u8),
    /// Restore the given slot.
    Load(u8),
}
