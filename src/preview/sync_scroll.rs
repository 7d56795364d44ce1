//! Proportional scroll synchronization between editor and preview
//!
//! Keeps the two independently scrollable panes visually aligned: when one
//! pane scrolls, the other is moved to the same fractional position of its
//! own scrollable range. A directional lock with a timed window prevents the
//! panes from re-triggering each other: the programmatic scroll applied to
//! the follower looks exactly like a user scroll, and without the lock the
//! two listeners would ping-pong forever.
//!
//! # Architecture
//!
//! The controller is a small state machine: `Idle` until a pane scrolls,
//! then `DrivingFromEditor`/`DrivingFromPreview` for a 100ms window. While
//! a pane is driving, scroll events from the *other* pane are treated as
//! echoes of the sync itself and ignored. The window is reset, not stacked,
//! on every qualifying event, so continuous scrolling keeps the same driver.

use std::time::{Duration, Instant};

// ─────────────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Configuration for scroll synchronization behavior.
#[derive(Debug, Clone)]
pub struct ScrollSyncConfig {
    /// How long the directional lock holds after the last qualifying event.
    pub suppression_window: Duration,
    /// Minimum offset change treated as a real scroll event (pixels).
    pub min_scroll_delta: f32,
}

impl Default for ScrollSyncConfig {
    fn default() -> Self {
        Self {
            suppression_window: Duration::from_millis(100),
            min_scroll_delta: 1.0,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Panes and Drive State
// ─────────────────────────────────────────────────────────────────────────────

/// The two scrollable panes kept in sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPane {
    Editor,
    Preview,
}

impl SyncPane {
    /// The pane on the other side of the split.
    pub fn other(self) -> Self {
        match self {
            SyncPane::Editor => SyncPane::Preview,
            SyncPane::Preview => SyncPane::Editor,
        }
    }
}

/// Who is currently driving the sync, if anyone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncDrive {
    Idle,
    DrivingFromEditor,
    DrivingFromPreview,
}

impl SyncDrive {
    fn from_pane(pane: SyncPane) -> Self {
        match pane {
            SyncPane::Editor => SyncDrive::DrivingFromEditor,
            SyncPane::Preview => SyncDrive::DrivingFromPreview,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Pane Metrics
// ─────────────────────────────────────────────────────────────────────────────

/// One pane's scroll geometry at a single instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaneMetrics {
    /// Current scroll offset from the top (pixels).
    pub offset: f32,
    /// Total content height (pixels).
    pub content_height: f32,
    /// Visible viewport height (pixels).
    pub viewport_height: f32,
}

impl PaneMetrics {
    pub fn new(offset: f32, content_height: f32, viewport_height: f32) -> Self {
        Self {
            offset,
            content_height,
            viewport_height,
        }
    }

    /// Scrollable range: content beyond the viewport, never negative.
    pub fn scroll_range(&self) -> f32 {
        (self.content_height - self.viewport_height).max(0.0)
    }

    /// Fractional scroll position in `[0, 1]`. A pane whose content fits
    /// without scrolling has fraction `0`, never NaN.
    pub fn fraction(&self) -> f32 {
        let range = self.scroll_range();
        if range <= 0.0 {
            return 0.0;
        }
        (self.offset / range).clamp(0.0, 1.0)
    }

    /// Offset that places this pane at the given fraction of its range.
    pub fn offset_for_fraction(&self, fraction: f32) -> f32 {
        fraction * self.scroll_range()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ScrollSyncController
// ─────────────────────────────────────────────────────────────────────────────

/// State machine synchronizing one editor/preview pane pair.
#[derive(Debug)]
pub struct ScrollSyncController {
    enabled: bool,
    config: ScrollSyncConfig,
    drive: SyncDrive,
    drive_started: Option<Instant>,
    last_editor_offset: f32,
    last_preview_offset: f32,
}

impl Default for ScrollSyncController {
    fn default() -> Self {
        Self::new()
    }
}

impl ScrollSyncController {
    pub fn new() -> Self {
        Self::with_config(ScrollSyncConfig::default())
    }

    pub fn with_config(config: ScrollSyncConfig) -> Self {
        Self {
            enabled: true,
            config,
            drive: SyncDrive::Idle,
            drive_started: None,
            last_editor_offset: 0.0,
            last_preview_offset: 0.0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.drive = SyncDrive::Idle;
            self.drive_started = None;
        }
    }

    /// Toggle synchronization on/off, returning the new state.
    pub fn toggle(&mut self) -> bool {
        self.set_enabled(!self.enabled);
        self.enabled
    }

    /// Current drive state, after expiring a stale window.
    pub fn drive(&mut self) -> SyncDrive {
        self.tick();
        self.drive
    }

    /// Release the directional lock once its window has elapsed.
    fn tick(&mut self) {
        if self.drive == SyncDrive::Idle {
            return;
        }
        let expired = self
            .drive_started
            .map(|started| started.elapsed() >= self.config.suppression_window)
            .unwrap_or(true);
        if expired {
            self.drive = SyncDrive::Idle;
            self.drive_started = None;
        }
    }

    /// Handle a scroll event on `source`, returning the offset to apply to
    /// the opposite pane, or `None` when the event must not propagate.
    ///
    /// `None` is returned when sync is disabled, when the source pane has no
    /// scrollable range (it never drives), or when the opposite pane is
    /// currently driving, in which case this event is an echo of the sync
    /// itself.
    pub fn on_scroll(
        &mut self,
        source: SyncPane,
        source_metrics: PaneMetrics,
        target_metrics: PaneMetrics,
    ) -> Option<f32> {
        self.tick();

        if !self.enabled {
            return None;
        }
        if source_metrics.scroll_range() <= 0.0 {
            return None;
        }
        if self.drive != SyncDrive::Idle && self.drive != SyncDrive::from_pane(source) {
            return None;
        }

        // Claim (or re-arm) the drive. Reset, not stacked.
        self.drive = SyncDrive::from_pane(source);
        self.drive_started = Some(Instant::now());

        Some(target_metrics.offset_for_fraction(source_metrics.fraction()))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Offset Tracking
    // ─────────────────────────────────────────────────────────────────────────

    /// Last offset recorded for a pane.
    pub fn last_offset(&self, pane: SyncPane) -> f32 {
        match pane {
            SyncPane::Editor => self.last_editor_offset,
            SyncPane::Preview => self.last_preview_offset,
        }
    }

    /// Record a pane's current offset.
    pub fn update_offset(&mut self, pane: SyncPane, offset: f32) {
        match pane {
            SyncPane::Editor => self.last_editor_offset = offset,
            SyncPane::Preview => self.last_preview_offset = offset,
        }
    }

    /// Whether an offset change is big enough to count as a scroll event.
    pub fn is_significant_delta(&self, pane: SyncPane, new_offset: f32) -> bool {
        (new_offset - self.last_offset(pane)).abs() >= self.config.min_scroll_delta
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    fn short_window(ms: u64) -> ScrollSyncController {
        ScrollSyncController::with_config(ScrollSyncConfig {
            suppression_window: Duration::from_millis(ms),
            ..Default::default()
        })
    }

    #[test]
    fn test_controller_starts_idle_and_enabled() {
        let mut controller = ScrollSyncController::new();
        assert!(controller.is_enabled());
        assert_eq!(controller.drive(), SyncDrive::Idle);
    }

    #[test]
    fn test_fraction_mapping() {
        let mut controller = ScrollSyncController::new();
        let editor = PaneMetrics::new(50.0, 200.0, 100.0);
        let preview = PaneMetrics::new(0.0, 400.0, 100.0);

        assert!((editor.fraction() - 0.5).abs() < f32::EPSILON);
        let applied = controller.on_scroll(SyncPane::Editor, editor, preview);
        assert_eq!(applied, Some(150.0));
        assert_eq!(controller.drive(), SyncDrive::DrivingFromEditor);
    }

    #[test]
    fn test_no_overflow_fraction_is_zero() {
        // Content fits exactly: no NaN, fraction is defined as zero.
        assert_eq!(PaneMetrics::new(0.0, 100.0, 100.0).fraction(), 0.0);
        // Content shorter than the viewport behaves the same.
        assert_eq!(PaneMetrics::new(10.0, 80.0, 100.0).fraction(), 0.0);
    }

    #[test]
    fn test_overscrolled_fraction_clamped() {
        let pane = PaneMetrics::new(150.0, 200.0, 100.0);
        assert_eq!(pane.fraction(), 1.0);
    }

    #[test]
    fn test_pane_without_overflow_never_drives() {
        let mut controller = ScrollSyncController::new();
        let editor = PaneMetrics::new(0.0, 100.0, 100.0);
        let preview = PaneMetrics::new(0.0, 400.0, 100.0);

        assert_eq!(controller.on_scroll(SyncPane::Editor, editor, preview), None);
        assert_eq!(controller.drive(), SyncDrive::Idle);
    }

    #[test]
    fn test_echo_from_follower_suppressed() {
        let mut controller = ScrollSyncController::new();
        let editor = PaneMetrics::new(50.0, 200.0, 100.0);
        let preview = PaneMetrics::new(0.0, 400.0, 100.0);

        let applied = controller
            .on_scroll(SyncPane::Editor, editor, preview)
            .unwrap();

        // The applied offset shows up as a preview scroll event; within the
        // window it must not trigger a reciprocal editor update.
        let preview_after = PaneMetrics::new(applied, 400.0, 100.0);
        assert_eq!(
            controller.on_scroll(SyncPane::Preview, preview_after, editor),
            None
        );
        assert_eq!(controller.drive(), SyncDrive::DrivingFromEditor);
    }

    #[test]
    fn test_same_driver_continues_scrolling() {
        let mut controller = ScrollSyncController::new();
        let preview = PaneMetrics::new(0.0, 400.0, 100.0);

        let first = controller.on_scroll(
            SyncPane::Editor,
            PaneMetrics::new(20.0, 200.0, 100.0),
            preview,
        );
        let second = controller.on_scroll(
            SyncPane::Editor,
            PaneMetrics::new(40.0, 200.0, 100.0),
            preview,
        );
        assert_eq!(first, Some(60.0));
        assert_eq!(second, Some(120.0));
    }

    #[test]
    fn test_window_expiry_releases_drive() {
        let mut controller = short_window(10);
        let editor = PaneMetrics::new(50.0, 200.0, 100.0);
        let preview = PaneMetrics::new(0.0, 400.0, 100.0);

        controller.on_scroll(SyncPane::Editor, editor, preview);
        sleep(Duration::from_millis(25));

        assert_eq!(controller.drive(), SyncDrive::Idle);
        let applied = controller.on_scroll(SyncPane::Preview, preview, editor);
        assert_eq!(applied, Some(0.0));
        assert_eq!(controller.drive(), SyncDrive::DrivingFromPreview);
    }

    #[test]
    fn test_window_reset_not_stacked() {
        let mut controller = short_window(50);
        let preview = PaneMetrics::new(0.0, 400.0, 100.0);

        controller.on_scroll(
            SyncPane::Editor,
            PaneMetrics::new(20.0, 200.0, 100.0),
            preview,
        );
        sleep(Duration::from_millis(30));
        // Second event re-arms the same window instead of stacking a new one.
        controller.on_scroll(
            SyncPane::Editor,
            PaneMetrics::new(40.0, 200.0, 100.0),
            preview,
        );
        sleep(Duration::from_millis(30));

        // 60ms after the first event but only 30ms after the reset: still
        // suppressed.
        assert_eq!(
            controller.on_scroll(SyncPane::Preview, preview, PaneMetrics::new(0.0, 200.0, 100.0)),
            None
        );
    }

    #[test]
    fn test_disabled_controller_never_syncs() {
        let mut controller = ScrollSyncController::new();
        controller.set_enabled(false);

        let editor = PaneMetrics::new(50.0, 200.0, 100.0);
        let preview = PaneMetrics::new(0.0, 400.0, 100.0);
        assert_eq!(controller.on_scroll(SyncPane::Editor, editor, preview), None);
    }

    #[test]
    fn test_disabling_clears_drive() {
        let mut controller = ScrollSyncController::new();
        controller.on_scroll(
            SyncPane::Editor,
            PaneMetrics::new(50.0, 200.0, 100.0),
            PaneMetrics::new(0.0, 400.0, 100.0),
        );
        controller.set_enabled(false);
        assert_eq!(controller.drive(), SyncDrive::Idle);
    }

    #[test]
    fn test_toggle() {
        let mut controller = ScrollSyncController::new();
        assert!(!controller.toggle());
        assert!(controller.toggle());
    }

    #[test]
    fn test_offset_tracking_and_delta() {
        let mut controller = ScrollSyncController::new();
        controller.update_offset(SyncPane::Editor, 100.0);

        assert_eq!(controller.last_offset(SyncPane::Editor), 100.0);
        assert_eq!(controller.last_offset(SyncPane::Preview), 0.0);
        assert!(!controller.is_significant_delta(SyncPane::Editor, 100.5));
        assert!(controller.is_significant_delta(SyncPane::Editor, 103.0));
    }

    #[test]
    fn test_pane_other() {
        assert_eq!(SyncPane::Editor.other(), SyncPane::Preview);
        assert_eq!(SyncPane::Preview.other(), SyncPane::Editor);
    }
}
