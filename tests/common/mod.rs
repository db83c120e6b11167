//! Common test utilities for integration tests
//!
//! Builds small but complete recordings: a launcher, an app being opened from
//! it, and the always-on system bars.

#![allow(dead_code)]

use flicker_service::domain::models::{
    Change, ChangeType, Entity, Rect, Snapshot, Tag, Trace, TraceBundle, TraceKind, Transition,
    TransitionType,
};

pub const DISPLAY: Rect = Rect::new(0, 0, 1080, 2400);
pub const HALF: Rect = Rect::new(0, 1200, 1080, 2400);

pub const NAV_BAR_ID: u64 = 1;
pub const STATUS_BAR_ID: u64 = 2;
pub const LAUNCHER_ID: u64 = 10;
pub const APP_ID: u64 = 20;

pub const LAUNCH_TAG: &str = "CUJ_LAUNCHER_APP_LAUNCH_FROM_ICON";
pub const LAUNCHER_NAME: &str = "com.google.android.apps.nexuslauncher/com.google.android.apps.nexuslauncher.NexusLauncherActivity#10";
pub const APP_NAME: &str = "com.example.mail/com.example.mail.InboxActivity#20";

/// Initializes tracing for test output.
pub fn setup_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// App state in one frame.
#[derive(Debug, Clone, Copy)]
pub enum AppFrame {
    Absent,
    Hidden,
    Visible(Rect),
}

fn system_bars() -> Vec<Entity> {
    vec![
        Entity::new(NAV_BAR_ID, "NavigationBar0#1")
            .with_bounds(Rect::new(0, 2300, 1080, 2400))
            .with_z(10),
        Entity::new(STATUS_BAR_ID, "StatusBar#2")
            .with_bounds(Rect::new(0, 0, 1080, 100))
            .with_z(10),
    ]
}

/// One frame of the launch recording.
pub fn frame(timestamp: i64, kind: TraceKind, launcher_visible: bool, app: AppFrame) -> Snapshot {
    let mut entities = system_bars();
    entities.push(
        Entity::new(LAUNCHER_ID, LAUNCHER_NAME)
            .with_bounds(DISPLAY)
            .with_visibility(launcher_visible)
            .with_z(1)
            .as_app(),
    );
    match app {
        AppFrame::Absent => {}
        AppFrame::Hidden => entities.push(
            Entity::new(APP_ID, APP_NAME)
                .with_bounds(DISPLAY)
                .with_visibility(false)
                .with_z(2)
                .as_app(),
        ),
        AppFrame::Visible(bounds) => entities.push(
            Entity::new(APP_ID, APP_NAME)
                .with_bounds(bounds)
                .with_z(2)
                .as_app(),
        ),
    }
    Snapshot::new(timestamp, kind, entities).with_display(DISPLAY)
}

fn trace(kind: TraceKind, frames: &[(i64, bool, AppFrame)]) -> Trace {
    let snapshots = frames
        .iter()
        .map(|(ts, launcher, app)| frame(*ts, kind, *launcher, *app))
        .collect();
    Trace::new(kind, snapshots).expect("fixture timestamps are increasing")
}

pub fn launch_transition() -> Transition {
    Transition::new(
        1,
        TransitionType::Open,
        150,
        410,
        vec![
            Change::new(ChangeType::Open, APP_ID, APP_ID),
            Change::new(ChangeType::ToBack, LAUNCHER_ID, LAUNCHER_ID),
        ],
    )
}

fn launch_bundle(frames: &[(i64, bool, AppFrame)]) -> TraceBundle {
    TraceBundle::new()
        .with_layers_trace(trace(TraceKind::Layer, frames))
        .with_window_trace(trace(TraceKind::Window, frames))
        .with_tags(vec![Tag::begin(LAUNCH_TAG, 150), Tag::end(LAUNCH_TAG, 350)])
        .with_transitions(vec![launch_transition()])
}

/// A clean app launch: the app appears, grows to full screen and the
/// launcher goes away in the last frame.
pub fn clean_launch() -> TraceBundle {
    launch_bundle(&[
        (100, true, AppFrame::Absent),
        (200, true, AppFrame::Hidden),
        (300, true, AppFrame::Visible(HALF)),
        (400, false, AppFrame::Visible(DISPLAY)),
    ])
}

/// The app shows up and vanishes again in the last frame.
pub fn flickering_launch() -> TraceBundle {
    launch_bundle(&[
        (100, true, AppFrame::Absent),
        (200, true, AppFrame::Hidden),
        (300, true, AppFrame::Visible(DISPLAY)),
        (400, true, AppFrame::Hidden),
    ])
}
