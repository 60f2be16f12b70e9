//! Simulated device boundary: camera, photo library and geolocation.
//!
//! Real hardware is out of scope, so each provider answers after a
//! configured latency. Screens talk to it through messages only and so
//! exercise the same request/completion handshake they would against real
//! devices. Completions are routed by purpose; a reader that is no longer
//! active simply lets its messages expire.

use std::path::PathBuf;

use app::LOG_PLATFORM;
use bevy::prelude::*;
use ecosort_config::{Location, Simulation};
use ecosort_core::disposal::Coordinates;
use ecosort_core::{CaptureError, CaptureRef, CaptureSource};
use tracing::{debug, info, warn};

/// What a capture is for. A screen only consumes completions carrying its
/// own purpose, never a photo another surface asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapturePurpose {
    Scan,
    Verification,
}

#[derive(Message, Debug, Clone)]
pub struct CaptureRequest {
    pub purpose: CapturePurpose,
    pub source: CaptureSource,
}

#[derive(Message, Debug, Clone)]
pub struct CaptureCompleted {
    pub purpose: CapturePurpose,
    pub image: CaptureRef,
}

#[derive(Message, Debug, Clone)]
pub struct CaptureFailed {
    pub purpose: CapturePurpose,
    pub error: CaptureError,
}

#[derive(Message, Debug, Clone, Copy)]
pub struct LocationRequest;

#[derive(Message, Debug, Clone)]
pub struct LocationResolved {
    pub address: String,
    pub coords: Coordinates,
}

/// Where simulated captures pretend to store their image files.
#[derive(Resource, Debug, Clone)]
pub struct CaptureStorage {
    dir: PathBuf,
}

impl CaptureStorage {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn slot(&self) -> PathBuf {
        self.dir.join(format!("{}.jpg", uuid::Uuid::new_v4()))
    }
}

impl Default for CaptureStorage {
    fn default() -> Self {
        Self::new(std::env::temp_dir().join("ecosort-captures"))
    }
}

struct PendingCapture {
    purpose: CapturePurpose,
    source: CaptureSource,
    timer: Timer,
}

/// In-flight capture requests, answered when their latency elapses.
#[derive(Resource, Default)]
pub struct SimulatedCamera {
    pending: Vec<PendingCapture>,
}

/// At most one in-flight location fix.
#[derive(Resource, Default)]
pub struct SimulatedLocator {
    pending: Option<Timer>,
}

pub struct PlatformPlugin;

impl Plugin for PlatformPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<CaptureRequest>()
            .add_message::<CaptureCompleted>()
            .add_message::<CaptureFailed>()
            .add_message::<LocationRequest>()
            .add_message::<LocationResolved>()
            .init_resource::<CaptureStorage>()
            .init_resource::<SimulatedCamera>()
            .init_resource::<SimulatedLocator>()
            .add_systems(
                Update,
                (
                    queue_captures,
                    deliver_captures.after(queue_captures),
                    queue_location_fixes,
                    deliver_location_fixes.after(queue_location_fixes),
                ),
            );
    }
}

fn queue_captures(
    mut requests: MessageReader<CaptureRequest>,
    mut camera: ResMut<SimulatedCamera>,
    simulation: Res<Simulation>,
) {
    for request in requests.read() {
        let latency = match request.source {
            CaptureSource::Camera => simulation.capture_latency_secs,
            CaptureSource::Library => simulation.library_latency_secs,
        };
        debug!(
            target: LOG_PLATFORM,
            "capture requested for {:?} via {} ({latency:.2}s)",
            request.purpose,
            request.source.label(),
        );
        camera.pending.push(PendingCapture {
            purpose: request.purpose,
            source: request.source,
            timer: Timer::from_seconds(latency, TimerMode::Once),
        });
    }
}

fn deliver_captures(
    time: Res<Time>,
    mut camera: ResMut<SimulatedCamera>,
    storage: Res<CaptureStorage>,
    simulation: Res<Simulation>,
    mut completed: MessageWriter<CaptureCompleted>,
    mut failed: MessageWriter<CaptureFailed>,
) {
    let mut index = 0;
    while index < camera.pending.len() {
        camera.pending[index].timer.tick(time.delta());
        if !camera.pending[index].timer.finished() {
            index += 1;
            continue;
        }

        let done = camera.pending.swap_remove(index);
        if simulation.fail_captures {
            warn!(target: LOG_PLATFORM, "capture denied for {:?}", done.purpose);
            failed.write(CaptureFailed {
                purpose: done.purpose,
                error: CaptureError::Denied,
            });
        } else {
            let image = CaptureRef::new(storage.slot(), done.source);
            info!(
                target: LOG_PLATFORM,
                "capture {} ready for {:?}",
                image.short_id(),
                done.purpose,
            );
            completed.write(CaptureCompleted {
                purpose: done.purpose,
                image,
            });
        }
    }
}

fn queue_location_fixes(
    mut requests: MessageReader<LocationRequest>,
    mut locator: ResMut<SimulatedLocator>,
    simulation: Res<Simulation>,
) {
    for _ in requests.read() {
        if locator.pending.is_some() {
            continue;
        }
        debug!(target: LOG_PLATFORM, "location fix requested");
        locator.pending = Some(Timer::from_seconds(
            simulation.location_latency_secs,
            TimerMode::Once,
        ));
    }
}

fn deliver_location_fixes(
    time: Res<Time>,
    mut locator: ResMut<SimulatedLocator>,
    location: Res<Location>,
    mut resolved: MessageWriter<LocationResolved>,
) {
    let Some(timer) = locator.pending.as_mut() else {
        return;
    };
    if timer.tick(time.delta()).just_finished() {
        locator.pending = None;
        info!(target: LOG_PLATFORM, "location fix: {}", location.region_label);
        resolved.write(LocationResolved {
            address: location.region_label.clone(),
            coords: Coordinates {
                lat: location.lat,
                lon: location.lon,
            },
        });
    }
}
