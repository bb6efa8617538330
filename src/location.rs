//! Best-available location from the positioning providers.
//!
//! Each provider keeps its last accepted fix and a validity flag. Updates arrive on a channel
//! from whatever context the positioning service calls back on; readers only ever see a copy.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crossbeam_channel::{Receiver, Sender};
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    /// Satellite-based, high accuracy.
    Gps,
    /// Cell/Wi-Fi based, coarse.
    Network,
}

impl Provider {
    /// Best to worst.
    pub const PREFERENCE: [Provider; 2] = [Provider::Gps, Provider::Network];

    fn index(self) -> usize {
        match self {
            Provider::Gps => 0,
            Provider::Network => 1,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::Gps => write!(f, "gps"),
            Provider::Network => write!(f, "network"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    pub provider: Provider,
    pub latitude: f64,
    pub longitude: f64,
    /// Milliseconds since the Unix epoch.
    pub timestamp_ms: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderStatus {
    Available,
    OutOfService,
    TemporarilyUnavailable,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProviderEvent {
    Location(Location),
    Enabled,
    Disabled,
    StatusChanged(ProviderStatus),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProviderUpdate {
    pub provider: Provider,
    pub event: ProviderEvent,
}

/// The platform positioning service.
pub trait PositioningService: Send + Sync {
    /// Starts delivering updates for `provider` on `updates`.
    fn subscribe(
        &self,
        provider: Provider,
        updates: Sender<ProviderUpdate>,
    ) -> Result<(), AppError>;
    fn unsubscribe(&self, provider: Provider) -> Result<(), AppError>;
}

#[derive(Debug, Default, Clone, Copy)]
struct ProviderSlot {
    last: Option<Location>,
    valid: bool,
}

impl ProviderSlot {
    fn current(&self) -> Option<Location> {
        if self.valid {
            self.last
        } else {
            None
        }
    }
}

pub struct LocationTracker {
    service: Arc<dyn PositioningService>,
    slots: Mutex<[ProviderSlot; 2]>,
    recording: AtomicBool,
    /// Held across a recording flip and the service calls that go with it.
    switching: Mutex<()>,
    updates_tx: Mutex<Option<Sender<ProviderUpdate>>>,
}

impl LocationTracker {
    /// Creates a tracker and the receiving end its subscriptions feed; drain it with
    /// [`LocationTracker::pump`].
    pub fn new(service: Arc<dyn PositioningService>) -> (Self, Receiver<ProviderUpdate>) {
        let (updates_tx, updates_rx) = crossbeam_channel::unbounded();
        let tracker = Self {
            service,
            slots: Mutex::new([ProviderSlot::default(); 2]),
            recording: AtomicBool::new(false),
            switching: Mutex::new(()),
            updates_tx: Mutex::new(Some(updates_tx)),
        };
        (tracker, updates_rx)
    }

    fn slots(&self) -> MutexGuard<'_, [ProviderSlot; 2]> {
        self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn is_recording(&self) -> bool {
        self.recording.load(Ordering::SeqCst)
    }

    /// Turns positioning on or off. Repeating the current setting does nothing.
    pub fn record_location(&self, record: bool) {
        let _switching = self
            .switching
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if self.recording.swap(record, Ordering::SeqCst) == record {
            return;
        }
        if record {
            self.start_receiving_updates();
        } else {
            self.stop_receiving_updates();
        }
    }

    fn start_receiving_updates(&self) {
        let updates_tx = match self
            .updates_tx
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
        {
            Some(tx) => tx,
            None => {
                log::warn!("Location tracker was shut down, not subscribing");
                return;
            }
        };
        for provider in Provider::PREFERENCE.iter().rev() {
            match self.service.subscribe(*provider, updates_tx.clone()) {
                Ok(()) => log::debug!("Subscribed to {} updates", provider),
                Err(e) => log::info!("Failed to request {} updates, ignoring: {}", provider, e),
            }
        }
        log::debug!("Started receiving location updates");
    }

    fn stop_receiving_updates(&self) {
        for provider in Provider::PREFERENCE {
            if let Err(e) = self.service.unsubscribe(provider) {
                log::info!("Failed to remove {} listener, ignoring: {}", provider, e);
            }
        }
        log::debug!("Stopped receiving location updates");
    }

    /// Applies one provider callback to that provider's slot.
    pub fn handle_update(&self, update: ProviderUpdate) {
        let mut slots = self.slots();
        let slot = &mut slots[update.provider.index()];

        match update.event {
            ProviderEvent::Location(location) => {
                if location.latitude == 0.0 && location.longitude == 0.0 {
                    log::trace!("Dropping 0,0 fix from {}", update.provider);
                    return;
                }
                if !slot.valid {
                    log::debug!("Got first location from {}", update.provider);
                }
                slot.last = Some(location);
                slot.valid = true;
            }
            ProviderEvent::Disabled => {
                log::debug!("{} disabled", update.provider);
                slot.valid = false;
            }
            ProviderEvent::StatusChanged(
                ProviderStatus::OutOfService | ProviderStatus::TemporarilyUnavailable,
            ) => {
                log::debug!("{} unavailable", update.provider);
                slot.valid = false;
            }
            ProviderEvent::Enabled | ProviderEvent::StatusChanged(ProviderStatus::Available) => {}
        }
    }

    /// Stops positioning for good and releases the tracker's end of the update channel, so a
    /// running [`LocationTracker::pump`] returns once the service drops its senders too.
    pub fn shutdown(&self) {
        self.record_location(false);
        self.updates_tx
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
    }

    /// Applies updates until every sender is gone.
    pub fn pump(&self, updates_rx: Receiver<ProviderUpdate>) {
        for update in updates_rx {
            self.handle_update(update);
        }
        log::debug!("Location update channel closed");
    }

    pub fn is_valid(&self, provider: Provider) -> bool {
        self.slots()[provider.index()].valid
    }

    /// The freshest fix from the most accurate provider that currently has one.
    pub fn current_location(&self) -> Option<Location> {
        if !self.is_recording() {
            return None;
        }
        let slots = self.slots();
        let best = Provider::PREFERENCE
            .iter()
            .find_map(|provider| slots[provider.index()].current());
        if best.is_none() {
            log::debug!("No location received yet.");
        }
        best
    }
}
