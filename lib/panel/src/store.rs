use std::collections::HashMap;

use log::{debug, warn};
use transport::state::StateResponse;
use transport::{HeatingTarget, MasterToggles, Room, RoomState};
use uuid::Uuid;

use crate::{HeatingRange, Result, ValidationError};

/// What a sync request updates on the hub. Each target carries its own
/// status.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SyncTarget {
    MasterLights,
    MasterHeating,
    RoomLight(Room),
    RoomHeating(Room),
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum SyncStatus {
    #[default]
    Synced,
    Pending,
    Unsynced,
}

#[derive(Copy, Clone, Debug, Default)]
struct SyncEntry {
    status: SyncStatus,
    latest: Option<Uuid>,
}

const fn default_room_state(room: Room) -> RoomState {
    match room {
        Room::Bedroom => RoomState::new(50, HeatingTarget::Degrees(24.0)),
        Room::LivingRoom => RoomState::new(90, HeatingTarget::Off),
        Room::Entrance => RoomState::new(80, HeatingTarget::Off),
        Room::Hallway => RoomState::new(70, HeatingTarget::Off),
        Room::Kitchen => RoomState::new(60, HeatingTarget::Off),
    }
}

/// Local view of the home's lights and heating.
///
/// Every mutator validates its input before writing, so a rejected call leaves
/// the store exactly as it was.
pub struct DeviceStateStore {
    master: MasterToggles,
    rooms: HashMap<Room, RoomState>,
    heating_range: HeatingRange,
    sync: HashMap<SyncTarget, SyncEntry>,
    offline: bool,
}

impl DeviceStateStore {
    pub fn new(heating_range: HeatingRange) -> Self {
        let rooms = Room::ALL
            .into_iter()
            .map(|room| (room, default_room_state(room)))
            .collect();

        Self {
            master: MasterToggles::default(),
            rooms,
            heating_range,
            sync: HashMap::new(),
            offline: false,
        }
    }

    pub fn heating_range(&self) -> HeatingRange {
        self.heating_range
    }

    /// Replaces local state with what the hub reported. Entries that fail
    /// validation keep their current value.
    pub fn seed(&mut self, initial: &StateResponse) {
        self.master = initial.master;

        for (room, state) in &initial.rooms {
            if let Err(err) = self.set_room_light(*room, state.light_level.into()) {
                warn!("ignoring initial light level for {room}: {err}");
            }

            if !room.is_heated() && state.heating_target.is_off() {
                continue;
            }

            if let Err(err) = self.set_room_heating(*room, state.heating_target) {
                warn!("ignoring initial heating target for {room}: {err}");
            }
        }

        self.sync.clear();
        debug!("seeded state for {} rooms", initial.rooms.len());
    }

    pub fn master_state(&self) -> MasterToggles {
        self.master
    }

    pub fn room_state(&self, room: Room) -> RoomState {
        self.rooms
            .get(&room)
            .copied()
            .unwrap_or_else(|| default_room_state(room))
    }

    pub fn toggle_master_light(&mut self) -> bool {
        self.master.lights_master = !self.master.lights_master;
        self.master.lights_master
    }

    pub fn toggle_master_heating(&mut self) -> bool {
        self.master.heating_master = !self.master.heating_master;
        self.master.heating_master
    }

    pub fn set_room_light(&mut self, room: Room, level: i32) -> Result<u8> {
        let level = u8::try_from(level)
            .ok()
            .filter(|level| *level <= 100)
            .ok_or(ValidationError::LightLevel(level))?;

        self.rooms
            .entry(room)
            .or_insert_with(|| default_room_state(room))
            .light_level = level;

        Ok(level)
    }

    pub fn set_room_heating(&mut self, room: Room, target: HeatingTarget) -> Result<HeatingTarget> {
        if !room.is_heated() {
            return Err(ValidationError::NotHeated(room).into());
        }

        if let HeatingTarget::Degrees(value) = target {
            if !self.heating_range.contains(value) {
                return Err(ValidationError::HeatingTarget {
                    value,
                    min: self.heating_range.min_c(),
                    max: self.heating_range.max_c(),
                }
                .into());
            }
        }

        self.rooms
            .entry(room)
            .or_insert_with(|| default_room_state(room))
            .heating_target = target;

        Ok(target)
    }
}

impl DeviceStateStore {
    pub fn sync_status(&self, target: SyncTarget) -> SyncStatus {
        self.sync
            .get(&target)
            .map(|entry| entry.status)
            .unwrap_or_default()
    }

    pub fn is_offline(&self) -> bool {
        self.offline
    }

    pub fn set_offline(&mut self, offline: bool) {
        if self.offline != offline {
            debug!("offline = {offline}");
        }

        self.offline = offline;
    }

    pub fn mark_pending(&mut self, target: SyncTarget, request_id: Uuid) {
        self.sync.insert(
            target,
            SyncEntry {
                status: SyncStatus::Pending,
                latest: Some(request_id),
            },
        );
    }

    /// Records the outcome of a request. Returns `false` and leaves the status
    /// alone when a newer request for the same target is outstanding.
    pub fn resolve_sync(&mut self, target: SyncTarget, request_id: Uuid, ok: bool) -> bool {
        let entry = self.sync.entry(target).or_default();

        if entry.latest != Some(request_id) {
            return false;
        }

        entry.status = if ok {
            SyncStatus::Synced
        } else {
            SyncStatus::Unsynced
        };
        entry.latest = None;

        true
    }

    pub fn mark_synced(&mut self, target: SyncTarget) {
        self.sync.remove(&target);
    }
}
