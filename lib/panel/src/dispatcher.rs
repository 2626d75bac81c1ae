use log::{debug, warn};
use tokio::sync::mpsc::UnboundedSender;
use transport::state::{StateResponse, StateUpdate};
use transport::{HeatingTarget, MasterToggles, Room, RoomState};

use crate::{
    BackendError, Clock, Config, ControlId, DeviceStateStore, Error, Gesture, GestureClassifier,
    MonotonicClock, Result, Screen, ScreenStack, SyncCommand, SyncOutcome, SyncRequest,
    SyncStatus, SyncTarget,
};

/// Everything the event loop feeds into the dispatcher.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    Press(ControlId),
    Release(ControlId),
    /// Navigation requested by name rather than by a gesture.
    Navigate(String),
    Remote(StateUpdate),
    SyncCompleted(SyncOutcome),
}

/// What handling an event changed.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    None,
    Navigated(Screen),
    WentBack(Screen),
    MasterLights(bool),
    MasterHeating(bool),
    RoomLight { room: Room, level: u8 },
    RoomHeating { room: Room, heating: HeatingTarget },
    SyncStatus { target: SyncTarget, status: SyncStatus },
}

pub struct ActionDispatcher<C = MonotonicClock> {
    config: Config,
    store: DeviceStateStore,
    screens: ScreenStack,
    gestures: GestureClassifier<C>,
    sync: UnboundedSender<SyncRequest>,
}

impl ActionDispatcher<MonotonicClock> {
    pub fn new(config: Config, sync: UnboundedSender<SyncRequest>) -> Self {
        Self::with_clock(config, sync, MonotonicClock)
    }
}

impl<C: Clock> ActionDispatcher<C> {
    pub fn with_clock(config: Config, sync: UnboundedSender<SyncRequest>, clock: C) -> Self {
        Self {
            store: DeviceStateStore::new(config.heating_range),
            screens: ScreenStack::new(),
            gestures: GestureClassifier::with_clock(clock),
            config,
            sync,
        }
    }

    pub fn seed(&mut self, initial: &StateResponse) {
        self.store.seed(initial);
    }

    pub fn set_offline(&mut self, offline: bool) {
        self.store.set_offline(offline);
    }

    /// Applies one event. Failures are logged and leave the panel as it was.
    pub fn handle(&mut self, event: Event) -> Effect {
        let result = match event {
            Event::Press(control) => {
                self.gestures.press(control);
                Ok(Effect::None)
            }
            Event::Release(control) => self.release(control),
            Event::Navigate(name) => self
                .screens
                .navigate_to_named(&name)
                .map(Effect::Navigated),
            Event::Remote(update) => self.apply_remote(update),
            Event::SyncCompleted(outcome) => Ok(self.apply_outcome(outcome)),
        };

        match result {
            Ok(effect) => effect,
            Err(Error::MissingPressState(control)) => {
                debug!("release of {control} without a press, ignoring");
                Effect::None
            }
            Err(err) => {
                warn!("{err}");
                Effect::None
            }
        }
    }

    fn release(&mut self, control: ControlId) -> Result<Effect> {
        let gesture = self.gestures.release(control)?;
        let screen = self.screens.current();

        if !control.is_on(screen) {
            debug!("{control} is not on {screen}, discarding {gesture:?}");
            return Ok(Effect::None);
        }

        match (control, gesture) {
            (ControlId::HotZone(room), Gesture::Tap) => {
                let level = if self.store.room_state(room).light_level > 0 {
                    0
                } else {
                    100
                };
                self.set_light(room, level)
            }
            (ControlId::HotZone(room), Gesture::Hold) => {
                let screen = Screen::from(room);
                self.screens.navigate_to(screen);
                Ok(Effect::Navigated(screen))
            }
            (ControlId::MasterLight, _) => {
                let on = self.store.toggle_master_light();
                self.request_sync(
                    SyncTarget::MasterLights,
                    SyncCommand::Light(if on { 100 } else { 0 }),
                );
                Ok(Effect::MasterLights(on))
            }
            (ControlId::MasterHeating, _) => {
                let on = self.store.toggle_master_heating();
                let heating = if on {
                    HeatingTarget::Degrees(self.config.master_heating_c)
                } else {
                    HeatingTarget::Off
                };
                self.request_sync(SyncTarget::MasterHeating, SyncCommand::Heating(heating));
                Ok(Effect::MasterHeating(on))
            }
            (ControlId::Back, _) => Ok(Effect::WentBack(self.screens.go_back())),
            (ControlId::LightUp(room), Gesture::Tap) => {
                let level = i32::from(self.store.room_state(room).light_level)
                    + i32::from(self.config.light_step);
                self.set_light(room, level.min(100))
            }
            (ControlId::LightUp(room), Gesture::Hold) => self.set_light(room, 100),
            (ControlId::LightDown(room), Gesture::Tap) => {
                let level = i32::from(self.store.room_state(room).light_level)
                    - i32::from(self.config.light_step);
                self.set_light(room, level.max(0))
            }
            (ControlId::LightDown(room), Gesture::Hold) => self.set_light(room, 0),
            (ControlId::HeatingUp(room), _) => self.step_heating(room, self.config.heating_step_c),
            (ControlId::HeatingDown(room), _) => {
                self.step_heating(room, -self.config.heating_step_c)
            }
            (ControlId::HeatingPower(room), _) => {
                let heating = match self.store.room_state(room).heating_target {
                    HeatingTarget::Off => HeatingTarget::Degrees(self.config.default_heating_c),
                    HeatingTarget::Degrees(_) => HeatingTarget::Off,
                };
                self.set_heating(room, heating)
            }
        }
    }

    fn step_heating(&mut self, room: Room, step: f32) -> Result<Effect> {
        let heating = match self.store.room_state(room).heating_target {
            HeatingTarget::Off => self.config.default_heating_c,
            HeatingTarget::Degrees(value) => {
                let step_c = self.config.heating_step_c;
                let stepped = ((value + step) / step_c).round() * step_c;
                self.store.heating_range().clamp(stepped)
            }
        };

        self.set_heating(room, HeatingTarget::Degrees(heating))
    }

    fn set_light(&mut self, room: Room, level: i32) -> Result<Effect> {
        let level = self.store.set_room_light(room, level)?;
        self.request_sync(SyncTarget::RoomLight(room), SyncCommand::Light(level));

        Ok(Effect::RoomLight { room, level })
    }

    fn set_heating(&mut self, room: Room, heating: HeatingTarget) -> Result<Effect> {
        let heating = self.store.set_room_heating(room, heating)?;
        self.request_sync(SyncTarget::RoomHeating(room), SyncCommand::Heating(heating));

        Ok(Effect::RoomHeating { room, heating })
    }

    fn request_sync(&mut self, target: SyncTarget, command: SyncCommand) {
        let request = SyncRequest::new(target, command);
        self.store.mark_pending(target, request.id);

        if self.sync.send(request).is_err() {
            warn!("sync worker is gone, {command:?} for {target:?} stays local");
            self.store.resolve_sync(target, request.id, false);
            self.store.set_offline(true);
        }
    }

    fn apply_remote(&mut self, update: StateUpdate) -> Result<Effect> {
        let effect = match update {
            StateUpdate::MasterLights(on) => {
                if self.store.master_state().lights_master != on {
                    self.store.toggle_master_light();
                }
                self.store.mark_synced(SyncTarget::MasterLights);
                Effect::MasterLights(on)
            }
            StateUpdate::MasterHeating(on) => {
                if self.store.master_state().heating_master != on {
                    self.store.toggle_master_heating();
                }
                self.store.mark_synced(SyncTarget::MasterHeating);
                Effect::MasterHeating(on)
            }
            StateUpdate::RoomLight { room, level } => {
                let level = self.store.set_room_light(room, level.into())?;
                self.store.mark_synced(SyncTarget::RoomLight(room));
                Effect::RoomLight { room, level }
            }
            StateUpdate::RoomHeating { room, heating } => {
                let heating = self.store.set_room_heating(room, heating)?;
                self.store.mark_synced(SyncTarget::RoomHeating(room));
                Effect::RoomHeating { room, heating }
            }
        };

        debug!("applied remote update: {effect:?}");

        Ok(effect)
    }

    fn apply_outcome(&mut self, outcome: SyncOutcome) -> Effect {
        let target = outcome.request.target;
        let ok = outcome.result.is_ok();

        if !self.store.resolve_sync(target, outcome.request.id, ok) {
            debug!(
                "outcome of superseded request {} for {target:?} ignored",
                outcome.request.id
            );
            return Effect::None;
        }

        match outcome.result {
            Ok(_) => self.store.set_offline(false),
            // the hub answered, so it is reachable
            Err(BackendError::Rejected) => {}
            Err(BackendError::Unavailable(_) | BackendError::Timeout) => {
                self.store.set_offline(true)
            }
        }

        Effect::SyncStatus {
            target,
            status: self.store.sync_status(target),
        }
    }
}

impl<C> ActionDispatcher<C> {
    pub fn current_screen(&self) -> Screen {
        self.screens.current()
    }

    pub fn room_snapshot(&self, room: Room) -> RoomState {
        self.store.room_state(room)
    }

    pub fn master_snapshot(&self) -> MasterToggles {
        self.store.master_state()
    }

    pub fn sync_status(&self, target: SyncTarget) -> SyncStatus {
        self.store.sync_status(target)
    }

    pub fn is_offline(&self) -> bool {
        self.store.is_offline()
    }

    /// The label drawn over a room: light level, plus the heating target for
    /// heated rooms.
    pub fn status_label(&self, room: Room) -> String {
        let state = self.store.room_state(room);

        if room.is_heated() {
            format!("{}%\n{}", state.light_level, state.heating_target)
        } else {
            format!("{}%", state.light_level)
        }
    }
}
