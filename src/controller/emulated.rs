//! Emulated joystick controller
//! Location: src/controller/emulated.rs

use serde::Serialize;
use tracing::{debug, info, trace};

use super::families::{ControllerFamily, FamilyCharacteristics, FamilyDescriptor, SignalTranslator};
use super::signals::RawSignals;
use crate::error::EmuResult;
use crate::state::NormalizedCommand;

/// Where `read()` takes its command from when no script is playing
#[derive(Debug, Clone, Copy, PartialEq)]
enum InputSource {
    /// Direct command set by a test harness
    Manual(NormalizedCommand),
    /// Latest raw signal set, re-translated on every read
    Signals(RawSignals),
}

/// Stand-in for the joystick hardware
///
/// A loaded script overrides everything until it runs out or is cleared.
/// Otherwise the controller is either translating raw signals through its
/// family or replaying a manually set command.
#[derive(Debug, Clone)]
pub struct EmulatedController {
    family: Option<&'static FamilyDescriptor>,
    source: InputSource,
    script: Vec<NormalizedCommand>,
    cursor: usize,
    current: NormalizedCommand,
    connected: bool,
}

impl EmulatedController {
    /// Controller in manual mode with no family selected
    pub fn new() -> Self {
        Self {
            family: None,
            source: InputSource::Manual(NormalizedCommand::NEUTRAL),
            script: Vec::new(),
            cursor: 0,
            current: NormalizedCommand::NEUTRAL,
            connected: true,
        }
    }

    /// Controller translating signals for `family`, starting at neutral
    pub fn with_family(family: ControllerFamily) -> Self {
        let mut controller = Self::new();
        controller.set_controller_family(family);
        controller
    }

    /// Like [`with_family`](Self::with_family) but resolves a family name
    pub fn from_family_name(name: &str) -> EmuResult<Self> {
        let family: ControllerFamily = name.parse()?;
        Ok(Self::with_family(family))
    }

    /// Produce the command for this tick
    pub fn read(&mut self) -> NormalizedCommand {
        if let Some(command) = self.script.get(self.cursor).copied() {
            self.cursor += 1;
            if self.cursor == self.script.len() {
                debug!(steps = self.script.len(), "control script exhausted");
            }
            self.current = command;
            return command;
        }

        self.current = match self.source {
            InputSource::Manual(command) => command,
            InputSource::Signals(raw) => match self.family {
                Some(descriptor) => descriptor.translate(&raw),
                None => NormalizedCommand::NEUTRAL,
            },
        };
        trace!(linear = self.current.linear, angular = self.current.angular, "controller read");
        self.current
    }

    /// Last command returned by [`read`](Self::read)
    pub fn current_command(&self) -> NormalizedCommand {
        self.current
    }

    /// Switch to manual mode with `command` (axes clamped); clears any script
    pub fn set_input(&mut self, command: NormalizedCommand) {
        let command = command.clamped();
        self.clear_script_steps();
        self.source = InputSource::Manual(command);
        self.current = command;
    }

    /// Switch to signal mode with `signals`; clears any script
    pub fn set_raw_signals(&mut self, signals: RawSignals) {
        self.clear_script_steps();
        self.source = InputSource::Signals(signals);
    }

    /// Select the hardware family and reset signals to its neutral set
    pub fn set_controller_family(&mut self, family: ControllerFamily) {
        info!(family = %family, "controller family selected");
        self.family = Some(family.descriptor());
        self.source = InputSource::Signals(family.neutral_signals());
        self.current = NormalizedCommand::NEUTRAL;
    }

    /// Select a family by name; unknown names leave the controller untouched
    pub fn set_controller_family_by_name(&mut self, name: &str) -> EmuResult<()> {
        let family: ControllerFamily = name.parse()?;
        self.set_controller_family(family);
        Ok(())
    }

    pub fn controller_family(&self) -> Option<ControllerFamily> {
        self.family.map(|descriptor| descriptor.family)
    }

    /// Characteristics of the selected family
    pub fn signal_characteristics(&self) -> Option<&'static FamilyCharacteristics> {
        self.family.map(|descriptor| &descriptor.characteristics)
    }

    /// Latest raw signals, if the controller is in signal mode
    pub fn raw_signals(&self) -> Option<RawSignals> {
        match self.source {
            InputSource::Signals(raw) => Some(raw),
            InputSource::Manual(_) => None,
        }
    }

    /// Load a command sequence, replacing any previous script
    pub fn load_script(&mut self, commands: Vec<NormalizedCommand>) {
        debug!(steps = commands.len(), "control script loaded");
        self.script = commands.into_iter().map(NormalizedCommand::clamped).collect();
        self.cursor = 0;
    }

    /// Rewind the script to its first step
    pub fn reset_script(&mut self) {
        self.cursor = 0;
    }

    /// Drop the script and return the cached command to neutral
    pub fn clear_script(&mut self) {
        self.clear_script_steps();
        if let InputSource::Manual(_) = self.source {
            self.source = InputSource::Manual(NormalizedCommand::NEUTRAL);
        }
        self.current = NormalizedCommand::NEUTRAL;
    }

    /// True while scripted steps remain
    pub fn script_active(&self) -> bool {
        self.cursor < self.script.len()
    }

    /// Scripted steps not yet played
    pub fn script_remaining(&self) -> usize {
        self.script.len().saturating_sub(self.cursor)
    }

    pub fn connect(&mut self) {
        if !self.connected {
            info!("controller connected");
        }
        self.connected = true;
    }

    /// Mark the link down and force the cached command to neutral
    pub fn disconnect(&mut self) {
        if self.connected {
            info!("controller disconnected");
        }
        self.connected = false;
        self.current = NormalizedCommand::NEUTRAL;
        if let InputSource::Manual(_) = self.source {
            self.source = InputSource::Manual(NormalizedCommand::NEUTRAL);
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn status(&self) -> ControllerStatus {
        ControllerStatus {
            family: self.controller_family(),
            connected: self.connected,
            mode: if self.script_active() {
                ControllerMode::Script
            } else {
                match self.source {
                    InputSource::Manual(_) => ControllerMode::Manual,
                    InputSource::Signals(_) => ControllerMode::Signals,
                }
            },
            script_remaining: self.script_remaining(),
            current: self.current,
        }
    }

    fn clear_script_steps(&mut self) {
        if !self.script.is_empty() {
            debug!(remaining = self.script_remaining(), "control script cleared");
        }
        self.script.clear();
        self.cursor = 0;
    }
}

impl Default for EmulatedController {
    fn default() -> Self {
        Self::new()
    }
}

/// Active input mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ControllerMode {
    Manual,
    Signals,
    Script,
}

/// Snapshot of the controller for observers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControllerStatus {
    pub family: Option<ControllerFamily>,
    pub connected: bool,
    pub mode: ControllerMode,
    pub script_remaining: usize,
    pub current: NormalizedCommand,
}
