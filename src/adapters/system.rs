//! OS-level system actions.

use std::process::Command;

use log::{error, info};

use crate::app::ports::SystemPort;

/// Issues whole-machine commands through the shell.
pub struct OsSystem {
    reboot_command: Vec<String>,
}

impl OsSystem {
    pub fn new(reboot_command: Vec<String>) -> Self {
        Self { reboot_command }
    }
}

impl SystemPort for OsSystem {
    fn reboot(&mut self) {
        info!("issuing reboot: {:?}", self.reboot_command);
        let Some((program, args)) = self.reboot_command.split_first() else {
            error!("reboot command is empty");
            return;
        };
        match Command::new(program).args(args).status() {
            Ok(status) if status.success() => {}
            Ok(status) => error!("reboot command exited with {status}"),
            Err(e) => error!("reboot command failed to spawn: {e}"),
        }
    }
}
