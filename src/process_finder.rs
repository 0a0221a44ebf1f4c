//! Process discovery.
//!
//! Finds running processes by name and maps them to the top-level window
//! that key messages should be posted to.

use sysinfo::{ProcessesToUpdate, System};
use tracing::debug;

use crate::error::{KeyError, Result};
use crate::window::{self, WindowHandle};

/// Finds processes by name and retrieves their window handles.
///
/// Uses the `sysinfo` crate to enumerate running processes and match them
/// by name (case-insensitive substring). The owning window is then found by
/// enumerating top-level windows, which requires Windows.
///
/// # Example
///
/// ```
/// use keybond::ProcessFinder;
///
/// let mut finder = ProcessFinder::new();
/// match finder.find_process_window("notepad") {
///     Ok(Some(window)) => println!("Found window {}", window),
///     Ok(None) => println!("Process not found"),
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// ```
pub struct ProcessFinder {
    system: System,
}

impl Clone for ProcessFinder {
    fn clone(&self) -> Self {
        Self {
            system: System::new(),
        }
    }
}

impl Default for ProcessFinder {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessFinder {
    pub fn new() -> Self {
        Self {
            system: System::new(),
        }
    }

    /// PIDs of all processes whose name contains `process_name`, ascending.
    pub fn find_pids(&mut self, process_name: &str) -> Vec<u32> {
        self.system.refresh_processes(ProcessesToUpdate::All, true);

        let process_name_lower = process_name.to_lowercase();

        let mut pids: Vec<u32> = self
            .system
            .processes()
            .iter()
            .filter(|(_, process)| {
                process
                    .name()
                    .to_string_lossy()
                    .to_lowercase()
                    .contains(&process_name_lower)
            })
            .map(|(pid, _)| pid.as_u32())
            .collect();
        pids.sort_unstable();
        pids
    }

    /// Window of the first matching process that owns a visible top-level
    /// window.
    ///
    /// Returns `Ok(None)` when no process matches, and
    /// [`KeyError::NoProcessWindow`] when processes match but none of them
    /// has a window.
    pub fn find_process_window(&mut self, process_name: &str) -> Result<Option<WindowHandle>> {
        let pids = self.find_pids(process_name);
        let Some(&first) = pids.first() else {
            return Ok(None);
        };

        for pid in pids.iter().copied() {
            let handle = window::window_for_pid(pid)?;
            if !handle.is_null() {
                debug!(pid, window = %handle, "process window found");
                return Ok(Some(handle));
            }
            debug!(pid, "process has no visible window");
        }

        Err(KeyError::no_process_window(process_name, first))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nonexistent_process_has_no_pids() {
        let mut finder = ProcessFinder::new();
        assert!(finder.find_pids("nonexistent_process_xyz_123456").is_empty());
    }

    #[test]
    fn test_pids_are_sorted() {
        let mut finder = ProcessFinder::new();
        let pids = finder.find_pids("");
        assert!(pids.windows(2).all(|pair| pair[0] <= pair[1]));
    }
}
