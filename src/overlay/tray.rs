// SPDX-License-Identifier: MPL-2.0

//! Requests from the panel applet, read back out of the shared config

use crate::config::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayRequest {
    Exit,
    SetVisible(bool),
    Move { x: i32, y: i32 },
}

/// Requests implied by `current` that `applied` does not reflect yet.
///
/// An exit request supersedes everything else.
pub fn pending_requests(applied: &Config, current: &Config) -> Vec<TrayRequest> {
    if current.exit_requested {
        return vec![TrayRequest::Exit];
    }

    let mut requests = Vec::new();
    if current.overlay_visible != applied.overlay_visible {
        requests.push(TrayRequest::SetVisible(current.overlay_visible));
    }
    if (current.overlay_x, current.overlay_y) != (applied.overlay_x, applied.overlay_y) {
        requests.push(TrayRequest::Move {
            x: current.overlay_x,
            y: current.overlay_y,
        });
    }
    requests
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unchanged_config_requests_nothing() {
        let config = Config::default();
        assert!(pending_requests(&config, &config.clone()).is_empty());
    }

    #[test]
    fn visibility_change_is_forwarded() {
        let applied = Config::default();
        let current = Config {
            overlay_visible: false,
            ..Config::default()
        };
        assert_eq!(
            pending_requests(&applied, &current),
            [TrayRequest::SetVisible(false)]
        );
        assert_eq!(
            pending_requests(&current, &applied),
            [TrayRequest::SetVisible(true)]
        );
    }

    #[test]
    fn exit_supersedes_other_changes() {
        let applied = Config::default();
        let current = Config {
            overlay_visible: false,
            exit_requested: true,
            overlay_x: 300,
            ..Config::default()
        };
        assert_eq!(pending_requests(&applied, &current), [TrayRequest::Exit]);
    }

    #[test]
    fn position_change_moves_overlay() {
        let applied = Config::default();
        let current = Config {
            overlay_x: 40,
            overlay_y: 80,
            ..Config::default()
        };
        assert_eq!(
            pending_requests(&applied, &current),
            [TrayRequest::Move { x: 40, y: 80 }]
        );
    }
}
