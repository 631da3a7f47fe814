// SPDX-License-Identifier: MPL-2.0

//! Panel applet controlling the overlay
//! The popup menu writes requests into the shared config entry; the overlay
//! picks them up on its own event loop.

use crate::config::{CONFIG_ID, Config};
use crate::fl;
use cosmic::cosmic_config;
use cosmic::iced::window::Id;
use cosmic::iced::{Limits, Subscription};
use cosmic::iced_winit::commands::popup::{destroy_popup, get_popup};
use cosmic::prelude::*;
use cosmic::widget;

const ICON: &str = "network-transmit-receive-symbolic";

/// The applet model stores the popup state and the last seen config
#[derive(Default)]
pub struct NetspeedApplet {
    /// Application state which is managed by the COSMIC runtime.
    core: cosmic::Core,
    /// The popup id.
    popup: Option<Id>,
    /// Configuration shared with the overlay.
    config: Config,
    config_handler: Option<cosmic_config::Config>,
}

/// Messages emitted by the applet and its popup
#[derive(Debug, Clone)]
pub enum Message {
    TogglePopup,
    PopupClosed(Id),
    ToggleOverlay,
    Exit,
    UpdateConfig(Config),
}

impl NetspeedApplet {
    fn write_config(&self) {
        match &self.config_handler {
            Some(handler) => self.config.store(handler),
            None => log::warn!("no config handler, request not delivered to the overlay"),
        }
    }

    /// The menu action for `message`, or `None` while no overlay would act on it.
    fn request(&self, message: Message) -> Option<Message> {
        self.config.accepts_requests().then_some(message)
    }

    fn close_popup(&mut self) -> Task<cosmic::Action<Message>> {
        match self.popup.take() {
            Some(id) => destroy_popup(id),
            None => Task::none(),
        }
    }
}

impl cosmic::Application for NetspeedApplet {
    type Executor = cosmic::executor::Default;

    type Flags = ();

    type Message = Message;

    const APP_ID: &'static str = "com.github.cosmic.NetspeedApplet";

    fn core(&self) -> &cosmic::Core {
        &self.core
    }

    fn core_mut(&mut self) -> &mut cosmic::Core {
        &mut self.core
    }

    fn init(core: cosmic::Core, _flags: Self::Flags) -> (Self, Task<cosmic::Action<Self::Message>>) {
        let (config_handler, config) = match Config::load() {
            Ok((handler, config)) => (Some(handler), config),
            Err(err) => {
                log::warn!("failed to open overlay config: {err}");
                (None, Config::default())
            }
        };

        let applet = NetspeedApplet {
            core,
            config,
            config_handler,
            ..Default::default()
        };

        (applet, Task::none())
    }

    fn on_close_requested(&self, id: Id) -> Option<Message> {
        Some(Message::PopupClosed(id))
    }

    /// The panel button, with the tray tooltip
    fn view(&self) -> Element<'_, Self::Message> {
        let button = self
            .core
            .applet
            .icon_button(ICON)
            .on_press(Message::TogglePopup);

        widget::tooltip(
            button,
            widget::text(fl!("tray-tooltip")),
            widget::tooltip::Position::Bottom,
        )
        .into()
    }

    fn view_window(&self, _id: Id) -> Element<'_, Self::Message> {
        let toggle_label = if !self.config.accepts_requests() {
            fl!("overlay-not-running")
        } else if self.config.overlay_visible {
            fl!("hide-overlay")
        } else {
            fl!("show-overlay")
        };

        let content = widget::column()
            .padding([8, 0])
            .push(
                cosmic::applet::menu_button(widget::text::body(toggle_label))
                    .on_press_maybe(self.request(Message::ToggleOverlay)),
            )
            .push(cosmic::applet::padded_control(
                widget::divider::horizontal::default(),
            ))
            .push(
                cosmic::applet::menu_button(widget::text::body(fl!("exit")))
                    .on_press_maybe(self.request(Message::Exit)),
            );

        self.core.applet.popup_container(content).into()
    }

    fn subscription(&self) -> Subscription<Self::Message> {
        // Keep the menu label in sync with what the overlay last wrote
        self.core()
            .watch_config::<Config>(CONFIG_ID)
            .map(|update| Message::UpdateConfig(update.config))
    }

    fn update(&mut self, message: Self::Message) -> Task<cosmic::Action<Self::Message>> {
        match message {
            Message::TogglePopup => {
                if self.popup.is_some() {
                    return self.close_popup();
                }
                let Some(parent) = self.core.main_window_id() else {
                    return Task::none();
                };

                let new_id = Id::unique();
                self.popup.replace(new_id);
                let mut popup_settings =
                    self.core
                        .applet
                        .get_popup_settings(parent, new_id, None, None, None);
                popup_settings.positioner.size_limits = Limits::NONE
                    .max_width(300.0)
                    .min_width(180.0)
                    .min_height(60.0)
                    .max_height(400.0);
                return get_popup(popup_settings);
            }
            Message::PopupClosed(id) => {
                if self.popup.as_ref() == Some(&id) {
                    self.popup = None;
                }
            }
            Message::ToggleOverlay | Message::Exit if !self.config.accepts_requests() => {
                log::debug!("overlay is not running, ignoring {message:?}");
                return self.close_popup();
            }
            Message::ToggleOverlay => {
                self.config.overlay_visible = !self.config.overlay_visible;
                log::info!(
                    "requesting overlay {}",
                    if self.config.overlay_visible { "shown" } else { "hidden" }
                );
                self.write_config();
                return self.close_popup();
            }
            Message::Exit => {
                log::info!("requesting overlay exit");
                self.config.exit_requested = true;
                self.write_config();
                return self.close_popup();
            }
            Message::UpdateConfig(config) => {
                self.config = config;
            }
        }
        Task::none()
    }

    fn style(&self) -> Option<cosmic::iced_runtime::Appearance> {
        Some(cosmic::applet::style())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmic::Application;

    fn applet_with(config: Config) -> NetspeedApplet {
        NetspeedApplet {
            config,
            ..Default::default()
        }
    }

    #[test]
    fn menu_is_disabled_once_the_overlay_stopped() {
        let applet = applet_with(Config::default());
        assert!(applet.request(Message::ToggleOverlay).is_none());
        assert!(applet.request(Message::Exit).is_none());
    }

    #[test]
    fn menu_is_enabled_while_the_overlay_runs() {
        let applet = applet_with(Config {
            overlay_running: true,
            ..Config::default()
        });
        assert!(matches!(
            applet.request(Message::ToggleOverlay),
            Some(Message::ToggleOverlay)
        ));
        assert!(matches!(applet.request(Message::Exit), Some(Message::Exit)));
    }

    #[test]
    fn pending_exit_disables_the_menu() {
        let applet = applet_with(Config {
            overlay_running: true,
            exit_requested: true,
            ..Config::default()
        });
        assert!(applet.request(Message::ToggleOverlay).is_none());
    }

    #[test]
    fn toggle_without_overlay_changes_nothing() {
        let mut applet = applet_with(Config::default());
        let _ = applet.update(Message::ToggleOverlay);
        let _ = applet.update(Message::Exit);
        assert_eq!(applet.config, Config::default());
    }

    #[test]
    fn toggle_with_running_overlay_flips_visibility() {
        let running = Config {
            overlay_running: true,
            ..Config::default()
        };
        let mut applet = applet_with(running.clone());
        let _ = applet.update(Message::ToggleOverlay);
        assert!(!applet.config.overlay_visible);
        assert!(applet.config.overlay_running);
    }
}
