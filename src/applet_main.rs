// SPDX-License-Identifier: MPL-2.0

mod applet;
mod config;
mod i18n;

fn main() -> cosmic::iced::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Get the system's preferred languages.
    let requested_languages = i18n_embed::DesktopLanguageRequester::requested_languages();

    // Enable localizations to be applied.
    i18n::init(&requested_languages);

    // Starts the applet's event loop
    cosmic::applet::run::<applet::NetspeedApplet>(())
}
