#[cfg(target_os = "macos")]
mod run {
    use std::cell::RefCell;
    use std::sync::Arc;
    use std::sync::atomic::AtomicBool;

    use dispatch2::DispatchQueue;
    use objc2::{MainThreadMarker, MainThreadBound};
    use objc2_app_kit::{NSApplication, NSApplicationActivationPolicy};
    use tracing::warn;

    use spacemark::actor;
    use spacemark::actor::indicator::{Indicator, LabelSink};
    use spacemark::actor::space_watcher::SpaceWatcher;
    use spacemark::common::config::{self, Config};
    use spacemark::common::log;
    use spacemark::model::label::Label;
    use spacemark::sys::appearance;
    use spacemark::sys::notification_center::NotificationCenter;
    use spacemark::sys::window_server::WindowServerProvider;
    use spacemark::ui::status_item::StatusIcon;

    embed_plist::embed_info_plist!("../Info.plist");

    /// Hands labels off to the status item on the main queue. The indicator
    /// runs on its own thread, but AppKit objects are main-thread only.
    struct MainThreadSink {
        icon: Arc<MainThreadBound<RefCell<StatusIcon>>>,
    }

    impl LabelSink for MainThreadSink {
        fn publish(&self, label: Label, menu_open: bool) {
            let icon = self.icon.clone();
            DispatchQueue::main().exec_async(move || {
                let mtm = MainThreadMarker::new().unwrap();
                icon.get(mtm).borrow_mut().apply(&label, menu_open);
            });
        }
    }

    pub fn main() {
        log::init();

        let config = Config::load(&config::config_file()).unwrap_or_else(|err| {
            warn!("failed to load config, using defaults: {err:#}");
            Config::default()
        });

        let mtm = MainThreadMarker::new().unwrap();
        let app = NSApplication::sharedApplication(mtm);
        app.setActivationPolicy(NSApplicationActivationPolicy::Accessory);

        let (events_tx, events_rx) = actor::channel();
        let dark_mode = Arc::new(AtomicBool::new(appearance::system_dark_mode()));

        let icon = Arc::new(MainThreadBound::new(
            RefCell::new(StatusIcon::new(mtm, events_tx.clone())),
            mtm,
        ));
        let _notification_center = NotificationCenter::new(events_tx.clone(), dark_mode.clone());

        let watcher = match SpaceWatcher::new(config.marker_file(), events_tx.clone()) {
            Ok(watcher) => Some(watcher),
            Err(err) => {
                warn!("marker watch unavailable, relying on notifications: {err:#}");
                None
            }
        };

        let indicator = Indicator::new(
            WindowServerProvider,
            MainThreadSink { icon },
            events_rx,
            watcher,
            dark_mode,
            config.separator.clone(),
        );
        std::thread::Builder::new()
            .name("indicator".to_string())
            .spawn(move || {
                let rt = tokio::runtime::Builder::new_current_thread()
                    .build()
                    .unwrap();
                rt.block_on(indicator.run());
            })
            .unwrap();

        app.run();
    }
}

#[cfg(target_os = "macos")]
fn main() {
    run::main();
}

#[cfg(not(target_os = "macos"))]
fn main() {
    eprintln!("spacemark requires the macOS window server");
    std::process::exit(1);
}
