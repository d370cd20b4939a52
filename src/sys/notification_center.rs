//! Registers for the workspace, application, and theme notifications that
//! drive label recomputation outside the marker watch: space changes,
//! application idle (self-heal for missed marker events), and theme changes.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use objc2::rc::{Allocated, Retained};
use objc2::runtime::AnyObject;
use objc2::{AnyThread, Encode, Encoding, Message, define_class, msg_send, sel};
use objc2_app_kit::NSWorkspace;
use objc2_foundation::{
    NSDistributedNotificationCenter, NSNotification, NSNotificationCenter, NSObject, NSString,
};
use tracing::{debug, trace};

use crate::actor::Sender;
use crate::actor::indicator;
use crate::sys::appearance;

#[repr(C)]
struct Instance {
    events_tx: Sender<indicator::Event>,
    dark_mode: Arc<AtomicBool>,
}

unsafe impl Encode for Instance {
    const ENCODING: Encoding = Encoding::Object;
}

define_class!(
    // SAFETY:
    // - The superclass NSObject does not have any subclassing requirements.
    // - `NotificationHandler` does not implement `Drop`.
    #[unsafe(super(NSObject))]
    #[ivars = Box<Instance>]
    struct NotificationHandler;

    // SAFETY: Each of these method signatures must match their invocations.
    impl NotificationHandler {
        #[unsafe(method_id(initWith:))]
        fn init(this: Allocated<Self>, instance: Instance) -> Option<Retained<Self>> {
            let this = this.set_ivars(Box::new(instance));
            unsafe { msg_send![super(this), init] }
        }

        #[unsafe(method(recvActiveSpaceChanged:))]
        fn recv_active_space_changed(&self, notif: &NSNotification) {
            trace!("{notif:#?}");
            self.ivars().events_tx.send(indicator::Event::Refresh);
        }

        #[unsafe(method(recvAppDidUpdate:))]
        fn recv_app_did_update(&self, _notif: &NSNotification) {
            // Fires constantly; cheap because the indicator deduplicates the
            // formatted label before publishing.
            self.ivars().events_tx.send(indicator::Event::Refresh);
        }

        #[unsafe(method(recvThemeChanged:))]
        fn recv_theme_changed(&self, notif: &NSNotification) {
            trace!("{notif:#?}");
            let dark = appearance::system_dark_mode();
            self.ivars().dark_mode.store(dark, Ordering::Relaxed);
            debug!(dark, "interface theme changed");
            self.ivars().events_tx.send(indicator::Event::Refresh);
        }
    }
);

fn as_any_object<T: Message>(obj: &T) -> &AnyObject {
    unsafe { &*(obj as *const T as *const AnyObject) }
}

pub struct NotificationCenter {
    _handler: Retained<NotificationHandler>,
}

impl NotificationCenter {
    pub fn new(events_tx: Sender<indicator::Event>, dark_mode: Arc<AtomicBool>) -> Self {
        dark_mode.store(appearance::system_dark_mode(), Ordering::Relaxed);
        let instance = Instance { events_tx, dark_mode };
        let handler: Retained<NotificationHandler> =
            unsafe { msg_send![NotificationHandler::alloc(), initWith: instance] };

        let workspace = NSWorkspace::sharedWorkspace();
        let workspace_center = workspace.notificationCenter();
        let default_center = NSNotificationCenter::defaultCenter();
        let distributed_center = NSDistributedNotificationCenter::defaultCenter();
        unsafe {
            use objc2_app_kit::*;
            workspace_center.addObserver_selector_name_object(
                as_any_object(&*handler),
                sel!(recvActiveSpaceChanged:),
                Some(NSWorkspaceActiveSpaceDidChangeNotification),
                Some(as_any_object(&*workspace)),
            );
            default_center.addObserver_selector_name_object(
                as_any_object(&*handler),
                sel!(recvAppDidUpdate:),
                Some(NSApplicationDidUpdateNotification),
                None,
            );
            distributed_center.addObserver_selector_name_object(
                as_any_object(&*handler),
                sel!(recvThemeChanged:),
                Some(&NSString::from_str("AppleInterfaceThemeChangedNotification")),
                None,
            );
        }

        NotificationCenter { _handler: handler }
    }
}
